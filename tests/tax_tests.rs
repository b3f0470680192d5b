// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use gstledger::error::LedgerError;
use gstledger::models::GstRate;
use gstledger::tax;
use gstledger::validate::MAX_AMOUNT;
use rstest::rstest;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[rstest]
#[case("500", GstRate::Eighteen, "90.00", "590.00")]
#[case("1000", GstRate::Eighteen, "180.00", "1180.00")]
#[case("500", GstRate::Five, "25.00", "525.00")]
#[case("0.10", GstRate::Five, "0.01", "0.11")]
#[case("0.30", GstRate::Five, "0.02", "0.32")]
#[case("833.33", GstRate::Eighteen, "150.00", "983.33")]
#[case("99.99", GstRate::TwentyEight, "28.00", "127.99")]
#[case("1234.56", GstRate::Twelve, "148.15", "1382.71")]
#[case("750", GstRate::Zero, "0", "750")]
fn computes_tax_and_total(
    #[case] base: &str,
    #[case] rate: GstRate,
    #[case] tax_amount: &str,
    #[case] total: &str,
) {
    let b = tax::compute(dec(base), rate).unwrap();
    assert_eq!(b.tax_amount, dec(tax_amount));
    assert_eq!(b.total_amount, dec(total));
    assert_eq!(b.tax_amount + dec(base), b.total_amount);
    assert!(b.tax_amount >= Decimal::ZERO);
    assert!(b.tax_amount.scale() <= 2);
}

#[rstest]
#[case("17")]
#[case("18.5")]
#[case("-5")]
#[case("100")]
fn off_slab_rates_are_rejected(#[case] rate: &str) {
    let err = tax::compute_raw(dec("100"), dec(rate)).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTaxRate { .. }));
}

#[test]
fn slab_rates_accept_trailing_zeros() {
    let b = tax::compute_raw(dec("100"), dec("18.00")).unwrap();
    assert_eq!(b.tax_amount, dec("18"));
    assert_eq!("28%".parse::<GstRate>().unwrap(), GstRate::TwentyEight);
    assert!("twelve".parse::<GstRate>().is_err());
}

#[test]
fn negative_base_is_rejected() {
    let err = tax::compute(dec("-1"), GstRate::Five).unwrap_err();
    assert_eq!(err, LedgerError::NegativeAmount { amount: dec("-1") });
}

#[test]
fn rate_serializes_as_bare_percentage() {
    assert_eq!(serde_json::to_string(&GstRate::Twelve).unwrap(), "12");
    let r: GstRate = serde_json::from_str("5").unwrap();
    assert_eq!(r, GstRate::Five);
    assert!(serde_json::from_str::<GstRate>("7").is_err());
}

#[test]
fn ledger_maximum_computes_and_beyond_decimal_range_errors() {
    let b = tax::compute(MAX_AMOUNT, GstRate::TwentyEight).unwrap();
    assert_eq!(b.tax_amount, dec("280000000000"));
    assert_eq!(b.total_amount, dec("1280000000000"));

    let err = tax::compute(Decimal::MAX, GstRate::TwentyEight).unwrap_err();
    assert!(matches!(err, LedgerError::AmountOverflow { .. }));
}
