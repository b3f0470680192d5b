// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use gstledger::extract::{bill_draft, voice_draft};
use gstledger::models::{Category, GstRate, TxKind};
use gstledger::validate::validate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn cats() -> Vec<Category> {
    vec![
        Category {
            id: 1,
            name: "Software".into(),
        },
        Category {
            id: 2,
            name: "Travel".into(),
        },
    ]
}

#[test]
fn bill_reply_in_code_fence_is_parsed() {
    let raw = "```json\n{\"type\": \"expense\", \"vendor\": \"CloudHost Pvt Ltd\", \"amount\": 2499.5, \
               \"gstRate\": \"18\", \"description\": \"Hosting platform subscription\", \
               \"date\": \"2024-03-14\", \"category\": \"Software\"}\n```";
    let d = bill_draft(raw, &cats()).unwrap();
    assert_eq!(d.kind, Some(TxKind::Expense));
    assert_eq!(d.vendor_name, "CloudHost Pvt Ltd");
    assert_eq!(d.base_amount, Some(Decimal::from_str("2499.50").unwrap()));
    assert_eq!(d.tax_rate, Some(Decimal::from(18)));
    assert_eq!(d.category_id, Some(1));
    assert_eq!(d.transaction_date, NaiveDate::from_ymd_opt(2024, 3, 14));

    let tx = validate(&d).unwrap();
    assert_eq!(tx.tax_rate, GstRate::Eighteen);
}

#[test]
fn bill_rate_is_clamped_to_nearest_slab() {
    let raw = r#"{"type":"expense","vendor":"Cab Co","amount":"₹1,200","gstRate":"6","description":"airport trip","date":"2024-04-01"}"#;
    let d = bill_draft(raw, &cats()).unwrap();
    assert_eq!(d.tax_rate, Some(Decimal::from(5)));
    assert_eq!(d.base_amount, Some(Decimal::from(1200)));
    assert_eq!(d.category_name.as_deref(), Some("Travel"));
    assert_eq!(d.category_id, Some(2));
}

#[test]
fn bill_missing_rate_defaults_to_zero_and_kind_is_inferred() {
    let raw = r#"{"vendor":"Acme","amount":15000,"description":"Payment received for consulting","date":"2024-04-02"}"#;
    let d = bill_draft(raw, &[]).unwrap();
    assert_eq!(d.tax_rate, Some(Decimal::ZERO));
    assert_eq!(d.kind, Some(TxKind::Income));
    assert_eq!(d.category_name.as_deref(), Some("Professional Services"));
    assert_eq!(d.category_id, None);
}

#[test]
fn bill_reply_that_is_not_json_is_an_error() {
    assert!(bill_draft("Sorry, I could not read this bill.", &cats()).is_err());
    assert!(bill_draft("[1, 2]", &cats()).is_err());
}

#[test]
fn bill_without_date_fails_validation() {
    let raw = r#"{"type":"expense","vendor":"Acme","amount":100,"gstRate":"12","description":"stuff"}"#;
    let d = bill_draft(raw, &cats()).unwrap();
    assert!(validate(&d).is_err());
}

#[test]
fn voice_transcript_yields_amount_vendor_and_kind() {
    let d = voice_draft("Paid ₹500 to Sharma Traders");
    assert_eq!(d.base_amount, Some(Decimal::from(500)));
    assert_eq!(d.vendor_name, "Sharma Traders");
    assert_eq!(d.kind, Some(TxKind::Expense));
    assert!(d.is_voice_entry);
    assert_eq!(d.description.as_deref(), Some("Paid ₹500 to Sharma Traders"));
    assert_eq!(d.tax_rate, None);
}

#[test]
fn voice_transcript_without_hints_leaves_gaps_for_validation() {
    let d = voice_draft("lunch meeting");
    assert_eq!(d.base_amount, None);
    assert_eq!(d.kind, None);
    assert!(d.vendor_name.is_empty());
    assert!(validate(&d).is_err());
}

#[test]
fn voice_hints_match_whole_words_only() {
    let d = voice_draft("Forgot the receipt, spent 200 on chai");
    assert_eq!(d.kind, Some(TxKind::Expense));
    assert_eq!(d.base_amount, Some(Decimal::from(200)));

    let d = voice_draft("Got 1500 from Mehta for the logo");
    assert_eq!(d.kind, Some(TxKind::Income));
}
