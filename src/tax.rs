// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! GST derivation for a single entry.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{GstRate, Transaction};
use crate::validate::MAX_AMOUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Round half-up to two places. Ledger amounts are non-negative, so
/// away-from-zero on the midpoint is the currency convention.
pub fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn compute(base_amount: Decimal, rate: GstRate) -> LedgerResult<TaxBreakdown> {
    if base_amount.is_sign_negative() && !base_amount.is_zero() {
        return Err(LedgerError::NegativeAmount {
            amount: base_amount,
        });
    }
    let overflow = || LedgerError::AmountOverflow {
        amount: base_amount,
        rate: rate.percent(),
    };
    let tax_amount = base_amount
        .checked_mul(Decimal::from(rate.percent()))
        .and_then(|d| d.checked_div(Decimal::ONE_HUNDRED))
        .map(round2)
        .ok_or_else(overflow)?;
    let total_amount = base_amount.checked_add(tax_amount).ok_or_else(overflow)?;
    Ok(TaxBreakdown {
        tax_amount,
        total_amount,
    })
}

/// Like [`compute`], for a rate that has not been checked against the slabs yet.
pub fn compute_raw(base_amount: Decimal, rate_percent: Decimal) -> LedgerResult<TaxBreakdown> {
    let rate = GstRate::from_percent(rate_percent)?;
    compute(base_amount, rate)
}

/// Re-derive the tax of a stored entry and compare it with what was stored.
/// Amounts above [`MAX_AMOUNT`] are reported too, so the aggregation engine
/// only ever folds bounded figures.
pub fn verify(tx: &Transaction) -> LedgerResult<()> {
    if tx.base_amount > MAX_AMOUNT {
        return Err(LedgerError::AmountTooLarge {
            amount: tx.base_amount,
            max: MAX_AMOUNT,
        });
    }
    let expected = compute(tx.base_amount, tx.tax_rate)?.tax_amount;
    if expected != tx.tax_amount {
        return Err(LedgerError::TaxMismatch {
            id: tx.id,
            base: tx.base_amount,
            rate: tx.tax_rate.percent(),
            stored: tx.tax_amount,
            expected,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn round2_is_half_up() {
        assert_eq!(round2(d("0.125")), d("0.13"));
        assert_eq!(round2(d("0.124")), d("0.12"));
        assert_eq!(round2(d("149.995")), d("150.00"));
    }

    #[test]
    fn overflowing_base_is_an_error() {
        let err = compute(Decimal::MAX, GstRate::TwentyEight).unwrap_err();
        assert!(matches!(err, LedgerError::AmountOverflow { rate: 28, .. }));
    }

    #[test]
    fn negative_zero_is_accepted() {
        let b = compute(d("-0.00"), GstRate::Five).unwrap();
        assert!(b.tax_amount.is_zero());
    }
}
