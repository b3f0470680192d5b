// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{GstRate, NewTransaction, TransactionDraft};

/// Check a draft from any entry path and turn it into an insertable entry.
///
/// A missing rate falls back to the 18% slab used by the entry form; any
/// other rate must match a slab exactly.
pub fn validate(draft: &TransactionDraft) -> LedgerResult<NewTransaction> {
    let kind = draft.kind.ok_or(LedgerError::MissingKind)?;

    let vendor_name = draft.vendor_name.trim();
    if vendor_name.is_empty() {
        return Err(LedgerError::EmptyVendor);
    }

    let base_amount = validate_amount(draft.base_amount.ok_or(LedgerError::MissingAmount)?)?;

    let tax_rate = match draft.tax_rate {
        Some(r) => GstRate::from_percent(r)?,
        None => GstRate::default(),
    };

    let transaction_date = draft.transaction_date.ok_or(LedgerError::MissingDate)?;

    let description = draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(NewTransaction {
        kind,
        vendor_name: vendor_name.to_string(),
        base_amount,
        tax_rate,
        category_id: draft.category_id,
        transaction_date,
        description,
        is_voice_entry: draft.is_voice_entry,
    })
}

/// Largest base amount a single entry may carry: one lakh crore
/// (10^12). GST on it stays far inside `Decimal`, and summing 10^16 such
/// entries still cannot overflow a period total.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Non-negative, at most two decimal places, at most [`MAX_AMOUNT`].
pub fn validate_amount(amount: Decimal) -> LedgerResult<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::NegativeAmount { amount });
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::AmountTooLarge {
            amount,
            max: MAX_AMOUNT,
        });
    }
    let normalized = amount.normalize();
    if normalized.scale() > 2 {
        return Err(LedgerError::AmountPrecision { amount });
    }
    Ok(normalized.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    use crate::models::TxKind;

    fn draft() -> TransactionDraft {
        TransactionDraft {
            kind: Some(TxKind::Expense),
            vendor_name: " Stationery Mart ".into(),
            base_amount: Some(Decimal::from_str("1200.50").unwrap()),
            tax_rate: Some(Decimal::from(12)),
            transaction_date: NaiveDate::from_ymd_opt(2024, 3, 5),
            description: Some("   ".into()),
            ..Default::default()
        }
    }

    #[test]
    fn trims_and_normalizes() {
        let tx = validate(&draft()).unwrap();
        assert_eq!(tx.vendor_name, "Stationery Mart");
        assert_eq!(tx.tax_rate, GstRate::Twelve);
        assert_eq!(tx.description, None);
    }

    #[test]
    fn missing_rate_defaults_to_eighteen() {
        let mut d = draft();
        d.tax_rate = None;
        assert_eq!(validate(&d).unwrap().tax_rate, GstRate::Eighteen);
    }

    #[test]
    fn off_slab_rate_is_rejected_not_clamped() {
        let mut d = draft();
        d.tax_rate = Some(Decimal::from(17));
        assert!(matches!(
            validate(&d),
            Err(LedgerError::InvalidTaxRate { .. })
        ));
    }

    #[test]
    fn sub_paisa_amount_is_rejected() {
        let mut d = draft();
        d.base_amount = Some(Decimal::from_str("10.005").unwrap());
        assert!(matches!(
            validate(&d),
            Err(LedgerError::AmountPrecision { .. })
        ));
    }

    #[test]
    fn amount_above_ledger_maximum_is_rejected() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000i64));
        let mut d = draft();
        d.base_amount = Some(MAX_AMOUNT);
        assert!(validate(&d).is_ok());
        d.base_amount = Some(Decimal::MAX);
        assert!(matches!(
            validate(&d),
            Err(LedgerError::AmountTooLarge { .. })
        ));
    }

    #[test]
    fn missing_fields_are_reported() {
        let mut d = draft();
        d.transaction_date = None;
        assert_eq!(validate(&d), Err(LedgerError::MissingDate));
        let mut d = draft();
        d.kind = None;
        assert_eq!(validate(&d), Err(LedgerError::MissingKind));
        let mut d = draft();
        d.base_amount = None;
        assert_eq!(validate(&d), Err(LedgerError::MissingAmount));
        let mut d = draft();
        d.vendor_name = "  ".into();
        assert_eq!(validate(&d), Err(LedgerError::EmptyVendor));
    }
}
