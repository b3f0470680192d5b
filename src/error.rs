// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the ledger core before or while deriving figures.
///
/// Command handlers wrap these in `anyhow` with extra context; the
/// aggregation engine itself never produces one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("GST rate {rate}% is not one of 0, 5, 12, 18, 28")]
    InvalidTaxRate { rate: String },

    #[error("Amount {amount} must not be negative")]
    NegativeAmount { amount: Decimal },

    #[error("Amount {amount} exceeds the ledger maximum of {max}")]
    AmountTooLarge { amount: Decimal, max: Decimal },

    #[error("GST on {amount} at {rate}% does not fit in a decimal")]
    AmountOverflow { amount: Decimal, rate: u32 },

    #[error("Amount {amount} has more than 2 decimal places")]
    AmountPrecision { amount: Decimal },

    #[error("Vendor name must not be empty")]
    EmptyVendor,

    #[error("Transaction type is missing (expected income or expense)")]
    MissingKind,

    #[error("Invalid transaction type '{0}', expected income or expense")]
    InvalidKind(String),

    #[error("Amount is missing")]
    MissingAmount,

    #[error("Transaction date is missing")]
    MissingDate,

    #[error("Invalid period '{0}', expected YYYY-MM or YYYY")]
    InvalidPeriod(String),

    #[error(
        "Stored GST for transaction {id} is {stored}, but {base} at {rate}% gives {expected}"
    )]
    TaxMismatch {
        id: i64,
        base: Decimal,
        rate: u32,
        stored: Decimal,
        expected: Decimal,
    },
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
