// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

/// GST slab applied to a transaction. Serialized as the bare percentage.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(into = "u32", try_from = "u32")]
pub enum GstRate {
    Zero,
    Five,
    Twelve,
    #[default]
    Eighteen,
    TwentyEight,
}

impl GstRate {
    pub const ALL: [GstRate; 5] = [
        GstRate::Zero,
        GstRate::Five,
        GstRate::Twelve,
        GstRate::Eighteen,
        GstRate::TwentyEight,
    ];

    pub fn percent(&self) -> u32 {
        match self {
            GstRate::Zero => 0,
            GstRate::Five => 5,
            GstRate::Twelve => 12,
            GstRate::Eighteen => 18,
            GstRate::TwentyEight => 28,
        }
    }

    /// Strict lookup: anything other than an exact slab is rejected.
    pub fn from_percent(rate: Decimal) -> Result<Self, LedgerError> {
        GstRate::ALL
            .into_iter()
            .find(|r| Decimal::from(r.percent()) == rate)
            .ok_or_else(|| LedgerError::InvalidTaxRate {
                rate: rate.normalize().to_string(),
            })
    }
}

impl From<GstRate> for u32 {
    fn from(r: GstRate) -> u32 {
        r.percent()
    }
}

impl TryFrom<u32> for GstRate {
    type Error = LedgerError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        GstRate::from_percent(Decimal::from(v))
    }
}

impl FromStr for GstRate {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().trim_end_matches('%');
        let d = raw.parse::<Decimal>().map_err(|_| LedgerError::InvalidTaxRate {
            rate: s.trim().to_string(),
        })?;
        GstRate::from_percent(d)
    }
}

impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.percent())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A persisted, validated ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TxKind,
    pub vendor_name: String,
    pub base_amount: Decimal,
    pub tax_rate: GstRate,
    pub tax_amount: Decimal,
    pub category_id: Option<i64>,
    pub transaction_date: NaiveDate,
    pub recorded_at: NaiveDateTime,
    pub description: Option<String>,
    pub is_voice_entry: bool,
}

impl Transaction {
    pub fn total_amount(&self) -> Decimal {
        self.base_amount + self.tax_amount
    }
}

/// A validated entry that has not been persisted yet. Tax is derived on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub vendor_name: String,
    pub base_amount: Decimal,
    pub tax_rate: GstRate,
    pub category_id: Option<i64>,
    pub transaction_date: NaiveDate,
    pub description: Option<String>,
    pub is_voice_entry: bool,
}

/// Untrusted transaction input from the CLI, CSV rows, or extraction drafts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionDraft {
    pub kind: Option<TxKind>,
    pub vendor_name: String,
    pub base_amount: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_voice_entry: bool,
}
