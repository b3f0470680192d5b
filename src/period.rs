// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar bucketing of ledger entries by their business date.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::models::Transaction;

/// A calendar month. Orders by year, then month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(LedgerError::InvalidPeriod(format!("{:04}-{:02}", year, month)));
        }
        Ok(MonthKey { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            MonthKey {
                year: self.year - 1,
                month: 12,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        if self.month == 12 {
            return NaiveDate::from_ymd_opt(self.year, 12, 31).unwrap_or(NaiveDate::MAX);
        }
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        MonthKey::of(date) == *self
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let date = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
            .map_err(|_| LedgerError::InvalidPeriod(raw.to_string()))?;
        Ok(MonthKey::of(date))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Month,
    Year,
}

/// A month or calendar-year bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Year(i32),
    Month(MonthKey),
}

impl Period {
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Month => Period::Month(MonthKey::of(date)),
            Granularity::Year => Period::Year(date.year()),
        }
    }

    /// A calendar year whose first and last day chrono can represent.
    pub fn year(year: i32) -> Result<Self, LedgerError> {
        match (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) {
            (Some(_), Some(_)) => Ok(Period::Year(year)),
            _ => Err(LedgerError::InvalidPeriod(year.to_string())),
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Period::Month(m) => Period::Month(m.previous()),
            Period::Year(y) => Period::Year(y - 1),
        }
    }

    /// Inclusive business-date range of the period. Fails for a year outside
    /// the calendar chrono supports; such a period holds no entries.
    pub fn date_range(&self) -> Result<DateRange, LedgerError> {
        let invalid = || LedgerError::InvalidPeriod(self.to_string());
        match self {
            Period::Month(m) => Ok(DateRange {
                from: m.first_day(),
                to: m.last_day(),
            }),
            Period::Year(y) => Ok(DateRange {
                from: NaiveDate::from_ymd_opt(*y, 1, 1).ok_or_else(invalid)?,
                to: NaiveDate::from_ymd_opt(*y, 12, 31).ok_or_else(invalid)?,
            }),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month(m) => write!(f, "{}", m),
            Period::Year(y) => write!(f, "{:04}", y),
        }
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            let y = raw
                .parse::<i32>()
                .map_err(|_| LedgerError::InvalidPeriod(raw.to_string()))?;
            return Period::year(y);
        }
        raw.parse::<MonthKey>().map(Period::Month)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inclusive range of business dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

fn group_by<K: Ord>(
    txs: &[Transaction],
    key: impl Fn(&Transaction) -> K,
) -> BTreeMap<K, Vec<&Transaction>> {
    let mut buckets: BTreeMap<K, Vec<&Transaction>> = BTreeMap::new();
    for tx in txs {
        buckets.entry(key(tx)).or_default().push(tx);
    }
    buckets
}

/// Group entries by period of their `transaction_date`. Input order only
/// affects the order within a bucket, never its membership.
pub fn index(txs: &[Transaction], granularity: Granularity) -> BTreeMap<Period, Vec<&Transaction>> {
    group_by(txs, |tx| Period::of(tx.transaction_date, granularity))
}

pub fn index_by_month(txs: &[Transaction]) -> BTreeMap<MonthKey, Vec<&Transaction>> {
    group_by(txs, |tx| MonthKey::of(tx.transaction_date))
}

pub fn index_by_year(txs: &[Transaction]) -> BTreeMap<i32, Vec<&Transaction>> {
    group_by(txs, |tx| tx.transaction_date.year())
}
