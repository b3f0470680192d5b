// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Folds ledger entries into period summaries, GST breakdowns and
//! expense rollups. Everything here is a pure function of the slice it is
//! handed; nothing is cached between calls.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

use crate::models::{Category, Transaction, TxKind};
use crate::period::{self, Granularity, MonthKey, Period};
use crate::tax::round2;

/// Number of entries shown in the recent-activity list.
pub const RECENT_LIMIT: usize = 5;

/// Number of expense categories shown on the analytics view.
pub const TOP_CATEGORIES: usize = 5;

/// Longest trailing trend the analytics view builds (ten years).
pub const MAX_TREND_MONTHS: usize = 120;

pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Rollup key. Expenses without a category land under `Uncategorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryKey {
    Uncategorized,
    Category(i64),
}

impl From<Option<i64>> for CategoryKey {
    fn from(id: Option<i64>) -> Self {
        id.map(CategoryKey::Category)
            .unwrap_or(CategoryKey::Uncategorized)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKey::Uncategorized => f.write_str("uncategorized"),
            CategoryKey::Category(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PeriodSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    /// GST paid on expenses, claimable as credit.
    pub input_tax: Decimal,
    /// GST collected on income, owed to the government.
    pub output_tax: Decimal,
    pub net_tax: Decimal,
    pub savings_rate: Decimal,
    pub average_transaction: Decimal,
    pub category_rollup: BTreeMap<CategoryKey, Decimal>,
    pub transaction_count: usize,
}

/// Fold a bucket of entries into its figures.
///
/// Stored amounts are bounded by `validate::MAX_AMOUNT`, so realistic ledgers
/// never get near the `Decimal` range; sums saturate rather than panic if a
/// caller hands in unbounded figures, and ratios fall back to zero.
pub fn summarize<'a, I>(txs: I) -> PeriodSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut s = PeriodSummary::default();
    for tx in txs {
        s.transaction_count += 1;
        match tx.kind {
            TxKind::Income => {
                s.total_income = s.total_income.saturating_add(tx.base_amount);
                s.output_tax = s.output_tax.saturating_add(tx.tax_amount);
            }
            TxKind::Expense => {
                s.total_expenses = s.total_expenses.saturating_add(tx.base_amount);
                s.input_tax = s.input_tax.saturating_add(tx.tax_amount);
                let slot = s
                    .category_rollup
                    .entry(CategoryKey::from(tx.category_id))
                    .or_insert(Decimal::ZERO);
                *slot = slot.saturating_add(tx.base_amount);
            }
        }
    }
    s.net_profit = s.total_income.saturating_sub(s.total_expenses);
    s.net_tax = s.output_tax.saturating_sub(s.input_tax);
    s.savings_rate = savings_rate(s.total_income, s.net_profit);
    s.average_transaction = s
        .total_income
        .saturating_add(s.total_expenses)
        .checked_div(Decimal::from(s.transaction_count))
        .map(round2)
        .unwrap_or(Decimal::ZERO);
    s
}

/// `part / whole * 100`, rounded; zero when `whole` is zero or the
/// quotient does not fit.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .map(round2)
        .unwrap_or(Decimal::ZERO)
}

/// Net profit as a percentage of income; zero when there is no income.
pub fn savings_rate(total_income: Decimal, net_profit: Decimal) -> Decimal {
    percent_of(net_profit, total_income)
}

/// Period-over-period change in net profit, in percent; zero when the
/// previous net was zero.
pub fn growth_rate(current_net: Decimal, previous_net: Decimal) -> Decimal {
    percent_of(current_net.saturating_sub(previous_net), previous_net)
}

pub fn growth(current: &PeriodSummary, previous: &PeriodSummary) -> Decimal {
    growth_rate(current.net_profit, previous.net_profit)
}

pub fn summarize_by(txs: &[Transaction], granularity: Granularity) -> BTreeMap<Period, PeriodSummary> {
    period::index(txs, granularity)
        .into_iter()
        .map(|(p, bucket)| (p, summarize(bucket)))
        .collect()
}

pub fn monthly_summaries(txs: &[Transaction]) -> BTreeMap<MonthKey, PeriodSummary> {
    period::index_by_month(txs)
        .into_iter()
        .map(|(m, bucket)| (m, summarize(bucket)))
        .collect()
}

pub fn yearly_summaries(txs: &[Transaction]) -> BTreeMap<i32, PeriodSummary> {
    period::index_by_year(txs)
        .into_iter()
        .map(|(y, bucket)| (y, summarize(bucket)))
        .collect()
}

/// Summary of a single period. Entries outside the period are ignored, so an
/// unfiltered snapshot can be passed. A year beyond the supported calendar
/// contains no entries.
pub fn summarize_period(txs: &[Transaction], period: Period) -> PeriodSummary {
    match period.date_range() {
        Ok(range) => summarize(txs.iter().filter(|t| range.contains(t.transaction_date))),
        Err(_) => PeriodSummary::default(),
    }
}

/// Most recently recorded entries across the whole snapshot, newest first.
/// Ordered by `recorded_at`, not by business date.
pub fn recent(txs: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut all: Vec<&Transaction> = txs.iter().collect();
    all.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
    all.truncate(limit);
    all
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub key: CategoryKey,
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

/// Largest expense categories of a summary, resolved to display names.
pub fn top_categories(summary: &PeriodSummary, categories: &[Category], n: usize) -> Vec<CategoryShare> {
    let names: HashMap<i64, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let mut shares: Vec<CategoryShare> = summary
        .category_rollup
        .iter()
        .map(|(key, amount)| {
            let name = match key {
                CategoryKey::Uncategorized => UNCATEGORIZED_LABEL.to_string(),
                CategoryKey::Category(id) => names
                    .get(id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("(unknown #{})", id)),
            };
            let percentage = percent_of(*amount, summary.total_expenses);
            CategoryShare {
                key: *key,
                name,
                amount: *amount,
                percentage,
            }
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.key.cmp(&b.key)));
    shares.truncate(n);
    shares
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub month: MonthKey,
    pub summary: PeriodSummary,
    pub recent: Vec<Transaction>,
}

pub fn dashboard(txs: &[Transaction], month: MonthKey) -> Dashboard {
    Dashboard {
        month,
        summary: summarize_period(txs, Period::Month(month)),
        recent: recent(txs, RECENT_LIMIT).into_iter().cloned().collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub month: MonthKey,
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub growth: Decimal,
    pub top_categories: Vec<CategoryShare>,
    /// Trailing months ending at `month`, oldest first. Months without
    /// entries appear with an empty summary.
    pub trend: Vec<(MonthKey, PeriodSummary)>,
}

pub fn analytics(
    txs: &[Transaction],
    categories: &[Category],
    month: MonthKey,
    trend_months: usize,
) -> Analytics {
    let monthly = monthly_summaries(txs);
    debug!(%month, buckets = monthly.len(), "building analytics");
    let lookup = |m: MonthKey| monthly.get(&m).cloned().unwrap_or_default();

    let current = lookup(month);
    let previous = lookup(month.previous());
    let trend_months = trend_months.min(MAX_TREND_MONTHS);
    let mut trend = Vec::with_capacity(trend_months);
    let mut m = month;
    for _ in 0..trend_months {
        trend.push((m, lookup(m)));
        m = m.previous();
    }
    trend.reverse();

    Analytics {
        month,
        growth: growth(&current, &previous),
        top_categories: top_categories(&current, categories, TOP_CATEGORIES),
        current,
        previous,
        trend,
    }
}
