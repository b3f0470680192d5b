// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::period::{DateRange, MonthKey, Period};
use crate::store::{fetch_categories, fetch_transactions};
use crate::summary::{self, CategoryShare, PeriodSummary};
use crate::utils::{
    fmt_money, get_currency_symbol, get_user, maybe_print_json, month_or_current, pretty_table,
    today,
};
use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, sub)?,
        Some(("year", sub)) => year(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("growth", sub)) => growth(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PeriodReport {
    pub period: Period,
    #[serde(flatten)]
    pub summary: PeriodSummary,
    pub categories: Vec<CategoryShare>,
}

/// Fetch the entries of one period and fold them.
pub fn period_report(conn: &Connection, period: Period) -> Result<PeriodReport> {
    let user = get_user(conn)?;
    let txs = fetch_transactions(conn, &user, Some(period.date_range()?))?;
    let cats = fetch_categories(conn)?;
    let summary = summary::summarize(&txs);
    let categories = summary::top_categories(&summary, &cats, usize::MAX);
    Ok(PeriodReport {
        period,
        summary,
        categories,
    })
}

pub fn summary_rows(s: &PeriodSummary, sym: &str) -> Vec<Vec<String>> {
    vec![
        vec!["Income".into(), fmt_money(&s.total_income, sym)],
        vec!["Expenses".into(), fmt_money(&s.total_expenses, sym)],
        vec!["Net profit".into(), fmt_money(&s.net_profit, sym)],
        vec!["Input GST (claimable)".into(), fmt_money(&s.input_tax, sym)],
        vec!["Output GST (payable)".into(), fmt_money(&s.output_tax, sym)],
        vec!["Net GST".into(), fmt_money(&s.net_tax, sym)],
        vec!["Savings rate".into(), format!("{:.2}%", s.savings_rate)],
        vec![
            "Avg. transaction".into(),
            fmt_money(&s.average_transaction, sym),
        ],
        vec!["Transactions".into(), s.transaction_count.to_string()],
    ]
}

fn category_table(shares: &[CategoryShare], sym: &str) -> comfy_table::Table {
    let rows = shares
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                fmt_money(&c.amount, sym),
                format!("{:.2}%", c.percentage),
            ]
        })
        .collect();
    pretty_table(&["Category", "Spent", "Share"], rows)
}

fn print_period(conn: &Connection, sub: &clap::ArgMatches, period: Period) -> Result<()> {
    let report = period_report(conn, period)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let sym = get_currency_symbol(conn)?;
        println!("Summary for {}", report.period);
        println!(
            "{}",
            pretty_table(&["Metric", "Value"], summary_rows(&report.summary, &sym))
        );
        if !report.categories.is_empty() {
            println!("{}", category_table(&report.categories, &sym));
        }
    }
    Ok(())
}

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let m = month_or_current(sub.get_one::<String>("month"))?;
    print_period(conn, sub, Period::Month(m))
}

fn year(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let y = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| today().year());
    print_period(conn, sub, Period::year(y)?)
}

#[derive(Debug, Serialize)]
pub struct TrendRow {
    pub month: MonthKey,
    #[serde(flatten)]
    pub summary: PeriodSummary,
}

/// Trailing `months` months ending with the current one, oldest first.
/// At most `MAX_TREND_MONTHS` months are returned.
pub fn trend_rows(
    conn: &Connection,
    end: MonthKey,
    months: usize,
) -> Result<Vec<TrendRow>> {
    let months = months.clamp(1, summary::MAX_TREND_MONTHS);
    let user = get_user(conn)?;
    let mut start = end;
    for _ in 1..months {
        start = start.previous();
    }
    let range = DateRange {
        from: start.first_day(),
        to: end.last_day(),
    };
    let txs = fetch_transactions(conn, &user, Some(range))?;
    let analytics = summary::analytics(&txs, &[], end, months);
    Ok(analytics
        .trend
        .into_iter()
        .map(|(month, summary)| TrendRow { month, summary })
        .collect())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let months = sub.get_one::<u64>("months").copied().unwrap_or(12) as usize;
    let data = trend_rows(conn, MonthKey::of(today()), months)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.month.to_string(),
                    format!("{:.2}", r.summary.total_income),
                    format!("{:.2}", r.summary.total_expenses),
                    format!("{:.2}", r.summary.net_profit),
                    format!("{:.2}", r.summary.input_tax),
                    format!("{:.2}", r.summary.output_tax),
                    r.summary.transaction_count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Month",
                    "Income",
                    "Expenses",
                    "Net",
                    "Input GST",
                    "Output GST",
                    "Count"
                ],
                rows
            )
        );
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let m = month_or_current(sub.get_one::<String>("month"))?;
    let top: usize = *sub.get_one::<usize>("top").unwrap_or(&summary::TOP_CATEGORIES);
    let mut report = period_report(conn, Period::Month(m))?;
    report.categories.truncate(top);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report.categories)? {
        let sym = get_currency_symbol(conn)?;
        println!("Top expense categories for {}", m);
        println!("{}", category_table(&report.categories, &sym));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct GrowthReport {
    pub month: MonthKey,
    pub current_net: Decimal,
    pub previous_net: Decimal,
    pub growth: Decimal,
    pub average_transaction: Decimal,
    pub top_categories: Vec<CategoryShare>,
}

/// This month against last month, as on the analytics screen.
pub fn growth_report(conn: &Connection, month: MonthKey, categories: &[Category]) -> Result<GrowthReport> {
    let user = get_user(conn)?;
    let range = DateRange {
        from: month.previous().first_day(),
        to: month.last_day(),
    };
    let txs = fetch_transactions(conn, &user, Some(range))?;
    let a = summary::analytics(&txs, categories, month, 2);
    Ok(GrowthReport {
        month,
        current_net: a.current.net_profit,
        previous_net: a.previous.net_profit,
        growth: a.growth,
        average_transaction: a.current.average_transaction,
        top_categories: a.top_categories,
    })
}

fn signed_percent(d: Decimal) -> String {
    let sign = if d.is_sign_negative() { "" } else { "+" };
    format!("{}{:.2}%", sign, d)
}

fn growth(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let m = month_or_current(sub.get_one::<String>("month"))?;
    let cats = fetch_categories(conn)?;
    let report = growth_report(conn, m, &cats)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let sym = get_currency_symbol(conn)?;
        let rows = vec![
            vec![
                format!("This month ({})", report.month),
                fmt_money(&report.current_net, &sym),
            ],
            vec![
                format!("Last month ({})", report.month.previous()),
                fmt_money(&report.previous_net, &sym),
            ],
            vec!["Growth".into(), signed_percent(report.growth)],
            vec![
                "Avg. transaction".into(),
                fmt_money(&report.average_transaction, &sym),
            ],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
        if !report.top_categories.is_empty() {
            println!("{}", category_table(&report.top_categories, &sym));
        }
    }
    Ok(())
}
