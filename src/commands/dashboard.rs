// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reports::summary_rows;
use crate::commands::transactions::category_names;
use crate::period::MonthKey;
use crate::store::{fetch_categories, fetch_transactions};
use crate::summary::{self, Dashboard};
use crate::utils::{fmt_money, get_currency_symbol, get_user, maybe_print_json, pretty_table, today};
use anyhow::Result;
use rusqlite::Connection;

/// Current-month figures plus the latest recorded entries.
///
/// The recent list spans every month, so the whole ledger is fetched once
/// and both views are derived from the same snapshot.
pub fn build(conn: &Connection, month: MonthKey) -> Result<Dashboard> {
    let user = get_user(conn)?;
    let txs = fetch_transactions(conn, &user, None)?;
    Ok(summary::dashboard(&txs, month))
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let dash = build(conn, MonthKey::of(today()))?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &dash)? {
        return Ok(());
    }
    let sym = get_currency_symbol(conn)?;
    println!("Dashboard for {}", dash.month);
    println!(
        "{}",
        pretty_table(&["Metric", "Value"], summary_rows(&dash.summary, &sym))
    );

    let names = category_names(&fetch_categories(conn)?);
    let rows = dash
        .recent
        .iter()
        .map(|t| {
            vec![
                t.transaction_date.to_string(),
                t.vendor_name.clone(),
                t.kind.to_string(),
                fmt_money(&t.base_amount, &sym),
                format!("{}% GST", t.tax_rate),
                t.category_id
                    .and_then(|id| names.get(&id).cloned())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    println!("Recent transactions");
    println!(
        "{}",
        pretty_table(&["Date", "Vendor", "Type", "Amount", "GST", "Category"], rows)
    );
    Ok(())
}
