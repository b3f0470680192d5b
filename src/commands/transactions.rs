// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::extract;
use crate::models::{Category, Transaction, TransactionDraft, TxKind};
use crate::period::{MonthKey, Period};
use crate::store::{fetch_categories, fetch_transactions, insert_transaction};
use crate::summary::{RECENT_LIMIT, recent};
use crate::utils::{
    get_currency_symbol, get_user, id_for_category, maybe_print_json, parse_date, parse_decimal,
    parse_month, pretty_table, today,
};
use crate::validate::validate;
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("recent", sub)) => show_recent(conn, sub)?,
        Some(("draft", sub)) => draft(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Turn the `tx add` arguments into a draft. Parsing problems are reported
/// here; business rules are left to `validate`.
pub fn draft_from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TxKind>())
        .transpose()?;
    let base_amount = Some(parse_decimal(sub.get_one::<String>("amount").unwrap())?);
    let tax_rate = sub
        .get_one::<String>("gst_rate")
        .map(|s| parse_decimal(s.trim_end_matches('%')))
        .transpose()?;
    let transaction_date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let category_id = sub
        .get_one::<String>("category")
        .map(|c| id_for_category(conn, c))
        .transpose()?;

    Ok(TransactionDraft {
        kind,
        vendor_name: sub.get_one::<String>("vendor").cloned().unwrap_or_default(),
        base_amount,
        tax_rate,
        category_id,
        category_name: sub.get_one::<String>("category").cloned(),
        transaction_date: Some(transaction_date),
        description: sub.get_one::<String>("description").cloned(),
        is_voice_entry: false,
    })
}

fn record(conn: &Connection, draft: &TransactionDraft) -> Result<i64> {
    let tx = validate(draft)?;
    let user = get_user(conn)?;
    let id = insert_transaction(conn, &user, &tx)?;
    let breakdown = crate::tax::compute(tx.base_amount, tx.tax_rate)?;
    let sym = get_currency_symbol(conn)?;
    println!(
        "Recorded {} {}{:.2} + GST {}% {}{:.2} = {}{:.2} on {} ({})",
        tx.kind,
        sym,
        tx.base_amount,
        tx.tax_rate,
        sym,
        breakdown.tax_amount,
        sym,
        breakdown.total_amount,
        tx.transaction_date,
        tx.vendor_name
    );
    Ok(id)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(conn, sub)?;
    record(conn, &draft)?;
    Ok(())
}

fn draft(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let categories = fetch_categories(conn)?;
    let mut draft = if let Some(path) = sub.get_one::<String>("bill") {
        let path = path.trim();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Read bill extraction reply {}", path))?;
        extract::bill_draft(&raw, &categories)?
    } else {
        let transcript = sub.get_one::<String>("voice").unwrap();
        let mut d = extract::voice_draft(transcript);
        if d.transaction_date.is_none() {
            d.transaction_date = Some(today());
        }
        d
    };
    if let Some(kind) = sub.get_one::<String>("type") {
        draft.kind = Some(kind.parse()?);
    }
    if let Some(date) = sub.get_one::<String>("date") {
        draft.transaction_date = Some(parse_date(date)?);
    }

    println!("{}", serde_json::to_string_pretty(&draft)?);
    if sub.get_flag("save") {
        record(conn, &draft)?;
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", rows_table(&data));
    }
    Ok(())
}

fn show_recent(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = get_user(conn)?;
    let txs = fetch_transactions(conn, &user, None)?;
    let names = category_names(&fetch_categories(conn)?);
    let data: Vec<TransactionRow> = recent(&txs, RECENT_LIMIT)
        .into_iter()
        .map(|t| TransactionRow::new(t, &names))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", rows_table(&data));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub vendor: String,
    pub amount: String,
    pub gst_rate: u32,
    pub gst_amount: String,
    pub total: String,
    pub category: String,
    pub description: String,
}

impl TransactionRow {
    pub fn new(t: &Transaction, names: &HashMap<i64, String>) -> Self {
        TransactionRow {
            id: t.id,
            date: t.transaction_date.to_string(),
            r#type: t.kind.to_string(),
            vendor: t.vendor_name.clone(),
            amount: format!("{:.2}", t.base_amount),
            gst_rate: t.tax_rate.percent(),
            gst_amount: format!("{:.2}", t.tax_amount),
            total: format!("{:.2}", t.total_amount()),
            category: t
                .category_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_default(),
            description: t.description.clone().unwrap_or_default(),
        }
    }
}

pub fn category_names(categories: &[Category]) -> HashMap<i64, String> {
    categories
        .iter()
        .map(|c| (c.id, c.name.clone()))
        .collect()
}

fn rows_table(data: &[TransactionRow]) -> comfy_table::Table {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.date.clone(),
                r.r#type.clone(),
                r.vendor.clone(),
                r.amount.clone(),
                format!("{}%", r.gst_rate),
                r.gst_amount.clone(),
                r.total.clone(),
                r.category.clone(),
                r.description.clone(),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Date",
            "Type",
            "Vendor",
            "Amount",
            "GST",
            "GST Amt",
            "Total",
            "Category",
            "Description",
        ],
        rows,
    )
}

/// Entries for `tx list`: newest business date first, then newest id.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user = get_user(conn)?;
    let month: Option<MonthKey> = sub
        .get_one::<String>("month")
        .map(|m| parse_month(m))
        .transpose()?;
    let range = month.map(|m| Period::Month(m).date_range()).transpose()?;
    let mut txs = fetch_transactions(conn, &user, range)?;

    if let Some(cat) = sub.get_one::<String>("category") {
        let cat_id = id_for_category(conn, cat)?;
        txs.retain(|t| t.category_id == Some(cat_id));
    }
    txs.sort_by(|a, b| {
        b.transaction_date
            .cmp(&a.transaction_date)
            .then(b.id.cmp(&a.id))
    });
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }

    let names = category_names(&fetch_categories(conn)?);
    Ok(txs.iter().map(|t| TransactionRow::new(t, &names)).collect())
}
