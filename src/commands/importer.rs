// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{TransactionDraft, TxKind};
use crate::store::insert_transaction;
use crate::utils::{get_user, id_for_category, parse_date, parse_decimal};
use crate::validate::validate;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::{HashMap, hash_map::Entry};
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// Columns: date, type, vendor, amount, gst_rate, category, description.
/// The whole file is imported in one database transaction; the first bad
/// row aborts it.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let user = get_user(conn)?;
    let tx = conn.transaction()?;
    let mut category_cache: HashMap<String, i64> = HashMap::new();
    let mut count = 0usize;

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let rec = result?;
        let field = |i: usize| rec.get(i).map(str::trim).unwrap_or("");

        let date_raw = field(0);
        let date = parse_date(date_raw)
            .with_context(|| format!("Invalid transaction date '{}' on line {}", date_raw, line))?;
        let kind: TxKind = field(1)
            .parse()
            .with_context(|| format!("Line {}", line))?;
        let vendor = field(2).to_string();
        let amount_raw = field(3);
        let amount = parse_decimal(amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {} on line {}", amount_raw, vendor, line))?;
        let rate_raw = field(4);
        let tax_rate = if rate_raw.is_empty() {
            None
        } else {
            Some(parse_decimal(rate_raw.trim_end_matches('%'))?)
        };
        let category = field(5).to_string();
        let category_id = if category.is_empty() {
            None
        } else {
            let id = match category_cache.entry(category.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => *entry.insert(id_for_category(&tx, &category)?),
            };
            Some(id)
        };
        let description = Some(field(6).to_string()).filter(|s| !s.is_empty());

        let draft = TransactionDraft {
            kind: Some(kind),
            vendor_name: vendor,
            base_amount: Some(amount),
            tax_rate,
            category_id,
            category_name: (!category.is_empty()).then_some(category),
            transaction_date: Some(date),
            description,
            is_voice_entry: false,
        };
        let new_tx = validate(&draft).with_context(|| format!("Line {}", line))?;
        insert_transaction(&tx, &user, &new_tx)?;
        count += 1;
    }
    tx.commit()?;
    info!(count, path, "imported transactions");
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
