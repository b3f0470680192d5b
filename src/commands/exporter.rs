// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::category_names;
use crate::store::{fetch_categories, fetch_transactions};
use crate::utils::get_user;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// Writes the same columns the importer reads, plus the derived GST figures.
fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let user = get_user(conn)?;
    let txs = fetch_transactions(conn, &user, None)?;
    let names = category_names(&fetch_categories(conn)?);
    let cat_name = |id: Option<i64>| id.and_then(|i| names.get(&i).cloned());

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "type",
                "vendor",
                "amount",
                "gst_rate",
                "category",
                "description",
                "gst_amount",
                "total_amount",
            ])?;
            for t in &txs {
                wtr.write_record([
                    t.transaction_date.to_string(),
                    t.kind.to_string(),
                    t.vendor_name.clone(),
                    format!("{:.2}", t.base_amount),
                    t.tax_rate.to_string(),
                    cat_name(t.category_id).unwrap_or_default(),
                    t.description.clone().unwrap_or_default(),
                    format!("{:.2}", t.tax_amount),
                    format!("{:.2}", t.total_amount()),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "date": t.transaction_date.to_string(),
                        "type": t.kind,
                        "vendor": t.vendor_name,
                        "amount": format!("{:.2}", t.base_amount),
                        "gst_rate": t.tax_rate,
                        "gst_amount": format!("{:.2}", t.tax_amount),
                        "total_amount": format!("{:.2}", t.total_amount()),
                        "category": cat_name(t.category_id),
                        "description": t.description,
                        "recorded_at": t.recorded_at.to_string(),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
