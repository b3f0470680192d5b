// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed source of transactions and categories.
//!
//! Amounts are stored as decimal strings. Every fetch re-derives the GST of
//! each row and fails if the stored figure has drifted from its inputs.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::models::{Category, GstRate, NewTransaction, Transaction, TxKind};
use crate::period::DateRange;
use crate::tax;

const SELECT_TX: &str = "SELECT id, type, vendor_name, amount, gst_rate, gst_amount, category_id, \
     transaction_date, created_at, description, is_voice_entry FROM transactions";

pub fn insert_transaction(conn: &Connection, user: &str, tx: &NewTransaction) -> Result<i64> {
    let breakdown = tax::compute(tx.base_amount, tx.tax_rate)?;
    conn.execute(
        "INSERT INTO transactions(user_id, type, vendor_name, amount, gst_rate, gst_amount, \
         total_amount, category_id, description, transaction_date, is_voice_entry)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            user,
            tx.kind.as_str(),
            tx.vendor_name,
            tx.base_amount.to_string(),
            tx.tax_rate.percent(),
            breakdown.tax_amount.to_string(),
            breakdown.total_amount.to_string(),
            tx.category_id,
            tx.description,
            tx.transaction_date.to_string(),
            tx.is_voice_entry,
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(id, user, kind = %tx.kind, "recorded transaction");
    Ok(id)
}

fn parse_recorded_at(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .with_context(|| format!("Invalid created_at '{}'", s))
}

struct RawRow {
    id: i64,
    kind: String,
    vendor_name: String,
    amount: String,
    gst_rate: u32,
    gst_amount: String,
    category_id: Option<i64>,
    transaction_date: String,
    created_at: String,
    description: Option<String>,
    is_voice_entry: bool,
}

impl RawRow {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawRow {
            id: r.get(0)?,
            kind: r.get(1)?,
            vendor_name: r.get(2)?,
            amount: r.get(3)?,
            gst_rate: r.get(4)?,
            gst_amount: r.get(5)?,
            category_id: r.get(6)?,
            transaction_date: r.get(7)?,
            created_at: r.get(8)?,
            description: r.get(9)?,
            is_voice_entry: r.get(10)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction> {
        let id = self.id;
        let kind: TxKind = self
            .kind
            .parse()
            .with_context(|| format!("Transaction {}", id))?;
        let base_amount = self
            .amount
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in transaction {}", self.amount, id))?;
        let tax_amount = self.gst_amount.parse::<Decimal>().with_context(|| {
            format!("Invalid GST amount '{}' in transaction {}", self.gst_amount, id)
        })?;
        let tax_rate =
            GstRate::try_from(self.gst_rate).with_context(|| format!("Transaction {}", id))?;
        let transaction_date = NaiveDate::parse_from_str(&self.transaction_date, "%Y-%m-%d")
            .with_context(|| {
                format!(
                    "Invalid transaction date '{}' in transaction {}",
                    self.transaction_date, id
                )
            })?;
        Ok(Transaction {
            id,
            kind,
            vendor_name: self.vendor_name,
            base_amount,
            tax_rate,
            tax_amount,
            category_id: self.category_id,
            transaction_date,
            recorded_at: parse_recorded_at(&self.created_at)?,
            description: self.description,
            is_voice_entry: self.is_voice_entry,
        })
    }
}

fn load(conn: &Connection, user: &str, range: Option<DateRange>) -> Result<Vec<Transaction>> {
    let mut out = Vec::new();
    match range {
        Some(r) => {
            let sql = format!(
                "{SELECT_TX} WHERE user_id=?1 AND transaction_date>=?2 AND transaction_date<=?3 \
                 ORDER BY transaction_date, id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![user, r.from.to_string(), r.to.to_string()],
                RawRow::from_row,
            )?;
            for row in rows {
                out.push(row?.into_transaction()?);
            }
        }
        None => {
            let sql = format!("{SELECT_TX} WHERE user_id=?1 ORDER BY transaction_date, id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![user], RawRow::from_row)?;
            for row in rows {
                out.push(row?.into_transaction()?);
            }
        }
    }
    Ok(out)
}

/// All entries of `user`, optionally limited to an inclusive range of
/// business dates, in date order.
pub fn fetch_transactions(
    conn: &Connection,
    user: &str,
    range: Option<DateRange>,
) -> Result<Vec<Transaction>> {
    let txs = load(conn, user, range)?;
    for tx in &txs {
        tax::verify(tx).map_err(|e| {
            warn!(id = tx.id, "stored GST diverges from its inputs");
            anyhow!(e)
        })?;
    }
    debug!(user, count = txs.len(), "fetched transactions");
    Ok(txs)
}

/// Rows whose stored GST no longer matches `round2(amount * rate / 100)`.
pub fn tax_mismatches(conn: &Connection, user: &str) -> Result<Vec<LedgerError>> {
    Ok(load(conn, user, None)?
        .iter()
        .filter_map(|tx| tax::verify(tx).err())
        .collect())
}

pub fn fetch_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn add_category(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO categories(name) VALUES (?1)", params![name])
        .with_context(|| format!("Could not add category '{}'", name))?;
    Ok(conn.last_insert_rowid())
}

pub fn remove_category(conn: &Connection, name: &str) -> Result<usize> {
    Ok(conn.execute("DELETE FROM categories WHERE name=?1", params![name])?)
}
