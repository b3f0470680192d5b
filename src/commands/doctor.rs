// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::tax_mismatches;
use crate::utils::{get_user, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Problems found in the stored ledger, as (issue, detail) pairs.
pub fn diagnose(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let user = get_user(conn)?;

    // 1) Stored GST that no longer matches amount and rate
    match tax_mismatches(conn, &user) {
        Ok(errs) => {
            for err in errs {
                rows.push(vec!["gst_mismatch".into(), err.to_string()]);
            }
        }
        Err(e) => rows.push(vec!["unreadable_row".into(), format!("{:#}", e)]),
    }

    // 2) Totals that are not amount + GST
    let mut stmt = conn.prepare(
        "SELECT id, amount, gst_amount, total_amount FROM transactions WHERE user_id=?1 ORDER BY id",
    )?;
    let mut cur = stmt.query([&user])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amount: String = r.get(1)?;
        let gst: String = r.get(2)?;
        let total: String = r.get(3)?;
        let (Ok(a), Ok(g), Ok(t)) = (
            amount.parse::<Decimal>(),
            gst.parse::<Decimal>(),
            total.parse::<Decimal>(),
        ) else {
            rows.push(vec![
                "bad_amount".into(),
                format!("transaction {}: '{}' / '{}' / '{}'", id, amount, gst, total),
            ]);
            continue;
        };
        if a + g != t {
            rows.push(vec![
                "total_mismatch".into(),
                format!("transaction {}: {} + {} != {}", id, a, g, t),
            ]);
        }
    }

    // 3) Category references that point nowhere
    let mut stmt2 = conn.prepare(
        "SELECT t.id, t.category_id FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1 AND t.category_id IS NOT NULL AND c.id IS NULL",
    )?;
    let mut cur2 = stmt2.query([&user])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let cat: i64 = r.get(1)?;
        rows.push(vec![
            "dangling_category".into(),
            format!("transaction {} -> category {}", id, cat),
        ]);
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = diagnose(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
