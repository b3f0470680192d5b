// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::db_path;
use crate::utils::{
    get_currency_symbol, get_user, pretty_table, set_currency_symbol, set_user,
};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-user", sub)) => {
            let user = sub.get_one::<String>("user").unwrap().trim();
            if user.is_empty() {
                bail!("User must not be empty");
            }
            set_user(conn, user)?;
            println!("Ledger user set to {}", user);
        }
        Some(("set-currency", sub)) => {
            let symbol = sub.get_one::<String>("symbol").unwrap().trim();
            set_currency_symbol(conn, symbol)?;
            println!("Currency symbol set to {}", symbol);
        }
        _ => {
            let rows = vec![
                vec!["database".into(), db_path()?.display().to_string()],
                vec!["user".into(), get_user(conn)?],
                vec!["currency_symbol".into(), get_currency_symbol(conn)?],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
    }
    Ok(())
}
