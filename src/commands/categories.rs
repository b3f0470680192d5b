// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{add_category, fetch_categories, remove_category};
use crate::utils::pretty_table;
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if name.is_empty() {
                bail!("Category name must not be empty");
            }
            add_category(conn, name)?;
            println!("Added category '{}'", name);
        }
        Some(("list", _)) => {
            let data = fetch_categories(conn)?
                .into_iter()
                .map(|c| vec![c.id.to_string(), c.name])
                .collect();
            println!("{}", pretty_table(&["ID", "Category"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if remove_category(conn, name)? == 0 {
                bail!("Category '{}' not found", name);
            }
            println!("Removed category '{}'; its transactions are now uncategorized", name);
        }
        _ => {}
    }
    Ok(())
}
