// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use gstledger::db::init_schema;
use gstledger::models::TxKind;
use gstledger::{cli, commands::transactions, store::fetch_transactions};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn.execute("INSERT INTO categories(id,name) VALUES (1,'Office Supplies')", [])
        .unwrap();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(user_id,type,vendor_name,amount,gst_rate,gst_amount,total_amount,category_id,transaction_date)
             VALUES ('local','expense','Paper Mart','100.00',18,'18.00','118.00',1,?1)",
            params![format!("2025-01-0{}", i)],
        )
        .unwrap();
    }
    conn
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["gstledger", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
            assert_eq!(rows[0].gst_amount, "18.00");
            assert_eq!(rows[0].total, "118.00");
            assert_eq!(rows[0].category, "Office Supplies");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_month() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(user_id,type,vendor_name,amount,gst_rate,gst_amount,total_amount,transaction_date)
         VALUES ('local','income','Acme','5000.00',18,'900.00','5900.00','2025-02-10')",
        [],
    )
    .unwrap();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["gstledger", "tx", "list", "--month", "2025-02"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].r#type, "income");
    assert_eq!(rows[0].category, "");
}

#[test]
fn add_records_entry_with_derived_gst() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "gstledger",
        "tx",
        "add",
        "--type",
        "income",
        "--vendor",
        "  Acme Retail ",
        "--amount",
        "833.33",
        "--date",
        "2025-01-15",
        "--category",
        "Office Supplies",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }

    let txs = fetch_transactions(&conn, "local", None).unwrap();
    let added = txs.iter().find(|t| t.kind == TxKind::Income).unwrap();
    assert_eq!(added.vendor_name, "Acme Retail");
    assert_eq!(added.tax_amount, Decimal::from(150));
    assert_eq!(added.category_id, Some(1));
}

#[test]
fn add_rejects_negative_huge_amount_and_off_slab_rate() {
    let conn = setup();
    for (amount, rate) in [("-5", "18"), ("100", "17"), ("1000000000000.01", "28")] {
        let cli = cli::build_cli();
        let matches = cli.get_matches_from([
            "gstledger",
            "tx",
            "add",
            "--type",
            "expense",
            "--vendor",
            "Shop",
            "--amount",
            amount,
            "--gst-rate",
            rate,
            "--date",
            "2025-01-15",
        ]);
        let Some(("tx", tx_m)) = matches.subcommand() else {
            panic!("no tx subcommand");
        };
        assert!(transactions::handle(&conn, tx_m).is_err());
    }
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 3);
}

#[test]
fn voice_draft_can_be_saved() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "gstledger",
        "tx",
        "draft",
        "--voice",
        "Paid 1,250.50 to Sharma Traders",
        "--date",
        "2025-01-20",
        "--save",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }

    let (vendor, amount, rate, voice): (String, String, u32, bool) = conn
        .query_row(
            "SELECT vendor_name, amount, gst_rate, is_voice_entry FROM transactions ORDER BY id DESC LIMIT 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .unwrap();
    assert_eq!(vendor, "Sharma Traders");
    assert_eq!(amount.parse::<Decimal>().unwrap(), "1250.50".parse::<Decimal>().unwrap());
    assert_eq!(rate, 18);
    assert!(voice);
}
