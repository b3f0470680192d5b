// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use gstledger::db::init_schema;
use gstledger::{cli, commands::exporter};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn.execute("INSERT INTO categories(id,name) VALUES (1,'Office Supplies')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id,type,vendor_name,amount,gst_rate,gst_amount,total_amount,\
         category_id,description,transaction_date,created_at) VALUES \
         ('local','expense','Paper Mart','1234.56',12,'148.15','1382.71',1,'Printer paper','2025-01-02','2025-01-02 09:30:00.000')",
        [],
    )
    .unwrap();
    conn
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "gstledger",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    export(&conn, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-01-02",
                "type": "expense",
                "vendor": "Paper Mart",
                "amount": "1234.56",
                "gst_rate": 12,
                "gst_amount": "148.15",
                "total_amount": "1382.71",
                "category": "Office Supplies",
                "description": "Printer paper",
                "recorded_at": "2025-01-02 09:30:00"
            }
        ])
    );
}

#[test]
fn export_csv_can_be_read_back_by_importer_columns() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    export(&conn, "csv", &out_path.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec![
            "date",
            "type",
            "vendor",
            "amount",
            "gst_rate",
            "category",
            "description",
            "gst_amount",
            "total_amount"
        ]
    );
    let rec = rdr.records().next().unwrap().unwrap();
    assert_eq!(&rec[4], "12");
    assert_eq!(&rec[5], "Office Supplies");
    assert_eq!(&rec[8], "1382.71");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let cli = cli::build_cli();
    let res = cli.try_get_matches_from([
        "gstledger",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        &out_str,
    ]);
    assert!(res.is_err());
    assert!(!out_path.exists());
}
