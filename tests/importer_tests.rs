// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finguard::models::User;
use finguard::{cli, commands::importer, db, ledger, store};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

fn setup() -> (Connection, User) {
    let mut conn = db::open_in_memory().unwrap();
    let (user, _) = ledger::create_user(&mut conn, "hana", None, None).unwrap();
    ledger::add_account(&conn, user.id, "Wallet").unwrap();
    (conn, user)
}

fn csv_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,type,amount,category,account,description\n{}", body).unwrap();
    file.flush().unwrap();
    file
}

fn tx_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn importer_trims_cli_path_argument() {
    let (mut conn, user) = setup();
    let file = csv_file("2026-02-03,expense,5.00,Food,,");
    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    let matches = cli::build_cli().get_matches_from(["finguard", "import", "transactions", "--path", &padded]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(&mut conn, &user, import_m).unwrap();
    } else {
        panic!("no import subcommand");
    }
    assert_eq!(tx_count(&conn), 1);
}

#[test]
fn importer_posts_rows_and_recalculates_each_account() {
    let (mut conn, user) = setup();
    let file = csv_file(
        "2026-02-01,INCOME,1000.00,Salary,,February pay\n\
         2026-02-02, expense ,45.50, Food ,Wallet, groceries \n\
         2026-02-03,income,10.00,Other,Wallet,",
    );
    let n = importer::import_transactions(&mut conn, &user, file.path().to_str().unwrap()).unwrap();
    assert_eq!(n, 3);

    let main = store::accounts::default_for_user(&conn, user.id).unwrap();
    let wallet = store::accounts::find_by_name(&conn, user.id, "Wallet").unwrap().unwrap();
    assert_eq!(main.balance, dec!(1000.00));
    assert_eq!(wallet.balance, dec!(-35.50));

    let (desc, cat_type): (Option<String>, String) = conn
        .query_row(
            "SELECT t.description, c.type FROM transactions t JOIN categories c ON t.category_id=c.id
             WHERE t.date='2026-02-03'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(desc, None);
    assert_eq!(cat_type, "INCOME");
}

#[test]
fn importer_is_all_or_nothing() {
    let (mut conn, user) = setup();
    let file = csv_file(
        "2026-02-01,expense,5.00,Food,,\n\
         2026-02-02,expense,5.00,Salary,,",
    );
    let err = importer::import_transactions(&mut conn, &user, file.path().to_str().unwrap())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Line 3"));
    assert_eq!(tx_count(&conn), 0);
    let main = store::accounts::default_for_user(&conn, user.id).unwrap();
    assert_eq!(main.balance, dec!(0));
}

#[test]
fn importer_reports_bad_dates() {
    let (mut conn, user) = setup();
    let file = csv_file("02/03/2026,expense,5.00,Food,,");
    let err = importer::import_transactions(&mut conn, &user, file.path().to_str().unwrap())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid transaction date '02/03/2026' on line 2"));
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn importer_names_the_line_of_short_and_malformed_records() {
    let (mut conn, user) = setup();
    let file = csv_file("2026-02-01,expense,5.00,Food,,\n2026-02-02,expense,5.00");
    let err = importer::import_transactions(&mut conn, &user, file.path().to_str().unwrap())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Line 3"), "{:#}", err);
    assert_eq!(tx_count(&conn), 0);
}

#[test]
fn importer_rejects_unknown_account_and_bad_amount() {
    let (mut conn, user) = setup();
    let file = csv_file("2026-02-01,expense,5.00,Food,Nowhere,");
    assert!(importer::import_transactions(&mut conn, &user, file.path().to_str().unwrap()).is_err());

    let file = csv_file("2026-02-01,expense,-5.00,Food,,");
    assert!(importer::import_transactions(&mut conn, &user, file.path().to_str().unwrap()).is_err());
    assert_eq!(tx_count(&conn), 0);
}
