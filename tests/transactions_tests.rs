// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finguard::models::{NewTransaction, TransactionFilter, TransactionUpdate, TxType, User};
use finguard::{FinError, cli, commands::transactions, db, ledger, store};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn setup() -> (Connection, User, i64) {
    let mut conn = db::open_in_memory().unwrap();
    let (user, account) = ledger::create_user(&mut conn, "bob", None, None).unwrap();
    (conn, user, account.id)
}

fn cat(conn: &Connection, user: &User, name: &str, kind: TxType) -> i64 {
    store::categories::find_visible_by_name(conn, user.id, name, Some(kind))
        .unwrap()
        .unwrap()
        .id
}

fn expense(conn: &Connection, user: &User, account_id: i64, amount: Decimal, date: &str) -> NewTransaction {
    NewTransaction {
        account_id,
        category_id: cat(conn, user, "Food", TxType::Expense),
        amount,
        kind: TxType::Expense,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        description: Some("lunch".into()),
    }
}

fn tx_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn type_must_match_category() {
    let (mut conn, user, account_id) = setup();
    let mut new = expense(&conn, &user, account_id, dec!(10.00), "2026-01-05");
    new.category_id = cat(&conn, &user, "Salary", TxType::Income);

    let err = ledger::create_transaction(&mut conn, user.id, &new).unwrap_err();
    assert!(matches!(err, FinError::Validation { field: "category", .. }));
    assert_eq!(tx_count(&conn), 0);
    assert_eq!(
        store::accounts::get(&conn, account_id).unwrap().balance,
        Decimal::ZERO
    );
}

#[test]
fn update_cannot_break_type_match() {
    let (mut conn, user, account_id) = setup();
    let new = expense(&conn, &user, account_id, dec!(10.00), "2026-01-05");
    let tx = ledger::create_transaction(&mut conn, user.id, &new).unwrap();

    let update = TransactionUpdate {
        kind: Some(TxType::Income),
        ..Default::default()
    };
    let err = ledger::update_transaction(&mut conn, user.id, tx.id, &update).unwrap_err();
    assert!(err.is_validation());
    let unchanged = store::transactions::get_for_user(&conn, user.id, tx.id).unwrap();
    assert_eq!(unchanged.kind, TxType::Expense);
}

#[test]
fn amount_must_be_positive_with_cents() {
    let (mut conn, user, account_id) = setup();
    for bad in [dec!(0), dec!(-5.00), dec!(1.005)] {
        let new = expense(&conn, &user, account_id, bad, "2026-01-05");
        let err = ledger::create_transaction(&mut conn, user.id, &new).unwrap_err();
        assert!(err.is_validation(), "{} should be rejected", bad);
    }
    assert_eq!(tx_count(&conn), 0);

    let ok = expense(&conn, &user, account_id, dec!(1.50), "2026-01-05");
    assert!(ledger::create_transaction(&mut conn, user.id, &ok).is_ok());
}

#[test]
fn other_users_data_is_not_found() {
    let (mut conn, alice, alice_account) = setup();
    let (carol, _) = ledger::create_user(&mut conn, "carol", None, None).unwrap();
    let new = expense(&conn, &alice, alice_account, dec!(3.00), "2026-01-05");
    let tx = ledger::create_transaction(&mut conn, alice.id, &new).unwrap();

    let err = ledger::delete_transaction(&mut conn, carol.id, tx.id).unwrap_err();
    assert!(err.is_not_found());

    // carol cannot post into alice's account either
    let err = ledger::create_transaction(&mut conn, carol.id, &new).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn clearing_description_on_update() {
    let (mut conn, user, account_id) = setup();
    let new = expense(&conn, &user, account_id, dec!(3.00), "2026-01-05");
    let tx = ledger::create_transaction(&mut conn, user.id, &new).unwrap();
    assert_eq!(tx.description.as_deref(), Some("lunch"));

    let update = TransactionUpdate {
        description: Some(None),
        ..Default::default()
    };
    let updated = ledger::update_transaction(&mut conn, user.id, tx.id, &update).unwrap();
    assert_eq!(updated.description, None);
    assert_eq!(updated.amount, dec!(3.00));
}

#[test]
fn list_limit_respected() {
    let (mut conn, user, account_id) = setup();
    for d in ["2026-01-01", "2026-01-02", "2026-01-03"] {
        let new = expense(&conn, &user, account_id, dec!(10.00), d);
        ledger::create_transaction(&mut conn, user.id, &new).unwrap();
    }
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["finguard", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, &user, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date.to_string(), "2026-01-03");
            assert_eq!(rows[0].category, "Food");
            assert_eq!(rows[0].account, "Main Account");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_date_range_and_type() {
    let (mut conn, user, account_id) = setup();
    for d in ["2026-01-01", "2026-01-15", "2026-02-01"] {
        let new = expense(&conn, &user, account_id, dec!(1.00), d);
        ledger::create_transaction(&mut conn, user.id, &new).unwrap();
    }
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "finguard", "tx", "list", "--from", "2026-01-01", "--to", "2026-01-31", "--type", "expense",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    let rows = transactions::query_rows(&conn, &user, list_m).unwrap();
    assert_eq!(rows.len(), 2);

    let matches = cli::build_cli().get_matches_from(["finguard", "tx", "list", "--type", "income"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    assert!(transactions::query_rows(&conn, &user, list_m).unwrap().is_empty());
}

#[test]
fn amounts_are_capped_at_twelve_digits() {
    let (mut conn, user, account_id) = setup();
    let too_big = expense(&conn, &user, account_id, dec!(10000000000.00), "2026-01-05");
    let err = ledger::create_transaction(&mut conn, user.id, &too_big).unwrap_err();
    assert!(matches!(err, FinError::Validation { field: "amount", .. }));

    let mut huge = expense(&conn, &user, account_id, dec!(50000000000000000000000000000), "2026-01-05");
    huge.kind = TxType::Income;
    huge.category_id = cat(&conn, &user, "Salary", TxType::Income);
    for _ in 0..2 {
        assert!(ledger::create_transaction(&mut conn, user.id, &huge).unwrap_err().is_validation());
    }

    let largest = expense(&conn, &user, account_id, dec!(9999999999.99), "2026-01-05");
    ledger::create_transaction(&mut conn, user.id, &largest).unwrap();
    ledger::create_transaction(&mut conn, user.id, &largest).unwrap();
    assert_eq!(
        store::accounts::get(&conn, account_id).unwrap().balance,
        dec!(-19999999999.98)
    );
}

#[test]
fn oversized_stored_totals_fail_without_panicking() {
    let (mut conn, user, account_id) = setup();
    let salary = cat(&conn, &user, "Salary", TxType::Income);
    for _ in 0..2 {
        conn.execute(
            "INSERT INTO transactions(user_id, account_id, category_id, amount, type, date)
             VALUES (?1, ?2, ?3, '50000000000000000000000000000', 'INCOME', '2026-01-01')",
            rusqlite::params![user.id, account_id, salary],
        )
        .unwrap();
    }

    let err = finguard::balance::recalculate_account_balance(&conn, account_id).unwrap_err();
    assert!(matches!(err, FinError::Overflow { .. }));

    let small = expense(&conn, &user, account_id, dec!(1.00), "2026-01-05");
    let err = ledger::create_transaction(&mut conn, user.id, &small).unwrap_err();
    assert!(matches!(err, FinError::Overflow { .. }));
    assert_eq!(tx_count(&conn), 2);
    assert!(finguard::summary::monthly_summary(&conn, user.id, 2026, 1).is_err());
}

#[test]
fn oversized_limit_is_rejected() {
    let (conn, user, _) = setup();
    let filter = TransactionFilter {
        limit: Some(usize::MAX),
        ..Default::default()
    };
    let err = store::transactions::list(&conn, user.id, &filter).unwrap_err();
    assert!(matches!(err, FinError::Validation { field: "limit", .. }));
}
