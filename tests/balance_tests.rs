// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finguard::models::{NewTransaction, TransactionUpdate, TxType, User};
use finguard::{balance, db, ledger, store};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn setup() -> (Connection, User, i64) {
    let mut conn = db::open_in_memory().unwrap();
    let (user, account) = ledger::create_user(&mut conn, "alice", None, None).unwrap();
    (conn, user, account.id)
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn category(conn: &Connection, user: &User, name: &str, kind: TxType) -> i64 {
    store::categories::find_visible_by_name(conn, user.id, name, Some(kind))
        .unwrap()
        .unwrap()
        .id
}

fn post(
    conn: &mut Connection,
    user: &User,
    account_id: i64,
    kind: TxType,
    cat: &str,
    amount: Decimal,
) -> i64 {
    let new = NewTransaction {
        account_id,
        category_id: category(conn, user, cat, kind),
        amount,
        kind,
        date: day("2026-02-10"),
        description: None,
    };
    ledger::create_transaction(conn, user.id, &new).unwrap().id
}

fn stored_balance(conn: &Connection, account_id: i64) -> Decimal {
    store::accounts::get(conn, account_id).unwrap().balance
}

#[test]
fn end_to_end_register_spend_earn_delete() {
    let (mut conn, user, account_id) = setup();
    let accounts = store::accounts::list_for_user(&conn, user.id).unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].balance, dec!(0.00));

    let food = post(&mut conn, &user, account_id, TxType::Expense, "Food", dec!(45.50));
    assert_eq!(stored_balance(&conn, account_id), dec!(-45.50));

    post(&mut conn, &user, account_id, TxType::Income, "Salary", dec!(5000.00));
    assert_eq!(stored_balance(&conn, account_id), dec!(4954.50));

    ledger::delete_transaction(&mut conn, user.id, food).unwrap();
    assert_eq!(stored_balance(&conn, account_id), dec!(5000.00));
}

#[test]
fn balance_matches_history_after_updates() {
    let (mut conn, user, account_id) = setup();
    let id = post(&mut conn, &user, account_id, TxType::Expense, "Food", dec!(10.10));
    post(&mut conn, &user, account_id, TxType::Expense, "Rent", dec!(0.20));
    post(&mut conn, &user, account_id, TxType::Income, "Gift", dec!(0.30));

    let update = TransactionUpdate {
        amount: Some(dec!(20.01)),
        ..Default::default()
    };
    ledger::update_transaction(&mut conn, user.id, id, &update).unwrap();

    let stored = stored_balance(&conn, account_id);
    assert_eq!(stored, dec!(-19.91));
    assert_eq!(stored, balance::compute_account_balance(&conn, account_id).unwrap());
}

#[test]
fn moving_a_transaction_recalculates_both_accounts() {
    let (mut conn, user, main_id) = setup();
    let savings = ledger::add_account(&conn, user.id, "Savings").unwrap();
    let id = post(&mut conn, &user, main_id, TxType::Income, "Salary", dec!(100.00));
    assert_eq!(stored_balance(&conn, main_id), dec!(100.00));

    let update = TransactionUpdate {
        account_id: Some(savings.id),
        ..Default::default()
    };
    ledger::update_transaction(&mut conn, user.id, id, &update).unwrap();
    assert_eq!(stored_balance(&conn, main_id), dec!(0));
    assert_eq!(stored_balance(&conn, savings.id), dec!(100.00));
    assert!(balance::find_balance_drift(&conn).unwrap().is_empty());
}

#[test]
fn recalculation_is_idempotent() {
    let (mut conn, user, account_id) = setup();
    post(&mut conn, &user, account_id, TxType::Expense, "Bills", dec!(33.33));
    let first = balance::recalculate_account_balance(&conn, account_id).unwrap();
    let second = balance::recalculate_account_balance(&conn, account_id).unwrap();
    assert_eq!(first, second);
    assert_eq!(stored_balance(&conn, account_id), dec!(-33.33));
}

#[test]
fn empty_account_recalculates_to_zero() {
    let (conn, _user, account_id) = setup();
    assert_eq!(
        balance::recalculate_account_balance(&conn, account_id).unwrap(),
        Decimal::ZERO
    );
}

#[test]
fn doctor_reports_drift_without_fixing_it() {
    let (mut conn, user, account_id) = setup();
    post(&mut conn, &user, account_id, TxType::Expense, "Food", dec!(5.00));
    conn.execute(
        "UPDATE accounts SET balance='99.00' WHERE id=?1",
        [account_id],
    )
    .unwrap();

    let drift = balance::find_balance_drift(&conn).unwrap();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].stored, dec!(99.00));
    assert_eq!(drift[0].computed, dec!(-5.00));

    let issues = finguard::commands::doctor::check(&conn).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0][0], "balance_drift");
    assert_eq!(stored_balance(&conn, account_id), dec!(99.00));
}

#[test]
fn total_balance_sums_accounts() {
    let (mut conn, user, main_id) = setup();
    let savings = ledger::add_account(&conn, user.id, "Savings").unwrap();
    post(&mut conn, &user, main_id, TxType::Income, "Salary", dec!(10.00));
    post(&mut conn, &user, savings.id, TxType::Expense, "Food", dec!(2.50));
    assert_eq!(balance::total_balance(&conn, user.id).unwrap(), dec!(7.50));
}
