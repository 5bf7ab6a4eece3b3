// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finguard::models::{NewTransaction, TxType};
use finguard::{FinError, db, ledger, store};
use rust_decimal_macros::dec;

#[test]
fn defaults_are_seeded_once_and_shared() {
    let mut conn = db::open_in_memory().unwrap();
    assert_eq!(db::seed_default_categories(&mut conn).unwrap(), 0);

    let (a, _) = ledger::create_user(&mut conn, "a", None, None).unwrap();
    let (b, _) = ledger::create_user(&mut conn, "b", None, None).unwrap();
    let visible_a = store::categories::list_visible(&conn, a.id).unwrap();
    assert_eq!(visible_a.len(), 13);
    assert!(visible_a.iter().all(|c| c.is_default && c.user_id.is_none()));

    ledger::create_category(&conn, a.id, "Pets", TxType::Expense).unwrap();
    assert_eq!(store::categories::list_visible(&conn, a.id).unwrap().len(), 14);
    assert_eq!(store::categories::list_visible(&conn, b.id).unwrap().len(), 13);
}

#[test]
fn other_resolves_by_type() {
    let mut conn = db::open_in_memory().unwrap();
    let (u, _) = ledger::create_user(&mut conn, "a", None, None).unwrap();
    let income = store::categories::find_visible_by_name(&conn, u.id, "Other", Some(TxType::Income))
        .unwrap()
        .unwrap();
    let expense = store::categories::find_visible_by_name(&conn, u.id, "Other", Some(TxType::Expense))
        .unwrap()
        .unwrap();
    assert_eq!(income.kind, TxType::Income);
    assert_eq!(expense.kind, TxType::Expense);
    assert_ne!(income.id, expense.id);
}

#[test]
fn duplicate_custom_category_rejected() {
    let mut conn = db::open_in_memory().unwrap();
    let (u, _) = ledger::create_user(&mut conn, "a", None, None).unwrap();
    ledger::create_category(&conn, u.id, "Pets", TxType::Expense).unwrap();
    let err = ledger::create_category(&conn, u.id, " Pets ", TxType::Expense).unwrap_err();
    assert!(matches!(err, FinError::Validation { field: "name", .. }));
    // same name under the other type is a different category
    assert!(ledger::create_category(&conn, u.id, "Pets", TxType::Income).is_ok());
    assert!(ledger::create_category(&conn, u.id, "   ", TxType::Income).unwrap_err().is_validation());
}

#[test]
fn referenced_category_cannot_be_deleted() {
    let mut conn = db::open_in_memory().unwrap();
    let (u, account) = ledger::create_user(&mut conn, "a", None, None).unwrap();
    let pets = ledger::create_category(&conn, u.id, "Pets", TxType::Expense).unwrap();
    let new = NewTransaction {
        account_id: account.id,
        category_id: pets.id,
        amount: dec!(12.00),
        kind: TxType::Expense,
        date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        description: None,
    };
    let tx = ledger::create_transaction(&mut conn, u.id, &new).unwrap();

    let err = ledger::delete_category(&conn, u.id, pets.id).unwrap_err();
    assert!(matches!(err, FinError::InUse { references: 1, .. }));

    ledger::delete_transaction(&mut conn, u.id, tx.id).unwrap();
    ledger::delete_category(&conn, u.id, pets.id).unwrap();
    assert!(store::categories::get_owned(&conn, u.id, pets.id).unwrap_err().is_not_found());
}

#[test]
fn defaults_and_foreign_categories_are_not_deletable() {
    let mut conn = db::open_in_memory().unwrap();
    let (a, _) = ledger::create_user(&mut conn, "a", None, None).unwrap();
    let (b, _) = ledger::create_user(&mut conn, "b", None, None).unwrap();
    let food = store::categories::find_visible_by_name(&conn, a.id, "Food", None)
        .unwrap()
        .unwrap();
    assert!(ledger::delete_category(&conn, a.id, food.id).unwrap_err().is_not_found());

    let mine = ledger::create_category(&conn, a.id, "Pets", TxType::Expense).unwrap();
    assert!(ledger::delete_category(&conn, b.id, mine.id).unwrap_err().is_not_found());
}
