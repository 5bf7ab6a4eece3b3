// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finguard::models::{NewTransaction, TxType};
use finguard::{db, ledger, store, summary};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn monthly_totals_and_category_breakdown() {
    let mut conn = db::open_in_memory().unwrap();
    let (user, account) = ledger::create_user(&mut conn, "kim", None, None).unwrap();
    let rows = [
        ("Salary", TxType::Income, dec!(3000.00), "2026-03-01"),
        ("Food", TxType::Expense, dec!(40.25), "2026-03-02"),
        ("Food", TxType::Expense, dec!(9.75), "2026-03-31"),
        ("Rent", TxType::Expense, dec!(1200.00), "2026-03-05"),
        ("Health", TxType::Expense, dec!(15.00), "2026-04-01"),
    ];
    for (cat, kind, amount, date) in rows {
        let category = store::categories::find_visible_by_name(&conn, user.id, cat, Some(kind))
            .unwrap()
            .unwrap();
        let new = NewTransaction {
            account_id: account.id,
            category_id: category.id,
            amount,
            kind,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: None,
        };
        ledger::create_transaction(&mut conn, user.id, &new).unwrap();
    }

    let s = summary::monthly_summary(&conn, user.id, 2026, 3).unwrap();
    assert_eq!(s.total_income, dec!(3000.00));
    assert_eq!(s.total_expense, dec!(1250.00));
    assert_eq!(s.net, dec!(1750.00));

    let by_cat = summary::expenses_by_category(&conn, user.id, 2026, 3).unwrap();
    assert_eq!(
        by_cat,
        vec![("Rent".to_string(), dec!(1200.00)), ("Food".to_string(), dec!(50.00))]
    );

    let empty = summary::monthly_summary(&conn, user.id, 2025, 12).unwrap();
    assert_eq!(empty.net, Decimal::ZERO);
    assert!(summary::monthly_summary(&conn, user.id, 2026, 13).unwrap_err().is_validation());
}
