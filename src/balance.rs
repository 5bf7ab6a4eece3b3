// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account balances are a cache of the transaction history. They are only
//! ever written here, and always recomputed from scratch.

use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::debug;

use crate::aggregate::{AmountFilter, checked_add, checked_sub, sum_amounts};
use crate::error::FinResult;
use crate::models::TxType;
use crate::store;

/// Income minus expenses over every transaction posted to the account.
pub fn compute_account_balance(conn: &Connection, account_id: i64) -> FinResult<Decimal> {
    let income = sum_amounts(conn, &AmountFilter::account(account_id, TxType::Income))?;
    let expense = sum_amounts(conn, &AmountFilter::account(account_id, TxType::Expense))?;
    checked_sub(income, expense, "account balance")
}

/// Recomputes the account's balance and stores it.
///
/// Callers run this in the same database transaction as the write that made
/// it necessary.
pub fn recalculate_account_balance(conn: &Connection, account_id: i64) -> FinResult<Decimal> {
    let balance = compute_account_balance(conn, account_id)?;
    store::accounts::set_balance(conn, account_id, balance)?;
    debug!(account_id, %balance, "recalculated account balance");
    Ok(balance)
}

/// Sum of the cached balances of all the user's accounts.
pub fn total_balance(conn: &Connection, user_id: i64) -> FinResult<Decimal> {
    store::accounts::list_for_user(conn, user_id)?
        .iter()
        .try_fold(Decimal::ZERO, |acc, a| checked_add(acc, a.balance, "total balance"))
}

/// An account whose stored balance disagrees with its transactions.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BalanceDrift {
    pub account_id: i64,
    pub account: String,
    pub stored: Decimal,
    pub computed: Decimal,
}

/// Compares every stored balance with a fresh computation without writing.
pub fn find_balance_drift(conn: &Connection) -> FinResult<Vec<BalanceDrift>> {
    let mut out = Vec::new();
    for account in store::accounts::list_all(conn)? {
        let computed = compute_account_balance(conn, account.id)?;
        if computed != account.balance {
            out.push(BalanceDrift {
                account_id: account.id,
                account: account.name,
                stored: account.balance,
                computed,
            });
        }
    }
    Ok(out)
}
