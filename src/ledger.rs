// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Write operations on users, categories, transactions and budgets.
//!
//! Every write validates before touching the store. Transaction writes
//! recalculate the affected account balances before their database
//! transaction commits, so a caller never observes a stale balance.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::balance::recalculate_account_balance;
use crate::budget::has_budget_overlap;
use crate::error::{FinError, FinResult};
use crate::models::{
    Account, Budget, BudgetUpdate, Category, DEFAULT_ACCOUNT_NAME, NewBudget, NewTransaction,
    Transaction, TransactionUpdate, TxType, User,
};
use crate::store;
use crate::utils::{month_bounds, today};

const MAX_CATEGORY_NAME: usize = 50;
const MAX_ACCOUNT_NAME: usize = 100;
/// 9,999,999,999.99: twelve digits, two of them after the point.
const MAX_AMOUNT_CENTS: i64 = 999_999_999_999;

fn rejected<T>(err: FinError) -> FinResult<T> {
    debug!(error = %err, "rejected write");
    Err(err)
}

fn required_name(field: &'static str, value: &str, max: usize) -> FinResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return rejected(FinError::validation(field, "must not be empty"));
    }
    if value.chars().count() > max {
        return rejected(FinError::validation(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(value.to_string())
}

/// Money amounts are strictly positive, with at most two decimal places and
/// at most twelve digits overall.
pub fn validate_amount(field: &'static str, amount: Decimal) -> FinResult<()> {
    if amount <= Decimal::ZERO {
        return rejected(FinError::validation(field, "must be greater than zero"));
    }
    if amount.normalize().scale() > 2 {
        return rejected(FinError::validation(
            field,
            "must have at most two decimal places",
        ));
    }
    let max = Decimal::new(MAX_AMOUNT_CENTS, 2);
    if amount > max {
        return rejected(FinError::validation(
            field,
            format!("must be at most {}", max),
        ));
    }
    Ok(())
}

/// Registers a user together with their default account.
pub fn create_user(
    conn: &mut Connection,
    username: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> FinResult<(User, Account)> {
    let username = required_name("username", username, 150)?;
    let tx = conn.transaction()?;
    if store::users::find_by_username(&tx, &username)?.is_some() {
        return rejected(FinError::validation(
            "username",
            format!("'{}' is already taken", username),
        ));
    }
    let user_id = store::users::insert(&tx, &username, email, phone)?;
    let account_id = store::accounts::insert(&tx, user_id, DEFAULT_ACCOUNT_NAME)?;
    let user = store::users::get(&tx, user_id)?;
    let account = store::accounts::get(&tx, account_id)?;
    tx.commit()?;
    info!(user_id, username = %user.username, "created user with default account");
    Ok((user, account))
}

pub fn add_account(conn: &Connection, user_id: i64, name: &str) -> FinResult<Account> {
    let name = required_name("name", name, MAX_ACCOUNT_NAME)?;
    if store::accounts::find_by_name(conn, user_id, &name)?.is_some() {
        return rejected(FinError::validation(
            "name",
            format!("account '{}' already exists", name),
        ));
    }
    let id = store::accounts::insert(conn, user_id, &name)?;
    info!(user_id, account_id = id, "added account");
    store::accounts::get(conn, id)
}

pub fn create_category(
    conn: &Connection,
    user_id: i64,
    name: &str,
    kind: TxType,
) -> FinResult<Category> {
    let name = required_name("name", name, MAX_CATEGORY_NAME)?;
    if store::categories::exists(conn, Some(user_id), &name, kind)? {
        return rejected(FinError::validation(
            "name",
            format!("{} category '{}' already exists", kind, name),
        ));
    }
    let id = store::categories::insert(conn, user_id, &name, kind)?;
    info!(user_id, category_id = id, "created category");
    store::categories::get_owned(conn, user_id, id)
}

/// Deletes one of the user's own categories. System defaults are not theirs to
/// delete, and categories cited by any transaction are kept.
pub fn delete_category(conn: &Connection, user_id: i64, id: i64) -> FinResult<()> {
    let category = store::categories::get_owned(conn, user_id, id)?;
    let references = store::categories::count_references(conn, id)?;
    if references > 0 {
        return rejected(FinError::InUse {
            entity: format!("category '{}'", category.name),
            references,
        });
    }
    store::categories::delete(conn, id)?;
    info!(user_id, category_id = id, "deleted category");
    Ok(())
}

/// Checks that the user may post `amount` of `kind` to the account and
/// category, and that the category's type matches.
fn check_posting(
    conn: &Connection,
    user_id: i64,
    account_id: i64,
    category_id: i64,
    kind: TxType,
    amount: Decimal,
) -> FinResult<()> {
    store::accounts::get_for_user(conn, user_id, account_id)?;
    let category = store::categories::get_visible(conn, user_id, category_id)?;
    validate_amount("amount", amount)?;
    if category.kind != kind {
        return rejected(FinError::validation(
            "category",
            format!(
                "category '{}' is {} but the transaction is {}",
                category.name, category.kind, kind
            ),
        ));
    }
    Ok(())
}

/// Records a transaction and recalculates its account on `conn` without
/// opening a database transaction of its own. Callers that batch several
/// postings wrap them in one; everyone else wants [`create_transaction`].
pub fn post_transaction(
    conn: &Connection,
    user_id: i64,
    new: &NewTransaction,
) -> FinResult<Transaction> {
    check_posting(
        conn,
        user_id,
        new.account_id,
        new.category_id,
        new.kind,
        new.amount,
    )?;
    let id = store::transactions::insert(conn, user_id, new)?;
    recalculate_account_balance(conn, new.account_id)?;
    info!(user_id, transaction_id = id, kind = %new.kind, amount = %new.amount, "recorded transaction");
    store::transactions::get_for_user(conn, user_id, id)
}

pub fn create_transaction(
    conn: &mut Connection,
    user_id: i64,
    new: &NewTransaction,
) -> FinResult<Transaction> {
    let tx = conn.transaction()?;
    let created = post_transaction(&tx, user_id, new)?;
    tx.commit()?;
    Ok(created)
}

/// Applies `update` to one of the user's transactions. When the transaction
/// moves to another account both accounts are recalculated.
pub fn update_transaction(
    conn: &mut Connection,
    user_id: i64,
    id: i64,
    update: &TransactionUpdate,
) -> FinResult<Transaction> {
    let tx = conn.transaction()?;
    let existing = store::transactions::get_for_user(&tx, user_id, id)?;
    let mut next = existing.clone();
    if let Some(account_id) = update.account_id {
        next.account_id = account_id;
    }
    if let Some(category_id) = update.category_id {
        next.category_id = category_id;
    }
    if let Some(amount) = update.amount {
        next.amount = amount;
    }
    if let Some(kind) = update.kind {
        next.kind = kind;
    }
    if let Some(date) = update.date {
        next.date = date;
    }
    if let Some(description) = &update.description {
        next.description = description.clone();
    }
    check_posting(
        &tx,
        user_id,
        next.account_id,
        next.category_id,
        next.kind,
        next.amount,
    )?;

    store::transactions::update(&tx, &next)?;
    recalculate_account_balance(&tx, next.account_id)?;
    if existing.account_id != next.account_id {
        recalculate_account_balance(&tx, existing.account_id)?;
    }
    let updated = store::transactions::get_for_user(&tx, user_id, id)?;
    tx.commit()?;
    info!(user_id, transaction_id = id, "updated transaction");
    Ok(updated)
}

/// Removes one of the user's transactions and returns what was removed.
pub fn delete_transaction(conn: &mut Connection, user_id: i64, id: i64) -> FinResult<Transaction> {
    let tx = conn.transaction()?;
    let existing = store::transactions::get_for_user(&tx, user_id, id)?;
    store::transactions::delete(&tx, id)?;
    recalculate_account_balance(&tx, existing.account_id)?;
    tx.commit()?;
    info!(user_id, transaction_id = id, "deleted transaction");
    Ok(existing)
}

fn check_budget(
    conn: &Connection,
    user_id: i64,
    candidate: &NewBudget,
    exclude_id: Option<i64>,
) -> FinResult<()> {
    let category = store::categories::get_visible(conn, user_id, candidate.category_id)?;
    if category.kind != TxType::Expense {
        return rejected(FinError::validation(
            "category",
            format!("budgets track expenses, '{}' is an income category", category.name),
        ));
    }
    validate_amount("amount", candidate.amount)?;
    if candidate.period_end <= candidate.period_start {
        return rejected(FinError::validation(
            "period_end",
            "end date must be after start date",
        ));
    }
    if has_budget_overlap(
        conn,
        user_id,
        candidate.category_id,
        candidate.period_start,
        candidate.period_end,
        exclude_id,
    )? {
        return rejected(FinError::validation(
            "period",
            format!(
                "a budget for '{}' already exists for an overlapping period",
                category.name
            ),
        ));
    }
    Ok(())
}

pub fn create_budget(conn: &mut Connection, user_id: i64, new: &NewBudget) -> FinResult<Budget> {
    let tx = conn.transaction()?;
    check_budget(&tx, user_id, new, None)?;
    let id = store::budgets::insert(&tx, user_id, new)?;
    let budget = store::budgets::get_for_user(&tx, user_id, id)?;
    tx.commit()?;
    info!(user_id, budget_id = id, "created budget");
    Ok(budget)
}

/// Budget covering the calendar month that contains `day`.
pub fn create_monthly_budget_on(
    conn: &mut Connection,
    user_id: i64,
    category_id: i64,
    amount: Decimal,
    day: NaiveDate,
) -> FinResult<Budget> {
    use chrono::Datelike;

    let (period_start, period_end) = month_bounds(day.year(), day.month())
        .ok_or_else(|| FinError::validation("period", format!("no calendar month for {}", day)))?;
    let new = NewBudget {
        category_id,
        amount,
        period_start,
        period_end,
    };
    create_budget(conn, user_id, &new)
}

pub fn create_monthly_budget(
    conn: &mut Connection,
    user_id: i64,
    category_id: i64,
    amount: Decimal,
) -> FinResult<Budget> {
    create_monthly_budget_on(conn, user_id, category_id, amount, today())
}

pub fn update_budget(
    conn: &mut Connection,
    user_id: i64,
    id: i64,
    update: &BudgetUpdate,
) -> FinResult<Budget> {
    let tx = conn.transaction()?;
    let mut budget = store::budgets::get_for_user(&tx, user_id, id)?;
    let candidate = NewBudget {
        category_id: update.category_id.unwrap_or(budget.category_id),
        amount: update.amount.unwrap_or(budget.amount),
        period_start: update.period_start.unwrap_or(budget.period_start),
        period_end: update.period_end.unwrap_or(budget.period_end),
    };
    check_budget(&tx, user_id, &candidate, Some(id))?;
    budget.category_id = candidate.category_id;
    budget.amount = candidate.amount;
    budget.period_start = candidate.period_start;
    budget.period_end = candidate.period_end;
    store::budgets::update(&tx, &budget)?;
    tx.commit()?;
    info!(user_id, budget_id = id, "updated budget");
    Ok(budget)
}

pub fn delete_budget(conn: &Connection, user_id: i64, id: i64) -> FinResult<()> {
    store::budgets::get_for_user(conn, user_id, id)?;
    store::budgets::delete(conn, id)?;
    info!(user_id, budget_id = id, "deleted budget");
    Ok(())
}
