// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use super::{decimal_from_column, money_to_column};
use crate::error::{FinError, FinResult};
use crate::models::Account;

const SELECT: &str = "SELECT id, user_id, name, balance FROM accounts";

type RawAccount = (i64, i64, String, String);

fn raw(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawAccount> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
}

fn build((id, user_id, name, balance): RawAccount) -> FinResult<Account> {
    Ok(Account {
        id,
        user_id,
        name,
        balance: decimal_from_column(&balance, "accounts.balance")?,
    })
}

pub fn insert(conn: &Connection, user_id: i64, name: &str) -> FinResult<i64> {
    conn.execute(
        "INSERT INTO accounts(user_id, name, balance) VALUES (?1, ?2, ?3)",
        params![user_id, name, money_to_column(Decimal::ZERO)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Unscoped lookup, used by the balance engine once ownership is settled.
pub fn get(conn: &Connection, id: i64) -> FinResult<Account> {
    let row = conn
        .query_row(&format!("{SELECT} WHERE id=?1"), params![id], raw)
        .optional()?
        .ok_or_else(|| FinError::not_found("account", id))?;
    build(row)
}

pub fn get_for_user(conn: &Connection, user_id: i64, id: i64) -> FinResult<Account> {
    let row = conn
        .query_row(
            &format!("{SELECT} WHERE id=?1 AND user_id=?2"),
            params![id, user_id],
            raw,
        )
        .optional()?
        .ok_or_else(|| FinError::not_found("account", id))?;
    build(row)
}

pub fn find_by_name(conn: &Connection, user_id: i64, name: &str) -> FinResult<Option<Account>> {
    let row = conn
        .query_row(
            &format!("{SELECT} WHERE user_id=?1 AND name=?2 ORDER BY id LIMIT 1"),
            params![user_id, name],
            raw,
        )
        .optional()?;
    row.map(build).transpose()
}

/// Accounts in creation order, so the default account comes first.
pub fn list_for_user(conn: &Connection, user_id: i64) -> FinResult<Vec<Account>> {
    let mut stmt = conn.prepare(&format!("{SELECT} WHERE user_id=?1 ORDER BY id"))?;
    let rows = stmt.query_map(params![user_id], raw)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build(row?)?);
    }
    Ok(out)
}

pub fn default_for_user(conn: &Connection, user_id: i64) -> FinResult<Account> {
    list_for_user(conn, user_id)?
        .into_iter()
        .next()
        .ok_or_else(|| FinError::not_found("account for user", user_id))
}

pub fn list_all(conn: &Connection) -> FinResult<Vec<Account>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY id"))?;
    let rows = stmt.query_map([], raw)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build(row?)?);
    }
    Ok(out)
}

pub fn set_balance(conn: &Connection, id: i64, balance: Decimal) -> FinResult<()> {
    let changed = conn.execute(
        "UPDATE accounts SET balance=?1, updated_at=datetime('now') WHERE id=?2",
        params![money_to_column(balance), id],
    )?;
    if changed == 0 {
        return Err(FinError::not_found("account", id));
    }
    Ok(())
}
