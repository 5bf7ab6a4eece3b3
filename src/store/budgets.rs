// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

use super::decimal_from_column;
use crate::error::{FinError, FinResult};
use crate::models::{Budget, NewBudget};

// Natural ordering of budgets: newest period first.
const SELECT: &str = "SELECT id, user_id, category_id, amount, period_start, period_end FROM budgets";
const ORDER: &str = "ORDER BY period_start DESC, id";

type RawBudget = (i64, i64, i64, String, NaiveDate, NaiveDate);

fn raw(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawBudget> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn build(row: RawBudget) -> FinResult<Budget> {
    let (id, user_id, category_id, amount, period_start, period_end) = row;
    Ok(Budget {
        id,
        user_id,
        category_id,
        amount: decimal_from_column(&amount, "budgets.amount")?,
        period_start,
        period_end,
    })
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> FinResult<Vec<Budget>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, raw)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(build(row?)?);
    }
    Ok(out)
}

pub fn insert(conn: &Connection, user_id: i64, new: &NewBudget) -> FinResult<i64> {
    conn.execute(
        "INSERT INTO budgets(user_id, category_id, amount, period_start, period_end)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            new.category_id,
            new.amount.to_string(),
            new.period_start,
            new.period_end
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_for_user(conn: &Connection, user_id: i64, id: i64) -> FinResult<Budget> {
    let row = conn
        .query_row(
            &format!("{SELECT} WHERE id=?1 AND user_id=?2"),
            params![id, user_id],
            raw,
        )
        .optional()?
        .ok_or_else(|| FinError::not_found("budget", id))?;
    build(row)
}

pub fn list_for_user(conn: &Connection, user_id: i64) -> FinResult<Vec<Budget>> {
    collect(
        conn,
        &format!("{SELECT} WHERE user_id=?1 {ORDER}"),
        params![user_id],
    )
}

/// Budgets whose closed period contains `day`.
pub fn list_active(conn: &Connection, user_id: i64, day: NaiveDate) -> FinResult<Vec<Budget>> {
    collect(
        conn,
        &format!("{SELECT} WHERE user_id=?1 AND period_start<=?2 AND period_end>=?2 {ORDER}"),
        params![user_id, day],
    )
}

/// Counts other budgets of the same user and category whose closed period
/// intersects [start, end].
pub fn count_overlapping(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    exclude_id: Option<i64>,
) -> FinResult<i64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM budgets
         WHERE user_id=?1 AND category_id=?2 AND period_start<=?3 AND period_end>=?4
           AND (?5 IS NULL OR id<>?5)",
        params![user_id, category_id, end, start, exclude_id],
        |r| r.get(0),
    )?;
    Ok(n)
}

pub fn update(conn: &Connection, budget: &Budget) -> FinResult<()> {
    conn.execute(
        "UPDATE budgets SET category_id=?1, amount=?2, period_start=?3, period_end=?4,
         updated_at=datetime('now') WHERE id=?5",
        params![
            budget.category_id,
            budget.amount.to_string(),
            budget.period_start,
            budget.period_end,
            budget.id
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> FinResult<()> {
    conn.execute("DELETE FROM budgets WHERE id=?1", params![id])?;
    Ok(())
}
