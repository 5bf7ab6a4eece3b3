// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{FinError, FinResult};
use crate::models::{Category, TxType};

const SELECT: &str = "SELECT id, name, type, user_id, is_default FROM categories";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        kind: r.get(2)?,
        user_id: r.get(3)?,
        is_default: r.get(4)?,
    })
}

pub fn insert(conn: &Connection, user_id: i64, name: &str, kind: TxType) -> FinResult<i64> {
    conn.execute(
        "INSERT INTO categories(name, type, user_id, is_default) VALUES (?1, ?2, ?3, 0)",
        params![name, kind, user_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn exists(conn: &Connection, user_id: Option<i64>, name: &str, kind: TxType) -> FinResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM categories WHERE name=?1 AND type=?2 AND IFNULL(user_id, 0)=IFNULL(?3, 0)",
            params![name, kind, user_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// A category the user may post against: a system default or one they own.
pub fn get_visible(conn: &Connection, user_id: i64, id: i64) -> FinResult<Category> {
    conn.query_row(
        &format!("{SELECT} WHERE id=?1 AND (is_default=1 OR user_id=?2)"),
        params![id, user_id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| FinError::not_found("category", id))
}

pub fn get_owned(conn: &Connection, user_id: i64, id: i64) -> FinResult<Category> {
    conn.query_row(
        &format!("{SELECT} WHERE id=?1 AND user_id=?2"),
        params![id, user_id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| FinError::not_found("category", id))
}

/// Name lookup among visible categories; the user's own category wins over a
/// default with the same name.
pub fn find_visible_by_name(
    conn: &Connection,
    user_id: i64,
    name: &str,
    kind: Option<TxType>,
) -> FinResult<Option<Category>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE name=?1 AND (is_default=1 OR user_id=?2) \
         AND (?3 IS NULL OR type=?3) ORDER BY is_default, type LIMIT 1"
    ))?;
    let cat = stmt
        .query_row(params![name, user_id, kind], from_row)
        .optional()?;
    Ok(cat)
}

pub fn list_visible(conn: &Connection, user_id: i64) -> FinResult<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE is_default=1 OR user_id=?1 ORDER BY type, name, is_default DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn count_references(conn: &Connection, id: i64) -> FinResult<i64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    Ok(n)
}

pub fn delete(conn: &Connection, id: i64) -> FinResult<()> {
    conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    Ok(())
}
