// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{FinError, FinResult};
use crate::models::User;

const COLUMNS: &str = "id, username, email, phone";

fn from_row(r: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: r.get(0)?,
        username: r.get(1)?,
        email: r.get(2)?,
        phone: r.get(3)?,
    })
}

pub fn insert(
    conn: &Connection,
    username: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> FinResult<i64> {
    conn.execute(
        "INSERT INTO users(username, email, phone) VALUES (?1, ?2, ?3)",
        params![username, email, phone],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64) -> FinResult<User> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM users WHERE id=?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| FinError::not_found("user", id))
}

pub fn find_by_username(conn: &Connection, username: &str) -> FinResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE username=?1"),
            params![username],
            from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn list(conn: &Connection) -> FinResult<Vec<User>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM users ORDER BY username"))?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
