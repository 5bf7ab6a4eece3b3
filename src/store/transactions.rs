// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, ToSql, params};
use rust_decimal::Decimal;
use serde::Serialize;

use super::decimal_from_column;
use crate::error::{FinError, FinResult};
use crate::models::{NewTransaction, Transaction, TransactionFilter, TxType};

const SELECT: &str = "SELECT id, user_id, account_id, category_id, amount, type, date, description \
                      FROM transactions";

type RawTransaction = (i64, i64, i64, i64, String, TxType, NaiveDate, Option<String>);

fn raw(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
    ))
}

fn build(row: RawTransaction) -> FinResult<Transaction> {
    let (id, user_id, account_id, category_id, amount, kind, date, description) = row;
    Ok(Transaction {
        id,
        user_id,
        account_id,
        category_id,
        amount: decimal_from_column(&amount, "transactions.amount")?,
        kind,
        date,
        description,
    })
}

pub fn insert(conn: &Connection, user_id: i64, new: &NewTransaction) -> FinResult<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, account_id, category_id, amount, type, date, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            new.account_id,
            new.category_id,
            new.amount.to_string(),
            new.kind,
            new.date,
            new.description
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_for_user(conn: &Connection, user_id: i64, id: i64) -> FinResult<Transaction> {
    let row = conn
        .query_row(
            &format!("{SELECT} WHERE id=?1 AND user_id=?2"),
            params![id, user_id],
            raw,
        )
        .optional()?
        .ok_or_else(|| FinError::not_found("transaction", id))?;
    build(row)
}

/// Rewrites every mutable column of an existing row.
pub fn update(conn: &Connection, tx: &Transaction) -> FinResult<()> {
    conn.execute(
        "UPDATE transactions SET account_id=?1, category_id=?2, amount=?3, type=?4, date=?5,
         description=?6, updated_at=datetime('now') WHERE id=?7",
        params![
            tx.account_id,
            tx.category_id,
            tx.amount.to_string(),
            tx.kind,
            tx.date,
            tx.description,
            tx.id
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> FinResult<()> {
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(())
}

/// A transaction joined with the names needed to display it.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TxType,
    pub amount: Decimal,
    pub category: String,
    pub account: String,
    pub description: Option<String>,
}

pub fn list(
    conn: &Connection,
    user_id: i64,
    filter: &TransactionFilter,
) -> FinResult<Vec<TransactionView>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.type, t.amount, c.name, a.name, t.description
         FROM transactions t
         JOIN categories c ON t.category_id=c.id
         JOIN accounts a ON t.account_id=a.id
         WHERE t.user_id=?",
    );
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];

    if let Some(start) = filter.start_date {
        sql.push_str(" AND t.date>=?");
        params_vec.push(Box::new(start));
    }
    if let Some(end) = filter.end_date {
        sql.push_str(" AND t.date<=?");
        params_vec.push(Box::new(end));
    }
    if let Some(cat) = filter.category_id {
        sql.push_str(" AND t.category_id=?");
        params_vec.push(Box::new(cat));
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND t.type=?");
        params_vec.push(Box::new(kind));
    }
    sql.push_str(" ORDER BY t.date DESC, t.created_at DESC, t.id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        let limit = i64::try_from(limit)
            .map_err(|_| FinError::validation("limit", format!("{} is too large", limit)))?;
        params_vec.push(Box::new(limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let amount: String = r.get(3)?;
        data.push(TransactionView {
            id: r.get(0)?,
            date: r.get(1)?,
            kind: r.get(2)?,
            amount: decimal_from_column(&amount, "transactions.amount")?,
            category: r.get(4)?,
            account: r.get(5)?,
            description: r.get(6)?,
        });
    }
    Ok(data)
}
