// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Summation over filtered sets of transactions.
//!
//! Amounts live in the database as decimal text, so totals are accumulated in
//! Rust with `Decimal` rather than with SQLite's floating-point `SUM`.

use chrono::NaiveDate;
use rusqlite::{Connection, ToSql};
use rust_decimal::Decimal;

use crate::error::{FinError, FinResult};
use crate::models::TxType;
use crate::store::decimal_from_column;

/// Equality and closed date-range predicates over `transactions`. Unset fields
/// do not filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountFilter {
    pub user_id: Option<i64>,
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub kind: Option<TxType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AmountFilter {
    pub fn account(account_id: i64, kind: TxType) -> Self {
        AmountFilter {
            account_id: Some(account_id),
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn user(user_id: i64, kind: TxType) -> Self {
        AmountFilter {
            user_id: Some(user_id),
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut sql = String::from(" WHERE 1=1");
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(v) = self.user_id {
            sql.push_str(" AND user_id=?");
            params.push(Box::new(v));
        }
        if let Some(v) = self.account_id {
            sql.push_str(" AND account_id=?");
            params.push(Box::new(v));
        }
        if let Some(v) = self.category_id {
            sql.push_str(" AND category_id=?");
            params.push(Box::new(v));
        }
        if let Some(v) = self.kind {
            sql.push_str(" AND type=?");
            params.push(Box::new(v));
        }
        if let Some(v) = self.from {
            sql.push_str(" AND date>=?");
            params.push(Box::new(v));
        }
        if let Some(v) = self.to {
            sql.push_str(" AND date<=?");
            params.push(Box::new(v));
        }
        (sql, params)
    }
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, what: &'static str) -> FinResult<Decimal> {
    a.checked_add(b).ok_or(FinError::Overflow { what })
}

pub(crate) fn checked_sub(a: Decimal, b: Decimal, what: &'static str) -> FinResult<Decimal> {
    a.checked_sub(b).ok_or(FinError::Overflow { what })
}

/// Exact sum of `amount` over the matching transactions; zero when none match.
pub fn sum_amounts(conn: &Connection, filter: &AmountFilter) -> FinResult<Decimal> {
    let (clause, params) = filter.where_clause();
    let mut stmt = conn.prepare_cached(&format!("SELECT amount FROM transactions{clause}"))?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let amount: String = r.get(0)?;
        let amount = decimal_from_column(&amount, "transactions.amount")?;
        total = checked_add(total, amount, "transaction total")?;
    }
    Ok(total)
}

/// Totals per category name over the matching transactions, largest first.
pub fn sum_by_category(conn: &Connection, filter: &AmountFilter) -> FinResult<Vec<(String, Decimal)>> {
    let (clause, params) = filter.where_clause();
    let mut stmt = conn.prepare(&format!(
        "SELECT c.name, t.amount FROM (SELECT category_id, amount FROM transactions{clause}) t
         JOIN categories c ON t.category_id=c.id"
    ))?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    while let Some(r) = rows.next()? {
        let name: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let amount = decimal_from_column(&amount, "transactions.amount")?;
        match totals.iter_mut().find(|(n, _)| *n == name) {
            Some((_, t)) => *t = checked_add(*t, amount, "category total")?,
            None => totals.push((name, amount)),
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(totals)
}
