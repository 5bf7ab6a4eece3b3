// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{AmountFilter, checked_sub, sum_amounts, sum_by_category};
use crate::error::{FinError, FinResult};
use crate::models::TxType;
use crate::utils::month_bounds;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net: Decimal,
}

fn month_filter(user_id: i64, kind: TxType, year: i32, month: u32) -> FinResult<AmountFilter> {
    let (first, last) = month_bounds(year, month)
        .ok_or_else(|| FinError::validation("month", format!("invalid month {}-{:02}", year, month)))?;
    Ok(AmountFilter::user(user_id, kind).between(first, last))
}

pub fn monthly_summary(
    conn: &Connection,
    user_id: i64,
    year: i32,
    month: u32,
) -> FinResult<MonthlySummary> {
    let total_income = sum_amounts(conn, &month_filter(user_id, TxType::Income, year, month)?)?;
    let total_expense = sum_amounts(conn, &month_filter(user_id, TxType::Expense, year, month)?)?;
    let net = checked_sub(total_income, total_expense, "monthly net")?;
    Ok(MonthlySummary {
        year,
        month,
        total_income,
        total_expense,
        net,
    })
}

/// Expense totals per category for one month, largest first.
pub fn expenses_by_category(
    conn: &Connection,
    user_id: i64,
    year: i32,
    month: u32,
) -> FinResult<Vec<(String, Decimal)>> {
    sum_by_category(conn, &month_filter(user_id, TxType::Expense, year, month)?)
}
