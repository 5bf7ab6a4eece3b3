// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget utilization, computed on read from the transactions that fall in a
//! budget's category and period. Nothing here is cached or persisted.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::aggregate::{AmountFilter, sum_amounts};
use crate::error::FinResult;
use crate::models::{Budget, Transaction, TxType};
use crate::store;
use crate::utils::today;

const WARNING_AT: u32 = 70;
const DANGER_AT: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Good,
    Warning,
    Danger,
}

impl StatusTier {
    /// Tier for a utilization percentage: [0, 70) good, [70, 90) warning,
    /// 90 and above danger.
    pub fn from_percentage(percentage: Decimal) -> Self {
        if percentage < Decimal::from(WARNING_AT) {
            StatusTier::Good
        } else if percentage < Decimal::from(DANGER_AT) {
            StatusTier::Warning
        } else {
            StatusTier::Danger
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::Good => "good",
            StatusTier::Warning => "warning",
            StatusTier::Danger => "danger",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Display value only; `status` is derived from the exact ratio.
    pub percentage: f64,
    pub status: StatusTier,
    pub is_exceeded: bool,
}

/// Pure status computation for a budget `amount` of which `spent` is used.
pub fn status_from_spent(amount: Decimal, spent: Decimal) -> BudgetStatus {
    let ratio = if amount.is_zero() {
        Decimal::ZERO
    } else {
        spent
            .checked_div(amount)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
    };
    BudgetStatus {
        spent,
        remaining: amount - spent,
        percentage: ratio.to_f64().unwrap_or(0.0),
        status: StatusTier::from_percentage(ratio),
        is_exceeded: spent > amount,
    }
}

/// Expenses by the budget's owner in its category, both period bounds included.
pub fn spent_for_budget(conn: &Connection, budget: &Budget) -> FinResult<Decimal> {
    let filter = AmountFilter::user(budget.user_id, TxType::Expense)
        .category(budget.category_id)
        .between(budget.period_start, budget.period_end);
    sum_amounts(conn, &filter)
}

pub fn budget_status(conn: &Connection, budget: &Budget) -> FinResult<BudgetStatus> {
    let spent = spent_for_budget(conn, budget)?;
    Ok(status_from_spent(budget.amount, spent))
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetWithStatus {
    #[serde(flatten)]
    pub budget: Budget,
    pub category: String,
    #[serde(flatten)]
    pub status: BudgetStatus,
}

struct CategoryNames<'c> {
    conn: &'c Connection,
    user_id: i64,
    cache: HashMap<i64, String>,
}

impl<'c> CategoryNames<'c> {
    fn new(conn: &'c Connection, user_id: i64) -> Self {
        CategoryNames {
            conn,
            user_id,
            cache: HashMap::new(),
        }
    }

    fn get(&mut self, id: i64) -> FinResult<String> {
        if let Some(name) = self.cache.get(&id) {
            return Ok(name.clone());
        }
        let name = store::categories::get_visible(self.conn, self.user_id, id)?.name;
        self.cache.insert(id, name.clone());
        Ok(name)
    }
}

fn with_status(conn: &Connection, user_id: i64, budgets: Vec<Budget>) -> FinResult<Vec<BudgetWithStatus>> {
    let mut names = CategoryNames::new(conn, user_id);
    let mut out = Vec::with_capacity(budgets.len());
    for budget in budgets {
        let status = budget_status(conn, &budget)?;
        let category = names.get(budget.category_id)?;
        out.push(BudgetWithStatus {
            budget,
            category,
            status,
        });
    }
    Ok(out)
}

/// Every budget of the user, newest period first, with its status.
pub fn all_budgets_with_status(conn: &Connection, user_id: i64) -> FinResult<Vec<BudgetWithStatus>> {
    let budgets = store::budgets::list_for_user(conn, user_id)?;
    with_status(conn, user_id, budgets)
}

pub fn active_budgets(conn: &Connection, user_id: i64) -> FinResult<Vec<Budget>> {
    active_budgets_on(conn, user_id, today())
}

pub fn active_budgets_on(conn: &Connection, user_id: i64, day: NaiveDate) -> FinResult<Vec<Budget>> {
    store::budgets::list_active(conn, user_id, day)
}

pub fn active_budgets_with_status_on(
    conn: &Connection,
    user_id: i64,
    day: NaiveDate,
) -> FinResult<Vec<BudgetWithStatus>> {
    let budgets = active_budgets_on(conn, user_id, day)?;
    with_status(conn, user_id, budgets)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertLevel {
    Exceeded { by: Decimal },
    NearLimit { percentage: f64, remaining: Decimal },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAlert {
    pub budget_id: i64,
    pub category: String,
    pub level: AlertLevel,
    /// Raised in response to a specific transaction write.
    pub targeted: bool,
}

impl fmt::Display for BudgetAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cat = &self.category;
        match (&self.level, self.targeted) {
            (AlertLevel::Exceeded { by }, true) => write!(
                f,
                "Budget exceeded: you've exceeded your '{}' budget by {:.2}!",
                cat, by
            ),
            (AlertLevel::NearLimit { percentage, remaining }, true) => write!(
                f,
                "Budget alert: you've used {:.1}% of your '{}' budget. Only {:.2} remaining!",
                percentage, cat, remaining
            ),
            (AlertLevel::Exceeded { by }, false) => {
                write!(f, "Budget '{}' is exceeded by {:.2}", cat, by)
            }
            (AlertLevel::NearLimit { percentage, remaining }, false) => write!(
                f,
                "Budget '{}' is at {:.1}% ({:.2} remaining)",
                cat, percentage, remaining
            ),
        }
    }
}

fn alert_for(budget: &Budget, category: String, status: &BudgetStatus, targeted: bool) -> Option<BudgetAlert> {
    let level = if status.is_exceeded {
        AlertLevel::Exceeded {
            by: status.remaining.abs(),
        }
    } else if status.status == StatusTier::Danger {
        AlertLevel::NearLimit {
            percentage: status.percentage,
            remaining: status.remaining,
        }
    } else {
        return None;
    };
    Some(BudgetAlert {
        budget_id: budget.id,
        category,
        level,
        targeted,
    })
}

/// Alerts for the active budgets a just-written expense counts against.
pub fn transaction_alerts(conn: &Connection, tx: &Transaction) -> FinResult<Vec<BudgetAlert>> {
    transaction_alerts_on(conn, tx, today())
}

pub fn transaction_alerts_on(
    conn: &Connection,
    tx: &Transaction,
    day: NaiveDate,
) -> FinResult<Vec<BudgetAlert>> {
    if tx.kind != TxType::Expense {
        return Ok(Vec::new());
    }
    let mut names = CategoryNames::new(conn, tx.user_id);
    let mut alerts = Vec::new();
    for budget in active_budgets_on(conn, tx.user_id, day)? {
        if budget.category_id != tx.category_id {
            continue;
        }
        let status = budget_status(conn, &budget)?;
        if let Some(alert) = alert_for(&budget, names.get(budget.category_id)?, &status, true) {
            alerts.push(alert);
        }
    }
    Ok(alerts)
}

/// Alerts for every active budget of the user that is exceeded or at 90% or more.
pub fn budget_alerts(conn: &Connection, user_id: i64) -> FinResult<Vec<BudgetAlert>> {
    budget_alerts_on(conn, user_id, today())
}

pub fn budget_alerts_on(conn: &Connection, user_id: i64, day: NaiveDate) -> FinResult<Vec<BudgetAlert>> {
    let mut alerts = Vec::new();
    for entry in active_budgets_with_status_on(conn, user_id, day)? {
        if let Some(alert) = alert_for(&entry.budget, entry.category, &entry.status, false) {
            alerts.push(alert);
        }
    }
    Ok(alerts)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub total: usize,
    pub exceeded: usize,
    pub warning: usize,
    pub good: usize,
}

/// Counts over the active budgets. `warning` here means at 90% or more but
/// not yet exceeded.
pub fn budget_summary(conn: &Connection, user_id: i64) -> FinResult<BudgetSummary> {
    budget_summary_on(conn, user_id, today())
}

pub fn budget_summary_on(conn: &Connection, user_id: i64, day: NaiveDate) -> FinResult<BudgetSummary> {
    let mut summary = BudgetSummary::default();
    for budget in active_budgets_on(conn, user_id, day)? {
        let status = budget_status(conn, &budget)?;
        summary.total += 1;
        if status.is_exceeded {
            summary.exceeded += 1;
        } else if status.status == StatusTier::Danger {
            summary.warning += 1;
        }
    }
    summary.good = summary.total - summary.exceeded - summary.warning;
    Ok(summary)
}

/// True when another budget of the user for the same category shares at
/// least one day with [start, end]. `exclude_id` skips the budget being edited.
pub fn has_budget_overlap(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    exclude_id: Option<i64>,
) -> FinResult<bool> {
    let n = store::budgets::count_overlapping(conn, user_id, category_id, start, end, exclude_id)?;
    Ok(n > 0)
}
