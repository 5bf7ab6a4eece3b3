// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{self, BudgetWithStatus};
use crate::models::{BudgetUpdate, NewBudget, TxType, User};
use crate::utils::{fmt_money, id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::ledger;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("monthly", sub)) => {
            let category_id = expense_category(conn, user, sub.get_one::<String>("category").unwrap())?;
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let b = ledger::create_monthly_budget(conn, user.id, category_id, amount)?;
            println!(
                "Budget {} created: {} from {} to {}",
                b.id,
                fmt_money(&b.amount),
                b.period_start,
                b.period_end
            );
        }
        Some(("edit", sub)) => edit(conn, user, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::delete_budget(conn, user.id, id)?;
            println!("Deleted budget {}", id);
        }
        Some(("list", sub)) => {
            let data = budget::all_budgets_with_status(conn, user.id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                println!("{}", status_table(&data));
            }
        }
        Some(("status", _)) => {
            let s = budget::budget_summary(conn, user.id)?;
            println!(
                "Active budgets: {} (exceeded {}, warning {}, good {})",
                s.total, s.exceeded, s.warning, s.good
            );
            let active = budget::active_budgets_with_status_on(conn, user.id, crate::utils::today())?;
            if !active.is_empty() {
                println!("{}", status_table(&active));
            }
        }
        Some(("alerts", _)) => {
            let alerts = budget::budget_alerts(conn, user.id)?;
            if alerts.is_empty() {
                println!("No budget alerts");
            }
            for alert in alerts {
                println!("{}", alert);
            }
        }
        _ => {}
    }
    Ok(())
}

fn expense_category(conn: &Connection, user: &User, name: &str) -> Result<i64> {
    id_for_category(conn, user.id, name, Some(TxType::Expense))
}

fn add(conn: &mut Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let new = NewBudget {
        category_id: expense_category(conn, user, sub.get_one::<String>("category").unwrap())?,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        period_start: parse_date(sub.get_one::<String>("start").unwrap())?,
        period_end: parse_date(sub.get_one::<String>("end").unwrap())?,
    };
    let b = ledger::create_budget(conn, user.id, &new)?;
    println!(
        "Budget {} created: {} from {} to {}",
        b.id,
        fmt_money(&b.amount),
        b.period_start,
        b.period_end
    );
    Ok(())
}

fn edit(conn: &mut Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let update = BudgetUpdate {
        category_id: sub
            .get_one::<String>("category")
            .map(|n| expense_category(conn, user, n))
            .transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        period_start: sub
            .get_one::<String>("start")
            .map(|s| parse_date(s))
            .transpose()?,
        period_end: sub
            .get_one::<String>("end")
            .map(|s| parse_date(s))
            .transpose()?,
    };
    let b = ledger::update_budget(conn, user.id, id, &update)?;
    println!(
        "Budget {} now {} from {} to {}",
        b.id,
        fmt_money(&b.amount),
        b.period_start,
        b.period_end
    );
    Ok(())
}

fn status_table(entries: &[BudgetWithStatus]) -> comfy_table::Table {
    let rows = entries
        .iter()
        .map(|e| {
            vec![
                e.budget.id.to_string(),
                e.category.clone(),
                format!("{} .. {}", e.budget.period_start, e.budget.period_end),
                fmt_money(&e.budget.amount),
                fmt_money(&e.status.spent),
                fmt_money(&e.status.remaining),
                format!("{:.1}%", e.status.percentage),
                e.status.status.to_string(),
            ]
        })
        .collect();
    pretty_table(
        &["ID", "Category", "Period", "Budget", "Spent", "Remaining", "Used", "Status"],
        rows,
    )
}
