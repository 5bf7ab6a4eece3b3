// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balance::find_balance_drift;
use crate::utils::{fmt_money, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

/// Read-only consistency checks; returns `[issue, detail]` rows.
pub fn check(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for d in find_balance_drift(conn)? {
        rows.push(vec![
            "balance_drift".into(),
            format!(
                "account {} '{}': stored {} but transactions give {}",
                d.account_id,
                d.account,
                fmt_money(&d.stored),
                fmt_money(&d.computed)
            ),
        ]);
    }

    let mut stmt = conn.prepare(
        "SELECT t.id, t.type, c.name, c.type
         FROM transactions t JOIN categories c ON t.category_id=c.id
         WHERE t.type <> c.type ORDER BY t.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let tx_type: String = r.get(1)?;
        let cat: String = r.get(2)?;
        let cat_type: String = r.get(3)?;
        rows.push(vec![
            "category_type_mismatch".into(),
            format!("transaction {} is {} but '{}' is {}", id, tx_type, cat, cat_type),
        ]);
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = check(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
