// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row-level access to the SQLite tables. Lookups that take a `user_id` are
//! ownership-scoped and report foreign rows as not found.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod transactions;
pub mod users;

use rust_decimal::Decimal;

use crate::error::{FinError, FinResult};

/// Money columns are stored as decimal text to keep them exact.
pub(crate) fn decimal_from_column(value: &str, column: &'static str) -> FinResult<Decimal> {
    value.trim().parse::<Decimal>().map_err(|_| FinError::Corrupt {
        column,
        value: value.to_string(),
    })
}

pub(crate) fn money_to_column(value: Decimal) -> String {
    format!("{:.2}", value)
}
