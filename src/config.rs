// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration: where the database lives, who the acting user is,
//! and how chatty logging should be.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::PathBuf;

use crate::models::User;
use crate::store;

pub const DB_ENV: &str = "FINGUARD_DB";
pub const USER_ENV: &str = "FINGUARD_USER";
pub const LOG_ENV: &str = "FINGUARD_LOG";

const ACTIVE_USER_KEY: &str = "active_user";

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.finguard", "FinGuard", "finguard"));

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finguard.sqlite"))
}

/// Filter directive for the tracing subscriber.
pub fn log_filter() -> String {
    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn active_user(conn: &Connection) -> Result<Option<String>> {
    get_setting(conn, ACTIVE_USER_KEY)
}

pub fn set_active_user(conn: &Connection, username: &str) -> Result<()> {
    set_setting(conn, ACTIVE_USER_KEY, username)
}

/// Resolves the acting user: explicit flag, then `FINGUARD_USER`, then the
/// stored active user.
pub fn current_user(conn: &Connection, flag: Option<&str>) -> Result<User> {
    let name = match flag.map(str::trim).filter(|s| !s.is_empty()) {
        Some(n) => n.to_string(),
        None => match std::env::var(USER_ENV).ok().filter(|s| !s.trim().is_empty()) {
            Some(n) => n.trim().to_string(),
            None => get_setting(conn, ACTIVE_USER_KEY)?.context(
                "No active user; pass --user, set FINGUARD_USER or run 'finguard user use <name>'",
            )?,
        },
    };
    let user = store::users::find_by_username(conn, &name)?
        .with_context(|| format!("User '{}' not found", name))?;
    Ok(user)
}
