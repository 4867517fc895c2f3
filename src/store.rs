// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Last-known balance and currency per user, kept on disk for when the
//! backend is unreachable. Nothing here is ever reconciled with the server.

use anyhow::Context;
use directories::ProjectDirs;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

use crate::config::APP;
use crate::error::Result;

const KEY_CURRENCY: &str = "currency";
const KEY_BALANCE: &str = "balance";
const KEY_START_BALANCE: &str = "start_balance";

pub fn store_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("minifin.sqlite"))
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open_or_init() -> anyhow::Result<Self> {
        let path = store_path()?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Open local store at {}", path.display()))?;
        Ok(Self::init(conn)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
        CREATE TABLE IF NOT EXISTS user_settings(
            user_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY(user_id, key)
        );
        "#,
        )?;
        Ok(Self { conn })
    }

    fn get(&self, user_id: &str, key: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row(
                "SELECT value FROM user_settings WHERE user_id=?1 AND key=?2",
                params![user_id, key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn set(&self, user_id: &str, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO user_settings(user_id, key, value) VALUES(?1, ?2, ?3)
             ON CONFLICT(user_id, key) DO UPDATE SET value=excluded.value",
            params![user_id, key, value],
        )?;
        Ok(())
    }

    fn get_decimal(&self, user_id: &str, key: &str) -> Result<Option<Decimal>> {
        Ok(self.get(user_id, key)?.and_then(|s| match s.parse::<Decimal>() {
            Ok(d) => Some(d),
            Err(_) => {
                log::warn!("ignoring unparsable stored {} for {}: '{}'", key, user_id, s);
                None
            }
        }))
    }

    pub fn currency(&self, user_id: &str) -> Result<Option<String>> {
        self.get(user_id, KEY_CURRENCY)
    }

    pub fn balance(&self, user_id: &str) -> Result<Option<Decimal>> {
        self.get_decimal(user_id, KEY_BALANCE)
    }

    pub fn start_balance(&self, user_id: &str) -> Result<Option<Decimal>> {
        self.get_decimal(user_id, KEY_START_BALANCE)
    }

    pub fn save_last_known(&self, user_id: &str, balance: Decimal, currency: &str) -> Result<()> {
        self.set(user_id, KEY_BALANCE, &balance.to_string())?;
        self.set(user_id, KEY_CURRENCY, currency)
    }

    pub fn save_profile(&self, user_id: &str, currency: &str, start_balance: Decimal) -> Result<()> {
        self.set(user_id, KEY_START_BALANCE, &start_balance.to_string())?;
        self.set(user_id, KEY_CURRENCY, currency)
    }
}
