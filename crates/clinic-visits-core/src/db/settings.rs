//! Settings database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::RemoteConfig;

/// Key of the selected company name.
pub const SELECTED_COMPANY_KEY: &str = "selected_company";

/// Key of the remote store configuration (JSON).
pub const REMOTE_CONFIG_KEY: &str = "remote_config";

impl Database {
    /// Read a raw setting.
    pub fn get_setting(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    /// Insert or replace a raw setting.
    pub fn set_setting(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a setting. Returns whether it existed.
    pub fn clear_setting(&self, key: &str) -> DbResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM settings WHERE key = ?", [key])?;
        Ok(rows > 0)
    }

    pub fn selected_company(&self) -> DbResult<Option<String>> {
        self.get_setting(SELECTED_COMPANY_KEY)
    }

    pub fn set_selected_company(&self, company: &str) -> DbResult<()> {
        self.set_setting(SELECTED_COMPANY_KEY, company)
    }

    /// Remote store configuration, default when never saved.
    pub fn remote_config(&self) -> DbResult<RemoteConfig> {
        match self.get_setting(REMOTE_CONFIG_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(RemoteConfig::default()),
        }
    }

    pub fn set_remote_config(&self, config: &RemoteConfig) -> DbResult<()> {
        let json = serde_json::to_string(config)?;
        self.set_setting(REMOTE_CONFIG_KEY, &json)
    }
}
