use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod keys {
    pub const TOKEN: &str = "nexapro_token";
    pub const USER: &str = "nexapro_user";
    pub const SETTINGS: &str = "nexapro_settings";
    pub const NOTIFICATIONS: &str = "nexapro_notifications";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Failed to create store directory: {0}")]
    IoError(#[from] std::io::Error),
}

/// Persistent JSON key/value store backing the session, settings and cached
/// notifications.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self::new(Connection::open(path)?);
        store.initialize()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let store = Self::new(Connection::open_in_memory()?);
        store.initialize()?;
        Ok(store)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        self.conn().execute(
            "CREATE TABLE IF NOT EXISTS entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_string(value)?;
        self.conn().execute(
            "INSERT OR REPLACE INTO entries (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, &data, Utc::now().to_rfc3339()],
        )?;
        tracing::debug!("Stored {}", key);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let data: Option<String> = self
            .conn()
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn().execute("DELETE FROM entries WHERE key = ?1", [key])?;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        let result: SqliteResult<i32> = self.conn().query_row(
            "SELECT COUNT(*) FROM entries WHERE key = ?1",
            [key],
            |row| row.get(0),
        );
        result.unwrap_or(0) > 0
    }

    pub fn table_exists(&self, table_name: &str) -> bool {
        let result: SqliteResult<i32> = self.conn().query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        );
        result.unwrap_or(0) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
        compact: bool,
    }

    fn create_test_store() -> LocalStore {
        LocalStore::in_memory().unwrap()
    }

    #[test]
    fn creates_database_schema() {
        let store = create_test_store();
        assert!(store.table_exists("entries"));
    }

    #[test]
    fn stores_and_loads_value() {
        let store = create_test_store();
        let prefs = Prefs {
            theme: "dark".to_string(),
            compact: true,
        };

        store.set(keys::SETTINGS, &prefs).unwrap();

        assert_eq!(store.get::<Prefs>(keys::SETTINGS).unwrap(), Some(prefs));
    }

    #[test]
    fn loads_missing_key_returns_none() {
        let store = create_test_store();
        assert_eq!(store.get::<Prefs>("missing").unwrap(), None);
    }

    #[test]
    fn overwrites_existing_value() {
        let store = create_test_store();
        store.set(keys::TOKEN, "first").unwrap();
        store.set(keys::TOKEN, "second").unwrap();

        assert_eq!(store.get::<String>(keys::TOKEN).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn removes_value() {
        let store = create_test_store();
        store.set(keys::USER, &42).unwrap();

        store.remove(keys::USER).unwrap();

        assert!(!store.contains(keys::USER));
    }

    #[test]
    fn mistyped_value_is_a_serialization_error() {
        let store = create_test_store();
        store.set(keys::SETTINGS, "not prefs").unwrap();

        let result = store.get::<Prefs>(keys::SETTINGS);

        assert!(matches!(result, Err(StoreError::SerializationError(_))));
    }

    #[test]
    fn values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.db");

        LocalStore::open(&path).unwrap().set(keys::TOKEN, "abc").unwrap();
        let reopened = LocalStore::open(&path).unwrap();

        assert_eq!(reopened.get::<String>(keys::TOKEN).unwrap().as_deref(), Some("abc"));
    }
}
