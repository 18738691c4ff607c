//! Persistent preference store
//!
//! Key/value persistence for small typed values (language, map style,
//! bookmarks). Values are stored as JSON text in a SQLite table so that
//! several running instances can share them. Every write bumps a per-key
//! revision, which is how an instance notices writes made by another one.
//!
//! Reads and writes never return an error to the caller: an unreadable value is
//! replaced by the caller's fallback and a failed write is logged.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};

pub struct PreferenceStore {
    conn: Connection,
    persistent: bool,
}

impl PreferenceStore {
    /// Open the store at the platform data directory
    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_path())
    }

    /// Open (or create) the store at `path`.
    ///
    /// Falls back to an in-memory database when the file cannot be used, so
    /// preferences still work for the rest of the session.
    pub fn open(path: &Path) -> Result<Self> {
        match Self::try_open(path) {
            Ok(store) => Ok(store),
            Err(e) => {
                tracing::warn!(
                    "Preference store unavailable at {:?} ({}), using in-memory store",
                    path,
                    e
                );
                Self::new_in_memory()
            }
        }
    }

    fn try_open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = PreferenceStore {
            conn,
            persistent: true,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (tests, or when the disk is unusable)
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = PreferenceStore {
            conn,
            persistent: false,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn default_path() -> PathBuf {
        match dirs::data_dir() {
            Some(dir) => dir.join("kelitui").join("preferences.db"),
            None => crate::utils::get_data_fallback_path().join("preferences.db"),
        }
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                revision INTEGER NOT NULL
            ) WITHOUT ROWID;
            ",
        )
    }

    /// Whether values survive a restart
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    fn read_raw(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Read a typed value, returning `fallback` when it is missing or unreadable
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.read_raw(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Stored preference '{}' is malformed ({}), using fallback", key, e);
                    fallback
                }
            },
            Ok(None) => fallback,
            Err(e) => {
                tracing::warn!("Failed to read preference '{}': {}", key, e);
                fallback
            }
        }
    }

    /// Persist a typed value and return the revision this write produced.
    ///
    /// Failures are logged and yield `None`.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Option<u64> {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to serialize preference '{}': {}", key, e);
                return None;
            }
        };

        let result: rusqlite::Result<i64> = self.conn.query_row(
            "INSERT INTO preferences (key, value, revision) VALUES (?1, ?2, 1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            revision = preferences.revision + 1
             RETURNING revision",
            params![key, raw],
            |row| row.get(0),
        );

        match result {
            Ok(revision) => {
                tracing::debug!("Saved preference '{}' (revision {})", key, revision);
                Some(revision as u64)
            }
            Err(e) => {
                tracing::warn!("Failed to save preference '{}': {}", key, e);
                None
            }
        }
    }

    /// Current revision of a key (0 if never written or unreadable)
    pub fn revision(&self, key: &str) -> u64 {
        let result: rusqlite::Result<Option<i64>> = self
            .conn
            .query_row(
                "SELECT revision FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional();

        match result {
            Ok(Some(rev)) => rev as u64,
            Ok(None) => 0,
            Err(e) => {
                tracing::debug!("Failed to read revision of '{}': {}", key, e);
                0
            }
        }
    }
}
