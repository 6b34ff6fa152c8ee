//! Key-value backends.
//!
//! The engine never talks to a backend directly; it goes through
//! [`PersistentStore`](super::PersistentStore), which turns every backend
//! failure into a fallback value or an ignored write.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::StoreError;

/// Durable string storage addressed by key.
pub trait KvBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// SQLite-backed key-value table.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    /// Open the store at `<data_dir>/pomodori.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory or the database cannot be opened.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = data_dir()?.join("pomodori.db");
        Self::open(&path)
    }

    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let kv = Self { conn };
        kv.migrate()?;
        Ok(kv)
    }

    /// Open an in-memory store.
    pub fn open_memory() -> Result<Self, StoreError> {
        let kv = Self {
            conn: Connection::open_in_memory()?,
        };
        kv.migrate()?;
        Ok(kv)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }
}

impl KvBackend for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// In-process store.
///
/// Clones share the same map, so a test can hand one clone to an engine and
/// keep another to inspect or to "reload" from. `set_failing(true)` makes
/// every call error out, like a browser in private mode or over quota.
#[derive(Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Raw stored text, bypassing the failure switch.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Write raw text, bypassing the failure switch.
    pub fn put_raw(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn check(&self, key: &str) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl KvBackend for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check(key)?;
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check(key)?;
        self.put_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check(key)?;
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }
}
