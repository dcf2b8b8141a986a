//! Key-value snapshot of the working session.
//!
//! Two fixed keys are written as JSON: the last catalog and the current
//! selection. Reading back never fails on bad content; a missing or corrupt
//! entry loads as empty and is logged.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::data_dir;
use crate::catalog::ingest_values;
use crate::error::{Result, StorageError};
use crate::offering::Offering;

pub const CATALOG_CACHE_KEY: &str = "catalog-cache";
pub const SELECTION_KEY: &str = "selection";

/// What a session needs to resume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub catalog: Vec<Offering>,
    pub selection: Vec<Offering>,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntryOut<'a> {
    fetched_at: Option<DateTime<Utc>>,
    courses: &'a [Offering],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntryIn {
    #[serde(default)]
    fetched_at: Option<DateTime<Utc>>,
    courses: Vec<serde_json::Value>,
}

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open the snapshot store inside `<data_dir>/timetable.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("timetable.db"))
    }

    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.create_table()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.create_table()?;
        Ok(store)
    }

    fn create_table(&self) -> std::result::Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    fn kv_get(&self, key: &str) -> std::result::Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn kv_set(&self, key: &str, value: &str) -> std::result::Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Raw write, used by tests to plant corrupt entries.
    #[cfg(test)]
    fn put_raw(&self, key: &str, value: &str) {
        self.kv_set(key, value).unwrap();
    }

    /// Write both entries in one transaction.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let catalog = serde_json::to_string(&CatalogEntryOut {
            fetched_at: snapshot.fetched_at,
            courses: &snapshot.catalog,
        })?;
        let selection = serde_json::to_string(&snapshot.selection)?;
        let tx = self.conn.unchecked_transaction()?;
        self.kv_set(CATALOG_CACHE_KEY, &catalog)?;
        self.kv_set(SELECTION_KEY, &selection)?;
        tx.commit()?;
        tracing::info!(
            catalog = snapshot.catalog.len(),
            selection = snapshot.selection.len(),
            "session snapshot saved"
        );
        Ok(())
    }

    /// Read both entries back.
    ///
    /// Records are re-validated on the way in, so a hand-edited or stale
    /// entry cannot put a malformed label in front of the predicates.
    ///
    /// # Errors
    /// Returns an error only if the database itself cannot be queried.
    pub fn load(&self) -> Result<SessionSnapshot> {
        let mut snapshot = SessionSnapshot::default();

        if let Some(raw) = self.kv_get(CATALOG_CACHE_KEY)? {
            match serde_json::from_str::<CatalogEntryIn>(&raw) {
                Ok(entry) => {
                    snapshot.fetched_at = entry.fetched_at;
                    snapshot.catalog = ingest_values(entry.courses).accepted;
                }
                Err(e) => {
                    tracing::warn!(key = CATALOG_CACHE_KEY, error = %e, "corrupt snapshot entry, starting empty");
                }
            }
        }

        if let Some(raw) = self.kv_get(SELECTION_KEY)? {
            match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(values) => snapshot.selection = ingest_values(values).accepted,
                Err(e) => {
                    tracing::warn!(key = SELECTION_KEY, error = %e, "corrupt snapshot entry, starting empty");
                }
            }
        }

        Ok(snapshot)
    }
}
