//! SQLite-backed catalog cache.
//!
//! Holds the last accepted catalog so the CLI can query, filter and select
//! without reaching the catalog service on every run.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use std::path::Path;

use super::data_dir;
use crate::catalog::CatalogSource;
use crate::error::{Result, StorageError};
use crate::offering::Offering;
use crate::slot::{SlotLabel, TimeSlot, Weekday};

const FETCHED_AT_KEY: &str = "fetched_at";

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// SQLite database for the catalog cache.
pub struct CatalogDb {
    conn: Connection,
}

impl CatalogDb {
    /// Open the catalog cache at `~/.config/timetable/timetable.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or its tables created.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("timetable.db"))
    }

    /// Open a catalog cache at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or its tables created.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> std::result::Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS offerings (
                unique_id    TEXT PRIMARY KEY,
                position     INTEGER NOT NULL,
                course_name  TEXT NOT NULL,
                display_name TEXT NOT NULL,
                staff        TEXT NOT NULL,
                credits      INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS offering_slots (
                unique_id TEXT NOT NULL REFERENCES offerings(unique_id) ON DELETE CASCADE,
                position  INTEGER NOT NULL,
                day       TEXT NOT NULL,
                time      TEXT NOT NULL,
                PRIMARY KEY (unique_id, position)
            );

            CREATE TABLE IF NOT EXISTS catalog_meta (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_offerings_position ON offerings(position);
            CREATE INDEX IF NOT EXISTS idx_offerings_course_name ON offerings(course_name);",
        )
    }

    /// Replace the cached catalog with `offerings` and stamp the fetch time.
    ///
    /// # Errors
    /// Returns an error if the transaction fails; the previous cache is kept.
    pub fn replace_all(&mut self, offerings: &[Offering], fetched_at: DateTime<Utc>) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM offering_slots", [])?;
        tx.execute("DELETE FROM offerings", [])?;
        {
            let mut insert_offering = tx.prepare(
                "INSERT INTO offerings (unique_id, position, course_name, display_name, staff, credits)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            let mut insert_slot = tx.prepare(
                "INSERT INTO offering_slots (unique_id, position, day, time) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (position, offering) in offerings.iter().enumerate() {
                insert_offering.execute(params![
                    offering.unique_id,
                    position as i64,
                    offering.course_name,
                    offering.display_name,
                    offering.staff,
                    offering.credits,
                ])?;
                for (slot_pos, slot) in offering.slots.iter().enumerate() {
                    insert_slot.execute(params![
                        offering.unique_id,
                        slot_pos as i64,
                        slot.day.name(),
                        slot.time.as_str(),
                    ])?;
                }
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO catalog_meta (key, value) VALUES (?1, ?2)",
            params![FETCHED_AT_KEY, fetched_at.to_rfc3339()],
        )?;
        tx.commit()?;
        tracing::info!(offerings = offerings.len(), "catalog cache replaced");
        Ok(())
    }

    /// When the cached catalog was last replaced.
    ///
    /// # Errors
    /// Returns an error if the query fails. An unreadable timestamp is `None`.
    pub fn fetched_at(&self) -> Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM catalog_meta WHERE key = ?1",
                params![FETCHED_AT_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        }))
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM offerings", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Offerings matching `condition` (a predicate over alias `o`), with their slots.
    fn load(&self, condition: &str, args: &[&dyn ToSql]) -> Result<Vec<Offering>> {
        let sql = format!(
            "SELECT o.unique_id, o.course_name, o.display_name, o.staff, o.credits, s.day, s.time
             FROM offerings o
             LEFT JOIN offering_slots s ON s.unique_id = o.unique_id
             WHERE {condition}
             ORDER BY o.position, s.position"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
            ))
        })?;

        let mut offerings: Vec<Offering> = Vec::new();
        for row in rows {
            let (unique_id, course_name, display_name, staff, credits, day, time) =
                row.map_err(StorageError::from)?;
            if offerings.last().map(|o| o.unique_id != unique_id).unwrap_or(true) {
                offerings.push(Offering::new(
                    unique_id.clone(),
                    course_name,
                    display_name,
                    staff,
                    credits,
                    Vec::new(),
                ));
            }
            let (Some(day), Some(time)) = (day, time) else {
                continue;
            };
            let Some(current) = offerings.last_mut() else {
                continue;
            };
            match day.parse::<Weekday>() {
                Ok(day) => current.slots.push(TimeSlot::new(day, SlotLabel::new(time))),
                Err(e) => tracing::warn!(%unique_id, error = %e, "skipping unreadable cached slot"),
            }
        }
        Ok(offerings)
    }
}

impl CatalogSource for CatalogDb {
    fn list_all(&self) -> Result<Vec<Offering>> {
        self.load("1 = 1", &[])
    }

    fn find_by_unique_id_or_name(&self, id: &str) -> Result<Vec<Offering>> {
        self.load("o.unique_id = ?1 OR o.course_name = ?1", &[&id])
    }

    fn search(&self, query: &str) -> Result<Vec<Offering>> {
        let pattern = like_pattern(query);
        self.load(
            "lower(o.course_name) LIKE ?1 ESCAPE '\\'
             OR lower(o.staff) LIKE ?1 ESCAPE '\\'
             OR lower(o.unique_id) LIKE ?1 ESCAPE '\\'",
            &[&pattern],
        )
    }

    fn by_course_name(&self, course_name: &str) -> Result<Vec<Offering>> {
        self.load("o.course_name = ?1", &[&course_name])
    }

    fn subject_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT course_name FROM offerings GROUP BY course_name ORDER BY MIN(position)",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
