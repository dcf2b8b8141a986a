mod catalog_db;
mod config;
mod snapshot;

pub use catalog_db::CatalogDb;
pub use config::{CatalogConfig, Config, FilterConfig, GridConfig};
pub use snapshot::{SessionSnapshot, SnapshotStore, CATALOG_CACHE_KEY, SELECTION_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/timetable[-dev]/` based on TIMETABLE_ENV.
///
/// Set TIMETABLE_ENV=dev to use the development data directory, or
/// TIMETABLE_HOME to point at an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("TIMETABLE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TIMETABLE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("timetable-dev")
            } else {
                base_dir.join("timetable")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
