//! # Timetable Core Library
//!
//! Course-enrollment timetable builder. Users pick course offerings, each with
//! weekly time slots, and the library keeps the selection free of duplicates,
//! repeated subjects and time clashes. Everything is reachable from the
//! standalone `timetable` CLI; this crate holds the logic.
//!
//! ## Architecture
//!
//! - **Slots**: weekday and `"h-h"` label parsing with a half-open overlap test
//! - **Selection**: validated insertion ([`AddOutcome`]) and removal
//! - **Filter**: free days, free times and selection-aware exclusion
//! - **Grid**: projection of a selection onto two-hour display blocks
//! - **Catalog**: the [`CatalogSource`] trait, an HTTP client and ingestion checks
//! - **Storage**: SQLite catalog cache, session snapshots and TOML configuration
//!
//! ## Key Components
//!
//! - [`Session`]: catalog plus selection, owned by the caller
//! - [`CatalogDb`]: queryable local copy of the catalog
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod conflict;
pub mod error;
pub mod filter;
pub mod grid;
pub mod guard;
pub mod offering;
pub mod selection;
pub mod session;
pub mod slot;
pub mod storage;
pub mod subject;

pub use catalog::{ingest, ingest_values, CatalogSource, HttpCatalog, IngestReport, MemoryCatalog, RejectedRecord};
pub use conflict::{conflict_message, find_conflicts, has_conflict, Conflict};
pub use error::{CatalogError, ConfigError, CoreError, Result, StorageError, ValidationError};
pub use filter::{filter_catalog, offerings_by_subject, FilterCriteria};
pub use grid::{project_block, project_week, BlockProjection, GridCell, GridRow};
pub use guard::{classify, Classification};
pub use offering::Offering;
pub use selection::{AddOutcome, Selection};
pub use session::Session;
pub use slot::{overlaps, Interval, SlotLabel, TimeSlot, Weekday, ALL_TIME_SLOTS, ONE_HOUR_SLOTS, TWO_HOUR_SLOTS};
pub use storage::{CatalogDb, Config, SessionSnapshot, SnapshotStore};
pub use subject::{subject_inconsistencies, summarize_by_subject, SubjectInconsistency, SubjectSummary};
