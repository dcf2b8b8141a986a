//! Working state for one user: the catalog in view and their selection.
//!
//! A `Session` is an ordinary value. Whoever owns it decides when to
//! restore it from, and write it back to, a [`SessionSnapshot`].

use chrono::{DateTime, Duration, Utc};

use crate::catalog::MemoryCatalog;
use crate::error::Result;
use crate::filter::{filter_catalog, offerings_by_subject, FilterCriteria};
use crate::grid::{project_week, GridRow};
use crate::offering::Offering;
use crate::selection::{AddOutcome, Selection};
use crate::storage::{CatalogDb, SessionSnapshot, SnapshotStore};
use crate::subject::{summarize_by_subject, SubjectSummary};

#[derive(Debug, Clone, Default)]
pub struct Session {
    catalog: MemoryCatalog,
    selection: Selection,
    fetched_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(catalog: Vec<Offering>) -> Self {
        Self {
            catalog: MemoryCatalog::new(catalog),
            ..Self::default()
        }
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            catalog: MemoryCatalog::new(snapshot.catalog),
            selection: Selection::from_offerings(snapshot.selection),
            fetched_at: snapshot.fetched_at,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            catalog: self.catalog.offerings().to_vec(),
            selection: self.selection.as_slice().to_vec(),
            fetched_at: self.fetched_at,
        }
    }

    pub fn catalog(&self) -> &[Offering] {
        self.catalog.offerings()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Swap in a freshly fetched catalog.
    ///
    /// The selection is left alone. Returns the selected ids the new catalog
    /// no longer lists.
    pub fn replace_catalog(&mut self, offerings: Vec<Offering>, fetched_at: DateTime<Utc>) -> Vec<String> {
        let missing: Vec<String> = self
            .selection
            .iter()
            .filter(|sel| !offerings.iter().any(|o| o.unique_id == sel.unique_id))
            .map(|sel| sel.unique_id.clone())
            .collect();
        for unique_id in &missing {
            tracing::warn!(%unique_id, "selected offering is no longer in the catalog");
        }
        tracing::info!(offerings = offerings.len(), "session catalog replaced");
        self.catalog = MemoryCatalog::new(offerings);
        self.fetched_at = Some(fetched_at);
        missing
    }

    /// [`Session::replace_catalog`], then persist the new catalog: the
    /// snapshot first, the queryable cache last.
    ///
    /// # Errors
    /// Fails if either write fails. If only the cache write fails, the
    /// snapshot already holds the new catalog; the mismatch is logged.
    pub fn store_catalog(
        &mut self,
        offerings: Vec<Offering>,
        fetched_at: DateTime<Utc>,
        store: &SnapshotStore,
        db: &mut CatalogDb,
    ) -> Result<Vec<String>> {
        let missing = self.replace_catalog(offerings, fetched_at);
        store.save(&self.snapshot())?;
        if let Err(e) = db.replace_all(self.catalog.offerings(), fetched_at) {
            tracing::warn!(
                error = %e,
                "catalog cache not updated; listings show the previous catalog until the next refresh"
            );
            return Err(e);
        }
        Ok(missing)
    }

    /// Whether the catalog is older than `refresh_interval_min` or was never fetched.
    pub fn is_stale(&self, now: DateTime<Utc>, refresh_interval_min: u32) -> bool {
        match self.fetched_at {
            Some(at) => now - at >= Duration::minutes(i64::from(refresh_interval_min)),
            None => true,
        }
    }

    pub fn add(&mut self, unique_id: &str) -> AddOutcome {
        self.selection.add(unique_id, self.catalog.offerings())
    }

    pub fn remove(&mut self, unique_id: &str) -> bool {
        self.selection.remove(unique_id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Offering> {
        filter_catalog(self.catalog.offerings(), criteria, self.selection.as_slice())
    }

    /// One summary per subject still offered after filtering.
    pub fn subjects(&self, criteria: &FilterCriteria) -> Vec<SubjectSummary> {
        summarize_by_subject(&self.filter(criteria))
    }

    pub fn subject_offerings(&self, criteria: &FilterCriteria, course_name: &str) -> Vec<Offering> {
        offerings_by_subject(&self.filter(criteria), course_name)
    }

    pub fn grid(&self) -> Vec<GridRow> {
        project_week(self.selection.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::{TimeSlot, Weekday};

    fn offering(id: &str, name: &str, day: Weekday, time: &str) -> Offering {
        Offering::new(id, name, name, "Staff", 3, vec![TimeSlot::new(day, time)])
    }

    fn session() -> Session {
        Session::new(vec![
            offering("M1", "Math", Weekday::Monday, "8-10"),
            offering("M2", "Math", Weekday::Tuesday, "8-10"),
            offering("P1", "Physics", Weekday::Monday, "9-10"),
            offering("C1", "Chemistry", Weekday::Wednesday, "1-3"),
        ])
    }

    #[test]
    fn add_consults_session_catalog() {
        let mut s = session();
        assert!(s.add("M1").is_added());
        assert!(matches!(s.add("ZZ"), AddOutcome::NotFound { .. }));
        assert!(matches!(s.add("P1"), AddOutcome::Conflict { .. }));
        assert_eq!(s.selection().len(), 1);
    }

    #[test]
    fn snapshot_round_trip() {
        let mut s = session();
        s.add("C1");
        let restored = Session::from_snapshot(s.snapshot());
        assert_eq!(restored.catalog(), s.catalog());
        assert_eq!(restored.selection(), s.selection());
    }

    #[test]
    fn replacing_catalog_reports_missing_selection() {
        let mut s = session();
        s.add("M1");
        s.add("C1");
        let missing = s.replace_catalog(
            vec![offering("C1", "Chemistry", Weekday::Wednesday, "1-3")],
            Utc::now(),
        );
        assert_eq!(missing, vec!["M1".to_string()]);
        assert_eq!(s.selection().len(), 2);
        assert_eq!(s.catalog().len(), 1);
    }

    #[test]
    fn staleness() {
        let mut s = session();
        let now = Utc::now();
        assert!(s.is_stale(now, 30));
        s.replace_catalog(s.catalog().to_vec(), now - Duration::minutes(45));
        assert!(s.is_stale(now, 30));
        assert!(!s.is_stale(now, 60));
    }

    #[test]
    fn subjects_follow_filter() {
        let mut s = session();
        s.add("M1");
        let criteria = FilterCriteria::default().excluding_conflicts(true);
        let names: Vec<String> = s.subjects(&criteria).into_iter().map(|x| x.course_name).collect();
        assert_eq!(names, vec!["Math", "Chemistry"]);
        assert_eq!(s.subject_offerings(&criteria, "Math").len(), 1);
    }

    #[test]
    fn grid_reflects_selection() {
        let mut s = session();
        s.add("C1");
        let grid = s.grid();
        assert_eq!(grid[2].day, Weekday::Wednesday);
        assert!(grid[2].cells[2].projection.full.is_some());
    }
}
