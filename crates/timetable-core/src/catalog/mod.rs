//! Catalog query surface.
//!
//! The catalog owner (a remote service or the local SQLite cache) hands out
//! offering records; the core only ever sees the vectors these sources
//! return.

pub mod http;
pub mod ingest;

pub use http::HttpCatalog;
pub use ingest::{ingest, ingest_values, IngestReport, RejectedRecord};

use crate::error::Result;
use crate::offering::Offering;

/// Read access to a set of offerings.
pub trait CatalogSource {
    /// Every offering, in catalog order.
    fn list_all(&self) -> Result<Vec<Offering>>;

    /// Offerings whose `uniqueId` or `courseName` equals `id`.
    fn find_by_unique_id_or_name(&self, id: &str) -> Result<Vec<Offering>>;

    /// Case-insensitive substring match on course name, staff or id.
    fn search(&self, query: &str) -> Result<Vec<Offering>>;

    /// Offerings of one subject.
    fn by_course_name(&self, course_name: &str) -> Result<Vec<Offering>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|o| o.course_name == course_name)
            .collect())
    }

    /// Distinct course names in first-seen order.
    fn subject_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for offering in self.list_all()? {
            if !names.contains(&offering.course_name) {
                names.push(offering.course_name);
            }
        }
        Ok(names)
    }
}

/// Whether `offering` matches a free-text search.
pub fn matches_query(offering: &Offering, query: &str) -> bool {
    let q = query.to_lowercase();
    offering.course_name.to_lowercase().contains(&q)
        || offering.staff.to_lowercase().contains(&q)
        || offering.unique_id.to_lowercase().contains(&q)
}

/// A catalog held in memory, typically a fetched or restored snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    offerings: Vec<Offering>,
}

impl MemoryCatalog {
    pub fn new(offerings: Vec<Offering>) -> Self {
        Self { offerings }
    }

    pub fn offerings(&self) -> &[Offering] {
        &self.offerings
    }

    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }
}

impl CatalogSource for MemoryCatalog {
    fn list_all(&self) -> Result<Vec<Offering>> {
        Ok(self.offerings.clone())
    }

    fn find_by_unique_id_or_name(&self, id: &str) -> Result<Vec<Offering>> {
        Ok(self
            .offerings
            .iter()
            .filter(|o| o.unique_id == id || o.course_name == id)
            .cloned()
            .collect())
    }

    fn search(&self, query: &str) -> Result<Vec<Offering>> {
        Ok(self
            .offerings
            .iter()
            .filter(|o| matches_query(o, query))
            .cloned()
            .collect())
    }
}
