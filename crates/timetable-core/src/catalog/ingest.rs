//! Admission checks for catalog records.
//!
//! Records are validated once, when they enter the system, so the overlap
//! predicate never meets a label it cannot decode. Bad records are dropped
//! and reported; they never fail the batch.

use serde::Serialize;
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::offering::Offering;
use crate::subject::{subject_inconsistencies, SubjectInconsistency};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    /// Id of the record when it could be read.
    pub unique_id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub accepted: Vec<Offering>,
    pub rejected: Vec<RejectedRecord>,
    /// Subjects whose offerings disagree on display name or credits. These
    /// are accepted; summaries use the first member's values.
    pub inconsistencies: Vec<SubjectInconsistency>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.inconsistencies.is_empty()
    }
}

/// Admit records in input order. Decode failures arrive as `Err` and are
/// reported at their position alongside validation failures.
fn admit(records: impl IntoIterator<Item = Result<Offering, RejectedRecord>>) -> IngestReport {
    let mut report = IngestReport::default();
    let mut seen: HashSet<String> = HashSet::new();

    for record in records {
        let record = match record {
            Ok(record) => record,
            Err(rejected) => {
                report.rejected.push(rejected);
                continue;
            }
        };
        let unique_id = record.unique_id.clone();
        let verdict = if seen.contains(&unique_id) {
            Err(ValidationError::DuplicateId(unique_id.clone()))
        } else {
            record.into_canonical()
        };
        match verdict {
            Ok(offering) => {
                seen.insert(unique_id);
                report.accepted.push(offering);
            }
            Err(err) => {
                tracing::warn!(unique_id = %unique_id, error = %err, "rejecting catalog record");
                report.rejected.push(RejectedRecord {
                    unique_id: Some(unique_id),
                    reason: err.to_string(),
                });
            }
        }
    }

    report.inconsistencies = subject_inconsistencies(&report.accepted);
    for found in &report.inconsistencies {
        tracing::warn!(
            course_name = %found.course_name,
            display_names = ?found.display_names,
            credits = ?found.credits,
            "offerings of one subject disagree"
        );
    }
    report
}

/// Validate typed records, keeping the first occurrence of each id.
/// Accepted records carry canonical slot labels.
pub fn ingest(records: Vec<Offering>) -> IngestReport {
    admit(records.into_iter().map(Ok))
}

/// Decode loosely-typed records (remote payloads, cached snapshots) and
/// validate them. Entries that do not decode are rejected like invalid ones.
pub fn ingest_values(values: Vec<serde_json::Value>) -> IngestReport {
    admit(values.into_iter().map(|value| {
        let unique_id = value
            .get("uniqueId")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        serde_json::from_value::<Offering>(value).map_err(|err| {
            tracing::warn!(unique_id = ?unique_id, error = %err, "undecodable catalog record");
            RejectedRecord {
                unique_id,
                reason: err.to_string(),
            }
        })
    }))
}
