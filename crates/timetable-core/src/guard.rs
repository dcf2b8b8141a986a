//! Duplicate and same-subject checks that run before conflict detection.

use serde::{Deserialize, Serialize};

use crate::offering::Offering;

/// Why a candidate may not join a selection, before time is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The exact offering is already selected.
    Duplicate,
    /// Another offering of the same subject is selected.
    SameSubject,
    /// Neither; the candidate goes on to conflict checking.
    Clear,
}

/// Duplicate wins over same subject.
pub fn classify(candidate: &Offering, selected: &[Offering]) -> Classification {
    if selected
        .iter()
        .any(|existing| existing.unique_id == candidate.unique_id)
    {
        return Classification::Duplicate;
    }
    if selected.iter().any(|existing| {
        existing.same_subject_as(candidate) && existing.unique_id != candidate.unique_id
    }) {
        return Classification::SameSubject;
    }
    Classification::Clear
}
