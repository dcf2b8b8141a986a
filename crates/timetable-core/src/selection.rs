//! The user's chosen offerings and validated insertion into them.

use serde::{Deserialize, Serialize};

use crate::conflict::{conflict_message, find_conflicts, Conflict};
use crate::guard::{classify, Classification};
use crate::offering::Offering;

/// Result of trying to add an offering to a selection.
///
/// Only `Added` changes the selection. The other variants are the single
/// reason the insertion was refused, checked in the order
/// not found, duplicate, same subject, conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddOutcome {
    Added { offering: Offering },
    NotFound { unique_id: String },
    Duplicate { unique_id: String },
    SameSubject { course_name: String },
    Conflict {
        conflicts: Vec<Conflict>,
        message: String,
    },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }

    /// One-line reason suitable for a notification.
    pub fn summary(&self) -> String {
        match self {
            Self::Added { offering } => format!(
                "Added \"{}\" ({})",
                offering.course_name, offering.unique_id
            ),
            Self::NotFound { unique_id } => format!("Course not found: {unique_id}"),
            Self::Duplicate { unique_id } => format!("{unique_id} is already selected"),
            Self::SameSubject { course_name } => {
                format!("Another offering of \"{course_name}\" is already selected")
            }
            Self::Conflict { message, .. } => message.clone(),
        }
    }
}

/// Ordered set of offerings chosen by one user, unique by `uniqueId`.
///
/// Insertion order is display order and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    offerings: Vec<Offering>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted offerings, keeping the first of any repeated id.
    pub fn from_offerings(offerings: Vec<Offering>) -> Self {
        let mut selection = Self::new();
        for offering in offerings {
            if selection.contains(&offering.unique_id) {
                tracing::warn!(unique_id = %offering.unique_id, "dropping repeated offering from restored selection");
                continue;
            }
            selection.offerings.push(offering);
        }
        selection
    }

    /// Look `unique_id` up in `catalog` and append it if nothing forbids it.
    pub fn add(&mut self, unique_id: &str, catalog: &[Offering]) -> AddOutcome {
        let Some(candidate) = catalog.iter().find(|o| o.unique_id == unique_id) else {
            return AddOutcome::NotFound {
                unique_id: unique_id.to_string(),
            };
        };
        self.add_offering(candidate.clone())
    }

    /// Run the duplicate, same-subject and conflict checks for `candidate`.
    pub fn add_offering(&mut self, candidate: Offering) -> AddOutcome {
        match classify(&candidate, &self.offerings) {
            Classification::Duplicate => {
                return AddOutcome::Duplicate {
                    unique_id: candidate.unique_id,
                }
            }
            Classification::SameSubject => {
                return AddOutcome::SameSubject {
                    course_name: candidate.course_name,
                }
            }
            Classification::Clear => {}
        }

        let conflicts = find_conflicts(&candidate, &self.offerings);
        if !conflicts.is_empty() {
            let message = conflict_message(&candidate, &conflicts);
            return AddOutcome::Conflict { conflicts, message };
        }

        tracing::info!(unique_id = %candidate.unique_id, "offering selected");
        self.offerings.push(candidate.clone());
        AddOutcome::Added {
            offering: candidate,
        }
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn remove(&mut self, unique_id: &str) -> bool {
        let before = self.offerings.len();
        self.offerings.retain(|o| o.unique_id != unique_id);
        before != self.offerings.len()
    }

    pub fn clear(&mut self) {
        self.offerings.clear();
    }

    pub fn contains(&self, unique_id: &str) -> bool {
        self.offerings.iter().any(|o| o.unique_id == unique_id)
    }

    pub fn get(&self, unique_id: &str) -> Option<&Offering> {
        self.offerings.iter().find(|o| o.unique_id == unique_id)
    }

    pub fn as_slice(&self) -> &[Offering] {
        &self.offerings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Offering> {
        self.offerings.iter()
    }

    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }

    pub fn total_credits(&self) -> u32 {
        self.offerings.iter().map(|o| o.credits).sum()
    }

    /// Stable palette position: rank of `unique_id` among the selected ids
    /// sorted lexicographically.
    pub fn color_index(&self, unique_id: &str) -> Option<usize> {
        let mut ids: Vec<&str> = self.offerings.iter().map(|o| o.unique_id.as_str()).collect();
        ids.sort_unstable();
        ids.iter().position(|id| *id == unique_id)
    }

    pub fn into_vec(self) -> Vec<Offering> {
        self.offerings
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Offering;
    type IntoIter = std::slice::Iter<'a, Offering>;

    fn into_iter(self) -> Self::IntoIter {
        self.offerings.iter()
    }
}
