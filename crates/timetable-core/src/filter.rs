//! Narrowing the catalog to offerings that stay out of the user's free time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::conflict::has_conflict;
use crate::guard::{classify, Classification};
use crate::offering::Offering;
use crate::slot::{overlaps, SlotLabel, Weekday};

/// Constraints for one filter pass.
///
/// `free_days` and `free_times` are periods the user wants to keep free; an
/// offering meeting in any of them is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub free_days: BTreeSet<Weekday>,
    #[serde(default)]
    pub free_times: BTreeSet<SlotLabel>,
    #[serde(default)]
    pub exclude_conflicting: bool,
    #[serde(default)]
    pub exclude_same_subject: bool,
}

impl FilterCriteria {
    pub fn with_free_day(mut self, day: Weekday) -> Self {
        self.free_days.insert(day);
        self
    }

    pub fn with_free_time(mut self, time: impl Into<SlotLabel>) -> Self {
        self.free_times.insert(time.into());
        self
    }

    pub fn excluding_conflicts(mut self, yes: bool) -> Self {
        self.exclude_conflicting = yes;
        self
    }

    pub fn excluding_same_subject(mut self, yes: bool) -> Self {
        self.exclude_same_subject = yes;
        self
    }

    fn has_free_periods(&self) -> bool {
        !self.free_days.is_empty() || !self.free_times.is_empty()
    }

    /// Day/time stage: no slot on a free day, no slot overlapping a free time.
    pub fn keeps_free_periods(&self, offering: &Offering) -> bool {
        if !self.has_free_periods() {
            return true;
        }
        offering.slots.iter().all(|slot| {
            !self.free_days.contains(&slot.day)
                && !self
                    .free_times
                    .iter()
                    .any(|free| overlaps(&slot.time, free))
        })
    }

    /// All stages for a single offering.
    pub fn accepts(&self, offering: &Offering, selected: &[Offering]) -> bool {
        if !self.keeps_free_periods(offering) {
            return false;
        }
        if self.exclude_conflicting && has_conflict(offering, selected) {
            return false;
        }
        if self.exclude_same_subject
            && classify(offering, selected) == Classification::SameSubject
        {
            return false;
        }
        true
    }
}

/// Offerings from `catalog` that pass every enabled stage, in catalog order.
pub fn filter_catalog(
    catalog: &[Offering],
    criteria: &FilterCriteria,
    selected: &[Offering],
) -> Vec<Offering> {
    let kept: Vec<Offering> = catalog
        .iter()
        .filter(|offering| criteria.accepts(offering, selected))
        .cloned()
        .collect();
    tracing::debug!(
        catalog = catalog.len(),
        kept = kept.len(),
        free_days = criteria.free_days.len(),
        free_times = criteria.free_times.len(),
        "catalog filtered"
    );
    kept
}

/// Members of one subject within an already-filtered list.
pub fn offerings_by_subject(offerings: &[Offering], course_name: &str) -> Vec<Offering> {
    offerings
        .iter()
        .filter(|o| o.course_name == course_name)
        .cloned()
        .collect()
}
