//! Per-subject summaries over a list of offerings.

use serde::{Deserialize, Serialize};

use crate::offering::Offering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub course_name: String,
    pub display_name: String,
    pub credits: u32,
    pub total_courses: usize,
}

/// A subject whose offerings disagree on display name or credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInconsistency {
    pub course_name: String,
    pub display_names: Vec<String>,
    pub credits: Vec<u32>,
}

/// Group by `courseName` in first-seen order. Display name and credits come
/// from the first offering of each subject.
pub fn summarize_by_subject(offerings: &[Offering]) -> Vec<SubjectSummary> {
    let mut summaries: Vec<SubjectSummary> = Vec::new();
    for offering in offerings {
        match summaries
            .iter_mut()
            .find(|s| s.course_name == offering.course_name)
        {
            Some(summary) => summary.total_courses += 1,
            None => summaries.push(SubjectSummary {
                course_name: offering.course_name.clone(),
                display_name: offering.display_name.clone(),
                credits: offering.credits,
                total_courses: 1,
            }),
        }
    }
    summaries
}

/// Subjects whose members carry more than one display name or credit value.
pub fn subject_inconsistencies(offerings: &[Offering]) -> Vec<SubjectInconsistency> {
    let mut seen: Vec<SubjectInconsistency> = Vec::new();
    for offering in offerings {
        let found = seen
            .iter()
            .position(|s| s.course_name == offering.course_name);
        let entry = match found {
            Some(idx) => &mut seen[idx],
            None => {
                seen.push(SubjectInconsistency {
                    course_name: offering.course_name.clone(),
                    display_names: Vec::new(),
                    credits: Vec::new(),
                });
                let last = seen.len() - 1;
                &mut seen[last]
            }
        };
        if !entry.display_names.contains(&offering.display_name) {
            entry.display_names.push(offering.display_name.clone());
        }
        if !entry.credits.contains(&offering.credits) {
            entry.credits.push(offering.credits);
        }
    }
    seen.retain(|s| s.display_names.len() > 1 || s.credits.len() > 1);
    seen
}
