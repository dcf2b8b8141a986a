//! Time-conflict detection between a candidate offering and a selection.

use serde::{Deserialize, Serialize};

use crate::offering::Offering;
use crate::slot::{overlaps, SlotLabel, Weekday};

/// A selected offering that a candidate would collide with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub with_offering: Offering,
    pub on_day: Weekday,
    /// The existing offering's label on that day.
    pub at_time: SlotLabel,
}

impl Conflict {
    pub fn describe(&self) -> String {
        format!(
            "\"{}\" ({}) is already scheduled on {} at {}",
            self.with_offering.course_name, self.with_offering.unique_id, self.on_day, self.at_time
        )
    }
}

/// Every slot pair where `candidate` collides with an offering in `selected`.
///
/// Order is selection order, then the existing offering's slots, then the
/// candidate's slots. A pair of offerings colliding on several days yields
/// one entry per collision.
pub fn find_conflicts(candidate: &Offering, selected: &[Offering]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    if selected.is_empty() {
        return conflicts;
    }

    for existing in selected {
        for existing_slot in &existing.slots {
            for new_slot in &candidate.slots {
                if existing_slot.day == new_slot.day && overlaps(&existing_slot.time, &new_slot.time)
                {
                    conflicts.push(Conflict {
                        with_offering: existing.clone(),
                        on_day: existing_slot.day,
                        at_time: existing_slot.time.clone(),
                    });
                }
            }
        }
    }

    tracing::debug!(
        candidate = %candidate.unique_id,
        conflicts = conflicts.len(),
        "conflict scan"
    );
    conflicts
}

/// Equivalent to `!find_conflicts(..).is_empty()`, stopping at the first hit.
pub fn has_conflict(candidate: &Offering, selected: &[Offering]) -> bool {
    selected.iter().any(|existing| {
        existing.slots.iter().any(|existing_slot| {
            candidate
                .slots
                .iter()
                .any(|new_slot| existing_slot.collides_with(new_slot))
        })
    })
}

/// Aggregate message shown when an insertion is refused for time conflicts.
pub fn conflict_message(candidate: &Offering, conflicts: &[Conflict]) -> String {
    let lines = conflicts
        .iter()
        .map(Conflict::describe)
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Cannot add \"{}\" due to conflicts:\n\n{}",
        candidate.course_name, lines
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::TimeSlot;

    fn offering(id: &str, name: &str, slots: &[(Weekday, &str)]) -> Offering {
        Offering::new(
            id,
            name,
            name,
            "Staff",
            3,
            slots.iter().map(|(d, t)| TimeSlot::new(*d, *t)).collect(),
        )
    }

    #[test]
    fn empty_selection_has_no_conflicts() {
        let x = offering("X1", "X", &[(Weekday::Monday, "8-10")]);
        assert!(find_conflicts(&x, &[]).is_empty());
        assert!(!has_conflict(&x, &[]));
    }

    #[test]
    fn reports_each_colliding_slot_pair() {
        let existing = offering(
            "A1",
            "Math",
            &[(Weekday::Monday, "8-10"), (Weekday::Wednesday, "8-10")],
        );
        let candidate = offering(
            "C1",
            "Physics",
            &[(Weekday::Monday, "9-10"), (Weekday::Wednesday, "8-9")],
        );
        let conflicts = find_conflicts(&candidate, &[existing.clone()]);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].on_day, Weekday::Monday);
        assert_eq!(conflicts[1].on_day, Weekday::Wednesday);
        assert_eq!(conflicts[0].with_offering, existing);
        assert_eq!(conflicts[0].at_time.as_str(), "8-10");
    }

    #[test]
    fn one_existing_slot_hit_by_two_candidate_slots_is_reported_twice() {
        let existing = offering("A1", "Math", &[(Weekday::Monday, "8-10")]);
        let candidate = offering(
            "C1",
            "Physics",
            &[(Weekday::Monday, "8-9"), (Weekday::Monday, "9-10")],
        );
        assert_eq!(find_conflicts(&candidate, &[existing]).len(), 2);
    }

    #[test]
    fn order_follows_selection() {
        let a = offering("A1", "Math", &[(Weekday::Friday, "1-3")]);
        let b = offering("B1", "Chem", &[(Weekday::Monday, "1-2")]);
        let candidate = offering(
            "C1",
            "Bio",
            &[(Weekday::Monday, "1-3"), (Weekday::Friday, "2-3")],
        );
        let ids: Vec<_> = find_conflicts(&candidate, &[a, b])
            .into_iter()
            .map(|c| c.with_offering.unique_id)
            .collect();
        assert_eq!(ids, vec!["A1", "B1"]);
    }

    #[test]
    fn touching_slots_do_not_conflict() {
        let a = offering("A1", "Math", &[(Weekday::Monday, "8-9")]);
        let c = offering("C1", "Bio", &[(Weekday::Monday, "9-10")]);
        assert!(find_conflicts(&c, &[a.clone()]).is_empty());
        assert!(!has_conflict(&c, &[a]));
    }

    #[test]
    fn has_conflict_agrees_with_find_conflicts() {
        let selected = vec![
            offering("A1", "Math", &[(Weekday::Monday, "8-10")]),
            offering("B1", "Chem", &[(Weekday::Tuesday, "3-5")]),
        ];
        for (day, time) in [
            (Weekday::Monday, "9-10"),
            (Weekday::Tuesday, "1-3"),
            (Weekday::Tuesday, "4-5"),
            (Weekday::Saturday, "8-10"),
        ] {
            let c = offering("C1", "Bio", &[(day, time)]);
            assert_eq!(
                has_conflict(&c, &selected),
                !find_conflicts(&c, &selected).is_empty(),
                "{day} {time}"
            );
        }
    }

    #[test]
    fn message_lists_every_conflict() {
        let a = offering(
            "A1",
            "Math",
            &[(Weekday::Monday, "8-10"), (Weekday::Wednesday, "8-10")],
        );
        let c = offering(
            "C1",
            "Physics",
            &[(Weekday::Monday, "9-10"), (Weekday::Wednesday, "8-9")],
        );
        let conflicts = find_conflicts(&c, &[a]);
        let msg = conflict_message(&c, &conflicts);
        assert_eq!(
            msg,
            "Cannot add \"Physics\" due to conflicts:\n\n\
             \"Math\" (A1) is already scheduled on Monday at 8-10\n\
             \"Math\" (A1) is already scheduled on Wednesday at 8-10"
        );
    }
}
