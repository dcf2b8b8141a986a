//! Course offerings as delivered by the catalog.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::slot::{SlotLabel, TimeSlot, Weekday};

/// Credit range the catalog owner accepts.
pub const MIN_CREDITS: u32 = 1;
pub const MAX_CREDITS: u32 = 10;

/// One schedulable instance of a subject (one staff/time combination).
///
/// Field names follow the catalog wire format (`uniqueId`, `courseName`, ...).
/// Extra fields the catalog attaches, such as database ids or timestamps,
/// are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    pub unique_id: String,
    pub course_name: String,
    pub display_name: String,
    pub staff: String,
    pub credits: u32,
    pub slots: Vec<TimeSlot>,
}

impl Offering {
    pub fn new(
        unique_id: impl Into<String>,
        course_name: impl Into<String>,
        display_name: impl Into<String>,
        staff: impl Into<String>,
        credits: u32,
        slots: Vec<TimeSlot>,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            course_name: course_name.into(),
            display_name: display_name.into(),
            staff: staff.into(),
            credits,
            slots,
        }
    }

    /// Check the record before it is admitted to a catalog.
    ///
    /// # Errors
    /// Returns the first problem found: blank identifiers, credits outside
    /// 1..=10, no slots, or a slot label that is not a forward interval.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("uniqueId", &self.unique_id),
            ("courseName", &self.course_name),
            ("displayName", &self.display_name),
            ("staff", &self.staff),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "must not be blank".to_string(),
                });
            }
        }

        if !(MIN_CREDITS..=MAX_CREDITS).contains(&self.credits) {
            return Err(ValidationError::InvalidValue {
                field: "credits".to_string(),
                message: format!(
                    "{} is outside {MIN_CREDITS}..={MAX_CREDITS}",
                    self.credits
                ),
            });
        }

        if self.slots.is_empty() {
            return Err(ValidationError::EmptyCollection(format!(
                "slots of offering '{}'",
                self.unique_id
            )));
        }

        for slot in &self.slots {
            SlotLabel::parse(slot.time.as_str())?;
        }
        Ok(())
    }

    /// [`Offering::validate`], then rewrite every slot label in canonical form.
    ///
    /// # Errors
    /// Same as [`Offering::validate`].
    pub fn into_canonical(mut self) -> Result<Self, ValidationError> {
        self.validate()?;
        for slot in &mut self.slots {
            slot.time = SlotLabel::parse(slot.time.as_str())?;
        }
        Ok(self)
    }

    /// Any pair of slots shares a day and an hour.
    pub fn overlaps_with(&self, other: &Offering) -> bool {
        self.slots
            .iter()
            .any(|mine| other.slots.iter().any(|theirs| mine.collides_with(theirs)))
    }

    pub fn slots_on(&self, day: Weekday) -> impl Iterator<Item = &TimeSlot> + '_ {
        self.slots.iter().filter(move |slot| slot.day == day)
    }

    pub fn same_subject_as(&self, other: &Offering) -> bool {
        self.course_name == other.course_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offering(slots: Vec<TimeSlot>) -> Offering {
        Offering::new("CS101-A", "CS101", "Intro to Programming", "Dr. Rao", 4, slots)
    }

    #[test]
    fn decodes_catalog_record_and_ignores_extra_fields() {
        let json = r#"{
            "_id": "66b0c0ffee",
            "uniqueId": "MA201-B",
            "courseName": "MA201",
            "displayName": "Linear Algebra",
            "staff": "Prof. Iyer",
            "credits": 3,
            "slots": [{"day": "Tuesday", "time": "10-12"}],
            "createdAt": "2025-01-01T00:00:00Z"
        }"#;
        let parsed: Offering = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.unique_id, "MA201-B");
        assert_eq!(parsed.slots[0].day, Weekday::Tuesday);
        assert_eq!(parsed.slots[0].time.as_str(), "10-12");
    }

    #[test]
    fn validate_accepts_well_formed_record() {
        let o = offering(vec![TimeSlot::new(Weekday::Monday, "8-10")]);
        assert!(o.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_records() {
        let mut o = offering(vec![TimeSlot::new(Weekday::Monday, "8-10")]);
        o.credits = 0;
        assert!(o.validate().is_err());

        let o = offering(vec![]);
        assert!(matches!(o.validate(), Err(ValidationError::EmptyCollection(_))));

        let o = offering(vec![TimeSlot::new(Weekday::Monday, "8 to 10")]);
        assert!(matches!(o.validate(), Err(ValidationError::MalformedSlot(_))));

        let mut o = offering(vec![TimeSlot::new(Weekday::Monday, "8-10")]);
        o.staff = "  ".into();
        assert!(matches!(
            o.validate(),
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "staff"
        ));
    }

    #[test]
    fn into_canonical_rewrites_labels() {
        let o = offering(vec![
            TimeSlot::new(Weekday::Monday, "8 - 10"),
            TimeSlot::new(Weekday::Friday, "03-5"),
        ])
        .into_canonical()
        .unwrap();
        assert_eq!(o.slots[0].time.as_str(), "8-10");
        assert_eq!(o.slots[1].time.as_str(), "3-5");

        let bad = offering(vec![TimeSlot::new(Weekday::Monday, "8 to 10")]);
        assert!(bad.into_canonical().is_err());
    }

    #[test]
    fn overlaps_with_checks_day_and_time() {
        let a = offering(vec![TimeSlot::new(Weekday::Monday, "8-10")]);
        let b = offering(vec![
            TimeSlot::new(Weekday::Tuesday, "8-10"),
            TimeSlot::new(Weekday::Monday, "9-10"),
        ]);
        let c = offering(vec![TimeSlot::new(Weekday::Monday, "10-12")]);
        assert!(a.overlaps_with(&b));
        assert!(!a.overlaps_with(&c));
    }
}
