//! Weekly time slots: the day/label pair every offering meets in.

mod label;
mod weekday;

pub use label::{overlaps, Interval, SlotLabel, ALL_TIME_SLOTS, ONE_HOUR_SLOTS, TWO_HOUR_SLOTS};
pub use weekday::Weekday;

use serde::{Deserialize, Serialize};
use std::fmt;

/// When an offering meets: a teaching day plus a slot label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: Weekday,
    pub time: SlotLabel,
}

impl TimeSlot {
    pub fn new(day: Weekday, time: impl Into<SlotLabel>) -> Self {
        Self {
            day,
            time: time.into(),
        }
    }

    /// Same day and overlapping hours.
    pub fn collides_with(&self, other: &TimeSlot) -> bool {
        self.day == other.day && overlaps(&self.time, &other.time)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_needs_same_day() {
        let mon = TimeSlot::new(Weekday::Monday, "8-10");
        let tue = TimeSlot::new(Weekday::Tuesday, "8-10");
        assert!(!mon.collides_with(&tue));
        assert!(mon.collides_with(&TimeSlot::new(Weekday::Monday, "9-10")));
        assert!(!mon.collides_with(&TimeSlot::new(Weekday::Monday, "10-11")));
    }

    #[test]
    fn deserializes_catalog_shape() {
        let slot: TimeSlot = serde_json::from_str(r#"{"day":"Monday","time":"8-10"}"#).unwrap();
        assert_eq!(slot, TimeSlot::new(Weekday::Monday, "8-10"));
    }
}
