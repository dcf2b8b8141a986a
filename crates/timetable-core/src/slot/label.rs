//! Slot labels and their numeric intervals.
//!
//! A label is `"<startHour>-<endHour>"` on a 12-hour clock without AM/PM
//! markers: hours 1-5 are afternoon (13:00-17:00), hours 6-12 are taken as
//! written. Two vocabularies coexist, two-hour blocks (`"8-10"`) and
//! one-hour sub-slots (`"8-9"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// One-hour sub-slots, in day order.
pub const ONE_HOUR_SLOTS: [&str; 8] = ["8-9", "9-10", "10-11", "11-12", "1-2", "2-3", "3-4", "4-5"];

/// Two-hour display blocks, in day order.
pub const TWO_HOUR_SLOTS: [&str; 4] = ["8-10", "10-12", "1-3", "3-5"];

/// Every label the catalog is expected to use.
pub const ALL_TIME_SLOTS: [&str; 12] = [
    "8-9", "9-10", "10-11", "11-12", "1-2", "2-3", "3-4", "4-5", "8-10", "10-12", "1-3", "3-5",
];

/// Normalized `[start, end)` in 24-hour hour units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Interval {
    pub start: u8,
    pub end: u8,
}

impl Interval {
    /// The zero-length interval malformed labels decode to.
    pub const DEGENERATE: Interval = Interval { start: 0, end: 0 };

    pub fn is_degenerate(&self) -> bool {
        self.start >= self.end
    }

    /// Half-open intersection. Touching endpoints do not intersect.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn hours(&self) -> u8 {
        self.end.saturating_sub(self.start)
    }
}

/// Hours 1-5 on the label clock mean 13-17.
fn normalize_hour(hour: u8) -> u8 {
    if (1..=5).contains(&hour) {
        hour + 12
    } else {
        hour
    }
}

/// Inverse of [`normalize_hour`] for label display.
fn display_hour(hour: u8) -> u8 {
    if hour > 12 {
        hour - 12
    } else {
        hour
    }
}

fn split_hours(raw: &str) -> Option<(u8, u8)> {
    let (start, end) = raw.split_once('-')?;
    let start = start.trim().parse::<u8>().ok()?;
    let end = end.trim().parse::<u8>().ok()?;
    Some((start, end))
}

/// A weekly time-slot label such as `"8-10"` or `"2-3"`.
///
/// Construction through [`SlotLabel::new`] never fails; a label that cannot
/// be decoded behaves as [`Interval::DEGENERATE`] and overlaps nothing.
/// [`SlotLabel::parse`] is the validating constructor used at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotLabel(String);

impl SlotLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Validate a label: both hours on the 1-12 clock and a forward interval
    /// once afternoon hours are shifted.
    ///
    /// The result is canonical (`"8 - 10"` and `"08-10"` both give `"8-10"`),
    /// so equal intervals compare equal as labels.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let (first, last) =
            split_hours(raw).ok_or_else(|| ValidationError::MalformedSlot(raw.to_string()))?;
        if !(1..=12).contains(&first) || !(1..=12).contains(&last) {
            return Err(ValidationError::MalformedSlot(raw.to_string()));
        }
        let (start, end) = (normalize_hour(first), normalize_hour(last));
        if start >= end {
            return Err(ValidationError::EmptySlot {
                label: raw.to_string(),
                start,
                end,
            });
        }
        Ok(Self(format!("{first}-{last}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Decode into 24-hour units; malformed labels give the degenerate interval.
    pub fn interval(&self) -> Interval {
        match split_hours(&self.0) {
            Some((start, end)) => Interval {
                start: normalize_hour(start),
                end: normalize_hour(end),
            },
            None => Interval::DEGENERATE,
        }
    }

    pub fn duration(&self) -> u8 {
        self.interval().hours()
    }

    pub fn is_one_hour(&self) -> bool {
        self.duration() == 1
    }

    pub fn is_two_hour(&self) -> bool {
        self.duration() == 2
    }

    /// Whether the two labels share any hour. Empty labels never overlap.
    pub fn overlaps(&self, other: &SlotLabel) -> bool {
        overlaps(self, other)
    }

    /// Constituent one-hour labels in order: `"8-10"` gives `["8-9", "9-10"]`.
    pub fn expand_to_hour_slots(&self) -> Vec<SlotLabel> {
        let Interval { start, end } = self.interval();
        (start..end)
            .map(|hour| {
                SlotLabel(format!(
                    "{}-{}",
                    display_hour(hour),
                    display_hour(hour + 1)
                ))
            })
            .collect()
    }

    /// Human-readable range, e.g. `"1:00 PM - 3:00 PM"`.
    pub fn display_label(&self) -> String {
        let Interval { start, end } = self.interval();
        format!("{} - {}", format_clock(start), format_clock(end))
    }
}

fn format_clock(hour: u8) -> String {
    match hour {
        12 => "12:00 PM".to_string(),
        h if h > 12 => format!("{}:00 PM", h - 12),
        h => format!("{h}:00 AM"),
    }
}

/// Half-open overlap of two labels on the same day.
///
/// `false` when either label is empty. Symmetric; `"8-9"` and `"9-10"` do
/// not overlap.
pub fn overlaps(a: &SlotLabel, b: &SlotLabel) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.interval().intersects(&b.interval())
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SlotLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for SlotLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
