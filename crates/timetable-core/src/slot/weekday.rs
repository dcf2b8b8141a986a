use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Teaching day. Sunday is not a teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All teaching days in week order.
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    /// Three-letter form used in narrow grid headers.
    pub fn short(&self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_ascii_lowercase();
                name == needle || (needle.len() == 3 && name.starts_with(&needle))
            })
            .ok_or_else(|| ValidationError::UnknownWeekday(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_short_names() {
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("sat".parse::<Weekday>().unwrap(), Weekday::Saturday);
        assert_eq!(" WEDNESDAY ".parse::<Weekday>().unwrap(), Weekday::Wednesday);
    }

    #[test]
    fn sunday_is_rejected() {
        assert!("Sunday".parse::<Weekday>().is_err());
        assert!("su".parse::<Weekday>().is_err());
    }

    #[test]
    fn serializes_as_english_name() {
        assert_eq!(serde_json::to_string(&Weekday::Friday).unwrap(), "\"Friday\"");
        let day: Weekday = serde_json::from_str("\"Tuesday\"").unwrap();
        assert_eq!(day, Weekday::Tuesday);
    }

    #[test]
    fn short_names() {
        assert_eq!(Weekday::Thursday.short(), "Thu");
    }
}
