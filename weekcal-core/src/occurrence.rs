//! Occurrence types exchanged with the surrounding application.
//!
//! An [`Occurrence`] is one concrete, displayable instance of a calendar event
//! inside the current week. The JSON shape (field names, integer weekday,
//! lowercase color/source tags) is what the schedule UI consumes.

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{WeekcalError, WeekcalResult};

/// Start and end of an occurrence, as `YYYY-MM-DDTHH:MM:SS±HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceTime {
    pub start: String,
    pub end: String,
}

/// A concrete instance of an event within the week window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Source event UID, shared by all occurrences of a recurring event
    pub id: String,
    pub title: String,
    pub description: String,
    pub time: OccurrenceTime,
    pub weekday: Weekday,
    pub color: Color,
    pub source: Source,
}

impl Occurrence {
    pub fn start_at(&self) -> WeekcalResult<DateTime<FixedOffset>> {
        parse_timestamp(&self.time.start)
    }

    pub fn end_at(&self) -> WeekcalResult<DateTime<FixedOffset>> {
        parse_timestamp(&self.time.end)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Format a timestamp in the fixed offset-qualified profile.
///
/// UTC is written as `+00:00`, never `Z`.
pub fn format_timestamp<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    dt.fixed_offset().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parse a timestamp written by [`format_timestamp`] (any RFC 3339 value is accepted).
pub fn parse_timestamp(value: &str) -> WeekcalResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|source| WeekcalError::TimestampParse {
        value: value.to_string(),
        source,
    })
}

/// Day of the week, Sunday = 0 through Saturday = 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn days_from_sunday(self) -> u8 {
        self as u8
    }

    /// Two-letter RRULE code (SU, MO, ...)
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Sunday => "SU",
            Weekday::Monday => "MO",
            Weekday::Tuesday => "TU",
            Weekday::Wednesday => "WE",
            Weekday::Thursday => "TH",
            Weekday::Friday => "FR",
            Weekday::Saturday => "SA",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_sunday() as usize]
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.days_from_sunday()
    }
}

impl TryFrom<u8> for Weekday {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Weekday::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("Invalid weekday {value}, expected 0-6"))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Where an occurrence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Imported from an .ics file
    External,
    /// Created in the application
    Internal,
}

/// Palette of display colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Amber,
    #[default]
    Blue,
    Cyan,
    Emerald,
    Gray,
    Indigo,
    Orange,
    Pink,
    Purple,
    Teal,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Amber => "amber",
            Color::Blue => "blue",
            Color::Cyan => "cyan",
            Color::Emerald => "emerald",
            Color::Gray => "gray",
            Color::Indigo => "indigo",
            Color::Orange => "orange",
            Color::Pink => "pink",
            Color::Purple => "purple",
            Color::Teal => "teal",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_test_occurrence() -> Occurrence {
        Occurrence {
            id: "standup@example.com".to_string(),
            title: "Standup".to_string(),
            description: String::new(),
            time: OccurrenceTime {
                start: "2024-01-08T09:00:00+00:00".to_string(),
                end: "2024-01-08T09:15:00+00:00".to_string(),
            },
            weekday: Weekday::Monday,
            color: Color::Blue,
            source: Source::External,
        }
    }

    #[test]
    fn test_format_timestamp_uses_numeric_utc_offset() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(format_timestamp(&dt), "2024-01-01T10:00:00+00:00");

        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(format_timestamp(&dt), "2024-01-01T10:00:00-05:00");
    }

    #[test]
    fn test_occurrence_json_shape() {
        let json = serde_json::to_value(make_test_occurrence()).unwrap();

        assert_eq!(json["weekday"], 1, "weekday should serialize as an integer");
        assert_eq!(json["color"], "blue");
        assert_eq!(json["source"], "external");
        assert_eq!(json["time"]["start"], "2024-01-08T09:00:00+00:00");
    }

    #[test]
    fn test_weekday_rejects_out_of_range_integer() {
        let mut json = serde_json::to_value(make_test_occurrence()).unwrap();
        json["weekday"] = serde_json::json!(7);

        let result: Result<Occurrence, _> = serde_json::from_value(json);
        assert!(result.is_err(), "weekday 7 should not deserialize");
    }

    #[test]
    fn test_weekday_from_chrono() {
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
        assert_eq!(Weekday::from(chrono::Weekday::Sat), Weekday::Saturday);
        assert_eq!(Weekday::Wednesday.code(), "WE");
    }

    #[test]
    fn test_start_at_reports_bad_timestamp() {
        let mut occurrence = make_test_occurrence();
        occurrence.time.start = "next monday".to_string();

        match occurrence.start_at() {
            Err(WeekcalError::TimestampParse { value, .. }) => assert_eq!(value, "next monday"),
            other => panic!("Expected TimestampParse, got {:?}", other),
        }
    }
}
