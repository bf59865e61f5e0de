//! Events as read from an .ics file, before expansion.

use chrono::{DateTime, Duration, NaiveDate};
use rrule::Tz;

/// DTSTART/DTEND value: a whole day, or an instant in the event's own zone
#[derive(Debug, Clone, PartialEq)]
pub enum RawTime {
    Date(NaiveDate),
    DateTime(DateTime<Tz>),
}

impl RawTime {
    pub fn is_date(&self) -> bool {
        matches!(self, RawTime::Date(_))
    }
}

/// A VEVENT reduced to the properties the expansion engine reads
#[derive(Debug, Clone, Default)]
pub struct RawEvent {
    pub uid: String,
    /// None when DTSTART is missing or could not be read
    pub start: Option<RawTime>,
    pub end: Option<RawTime>,
    /// DURATION, used when there is no DTEND
    pub duration: Option<Duration>,
    pub summary: Option<String>,
    pub description: Option<String>,
    /// RRULE value, e.g. `FREQ=WEEKLY;BYDAY=MO`
    pub rrule: Option<String>,
    /// One entry per EXDATE property
    pub exdates: Vec<RawExdate>,
}

/// An EXDATE property: its value text (possibly comma-separated) and TZID
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawExdate {
    pub value: String,
    pub tzid: Option<String>,
}

impl RawExdate {
    pub fn new(value: impl Into<String>) -> Self {
        RawExdate {
            value: value.into(),
            tzid: None,
        }
    }

    pub fn with_tzid(value: impl Into<String>, tzid: impl Into<String>) -> Self {
        RawExdate {
            value: value.into(),
            tzid: Some(tzid.into()),
        }
    }
}

impl RawEvent {
    pub fn new(uid: impl Into<String>) -> Self {
        RawEvent {
            uid: uid.into(),
            ..Default::default()
        }
    }

    /// Whole-day events have a date-only DTSTART
    pub fn is_all_day(&self) -> bool {
        self.start.as_ref().is_some_and(RawTime::is_date)
    }
}
