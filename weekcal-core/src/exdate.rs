//! EXDATE handling for recurring events.
//!
//! EXDATE values show up in several textual shapes depending on the producer.
//! Each value is tried against a fixed list of formats; values that match none
//! are dropped, so one bad EXDATE never breaks the rest of the recurrence.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::raw_event::RawExdate;
use crate::week::resolve_local;

/// How an occurrence is compared with an exclusion date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExdateMatching {
    /// Compare year/month/day/hour/minute/second as written, ignoring zones.
    /// Matches the behavior of earlier releases.
    #[default]
    CalendarFields,
    /// Compare absolute instants. Dates with a TZID are read in that zone;
    /// dates with neither offset nor TZID are read in the occurrence's zone.
    Instant,
}

/// A single parsed EXDATE value
#[derive(Debug, Clone, PartialEq)]
pub enum ExclusionDate {
    /// Carried an explicit offset (RFC 3339, a trailing `Z`, or a TZID)
    Zoned(DateTime<FixedOffset>),
    /// Date-only or local date-time without offset
    Floating(NaiveDateTime),
}

impl ExclusionDate {
    /// Parse one EXDATE value, trying in order:
    /// - `2024-01-08T09:00:00+00:00` (RFC 3339)
    /// - `20240108` (date only, midnight)
    /// - `20240108T090000` (local date-time)
    /// - `20240108T090000Z` (UTC)
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(ExclusionDate::Zoned(dt));
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y%m%d") {
            return Some(ExclusionDate::Floating(date.and_time(NaiveTime::MIN)));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y%m%dT%H%M%S") {
            return Some(ExclusionDate::Floating(dt));
        }
        text.strip_suffix('Z')
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S").ok())
            .map(|dt| ExclusionDate::Zoned(dt.and_utc().fixed_offset()))
    }

    /// Read a floating value as wall-clock time in `tz`. Zoned values are kept.
    fn in_zone(self, tz: &chrono_tz::Tz) -> Self {
        match self {
            ExclusionDate::Floating(dt) => ExclusionDate::Zoned(resolve_local(tz, &dt).fixed_offset()),
            zoned => zoned,
        }
    }

    /// Calendar fields as written, without zone conversion
    fn fields(&self) -> NaiveDateTime {
        match self {
            ExclusionDate::Zoned(dt) => dt.naive_local(),
            ExclusionDate::Floating(dt) => *dt,
        }
    }

    fn matches<Tz: TimeZone>(&self, occurrence: &DateTime<Tz>, matching: ExdateMatching) -> bool {
        match matching {
            ExdateMatching::CalendarFields => same_fields(&self.fields(), &occurrence.naive_local()),
            ExdateMatching::Instant => match self {
                ExclusionDate::Zoned(dt) => dt.naive_utc() == occurrence.naive_utc(),
                ExclusionDate::Floating(dt) => occurrence
                    .timezone()
                    .from_local_datetime(dt)
                    .earliest()
                    .is_some_and(|ex| ex.naive_utc() == occurrence.naive_utc()),
            },
        }
    }
}

fn same_fields(a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
    a.date() == b.date() && a.hour() == b.hour() && a.minute() == b.minute() && a.second() == b.second()
}

/// All exclusion dates of one event
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    dates: Vec<ExclusionDate>,
    matching: ExdateMatching,
}

impl ExclusionSet {
    /// Parse the EXDATE properties of one event. A value may hold several
    /// comma-separated dates; a TZID applies to all of them.
    pub fn from_exdates(exdates: &[RawExdate], matching: ExdateMatching) -> Self {
        let mut dates = Vec::new();

        for exdate in exdates {
            let tz = exdate.tzid.as_deref().and_then(|tzid| match tzid.parse::<chrono_tz::Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    warn!(tzid = %tzid, "Unknown EXDATE TZID, reading value as floating");
                    None
                }
            });

            for part in exdate.value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                match ExclusionDate::parse(part) {
                    Some(date) => dates.push(match &tz {
                        Some(tz) => date.in_zone(tz),
                        None => date,
                    }),
                    None => debug!(exdate = part, "Ignoring unparseable EXDATE"),
                }
            }
        }

        ExclusionSet { dates, matching }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_excluded<Tz: TimeZone>(&self, occurrence: &DateTime<Tz>) -> bool {
        self.dates.iter().any(|ex| ex.matches(occurrence, self.matching))
    }
}
