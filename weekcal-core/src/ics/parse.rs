//! ICS file parsing using the icalendar crate's parser.

use chrono::{DateTime, Duration, Utc};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use rrule::Tz;
use tracing::{debug, warn};

use crate::error::{WeekcalError, WeekcalResult};
use crate::raw_event::{RawEvent, RawExdate, RawTime};
use crate::week::resolve_local;

/// Parse ICS content into one RawEvent per VEVENT
pub fn read_events(content: &str) -> WeekcalResult<Vec<RawEvent>> {
    if !content.contains("BEGIN:VCALENDAR") {
        return Err(WeekcalError::FormatParse("missing BEGIN:VCALENDAR".to_string()));
    }

    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| WeekcalError::FormatParse(e.to_string()))?;

    let events: Vec<RawEvent> = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(to_raw_event)
        .collect();

    debug!(count = events.len(), "Parsed VEVENTs");
    Ok(events)
}

fn to_raw_event(vevent: &Component) -> RawEvent {
    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .unwrap_or_default();

    let start = vevent.find_prop("DTSTART").and_then(read_time);
    let end = vevent.find_prop("DTEND").and_then(read_time);
    let duration = vevent
        .find_prop("DURATION")
        .and_then(|p| parse_duration(p.val.as_ref()));

    let summary = vevent.find_prop("SUMMARY").map(|p| unescape_text(p.val.as_ref()));
    let description = vevent
        .find_prop("DESCRIPTION")
        .map(|p| unescape_text(p.val.as_ref()));

    // Recurrence (RRULE, EXDATE)
    let rrule = vevent.find_prop("RRULE").map(|p| p.val.to_string());
    let exdates: Vec<RawExdate> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "EXDATE")
        .map(|p| RawExdate {
            value: p.val.to_string(),
            tzid: find_param(p, "TZID"),
        })
        .collect();

    RawEvent {
        uid,
        start,
        end,
        duration,
        summary,
        description,
        rrule,
        exdates,
    }
}

fn find_param(prop: &Property, key: &str) -> Option<String> {
    prop.params
        .iter()
        .find(|p| p.key == key)
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()))
}

/// Read DTSTART/DTEND, resolving the value into the event's own zone
fn read_time(prop: &Property) -> Option<RawTime> {
    match DatePerhapsTime::try_from(prop).ok()? {
        DatePerhapsTime::Date(d) => Some(RawTime::Date(d)),
        DatePerhapsTime::DateTime(cal_dt) => Some(RawTime::DateTime(resolve_date_time(cal_dt))),
    }
}

fn resolve_date_time(cal_dt: CalendarDateTime) -> DateTime<Tz> {
    match cal_dt {
        CalendarDateTime::Utc(dt) => {
            let tz: Tz = Utc.into();
            dt.with_timezone(&tz)
        }
        // Floating times belong to whoever reads them
        CalendarDateTime::Floating(naive) => resolve_local(&Tz::LOCAL, &naive),
        CalendarDateTime::WithTimezone { date_time, tzid } => {
            let tz = match tzid.parse::<chrono_tz::Tz>() {
                Ok(tz) => Tz::from(tz),
                Err(_) => {
                    warn!(tzid = %tzid, "Unknown TZID, reading time as local");
                    Tz::LOCAL
                }
            };
            resolve_local(&tz, &date_time)
        }
    }
}

/// Parse a DURATION value (`PT1H30M`, `P1D`, ...). Negative durations are ignored.
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim().trim_start_matches('+');
    if value.starts_with('-') {
        return None;
    }

    let duration = iso8601::duration(value).ok()?;
    let std_duration: std::time::Duration = duration.into();
    Duration::from_std(std_duration).ok()
}

/// Undo RFC 5545 TEXT escaping (`\n`, `\,`, `\;`, `\\`)
fn unescape_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => result.push('\n'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}
