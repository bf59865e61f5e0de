//! ICS file generation.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component};

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// One VEVENT to be written by the export pipeline
#[derive(Debug, Clone)]
pub struct ExportRecord {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Written as DTSTAMP, CREATED and LAST-MODIFIED
    pub stamp: DateTime<Utc>,
}

/// Generate a single .ics document holding every record
pub fn generate_calendar(records: &[ExportRecord]) -> String {
    let mut cal = Calendar::new();

    for record in records {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&record.uid);
        ics_event.summary(&record.summary);

        if !record.description.is_empty() {
            ics_event.description(&record.description);
        }

        let stamp = record.stamp.format(UTC_FORMAT).to_string();
        ics_event.add_property("DTSTAMP", &stamp);
        ics_event.add_property("CREATED", &stamp);
        ics_event.add_property("LAST-MODIFIED", &stamp);

        ics_event.add_property("DTSTART", record.start.format(UTC_FORMAT).to_string());
        ics_event.add_property("DTEND", record.end.format(UTC_FORMAT).to_string());

        cal.push(ics_event.done());
    }

    let cal = cal.done();
    finish_ics(&cal.to_string())
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with WEEKCAL and declare METHOD:PUBLISH after it
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn finish_ics(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len() + 16);

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:WEEKCAL\r\n");
            result.push_str("METHOD:PUBLISH\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
