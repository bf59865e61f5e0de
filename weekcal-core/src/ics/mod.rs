//! ICS file reading and writing.
//!
//! Reading goes through the icalendar crate's parser and stops at [`RawEvent`];
//! writing produces one VCALENDAR holding every exported record.
//!
//! [`RawEvent`]: crate::raw_event::RawEvent

mod generate;
mod parse;

pub use generate::{ExportRecord, generate_calendar};
pub use parse::read_events;
