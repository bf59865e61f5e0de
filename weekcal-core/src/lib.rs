//! Core of weekcal: import an .ics file as this week's occurrences, and export
//! occurrences back out.
//!
//! - `import` reads VEVENTs and expands them (recurrence, EXDATE, dedup) into
//!   the Sunday-to-Sunday week window
//! - `export` writes occurrences as VEVENTs placed on the current week's days
//! - `Weekcal` bundles both behind the loaded configuration

pub mod app;
pub mod config;
pub mod error;
pub mod exdate;
pub mod expand;
pub mod export;
pub mod ics;
pub mod import;
pub mod occurrence;
pub mod raw_event;
pub mod recurrence;
pub mod utils;
pub mod week;

pub use app::{ExportOutcome, Weekcal};
pub use config::WeekcalConfig;
pub use error::{WeekcalError, WeekcalResult};
pub use expand::{EventExpander, ExpandOptions};
pub use occurrence::{Color, Occurrence, OccurrenceTime, Source, Weekday};
pub use week::{WeekWindow, current_week, resolve_week};
