//! RRULE expansion for recurring events.
//!
//! Rule text is parsed by the `rrule` crate and materialized against the event's
//! own DTSTART, bounded by the week window rather than by the rule's UNTIL.

use chrono::{DateTime, Duration, TimeZone};
use rrule::{RRule, Tz, Unvalidated};
use thiserror::Error;
use tracing::warn;

use crate::error::WeekcalError;
use crate::week::WeekWindow;

/// Upper bound on occurrences returned for a single window
const MAX_OCCURRENCES: u16 = 1000;

/// Why a rule could not be turned into occurrences
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("invalid rule text: {0}")]
    Parse(String),

    #[error("invalid rule options: {0}")]
    Construction(String),
}

impl RuleError {
    /// Attach the UID of the event the rule belongs to.
    pub fn for_event(self, uid: &str) -> WeekcalError {
        match self {
            RuleError::Parse(message) => WeekcalError::RuleParse {
                uid: uid.to_string(),
                message,
            },
            RuleError::Construction(message) => WeekcalError::RuleConstruction {
                uid: uid.to_string(),
                message,
            },
        }
    }
}

/// A parsed RRULE, not yet bound to a start time
#[derive(Debug, Clone)]
pub struct RecurrenceRule {
    rule: RRule<Unvalidated>,
}

impl RecurrenceRule {
    /// Parse an RRULE value such as `FREQ=WEEKLY;BYDAY=MO`.
    ///
    /// Any UNTIL part is dropped before parsing: UNTIL values found in the wild
    /// are unreliable, and the window already bounds the output.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let cleaned = strip_until(text);
        let rule = cleaned
            .parse::<RRule<Unvalidated>>()
            .map_err(|e| RuleError::Parse(e.to_string()))?;

        Ok(RecurrenceRule { rule })
    }

    /// Occurrences of this rule, anchored at `anchor`, that fall in `[window.start, window.end)`.
    ///
    /// The window is converted into the anchor's zone first, so BYDAY/BYHOUR
    /// parts are evaluated in the rule's own timezone. Results are sorted.
    pub fn materialize<Tz2: TimeZone>(
        &self,
        anchor: &DateTime<Tz>,
        window: &WeekWindow<Tz2>,
    ) -> Result<Vec<DateTime<Tz>>, RuleError> {
        let window = window.with_timezone(&anchor.timezone());

        let rrule_set = self
            .rule
            .clone()
            .build(anchor.clone())
            .map_err(|e| RuleError::Construction(e.to_string()))?;

        // Query one second wider on both sides; the half-open filter below decides.
        let result = rrule_set
            .after(window.start.clone() - Duration::seconds(1))
            .before(window.end.clone() + Duration::seconds(1))
            .all(MAX_OCCURRENCES);

        if result.limited {
            warn!(
                limit = MAX_OCCURRENCES,
                "Recurrence produced too many occurrences in one week, output truncated"
            );
        }

        Ok(result
            .dates
            .into_iter()
            .filter(|occ| window.contains(occ))
            .collect())
    }
}

/// Parse `rule_text` and materialize it in one call.
pub fn expand<Tz2: TimeZone>(
    rule_text: &str,
    anchor: &DateTime<Tz>,
    window: &WeekWindow<Tz2>,
) -> Result<Vec<DateTime<Tz>>, RuleError> {
    RecurrenceRule::parse(rule_text)?.materialize(anchor, window)
}

fn strip_until(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix("RRULE:").unwrap_or(text);

    text.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty() && !part.to_ascii_uppercase().starts_with("UNTIL="))
        .collect::<Vec<_>>()
        .join(";")
}
