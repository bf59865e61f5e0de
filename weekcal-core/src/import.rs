//! Read an .ics file and expand it into this week's occurrences.

use std::path::Path;

use chrono::{DateTime, FixedOffset, TimeZone};
use tracing::{debug, info, warn};

use crate::error::{WeekcalError, WeekcalResult};
use crate::expand::{EventExpander, ExpandOptions};
use crate::ics::read_events;
use crate::occurrence::Occurrence;
use crate::week::{WeekWindow, current_week};

/// Import the occurrences of the current local week.
pub fn import_events(path: &Path, options: ExpandOptions) -> WeekcalResult<Vec<Occurrence>> {
    import_events_in(path, &current_week(), options)
}

/// Import the occurrences of `path` that start inside `window`.
///
/// Events with a broken RRULE are skipped with a warning. Any other failure
/// aborts the whole import. Output is sorted by start; ties keep file order.
pub fn import_events_in<Tz: TimeZone>(
    path: &Path,
    window: &WeekWindow<Tz>,
    options: ExpandOptions,
) -> WeekcalResult<Vec<Occurrence>> {
    let content = std::fs::read_to_string(path).map_err(|source| WeekcalError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let raw_events = read_events(&content)?;
    debug!(
        path = %path.display(),
        events = raw_events.len(),
        week_start = %window.start.naive_utc(),
        week_end = %window.end.naive_utc(),
        "Expanding events"
    );

    let expander = EventExpander::new(options);
    let mut occurrences = Vec::new();

    for raw in &raw_events {
        match expander.expand_event(raw, window) {
            Ok(expanded) => occurrences.extend(expanded),
            Err(e) if e.is_recoverable() => warn!(uid = %raw.uid, "Skipping event: {}", e),
            Err(e) => return Err(e),
        }
    }

    let mut keyed = occurrences
        .into_iter()
        .map(|occ| Ok((occ.start_at()?, occ)))
        .collect::<WeekcalResult<Vec<(DateTime<FixedOffset>, Occurrence)>>>()?;
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

    info!(path = %path.display(), count = keyed.len(), "Imported occurrences");
    Ok(keyed.into_iter().map(|(_, occ)| occ).collect())
}
