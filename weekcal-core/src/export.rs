//! Write occurrences back out as an .ics file, placed on this week's days.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::WeekcalConfig;
use crate::error::{WeekcalError, WeekcalResult};
use crate::ics::{ExportRecord, generate_calendar};
use crate::occurrence::Occurrence;
use crate::week::{WeekWindow, current_week, resolve_local};

/// Export to the configured output path, on the days of the current local week.
///
/// Returns the path that was written.
pub fn export_events(occurrences: &[Occurrence], config: &WeekcalConfig) -> WeekcalResult<PathBuf> {
    let path = config.output_path()?;
    export_events_to(occurrences, &path, &current_week())?;
    Ok(path)
}

/// Write one VEVENT per occurrence to `path`, replacing any existing file.
///
/// Each occurrence keeps its time of day but is moved to its weekday within
/// `window`. Every VEVENT gets a fresh UID.
pub fn export_events_to<Tz: TimeZone>(
    occurrences: &[Occurrence],
    path: &Path,
    window: &WeekWindow<Tz>,
) -> WeekcalResult<()> {
    let stamp = Utc::now();
    let tz = window.timezone();

    let records = occurrences
        .iter()
        .map(|occ| to_record(occ, &tz, window, stamp))
        .collect::<WeekcalResult<Vec<_>>>()?;

    let ics = generate_calendar(&records);

    let write_error = |source| WeekcalError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(write_error)?;
    file.write_all(ics.as_bytes()).map_err(write_error)?;

    info!(path = %path.display(), count = records.len(), "Exported occurrences");
    Ok(())
}

fn to_record<Tz: TimeZone>(
    occ: &Occurrence,
    tz: &Tz,
    window: &WeekWindow<Tz>,
    stamp: DateTime<Utc>,
) -> WeekcalResult<ExportRecord> {
    let start_time = occ.start_at()?.time();
    let end_time = occ.end_at()?.time();

    let date = window.day(occ.weekday);
    // An end at or before the start time means the event runs past midnight
    let end_date = if end_time <= start_time {
        date + Days::new(1)
    } else {
        date
    };

    let start = place(tz, date, start_time);
    let end = place(tz, end_date, end_time);
    debug!(title = %occ.title, start = %start, end = %end, "Exporting occurrence");

    Ok(ExportRecord {
        uid: format!("{}@weekcal", Uuid::new_v4()),
        summary: occ.title.clone(),
        description: occ.description.clone(),
        start,
        end,
        stamp,
    })
}

fn place<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    resolve_local(tz, &date.and_time(time)).with_timezone(&Utc)
}
