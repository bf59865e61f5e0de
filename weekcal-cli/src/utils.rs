use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, TimeZone};
use weekcal_core::{WeekWindow, current_week, resolve_week};

/// The week containing `week_of` (YYYY-MM-DD), or the current week.
pub fn week_window(week_of: Option<&str>) -> Result<WeekWindow<Local>> {
    let Some(text) = week_of else {
        return Ok(current_week());
    };

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", text))?;

    // Noon always exists, whatever the DST rules
    let noon = date
        .and_hms_opt(12, 0, 0)
        .and_then(|dt| Local.from_local_datetime(&dt).earliest())
        .with_context(|| format!("Could not resolve {} in the local timezone", text))?;

    Ok(resolve_week(&noon))
}
