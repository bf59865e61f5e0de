//! Turns raw events into the concrete occurrences of one week.
//!
//! Each raw event goes through the same pipeline: whole-day guard, start/end
//! resolution, text cleanup, then either recurrence expansion (with EXDATE
//! filtering and deduplication) or a single window check.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rrule::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{WeekcalError, WeekcalResult};
use crate::exdate::{ExclusionSet, ExdateMatching};
use crate::occurrence::{Color, Occurrence, OccurrenceTime, Source, format_timestamp};
use crate::raw_event::{RawEvent, RawTime};
use crate::recurrence::RecurrenceRule;
use crate::utils::sanitize_text;
use crate::week::WeekWindow;

/// Policy knobs for [`EventExpander`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandOptions {
    /// Drop events whose DTSTART is a date rather than a date-time
    pub exclude_all_day: bool,
    /// Color given to every imported occurrence
    pub default_color: Color,
    pub exdate_matching: ExdateMatching,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        ExpandOptions {
            exclude_all_day: true,
            default_color: Color::Blue,
            exdate_matching: ExdateMatching::CalendarFields,
        }
    }
}

/// Expands raw events into occurrences within a week window
#[derive(Debug, Clone, Default)]
pub struct EventExpander {
    options: ExpandOptions,
}

impl EventExpander {
    pub fn new(options: ExpandOptions) -> Self {
        EventExpander { options }
    }

    /// Occurrences of `raw` that start inside `window`, possibly none.
    ///
    /// Fails with `TimeExtraction` when the event has no start, and with
    /// `RuleParse`/`RuleConstruction` when its RRULE is unusable.
    pub fn expand_event<W: TimeZone>(
        &self,
        raw: &RawEvent,
        window: &WeekWindow<W>,
    ) -> WeekcalResult<Vec<Occurrence>> {
        if raw.is_all_day() && self.options.exclude_all_day {
            debug!(uid = %raw.uid, "Skipping all-day event");
            return Ok(Vec::new());
        }

        let (start, end) = resolve_span(raw)?;

        let title = raw.summary.as_deref().map(sanitize_text).unwrap_or_default();
        let description = raw
            .description
            .as_deref()
            .map(sanitize_text)
            .unwrap_or_default();

        let Some(rule_text) = &raw.rrule else {
            if !window.contains(&start) {
                return Ok(Vec::new());
            }
            debug!(uid = %raw.uid, title = %title, start = %start, "Including event");
            return Ok(vec![self.build_occurrence(&raw.uid, &title, &description, &start, &end)]);
        };

        let rule = RecurrenceRule::parse(rule_text).map_err(|e| e.for_event(&raw.uid))?;
        let instants = rule
            .materialize(&start, window)
            .map_err(|e| e.for_event(&raw.uid))?;

        let exclusions = ExclusionSet::from_exdates(&raw.exdates, self.options.exdate_matching);
        let duration = end.clone() - start.clone();

        let kept = instants.into_iter().filter(|occ| {
            let excluded = exclusions.is_excluded(occ);
            if excluded {
                debug!(uid = %raw.uid, occurrence = %occ, "Skipping occurrence listed in EXDATE");
            }
            !excluded
        });

        let mut occurrences = Vec::new();
        for occ in dedup_instants(&title, kept) {
            let occ_end = occ.clone() + duration;
            debug!(uid = %raw.uid, title = %title, start = %occ, end = %occ_end, "Including occurrence");
            occurrences.push(self.build_occurrence(&raw.uid, &title, &description, &occ, &occ_end));
        }

        Ok(occurrences)
    }

    fn build_occurrence(
        &self,
        uid: &str,
        title: &str,
        description: &str,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> Occurrence {
        Occurrence {
            id: uid.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            time: OccurrenceTime {
                start: format_timestamp(start),
                end: format_timestamp(end),
            },
            weekday: start.weekday().into(),
            color: self.options.default_color,
            source: Source::External,
        }
    }
}

/// Drop repeated `(title, start instant)` pairs, keeping the first of each in order.
fn dedup_instants<I>(title: &str, instants: I) -> Vec<DateTime<Tz>>
where
    I: IntoIterator<Item = DateTime<Tz>>,
{
    let mut seen: HashSet<(String, DateTime<Utc>)> = HashSet::new();

    instants
        .into_iter()
        .filter(|occ| seen.insert((title.to_string(), occ.with_timezone(&Utc))))
        .collect()
}

/// Start and end of the event; the end is always after the start.
fn resolve_span(raw: &RawEvent) -> WeekcalResult<(DateTime<Tz>, DateTime<Tz>)> {
    let start = match &raw.start {
        Some(RawTime::DateTime(dt)) => dt.clone(),
        Some(RawTime::Date(d)) => utc_midnight(*d),
        None => {
            return Err(WeekcalError::TimeExtraction {
                uid: raw.uid.clone(),
            });
        }
    };

    let default_length = if raw.is_all_day() {
        Duration::days(1)
    } else {
        Duration::hours(1)
    };

    let end = match &raw.end {
        Some(RawTime::DateTime(dt)) => Some(dt.clone()),
        Some(RawTime::Date(d)) => start
            .timezone()
            .from_local_datetime(&d.and_time(NaiveTime::MIN))
            .earliest(),
        None => raw.duration.map(|d| start.clone() + d),
    }
    .filter(|end| *end > start)
    .unwrap_or_else(|| start.clone() + default_length);

    Ok((start, end))
}

/// Whole days are placed at midnight UTC
fn utc_midnight(date: NaiveDate) -> DateTime<Tz> {
    let tz: Tz = Utc.into();
    tz.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occurrence::Weekday;
    use crate::raw_event::RawExdate;
    use crate::week::resolve_week;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        let tz: Tz = Utc.into();
        tz.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn week_of_jan_7() -> WeekWindow<Utc> {
        resolve_week(&Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap())
    }

    fn make_test_event(start: DateTime<Tz>) -> RawEvent {
        let end = start.clone() + Duration::hours(1);
        RawEvent {
            uid: "standup@example.com".to_string(),
            start: Some(RawTime::DateTime(start)),
            end: Some(RawTime::DateTime(end)),
            summary: Some("Standup".to_string()),
            ..Default::default()
        }
    }

    fn make_weekly_event() -> RawEvent {
        let mut raw = make_test_event(utc(2024, 1, 1, 9, 0));
        raw.rrule = Some("FREQ=WEEKLY;BYDAY=MO".to_string());
        raw
    }

    #[test]
    fn test_weekly_rule_scenario() {
        let occurrences = EventExpander::default()
            .expand_event(&make_weekly_event(), &week_of_jan_7())
            .unwrap();

        assert_eq!(occurrences.len(), 1, "Got: {:?}", occurrences);
        let occ = &occurrences[0];
        assert_eq!(occ.time.start, "2024-01-08T09:00:00+00:00");
        assert_eq!(occ.time.end, "2024-01-08T10:00:00+00:00");
        assert_eq!(occ.weekday, Weekday::Monday);
        assert_eq!(occ.id, "standup@example.com");
        assert_eq!(occ.color, Color::Blue);
        assert_eq!(occ.source, Source::External);
    }

    #[test]
    fn test_exdate_removes_weekly_occurrence() {
        let mut raw = make_weekly_event();
        raw.exdates = vec![RawExdate::new("20240108T090000")];

        let occurrences = EventExpander::default()
            .expand_event(&raw, &week_of_jan_7())
            .unwrap();

        assert!(occurrences.is_empty(), "Got: {:?}", occurrences);
    }

    #[test]
    fn test_tzid_exdate_removes_occurrence_with_instant_matching() {
        let new_york: Tz = chrono_tz::America::New_York.into();
        let mut raw = make_test_event(new_york.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        raw.rrule = Some("FREQ=WEEKLY;BYDAY=MO".to_string());
        raw.exdates = vec![RawExdate::with_tzid("20240108T140000", "Europe/London")];
        let week = week_of_jan_7();

        let instant = EventExpander::new(ExpandOptions {
            exdate_matching: ExdateMatching::Instant,
            ..Default::default()
        });
        assert!(instant.expand_event(&raw, &week).unwrap().is_empty());

        let fields = EventExpander::default().expand_event(&raw, &week).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].time.start, "2024-01-08T09:00:00-05:00");
    }

    #[test]
    fn test_missing_end_defaults_to_one_hour() {
        let mut raw = make_test_event(utc(2024, 1, 1, 10, 0));
        raw.end = None;
        let week = resolve_week(&Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let occurrences = EventExpander::default().expand_event(&raw, &week).unwrap();

        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].time.start, "2024-01-01T10:00:00+00:00");
        assert_eq!(occurrences[0].time.end, "2024-01-01T11:00:00+00:00");
    }

    #[test]
    fn test_duration_used_when_no_end() {
        let mut raw = make_test_event(utc(2024, 1, 9, 15, 0));
        raw.end = None;
        raw.duration = Some(Duration::minutes(45));

        let occurrences = EventExpander::default()
            .expand_event(&raw, &week_of_jan_7())
            .unwrap();

        assert_eq!(occurrences[0].time.end, "2024-01-09T15:45:00+00:00");
    }

    #[test]
    fn test_end_before_start_falls_back_to_one_hour() {
        let mut raw = make_test_event(utc(2024, 1, 9, 15, 0));
        raw.end = Some(RawTime::DateTime(utc(2024, 1, 9, 14, 0)));

        let occurrences = EventExpander::default()
            .expand_event(&raw, &week_of_jan_7())
            .unwrap();

        assert_eq!(occurrences[0].time.end, "2024-01-09T16:00:00+00:00");
    }

    #[test]
    fn test_recurring_duration_is_preserved() {
        let mut raw = make_weekly_event();
        raw.end = Some(RawTime::DateTime(utc(2024, 1, 1, 9, 45)));

        let occurrences = EventExpander::default()
            .expand_event(&raw, &week_of_jan_7())
            .unwrap();

        assert_eq!(occurrences[0].time.end, "2024-01-08T09:45:00+00:00");
    }

    #[test]
    fn test_all_day_events_are_excluded() {
        let raw = RawEvent {
            uid: "holiday".to_string(),
            start: Some(RawTime::Date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())),
            summary: Some("Holiday".to_string()),
            ..Default::default()
        };

        let occurrences = EventExpander::default()
            .expand_event(&raw, &week_of_jan_7())
            .unwrap();
        assert!(occurrences.is_empty());

        let mut recurring = raw.clone();
        recurring.rrule = Some("FREQ=DAILY".to_string());
        let occurrences = EventExpander::default()
            .expand_event(&recurring, &week_of_jan_7())
            .unwrap();
        assert!(occurrences.is_empty());
    }

    #[test]
    fn test_all_day_events_kept_when_policy_disabled() {
        let raw = RawEvent {
            uid: "holiday".to_string(),
            start: Some(RawTime::Date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())),
            summary: Some("Holiday".to_string()),
            ..Default::default()
        };
        let expander = EventExpander::new(ExpandOptions {
            exclude_all_day: false,
            ..Default::default()
        });

        let occurrences = expander.expand_event(&raw, &week_of_jan_7()).unwrap();

        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].time.start, "2024-01-10T00:00:00+00:00");
        assert_eq!(occurrences[0].time.end, "2024-01-11T00:00:00+00:00");
        assert_eq!(occurrences[0].weekday, Weekday::Wednesday);
    }

    #[test]
    fn test_single_event_window_boundaries() {
        let week = week_of_jan_7();
        let expander = EventExpander::default();

        let at_start = make_test_event(utc(2024, 1, 7, 0, 0));
        assert_eq!(expander.expand_event(&at_start, &week).unwrap().len(), 1);

        let at_end = make_test_event(utc(2024, 1, 14, 0, 0));
        assert!(expander.expand_event(&at_end, &week).unwrap().is_empty());

        let before = make_test_event(utc(2024, 1, 6, 23, 59));
        assert!(expander.expand_event(&before, &week).unwrap().is_empty());
    }

    #[test]
    fn test_missing_start_is_time_extraction_error() {
        let raw = RawEvent::new("broken");

        let result = EventExpander::default().expand_event(&raw, &week_of_jan_7());
        assert!(
            matches!(result, Err(WeekcalError::TimeExtraction { ref uid }) if uid == "broken"),
            "Got: {:?}",
            result
        );
    }

    #[test]
    fn test_bad_rule_is_recoverable_error() {
        let mut raw = make_weekly_event();
        raw.rrule = Some("FREQ=SOMETIMES".to_string());

        let err = EventExpander::default()
            .expand_event(&raw, &week_of_jan_7())
            .unwrap_err();
        assert!(matches!(err, WeekcalError::RuleParse { .. }), "Got: {:?}", err);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_expansion_is_idempotent_and_deduplicated() {
        let mut raw = make_test_event(utc(2024, 1, 1, 9, 0));
        raw.rrule = Some("FREQ=DAILY;BYHOUR=9,13".to_string());
        let expander = EventExpander::default();
        let week = week_of_jan_7();

        let first = expander.expand_event(&raw, &week).unwrap();
        let second = expander.expand_event(&raw, &week).unwrap();

        assert_eq!(first.len(), 14);
        let mut first_starts: Vec<_> = first.iter().map(|o| o.time.start.clone()).collect();
        let mut second_starts: Vec<_> = second.iter().map(|o| o.time.start.clone()).collect();
        first_starts.sort();
        second_starts.sort();
        assert_eq!(first_starts, second_starts);

        let unique: HashSet<_> = first.iter().map(|o| (&o.title, &o.time.start)).collect();
        assert_eq!(unique.len(), first.len());
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let new_york: Tz = chrono_tz::America::New_York.into();
        let nine = utc(2024, 1, 8, 14, 0);
        let one = utc(2024, 1, 8, 18, 0);
        // Same instant as `nine`, expressed in another zone
        let nine_in_new_york = new_york.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap();

        let kept = dedup_instants(
            "Standup",
            vec![one.clone(), nine.clone(), nine_in_new_york, one.clone(), nine.clone()],
        );

        assert_eq!(kept, vec![one, nine]);
    }

    #[test]
    fn test_occurrences_are_in_chronological_order() {
        let mut raw = make_test_event(utc(2024, 1, 1, 9, 0));
        raw.rrule = Some("FREQ=DAILY".to_string());

        let occurrences = EventExpander::default()
            .expand_event(&raw, &week_of_jan_7())
            .unwrap();

        let weekdays: Vec<u8> = occurrences.iter().map(|o| o.weekday.into()).collect();
        assert_eq!(weekdays, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_weekday_uses_event_timezone() {
        // Monday 08:00 in Auckland is Sunday 19:00 UTC
        let tz: Tz = chrono_tz::Pacific::Auckland.into();
        let start = tz.with_ymd_and_hms(2024, 1, 8, 8, 0, 0).unwrap();

        let occurrences = EventExpander::default()
            .expand_event(&make_test_event(start), &week_of_jan_7())
            .unwrap();

        assert_eq!(occurrences[0].weekday, Weekday::Monday);
        assert_eq!(occurrences[0].time.start, "2024-01-08T08:00:00+13:00");
    }

    #[test]
    fn test_text_is_sanitized() {
        let mut raw = make_test_event(utc(2024, 1, 9, 9, 0));
        raw.summary = Some("Team/Sync#1\n".to_string());
        raw.description = Some("  Agenda:\r\n#1 review  ".to_string());

        let occurrences = EventExpander::default()
            .expand_event(&raw, &week_of_jan_7())
            .unwrap();

        assert_eq!(occurrences[0].title, "Team-Sync-1");
        assert_eq!(occurrences[0].description, "Agenda:  -1 review");
    }

    #[test]
    fn test_default_color_comes_from_options() {
        let expander = EventExpander::new(ExpandOptions {
            default_color: Color::Teal,
            ..Default::default()
        });

        let occurrences = expander
            .expand_event(&make_test_event(utc(2024, 1, 9, 9, 0)), &week_of_jan_7())
            .unwrap();

        assert_eq!(occurrences[0].color, Color::Teal);
    }
}
