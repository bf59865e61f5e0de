//! The Sunday-to-Sunday window that import and export operate on.

use chrono::{
    DateTime, Datelike, Days, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
};

use crate::occurrence::Weekday;

/// Half-open interval `[start, end)` from Sunday midnight to the next Sunday midnight
#[derive(Debug, Clone)]
pub struct WeekWindow<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> WeekWindow<Tz> {
    /// Whether `t` falls inside the window. `start` is included, `end` is not.
    pub fn contains<Tz2: TimeZone>(&self, t: &DateTime<Tz2>) -> bool {
        let t = t.naive_utc();
        t >= self.start.naive_utc() && t < self.end.naive_utc()
    }

    /// Re-express the window in another zone. The instants are unchanged.
    pub fn with_timezone<Tz2: TimeZone>(&self, tz: &Tz2) -> WeekWindow<Tz2> {
        WeekWindow {
            start: self.start.with_timezone(tz),
            end: self.end.with_timezone(tz),
        }
    }

    /// Local calendar date of `weekday` within this week
    pub fn day(&self, weekday: Weekday) -> NaiveDate {
        self.start.date_naive() + Days::new(u64::from(weekday.days_from_sunday()))
    }

    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }
}

/// Compute the week containing `now`, in `now`'s own zone.
pub fn resolve_week<Tz: TimeZone>(now: &DateTime<Tz>) -> WeekWindow<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();
    let sunday = today - Days::new(u64::from(today.weekday().num_days_from_sunday()));

    WeekWindow {
        start: local_midnight(&tz, sunday),
        end: local_midnight(&tz, sunday + Days::new(7)),
    }
}

/// The week containing the current wall-clock time
pub fn current_week() -> WeekWindow<Local> {
    resolve_week(&Local::now())
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    resolve_local(tz, &date.and_time(NaiveTime::MIN))
}

/// Resolve a wall-clock time in `tz`.
///
/// Ambiguous times take the earlier instant. Times skipped by a DST jump are
/// read with the offset in effect before the jump, so they land just after it.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> DateTime<Tz> {
    if let Some(dt) = tz.from_local_datetime(local).earliest() {
        return dt;
    }

    let before_gap = tz.offset_from_utc_datetime(&(*local - Duration::days(1))).fix();
    let utc = *local - Duration::seconds(i64::from(before_gap.local_minus_utc()));
    tz.from_utc_datetime(&utc)
}
