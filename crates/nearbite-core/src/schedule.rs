//! Weekly operating-hour schedules.
//!
//! Resolves whether a place is open at an instant and groups a week of
//! schedules into compact display ranges (`"Mon - Fri"`, `"Sat - Sun"`).
//! All day and time-of-day decisions use the local wall clock of the
//! `DateTime` passed in, so callers choose the zone by choosing `Tz`.

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Weekday};
use serde::{Deserialize, Serialize};

/// Calendar order used for grouping. Never data-insertion order.
pub const WEEK_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One day's operating window as `"HH:MM"` strings.
///
/// When `closed` is set, `open` and `close` may hold stale values and are
/// ignored for open-status decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DaySchedule {
    pub open: String,
    pub close: String,
    #[serde(default)]
    pub closed: bool,
}

impl DaySchedule {
    #[must_use]
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_owned(),
            close: close.to_owned(),
            closed: false,
        }
    }

    #[must_use]
    pub fn closed_all_day() -> Self {
        Self {
            open: "00:00".to_owned(),
            close: "00:00".to_owned(),
            closed: true,
        }
    }

    /// Human-readable hours, e.g. `"9:00 AM - 10:00 PM"` or `"Closed"`.
    ///
    /// Falls back to the raw strings when either side does not parse.
    #[must_use]
    pub fn display_hours(&self) -> String {
        if self.closed {
            return "Closed".to_owned();
        }
        match (parse_hhmm(&self.open), parse_hhmm(&self.close)) {
            (Ok(open), Ok(close)) => format!(
                "{} - {}",
                open.format("%-I:%M %p"),
                close.format("%-I:%M %p")
            ),
            _ => format!("{} - {}", self.open, self.close),
        }
    }
}

/// A full week of schedules. All seven days are required by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday: DaySchedule,
}

impl WeeklySchedule {
    /// The same schedule on every day of the week.
    #[must_use]
    pub fn uniform(day: &DaySchedule) -> Self {
        Self {
            monday: day.clone(),
            tuesday: day.clone(),
            wednesday: day.clone(),
            thursday: day.clone(),
            friday: day.clone(),
            saturday: day.clone(),
            sunday: day.clone(),
        }
    }

    #[must_use]
    pub fn day(&self, day: Weekday) -> &DaySchedule {
        match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

/// A run of consecutive weekdays sharing one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleGroup {
    /// `"Mon"` for a single day, `"Mon - Fri"` for a run.
    pub day_range_label: String,
    pub schedule: DaySchedule,
    pub includes_today: bool,
}

/// Three-letter English abbreviation for a weekday.
#[must_use]
pub fn day_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Weekday of `now`'s local calendar day.
#[must_use]
pub fn current_day_key<Tz: TimeZone>(now: &DateTime<Tz>) -> Weekday {
    now.weekday()
}

#[must_use]
pub fn schedules_equal(d1: &DaySchedule, d2: &DaySchedule) -> bool {
    d1.open == d2.open && d1.close == d2.close && d1.closed == d2.closed
}

/// Group a week into runs of consecutive identical days, Monday first.
#[must_use]
pub fn group_week<Tz: TimeZone>(schedule: &WeeklySchedule, now: &DateTime<Tz>) -> Vec<ScheduleGroup> {
    let today = current_day_key(now);
    let mut groups = Vec::new();
    let mut run_start = 0;

    for (idx, day) in WEEK_ORDER.iter().enumerate().skip(1) {
        let first = schedule.day(WEEK_ORDER[run_start]);
        if !schedules_equal(first, schedule.day(*day)) {
            groups.push(build_group(schedule, &WEEK_ORDER[run_start..idx], today));
            run_start = idx;
        }
    }
    // The trailing run has no sentinel day after Sunday to close it.
    groups.push(build_group(schedule, &WEEK_ORDER[run_start..], today));

    groups
}

fn build_group(schedule: &WeeklySchedule, run: &[Weekday], today: Weekday) -> ScheduleGroup {
    let first = run[0];
    let last = run[run.len() - 1];
    let day_range_label = if first == last {
        day_abbrev(first).to_owned()
    } else {
        format!("{} - {}", day_abbrev(first), day_abbrev(last))
    };

    ScheduleGroup {
        day_range_label,
        schedule: schedule.day(first).clone(),
        includes_today: run.contains(&today),
    }
}

/// Whether a place with `schedule` is open at `now`.
///
/// - No schedule: `fallback`.
/// - Today marked closed: `false`.
/// - Otherwise the half-open window `[open, close)` of today's schedule:
///   open at exactly `open`, closed at exactly `close`. When `close` is not
///   after `open` the window wraps past midnight, so `18:00`-`02:00` covers
///   both the evening and the small hours of the same calendar day, and
///   `00:00`-`00:00` means open around the clock.
/// - Unparseable times: `fallback`.
#[must_use]
pub fn is_open_now<Tz: TimeZone>(
    schedule: Option<&WeeklySchedule>,
    now: &DateTime<Tz>,
    fallback: bool,
) -> bool {
    let Some(schedule) = schedule else {
        return fallback;
    };

    let today = schedule.day(current_day_key(now));
    if today.closed {
        return false;
    }

    let (open, close) = match (parse_hhmm(&today.open), parse_hhmm(&today.close)) {
        (Ok(open), Ok(close)) => (open, close),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(
                open = %today.open,
                close = %today.close,
                error = %e,
                "unparseable operating hours; using fallback open status"
            );
            return fallback;
        }
    };

    let time = now.time();
    if open < close {
        open <= time && time < close
    } else {
        time >= open || time < close
    }
}

/// Parses `"HH:MM"`, tolerating a trailing `":SS"` as some backends send it.
fn parse_hhmm(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
