use chrono::{Duration, FixedOffset, Utc};

use super::*;

/// 2024-06-03 is a Monday. `day` offsets from it, so `at(5, ..)` is Saturday.
fn at(day: i64, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    let tz = FixedOffset::east_opt(0).expect("valid offset");
    tz.with_ymd_and_hms(2024, 6, 3, hour, minute, 0)
        .single()
        .expect("unambiguous timestamp")
        + Duration::days(day)
}

fn weekdays_and_weekend() -> WeeklySchedule {
    let mut week = WeeklySchedule::uniform(&DaySchedule::new("09:00", "22:00"));
    week.saturday = DaySchedule::new("10:00", "23:00");
    week.sunday = DaySchedule::new("10:00", "23:00");
    week
}

fn labels(groups: &[ScheduleGroup]) -> Vec<&str> {
    groups.iter().map(|g| g.day_range_label.as_str()).collect()
}

#[test]
fn current_day_key_follows_calendar() {
    assert_eq!(current_day_key(&at(0, 12, 0)), Weekday::Mon);
    assert_eq!(current_day_key(&at(4, 12, 0)), Weekday::Fri);
    assert_eq!(current_day_key(&at(6, 12, 0)), Weekday::Sun);
}

#[test]
fn current_day_key_uses_local_calendar_day() {
    // Sunday 23:30 UTC is already Monday in UTC+02:00.
    let utc = Utc
        .with_ymd_and_hms(2024, 6, 2, 23, 30, 0)
        .single()
        .expect("valid timestamp");
    let plus_two = FixedOffset::east_opt(2 * 3600).expect("valid offset");

    assert_eq!(current_day_key(&utc), Weekday::Sun);
    assert_eq!(current_day_key(&utc.with_timezone(&plus_two)), Weekday::Mon);
}

#[test]
fn schedules_equal_compares_every_field() {
    let base = DaySchedule::new("09:00", "17:00");
    assert!(schedules_equal(&base, &DaySchedule::new("09:00", "17:00")));
    assert!(!schedules_equal(&base, &DaySchedule::new("09:30", "17:00")));
    assert!(!schedules_equal(&base, &DaySchedule::new("09:00", "18:00")));

    let mut closed = base.clone();
    closed.closed = true;
    assert!(!schedules_equal(&base, &closed));
}

#[test]
fn group_week_uniform_schedule_is_one_group() {
    let week = WeeklySchedule::uniform(&DaySchedule::new("08:00", "20:00"));
    let groups = group_week(&week, &at(2, 12, 0));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].day_range_label, "Mon - Sun");
    assert!(groups[0].includes_today);
    assert_eq!(groups[0].schedule, DaySchedule::new("08:00", "20:00"));
}

#[test]
fn group_week_splits_weekend_from_weekdays() {
    let groups = group_week(&weekdays_and_weekend(), &at(5, 12, 0));

    assert_eq!(labels(&groups), vec!["Mon - Fri", "Sat - Sun"]);
    assert!(!groups[0].includes_today);
    assert!(groups[1].includes_today);
    assert_eq!(groups[1].schedule.open, "10:00");
}

#[test]
fn group_week_emits_single_day_labels() {
    let mut week = weekdays_and_weekend();
    week.wednesday = DaySchedule::closed_all_day();
    week.sunday = DaySchedule::new("12:00", "18:00");

    let groups = group_week(&week, &at(2, 12, 0));

    assert_eq!(labels(&groups), vec!["Mon - Tue", "Wed", "Thu - Fri", "Sat", "Sun"]);
    let today: Vec<_> = groups.iter().filter(|g| g.includes_today).collect();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].day_range_label, "Wed");
    assert!(today[0].schedule.closed);
}

#[test]
fn group_week_does_not_merge_equal_but_non_adjacent_days() {
    let mut week = WeeklySchedule::uniform(&DaySchedule::new("09:00", "17:00"));
    week.tuesday = DaySchedule::new("11:00", "15:00");

    let groups = group_week(&week, &at(0, 9, 0));

    assert_eq!(labels(&groups), vec!["Mon", "Tue", "Wed - Sun"]);
}

#[test]
fn group_week_flushes_a_lone_sunday() {
    let mut week = WeeklySchedule::uniform(&DaySchedule::new("09:00", "17:00"));
    week.sunday = DaySchedule::closed_all_day();

    let groups = group_week(&week, &at(6, 9, 0));

    assert_eq!(labels(&groups), vec!["Mon - Sat", "Sun"]);
    assert!(groups[1].includes_today);
}

#[test]
fn is_open_now_without_schedule_uses_fallback() {
    assert!(is_open_now(None, &at(0, 3, 0), true));
    assert!(!is_open_now(None, &at(0, 12, 0), false));
}

#[test]
fn is_open_now_closed_day_ignores_stale_times() {
    let mut week = WeeklySchedule::uniform(&DaySchedule::new("09:00", "17:00"));
    week.monday.closed = true;

    assert!(!is_open_now(Some(&week), &at(0, 12, 0), true));
    assert!(is_open_now(Some(&week), &at(1, 12, 0), false));
}

#[test]
fn is_open_now_window_is_half_open() {
    let week = WeeklySchedule::uniform(&DaySchedule::new("09:00", "17:00"));

    assert!(!is_open_now(Some(&week), &at(0, 8, 59), true));
    assert!(is_open_now(Some(&week), &at(0, 9, 0), false));
    assert!(is_open_now(Some(&week), &at(0, 16, 59), false));
    assert!(!is_open_now(Some(&week), &at(0, 17, 0), true));
}

#[test]
fn is_open_now_uses_todays_schedule() {
    let week = weekdays_and_weekend();

    // 22:30 is past Friday's close but inside Saturday's hours.
    assert!(!is_open_now(Some(&week), &at(4, 22, 30), true));
    assert!(is_open_now(Some(&week), &at(5, 22, 30), false));
}

#[test]
fn is_open_now_overnight_window_wraps_midnight() {
    let week = WeeklySchedule::uniform(&DaySchedule::new("18:00", "02:00"));

    assert!(is_open_now(Some(&week), &at(0, 23, 0), false));
    assert!(is_open_now(Some(&week), &at(0, 1, 59), false));
    assert!(!is_open_now(Some(&week), &at(0, 2, 0), true));
    assert!(!is_open_now(Some(&week), &at(0, 12, 0), true));
    assert!(is_open_now(Some(&week), &at(0, 18, 0), false));
}

#[test]
fn is_open_now_equal_open_and_close_means_all_day() {
    let week = WeeklySchedule::uniform(&DaySchedule::new("00:00", "00:00"));

    assert!(is_open_now(Some(&week), &at(3, 0, 0), false));
    assert!(is_open_now(Some(&week), &at(3, 23, 59), false));
}

#[test]
fn is_open_now_accepts_seconds_suffix() {
    let week = WeeklySchedule::uniform(&DaySchedule::new("09:00:00", "17:00:00"));
    assert!(is_open_now(Some(&week), &at(0, 10, 0), false));
}

#[test]
fn is_open_now_unparseable_hours_fall_back() {
    let week = WeeklySchedule::uniform(&DaySchedule::new("9am", "5pm"));

    assert!(is_open_now(Some(&week), &at(0, 3, 0), true));
    assert!(!is_open_now(Some(&week), &at(0, 12, 0), false));
}

#[test]
fn display_hours_uses_twelve_hour_clock() {
    assert_eq!(
        DaySchedule::new("09:00", "22:00").display_hours(),
        "9:00 AM - 10:00 PM"
    );
    assert_eq!(DaySchedule::closed_all_day().display_hours(), "Closed");
    assert_eq!(DaySchedule::new("late", "later").display_hours(), "late - later");
}

#[test]
fn weekly_schedule_deserializes_operating_hours_shape() {
    let json = serde_json::json!({
        "monday": { "open": "09:00", "close": "17:00", "closed": false },
        "tuesday": { "open": "09:00", "close": "17:00", "closed": false },
        "wednesday": { "open": "09:00", "close": "17:00", "closed": false },
        "thursday": { "open": "09:00", "close": "17:00", "closed": false },
        "friday": { "open": "09:00", "close": "17:00", "closed": false },
        "saturday": { "open": "10:00", "close": "14:00" },
        "sunday": { "open": "00:00", "close": "00:00", "closed": true }
    });

    let week: WeeklySchedule = serde_json::from_value(json).expect("full week parses");
    assert!(!week.saturday.closed);
    assert!(week.day(Weekday::Sun).closed);
}

#[test]
fn weekly_schedule_rejects_partial_week() {
    let json = serde_json::json!({
        "monday": { "open": "09:00", "close": "17:00", "closed": false }
    });

    assert!(serde_json::from_value::<WeeklySchedule>(json).is_err());
}
