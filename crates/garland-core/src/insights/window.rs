//! Observation window arithmetic
//!
//! Pure date math with no side effects. All ranges are inclusive on both
//! ends, and arithmetic is calendar-accurate (month and year rollover come
//! from chrono, not fixed-length months).

use chrono::{Datelike, Duration, NaiveDate};

/// Days of spending observed before an event date
pub const EVENT_WINDOW_DAYS_BEFORE: i64 = 7;
/// Days of spending observed after an event date
pub const EVENT_WINDOW_DAYS_AFTER: i64 = 2;
/// How far back the baseline window sits from the event window
pub const BASELINE_SHIFT_DAYS: i64 = 28;

/// An inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// The span used to measure spending attributable to an event
pub fn event_window(event_date: NaiveDate) -> DateRange {
    DateRange {
        start: event_date - Duration::days(EVENT_WINDOW_DAYS_BEFORE),
        end: event_date + Duration::days(EVENT_WINDOW_DAYS_AFTER),
    }
}

/// The same-length span exactly four weeks earlier, used as "normal" spending
pub fn baseline_window(event_date: NaiveDate) -> DateRange {
    let window = event_window(event_date);
    DateRange {
        start: window.start - Duration::days(BASELINE_SHIFT_DAYS),
        end: window.end - Duration::days(BASELINE_SHIFT_DAYS),
    }
}

/// Monday-anchored week containing `today`
pub fn week_range(today: NaiveDate) -> DateRange {
    let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    DateRange {
        start,
        end: start + Duration::days(6),
    }
}

/// Calendar month containing `today`
pub fn month_range(today: NaiveDate) -> DateRange {
    let start = today
        .with_day(1)
        .expect("first of month is always a valid date");
    let end = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year(), 12, 31)
            .expect("December 31 is always a valid date")
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
            .expect("first of next month is always a valid date")
            - Duration::days(1)
    };
    DateRange { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_event_window_around_christmas() {
        let window = event_window(day(2024, 12, 25));
        assert_eq!(window.start, day(2024, 12, 18));
        assert_eq!(window.end, day(2024, 12, 27));
    }

    #[test]
    fn test_baseline_window_around_christmas() {
        let baseline = baseline_window(day(2024, 12, 25));
        assert_eq!(baseline.start, day(2024, 11, 20));
        assert_eq!(baseline.end, day(2024, 11, 29));
    }

    #[test]
    fn test_windows_handle_year_rollover() {
        let window = event_window(day(2025, 1, 3));
        assert_eq!(window.start, day(2024, 12, 27));
        assert_eq!(window.end, day(2025, 1, 5));

        let baseline = baseline_window(day(2025, 1, 3));
        assert_eq!(baseline.start, day(2024, 11, 29));
        assert_eq!(baseline.end, day(2024, 12, 8));
    }

    #[test]
    fn test_week_range_is_monday_anchored() {
        // 2024-06-13 is a Thursday
        let week = week_range(day(2024, 6, 13));
        assert_eq!(week.start, day(2024, 6, 10));
        assert_eq!(week.end, day(2024, 6, 16));

        // A Monday anchors its own week
        let monday = week_range(day(2024, 6, 10));
        assert_eq!(monday.start, day(2024, 6, 10));
        assert_eq!(monday.end, day(2024, 6, 16));
    }

    #[test]
    fn test_month_range_handles_december() {
        let december = month_range(day(2024, 12, 15));
        assert_eq!(december.start, day(2024, 12, 1));
        assert_eq!(december.end, day(2024, 12, 31));
    }

    #[test]
    fn test_month_range_handles_leap_february() {
        let february = month_range(day(2024, 2, 10));
        assert_eq!(february.start, day(2024, 2, 1));
        assert_eq!(february.end, day(2024, 2, 29));
    }
}
