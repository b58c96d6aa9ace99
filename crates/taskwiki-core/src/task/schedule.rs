//! Schedule evaluation for planned and recurring tasks.
//!
//! A schedule is a planned start (date, optionally with a time of day),
//! an optional end, and a repeat rule. Evaluation is pure over the
//! schedule and an injected `now`; nothing here reads the clock.

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// A task's planned date/time and optional recurrence rule.
///
/// Repeat rules: empty string means one-off; `"daily"`, `"weekly"` and
/// `"monthly"` are short forms; anything else is a comma-separated
/// weekday list where `day`/`week` expand to all seven weekdays and
/// `workday` expands to Monday-Friday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSchedule {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub repeat: String,
    /// Zero-based line number of the `Schedule:` line.
    pub line: usize,
}

impl TaskSchedule {
    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_empty()
    }

    /// Whether `now` falls inside the scheduled window.
    ///
    /// With an end set this is the open interval test; without one, the
    /// schedule covers its whole start day (time of day only matters for
    /// sort ordering).
    pub fn is_in_progress(&self, now: NaiveDateTime) -> bool {
        match self.end {
            Some(end) => self.start < now && now < end,
            None => self.start.date() == now.date(),
        }
    }

    /// Whether a recurring schedule fires on `now`'s calendar day.
    ///
    /// Always false for one-off schedules; unrecognized weekday tokens
    /// match nothing rather than erroring, so the selector stays total.
    pub fn is_due_today(&self, now: NaiveDateTime) -> bool {
        match self.repeat.as_str() {
            "" => false,
            "daily" => true,
            "weekly" => now.weekday() == self.start.weekday(),
            "monthly" => now.day() == self.start.day(),
            list => due_on(list, now.weekday()),
        }
    }
}

fn due_on(list: &str, weekday: Weekday) -> bool {
    list.split(',').any(|token| {
        match token.trim().to_ascii_lowercase().as_str() {
            "day" | "week" => true,
            "workday" => !matches!(weekday, Weekday::Sat | Weekday::Sun),
            other => parse_weekday(other) == Some(weekday),
        }
    })
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    match token {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn schedule(start: NaiveDateTime, end: Option<NaiveDateTime>, repeat: &str) -> TaskSchedule {
        TaskSchedule {
            start,
            end,
            repeat: repeat.into(),
            line: 1,
        }
    }

    #[test]
    fn in_progress_inside_bounded_window() {
        let s = schedule(at(2024, 3, 1, 9, 0), Some(at(2024, 3, 1, 10, 0)), "");
        assert!(s.is_in_progress(at(2024, 3, 1, 9, 30)));
        assert!(!s.is_in_progress(at(2024, 3, 1, 10, 30)));
        assert!(!s.is_in_progress(at(2024, 3, 1, 8, 59)));
    }

    #[test]
    fn in_progress_window_bounds_are_exclusive() {
        let s = schedule(at(2024, 3, 1, 9, 0), Some(at(2024, 3, 1, 10, 0)), "");
        assert!(!s.is_in_progress(at(2024, 3, 1, 9, 0)));
        assert!(!s.is_in_progress(at(2024, 3, 1, 10, 0)));
    }

    #[test]
    fn in_progress_without_end_covers_start_day() {
        let s = schedule(at(2024, 3, 1, 9, 0), None, "");
        assert!(s.is_in_progress(at(2024, 3, 1, 0, 5)));
        assert!(s.is_in_progress(at(2024, 3, 1, 23, 55)));
        assert!(!s.is_in_progress(at(2024, 3, 2, 9, 0)));
    }

    #[test]
    fn one_off_is_never_due() {
        let s = schedule(at(2024, 3, 1, 0, 0), None, "");
        assert!(!s.is_due_today(at(2024, 3, 1, 12, 0)));
    }

    #[test]
    fn daily_is_always_due() {
        let s = schedule(at(2024, 3, 1, 0, 0), None, "daily");
        assert!(s.is_due_today(at(2024, 3, 2, 12, 0)));
        assert!(s.is_due_today(at(2025, 1, 1, 12, 0)));
    }

    #[test]
    fn weekly_matches_start_weekday() {
        // 2024-03-01 is a Friday
        let s = schedule(at(2024, 3, 1, 0, 0), None, "weekly");
        assert!(s.is_due_today(at(2024, 3, 8, 12, 0)));
        assert!(!s.is_due_today(at(2024, 3, 9, 12, 0)));
    }

    #[test]
    fn monthly_matches_day_of_month() {
        let s = schedule(at(2024, 3, 15, 0, 0), None, "monthly");
        assert!(s.is_due_today(at(2024, 4, 15, 12, 0)));
        assert!(!s.is_due_today(at(2024, 4, 16, 12, 0)));
    }

    #[test]
    fn weekday_list_matches_listed_days() {
        let s = schedule(at(2024, 3, 1, 0, 0), None, "mon,wed,fri");
        // 2024-03-05 is a Tuesday, 2024-03-06 a Wednesday
        assert!(!s.is_due_today(at(2024, 3, 5, 12, 0)));
        assert!(s.is_due_today(at(2024, 3, 6, 12, 0)));
    }

    #[test]
    fn workday_macro_expands_to_monday_through_friday() {
        let s = schedule(at(2024, 3, 1, 0, 0), None, "workday");
        // 2024-03-04 Mon .. 2024-03-10 Sun
        for day in 4..=8 {
            assert!(s.is_due_today(at(2024, 3, day, 12, 0)));
        }
        assert!(!s.is_due_today(at(2024, 3, 9, 12, 0)));
        assert!(!s.is_due_today(at(2024, 3, 10, 12, 0)));
    }

    #[test]
    fn day_and_week_macros_match_every_day() {
        for repeat in ["day", "week"] {
            let s = schedule(at(2024, 3, 1, 0, 0), None, repeat);
            for day in 4..=10 {
                assert!(s.is_due_today(at(2024, 3, day, 12, 0)));
            }
        }
    }

    #[test]
    fn unrecognized_tokens_match_nothing() {
        let s = schedule(at(2024, 3, 1, 0, 0), None, "someday,maybe");
        for day in 4..=10 {
            assert!(!s.is_due_today(at(2024, 3, day, 12, 0)));
        }
    }

    #[test]
    fn mixed_list_with_unknown_token_still_matches_known_days() {
        let s = schedule(at(2024, 3, 1, 0, 0), None, "bogus,sat");
        assert!(s.is_due_today(at(2024, 3, 9, 12, 0)));
        assert!(!s.is_due_today(at(2024, 3, 8, 12, 0)));
    }
}
