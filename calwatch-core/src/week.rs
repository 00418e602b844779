//! Week window resolution.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// The calendar week a run evaluates: a half-open date window `[start, end)`
/// plus the ISO week number used as the storage and diff key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub week_id: u32,
}

impl WeekWindow {
    /// Resolve the window for `today`.
    ///
    /// Sundays are rest days: no window, the run skips. On `preview_weekday`
    /// (Saturday unless configured otherwise) the window is the *next*
    /// calendar week, the weekend lookahead. Any other day gets the
    /// Monday-aligned current week.
    pub fn resolve(today: NaiveDate, preview_weekday: Weekday) -> Option<WeekWindow> {
        if today.weekday() == Weekday::Sun {
            return None;
        }

        let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let start = if today.weekday() == preview_weekday {
            monday + Duration::days(7)
        } else {
            monday
        };
        let end = start + Duration::days(7);

        Some(WeekWindow {
            start,
            end,
            week_id: start.iso_week().week(),
        })
    }

    /// Whether `day` falls inside the half-open window.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sunday_skips_the_run() {
        assert_eq!(WeekWindow::resolve(date(2024, 3, 10), Weekday::Sat), None);
    }

    #[test]
    fn weekday_resolves_current_week() {
        // Wednesday 2024-03-06 -> Monday-aligned week 10.
        let window = WeekWindow::resolve(date(2024, 3, 6), Weekday::Sat).unwrap();
        assert_eq!(window.start, date(2024, 3, 4));
        assert_eq!(window.end, date(2024, 3, 11));
        assert_eq!(window.week_id, 10);
    }

    #[test]
    fn monday_resolves_its_own_week() {
        let window = WeekWindow::resolve(date(2024, 3, 4), Weekday::Sat).unwrap();
        assert_eq!(window.start, date(2024, 3, 4));
        assert_eq!(window.week_id, 10);
    }

    #[test]
    fn saturday_previews_next_week() {
        // Saturday 2024-03-09 -> today + 2 through today + 9.
        let window = WeekWindow::resolve(date(2024, 3, 9), Weekday::Sat).unwrap();
        assert_eq!(window.start, date(2024, 3, 11));
        assert_eq!(window.end, date(2024, 3, 18));
        assert_eq!(window.week_id, 11);
    }

    #[test]
    fn preview_weekday_is_configurable() {
        // Friday as preview day: Friday 2024-03-08 looks at next week,
        // Saturday 2024-03-09 gets the ordinary current week.
        let friday = WeekWindow::resolve(date(2024, 3, 8), Weekday::Fri).unwrap();
        assert_eq!(friday.start, date(2024, 3, 11));

        let saturday = WeekWindow::resolve(date(2024, 3, 9), Weekday::Fri).unwrap();
        assert_eq!(saturday.start, date(2024, 3, 4));
    }

    #[test]
    fn window_containment_is_half_open() {
        let window = WeekWindow::resolve(date(2024, 3, 6), Weekday::Sat).unwrap();
        assert!(window.contains(date(2024, 3, 4)));
        assert!(window.contains(date(2024, 3, 10)));
        assert!(!window.contains(date(2024, 3, 11)));
        assert!(!window.contains(date(2024, 3, 3)));
    }
}
