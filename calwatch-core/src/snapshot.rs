//! Weekly event snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{CalendarDateTime, DatePerhapsTime};

use crate::event::Event;
use crate::ics::RawEvent;
use crate::week::WeekWindow;

/// Per-day event buckets, as stored and diffed.
pub type DayEvents = BTreeMap<NaiveDate, Vec<Event>>;

/// All events starting within one week window, bucketed by start date.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSnapshot {
    pub window: WeekWindow,
    pub days: DayEvents,
}

impl WeekSnapshot {
    /// Build a snapshot from raw feed events.
    ///
    /// Timestamps without zone information are read as UTC, then everything
    /// is converted to `tz`. An event belongs to the window iff its converted
    /// start date falls inside it; multi-day events are filed under their
    /// start date and the end date plays no part in inclusion.
    pub fn build(raw_events: &[RawEvent], window: WeekWindow, tz: Tz) -> WeekSnapshot {
        let mut days: DayEvents = BTreeMap::new();

        for raw in raw_events {
            let (Some(start), Some(end)) = (resolve_time(&raw.start, tz), resolve_time(&raw.end, tz))
            else {
                tracing::debug!(summary = %raw.summary, "skipping event with unresolvable timestamps");
                continue;
            };

            if !window.contains(start.date_naive()) {
                continue;
            }

            days.entry(start.date_naive()).or_default().push(Event {
                summary: raw.summary.clone(),
                start,
                end,
                location: raw.location.clone(),
            });
        }

        WeekSnapshot { window, days }
    }

    pub fn week_id(&self) -> u32 {
        self.window.week_id
    }

    /// True when no day in the window has any event. Day keys holding empty
    /// lists count as empty.
    pub fn is_empty(&self) -> bool {
        self.days.values().all(|events| events.is_empty())
    }

    /// All events in the snapshot, in day order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.days.values().flatten()
    }
}

/// Resolve a feed timestamp to the target zone, kept as a fixed offset.
fn resolve_time(time: &DatePerhapsTime, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let utc: DateTime<Utc> = match time {
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => *dt,
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => Utc.from_utc_datetime(naive),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let zone: Tz = tzid.parse().ok()?;
            zone.from_local_datetime(date_time).earliest()?.to_utc()
        }
        // All-day entries behave like a zoneless midnight timestamp.
        DatePerhapsTime::Date(date) => Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?),
    };

    Some(utc.with_timezone(&tz).fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    fn window() -> WeekWindow {
        // Week 10 of 2024: Monday 2024-03-04 through Sunday 2024-03-10.
        WeekWindow::resolve(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(), Weekday::Sat).unwrap()
    }

    fn raw(summary: &str, start: DatePerhapsTime, end: DatePerhapsTime) -> RawEvent {
        RawEvent {
            summary: summary.to_string(),
            start,
            end,
            location: None,
        }
    }

    fn floating(y: i32, m: u32, d: u32, h: u32, min: u32) -> DatePerhapsTime {
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
        ))
    }

    #[test]
    fn naive_timestamps_are_utc_then_converted() {
        // 09:00 zoneless = 09:00 UTC = 10:00 in Paris (winter, +01:00).
        let events = [raw("Maths", floating(2024, 3, 4, 9, 0), floating(2024, 3, 4, 11, 0))];
        let snapshot = WeekSnapshot::build(&events, window(), chrono_tz::Europe::Paris);

        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let event = &snapshot.days[&day][0];
        assert_eq!(event.start.to_rfc3339(), "2024-03-04T10:00:00+01:00");
        assert_eq!(event.end.to_rfc3339(), "2024-03-04T12:00:00+01:00");
    }

    #[test]
    fn zoned_timestamps_convert_directly() {
        let start = DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone {
            date_time: NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            tzid: "Europe/London".to_string(),
        });
        let end = DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone {
            date_time: NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            tzid: "Europe/London".to_string(),
        });

        let events = [raw("Visio", start, end)];
        let snapshot = WeekSnapshot::build(&events, window(), chrono_tz::Europe::Paris);

        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        // 09:00 London is 10:00 Paris in March (both on winter time).
        assert_eq!(
            snapshot.days[&day][0].start.to_rfc3339(),
            "2024-03-04T10:00:00+01:00"
        );
    }

    #[test]
    fn only_events_starting_inside_the_window_are_kept() {
        let events = [
            raw("Before", floating(2024, 3, 3, 9, 0), floating(2024, 3, 3, 10, 0)),
            raw("Inside", floating(2024, 3, 4, 9, 0), floating(2024, 3, 4, 10, 0)),
            // Starts on the last day, ends outside: still filed under its start day.
            raw("Overnight", floating(2024, 3, 10, 22, 0), floating(2024, 3, 11, 2, 0)),
            raw("After", floating(2024, 3, 11, 9, 0), floating(2024, 3, 11, 10, 0)),
        ];
        let snapshot = WeekSnapshot::build(&events, window(), chrono_tz::Europe::Paris);

        let summaries: Vec<_> = snapshot.events().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["Inside", "Overnight"]);
    }

    #[test]
    fn empty_snapshot_reports_empty() {
        let snapshot = WeekSnapshot::build(&[], window(), chrono_tz::Europe::Paris);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.week_id(), 10);
    }
}
