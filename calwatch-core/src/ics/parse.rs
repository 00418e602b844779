//! Feed parsing using the icalendar crate's parser.

use icalendar::DatePerhapsTime;
use icalendar::parser::{read_calendar, unfold};

use crate::error::{CalWatchError, CalWatchResult};

/// An event as it appears in the feed, before timezone resolution.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub summary: String,
    pub start: DatePerhapsTime,
    pub end: DatePerhapsTime,
    pub location: Option<String>,
}

/// Parse ICS content into raw event records.
///
/// A document that does not parse at all is a `Parse` error and aborts the
/// run. Individual VEVENTs without a usable DTSTART/DTEND are skipped.
pub fn parse_feed(content: &str) -> CalWatchResult<Vec<RawEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| CalWatchError::Parse(e.to_string()))?;

    let mut events = Vec::new();

    for component in &calendar.components {
        if component.name != "VEVENT" {
            continue;
        }

        let summary = component
            .find_prop("SUMMARY")
            .map(|p| p.val.to_string())
            .unwrap_or_else(|| "(No title)".to_string());

        let start = component
            .find_prop("DTSTART")
            .and_then(|p| DatePerhapsTime::try_from(p).ok());
        let end = component
            .find_prop("DTEND")
            .and_then(|p| DatePerhapsTime::try_from(p).ok());

        let (Some(start), Some(end)) = (start, end) else {
            tracing::debug!(summary = %summary, "skipping event without usable start/end");
            continue;
        };

        let location = component.find_prop("LOCATION").map(|p| p.val.to_string());

        events.push(RawEvent {
            summary,
            start,
            end,
            location,
        });
    }

    Ok(events)
}
