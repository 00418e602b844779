//! The calendar event value type.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single scheduled event, as observed in the feed.
///
/// Identity is full-field structural equality over exactly these four fields.
/// There is no stable ID and no "modified" concept: an event whose room
/// changes surfaces as one removal plus one addition.
///
/// Timestamps keep their fixed offset so the RFC 3339 text in the state file
/// round-trips exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub summary: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Event {
    /// The day this event is filed under: its start date.
    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }
}
