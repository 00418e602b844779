//! Week-scoped event diffing.

use std::collections::HashSet;

use crate::event::Event;
use crate::snapshot::{DayEvents, WeekSnapshot};

/// The outcome of comparing a fresh snapshot against the stored one for the
/// same week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekDiff {
    pub added: Vec<Event>,
    pub removed: Vec<Event>,
    /// True when no snapshot had been stored for this week yet. The policy
    /// layer uses this to tell "first look at a new week" apart from a real
    /// change burst.
    pub first_observation: bool,
}

impl WeekDiff {
    /// Compare the stored per-day buckets for this week (if any) against the
    /// fresh snapshot.
    ///
    /// Events match on full-field equality only. A changed field surfaces as
    /// one removal plus one addition; there is no update category.
    pub fn compute(stored: Option<&DayEvents>, fresh: &WeekSnapshot) -> WeekDiff {
        let Some(stored) = stored else {
            let mut added: Vec<Event> = fresh.events().cloned().collect();
            sort_events(&mut added);
            return WeekDiff {
                added,
                removed: vec![],
                first_observation: true,
            };
        };

        let old_set: HashSet<&Event> = stored.values().flatten().collect();
        let new_set: HashSet<&Event> = fresh.events().collect();

        let mut added: Vec<Event> = new_set
            .difference(&old_set)
            .map(|event| (*event).clone())
            .collect();
        let mut removed: Vec<Event> = old_set
            .difference(&new_set)
            .map(|event| (*event).clone())
            .collect();

        sort_events(&mut added);
        sort_events(&mut removed);

        WeekDiff {
            added,
            removed,
            first_observation: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

// Stable order so repeated runs render identically.
fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.summary.cmp(&b.summary)));
}
