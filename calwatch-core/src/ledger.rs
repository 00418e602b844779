//! The notification ledger: which messages have already gone out for which
//! week.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sent-flags for a single week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekFlags {
    pub changes_notified: bool,
    pub no_events_notified: bool,
}

/// Per-week notification flags.
///
/// In memory this is an ordinary map of typed flags. On disk it keeps the
/// flat `week_<id>_<type>` shape existing state files use, so they load
/// unchanged. Keys that do not match that pattern are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, bool>", from = "BTreeMap<String, bool>")]
pub struct NotificationLedger {
    weeks: BTreeMap<u32, WeekFlags>,
}

impl NotificationLedger {
    pub fn flags(&self, week_id: u32) -> WeekFlags {
        self.weeks.get(&week_id).copied().unwrap_or_default()
    }

    pub fn mark_changes_notified(&mut self, week_id: u32) {
        self.weeks.entry(week_id).or_default().changes_notified = true;
    }

    pub fn mark_no_events_notified(&mut self, week_id: u32) {
        self.weeks.entry(week_id).or_default().no_events_notified = true;
    }

    /// Additive merge: flags already true stay true.
    pub fn merge(&mut self, other: &NotificationLedger) {
        for (week_id, flags) in &other.weeks {
            let entry = self.weeks.entry(*week_id).or_default();
            entry.changes_notified |= flags.changes_notified;
            entry.no_events_notified |= flags.no_events_notified;
        }
    }

    /// Drop every flag belonging to an evicted week.
    pub fn remove_week(&mut self, week_id: u32) {
        self.weeks.remove(&week_id);
    }
}

impl From<NotificationLedger> for BTreeMap<String, bool> {
    fn from(ledger: NotificationLedger) -> Self {
        let mut map = BTreeMap::new();
        for (week_id, flags) in ledger.weeks {
            if flags.changes_notified {
                map.insert(format!("week_{week_id}_changes"), true);
            }
            if flags.no_events_notified {
                map.insert(format!("week_{week_id}_no_events"), true);
            }
        }
        map
    }
}

impl From<BTreeMap<String, bool>> for NotificationLedger {
    fn from(map: BTreeMap<String, bool>) -> Self {
        let mut ledger = NotificationLedger::default();
        for (key, sent) in map {
            if !sent {
                continue;
            }
            let Some(rest) = key.strip_prefix("week_") else {
                continue;
            };
            if let Some(id) = rest.strip_suffix("_no_events") {
                if let Ok(week_id) = id.parse() {
                    ledger.mark_no_events_notified(week_id);
                }
            } else if let Some(id) = rest.strip_suffix("_changes") {
                if let Ok(week_id) = id.parse() {
                    ledger.mark_changes_notified(week_id);
                }
            }
        }
        ledger
    }
}
