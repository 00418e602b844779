//! Notification decisions.

use std::collections::BTreeMap;

use crate::diff::WeekDiff;
use crate::event::Event;
use crate::ledger::NotificationLedger;
use crate::snapshot::{DayEvents, WeekSnapshot};

/// One outbound message batch, grouped by day where applicable.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationBatch {
    /// First observation of a week that has events: the full schedule.
    Schedule { week_id: u32, days: DayEvents },
    Added { week_id: u32, days: DayEvents },
    Removed { week_id: u32, days: DayEvents },
    NoEvents { week_id: u32 },
}

/// What a run decided to do.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub batches: Vec<NotificationBatch>,
    /// Whether the store should be written after delivery. Quiescent runs
    /// must leave stored state untouched.
    pub should_save: bool,
}

impl RunPlan {
    /// Decide the action for this run and mark the ledger accordingly.
    ///
    /// Exactly one path fires: schedule (first look at a week with events),
    /// changes (non-empty diff), no-events (empty week, not yet announced),
    /// or quiescent. Quiescent runs leave the ledger untouched.
    pub fn decide(
        diff: &WeekDiff,
        fresh: &WeekSnapshot,
        ledger: &mut NotificationLedger,
        renotify_changes: bool,
    ) -> RunPlan {
        let week_id = fresh.week_id();
        let flags = ledger.flags(week_id);

        if diff.first_observation && !fresh.is_empty() {
            ledger.mark_changes_notified(week_id);
            return RunPlan {
                batches: vec![NotificationBatch::Schedule {
                    week_id,
                    days: fresh.days.clone(),
                }],
                should_save: true,
            };
        }

        if !diff.is_empty() {
            if flags.changes_notified && !renotify_changes {
                tracing::info!(week_id, "changes detected but re-notification is off");
                return RunPlan {
                    batches: vec![],
                    should_save: false,
                };
            }

            let mut batches = Vec::new();
            if !diff.added.is_empty() {
                batches.push(NotificationBatch::Added {
                    week_id,
                    days: group_by_day(&diff.added),
                });
            }
            if !diff.removed.is_empty() {
                batches.push(NotificationBatch::Removed {
                    week_id,
                    days: group_by_day(&diff.removed),
                });
            }

            ledger.mark_changes_notified(week_id);
            return RunPlan {
                batches,
                should_save: true,
            };
        }

        if fresh.is_empty() && !flags.no_events_notified {
            ledger.mark_no_events_notified(week_id);
            return RunPlan {
                batches: vec![NotificationBatch::NoEvents { week_id }],
                should_save: true,
            };
        }

        RunPlan {
            batches: vec![],
            should_save: false,
        }
    }
}

fn group_by_day(events: &[Event]) -> DayEvents {
    let mut days: DayEvents = BTreeMap::new();
    for event in events {
        days.entry(event.day()).or_default().push(event.clone());
    }
    days
}
