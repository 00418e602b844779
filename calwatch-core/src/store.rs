//! Persistent snapshot and ledger storage.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CalWatchError, CalWatchResult};
use crate::ledger::NotificationLedger;
use crate::snapshot::{DayEvents, WeekSnapshot};

/// Everything calwatch persists between runs.
///
/// On disk this is `{"events_by_week": {"10": {"2024-03-04": [...]}},
/// "notifications": {"week_10_changes": true}}`. serde_json writes the
/// numeric week keys as JSON-object strings, which is the layout existing
/// state files already use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub events_by_week: BTreeMap<u32, DayEvents>,
    #[serde(default)]
    pub notifications: NotificationLedger,
}

/// File-backed store with bounded week retention.
pub struct SnapshotStore {
    path: PathBuf,
    retained_weeks: usize,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>, retained_weeks: usize) -> SnapshotStore {
        SnapshotStore {
            path: path.into(),
            retained_weeks,
        }
    }

    /// Read persisted state.
    ///
    /// A missing file, unreadable JSON, or one of the legacy layouts (a flat
    /// `date -> events` map, or the `{"status": "no_events_this_week"}`
    /// sentinel) all load as empty state. A run never fails on its own
    /// history.
    pub fn load(&self) -> StoreState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoreState::default(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not read state file, starting from empty state"
                );
                return StoreState::default();
            }
        };

        if content.trim().is_empty() {
            return StoreState::default();
        }

        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file is not valid JSON, starting from empty state"
                );
                return StoreState::default();
            }
        };

        if is_legacy_layout(&value) {
            tracing::info!(
                path = %self.path.display(),
                "state file uses a superseded layout, treating as no prior state"
            );
            return StoreState::default();
        }

        match serde_json::from_value(value) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file does not match the expected layout, starting from empty state"
                );
                StoreState::default()
            }
        }
    }

    /// Persist `snapshot` under its week id and merge `ledger` into the
    /// stored one.
    ///
    /// The file is re-read first so flags written by an earlier run are kept
    /// (the merge is additive). Retention then keeps the newest
    /// `retained_weeks` weeks; evicted weeks lose their ledger entries too.
    /// The write goes through a temp file and rename so a reader never sees
    /// a half-written file.
    pub fn save(&self, snapshot: &WeekSnapshot, ledger: &NotificationLedger) -> CalWatchResult<()> {
        let mut state = self.load();

        state
            .events_by_week
            .insert(snapshot.week_id(), snapshot.days.clone());
        state.notifications.merge(ledger);

        while state.events_by_week.len() > self.retained_weeks {
            // BTreeMap keys are ordered, so the first is the numerically oldest.
            let Some(oldest) = state.events_by_week.keys().next().copied() else {
                break;
            };
            state.events_by_week.remove(&oldest);
            state.notifications.remove_week(oldest);
            tracing::debug!(week_id = oldest, "evicted expired week from store");
        }

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(&state)
            .map_err(|e| CalWatchError::Serialization(e.to_string()))?;

        let temp = self.path.with_extension("tmp");
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        Ok(())
    }
}

fn is_legacy_layout(value: &serde_json::Value) -> bool {
    match value.as_object() {
        Some(object) => {
            !object.is_empty()
                && !object.contains_key("events_by_week")
                && !object.contains_key("notifications")
        }
        None => true,
    }
}
