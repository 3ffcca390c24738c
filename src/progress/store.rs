use std::collections::BTreeMap;

use crate::library::Item;
use crate::storage::{KeyValueStore, PROGRESS_KEY};

use super::aggregate::Aggregate;
use super::record::ProgressRecord;

/// How a freshly built item list is merged into the stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// A new folder was selected: drop everything, start every item at zero.
    /// Ids are positional, so old records cannot be trusted to match.
    Replace,
    /// Same library shown again (or restored at startup): only add records
    /// for items that have none.
    Retain,
}

/// The `id -> ProgressRecord` map and every operation on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressStore {
    records: BTreeMap<String, ProgressRecord>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the persisted map. Missing or unreadable state yields an empty
    /// store; startup never fails because of it.
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        let blob = match storage.get(PROGRESS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Self::new(),
            Err(e) => {
                tracing::warn!(error = %e, "progress storage unavailable; starting empty");
                return Self::new();
            }
        };

        match serde_json::from_str::<BTreeMap<String, ProgressRecord>>(&blob) {
            Ok(records) => {
                tracing::debug!(records = records.len(), "loaded progress");
                Self { records }
            }
            Err(e) => {
                tracing::warn!(error = %e, "persisted progress is corrupt; starting empty");
                Self::new()
            }
        }
    }

    /// Persist the whole map. Best-effort: failures are logged and reported
    /// as `false`.
    pub fn save(&self, storage: &mut dyn KeyValueStore) -> bool {
        let blob = match serde_json::to_string(&self.records) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize progress");
                return false;
            }
        };
        match storage.set(PROGRESS_KEY, &blob) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist progress");
                false
            }
        }
    }

    pub fn reconcile(&mut self, items: &[Item], mode: Reconcile) {
        if mode == Reconcile::Replace {
            self.records.clear();
        }
        for item in items {
            self.records
                .entry(item.id.clone())
                .or_insert_with(|| ProgressRecord::new(item.duration));
        }
    }

    pub fn get(&self, id: &str) -> Option<&ProgressRecord> {
        self.records.get(id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply a playback position. Returns whether the record changed.
    pub fn record_position(&mut self, id: &str, current_time: f64, duration: f64) -> bool {
        let Some(record) = self.records.get_mut(id) else {
            tracing::debug!(id, "position for unknown lecture ignored");
            return false;
        };
        match record.with_position(current_time, duration) {
            Some(updated) => {
                if !record.completed && updated.completed {
                    tracing::info!(id, "lecture completed");
                }
                let changed = updated != *record;
                *record = updated;
                changed
            }
            None => false,
        }
    }

    /// Playback reached the natural end.
    pub fn mark_completed(&mut self, id: &str) {
        if let Some(record) = self.records.get_mut(id) {
            *record = record.finished();
        }
    }

    /// Adopt the first real duration reported for `item`, on both the item
    /// and its record. Known durations are never overwritten.
    pub fn correct_duration(&mut self, item: &mut Item, observed: f64) -> bool {
        // Whole seconds; sub-second reports are treated as still unknown.
        let duration = observed.floor();
        if item.duration != 0.0 || !(duration.is_finite() && duration > 0.0) {
            return false;
        }
        item.duration = duration;
        let record = self
            .records
            .entry(item.id.clone())
            .or_insert_with(|| ProgressRecord::new(0.0));
        record.duration = duration;
        tracing::debug!(id = %item.id, duration, "adopted reported duration");
        true
    }

    /// Give items whose duration is still unknown the duration their
    /// retained record already learned. Known durations are never replaced.
    pub fn restore_durations(&self, items: &mut [Item]) -> usize {
        let mut restored = 0;
        for item in items.iter_mut().filter(|i| i.duration == 0.0) {
            let Some(record) = self.records.get(&item.id) else {
                continue;
            };
            let duration = record.duration.floor();
            if duration.is_finite() && duration > 0.0 {
                item.duration = duration;
                restored += 1;
            }
        }
        restored
    }

    pub fn resume_time(&self, id: &str) -> f64 {
        self.records.get(id).map_or(0.0, ProgressRecord::resume_time)
    }

    pub fn aggregate(&self, items: &[Item]) -> Aggregate {
        Aggregate::compute(items, |id| self.records.get(id))
    }
}
