use std::collections::VecDeque;

use crate::foundation::error::{AbstraktError, AbstraktResult};
use crate::history::snapshot::Snapshot;
use crate::scene::model::Scene;

/// Number of scenes kept before the oldest is evicted.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Stable handle for a history entry. Ids are never reused, so a late snapshot can tell whether
/// its entry still exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub scene: Scene,
    pub snapshot: Option<Snapshot>,
}

/// Bounded FIFO of generated scenes with an active cursor.
#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    active: Option<usize>,
    next_id: u64,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY),
            capacity: DEFAULT_HISTORY_CAPACITY,
            active: None,
            next_id: 0,
        }
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> AbstraktResult<Self> {
        if capacity == 0 {
            return Err(AbstraktError::validation("history capacity must be >= 1"));
        }
        Ok(Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            ..Self::default()
        })
    }

    /// Append a scene, evicting the oldest entry past capacity. The new entry becomes active.
    pub fn record(&mut self, scene: Scene, snapshot: Option<Snapshot>) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push_back(HistoryEntry {
            id,
            scene,
            snapshot,
        });
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::debug!(id = %evicted.id, "history entry evicted");
            }
        }
        self.active = Some(self.entries.len() - 1);
        id
    }

    /// Merge a snapshot into the entry it was taken for. Returns `false` when that entry has
    /// been evicted.
    pub fn attach_snapshot(&mut self, id: EntryId, snapshot: Snapshot) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.snapshot = Some(snapshot);
                true
            }
            None => false,
        }
    }

    /// Make entry `index` active. Out-of-range indices leave the cursor untouched.
    pub fn navigate(&mut self, index: isize) -> Option<&HistoryEntry> {
        let idx = usize::try_from(index).ok().filter(|&i| i < self.entries.len())?;
        self.active = Some(idx);
        self.entries.get(idx)
    }

    /// Step the cursor back one entry, stopping at the oldest.
    pub fn navigate_previous(&mut self) -> Option<&HistoryEntry> {
        let idx = self.active?.saturating_sub(1);
        self.active = Some(idx);
        self.entries.get(idx)
    }

    /// Step the cursor forward one entry, stopping at the newest.
    pub fn navigate_next(&mut self) -> Option<&HistoryEntry> {
        let idx = (self.active? + 1).min(self.entries.len().saturating_sub(1));
        self.active = Some(idx);
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.active?)
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entry(&self, id: EntryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/ring.rs"]
mod tests;
