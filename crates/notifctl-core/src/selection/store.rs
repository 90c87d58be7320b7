use std::collections::BTreeMap;

use notifctl_types::EventType;

/// What a `merge` did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Merged {
    /// Ids that were not selected before.
    pub added: usize,
    /// Already selected ids whose record was replaced.
    pub refreshed: usize,
}

impl Merged {
    pub fn changed(self) -> bool {
        self.added > 0 || self.refreshed > 0
    }
}

/// Authoritative record of which event types are selected.
///
/// An id present in the store means "selected"; absence means "not selected".
/// All operations are total. Mutators report whether the store changed so the
/// driver only notifies observers on real changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    entries: BTreeMap<String, EventType>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with prior selection.
    pub fn seeded(events: impl IntoIterator<Item = EventType>) -> Self {
        let mut store = Self::new();
        store.merge(events);
        store
    }

    /// Adds (or refreshes) one event type.
    pub fn add(&mut self, event: EventType) -> bool {
        match self.entries.get(&event.id) {
            Some(existing) if *existing == event => false,
            _ => {
                self.entries.insert(event.id.clone(), event);
                true
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.entries.is_empty();
        self.entries.clear();
        changed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Adds every event. Ids already present are refreshed, not counted as added.
    pub fn merge(&mut self, events: impl IntoIterator<Item = EventType>) -> Merged {
        let mut merged = Merged::default();
        for event in events {
            let is_new = !self.contains(&event.id);
            if self.add(event) {
                if is_new {
                    merged.added += 1;
                } else {
                    merged.refreshed += 1;
                }
            }
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Selected records ordered by id.
    pub fn snapshot_as_ordered_list(&self) -> Vec<EventType> {
        self.entries.values().cloned().collect()
    }
}
