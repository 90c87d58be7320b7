//! Selection engine: the store of selected event types and the driver that
//! reconciles it with a paginated remote collection.

mod driver;
mod store;
#[cfg(test)]
pub(crate) mod testing;

pub use driver::{
    Generation, SelectAll, SelectAllReport, SelectionDriver, SelectionObserver, WalkJob,
    WalkOutcome, WalkStop,
};
use notifctl_types::EventType;
pub use store::{Merged, SelectionStore};

/// A row of the current page with its derived selection flag.
///
/// `is_selected` is computed from the store and never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableEventType {
    pub event: EventType,
    pub is_selected: bool,
}

/// Marks each item of a page against the store.
pub fn mark_selected(store: &SelectionStore, items: &[EventType]) -> Vec<SelectableEventType> {
    items
        .iter()
        .map(|event| SelectableEventType {
            is_selected: store.contains(&event.id),
            event: event.clone(),
        })
        .collect()
}
