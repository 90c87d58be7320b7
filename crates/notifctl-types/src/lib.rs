//! Domain types shared across notifctl crates.
//!
//! These are the UI-agnostic shapes the selection core works with:
//! - `EventType`: one selectable kind of notification event
//! - `Facet`: bundle/application reference data
//! - `PageDescriptor` / `EventTypeFilters` / `Page`: paginated queries
//! - `SelectionCommand`: the bulk selection commands

mod event_type;
mod facet;
mod page;

pub use event_type::{EventType, SelectionCommand};
pub use facet::{Facet, find_bundle};
pub use page::{EventTypeFilters, Page, PageDescriptor, last_page_index};
