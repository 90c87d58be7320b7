//! Application state for the selection table.
//!
//! ```text
//! AppState
//! ├── selection: SelectionDriver   (store, generation, loaded page)
//! ├── bundles / bundle_index       (facets, active bundle)
//! ├── selections                   (saved selection per bundle)
//! ├── filters                      (application + name filter)
//! ├── requested: PageDescriptor    (page the table wants on screen)
//! ├── cursor / input / status      (view state)
//! └── task_seq / tasks             (async task lifecycle)
//! ```

use std::collections::BTreeMap;

use notifctl_core::selection::{SelectableEventType, SelectionDriver, mark_selected};
use notifctl_core::types::{EventType, EventTypeFilters, Facet, PageDescriptor};

use crate::common::{TaskSeq, Tasks};

/// Keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Table,
    /// Editing the name filter; holds the draft.
    NameFilter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Options for a table session.
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub bundles: Vec<Facet>,
    /// Bundle shown first.
    pub initial_bundle: usize,
    pub page_size: u64,
    /// Event types already selected (e.g. an endpoint's current subscriptions).
    /// Each bundle is seeded with the entries that belong to it.
    pub seed: Option<Vec<EventType>>,
}

pub struct AppState {
    pub selection: SelectionDriver,
    pub bundles: Vec<Facet>,
    pub bundle_index: usize,
    /// Selection of every bundle visited or seeded, keyed by bundle display
    /// name. The active bundle's entry is refreshed on switch and accept.
    pub selections: BTreeMap<String, Vec<EventType>>,
    pub page_size: u64,
    /// Index into the active bundle's applications; `None` shows all.
    pub application_index: Option<usize>,
    pub name_filter: Option<String>,
    /// Page the table is waiting for or showing.
    pub requested: Option<PageDescriptor>,
    pub cursor: usize,
    pub input: InputMode,
    pub status: Option<StatusMessage>,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub spinner_frame: usize,
    pub viewport: (u16, u16),
    pub should_quit: bool,
    /// Set when the user accepts the selection.
    pub accepted: Option<Vec<EventType>>,
}

impl AppState {
    pub fn new(options: TableOptions) -> Self {
        let bundle_index = options
            .initial_bundle
            .min(options.bundles.len().saturating_sub(1));
        let mut selections: BTreeMap<String, Vec<EventType>> = BTreeMap::new();
        for event in options.seed.into_iter().flatten() {
            selections
                .entry(event.bundle_display_name.clone())
                .or_default()
                .push(event);
        }
        Self {
            selection: SelectionDriver::new(),
            bundles: options.bundles,
            bundle_index,
            selections,
            page_size: options.page_size.max(1),
            application_index: None,
            name_filter: None,
            requested: None,
            cursor: 0,
            input: InputMode::Table,
            status: None,
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
            viewport: (0, 0),
            should_quit: false,
            accepted: None,
        }
    }

    pub fn active_bundle(&self) -> Option<&Facet> {
        self.bundles.get(self.bundle_index)
    }

    pub fn active_application(&self) -> Option<&Facet> {
        let index = self.application_index?;
        self.active_bundle()?.children.get(index)
    }

    /// Filters derived from the active bundle, application and name filter.
    pub fn filters(&self) -> Option<EventTypeFilters> {
        let bundle = self.active_bundle()?;
        let mut filters =
            EventTypeFilters::for_bundle(bundle.id.clone()).with_name(self.name_filter.clone());
        if let Some(app) = self.active_application() {
            filters = filters.with_application(app.id.clone());
        }
        Some(filters)
    }

    /// Saved selection for the active bundle.
    pub fn bundle_seed(&self) -> Option<Vec<EventType>> {
        let bundle = self.active_bundle()?;
        self.selections.get(&bundle.display_name).cloned()
    }

    /// Writes the driver's selection back under the bundle it belongs to.
    pub fn save_selection(&mut self) {
        let Some(name) = self.selection.active_bundle() else {
            return;
        };
        let Some(bundle) = self.bundles.iter().find(|b| b.name == name) else {
            return;
        };
        let selected = self.selection.snapshot().snapshot_as_ordered_list();
        self.selections.insert(bundle.display_name.clone(), selected);
    }

    /// Selection across every bundle, ordered by id.
    pub fn selection_across_bundles(&mut self) -> Vec<EventType> {
        self.save_selection();
        let by_id: BTreeMap<&str, &EventType> = self
            .selections
            .values()
            .flatten()
            .map(|event| (event.id.as_str(), event))
            .collect();
        by_id.into_values().cloned().collect()
    }

    /// Rows of the page on display with their selection flags.
    pub fn rows(&self) -> Vec<SelectableEventType> {
        self.selection
            .current_page()
            .map(|page| mark_selected(&self.selection.snapshot(), &page.items))
            .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.selection
            .current_page()
            .map_or(0, |page| page.items.len())
    }

    pub fn row_at_cursor(&self) -> Option<&EventType> {
        self.selection
            .current_page()
            .and_then(|page| page.items.get(self.cursor))
    }

    pub fn is_loading(&self) -> bool {
        self.tasks.page_load.is_running()
    }

    /// `(index, last)` of the page on display.
    pub fn page_position(&self) -> Option<(u64, u64)> {
        let descriptor = self.selection.current_descriptor()?;
        Some((
            descriptor.index(),
            descriptor.last_page_index(self.selection.total_count()),
        ))
    }
}
