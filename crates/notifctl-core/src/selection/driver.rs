//! Reconciliation driver.
//!
//! Executes the bulk selection commands against a collection that may be
//! larger than the page currently loaded. Local commands (NONE, PAGE, toggle)
//! complete synchronously. ALL either merges the loaded page (when it holds
//! the whole collection) or produces a `WalkJob` that walks every page.
//!
//! ## Walk lifecycle
//!
//! ```text
//! begin_select_all() -> SelectAll::Walk(job)
//! job.run(provider).await -> WalkOutcome          (sequential page walk)
//! finish_select_all(outcome) -> Option<SelectAllReport>
//! ```
//!
//! The job carries the generation that started it. `activate_bundle` bumps
//! the generation and cancels the job's token, so an outcome that lands after
//! a bundle change is discarded without touching the store.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::StreamExt;
use notifctl_types::{EventType, Page, PageDescriptor};
use tokio_util::sync::CancellationToken;

use super::store::SelectionStore;
use crate::paging::{LoadedPage, PageProvider, page_walk};

/// Identifies one bundle activation. Outcomes from older generations are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

/// Receives the full ordered selection whenever it changes.
pub trait SelectionObserver: Send {
    fn selection_changed(&mut self, selected: &[EventType]);
}

impl<F> SelectionObserver for F
where
    F: FnMut(&[EventType]) + Send,
{
    fn selection_changed(&mut self, selected: &[EventType]) {
        self(selected);
    }
}

/// Result of `begin_select_all`.
#[derive(Debug)]
pub enum SelectAll {
    /// Satisfied from the loaded page; `added` entries changed.
    Local { added: usize },
    /// More pages are needed; run the job and hand its outcome back.
    Walk(WalkJob),
    /// A walk is already running; bulk commands are disabled until it ends.
    Busy,
}

/// Why a walk ended before its last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkStop {
    /// A page fetch failed or returned an unexpected payload.
    Failed { page: u64, error: String },
    /// The walk was aborted by a bundle change.
    Cancelled,
}

/// A pending multi-page walk for the ALL command.
#[derive(Debug)]
pub struct WalkJob {
    generation: Generation,
    template: PageDescriptor,
    last_page: u64,
    loaded: Option<LoadedPage>,
    cancel: CancellationToken,
}

/// What a finished (or aborted) walk collected.
#[derive(Debug)]
pub struct WalkOutcome {
    pub generation: Generation,
    pub collected: Vec<EventType>,
    pub pages_walked: u64,
    pub last_page: u64,
    pub stopped: Option<WalkStop>,
}

/// Summary of a committed ALL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectAllReport {
    pub added: usize,
    pub pages_walked: u64,
    pub last_page: u64,
    pub stopped: Option<WalkStop>,
}

impl SelectAllReport {
    pub fn is_partial(&self) -> bool {
        self.stopped.is_some()
    }
}

impl WalkJob {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn last_page(&self) -> u64 {
        self.last_page
    }

    /// Token that aborts this walk.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Walks pages `1..=last_page` in order, stopping at the first failure
    /// or when cancelled. Never fails: partial results are returned.
    pub async fn run<P: PageProvider>(self, provider: P) -> WalkOutcome {
        let WalkJob {
            generation,
            template,
            last_page,
            loaded,
            cancel,
        } = self;

        let mut collected: BTreeMap<String, EventType> = BTreeMap::new();
        let mut pages_walked = 0;
        let mut stopped = None;

        let walk = page_walk(provider, template, last_page, loaded);
        futures_util::pin_mut!(walk);

        loop {
            let step = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    stopped = Some(WalkStop::Cancelled);
                    break;
                }
                step = walk.next() => step,
            };
            let Some(step) = step else {
                break;
            };
            match step.result {
                Ok(items) => {
                    pages_walked += 1;
                    for event in items {
                        collected.insert(event.id.clone(), event);
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        page = step.index,
                        last_page,
                        error = %format!("{error:#}"),
                        "select-all stopped early"
                    );
                    stopped = Some(WalkStop::Failed {
                        page: step.index,
                        error: format!("{error:#}"),
                    });
                    break;
                }
            }
        }

        WalkOutcome {
            generation,
            collected: collected.into_values().collect(),
            pages_walked,
            last_page,
            stopped,
        }
    }
}

struct ActiveWalk {
    generation: Generation,
    cancel: CancellationToken,
}

struct CurrentPage {
    descriptor: PageDescriptor,
    page: Page<EventType>,
}

/// Keeps the selection consistent with a paginated, filterable collection.
///
/// Only the driver mutates the store. Each change replaces the shared
/// snapshot, so snapshots handed out earlier never change.
pub struct SelectionDriver {
    store: Arc<SelectionStore>,
    generation: Generation,
    bundle: Option<String>,
    current: Option<CurrentPage>,
    walk: Option<ActiveWalk>,
    observer: Option<Box<dyn SelectionObserver>>,
}

impl Default for SelectionDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SelectionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionDriver")
            .field("selected", &self.store.len())
            .field("generation", &self.generation)
            .field("bundle", &self.bundle)
            .field("walking", &self.walk.is_some())
            .finish_non_exhaustive()
    }
}

impl SelectionDriver {
    pub fn new() -> Self {
        Self {
            store: Arc::new(SelectionStore::new()),
            generation: Generation::default(),
            bundle: None,
            current: None,
            walk: None,
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl SelectionObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Current selection snapshot.
    pub fn snapshot(&self) -> Arc<SelectionStore> {
        Arc::clone(&self.store)
    }

    pub fn selected_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.store.contains(id)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn active_bundle(&self) -> Option<&str> {
        self.bundle.as_deref()
    }

    pub fn is_walking(&self) -> bool {
        self.walk.is_some()
    }

    pub fn current_descriptor(&self) -> Option<&PageDescriptor> {
        self.current.as_ref().map(|c| &c.descriptor)
    }

    pub fn current_page(&self) -> Option<&Page<EventType>> {
        self.current.as_ref().map(|c| &c.page)
    }

    /// Total size of the remote collection as last reported (0 before any load).
    pub fn total_count(&self) -> u64 {
        self.current.as_ref().map_or(0, |c| c.page.total_count)
    }

    /// Makes `bundle` active: reseeds the store and abandons any running walk.
    pub fn activate_bundle(&mut self, bundle: impl Into<String>, seed: Option<Vec<EventType>>) {
        let bundle = bundle.into();
        if let Some(walk) = self.walk.take() {
            tracing::debug!(generation = walk.generation.0, "aborting walk on bundle change");
            walk.cancel.cancel();
        }
        self.generation = self.generation.next();
        self.current = None;
        self.store = Arc::new(SelectionStore::seeded(seed.unwrap_or_default()));
        tracing::info!(
            bundle = %bundle,
            generation = self.generation.0,
            seeded = self.store.len(),
            "bundle activated"
        );
        self.bundle = Some(bundle);
        self.notify();
    }

    /// Records the page now on display.
    pub fn page_loaded(&mut self, descriptor: PageDescriptor, page: Page<EventType>) {
        tracing::debug!(
            page = descriptor.index(),
            items = page.items.len(),
            total = page.total_count,
            "page loaded"
        );
        self.current = Some(CurrentPage { descriptor, page });
    }

    /// Forgets the loaded page (filters changed, reload pending).
    pub fn page_reset(&mut self) {
        self.current = None;
    }

    /// Adds or removes a single event type.
    pub fn toggle(&mut self, event: &EventType, selected: bool) -> bool {
        if selected {
            self.mutate(|store| store.add(event.clone()))
        } else {
            self.mutate(|store| store.remove(&event.id))
        }
    }

    /// NONE: clears the selection. Returns `false` while a walk is running.
    pub fn select_none(&mut self) -> bool {
        if self.reject_while_walking("none") {
            return false;
        }
        self.mutate(SelectionStore::clear);
        true
    }

    /// PAGE: merges the loaded page. Returns the number of changed entries,
    /// or `None` while a walk is running.
    pub fn select_page(&mut self) -> Option<usize> {
        if self.reject_while_walking("page") {
            return None;
        }
        Some(self.merge_current_page())
    }

    /// ALL, first half: merges locally or hands out a walk job.
    pub fn begin_select_all(&mut self) -> SelectAll {
        if self.reject_while_walking("all") {
            return SelectAll::Busy;
        }
        let Some(current) = &self.current else {
            return SelectAll::Local { added: 0 };
        };
        if current.page.is_complete() {
            return SelectAll::Local {
                added: self.merge_current_page(),
            };
        }

        let last_page = current.descriptor.last_page_index(current.page.total_count);
        let cancel = CancellationToken::new();
        let job = WalkJob {
            generation: self.generation,
            template: current.descriptor.clone(),
            last_page,
            loaded: Some(LoadedPage {
                index: current.descriptor.index(),
                items: current.page.items.clone(),
            }),
            cancel: cancel.clone(),
        };
        self.walk = Some(ActiveWalk {
            generation: self.generation,
            cancel,
        });
        tracing::info!(
            total = current.page.total_count,
            last_page,
            "select-all walking pages"
        );
        SelectAll::Walk(job)
    }

    /// ALL, second half: commits the walk's results in one update.
    ///
    /// Returns `None` when the outcome belongs to an older generation.
    pub fn finish_select_all(&mut self, outcome: WalkOutcome) -> Option<SelectAllReport> {
        if outcome.generation != self.generation {
            tracing::debug!(
                outcome = outcome.generation.0,
                current = self.generation.0,
                "discarding stale select-all outcome"
            );
            return None;
        }
        if self
            .walk
            .as_ref()
            .is_some_and(|walk| walk.generation == outcome.generation)
        {
            self.walk = None;
        }

        let WalkOutcome {
            collected,
            pages_walked,
            last_page,
            stopped,
            ..
        } = outcome;

        let mut added = 0;
        self.mutate(|store| {
            let merged = store.merge(collected);
            added = merged.added;
            merged.changed()
        });
        tracing::info!(added, pages_walked, last_page, partial = stopped.is_some(), "select-all committed");

        Some(SelectAllReport {
            added,
            pages_walked,
            last_page,
            stopped,
        })
    }

    /// ALL in one call, for callers that do not interleave other commands.
    pub async fn select_all<P: PageProvider>(&mut self, provider: P) -> Option<SelectAllReport> {
        match self.begin_select_all() {
            SelectAll::Local { added } => Some(SelectAllReport {
                added,
                pages_walked: 0,
                last_page: 1,
                stopped: None,
            }),
            SelectAll::Walk(job) => {
                let outcome = job.run(provider).await;
                self.finish_select_all(outcome)
            }
            SelectAll::Busy => None,
        }
    }

    fn merge_current_page(&mut self) -> usize {
        let Some(items) = self.current.as_ref().map(|c| c.page.items.clone()) else {
            return 0;
        };
        let mut added = 0;
        self.mutate(|store| {
            let merged = store.merge(items);
            added = merged.added;
            merged.changed()
        });
        added
    }

    fn reject_while_walking(&self, command: &str) -> bool {
        if self.walk.is_some() {
            tracing::debug!(command, "bulk selection disabled while select-all is running");
            true
        } else {
            false
        }
    }

    /// Applies `f` to a fresh copy of the store; publishes it if it changed.
    fn mutate(&mut self, f: impl FnOnce(&mut SelectionStore) -> bool) -> bool {
        let mut next = Arc::clone(&self.store);
        let changed = f(Arc::make_mut(&mut next));
        if changed {
            self.store = next;
            self.notify();
        }
        changed
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.selection_changed(&self.store.snapshot_as_ordered_list());
        }
    }
}
