//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use notifctl_core::selection::{SelectAll, SelectAllReport, WalkStop};
use notifctl_core::types::{EventType, Page, PageDescriptor};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, InputMode, StatusMessage};

const BULK_DISABLED: &str = "Bulk selection is disabled while select-all is running";

/// Effects needed to show the initial bundle.
pub fn start(app: &mut AppState) -> Vec<UiEffect> {
    activate_current_bundle(app)
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.viewport = (width, height);
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) if key.kind != KeyEventKind::Release => {
            handle_key(app, key)
        }
        UiEvent::Terminal(_) => vec![],
        UiEvent::TaskStarted { kind, started } => {
            app.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, task = completed.id.0, "dropping superseded task result");
                vec![]
            }
        }
        UiEvent::PageLoaded { descriptor, result } => {
            handle_page_loaded(app, descriptor, result);
            vec![]
        }
        UiEvent::SelectAllFinished(outcome) => {
            match app.selection.finish_select_all(outcome) {
                Some(report) => app.status = Some(select_all_status(&report)),
                None => tracing::debug!("select-all outcome belonged to a previous bundle"),
            }
            vec![]
        }
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return quit(app);
    }
    if let InputMode::NameFilter(draft) = &mut app.input {
        return match key.code {
            KeyCode::Esc => {
                app.input = InputMode::Table;
                vec![]
            }
            KeyCode::Enter => {
                let name = std::mem::take(draft);
                app.input = InputMode::Table;
                app.name_filter = Some(name).filter(|n| !n.trim().is_empty());
                reload_first_page(app)
            }
            KeyCode::Backspace => {
                draft.pop();
                vec![]
            }
            KeyCode::Char(c) => {
                draft.push(c);
                vec![]
            }
            _ => vec![],
        };
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => quit(app),
        KeyCode::Enter => {
            app.accepted = Some(app.selection_across_bundles());
            vec![UiEffect::Quit]
        }
        KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
            vec![]
        }
        KeyCode::Down => {
            if app.cursor + 1 < app.row_count() {
                app.cursor += 1;
            }
            vec![]
        }
        KeyCode::Char(' ') => {
            if let Some(event) = app.row_at_cursor().cloned() {
                let selected = !app.selection.is_selected(&event.id);
                app.selection.toggle(&event, selected);
            }
            vec![]
        }
        KeyCode::Char('a') => select_all(app),
        KeyCode::Char('p') => {
            app.status = Some(match app.selection.select_page() {
                Some(added) => StatusMessage::info(format!("Selected page ({added} added)")),
                None => StatusMessage::info(BULK_DISABLED),
            });
            vec![]
        }
        KeyCode::Char('n') => {
            app.status = Some(if app.selection.select_none() {
                StatusMessage::info("Cleared selection")
            } else {
                StatusMessage::info(BULK_DISABLED)
            });
            vec![]
        }
        KeyCode::Right => {
            let next = app
                .selection
                .current_descriptor()
                .and_then(|d| d.next(app.selection.total_count()));
            next.map_or_else(Vec::new, |descriptor| load_page(app, descriptor))
        }
        KeyCode::Left => {
            let previous = app
                .selection
                .current_descriptor()
                .and_then(PageDescriptor::previous);
            previous.map_or_else(Vec::new, |descriptor| load_page(app, descriptor))
        }
        KeyCode::Char('/') => {
            app.input = InputMode::NameFilter(app.name_filter.clone().unwrap_or_default());
            vec![]
        }
        KeyCode::Tab => {
            let apps = app.active_bundle().map_or(0, |b| b.children.len());
            app.application_index = match app.application_index {
                None if apps > 0 => Some(0),
                Some(i) if i + 1 < apps => Some(i + 1),
                _ => None,
            };
            reload_first_page(app)
        }
        KeyCode::Char('b') => {
            if app.bundles.len() > 1 {
                app.bundle_index = (app.bundle_index + 1) % app.bundles.len();
                activate_current_bundle(app)
            } else {
                vec![]
            }
        }
        _ => vec![],
    }
}

fn quit(app: &mut AppState) -> Vec<UiEffect> {
    app.accepted = None;
    let mut effects = cancel_select_all(app);
    effects.push(UiEffect::Quit);
    effects
}

fn select_all(app: &mut AppState) -> Vec<UiEffect> {
    match app.selection.begin_select_all() {
        SelectAll::Local { added } => {
            app.status = Some(StatusMessage::info(format!("Selected all ({added} added)")));
            vec![]
        }
        SelectAll::Busy => {
            app.status = Some(StatusMessage::info(BULK_DISABLED));
            vec![]
        }
        SelectAll::Walk(job) => {
            let Some(bundle) = app.active_bundle().cloned() else {
                return vec![];
            };
            let task = app.task_seq.next_id();
            app.tasks.select_all.begin(task);
            app.status = Some(StatusMessage::info(format!(
                "Selecting all event types across {} pages…",
                job.last_page()
            )));
            vec![UiEffect::RunSelectAll { task, bundle, job }]
        }
    }
}

fn cancel_select_all(app: &mut AppState) -> Vec<UiEffect> {
    if !app.tasks.select_all.is_running() {
        return vec![];
    }
    let token = app.tasks.select_all.cancel.take();
    app.tasks.select_all.clear();
    vec![UiEffect::CancelTask {
        kind: TaskKind::SelectAll,
        token,
    }]
}

/// Makes the bundle at `bundle_index` active and loads its first page.
///
/// The outgoing bundle's selection is saved first. Any running walk is
/// cancelled: its outcome belongs to the previous generation and is
/// discarded.
fn activate_current_bundle(app: &mut AppState) -> Vec<UiEffect> {
    let Some(bundle) = app.active_bundle().cloned() else {
        app.status = Some(StatusMessage::error("No bundles available"));
        return vec![];
    };
    let mut effects = cancel_select_all(app);
    app.save_selection();
    let seed = app.bundle_seed();
    app.selection.activate_bundle(bundle.name.clone(), seed);
    app.application_index = None;
    app.name_filter = None;
    app.status = None;
    effects.extend(reload_first_page(app));
    effects
}

fn reload_first_page(app: &mut AppState) -> Vec<UiEffect> {
    let Some(filters) = app.filters() else {
        return vec![];
    };
    app.selection.page_reset();
    load_page(app, PageDescriptor::first(app.page_size, filters))
}

fn load_page(app: &mut AppState, descriptor: PageDescriptor) -> Vec<UiEffect> {
    let Some(bundle) = app.active_bundle().cloned() else {
        return vec![];
    };
    let task = app.task_seq.next_id();
    app.tasks.page_load.begin(task);
    app.requested = Some(descriptor.clone());
    vec![UiEffect::LoadPage {
        task,
        bundle,
        descriptor,
    }]
}

fn handle_page_loaded(
    app: &mut AppState,
    descriptor: PageDescriptor,
    result: Result<Page<EventType>, String>,
) {
    if app.requested.as_ref() != Some(&descriptor) {
        return;
    }
    match result {
        Ok(page) => {
            app.selection.page_loaded(descriptor, page);
            app.cursor = app.cursor.min(app.row_count().saturating_sub(1));
        }
        Err(error) => {
            app.status = Some(StatusMessage::error(format!(
                "Failed to load page {}: {error}",
                descriptor.index()
            )));
        }
    }
}

fn select_all_status(report: &SelectAllReport) -> StatusMessage {
    match &report.stopped {
        None => StatusMessage::info(format!(
            "Selected all ({} added, {} pages)",
            report.added, report.pages_walked
        )),
        Some(WalkStop::Failed { page, error }) => StatusMessage::error(format!(
            "Select all stopped at page {page} of {}: {error} ({} added)",
            report.last_page, report.added
        )),
        Some(WalkStop::Cancelled) => StatusMessage::info("Select all cancelled"),
    }
}
