//! UI event types.
//!
//! All inputs (terminal, async results) are converted to `UiEvent` before the
//! reducer sees them. Async work reports through the runtime inbox using a
//! uniform lifecycle:
//! - `TaskStarted` once a task is spawned (carries its cancel token)
//! - `TaskCompleted` wrapping the result event
//!
//! The reducer drops completions whose task id is no longer active.

use crossterm::event::Event as CrosstermEvent;
use notifctl_core::selection::WalkOutcome;
use notifctl_core::types::{EventType, Page, PageDescriptor};

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (spinner animation).
    Tick,

    /// Current terminal size, sent before other events each frame.
    Frame { width: u16, height: u16 },

    /// Raw terminal input.
    Terminal(CrosstermEvent),

    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },

    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    /// A page fetch finished.
    PageLoaded {
        descriptor: PageDescriptor,
        result: Result<Page<EventType>, String>,
    },

    /// A select-all walk finished, was cut short, or was cancelled.
    SelectAllFinished(WalkOutcome),
}
