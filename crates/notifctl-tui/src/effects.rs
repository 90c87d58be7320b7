//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They cover I/O and task spawning only; the reducer never performs either.

use notifctl_core::selection::WalkJob;
use notifctl_core::types::{Facet, PageDescriptor};
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};

#[derive(Debug)]
pub enum UiEffect {
    /// Leave the event loop.
    Quit,

    /// Fetch one page of `bundle`'s event types.
    LoadPage {
        task: TaskId,
        bundle: Facet,
        descriptor: PageDescriptor,
    },

    /// Run a select-all walk over `bundle`'s pages.
    RunSelectAll {
        task: TaskId,
        bundle: Facet,
        job: WalkJob,
    },

    /// Cancel an in-progress task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
