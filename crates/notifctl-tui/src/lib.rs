//! Full-screen selection table for event types.

pub mod common;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use notifctl_core::api::NotificationsClient;
use notifctl_core::types::EventType;
pub use runtime::TuiRuntime;
pub use state::TableOptions;

/// Runs the interactive table.
///
/// Returns the accepted selection, or `None` if the user quit without
/// accepting.
///
/// # Errors
/// Returns an error if stdout is not a terminal or the terminal fails.
pub fn run_selection_table(
    client: NotificationsClient,
    options: TableOptions,
) -> Result<Option<Vec<EventType>>> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The selection table requires a terminal.\n\
             Use `notifctl select` for non-interactive selection."
        );
    }
    if options.bundles.is_empty() {
        anyhow::bail!("No bundles to show");
    }

    let mut runtime = TuiRuntime::new(client, options)?;
    runtime.run()?;
    let accepted = runtime.state.accepted.take();
    drop(runtime);
    Ok(accepted)
}
