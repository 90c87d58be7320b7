//! Tracing subscriber setup.
//!
//! Filter priority (highest to lowest):
//! 1. `NOTIFCTL_LOG`
//! 2. `RUST_LOG`
//! 3. `--verbose` (debug for notifctl crates, warn elsewhere)
//! 4. `warn`
//!
//! The TUI owns the terminal, so interactive sessions log to
//! `$NOTIFCTL_HOME/logs/notifctl.log` instead of stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_ENV: &str = "NOTIFCTL_LOG";
const LOG_FILE_NAME: &str = "notifctl.log";

/// Where log lines go.
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    /// Append to a file inside this directory.
    File(PathBuf),
}

impl LogTarget {
    /// File target under `$NOTIFCTL_HOME/logs`.
    pub fn default_file() -> Self {
        Self::File(crate::config::paths::logs_dir())
    }
}

/// Keeps the background log writer alive; drop it last to flush.
#[must_use]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// Returns an error if the log directory cannot be created or a subscriber
/// is already installed.
pub fn init(target: LogTarget, verbose: bool) -> Result<LogGuard> {
    let filter = build_env_filter(verbose);

    match target {
        LogTarget::Stderr => {
            let ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(ansi)
                        .without_time()
                        .compact(),
                )
                .try_init()
                .context("Failed to install tracing subscriber")?;
            Ok(LogGuard { _worker: None })
        }
        LogTarget::File(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .context("Failed to install tracing subscriber")?;
            Ok(LogGuard {
                _worker: Some(guard),
            })
        }
    }
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(default_directive(verbose))
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,notifctl=debug,notifctl_core=debug,notifctl_tui=debug"
    } else {
        "warn"
    }
}
