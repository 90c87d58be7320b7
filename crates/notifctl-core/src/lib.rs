//! Core notifctl library (config, API client, selection engine).
//!
//! - `api`: REST client for the notifications and integrations services
//! - `config`: configuration file and path resolution
//! - `interrupt`: Ctrl+C handling for long-running commands
//! - `logging`: tracing subscriber setup
//! - `paging`: the `PageProvider` seam and the lazy page walk
//! - `selection`: selection store and reconciliation driver

pub mod api;
pub mod config;
pub mod interrupt;
pub mod logging;
pub mod paging;
pub mod selection;

pub use notifctl_types as types;
