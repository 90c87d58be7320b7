//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use notifctl_core::logging::{self, LogTarget};
use notifctl_core::types::SelectionCommand;
use notifctl_core::{config, interrupt};

mod commands;

#[derive(Parser)]
#[command(name = "notifctl")]
#[command(version)]
#[command(about = "Select notification event types in bulk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging for notifctl (overridden by NOTIFCTL_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Arguments that pick the event-type collection.
#[derive(clap::Args, Debug, Clone)]
struct CollectionArgs {
    /// Bundle name or display name
    #[arg(short, long, value_name = "BUNDLE")]
    bundle: String,

    /// Restrict to an application (name or display name); repeatable
    #[arg(long = "app", value_name = "APP")]
    applications: Vec<String>,

    /// Only event types whose name contains TEXT
    #[arg(long, value_name = "TEXT")]
    name: Option<String>,

    /// Override page_size from config
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    page_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CommandArg {
    /// Every event type matching the filters, across all pages
    All,
    /// Every event type on the loaded page
    Page,
    /// Clear the selection
    None,
}

impl From<CommandArg> for SelectionCommand {
    fn from(arg: CommandArg) -> Self {
        match arg {
            CommandArg::All => SelectionCommand::All,
            CommandArg::Page => SelectionCommand::Page,
            CommandArg::None => SelectionCommand::None,
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List bundles and their applications
    Bundles,

    /// Print one page of event types
    EventTypes {
        #[command(flatten)]
        collection: CollectionArgs,

        /// 1-based page index
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Apply a bulk selection command and print the resulting selection as JSON
    Select {
        #[command(flatten)]
        collection: CollectionArgs,

        /// Bulk command to apply
        #[arg(short, long, value_enum)]
        command: CommandArg,

        /// Page to load before applying the command
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Seed the selection with an integration endpoint's event types
        #[arg(long, value_name = "ENDPOINT_ID")]
        endpoint: Option<String>,

        /// Flip one event type after the command (id); repeatable
        #[arg(long, value_name = "EVENT_TYPE_ID")]
        toggle: Vec<String>,
    },

    /// Open the interactive selection table
    #[cfg(feature = "tui")]
    Pick {
        /// Bundle to show first (defaults to the first bundle)
        #[arg(short, long, value_name = "BUNDLE")]
        bundle: Option<String>,

        /// Seed the selection with an integration endpoint's event types
        #[arg(long, value_name = "ENDPOINT_ID")]
        endpoint: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Store the console base URL in the config file
    SetBaseUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // The table owns the terminal, so interactive sessions log to a file.
    #[cfg(feature = "tui")]
    let target = if matches!(cli.command, Commands::Pick { .. }) {
        LogTarget::default_file()
    } else {
        LogTarget::Stderr
    };
    #[cfg(not(feature = "tui"))]
    let target = LogTarget::Stderr;
    let _log_guard = logging::init(target, cli.verbose)?;

    interrupt::init()?;

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, .. } = cli;
    let load_config = || config::Config::load().context("load config");

    match command {
        Commands::Bundles => commands::bundles::run(&load_config()?).await,
        Commands::EventTypes {
            collection,
            page,
            json,
        } => {
            commands::event_types::run(
                &load_config()?,
                &commands::Collection::from(collection),
                page,
                json,
            )
            .await
        }
        Commands::Select {
            collection,
            command,
            page,
            endpoint,
            toggle,
        } => {
            commands::select::run(commands::select::SelectOptions {
                config: &load_config()?,
                collection: &commands::Collection::from(collection),
                command: command.into(),
                page,
                endpoint: endpoint.as_deref(),
                toggles: &toggle,
            })
            .await
        }
        #[cfg(feature = "tui")]
        Commands::Pick { bundle, endpoint } => {
            commands::pick::run(&load_config()?, bundle.as_deref(), endpoint.as_deref()).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetBaseUrl { url } => commands::config::set_base_url(&url),
        },
    }
}

impl From<CollectionArgs> for commands::Collection {
    fn from(args: CollectionArgs) -> Self {
        Self {
            bundle: args.bundle,
            applications: args.applications,
            name: args.name,
            page_size: args.page_size,
        }
    }
}
