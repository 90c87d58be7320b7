//! `notifctl pick`: interactive selection table.

use anyhow::{Context, Result};
use notifctl_core::config::Config;
use notifctl_tui::TableOptions;

pub async fn run(config: &Config, bundle: Option<&str>, endpoint: Option<&str>) -> Result<()> {
    let client = super::connect(config)?;
    let bundles = super::fetch_bundles(&client).await?;

    let initial_bundle = match bundle {
        Some(key) => {
            let found = super::resolve_bundle(&bundles, key)?;
            bundles
                .iter()
                .position(|b| b.id == found.id)
                .unwrap_or_default()
        }
        None => 0,
    };

    // The table filters the seed per bundle as the user switches bundles.
    let seed = match endpoint {
        Some(endpoint_id) => Some(
            client
                .endpoint_event_types(endpoint_id)
                .await
                .with_context(|| format!("load event types of endpoint '{endpoint_id}'"))?,
        ),
        None => None,
    };

    let accepted = notifctl_tui::run_selection_table(
        client,
        TableOptions {
            bundles,
            initial_bundle,
            page_size: config.page_size,
            seed,
        },
    )?;

    match accepted {
        Some(selected) => println!("{}", serde_json::to_string_pretty(&selected)?),
        None => eprintln!("Selection discarded."),
    }
    Ok(())
}
