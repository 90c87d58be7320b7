//! `notifctl select`: applies one bulk command and prints the selection.
//!
//! The selection is printed to stdout as a JSON array ordered by id, so the
//! output can be piped into other tools. Progress and warnings go to stderr.

use anyhow::{Context, Result, bail};
use notifctl_core::config::Config;
use notifctl_core::interrupt::{self, InterruptedError};
use notifctl_core::paging::PageProvider;
use notifctl_core::selection::{SelectAll, SelectAllReport, SelectionDriver, WalkStop};
use notifctl_core::types::{EventType, SelectionCommand};

use super::Collection;

pub struct SelectOptions<'a> {
    pub config: &'a Config,
    pub collection: &'a Collection,
    pub command: SelectionCommand,
    pub page: u64,
    pub endpoint: Option<&'a str>,
    pub toggles: &'a [String],
}

pub async fn run(options: SelectOptions<'_>) -> Result<()> {
    let SelectOptions {
        config,
        collection,
        command,
        page,
        endpoint,
        toggles,
    } = options;

    let client = super::connect(config)?;
    let bundles = super::fetch_bundles(&client).await?;
    let bundle = super::resolve_bundle(&bundles, &collection.bundle)?;
    let descriptor = collection.descriptor(config, bundle, page)?;

    let seed = match endpoint {
        Some(endpoint_id) => Some(super::endpoint_seed(&client, endpoint_id, bundle).await?),
        None => None,
    };

    let mut driver = SelectionDriver::new().with_observer(|selected: &[EventType]| {
        tracing::debug!(selected = selected.len(), "selection changed");
    });
    driver.activate_bundle(bundle.name.clone(), seed);

    let provider = client.for_bundle(bundle);
    let loaded = provider
        .fetch_page(&descriptor)
        .await
        .with_context(|| format!("load page {page} of '{}'", bundle.display_name))?;
    driver.page_loaded(descriptor, loaded);

    match command {
        SelectionCommand::None => {
            driver.select_none();
        }
        SelectionCommand::Page => {
            driver.select_page();
        }
        SelectionCommand::All => {
            if let Some(report) = select_all(&mut driver, provider).await? {
                report_walk(&report);
            }
        }
    }

    for id in toggles {
        toggle(&mut driver, id)?;
    }

    let selected = driver.snapshot().snapshot_as_ordered_list();
    println!("{}", serde_json::to_string_pretty(&selected)?);
    eprintln!(
        "{} event type(s) selected in '{}' ({} matching)",
        selected.len(),
        bundle.display_name,
        driver.total_count()
    );
    Ok(())
}

/// Runs ALL, aborting the walk on Ctrl+C.
async fn select_all<P: PageProvider>(
    driver: &mut SelectionDriver,
    provider: P,
) -> Result<Option<SelectAllReport>> {
    let job = match driver.begin_select_all() {
        SelectAll::Local { added } => {
            tracing::debug!(added, "select-all satisfied by the loaded page");
            return Ok(None);
        }
        SelectAll::Walk(job) => job,
        SelectAll::Busy => return Ok(None),
    };

    let cancel = job.cancel_token();
    tokio::select! {
        outcome = job.run(provider) => Ok(driver.finish_select_all(outcome)),
        () = interrupt::wait_for_interrupt() => {
            cancel.cancel();
            Err(InterruptedError.into())
        }
    }
}

fn report_walk(report: &SelectAllReport) {
    match &report.stopped {
        None => eprintln!(
            "Walked {} page(s), {} newly selected",
            report.pages_walked, report.added
        ),
        Some(WalkStop::Failed { page, error }) => eprintln!(
            "Warning: select-all stopped at page {page} of {}: {error}\n\
             Kept {} event type(s) from the pages fetched before the failure.",
            report.last_page, report.added
        ),
        Some(WalkStop::Cancelled) => {
            eprintln!("Warning: select-all was cancelled before it finished");
        }
    }
}

/// Flips one event type, looking it up on the loaded page first.
fn toggle(driver: &mut SelectionDriver, id: &str) -> Result<()> {
    let on_page = driver
        .current_page()
        .and_then(|page| page.items.iter().find(|event| event.id == id))
        .cloned();
    let event = match on_page {
        Some(event) => event,
        None => match driver
            .snapshot()
            .snapshot_as_ordered_list()
            .into_iter()
            .find(|event| event.id == id)
        {
            Some(event) => event,
            None => bail!("Event type '{id}' is neither on the loaded page nor selected"),
        },
    };
    let selected = !driver.is_selected(id);
    driver.toggle(&event, selected);
    Ok(())
}
