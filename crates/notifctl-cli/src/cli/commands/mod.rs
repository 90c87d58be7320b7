//! CLI command handlers.

pub mod bundles;
pub mod config;
pub mod event_types;
#[cfg(feature = "tui")]
pub mod pick;
pub mod select;

use anyhow::{Context, Result, bail};
use notifctl_core::api::{ClientConfig, NotificationsClient};
use notifctl_core::config::Config;
use notifctl_core::types::{EventType, EventTypeFilters, Facet, PageDescriptor, find_bundle};

/// Which event types a command works on.
#[derive(Debug, Clone)]
pub struct Collection {
    pub bundle: String,
    pub applications: Vec<String>,
    pub name: Option<String>,
    pub page_size: Option<u64>,
}

impl Collection {
    /// Resolves application names against the bundle's facets.
    fn filters(&self, bundle: &Facet) -> Result<EventTypeFilters> {
        let mut filters = EventTypeFilters::for_bundle(&bundle.id);
        for key in &self.applications {
            let Some(application) = bundle.application(key) else {
                bail!(
                    "Unknown application '{key}' in bundle '{}'",
                    bundle.display_name
                );
            };
            filters = filters.with_application(&application.id);
        }
        Ok(filters.with_name(self.name.clone()))
    }

    fn page_size(&self, config: &Config) -> u64 {
        self.page_size.unwrap_or(config.page_size)
    }

    /// Descriptor for page `index` of this collection.
    pub fn descriptor(&self, config: &Config, bundle: &Facet, index: u64) -> Result<PageDescriptor> {
        Ok(PageDescriptor::new(
            index,
            self.page_size(config),
            self.filters(bundle)?,
        ))
    }
}

pub fn connect(config: &Config) -> Result<NotificationsClient> {
    let client_config = ClientConfig::from_config(config)?;
    NotificationsClient::new(client_config).context("build API client")
}

pub async fn fetch_bundles(client: &NotificationsClient) -> Result<Vec<Facet>> {
    client
        .bundle_facets()
        .await
        .with_context(|| format!("list bundles from {}", client.base_url()))
}

pub fn resolve_bundle<'a>(bundles: &'a [Facet], key: &str) -> Result<&'a Facet> {
    find_bundle(bundles, key).with_context(|| {
        let known: Vec<&str> = bundles.iter().map(|b| b.name.as_str()).collect();
        format!("Unknown bundle '{key}' (known: {})", known.join(", "))
    })
}

/// Endpoint subscriptions that belong to `bundle`.
pub async fn endpoint_seed(
    client: &NotificationsClient,
    endpoint_id: &str,
    bundle: &Facet,
) -> Result<Vec<EventType>> {
    let events = client
        .endpoint_event_types(endpoint_id)
        .await
        .with_context(|| format!("load event types of endpoint '{endpoint_id}'"))?;
    Ok(events
        .into_iter()
        .filter(|event| event.bundle_display_name == bundle.display_name)
        .collect())
}
