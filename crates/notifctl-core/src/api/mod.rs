//! REST client for the notifications and integrations services.
//!
//! Only the read endpoints the selection table needs are covered:
//! bundle facets, paged event types and an endpoint's current event types.

mod error;
mod types;

use std::time::Duration;

use anyhow::{Context, Result};
use notifctl_types::{EventType, Facet, Page, PageDescriptor};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

pub use self::error::{ApiError, ApiErrorKind};
use self::error::classify_reqwest_error;
use self::types::{BundleFacetsResponse, EndpointResponse, EventTypesResponse};
use crate::config::{Config, DEFAULT_BASE_URL};
use crate::paging::PageProvider;

/// Standard User-Agent header for notifctl requests.
pub const USER_AGENT: &str = concat!("notifctl/", env!("CARGO_PKG_VERSION"));

const NOTIFICATIONS_PATH: &str = "/api/notifications/v1.0";
const INTEGRATIONS_PATH: &str = "/api/integrations/v1.0";
const IDENTITY_HEADER: &str = "x-rh-identity";
const BLOCK_REAL_API_ENV: &str = "NOTIFCTL_BLOCK_REAL_API";

/// Client connection settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub identity: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Resolves settings from the loaded config and environment.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.resolved_base_url()?,
            token: config.resolved_token(),
            identity: config
                .auth
                .identity
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            timeout: config.request_timeout(),
        })
    }
}

/// Read-only client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NotificationsClient {
    base_url: String,
    http: reqwest::Client,
}

impl NotificationsClient {
    /// # Errors
    /// Returns an error if the credentials are not valid header values or
    /// the production API is blocked in this environment.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        guard_production_url(&base_url)?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .context("Bearer token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(identity) = &config.identity {
            let mut value =
                HeaderValue::from_str(identity).context("Identity is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(IDENTITY_HEADER), value);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists bundles with their applications.
    ///
    /// # Errors
    /// Returns an `ApiError` on transport, status or parse failure.
    pub async fn bundle_facets(&self) -> Result<Vec<Facet>> {
        let url = format!(
            "{}{NOTIFICATIONS_PATH}/notifications/facets/bundles",
            self.base_url
        );
        let request = self
            .http
            .get(&url)
            .query(&[("includeApplications", "true")]);
        let facets: BundleFacetsResponse = self.send_json(request).await?;
        Ok(facets)
    }

    /// Fetches one page of event types.
    ///
    /// `bundle_display_name` is stamped on each item since the endpoint does
    /// not return it.
    ///
    /// # Errors
    /// Returns an `ApiError` on transport, status or parse failure.
    pub async fn event_types(
        &self,
        descriptor: &PageDescriptor,
        bundle_display_name: &str,
    ) -> Result<Page<EventType>> {
        let url = format!("{}{NOTIFICATIONS_PATH}/notifications/eventTypes", self.base_url);
        let request = self.http.get(&url).query(&event_type_query(descriptor));

        let response: EventTypesResponse = self.send_json(request).await?;
        tracing::debug!(
            page = descriptor.index(),
            items = response.data.len(),
            total = response.meta.count,
            "fetched event types"
        );
        Ok(Page {
            items: response
                .data
                .into_iter()
                .map(|record| record.into_event_type(bundle_display_name))
                .collect(),
            total_count: response.meta.count,
        })
    }

    /// Event types an integration endpoint is currently subscribed to.
    ///
    /// # Errors
    /// Returns an `ApiError` on transport, status or parse failure.
    pub async fn endpoint_event_types(&self, endpoint_id: &str) -> Result<Vec<EventType>> {
        let url = endpoint_url(&self.base_url, endpoint_id)?;
        let response: EndpointResponse = self.send_json(self.http.get(url)).await?;
        Ok(response.into_event_types())
    }

    /// Scopes this client to one bundle as a `PageProvider`.
    pub fn for_bundle(&self, bundle: &Facet) -> BundleEventTypes {
        BundleEventTypes {
            client: self.clone(),
            bundle_display_name: bundle.display_name.clone(),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        if !status.is_success() {
            return Err(ApiError::http_status(status.as_u16(), &body).into());
        }

        serde_json::from_str(&body).map_err(|e| {
            anyhow::Error::from(ApiError::parse(
                format!("Unexpected response payload: {e}"),
                &body,
            ))
        })
    }
}

/// `GET /endpoints/{id}` with the id encoded as a single path segment.
fn endpoint_url(base_url: &str, endpoint_id: &str) -> Result<url::Url> {
    let mut url = url::Url::parse(base_url)
        .with_context(|| format!("Invalid base URL: {base_url}"))?;
    url.path_segments_mut()
        .map_err(|()| anyhow::anyhow!("Base URL cannot carry a path: {base_url}"))?
        .pop_if_empty()
        .extend(INTEGRATIONS_PATH.split('/').filter(|s| !s.is_empty()))
        .push("endpoints")
        .push(endpoint_id);
    Ok(url)
}

/// Query pairs for `GET /notifications/eventTypes`.
fn event_type_query(descriptor: &PageDescriptor) -> Vec<(&'static str, String)> {
    let filters = descriptor.filters();
    let mut query = vec![
        ("limit", descriptor.size().to_string()),
        ("offset", descriptor.offset().to_string()),
        ("bundleId", filters.bundle_id.clone()),
    ];
    query.extend(
        filters
            .application_ids
            .iter()
            .map(|id| ("applicationIds", id.clone())),
    );
    if let Some(name) = &filters.name {
        query.push(("eventTypeName", name.clone()));
    }
    query
}

/// Event types of one bundle, served page by page.
#[derive(Debug, Clone)]
pub struct BundleEventTypes {
    client: NotificationsClient,
    bundle_display_name: String,
}

impl PageProvider for BundleEventTypes {
    async fn fetch_page(&self, descriptor: &PageDescriptor) -> Result<Page<EventType>> {
        self.client
            .event_types(descriptor, &self.bundle_display_name)
            .await
    }
}

/// Refuses the production console when `NOTIFCTL_BLOCK_REAL_API` is set,
/// and always under `cfg(test)`.
fn guard_production_url(base_url: &str) -> Result<()> {
    let blocked = cfg!(test) || std::env::var_os(BLOCK_REAL_API_ENV).is_some();
    if blocked && base_url == DEFAULT_BASE_URL {
        anyhow::bail!("Refusing to call the production API ({BLOCK_REAL_API_ENV} is set)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use notifctl_types::EventTypeFilters;

    use super::*;

    fn config(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            token: Some("secret".to_string()),
            identity: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_event_type_query_includes_filters_in_order() {
        let filters = EventTypeFilters::for_bundle("b1")
            .with_application("a2")
            .with_application("a1")
            .with_name(Some("policy".to_string()));
        let descriptor = PageDescriptor::new(3, 20, filters);

        let query = event_type_query(&descriptor);
        assert_eq!(
            query,
            vec![
                ("limit", "20".to_string()),
                ("offset", "40".to_string()),
                ("bundleId", "b1".to_string()),
                ("applicationIds", "a1".to_string()),
                ("applicationIds", "a2".to_string()),
                ("eventTypeName", "policy".to_string()),
            ]
        );
    }

    #[test]
    fn test_endpoint_id_is_a_single_path_segment() {
        let url = endpoint_url("http://localhost:8085", "ep/../1?x=y").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8085/api/integrations/v1.0/endpoints/ep%2F..%2F1%3Fx=y"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_endpoint_url_keeps_base_path_prefix() {
        let url = endpoint_url("http://localhost:8085/console", "ep1").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8085/console/api/integrations/v1.0/endpoints/ep1"
        );
    }

    #[test]
    fn test_production_url_is_blocked_in_tests() {
        assert!(NotificationsClient::new(config(DEFAULT_BASE_URL)).is_err());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = NotificationsClient::new(config("http://localhost:8085/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8085");
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let mut cfg = config("http://localhost:8085");
        cfg.token = Some("bad\ntoken".to_string());
        assert!(NotificationsClient::new(cfg).is_err());
    }
}
