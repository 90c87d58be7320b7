//! Test doubles for the selection engine.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, bail};
use notifctl_types::{EventType, Page, PageDescriptor};
use tokio::sync::{Notify, oneshot};

use crate::paging::PageProvider;

/// Builds `count` event types with ids `{prefix}-000`, `{prefix}-001`, ...
pub fn event_types(prefix: &str, count: usize) -> Vec<EventType> {
    (0..count)
        .map(|i| EventType {
            id: format!("{prefix}-{i:03}"),
            name: format!("{prefix}-event-{i}"),
            display_name: format!("{prefix} event {i}"),
            application_display_name: "Advisor".to_string(),
            bundle_display_name: format!("{prefix} bundle"),
            description: None,
        })
        .collect()
}

/// In-memory page provider that slices a fixed collection.
///
/// Records every requested page index, can fail a given page, and can hold a
/// page's response until the test releases it.
pub struct ScriptedProvider {
    collection: Vec<EventType>,
    failing_page: Option<u64>,
    gates: Mutex<HashMap<u64, oneshot::Receiver<()>>>,
    requested: Mutex<Vec<u64>>,
    request_seen: Notify,
}

impl ScriptedProvider {
    pub fn new(collection: Vec<EventType>) -> Self {
        Self {
            collection,
            failing_page: None,
            gates: Mutex::new(HashMap::new()),
            requested: Mutex::new(Vec::new()),
            request_seen: Notify::new(),
        }
    }

    #[must_use]
    pub fn failing_on(mut self, page: u64) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Holds the response for `page` until the returned sender fires (or drops).
    pub fn gate(&self, page: u64) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(page, rx);
        tx
    }

    pub fn requested_pages(&self) -> Vec<u64> {
        self.requested.lock().unwrap().clone()
    }

    /// Waits until `page` has been requested.
    pub async fn wait_for_request(&self, page: u64) {
        loop {
            if self.requested_pages().contains(&page) {
                return;
            }
            self.request_seen.notified().await;
        }
    }

    pub fn page(&self, descriptor: &PageDescriptor) -> Page<EventType> {
        let start = (descriptor.offset() as usize).min(self.collection.len());
        let end = (start + descriptor.size() as usize).min(self.collection.len());
        Page {
            items: self.collection[start..end].to_vec(),
            total_count: self.collection.len() as u64,
        }
    }
}

impl PageProvider for ScriptedProvider {
    async fn fetch_page(&self, descriptor: &PageDescriptor) -> Result<Page<EventType>> {
        let index = descriptor.index();
        self.requested.lock().unwrap().push(index);
        self.request_seen.notify_one();

        let gate = self.gates.lock().unwrap().remove(&index);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.failing_page == Some(index) {
            bail!("HTTP 500 for page {index}");
        }
        Ok(self.page(descriptor))
    }
}
