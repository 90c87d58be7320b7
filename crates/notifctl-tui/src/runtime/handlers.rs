//! Async effect handlers.
//!
//! Each handler is a plain async function that returns the `UiEvent` carrying
//! its result. The runtime owns spawning and inbox delivery.

use notifctl_core::api::BundleEventTypes;
use notifctl_core::paging::PageProvider;
use notifctl_core::selection::WalkJob;
use notifctl_core::types::PageDescriptor;

use crate::events::UiEvent;

pub async fn page_load(provider: BundleEventTypes, descriptor: PageDescriptor) -> UiEvent {
    let result = provider
        .fetch_page(&descriptor)
        .await
        .map_err(|e| format!("{e:#}"));
    if let Err(error) = &result {
        tracing::warn!(page = descriptor.index(), %error, "page load failed");
    }
    UiEvent::PageLoaded { descriptor, result }
}

pub async fn select_all(provider: BundleEventTypes, job: WalkJob) -> UiEvent {
    UiEvent::SelectAllFinished(job.run(provider).await)
}
