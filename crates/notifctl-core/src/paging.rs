//! Page Provider seam and the lazy page walk.
//!
//! The selection driver never talks HTTP directly. It consumes a
//! `PageProvider` and walks pages through `page_walk`, a finite stream that
//! yields one page result per step, strictly in order, with at most one
//! request outstanding.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use futures_util::Stream;
use futures_util::stream;
use notifctl_types::{EventType, Page, PageDescriptor};

/// Fetches one page of event types.
///
/// Implementations must be safe to call repeatedly with an identical
/// descriptor.
pub trait PageProvider: Send + Sync {
    fn fetch_page(
        &self,
        descriptor: &PageDescriptor,
    ) -> impl Future<Output = Result<Page<EventType>>> + Send;
}

impl<P: PageProvider + ?Sized> PageProvider for Arc<P> {
    fn fetch_page(
        &self,
        descriptor: &PageDescriptor,
    ) -> impl Future<Output = Result<Page<EventType>>> + Send {
        (**self).fetch_page(descriptor)
    }
}

impl<P: PageProvider + ?Sized> PageProvider for &P {
    fn fetch_page(
        &self,
        descriptor: &PageDescriptor,
    ) -> impl Future<Output = Result<Page<EventType>>> + Send {
        (**self).fetch_page(descriptor)
    }
}

/// Items of a page already in hand, reused instead of re-fetched.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub index: u64,
    pub items: Vec<EventType>,
}

/// One step of a page walk.
#[derive(Debug)]
pub struct PageStep {
    pub index: u64,
    pub result: Result<Vec<EventType>>,
}

struct WalkCursor<P> {
    provider: P,
    template: PageDescriptor,
    next: u64,
    last: u64,
    preloaded: Option<LoadedPage>,
    failed: bool,
}

/// Walks pages `1..=last_page` of `template`'s collection.
///
/// Each page is requested only after the previous one resolved. The page
/// matching `preloaded` is served from memory. The stream ends after the last
/// page or right after the first failed step; it cannot be restarted.
pub fn page_walk<P: PageProvider>(
    provider: P,
    template: PageDescriptor,
    last_page: u64,
    preloaded: Option<LoadedPage>,
) -> impl Stream<Item = PageStep> + Send {
    let cursor = WalkCursor {
        provider,
        template,
        next: 1,
        last: last_page,
        preloaded,
        failed: false,
    };

    stream::unfold(cursor, |mut cursor| async move {
        if cursor.failed || cursor.next > cursor.last {
            return None;
        }
        let index = cursor.next;
        cursor.next += 1;

        let reused = cursor
            .preloaded
            .as_ref()
            .filter(|loaded| loaded.index == index)
            .map(|loaded| loaded.items.clone());

        let result = match reused {
            Some(items) => {
                tracing::trace!(page = index, "reusing loaded page");
                Ok(items)
            }
            None => {
                let descriptor = cursor.template.with_page(index);
                tracing::debug!(page = index, last = cursor.last, "fetching page");
                cursor.provider.fetch_page(&descriptor).await.map(|page| page.items)
            }
        };

        if result.is_err() {
            cursor.failed = true;
        }
        Some((PageStep { index, result }, cursor))
    })
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;
    use notifctl_types::EventTypeFilters;

    use super::*;
    use crate::selection::testing::{ScriptedProvider, event_types};

    fn template() -> PageDescriptor {
        PageDescriptor::first(10, EventTypeFilters::for_bundle("rhel"))
    }

    #[tokio::test]
    async fn test_walk_visits_every_page_in_order() {
        let provider = ScriptedProvider::new(event_types("e", 25));
        let steps: Vec<PageStep> = page_walk(&provider, template(), 3, None).collect().await;

        let indices: Vec<u64> = steps.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(provider.requested_pages(), vec![1, 2, 3]);
        assert_eq!(steps[2].result.as_ref().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_walk_reuses_preloaded_page() {
        let all = event_types("e", 25);
        let provider = ScriptedProvider::new(all.clone());
        let preloaded = LoadedPage {
            index: 2,
            items: all[10..20].to_vec(),
        };
        let steps: Vec<PageStep> = page_walk(&provider, template(), 3, Some(preloaded))
            .collect()
            .await;

        assert_eq!(steps.len(), 3);
        assert_eq!(provider.requested_pages(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_walk_stops_after_first_failure() {
        let provider = ScriptedProvider::new(event_types("e", 30)).failing_on(2);
        let steps: Vec<PageStep> = page_walk(&provider, template(), 3, None).collect().await;

        assert_eq!(steps.len(), 2);
        assert!(steps[0].result.is_ok());
        assert!(steps[1].result.is_err());
        assert_eq!(provider.requested_pages(), vec![1, 2]);
    }
}
