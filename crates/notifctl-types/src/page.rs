use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Returns the 1-based index of the last page for `total_count` elements.
///
/// An empty collection has exactly one (empty) page.
///
/// # Panics
/// Panics if `page_size` is zero.
pub fn last_page_index(total_count: u64, page_size: u64) -> u64 {
    assert!(page_size > 0, "page size must be positive");
    total_count.div_ceil(page_size).max(1)
}

/// Filters applied to an event-type query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventTypeFilters {
    /// Bundle the query is scoped to.
    pub bundle_id: String,
    /// Application ids to include (empty means every application of the bundle).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub application_ids: BTreeSet<String>,
    /// Display-name substring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EventTypeFilters {
    pub fn for_bundle(bundle_id: impl Into<String>) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_application(mut self, application_id: impl Into<String>) -> Self {
        self.application_ids.insert(application_id.into());
        self
    }

    /// Sets the name filter; blank input clears it.
    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|n| !n.trim().is_empty());
        self
    }
}

/// Identifies one page of a remote, filterable collection.
///
/// Two descriptors are equal iff index, size and filters are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageDescriptor {
    index: u64,
    size: u64,
    filters: EventTypeFilters,
}

impl PageDescriptor {
    /// Creates a descriptor.
    ///
    /// # Panics
    /// Panics if `index` or `size` is zero (pages are 1-based).
    pub fn new(index: u64, size: u64, filters: EventTypeFilters) -> Self {
        assert!(index >= 1, "page index is 1-based, got {index}");
        assert!(size >= 1, "page size must be positive, got {size}");
        Self {
            index,
            size,
            filters,
        }
    }

    /// First page of a collection.
    pub fn first(size: u64, filters: EventTypeFilters) -> Self {
        Self::new(1, size, filters)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn filters(&self) -> &EventTypeFilters {
        &self.filters
    }

    /// Zero-based element offset of this page.
    pub fn offset(&self) -> u64 {
        (self.index - 1) * self.size
    }

    /// Same size and filters at another index.
    #[must_use]
    pub fn with_page(&self, index: u64) -> Self {
        Self::new(index, self.size, self.filters.clone())
    }

    /// Same size at page 1 with new filters.
    #[must_use]
    pub fn with_filters(&self, filters: EventTypeFilters) -> Self {
        Self::new(1, self.size, filters)
    }

    /// Index of the last page for `total_count` elements at this size.
    pub fn last_page_index(&self, total_count: u64) -> u64 {
        last_page_index(total_count, self.size)
    }

    pub fn next(&self, total_count: u64) -> Option<Self> {
        (self.index < self.last_page_index(total_count)).then(|| self.with_page(self.index + 1))
    }

    pub fn previous(&self) -> Option<Self> {
        (self.index > 1).then(|| self.with_page(self.index - 1))
    }
}

/// One page of results plus the total size of the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }

    /// True when this page holds the whole collection.
    pub fn is_complete(&self) -> bool {
        self.total_count == self.items.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_index_boundaries() {
        assert_eq!(last_page_index(0, 10), 1);
        assert_eq!(last_page_index(1, 10), 1);
        assert_eq!(last_page_index(10, 10), 1);
        assert_eq!(last_page_index(11, 10), 2);
        assert_eq!(last_page_index(25, 10), 3);
    }

    #[test]
    #[should_panic(expected = "page size must be positive")]
    fn test_last_page_index_rejects_zero_size() {
        let _ = last_page_index(5, 0);
    }

    #[test]
    #[should_panic(expected = "1-based")]
    fn test_descriptor_rejects_page_zero() {
        let _ = PageDescriptor::new(0, 10, EventTypeFilters::default());
    }

    #[test]
    fn test_descriptor_equality_includes_filters() {
        let a = PageDescriptor::first(10, EventTypeFilters::for_bundle("rhel"));
        let b = PageDescriptor::first(10, EventTypeFilters::for_bundle("rhel"));
        let c = PageDescriptor::first(10, EventTypeFilters::for_bundle("openshift"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, a.with_page(2));
    }

    #[test]
    fn test_descriptor_offset_and_navigation() {
        let first = PageDescriptor::first(10, EventTypeFilters::for_bundle("rhel"));
        assert_eq!(first.offset(), 0);
        assert!(first.previous().is_none());

        let second = first.next(25).unwrap();
        assert_eq!(second.index(), 2);
        assert_eq!(second.offset(), 10);

        let third = second.next(25).unwrap();
        assert!(third.next(25).is_none());
        assert_eq!(third.previous(), Some(second));
    }

    #[test]
    fn test_with_name_drops_blank_filter() {
        let filters = EventTypeFilters::for_bundle("rhel").with_name(Some("  ".to_string()));
        assert_eq!(filters.name, None);
    }

    #[test]
    fn test_page_is_complete() {
        let page = Page {
            items: vec![1, 2],
            total_count: 2,
        };
        assert!(page.is_complete());
        assert!(Page::<u8>::empty().is_complete());
        let partial = Page {
            items: vec![1],
            total_count: 3,
        };
        assert!(!partial.is_complete());
    }
}
