//! In-memory and paged data providers.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lattice_probe_core::logging::targets;
use parking_lot::RwLock;

use super::{DataProvider, FilterFn, ProviderShape};

/// A data provider backed by an in-memory list.
///
/// Supports an optional provider-level filter; [`total`](DataProvider::total)
/// and [`fetch`](DataProvider::fetch) see only the items passing it.
///
/// # Example
///
/// ```
/// use lattice_probe::data::{DataProvider, ListDataProvider};
///
/// let provider = ListDataProvider::new(vec![1, 2, 3, 4]);
/// provider.set_filter(|n| n % 2 == 0);
/// assert_eq!(provider.total(), Some(2));
/// assert_eq!(provider.fetch(0, 10), vec![2, 4]);
/// ```
pub struct ListDataProvider<T> {
    items: RwLock<Vec<T>>,
    filter: RwLock<Option<FilterFn<T>>>,
}

impl<T: Clone + Send + Sync + 'static> ListDataProvider<T> {
    /// Create a provider over the given items.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            filter: RwLock::new(None),
        }
    }

    /// Set the filter using builder pattern.
    pub fn with_filter<F>(self, filter: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.set_filter(filter);
        self
    }

    /// Replace all items.
    pub fn set_items(&self, items: Vec<T>) {
        *self.items.write() = items;
    }

    /// Get a copy of all items, ignoring the filter.
    pub fn items(&self) -> Vec<T> {
        self.items.read().clone()
    }

    /// Append an item.
    pub fn push(&self, item: T) {
        self.items.write().push(item);
    }

    /// Set the filter.
    pub fn set_filter<F>(&self, filter: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        *self.filter.write() = Some(Arc::new(filter));
    }

    /// Remove the filter.
    pub fn clear_filter(&self) {
        *self.filter.write() = None;
    }

    fn filtered(&self) -> Vec<T> {
        let filter = self.filter.read().clone();
        let items = self.items.read();
        match filter {
            Some(filter) => items.iter().filter(|item| filter(item)).cloned().collect(),
            None => items.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> DataProvider<T> for ListDataProvider<T> {
    fn shape(&self) -> ProviderShape {
        ProviderShape::InMemory
    }

    fn total(&self) -> Option<usize> {
        match self.filter.read().clone() {
            Some(filter) => Some(self.items.read().iter().filter(|item| filter(item)).count()),
            None => Some(self.items.read().len()),
        }
    }

    fn fetch(&self, offset: usize, limit: usize) -> Vec<T> {
        self.filtered().into_iter().skip(offset).take(limit).collect()
    }
}

impl<T> fmt::Debug for ListDataProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListDataProvider")
            .field("items", &self.items.read().len())
            .field("filtered", &self.filter.read().is_some())
            .finish()
    }
}

type FetchFn<T> = Box<dyn Fn(usize, usize) -> Vec<T> + Send + Sync>;
type CountFn = Box<dyn Fn() -> usize + Send + Sync>;

/// A data provider that fetches items page by page through callbacks.
///
/// Without a count callback the provider is unbounded: it cannot report a
/// total and cannot be sorted.
///
/// # Example
///
/// ```
/// use lattice_probe::data::{DataProvider, PagedDataProvider};
///
/// let rows: Vec<u32> = (0..25).collect();
/// let provider = PagedDataProvider::new(10, move |offset, limit| {
///     rows.iter().skip(offset).take(limit).copied().collect()
/// });
/// assert_eq!(provider.total(), None);
/// assert_eq!(provider.fetch(20, 10).len(), 5);
/// ```
pub struct PagedDataProvider<T> {
    page_size: usize,
    fetch: FetchFn<T>,
    count: Option<CountFn>,
    fetch_calls: AtomicUsize,
}

impl<T> PagedDataProvider<T> {
    /// Create an unbounded provider fetching `page_size` items at a time.
    ///
    /// A `page_size` of zero is treated as one.
    pub fn new<F>(page_size: usize, fetch: F) -> Self
    where
        F: Fn(usize, usize) -> Vec<T> + Send + Sync + 'static,
    {
        Self {
            page_size: page_size.max(1),
            fetch: Box::new(fetch),
            count: None,
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Supply a count callback, making the provider bounded.
    pub fn with_count<F>(mut self, count: F) -> Self
    where
        F: Fn() -> usize + Send + Sync + 'static,
    {
        self.count = Some(Box::new(count));
        self
    }

    /// The page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of fetch callbacks made so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::Relaxed)
    }
}

impl<T: Send + Sync> DataProvider<T> for PagedDataProvider<T> {
    fn shape(&self) -> ProviderShape {
        ProviderShape::Paged {
            page_size: self.page_size,
        }
    }

    fn total(&self) -> Option<usize> {
        self.count.as_ref().map(|count| count())
    }

    fn fetch(&self, offset: usize, limit: usize) -> Vec<T> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(target: targets::DATA, offset, limit, "fetching page");
        let mut items = (self.fetch)(offset, limit);
        items.truncate(limit);
        items
    }
}

impl<T> fmt::Debug for PagedDataProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedDataProvider")
            .field("page_size", &self.page_size)
            .field("bounded", &self.count.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_provider_fetch_window() {
        let provider = ListDataProvider::new((0..10).collect::<Vec<_>>());
        assert_eq!(provider.total(), Some(10));
        assert_eq!(provider.fetch(8, 5), vec![8, 9]);
        assert!(provider.fetch(12, 5).is_empty());
    }

    #[test]
    fn test_list_provider_filter() {
        let provider = ListDataProvider::new(vec!["a", "bb", "ccc"]).with_filter(|s| s.len() > 1);
        assert_eq!(provider.total(), Some(2));
        assert_eq!(provider.fetch(0, 1), vec!["bb"]);

        provider.clear_filter();
        assert_eq!(provider.total(), Some(3));
    }

    #[test]
    fn test_paged_provider_bounded() {
        let provider = PagedDataProvider::new(4, |offset, limit| {
            (offset..(offset + limit).min(9)).collect::<Vec<usize>>()
        })
        .with_count(|| 9);

        assert!(provider.is_bounded());
        assert_eq!(provider.shape(), ProviderShape::Paged { page_size: 4 });
        assert_eq!(provider.fetch(8, 4), vec![8]);
        assert_eq!(provider.fetch_calls(), 1);
    }

    #[test]
    fn test_paged_provider_truncates_oversized_pages() {
        let provider = PagedDataProvider::new(2, |_, _| vec![1, 2, 3]);
        assert_eq!(provider.fetch(0, 2), vec![1, 2]);
    }
}
