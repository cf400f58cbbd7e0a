//! Filter and sort projection over a data provider.
//!
//! The projector gives every provider shape the same `size / get / find_all`
//! contract:
//!
//! - in-memory and bounded paged sources are materialized (page by page for
//!   paged ones), filtered and stable-sorted in memory
//! - unbounded paged sources are read forward page by page; they have no
//!   size and cannot be sorted

use std::cmp::Ordering;
use std::ops::Range;

use lattice_probe_core::logging::targets;

use super::{DataProvider, FilterFn, ProviderShape, SortKey};
use crate::error::{HarnessError, HarnessResult};

/// A filtered and sorted view of a [`DataProvider`].
///
/// # Example
///
/// ```
/// use lattice_probe::data::{ListDataProvider, Projector, SortDirection, SortKey};
///
/// let provider = ListDataProvider::new(vec![3, 1, 2]);
/// let projector = Projector::new(&provider)
///     .with_sort(vec![SortKey::by("n", SortDirection::Descending, |n: &i32| *n)]);
///
/// assert_eq!(projector.find_all().unwrap(), vec![3, 2, 1]);
/// assert_eq!(projector.get(0).unwrap(), 3);
/// ```
pub struct Projector<'a, T> {
    provider: &'a dyn DataProvider<T>,
    sort: Vec<SortKey<T>>,
    filter: Option<FilterFn<T>>,
}

impl<'a, T: Clone> Projector<'a, T> {
    /// Create an unfiltered, unsorted projection.
    pub fn new(provider: &'a dyn DataProvider<T>) -> Self {
        Self {
            provider,
            sort: Vec::new(),
            filter: None,
        }
    }

    /// Set the sort keys, most significant first.
    pub fn with_sort(mut self, sort: Vec<SortKey<T>>) -> Self {
        self.sort = sort;
        self
    }

    /// Set the filter.
    pub fn with_filter(mut self, filter: Option<FilterFn<T>>) -> Self {
        self.filter = filter;
        self
    }

    /// The sort keys, most significant first.
    pub fn sort_keys(&self) -> &[SortKey<T>] {
        &self.sort
    }

    /// Number of items passing the filter.
    ///
    /// Fails with [`HarnessError::Unsupported`] for an unbounded source.
    pub fn size(&self) -> HarnessResult<usize> {
        let Some(total) = self.provider.total() else {
            return Err(HarnessError::unsupported(
                "size of an unbounded paged data source",
            ));
        };
        if self.filter.is_none() {
            return Ok(total);
        }

        let mut count = 0;
        self.scan(|page| {
            count += page.iter().filter(|item| self.passes(item)).count();
            true
        });
        Ok(count)
    }

    /// The item at `index`, after filtering and sorting.
    ///
    /// Fails with [`HarnessError::IndexOutOfRange`] naming the index and the
    /// number of items available.
    pub fn get(&self, index: usize) -> HarnessResult<T> {
        if !self.sort.is_empty() {
            let items = self.materialize()?;
            let actual = items.len();
            return items.into_iter().nth(index).ok_or(HarnessError::IndexOutOfRange {
                requested: index,
                actual,
            });
        }

        if self.filter.is_none() {
            if let Some(total) = self.provider.total() {
                let out_of_range = HarnessError::IndexOutOfRange {
                    requested: index,
                    actual: total,
                };
                if index >= total {
                    return Err(out_of_range);
                }
                return self.provider.fetch(index, 1).into_iter().next().ok_or(out_of_range);
            }
        }

        let mut seen = 0;
        let mut found = None;
        self.scan(|page| {
            for item in page {
                if !self.passes(&item) {
                    continue;
                }
                if seen == index {
                    found = Some(item);
                    return false;
                }
                seen += 1;
            }
            true
        });
        found.ok_or(HarnessError::IndexOutOfRange {
            requested: index,
            actual: seen,
        })
    }

    /// All items passing the filter, in the order [`get`](Self::get) yields them.
    pub fn find_all(&self) -> HarnessResult<Vec<T>> {
        self.materialize()
    }

    /// The items in `rows`, clamped to the available items.
    ///
    /// A reversed range yields nothing.
    pub fn fetch(&self, rows: Range<usize>) -> HarnessResult<Vec<T>> {
        if rows.start >= rows.end {
            return Ok(Vec::new());
        }
        if !self.sort.is_empty() {
            let items = self.materialize()?;
            return Ok(items.into_iter().skip(rows.start).take(rows.len()).collect());
        }

        let mut seen = 0;
        let mut window = Vec::new();
        self.scan(|page| {
            for item in page {
                if !self.passes(&item) {
                    continue;
                }
                if seen >= rows.start {
                    window.push(item);
                }
                seen += 1;
                if seen >= rows.end {
                    return false;
                }
            }
            true
        });
        Ok(window)
    }

    fn passes(&self, item: &T) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(item))
    }

    /// Read every item passing the filter, then sort.
    fn materialize(&self) -> HarnessResult<Vec<T>> {
        if !self.sort.is_empty() && !self.provider.is_bounded() {
            return Err(HarnessError::unsupported(
                "sorting an unbounded paged data source",
            ));
        }

        let mut items = Vec::new();
        self.scan(|page| {
            items.extend(page.into_iter().filter(|item| self.passes(item)));
            true
        });

        if !self.sort.is_empty() {
            // `sort_by` is stable: equal items keep their source order.
            items.sort_by(|a, b| {
                self.sort
                    .iter()
                    .map(|key| key.compare(a, b))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        tracing::debug!(
            target: targets::DATA,
            item_count = items.len(),
            sort_keys = self.sort.len(),
            "materialized data source"
        );
        Ok(items)
    }

    /// Visit raw pages in source order until the data ends or `visit`
    /// returns `false`.
    fn scan(&self, mut visit: impl FnMut(Vec<T>) -> bool) {
        let total = self.provider.total();
        let page_size = match self.provider.shape() {
            ProviderShape::Paged { page_size } => page_size.max(1),
            ProviderShape::InMemory => total.unwrap_or(usize::MAX).max(1),
        };

        let mut offset = 0;
        loop {
            let limit = match total {
                Some(total) if offset >= total => break,
                Some(total) => page_size.min(total - offset),
                None => page_size,
            };
            let page = self.provider.fetch(offset, limit);
            let len = page.len();
            offset += len;
            if !visit(page) || len < limit {
                break;
            }
        }
    }
}
