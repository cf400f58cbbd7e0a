//! Data sources behind tabular components.
//!
//! A [`DataProvider`] maps a zero-based offset to row items. Two shapes
//! exist:
//!
//! - **in-memory** ([`ListDataProvider`]): a finite ordered sequence that can
//!   be re-sorted and re-filtered freely
//! - **paged** ([`PagedDataProvider`]): forward fetch in page-sized chunks,
//!   with a total count only if the application supplies one
//!
//! The [`Projector`] puts a filter and a multi-key sort on top of either
//! shape and exposes the normalized `size / get / find_all` view the grid
//! and the dump engine consume.

mod projector;
mod provider;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

pub use projector::Projector;
pub use provider::{ListDataProvider, PagedDataProvider};

/// Type alias for a filter function.
///
/// Returns `true` if the item should be included.
pub type FilterFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Type alias for a compare function for sorting.
pub type CompareFn<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Sort direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// The marker character used in grid dumps.
    pub fn marker(self) -> char {
        match self {
            Self::Ascending => '^',
            Self::Descending => 'v',
        }
    }
}

/// One key of a multi-key sort.
pub struct SortKey<T> {
    /// Key of the column this sort key belongs to.
    pub column: String,
    pub direction: SortDirection,
    /// Natural ordering of the key.
    pub compare: CompareFn<T>,
}

impl<T> SortKey<T> {
    /// Create a sort key.
    pub fn new(column: impl Into<String>, direction: SortDirection, compare: CompareFn<T>) -> Self {
        Self {
            column: column.into(),
            direction,
            compare,
        }
    }

    /// Create a sort key ordering by an extracted key's natural ordering.
    pub fn by<K, F>(column: impl Into<String>, direction: SortDirection, key: F) -> Self
    where
        T: 'static,
        K: Ord + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::new(column, direction, Arc::new(move |a: &T, b: &T| key(a).cmp(&key(b))))
    }

    /// Compare two items by this key, honoring the direction.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = (self.compare)(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl<T> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        Self {
            column: self.column.clone(),
            direction: self.direction,
            compare: self.compare.clone(),
        }
    }
}

impl<T> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("column", &self.column)
            .field("direction", &self.direction)
            .finish()
    }
}

/// How a provider delivers its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderShape {
    /// Finite, fully materialized sequence.
    InMemory,
    /// Forward fetch in chunks of `page_size` items.
    Paged { page_size: usize },
}

/// A source of row items.
pub trait DataProvider<T>: Send + Sync {
    /// How the provider delivers its items.
    fn shape(&self) -> ProviderShape;

    /// Total number of items, `None` if the provider cannot tell.
    fn total(&self) -> Option<usize>;

    /// Fetch up to `limit` items starting at `offset`.
    ///
    /// Returning fewer than `limit` items means the data ends there.
    fn fetch(&self, offset: usize, limit: usize) -> Vec<T>;

    /// Whether the provider can report a total.
    fn is_bounded(&self) -> bool {
        self.total().is_some()
    }
}
