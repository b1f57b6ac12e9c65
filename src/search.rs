//! Filtered, sorted, paginated search over a record source.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::{FilterPredicate, FilterSpec, Filterable};
use crate::pagination::{self, PageInfo, PageRequest};
use crate::sort::{self, SortKey, Sortable};

// ---------------------------------------------------------------------------
// RecordSource
// ---------------------------------------------------------------------------

/// A collection that can count and page through records matching a
/// predicate.
pub trait RecordSource {
    type Record;

    fn count(&self, predicate: &FilterPredicate) -> Result<usize>;

    fn fetch(
        &self,
        predicate: &FilterPredicate,
        sort: SortKey,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Self::Record>>;

    /// Run `f` against one consistent view of the source.
    ///
    /// Sources whose contents can change between calls override this to
    /// pin a snapshot.
    fn with_snapshot<T, F>(&self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&Self) -> Result<T>,
    {
        f(self)
    }
}

// ---------------------------------------------------------------------------
// SearchPage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage<R> {
    pub results: Vec<R>,
    pub page_info: PageInfo,
}

impl<R> SearchPage<R> {
    /// Transform every result, keeping the page metadata.
    pub fn map<U, F: FnMut(R) -> U>(self, f: F) -> SearchPage<U> {
        SearchPage {
            results: self.results.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

/// Composes filter compilation, sorting and pagination over a
/// [`RecordSource`].
pub struct SearchEngine<'a, S> {
    source: &'a S,
    default_sort: SortKey,
}

impl<'a, S: RecordSource> SearchEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            default_sort: SortKey::default(),
        }
    }

    /// Ordering applied when a search names no sort key.
    pub fn with_default_sort(mut self, sort: SortKey) -> Self {
        self.default_sort = sort;
        self
    }

    pub fn search(
        &self,
        filter: &FilterSpec,
        sort: Option<SortKey>,
        page: PageRequest,
    ) -> Result<SearchPage<S::Record>> {
        self.search_predicate(&filter.compile(), sort, page)
    }

    /// Search with an already compiled predicate.
    ///
    /// The count and the page fetch see the same predicate inside a single
    /// source snapshot. A page starting at or past `total` is not fetched.
    pub fn search_predicate(
        &self,
        predicate: &FilterPredicate,
        sort: Option<SortKey>,
        page: PageRequest,
    ) -> Result<SearchPage<S::Record>> {
        let sort = sort.unwrap_or(self.default_sort);
        let (total, results) = self.source.with_snapshot(|source| {
            let total = source.count(predicate)?;
            if page.offset() >= total {
                return Ok((total, Vec::new()));
            }
            let results = source.fetch(predicate, sort, page.offset(), page.page_size())?;
            Ok((total, results))
        })?;

        let page_info = pagination::build_page_info(page, total);
        tracing::debug!(
            clauses = predicate.clauses().len(),
            %sort,
            total,
            page = page_info.current_page,
            returned = results.len(),
            "search completed"
        );
        Ok(SearchPage { results, page_info })
    }
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

/// An in-memory [`RecordSource`] over an owned record list.
#[derive(Debug, Clone, Default)]
pub struct MemorySource<R> {
    records: Vec<R>,
}

impl<R> MemorySource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R> FromIterator<R> for MemorySource<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<R: Filterable + Sortable + Clone> RecordSource for MemorySource<R> {
    type Record = R;

    fn count(&self, predicate: &FilterPredicate) -> Result<usize> {
        Ok(self.records.iter().filter(|r| predicate.matches(*r)).count())
    }

    fn fetch(
        &self,
        predicate: &FilterPredicate,
        sort: SortKey,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<R>> {
        let mut matching: Vec<&R> = self
            .records
            .iter()
            .filter(|r| predicate.matches(*r))
            .collect();
        matching.sort_by(|a, b| sort.compare(*a, *b));
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Filter then stably sort a slice without paginating.
pub fn select<R: Filterable + Sortable + Clone>(
    records: &[R],
    filter: &FilterSpec,
    key: SortKey,
) -> Vec<R> {
    let predicate = filter.compile();
    let mut out: Vec<R> = records
        .iter()
        .filter(|r| predicate.matches(*r))
        .cloned()
        .collect();
    sort::sort_records(&mut out, key);
    out
}
