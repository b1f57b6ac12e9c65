//! Async wrapper around [`DealValuation`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use deal_valuation::{AsyncDealValuation, FilterSpec};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dv = AsyncDealValuation::builder().build().await.unwrap();
//!
//!     let page = dv
//!         .run(|d| d.search_deals(&FilterSpec::hot_deals(), None, None))
//!         .await
//!         .unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{DealError, Result};
use crate::filter::FilterSpec;
use crate::models::{Deal, ValuedDeal};
use crate::pagination::PageRequest;
use crate::search::SearchPage;
use crate::sort::SortKey;
use crate::DealValuation;

// ---------------------------------------------------------------------------
// AsyncDealValuationBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncDealValuation`].
#[derive(Debug, Clone, Default)]
pub struct AsyncDealValuationBuilder {
    database: Option<PathBuf>,
    default_page_size: Option<usize>,
    default_sort: Option<SortKey>,
}

impl AsyncDealValuationBuilder {
    /// Store records in a DuckDB file instead of memory.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = Some(size);
        self
    }

    pub fn default_sort(mut self, sort: SortKey) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// Build on the blocking thread pool so opening the database does not
    /// stall the event loop.
    pub async fn build(self) -> Result<AsyncDealValuation> {
        tokio::task::spawn_blocking(move || {
            let mut builder = DealValuation::builder();
            if let Some(path) = self.database {
                builder = builder.database(path);
            }
            if let Some(size) = self.default_page_size {
                builder = builder.default_page_size(size);
            }
            if let Some(sort) = self.default_sort {
                builder = builder.default_sort(sort);
            }
            let inner = builder.build()?;
            Ok(AsyncDealValuation {
                inner: Arc::new(Mutex::new(inner)),
            })
        })
        .await
        .map_err(join_error)?
    }
}

// ---------------------------------------------------------------------------
// AsyncDealValuation
// ---------------------------------------------------------------------------

/// Async wrapper around [`DealValuation`].
///
/// The underlying instance is protected by a [`Mutex`] since its connection
/// uses `RefCell` internally. Clones share the same database.
#[derive(Clone)]
pub struct AsyncDealValuation {
    inner: Arc<Mutex<DealValuation>>,
}

impl AsyncDealValuation {
    pub fn builder() -> AsyncDealValuationBuilder {
        AsyncDealValuationBuilder::default()
    }

    /// Run a sync operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&DealValuation) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = inner
                .lock()
                .map_err(|_| DealError::InvalidArgument("deal valuation lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(join_error)?
    }

    pub async fn load_deals(&self, deals: Vec<Deal>) -> Result<usize> {
        self.run(move |d| d.connection().load_deals(&deals)).await
    }

    pub async fn search_deals(
        &self,
        filter: FilterSpec,
        sort: Option<SortKey>,
        page: Option<PageRequest>,
    ) -> Result<SearchPage<Deal>> {
        self.run(move |d| d.search_deals(&filter, sort, page)).await
    }

    pub async fn value_deal(&self, deal_id: &str, now: i64) -> Result<ValuedDeal> {
        let deal_id = deal_id.to_string();
        self.run(move |d| d.valuation().value_deal(&deal_id, now)).await
    }
}

fn join_error(e: tokio::task::JoinError) -> DealError {
    DealError::InvalidArgument(format!("Task join error: {e}"))
}
