//! Deal valuation engine.
//!
//! Cross-references deals scraped from a pricing forum with resale listings
//! from a secondhand marketplace: price statistics over comparable sales, a
//! profitability score per deal, and filtered, sorted, paginated search over
//! both collections. Records live in an in-process DuckDB database.
//!
//! # Quick start
//!
//! ```no_run
//! use deal_valuation::{DealValuation, FilterSpec, SortKey};
//!
//! let dv = DealValuation::builder().build().unwrap();
//! dv.connection().load_deals_json("deals.json").unwrap();
//! dv.connection().load_sales_json("sales.json").unwrap();
//!
//! let filter = FilterSpec::new().price_min(20.0).price_max(60.0);
//! let page = dv.search_deals(&filter, Some(SortKey::DateDesc), None).unwrap();
//! let valued = dv.valuation().value_deal("2901712", deal_valuation::now_epoch()).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod filter;
pub mod models;
pub mod pagination;
pub mod queries;
pub mod search;
pub mod session;
pub mod sort;
pub mod sql_builder;
pub mod valuation;

#[cfg(feature = "async")]
pub use async_client::AsyncDealValuation;
pub use connection::Connection;
pub use error::{DealError, Result};
pub use filter::{FilterPredicate, FilterSpec, Filterable};
pub use models::{Deal, PriceIndicators, SaleRecord, ValuedDeal};
pub use pagination::{PageInfo, PageRequest};
pub use search::{MemorySource, RecordSource, SearchEngine, SearchPage};
pub use session::BrowsingSession;
pub use sort::{SortKey, Sortable};
pub use sql_builder::{SqlBuilder, SqlValue};
pub use valuation::{now_epoch, ProfitabilityScorer, StatsCalculator};

use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// DealValuationBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`DealValuation`] instance.
///
/// Use [`DealValuation::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DealValuationBuilder::build).
#[derive(Debug, Clone)]
pub struct DealValuationBuilder {
    database: Option<PathBuf>,
    default_page_size: usize,
    default_sort: SortKey,
}

impl Default for DealValuationBuilder {
    fn default() -> Self {
        Self {
            database: None,
            default_page_size: config::DEFAULT_PAGE_SIZE,
            default_sort: SortKey::default(),
        }
    }
}

impl DealValuationBuilder {
    /// Store records in a DuckDB file instead of memory.
    ///
    /// Tables already present in the file are reused.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self
    }

    /// Page size used when a search does not specify one. Defaults to 10.
    pub fn default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Ordering used when a search does not specify one. Defaults to
    /// [`SortKey::PriceAsc`].
    pub fn default_sort(mut self, sort: SortKey) -> Self {
        self.default_sort = sort;
        self
    }

    /// Open the database and create the schema.
    ///
    /// Fails with [`DealError::InvalidPageRequest`] for a zero default page
    /// size.
    pub fn build(self) -> Result<DealValuation> {
        let default_page = PageRequest::first(self.default_page_size as i64)?;
        let conn = match self.database {
            Some(ref path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        tracing::info!(
            database = %describe_database(self.database.as_deref()),
            page_size = self.default_page_size,
            sort = %self.default_sort,
            "deal valuation ready"
        );
        Ok(DealValuation {
            conn,
            default_page,
            default_sort: self.default_sort,
            database: self.database,
        })
    }
}

// ---------------------------------------------------------------------------
// DealValuation
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the [`Connection`] and exposes query interfaces as lightweight
/// borrowing wrappers. Created via [`DealValuation::builder()`].
pub struct DealValuation {
    conn: Connection,
    default_page: PageRequest,
    default_sort: SortKey,
    database: Option<PathBuf>,
}

impl DealValuation {
    pub fn builder() -> DealValuationBuilder {
        DealValuationBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    pub fn deals(&self) -> queries::DealQuery<'_> {
        queries::DealQuery::new(&self.conn)
    }

    pub fn sales(&self) -> queries::SaleQuery<'_> {
        queries::SaleQuery::new(&self.conn)
    }

    /// Access the deal valuation interface (statistics and profitability
    /// over stored comparables).
    pub fn valuation(&self) -> queries::ValuationQuery<'_> {
        queries::ValuationQuery::new(&self.conn)
    }

    // -- Search with configured defaults -----------------------------------

    /// Search deals, falling back to the configured sort and page size.
    pub fn search_deals(
        &self,
        filter: &FilterSpec,
        sort: Option<SortKey>,
        page: Option<PageRequest>,
    ) -> Result<SearchPage<Deal>> {
        let deals = self.deals();
        SearchEngine::new(&deals)
            .with_default_sort(self.default_sort)
            .search(filter, sort, page.unwrap_or(self.default_page))
    }

    /// Search sales, falling back to the configured sort and page size.
    pub fn search_sales(
        &self,
        filter: &FilterSpec,
        sort: Option<SortKey>,
        page: Option<PageRequest>,
    ) -> Result<SearchPage<SaleRecord>> {
        let sales = self.sales();
        SearchEngine::new(&sales)
            .with_default_sort(self.default_sort)
            .search(filter, sort, page.unwrap_or(self.default_page))
    }

    /// Search deals and value each one on the page.
    pub fn search_valued_deals(
        &self,
        filter: &FilterSpec,
        sort: Option<SortKey>,
        page: Option<PageRequest>,
        now: i64,
    ) -> Result<SearchPage<ValuedDeal>> {
        self.valuation().search_valued(
            filter,
            Some(sort.unwrap_or(self.default_sort)),
            page.unwrap_or(self.default_page),
            now,
        )
    }

    /// Replay the search remembered by `session`.
    pub fn resume(&self, session: &BrowsingSession) -> Result<SearchPage<Deal>> {
        self.search_deals(&session.filter, Some(session.sort), Some(session.page))
    }

    // -- Metadata ----------------------------------------------------------

    /// Page request used when a search names none.
    pub fn default_page(&self) -> PageRequest {
        self.default_page
    }

    pub fn default_sort(&self) -> SortKey {
        self.default_sort
    }

    /// Return a reference to the underlying [`Connection`].
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consume the instance and release the database.
    pub fn close(self) {
        drop(self);
    }
}

impl fmt::Display for DealValuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DealValuation(database={}, tables=[{}], page_size={}, sort={})",
            describe_database(self.database.as_deref()),
            self.conn.tables().join(", "),
            self.default_page.page_size(),
            self.default_sort
        )
    }
}

fn describe_database(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| ":memory:".to_string())
}
