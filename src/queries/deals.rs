//! Deal queries against the `deals` table.

use crate::config::{DEALS_TABLE, DEAL_RECORD_COLUMNS};
use crate::connection::Connection;
use crate::error::Result;
use crate::filter::{FilterPredicate, FilterSpec};
use crate::models::Deal;
use crate::pagination::PageRequest;
use crate::search::{RecordSource, SearchEngine, SearchPage};
use crate::sort::SortKey;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// DealQuery
// ---------------------------------------------------------------------------

/// Query interface for deals.
pub struct DealQuery<'a> {
    conn: &'a Connection,
}

impl<'a> DealQuery<'a> {
    /// Create a new `DealQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Retrieve a single deal by id.
    pub fn get(&self, id: &str) -> Result<Option<Deal>> {
        let (sql, params) = SqlBuilder::new(DEALS_TABLE)
            .where_eq("id", id)
            .order_by(&["seq ASC"])
            .limit(1)
            .build();
        Ok(self.conn.execute_into(&sql, &params)?.into_iter().next())
    }

    /// All deals for a product, in ingestion order.
    pub fn for_product(&self, product_id: &str) -> Result<Vec<Deal>> {
        let (sql, params) = SqlBuilder::new(DEALS_TABLE)
            .where_eq("product_id", product_id)
            .order_by(&["seq ASC"])
            .build();
        self.conn.execute_into(&sql, &params)
    }

    /// Distinct product ids across all deals, sorted.
    pub fn product_ids(&self) -> Result<Vec<String>> {
        let rows = self.conn.execute(
            "SELECT DISTINCT product_id FROM deals WHERE product_id IS NOT NULL ORDER BY product_id",
            &[],
        )?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get("product_id").and_then(|v| v.as_str()).map(str::to_string))
            .collect())
    }

    /// Filtered, sorted page of deals.
    pub fn search(
        &self,
        filter: &FilterSpec,
        sort: Option<SortKey>,
        page: PageRequest,
    ) -> Result<SearchPage<Deal>> {
        SearchEngine::new(self).search(filter, sort, page)
    }
}

impl RecordSource for DealQuery<'_> {
    type Record = Deal;

    fn count(&self, predicate: &FilterPredicate) -> Result<usize> {
        super::count_matching(self.conn, &DEAL_RECORD_COLUMNS, predicate)
    }

    fn fetch(
        &self,
        predicate: &FilterPredicate,
        sort: SortKey,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Deal>> {
        super::fetch_matching(self.conn, &DEAL_RECORD_COLUMNS, predicate, sort, offset, limit)
    }

    fn with_snapshot<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        self.conn.in_transaction(|| f(self))
    }
}
