//! Sale queries against the `sales` table.

use std::collections::HashMap;

use crate::config::{RECENT_SALES_WINDOW_SECS, SALES_TABLE, SALE_RECORD_COLUMNS};
use crate::connection::Connection;
use crate::error::Result;
use crate::filter::{FilterPredicate, FilterSpec};
use crate::models::SaleRecord;
use crate::pagination::PageRequest;
use crate::search::{RecordSource, SearchEngine, SearchPage};
use crate::sort::SortKey;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// SaleQuery
// ---------------------------------------------------------------------------

/// Query interface for resale listings.
pub struct SaleQuery<'a> {
    conn: &'a Connection,
}

impl<'a> SaleQuery<'a> {
    /// Create a new `SaleQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All sales for a product, in ingestion order.
    pub fn for_product(&self, product_id: &str) -> Result<Vec<SaleRecord>> {
        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .where_eq("product_id", product_id)
            .order_by(&["seq ASC"])
            .build();
        self.conn.execute_into(&sql, &params)
    }

    /// Sales for several products at once, grouped by product id.
    ///
    /// Every requested id is present in the map, possibly with no sales.
    pub fn for_products(&self, product_ids: &[&str]) -> Result<HashMap<String, Vec<SaleRecord>>> {
        let mut grouped: HashMap<String, Vec<SaleRecord>> = product_ids
            .iter()
            .map(|id| (id.to_string(), Vec::new()))
            .collect();
        if product_ids.is_empty() {
            return Ok(grouped);
        }

        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .where_in("product_id", product_ids)
            .order_by(&["seq ASC"])
            .build();
        let sales: Vec<SaleRecord> = self.conn.execute_into(&sql, &params)?;
        for sale in sales {
            if let Some(id) = sale.product_id.clone() {
                grouped.entry(id).or_default().push(sale);
            }
        }
        Ok(grouped)
    }

    /// Sales for a product listed at or after `since`, newest first.
    pub fn recent(&self, product_id: &str, since: i64) -> Result<Vec<SaleRecord>> {
        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .where_eq("product_id", product_id)
            .where_gte("\"timestamp\"", since)
            .order_by(&["\"timestamp\" DESC", "seq ASC"])
            .build();
        self.conn.execute_into(&sql, &params)
    }

    /// Sales for a product from the last three weeks before `now`.
    pub fn recent_default(&self, product_id: &str, now: i64) -> Result<Vec<SaleRecord>> {
        self.recent(product_id, now.saturating_sub(RECENT_SALES_WINDOW_SECS))
    }

    /// All sales for a product, newest first.
    pub fn by_date(&self, product_id: &str) -> Result<Vec<SaleRecord>> {
        let (sql, params) = SqlBuilder::new(SALES_TABLE)
            .where_eq("product_id", product_id)
            .order_by(&["\"timestamp\" DESC", "seq ASC"])
            .build();
        self.conn.execute_into(&sql, &params)
    }

    /// Filtered, sorted page of sales.
    pub fn search(
        &self,
        filter: &FilterSpec,
        sort: Option<SortKey>,
        page: PageRequest,
    ) -> Result<SearchPage<SaleRecord>> {
        SearchEngine::new(self).search(filter, sort, page)
    }
}

impl RecordSource for SaleQuery<'_> {
    type Record = SaleRecord;

    fn count(&self, predicate: &FilterPredicate) -> Result<usize> {
        super::count_matching(self.conn, &SALE_RECORD_COLUMNS, predicate)
    }

    fn fetch(
        &self,
        predicate: &FilterPredicate,
        sort: SortKey,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SaleRecord>> {
        super::fetch_matching(self.conn, &SALE_RECORD_COLUMNS, predicate, sort, offset, limit)
    }

    fn with_snapshot<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        self.conn.in_transaction(|| f(self))
    }
}
