//! Deal valuation requests: deals joined with their comparables by product
//! id, scored per request.

use crate::connection::Connection;
use crate::error::{DealError, Result};
use crate::filter::FilterSpec;
use crate::models::{Deal, ValuedDeal};
use crate::pagination::PageRequest;
use crate::search::{RecordSource, SearchEngine, SearchPage};
use crate::sort::SortKey;
use crate::valuation;

use super::{DealQuery, SaleQuery};

/// Query interface producing [`ValuedDeal`]s.
pub struct ValuationQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ValuationQuery<'a> {
    /// Create a new `ValuationQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Value a single deal by id against the sales sharing its product id.
    pub fn value_deal(&self, deal_id: &str, now: i64) -> Result<ValuedDeal> {
        let deal = DealQuery::new(self.conn)
            .get(deal_id)?
            .ok_or_else(|| DealError::NotFound(format!("deal {deal_id}")))?;
        let sales = match deal.product_id.as_deref() {
            Some(product_id) => SaleQuery::new(self.conn).for_product(product_id)?,
            None => Vec::new(),
        };
        if sales.is_empty() {
            tracing::debug!(deal = deal_id, "no comparable sales");
        }
        Ok(valuation::value_deal(&deal, &sales, now))
    }

    /// Value a batch of deals with a single sales lookup.
    ///
    /// Output order follows `deals`. Deals without a product id get empty
    /// indicators and a profitability of zero.
    pub fn value_deals(&self, deals: Vec<Deal>, now: i64) -> Result<Vec<ValuedDeal>> {
        let mut product_ids: Vec<&str> = deals
            .iter()
            .filter_map(|d| d.product_id.as_deref())
            .collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let grouped = SaleQuery::new(self.conn).for_products(&product_ids)?;
        Ok(deals
            .iter()
            .map(|deal| {
                let sales = deal
                    .product_id
                    .as_deref()
                    .and_then(|id| grouped.get(id))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                valuation::value_deal(deal, sales, now)
            })
            .collect())
    }

    /// Search deals and value every deal on the returned page.
    pub fn search_valued(
        &self,
        filter: &FilterSpec,
        sort: Option<SortKey>,
        page: PageRequest,
        now: i64,
    ) -> Result<SearchPage<ValuedDeal>> {
        let deals = DealQuery::new(self.conn);
        let found = SearchEngine::new(&deals).search(filter, sort, page)?;
        let page_info = found.page_info;
        let results = self.value_deals(found.results, now)?;
        Ok(SearchPage { results, page_info })
    }

    /// Value every deal matching `filter` and return them by descending
    /// profitability. Deals with equal scores keep their price order.
    pub fn rank_by_profitability(&self, filter: &FilterSpec, now: i64) -> Result<Vec<ValuedDeal>> {
        let deals = DealQuery::new(self.conn);
        let predicate = filter.compile();
        let matching = deals.with_snapshot(|src| {
            let total = src.count(&predicate)?;
            src.fetch(&predicate, SortKey::PriceAsc, 0, total)
        })?;
        let mut valued = self.value_deals(matching, now)?;
        valued.sort_by(|a, b| b.profitability.total_cmp(&a.profitability));
        Ok(valued)
    }
}
