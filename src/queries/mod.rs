//! Query modules backed by the DuckDB tables.
//!
//! Each query struct borrows a [`Connection`](crate::connection::Connection).
//! [`DealQuery`] and [`SaleQuery`] implement
//! [`RecordSource`](crate::search::RecordSource), so they plug straight into
//! the [`SearchEngine`](crate::search::SearchEngine).

pub mod deals;
pub mod sales;
pub mod valuation;

pub use deals::DealQuery;
pub use sales::SaleQuery;
pub use valuation::ValuationQuery;

use crate::config::RecordColumns;
use crate::connection::Connection;
use crate::error::Result;
use crate::filter::FilterPredicate;
use crate::sort::SortKey;
use crate::sql_builder::SqlBuilder;

/// `COUNT(*)` of rows matching `predicate`.
pub(crate) fn count_matching(
    conn: &Connection,
    columns: &RecordColumns,
    predicate: &FilterPredicate,
) -> Result<usize> {
    let mut qb = SqlBuilder::new(columns.table);
    qb.select(&["COUNT(*) AS cnt"]);
    predicate.apply(&mut qb, columns);

    let (sql, params) = qb.build();
    let cnt = conn
        .execute_scalar(&sql, &params)?
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    Ok(cnt as usize)
}

/// One sorted page of rows matching `predicate`, deserialized into `T`.
pub(crate) fn fetch_matching<T: serde::de::DeserializeOwned>(
    conn: &Connection,
    columns: &RecordColumns,
    predicate: &FilterPredicate,
    sort: SortKey,
    offset: usize,
    limit: usize,
) -> Result<Vec<T>> {
    let mut qb = SqlBuilder::new(columns.table);
    predicate.apply(&mut qb, columns);
    let order = sort.order_by(columns);
    let order_refs: Vec<&str> = order.iter().map(String::as_str).collect();
    qb.order_by(&order_refs);
    qb.limit(limit);
    qb.offset(offset);

    let (sql, params) = qb.build();
    conn.execute_into(&sql, &params)
}
