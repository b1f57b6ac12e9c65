//! Crate-wide defaults and storage names.

/// Page returned when the caller does not ask for one.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound accepted by [`PageRequest::from_query`](crate::pagination::PageRequest::from_query).
pub const MAX_PAGE_SIZE: usize = 500;

pub const DEALS_TABLE: &str = "deals";
pub const SALES_TABLE: &str = "sales";

/// Percentile ladder reported in [`PriceIndicators`](crate::models::PriceIndicators).
pub const PERCENTILES: [f64; 6] = [0.05, 0.25, 0.50, 0.75, 0.95, 0.99];

// Preset thresholds
pub const BEST_DISCOUNT_MIN: f64 = 50.0;
pub const MOST_COMMENTED_MIN: i64 = 15;
pub const HOT_TEMPERATURE_MIN: f64 = 100.0;

/// Window used by [`SaleQuery::recent_default`](crate::queries::sales::SaleQuery::recent_default).
pub const RECENT_SALES_WINDOW_SECS: i64 = 21 * 24 * 60 * 60;

/// Column layout of the `deals` table, in insertion order.
pub fn deal_columns() -> &'static [(&'static str, &'static str)] {
    &[
        ("seq", "BIGINT"),
        ("id", "VARCHAR"),
        ("title", "VARCHAR"),
        ("link", "VARCHAR"),
        ("price", "DOUBLE"),
        ("next_best_price", "DOUBLE"),
        ("published_at", "BIGINT"),
        ("comment_count", "BIGINT"),
        ("temperature", "DOUBLE"),
        ("product_id", "VARCHAR"),
    ]
}

/// Column layout of the `sales` table, in insertion order.
pub fn sale_columns() -> &'static [(&'static str, &'static str)] {
    &[
        ("seq", "BIGINT"),
        ("id", "VARCHAR"),
        ("product_id", "VARCHAR"),
        ("title", "VARCHAR"),
        ("url", "VARCHAR"),
        ("price", "DOUBLE"),
        ("timestamp", "BIGINT"),
        ("favourite_count", "BIGINT"),
    ]
}

/// SQL expressions for each filterable/sortable dimension of a table.
///
/// `None` marks a dimension the record kind does not carry.
#[derive(Debug, Clone, Copy)]
pub struct RecordColumns {
    pub table: &'static str,
    pub price: &'static str,
    pub timestamp: &'static str,
    pub reference_price: Option<&'static str>,
    pub discount: Option<&'static str>,
    pub comments: Option<&'static str>,
    pub temperature: Option<&'static str>,
    pub favourites: Option<&'static str>,
    pub product_id: &'static str,
    /// Ingestion order; the final sort key.
    pub seq: &'static str,
}

pub const DEAL_RECORD_COLUMNS: RecordColumns = RecordColumns {
    table: DEALS_TABLE,
    price: "price",
    timestamp: "published_at",
    reference_price: Some("next_best_price"),
    discount: Some(
        "(CASE WHEN next_best_price = 0 THEN 0 ELSE ROUND(100 * (1 - price / next_best_price)) END)",
    ),
    comments: Some("comment_count"),
    temperature: Some("temperature"),
    favourites: None,
    product_id: "product_id",
    seq: "seq",
};

pub const SALE_RECORD_COLUMNS: RecordColumns = RecordColumns {
    table: SALES_TABLE,
    price: "price",
    timestamp: "\"timestamp\"",
    reference_price: None,
    discount: None,
    comments: None,
    temperature: None,
    favourites: Some("favourite_count"),
    product_id: "product_id",
    seq: "seq",
};
