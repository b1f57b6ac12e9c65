use serde::{Deserialize, Serialize};

use super::de;

// ---------------------------------------------------------------------------
// SaleRecord — one resale marketplace observation
// ---------------------------------------------------------------------------

/// A resale listing used as a price comparable.
///
/// Linked to deals only through `product_id`; a sale may exist without any
/// matching deal and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(deserialize_with = "de::string_lenient")]
    pub id: String,
    #[serde(default, alias = "id_lego", alias = "productId", deserialize_with = "de::opt_string_lenient")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(deserialize_with = "de::f64_lenient")]
    pub price: f64,
    /// Listing time in epoch seconds.
    #[serde(deserialize_with = "de::i64_lenient")]
    pub timestamp: i64,
    #[serde(default, alias = "favouriteCount", deserialize_with = "de::i64_lenient")]
    pub favourite_count: i64,
}
