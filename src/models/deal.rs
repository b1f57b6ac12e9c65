use serde::{Deserialize, Serialize};

use super::de;

// ---------------------------------------------------------------------------
// Deal — one listing scraped from the pricing forum
// ---------------------------------------------------------------------------

/// A scraped deal. Read-only once ingested.
///
/// Field aliases accept the forum's own camelCase spellings so raw scraper
/// dumps deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(alias = "threadId", deserialize_with = "de::string_lenient")]
    pub id: String,
    pub title: String,
    pub link: String,
    #[serde(deserialize_with = "de::f64_lenient")]
    pub price: f64,
    /// Reference ("next best") price, `0.0` when unknown.
    #[serde(default, alias = "nextBestPrice", deserialize_with = "de::f64_lenient")]
    pub next_best_price: f64,
    /// Publication time in epoch seconds.
    #[serde(alias = "publishedAt", deserialize_with = "de::i64_lenient")]
    pub published_at: i64,
    #[serde(default, alias = "commentCount", deserialize_with = "de::i64_lenient")]
    pub comment_count: i64,
    #[serde(default, deserialize_with = "de::f64_lenient")]
    pub temperature: f64,
    /// Product (set) identifier extracted from the title; `None` when
    /// extraction failed.
    #[serde(
        default,
        alias = "productId",
        alias = "legoId",
        deserialize_with = "de::opt_string_lenient"
    )]
    pub product_id: Option<String>,
}

impl Deal {
    /// Percentage off the reference price. See [`discount_percent`].
    pub fn discount(&self) -> f64 {
        discount_percent(self.price, self.next_best_price)
    }
}

/// `round(100 * (1 - price / reference))`, or `0` when the reference is `0`.
///
/// Negative values mean the price is above the reference (a markup) and are
/// returned as-is.
pub fn discount_percent(price: f64, reference_price: f64) -> f64 {
    if reference_price == 0.0 {
        return 0.0;
    }
    (100.0 * (1.0 - price / reference_price)).round()
}
