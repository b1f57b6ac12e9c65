use serde::{Deserialize, Serialize};

use super::{Deal, PriceIndicators};

/// A deal together with the statistics of its comparables and the derived
/// profitability score. Produced per request; the source `Deal` is never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuedDeal {
    #[serde(flatten)]
    pub deal: Deal,
    pub discount: f64,
    pub indicators: PriceIndicators,
    pub profitability: f64,
}
