//! Profitability heuristic for a deal against its comparables.
//!
//! ```text
//! midpoint        = (oldest_age + most_recent_age) / 2
//! time_adjustment = min(1, published_at / midpoint)
//! avg_margin      = mean - price
//! max_margin      = p75 - price
//! adjusted_margin = avg_margin + max_margin / (2 * (1 + std_dev))
//! score           = adjusted_margin * time_adjustment
//! ```
//!
//! The weights are a fixed heuristic. Any undefined intermediate (no
//! comparables, zero midpoint, non-finite result) scores `0`.

use crate::models::{Deal, PriceIndicators};

pub struct ProfitabilityScorer;

impl ProfitabilityScorer {
    /// Score `deal` against `indicators`. Higher is better.
    pub fn score(deal: &Deal, indicators: &PriceIndicators) -> f64 {
        if indicators.is_empty() {
            return 0.0;
        }
        let Some(time_adjustment) = Self::time_adjustment(deal.published_at, indicators) else {
            return 0.0;
        };
        let score = Self::adjusted_margin(deal.price, indicators) * time_adjustment;
        if score.is_finite() {
            score
        } else {
            0.0
        }
    }

    /// `min(1, published_at / midpoint)`, or `None` when the midpoint age is
    /// zero.
    pub fn time_adjustment(published_at: i64, indicators: &PriceIndicators) -> Option<f64> {
        let midpoint =
            (indicators.oldest_age_secs as f64 + indicators.most_recent_age_secs as f64) / 2.0;
        if midpoint == 0.0 {
            return None;
        }
        let ratio = published_at as f64 / midpoint;
        ratio.is_finite().then(|| ratio.min(1.0))
    }

    /// Mean margin plus the p75 margin damped by the price spread.
    pub fn adjusted_margin(price: f64, indicators: &PriceIndicators) -> f64 {
        let avg_margin = indicators.mean - price;
        let max_margin = indicators.percentiles.p75 - price;
        avg_margin + max_margin / (2.0 * (1.0 + indicators.std_dev))
    }
}
