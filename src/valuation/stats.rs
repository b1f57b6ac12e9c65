//! Price distribution statistics over sale records.

use crate::config::PERCENTILES;
use crate::models::{Percentiles, PriceIndicators, SaleRecord};

/// Computes [`PriceIndicators`] relative to a fixed "now".
#[derive(Debug, Clone, Copy)]
pub struct StatsCalculator {
    now: i64,
}

impl StatsCalculator {
    /// Calculator measuring ages against `now` (epoch seconds).
    pub fn new(now: i64) -> Self {
        Self { now }
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    /// Statistics over `sales`. Empty input yields [`PriceIndicators::EMPTY`].
    pub fn compute(&self, sales: &[SaleRecord]) -> PriceIndicators {
        self.compute_from(sales.iter().map(|s| (s.price, s.timestamp)))
    }

    /// Statistics over `(price, timestamp)` pairs.
    pub fn compute_from<I>(&self, observations: I) -> PriceIndicators
    where
        I: IntoIterator<Item = (f64, i64)>,
    {
        let mut prices = Vec::new();
        let mut oldest = i64::MIN;
        let mut most_recent = i64::MAX;

        for (price, timestamp) in observations {
            prices.push(price);
            let age = age_since(self.now, timestamp);
            oldest = oldest.max(age);
            most_recent = most_recent.min(age);
        }

        if prices.is_empty() {
            return PriceIndicators::EMPTY;
        }

        prices.sort_by(f64::total_cmp);
        let (mean, std_dev) = mean_and_std_dev(&prices);
        let [p5, p25, p50, p75, p95, p99] = PERCENTILES.map(|p| percentile(&prices, p));

        PriceIndicators {
            count: prices.len(),
            mean,
            std_dev,
            percentiles: Percentiles {
                p5,
                p25,
                p50,
                p75,
                p95,
                p99,
            },
            oldest_age_secs: oldest,
            most_recent_age_secs: most_recent,
        }
    }
}

/// Lower-rank percentile of an ascending slice: the value at
/// `floor(p * n)`, clamped to `[0, n - 1]`. Returns `0.0` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let last = sorted.len() - 1;
    let rank = (p * sorted.len() as f64).floor();
    let index = if rank.is_nan() || rank < 0.0 {
        0
    } else {
        (rank as usize).min(last)
    };
    sorted[index]
}

/// Arithmetic mean and population standard deviation (variance over `n`).
pub fn mean_and_std_dev(prices: &[f64]) -> (f64, f64) {
    if prices.is_empty() {
        return (0.0, 0.0);
    }
    let n = prices.len() as f64;
    let mean = prices.iter().sum::<f64>() / n;
    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Seconds elapsed between `timestamp` and `now`.
pub fn age_since(now: i64, timestamp: i64) -> i64 {
    now.saturating_sub(timestamp)
}
