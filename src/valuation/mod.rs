//! Deal valuation: price statistics over comparables and the profitability
//! heuristic built on top of them.
//!
//! Everything here is a pure function of its inputs. The current time is an
//! explicit argument so results are reproducible.

pub mod profitability;
pub mod stats;

pub use profitability::ProfitabilityScorer;
pub use stats::StatsCalculator;

use crate::models::{Deal, SaleRecord, ValuedDeal};

/// Value one deal against the sales already associated with it.
pub fn value_deal(deal: &Deal, sales: &[SaleRecord], now: i64) -> ValuedDeal {
    let indicators = StatsCalculator::new(now).compute(sales);
    let profitability = ProfitabilityScorer::score(deal, &indicators);
    ValuedDeal {
        deal: deal.clone(),
        discount: deal.discount(),
        indicators,
        profitability,
    }
}

/// Current time in epoch seconds.
pub fn now_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}
