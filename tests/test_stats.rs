//! Price statistics over comparable sales.

mod common;

use common::{sale, DAY, NOW};
use deal_valuation::models::SaleAge;
use deal_valuation::valuation::stats::{mean_and_std_dev, percentile};
use deal_valuation::{PriceIndicators, StatsCalculator};
use proptest::prelude::*;

#[test]
fn three_sales_match_hand_computed_statistics() {
    let sales = vec![
        sale("a", "43230", 10.0, NOW - 100, 0),
        sale("b", "43230", 20.0, NOW - 200, 0),
        sale("c", "43230", 30.0, NOW - 300, 0),
    ];
    let ind = StatsCalculator::new(NOW).compute(&sales);

    assert_eq!(ind.count, 3);
    assert!((ind.mean - 20.0).abs() < 1e-12);
    assert!((ind.std_dev - (200.0f64 / 3.0).sqrt()).abs() < 1e-12);
    assert_eq!(ind.percentiles.p5, 10.0);
    assert_eq!(ind.percentiles.p25, 10.0);
    assert_eq!(ind.percentiles.p50, 20.0);
    assert_eq!(ind.percentiles.p75, 30.0);
    assert_eq!(ind.percentiles.p99, 30.0);
    assert_eq!(ind.oldest_age_secs, 300);
    assert_eq!(ind.most_recent_age_secs, 100);
}

#[test]
fn input_order_does_not_matter() {
    let forward = vec![
        sale("a", "1", 30.0, NOW - DAY, 0),
        sale("b", "1", 10.0, NOW - 2 * DAY, 0),
        sale("c", "1", 20.0, NOW - 3 * DAY, 0),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let calc = StatsCalculator::new(NOW);
    assert_eq!(calc.compute(&forward), calc.compute(&reversed));
}

#[test]
fn empty_input_is_the_no_data_state() {
    let ind = StatsCalculator::new(NOW).compute(&[]);
    assert!(ind.is_empty());
    assert_eq!(ind, PriceIndicators::EMPTY);
}

#[test]
fn identical_prices_have_zero_spread() {
    let sales: Vec<_> = (0..4)
        .map(|i| sale(&format!("s{i}"), "1", 50.0, NOW - i * DAY, 0))
        .collect();
    let ind = StatsCalculator::new(NOW).compute(&sales);
    assert_eq!(ind.std_dev, 0.0);
    assert!(ind.percentiles.as_array().iter().all(|p| *p == 50.0));
    assert_eq!(ind.mean, 50.0);
}

#[test]
fn single_sale_fills_every_percentile() {
    let ind = StatsCalculator::new(NOW).compute(&[sale("a", "1", 42.0, NOW - 60, 0)]);
    assert_eq!(ind.count, 1);
    assert_eq!(ind.percentiles.as_array(), [42.0; 6]);
    assert_eq!(ind.oldest_age_secs, ind.most_recent_age_secs);
}

#[test]
fn future_timestamps_give_negative_ages() {
    let ind = StatsCalculator::new(NOW).compute(&[sale("a", "1", 5.0, NOW + 30, 0)]);
    assert_eq!(ind.most_recent_age_secs, -30);
    assert_eq!(ind.most_recent_age(), SaleAge::from_seconds(0));
}

#[test]
fn percentile_uses_lower_rank() {
    let sorted: Vec<f64> = (1..=20).map(f64::from).collect();
    assert_eq!(percentile(&sorted, 0.05), 2.0);
    assert_eq!(percentile(&sorted, 0.25), 6.0);
    assert_eq!(percentile(&sorted, 0.50), 11.0);
    assert_eq!(percentile(&sorted, 0.99), 20.0);
    assert_eq!(percentile(&[], 0.5), 0.0);
}

#[test]
fn std_dev_is_population_form() {
    let (mean, sd) = mean_and_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    assert_eq!(mean, 5.0);
    assert_eq!(sd, 2.0);
}

proptest! {
    #[test]
    fn percentiles_are_monotone(prices in prop::collection::vec(0.0f64..1e6, 1..60)) {
        let ind = StatsCalculator::new(NOW)
            .compute_from(prices.iter().map(|p| (*p, NOW - 10)));
        let ladder = ind.percentiles.as_array();
        for pair in ladder.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        prop_assert!(ind.std_dev >= 0.0);
        prop_assert_eq!(ind.count, prices.len());
    }

    #[test]
    fn oldest_age_is_never_below_most_recent(offsets in prop::collection::vec(0i64..10_000_000, 1..40)) {
        let ind = StatsCalculator::new(NOW)
            .compute_from(offsets.iter().map(|o| (1.0, NOW - o)));
        prop_assert!(ind.oldest_age_secs >= ind.most_recent_age_secs);
        prop_assert_eq!(ind.oldest_age_secs, *offsets.iter().max().unwrap());
    }
}
