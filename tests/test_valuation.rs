//! Deal valuation against comparables stored in DuckDB.

mod common;

use common::{deal_ids, sale_ids, setup_sample_db, DAY, NOW};
use deal_valuation::{BrowsingSession, DealError, FilterSpec, PageRequest, SortKey, ValuedDeal};

fn ids(valued: &[ValuedDeal]) -> Vec<&str> {
    valued.iter().map(|v| v.deal.id.as_str()).collect()
}

#[test]
fn values_deal_against_its_product_sales() {
    let dv = setup_sample_db();
    let valued = dv.valuation().value_deal("d3", NOW).unwrap();

    let ind = valued.indicators;
    assert_eq!(ind.count, 3);
    assert_eq!(ind.mean, 95.0);
    assert!((ind.std_dev - 150.0f64.sqrt()).abs() < 1e-9);
    assert_eq!(ind.percentiles.p75, 110.0);
    assert_eq!(ind.oldest_age_secs, 30 * DAY);
    assert_eq!(ind.most_recent_age_secs, 5 * DAY);

    let expected = 5.0 + 20.0 / (2.0 * (1.0 + 150.0f64.sqrt()));
    assert!((valued.profitability - expected).abs() < 1e-9);
    assert_eq!(valued.discount, 0.0);
}

#[test]
fn single_comparable() {
    let dv = setup_sample_db();
    let valued = dv.valuation().value_deal("d1", NOW).unwrap();
    assert_eq!(valued.indicators.count, 1);
    assert_eq!(valued.profitability, 22.5);
    assert_eq!(valued.discount, 50.0);
}

#[test]
fn deal_without_product_scores_zero() {
    let dv = setup_sample_db();
    let valued = dv.valuation().value_deal("d4", NOW).unwrap();
    assert!(valued.indicators.is_empty());
    assert_eq!(valued.profitability, 0.0);
}

#[test]
fn unknown_deal_is_not_found() {
    let dv = setup_sample_db();
    assert!(matches!(
        dv.valuation().value_deal("nope", NOW),
        Err(DealError::NotFound(_))
    ));
}

#[test]
fn valuation_does_not_modify_stored_deals() {
    let dv = setup_sample_db();
    let before = dv.deals().get("d3").unwrap();
    dv.valuation().value_deal("d3", NOW).unwrap();
    assert_eq!(dv.deals().get("d3").unwrap(), before);
}

#[test]
fn batch_valuation_keeps_input_order() {
    let dv = setup_sample_db();
    let deals = vec![
        dv.deals().get("d5").unwrap().unwrap(),
        dv.deals().get("d4").unwrap().unwrap(),
        dv.deals().get("d2").unwrap().unwrap(),
    ];
    let valued = dv.valuation().value_deals(deals, NOW).unwrap();
    assert_eq!(ids(&valued), vec!["d5", "d4", "d2"]);
    let scores: Vec<f64> = valued.iter().map(|v| v.profitability).collect();
    assert_eq!(scores, vec![-7.5, 0.0, 15.0]);
}

#[test]
fn search_valued_values_the_page() {
    let dv = setup_sample_db();
    let page = dv
        .search_valued_deals(&FilterSpec::new().price_min(50.0).price_max(100.0), None, None, NOW)
        .unwrap();
    assert_eq!(ids(&page.results), vec!["d2", "d5", "d3"]);
    assert_eq!(page.page_info.total_count, 3);
    assert_eq!(page.results[0].profitability, 15.0);
    assert_eq!(page.results[1].profitability, -7.5);
}

#[test]
fn ranking_orders_by_descending_profitability() {
    let dv = setup_sample_db();
    let ranked = dv.valuation().rank_by_profitability(&FilterSpec::new(), NOW).unwrap();
    assert_eq!(ids(&ranked), vec!["d1", "d2", "d3", "d4", "d5"]);

    let hot = dv.valuation().rank_by_profitability(&FilterSpec::hot_deals(), NOW).unwrap();
    assert_eq!(ids(&hot), vec!["d2", "d3", "d5"]);
}

#[test]
fn valued_deal_serializes_flat() {
    let dv = setup_sample_db();
    let valued = dv.valuation().value_deal("d1", NOW).unwrap();
    let json = serde_json::to_value(&valued).unwrap();
    assert_eq!(json["id"], "d1");
    assert_eq!(json["price"], 40.0);
    assert_eq!(json["profitability"], 22.5);
    assert_eq!(json["indicators"]["count"], 1);
}

// ---------------------------------------------------------------------------
// Comparable lookups
// ---------------------------------------------------------------------------

#[test]
fn recent_sales_are_newest_first() {
    let dv = setup_sample_db();
    let recent = dv.sales().recent("43230", NOW - 21 * DAY).unwrap();
    assert_eq!(sale_ids(&recent), vec!["s3", "s2"]);
    assert_eq!(sale_ids(&dv.sales().recent_default("43230", NOW).unwrap()), vec!["s3", "s2"]);
    assert_eq!(sale_ids(&dv.sales().by_date("43230").unwrap()), vec!["s3", "s2", "s1"]);
}

#[test]
fn grouped_lookup_includes_every_requested_product() {
    let dv = setup_sample_db();
    let grouped = dv.sales().for_products(&["43230", "10294", "00000"]).unwrap();
    assert_eq!(grouped.len(), 3);
    assert_eq!(sale_ids(&grouped["43230"]), vec!["s1", "s2", "s3"]);
    assert_eq!(sale_ids(&grouped["10294"]), vec!["s4", "s5"]);
    assert!(grouped["00000"].is_empty());
}

#[test]
fn deal_lookups_by_product() {
    let dv = setup_sample_db();
    assert_eq!(deal_ids(&dv.deals().for_product("75192").unwrap()), vec!["d1", "d5"]);
    assert_eq!(dv.deals().product_ids().unwrap(), vec!["10294", "43230", "75192"]);
}

// ---------------------------------------------------------------------------
// Browsing sessions
// ---------------------------------------------------------------------------

#[test]
fn resume_replays_the_remembered_search() {
    let dv = setup_sample_db();
    let mut session = BrowsingSession::new();
    session.remember(FilterSpec::hot_deals(), SortKey::PriceAsc, PageRequest::new(2, 2).unwrap());
    // New filter resets to page 1.
    assert_eq!(session.page, PageRequest::first(2).unwrap());

    let first = dv.resume(&session).unwrap();
    assert_eq!(deal_ids(&first.results), vec!["d2", "d5"]);

    let next = first.page_info.next_page.unwrap() as i64;
    session.remember(FilterSpec::hot_deals(), SortKey::PriceAsc, PageRequest::new(next, 2).unwrap());
    assert_eq!(deal_ids(&dv.resume(&session).unwrap().results), vec!["d3"]);
}

#[test]
fn favourites_survive_a_session_round_trip() {
    let dv = setup_sample_db();
    let mut session = BrowsingSession::new();
    session.toggle_favourite("d3");
    session.toggle_favourite("d1");

    let restored: BrowsingSession =
        serde_json::from_str(&serde_json::to_string(&session).unwrap()).unwrap();
    let page = dv.search_deals(&FilterSpec::new(), None, None).unwrap();
    assert_eq!(
        restored
            .filter_favourites(&page.results)
            .iter()
            .map(|d| d.id.as_str())
            .collect::<Vec<_>>(),
        vec!["d1", "d3"]
    );
}

#[test]
fn restored_session_with_invalid_page_is_rejected() {
    for page in [r#"{"page":1,"pageSize":0}"#, r#"{"page":0,"pageSize":10}"#] {
        let raw = format!(
            r#"{{"favourites":["d1"],"filter":{{}},"sort":"priceAsc","page":{page}}}"#
        );
        let err = serde_json::from_str::<BrowsingSession>(&raw).unwrap_err();
        assert!(err.to_string().contains("Invalid page request"), "{raw}: {err}");
    }

    let valid = r#"{"favourites":["d1"],"filter":{},"sort":"priceAsc","page":{"page":1,"pageSize":2}}"#;
    let session: BrowsingSession = serde_json::from_str(valid).unwrap();
    let dv = setup_sample_db();
    assert_eq!(deal_ids(&dv.resume(&session).unwrap().results), vec!["d1", "d2"]);
}
