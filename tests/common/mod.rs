//! Shared test fixtures for the deal valuation integration tests.
//!
//! Provides `setup_sample_db()` which builds an in-memory `DealValuation`
//! loaded with a handful of deals and marketplace sales.

#![allow(dead_code)]

use deal_valuation::{Deal, DealValuation, SaleRecord};

pub const DAY: i64 = 24 * 60 * 60;

/// Fixed "current time" for every fixture timestamp.
pub const NOW: i64 = 1_731_000_000;

/// Build a deal with only the fields most tests care about.
pub fn deal(id: &str, price: f64) -> Deal {
    Deal {
        id: id.to_string(),
        title: format!("Deal {id}"),
        link: format!("https://deals.example/{id}"),
        price,
        next_best_price: 0.0,
        published_at: NOW,
        comment_count: 0,
        temperature: 0.0,
        product_id: None,
    }
}

pub fn sale(id: &str, product_id: &str, price: f64, timestamp: i64, favourite_count: i64) -> SaleRecord {
    SaleRecord {
        id: id.to_string(),
        product_id: Some(product_id.to_string()),
        title: format!("Lego {product_id}"),
        url: format!("https://market.example/items/{id}"),
        price,
        timestamp,
        favourite_count,
    }
}

/// Five deals with distinct dates, temperatures, comment counts and
/// discounts; `d2` and `d5` share a price.
pub fn sample_deals() -> Vec<Deal> {
    vec![
        Deal {
            next_best_price: 80.0,
            published_at: NOW - 10 * DAY,
            comment_count: 3,
            temperature: 50.0,
            product_id: Some("75192".to_string()),
            ..deal("d1", 40.0)
        },
        Deal {
            next_best_price: 75.0,
            published_at: NOW - 8 * DAY,
            comment_count: 0,
            temperature: 120.0,
            product_id: Some("10294".to_string()),
            ..deal("d2", 60.0)
        },
        Deal {
            next_best_price: 0.0,
            published_at: NOW - 6 * DAY,
            comment_count: 20,
            temperature: 180.0,
            product_id: Some("43230".to_string()),
            ..deal("d3", 90.0)
        },
        Deal {
            next_best_price: 100.0,
            published_at: NOW - 4 * DAY,
            comment_count: 15,
            temperature: 90.0,
            product_id: None,
            ..deal("d4", 120.0)
        },
        Deal {
            next_best_price: 100.0,
            published_at: NOW - 2 * DAY,
            comment_count: 5,
            temperature: 100.0,
            product_id: Some("75192".to_string()),
            ..deal("d5", 60.0)
        },
    ]
}

/// Seven sales across four products; `s4` and `s5` tie on price and
/// favourites.
pub fn sample_sales() -> Vec<SaleRecord> {
    vec![
        sale("s1", "43230", 80.0, NOW - 30 * DAY, 2),
        sale("s2", "43230", 95.0, NOW - 20 * DAY, 10),
        sale("s3", "43230", 110.0, NOW - 5 * DAY, 0),
        sale("s4", "10294", 70.0, NOW - 2 * DAY, 4),
        sale("s5", "10294", 70.0, NOW - 40 * DAY, 4),
        sale("s6", "99999", 15.0, NOW - DAY, 1),
        sale("s7", "75192", 55.0, NOW - 3 * DAY, 7),
    ]
}

/// An in-memory `DealValuation` holding `sample_deals()` and `sample_sales()`.
pub fn setup_sample_db() -> DealValuation {
    let dv = DealValuation::builder().build().unwrap();
    dv.connection().load_deals(&sample_deals()).unwrap();
    dv.connection().load_sales(&sample_sales()).unwrap();
    dv
}

pub fn ids<T, F: Fn(&T) -> &str>(records: &[T], id: F) -> Vec<String> {
    records.iter().map(|r| id(r).to_string()).collect()
}

pub fn deal_ids(deals: &[Deal]) -> Vec<String> {
    ids(deals, |d| d.id.as_str())
}

pub fn sale_ids(sales: &[SaleRecord]) -> Vec<String> {
    ids(sales, |s| s.id.as_str())
}
