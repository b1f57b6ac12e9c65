//! Declarative record filters and their compiled predicates.
//!
//! A [`FilterSpec`] holds optional constraints; every present field adds one
//! AND-ed clause to a [`FilterPredicate`], absent fields add none. Presence
//! is explicit (`Option`), so a zero threshold is still a constraint.
//!
//! Bound conventions:
//! - price and date ranges are half-open: `min <= value < max`
//! - `discount_min` requires `price < reference * (1 - discount_min / 100)`
//! - `comment_min`, `favourite_count_min`, `temperature_min` are inclusive
//! - `product_id` is an exact match
//!
//! Degenerate specs (a NaN bound, `min >= max`) compile to a predicate that
//! matches nothing instead of failing. A clause on a dimension the record
//! kind lacks (comments on a sale, favourites on a deal) is ignored.

use serde::{Deserialize, Serialize};

use crate::config::{self, RecordColumns};
use crate::models::{Deal, SaleRecord};
use crate::sql_builder::{SqlBuilder, SqlValue};

// ---------------------------------------------------------------------------
// Filterable
// ---------------------------------------------------------------------------

/// Fields a predicate can inspect. Optional accessors default to `None` for
/// record kinds that do not carry the dimension.
pub trait Filterable {
    fn price(&self) -> f64;
    fn timestamp(&self) -> i64;
    fn product_id(&self) -> Option<&str>;

    fn reference_price(&self) -> Option<f64> {
        None
    }
    fn comment_count(&self) -> Option<i64> {
        None
    }
    fn temperature(&self) -> Option<f64> {
        None
    }
    fn favourite_count(&self) -> Option<i64> {
        None
    }
}

impl Filterable for Deal {
    fn price(&self) -> f64 {
        self.price
    }
    fn timestamp(&self) -> i64 {
        self.published_at
    }
    fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }
    fn reference_price(&self) -> Option<f64> {
        Some(self.next_best_price)
    }
    fn comment_count(&self) -> Option<i64> {
        Some(self.comment_count)
    }
    fn temperature(&self) -> Option<f64> {
        Some(self.temperature)
    }
}

impl Filterable for SaleRecord {
    fn price(&self) -> f64 {
        self.price
    }
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
    fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }
    fn favourite_count(&self) -> Option<i64> {
        Some(self.favourite_count)
    }
}

// ---------------------------------------------------------------------------
// FilterSpec
// ---------------------------------------------------------------------------

/// Optional search constraints. All fields default to "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Epoch seconds, inclusive.
    pub date_min: Option<i64>,
    /// Epoch seconds, exclusive.
    pub date_max: Option<i64>,
    /// Percent.
    pub discount_min: Option<f64>,
    pub comment_min: Option<i64>,
    pub favourite_count_min: Option<i64>,
    pub temperature_min: Option<f64>,
    pub product_id: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price_min(mut self, v: f64) -> Self {
        self.price_min = Some(v);
        self
    }

    pub fn price_max(mut self, v: f64) -> Self {
        self.price_max = Some(v);
        self
    }

    pub fn date_min(mut self, v: i64) -> Self {
        self.date_min = Some(v);
        self
    }

    pub fn date_max(mut self, v: i64) -> Self {
        self.date_max = Some(v);
        self
    }

    pub fn discount_min(mut self, v: f64) -> Self {
        self.discount_min = Some(v);
        self
    }

    pub fn comment_min(mut self, v: i64) -> Self {
        self.comment_min = Some(v);
        self
    }

    pub fn favourite_count_min(mut self, v: i64) -> Self {
        self.favourite_count_min = Some(v);
        self
    }

    pub fn temperature_min(mut self, v: f64) -> Self {
        self.temperature_min = Some(v);
        self
    }

    pub fn product_id(mut self, id: impl Into<String>) -> Self {
        self.product_id = Some(id.into());
        self
    }

    /// Deals at least 50 % below their reference price.
    pub fn best_discount() -> Self {
        Self::new().discount_min(config::BEST_DISCOUNT_MIN)
    }

    /// Deals with at least 15 comments.
    pub fn most_commented() -> Self {
        Self::new().comment_min(config::MOST_COMMENTED_MIN)
    }

    /// Deals with a temperature of at least 100.
    pub fn hot_deals() -> Self {
        Self::new().temperature_min(config::HOT_TEMPERATURE_MIN)
    }

    /// `true` when no field is set.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    pub fn compile(&self) -> FilterPredicate {
        FilterPredicate::from_spec(self)
    }
}

// ---------------------------------------------------------------------------
// Clause / FilterPredicate
// ---------------------------------------------------------------------------

/// One conjunctive constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    PriceAtLeast(f64),
    PriceBelow(f64),
    DateFrom(i64),
    DateBefore(i64),
    DiscountAtLeast(f64),
    CommentsAtLeast(i64),
    FavouritesAtLeast(i64),
    TemperatureAtLeast(f64),
    ProductIs(String),
    /// Matches nothing.
    Never,
}

impl Clause {
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        match self {
            Clause::PriceAtLeast(min) => record.price() >= *min,
            Clause::PriceBelow(max) => record.price() < *max,
            Clause::DateFrom(min) => record.timestamp() >= *min,
            Clause::DateBefore(max) => record.timestamp() < *max,
            Clause::DiscountAtLeast(pct) => record
                .reference_price()
                .is_none_or(|reference| record.price() < reference * (1.0 - pct / 100.0)),
            Clause::CommentsAtLeast(min) => record.comment_count().is_none_or(|c| c >= *min),
            Clause::FavouritesAtLeast(min) => record.favourite_count().is_none_or(|c| c >= *min),
            Clause::TemperatureAtLeast(min) => record.temperature().is_none_or(|t| t >= *min),
            Clause::ProductIs(id) => record.product_id() == Some(id.as_str()),
            Clause::Never => false,
        }
    }

    /// Append this clause to `qb` using the given column mapping.
    pub fn apply(&self, qb: &mut SqlBuilder, columns: &RecordColumns) {
        match self {
            Clause::PriceAtLeast(min) => {
                qb.where_gte(columns.price, *min);
            }
            Clause::PriceBelow(max) => {
                qb.where_lt(columns.price, *max);
            }
            Clause::DateFrom(min) => {
                qb.where_gte(columns.timestamp, *min);
            }
            Clause::DateBefore(max) => {
                qb.where_lt(columns.timestamp, *max);
            }
            Clause::DiscountAtLeast(pct) => {
                if let Some(reference) = columns.reference_price {
                    qb.where_clause(
                        &format!("{} < {} * (1 - ? / 100.0)", columns.price, reference),
                        &[(*pct).into()],
                    );
                }
            }
            Clause::CommentsAtLeast(min) => gte_if_present(qb, columns.comments, (*min).into()),
            Clause::FavouritesAtLeast(min) => gte_if_present(qb, columns.favourites, (*min).into()),
            Clause::TemperatureAtLeast(min) => {
                gte_if_present(qb, columns.temperature, (*min).into())
            }
            Clause::ProductIs(id) => {
                qb.where_eq(columns.product_id, id.as_str());
            }
            Clause::Never => {
                qb.where_false();
            }
        }
    }
}

fn gte_if_present(qb: &mut SqlBuilder, column: Option<&str>, value: SqlValue) {
    if let Some(col) = column {
        qb.where_gte(col, value);
    }
}

/// A conjunction of clauses compiled from one or more [`FilterSpec`]s.
///
/// The same predicate drives both in-memory matching and SQL translation,
/// so a count and a fetch built from it always agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPredicate {
    clauses: Vec<Clause>,
}

impl FilterPredicate {
    /// Predicate matching every record.
    pub fn always() -> Self {
        Self::default()
    }

    pub fn from_spec(spec: &FilterSpec) -> Self {
        let mut clauses = Vec::new();

        if let Some(min) = spec.price_min {
            clauses.push(Clause::PriceAtLeast(min));
        }
        if let Some(max) = spec.price_max {
            clauses.push(Clause::PriceBelow(max));
        }
        if let (Some(min), Some(max)) = (spec.price_min, spec.price_max) {
            if min >= max {
                clauses.push(Clause::Never);
            }
        }

        if let Some(min) = spec.date_min {
            clauses.push(Clause::DateFrom(min));
        }
        if let Some(max) = spec.date_max {
            clauses.push(Clause::DateBefore(max));
        }
        if let (Some(min), Some(max)) = (spec.date_min, spec.date_max) {
            if min >= max {
                clauses.push(Clause::Never);
            }
        }

        if let Some(pct) = spec.discount_min {
            clauses.push(Clause::DiscountAtLeast(pct));
        }
        if let Some(min) = spec.comment_min {
            clauses.push(Clause::CommentsAtLeast(min));
        }
        if let Some(min) = spec.favourite_count_min {
            clauses.push(Clause::FavouritesAtLeast(min));
        }
        if let Some(min) = spec.temperature_min {
            clauses.push(Clause::TemperatureAtLeast(min));
        }
        if let Some(ref id) = spec.product_id {
            clauses.push(Clause::ProductIs(id.clone()));
        }

        let has_nan = [
            spec.price_min,
            spec.price_max,
            spec.discount_min,
            spec.temperature_min,
        ]
        .iter()
        .flatten()
        .any(|v| v.is_nan());
        if has_nan {
            clauses.push(Clause::Never);
        }

        Self { clauses }
    }

    /// Conjunction of `self` and `other`.
    pub fn and(mut self, other: FilterPredicate) -> Self {
        self.clauses.extend(other.clauses);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// `true` when the predicate can be decided as "no match" without
    /// looking at any record.
    pub fn is_unsatisfiable(&self) -> bool {
        self.clauses.contains(&Clause::Never)
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.clauses.iter().all(|c| c.matches(record))
    }

    /// Append every clause to `qb` as a WHERE condition.
    pub fn apply(&self, qb: &mut SqlBuilder, columns: &RecordColumns) {
        if self.is_unsatisfiable() {
            qb.where_false();
            return;
        }
        for clause in &self.clauses {
            clause.apply(qb, columns);
        }
    }
}

impl From<&FilterSpec> for FilterPredicate {
    fn from(spec: &FilterSpec) -> Self {
        Self::from_spec(spec)
    }
}
