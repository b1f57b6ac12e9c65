//! Sort keys and the comparators they map to.
//!
//! All sorting is stable: records with equal keys keep their input order.
//! In SQL the ingestion sequence column is the final ORDER BY term for the
//! same effect.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::RecordColumns;
use crate::error::DealError;
use crate::models::{Deal, SaleRecord};

// ---------------------------------------------------------------------------
// SortField / Direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Price,
    Date,
    Comments,
    Temperature,
    Favourites,
    Discount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Sortable
// ---------------------------------------------------------------------------

/// Numeric sort value of a record for a field, `None` when the record kind
/// does not carry it.
pub trait Sortable {
    fn sort_value(&self, field: SortField) -> Option<f64>;
}

impl Sortable for Deal {
    fn sort_value(&self, field: SortField) -> Option<f64> {
        match field {
            SortField::Price => Some(self.price),
            SortField::Date => Some(self.published_at as f64),
            SortField::Comments => Some(self.comment_count as f64),
            SortField::Temperature => Some(self.temperature),
            SortField::Discount => Some(self.discount()),
            SortField::Favourites => None,
        }
    }
}

impl Sortable for SaleRecord {
    fn sort_value(&self, field: SortField) -> Option<f64> {
        match field {
            SortField::Price => Some(self.price),
            SortField::Date => Some(self.timestamp as f64),
            SortField::Favourites => Some(self.favourite_count as f64),
            SortField::Comments | SortField::Temperature | SortField::Discount => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SortKey
// ---------------------------------------------------------------------------

/// Requested result ordering. Defaults to [`SortKey::PriceAsc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    DateAsc,
    DateDesc,
    CommentsAsc,
    CommentsDesc,
    TemperatureAsc,
    TemperatureDesc,
    FavouritesAsc,
    FavouritesDesc,
    DiscountAsc,
    DiscountDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 12] = [
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::DateAsc,
        SortKey::DateDesc,
        SortKey::CommentsAsc,
        SortKey::CommentsDesc,
        SortKey::TemperatureAsc,
        SortKey::TemperatureDesc,
        SortKey::FavouritesAsc,
        SortKey::FavouritesDesc,
        SortKey::DiscountAsc,
        SortKey::DiscountDesc,
    ];

    pub fn field(self) -> SortField {
        match self {
            SortKey::PriceAsc | SortKey::PriceDesc => SortField::Price,
            SortKey::DateAsc | SortKey::DateDesc => SortField::Date,
            SortKey::CommentsAsc | SortKey::CommentsDesc => SortField::Comments,
            SortKey::TemperatureAsc | SortKey::TemperatureDesc => SortField::Temperature,
            SortKey::FavouritesAsc | SortKey::FavouritesDesc => SortField::Favourites,
            SortKey::DiscountAsc | SortKey::DiscountDesc => SortField::Discount,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            SortKey::PriceAsc
            | SortKey::DateAsc
            | SortKey::CommentsAsc
            | SortKey::TemperatureAsc
            | SortKey::FavouritesAsc
            | SortKey::DiscountAsc => Direction::Asc,
            _ => Direction::Desc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "priceAsc",
            SortKey::PriceDesc => "priceDesc",
            SortKey::DateAsc => "dateAsc",
            SortKey::DateDesc => "dateDesc",
            SortKey::CommentsAsc => "commentsAsc",
            SortKey::CommentsDesc => "commentsDesc",
            SortKey::TemperatureAsc => "temperatureAsc",
            SortKey::TemperatureDesc => "temperatureDesc",
            SortKey::FavouritesAsc => "favouritesAsc",
            SortKey::FavouritesDesc => "favouritesDesc",
            SortKey::DiscountAsc => "discountAsc",
            SortKey::DiscountDesc => "discountDesc",
        }
    }

    /// Parse a transport sort parameter, falling back to the default for a
    /// missing or unknown value.
    pub fn from_param(param: Option<&str>) -> Self {
        param.and_then(|p| p.parse().ok()).unwrap_or_default()
    }

    /// Total order on `a` and `b` for this key.
    ///
    /// Records without the field compare equal to each other and after
    /// records that have it, in both directions.
    pub fn compare<R: Sortable + ?Sized>(self, a: &R, b: &R) -> Ordering {
        let field = self.field();
        match (a.sort_value(field), b.sort_value(field)) {
            (Some(x), Some(y)) => {
                let ord = x.total_cmp(&y);
                match self.direction() {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// ORDER BY terms for this key, always ending with the sequence column.
    pub fn order_by(self, columns: &RecordColumns) -> Vec<String> {
        let column = match self.field() {
            SortField::Price => Some(columns.price),
            SortField::Date => Some(columns.timestamp),
            SortField::Comments => columns.comments,
            SortField::Temperature => columns.temperature,
            SortField::Favourites => columns.favourites,
            SortField::Discount => columns.discount,
        };
        let mut terms = Vec::with_capacity(2);
        if let Some(col) = column {
            terms.push(format!("{} {} NULLS LAST", col, self.direction().sql()));
        }
        terms.push(format!("{} ASC", columns.seq));
        terms
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DealError;

    /// Accepts `priceAsc`, `price-asc` and the older `priceUp` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        let normalized = normalized
            .strip_suffix("up")
            .map(|f| format!("{f}asc"))
            .or_else(|| normalized.strip_suffix("down").map(|f| format!("{f}desc")))
            .unwrap_or(normalized);

        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str().to_lowercase() == normalized)
            .ok_or_else(|| DealError::InvalidArgument(format!("unknown sort key: {s}")))
    }
}

/// Stable in-place sort of `records` by `key`.
pub fn sort_records<R: Sortable>(records: &mut [R], key: SortKey) {
    records.sort_by(|a, b| key.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_spelling() {
        assert_eq!("priceAsc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("price-desc".parse::<SortKey>().unwrap(), SortKey::PriceDesc);
        assert_eq!("commentsUp".parse::<SortKey>().unwrap(), SortKey::CommentsAsc);
        assert_eq!("temperatureDown".parse::<SortKey>().unwrap(), SortKey::TemperatureDesc);
        assert_eq!("favourites_desc".parse::<SortKey>().unwrap(), SortKey::FavouritesDesc);
        assert!("popularity".parse::<SortKey>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
    }

    #[test]
    fn unknown_param_falls_back_to_price_asc() {
        assert_eq!(SortKey::from_param(Some("bogus")), SortKey::PriceAsc);
        assert_eq!(SortKey::from_param(None), SortKey::PriceAsc);
        assert_eq!(SortKey::from_param(Some("dateDown")), SortKey::DateDesc);
    }
}
