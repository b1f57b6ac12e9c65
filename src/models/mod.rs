pub mod deal;
pub mod indicators;
pub mod sale;
pub mod valued;

pub use deal::*;
pub use indicators::*;
pub use sale::*;
pub use valued::*;

/// Lenient deserializers for scraper dumps, where numbers sometimes arrive
/// as strings and optional numbers as `null`.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub fn f64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Option::<NumberOrString>::deserialize(d)? {
            None => Ok(0.0),
            Some(NumberOrString::Int(n)) => Ok(n as f64),
            Some(NumberOrString::Float(f)) => Ok(f),
            Some(NumberOrString::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn i64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match Option::<NumberOrString>::deserialize(d)? {
            None => Ok(0),
            Some(NumberOrString::Int(n)) => Ok(n),
            Some(NumberOrString::Float(f)) => Ok(f as i64),
            Some(NumberOrString::Text(s)) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn string_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match NumberOrString::deserialize(d)? {
            NumberOrString::Int(n) => Ok(n.to_string()),
            NumberOrString::Float(f) => Ok(f.to_string()),
            NumberOrString::Text(s) => Ok(s),
        }
    }

    pub fn opt_string_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<NumberOrString>::deserialize(d)? {
            None => None,
            Some(NumberOrString::Int(n)) => Some(n.to_string()),
            Some(NumberOrString::Float(f)) => Some(f.to_string()),
            Some(NumberOrString::Text(s)) if s.is_empty() => None,
            Some(NumberOrString::Text(s)) => Some(s),
        })
    }
}
