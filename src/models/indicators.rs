use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Percentiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Percentiles {
    /// Values in ladder order (p5 first).
    pub fn as_array(&self) -> [f64; 6] {
        [self.p5, self.p25, self.p50, self.p75, self.p95, self.p99]
    }
}

// ---------------------------------------------------------------------------
// PriceIndicators — price distribution of a set of comparables
// ---------------------------------------------------------------------------

/// Price statistics over a set of sale records.
///
/// `count == 0` is the explicit "no comparable data" state: every other
/// field is zero and profitability is undefined (scored as `0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceIndicators {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub percentiles: Percentiles,
    /// Age of the oldest sale in seconds (the largest age).
    pub oldest_age_secs: i64,
    /// Age of the most recent sale in seconds (the smallest age).
    pub most_recent_age_secs: i64,
}

impl PriceIndicators {
    pub const EMPTY: PriceIndicators = PriceIndicators {
        count: 0,
        mean: 0.0,
        std_dev: 0.0,
        percentiles: Percentiles {
            p5: 0.0,
            p25: 0.0,
            p50: 0.0,
            p75: 0.0,
            p95: 0.0,
            p99: 0.0,
        },
        oldest_age_secs: 0,
        most_recent_age_secs: 0,
    };

    pub fn empty() -> Self {
        Self::EMPTY
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn oldest_age(&self) -> SaleAge {
        SaleAge::from_seconds(self.oldest_age_secs)
    }

    pub fn most_recent_age(&self) -> SaleAge {
        SaleAge::from_seconds(self.most_recent_age_secs)
    }
}

// ---------------------------------------------------------------------------
// SaleAge — display decomposition of an age in seconds
// ---------------------------------------------------------------------------

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;

/// An age broken into months (30 days), days, hours and minutes.
///
/// Negative ages (timestamps in the future) display as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleAge {
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl SaleAge {
    pub fn from_seconds(secs: i64) -> Self {
        let secs = secs.max(0);
        Self {
            months: secs / MONTH,
            days: (secs % MONTH) / DAY,
            hours: (secs % DAY) / HOUR,
            minutes: (secs % HOUR) / MINUTE,
        }
    }
}

impl std::fmt::Display for SaleAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} months, {} days, {} hours, {} minutes",
            self.months, self.days, self.hours, self.minutes
        )
    }
}
