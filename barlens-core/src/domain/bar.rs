//! Bar — the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Directional trading signal attached to a bar.
///
/// Only the exact upstream tokens `LONG` and `SHORT` carry a bias; anything
/// else (absent, lowercase, NaN markers) is `Flat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "SHORT")]
    Short,
    #[default]
    #[serde(rename = "NONE")]
    Flat,
}

impl Direction {
    /// Case-sensitive exact match against the upstream tokens.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("LONG") => Direction::Long,
            Some("SHORT") => Direction::Short,
            _ => Direction::Flat,
        }
    }

    /// Upstream token for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
            Direction::Flat => "NONE",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OHLC bar with its trading signal and support/resistance levels.
///
/// Prices are finite (the normalizer drops rows that are not) but the OHLC
/// ordering is not enforced: upstream data may have `low > open` and the
/// pipeline uses the values as they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub direction: Direction,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
}

impl Bar {
    /// OHLC sanity check: `low <= min(open, close) <= max(open, close) <= high`.
    ///
    /// Informational only; nothing in the pipeline rejects an insane bar.
    pub fn is_sane(&self) -> bool {
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }
}
