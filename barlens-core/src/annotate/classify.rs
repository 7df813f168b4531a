//! Signal classifier — per-bar marker placement and level bands.
//!
//! Pure and deterministic: the output depends only on the bar and the policy.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Direction};

/// Default distance between a marker and the candle extreme, in price units.
pub const DEFAULT_MARKER_OFFSET: f64 = 2.0;

/// Visual marker category for a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerKind {
    Long,
    Short,
    Neutral,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 3] = [MarkerKind::Long, MarkerKind::Short, MarkerKind::Neutral];

    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Long => MarkerKind::Long,
            Direction::Short => MarkerKind::Short,
            Direction::Flat => MarkerKind::Neutral,
        }
    }
}

/// Vertical extent of a set of price levels.
///
/// `low == high` for a single level; renderers must accept zero-height bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    /// Band spanning `levels`, or `None` when there are no levels.
    pub fn from_levels(levels: &[f64]) -> Option<Self> {
        let (first, rest) = levels.split_first()?;
        let (low, high) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self { low, high })
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn height(&self) -> f64 {
        self.high - self.low
    }
}

/// Where LONG/SHORT markers sit relative to the candle.
///
/// A fixed absolute offset below `low` (LONG) or above `high` (SHORT). Being
/// relative to the extremes, the marker clears the candle whatever its size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPolicy {
    pub offset: f64,
}

impl MarkerPolicy {
    /// Policy with the given offset; `None` unless it is finite and positive.
    pub fn new(offset: f64) -> Option<Self> {
        (offset.is_finite() && offset > 0.0).then_some(Self { offset })
    }
}

impl Default for MarkerPolicy {
    fn default() -> Self {
        Self {
            offset: DEFAULT_MARKER_OFFSET,
        }
    }
}

/// A bar plus everything a renderer needs to mark it up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedBar {
    #[serde(flatten)]
    pub bar: Bar,
    pub marker_kind: MarkerKind,
    pub marker_y: f64,
    pub support_band: Option<PriceBand>,
    pub resistance_band: Option<PriceBand>,
}

/// Classify one bar.
pub fn classify(bar: &Bar, policy: &MarkerPolicy) -> AnnotatedBar {
    let marker_kind = MarkerKind::from_direction(bar.direction);
    let marker_y = match marker_kind {
        MarkerKind::Long => bar.low - policy.offset,
        MarkerKind::Short => bar.high + policy.offset,
        MarkerKind::Neutral => (bar.high + bar.low) / 2.0,
    };

    AnnotatedBar {
        bar: bar.clone(),
        marker_kind,
        marker_y,
        support_band: PriceBand::from_levels(&bar.support_levels),
        resistance_band: PriceBand::from_levels(&bar.resistance_levels),
    }
}
