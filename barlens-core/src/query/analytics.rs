//! Deterministic analytics over the normalized bar sequence.

use thiserror::Error;

use super::route::Route;
use crate::annotate::PriceBand;
use crate::domain::{Bar, Direction};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("no bar in the dataset has {what} levels")]
    InsufficientData { what: &'static str },
}

/// Which level family an average is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSide {
    Support,
    Resistance,
}

impl LevelSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelSide::Support => "support",
            LevelSide::Resistance => "resistance",
        }
    }

    fn levels<'a>(&self, bar: &'a Bar) -> &'a [f64] {
        match self {
            LevelSide::Support => &bar.support_levels,
            LevelSide::Resistance => &bar.resistance_levels,
        }
    }
}

/// Mean band midpoint and how many bars contributed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelAverage {
    pub mean: f64,
    pub bars: usize,
}

pub fn direction_count(bars: &[Bar], direction: Direction) -> usize {
    bars.iter().filter(|b| b.direction == direction).count()
}

/// Mean of per-bar band midpoints, `(min + max) / 2`.
///
/// Bars without levels are excluded, not counted as zero.
pub fn average_level(bars: &[Bar], side: LevelSide) -> Result<LevelAverage, AnalyticsError> {
    let (sum, count) = bars
        .iter()
        .filter_map(|b| PriceBand::from_levels(side.levels(b)))
        .fold((0.0, 0usize), |(sum, n), band| (sum + band.midpoint(), n + 1));

    if count == 0 {
        return Err(AnalyticsError::InsufficientData {
            what: side.as_str(),
        });
    }
    Ok(LevelAverage {
        mean: sum / count as f64,
        bars: count,
    })
}

/// Answer text for a deterministic route; `None` for [`Route::General`].
pub fn answer(route: Route, bars: &[Bar], symbol: Option<&str>) -> Option<String> {
    let text = match route {
        Route::BullishCount => count_text(direction_count(bars, Direction::Long), "bullish"),
        Route::BearishCount => count_text(direction_count(bars, Direction::Short), "bearish"),
        Route::AverageSupport => average_text(bars, LevelSide::Support),
        Route::AverageResistance => average_text(bars, LevelSide::Resistance),
        Route::General => return None,
    };
    Some(match symbol {
        Some(symbol) => format!("{symbol}: {text}"),
        None => text,
    })
}

fn count_text(n: usize, label: &str) -> String {
    let days = if n == 1 { "day was" } else { "days were" };
    format!("{n} {days} {label} in the dataset.")
}

fn average_text(bars: &[Bar], side: LevelSide) -> String {
    match average_level(bars, side) {
        Ok(avg) => format!(
            "Average {side} level: {:.2} (across {} bars with {side} levels).",
            avg.mean,
            avg.bars,
            side = side.as_str()
        ),
        Err(e) => format!(
            "Cannot compute the average {} level: {e}.",
            side.as_str()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(direction: Direction, support: Vec<f64>) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            direction,
            support_levels: support,
            resistance_levels: vec![],
        }
    }

    fn mixed() -> Vec<Bar> {
        let mut bars = Vec::new();
        bars.extend((0..3).map(|_| bar(Direction::Long, vec![])));
        bars.extend((0..2).map(|_| bar(Direction::Short, vec![])));
        bars.extend((0..5).map(|_| bar(Direction::Flat, vec![])));
        bars
    }

    #[test]
    fn bullish_count_is_exact() {
        let bars = mixed();
        assert_eq!(direction_count(&bars, Direction::Long), 3);
        assert_eq!(
            answer(Route::BullishCount, &bars, None).unwrap(),
            "3 days were bullish in the dataset."
        );
        assert_eq!(
            answer(Route::BearishCount, &bars, Some("TSLA")).unwrap(),
            "TSLA: 2 days were bearish in the dataset."
        );
    }

    #[test]
    fn singular_day() {
        let bars = vec![bar(Direction::Long, vec![])];
        assert_eq!(
            answer(Route::BullishCount, &bars, None).unwrap(),
            "1 day was bullish in the dataset."
        );
    }

    #[test]
    fn average_support_skips_empty_bars() {
        let bars = vec![
            bar(Direction::Flat, vec![100.0, 105.0]),
            bar(Direction::Flat, vec![]),
            bar(Direction::Flat, vec![110.0]),
        ];
        let avg = average_level(&bars, LevelSide::Support).unwrap();
        assert_eq!(avg.bars, 2);
        assert_eq!(avg.mean, (102.5 + 110.0) / 2.0);
        assert_eq!(
            answer(Route::AverageSupport, &bars, None).unwrap(),
            "Average support level: 106.25 (across 2 bars with support levels)."
        );
    }

    #[test]
    fn average_without_levels_is_insufficient_data() {
        let bars = mixed();
        assert_eq!(
            average_level(&bars, LevelSide::Support),
            Err(AnalyticsError::InsufficientData { what: "support" })
        );
        let text = answer(Route::AverageSupport, &bars, None).unwrap();
        assert!(text.contains("no bar in the dataset has support levels"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn empty_dataset() {
        assert_eq!(
            answer(Route::BullishCount, &[], None).unwrap(),
            "0 days were bullish in the dataset."
        );
        assert!(answer(Route::AverageResistance, &[], None)
            .unwrap()
            .starts_with("Cannot compute"));
    }

    #[test]
    fn general_has_no_deterministic_answer() {
        assert!(answer(Route::General, &mixed(), None).is_none());
    }
}
