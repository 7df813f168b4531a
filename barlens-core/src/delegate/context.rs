//! Bounded prompt context for delegated questions.
//!
//! The prompt describes the dataset (size, time span, field names) and shows
//! at most [`MAX_SAMPLE_ROWS`] leading bars, so its size does not grow with
//! the dataset.

use crate::config::MAX_SAMPLE_ROWS;
use crate::domain::Bar;

pub const FIELD_NAMES: [&str; 8] = [
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "direction",
    "support",
    "resistance",
];

/// Build the user prompt for `question`.
pub fn build_prompt(
    question: &str,
    bars: &[Bar],
    sample_rows: usize,
    symbol: Option<&str>,
) -> String {
    let subject = symbol.map_or_else(|| "a stock".to_string(), |s| format!("the stock {s}"));
    let sample = sample_rows.min(MAX_SAMPLE_ROWS).min(bars.len());

    let mut lines = vec![format!(
        "You are given daily price bars for {subject} with trading signals and support/resistance levels."
    )];

    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => lines.push(format!(
            "Dataset: {} bars from {} to {}.",
            bars.len(),
            first.timestamp,
            last.timestamp
        )),
        _ => lines.push("Dataset: 0 bars.".to_string()),
    }
    lines.push(format!("Fields: {}.", FIELD_NAMES.join(", ")));

    if sample > 0 {
        lines.push(format!("First {sample} bars:"));
        lines.push(FIELD_NAMES.join(" | "));
        lines.extend(bars[..sample].iter().map(sample_row));
    }

    lines.push(String::new());
    lines.push(format!("Answer this: {}", question.trim()));
    lines.join("\n")
}

fn sample_row(bar: &Bar) -> String {
    format!(
        "{} | {} | {} | {} | {} | {} | {} | {}",
        bar.timestamp,
        bar.open,
        bar.high,
        bar.low,
        bar.close,
        bar.direction,
        levels(&bar.support_levels),
        levels(&bar.resistance_levels),
    )
}

fn levels(levels: &[f64]) -> String {
    let items: Vec<String> = levels.iter().map(f64::to_string).collect();
    format!("[{}]", items.join(", "))
}
