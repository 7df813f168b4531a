//! Bar normalizer — raw rows in, canonical sorted bars plus warnings out.
//!
//! Each row is handled on its own. A row whose timestamp or OHLC prices
//! cannot be coerced is dropped with a `RowDropped` warning; a level field
//! that is partly or wholly unreadable keeps the row and records a
//! `MalformedField` warning. The batch itself never fails.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use super::levels::parse_levels;
use super::warning::{Field, IngestWarning};
use crate::domain::{Bar, Direction, RawRow, RawValue};

/// Result of normalizing one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Bars sorted ascending by timestamp (stable: equal timestamps keep input order).
    pub bars: Vec<Bar>,
    /// One entry per row-level anomaly, in input row order.
    pub warnings: Vec<IngestWarning>,
}

impl Normalized {
    pub fn dropped_rows(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_row_dropped()).count()
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Normalize a batch of raw rows.
pub fn normalize(rows: &[RawRow]) -> Normalized {
    let mut bars = Vec::with_capacity(rows.len());
    let mut warnings = Vec::new();

    for (row, raw) in rows.iter().enumerate() {
        match normalize_row(row, raw, &mut warnings) {
            Ok(bar) => bars.push(bar),
            Err((field, reason)) => {
                warn!(row, %field, %reason, "dropping row");
                warnings.push(IngestWarning::RowDropped { row, field, reason });
            }
        }
    }

    // Vec::sort_by_key is stable.
    bars.sort_by_key(|bar| bar.timestamp);

    debug!(
        rows = rows.len(),
        bars = bars.len(),
        warnings = warnings.len(),
        "normalized batch"
    );

    Normalized { bars, warnings }
}

fn normalize_row(
    row: usize,
    raw: &RawRow,
    warnings: &mut Vec<IngestWarning>,
) -> Result<Bar, (Field, String)> {
    let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| {
        (
            Field::Timestamp,
            format!("unparseable timestamp {}", describe(&raw.timestamp)),
        )
    })?;

    let open = price(&raw.open, Field::Open)?;
    let high = price(&raw.high, Field::High)?;
    let low = price(&raw.low, Field::Low)?;
    let close = price(&raw.close, Field::Close)?;

    let direction = Direction::from_token(raw.direction.as_text());

    let mut levels = |value: &RawValue, field: Field| {
        let parsed = parse_levels(value, row, field);
        if let Some(w) = parsed.warning {
            warn!(row, %field, "{w}");
            warnings.push(w);
        }
        parsed.levels
    };
    let support_levels = levels(&raw.support, Field::Support);
    let resistance_levels = levels(&raw.resistance, Field::Resistance);

    Ok(Bar {
        timestamp,
        open,
        high,
        low,
        close,
        direction,
        support_levels,
        resistance_levels,
    })
}

fn price(value: &RawValue, field: Field) -> Result<f64, (Field, String)> {
    value.to_finite().ok_or_else(|| {
        (
            field,
            format!("{field} is not a finite number: {}", describe(value)),
        )
    })
}

/// Coerce a raw timestamp: RFC 3339, common date-time layouts, plain dates,
/// or Unix seconds.
pub fn parse_timestamp(value: &RawValue) -> Option<NaiveDateTime> {
    match value {
        RawValue::Number(secs) if secs.is_finite() => unix_seconds(*secs),
        RawValue::Text(text) => {
            let t = text.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
                return Some(dt.naive_utc());
            }
            if let Some(dt) = DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(t, fmt).ok())
            {
                return Some(dt);
            }
            if let Some(date) = DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
            {
                return date.and_hms_opt(0, 0, 0);
            }
            t.parse::<f64>().ok().filter(|s| s.is_finite()).and_then(unix_seconds)
        }
        _ => None,
    }
}

fn unix_seconds(secs: f64) -> Option<NaiveDateTime> {
    let whole = secs.trunc();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let nanos = ((secs - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

fn describe(value: &RawValue) -> String {
    match value {
        RawValue::Missing => "<missing>".to_string(),
        RawValue::Number(n) => n.to_string(),
        RawValue::Text(s) => format!("{s:?}"),
        RawValue::List(items) => format!("<list of {}>", items.len()),
    }
}
