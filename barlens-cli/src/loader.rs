//! CSV glue: maps a bar CSV onto [`RawRow`]s.
//!
//! Cells stay text; coercion belongs to the normalizer. Column names are
//! matched case-insensitively and unknown columns are ignored.

use anyhow::{bail, Context, Result};
use barlens_core::{RawRow, RawValue};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct Columns {
    timestamp: Option<usize>,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    direction: Option<usize>,
    support: Option<usize>,
    resistance: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut cols = Columns::default();
        for (idx, name) in headers.iter().enumerate() {
            let slot = match name.trim().to_lowercase().as_str() {
                "timestamp" | "date" => &mut cols.timestamp,
                "open" => &mut cols.open,
                "high" => &mut cols.high,
                "low" => &mut cols.low,
                "close" => &mut cols.close,
                "direction" => &mut cols.direction,
                "support" => &mut cols.support,
                "resistance" => &mut cols.resistance,
                _ => continue,
            };
            // first occurrence wins
            slot.get_or_insert(idx);
        }

        let required = [
            ("timestamp", cols.timestamp),
            ("open", cols.open),
            ("high", cols.high),
            ("low", cols.low),
            ("close", cols.close),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            bail!("CSV is missing required column(s): {}", missing.join(", "));
        }
        Ok(cols)
    }

    fn row(&self, record: &StringRecord) -> RawRow {
        let cell = |idx: Option<usize>| -> RawValue {
            match idx.and_then(|i| record.get(i)) {
                Some(text) if !text.trim().is_empty() => RawValue::Text(text.to_string()),
                _ => RawValue::Missing,
            }
        };
        RawRow {
            timestamp: cell(self.timestamp),
            open: cell(self.open),
            high: cell(self.high),
            low: cell(self.low),
            close: cell(self.close),
            direction: cell(self.direction),
            support: cell(self.support),
            resistance: cell(self.resistance),
        }
    }
}

/// Read every data row of a headed CSV.
pub fn load_rows<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers().context("read CSV header")?.clone();
    let cols = Columns::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("read CSV record {i}"))?;
        rows.push(cols.row(&record));
    }
    Ok(rows)
}
