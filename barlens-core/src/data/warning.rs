//! Soft, row-scoped ingest anomalies.
//!
//! Nothing here aborts a batch. The normalizer collects these next to the bars
//! it produced and the caller decides whether to surface them.

use serde::Serialize;
use thiserror::Error;

/// Which raw field an anomaly came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Timestamp,
    Open,
    High,
    Low,
    Close,
    Support,
    Resistance,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
            Field::Support => "support",
            Field::Resistance => "resistance",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-level anomaly recorded during normalization.
///
/// Row indices refer to the position in the input batch, before sorting.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngestWarning {
    /// One field could not be fully coerced; the row is kept.
    #[error("row {row}: malformed {field}: {reason}")]
    MalformedField {
        row: usize,
        field: Field,
        reason: String,
    },

    /// The timestamp or a price could not be coerced; the row is excluded.
    #[error("row {row}: dropped: {reason}")]
    RowDropped {
        row: usize,
        field: Field,
        reason: String,
    },
}

impl IngestWarning {
    pub fn row(&self) -> usize {
        match self {
            IngestWarning::MalformedField { row, .. } | IngestWarning::RowDropped { row, .. } => {
                *row
            }
        }
    }

    pub fn field(&self) -> Field {
        match self {
            IngestWarning::MalformedField { field, .. }
            | IngestWarning::RowDropped { field, .. } => *field,
        }
    }

    pub fn is_row_dropped(&self) -> bool {
        matches!(self, IngestWarning::RowDropped { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_row_and_reason() {
        let w = IngestWarning::MalformedField {
            row: 4,
            field: Field::Support,
            reason: "unbalanced brackets".into(),
        };
        assert_eq!(w.to_string(), "row 4: malformed support: unbalanced brackets");
        assert_eq!(w.row(), 4);
        assert!(!w.is_row_dropped());

        let d = IngestWarning::RowDropped {
            row: 7,
            field: Field::Close,
            reason: "close is not numeric".into(),
        };
        assert_eq!(d.to_string(), "row 7: dropped: close is not numeric");
        assert_eq!(d.field(), Field::Close);
        assert!(d.is_row_dropped());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let d = IngestWarning::RowDropped {
            row: 1,
            field: Field::Timestamp,
            reason: "x".into(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "row_dropped");
        assert_eq!(json["row"], 1);
        assert_eq!(json["field"], "timestamp");
    }
}
