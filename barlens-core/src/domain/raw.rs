//! Raw, untyped row input as handed over by an external loader.
//!
//! Loaders disagree on how they encode a cell: a CSV reader yields text, a
//! JSON feed yields numbers and arrays, a dataframe export yields `NaN` for
//! blanks. `RawValue` captures all of these without interpreting them; the
//! normalizer decides what each field means.

use serde::{Deserialize, Serialize};

/// One untyped cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Missing,
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
}

impl RawValue {
    /// True for absent cells, blank text, and the usual NaN/null markers.
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Missing => true,
            RawValue::Number(n) => n.is_nan(),
            RawValue::Text(s) => is_missing_token(s),
            RawValue::List(_) => false,
        }
    }

    /// Text content, if this is a non-missing text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) if !is_missing_token(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerce a scalar cell to a finite number.
    ///
    /// Text is trimmed and may carry one pair of matching quotes.
    pub fn to_finite(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => unquote(s.trim()).trim().parse::<f64>().ok()?,
            RawValue::Missing | RawValue::List(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Tokens that upstream exports use for "no value".
pub(crate) fn is_missing_token(s: &str) -> bool {
    let t = s.trim();
    t.is_empty()
        || t.eq_ignore_ascii_case("nan")
        || t.eq_ignore_ascii_case("none")
        || t.eq_ignore_ascii_case("null")
        || t.eq_ignore_ascii_case("na")
        || t.eq_ignore_ascii_case("n/a")
}

/// Strip one pair of matching single or double quotes.
pub(crate) fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' || first == b'\'') && first == last {
            return &s[1..s.len() - 1];
        }
    }
    s
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(value: Vec<T>) -> Self {
        RawValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Missing, Into::into)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => RawValue::Missing,
            Value::Bool(b) => RawValue::Text(b.to_string()),
            Value::Number(n) => n.as_f64().map_or(RawValue::Missing, RawValue::Number),
            Value::String(s) => RawValue::Text(s),
            Value::Array(items) => RawValue::List(items.into_iter().map(RawValue::from).collect()),
            Value::Object(_) => RawValue::Text(value.to_string()),
        }
    }
}

/// One input row before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub timestamp: RawValue,
    pub open: RawValue,
    pub high: RawValue,
    pub low: RawValue,
    pub close: RawValue,
    pub direction: RawValue,
    pub support: RawValue,
    pub resistance: RawValue,
}

impl RawRow {
    /// Row with timestamp and OHLC set; signal and levels missing.
    pub fn ohlc(
        timestamp: impl Into<RawValue>,
        open: impl Into<RawValue>,
        high: impl Into<RawValue>,
        low: impl Into<RawValue>,
        close: impl Into<RawValue>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            open: open.into(),
            high: high.into(),
            low: low.into(),
            close: close.into(),
            ..Self::default()
        }
    }

    pub fn with_direction(mut self, direction: impl Into<RawValue>) -> Self {
        self.direction = direction.into();
        self
    }

    pub fn with_support(mut self, support: impl Into<RawValue>) -> Self {
        self.support = support.into();
        self
    }

    pub fn with_resistance(mut self, resistance: impl Into<RawValue>) -> Self {
        self.resistance = resistance.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_markers() {
        assert!(RawValue::Missing.is_missing());
        assert!(RawValue::Number(f64::NAN).is_missing());
        assert!(RawValue::from("").is_missing());
        assert!(RawValue::from("  NaN ").is_missing());
        assert!(RawValue::from("None").is_missing());
        assert!(!RawValue::from("0").is_missing());
        assert!(!RawValue::List(vec![]).is_missing());
    }

    #[test]
    fn to_finite_coerces_text_and_rejects_non_finite() {
        assert_eq!(RawValue::from(" 101.5 ").to_finite(), Some(101.5));
        assert_eq!(RawValue::from("'42'").to_finite(), Some(42.0));
        assert_eq!(RawValue::from("abc").to_finite(), None);
        assert_eq!(RawValue::from("inf").to_finite(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).to_finite(), None);
        assert_eq!(RawValue::from(vec![1.0]).to_finite(), None);
    }

    #[test]
    fn from_json_maps_shapes() {
        let raw = RawValue::from(json!([210, "212", null]));
        assert_eq!(
            raw,
            RawValue::List(vec![
                RawValue::Number(210.0),
                RawValue::Text("212".into()),
                RawValue::Missing,
            ])
        );
        assert_eq!(RawValue::from(json!(null)), RawValue::Missing);
    }

    #[test]
    fn from_option() {
        assert_eq!(RawValue::from(None::<f64>), RawValue::Missing);
        assert_eq!(RawValue::from(Some("LONG")), RawValue::Text("LONG".into()));
    }
}
