//! Level parser — support/resistance fields in whatever shape they arrive.
//!
//! Accepted shapes:
//! - an actual list (`RawValue::List`), e.g. from a JSON feed
//! - a bracketed list literal in text, `"[210, 212]"` or `"(210, 212)"`
//! - comma-separated text, `"210,212"`
//! - a single scalar, `212` or `"212"`
//! - a missing marker: absent, blank, `NaN`, `None`, `null`
//!
//! List literals are decoded by data-only decoders (a JSON array, then a
//! restricted comma/number grammar). Nothing is ever evaluated as code.
//!
//! The parser is total: every input yields a (possibly empty) vector, and
//! anything it had to discard is reported as a soft warning.

use super::warning::{Field, IngestWarning};
use crate::domain::raw::{is_missing_token, unquote, RawValue};

/// Output of [`parse_levels`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLevels {
    /// Levels in input order.
    pub levels: Vec<f64>,
    pub warning: Option<IngestWarning>,
}

/// Decoded levels plus a reason if anything was discarded.
type Decoded = (Vec<f64>, Option<String>);

/// Parse one raw level field from row `row`.
pub fn parse_levels(raw: &RawValue, row: usize, field: Field) -> ParsedLevels {
    let (levels, reason) = decode(raw);
    ParsedLevels {
        levels,
        warning: reason.map(|reason| IngestWarning::MalformedField { row, field, reason }),
    }
}

fn decode(raw: &RawValue) -> Decoded {
    match raw {
        RawValue::Missing => (Vec::new(), None),
        RawValue::Number(n) if n.is_nan() => (Vec::new(), None),
        RawValue::Number(n) if n.is_finite() => (vec![*n], None),
        RawValue::Number(n) => (Vec::new(), Some(format!("non-finite level {n}"))),
        RawValue::List(items) => decode_items(items),
        RawValue::Text(text) => decode_text(text),
    }
}

fn decode_items(items: &[RawValue]) -> Decoded {
    let levels: Vec<f64> = items.iter().filter_map(RawValue::to_finite).collect();
    let dropped = items.len() - levels.len();
    (levels, dropped_reason(dropped, items.len()))
}

fn decode_text(text: &str) -> Decoded {
    let t = text.trim();
    if is_missing_token(t) {
        return (Vec::new(), None);
    }

    let opens = t.starts_with('[') || t.starts_with('(');
    let closes = t.ends_with(']') || t.ends_with(')');
    if opens || closes {
        return match bracket_body(t) {
            Some(_) if t.starts_with('[') => {
                decode_json_array(t).unwrap_or_else(|| decode_literal(t))
            }
            Some(_) => decode_literal(t),
            None => (Vec::new(), Some(format!("unbalanced brackets in {t:?}"))),
        };
    }

    if t.contains(',') {
        let tokens: Vec<&str> = t.split(',').collect();
        return decode_tokens(&tokens);
    }

    match RawValue::Text(t.to_string()).to_finite() {
        Some(v) => (vec![v], None),
        None => (Vec::new(), Some(format!("not a number: {t:?}"))),
    }
}

/// Inner text of a list literal whose brackets match, e.g. `[..]` or `(..)`.
fn bracket_body(t: &str) -> Option<&str> {
    if t.len() < 2 {
        return None;
    }
    let pair = (t.as_bytes()[0], t.as_bytes()[t.len() - 1]);
    match pair {
        (b'[', b']') | (b'(', b')') => Some(&t[1..t.len() - 1]),
        _ => None,
    }
}

/// Strict JSON array of scalars. `None` when the text is not valid JSON or
/// nests containers, so the restricted grammar gets to report it.
fn decode_json_array(t: &str) -> Option<Decoded> {
    let values: Vec<serde_json::Value> = serde_json::from_str(t).ok()?;
    if values.iter().any(|v| v.is_array() || v.is_object()) {
        return None;
    }
    let items: Vec<RawValue> = values.into_iter().map(RawValue::from).collect();
    Some(decode_items(&items))
}

/// Restricted list-literal grammar: `[` token (`,` token)* `,`? `]` where a
/// token is a number, optionally quoted. Nested brackets are rejected.
fn decode_literal(t: &str) -> Decoded {
    let Some(body) = bracket_body(t) else {
        return (Vec::new(), Some(format!("unbalanced brackets in {t:?}")));
    };
    if body.contains(['[', ']', '(', ')']) {
        return (Vec::new(), Some(format!("nested list literal in {t:?}")));
    }
    let body = body.trim();
    if body.is_empty() {
        return (Vec::new(), None);
    }
    let body = body.strip_suffix(',').unwrap_or(body);
    let tokens: Vec<&str> = body.split(',').collect();
    decode_tokens(&tokens)
}

fn decode_tokens(tokens: &[&str]) -> Decoded {
    let levels: Vec<f64> = tokens
        .iter()
        .filter_map(|token| {
            let v = unquote(token.trim()).trim().parse::<f64>().ok()?;
            v.is_finite().then_some(v)
        })
        .collect();
    let dropped = tokens.len() - levels.len();
    (levels, dropped_reason(dropped, tokens.len()))
}

fn dropped_reason(dropped: usize, total: usize) -> Option<String> {
    match dropped {
        0 => None,
        d if d == total => Some(format!("no numeric values among {total} element(s)")),
        d => Some(format!("dropped {d} of {total} non-numeric element(s)")),
    }
}
