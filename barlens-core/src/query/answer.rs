//! Query and answer types.

use serde::Serialize;

use super::route::Route;
use crate::domain::Bar;

/// A question over a read-only view of the normalized bars.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub question: &'a str,
    pub bars: &'a [Bar],
}

impl<'a> Query<'a> {
    pub fn new(question: &'a str, bars: &'a [Bar]) -> Self {
        Self { question, bars }
    }
}

/// Who produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerSource {
    Deterministic,
    Delegated,
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AnswerSource::Deterministic => "DETERMINISTIC",
            AnswerSource::Delegated => "DELEGATED",
        })
    }
}

/// Text shown to the user verbatim, tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnswer {
    pub text: String,
    pub source: AnswerSource,
    pub route: Route,
}

impl QueryAnswer {
    pub fn deterministic(route: Route, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: AnswerSource::Deterministic,
            route,
        }
    }

    pub fn delegated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: AnswerSource::Delegated,
            route: Route::General,
        }
    }
}
