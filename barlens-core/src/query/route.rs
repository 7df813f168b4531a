//! Query classifier — an ordered (pattern, route) table.
//!
//! Matching is a case-insensitive substring test; the first rule that matches
//! wins and anything unmatched goes to [`Route::General`]. Adding a
//! deterministic question type is one `with_rule` call.

use serde::{Deserialize, Serialize};

/// Where a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Route {
    BullishCount,
    BearishCount,
    AverageSupport,
    AverageResistance,
    /// No deterministic handler; delegate to the language model.
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    /// Lowercased substring.
    pattern: String,
    route: Route,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    rules: Vec<Rule>,
}

impl RoutingTable {
    /// Table with no rules: everything routes to `General`.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Earlier rules take precedence.
    pub fn with_rule(mut self, pattern: &str, route: Route) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_lowercase(),
            route,
        });
        self
    }

    pub fn classify(&self, question: &str) -> Route {
        let question = question.to_lowercase();
        self.rules
            .iter()
            .find(|rule| question.contains(&rule.pattern))
            .map_or(Route::General, |rule| rule.route)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::empty()
            .with_rule("bullish", Route::BullishCount)
            .with_rule("support", Route::AverageSupport)
            .with_rule("bearish", Route::BearishCount)
            .with_rule("resistance", Route::AverageResistance)
    }
}
