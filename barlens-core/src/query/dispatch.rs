//! Query dispatcher — routes a question to analytics or to the delegate.

use tracing::debug;

use super::analytics;
use super::answer::{Query, QueryAnswer};
use super::route::{Route, RoutingTable};
use crate::domain::Bar;

/// Anything that can answer a free-form question about the bars.
///
/// Implementations fail soft: problems are reported inside the answer text.
pub trait Delegate: Send + Sync {
    fn delegate(&self, question: &str, bars: &[Bar]) -> QueryAnswer;
}

pub struct QueryDispatcher {
    table: RoutingTable,
    delegate: Box<dyn Delegate>,
    symbol: Option<String>,
}

impl QueryDispatcher {
    pub fn new(delegate: Box<dyn Delegate>) -> Self {
        Self {
            table: RoutingTable::default(),
            delegate,
            symbol: None,
        }
    }

    pub fn with_table(mut self, table: RoutingTable) -> Self {
        self.table = table;
        self
    }

    /// Prefix deterministic answers with an instrument label.
    pub fn with_symbol(mut self, symbol: Option<String>) -> Self {
        self.symbol = symbol;
        self
    }

    pub fn route(&self, question: &str) -> Route {
        self.table.classify(question)
    }

    pub fn answer(&self, query: &Query<'_>) -> QueryAnswer {
        let route = self.route(query.question);
        debug!(?route, bars = query.bars.len(), "dispatching question");

        match analytics::answer(route, query.bars, self.symbol.as_deref()) {
            Some(text) => QueryAnswer::deterministic(route, text),
            None => self.delegate.delegate(query.question, query.bars),
        }
    }
}
