//! Question answering: routing, deterministic analytics, dispatch

pub mod analytics;
pub mod answer;
pub mod dispatch;
pub mod route;

pub use analytics::{average_level, direction_count, AnalyticsError, LevelAverage, LevelSide};
pub use answer::{AnswerSource, Query, QueryAnswer};
pub use dispatch::{Delegate, QueryDispatcher};
pub use route::{Route, RoutingTable};
