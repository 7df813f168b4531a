//! BarLens Core — bar normalization, chart annotation, and question answering.
//!
//! This crate contains the data-facing half of BarLens:
//! - Domain types (raw rows, bars, signal directions)
//! - Level parser and bar normalizer with soft, row-scoped warnings
//! - Signal classifier and chart annotation model for renderers
//! - Ordered routing table, deterministic analytics, and the query dispatcher
//! - LLM delegate with a bounded prompt and tolerant response extraction
//!
//! Every stage is a pure function of its input apart from logging; the only
//! blocking call is the delegate's HTTP request, bounded by a timeout.

pub mod annotate;
pub mod config;
pub mod data;
pub mod delegate;
pub mod domain;
pub mod query;

pub use annotate::{build, classify, AnnotatedBar, ChartAnnotationModel, MarkerKind, MarkerPolicy};
pub use config::BarlensConfig;
pub use data::{normalize, parse_levels, IngestWarning, Normalized};
pub use delegate::{DelegationError, LlmDelegate};
pub use domain::{Bar, Direction, RawRow, RawValue};
pub use query::{AnswerSource, Query, QueryAnswer, QueryDispatcher, Route, RoutingTable};
