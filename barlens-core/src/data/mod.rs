//! Data ingestion: level parsing and bar normalization

pub mod levels;
pub mod normalize;
pub mod warning;

pub use levels::{parse_levels, ParsedLevels};
pub use normalize::{normalize, parse_timestamp, Normalized};
pub use warning::{Field, IngestWarning};
