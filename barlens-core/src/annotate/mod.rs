//! Chart annotation: per-bar classification and the model handed to renderers

pub mod classify;
pub mod model;

pub use classify::{
    classify, AnnotatedBar, MarkerKind, MarkerPolicy, PriceBand, DEFAULT_MARKER_OFFSET,
};
pub use model::{build, BandEdges, BandSeries, ChartAnnotationModel, MarkerSeries};
