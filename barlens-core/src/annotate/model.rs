//! Annotation builder and the chart annotation model.
//!
//! The model is the hand-off to the rendering layer. Besides the per-bar
//! annotations it offers two renderer-ready views: one marker series per
//! marker kind, and gap-aware band edges aligned with the bar sequence.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::classify::{classify, AnnotatedBar, MarkerKind, MarkerPolicy, PriceBand};
use crate::domain::Bar;

/// Ordered, read-only sequence of annotated bars.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ChartAnnotationModel {
    bars: Vec<AnnotatedBar>,
}

/// Markers of a single kind, as parallel x/y vectors in bar order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSeries {
    pub kind: MarkerKind,
    pub x: Vec<NaiveDateTime>,
    pub y: Vec<f64>,
}

/// Lower/upper edge of one band family, aligned with the bar sequence.
///
/// `None` marks bars without levels so renderers can leave a gap.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BandEdges {
    pub lower: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
}

impl BandEdges {
    fn push(&mut self, band: Option<PriceBand>) {
        self.lower.push(band.map(|b| b.low));
        self.upper.push(band.map(|b| b.high));
    }
}

/// Support and resistance edges over the whole model.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BandSeries {
    pub x: Vec<NaiveDateTime>,
    pub support: BandEdges,
    pub resistance: BandEdges,
}

/// Classify every bar, preserving order.
pub fn build(bars: &[Bar], policy: &MarkerPolicy) -> ChartAnnotationModel {
    ChartAnnotationModel {
        bars: bars.iter().map(|bar| classify(bar, policy)).collect(),
    }
}

impl ChartAnnotationModel {
    pub fn bars(&self) -> &[AnnotatedBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnnotatedBar> {
        self.bars.iter()
    }

    /// Model over the most recent `n` bars (all of them if fewer).
    pub fn tail(&self, n: usize) -> ChartAnnotationModel {
        let start = self.bars.len().saturating_sub(n);
        ChartAnnotationModel {
            bars: self.bars[start..].to_vec(),
        }
    }

    /// One series per marker kind, always in `Long, Short, Neutral` order.
    pub fn marker_series(&self) -> Vec<MarkerSeries> {
        MarkerKind::ALL
            .iter()
            .map(|&kind| {
                let (x, y) = self
                    .bars
                    .iter()
                    .filter(|a| a.marker_kind == kind)
                    .map(|a| (a.bar.timestamp, a.marker_y))
                    .unzip();
                MarkerSeries { kind, x, y }
            })
            .collect()
    }

    pub fn band_series(&self) -> BandSeries {
        let mut series = BandSeries::default();
        for a in &self.bars {
            series.x.push(a.bar.timestamp);
            series.support.push(a.support_band);
            series.resistance.push(a.resistance_band);
        }
        series
    }

    pub fn count(&self, kind: MarkerKind) -> usize {
        self.bars.iter().filter(|a| a.marker_kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a ChartAnnotationModel {
    type Item = &'a AnnotatedBar;
    type IntoIter = std::slice::Iter<'a, AnnotatedBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
