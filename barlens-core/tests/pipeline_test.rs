//! End-to-end tests for the chart pipeline: raw rows → bars → annotations.

use barlens_core::annotate::{BandEdges, PriceBand};
use barlens_core::data::Field;
use barlens_core::{
    build, normalize, Direction, IngestWarning, MarkerKind, MarkerPolicy, RawRow, RawValue,
};
use chrono::NaiveDate;

// ── Helpers ──────────────────────────────────────────────────────────

/// A small mixed-encoding batch, deliberately out of order.
fn fixture_rows() -> Vec<RawRow> {
    vec![
        RawRow::ohlc("2023-01-05", "102", "106", "101", "105")
            .with_direction("SHORT")
            .with_support("[100, 101.5]")
            .with_resistance("107,109"),
        RawRow::ohlc("2023-01-03", 100.0, 104.0, 99.0, 103.0)
            .with_direction("LONG")
            .with_support(vec![98.0, 99.0])
            .with_resistance(f64::NAN),
        RawRow::ohlc("2023-01-04", "103", "105", "100", "oops")
            .with_direction("LONG")
            .with_support("[99]"),
        RawRow::ohlc("2023-01-06T00:00:00", 105.0, 107.0, 103.0, 104.0)
            .with_direction("long")
            .with_support("[101, abc]"),
        RawRow::ohlc("2023-01-02", 99.0, 101.0, 97.0, 100.0).with_resistance("None"),
    ]
}

fn day(d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

// ── Normalization ────────────────────────────────────────────────────

#[test]
fn bad_rows_are_dropped_and_the_rest_sorted() {
    let out = normalize(&fixture_rows());

    let stamps: Vec<_> = out.bars.iter().map(|b| b.timestamp).collect();
    assert_eq!(stamps, vec![day(2), day(3), day(5), day(6)]);

    assert_eq!(out.dropped_rows(), 1);
    assert!(matches!(
        &out.warnings[..],
        [
            IngestWarning::RowDropped {
                row: 2,
                field: Field::Close,
                ..
            },
            IngestWarning::MalformedField {
                row: 3,
                field: Field::Support,
                ..
            },
        ]
    ));
}

#[test]
fn direction_tokens_are_case_sensitive() {
    let out = normalize(&fixture_rows());
    let dirs: Vec<_> = out.bars.iter().map(|b| b.direction).collect();
    assert_eq!(
        dirs,
        vec![
            Direction::Flat,
            Direction::Long,
            Direction::Short,
            // lowercase "long" is not a signal
            Direction::Flat,
        ]
    );
}

#[test]
fn level_encodings_normalize_to_vectors() {
    let out = normalize(&fixture_rows());
    let by_day = |d: u32| out.bars.iter().find(|b| b.timestamp == day(d)).unwrap();

    assert!(by_day(2).support_levels.is_empty());
    assert!(by_day(2).resistance_levels.is_empty());
    assert_eq!(by_day(3).support_levels, vec![98.0, 99.0]);
    assert!(by_day(3).resistance_levels.is_empty());
    assert_eq!(by_day(5).support_levels, vec![100.0, 101.5]);
    assert_eq!(by_day(5).resistance_levels, vec![107.0, 109.0]);
    assert_eq!(by_day(6).support_levels, vec![101.0]);
}

#[test]
fn one_bad_close_in_n_rows() {
    let n = 25;
    let rows: Vec<RawRow> = (0..n)
        .map(|i| {
            let ts = (day(1) + chrono::Duration::days(i as i64)).to_string();
            let close: RawValue = if i == 7 { "x".into() } else { 100.0.into() };
            RawRow::ohlc(ts, 100.0, 101.0, 99.0, close)
        })
        .collect();
    let out = normalize(&rows);
    assert_eq!(out.bars.len(), n - 1);
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].row(), 7);
}

#[test]
fn duplicate_timestamps_are_kept_in_input_order() {
    let rows = vec![
        RawRow::ohlc("2023-01-03", 1.0, 2.0, 0.5, 1.0),
        RawRow::ohlc("2023-01-02", 1.0, 2.0, 0.5, 2.0),
        RawRow::ohlc("2023-01-03", 1.0, 2.0, 0.5, 3.0),
    ];
    let out = normalize(&rows);
    let closes: Vec<f64> = out.bars.iter().map(|b| b.close).collect();
    assert_eq!(closes, vec![2.0, 1.0, 3.0]);
}

#[test]
fn empty_batch_is_fine() {
    let out = normalize(&[]);
    assert!(out.bars.is_empty());
    assert!(out.warnings.is_empty());
    assert!(build(&out.bars, &MarkerPolicy::default()).is_empty());
}

// ── Annotation ───────────────────────────────────────────────────────

#[test]
fn annotations_follow_bar_order_and_signals() {
    let out = normalize(&fixture_rows());
    let model = build(&out.bars, &MarkerPolicy::default());
    assert_eq!(model.len(), out.bars.len());

    for (annotated, bar) in model.iter().zip(&out.bars) {
        assert_eq!(&annotated.bar, bar);
    }

    let kinds: Vec<_> = model.iter().map(|a| a.marker_kind).collect();
    assert_eq!(
        kinds,
        vec![
            MarkerKind::Neutral,
            MarkerKind::Long,
            MarkerKind::Short,
            MarkerKind::Neutral,
        ]
    );

    let ys: Vec<f64> = model.iter().map(|a| a.marker_y).collect();
    assert_eq!(ys, vec![99.0, 97.0, 108.0, 105.0]);
}

#[test]
fn bands_span_min_and_max() {
    let out = normalize(&fixture_rows());
    let model = build(&out.bars, &MarkerPolicy::default());
    let bars = model.bars();

    assert_eq!(bars[0].support_band, None);
    assert_eq!(
        bars[2].support_band,
        Some(PriceBand {
            low: 100.0,
            high: 101.5
        })
    );
    assert_eq!(
        bars[2].resistance_band,
        Some(PriceBand {
            low: 107.0,
            high: 109.0
        })
    );
    // single level: zero-height band
    let single = bars[3].support_band.unwrap();
    assert_eq!(single.height(), 0.0);
}

#[test]
fn display_window_and_renderer_views() {
    let out = normalize(&fixture_rows());
    let model = build(&out.bars, &MarkerPolicy::default()).tail(3);
    assert_eq!(model.len(), 3);
    assert_eq!(model.bars()[0].bar.timestamp, day(3));

    let series = model.marker_series();
    assert_eq!(series.len(), 3);
    assert_eq!(series[0].kind, MarkerKind::Long);
    assert_eq!(series[0].x, vec![day(3)]);
    assert_eq!(series[1].y, vec![108.0]);
    assert_eq!(series[2].x, vec![day(6)]);

    let bands = model.band_series();
    assert_eq!(bands.x, vec![day(3), day(5), day(6)]);
    assert_eq!(
        bands.resistance,
        BandEdges {
            lower: vec![None, Some(107.0), None],
            upper: vec![None, Some(109.0), None],
        }
    );
}

#[test]
fn model_serializes_to_flat_json() {
    let out = normalize(&fixture_rows());
    let model = build(&out.bars, &MarkerPolicy::default());
    let json = serde_json::to_value(&model).unwrap();

    let first = &json[0];
    assert_eq!(first["marker_kind"], "NEUTRAL");
    assert_eq!(first["direction"], "NONE");
    assert_eq!(first["close"], 100.0);
    assert!(first["support_band"].is_null());
    assert_eq!(json[2]["support_band"]["high"], 101.5);
}

#[test]
fn custom_offset_moves_markers() {
    let out = normalize(&fixture_rows());
    let policy = MarkerPolicy::new(0.5).unwrap();
    let model = build(&out.bars, &policy);
    assert_eq!(model.bars()[1].marker_y, 98.5);
    assert_eq!(model.bars()[2].marker_y, 106.5);
}
