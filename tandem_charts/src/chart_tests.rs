// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::TAU;

use kurbo::{PathEl, Point};
use tandem_core::{IdSource, Mark, MarkDiff, MarkId, MarkPayload};

use crate::frame::region;
use crate::{
    AccessError, AxisSide, BarChart, ChartError, PieChart, Series, Size, SyncBus, TryAccessor,
    XyChart,
};

type Row = (f64, Option<f64>, Option<f64>);

fn rows() -> Rc<[Row]> {
    Rc::from(vec![
        (0.0, Some(1.0), Some(10.0)),
        (1.0, Some(3.0), Some(30.0)),
        (2.0, Some(2.0), Some(20.0)),
        (3.0, Some(5.0), Some(15.0)),
    ])
}

fn line_chart(id_base: u64, data: Rc<[Row]>) -> XyChart<Row> {
    XyChart::new(id_base, Size::new(400.0, 200.0), data, |r: &Row| r.0)
        .with_series(Series::new("cpu", |r: &Row| r.1))
        .with_series(Series::new("mem", |r: &Row| r.2))
}

fn region_of(id_base: u64, id: MarkId, which: u64) -> bool {
    let start = id_base + which * region::REGION_SIZE;
    id.0 >= start && id.0 < start + region::REGION_SIZE
}

fn mark(chart_mark: Option<&Mark>) -> &MarkPayload {
    let Some(m) = chart_mark else {
        panic!("missing mark");
    };
    &m.payload
}

fn path_points(payload: &MarkPayload) -> Vec<PathEl> {
    let MarkPayload::Path(p) = payload else {
        panic!("expected a path mark, got {payload:?}");
    };
    p.path.elements().to_vec()
}

#[test]
fn stacked_areas_accumulate_in_series_order() {
    type Layers = (f64, f64, f64, f64);
    let data: Vec<Layers> = vec![(0.0, 10.0, 20.0, 30.0), (1.0, 10.0, 20.0, 30.0)];
    let mut chart = XyChart::new(0, Size::new(300.0, 300.0), data, |r: &Layers| r.0)
        .with_series(Series::new("a", |r: &Layers| r.1).area())
        .with_series(Series::new("b", |r: &Layers| r.2).area())
        .with_series(Series::new("c", |r: &Layers| r.3).area())
        .stacked(true);
    chart.render().unwrap();

    let y = chart.y_scale(AxisSide::Left).unwrap();
    assert!(y.domain().1 >= 60.0);
    for (i, top) in [10.0, 30.0, 60.0].into_iter().enumerate() {
        let outline = MarkId(region::REGION_SIZE * (region::SERIES + i as u64) + 1);
        let els = path_points(mark(chart.scene().get(outline)));
        let PathEl::MoveTo(first) = els[0] else {
            panic!("outline starts with a move");
        };
        assert!((first.y - y.map(top)).abs() < 1e-9, "series {i} top");
    }
}

#[test]
fn hover_published_by_one_chart_is_observed_exactly_by_another() {
    let bus = SyncBus::new();
    let mut ids = IdSource::new();
    let mut a = line_chart(ids.next_base(), rows()).with_link(&bus);
    // B has a different width, so the same x projects elsewhere.
    let mut b = XyChart::new(ids.next_base(), Size::new(640.0, 120.0), rows(), |r: &Row| r.0)
        .with_series(Series::new("cpu", |r: &Row| r.1))
        .with_link(&bus);
    a.render().unwrap();
    b.render().unwrap();

    let published = a.pointer_move(200.0).unwrap().unwrap();
    assert_eq!(bus.latest(), Some(published.clone()));
    assert_eq!(b.hover(), Some(published.clone()));
    assert_eq!(a.hover(), Some(published.clone()));

    b.render().unwrap();
    let b_base = IdSource::DEFAULT_STRIDE * 2;
    let rule = b
        .scene()
        .get(MarkId(b_base + region::TOOLTIP * region::REGION_SIZE))
        .and_then(|m| m.payload.bounds());
    let expected = b.x_scale().unwrap().map(published.x);
    assert!(rule.is_some_and(|r| (r.center().x - expected).abs() < 1e-9));

    bus.publish(None);
    assert_eq!(a.hover(), None);
    assert_eq!(b.hover(), None);
    let diffs = b.render().unwrap();
    assert!(
        diffs
            .iter()
            .all(|d| matches!(d, MarkDiff::Exit { .. }) && region_of(b_base, d.id(), region::TOOLTIP))
    );
}

#[test]
fn late_subscribers_see_the_current_hover() {
    let bus = SyncBus::new();
    let mut a = line_chart(0, rows()).with_link(&bus);
    let published = a.pointer_move(150.0).unwrap();
    let late = line_chart(1 << 24, rows()).with_link(&bus);
    assert_eq!(late.hover(), published);
}

#[test]
fn dropping_the_hovering_chart_clears_its_siblings() {
    let bus = SyncBus::new();
    let mut a = line_chart(0, rows()).with_link(&bus);
    let b = line_chart(1 << 24, rows()).with_link(&bus);
    a.pointer_move(150.0).unwrap();
    assert!(b.hover().is_some());
    drop(a);
    assert_eq!(b.hover(), None);
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn unlinking_a_chart_that_did_not_publish_keeps_the_hover() {
    let bus = SyncBus::new();
    let mut a = line_chart(0, rows()).with_link(&bus);
    let mut b = line_chart(1 << 24, rows()).with_link(&bus);
    a.pointer_move(150.0).unwrap();
    b.unlink();
    assert!(a.hover().is_some());
    assert!(b.bus().is_none());
}

#[test]
fn pie_zero_wedges_sweep_nothing_and_the_total_is_a_full_turn() {
    type Share = (&'static str, f64);
    let data: Vec<Share> = vec![("a", 0.0), ("b", 10.0)];
    let mut pie = PieChart::new(0, Size::new(200.0, 200.0), data, |r: &Share| r.0, |r: &Share| r.1);
    let wedges = pie.wedges().unwrap();
    assert_eq!(wedges[0].sweep().to_degrees(), 0.0);
    let total: f64 = wedges.iter().map(|w| w.sweep()).sum();
    assert_eq!(total, TAU);
    assert_eq!((wedges[1].start, wedges[1].end), (0.0, TAU));

    pie.render().unwrap();
    let sectors = MarkId(region::SERIES * region::REGION_SIZE);
    assert!(pie.scene().get(sectors).is_none(), "zero wedge has no mark");
    assert!(pie.scene().get(sectors.offset(1)).is_some());
}

#[test]
fn empty_line_chart_renders_axes_without_series_paths() {
    let empty: Rc<[Row]> = Rc::from(Vec::new());
    let mut chart = line_chart(0, empty);
    let diffs = chart.render().unwrap();
    assert!(diffs.iter().any(|d| region_of(0, d.id(), region::AXIS_X)));
    assert!(diffs.iter().any(|d| region_of(0, d.id(), region::AXIS_LEFT)));
    assert!(
        !diffs
            .iter()
            .any(|d| region_of(0, d.id(), region::SERIES) || region_of(0, d.id(), region::SERIES + 1))
    );
}

#[test]
fn gaps_split_a_line_into_disjoint_segments() {
    let data: Vec<Row> = vec![(1.0, Some(5.0), None), (2.0, None, None), (3.0, Some(7.0), None)];
    let mut chart = XyChart::new(0, Size::new(300.0, 200.0), data, |r: &Row| r.0)
        .with_series(Series::new("s", |r: &Row| r.1));
    chart.render().unwrap();
    let els = path_points(mark(chart.scene().get(MarkId(region::SERIES * region::REGION_SIZE))));
    let moves = els.iter().filter(|e| matches!(e, PathEl::MoveTo(_))).count();
    let lines = els.iter().filter(|e| matches!(e, PathEl::LineTo(_))).count();
    assert_eq!((moves, lines), (2, 0));
}

#[test]
fn unchanged_inputs_reuse_the_layout() {
    let data = rows();
    let mut chart = line_chart(0, Rc::clone(&data));
    chart.render().unwrap();
    let again = chart.render().unwrap();
    assert!(again.is_empty(), "identical frame produces no diffs");
    chart.set_data(Rc::clone(&data));
    chart.pointer_move(120.0).unwrap();
    chart.render().unwrap();
    assert_eq!(chart.layout_recomputations(), 1);

    chart.set_data(rows());
    chart.render().unwrap();
    assert_eq!(chart.layout_recomputations(), 2);
}

#[test]
fn moving_the_pointer_only_touches_the_overlay() {
    let mut chart = line_chart(0, rows());
    chart.pointer_move(120.0).unwrap();
    chart.render().unwrap();
    chart.pointer_move(300.0).unwrap();
    let diffs = chart.render().unwrap();
    assert!(!diffs.is_empty());
    assert!(diffs.iter().all(|d| region_of(0, d.id(), region::TOOLTIP)));
}

#[test]
fn accessor_errors_surface_from_render() {
    let failing = TryAccessor(|r: &Row| r.1.ok_or(AccessError::new("missing reading")));
    let data: Vec<Row> = vec![(0.0, Some(1.0), None), (1.0, None, None)];
    let mut chart = XyChart::new(0, Size::new(300.0, 200.0), data, |r: &Row| r.0)
        .with_series(Series::new("load", failing));
    let err = chart.render().unwrap_err();
    assert_eq!(
        err,
        ChartError::Accessor {
            series: "load".into(),
            index: 1,
            source: AccessError::new("missing reading"),
        }
    );
    assert!(chart.scene().is_empty());
}

#[test]
fn keyed_records_become_one_series_per_key() {
    type Reading = (&'static str, f64, f64);
    let data: Vec<Reading> = vec![
        ("east", 0.0, 1.0),
        ("west", 0.0, 2.0),
        ("east", 1.0, 3.0),
    ];
    let mut chart = XyChart::from_keyed(
        0,
        Size::new(300.0, 200.0),
        &data,
        |r: &Reading| r.0,
        |r: &Reading| r.1,
        |r: &Reading| r.2,
    )
    .unwrap();
    let keys: Vec<&str> = chart.series().iter().map(Series::key).collect();
    assert_eq!(keys, ["east", "west"]);
    assert_eq!(chart.record(0, 1), Some(&("east", 1.0, 3.0)));
    chart.render().unwrap();
}

#[test]
fn bars_split_their_band_and_invert_pointer_positions() {
    type Count = (&'static str, f64);
    let data: Vec<Count> = vec![("a", 1.0), ("a", 2.0), ("a", 3.0), ("b", 4.0)];
    let mut chart = BarChart::new(0, Size::new(400.0, 200.0), data, |r: &Count| r.0, |r: &Count| r.1)
        .with_gap(4.0);
    chart.render().unwrap();
    let band = chart.band_scale().unwrap();
    let base = region::SERIES * region::REGION_SIZE;
    let widths: Vec<f64> = (0..4)
        .map(|k| chart.scene().get(MarkId(base + k)).and_then(|m| m.payload.bounds()))
        .map(|b| b.map_or(0.0, |b| b.width()))
        .collect();
    let split = (band.band_width() - 4.0 * 2.0) / 3.0;
    for w in &widths[..3] {
        assert!((w - split).abs() < 1e-9);
    }
    assert!((widths[3] - band.band_width()).abs() < 1e-9);

    let state = chart.pointer_move(band.center(1)).unwrap().unwrap();
    assert_eq!(state.x, 1.0);
    assert_eq!(state.active_series_key.as_deref(), Some("b"));
    assert_eq!(chart.click(Point::new(band.center(1), chart.plot().y1 - 1.0)).unwrap(), Some(3));
}

#[test]
fn series_beyond_the_chart_id_range_are_an_error() {
    let mut chart = XyChart::new(0, Size::new(300.0, 200.0), rows(), |r: &Row| r.0);
    for _ in 0..region::MAX_SERIES {
        chart = chart.with_series(Series::new("s", |r: &Row| r.1));
    }
    chart.render().unwrap();
    let last = MarkId(IdSource::DEFAULT_STRIDE - region::REGION_SIZE);
    assert!(chart.scene().get(last).is_some(), "last series sits at the top of the range");

    chart = chart.with_series(Series::new("overflow", |r: &Row| r.1));
    assert_eq!(
        chart.render().unwrap_err(),
        ChartError::TooManyMarks {
            what: "series",
            count: region::MAX_SERIES as usize + 1,
            capacity: region::MAX_SERIES,
        }
    );
}


#[test]
fn a_single_series_still_gets_a_legend() {
    let mut chart = XyChart::new(0, Size::new(300.0, 200.0), rows(), |r: &Row| r.0)
        .with_series(Series::new("cpu", |r: &Row| r.1));
    let diffs = chart.render().unwrap();
    assert!(diffs.iter().any(|d| region_of(0, d.id(), region::LEGEND)));
}
