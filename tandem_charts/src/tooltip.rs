// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-to-sample lookup and the hover overlay.
//!
//! [`TooltipController::locate`] turns a horizontal pointer offset into a [`TooltipState`].
//! The state carries the domain x under the pointer, so every chart sharing it (through a
//! [`crate::SyncBus`]) can place its own crosshair and find its own nearest samples.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Circle, Point, Rect, Shape};
use peniko::Color;
use smallvec::SmallVec;
use tandem_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::accessor::Sample;
use crate::measure::TextMeasurer;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::ScaleContinuous;
use crate::style::ChartStyle;
use crate::z_order;

/// A normalized data point identified by its record index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Datum {
    /// Index of the record in its series' source slice.
    pub index: usize,
    /// X in data units.
    pub x: f64,
    /// Y in data units.
    pub y: f64,
}

/// The shared hover state.
///
/// "No hover" is the absence of a state (`Option<TooltipState>::None`).
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipState {
    /// Horizontal pointer offset within the publishing chart, in pixels.
    pub pointer_offset_x: f64,
    /// Domain x under the pointer (for band charts, the band index).
    pub x: f64,
    /// The nearest sample across all series of the publishing chart.
    pub active_datum: Option<Datum>,
    /// Key of the series holding `active_datum`.
    pub active_series_key: Option<String>,
}

/// The nearest sample of one series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesHit {
    /// Series position within the chart.
    pub series: usize,
    /// The sample.
    pub datum: Datum,
}

/// Per-series hits; charts rarely have more than a handful of series.
pub type Hits = SmallVec<[SeriesHit; 4]>;

/// Maps pointer positions to samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct TooltipController;

impl TooltipController {
    /// Returns the nearest non-gap sample of each series to domain `x`.
    ///
    /// Ties go to the earlier sample. Series without samples produce no hit.
    pub fn hits_at<'a>(x: f64, series: impl IntoIterator<Item = &'a [Sample]>) -> Hits {
        let mut hits = Hits::new();
        for (i, samples) in series.into_iter().enumerate() {
            let mut best: Option<(f64, Datum)> = None;
            for s in samples {
                let Some((sx, sy)) = s.point() else {
                    continue;
                };
                let d = (sx - x).abs();
                if best.is_none_or(|(bd, _)| d < bd) {
                    best = Some((
                        d,
                        Datum {
                            index: s.index,
                            x: sx,
                            y: sy,
                        },
                    ));
                }
            }
            if let Some((_, datum)) = best {
                hits.push(SeriesHit { series: i, datum });
            }
        }
        hits
    }

    /// Locates the samples under a pointer at `pointer_offset_x` pixels.
    ///
    /// The pointer is inverted through `x_scale` and clamped into its domain. The active datum
    /// is the hit with the smallest x distance; ties go to the earlier series.
    pub fn locate<'a>(
        x_scale: &ScaleContinuous,
        series: impl IntoIterator<Item = (&'a str, &'a [Sample])>,
        pointer_offset_x: f64,
    ) -> (TooltipState, Hits) {
        let (d0, d1) = x_scale.domain();
        let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        let x = x_scale.invert(pointer_offset_x).clamp(lo, hi);

        let (keys, samples): (Vec<&str>, Vec<&[Sample]>) = series.into_iter().unzip();
        let hits = Self::hits_at(x, samples);
        let mut active: Option<&SeriesHit> = None;
        for hit in &hits {
            let d = (hit.datum.x - x).abs();
            if active.is_none_or(|a| d < (a.datum.x - x).abs()) {
                active = Some(hit);
            }
        }
        let state = TooltipState {
            pointer_offset_x,
            x,
            active_datum: active.map(|h| h.datum),
            active_series_key: active.map(|h| String::from(keys[h.series])),
        };
        (state, hits)
    }
}

/// One tooltip row: a colored swatch and its text.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipRow {
    /// Row text, usually `label: value`.
    pub text: String,
    /// Swatch color.
    pub color: Color,
}

/// The hover overlay of one chart: crosshair, sample markers and a tooltip box.
#[derive(Clone, Debug)]
pub struct TooltipOverlay {
    /// Stable-id base.
    pub id_base: u64,
    /// Crosshair x in scene coordinates; `None` hides the crosshair.
    pub crosshair_x: Option<f64>,
    /// Marker positions and colors.
    pub markers: Vec<(Point, Color)>,
    /// Box heading.
    pub title: String,
    /// Box rows.
    pub rows: Vec<TooltipRow>,
}

impl TooltipOverlay {
    const BOX_ID: u64 = 1;
    const TITLE_ID: u64 = 2;
    const MARKER_IDS: u64 = 16;
    const ROW_IDS: u64 = 0x4000;
    const SWATCH_IDS: u64 = 0x8000;

    /// Rows a tooltip box can give distinct ids.
    pub(crate) const ROW_CAPACITY: u64 = Self::SWATCH_IDS - Self::ROW_IDS;

    /// Generates the overlay marks inside `plot`.
    ///
    /// The box sits to the right of the crosshair and flips to its left when it would leave
    /// the plot.
    pub fn marks(
        &self,
        plot: Rect,
        style: &ChartStyle,
        measurer: &dyn TextMeasurer,
    ) -> Vec<Mark> {
        let mut out = Vec::new();
        let id = |offset: u64| MarkId::from_raw(self.id_base + offset);

        if let Some(x) = self.crosshair_x {
            out.push(
                RuleMarkSpec::vertical(id(0), x, plot.y0, plot.y1)
                    .with_stroke(style.crosshair.brush.clone(), style.crosshair.stroke_width)
                    .with_z_index(z_order::CROSSHAIR)
                    .mark(),
            );
        }
        for (i, (pt, color)) in self.markers.iter().enumerate() {
            out.push(
                Mark::builder(id(Self::MARKER_IDS + i as u64))
                    .path()
                    .z_index(z_order::CROSSHAIR)
                    .path(Circle::new(*pt, style.marker_radius).to_path(0.1))
                    .fill(*color)
                    .stroke(Color::WHITE, 1.0)
                    .build(),
            );
        }
        if self.rows.is_empty() {
            return out;
        }

        let fs = style.font_size;
        let pad = 6.0;
        let line = fs + 4.0;
        let swatch = 0.8 * fs;
        let text_w = core::iter::once(measurer.measure(&self.title, fs).0)
            .chain(self.rows.iter().map(|r| swatch + 4.0 + measurer.measure(&r.text, fs).0))
            .fold(0.0_f64, f64::max);
        let w = text_w + 2.0 * pad;
        let h = line * (self.rows.len() + 1) as f64 + 2.0 * pad;
        let anchor = self.crosshair_x.unwrap_or(plot.x0);
        let x0 = if anchor + 8.0 + w <= plot.x1 {
            anchor + 8.0
        } else {
            (anchor - 8.0 - w).max(plot.x0)
        };
        let y0 = plot.y0 + 4.0;

        out.push(
            Mark::builder(id(Self::BOX_ID))
                .rect()
                .z_index(z_order::TOOLTIP)
                .rect(Rect::new(x0, y0, x0 + w, y0 + h))
                .fill(style.tooltip_fill.clone())
                .build(),
        );
        out.push(overlay_text(id(Self::TITLE_ID), x0 + pad, y0 + pad, &self.title, style));
        for (i, row) in self.rows.iter().enumerate() {
            let ry = y0 + pad + line * (i + 1) as f64;
            let i = i as u64;
            out.push(
                Mark::builder(id(Self::SWATCH_IDS + i))
                    .rect()
                    .z_index(z_order::TOOLTIP)
                    .rect(Rect::new(x0 + pad, ry + 1.0, x0 + pad + swatch, ry + 1.0 + swatch))
                    .fill(row.color)
                    .build(),
            );
            let tx = x0 + pad + swatch + 4.0;
            out.push(overlay_text(id(Self::ROW_IDS + i), tx, ry, &row.text, style));
        }
        out
    }
}

fn overlay_text(id: MarkId, x: f64, y: f64, text: &str, style: &ChartStyle) -> Mark {
    Mark::builder(id)
        .text()
        .z_index(z_order::TOOLTIP)
        .at(x, y)
        .text(text)
        .font_size(style.font_size)
        .fill(style.tooltip_text.clone())
        .anchor(TextAnchor::Start)
        .baseline(TextBaseline::Hanging)
        .build()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;
    use crate::scale::ContinuousKind;

    fn samples(points: &[(f64, Option<f64>)]) -> Vec<Sample> {
        points
            .iter()
            .enumerate()
            .map(|(index, (x, y))| Sample { index, x: *x, y: *y })
            .collect()
    }

    #[test]
    fn locate_inverts_the_pointer_and_picks_the_nearest_sample() {
        let x = ScaleContinuous::new(ContinuousKind::Linear, (0.0, 10.0), (0.0, 100.0));
        let a = samples(&[(0.0, Some(1.0)), (4.0, Some(2.0)), (8.0, Some(3.0))]);
        let b = samples(&[(1.0, Some(5.0)), (5.0, None), (7.0, Some(6.0))]);
        let (state, hits) = TooltipController::locate(&x, [("a", &a[..]), ("b", &b[..])], 62.0);

        assert!((state.x - 6.2).abs() < 1e-12);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].datum.index, 2);
        // The gap at x = 5 is skipped.
        assert_eq!(hits[1].datum.index, 2);
        assert_eq!(state.active_series_key.as_deref(), Some("b"));
        assert_eq!(state.active_datum, Some(Datum { index: 2, x: 7.0, y: 6.0 }));
    }

    #[test]
    fn ties_go_to_the_earlier_series_and_the_pointer_is_clamped() {
        let x = ScaleContinuous::new(ContinuousKind::Linear, (0.0, 10.0), (0.0, 100.0));
        let a = samples(&[(10.0, Some(1.0))]);
        let b = samples(&[(10.0, Some(2.0))]);
        let (state, _) = TooltipController::locate(&x, [("a", &a[..]), ("b", &b[..])], 500.0);
        assert_eq!(state.x, 10.0);
        assert_eq!(state.active_series_key.as_deref(), Some("a"));
    }

    #[test]
    fn empty_series_give_a_state_without_datum() {
        let x = ScaleContinuous::new(ContinuousKind::Linear, (0.0, 1.0), (0.0, 100.0));
        let (state, hits) = TooltipController::locate(&x, [("a", &[][..])], 50.0);
        assert!(hits.is_empty());
        assert_eq!(state.active_datum, None);
        assert_eq!(state.x, 0.5);
    }

    #[test]
    fn tooltip_box_flips_at_the_right_edge() {
        let plot = Rect::new(0.0, 0.0, 200.0, 100.0);
        let overlay = TooltipOverlay {
            id_base: 0,
            crosshair_x: Some(195.0),
            markers: vec![(Point::new(195.0, 50.0), Color::BLACK)],
            title: "t".into(),
            rows: vec![TooltipRow {
                text: "cpu: 12".into(),
                color: Color::BLACK,
            }],
        };
        let marks = overlay.marks(plot, &ChartStyle::default(), &HeuristicTextMeasurer);
        let boxed = marks.iter().find(|m| m.id == MarkId(1)).unwrap();
        let b = boxed.payload.bounds().unwrap();
        assert!(b.x1 <= 195.0);
        assert!(b.x0 >= plot.x0);
    }
}
