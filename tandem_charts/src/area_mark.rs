// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Area mark generation (filled band between a bottom and a top line).

extern crate alloc;

use alloc::vec::Vec;

use kurbo::BezPath;
use peniko::{Brush, Color};
use tandem_core::{Mark, MarkId};

use crate::accessor::Sample;
use crate::axis::StrokeStyle;
use crate::scale::ScaleContinuous;

/// One column of an area: bottom `y0` and top `y1` at `x`, all in data units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// X position.
    pub x: f64,
    /// Bottom of the band.
    pub y0: f64,
    /// Top of the band.
    pub y1: f64,
}

/// Turns samples into bands resting on a fixed `baseline`; gaps stay `None`.
pub fn bands_from_baseline(samples: &[Sample], baseline: f64) -> Vec<Option<Band>> {
    samples
        .iter()
        .map(|s| {
            s.point().map(|(x, y)| Band {
                x,
                y0: baseline,
                y1: y,
            })
        })
        .collect()
}

/// A filled area between `y0` and `y1`, with an optional outline along `y1`.
///
/// Each gap-free run of bands becomes one closed polygon.
#[derive(Clone, Debug)]
pub struct AreaMarkSpec {
    /// Stable-id base: the fill uses `id_base`, the outline `id_base + 1`.
    pub id_base: u64,
    /// X scale mapping data x into scene x.
    pub x_scale: ScaleContinuous,
    /// Y scale mapping data y into scene y.
    pub y_scale: ScaleContinuous,
    /// Fill paint for the area.
    pub fill: Brush,
    /// Optional stroke for the outline (drawn along `y1`).
    pub stroke: Option<StrokeStyle>,
    /// Rendering order hint for the filled area.
    pub z_index: i32,
}

impl AreaMarkSpec {
    /// Creates an area mark with default fill (`Brush::default()`).
    pub fn new(id_base: u64, x_scale: ScaleContinuous, y_scale: ScaleContinuous) -> Self {
        Self {
            id_base,
            x_scale,
            y_scale,
            fill: Brush::default(),
            stroke: None,
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the outline stroke (drawn along `y1`).
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Sets the z-index used for the filled area.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Returns the fill path: one closed polygon per gap-free run.
    pub fn fill_path(&self, bands: &[Option<Band>]) -> BezPath {
        let mut p = BezPath::new();
        for run in bands.split(Option::is_none) {
            let run: Vec<Band> = run.iter().flatten().copied().collect();
            let Some(first) = run.first() else {
                continue;
            };
            p.move_to((self.x_scale.map(first.x), self.y_scale.map(first.y1)));
            for b in &run[1..] {
                p.line_to((self.x_scale.map(b.x), self.y_scale.map(b.y1)));
            }
            for b in run.iter().rev() {
                p.line_to((self.x_scale.map(b.x), self.y_scale.map(b.y0)));
            }
            p.close_path();
        }
        p
    }

    /// Returns the outline path along the tops, broken at gaps.
    pub fn outline_path(&self, bands: &[Option<Band>]) -> BezPath {
        let mut p = BezPath::new();
        let mut pen_down = false;
        for band in bands {
            match band {
                Some(b) => {
                    let pt = (self.x_scale.map(b.x), self.y_scale.map(b.y1));
                    if pen_down {
                        p.line_to(pt);
                    } else {
                        p.move_to(pt);
                        pen_down = true;
                    }
                }
                None => pen_down = false,
            }
        }
        p
    }

    /// Generates the fill mark and, if a stroke is set, the outline mark.
    pub fn marks(&self, bands: &[Option<Band>]) -> Vec<Mark> {
        let mut out = Vec::with_capacity(2);
        out.push(
            Mark::builder(MarkId::from_raw(self.id_base))
                .path()
                .z_index(self.z_index)
                .path(self.fill_path(bands))
                .fill(self.fill.clone())
                .build(),
        );
        if let Some(stroke) = &self.stroke {
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 1))
                    .path()
                    .z_index(crate::z_order::SERIES_STROKE)
                    .path(self.outline_path(bands))
                    .fill(Color::TRANSPARENT)
                    .stroke(stroke.brush.clone(), stroke.stroke_width)
                    .build(),
            );
        }
        out
    }
}
