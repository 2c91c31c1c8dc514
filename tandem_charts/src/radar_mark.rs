// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radar (spider) mark generation.
//!
//! Category `i` of `n` sits on a spoke at `TAU * i / n` radians clockwise from 12 o'clock.

extern crate alloc;

use alloc::vec::Vec;

use core::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{BezPath, Point};
use peniko::{Brush, Color};
use tandem_core::{Mark, MarkId};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::axis::StrokeStyle;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::ScaleLinear;

/// Offset of the ring ids from the spoke ids.
const RING_OFFSET: u64 = 0x8000;

/// Spokes a radar grid can give distinct ids.
pub(crate) const SPOKE_CAPACITY: u64 = RING_OFFSET;

/// A closed polygon through one value per category.
#[derive(Clone, Debug)]
pub struct RadarMarkSpec {
    /// Stable-id base: the polygon uses `id_base`.
    pub id_base: u64,
    /// Shared polar origin.
    pub center: Point,
    /// Number of categories (spokes).
    pub axes: usize,
    /// Maps values onto radii.
    pub r_scale: ScaleLinear,
    /// Fill paint.
    pub fill: Brush,
    /// Outline stroke.
    pub stroke: StrokeStyle,
    /// Rendering order hint.
    pub z_index: i32,
}

impl RadarMarkSpec {
    /// Creates a radar spec mapping `[0, max]` onto `[0, radius]`.
    pub fn new(id_base: u64, center: Point, radius: f64, axes: usize, max: f64) -> Self {
        Self {
            id_base,
            center,
            axes,
            r_scale: ScaleLinear::new((0.0, max), (0.0, radius)),
            fill: Brush::Solid(Color::TRANSPARENT),
            stroke: StrokeStyle::default(),
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the outline stroke.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    /// Returns the angle of spoke `i`, clockwise from 12 o'clock.
    pub fn angle(&self, i: usize) -> f64 {
        if self.axes == 0 {
            return 0.0;
        }
        TAU * i as f64 / self.axes as f64
    }

    /// Returns the point at `radius` along spoke `i`.
    pub fn at_radius(&self, i: usize, radius: f64) -> Point {
        let a = self.angle(i) - FRAC_PI_2;
        Point::new(
            self.center.x + radius * a.cos(),
            self.center.y + radius * a.sin(),
        )
    }

    /// Returns the vertex for `value` on spoke `i`; negative values sit at the center.
    pub fn vertex(&self, i: usize, value: f64) -> Point {
        self.at_radius(i, self.r_scale.map(value.max(0.0)))
    }

    /// Returns the closed polygon through the non-gap values, in category order.
    pub fn polygon(&self, values: &[Option<f64>]) -> BezPath {
        let mut p = BezPath::new();
        let mut points = values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.filter(|v| v.is_finite()).map(|v| self.vertex(i, v)));
        if let Some(first) = points.next() {
            p.move_to(first);
            for pt in points {
                p.line_to(pt);
            }
            p.close_path();
        }
        p
    }

    /// Generates the polygon mark.
    pub fn mark(&self, values: &[Option<f64>]) -> Mark {
        Mark::builder(MarkId::from_raw(self.id_base))
            .path()
            .z_index(self.z_index)
            .path(self.polygon(values))
            .fill(self.fill.clone())
            .stroke(self.stroke.brush.clone(), self.stroke.stroke_width)
            .build()
    }

    /// Generates the spokes and one ring per value in `rings`.
    ///
    /// Spoke `i` uses `id_base + i`; ring `k` uses `id_base + 0x8000 + k`.
    pub fn grid_marks(&self, id_base: u64, rings: &[f64], stroke: &StrokeStyle) -> Vec<Mark> {
        let outer = self.r_scale.range().1;
        let mut out = Vec::with_capacity(self.axes + rings.len());
        for i in 0..self.axes {
            let tip = self.at_radius(i, outer);
            out.push(
                RuleMarkSpec::new(
                    MarkId::from_raw(id_base + i as u64),
                    self.center.x,
                    self.center.y,
                    tip.x,
                    tip.y,
                )
                .with_stroke(stroke.brush.clone(), stroke.stroke_width)
                .with_z_index(crate::z_order::GRID_LINES)
                .mark(),
            );
        }
        for (k, value) in rings.iter().enumerate() {
            let all: Vec<Option<f64>> = (0..self.axes).map(|_| Some(*value)).collect();
            out.push(
                Mark::builder(MarkId::from_raw(id_base + RING_OFFSET + k as u64))
                    .path()
                    .z_index(crate::z_order::GRID_LINES)
                    .path(self.polygon(&all))
                    .fill(Color::TRANSPARENT)
                    .stroke(stroke.brush.clone(), stroke.stroke_width)
                    .build(),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::PathEl;

    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn first_spoke_points_up_and_spokes_go_clockwise() {
        let spec = RadarMarkSpec::new(0, Point::new(100.0, 100.0), 50.0, 4, 10.0);
        assert!(close(spec.vertex(0, 10.0), Point::new(100.0, 50.0)));
        assert!(close(spec.vertex(1, 10.0), Point::new(150.0, 100.0)));
        assert!(close(spec.vertex(2, 5.0), Point::new(100.0, 125.0)));
    }

    #[test]
    fn gap_values_drop_their_vertex() {
        let spec = RadarMarkSpec::new(0, Point::ZERO, 10.0, 4, 1.0);
        let p = spec.polygon(&[Some(1.0), None, Some(1.0), Some(1.0)]);
        let lines = p
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::LineTo(_)))
            .count();
        assert_eq!(lines, 2);
        assert!(matches!(p.elements().last(), Some(PathEl::ClosePath)));
    }
}
