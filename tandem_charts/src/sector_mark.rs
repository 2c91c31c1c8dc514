// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sector (arc) mark generation for pie and donut charts.
//!
//! Angles are in radians, measured clockwise from 12 o'clock.

extern crate alloc;

use alloc::vec::Vec;

use core::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{Circle, Point, Shape};
use peniko::Brush;
use tandem_core::{Mark, MarkId};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::axis::StrokeStyle;

/// Splits a full turn into spans proportional to `values`.
///
/// Negative and non-finite values count as zero. The spans are contiguous, start at `0` and
/// the last one ends at exactly `TAU` (when the total is positive). With a zero total every
/// span is empty.
pub fn pie_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    let total: f64 = values.iter().copied().map(clean).sum();
    if total <= 0.0 {
        return values.iter().map(|_| (0.0, 0.0)).collect();
    }
    let last_nonzero = values.iter().rposition(|v| clean(*v) > 0.0);
    let mut start = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let end = if Some(i) == last_nonzero {
                TAU
            } else {
                start + TAU * clean(*v) / total
            };
            let span = (start, end);
            start = end;
            span
        })
        .collect()
}

/// A sector (arc slice), suitable for pie/donut charts.
#[derive(Clone, Debug)]
pub struct SectorMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Center in scene coordinates.
    pub center: Point,
    /// Inner radius in scene coordinates (0 for a pie slice).
    pub inner_radius: f64,
    /// Outer radius in scene coordinates.
    pub outer_radius: f64,
    /// Start angle, clockwise from 12 o'clock.
    pub start_angle: f64,
    /// End angle, clockwise from 12 o'clock.
    pub end_angle: f64,
    /// Fill paint for the sector.
    pub fill: Brush,
    /// Optional outline stroke.
    pub stroke: Option<StrokeStyle>,
    /// Curve flattening tolerance when converting the sector to a `BezPath`.
    pub tolerance: f64,
    /// Rendering order hint.
    pub z_index: i32,
}

impl SectorMarkSpec {
    /// Creates a new sector mark spec.
    pub fn new(
        id: MarkId,
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            id,
            center,
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
            fill: Brush::default(),
            stroke: None,
            tolerance: 0.1,
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
        self.stroke = Some(stroke);
        self
    }

    /// Returns `true` if `pt` lies inside the sector.
    pub fn contains(&self, pt: Point) -> bool {
        let d = pt - self.center;
        let r = d.hypot();
        if r < self.inner_radius || r > self.outer_radius {
            return false;
        }
        let mut angle = d.y.atan2(d.x) + FRAC_PI_2;
        if angle < 0.0 {
            angle += TAU;
        }
        angle >= self.start_angle && angle < self.end_angle
    }

    /// Returns the point at the middle of the sector's arc band, for labels.
    pub fn centroid(&self) -> Point {
        let mid = 0.5 * (self.start_angle + self.end_angle) - FRAC_PI_2;
        let r = 0.5 * (self.inner_radius + self.outer_radius);
        Point::new(self.center.x + r * mid.cos(), self.center.y + r * mid.sin())
    }

    /// Generates the sector mark.
    pub fn mark(&self) -> Mark {
        let circle = Circle::new(self.center, self.outer_radius);
        let sweep = self.end_angle - self.start_angle;
        let segment = circle.segment(self.inner_radius, self.start_angle - FRAC_PI_2, sweep);
        let path = segment.path_elements(self.tolerance).collect();

        let mut builder = Mark::builder(self.id)
            .path()
            .path(path)
            .z_index(self.z_index)
            .fill(self.fill.clone());
        if let Some(stroke) = &self.stroke {
            builder = builder.stroke(stroke.brush.clone(), stroke.stroke_width);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;
    use tandem_core::{MarkDiff, MarkKind, MarkPayload, Scene};

    use super::*;

    #[test]
    fn zero_values_get_empty_spans_and_the_turn_is_exact() {
        let spans = pie_angles(&[0.0, 10.0]);
        assert_eq!(spans[0], (0.0, 0.0));
        assert_eq!(spans[1], (0.0, TAU));

        let spans = pie_angles(&[1.0, 2.0, 0.0, -4.0, 3.0]);
        assert_eq!(spans[0].0, 0.0);
        assert_eq!(spans[4].1, TAU);
        assert_eq!(spans[2].0, spans[2].1);
        assert_eq!(spans[3].0, spans[3].1);
        assert!((spans[1].1 - spans[1].0 - TAU / 3.0).abs() < 1e-12);
    }

    #[test]
    fn sector_emits_a_path_mark_with_bounds() {
        let sector = SectorMarkSpec::new(
            MarkId::from_raw(1),
            Point::new(50.0, 50.0),
            10.0,
            20.0,
            0.0,
            FRAC_PI_2,
        )
        .with_fill(css::TOMATO)
        .with_stroke(StrokeStyle::solid(css::BLACK, 2.0));

        let mut scene = Scene::new();
        let diffs = scene.tick(alloc::vec![sector.mark()]);
        let [MarkDiff::Enter { id, kind, new, bounds, .. }] = &diffs[..] else {
            panic!("expected a single enter diff");
        };
        assert_eq!(*id, MarkId::from_raw(1));
        assert_eq!(*kind, MarkKind::Path);
        let MarkPayload::Path(p) = &**new else {
            panic!("expected path payload");
        };
        assert_eq!(p.fill, css::TOMATO.into());
        assert_eq!(p.stroke_width, 2.0);

        // First quadrant clockwise from 12 o'clock: up and to the right of the center.
        let b = bounds.unwrap();
        assert!(b.x0 >= 50.0 - 1e-6 && b.y1 <= 50.0 + 1e-6, "{b:?}");
    }

    #[test]
    fn hit_testing_follows_the_clockwise_convention() {
        let sector =
            SectorMarkSpec::new(MarkId(1), Point::new(0.0, 0.0), 0.0, 10.0, 0.0, FRAC_PI_2);
        assert!(sector.contains(Point::new(5.0, -5.0)));
        assert!(!sector.contains(Point::new(-5.0, -5.0)));
        assert!(!sector.contains(Point::new(5.0, 5.0)));
        assert!(!sector.contains(Point::new(20.0, 0.0)));
    }
}
