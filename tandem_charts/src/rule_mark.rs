// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule mark generation.
//!
//! A "rule" is a straight stroked segment: axis domain lines, ticks, gridlines, threshold
//! markers and the hover crosshair.

use kurbo::BezPath;
use peniko::{Brush, Color};
use tandem_core::{Mark, MarkId};

use crate::z_order;

/// A rule mark spec (a stroked line segment).
#[derive(Clone, Debug)]
pub struct RuleMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Start point x in scene coordinates.
    pub x0: f64,
    /// Start point y in scene coordinates.
    pub y0: f64,
    /// End point x in scene coordinates.
    pub x1: f64,
    /// End point y in scene coordinates.
    pub y1: f64,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
    /// Optional `(dash, gap)` pattern.
    pub dash: Option<(f64, f64)>,
    /// Rendering order hint.
    pub z_index: i32,
}

impl RuleMarkSpec {
    /// Creates a new rule between two points.
    pub fn new(id: MarkId, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            id,
            x0,
            y0,
            x1,
            y1,
            stroke: Brush::default(),
            stroke_width: 1.0,
            dash: None,
            z_index: z_order::SERIES_STROKE,
        }
    }

    /// Creates a horizontal rule.
    pub fn horizontal(id: MarkId, y: f64, x0: f64, x1: f64) -> Self {
        Self::new(id, x0, y, x1, y)
    }

    /// Creates a vertical rule.
    pub fn vertical(id: MarkId, x: f64, y0: f64, y1: f64) -> Self {
        Self::new(id, x, y0, x, y1)
    }

    /// Sets stroke paint and width.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// Sets a `(dash, gap)` stroke pattern.
    pub fn with_dash(mut self, dash: f64, gap: f64) -> Self {
        self.dash = Some((dash, gap));
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates the rule mark.
    pub fn mark(&self) -> Mark {
        let mut p = BezPath::new();
        p.move_to((self.x0, self.y0));
        p.line_to((self.x1, self.y1));
        let mut builder = Mark::builder(self.id)
            .path()
            .path(p)
            .z_index(self.z_index)
            .fill(Color::TRANSPARENT)
            .stroke(self.stroke.clone(), self.stroke_width);
        if let Some((dash, gap)) = self.dash {
            builder = builder.dash(dash, gap);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use tandem_core::MarkPayload;

    use super::*;

    #[test]
    fn dashed_vertical_rule() {
        let mark = RuleMarkSpec::vertical(MarkId(7), 5.0, 0.0, 100.0)
            .with_dash(4.0, 2.0)
            .with_z_index(z_order::THRESHOLDS)
            .mark();
        assert_eq!(mark.z_index, z_order::THRESHOLDS);
        let MarkPayload::Path(path) = &mark.payload else {
            panic!("expected a path mark");
        };
        assert_eq!(path.dash, Some((4.0, 2.0)));
        assert_eq!(path.path.elements().len(), 2);
    }
}
