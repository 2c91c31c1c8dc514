// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line mark generation.

use kurbo::BezPath;
use peniko::Color;
use tandem_core::{Mark, MarkId};

use crate::accessor::Sample;
use crate::axis::StrokeStyle;
use crate::scale::ScaleContinuous;

/// A line through a series' samples.
///
/// Gaps are never interpolated across: each gap-free run becomes its own sub-path of the
/// single [`tandem_core::MarkKind::Path`] mark this spec generates.
#[derive(Clone, Debug)]
pub struct LineMarkSpec {
    /// Stable id for the mark emitted by this spec.
    pub id: MarkId,
    /// X scale mapping data x into scene x.
    pub x_scale: ScaleContinuous,
    /// Y scale mapping data y into scene y.
    pub y_scale: ScaleContinuous,
    /// Stroke style for the line.
    pub stroke: StrokeStyle,
    /// Rendering order hint.
    pub z_index: i32,
}

impl LineMarkSpec {
    /// Creates a line mark spec with a black stroke at width 1.
    pub fn new(id: MarkId, x_scale: ScaleContinuous, y_scale: ScaleContinuous) -> Self {
        Self {
            id,
            x_scale,
            y_scale,
            stroke: StrokeStyle::default(),
            z_index: crate::z_order::SERIES_STROKE,
        }
    }

    /// Sets the stroke style.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Returns the projected polyline, one sub-path per gap-free run.
    pub fn path(&self, samples: &[Sample]) -> BezPath {
        let mut p = BezPath::new();
        let mut pen_down = false;
        for sample in samples {
            match sample.point() {
                Some((x, y)) => {
                    let pt = (self.x_scale.map(x), self.y_scale.map(y));
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

    /// Generates the line mark.
    pub fn mark(&self, samples: &[Sample]) -> Mark {
        Mark::builder(self.id)
            .path()
            .z_index(self.z_index)
            .path(self.path(samples))
            .fill(Color::TRANSPARENT)
            .stroke(self.stroke.brush.clone(), self.stroke.stroke_width)
            .build()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use kurbo::{PathEl, Point};

    use super::*;
    use crate::scale::ContinuousKind;

    fn spec() -> LineMarkSpec {
        LineMarkSpec::new(
            MarkId(1),
            ScaleContinuous::new(ContinuousKind::Linear, (0.0, 10.0), (0.0, 100.0)),
            ScaleContinuous::new(ContinuousKind::Linear, (0.0, 10.0), (100.0, 0.0)),
        )
    }

    #[test]
    fn gap_splits_the_line_into_disjoint_sub_paths() {
        let samples = [
            Sample { index: 0, x: 1.0, y: Some(5.0) },
            Sample { index: 1, x: 2.0, y: None },
            Sample { index: 2, x: 3.0, y: Some(7.0) },
        ];
        let path = spec().path(&samples);
        let moves: Vec<_> = path
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(moves.len(), 2);
        assert!(!path.elements().iter().any(|el| matches!(el, PathEl::LineTo(_))));
        assert!(moves[0].distance(Point::new(10.0, 50.0)) < 1e-9, "first run starts at x=1");
        assert!(moves[1].distance(Point::new(30.0, 30.0)) < 1e-9, "second run starts at x=3");
    }

    #[test]
    fn contiguous_samples_form_one_polyline() {
        let samples: Vec<Sample> = (0..4)
            .map(|i| Sample {
                index: i,
                x: i as f64,
                y: Some(i as f64),
            })
            .collect();
        let path = spec().path(&samples);
        assert_eq!(path.elements().len(), 4);
        assert!(matches!(path.elements()[0], PathEl::MoveTo(_)));
    }
}
