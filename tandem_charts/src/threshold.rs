// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold overlays: dashed reference rules sharing the chart's scales.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::Color;
use peniko::color::palette::css;
use tandem_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::rule_mark::RuleMarkSpec;
use crate::scale::ScaleContinuous;
use crate::z_order;

/// A reference marker at `x`, optionally crossing a horizontal rule at `y` (left axis).
#[derive(Clone, Debug, PartialEq)]
pub struct Threshold {
    /// X position in data units.
    pub x: f64,
    /// Optional y position in left-axis data units.
    pub y: Option<f64>,
    /// Optional label drawn next to the vertical rule.
    pub label: Option<String>,
    /// Rule and label color.
    pub color: Color,
}

impl Threshold {
    /// Creates a vertical threshold at `x`.
    pub fn new(x: f64) -> Self {
        Self {
            x,
            y: None,
            label: None,
            color: css::CRIMSON,
        }
    }

    /// Adds a horizontal rule at `y`.
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Generates threshold marks; rules outside `plot` are skipped.
///
/// Threshold `i` uses ids `id_base + 4 * i` and up.
pub fn threshold_marks(
    id_base: u64,
    thresholds: &[Threshold],
    x_scale: &ScaleContinuous,
    y_scale: &ScaleContinuous,
    plot: Rect,
    font_size: f64,
) -> Vec<Mark> {
    let mut out = Vec::new();
    for (i, t) in thresholds.iter().enumerate() {
        let base = id_base + 4 * i as u64;
        let x = x_scale.map(t.x);
        let x_inside = x.is_finite() && x >= plot.x0 && x <= plot.x1;
        if x_inside {
            out.push(
                RuleMarkSpec::vertical(MarkId::from_raw(base), x, plot.y0, plot.y1)
                    .with_stroke(t.color, 1.0)
                    .with_dash(4.0, 3.0)
                    .with_z_index(z_order::THRESHOLDS)
                    .mark(),
            );
            if let Some(label) = &t.label {
                out.push(
                    Mark::builder(MarkId::from_raw(base + 2))
                        .text()
                        .z_index(z_order::THRESHOLDS)
                        .at(x + 3.0, plot.y0 + 2.0)
                        .text(label.clone())
                        .font_size(font_size)
                        .fill(t.color)
                        .anchor(TextAnchor::Start)
                        .baseline(TextBaseline::Hanging)
                        .build(),
                );
            }
        }
        if let Some(y) = t.y.map(|y| y_scale.map(y))
            && y.is_finite()
            && y >= plot.y0
            && y <= plot.y1
        {
            out.push(
                RuleMarkSpec::horizontal(MarkId::from_raw(base + 1), y, plot.x0, plot.x1)
                    .with_stroke(t.color, 1.0)
                    .with_dash(4.0, 3.0)
                    .with_z_index(z_order::THRESHOLDS)
                    .mark(),
            );
        }
    }
    out
}
