// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart-wide styling shared by the chart components.

extern crate alloc;

use alloc::vec::Vec;

use peniko::color::palette::css;
use peniko::{Brush, Color};

use crate::axis::{AxisStyle, GridStyle, StrokeStyle};

/// The default categorical palette.
pub const PALETTE: [Color; 10] = [
    Color::from_rgb8(0x4e, 0x79, 0xa7),
    Color::from_rgb8(0xf2, 0x8e, 0x2b),
    Color::from_rgb8(0xe1, 0x57, 0x59),
    Color::from_rgb8(0x76, 0xb7, 0xb2),
    Color::from_rgb8(0x59, 0xa1, 0x4f),
    Color::from_rgb8(0xed, 0xc9, 0x48),
    Color::from_rgb8(0xb0, 0x7a, 0xa1),
    Color::from_rgb8(0xff, 0x9d, 0xa7),
    Color::from_rgb8(0x9c, 0x75, 0x5f),
    Color::from_rgb8(0xba, 0xb0, 0xac),
];

/// Styling for a chart component.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    /// Series colors, cycled by series (or category) index when no color is given.
    pub palette: Vec<Color>,
    /// Fill of the plot rectangle; `None` draws nothing.
    pub plot_background: Option<Brush>,
    /// Axis styling.
    pub axis: AxisStyle,
    /// Gridlines along the value axis.
    pub grid: Option<GridStyle>,
    /// Line series stroke width.
    pub line_width: f64,
    /// Alpha applied to area and radar fills.
    pub area_opacity: f32,
    /// Hover crosshair stroke.
    pub crosshair: StrokeStyle,
    /// Radius of the hover markers drawn on the nearest samples.
    pub marker_radius: f64,
    /// Tooltip box fill.
    pub tooltip_fill: Brush,
    /// Tooltip text fill.
    pub tooltip_text: Brush,
    /// Tooltip and legend font size.
    pub font_size: f64,
    /// Whether to draw a legend; it appears whenever the chart has at least one legend item.
    pub legend: bool,
}

impl ChartStyle {
    /// Returns the palette color for `index`, cycling through the palette.
    pub fn color(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return css::BLACK;
        }
        self.palette[index % self.palette.len()]
    }

    /// Sets the palette.
    pub fn with_palette(mut self, palette: impl Into<Vec<Color>>) -> Self {
        self.palette = palette.into();
        self
    }

    /// Sets the plot background fill.
    pub fn with_plot_background(mut self, fill: impl Into<Brush>) -> Self {
        self.plot_background = Some(fill.into());
        self
    }

    /// Enables or disables the legend.
    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            palette: PALETTE.to_vec(),
            plot_background: None,
            axis: AxisStyle::default(),
            grid: Some(GridStyle::default()),
            line_width: 1.5,
            area_opacity: 0.35,
            crosshair: StrokeStyle::solid(css::GRAY, 1.0),
            marker_radius: 3.5,
            tooltip_fill: Brush::Solid(css::WHITE.with_alpha(0.92)),
            tooltip_text: Brush::Solid(css::BLACK),
            font_size: 10.0,
            legend: true,
        }
    }
}
