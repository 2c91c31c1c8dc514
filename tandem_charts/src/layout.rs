// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart surface layout: outer size minus margins gives the plot rectangle.
//!
//! Margins are subtracted from the surface before any scale range is computed, so axes and
//! legends live in the margin strips and series geometry lives inside [`plot_rect`].

use kurbo::Rect;

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pixel insets between the chart surface and its plot rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the right edge.
    pub right: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the left edge.
    pub left: f64,
}

impl Margin {
    /// Creates a margin from per-side insets.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates a margin with the same inset on every side.
    pub const fn uniform(inset: f64) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Returns a copy with the right inset replaced.
    pub const fn with_right(mut self, right: f64) -> Self {
        self.right = right;
        self
    }
}

impl Default for Margin {
    /// Room for a bottom and a left axis with a small breathing gap on the other sides.
    fn default() -> Self {
        Self::new(20.0, 20.0, 40.0, 56.0)
    }
}

/// Returns the plot rectangle for a surface of `size` with `margin` removed.
///
/// Oversized margins collapse the plot to zero width or height instead of inverting it.
pub fn plot_rect(size: Size, margin: Margin) -> Rect {
    let x0 = margin.left.max(0.0);
    let y0 = margin.top.max(0.0);
    let x1 = (size.width - margin.right.max(0.0)).max(x0);
    let y1 = (size.height - margin.bottom.max(0.0)).max(y0);
    Rect::new(x0, y0, x1, y1)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn margins_are_removed_from_the_surface() {
        let plot = plot_rect(Size::new(400.0, 300.0), Margin::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(plot, Rect::new(40.0, 10.0, 380.0, 270.0));
    }

    #[test]
    fn oversized_margins_collapse_the_plot() {
        let plot = plot_rect(Size::new(50.0, 50.0), Margin::uniform(40.0));
        assert_eq!(plot.width(), 0.0);
        assert_eq!(plot.height(), 0.0);
    }
}
