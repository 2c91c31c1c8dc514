// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for guide layout.
//!
//! Text shaping stays downstream of the mark model, so axes, legends and tooltips size
//! themselves through a measurer callback.

/// A minimal text measurement interface used by guide generators.
///
/// Callers can plug in a real shaping backend, or use [`HeuristicTextMeasurer`].
pub trait TextMeasurer {
    /// Returns `(width, height)` in the same coordinate system as the marks.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// A heuristic measurer assuming an average glyph width of 0.6em and a height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn width_scales_with_char_count_not_bytes() {
        let m = HeuristicTextMeasurer;
        assert_eq!(m.measure("abc", 10.0), (18.0, 10.0));
        assert_eq!(m.measure("°C", 10.0).0, 12.0);
    }
}
