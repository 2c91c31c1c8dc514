// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped bar mark generation.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Rect;
use peniko::Brush;
use tandem_core::{Mark, MarkId};

use crate::scale::{ScaleBand, ScaleContinuous};

/// One bar: its band, its slot within the band and its value.
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    /// Band (category) index.
    pub band: usize,
    /// Position of this bar among the bars sharing its band.
    pub slot: usize,
    /// Number of bars sharing the band.
    pub slots: usize,
    /// Value in data units.
    pub value: f64,
    /// Fill paint.
    pub fill: Brush,
}

/// Vertical bars placed side by side within the bands of a band scale.
///
/// A band holding `n` bars gives each a width of `(band_width - gap * (n - 1)) / n`.
#[derive(Clone, Debug)]
pub struct BarMarkSpec {
    /// Stable-id base; bar `k` of the input uses `id_base + k`.
    pub id_base: u64,
    /// Band scale used for bar positions along x.
    pub band: ScaleBand,
    /// Linear scale used for bar positions along y.
    pub y_scale: ScaleContinuous,
    /// Baseline in data units (typically `0.0`).
    pub baseline: f64,
    /// Gap between bars sharing a band, in pixels.
    pub gap: f64,
    /// Rendering order hint.
    pub z_index: i32,
}

impl BarMarkSpec {
    /// Default gap between bars sharing a band, in pixels.
    pub const DEFAULT_GAP: f64 = 2.0;

    /// Creates a bar mark spec with `baseline = 0` and the default gap.
    pub fn new(id_base: u64, band: ScaleBand, y_scale: ScaleContinuous) -> Self {
        Self {
            id_base,
            band,
            y_scale,
            baseline: 0.0,
            gap: Self::DEFAULT_GAP,
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the baseline in data units.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the gap between bars sharing a band.
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap.max(0.0);
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Returns the width of each bar when `slots` bars share a band.
    pub fn bar_width(&self, slots: usize) -> f64 {
        if slots == 0 {
            return 0.0;
        }
        let n = slots as f64;
        ((self.band.band_width() - self.gap * (n - 1.0)) / n).max(0.0)
    }

    /// Returns the rectangle of `bar` in scene coordinates.
    pub fn rect(&self, bar: &Bar) -> Rect {
        let w = self.bar_width(bar.slots);
        let x = self.band.x(bar.band) + bar.slot as f64 * (w + self.gap);
        let y0 = self.y_scale.map(self.baseline);
        let y1 = self.y_scale.map(bar.value);
        Rect::new(x, y0.min(y1), x + w, y0.max(y1))
    }

    /// Generates one rect mark per bar.
    pub fn marks(&self, bars: &[Bar]) -> Vec<Mark> {
        bars.iter()
            .enumerate()
            .map(|(k, bar)| {
                Mark::builder(MarkId::from_raw(self.id_base + k as u64))
                    .rect()
                    .z_index(self.z_index)
                    .rect(self.rect(bar))
                    .fill(bar.fill.clone())
                    .build()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;

    use super::*;
    use crate::scale::ContinuousKind;

    fn bar(slot: usize, slots: usize, value: f64) -> Bar {
        Bar {
            band: 0,
            slot,
            slots,
            value,
            fill: css::TEAL.into(),
        }
    }

    #[test]
    fn bars_split_the_band_with_gaps() {
        let band = ScaleBand::new((0.0, 100.0), 1).with_padding(0.0, 0.0);
        let y = ScaleContinuous::new(ContinuousKind::Linear, (0.0, 10.0), (200.0, 0.0));
        let spec = BarMarkSpec::new(0, band, y);
        assert_eq!(spec.bar_width(1), 100.0);
        assert_eq!(spec.bar_width(3), 32.0);

        let r = spec.rect(&bar(2, 3, 5.0));
        assert_eq!(r, Rect::new(68.0, 100.0, 100.0, 200.0));
    }

    #[test]
    fn negative_values_hang_below_the_baseline() {
        let band = ScaleBand::new((0.0, 100.0), 1).with_padding(0.0, 0.0);
        let y = ScaleContinuous::new(ContinuousKind::Linear, (-10.0, 10.0), (200.0, 0.0));
        let r = BarMarkSpec::new(0, band, y).rect(&bar(0, 1, -5.0));
        assert_eq!((r.y0, r.y1), (100.0, 150.0));
    }
}
