// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales: mappings between data domains and pixel ranges.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::time;

/// Which continuous scale an x dimension uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContinuousKind {
    /// Plain numbers.
    #[default]
    Linear,
    /// Timestamps in seconds since the Unix epoch.
    Time,
}

/// A continuous scale instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleContinuous {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Time scale.
    Time(ScaleTime),
}

impl ScaleContinuous {
    /// Creates a scale of the given kind.
    pub fn new(kind: ContinuousKind, domain: (f64, f64), range: (f64, f64)) -> Self {
        match kind {
            ContinuousKind::Linear => Self::Linear(ScaleLinear::new(domain, range)),
            ContinuousKind::Time => Self::Time(ScaleTime::new(domain, range)),
        }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(x),
            Self::Time(s) => s.map(x),
        }
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, px: f64) -> f64 {
        match self {
            Self::Linear(s) => s.invert(px),
            Self::Time(s) => s.invert(px),
        }
    }

    /// Returns tick values.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Time(s) => s.ticks(count),
        }
    }

    /// Returns the scale kind.
    pub fn kind(&self) -> ContinuousKind {
        match self {
            Self::Linear(_) => ContinuousKind::Linear,
            Self::Time(_) => ContinuousKind::Time,
        }
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Time(s) => s.domain(),
        }
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Time(s) => s.range(),
        }
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// The domain endpoints map exactly onto the range endpoints.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let denom = d1 - d0;
        if denom == 0.0 {
            return self.range.0;
        }
        lerp(self.range, (x - d0) / denom)
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, px: f64) -> f64 {
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return self.domain.0;
        }
        lerp(self.domain, (px - r0) / denom)
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns "nice" tick values that fall inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        within_domain(nice_ticks(self.domain.0, self.domain.1, count), self.domain)
    }
}

fn lerp((a, b): (f64, f64), t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

fn within_domain(mut ticks: Vec<f64>, (d0, d1): (f64, f64)) -> Vec<f64> {
    let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
    let eps = (hi - lo).abs() * 1e-9;
    ticks.retain(|t| *t >= lo - eps && *t <= hi + eps);
    ticks
}

/// Specification for a linear scale (domain + options, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to "nice" the domain based on tick generation.
    pub nice: bool,
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        let ticks = nice_ticks(self.domain.0, self.domain.1, tick_count);
        match ticks.as_slice() {
            [first, .., last] => (*first, *last),
            _ => self.domain,
        }
    }

    /// Instantiates a concrete scale using the resolved domain.
    pub fn instantiate(&self, range: (f64, f64), tick_count: usize) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(tick_count), range)
    }
}

/// Returns round tick values (steps of 1, 2 or 5 times a power of ten) covering `[min, max]`.
///
/// The first and last ticks may lie outside the input interval.
pub fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let span = max - min;
    let step = nice_step(span / count as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;
    (0..=step_count(start, stop, step))
        .map(|i| snap(start + step * i as f64, step))
        .collect()
}

pub(crate) fn step_count(start: f64, stop: f64, step: f64) -> u64 {
    let n_f = ((stop - start) / step).round();
    if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    }
}

// Removes accumulated error such as `0.30000000000000004`.
fn snap(v: f64, step: f64) -> f64 {
    let digits = (-step.log10().floor()).max(0.0);
    if digits > 15.0 {
        return v;
    }
    let k = 10_f64.powf(digits);
    (v * k).round() / k
}

/// Rounds `step` up to 1, 2, 5 or 10 times a power of ten.
pub fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A time scale: a linear scale over timestamps in seconds with calendar-aware ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Maps a range position back into a timestamp.
    pub fn invert(&self, px: f64) -> f64 {
        self.inner.invert(px)
    }

    /// Returns tick timestamps aligned to a human-readable interval.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.inner.domain();
        within_domain(time::nice_time_ticks(d0, d1, count), (d0, d1))
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }
}

/// A discrete band scale for categorical charts.
///
/// The range is split into `count` equal bands separated by `padding_inner` band widths,
/// with `padding_outer` band widths before the first and after the last band. Band
/// positions are not rounded to whole pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Default inner and outer padding, in band units.
    pub const DEFAULT_PADDING: f64 = 0.1;

    /// Creates a new band scale covering `count` bands over `range`.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: Self::DEFAULT_PADDING,
            padding_outer: Self::DEFAULT_PADDING,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the distance between the starts of two adjacent bands.
    pub fn step(&self) -> f64 {
        self.band_width() * (1.0 + self.padding_inner)
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the start position of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let start = if r1 >= r0 { r0 } else { r1 };
        start + self.band_width() * self.padding_outer + self.step() * index as f64
    }

    /// Returns the center position of the band at `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + self.band_width() * 0.5
    }

    /// Returns the band containing `px`, if any.
    ///
    /// Positions in the inner padding resolve to the band whose step they fall in; positions
    /// in the outer padding or outside the range resolve to `None`.
    pub fn invert(&self, px: f64) -> Option<usize> {
        let step = self.step();
        if self.count == 0 || step <= 0.0 {
            return None;
        }
        let offset = px - self.x(0);
        if offset < 0.0 {
            return None;
        }
        let index = (offset / step).floor();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "non-negative and compared against the band count"
        )]
        let index = index as usize;
        let within = index + 1 < self.count || offset - step * index as f64 <= self.band_width();
        (index < self.count && within).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn domain_endpoints_map_exactly_onto_range_endpoints() {
        let cases = [
            ((0.1, 0.3), (10.0, 470.0)),
            ((-7.25, 13.5), (300.0, 20.0)),
            ((1_700_000_000.0, 1_700_086_400.0), (50.0, 780.0)),
        ];
        for (domain, range) in cases {
            for scale in [
                ScaleContinuous::new(ContinuousKind::Linear, domain, range),
                ScaleContinuous::new(ContinuousKind::Time, domain, range),
            ] {
                assert_eq!(scale.map(domain.0), range.0, "{scale:?}");
                assert_eq!(scale.map(domain.1), range.1, "{scale:?}");
            }
        }
    }

    #[test]
    fn invert_round_trips_inside_the_domain() {
        let s = ScaleLinear::new((-3.0, 42.0), (480.0, 20.0));
        for i in 0..=20 {
            let v = -3.0 + 45.0 * f64::from(i) / 20.0;
            let back = s.invert(s.map(v));
            assert!((back - v).abs() < 1e-9, "{v} -> {back}");
        }
    }

    #[test]
    fn ticks_are_round_and_inside_the_domain() {
        let s = ScaleLinear::new((0.3, 9.7), (0.0, 100.0));
        let ticks = s.ticks(5);
        assert_eq!(ticks, [2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn nice_ticks_do_not_accumulate_float_error() {
        let ticks = nice_ticks(0.0, 1.0, 10);
        assert_eq!(ticks[3], 0.3);
    }

    #[test]
    fn nice_domain_expands_to_tick_bounds() {
        let spec = ScaleLinearSpec::new((3.0, 97.0)).with_nice(true);
        assert_eq!(spec.resolved_domain(5), (0.0, 100.0));
    }

    #[test]
    fn band_invert_finds_the_band_under_a_pixel() {
        let band = ScaleBand::new((0.0, 100.0), 4).with_padding(0.0, 0.0);
        assert_eq!(band.band_width(), 25.0);
        assert_eq!(band.invert(10.0), Some(0));
        assert_eq!(band.invert(60.0), Some(2));
        assert_eq!(band.invert(-1.0), None);
        assert_eq!(band.invert(101.0), None);
        assert_eq!(band.center(1), 37.5);
    }
}
