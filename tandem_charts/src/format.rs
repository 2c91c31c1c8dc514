// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locale-free number formatting for tick labels and tooltips.

extern crate alloc;

use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Formats a tick value using the tick step to pick the number of decimals.
///
/// A step of `0.25` yields two decimals, a step of `5` yields none. A non-positive or
/// non-finite step falls back to [`format_value`].
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    if !step.is_finite() || step <= 0.0 {
        return format_value(v);
    }
    let decimals = decimals_for_step(step);
    normalize_zero(alloc::format!("{v:.decimals$}"))
}

/// Formats a data value with at most two decimals and no trailing zeros.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return String::from("-");
    }
    let mut s = alloc::format!("{v:.2}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    normalize_zero(s)
}

fn decimals_for_step(step: f64) -> usize {
    let mut decimals = 0_usize;
    let mut scaled = step;
    // `step` comes from `nice_step`, so it is 1, 2 or 5 times a power of ten.
    while decimals < 12 && (scaled - scaled.round()).abs() > 1e-9 * scaled.abs().max(1.0) {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

fn normalize_zero(s: String) -> String {
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        String::from(&s[1..])
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn decimals_follow_the_step() {
        assert_eq!(format_tick_with_step(20.0, 5.0), "20");
        assert_eq!(format_tick_with_step(0.5, 0.5), "0.5");
        assert_eq!(format_tick_with_step(0.25, 0.05), "0.25");
        assert_eq!(format_tick_with_step(1.0, 0.2), "1.0");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        assert_eq!(format_tick_with_step(-0.0, 1.0), "0");
        assert_eq!(format_value(-0.001), "0");
    }

    #[test]
    fn values_trim_trailing_zeros() {
        assert_eq!(format_value(12.0), "12");
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(1.23456), "1.23");
        assert_eq!(format_value(f64::NAN), "-");
    }
}
