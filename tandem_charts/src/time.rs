// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time tick generation and formatting.
//!
//! Time is a numeric value in **seconds since the Unix epoch** (UTC). Tick intervals are
//! picked from a fixed table spanning seconds to years; month and year ticks fall on calendar
//! boundaries. Labels are locale-free.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use chrono::{DateTime, Datelike, NaiveDate};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// A human-readable tick interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInterval {
    /// Every `n` seconds.
    Seconds(u32),
    /// Every `n` minutes.
    Minutes(u32),
    /// Every `n` hours.
    Hours(u32),
    /// Every `n` days (aligned to UTC midnight).
    Days(u32),
    /// Every `n` calendar months.
    Months(u32),
    /// Every `n` calendar years.
    Years(u32),
}

const INTERVALS: &[TimeInterval] = &[
    TimeInterval::Seconds(1),
    TimeInterval::Seconds(2),
    TimeInterval::Seconds(5),
    TimeInterval::Seconds(10),
    TimeInterval::Seconds(15),
    TimeInterval::Seconds(30),
    TimeInterval::Minutes(1),
    TimeInterval::Minutes(2),
    TimeInterval::Minutes(5),
    TimeInterval::Minutes(10),
    TimeInterval::Minutes(15),
    TimeInterval::Minutes(30),
    TimeInterval::Hours(1),
    TimeInterval::Hours(2),
    TimeInterval::Hours(3),
    TimeInterval::Hours(6),
    TimeInterval::Hours(12),
    TimeInterval::Days(1),
    TimeInterval::Days(2),
    TimeInterval::Days(7),
    TimeInterval::Months(1),
    TimeInterval::Months(3),
    TimeInterval::Months(6),
    TimeInterval::Years(1),
];

impl TimeInterval {
    /// Returns the (approximate, for months and years) length in seconds.
    pub fn seconds(self) -> f64 {
        match self {
            Self::Seconds(n) => f64::from(n),
            Self::Minutes(n) => f64::from(n) * MINUTE,
            Self::Hours(n) => f64::from(n) * HOUR,
            Self::Days(n) => f64::from(n) * DAY,
            Self::Months(n) => f64::from(n) * 30.0 * DAY,
            Self::Years(n) => f64::from(n) * 365.0 * DAY,
        }
    }

    /// Picks the smallest interval at least as long as `step` seconds.
    pub fn for_step(step: f64) -> Self {
        for &interval in INTERVALS {
            if interval.seconds() >= step {
                return interval;
            }
        }
        let years = (step / Self::Years(1).seconds()).ceil().clamp(1.0, 10_000.0);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to a small positive range")]
        let years = years as u32;
        Self::Years(years)
    }
}

/// Returns tick timestamps for `[min, max]` aligned to a human-readable interval.
///
/// The first and last ticks may lie outside the input interval.
pub fn nice_time_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }

    let interval = TimeInterval::for_step((max - min) / count as f64);
    match interval {
        TimeInterval::Months(n) => calendar_ticks(min, max, n),
        TimeInterval::Years(n) => calendar_ticks(min, max, n.saturating_mul(12)),
        fixed => {
            let step = fixed.seconds();
            let start = (min / step).floor() * step;
            let stop = (max / step).ceil() * step;
            (0..=crate::scale::step_count(start, stop, step))
                .map(|i| start + step * i as f64)
                .collect()
        }
    }
}

fn calendar_ticks(min: f64, max: f64, months: u32) -> Vec<f64> {
    let months = i64::from(months.max(1));
    let Some(first) = to_datetime(min) else {
        return Vec::new();
    };
    let month_index = i64::from(first.year()) * 12 + i64::from(first.month0());
    let mut index = month_index.div_euclid(months) * months;

    let mut out = Vec::new();
    while out.len() < 10_000 {
        let Some(t) = month_start(index) else {
            break;
        };
        out.push(t);
        if t > max {
            break;
        }
        index += months;
    }
    out
}

fn month_start(month_index: i64) -> Option<f64> {
    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month = u32::try_from(month_index.rem_euclid(12)).ok()? + 1;
    let start = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    Some(start.and_utc().timestamp() as f64)
}

fn to_datetime(t: f64) -> Option<DateTime<chrono::Utc>> {
    if !t.is_finite() {
        return None;
    }
    let secs = t.floor().clamp(i64::MIN as f64, i64::MAX as f64);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
    let secs = secs as i64;
    DateTime::from_timestamp(secs, 0)
}

/// Formats a timestamp (seconds, UTC) for a tick spaced `step` seconds from its neighbours.
///
/// | step            | format                |
/// |-----------------|-----------------------|
/// | under a minute  | `HH:MM:SS`            |
/// | under a day     | `HH:MM`               |
/// | under 28 days   | `YYYY-MM-DD`          |
/// | under a year    | `YYYY-MM`             |
/// | longer          | `YYYY`                |
pub fn format_time(v: f64, step: f64) -> String {
    let Some(dt) = to_datetime(v) else {
        return alloc::format!("{v}");
    };
    let step = step.abs();
    let pattern = if step < MINUTE {
        "%H:%M:%S"
    } else if step < DAY {
        "%H:%M"
    } else if step < 28.0 * DAY {
        "%Y-%m-%d"
    } else if step < 365.0 * DAY {
        "%Y-%m"
    } else {
        "%Y"
    };
    dt.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    // 2024-03-10T00:00:00Z
    const T0: f64 = 1_710_028_800.0;

    #[test]
    fn minute_spans_use_minute_ticks() {
        let ticks = nice_time_ticks(T0, T0 + 300.0, 5);
        assert!(ticks.len() >= 2);
        assert_eq!(ticks[1] - ticks[0], 60.0);
    }

    #[test]
    fn multi_day_spans_align_to_midnight() {
        let ticks = nice_time_ticks(T0 + 3.0 * HOUR, T0 + 6.0 * DAY, 5);
        let step = ticks[1] - ticks[0];
        assert_eq!(step, 2.0 * DAY);
        assert!(ticks.iter().all(|t| t % DAY == 0.0));
    }

    #[test]
    fn month_ticks_fall_on_the_first_of_the_month() {
        let ticks = nice_time_ticks(T0, T0 + 200.0 * DAY, 8);
        let labels: Vec<String> = ticks.iter().map(|t| format_time(*t, 31.0 * DAY)).collect();
        assert_eq!(labels[0], "2024-03");
        assert_eq!(labels[1], "2024-04");
        assert_eq!(format_time(ticks[1], DAY), "2024-04-01");
    }

    #[test]
    fn labels_depend_on_the_step() {
        assert_eq!(format_time(T0 + 3723.0, 1.0), "01:02:03");
        assert_eq!(format_time(T0 + 3723.0, 15.0 * MINUTE), "01:02");
        assert_eq!(format_time(T0, DAY), "2024-03-10");
        assert_eq!(format_time(T0, 400.0 * DAY), "2024");
    }
}
