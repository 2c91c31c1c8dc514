// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cumulative stacking of area series.
//!
//! Series stack in slice order: series `i` rests on the running total of series `0..i` at the
//! same x. Index order is stack order.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::accessor::Sample;
use crate::area_mark::Band;

// `0.0` and `-0.0` must share a column.
fn column_key(x: f64) -> u64 {
    if x == 0.0 { 0 } else { x.to_bits() }
}

/// Stacks `series` and returns, per series, one band per sample.
///
/// A gap contributes `0` to the running total and stays a gap (`None`) in its own series.
pub fn stack(series: &[&[Sample]]) -> Vec<Vec<Option<Band>>> {
    let mut totals: HashMap<u64, f64> = HashMap::new();
    series
        .iter()
        .map(|samples| {
            samples
                .iter()
                .map(|s| {
                    let (x, y) = s.point()?;
                    let total = totals.entry(column_key(x)).or_insert(0.0);
                    let y0 = *total;
                    *total += y;
                    Some(Band { x, y0, y1: *total })
                })
                .collect()
        })
        .collect()
}

/// Returns every bottom and top value of `stacked`, for domain computation.
pub fn stacked_values(stacked: &[Vec<Option<Band>>]) -> impl Iterator<Item = f64> + '_ {
    stacked
        .iter()
        .flatten()
        .flatten()
        .flat_map(|b| [b.y0, b.y1])
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn series(ys: &[Option<f64>]) -> Vec<Sample> {
        ys.iter()
            .enumerate()
            .map(|(index, y)| Sample {
                index,
                x: index as f64,
                y: *y,
            })
            .collect()
    }

    #[test]
    fn gaps_contribute_zero_and_stay_gaps() {
        let a = series(&[Some(1.0), None, Some(1.0)]);
        let b = series(&[Some(2.0), Some(2.0), Some(2.0)]);
        let stacked = stack(&[&a[..], &b[..]]);
        assert_eq!(stacked[0][1], None);
        assert_eq!(stacked[1][1], Some(Band { x: 1.0, y0: 0.0, y1: 2.0 }));
        assert_eq!(stacked[1][2], Some(Band { x: 2.0, y0: 1.0, y1: 3.0 }));
    }

    #[test]
    fn negative_zero_shares_the_zero_column() {
        let a = [Sample { index: 0, x: 0.0, y: Some(1.0) }];
        let b = [Sample { index: 0, x: -0.0, y: Some(1.0) }];
        let stacked = stack(&[&a[..], &b[..]]);
        assert_eq!(stacked[1][0].map(|b| b.y1), Some(2.0));
    }
}
