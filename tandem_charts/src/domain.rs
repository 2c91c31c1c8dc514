// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data domains and the per-chart layout cache.

use kurbo::Rect;

use crate::accessor::Sample;
use crate::error::DomainError;

/// Returns the `(min, max)` of the finite values, or [`DomainError::Empty`].
pub fn extent(values: impl IntoIterator<Item = f64>) -> Result<(f64, f64), DomainError> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .ok_or(DomainError::Empty)
}

/// Returns the y domain across every series in `series`; gaps are ignored.
pub fn compute_domain<'a>(
    series: impl IntoIterator<Item = &'a [Sample]>,
) -> Result<(f64, f64), DomainError> {
    extent(
        series
            .into_iter()
            .flatten()
            .filter_map(|s| s.point().map(|(_, y)| y)),
    )
}

/// Returns the x domain across every series in `series`.
///
/// Samples with a gap in y still occupy their x position.
pub fn compute_x_domain<'a>(
    series: impl IntoIterator<Item = &'a [Sample]>,
) -> Result<(f64, f64), DomainError> {
    extent(series.into_iter().flatten().map(|s| s.x))
}

/// Applies the recovery policy to a computed domain.
///
/// An empty domain becomes `(0, 1)`. A degenerate domain `(v, v)` is padded symmetrically by
/// `max(|v| * 0.05, 0.5)` so the result never has zero width.
pub fn resolve_domain(result: Result<(f64, f64), DomainError>) -> (f64, f64) {
    match result {
        Err(DomainError::Empty) => {
            tracing::debug!("no finite values; using the unit domain");
            (0.0, 1.0)
        }
        Ok((lo, hi)) if lo == hi => {
            let pad = (lo.abs() * 0.05).max(0.5);
            tracing::debug!(value = lo, pad, "padding a degenerate domain");
            (lo - pad, hi + pad)
        }
        Ok(domain) => domain,
    }
}

/// Widens `domain` so it contains `v`.
pub fn include(domain: (f64, f64), v: f64) -> (f64, f64) {
    (domain.0.min(v), domain.1.max(v))
}

/// Returns the area baseline: `0` clamped into `domain`.
pub fn baseline(domain: (f64, f64)) -> f64 {
    let (lo, hi) = if domain.0 <= domain.1 {
        domain
    } else {
        (domain.1, domain.0)
    };
    0.0_f64.clamp(lo, hi)
}

/// Caches a chart's derived layout until its inputs change.
///
/// The key is the chart revision (bumped whenever the series list or a data reference
/// changes) together with the plot rectangle.
#[derive(Clone, Debug)]
pub struct DomainCache<T> {
    entry: Option<(u64, Rect, T)>,
    recomputations: u64,
}

impl<T> Default for DomainCache<T> {
    fn default() -> Self {
        Self {
            entry: None,
            recomputations: 0,
        }
    }
}

impl<T> DomainCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `(revision, plot)`, computing it with `f` on a miss.
    ///
    /// A failed computation leaves the cache empty.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        revision: u64,
        plot: Rect,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<&T, E> {
        let value = match self.entry.take() {
            Some((r, p, value)) if r == revision && p == plot => {
                tracing::trace!(revision, "layout cache hit");
                value
            }
            _ => {
                let value = f()?;
                self.recomputations += 1;
                tracing::trace!(revision, recomputations = self.recomputations, "layout recomputed");
                value
            }
        };
        let (_, _, value) = self.entry.insert((revision, plot, value));
        Ok(&*value)
    }

    /// Returns the cached value, if any.
    pub fn get(&self) -> Option<&T> {
        self.entry.as_ref().map(|(_, _, value)| value)
    }

    /// Drops the cached value.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Returns how many times a value has been computed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn samples(ys: &[Option<f64>]) -> alloc::vec::Vec<Sample> {
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
    fn domain_bounds_every_finite_value_and_skips_gaps() {
        let a = samples(&[Some(3.0), None, Some(-2.0)]);
        let b = samples(&[Some(f64::NAN), Some(9.0)]);
        let d = compute_domain([a.as_slice(), b.as_slice()]).unwrap();
        assert_eq!(d, (-2.0, 9.0));
    }

    #[test]
    fn empty_and_degenerate_domains_recover() {
        let gaps = samples(&[None, None]);
        let empty = compute_domain([gaps.as_slice()]);
        assert_eq!(empty, Err(DomainError::Empty));
        assert_eq!(resolve_domain(empty), (0.0, 1.0));
        assert_eq!(resolve_domain(Ok((100.0, 100.0))), (95.0, 105.0));
        assert_eq!(resolve_domain(Ok((0.0, 0.0))), (-0.5, 0.5));
    }

    #[test]
    fn baseline_is_zero_clamped_into_the_domain() {
        assert_eq!(baseline((-5.0, 5.0)), 0.0);
        assert_eq!(baseline((10.0, 20.0)), 10.0);
        assert_eq!(baseline((-20.0, -10.0)), -10.0);
    }

    #[test]
    fn cache_recomputes_only_on_key_change() {
        let plot = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut cache = DomainCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let v = cache
                .get_or_try_insert_with(1, plot, || {
                    calls += 1;
                    Ok::<_, ()>(42)
                })
                .unwrap();
            assert_eq!(*v, 42);
        }
        assert_eq!(calls, 1);
        cache
            .get_or_try_insert_with(2, plot, || Ok::<_, ()>(7))
            .unwrap();
        cache
            .get_or_try_insert_with(2, plot.inflate(1.0, 1.0), || Ok::<_, ()>(8))
            .unwrap();
        assert_eq!(cache.recomputations(), 3);
        assert_eq!(cache.get(), Some(&8));
    }
}
