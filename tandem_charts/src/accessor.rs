// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accessor binding: normalizing caller records into plottable samples.
//!
//! Charts are generic over the caller's record type `R`. Callers describe how to read a
//! record with [`Accessor`]s, which are usually plain closures:
//!
//! ```
//! use tandem_charts::{Accessor, bind_samples};
//!
//! struct Reading {
//!     t: f64,
//!     celsius: Option<f64>,
//! }
//!
//! let data = [
//!     Reading { t: 0.0, celsius: Some(20.5) },
//!     Reading { t: 60.0, celsius: None },
//! ];
//! let samples = bind_samples("temp", &data, &|r: &Reading| r.t, &|r: &Reading| r.celsius)
//!     .unwrap();
//! assert_eq!(samples[0].y, Some(20.5));
//! assert!(samples[1].is_gap());
//! ```
//!
//! Accessors must be pure: the engine may call them more than once per record.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::{AccessError, ChartError};

/// A pure projection from a record to a value.
///
/// Implemented for every `Fn(&R) -> T`. Use [`TryAccessor`] for accessors that can fail.
pub trait Accessor<R> {
    /// The projected value.
    type Value;

    /// Reads the value from `record`.
    fn get(&self, record: &R) -> Result<Self::Value, AccessError>;
}

impl<R, T, F> Accessor<R> for F
where
    F: Fn(&R) -> T,
{
    type Value = T;

    fn get(&self, record: &R) -> Result<T, AccessError> {
        Ok(self(record))
    }
}

/// Adapts a fallible closure `Fn(&R) -> Result<T, AccessError>` into an [`Accessor`].
#[derive(Clone, Copy, Debug)]
pub struct TryAccessor<F>(pub F);

impl<R, T, F> Accessor<R> for TryAccessor<F>
where
    F: Fn(&R) -> Result<T, AccessError>,
{
    type Value = T;

    fn get(&self, record: &R) -> Result<T, AccessError> {
        (self.0)(record)
    }
}

/// Values usable as an x coordinate (numbers, or timestamps in seconds).
pub trait IntoX {
    /// Converts into an `f64` coordinate.
    fn into_x(self) -> f64;
}

/// Values usable as a y coordinate.
///
/// `None`, `NaN` and infinities are gaps.
pub trait IntoY {
    /// Converts into an optional `f64`; `None` marks a gap.
    fn into_y(self) -> Option<f64>;
}

macro_rules! impl_numeric {
    ($($t:ty),*) => {
        $(
            impl IntoX for $t {
                #[allow(trivial_numeric_casts, reason = "shared by f64 and integer types")]
                fn into_x(self) -> f64 {
                    self as f64
                }
            }

            impl IntoY for $t {
                #[allow(trivial_numeric_casts, reason = "shared by f64 and integer types")]
                fn into_y(self) -> Option<f64> {
                    let v = self as f64;
                    v.is_finite().then_some(v)
                }
            }
        )*
    };
}

impl_numeric!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// Timestamps become seconds since the Unix epoch, including the sub-second part.
impl<Tz: chrono::TimeZone> IntoX for chrono::DateTime<Tz> {
    fn into_x(self) -> f64 {
        self.timestamp() as f64 + f64::from(self.timestamp_subsec_nanos()) / 1e9
    }
}

impl<T: IntoY> IntoY for Option<T> {
    fn into_y(self) -> Option<f64> {
        self.and_then(IntoY::into_y)
    }
}

/// One normalized record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Position of the record in its source slice.
    pub index: usize,
    /// X coordinate in data units.
    pub x: f64,
    /// Y value in data units; `None` is a gap.
    pub y: Option<f64>,
}

impl Sample {
    /// Returns `true` if this sample is a gap (no y, or a non-finite x).
    pub fn is_gap(&self) -> bool {
        self.y.is_none() || !self.x.is_finite()
    }

    /// Returns `(x, y)` for non-gap samples.
    pub fn point(&self) -> Option<(f64, f64)> {
        if self.x.is_finite() {
            self.y.map(|y| (self.x, y))
        } else {
            None
        }
    }
}

/// Type-erased x accessor stored by charts.
pub(crate) type XFn<R> = alloc::boxed::Box<dyn Fn(&R) -> Result<f64, AccessError>>;
/// Type-erased y accessor stored by charts.
pub(crate) type YFn<R> = alloc::boxed::Box<dyn Fn(&R) -> Result<Option<f64>, AccessError>>;
/// Type-erased string accessor (categories, keys) stored by charts.
pub(crate) type KeyFn<R> = alloc::boxed::Box<dyn Fn(&R) -> Result<String, AccessError>>;

pub(crate) fn erase_x<R, A>(accessor: A) -> XFn<R>
where
    A: Accessor<R> + 'static,
    A::Value: IntoX,
{
    alloc::boxed::Box::new(move |r: &R| accessor.get(r).map(IntoX::into_x))
}

pub(crate) fn erase_y<R, A>(accessor: A) -> YFn<R>
where
    A: Accessor<R> + 'static,
    A::Value: IntoY,
{
    alloc::boxed::Box::new(move |r: &R| accessor.get(r).map(IntoY::into_y))
}

pub(crate) fn erase_key<R, A>(accessor: A) -> KeyFn<R>
where
    A: Accessor<R> + 'static,
    A::Value: Into<String>,
{
    alloc::boxed::Box::new(move |r: &R| accessor.get(r).map(Into::into))
}

/// Binds `records` into samples using the given accessors.
///
/// `series` names the series in the error if an accessor fails.
pub fn bind_samples<R, X, Y>(
    series: &str,
    records: &[R],
    x: &X,
    y: &Y,
) -> Result<Vec<Sample>, ChartError>
where
    X: Accessor<R>,
    X::Value: IntoX,
    Y: Accessor<R>,
    Y::Value: IntoY,
{
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let wrap = |source| ChartError::Accessor {
                series: series.into(),
                index,
                source,
            };
            let x = x.get(record).map_err(wrap)?.into_x();
            let y = y.get(record).map_err(wrap)?.into_y();
            Ok(Sample { index, x, y })
        })
        .collect()
}

/// Splits `records` into groups by key, in order of first appearance.
///
/// This turns a single array carrying a discriminant field into independent series.
/// Record order within each group is preserved.
pub fn regroup<R, K, A>(records: &[R], key_of: &A) -> Result<Vec<(K, Vec<R>)>, ChartError>
where
    R: Clone,
    K: Clone + Eq + core::hash::Hash,
    A: Accessor<R, Value = K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<R>)> = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let key = key_of
            .get(record)
            .map_err(|source| ChartError::Accessor {
                series: "key".into(),
                index,
                source,
            })?;
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record.clone());
    }
    Ok(groups)
}
