// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float helpers for `no_std` builds.
//!
//! `f64::floor`, `f64::sin` and friends live in `std`, not `core`. This trait dispatches them
//! to `libm` when the `std` feature is off.

/// Float math helpers for `f64` in `no_std` mode.
pub(crate) trait FloatExt {
    fn floor(self) -> Self;
    fn ceil(self) -> Self;
    fn round(self) -> Self;
    fn log10(self) -> Self;
    fn powf(self, n: Self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn atan2(self, other: Self) -> Self;
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
impl FloatExt for f64 {
    fn floor(self) -> Self {
        libm::floor(self)
    }

    fn ceil(self) -> Self {
        libm::ceil(self)
    }

    fn round(self) -> Self {
        libm::round(self)
    }

    fn log10(self) -> Self {
        libm::log10(self)
    }

    fn powf(self, n: Self) -> Self {
        libm::pow(self, n)
    }

    fn sin(self) -> Self {
        libm::sin(self)
    }

    fn cos(self) -> Self {
        libm::cos(self)
    }

    fn atan2(self, other: Self) -> Self {
        libm::atan2(self, other)
    }
}

#[cfg(all(not(feature = "std"), not(feature = "libm")))]
compile_error!("tandem_charts requires either the `std` or `libm` feature");
