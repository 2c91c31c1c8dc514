// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark identity.

/// Stable identity of a mark across frames.
///
/// Scenes match marks between ticks by id, so generators must derive ids deterministically
/// from what the mark represents (chart, region, series index, tick index, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Creates a mark id from a raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the id `n` steps after this one.
    pub const fn offset(self, n: u64) -> Self {
        Self(self.0.wrapping_add(n))
    }
}

/// Hands out non-overlapping id ranges for independently rendered charts.
///
/// Each chart draws all of its mark ids from the `[base, base + stride)` range it was given.
/// The source is owned by whichever code composes the charts and is threaded through
/// explicitly; there is no process-wide counter.
#[derive(Clone, Debug)]
pub struct IdSource {
    next: u64,
    stride: u64,
}

impl IdSource {
    /// Default size of the id range reserved per chart.
    pub const DEFAULT_STRIDE: u64 = 1 << 24;

    /// Creates a source starting at the first range.
    pub fn new() -> Self {
        Self::with_stride(Self::DEFAULT_STRIDE)
    }

    /// Creates a source that reserves `stride` ids per call to [`IdSource::next_base`].
    pub fn with_stride(stride: u64) -> Self {
        let stride = stride.max(1);
        Self {
            next: stride,
            stride,
        }
    }

    /// Reserves a new id range and returns its base.
    pub fn next_base(&mut self) -> u64 {
        let base = self.next;
        self.next = self.next.wrapping_add(self.stride);
        base
    }

    /// Returns the size of each reserved range.
    pub fn stride(&self) -> u64 {
        self.stride
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn id_source_ranges_do_not_overlap() {
        let mut ids = IdSource::with_stride(100);
        let a = ids.next_base();
        let b = ids.next_base();
        assert_eq!(b - a, 100);
        assert_ne!(a, 0, "base 0 is left free for ad-hoc marks");
    }

    #[test]
    fn independent_sources_do_not_share_state() {
        let mut a = IdSource::new();
        let mut b = IdSource::new();
        assert_eq!(a.next_base(), b.next_base());
    }
}
