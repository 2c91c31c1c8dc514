// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;

/// An accessor could not produce a value for a record.
///
/// Accessors are caller code; an error here is a contract violation and is never recovered
/// locally.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AccessError {
    message: Cow<'static, str>,
}

impl AccessError {
    /// Creates an access error with a static message.
    pub const fn new(message: &'static str) -> Self {
        Self {
            message: Cow::Borrowed(message),
        }
    }

    /// Creates an access error with an owned message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Cow::Owned(message.into()),
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by chart rendering and pointer handling.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    /// An accessor failed for a record.
    #[error("accessor for series `{series}` failed at record {index}: {source}")]
    Accessor {
        /// Key of the series (or `x` / `key` for chart-level accessors).
        series: String,
        /// Index of the record in its source slice.
        index: usize,
        /// The accessor's error.
        source: AccessError,
    },
    /// The data needs more marks than the chart's id range reserves for them.
    ///
    /// Rendering stops instead of letting ids spill into a neighboring region.
    #[error("{count} {what} exceed the {capacity} mark ids reserved for them")]
    TooManyMarks {
        /// What was being laid out, such as `"bars"` or `"series"`.
        what: &'static str,
        /// How many were requested.
        count: usize,
        /// How many fit.
        capacity: u64,
    },
}

/// A domain could not be derived from data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// No finite values were present.
    #[error("no finite values to derive a domain from")]
    Empty,
}
