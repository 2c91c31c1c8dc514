// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained mark model for `tandem` charts.
//!
//! Charts never draw directly. They emit a list of [`Mark`]s (paths, rects and text) with
//! stable [`MarkId`]s, and a [`Scene`] diffs each new list against the previous frame:
//! - marks whose payload and z-index are unchanged produce no diff,
//! - changed marks produce [`MarkDiff::Update`],
//! - new and removed marks produce [`MarkDiff::Enter`] / [`MarkDiff::Exit`].
//!
//! [`to_svg`] serializes the current scene into an SVG document.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod id;
mod mark;
mod scene;
mod svg;

pub use id::{IdSource, MarkId};
pub use mark::{
    Mark, MarkBuilder, MarkKind, MarkPayload, PathMark, PathMarkBuilder, RectMark,
    RectMarkBuilder, TextAnchor, TextBaseline, TextMark, TextMarkBuilder,
};
pub use scene::{MarkDiff, Scene};
pub use svg::to_svg;
