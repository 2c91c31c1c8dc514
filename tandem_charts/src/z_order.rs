// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for chart-generated marks.
//!
//! Marks carry an explicit `z_index`; renderers sort by `(z_index, MarkId)` for a
//! deterministic tie-break. These values are coarse layers, not per-mark tuning.

/// Plot background/frame fills.
pub const PLOT_BACKGROUND: i32 = -100;
/// Gridlines drawn behind series.
pub const GRID_LINES: i32 = -50;

/// Filled series marks (bars, areas, wedges).
pub const SERIES_FILL: i32 = 0;
/// Stroked series marks (lines, area outlines).
pub const SERIES_STROKE: i32 = 10;

/// Threshold rules and their labels.
pub const THRESHOLDS: i32 = 25;

/// Axis domain line and tick marks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;
/// Axis title labels.
pub const AXIS_TITLES: i32 = 50;

/// Legend swatches.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend labels.
pub const LEGEND_LABELS: i32 = 70;

/// Hover crosshair and sample markers.
pub const CROSSHAIR: i32 = 90;
/// Tooltip box and its text.
pub const TOOLTIP: i32 = 100;
