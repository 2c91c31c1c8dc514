// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive 2D charts for `tandem_core`.
//!
//! Charts turn caller records into stable-identity marks that `tandem_core` diffs frame to
//! frame:
//! - **Accessors** read x, y and keys from any record type; `None`, `NaN` and infinities
//!   become gaps.
//! - **Scales** map data values into plot coordinates (linear, time and band).
//! - **Marks and guides** (lines, areas, bars, sectors, radar polygons, axes, legends,
//!   thresholds and tooltips) are generated as `tandem_core::Mark`s.
//! - **Charts** ([`XyChart`], [`BarChart`], [`PieChart`], [`RadarChart`]) own their scene,
//!   cache their layout, and handle pointer input.
//! - **Linking**: charts subscribed to one [`SyncBus`] share a single hover state, so a
//!   crosshair in one chart follows the pointer in another.
//!
//! Text shaping is out of scope; text marks store unshaped strings and layout uses a
//! [`TextMeasurer`].

#![no_std]

extern crate alloc;

mod accessor;
mod area_mark;
mod axis;
mod bar_chart;
mod bar_mark;
#[cfg(test)]
mod chart_tests;
mod domain;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod frame;
mod layout;
mod legend;
mod line_mark;
mod measure;
mod pie_chart;
mod radar_chart;
mod radar_mark;
mod rule_mark;
mod scale;
mod sector_mark;
mod series;
mod stack;
mod style;
mod sync;
mod threshold;
mod time;
mod tooltip;
mod xy_chart;
mod z_order;

pub use accessor::{Accessor, IntoX, IntoY, Sample, TryAccessor, bind_samples, regroup};
pub use area_mark::{AreaMarkSpec, Band, bands_from_baseline};
pub use axis::{AxisOrient, AxisScale, AxisSpec, AxisStyle, GridStyle, StrokeStyle, Tick};
pub use bar_chart::BarChart;
pub use bar_mark::{Bar, BarMarkSpec};
pub use domain::{
    DomainCache, baseline, compute_domain, compute_x_domain, extent, include, resolve_domain,
};
pub use error::{AccessError, ChartError, DomainError};
pub use format::{format_tick_with_step, format_value};
pub use layout::{Margin, Size, plot_rect};
pub use legend::{LegendItem, LegendSwatchesSpec};
pub use line_mark::LineMarkSpec;
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use pie_chart::{PieChart, Wedge};
pub use radar_chart::{RadarChart, RadarData};
pub use radar_mark::RadarMarkSpec;
pub use rule_mark::RuleMarkSpec;
pub use scale::{
    ContinuousKind, ScaleBand, ScaleContinuous, ScaleLinear, ScaleLinearSpec, ScaleTime,
    nice_step, nice_ticks,
};
pub use sector_mark::{SectorMarkSpec, pie_angles};
pub use series::{AxisSide, Series, SeriesKind};
pub use stack::{stack, stacked_values};
pub use style::{ChartStyle, PALETTE};
pub use sync::{Subscription, SyncBus, SyncLink};
pub use threshold::{Threshold, threshold_marks};
pub use time::{TimeInterval, format_time, nice_time_ticks};
pub use tooltip::{
    Datum, Hits, SeriesHit, TooltipController, TooltipOverlay, TooltipRow, TooltipState,
};
pub use xy_chart::XyChart;
pub use z_order::*;
