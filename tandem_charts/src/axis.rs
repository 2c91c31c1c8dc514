// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis tick computation and mark generation.
//!
//! A single [`AxisSpec`] covers all four orientations. Orientation is a pure layout parameter:
//! the ticks of an axis depend only on its scale, while the orientation decides on which edge
//! of the plot rectangle the rules and labels are drawn.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::Brush;
use peniko::color::palette::css;
use tandem_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::format::format_tick_with_step;
use crate::frame::region::REGION_SIZE;
use crate::measure::TextMeasurer;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ContinuousKind, ScaleBand, ScaleContinuous};
use crate::time::format_time;
use crate::z_order;

// An axis spans one id region: tick rules, labels and gridlines each take a quarter.
const TICK_OFFSET: u64 = 1;
const LABEL_OFFSET: u64 = REGION_SIZE / 4;
const GRID_OFFSET: u64 = REGION_SIZE / 2;
const TITLE_OFFSET: u64 = REGION_SIZE - 1;

/// Ticks an axis can give distinct ids.
pub(crate) const TICK_CAPACITY: u64 = LABEL_OFFSET - TICK_OFFSET;

/// A paint + width pair for stroked paths (domain lines, ticks, gridlines).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Axis styling defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain line and tick marks.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
    /// Fill paint for the axis title.
    pub title_fill: Brush,
    /// Font size for the axis title.
    pub title_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        let rule = StrokeStyle::solid(css::DIM_GRAY, 1.0);
        Self {
            label_fill: rule.brush.clone(),
            label_font_size: 10.0,
            title_fill: Brush::Solid(css::BLACK),
            title_font_size: 11.0,
            rule,
        }
    }
}

/// Gridline styling.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStyle {
    /// Stroke style for gridlines.
    pub stroke: StrokeStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle {
                brush: Brush::Solid(css::BLACK.with_alpha(40.0 / 255.0)),
                stroke_width: 1.0,
            },
        }
    }
}

/// Which edge of the plot an axis is drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis placed above the plot area.
    Top,
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
    /// A vertical axis placed to the right of the plot area.
    Right,
}

impl AxisOrient {
    /// Returns `true` for `Top` and `Bottom`.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// The scale an axis annotates.
#[derive(Clone, Copy, Debug)]
pub enum AxisScale<'a> {
    /// A linear or time scale.
    Continuous(ScaleContinuous),
    /// A band scale and its category labels, in band order.
    Band(ScaleBand, &'a [String]),
}

/// One axis tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Position along the axis in scene coordinates.
    pub position: f64,
    /// Tick value in data units (the band index for band scales).
    pub value: f64,
    /// Formatted label.
    pub label: String,
}

/// An axis specification.
#[derive(Clone)]
pub struct AxisSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks for continuous scales.
    pub tick_count: usize,
    /// Tick line length in pixels, pointing away from the plot.
    pub tick_size: f64,
    /// Gap between the tick end and the tick label.
    pub tick_padding: f64,
    /// Whether to draw the axis domain line.
    pub show_domain: bool,
    /// Axis styling.
    pub style: AxisStyle,
    /// Optional gridlines spanning the plot area.
    pub grid: Option<GridStyle>,
    /// Optional axis title text.
    pub title: Option<String>,
    /// Distance from tick labels to the title.
    pub title_offset: f64,
    /// Optional tick label formatter, called with `(value, step)`.
    ///
    /// Band axes always label ticks with their category.
    pub tick_formatter: Option<Arc<dyn Fn(f64, f64) -> String>>,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisSpec")
            .field("id_base", &self.id_base)
            .field("orient", &self.orient)
            .field("tick_count", &self.tick_count)
            .field("tick_size", &self.tick_size)
            .field("tick_padding", &self.tick_padding)
            .field("show_domain", &self.show_domain)
            .field("style", &self.style)
            .field("grid", &self.grid)
            .field("title", &self.title)
            .field("title_offset", &self.title_offset)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .finish()
    }
}

impl AxisSpec {
    /// Creates a new axis specification.
    ///
    /// Defaults: 5 ticks of size 5, a tick padding of 3, a domain line, no grid and no title.
    pub fn new(id_base: u64, orient: AxisOrient) -> Self {
        Self {
            id_base,
            orient,
            tick_count: 5,
            tick_size: 5.0,
            tick_padding: 3.0,
            show_domain: true,
            style: AxisStyle::default(),
            grid: None,
            title: None,
            title_offset: 6.0,
            tick_formatter: None,
        }
    }

    /// Convenience constructor for a `bottom` axis.
    pub fn bottom(id_base: u64) -> Self {
        Self::new(id_base, AxisOrient::Bottom)
    }

    /// Convenience constructor for a `top` axis.
    pub fn top(id_base: u64) -> Self {
        Self::new(id_base, AxisOrient::Top)
    }

    /// Convenience constructor for a `left` axis.
    pub fn left(id_base: u64) -> Self {
        Self::new(id_base, AxisOrient::Left)
    }

    /// Convenience constructor for a `right` axis.
    pub fn right(id_base: u64) -> Self {
        Self::new(id_base, AxisOrient::Right)
    }

    /// Set the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Set tick size in scene coordinates.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Enable or disable the axis domain line.
    pub fn with_domain(mut self, domain: bool) -> Self {
        self.show_domain = domain;
        self
    }

    /// Set a custom tick label formatter.
    pub fn with_tick_formatter(mut self, f: impl Fn(f64, f64) -> String + 'static) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    /// Set the axis style.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Enable gridlines using the provided style.
    pub fn with_grid(mut self, grid: GridStyle) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Set the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the axis title if `title` is `Some`.
    pub fn with_optional_title(mut self, title: Option<&str>) -> Self {
        self.title = title.map(String::from);
        self
    }

    /// Returns the ticks for `scale`, ordered by value.
    pub fn ticks(&self, scale: &AxisScale<'_>) -> Vec<Tick> {
        match scale {
            AxisScale::Continuous(s) => {
                let values = s.ticks(self.tick_count);
                let step = tick_step(&values);
                values
                    .into_iter()
                    .map(|value| Tick {
                        position: s.map(value),
                        value,
                        label: self.format_tick(s.kind(), value, step),
                    })
                    .collect()
            }
            AxisScale::Band(band, labels) => labels
                .iter()
                .take(band.count())
                .enumerate()
                .map(|(i, label)| Tick {
                    position: band.center(i),
                    value: i as f64,
                    label: label.clone(),
                })
                .collect(),
        }
    }

    fn format_tick(&self, kind: ContinuousKind, v: f64, step: f64) -> String {
        match (&self.tick_formatter, kind) {
            (Some(f), _) => f(v, step),
            (None, ContinuousKind::Time) => format_time(v, step),
            (None, ContinuousKind::Linear) => format_tick_with_step(v, step),
        }
    }

    /// Measures the thickness this axis needs along its normal direction.
    pub fn measure(&self, scale: &AxisScale<'_>, measurer: &dyn TextMeasurer) -> f64 {
        let font_size = self.style.label_font_size;
        let label_extent = self
            .ticks(scale)
            .iter()
            .map(|t| {
                let (w, h) = measurer.measure(&t.label, font_size);
                if self.orient.is_horizontal() { h } else { w }
            })
            .fold(0.0_f64, f64::max);
        let mut out = self.tick_size.abs() + self.tick_padding.max(0.0) + label_extent;
        if self.title.is_some() {
            out += self.title_offset.max(0.0) + self.style.title_font_size;
        }
        out
    }

    /// Generates the axis marks for `plot`.
    pub fn marks(
        &self,
        scale: &AxisScale<'_>,
        plot: Rect,
        measurer: &dyn TextMeasurer,
    ) -> Vec<Mark> {
        let ticks = self.ticks(scale);
        let tick_size = self.tick_size.abs();
        let label_gap = tick_size + self.tick_padding.max(0.0);
        let rule = &self.style.rule;
        let mut out = Vec::new();

        if self.show_domain {
            let id = self.id(0);
            let domain = match self.orient {
                AxisOrient::Bottom => RuleMarkSpec::horizontal(id, plot.y1, plot.x0, plot.x1),
                AxisOrient::Top => RuleMarkSpec::horizontal(id, plot.y0, plot.x0, plot.x1),
                AxisOrient::Left => RuleMarkSpec::vertical(id, plot.x0, plot.y0, plot.y1),
                AxisOrient::Right => RuleMarkSpec::vertical(id, plot.x1, plot.y0, plot.y1),
            };
            out.push(
                domain
                    .with_stroke(rule.brush.clone(), rule.stroke_width)
                    .with_z_index(z_order::AXIS_RULES)
                    .mark(),
            );
        }

        for (i, tick) in ticks.iter().enumerate() {
            let p = tick.position;
            let inside = if self.orient.is_horizontal() {
                p >= plot.x0 - 1e-9 && p <= plot.x1 + 1e-9
            } else {
                p >= plot.y0 - 1e-9 && p <= plot.y1 + 1e-9
            };
            if !inside {
                continue;
            }
            let i = i as u64;

            if let Some(grid) = &self.grid {
                let line = if self.orient.is_horizontal() {
                    RuleMarkSpec::vertical(self.id(GRID_OFFSET + i), p, plot.y0, plot.y1)
                } else {
                    RuleMarkSpec::horizontal(self.id(GRID_OFFSET + i), p, plot.x0, plot.x1)
                };
                out.push(
                    line.with_stroke(grid.stroke.brush.clone(), grid.stroke.stroke_width)
                        .with_z_index(z_order::GRID_LINES)
                        .mark(),
                );
            }

            let id = self.id(TICK_OFFSET + i);
            let (tick_rule, (lx, ly), anchor, baseline) = match self.orient {
                AxisOrient::Bottom => (
                    RuleMarkSpec::vertical(id, p, plot.y1, plot.y1 + tick_size),
                    (p, plot.y1 + label_gap),
                    TextAnchor::Middle,
                    TextBaseline::Hanging,
                ),
                AxisOrient::Top => (
                    RuleMarkSpec::vertical(id, p, plot.y0, plot.y0 - tick_size),
                    (p, plot.y0 - label_gap),
                    TextAnchor::Middle,
                    TextBaseline::Alphabetic,
                ),
                AxisOrient::Left => (
                    RuleMarkSpec::horizontal(id, p, plot.x0, plot.x0 - tick_size),
                    (plot.x0 - label_gap, p),
                    TextAnchor::End,
                    TextBaseline::Middle,
                ),
                AxisOrient::Right => (
                    RuleMarkSpec::horizontal(id, p, plot.x1, plot.x1 + tick_size),
                    (plot.x1 + label_gap, p),
                    TextAnchor::Start,
                    TextBaseline::Middle,
                ),
            };
            if tick_size > 0.0 {
                out.push(
                    tick_rule
                        .with_stroke(rule.brush.clone(), rule.stroke_width)
                        .with_z_index(z_order::AXIS_RULES)
                        .mark(),
                );
            }
            out.push(
                Mark::builder(self.id(LABEL_OFFSET + i))
                    .text()
                    .z_index(z_order::AXIS_LABELS)
                    .at(lx, ly)
                    .text(tick.label.clone())
                    .anchor(anchor)
                    .baseline(baseline)
                    .font_size(self.style.label_font_size)
                    .fill(self.style.label_fill.clone())
                    .build(),
            );
        }

        if let Some(title) = &self.title {
            // The title sits in the outer strip of the measured axis thickness.
            let thickness = self.measure(scale, measurer);
            let half = 0.5 * self.style.title_font_size;
            let cx = 0.5 * (plot.x0 + plot.x1);
            let cy = 0.5 * (plot.y0 + plot.y1);
            let ((x, y), angle) = match self.orient {
                AxisOrient::Bottom => ((cx, plot.y1 + thickness - half), 0.0),
                AxisOrient::Top => ((cx, plot.y0 - thickness + half), 0.0),
                AxisOrient::Left => ((plot.x0 - thickness + half, cy), -90.0),
                AxisOrient::Right => ((plot.x1 + thickness - half, cy), 90.0),
            };
            out.push(
                Mark::builder(self.id(TITLE_OFFSET))
                    .text()
                    .z_index(z_order::AXIS_TITLES)
                    .at(x, y)
                    .text(title.clone())
                    .anchor(TextAnchor::Middle)
                    .baseline(TextBaseline::Middle)
                    .angle(angle)
                    .font_size(self.style.title_font_size)
                    .fill(self.style.title_fill.clone())
                    .build(),
            );
        }

        out
    }

    fn id(&self, offset: u64) -> MarkId {
        MarkId::from_raw(self.id_base + offset)
    }
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use tandem_core::MarkPayload;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    fn texts(marks: &[Mark]) -> Vec<String> {
        marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn linear_ticks_are_ordered_and_labelled_by_step() {
        let scale = ScaleContinuous::new(ContinuousKind::Linear, (0.0, 1.0), (200.0, 0.0));
        let ticks = AxisSpec::left(0).ticks(&AxisScale::Continuous(scale));
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);
        assert_eq!(ticks[0].position, 200.0);
        assert!(ticks.windows(2).all(|w| w[0].value < w[1].value));
    }

    #[test]
    fn time_axis_defaults_to_time_formatter() {
        // 2024-03-10T00:00:00Z .. +4 days
        let t0 = 1_710_028_800.0;
        let domain = (t0, t0 + 4.0 * 86_400.0);
        let scale = ScaleContinuous::new(ContinuousKind::Time, domain, (0.0, 400.0));
        let ticks = AxisSpec::bottom(0).ticks(&AxisScale::Continuous(scale));
        assert_eq!(ticks[0].label, "2024-03-10");
        assert_eq!(ticks[1].label, "2024-03-11");
    }

    #[test]
    fn custom_formatter_overrides_the_default() {
        let scale = ScaleContinuous::new(ContinuousKind::Linear, (0.0, 10.0), (100.0, 0.0));
        let axis = AxisSpec::left(0).with_tick_formatter(|v, _| alloc::format!("{v}%"));
        let ticks = axis.ticks(&AxisScale::Continuous(scale));
        assert_eq!(ticks[1].label, "2%");
    }

    #[test]
    fn band_ticks_sit_at_band_centers() {
        let labels = vec!["a".to_string(), "b".to_string()];
        let band = ScaleBand::new((0.0, 100.0), 2).with_padding(0.0, 0.0);
        let ticks = AxisSpec::bottom(0).ticks(&AxisScale::Band(band, &labels));
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].position, 25.0);
        assert_eq!(ticks[1].label, "b");
    }

    #[test]
    fn marks_include_domain_ticks_labels_grid_and_title() {
        let plot = Rect::new(50.0, 10.0, 350.0, 210.0);
        let scale = ScaleContinuous::new(ContinuousKind::Linear, (0.0, 10.0), (plot.y1, plot.y0));
        let axis = AxisSpec::left(100)
            .with_grid(GridStyle::default())
            .with_title("Load");
        let marks = axis.marks(&AxisScale::Continuous(scale), plot, &HeuristicTextMeasurer);
        let n = axis.ticks(&AxisScale::Continuous(scale)).len();
        // domain + (grid + tick + label) per tick + title
        assert_eq!(marks.len(), 1 + 3 * n + 1);
        assert!(texts(&marks).contains(&"Load".to_string()));

        for m in marks.iter().filter(|m| m.z_index == z_order::GRID_LINES) {
            let bounds = m.payload.bounds().unwrap();
            assert_eq!(bounds.x0, plot.x0);
            assert_eq!(bounds.x1, plot.x1);
        }
        let title = marks.iter().find(|m| m.id == MarkId(100 + TITLE_OFFSET)).unwrap();
        let MarkPayload::Text(t) = &title.payload else {
            panic!("expected a text title");
        };
        assert!(t.pos.x < plot.x0);
        assert_eq!(t.angle, -90.0);
    }

    #[test]
    fn orientation_only_changes_placement() {
        let scale = ScaleContinuous::new(ContinuousKind::Linear, (0.0, 10.0), (0.0, 300.0));
        let a = AxisSpec::top(0).ticks(&AxisScale::Continuous(scale));
        let b = AxisSpec::bottom(0).ticks(&AxisScale::Continuous(scale));
        assert_eq!(a, b);
    }
}
