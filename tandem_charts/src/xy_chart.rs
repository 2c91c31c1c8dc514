// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line and area charts over a continuous (linear or time) x axis.

extern crate alloc;

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use tandem_core::{Mark, MarkDiff, MarkId, Scene};

use crate::accessor::{Accessor, IntoX, IntoY, Sample, XFn, erase_x, regroup};
use crate::area_mark::{AreaMarkSpec, Band, bands_from_baseline};
use crate::axis::{AxisScale, AxisSpec, StrokeStyle};
use crate::domain::{DomainCache, baseline, compute_x_domain, extent, resolve_domain};
use crate::error::ChartError;
use crate::format::format_value;
use crate::frame::{ChartFrame, ensure_capacity, region};
use crate::layout::{Margin, Size};
use crate::legend::LegendItem;
use crate::line_mark::LineMarkSpec;
use crate::measure::TextMeasurer;
use crate::scale::{ContinuousKind, ScaleContinuous, ScaleLinearSpec};
use crate::series::{AxisSide, Series};
use crate::stack::{stack, stacked_values};
use crate::style::ChartStyle;
use crate::sync::{HoverSlot, SyncBus};
use crate::threshold::{Threshold, threshold_marks};
use crate::time::{TimeInterval, format_time};
use crate::tooltip::{TooltipController, TooltipOverlay, TooltipRow, TooltipState};

/// A chart of line and area series sharing one x axis and up to two y axes.
///
/// ```
/// use std::rc::Rc;
/// use tandem_charts::{Series, Size, XyChart};
///
/// let data: Rc<[(f64, f64)]> = Rc::from(vec![(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]);
/// let mut chart = XyChart::new(1 << 24, Size::new(400.0, 200.0), data, |r: &(f64, f64)| r.0)
///     .with_series(Series::new("value", |r: &(f64, f64)| r.1));
/// let diffs = chart.render().unwrap();
/// assert!(!diffs.is_empty());
/// ```
pub struct XyChart<R> {
    frame: ChartFrame,
    config: XyConfig<R>,
    revision: u64,
    cache: DomainCache<XyLayout>,
    hover: HoverSlot,
}

impl<R> core::fmt::Debug for XyChart<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("XyChart")
            .field("frame", &self.frame)
            .field("series", &self.config.series)
            .field("stacked", &self.config.stacked)
            .field("has_right_axis", &self.config.has_right_axis)
            .field("revision", &self.revision)
            .field("hover", &self.hover)
            .finish_non_exhaustive()
    }
}

struct XyConfig<R> {
    data: Rc<[R]>,
    x: XFn<R>,
    x_kind: ContinuousKind,
    series: Vec<Series<R>>,
    stacked: bool,
    has_right_axis: bool,
    tick_count: usize,
    y_label: Option<String>,
    y_unit_left_label: Option<String>,
    y_unit_right_label: Option<String>,
    thresholds: Vec<Threshold>,
}

/// Derived geometry, cached per revision and plot rectangle.
#[derive(Clone, Debug)]
struct XyLayout {
    x_scale: ScaleContinuous,
    left: ScaleContinuous,
    right: Option<ScaleContinuous>,
    sides: Vec<AxisSide>,
    samples: Vec<Vec<Sample>>,
    /// Area geometry per series; `None` for line series.
    bands: Vec<Option<Vec<Option<Band>>>>,
}

impl XyLayout {
    fn y_scale(&self, series: usize) -> ScaleContinuous {
        match (self.sides[series], self.right) {
            (AxisSide::Right, Some(right)) => right,
            _ => self.left,
        }
    }

    /// Returns the drawn y of a datum: the band top for areas, the value otherwise.
    fn drawn_y(&self, series: usize, index: usize, value: f64) -> f64 {
        self.bands[series]
            .as_ref()
            .and_then(|bands| bands.get(index).copied().flatten())
            .map_or(value, |b| b.y1)
    }
}

impl<R> XyConfig<R> {
    fn side(&self, series: &Series<R>) -> AxisSide {
        if self.has_right_axis {
            series.axis()
        } else {
            AxisSide::Left
        }
    }

    fn left_title(&self) -> Option<String> {
        match (&self.y_label, &self.y_unit_left_label) {
            (Some(label), Some(unit)) => Some(format!("{label} ({unit})")),
            (Some(title), None) | (None, Some(title)) => Some(title.clone()),
            (None, None) => None,
        }
    }

    fn layout(&self, plot: Rect) -> Result<XyLayout, ChartError> {
        ensure_capacity("series", self.series.len(), region::MAX_SERIES)?;
        ensure_capacity("thresholds", self.thresholds.len(), region::REGION_SIZE / 4)?;
        let samples = self
            .series
            .iter()
            .map(|s| s.bind(&self.data, &self.x))
            .collect::<Result<Vec<_>, _>>()?;
        let sides: Vec<AxisSide> = self.series.iter().map(|s| self.side(s)).collect();
        if !self.has_right_axis && self.series.iter().any(|s| s.axis() == AxisSide::Right) {
            tracing::debug!("no right axis; right-axis series fold onto the left axis");
        }

        let x_domain = resolve_domain(compute_x_domain(samples.iter().map(Vec::as_slice)));
        let mut bands: Vec<Option<Vec<Option<Band>>>> = vec![None; self.series.len()];
        let left = self.y_domain(AxisSide::Left, &sides, &samples, &mut bands);
        let right = self
            .has_right_axis
            .then(|| self.y_domain(AxisSide::Right, &sides, &samples, &mut bands));

        let y_range = (plot.y1, plot.y0);
        Ok(XyLayout {
            x_scale: ScaleContinuous::new(self.x_kind, x_domain, (plot.x0, plot.x1)),
            left: ScaleContinuous::new(ContinuousKind::Linear, left, y_range),
            right: right.map(|d| ScaleContinuous::new(ContinuousKind::Linear, d, y_range)),
            sides,
            samples,
            bands,
        })
    }

    /// Computes the nice domain of one y axis and fills in the area bands of its series.
    fn y_domain(
        &self,
        side: AxisSide,
        sides: &[AxisSide],
        samples: &[Vec<Sample>],
        bands: &mut [Option<Vec<Option<Band>>>],
    ) -> (f64, f64) {
        let on_side: Vec<usize> = (0..sides.len()).filter(|&i| sides[i] == side).collect();
        let mut values: Vec<f64> = Vec::new();

        if self.stacked {
            let areas: Vec<usize> = on_side
                .iter()
                .copied()
                .filter(|&i| self.series[i].is_area())
                .collect();
            let layers: Vec<&[Sample]> = areas.iter().map(|&i| samples[i].as_slice()).collect();
            let stacked = stack(&layers);
            values.extend(stacked_values(&stacked));
            for (i, layer) in areas.into_iter().zip(stacked) {
                bands[i] = Some(layer);
            }
        }
        for &i in &on_side {
            if bands[i].is_none() {
                values.extend(samples[i].iter().filter_map(|s| s.point().map(|(_, y)| y)));
            }
        }

        let domain = resolve_domain(extent(values));
        let domain = ScaleLinearSpec::new(domain)
            .with_nice(true)
            .resolved_domain(self.tick_count);
        for &i in &on_side {
            if self.series[i].is_area() && bands[i].is_none() {
                bands[i] = Some(bands_from_baseline(&samples[i], baseline(domain)));
            }
        }
        domain
    }

    fn color(&self, style: &ChartStyle, series: usize) -> peniko::Color {
        self.series[series]
            .color()
            .unwrap_or_else(|| style.color(series))
    }

    fn format_x(&self, x: f64, layout: &XyLayout) -> String {
        match self.x_kind {
            ContinuousKind::Time => {
                let (d0, d1) = layout.x_scale.domain();
                let step = TimeInterval::for_step((d1 - d0).abs() / self.tick_count.max(1) as f64);
                format_time(x, step.seconds())
            }
            ContinuousKind::Linear => format_value(x),
        }
    }

    fn marks(
        &self,
        frame: &ChartFrame,
        plot: Rect,
        layout: &XyLayout,
        hover: Option<&TooltipState>,
    ) -> Vec<Mark> {
        let style = &frame.style;
        let measurer = &*frame.measurer;
        let mut out = Vec::new();
        out.extend(frame.background(plot));

        let x_axis = AxisSpec::bottom(frame.region(region::AXIS_X))
            .with_style(style.axis.clone())
            .with_tick_count(self.tick_count);
        out.extend(x_axis.marks(&AxisScale::Continuous(layout.x_scale), plot, measurer));

        let mut left_axis = AxisSpec::left(frame.region(region::AXIS_LEFT))
            .with_style(style.axis.clone())
            .with_tick_count(self.tick_count)
            .with_optional_title(self.left_title().as_deref());
        if let Some(grid) = &style.grid {
            left_axis = left_axis.with_grid(grid.clone());
        }
        out.extend(left_axis.marks(&AxisScale::Continuous(layout.left), plot, measurer));

        if let Some(right) = layout.right {
            let right_axis = AxisSpec::right(frame.region(region::AXIS_RIGHT))
                .with_style(style.axis.clone())
                .with_tick_count(self.tick_count)
                .with_optional_title(self.y_unit_right_label.as_deref());
            out.extend(right_axis.marks(&AxisScale::Continuous(right), plot, measurer));
        }

        for i in 0..self.series.len() {
            let color = self.color(style, i);
            let id_base = frame.series_region(i);
            let y_scale = layout.y_scale(i);
            let stroke = StrokeStyle::solid(color, style.line_width);
            if let Some(bands) = &layout.bands[i] {
                if bands.iter().all(Option::is_none) {
                    continue;
                }
                let area = AreaMarkSpec::new(id_base, layout.x_scale, y_scale)
                    .with_fill(color.with_alpha(style.area_opacity))
                    .with_stroke(stroke);
                out.extend(area.marks(bands));
            } else {
                let samples = &layout.samples[i];
                if samples.iter().all(Sample::is_gap) {
                    continue;
                }
                let line = LineMarkSpec::new(MarkId::from_raw(id_base), layout.x_scale, y_scale)
                    .with_stroke(stroke);
                out.push(line.mark(samples));
            }
        }

        out.extend(threshold_marks(
            frame.region(region::THRESHOLDS),
            &self.thresholds,
            &layout.x_scale,
            &layout.left,
            plot,
            style.font_size,
        ));

        let items = (0..self.series.len())
            .map(|i| LegendItem::solid(self.series[i].label(), self.color(style, i)))
            .collect();
        out.extend(frame.legend(plot, items));

        if let Some(state) = hover {
            out.extend(self.overlay(frame, plot, layout, state));
        }
        out
    }

    fn overlay(
        &self,
        frame: &ChartFrame,
        plot: Rect,
        layout: &XyLayout,
        state: &TooltipState,
    ) -> Vec<Mark> {
        let cx = layout.x_scale.map(state.x);
        if !(cx.is_finite() && cx >= plot.x0 && cx <= plot.x1) {
            return Vec::new();
        }
        let hits = TooltipController::hits_at(state.x, layout.samples.iter().map(Vec::as_slice));
        let mut markers = Vec::with_capacity(hits.len());
        let mut rows = Vec::with_capacity(hits.len());
        for hit in &hits {
            let i = hit.series;
            let color = self.color(&frame.style, i);
            let y = layout.drawn_y(i, hit.datum.index, hit.datum.y);
            let pt = Point::new(layout.x_scale.map(hit.datum.x), layout.y_scale(i).map(y));
            markers.push((pt, color));
            rows.push(TooltipRow {
                text: format!("{}: {}", self.series[i].label(), format_value(hit.datum.y)),
                color,
            });
        }
        let title_x = hits
            .iter()
            .map(|h| h.datum.x)
            .min_by(|a, b| (a - state.x).abs().total_cmp(&(b - state.x).abs()))
            .unwrap_or(state.x);

        TooltipOverlay {
            id_base: frame.region(region::TOOLTIP),
            crosshair_x: Some(cx),
            markers,
            title: self.format_x(title_x, layout),
            rows,
        }
        .marks(plot, &frame.style, &*frame.measurer)
    }
}

impl<R> XyChart<R> {
    /// Creates a chart over `data`, reading x with `x`.
    ///
    /// `id_base` is the start of the chart's mark-id range, usually from
    /// [`tandem_core::IdSource::next_base`].
    pub fn new<X>(id_base: u64, size: Size, data: impl Into<Rc<[R]>>, x: X) -> Self
    where
        X: Accessor<R> + 'static,
        X::Value: IntoX,
    {
        Self {
            frame: ChartFrame::new(id_base, size),
            config: XyConfig {
                data: data.into(),
                x: erase_x(x),
                x_kind: ContinuousKind::Linear,
                series: Vec::new(),
                stacked: false,
                has_right_axis: false,
                tick_count: 5,
                y_label: None,
                y_unit_left_label: None,
                y_unit_right_label: None,
                thresholds: Vec::new(),
            },
            revision: 0,
            cache: DomainCache::new(),
            hover: HoverSlot::default(),
        }
    }

    /// Creates a chart with one series per distinct key of `records`.
    ///
    /// Series appear in first-appearance order of their keys and each owns its group's records.
    pub fn from_keyed<K, KA, X, Y>(
        id_base: u64,
        size: Size,
        records: &[R],
        key_of: KA,
        x: X,
        y: Y,
    ) -> Result<Self, ChartError>
    where
        R: Clone,
        K: Clone + Eq + core::hash::Hash + Into<String>,
        KA: Accessor<R, Value = K>,
        X: Accessor<R> + 'static,
        X::Value: IntoX,
        Y: Accessor<R> + Clone + 'static,
        Y::Value: IntoY,
    {
        let groups = regroup(records, &key_of)?;
        let series = groups
            .into_iter()
            .map(|(key, rows)| Series::new(key, y.clone()).with_data(rows.into()))
            .collect();
        let mut chart = Self::new(id_base, size, Vec::new(), x);
        chart.set_series(series);
        Ok(chart)
    }
}

impl<R> XyChart<R> {
    /// Adds a series.
    pub fn with_series(mut self, series: Series<R>) -> Self {
        self.config.series.push(series);
        self.revision += 1;
        self
    }

    /// Sets the margins between the surface edge and the plot.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.frame.margin = margin;
        self
    }

    /// Sets the visual style.
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.frame.style = style;
        self
    }

    /// Sets the text measurer used to lay out axes, legend and tooltip.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.frame.measurer = Rc::new(measurer);
        self
    }

    /// Sets the x scale kind; [`ContinuousKind::Time`] reads x as Unix seconds.
    pub fn with_x_kind(mut self, kind: ContinuousKind) -> Self {
        self.config.x_kind = kind;
        self.revision += 1;
        self
    }

    /// Reads x as Unix seconds and labels the x axis with dates and times.
    pub fn time(self) -> Self {
        self.with_x_kind(ContinuousKind::Time)
    }

    /// Stacks the area series of each axis in series order.
    pub fn stacked(mut self, stacked: bool) -> Self {
        self.config.stacked = stacked;
        self.revision += 1;
        self
    }

    /// Enables the right y axis; without it, right-axis series use the left axis.
    pub fn with_right_axis(mut self, has_right_axis: bool) -> Self {
        self.config.has_right_axis = has_right_axis;
        self.revision += 1;
        self
    }

    /// Sets the y caption shown on the left axis.
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.config.y_label = Some(label.into());
        self
    }

    /// Sets the unit caption of the left axis.
    pub fn with_y_unit_left_label(mut self, label: impl Into<String>) -> Self {
        self.config.y_unit_left_label = Some(label.into());
        self
    }

    /// Sets the unit caption of the right axis.
    pub fn with_y_unit_right_label(mut self, label: impl Into<String>) -> Self {
        self.config.y_unit_right_label = Some(label.into());
        self
    }

    /// Sets the threshold overlays.
    pub fn with_thresholds(mut self, thresholds: Vec<Threshold>) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    /// Sets the approximate number of ticks per axis.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.config.tick_count = tick_count.max(1);
        self.revision += 1;
        self
    }

    /// Links the chart to `bus`.
    pub fn with_link(mut self, bus: &SyncBus) -> Self {
        self.link(bus);
        self
    }

    /// Replaces the chart's records.
    ///
    /// The layout is only recomputed if `data` is a different allocation.
    pub fn set_data(&mut self, data: Rc<[R]>) {
        if !Rc::ptr_eq(&self.config.data, &data) {
            self.config.data = data;
            self.revision += 1;
        }
    }

    /// Replaces the series list.
    pub fn set_series(&mut self, series: Vec<Series<R>>) {
        self.config.series = series;
        self.revision += 1;
    }

    /// Replaces the threshold overlays.
    pub fn set_thresholds(&mut self, thresholds: Vec<Threshold>) {
        self.config.thresholds = thresholds;
    }

    /// Resizes the chart surface.
    pub fn set_size(&mut self, size: Size) {
        self.frame.size = size;
    }

    /// Subscribes to `bus`, replacing any previous link.
    ///
    /// The chart then renders whatever hover state the bus carries, including its own.
    pub fn link(&mut self, bus: &SyncBus) {
        self.hover.link(bus);
    }

    /// Detaches from the bus, clearing the shared hover if this chart published it.
    pub fn unlink(&mut self) {
        self.hover.unlink();
    }

    /// Returns the bus this chart is linked to.
    pub fn bus(&self) -> Option<&SyncBus> {
        self.hover.bus()
    }

    /// Handles a pointer at `offset_x` pixels from the chart's left edge.
    ///
    /// The state is computed completely, then published (or kept locally when unlinked).
    /// Outside the plot this behaves like [`XyChart::pointer_leave`].
    pub fn pointer_move(&mut self, offset_x: f64) -> Result<Option<TooltipState>, ChartError> {
        let plot = self.frame.plot();
        if !(offset_x >= plot.x0 && offset_x <= plot.x1) {
            self.pointer_leave();
            return Ok(None);
        }
        let layout = self
            .cache
            .get_or_try_insert_with(self.revision, plot, || self.config.layout(plot))?;
        let keys = self.config.series.iter().map(Series::key);
        let (state, _) = TooltipController::locate(
            &layout.x_scale,
            keys.zip(layout.samples.iter().map(Vec::as_slice)),
            offset_x,
        );
        self.hover.publish(Some(state.clone()));
        Ok(Some(state))
    }

    /// Clears the hover.
    pub fn pointer_leave(&mut self) {
        self.hover.publish(None);
    }

    /// Returns the hover state this chart renders.
    pub fn hover(&self) -> Option<TooltipState> {
        self.hover.current()
    }

    /// Renders the chart into its scene and returns the mark changes.
    pub fn render(&mut self) -> Result<Vec<MarkDiff>, ChartError> {
        let hover = self.hover();
        let plot = self.frame.plot();
        let layout = self
            .cache
            .get_or_try_insert_with(self.revision, plot, || self.config.layout(plot))?;
        let marks = self.config.marks(&self.frame, plot, layout, hover.as_ref());
        Ok(self.frame.commit("xy", marks))
    }

    /// Returns the rendered scene.
    pub fn scene(&self) -> &Scene {
        &self.frame.scene
    }

    /// Serializes the rendered scene as SVG.
    pub fn to_svg(&self) -> String {
        self.frame.to_svg()
    }

    /// Returns the plot rectangle.
    pub fn plot(&self) -> Rect {
        self.frame.plot()
    }

    /// Returns the series.
    pub fn series(&self) -> &[Series<R>] {
        &self.config.series
    }

    /// Returns the record at `index` of series `series`.
    pub fn record(&self, series: usize, index: usize) -> Option<&R> {
        self.config
            .series
            .get(series)?
            .records(&self.config.data)
            .get(index)
    }

    /// Returns the x scale of the last layout.
    pub fn x_scale(&self) -> Option<ScaleContinuous> {
        self.cache.get().map(|l| l.x_scale)
    }

    /// Returns the y scale of `side` from the last layout.
    pub fn y_scale(&self, side: AxisSide) -> Option<ScaleContinuous> {
        let layout = self.cache.get()?;
        match side {
            AxisSide::Left => Some(layout.left),
            AxisSide::Right => layout.right,
        }
    }

    /// Returns how many times the layout has been computed.
    pub fn layout_recomputations(&self) -> u64 {
        self.cache.recomputations()
    }
}
