// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Categorical bar charts with optional side-by-side grouping.

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use peniko::Color;
use tandem_core::{Mark, MarkDiff, Scene};

use crate::accessor::{Accessor, IntoY, KeyFn, YFn, erase_key, erase_y};
use crate::axis::{AxisScale, AxisSpec, TICK_CAPACITY};
use crate::bar_mark::{Bar, BarMarkSpec};
use crate::domain::{DomainCache, baseline, extent, include, resolve_domain};
use crate::error::{AccessError, ChartError};
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::format::format_value;
use crate::frame::{ChartFrame, ensure_capacity, region};
use crate::layout::{Margin, Size};
use crate::legend::{ITEM_CAPACITY, LegendItem};
use crate::measure::TextMeasurer;
use crate::scale::{ContinuousKind, ScaleBand, ScaleContinuous, ScaleLinearSpec};
use crate::style::ChartStyle;
use crate::sync::{HoverSlot, SyncBus};
use crate::tooltip::{Datum, TooltipOverlay, TooltipRow, TooltipState};

/// Callback invoked with the record index and record of a clicked bar.
type ClickFn<R> = Box<dyn FnMut(usize, &R)>;

/// A bar chart: one bar per record, placed in the band of its category.
///
/// Records sharing a category sit side by side. With a group accessor, bars within a band are
/// ordered by the first appearance of their group across all records and colored per group.
pub struct BarChart<R> {
    frame: ChartFrame,
    config: BarConfig<R>,
    revision: u64,
    cache: DomainCache<BarLayout>,
    hover: HoverSlot,
    on_click: Option<ClickFn<R>>,
}

impl<R> core::fmt::Debug for BarChart<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BarChart")
            .field("frame", &self.frame)
            .field("records", &self.config.data.len())
            .field("grouped", &self.config.group.is_some())
            .field("gap", &self.config.gap)
            .field("revision", &self.revision)
            .field("hover", &self.hover)
            .finish_non_exhaustive()
    }
}

struct BarConfig<R> {
    data: Rc<[R]>,
    category: KeyFn<R>,
    value: YFn<R>,
    group: Option<KeyFn<R>>,
    gap: f64,
    padding: (f64, f64),
    tick_count: usize,
    y_label: Option<String>,
}

#[derive(Clone, Copy, Debug)]
struct PlacedBar {
    record: usize,
    band: usize,
    slot: usize,
    slots: usize,
    value: Option<f64>,
    group: Option<usize>,
}

#[derive(Clone, Debug)]
struct BarLayout {
    categories: Vec<String>,
    groups: Vec<String>,
    band: ScaleBand,
    y_scale: ScaleContinuous,
    bars: Vec<PlacedBar>,
}

fn first_appearance(
    slots: &mut HashMap<String, usize>,
    names: &mut Vec<String>,
    key: String,
) -> usize {
    *slots.entry(key).or_insert_with_key(|key| {
        names.push(key.clone());
        names.len() - 1
    })
}

impl<R> BarConfig<R> {
    fn read<T>(
        &self,
        what: &str,
        index: usize,
        result: Result<T, AccessError>,
    ) -> Result<T, ChartError> {
        result.map_err(|source| ChartError::Accessor {
            series: what.into(),
            index,
            source,
        })
    }

    fn layout(&self, plot: Rect) -> Result<BarLayout, ChartError> {
        ensure_capacity("bars", self.data.len(), region::REGION_SIZE)?;
        let mut categories = Vec::new();
        let mut category_slots = HashMap::new();
        let mut groups = Vec::new();
        let mut group_slots = HashMap::new();
        let mut bars = Vec::with_capacity(self.data.len());

        for (record, row) in self.data.iter().enumerate() {
            let category = self.read("category", record, (self.category)(row))?;
            let value = self.read("value", record, (self.value)(row))?;
            let group = match &self.group {
                Some(group_of) => {
                    let key = self.read("group", record, group_of(row))?;
                    Some(first_appearance(&mut group_slots, &mut groups, key))
                }
                None => None,
            };
            bars.push(PlacedBar {
                record,
                band: first_appearance(&mut category_slots, &mut categories, category),
                slot: 0,
                slots: 0,
                value,
                group,
            });
        }

        ensure_capacity("categories", categories.len(), TICK_CAPACITY)?;
        ensure_capacity("groups", groups.len(), ITEM_CAPACITY)?;

        // Within a band, grouped bars follow the global group order; others keep record order.
        let mut per_band: Vec<Vec<usize>> = alloc::vec![Vec::new(); categories.len()];
        for (k, bar) in bars.iter().enumerate() {
            per_band[bar.band].push(k);
        }
        let widest = per_band.iter().map(Vec::len).max().unwrap_or(0);
        ensure_capacity("bars in one band", widest, TooltipOverlay::ROW_CAPACITY)?;
        for members in &mut per_band {
            members.sort_by_key(|&k| bars[k].group);
            let slots = members.len();
            for (slot, &k) in members.iter().enumerate() {
                bars[k].slot = slot;
                bars[k].slots = slots;
            }
        }

        let values = bars.iter().filter_map(|b| b.value);
        let domain = extent(values).map(|d| include(d, 0.0));
        let domain = ScaleLinearSpec::new(resolve_domain(domain))
            .with_nice(true)
            .resolved_domain(self.tick_count);

        Ok(BarLayout {
            band: ScaleBand::new((plot.x0, plot.x1), categories.len())
                .with_padding(self.padding.0, self.padding.1),
            y_scale: ScaleContinuous::new(ContinuousKind::Linear, domain, (plot.y1, plot.y0)),
            categories,
            groups,
            bars,
        })
    }

    fn fill(style: &ChartStyle, bar: &PlacedBar) -> Color {
        style.color(bar.group.unwrap_or(0))
    }

    fn bar_spec(&self, frame: &ChartFrame, layout: &BarLayout) -> BarMarkSpec {
        BarMarkSpec::new(frame.series_region(0), layout.band, layout.y_scale)
            .with_baseline(baseline(layout.y_scale.domain()))
            .with_gap(self.gap)
    }

    /// Returns the non-gap bar of `band` horizontally closest to `offset_x`, with its value.
    ///
    /// A bar containing `offset_x` has distance zero; ties go to the earlier slot.
    fn bar_near<'a>(
        spec: &BarMarkSpec,
        layout: &'a BarLayout,
        band: usize,
        offset_x: f64,
    ) -> Option<(&'a PlacedBar, f64)> {
        let mut candidates: Vec<(&PlacedBar, f64)> = layout
            .bars
            .iter()
            .filter(|b| b.band == band)
            .filter_map(|b| b.value.map(|y| (b, y)))
            .collect();
        candidates.sort_by_key(|(b, _)| b.slot);
        let distance = |bar: &PlacedBar, value: f64| {
            let rect = spec.rect(&Bar {
                band: bar.band,
                slot: bar.slot,
                slots: bar.slots,
                value,
                fill: Color::TRANSPARENT.into(),
            });
            (rect.x0 - offset_x).max(offset_x - rect.x1).max(0.0)
        };
        candidates
            .into_iter()
            .min_by(|(a, ya), (b, yb)| distance(a, *ya).total_cmp(&distance(b, *yb)))
    }

    fn marks(
        &self,
        frame: &ChartFrame,
        plot: Rect,
        layout: &BarLayout,
        hover: Option<&TooltipState>,
    ) -> Vec<Mark> {
        let style = &frame.style;
        let measurer = &*frame.measurer;
        let mut out = Vec::new();
        out.extend(frame.background(plot));

        let x_axis = AxisSpec::bottom(frame.region(region::AXIS_X)).with_style(style.axis.clone());
        out.extend(x_axis.marks(
            &AxisScale::Band(layout.band, &layout.categories),
            plot,
            measurer,
        ));
        let mut y_axis = AxisSpec::left(frame.region(region::AXIS_LEFT))
            .with_style(style.axis.clone())
            .with_tick_count(self.tick_count)
            .with_optional_title(self.y_label.as_deref());
        if let Some(grid) = &style.grid {
            y_axis = y_axis.with_grid(grid.clone());
        }
        out.extend(y_axis.marks(&AxisScale::Continuous(layout.y_scale), plot, measurer));

        let bars: Vec<Bar> = layout
            .bars
            .iter()
            .filter_map(|b| {
                Some(Bar {
                    band: b.band,
                    slot: b.slot,
                    slots: b.slots,
                    value: b.value?,
                    fill: Self::fill(style, b).into(),
                })
            })
            .collect();
        out.extend(self.bar_spec(frame, layout).marks(&bars));

        let items = layout
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| LegendItem::solid(g.as_str(), style.color(i)))
            .collect();
        out.extend(frame.legend(plot, items));

        if let Some(state) = hover {
            out.extend(self.overlay(frame, plot, layout, state));
        }
        out
    }

    /// Hover states carry the band index in `x`.
    fn overlay(
        &self,
        frame: &ChartFrame,
        plot: Rect,
        layout: &BarLayout,
        state: &TooltipState,
    ) -> Vec<Mark> {
        let Some(band) = band_of(state, layout.categories.len()) else {
            return Vec::new();
        };
        let rows = layout
            .bars
            .iter()
            .filter(|b| b.band == band)
            .map(|b| {
                let name = b.group.map_or(&layout.categories[band], |g| &layout.groups[g]);
                TooltipRow {
                    text: format!("{name}: {}", b.value.map_or_else(|| "-".into(), format_value)),
                    color: Self::fill(&frame.style, b),
                }
            })
            .collect();
        TooltipOverlay {
            id_base: frame.region(region::TOOLTIP),
            crosshair_x: Some(layout.band.center(band)),
            markers: Vec::new(),
            title: layout.categories[band].clone(),
            rows,
        }
        .marks(plot, &frame.style, &*frame.measurer)
    }
}

fn band_of(state: &TooltipState, count: usize) -> Option<usize> {
    let x = state.x;
    if !(x >= 0.0 && x < count as f64 && x == x.floor()) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, reason = "checked to be a whole band index")]
    let band = x as usize;
    Some(band)
}

impl<R> BarChart<R> {
    /// Creates a bar chart over `data` with a category and a value accessor.
    pub fn new<C, V>(
        id_base: u64,
        size: Size,
        data: impl Into<Rc<[R]>>,
        category: C,
        value: V,
    ) -> Self
    where
        C: Accessor<R> + 'static,
        C::Value: Into<String>,
        V: Accessor<R> + 'static,
        V::Value: IntoY,
    {
        Self {
            frame: ChartFrame::new(id_base, size),
            config: BarConfig {
                data: data.into(),
                category: erase_key(category),
                value: erase_y(value),
                group: None,
                gap: BarMarkSpec::DEFAULT_GAP,
                padding: (ScaleBand::DEFAULT_PADDING, ScaleBand::DEFAULT_PADDING),
                tick_count: 5,
                y_label: None,
            },
            revision: 0,
            cache: DomainCache::new(),
            hover: HoverSlot::default(),
            on_click: None,
        }
    }

    /// Groups bars within a band by `group`, coloring and ordering them per group.
    pub fn with_group<G>(mut self, group: G) -> Self
    where
        G: Accessor<R> + 'static,
        G::Value: Into<String>,
    {
        self.config.group = Some(erase_key(group));
        self.revision += 1;
        self
    }

    /// Sets the pixel gap between bars sharing a band.
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.config.gap = gap.max(0.0);
        self
    }

    /// Sets the inner and outer band padding, in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.config.padding = (inner, outer);
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

    /// Sets the text measurer.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.frame.measurer = Rc::new(measurer);
        self
    }

    /// Sets the y axis caption.
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.config.y_label = Some(label.into());
        self
    }

    /// Sets the callback invoked by [`BarChart::click`].
    pub fn on_click(mut self, callback: impl FnMut(usize, &R) + 'static) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }

    /// Links the chart to `bus`.
    pub fn with_link(mut self, bus: &SyncBus) -> Self {
        self.hover.link(bus);
        self
    }

    /// Replaces the records; a pointer-equal `data` keeps the cached layout.
    pub fn set_data(&mut self, data: Rc<[R]>) {
        if !Rc::ptr_eq(&self.config.data, &data) {
            self.config.data = data;
            self.revision += 1;
        }
    }

    /// Subscribes to `bus`, replacing any previous link.
    pub fn link(&mut self, bus: &SyncBus) {
        self.hover.link(bus);
    }

    /// Detaches from the bus, clearing the shared hover if this chart published it.
    pub fn unlink(&mut self) {
        self.hover.unlink();
    }

    /// Handles a pointer at `offset_x` pixels by inverting it through the band scale.
    ///
    /// The state's `x` is the band index. Outside every band the hover is cleared.
    pub fn pointer_move(&mut self, offset_x: f64) -> Result<Option<TooltipState>, ChartError> {
        let plot = self.frame.plot();
        let layout = self
            .cache
            .get_or_try_insert_with(self.revision, plot, || self.config.layout(plot))?;
        let Some(band) = layout.band.invert(offset_x) else {
            self.hover.publish(None);
            return Ok(None);
        };
        let spec = self.config.bar_spec(&self.frame, layout);
        let active = BarConfig::<R>::bar_near(&spec, layout, band, offset_x);
        let state = TooltipState {
            pointer_offset_x: offset_x,
            x: band as f64,
            active_datum: active.map(|(b, y)| Datum {
                index: b.record,
                x: band as f64,
                y,
            }),
            active_series_key: active.map(|(b, _)| match b.group {
                Some(g) => layout.groups[g].clone(),
                None => layout.categories[band].clone(),
            }),
        };
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

    /// Hit-tests `point` against the bars and reports the clicked record to the callback.
    ///
    /// Returns the clicked record index.
    pub fn click(&mut self, point: Point) -> Result<Option<usize>, ChartError> {
        let plot = self.frame.plot();
        let layout = self
            .cache
            .get_or_try_insert_with(self.revision, plot, || self.config.layout(plot))?;
        let spec = self.config.bar_spec(&self.frame, layout);
        let hit = layout.bars.iter().find(|b| {
            b.value.is_some_and(|value| {
                let bar = Bar {
                    band: b.band,
                    slot: b.slot,
                    slots: b.slots,
                    value,
                    fill: Color::TRANSPARENT.into(),
                };
                spec.rect(&bar).contains(point)
            })
        });
        let Some(record) = hit.map(|b| b.record) else {
            return Ok(None);
        };
        tracing::debug!(record, "bar clicked");
        if let (Some(callback), Some(row)) = (self.on_click.as_mut(), self.config.data.get(record)) {
            callback(record, row);
        }
        Ok(Some(record))
    }

    /// Renders the chart into its scene and returns the mark changes.
    pub fn render(&mut self) -> Result<Vec<MarkDiff>, ChartError> {
        let hover = self.hover.current();
        let plot = self.frame.plot();
        let layout = self
            .cache
            .get_or_try_insert_with(self.revision, plot, || self.config.layout(plot))?;
        let marks = self.config.marks(&self.frame, plot, layout, hover.as_ref());
        Ok(self.frame.commit("bar", marks))
    }

    /// Returns the categories of the last layout, in band order.
    pub fn categories(&self) -> &[String] {
        self.cache.get().map_or(&[][..], |l| l.categories.as_slice())
    }

    /// Returns the band scale of the last layout.
    pub fn band_scale(&self) -> Option<ScaleBand> {
        self.cache.get().map(|l| l.band)
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
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use core::cell::Cell;

    use tandem_core::MarkPayload;

    use super::*;

    #[derive(Clone, Debug)]
    struct Sale {
        month: &'static str,
        region: &'static str,
        units: f64,
    }

    fn sales() -> Vec<Sale> {
        vec![
            Sale { month: "Jan", region: "north", units: 4.0 },
            Sale { month: "Jan", region: "south", units: 6.0 },
            Sale { month: "Feb", region: "south", units: 3.0 },
            Sale { month: "Feb", region: "north", units: 5.0 },
            Sale { month: "Mar", region: "north", units: 2.0 },
        ]
    }

    fn chart() -> BarChart<Sale> {
        BarChart::new(
            0,
            Size::new(400.0, 200.0),
            sales(),
            |s: &Sale| s.month,
            |s: &Sale| s.units,
        )
        .with_group(|s: &Sale| s.region)
    }

    fn rects(chart: &BarChart<Sale>) -> Vec<Rect> {
        let base = region::SERIES * region::REGION_SIZE;
        (0..5)
            .filter_map(|k| match &chart.scene().get(tandem_core::MarkId(base + k))?.payload {
                MarkPayload::Rect(r) => Some(r.rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn grouped_bars_follow_global_group_order() {
        let mut c = chart();
        c.render().unwrap();
        assert_eq!(c.categories(), ["Jan", "Feb", "Mar"]);
        let r = rects(&c);
        assert_eq!(r.len(), 5);
        // Feb lists south first, but north appeared first globally.
        assert!(r[3].x0 < r[2].x0, "north before south within Feb");
        // Mar has a single bar spanning the whole band.
        let band = c.band_scale().unwrap();
        assert!((r[4].width() - band.band_width()).abs() < 1e-9);
        assert!((r[0].width() - (band.band_width() - 2.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn pointer_move_inverts_the_band() {
        let mut c = chart();
        let band = {
            c.render().unwrap();
            c.band_scale().unwrap()
        };
        // The band center falls in the gap between Feb's two bars; the earlier slot wins.
        let state = c.pointer_move(band.center(1)).unwrap().unwrap();
        assert_eq!(state.x, 1.0);
        assert_eq!(state.active_series_key.as_deref(), Some("north"));
        assert_eq!(state.active_datum.map(|d| d.index), Some(3));
        assert_eq!(c.pointer_move(-10.0).unwrap(), None);
        assert_eq!(c.hover(), None);
    }

    #[test]
    fn hover_reports_the_bar_under_the_pointer() {
        let mut c = chart();
        c.render().unwrap();
        let band = c.band_scale().unwrap();

        let over_south = band.x(0) + 0.9 * band.band_width();
        let state = c.pointer_move(over_south).unwrap().unwrap();
        assert_eq!(state.active_series_key.as_deref(), Some("south"));
        assert_eq!(
            state.active_datum,
            Some(Datum { index: 1, x: 0.0, y: 6.0 }),
            "second slot of Jan is south's record"
        );

        let over_north = band.x(0) + 0.1 * band.band_width();
        let state = c.pointer_move(over_north).unwrap().unwrap();
        assert_eq!(state.active_series_key.as_deref(), Some("north"));
        assert_eq!(state.active_datum.map(|d| d.index), Some(0));
    }

    #[test]
    fn click_reports_the_record() {
        let clicked = Rc::new(Cell::new(None));
        let sink = Rc::clone(&clicked);
        let mut c = chart().on_click(move |i, s: &Sale| sink.set(Some((i, s.units))));
        c.render().unwrap();
        let r = rects(&c);
        assert_eq!(c.click(r[1].center()).unwrap(), Some(1));
        assert_eq!(clicked.get(), Some((1, 6.0)));
        assert_eq!(c.click(Point::new(0.0, 0.0)).unwrap(), None);
    }

    #[test]
    fn a_band_wider_than_the_tooltip_is_an_error() {
        type Count = (&'static str, f64);
        let cap = TooltipOverlay::ROW_CAPACITY as usize;
        let band = |n: usize| -> BarChart<Count> {
            BarChart::new(0, Size::new(400.0, 200.0), vec![("a", 1.0); n], |r: &Count| r.0, |r: &Count| r.1)
        };
        assert_eq!(band(cap).click(Point::new(0.0, 0.0)).unwrap(), None);
        assert_eq!(
            band(cap + 1).click(Point::new(0.0, 0.0)).unwrap_err(),
            ChartError::TooManyMarks {
                what: "bars in one band",
                count: cap + 1,
                capacity: TooltipOverlay::ROW_CAPACITY,
            }
        );
    }
}
