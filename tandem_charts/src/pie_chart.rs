// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie and donut charts over `key -> value` records.

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Color;
use tandem_core::{Mark, MarkDiff, MarkId, Scene, TextAnchor, TextBaseline};

use crate::accessor::{Accessor, IntoY, KeyFn, YFn, erase_key, erase_y};
use crate::axis::StrokeStyle;
use crate::domain::DomainCache;
use crate::error::ChartError;
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::frame::{ChartFrame, ensure_capacity, region};
use crate::layout::{Margin, Size};
use crate::legend::{ITEM_CAPACITY, LegendItem};
use crate::measure::TextMeasurer;
use crate::sector_mark::{SectorMarkSpec, pie_angles};
use crate::style::ChartStyle;
use crate::z_order;

/// One slice of a pie.
///
/// Angles are in radians, clockwise from 12 o'clock.
#[derive(Clone, Debug, PartialEq)]
pub struct Wedge {
    /// The record's key.
    pub key: String,
    /// The value after clamping (gaps and negatives are `0`).
    pub value: f64,
    /// Start angle.
    pub start: f64,
    /// End angle; equal to `start` for zero values.
    pub end: f64,
    /// Index of the record.
    pub record: usize,
}

impl Wedge {
    /// Returns the angular extent.
    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }
}

type ChangeFn = Box<dyn FnMut(&str)>;

/// Wedges narrower than this (in radians) get no percentage label.
const MIN_LABEL_SWEEP: f64 = 0.3;

/// A pie chart: one wedge per record, sized by its share of the total.
pub struct PieChart<R> {
    frame: ChartFrame,
    config: PieConfig<R>,
    revision: u64,
    cache: DomainCache<Rc<[Wedge]>>,
    inner_radius: f64,
    selected: Option<String>,
    on_change: Option<ChangeFn>,
}

impl<R> core::fmt::Debug for PieChart<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PieChart")
            .field("frame", &self.frame)
            .field("records", &self.config.data.len())
            .field("revision", &self.revision)
            .field("inner_radius", &self.inner_radius)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

struct PieConfig<R> {
    data: Rc<[R]>,
    key: KeyFn<R>,
    value: YFn<R>,
}

impl<R> PieConfig<R> {
    fn wedges(&self) -> Result<Rc<[Wedge]>, ChartError> {
        // Every wedge also gets a legend entry.
        ensure_capacity("wedges", self.data.len(), ITEM_CAPACITY)?;
        let mut keys = Vec::with_capacity(self.data.len());
        let mut values = Vec::with_capacity(self.data.len());
        for (index, row) in self.data.iter().enumerate() {
            let key = (self.key)(row).map_err(|source| ChartError::Accessor {
                series: "key".into(),
                index,
                source,
            })?;
            let value = (self.value)(row)
                .map_err(|source| ChartError::Accessor {
                    series: "value".into(),
                    index,
                    source,
                })?
                .unwrap_or(0.0);
            if value < 0.0 {
                tracing::warn!(key = key.as_str(), value, "negative pie value treated as zero");
            }
            keys.push(key);
            values.push(value.max(0.0));
        }
        Ok(pie_angles(&values)
            .into_iter()
            .zip(keys.into_iter().zip(values))
            .enumerate()
            .map(|(record, ((start, end), (key, value)))| Wedge {
                key,
                value,
                start,
                end,
                record,
            })
            .collect())
    }
}

impl<R> PieChart<R> {
    /// Creates a pie chart reading each record's key and value.
    pub fn new<K, V>(
        id_base: u64,
        size: Size,
        data: impl Into<Rc<[R]>>,
        key: K,
        value: V,
    ) -> Self
    where
        K: Accessor<R> + 'static,
        K::Value: Into<String>,
        V: Accessor<R> + 'static,
        V::Value: IntoY,
    {
        Self {
            frame: ChartFrame::new(id_base, size),
            config: PieConfig {
                data: data.into(),
                key: erase_key(key),
                value: erase_y(value),
            },
            revision: 0,
            cache: DomainCache::new(),
            inner_radius: 0.0,
            selected: None,
            on_change: None,
        }
    }

    /// Cuts a hole of `radius` pixels, turning the pie into a donut.
    pub fn with_inner_radius(mut self, radius: f64) -> Self {
        self.inner_radius = radius.max(0.0);
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

    /// Sets the callback invoked with the key of a clicked wedge.
    pub fn on_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Replaces the records; a pointer-equal `data` keeps the cached wedges.
    pub fn set_data(&mut self, data: Rc<[R]>) {
        if !Rc::ptr_eq(&self.config.data, &data) {
            self.config.data = data;
            self.revision += 1;
        }
    }

    /// Returns the selected key.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Returns one wedge per record, in record order.
    ///
    /// Wedges start at 12 o'clock and sweep clockwise; together they cover exactly one turn
    /// unless every value is zero. The records are only read again after [`PieChart::set_data`]
    /// replaces them or the plot is resized.
    pub fn wedges(&mut self) -> Result<Rc<[Wedge]>, ChartError> {
        let plot = self.frame.plot();
        let wedges = self
            .cache
            .get_or_try_insert_with(self.revision, plot, || self.config.wedges())?;
        Ok(Rc::clone(wedges))
    }

    /// Returns how many times the wedges have been computed.
    pub fn layout_recomputations(&self) -> u64 {
        self.cache.recomputations()
    }

    fn geometry(&self) -> (Point, f64, f64) {
        let plot = self.frame.plot();
        let outer = 0.5 * plot.width().min(plot.height());
        (plot.center(), self.inner_radius.min(outer), outer)
    }

    fn sector(&self, wedge: &Wedge) -> SectorMarkSpec {
        let (center, inner, outer) = self.geometry();
        let id = MarkId::from_raw(self.frame.series_region(0) + wedge.record as u64);
        SectorMarkSpec::new(id, center, inner, outer, wedge.start, wedge.end)
    }

    /// Hit-tests `point`, selects the wedge under it and reports its key to the callback.
    pub fn click(&mut self, point: Point) -> Result<Option<String>, ChartError> {
        let wedges = self.wedges()?;
        let Some(wedge) = wedges
            .iter()
            .find(|w| w.sweep() > 0.0 && self.sector(w).contains(point))
        else {
            return Ok(None);
        };
        tracing::debug!(key = wedge.key.as_str(), "wedge selected");
        self.selected = Some(wedge.key.clone());
        if let Some(callback) = self.on_change.as_mut() {
            callback(&wedge.key);
        }
        Ok(Some(wedge.key.clone()))
    }

    fn marks(&self, wedges: &[Wedge]) -> Vec<Mark> {
        let style = &self.frame.style;
        let plot = self.frame.plot();
        let total: f64 = wedges.iter().map(|w| w.value).sum();
        let labels = self.frame.region(region::LABELS);
        let mut out = Vec::new();
        out.extend(self.frame.background(plot));

        for (i, wedge) in wedges.iter().enumerate() {
            if wedge.sweep() <= 0.0 {
                continue;
            }
            let mut sector = self.sector(wedge).with_fill(style.color(i));
            if self.selected.as_deref() == Some(wedge.key.as_str()) {
                sector = sector.with_stroke(StrokeStyle::solid(Color::BLACK, 2.0));
                sector.z_index = z_order::SERIES_STROKE;
            } else {
                sector = sector.with_stroke(StrokeStyle::solid(Color::WHITE, 1.0));
            }
            out.push(sector.mark());

            if wedge.sweep() >= MIN_LABEL_SWEEP && total > 0.0 {
                let at = sector.centroid();
                let percent = (100.0 * wedge.value / total).round();
                out.push(
                    Mark::builder(MarkId::from_raw(labels + wedge.record as u64))
                        .text()
                        .z_index(z_order::AXIS_LABELS)
                        .at(at.x, at.y)
                        .text(format!("{percent}%"))
                        .font_size(style.font_size)
                        .fill(Color::WHITE)
                        .anchor(TextAnchor::Middle)
                        .baseline(TextBaseline::Middle)
                        .build(),
                );
            }
        }

        let items = wedges
            .iter()
            .enumerate()
            .map(|(i, w)| LegendItem::solid(w.key.as_str(), style.color(i)))
            .collect();
        out.extend(self.frame.legend(self.frame.view().inset(-4.0), items));
        out
    }

    /// Renders the chart into its scene and returns the mark changes.
    pub fn render(&mut self) -> Result<Vec<MarkDiff>, ChartError> {
        let wedges = self.wedges()?;
        if wedges.iter().all(|w| w.sweep() == 0.0) && !wedges.is_empty() {
            tracing::debug!("pie total is zero; no wedges drawn");
        }
        let marks = self.marks(&wedges);
        Ok(self.frame.commit("pie", marks))
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
    use core::cell::{Cell, RefCell};
    use core::f64::consts::TAU;

    use super::*;

    type Share = (&'static str, f64);

    fn pie(data: Vec<Share>) -> PieChart<Share> {
        PieChart::new(0, Size::new(200.0, 200.0), data, |s: &Share| s.0, |s: &Share| s.1)
            .with_margin(Margin::uniform(0.0))
    }

    #[test]
    fn negative_values_count_as_zero() {
        let wedges = pie(vec![("a", -5.0), ("b", 1.0), ("c", 3.0)]).wedges().unwrap();
        assert_eq!(wedges[0].value, 0.0);
        assert_eq!(wedges[0].sweep(), 0.0);
        assert!((wedges[1].sweep().to_degrees() - 90.0).abs() < 1e-9);
        assert_eq!(wedges[2].end, TAU);
    }

    #[test]
    fn click_selects_and_notifies() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut chart = pie(vec![("first", 1.0), ("second", 1.0)])
            .on_change(move |key| sink.borrow_mut().push(key.into()));
        // The first half sweeps clockwise from 12 o'clock, so it covers the right side.
        let key = chart.click(Point::new(150.0, 100.0)).unwrap();
        assert_eq!(key.as_deref(), Some("first"));
        assert_eq!(chart.selected(), Some("first"));
        assert_eq!(chart.click(Point::new(50.0, 100.0)).unwrap().as_deref(), Some("second"));
        assert_eq!(chart.click(Point::new(0.0, 0.0)).unwrap(), None);
        assert_eq!(*seen.borrow(), vec![String::from("first"), String::from("second")]);
    }

    #[test]
    fn donut_holes_are_not_hit() {
        let mut chart = pie(vec![("only", 1.0)]).with_inner_radius(40.0);
        assert_eq!(chart.click(Point::new(110.0, 100.0)).unwrap(), None);
        assert_eq!(chart.click(Point::new(170.0, 100.0)).unwrap().as_deref(), Some("only"));
    }

    #[test]
    fn unchanged_records_are_read_once() {
        let reads = Rc::new(Cell::new(0_usize));
        let counter = Rc::clone(&reads);
        let data: Rc<[Share]> = Rc::from(vec![("a", 1.0), ("b", 3.0)]);
        let mut chart = PieChart::new(
            0,
            Size::new(200.0, 200.0),
            Rc::clone(&data),
            |s: &Share| s.0,
            move |s: &Share| {
                counter.set(counter.get() + 1);
                s.1
            },
        )
        .with_margin(Margin::uniform(0.0));

        chart.render().unwrap();
        assert_eq!(reads.get(), 2, "one value read per record");
        chart.click(Point::new(150.0, 100.0)).unwrap();
        chart.render().unwrap();
        chart.set_data(Rc::clone(&data));
        chart.render().unwrap();
        assert_eq!(reads.get(), 2, "selection and identical data reuse the wedges");
        assert_eq!(chart.layout_recomputations(), 1);

        chart.set_data(Rc::from(vec![("c", 2.0)]));
        chart.render().unwrap();
        assert_eq!(reads.get(), 3, "new records are read");
        assert_eq!(chart.layout_recomputations(), 2);
    }

    #[test]
    fn more_wedges_than_legend_ids_is_an_error() {
        let cap = ITEM_CAPACITY as usize;
        assert_eq!(pie(vec![("w", 1.0); cap]).wedges().unwrap().len(), cap);
        let err = pie(vec![("w", 1.0); cap + 1]).wedges().unwrap_err();
        assert_eq!(
            err,
            ChartError::TooManyMarks {
                what: "wedges",
                count: cap + 1,
                capacity: ITEM_CAPACITY,
            }
        );
    }
}
