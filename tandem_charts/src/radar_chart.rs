// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radar (spider) charts: one spoke per record, one polygon per series.

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use tandem_core::{Mark, MarkDiff, MarkId, Scene, TextAnchor, TextBaseline};

use crate::accessor::{Accessor, KeyFn, erase_key};
use crate::axis::StrokeStyle;
use crate::domain::{DomainCache, extent, include, resolve_domain};
use crate::error::ChartError;
use crate::frame::{ChartFrame, ensure_capacity, region};
use crate::layout::{Margin, Size};
use crate::legend::LegendItem;
use crate::measure::TextMeasurer;
use crate::radar_mark::{RadarMarkSpec, SPOKE_CAPACITY};
use crate::scale::{ScaleLinearSpec, nice_ticks};
use crate::series::Series;
use crate::style::ChartStyle;
use crate::z_order;

/// A radar chart.
///
/// Each record is a category on its own spoke (the first at 12 o'clock, then clockwise). Each
/// series reads one value per record; its polygon connects the values in record order and
/// skips gaps.
pub struct RadarChart<R> {
    frame: ChartFrame,
    config: RadarConfig<R>,
    revision: u64,
    cache: DomainCache<Rc<RadarData>>,
}

struct RadarConfig<R> {
    data: Rc<[R]>,
    category: KeyFn<R>,
    series: Vec<Series<R>>,
    rings: usize,
}

impl<R> core::fmt::Debug for RadarChart<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RadarChart")
            .field("frame", &self.frame)
            .field("records", &self.config.data.len())
            .field("series", &self.config.series)
            .field("rings", &self.config.rings)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// Bound values of a radar chart.
#[derive(Clone, Debug, PartialEq)]
pub struct RadarData {
    /// Spoke labels, in record order.
    pub categories: Vec<String>,
    /// Per series, one value per spoke; `None` is a gap.
    pub values: Vec<Vec<Option<f64>>>,
    /// The value mapped onto the outer radius.
    pub max: f64,
}

impl<R> RadarConfig<R> {
    fn bind(&self) -> Result<RadarData, ChartError> {
        ensure_capacity("categories", self.data.len(), SPOKE_CAPACITY)?;
        ensure_capacity("series", self.series.len(), region::MAX_SERIES)?;
        let categories = self
            .data
            .iter()
            .enumerate()
            .map(|(index, row)| {
                (self.category)(row).map_err(|source| ChartError::Accessor {
                    series: "category".into(),
                    index,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let values = self
            .series
            .iter()
            .map(|s| s.values(&self.data))
            .collect::<Result<Vec<_>, _>>()?;

        let domain = extent(values.iter().flatten().flatten().copied()).map(|d| include(d, 0.0));
        let (_, max) = ScaleLinearSpec::new(resolve_domain(domain))
            .with_nice(true)
            .resolved_domain(self.rings);
        Ok(RadarData {
            categories,
            values,
            max,
        })
    }
}

impl<R> RadarChart<R> {
    /// Creates a radar chart whose spokes are labelled by `category`.
    pub fn new<C>(id_base: u64, size: Size, data: impl Into<Rc<[R]>>, category: C) -> Self
    where
        C: Accessor<R> + 'static,
        C::Value: Into<String>,
    {
        Self {
            frame: ChartFrame::new(id_base, size),
            config: RadarConfig {
                data: data.into(),
                category: erase_key(category),
                series: Vec::new(),
                rings: 4,
            },
            revision: 0,
            cache: DomainCache::new(),
        }
    }

    /// Adds a series.
    pub fn with_series(mut self, series: Series<R>) -> Self {
        self.config.series.push(series);
        self.revision += 1;
        self
    }

    /// Sets the approximate number of grid rings.
    pub fn with_rings(mut self, rings: usize) -> Self {
        self.config.rings = rings.max(1);
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

    /// Replaces the records; a pointer-equal `data` keeps the bound values.
    pub fn set_data(&mut self, data: Rc<[R]>) {
        if !Rc::ptr_eq(&self.config.data, &data) {
            self.config.data = data;
            self.revision += 1;
        }
    }

    /// Binds the records: categories, per-series values and the nice maximum.
    ///
    /// The records are only read again after [`RadarChart::set_data`] replaces them or the
    /// series change.
    pub fn bind(&mut self) -> Result<Rc<RadarData>, ChartError> {
        let plot = self.frame.plot();
        let bound = self
            .cache
            .get_or_try_insert_with(self.revision, plot, || self.config.bind().map(Rc::new))?;
        Ok(Rc::clone(bound))
    }

    /// Returns how many times the records have been bound.
    pub fn layout_recomputations(&self) -> u64 {
        self.cache.recomputations()
    }

    fn geometry(&self) -> (Point, f64) {
        let plot = self.frame.plot();
        let label_room = 2.0 * self.frame.style.font_size;
        let radius = (0.5 * plot.width().min(plot.height()) - label_room).max(0.0);
        (plot.center(), radius)
    }

    fn marks(&self, bound: &RadarData) -> Vec<Mark> {
        let style = &self.frame.style;
        let plot = self.frame.plot();
        let (center, radius) = self.geometry();
        let axes = bound.categories.len();
        let mut out = Vec::new();
        out.extend(self.frame.background(plot));

        let frame_spec = RadarMarkSpec::new(0, center, radius, axes, bound.max);
        let rings: Vec<f64> = nice_ticks(0.0, bound.max, self.config.rings)
            .into_iter()
            .filter(|v| *v > 0.0 && *v <= bound.max)
            .collect();
        let grid = style
            .grid
            .as_ref()
            .map_or_else(StrokeStyle::default, |g| g.stroke.clone());
        out.extend(frame_spec.grid_marks(self.frame.region(region::AXIS_X), &rings, &grid));

        let labels = self.frame.region(region::LABELS);
        for (i, category) in bound.categories.iter().enumerate() {
            let at = frame_spec.at_radius(i, radius + 0.6 * style.font_size);
            let anchor = if (at.x - center.x).abs() < 1.0 {
                TextAnchor::Middle
            } else if at.x > center.x {
                TextAnchor::Start
            } else {
                TextAnchor::End
            };
            out.push(
                Mark::builder(MarkId::from_raw(labels + i as u64))
                    .text()
                    .z_index(z_order::AXIS_LABELS)
                    .at(at.x, at.y)
                    .text(category.clone())
                    .font_size(style.axis.label_font_size)
                    .fill(style.axis.label_fill.clone())
                    .anchor(anchor)
                    .baseline(TextBaseline::Middle)
                    .build(),
            );
        }

        for (i, (series, values)) in self.config.series.iter().zip(&bound.values).enumerate() {
            if values.iter().all(Option::is_none) {
                continue;
            }
            let color = series.color().unwrap_or_else(|| style.color(i));
            let id_base = self.frame.series_region(i);
            let spec = RadarMarkSpec::new(id_base, center, radius, axes, bound.max)
                .with_fill(color.with_alpha(style.area_opacity))
                .with_stroke(StrokeStyle::solid(color, style.line_width));
            out.push(spec.mark(values));
        }

        let items = self
            .config
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                LegendItem::solid(s.label(), s.color().unwrap_or_else(|| style.color(i)))
            })
            .collect();
        out.extend(self.frame.legend(self.frame.view().inset(-4.0), items));
        out
    }

    /// Renders the chart into its scene and returns the mark changes.
    pub fn render(&mut self) -> Result<Vec<MarkDiff>, ChartError> {
        let bound = self.bind()?;
        let marks = self.marks(&bound);
        Ok(self.frame.commit("radar", marks))
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

    use kurbo::PathEl;
    use tandem_core::MarkPayload;

    use super::*;

    type Skill = (&'static str, Option<f64>, f64);

    fn chart() -> RadarChart<Skill> {
        let data: Vec<Skill> = vec![
            ("speed", Some(8.0), 3.0),
            ("range", None, 5.0),
            ("armor", Some(4.0), 7.0),
            ("cost", Some(6.0), 2.0),
        ];
        RadarChart::new(0, Size::new(300.0, 300.0), data, |s: &Skill| s.0)
            .with_series(Series::new("scout", |s: &Skill| s.1))
            .with_series(Series::new("tank", |s: &Skill| s.2))
            .with_style(ChartStyle::default().with_legend(false))
    }

    #[test]
    fn bind_reads_categories_values_and_a_nice_max() {
        let bound = chart().bind().unwrap();
        assert_eq!(bound.categories, ["speed", "range", "armor", "cost"]);
        assert_eq!(bound.values[0], vec![Some(8.0), None, Some(4.0), Some(6.0)]);
        assert!(bound.max >= 8.0);
    }

    #[test]
    fn gaps_drop_their_vertex() {
        let mut c = chart();
        c.render().unwrap();
        let base = region::SERIES * region::REGION_SIZE;
        let Some(MarkPayload::Path(p)) = c.scene().get(MarkId(base)).map(|m| &m.payload) else {
            panic!("expected the first series polygon");
        };
        let vertices = p
            .path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_) | PathEl::LineTo(_)))
            .count();
        assert_eq!(vertices, 3);
    }

    #[test]
    fn spokes_and_labels_are_drawn_per_category() {
        let mut c = chart();
        c.render().unwrap();
        let labels = c
            .scene()
            .marks_in_paint_order()
            .into_iter()
            .filter(|m| matches!(&m.payload, MarkPayload::Text(_)))
            .count();
        assert_eq!(labels, 4);
    }

    #[test]
    fn unchanged_records_are_bound_once() {
        let reads = Rc::new(Cell::new(0_usize));
        let counter = Rc::clone(&reads);
        let data: Rc<[Skill]> = Rc::from(vec![("speed", Some(8.0), 3.0), ("armor", None, 7.0)]);
        let mut c = RadarChart::new(0, Size::new(300.0, 300.0), Rc::clone(&data), |s: &Skill| s.0)
            .with_series(Series::new("tank", move |s: &Skill| {
                counter.set(counter.get() + 1);
                s.2
            }));

        c.render().unwrap();
        c.render().unwrap();
        c.set_data(Rc::clone(&data));
        c.render().unwrap();
        assert_eq!(reads.get(), 2, "each record read once");
        assert_eq!(c.layout_recomputations(), 1);

        c.set_data(Rc::from(vec![("cost", Some(1.0), 2.0)]));
        let bound = c.bind().unwrap();
        assert_eq!(bound.values, vec![vec![Some(2.0)]]);
        assert_eq!(reads.get(), 3, "new records are read");
    }
}
