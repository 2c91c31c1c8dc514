// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series descriptions for XY charts.

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use peniko::Color;

use crate::accessor::{Accessor, IntoY, Sample, XFn, YFn, erase_y};
use crate::error::ChartError;

/// How a series is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    /// A stroked polyline.
    #[default]
    Line,
    /// A filled area down to the baseline (or the series below it, when stacked).
    Area,
}

/// Which Y axis a series is measured against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisSide {
    /// The left axis.
    #[default]
    Left,
    /// The right axis.
    Right,
}

/// One series of an XY chart.
///
/// A series reads its y values from the chart's records (or from its own `data` when set)
/// through a y accessor. The chart's x accessor is shared by every series.
pub struct Series<R> {
    key: String,
    label: Option<String>,
    color: Option<Color>,
    data: Option<Rc<[R]>>,
    y: YFn<R>,
    kind: SeriesKind,
    axis: AxisSide,
}

impl<R> core::fmt::Debug for Series<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Series")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("color", &self.color)
            .field("data", &self.data.as_ref().map(|d| d.len()))
            .field("kind", &self.kind)
            .field("axis", &self.axis)
            .finish_non_exhaustive()
    }
}

impl<R> Series<R> {
    /// Creates a line series on the left axis.
    ///
    /// `key` must be unique within a chart.
    pub fn new<A>(key: impl Into<String>, y: A) -> Self
    where
        A: Accessor<R> + 'static,
        A::Value: IntoY,
    {
        Self {
            key: key.into(),
            label: None,
            color: None,
            data: None,
            y: erase_y(y),
            kind: SeriesKind::Line,
            axis: AxisSide::Left,
        }
    }

    /// Sets the display label (defaults to the key).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the series color (defaults to the chart palette).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Gives the series its own records instead of the chart's.
    pub fn with_data(mut self, data: Rc<[R]>) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets how the series is drawn.
    pub fn with_kind(mut self, kind: SeriesKind) -> Self {
        self.kind = kind;
        self
    }

    /// Draws the series as a filled area.
    pub fn area(self) -> Self {
        self.with_kind(SeriesKind::Area)
    }

    /// Sets the Y axis the series is measured against.
    pub fn with_axis(mut self, axis: AxisSide) -> Self {
        self.axis = axis;
        self
    }

    /// Returns the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// Returns the explicit color, if one was set.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns the series' own records, if any.
    pub fn data(&self) -> Option<&Rc<[R]>> {
        self.data.as_ref()
    }

    /// Returns how the series is drawn.
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    /// Returns `true` for area series.
    pub fn is_area(&self) -> bool {
        self.kind == SeriesKind::Area
    }

    /// Returns the Y axis the series is measured against.
    pub fn axis(&self) -> AxisSide {
        self.axis
    }

    /// Returns the records this series reads from.
    pub(crate) fn records<'a>(&'a self, chart_data: &'a [R]) -> &'a [R] {
        self.data.as_deref().unwrap_or(chart_data)
    }

    /// Reads the y value of each of the series' records.
    pub(crate) fn values(&self, chart_data: &[R]) -> Result<Vec<Option<f64>>, ChartError> {
        self.records(chart_data)
            .iter()
            .enumerate()
            .map(|(index, record)| {
                (self.y)(record).map_err(|source| ChartError::Accessor {
                    series: self.key.clone(),
                    index,
                    source,
                })
            })
            .collect()
    }

    /// Binds the series' records into samples.
    pub(crate) fn bind(&self, chart_data: &[R], x: &XFn<R>) -> Result<Vec<Sample>, ChartError> {
        self.records(chart_data)
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let wrap = |source| ChartError::Accessor {
                    series: self.key.clone(),
                    index,
                    source,
                };
                let x = x(record).map_err(wrap)?;
                let y = (self.y)(record).map_err(wrap)?;
                Ok(Sample { index, x, y })
            })
            .collect()
    }
}
