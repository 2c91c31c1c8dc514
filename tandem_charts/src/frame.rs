// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State shared by every chart component: geometry, style, id regions and the scene.

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use tandem_core::{Mark, MarkDiff, MarkId, Scene};

use crate::error::ChartError;
use crate::layout::{Margin, Size, plot_rect};
use crate::legend::{LegendItem, LegendSwatchesSpec};
use crate::measure::{HeuristicTextMeasurer, TextMeasurer};
use crate::style::ChartStyle;
use crate::z_order;

/// Mark-id regions within a chart's id range.
///
/// A chart's marks use ids `id_base + region * REGION_SIZE + local`.
pub(crate) mod region {
    pub(crate) const REGION_SIZE: u64 = 0x1_0000;

    pub(crate) const FRAME: u64 = 0;
    pub(crate) const AXIS_X: u64 = 1;
    pub(crate) const AXIS_LEFT: u64 = 2;
    pub(crate) const AXIS_RIGHT: u64 = 3;
    pub(crate) const LABELS: u64 = 4;
    pub(crate) const LEGEND: u64 = 8;
    pub(crate) const THRESHOLDS: u64 = 9;
    pub(crate) const TOOLTIP: u64 = 10;
    pub(crate) const SERIES: u64 = 16;

    /// Series regions that fit below the next chart's base at the default stride.
    pub(crate) const MAX_SERIES: u64 = tandem_core::IdSource::DEFAULT_STRIDE / REGION_SIZE - SERIES;
}

/// Fails when `count` items do not fit in `capacity` ids.
pub(crate) fn ensure_capacity(
    what: &'static str,
    count: usize,
    capacity: u64,
) -> Result<(), ChartError> {
    if count as u64 > capacity {
        tracing::warn!(what, count, capacity, "mark id range exhausted");
        return Err(ChartError::TooManyMarks {
            what,
            count,
            capacity,
        });
    }
    Ok(())
}

pub(crate) struct ChartFrame {
    pub(crate) id_base: u64,
    pub(crate) size: Size,
    pub(crate) margin: Margin,
    pub(crate) style: ChartStyle,
    pub(crate) measurer: Rc<dyn TextMeasurer>,
    pub(crate) scene: Scene,
}

impl core::fmt::Debug for ChartFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChartFrame")
            .field("id_base", &self.id_base)
            .field("size", &self.size)
            .field("margin", &self.margin)
            .field("style", &self.style)
            .field("marks", &self.scene.len())
            .finish_non_exhaustive()
    }
}

impl ChartFrame {
    pub(crate) fn new(id_base: u64, size: Size) -> Self {
        Self {
            id_base,
            size,
            margin: Margin::default(),
            style: ChartStyle::default(),
            measurer: Rc::new(HeuristicTextMeasurer),
            scene: Scene::new(),
        }
    }

    pub(crate) fn plot(&self) -> Rect {
        plot_rect(self.size, self.margin)
    }

    pub(crate) fn view(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.size.height)
    }

    /// Returns the first id of `region`.
    pub(crate) fn region(&self, region: u64) -> u64 {
        self.id_base + region * region::REGION_SIZE
    }

    /// Returns the id base of series `index`.
    pub(crate) fn series_region(&self, index: usize) -> u64 {
        self.region(region::SERIES + index as u64)
    }

    pub(crate) fn background(&self, plot: Rect) -> Option<Mark> {
        let fill = self.style.plot_background.clone()?;
        Some(
            Mark::builder(MarkId::from_raw(self.region(region::FRAME)))
                .rect()
                .z_index(z_order::PLOT_BACKGROUND)
                .rect(plot)
                .fill(fill)
                .build(),
        )
    }

    pub(crate) fn legend(&self, plot: Rect, items: Vec<LegendItem>) -> Vec<Mark> {
        if !self.style.legend || items.is_empty() {
            return Vec::new();
        }
        LegendSwatchesSpec::new(self.region(region::LEGEND), items)
            .with_text_fill(self.style.axis.label_fill.clone())
            .with_font_size(self.style.font_size)
            .marks_in(plot, &*self.measurer)
    }

    /// Diffs `marks` into the scene.
    pub(crate) fn commit(&mut self, chart: &'static str, marks: Vec<Mark>) -> Vec<MarkDiff> {
        let diffs = self.scene.tick(marks);
        tracing::trace!(chart, marks = self.scene.len(), diffs = diffs.len(), "rendered");
        diffs
    }

    pub(crate) fn to_svg(&self) -> String {
        tandem_core::to_svg(&self.scene, self.view())
    }
}
