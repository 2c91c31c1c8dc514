// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend mark generation: color swatches with text labels.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::color::palette::css;
use peniko::{Brush, Color};
use tandem_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::layout::Size;
use crate::measure::TextMeasurer;
use crate::z_order;

/// Offset of the label ids from the swatch ids.
const LABEL_OFFSET: u64 = 0x8000;

/// Items a legend can give distinct ids.
pub(crate) const ITEM_CAPACITY: u64 = LABEL_OFFSET;

/// A legend row.
#[derive(Clone, Debug)]
pub struct LegendItem {
    /// The label shown next to the swatch.
    pub label: String,
    /// The swatch fill paint.
    pub fill: Brush,
}

impl LegendItem {
    /// Convenience constructor for a solid-color swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            fill: Brush::Solid(color),
        }
    }
}

/// A legend specification: swatches and labels laid out top-to-bottom, then into columns.
#[derive(Clone, Debug)]
pub struct LegendSwatchesSpec {
    /// Stable-id base; swatch `i` uses `id_base + i`, its label `id_base + 0x8000 + i`.
    pub id_base: u64,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Vertical gap between rows.
    pub row_gap: f64,
    /// Horizontal gap between swatch and label.
    pub label_dx: f64,
    /// Number of columns.
    pub columns: usize,
    /// Horizontal gap between columns.
    pub column_gap: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label color.
    pub text_fill: Brush,
    /// Inset from the plot corner when placed with [`LegendSwatchesSpec::marks_in`].
    pub inset: f64,
    /// Items in display order.
    pub items: Vec<LegendItem>,
}

impl LegendSwatchesSpec {
    /// Creates a new legend specification with defaults.
    pub fn new(id_base: u64, items: Vec<LegendItem>) -> Self {
        Self {
            id_base,
            swatch_size: 10.0,
            row_gap: 4.0,
            label_dx: 5.0,
            columns: 1,
            column_gap: 12.0,
            font_size: 10.0,
            text_fill: css::BLACK.into(),
            inset: 8.0,
            items,
        }
    }

    /// Set the label text paint.
    pub fn with_text_fill(mut self, text_fill: impl Into<Brush>) -> Self {
        self.text_fill = text_fill.into();
        self
    }

    /// Set the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the number of columns.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    fn rows_per_column(&self) -> usize {
        self.items.len().div_ceil(self.columns.max(1)).max(1)
    }

    fn row_height(&self) -> f64 {
        self.swatch_size.max(self.font_size)
    }

    fn column_widths(&self, measurer: &dyn TextMeasurer) -> Vec<f64> {
        let rows = self.rows_per_column();
        self.items
            .chunks(rows)
            .map(|col| {
                let label = col
                    .iter()
                    .map(|item| measurer.measure(&item.label, self.font_size).0)
                    .fold(0.0_f64, f64::max);
                self.swatch_size + self.label_dx + label
            })
            .collect()
    }

    /// Measures the legend size.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> Size {
        if self.items.is_empty() {
            return Size::default();
        }
        let widths = self.column_widths(measurer);
        let gaps = self.column_gap * (widths.len().saturating_sub(1)) as f64;
        let rows = self.rows_per_column().min(self.items.len()) as f64;
        Size {
            width: widths.iter().sum::<f64>() + gaps,
            height: rows * self.row_height() + (rows - 1.0).max(0.0) * self.row_gap,
        }
    }

    /// Generates marks with the legend's top-left corner at `(x, y)`.
    pub fn marks(&self, x: f64, y: f64, measurer: &dyn TextMeasurer) -> Vec<Mark> {
        let rows = self.rows_per_column();
        let widths = self.column_widths(measurer);
        let row_height = self.row_height();
        let mut out = Vec::with_capacity(2 * self.items.len());
        let mut col_x = x;
        for (col, items) in self.items.chunks(rows).enumerate() {
            for (row, item) in items.iter().enumerate() {
                let i = (col * rows + row) as u64;
                let row_y = y + row as f64 * (row_height + self.row_gap);
                let swatch_y = row_y + 0.5 * (row_height - self.swatch_size);
                out.push(
                    Mark::builder(MarkId::from_raw(self.id_base + i))
                        .rect()
                        .z_index(z_order::LEGEND_SWATCHES)
                        .rect(Rect::new(
                            col_x,
                            swatch_y,
                            col_x + self.swatch_size,
                            swatch_y + self.swatch_size,
                        ))
                        .fill(item.fill.clone())
                        .build(),
                );
                out.push(
                    Mark::builder(MarkId::from_raw(self.id_base + LABEL_OFFSET + i))
                        .text()
                        .z_index(z_order::LEGEND_LABELS)
                        .at(col_x + self.swatch_size + self.label_dx, row_y + 0.5 * row_height)
                        .text(item.label.clone())
                        .font_size(self.font_size)
                        .fill(self.text_fill.clone())
                        .anchor(TextAnchor::Start)
                        .baseline(TextBaseline::Middle)
                        .build(),
                );
            }
            col_x += widths.get(col).copied().unwrap_or(0.0) + self.column_gap;
        }
        out
    }

    /// Generates marks placed inside the top-right corner of `plot`.
    pub fn marks_in(&self, plot: Rect, measurer: &dyn TextMeasurer) -> Vec<Mark> {
        let size = self.measure(measurer);
        let x = (plot.x1 - self.inset - size.width).max(plot.x0);
        self.marks(x, plot.y0 + self.inset, measurer)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use tandem_core::MarkPayload;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    fn items() -> Vec<LegendItem> {
        vec![
            LegendItem::solid("A", css::BLACK),
            LegendItem::solid("BBBB", css::BLACK),
            LegendItem::solid("CC", css::BLACK),
            LegendItem::solid("DDDDDD", css::BLACK),
        ]
    }

    #[test]
    fn measure_accounts_for_columns() {
        let m = HeuristicTextMeasurer;
        let s1 = LegendSwatchesSpec::new(1, items()).measure(&m);
        let s2 = LegendSwatchesSpec::new(1, items()).with_columns(2).measure(&m);
        assert!(s2.width > s1.width);
        assert!(s2.height < s1.height);
        // 4 rows of 10 with 3 gaps of 4.
        assert_eq!(s1.height, 52.0);
    }

    #[test]
    fn top_right_placement_stays_inside_the_plot() {
        let m = HeuristicTextMeasurer;
        let plot = Rect::new(0.0, 0.0, 300.0, 200.0);
        let spec = LegendSwatchesSpec::new(1, items());
        let marks = spec.marks_in(plot, &m);
        assert_eq!(marks.len(), 8);
        let size = spec.measure(&m);
        let MarkPayload::Rect(first) = &marks[0].payload else {
            panic!("expected a swatch rect");
        };
        assert_eq!(first.rect.x0, 300.0 - 8.0 - size.width);
        assert_eq!(first.rect.y0, 8.0);
    }
}
