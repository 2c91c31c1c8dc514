// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark payloads and builders.

extern crate alloc;

use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::{Brush, Color};

use crate::MarkId;

/// The kind of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// A filled and/or stroked path.
    Path,
    /// A filled axis-aligned rectangle.
    Rect,
    /// A single line of unshaped text.
    Text,
}

/// Horizontal text anchoring relative to the text position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The position is the start of the text.
    Start,
    /// The position is the horizontal center of the text.
    Middle,
    /// The position is the end of the text.
    End,
}

/// Vertical text alignment relative to the text position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Alphabetic baseline.
    Alphabetic,
    /// Vertical middle of the em box.
    Middle,
    /// Hanging baseline (text hangs below the position).
    Hanging,
}

/// A path mark payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMark {
    /// Geometry in scene coordinates.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width; `0` disables the stroke.
    pub stroke_width: f64,
    /// Optional `(dash, gap)` pattern for the stroke.
    pub dash: Option<(f64, f64)>,
}

/// A rect mark payload.
#[derive(Clone, Debug, PartialEq)]
pub struct RectMark {
    /// Rectangle in scene coordinates.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
}

/// A text mark payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    /// Anchor position in scene coordinates.
    pub pos: Point,
    /// The (unshaped) text.
    pub text: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Horizontal anchoring.
    pub anchor: TextAnchor,
    /// Vertical alignment.
    pub baseline: TextBaseline,
    /// Rotation in degrees around `pos`.
    pub angle: f64,
}

/// The resolved contents of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// See [`PathMark`].
    Path(PathMark),
    /// See [`RectMark`].
    Rect(RectMark),
    /// See [`TextMark`].
    Text(TextMark),
}

impl MarkPayload {
    /// Returns the payload kind.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Path(_) => MarkKind::Path,
            Self::Rect(_) => MarkKind::Rect,
            Self::Text(_) => MarkKind::Text,
        }
    }

    /// Returns geometric bounds, if they are known without text measurement.
    ///
    /// Empty paths and text marks return `None`.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Path(p) if p.path.elements().is_empty() => None,
            Self::Path(p) => Some(p.path.bounding_box()),
            Self::Rect(r) => Some(r.rect),
            Self::Text(_) => None,
        }
    }
}

/// A mark: stable id, paint order and payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Rendering order; renderers sort by `(z_index, id)`.
    pub z_index: i32,
    /// Resolved contents.
    pub payload: MarkPayload,
}

impl Mark {
    /// Starts building a mark with the given id.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder { id }
    }

    /// Returns the payload kind.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }
}

/// Entry point for the typed mark builders.
#[derive(Clone, Copy, Debug)]
pub struct MarkBuilder {
    id: MarkId,
}

impl MarkBuilder {
    /// Builds a path mark (transparent fill, no stroke by default).
    pub fn path(self) -> PathMarkBuilder {
        PathMarkBuilder {
            id: self.id,
            z_index: 0,
            mark: PathMark {
                path: BezPath::new(),
                fill: Brush::Solid(Color::TRANSPARENT),
                stroke: Brush::Solid(Color::TRANSPARENT),
                stroke_width: 0.0,
                dash: None,
            },
        }
    }

    /// Builds a rect mark (empty rect, default fill).
    pub fn rect(self) -> RectMarkBuilder {
        RectMarkBuilder {
            id: self.id,
            z_index: 0,
            mark: RectMark {
                rect: Rect::ZERO,
                fill: Brush::default(),
            },
        }
    }

    /// Builds a text mark (font size 10, start/alphabetic alignment).
    pub fn text(self) -> TextMarkBuilder {
        TextMarkBuilder {
            id: self.id,
            z_index: 0,
            mark: TextMark {
                pos: Point::ZERO,
                text: String::new(),
                font_size: 10.0,
                fill: Brush::default(),
                anchor: TextAnchor::Start,
                baseline: TextBaseline::Alphabetic,
                angle: 0.0,
            },
        }
    }
}

/// Builder for [`PathMark`]s.
#[derive(Clone, Debug)]
pub struct PathMarkBuilder {
    id: MarkId,
    z_index: i32,
    mark: PathMark,
}

impl PathMarkBuilder {
    /// Sets the z-index.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the geometry.
    pub fn path(mut self, path: BezPath) -> Self {
        self.mark.path = path;
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.mark.fill = fill.into();
        self
    }

    /// Sets the stroke paint and width.
    pub fn stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.mark.stroke = stroke.into();
        self.mark.stroke_width = stroke_width;
        self
    }

    /// Sets a `(dash, gap)` stroke pattern.
    pub fn dash(mut self, dash: f64, gap: f64) -> Self {
        self.mark.dash = Some((dash, gap));
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::Path(self.mark),
        }
    }
}

/// Builder for [`RectMark`]s.
#[derive(Clone, Debug)]
pub struct RectMarkBuilder {
    id: MarkId,
    z_index: i32,
    mark: RectMark,
}

impl RectMarkBuilder {
    /// Sets the z-index.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the rectangle.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.mark.rect = rect;
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.mark.fill = fill.into();
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::Rect(self.mark),
        }
    }
}

/// Builder for [`TextMark`]s.
#[derive(Clone, Debug)]
pub struct TextMarkBuilder {
    id: MarkId,
    z_index: i32,
    mark: TextMark,
}

impl TextMarkBuilder {
    /// Sets the z-index.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the anchor position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.mark.pos = Point::new(x, y);
        self
    }

    /// Sets the text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.mark.text = text.into();
        self
    }

    /// Sets the font size.
    pub fn font_size(mut self, font_size: f64) -> Self {
        self.mark.font_size = font_size;
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.mark.fill = fill.into();
        self
    }

    /// Sets horizontal anchoring.
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.mark.anchor = anchor;
        self
    }

    /// Sets vertical alignment.
    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.mark.baseline = baseline;
        self
    }

    /// Sets the rotation in degrees.
    pub fn angle(mut self, angle: f64) -> Self {
        self.mark.angle = angle;
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::Text(self.mark),
        }
    }
}
