// Copyright 2025 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG serialization of a [`Scene`].

extern crate alloc;

use alloc::string::String;
use core::fmt::Write;

use kurbo::{BezPath, PathEl, Rect};
use peniko::Brush;

use crate::{MarkPayload, Scene, TextAnchor, TextBaseline};

/// Serializes `scene` into a standalone SVG document covering `view`.
///
/// Marks are written in paint order (`(z_index, id)` ascending).
pub fn to_svg(scene: &Scene, view: Rect) -> String {
    let mut out = String::new();
    // Writing into a `String` cannot fail.
    let _ = write_svg(&mut out, scene, view);
    out
}

fn write_svg(out: &mut String, scene: &Scene, view: Rect) -> core::fmt::Result {
    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
        view.x0,
        view.y0,
        view.width(),
        view.height(),
        view.width(),
        view.height()
    )?;
    out.push('\n');

    for mark in scene.marks_in_paint_order() {
        match &mark.payload {
            MarkPayload::Rect(r) => {
                write!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                    r.rect.x0,
                    r.rect.y0,
                    r.rect.width(),
                    r.rect.height(),
                )?;
                write_paint_attr(out, "fill", &r.fill)?;
                out.push_str("/>\n");
            }
            MarkPayload::Text(t) => {
                let baseline = match t.baseline {
                    TextBaseline::Middle => "middle",
                    TextBaseline::Alphabetic => "alphabetic",
                    TextBaseline::Hanging => "hanging",
                };
                write!(
                    out,
                    r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
                    t.pos.x, t.pos.y, t.font_size, baseline
                )?;
                if t.angle != 0.0 {
                    write!(
                        out,
                        r#" transform="rotate({} {} {})""#,
                        t.angle, t.pos.x, t.pos.y
                    )?;
                }
                out.push_str(match t.anchor {
                    TextAnchor::Start => r#" text-anchor="start""#,
                    TextAnchor::Middle => r#" text-anchor="middle""#,
                    TextAnchor::End => r#" text-anchor="end""#,
                });
                write_paint_attr(out, "fill", &t.fill)?;
                out.push('>');
                escape_xml(out, &t.text);
                out.push_str("</text>\n");
            }
            MarkPayload::Path(p) => {
                if p.path.elements().is_empty() {
                    continue;
                }
                out.push_str(r#"<path d=""#);
                write_path_data(out, &p.path)?;
                out.push('"');
                write_paint_attr(out, "fill", &p.fill)?;
                if p.stroke_width > 0.0 {
                    write_paint_attr(out, "stroke", &p.stroke)?;
                    write!(out, r#" stroke-width="{}""#, p.stroke_width)?;
                    if let Some((dash, gap)) = p.dash {
                        write!(out, r#" stroke-dasharray="{dash} {gap}""#)?;
                    }
                }
                out.push_str("/>\n");
            }
        }
    }

    out.push_str("</svg>\n");
    Ok(())
}

fn write_path_data(out: &mut String, path: &BezPath) -> core::fmt::Result {
    for (i, el) in path.elements().iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        match el {
            PathEl::MoveTo(p) => write!(out, "M{},{}", p.x, p.y)?,
            PathEl::LineTo(p) => write!(out, "L{},{}", p.x, p.y)?,
            PathEl::QuadTo(a, b) => write!(out, "Q{},{} {},{}", a.x, a.y, b.x, b.y)?,
            PathEl::CurveTo(a, b, c) => write!(
                out,
                "C{},{} {},{} {},{}",
                a.x, a.y, b.x, b.y, c.x, c.y
            )?,
            PathEl::ClosePath => out.push('Z'),
        }
    }
    Ok(())
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) -> core::fmt::Result {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            if rgba.a == 0 {
                return write!(out, r#" {name}="none""#);
            }
            write!(
                out,
                r##" {name}="#{:02x}{:02x}{:02x}""##,
                rgba.r, rgba.g, rgba.b
            )?;
            if rgba.a != 255 {
                write!(out, r#" {name}-opacity="{}""#, f64::from(rgba.a) / 255.0)?;
            }
            Ok(())
        }
        _ => write!(out, r#" {name}="none""#),
    }
}

fn escape_xml(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use peniko::color::palette::css;

    use super::*;
    use crate::{Mark, MarkId};

    #[test]
    fn svg_contains_paths_rects_and_escaped_text() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 5.0));

        let mut scene = Scene::new();
        scene.tick(vec![
            Mark::builder(MarkId::from_raw(1))
                .path()
                .path(path)
                .stroke(css::BLACK, 2.0)
                .dash(4.0, 2.0)
                .build(),
            Mark::builder(MarkId::from_raw(2))
                .rect()
                .rect(Rect::new(1.0, 2.0, 4.0, 6.0))
                .fill(css::RED)
                .build(),
            Mark::builder(MarkId::from_raw(3))
                .text()
                .at(5.0, 5.0)
                .text("a < b")
                .build(),
        ]);

        let svg = to_svg(&scene, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"d="M0,0 L10,5""#), "{svg}");
        assert!(svg.contains(r#"stroke-dasharray="4 2""#), "{svg}");
        assert!(
            svg.contains(r##"<rect x="1" y="2" width="3" height="4" fill="#ff0000""##),
            "{svg}"
        );
        assert!(svg.contains("a &lt; b"), "{svg}");
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
