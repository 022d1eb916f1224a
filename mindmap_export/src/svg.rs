// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG output.

use core::fmt::Write as _;

use kurbo::{BezPath, PathEl, Rect};

use crate::ExportScene;
use crate::palette::color_to_svg;

/// Serializes `scene` as a standalone SVG document.
///
/// The `viewBox` is the scene frame in world units; `width` and `height` are
/// the scaled pixel size.
#[must_use]
pub fn write_svg(scene: &ExportScene) -> String {
    let (width, height) = scene.pixel_size();
    let frame = scene.frame;
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="{} {} {} {}">"#,
        fmt_f64(frame.x0),
        fmt_f64(frame.y0),
        fmt_f64(frame.width()),
        fmt_f64(frame.height()),
    );

    let (bg, bg_alpha) = color_to_svg(scene.background);
    write_rect(&mut out, frame, 0.0);
    let _ = write!(out, r#" fill="{bg}"{}/>"#, opacity_attr("fill-opacity", bg_alpha));

    out.push_str(r#"<g fill="none" stroke-linecap="round">"#);
    for edge in &scene.edges {
        let (stroke, alpha) = color_to_svg(edge.color);
        let _ = write!(
            out,
            r#"<path d="{}" stroke="{stroke}" stroke-width="{}"{}/>"#,
            bez_path_to_svg_d(&edge.path),
            fmt_f64(edge.width),
            opacity_attr("stroke-opacity", alpha),
        );
    }
    out.push_str("</g>");

    for node in &scene.nodes {
        let (fill, fill_alpha) = color_to_svg(node.fill);
        let (border, border_alpha) = color_to_svg(node.border);
        out.push_str("<g>");
        write_rect(&mut out, node.shape.rect(), node.shape.radii().top_left);
        let _ = write!(
            out,
            r#" fill="{fill}"{} stroke="{border}"{} stroke-width="{}"/>"#,
            opacity_attr("fill-opacity", fill_alpha),
            opacity_attr("stroke-opacity", border_alpha),
            fmt_f64(node.border_width),
        );
        let (text_fill, text_alpha) = color_to_svg(node.text_color);
        for line in &node.lines {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{}" font-weight="{}" text-anchor="middle" fill="{text_fill}"{}>"#,
                fmt_f64(line.anchor.x),
                fmt_f64(line.anchor.y),
                fmt_f64(line.font.size),
                line.font.weight,
                opacity_attr("fill-opacity", text_alpha),
            );
            escape_into(&mut out, &line.text);
            out.push_str("</text>");
        }
        out.push_str("</g>");
    }

    out.push_str("</svg>");
    out
}

fn write_rect(out: &mut String, rect: Rect, radius: f64) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        fmt_f64(rect.x0),
        fmt_f64(rect.y0),
        fmt_f64(rect.width()),
        fmt_f64(rect.height()),
    );
    if radius > 0.0 {
        let _ = write!(out, r#" rx="{0}" ry="{0}""#, fmt_f64(radius));
    }
}

fn opacity_attr(name: &str, alpha: f32) -> String {
    if alpha < 1.0 {
        format!(r#" {name}="{}""#, fmt_f32(alpha))
    } else {
        String::new()
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
}

fn bez_path_to_svg_d(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.iter() {
        match el {
            PathEl::MoveTo(p) => {
                let _ = write!(d, "M{} {}", fmt_f64(p.x), fmt_f64(p.y));
            }
            PathEl::LineTo(p) => {
                let _ = write!(d, "L{} {}", fmt_f64(p.x), fmt_f64(p.y));
            }
            PathEl::QuadTo(p1, p2) => {
                let _ = write!(
                    d,
                    "Q{} {} {} {}",
                    fmt_f64(p1.x),
                    fmt_f64(p1.y),
                    fmt_f64(p2.x),
                    fmt_f64(p2.y)
                );
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let _ = write!(
                    d,
                    "C{} {} {} {} {} {}",
                    fmt_f64(p1.x),
                    fmt_f64(p1.y),
                    fmt_f64(p2.x),
                    fmt_f64(p2.y),
                    fmt_f64(p3.x),
                    fmt_f64(p3.y)
                );
            }
            PathEl::ClosePath => d.push('Z'),
        }
    }
    d
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "SVG uses f32-like scalar formatting"
)]
fn fmt_f64(v: f64) -> String {
    fmt_f32(v as f32)
}

fn fmt_f32(v: f32) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let rounded = v.round();
    if (rounded - v).abs() < 1e-6 && rounded.abs() < 1e9 {
        return format!("{rounded:.0}");
    }
    let mut s = format!("{v:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
