// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PNG output through the `vello_cpu` rasterizer.

use kurbo::{Affine, BezPath, PathEl, Point, Shape as _};
use mindmap_text::FontMetricsMeasurer;
use png::{BitDepth, ColorType, Encoder};
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};
use tracing::{debug, trace};
use vello_cpu::kurbo::{Affine as CpuAffine, BezPath as CpuPath, Rect as CpuRect, Stroke};
use vello_cpu::{Pixmap, RenderContext, RenderMode, RenderSettings};

use crate::{ExportError, ExportScene, SceneText};

const CURVE_TOLERANCE: f64 = 0.1;

/// Rasterizes `scene` and encodes it as an RGBA PNG.
///
/// Labels are drawn from glyph outlines in `font`; without a font only boxes
/// and connectors are drawn. `max_dimension` bounds both sides of the image.
pub fn render_png(
    scene: &ExportScene,
    font: Option<&FontMetricsMeasurer>,
    max_dimension: u32,
) -> Result<Vec<u8>, ExportError> {
    let (width, height) = scene.checked_size(max_dimension.min(u32::from(u16::MAX)))?;
    let (w16, h16) = (
        u16::try_from(width).map_err(|_| too_large(width, height))?,
        u16::try_from(height).map_err(|_| too_large(width, height))?,
    );
    debug!(width, height, nodes = scene.nodes.len(), "rasterizing export");

    let settings = RenderSettings {
        render_mode: RenderMode::OptimizeSpeed,
        ..RenderSettings::default()
    };
    let mut ctx = RenderContext::new_with(w16, h16, settings);

    ctx.set_paint(scene.background);
    ctx.fill_rect(&CpuRect::new(0.0, 0.0, f64::from(width), f64::from(height)));

    let world = Affine::scale(scene.scale) * Affine::translate(-scene.frame.origin().to_vec2());
    ctx.set_transform(affine_to_cpu(world));

    for edge in &scene.edges {
        ctx.set_paint(edge.color);
        ctx.set_stroke(Stroke::new(edge.width));
        ctx.stroke_path(&to_cpu_path(&edge.path));
    }

    let glyphs = font.and_then(GlyphPainter::new);
    if font.is_some() && glyphs.is_none() {
        debug!("font data unusable; labels are left out of the PNG");
    }
    for node in &scene.nodes {
        let outline = to_cpu_path(&node.shape.to_path(CURVE_TOLERANCE));
        ctx.set_paint(node.fill);
        ctx.fill_path(&outline);
        if node.border_width > 0.0 {
            ctx.set_paint(node.border);
            ctx.set_stroke(Stroke::new(node.border_width));
            ctx.stroke_path(&outline);
        }
        if let Some(glyphs) = &glyphs {
            ctx.set_paint(node.text_color);
            for line in &node.lines {
                let path = glyphs.line_path(line);
                if !path.elements().is_empty() {
                    ctx.fill_path(&to_cpu_path(&path));
                }
            }
        }
    }

    ctx.flush();
    let mut pixmap = Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);

    let unpremul = pixmap.take_unpremultiplied();
    let mut pixels = Vec::with_capacity(unpremul.len() * 4);
    for p in unpremul {
        pixels.extend_from_slice(&[p.r, p.g, p.b, p.a]);
    }

    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
        writer.finish()?;
    }
    Ok(out)
}

fn too_large(width: u32, height: u32) -> ExportError {
    ExportError::SurfaceTooLarge {
        width,
        height,
        max: u32::from(u16::MAX),
    }
}

fn affine_to_cpu(xf: Affine) -> CpuAffine {
    CpuAffine::new(xf.as_coeffs())
}

fn to_cpu_path(path: &BezPath) -> CpuPath {
    use vello_cpu::kurbo::Point as CpuPoint;
    let p = |pt: Point| CpuPoint::new(pt.x, pt.y);
    let mut out = CpuPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(a) => out.move_to(p(a)),
            PathEl::LineTo(a) => out.line_to(p(a)),
            PathEl::QuadTo(a, b) => out.quad_to(p(a), p(b)),
            PathEl::CurveTo(a, b, c) => out.curve_to(p(a), p(b), p(c)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Turns label lines into filled glyph outlines.
struct GlyphPainter<'a> {
    font: FontRef<'a>,
}

impl<'a> GlyphPainter<'a> {
    fn new(measurer: &'a FontMetricsMeasurer) -> Option<Self> {
        let font = FontRef::from_index(measurer.data(), measurer.index()).ok()?;
        Some(Self { font })
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "font sizes comfortably fit in f32"
    )]
    fn line_path(&self, line: &SceneText) -> BezPath {
        let px = line.font.size as f32;
        let size = Size::new(px);
        let charmap = self.font.charmap();
        let metrics = GlyphMetrics::new(&self.font, size, LocationRef::default());
        let outlines = self.font.outline_glyphs();
        let fallback = f64::from(px * 0.6);

        let glyphs: Vec<(GlyphId, f64)> = line
            .text
            .chars()
            .map(|ch| {
                let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                let advance = metrics.advance_width(gid).map_or(fallback, f64::from);
                (gid, advance)
            })
            .collect();
        let width: f64 = glyphs.iter().map(|(_, a)| a).sum();

        let mut pen = FlipPen {
            path: BezPath::new(),
            origin: Point::new(line.anchor.x - width / 2.0, line.anchor.y),
        };
        for (gid, advance) in glyphs {
            if let Some(glyph) = outlines.get(gid) {
                let settings = DrawSettings::unhinted(size, LocationRef::default());
                if glyph.draw(settings, &mut pen).is_err() {
                    trace!(glyph = gid.to_u32(), "glyph outline failed to draw");
                }
            }
            pen.origin.x += advance;
        }
        pen.path
    }
}

/// Collects outline commands, moving them to `origin` and flipping the
/// y-up font space into y-down world space.
struct FlipPen {
    path: BezPath,
    origin: Point,
}

impl FlipPen {
    fn at(&self, x: f32, y: f32) -> Point {
        Point::new(self.origin.x + f64::from(x), self.origin.y - f64::from(y))
    }
}

impl OutlinePen for FlipPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.at(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.at(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let (c, p) = (self.at(cx0, cy0), self.at(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (c0, c1, p) = (self.at(cx0, cy0), self.at(cx1, cy1), self.at(x, y));
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
