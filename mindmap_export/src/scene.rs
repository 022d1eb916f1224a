// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend-neutral description of an export.

use kurbo::{BezPath, Point, Rect, RoundedRect};
use mindmap_layout::LayoutResult;
use mindmap_link::EdgeSet;
use mindmap_text::{FontSpec, FontTiers};
use mindmap_tree::MeasuredTree;
use peniko::Color;
use tracing::debug;

use crate::{ExportConfig, ExportError};

/// A connector to stroke.
#[derive(Clone, Debug)]
pub struct SceneEdge {
    /// Centerline in world coordinates.
    pub path: BezPath,
    /// Stroke width in world units.
    pub width: f64,
    /// Stroke color.
    pub color: Color,
}

/// One wrapped line of a label.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneText {
    /// Line content.
    pub text: String,
    /// Horizontal center of the line and its baseline, in world coordinates.
    pub anchor: Point,
    /// Size and weight.
    pub font: FontSpec,
}

/// A node box with its label.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Node id.
    pub id: String,
    /// Box outline in world coordinates.
    pub shape: RoundedRect,
    /// Box fill.
    pub fill: Color,
    /// Box outline color.
    pub border: Color,
    /// Box outline width.
    pub border_width: f64,
    /// Label color.
    pub text_color: Color,
    /// Label lines, top to bottom.
    pub lines: Vec<SceneText>,
}

/// Everything an exporter draws, in paint order: background, edges, nodes.
#[derive(Clone, Debug)]
pub struct ExportScene {
    /// World rectangle that becomes the image.
    pub frame: Rect,
    /// Output pixels per world unit.
    pub scale: f64,
    /// Canvas color.
    pub background: Color,
    /// Connectors, drawn first.
    pub edges: Vec<SceneEdge>,
    /// Nodes, drawn over the connectors.
    pub nodes: Vec<SceneNode>,
}

impl ExportScene {
    /// Collects the drawable geometry of a layout.
    ///
    /// `fonts` and `line_height` must match the ones the tree was measured
    /// with, so labels land where their boxes expect them. Nodes or edges
    /// with non-finite geometry are left out.
    pub fn build(
        tree: &MeasuredTree,
        layout: &LayoutResult,
        edges: &EdgeSet,
        fonts: &FontTiers,
        line_height: f64,
        config: &ExportConfig,
    ) -> Result<Self, ExportError> {
        if layout.is_empty() {
            return Err(ExportError::EmptyScene);
        }

        let scene_edges: Vec<SceneEdge> = edges
            .edges()
            .iter()
            .map(|edge| SceneEdge {
                path: edge.path(),
                width: config.edge_width,
                color: config.edge_color,
            })
            .collect();

        let mut nodes = Vec::with_capacity(layout.len());
        for positioned in layout.nodes() {
            let rect = positioned.rect();
            let Some(node) = tree.get(positioned.index).filter(|_| rect.is_finite()) else {
                debug!(id = %positioned.id, "leaving node out of export");
                continue;
            };
            let font = fonts.for_level(node.level);
            let style = config.level_style(node.level);
            let block = line_height * node.lines.len() as f64;
            let top = rect.center().y - block / 2.0;
            let lines = node
                .lines
                .iter()
                .enumerate()
                .map(|(i, text)| SceneText {
                    text: text.clone(),
                    anchor: Point::new(
                        rect.center().x,
                        top + line_height * (i as f64 + 0.5) + font.size * 0.35,
                    ),
                    font,
                })
                .collect();
            nodes.push(SceneNode {
                id: node.id.clone(),
                shape: RoundedRect::from_rect(rect, config.corner_radius),
                fill: style.fill,
                border: style.border,
                border_width: config.border_width,
                text_color: config.text_color,
                lines,
            });
        }

        let content = edges
            .bounds()
            .map_or(layout.bounds(), |b| b.union(layout.bounds()));
        let half_stroke = config.edge_width.max(config.border_width) / 2.0;
        let frame = content.inflate(config.margin + half_stroke, config.margin + half_stroke);

        Ok(Self {
            frame,
            scale: config.scale,
            background: config.background,
            edges: scene_edges,
            nodes,
        })
    }

    /// Output size in whole pixels.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "dimensions are clamped to u32 range before the cast"
    )]
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |v: f64| {
            let v = (v * self.scale).ceil();
            if v.is_finite() { v.clamp(0.0, f64::from(u32::MAX)) as u32 } else { 0 }
        };
        (px(self.frame.width()), px(self.frame.height()))
    }

    /// Checks the output size against `max` and returns it.
    pub fn checked_size(&self, max: u32) -> Result<(u32, u32), ExportError> {
        let (width, height) = self.pixel_size();
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyScene);
        }
        if width > max || height > max {
            return Err(ExportError::SurfaceTooLarge { width, height, max });
        }
        Ok((width, height))
    }
}
