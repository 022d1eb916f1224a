// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mind Map Export: PNG and SVG images of a laid-out mind map.
//!
//! An export happens in two steps. [`ExportScene::build`] collects the
//! geometry of a layout and its connectors into a backend-neutral scene,
//! styled by an [`ExportConfig`]: background first, then every edge, then
//! node boxes with their labels on top. [`export`] then writes that scene in
//! the requested [`ImageFormat`].
//!
//! - PNG goes through the `vello_cpu` rasterizer and the `png` encoder.
//!   Labels are filled from glyph outlines when a font is supplied.
//! - SVG is plain text with `<path>`, `<rect>`, and `<text>` elements.
//!
//! The image covers the whole layout regardless of what the viewport shows,
//! with [`ExportConfig::margin`] of empty space around it.
//!
//! ## Minimal example
//!
//! ```rust
//! use mindmap_export::{ExportConfig, ExportScene, ImageFormat, export};
//! use mindmap_layout::{LayoutConfig, TreeLayout};
//! use mindmap_link::{EdgeSet, LinkConfig};
//! use mindmap_text::AverageAdvance;
//! use mindmap_tree::{ExpansionState, NormalizeConfig, RawNode, normalize};
//!
//! let raw = RawNode::from_json_str(r#"{"id":"r","text":"Root","children":[{"id":"a","text":"A"}]}"#).unwrap();
//! let config = NormalizeConfig::default();
//! let tree = normalize(&raw, &config, &AverageAdvance::default());
//! let visible = ExpansionState::with_root_expanded(&tree).visible_nodes(&tree);
//! let layout = TreeLayout::new(LayoutConfig::default()).unwrap().layout(&tree, &visible);
//! let edges = EdgeSet::build(&layout, &LinkConfig::default());
//!
//! let scene = ExportScene::build(
//!     &tree,
//!     &layout,
//!     &edges,
//!     &config.fonts,
//!     config.measure.line_height,
//!     &ExportConfig::default(),
//! )
//! .unwrap();
//! let svg = export(&scene, ImageFormat::Svg, None, 8192).unwrap();
//! assert!(svg.starts_with(b"<svg"));
//! ```

mod palette;
mod raster;
mod scene;
mod svg;

pub use palette::{ExportConfig, LevelStyle, parse_hex, to_hex};
pub use raster::render_png;
pub use scene::{ExportScene, SceneEdge, SceneNode, SceneText};
pub use svg::write_svg;

use mindmap_text::FontMetricsMeasurer;

/// Output encodings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImageFormat {
    /// RGBA PNG.
    #[default]
    Png,
    /// Standalone SVG document.
    Svg,
}

impl ImageFormat {
    /// MIME type of the encoded bytes.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Conventional file extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// An export could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// There are no nodes to draw.
    #[error("nothing to export")]
    EmptyScene,
    /// The image would exceed the size limit.
    #[error("export of {width}x{height} pixels exceeds the {max} pixel limit")]
    SurfaceTooLarge {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Largest allowed side.
        max: u32,
    },
    /// PNG encoding failed.
    #[error("PNG encoding failed")]
    Encode(#[from] png::EncodingError),
}

/// Encodes `scene` as `format`.
///
/// `font` supplies glyph outlines for PNG labels and is ignored for SVG.
/// Both sides of the image must fit in `max_dimension` pixels.
pub fn export(
    scene: &ExportScene,
    format: ImageFormat,
    font: Option<&FontMetricsMeasurer>,
    max_dimension: u32,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ImageFormat::Png => render_png(scene, font, max_dimension),
        ImageFormat::Svg => {
            scene.checked_size(max_dimension)?;
            Ok(write_svg(scene).into_bytes())
        }
    }
}
