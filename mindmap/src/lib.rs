// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mind Map: an interactive, animated mind-map engine.
//!
//! [`MindMap`] ties the workspace together. It owns one measured tree, the set
//! of expanded nodes, the layout computed from them, and a viewport with undo
//! history. The host feeds it input and draws what [`MindMap::render`]
//! returns:
//!
//! - Clicking a node with children toggles it. The tree is laid out again at
//!   once and the boxes move to their new places over
//!   [`AnimationConfig::duration_ms`], driven by [`MindMap::tick`]. Toggling
//!   again mid-flight restarts from wherever the boxes are.
//! - Dragging empty canvas pans, the wheel zooms about the cursor, and the
//!   zoom, fit, and reset controls are undoable.
//! - [`MindMap::search`] narrows the frame to matching visible nodes without
//!   touching expansion or layout.
//! - [`MindMap::export_image`] writes the whole layout as PNG or SVG.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use mindmap::{MindMap, MindMapConfig};
//! use mindmap_text::AverageAdvance;
//!
//! let json = r#"{"id":"root","title":"Root","children":[{"id":"a","title":"A"},{"id":"b","title":"B"}]}"#;
//! let mut map = MindMap::from_json(json, MindMapConfig::default(), AverageAdvance::default()).unwrap();
//!
//! let frame = map.render(Size::new(800.0, 600.0), true);
//! assert_eq!(frame.nodes.len(), 3);
//! assert_eq!(frame.edges.len(), 2);
//!
//! // Collapse the root; the children slide back into it.
//! map.click_node("root").unwrap();
//! map.tick(0.0);
//! assert!(map.tick(200.0));
//! assert!(!map.tick(400.0));
//! assert_eq!(map.render(Size::new(800.0, 600.0), false).nodes.len(), 1);
//! ```

mod animation;
mod config;
mod frame;
mod map;

pub use animation::{Easing, NodePose, Poses, Transition, interpolate};
pub use config::{AnimationConfig, InitialExpansion, MindMapConfig};
pub use frame::{ControlsState, Frame, FrameEdge, FrameNode, NodeClick};
pub use map::MindMap;
pub use mindmap_export::ImageFormat;

use mindmap_export::ExportError;
use mindmap_layout::LayoutConfigError;
use mindmap_link::LinkConfigError;
use mindmap_text::MeasureConfigError;
use mindmap_tree::TreeError;
use mindmap_view::ViewConfigError;

/// Errors surfaced by [`MindMap`] and [`MindMapConfig`].
#[derive(Debug, thiserror::Error)]
pub enum MindMapError {
    /// Invalid measurement settings.
    #[error(transparent)]
    Measure(#[from] MeasureConfigError),
    /// Invalid layout settings.
    #[error(transparent)]
    Layout(#[from] LayoutConfigError),
    /// Invalid connector settings.
    #[error(transparent)]
    Link(#[from] LinkConfigError),
    /// Invalid view settings.
    #[error(transparent)]
    View(#[from] ViewConfigError),
    /// Animation duration is negative or not finite.
    #[error("animation duration must be a non-negative number of milliseconds, got {0}")]
    AnimationDuration(f64),
    /// Click tolerance is negative or not finite.
    #[error("click tolerance must be a non-negative distance, got {0}")]
    ClickTolerance(f64),
    /// A configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Config(#[from] serde_json::Error),
    /// The input tree is not valid JSON.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// Export failed.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// The map was closed.
    #[error("the mind map has been closed")]
    Closed,
}
