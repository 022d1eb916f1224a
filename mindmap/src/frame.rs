// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a host draws each frame.

use kurbo::{BezPath, Rect, Size};
use mindmap_text::FontSpec;
use mindmap_tree::{NodeIndex, ToggleOutcome};
use mindmap_view::ViewTransform;

/// A node ready to draw, in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameNode {
    /// Node id.
    pub id: String,
    /// Node position in the current tree.
    pub index: NodeIndex,
    /// Box, possibly mid-transition.
    pub rect: Rect,
    /// Wrapped label lines.
    pub lines: Vec<String>,
    /// Font for the label.
    pub font: FontSpec,
    /// Depth in the tree; the root is 0.
    pub level: u32,
    /// `0.0` is invisible, `1.0` fully drawn.
    pub opacity: f64,
    /// The node can be toggled.
    pub has_children: bool,
    /// The node is expanded.
    pub expanded: bool,
    /// The label was cut short.
    pub truncated: bool,
    /// The pointer is over this node.
    pub hovered: bool,
    /// The node matches the active search.
    pub matched: bool,
}

/// A connector ready to draw, in world coordinates.
#[derive(Clone, Debug)]
pub struct FrameEdge {
    /// Parent node.
    pub source: NodeIndex,
    /// Child node.
    pub target: NodeIndex,
    /// Centerline.
    pub path: BezPath,
    /// Stroke width.
    pub stroke_width: f64,
    /// Width of the invisible stroke used for pointer hits.
    pub hit_width: f64,
    /// Follows the child's opacity.
    pub opacity: f64,
}

/// State for on-screen view controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlsState {
    /// Undo has something to restore.
    pub can_undo: bool,
    /// Redo has something to restore.
    pub can_redo: bool,
    /// Scale as a rounded percentage.
    pub zoom_percent: u32,
}

/// One rendered frame.
///
/// Paint edges first, then nodes, each transformed by
/// [`transform`](Self::transform).
#[derive(Clone, Debug)]
pub struct Frame {
    /// Container size in pixels.
    pub view_size: Size,
    /// World-to-view transform.
    pub transform: ViewTransform,
    /// Connectors.
    pub edges: Vec<FrameEdge>,
    /// Nodes in tree order.
    pub nodes: Vec<FrameNode>,
    /// Bounding box of the settled layout.
    pub content_bounds: Rect,
    /// Term of the active search, if any. While it is set, [`nodes`](Self::nodes)
    /// holds only matching nodes and [`edges`](Self::edges) only connectors
    /// whose two ends are both drawn.
    pub search: Option<String>,
    /// A transition is in progress.
    pub animating: bool,
    /// Present when controls were requested.
    pub controls: Option<ControlsState>,
}

impl Frame {
    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&FrameNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// A node was clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeClick {
    /// Clicked node.
    pub id: String,
    /// What the click did to its expansion. Leaves report
    /// [`ToggleOutcome::Unchanged`].
    pub outcome: ToggleOutcome,
}
