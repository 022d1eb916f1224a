// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interactive mind map.

use kurbo::{Point, Rect, Size};
use mindmap_export::{ExportScene, ImageFormat, export};
use mindmap_layout::{LayoutResult, TreeLayout};
use mindmap_link::{EdgeSet, build_curve};
use mindmap_text::{FontMetricsMeasurer, TextMeasure};
use mindmap_tree::{ExpansionState, MeasuredTree, NodeIndex, RawNode, ToggleOutcome, normalize};
use mindmap_view::{ViewTransform, ViewportController};
use tracing::{debug, trace, warn};

use crate::animation::{NodePose, Poses, Transition};
use crate::{ControlsState, Frame, FrameEdge, FrameNode, MindMapConfig, MindMapError, NodeClick};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Press {
    /// Pressed on a node; a release nearby clicks it.
    Node { index: NodeIndex, origin: Point },
    /// Pressed on empty canvas; the pointer pans the view.
    Pan,
}

#[derive(Clone, Debug)]
struct Search {
    term: String,
    needle: String,
}

/// A mind map with its expansion, layout, and view.
///
/// One instance owns all mutable state: the measured tree, which nodes are
/// expanded, the settled layout and its connectors, the viewport with its undo
/// history, and any in-flight transition. Every method runs synchronously.
/// Relayouts happen eagerly when expansion changes; animation is driven by
/// the host calling [`tick`](Self::tick) once per frame and then
/// [`render`](Self::render).
///
/// After [`close`](Self::close), input is ignored and exports fail with
/// [`MindMapError::Closed`].
#[derive(Debug)]
pub struct MindMap<M> {
    config: MindMapConfig,
    measurer: M,
    tree: MeasuredTree,
    expansion: ExpansionState,
    engine: TreeLayout,
    layout: LayoutResult,
    edges: EdgeSet,
    laid_out_revision: u64,
    viewport: ViewportController,
    transition: Option<Transition>,
    clock_ms: f64,
    press: Option<Press>,
    hovered: Option<NodeIndex>,
    search: Option<Search>,
    export_font: Option<FontMetricsMeasurer>,
    needs_fit: bool,
    closed: bool,
}

impl<M: TextMeasure> MindMap<M> {
    /// Builds a map from an input tree.
    ///
    /// Fails only if `config` is invalid. The view is fitted to the content
    /// on the first [`render`](Self::render) with a non-empty container.
    pub fn new(root: &RawNode, config: MindMapConfig, measurer: M) -> Result<Self, MindMapError> {
        config.validate()?;
        let engine = TreeLayout::new(config.layout)?;
        let viewport = ViewportController::new(config.view)?;
        let tree = normalize(root, &config.normalize_config(), &measurer);
        let expansion = config.initial_expansion.state(&tree);
        let layout = engine.layout(&tree, &expansion.visible_nodes(&tree));
        let edges = EdgeSet::build(&layout, &config.link);
        debug!(nodes = tree.len(), visible = layout.len(), "mind map created");
        Ok(Self {
            laid_out_revision: expansion.revision(),
            config,
            measurer,
            tree,
            expansion,
            engine,
            layout,
            edges,
            viewport,
            transition: None,
            clock_ms: 0.0,
            press: None,
            hovered: None,
            search: None,
            export_font: None,
            needs_fit: true,
            closed: false,
        })
    }

    /// Builds a map from JSON input. See [`RawNode::from_json_str`].
    pub fn from_json(json: &str, config: MindMapConfig, measurer: M) -> Result<Self, MindMapError> {
        let root = RawNode::from_json_str(json)?;
        Self::new(&root, config, measurer)
    }

    /// Replaces the content.
    ///
    /// Nodes whose ids survive keep their expansion; if none do, the initial
    /// expansion applies. Any transition is dropped and the view is fitted
    /// again on the next render.
    pub fn set_tree(&mut self, root: &RawNode) {
        if self.closed {
            return;
        }
        let tree = normalize(root, &self.config.normalize_config(), &self.measurer);
        let mut expansion = ExpansionState::new();
        for (index, node) in self.tree.iter() {
            if self.expansion.is_expanded(index) {
                if let Some(carried) = tree.find(&node.id) {
                    expansion.expand(&tree, carried);
                }
            }
        }
        if expansion.expanded_len() == 0 {
            expansion = self.config.initial_expansion.state(&tree);
        }
        self.tree = tree;
        self.expansion = expansion;
        self.transition = None;
        self.pointer_leave();
        self.relayout(false);
        self.needs_fit = true;
    }

    /// Uses `font` for label glyphs in PNG exports.
    pub fn set_export_font(&mut self, font: Option<FontMetricsMeasurer>) {
        self.export_font = font;
    }

    /// Produces the frame to draw in a container of `container_size` pixels.
    ///
    /// Positions are sampled at the time of the last [`tick`](Self::tick).
    pub fn render(&mut self, container_size: Size, show_controls: bool) -> Frame {
        self.viewport.set_view_size(container_size);
        if self.needs_fit && container_size.width > 0.0 && container_size.height > 0.0 {
            if let Some(fit) = self.viewport.fit_transform(self.layout.bounds()) {
                self.viewport.set_transform(fit);
            }
            self.viewport.reset_history();
            self.needs_fit = false;
        }

        let (mut nodes, mut edges) = match &self.transition {
            Some(transition) => {
                let poses = transition.current(self.clock_ms);
                let nodes = self.frame_nodes(&poses);
                let edges = self.transition_edges(&poses);
                (nodes, edges)
            }
            None => (self.frame_nodes(&self.settled_poses()), self.settled_edges()),
        };
        if self.search.is_some() {
            nodes.retain(|n| n.matched);
            let drawn = |index: NodeIndex| nodes.iter().any(|n| n.index == index);
            edges.retain(|e| drawn(e.source) && drawn(e.target));
        }

        let controls = show_controls.then(|| ControlsState {
            can_undo: self.viewport.can_undo(),
            can_redo: self.viewport.can_redo(),
            zoom_percent: zoom_percent(self.viewport.transform()),
        });
        Frame {
            view_size: self.viewport.view_size(),
            transform: self.viewport.transform(),
            edges,
            nodes,
            content_bounds: self.layout.bounds(),
            search: self.search.as_ref().map(|s| s.term.clone()),
            animating: self.transition.is_some(),
            controls,
        }
    }

    /// Advances the animation clock. Returns `true` while a transition is
    /// still running, so the host knows to request another frame.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.closed || !now_ms.is_finite() {
            return self.is_animating();
        }
        self.clock_ms = now_ms;
        if let Some(transition) = &mut self.transition {
            let progress = transition.progress(now_ms);
            trace!(progress, "animation tick");
            if transition.is_finished(now_ms) {
                self.transition = None;
                debug!("transition finished");
            }
        }
        self.is_animating()
    }

    /// Returns `true` while a transition is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Clicks the node `id`: nodes with children toggle, leaves only report
    /// the click. Unknown or hidden nodes return `None`.
    pub fn click_node(&mut self, id: &str) -> Option<NodeClick> {
        if self.closed {
            return None;
        }
        let index = self.tree.find(id)?;
        if !self.expansion.is_visible(&self.tree, index) {
            return None;
        }
        self.click_index(index)
    }

    /// Flips the expansion of `id` and animates the relayout.
    pub fn toggle_node(&mut self, id: &str) -> ToggleOutcome {
        if self.closed {
            return ToggleOutcome::Unchanged;
        }
        let outcome = self.expansion.toggle(&self.tree, id);
        self.sync_layout();
        outcome
    }

    /// Expands every node.
    pub fn expand_all(&mut self) {
        if !self.closed {
            self.expansion.expand_all(&self.tree);
            self.sync_layout();
        }
    }

    /// Collapses everything below the root's children and forgets remembered
    /// subtrees.
    pub fn collapse_to_root(&mut self) {
        if !self.closed {
            self.expansion.collapse_to_root(&self.tree);
            self.sync_layout();
        }
    }

    /// Shows levels `0..=depth`.
    pub fn expand_to_depth(&mut self, depth: u32) {
        if !self.closed {
            self.expansion.expand_to_depth(&self.tree, depth);
            self.sync_layout();
        }
    }

    /// Zooms in one step about the view center.
    pub fn zoom_in(&mut self) -> bool {
        !self.closed && self.viewport.zoom_in()
    }

    /// Zooms out one step about the view center.
    pub fn zoom_out(&mut self) -> bool {
        !self.closed && self.viewport.zoom_out()
    }

    /// Returns to scale 1 with no pan.
    pub fn reset_view(&mut self) {
        if !self.closed {
            self.viewport.reset();
        }
    }

    /// Fits the whole layout into the view.
    pub fn fit_to_content(&mut self) -> bool {
        !self.closed && !self.layout.is_empty() && self.viewport.fit_to(self.layout.bounds())
    }

    /// Pans so that node `id` sits in the middle of the view.
    pub fn center_on_node(&mut self, id: &str) -> bool {
        if self.closed {
            return false;
        }
        let Some(center) = self
            .tree
            .find(id)
            .and_then(|index| self.layout.get(index))
            .map(|node| node.center)
        else {
            return false;
        };
        self.viewport.center_on(center)
    }

    /// Restores the previous view.
    pub fn undo(&mut self) -> bool {
        !self.closed && self.viewport.undo()
    }

    /// Re-applies the next view.
    pub fn redo(&mut self) -> bool {
        !self.closed && self.viewport.redo()
    }

    /// Zooms for a wheel event, keeping the world point under `cursor` in
    /// place when given.
    pub fn wheel(&mut self, delta_y: f64, cursor: Option<Point>) -> bool {
        !self.closed && self.viewport.wheel(delta_y, cursor)
    }

    /// Starts a press at `pointer` (view pixels). On a node it becomes a
    /// click candidate; on empty canvas it starts panning.
    pub fn pointer_down(&mut self, pointer: Point) {
        if self.closed {
            return;
        }
        if let Some(Press::Pan) = self.press {
            self.viewport.end_pan();
        }
        self.press = Some(match self.node_under(pointer) {
            Some(index) => Press::Node {
                index,
                origin: pointer,
            },
            None => {
                self.viewport.begin_pan(pointer);
                Press::Pan
            }
        });
    }

    /// Moves the pointer: pans while panning, otherwise tracks hover.
    pub fn pointer_move(&mut self, pointer: Point) {
        if self.closed {
            return;
        }
        match self.press {
            Some(Press::Pan) => {
                self.viewport.drag_to(pointer);
            }
            _ => self.hovered = self.node_under(pointer),
        }
    }

    /// Ends a press. Returns the click when the press started and ended on
    /// the same node without travelling beyond the click tolerance.
    pub fn pointer_up(&mut self, pointer: Point) -> Option<NodeClick> {
        if self.closed {
            return None;
        }
        match self.press.take()? {
            Press::Pan => {
                self.viewport.end_pan();
                None
            }
            Press::Node { index, origin } => {
                let travel = (pointer - origin).hypot();
                if travel <= self.config.click_tolerance && self.node_under(pointer) == Some(index) {
                    self.click_index(index)
                } else {
                    None
                }
            }
        }
    }

    /// The pointer left the container: ends any pan and clears hover.
    pub fn pointer_leave(&mut self) {
        if let Some(Press::Pan) = self.press.take() {
            self.viewport.end_pan();
        }
        self.hovered = None;
    }

    /// Limits drawing to visible nodes whose text contains `term`, ignoring
    /// case. Expansion and layout are untouched. Returns the number of
    /// matches. A blank term clears the search.
    pub fn search(&mut self, term: &str) -> usize {
        if self.closed {
            return 0;
        }
        let term = term.trim();
        if term.is_empty() {
            self.search = None;
            return 0;
        }
        self.search = Some(Search {
            term: term.to_owned(),
            needle: term.to_lowercase(),
        });
        self.search_matches(term).len()
    }

    /// Drops the active search.
    pub fn clear_search(&mut self) {
        self.search = None;
    }

    /// Ids of visible nodes whose text contains `term`, ignoring case, in
    /// tree order. Does not change the active search.
    #[must_use]
    pub fn search_matches(&self, term: &str) -> Vec<String> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.expansion
            .visible_nodes(&self.tree)
            .into_iter()
            .filter_map(|index| self.tree.get(index))
            .filter(|node| node.text.to_lowercase().contains(&needle))
            .map(|node| node.id.clone())
            .collect()
    }

    /// Encodes the settled layout as an image, independent of the view.
    pub fn export_image(&self, format: ImageFormat) -> Result<Vec<u8>, MindMapError> {
        if self.closed {
            return Err(MindMapError::Closed);
        }
        ExportScene::build(
            &self.tree,
            &self.layout,
            &self.edges,
            &self.config.fonts,
            self.config.measure.line_height,
            &self.config.export,
        )
        .and_then(|scene| {
            export(
                &scene,
                format,
                self.export_font.as_ref(),
                self.config.export.max_dimension,
            )
        })
        .map_err(|err| {
            warn!(error = %err, ?format, "export failed");
            err.into()
        })
    }

    /// Stops the map: the transition is dropped, any pan ends, and all
    /// further input is ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.transition = None;
        self.pointer_leave();
        self.press = None;
        self.closed = true;
        debug!("mind map closed");
    }

    /// Returns `true` after [`close`](Self::close).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MindMapConfig {
        &self.config
    }

    /// The measured tree.
    #[must_use]
    pub fn tree(&self) -> &MeasuredTree {
        &self.tree
    }

    /// Current expansion.
    #[must_use]
    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Ids of visible nodes in tree order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<&str> {
        self.expansion
            .visible_nodes(&self.tree)
            .into_iter()
            .filter_map(|index| self.tree.get(index))
            .map(|node| node.id.as_str())
            .collect()
    }

    /// The settled layout, which transitions move towards.
    #[must_use]
    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    /// Connectors of the settled layout.
    #[must_use]
    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    /// The viewport.
    #[must_use]
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Bounding box of the settled layout.
    #[must_use]
    pub fn content_bounds(&self) -> Rect {
        self.layout.bounds()
    }

    /// Id of the node under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered
            .and_then(|index| self.tree.get(index))
            .map(|node| node.id.as_str())
    }

    fn click_index(&mut self, index: NodeIndex) -> Option<NodeClick> {
        let node = self.tree.get(index)?;
        let id = node.id.clone();
        let outcome = if node.has_children() {
            self.expansion.toggle_index(&self.tree, index)
        } else {
            ToggleOutcome::Unchanged
        };
        self.sync_layout();
        Some(NodeClick { id, outcome })
    }

    fn sync_layout(&mut self) {
        if self.expansion.revision() != self.laid_out_revision {
            self.relayout(true);
        }
    }

    fn relayout(&mut self, animate: bool) {
        let current = self.current_poses();
        let visible = self.expansion.visible_nodes(&self.tree);
        debug!(visible = visible.len(), animate, "relayout");
        let layout = self.engine.layout(&self.tree, &visible);
        let edges = EdgeSet::build(&layout, &self.config.link);
        debug!(nodes = layout.len(), edges = edges.len(), "relayout finished");

        let animation = self.config.animation;
        self.transition = (animate && animation.duration_ms > 0.0).then(|| {
            let (from, to) = self.plan_transition(&current, &layout);
            Transition::new(from, to, animation.duration_ms, animation.easing)
        });
        self.layout = layout;
        self.edges = edges;
        self.laid_out_revision = self.expansion.revision();
        if self.hovered.is_some_and(|h| self.layout.get(h).is_none()) {
            self.hovered = None;
        }
    }

    /// Pairs current poses with the poses `next` settles on.
    ///
    /// Entering nodes grow out of their nearest drawn ancestor; leaving nodes
    /// shrink into their nearest ancestor that stays.
    fn plan_transition(&self, current: &Poses, next: &LayoutResult) -> (Poses, Poses) {
        let mut from = Poses::with_capacity(next.len());
        let mut to = Poses::with_capacity(next.len());
        for node in next.nodes() {
            let start = current.get(&node.index).copied().unwrap_or_else(|| {
                let anchor = self
                    .tree
                    .ancestors(node.index)
                    .find_map(|a| current.get(&a))
                    .map_or(node.center, |p| p.center);
                NodePose {
                    center: anchor,
                    size: node.size,
                    opacity: 0.0,
                }
            });
            from.insert(node.index, start);
            to.insert(node.index, NodePose::settled(node.center, node.size));
        }
        for (&index, &start) in current {
            if next.get(index).is_some() || start.opacity <= 0.0 {
                continue;
            }
            let Some(anchor) = self.tree.ancestors(index).find_map(|a| next.get(a)) else {
                continue;
            };
            from.insert(index, start);
            to.insert(
                index,
                NodePose {
                    center: anchor.center,
                    size: start.size,
                    opacity: 0.0,
                },
            );
        }
        (from, to)
    }

    fn current_poses(&self) -> Poses {
        match &self.transition {
            Some(transition) => transition.current(self.clock_ms),
            None => self.settled_poses(),
        }
    }

    fn settled_poses(&self) -> Poses {
        self.layout
            .nodes()
            .iter()
            .map(|n| (n.index, NodePose::settled(n.center, n.size)))
            .collect()
    }

    fn frame_nodes(&self, poses: &Poses) -> Vec<FrameNode> {
        let mut ordered: Vec<(NodeIndex, NodePose)> = poses.iter().map(|(&i, &p)| (i, p)).collect();
        ordered.sort_by_key(|(index, _)| *index);
        ordered
            .into_iter()
            .filter_map(|(index, pose)| {
                let node = self.tree.get(index)?;
                let rect = pose.rect();
                if !rect.is_finite() {
                    warn!(id = %node.id, "skipping node with non-finite geometry");
                    return None;
                }
                Some(FrameNode {
                    id: node.id.clone(),
                    index,
                    rect,
                    lines: node.lines.clone(),
                    font: self.config.fonts.for_level(node.level),
                    level: node.level,
                    opacity: pose.opacity.clamp(0.0, 1.0),
                    has_children: node.has_children(),
                    expanded: self.expansion.is_expanded(index),
                    truncated: node.truncated,
                    hovered: self.hovered == Some(index),
                    matched: self.matches_search(index),
                })
            })
            .collect()
    }

    fn settled_edges(&self) -> Vec<FrameEdge> {
        self.edges
            .edges()
            .iter()
            .map(|edge| FrameEdge {
                source: edge.source,
                target: edge.target,
                path: edge.path(),
                stroke_width: self.config.link.stroke_width,
                hit_width: self.config.link.hit_width,
                opacity: 1.0,
            })
            .collect()
    }

    /// Connectors between interpolated boxes.
    fn transition_edges(&self, poses: &Poses) -> Vec<FrameEdge> {
        let mut children: Vec<NodeIndex> = poses.keys().copied().collect();
        children.sort();
        children
            .into_iter()
            .filter_map(|child| {
                let parent = self.tree.get(child)?.parent?;
                let (p, c) = (poses.get(&parent)?, poses.get(&child)?);
                let curve = build_curve(
                    p.rect(),
                    c.rect(),
                    self.layout.orientation(),
                    &self.config.link,
                )?;
                Some(FrameEdge {
                    source: parent,
                    target: child,
                    path: curve.to_path(),
                    stroke_width: self.config.link.stroke_width,
                    hit_width: self.config.link.hit_width,
                    opacity: c.opacity.min(p.opacity).clamp(0.0, 1.0),
                })
            })
            .collect()
    }

    /// `true` when an active search matches `index`.
    fn matches_search(&self, index: NodeIndex) -> bool {
        self.search.as_ref().is_some_and(|s| {
            self.tree
                .get(index)
                .is_some_and(|node| node.text.to_lowercase().contains(&s.needle))
        })
    }

    /// Node drawn under a view-space point. Nodes hidden by the active search
    /// are not drawn and cannot be hit.
    fn node_under(&self, pointer: Point) -> Option<NodeIndex> {
        let world = self.viewport.view_to_world(pointer);
        let drawn = |index: NodeIndex| self.search.is_none() || self.matches_search(index);
        match &self.transition {
            None => self
                .layout
                .node_at(world)
                .map(|n| n.index)
                .filter(|&index| drawn(index)),
            Some(transition) => transition
                .current(self.clock_ms)
                .into_iter()
                .filter(|(index, pose)| {
                    pose.opacity > 0.5 && pose.rect().contains(world) && drawn(*index)
                })
                .map(|(index, _)| index)
                .max(),
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "scale is clamped to a small positive range"
)]
fn zoom_percent(transform: ViewTransform) -> u32 {
    (transform.scale * 100.0).round().max(0.0) as u32
}
