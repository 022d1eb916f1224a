// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tidy placement followed by per-level collision resolution.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use mindmap_tree::{MeasuredTree, NodeIndex};
use tracing::{debug, trace, warn};

use crate::{LayoutConfig, LayoutConfigError, Orientation};

/// Box size used for nodes whose measured size is not a finite positive value.
pub const FALLBACK_SIZE: Size = Size::new(160.0, 40.0);

/// A visible node with its final geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
    /// Position of the node in its [`MeasuredTree`].
    pub index: NodeIndex,
    /// Stable node id.
    pub id: String,
    /// Box center in world coordinates.
    pub center: Point,
    /// Box size.
    pub size: Size,
    /// Depth in the full tree; the root is 0.
    pub level: u32,
    /// Laid-out parent, or `None` for the layout root.
    pub parent: Option<NodeIndex>,
}

impl PositionedNode {
    /// The node's box in world coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }
}

/// Parent/child pair that both made it into the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutEdge {
    /// Parent node.
    pub parent: NodeIndex,
    /// Child node.
    pub child: NodeIndex,
}

/// How the last layout went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutDiagnostics {
    /// Collision-resolution passes, summed over all levels.
    pub iterations: u32,
    /// `false` if some level hit the iteration cap and had to be swept.
    pub converged: bool,
    /// Number of level gaps that were widened to fit oversized boxes.
    pub widened_levels: u32,
}

impl Default for LayoutDiagnostics {
    fn default() -> Self {
        Self {
            iterations: 0,
            converged: true,
            widened_levels: 0,
        }
    }
}

/// Output of [`TreeLayout::layout`].
#[derive(Clone, Debug, Default)]
pub struct LayoutResult {
    nodes: Vec<PositionedNode>,
    edges: Vec<LayoutEdge>,
    bounds: Rect,
    orientation: Orientation,
    diagnostics: LayoutDiagnostics,
    lookup: HashMap<NodeIndex, usize>,
}

impl LayoutResult {
    /// Positioned nodes in pre-order; the layout root comes first.
    #[must_use]
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    /// One edge per laid-out non-root node.
    #[must_use]
    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    /// Union of every node box, or [`Rect::ZERO`] when empty.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Orientation the layout was computed with.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Convergence information.
    #[must_use]
    pub fn diagnostics(&self) -> LayoutDiagnostics {
        self.diagnostics
    }

    /// Number of positioned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing was laid out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up the geometry of a tree node.
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&PositionedNode> {
        self.lookup.get(&index).map(|&i| &self.nodes[i])
    }

    /// Topmost node whose box contains `world`, if any.
    ///
    /// Boxes never overlap, so at most one node matches.
    #[must_use]
    pub fn node_at(&self, world: Point) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.rect().contains(world))
    }
}

/// Computes tidy layouts with a fixed, validated configuration.
#[derive(Clone, Debug, Default)]
pub struct TreeLayout {
    config: LayoutConfig,
}

struct Slot {
    index: NodeIndex,
    level: u32,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
    /// Extent along the axis levels advance on.
    primary: f64,
    /// Extent along the axis siblings spread over.
    secondary: f64,
}

impl TreeLayout {
    /// Validates `config` and builds a layout engine.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out `visible`, normally the output of
    /// [`ExpansionState::visible_nodes`](mindmap_tree::ExpansionState::visible_nodes).
    ///
    /// The first entry becomes the layout root and is placed at the origin.
    /// Entries whose parent is not laid out before them are skipped, as are
    /// indices outside `tree` and repeats.
    ///
    /// 1. Levels are placed along the primary axis, `level_gap` apart, or
    ///    further when adjacent levels hold boxes too large for that gap.
    /// 2. Leaves take consecutive slots `sibling_gap` apart in pre-order and
    ///    each parent is centered on the span of its children.
    /// 3. Each level, top down, is de-overlapped: every pair of neighbours
    ///    closer than `min_gap` is pushed apart symmetrically by `damping`
    ///    times half the overlap, and every move carries the node's whole
    ///    subtree. Passes repeat until the worst overlap is within
    ///    `tolerance` or `max_iterations` is reached; a final sweep then
    ///    removes whatever is left.
    #[must_use]
    pub fn layout(&self, tree: &MeasuredTree, visible: &[NodeIndex]) -> LayoutResult {
        let orientation = self.config.orientation;
        let slots = collect(tree, visible, orientation);
        if slots.is_empty() {
            return LayoutResult {
                orientation,
                ..LayoutResult::default()
            };
        }

        let mut diagnostics = LayoutDiagnostics::default();
        let levels = group_levels(&slots);
        let ends = subtree_ends(&slots);
        let primary = self.level_positions(&slots, &levels, &mut diagnostics);
        let mut secondary = self.initial_secondary(&slots);
        for (depth, members) in levels.iter().enumerate() {
            self.resolve_level(depth, members, &slots, &ends, &mut secondary, &mut diagnostics);
        }

        let result = assemble(tree, &slots, &primary, &secondary, orientation, diagnostics);
        debug!(
            nodes = result.len(),
            iterations = diagnostics.iterations,
            converged = diagnostics.converged,
            "layout complete"
        );
        result
    }

    fn level_positions(
        &self,
        slots: &[Slot],
        levels: &[Vec<usize>],
        diagnostics: &mut LayoutDiagnostics,
    ) -> Vec<f64> {
        let widest: Vec<f64> = levels
            .iter()
            .map(|members| members.iter().map(|&i| slots[i].primary).fold(0.0, f64::max))
            .collect();
        let mut positions = Vec::with_capacity(levels.len());
        positions.push(0.0);
        for (depth, pair) in widest.windows(2).enumerate() {
            let needed = (pair[0] + pair[1]) / 2.0 + self.config.min_gap;
            let gap = if needed > self.config.level_gap {
                diagnostics.widened_levels += 1;
                debug!(level = depth + 1, gap = needed, "widening level gap");
                needed
            } else {
                self.config.level_gap
            };
            let previous = positions[depth];
            positions.push(previous + gap);
        }
        positions
    }

    fn initial_secondary(&self, slots: &[Slot]) -> Vec<f64> {
        let mut secondary = vec![0.0; slots.len()];
        let mut next_leaf = 0.0;
        for (i, slot) in slots.iter().enumerate() {
            if slot.children.is_empty() {
                secondary[i] = next_leaf;
                next_leaf += self.config.sibling_gap;
            }
        }
        // Reverse pre-order visits children before their parent.
        for (i, slot) in slots.iter().enumerate().rev() {
            if let (Some(&first), Some(&last)) = (slot.children.first(), slot.children.last()) {
                secondary[i] = (secondary[first] + secondary[last]) / 2.0;
            }
        }
        secondary
    }

    fn resolve_level(
        &self,
        depth: usize,
        members: &[usize],
        slots: &[Slot],
        ends: &[usize],
        secondary: &mut [f64],
        diagnostics: &mut LayoutDiagnostics,
    ) {
        if members.len() < 2 {
            return;
        }
        let config = &self.config;
        let mut order = members.to_vec();
        order.sort_by(|&a, &b| secondary[a].total_cmp(&secondary[b]).then(a.cmp(&b)));

        // Shifts below keep neighbours in order, so `order` stays sorted.
        let required: Vec<f64> = order
            .windows(2)
            .map(|pair| (slots[pair[0]].secondary + slots[pair[1]].secondary) / 2.0 + config.min_gap)
            .collect();
        let mut overlaps = vec![0.0; required.len()];
        let mut iterations = 0;
        let converged = loop {
            let mut worst = 0.0_f64;
            for (k, pair) in order.windows(2).enumerate() {
                let overlap = required[k] - (secondary[pair[1]] - secondary[pair[0]]);
                overlaps[k] = overlap.max(0.0);
                worst = worst.max(overlap);
            }
            if worst <= config.tolerance {
                break true;
            }
            if iterations == config.max_iterations {
                warn!(
                    level = depth,
                    iterations,
                    overlap = worst,
                    "collision resolution did not converge; sweeping remaining overlaps"
                );
                break false;
            }
            iterations += 1;

            // Node `j` is pushed up by half of every overlap below it and down
            // by half of every overlap above it.
            let half = config.damping / 2.0;
            let total: f64 = overlaps.iter().sum();
            let mut below = 0.0;
            for (j, &node) in order.iter().enumerate() {
                shift_subtree(secondary, node, ends[node], half * (2.0 * below - total));
                if let Some(&overlap) = overlaps.get(j) {
                    below += overlap;
                }
            }
            trace!(level = depth, iteration = iterations, overlap = worst, "collision pass");
        };

        for (k, pair) in order.windows(2).enumerate() {
            let floor = secondary[pair[0]] + required[k];
            let node = pair[1];
            if secondary[node] < floor {
                shift_subtree(secondary, node, ends[node], floor - secondary[node]);
            }
        }

        diagnostics.iterations += iterations;
        diagnostics.converged &= converged;
    }
}

fn shift_subtree(secondary: &mut [f64], start: usize, end: usize, delta: f64) {
    if delta != 0.0 {
        for value in &mut secondary[start..end] {
            *value += delta;
        }
    }
}

fn sanitize(size: Size) -> Size {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    Size::new(
        if ok(size.width) { size.width } else { FALLBACK_SIZE.width },
        if ok(size.height) { size.height } else { FALLBACK_SIZE.height },
    )
}

/// Gathers layout slots and reorders them depth first so that every subtree
/// occupies a contiguous range.
fn collect(tree: &MeasuredTree, visible: &[NodeIndex], orientation: Orientation) -> Vec<Slot> {
    let mut slots: Vec<Slot> = Vec::with_capacity(visible.len());
    let mut local: HashMap<NodeIndex, usize> = HashMap::with_capacity(visible.len());
    for &index in visible {
        let Some(node) = tree.get(index) else {
            debug!(index = index.get(), "skipping index outside the tree");
            continue;
        };
        if local.contains_key(&index) {
            continue;
        }
        let parent = match node.parent.and_then(|p| local.get(&p).copied()) {
            Some(p) => Some(p),
            None if slots.is_empty() => None,
            None => {
                debug!(id = node.id.as_str(), "skipping node whose parent is not laid out");
                continue;
            }
        };
        let size = sanitize(node.size());
        let (primary, secondary) = match orientation {
            Orientation::Horizontal => (size.width, size.height),
            Orientation::Vertical => (size.height, size.width),
        };
        let slot = slots.len();
        let depth = match parent {
            Some(p) => {
                slots[p].children.push(slot);
                slots[p].depth + 1
            }
            None => 0,
        };
        local.insert(index, slot);
        slots.push(Slot {
            index,
            level: node.level,
            parent,
            children: Vec::new(),
            depth,
            primary,
            secondary,
        });
    }
    if slots.is_empty() {
        return slots;
    }

    let mut order = Vec::with_capacity(slots.len());
    let mut stack = vec![0_usize];
    while let Some(s) = stack.pop() {
        order.push(s);
        stack.extend(slots[s].children.iter().rev().copied());
    }
    let mut rank = vec![0_usize; slots.len()];
    for (r, &s) in order.iter().enumerate() {
        rank[s] = r;
    }
    order
        .iter()
        .map(|&s| {
            let slot = &slots[s];
            Slot {
                index: slot.index,
                level: slot.level,
                parent: slot.parent.map(|p| rank[p]),
                children: slot.children.iter().map(|&c| rank[c]).collect(),
                depth: slot.depth,
                primary: slot.primary,
                secondary: slot.secondary,
            }
        })
        .collect()
}

fn group_levels(slots: &[Slot]) -> Vec<Vec<usize>> {
    let mut levels: Vec<Vec<usize>> = Vec::new();
    for (i, slot) in slots.iter().enumerate() {
        if levels.len() <= slot.depth {
            levels.resize_with(slot.depth + 1, Vec::new);
        }
        levels[slot.depth].push(i);
    }
    levels
}

/// Exclusive end of each slot's subtree range.
fn subtree_ends(slots: &[Slot]) -> Vec<usize> {
    let mut ends: Vec<usize> = (1..=slots.len()).collect();
    for (i, slot) in slots.iter().enumerate().rev() {
        if let Some(p) = slot.parent {
            ends[p] = ends[p].max(ends[i]);
        }
    }
    ends
}

fn assemble(
    tree: &MeasuredTree,
    slots: &[Slot],
    primary: &[f64],
    secondary: &[f64],
    orientation: Orientation,
    diagnostics: LayoutDiagnostics,
) -> LayoutResult {
    let origin = secondary[0];
    let mut nodes = Vec::with_capacity(slots.len());
    let mut lookup = HashMap::with_capacity(slots.len());
    for (i, slot) in slots.iter().enumerate() {
        let (p, s) = (primary[slot.depth], secondary[i] - origin);
        let (center, size) = match orientation {
            Orientation::Horizontal => (Point::new(p, s), Size::new(slot.primary, slot.secondary)),
            Orientation::Vertical => (Point::new(s, p), Size::new(slot.secondary, slot.primary)),
        };
        if !center.is_finite() {
            warn!(index = slot.index.get(), "dropping node with a non-finite position");
            continue;
        }
        lookup.insert(slot.index, nodes.len());
        nodes.push(PositionedNode {
            index: slot.index,
            id: tree[slot.index].id.clone(),
            center,
            size,
            level: slot.level,
            parent: slot.parent.map(|p| slots[p].index),
        });
    }

    let edges = nodes
        .iter()
        .filter_map(|n| {
            let parent = n.parent?;
            lookup.contains_key(&parent).then_some(LayoutEdge {
                parent,
                child: n.index,
            })
        })
        .collect();
    let bounds = nodes
        .iter()
        .map(PositionedNode::rect)
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO);

    LayoutResult {
        nodes,
        edges,
        bounds,
        orientation,
        diagnostics,
        lookup,
    }
}
