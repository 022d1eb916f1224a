// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized, measured tree.

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::{Index, Range};

use hashbrown::{HashMap, HashSet};
use kurbo::Size;
use mindmap_text::{FontTiers, MeasureConfig, TextMeasure, measure};

use crate::RawNode;

/// Label used for nodes whose input carries no usable text.
pub const PLACEHOLDER_TEXT: &str = "Untitled";

/// Base used for nodes whose input carries no id.
const PLACEHOLDER_ID: &str = "node";

/// Position of a node in its [`MeasuredTree`], in pre-order.
///
/// The root is always [`NodeIndex::ROOT`]. Indices are only meaningful for
/// the tree that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Index of the root node.
    pub const ROOT: Self = Self(0);

    /// Returns the raw pre-order position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// A node after id repair and text measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredNode {
    /// Unique id within the tree.
    pub id: String,
    /// Canonical label.
    pub text: String,
    /// Wrapped label lines.
    pub lines: Vec<String>,
    /// Fitted box width.
    pub box_width: f64,
    /// Fitted box height.
    pub box_height: f64,
    /// Whether the label was cut to respect the line cap.
    pub truncated: bool,
    /// Depth from the root (root = 0).
    pub level: u32,
    /// Parent, `None` for the root.
    pub parent: Option<NodeIndex>,
    /// Children in input order.
    pub children: Vec<NodeIndex>,
}

impl MeasuredNode {
    /// Returns `true` if the node has at least one child.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the fitted box size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.box_width, self.box_height)
    }
}

/// Settings for [`normalize`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NormalizeConfig {
    /// Wrapping limits and paddings.
    pub measure: MeasureConfig,
    /// Depth-keyed font scale.
    pub fonts: FontTiers,
}

/// Immutable, measured tree stored as a pre-order arena.
///
/// Because nodes are laid out in pre-order, the subtree of any node occupies
/// a contiguous index range starting at the node itself.
#[derive(Clone, Debug)]
pub struct MeasuredTree {
    nodes: Vec<MeasuredNode>,
    subtree_end: Vec<usize>,
    by_id: HashMap<String, NodeIndex>,
}

impl MeasuredTree {
    /// Returns the root index.
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        NodeIndex::ROOT
    }

    /// Returns the number of nodes, which is never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`, if it belongs to this tree.
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&MeasuredNode> {
        self.nodes.get(index.0)
    }

    /// Looks a node up by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    /// Returns `true` if `index` belongs to this tree.
    #[must_use]
    pub fn contains(&self, index: NodeIndex) -> bool {
        index.0 < self.nodes.len()
    }

    /// Iterates over all nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &MeasuredNode)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
    }

    /// Returns the index range of `index`'s subtree, itself included.
    #[must_use]
    pub fn subtree_range(&self, index: NodeIndex) -> Range<usize> {
        match self.subtree_end.get(index.0) {
            Some(&end) => index.0..end,
            None => 0..0,
        }
    }

    /// Iterates over the strict descendants of `index` in pre-order.
    pub fn descendants(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> {
        let range = self.subtree_range(index);
        (range.start.saturating_add(1)..range.end.max(range.start)).map(NodeIndex)
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeIndex, node: NodeIndex) -> bool {
        ancestor != node && self.subtree_range(ancestor).contains(&node.0)
    }

    /// Iterates from `index`'s parent up to the root.
    pub fn ancestors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let mut next = self.get(index).and_then(|n| n.parent);
        core::iter::from_fn(move || {
            let current = next?;
            next = self.get(current).and_then(|n| n.parent);
            Some(current)
        })
    }

    /// Returns the deepest level in the tree.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.nodes.iter().map(|n| n.level).max().unwrap_or(0)
    }
}

impl Index<NodeIndex> for MeasuredTree {
    type Output = MeasuredNode;

    fn index(&self, index: NodeIndex) -> &MeasuredNode {
        &self.nodes[index.0]
    }
}

/// Walks `root` depth-first, repairing ids and measuring every label.
///
/// - Labels come from the raw `text`; blank or missing labels become
///   [`PLACEHOLDER_TEXT`].
/// - Each node is measured with the font for its level. Nodes with children
///   reserve room for the expand/collapse affordance.
/// - The first node to claim an id keeps it. Later claimants get
///   `{id}-{path}-{n}`, where `path` is the chain of labels from the root to
///   the node with every non-alphanumeric character replaced by `-`, and `n`
///   is a counter shared by the whole walk. The counter advances until the
///   candidate is free, so the result is unique without any randomness.
/// - Nodes are never dropped and siblings keep their order.
pub fn normalize<M: TextMeasure + ?Sized>(
    root: &RawNode,
    config: &NormalizeConfig,
    measurer: &M,
) -> MeasuredTree {
    struct Pending<'a> {
        raw: &'a RawNode,
        parent: Option<NodeIndex>,
        level: u32,
        path: String,
    }

    let mut nodes: Vec<MeasuredNode> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut by_id: HashMap<String, NodeIndex> = HashMap::new();
    let mut counter: u64 = 0;

    let mut stack = alloc::vec![Pending {
        raw: root,
        parent: None,
        level: 0,
        path: String::new(),
    }];
    while let Some(Pending {
        raw,
        parent,
        level,
        path,
    }) = stack.pop()
    {
        let index = NodeIndex(nodes.len());
        let text = match raw.text.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_owned(),
            _ => PLACEHOLDER_TEXT.to_owned(),
        };
        let path = if path.is_empty() {
            text.clone()
        } else {
            format!("{path}-{text}")
        };

        let base = raw.id.as_deref().unwrap_or(PLACEHOLDER_ID);
        let id = unique_id(base, &path, &mut seen, &mut counter);
        by_id.insert(id.clone(), index);

        let font = config.fonts.for_level(level);
        let has_children = !raw.children.is_empty();
        let m = measure(measurer, &text, &font, &config.measure, has_children);

        if let Some(p) = parent {
            nodes[p.0].children.push(index);
        }
        nodes.push(MeasuredNode {
            id,
            text,
            lines: m.lines,
            box_width: m.box_width,
            box_height: m.box_height,
            truncated: m.truncated,
            level,
            parent,
            children: Vec::with_capacity(raw.children.len()),
        });

        for child in raw.children.iter().rev() {
            stack.push(Pending {
                raw: child,
                parent: Some(index),
                level: level.saturating_add(1),
                path: path.clone(),
            });
        }
    }

    let mut subtree_end = alloc::vec![0; nodes.len()];
    for i in (0..nodes.len()).rev() {
        subtree_end[i] = match nodes[i].children.last() {
            Some(last) => subtree_end[last.0],
            None => i + 1,
        };
    }

    MeasuredTree {
        nodes,
        subtree_end,
        by_id,
    }
}

fn unique_id(base: &str, path: &str, seen: &mut HashSet<String>, counter: &mut u64) -> String {
    if seen.insert(base.to_owned()) {
        return base.to_owned();
    }
    let path_key: String = path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    loop {
        let candidate = format!("{base}-{path_key}-{counter}");
        *counter += 1;
        if seen.insert(candidate.clone()) {
            return candidate;
        }
    }
}
