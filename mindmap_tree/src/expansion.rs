// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Which nodes are open, and which nodes that makes visible.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::{MeasuredTree, NodeIndex};

/// Result of [`ExpansionState::toggle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The node was collapsed and is now expanded.
    Expanded,
    /// The node was expanded and is now collapsed.
    Collapsed,
    /// The id is unknown; nothing changed.
    Unchanged,
}

/// Set of expanded nodes plus per-node memory of collapsed subtrees.
///
/// The root is always visible. Any other node is visible iff every ancestor
/// is expanded.
///
/// Collapsing a node removes it and all of its descendants from the expanded
/// set, and remembers which of those descendants were expanded. Expanding the
/// node again restores exactly that set, so a collapse followed by an expand
/// brings back the same visible nodes. [`ExpansionState::collapse_to_root`]
/// and the other bulk operations drop this memory.
///
/// A revision counter increases on every change, so callers can cheaply tell
/// whether a relayout is needed.
#[derive(Clone, Debug, Default)]
pub struct ExpansionState {
    expanded: HashSet<NodeIndex>,
    remembered: HashMap<NodeIndex, Vec<NodeIndex>>,
    revision: u64,
}

impl ExpansionState {
    /// Creates a state where nothing is expanded; only the root is visible.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state with only the root expanded.
    #[must_use]
    pub fn with_root_expanded(tree: &MeasuredTree) -> Self {
        let mut state = Self::new();
        state.expanded.insert(tree.root());
        state
    }

    /// Returns the change counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` if `index` is expanded.
    #[must_use]
    pub fn is_expanded(&self, index: NodeIndex) -> bool {
        self.expanded.contains(&index)
    }

    /// Returns the number of expanded nodes.
    #[must_use]
    pub fn expanded_len(&self) -> usize {
        self.expanded.len()
    }

    /// Flips the node named `id`.
    ///
    /// Unknown ids are ignored and report [`ToggleOutcome::Unchanged`].
    pub fn toggle(&mut self, tree: &MeasuredTree, id: &str) -> ToggleOutcome {
        match tree.find(id) {
            Some(index) => self.toggle_index(tree, index),
            None => ToggleOutcome::Unchanged,
        }
    }

    /// Flips the node at `index`.
    pub fn toggle_index(&mut self, tree: &MeasuredTree, index: NodeIndex) -> ToggleOutcome {
        if !tree.contains(index) {
            return ToggleOutcome::Unchanged;
        }
        if self.is_expanded(index) {
            self.collapse(tree, index);
            ToggleOutcome::Collapsed
        } else {
            self.expand(tree, index);
            ToggleOutcome::Expanded
        }
    }

    /// Expands `index`, restoring whatever was expanded below it when it was
    /// last collapsed. Returns `false` if nothing changed.
    pub fn expand(&mut self, tree: &MeasuredTree, index: NodeIndex) -> bool {
        if !tree.contains(index) || !self.expanded.insert(index) {
            return false;
        }
        if let Some(restored) = self.remembered.remove(&index) {
            self.expanded.extend(restored);
        }
        self.revision += 1;
        true
    }

    /// Collapses `index` and every descendant. Returns `false` if `index` was
    /// not expanded.
    pub fn collapse(&mut self, tree: &MeasuredTree, index: NodeIndex) -> bool {
        if !self.expanded.remove(&index) {
            return false;
        }
        let mut below = Vec::new();
        for d in tree.descendants(index) {
            if self.expanded.remove(&d) {
                below.push(d);
            }
        }
        if below.is_empty() {
            self.remembered.remove(&index);
        } else {
            self.remembered.insert(index, below);
        }
        self.revision += 1;
        true
    }

    /// Expands every node that has children.
    pub fn expand_all(&mut self, tree: &MeasuredTree) {
        self.replace_with(
            tree.iter()
                .filter(|(_, n)| n.has_children())
                .map(|(i, _)| i),
        );
    }

    /// Keeps only the root expanded and forgets all remembered subtrees.
    pub fn collapse_to_root(&mut self, tree: &MeasuredTree) {
        self.replace_with([tree.root()]);
    }

    /// Collapses everything, root included.
    pub fn collapse_all(&mut self) {
        self.replace_with(core::iter::empty());
    }

    /// Expands exactly the nodes with children whose level is below `depth`.
    ///
    /// `depth == 1` shows the root's children, `depth == 0` shows the root only.
    pub fn expand_to_depth(&mut self, tree: &MeasuredTree, depth: u32) {
        self.replace_with(
            tree.iter()
                .filter(|(_, n)| n.has_children() && n.level < depth)
                .map(|(i, _)| i),
        );
    }

    /// Returns `true` if every ancestor of `index` is expanded.
    #[must_use]
    pub fn is_visible(&self, tree: &MeasuredTree, index: NodeIndex) -> bool {
        tree.contains(index) && tree.ancestors(index).all(|a| self.is_expanded(a))
    }

    /// Lists visible nodes in pre-order.
    ///
    /// Collapsed subtrees are skipped wholesale, so the cost is proportional
    /// to the number of visible nodes.
    #[must_use]
    pub fn visible_nodes(&self, tree: &MeasuredTree) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < tree.len() {
            let index = NodeIndex(i);
            out.push(index);
            i = if self.is_expanded(index) {
                i + 1
            } else {
                tree.subtree_range(index).end
            };
        }
        out
    }

    fn replace_with(&mut self, expanded: impl IntoIterator<Item = NodeIndex>) {
        let next: HashSet<NodeIndex> = expanded.into_iter().collect();
        if next != self.expanded || !self.remembered.is_empty() {
            self.expanded = next;
            self.remembered.clear();
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use mindmap_text::AverageAdvance;

    use super::*;
    use crate::{NormalizeConfig, RawNode, normalize};

    fn tree() -> MeasuredTree {
        let raw = RawNode::new("root", "Root").with_children([
            RawNode::new("a", "A").with_children([
                RawNode::new("a1", "A1").with_children([RawNode::new("a1x", "A1x")]),
                RawNode::new("a2", "A2"),
            ]),
            RawNode::new("b", "B"),
        ]);
        normalize(&raw, &NormalizeConfig::default(), &AverageAdvance::default())
    }

    fn ids(tree: &MeasuredTree, visible: &[NodeIndex]) -> Vec<String> {
        visible.iter().map(|&i| tree[i].id.clone()).collect()
    }

    #[test]
    fn fresh_state_shows_only_root() {
        let tree = tree();
        let state = ExpansionState::new();
        assert_eq!(ids(&tree, &state.visible_nodes(&tree)), ["root"]);
    }

    #[test]
    fn expanding_root_reveals_children_in_order() {
        let tree = tree();
        let mut state = ExpansionState::new();
        assert_eq!(state.toggle(&tree, "root"), ToggleOutcome::Expanded);
        assert_eq!(ids(&tree, &state.visible_nodes(&tree)), ["root", "a", "b"]);
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let tree = tree();
        let mut state = ExpansionState::with_root_expanded(&tree);
        let rev = state.revision();
        assert_eq!(state.toggle(&tree, "missing"), ToggleOutcome::Unchanged);
        assert_eq!(state.revision(), rev);
    }

    #[test]
    fn collapse_removes_descendants_and_expand_restores_them() {
        let tree = tree();
        let mut state = ExpansionState::new();
        state.expand_all(&tree);
        let all = state.visible_nodes(&tree);
        assert_eq!(all.len(), tree.len());

        let a = tree.find("a").unwrap();
        let a1 = tree.find("a1").unwrap();
        assert_eq!(state.toggle(&tree, "a"), ToggleOutcome::Collapsed);
        assert!(!state.is_expanded(a1), "descendants leave the set");
        assert_eq!(ids(&tree, &state.visible_nodes(&tree)), ["root", "a", "b"]);

        state.toggle_index(&tree, a);
        assert!(state.is_expanded(a1));
        assert_eq!(state.visible_nodes(&tree), all);
    }

    #[test]
    fn collapse_to_root_forgets_memory() {
        let tree = tree();
        let mut state = ExpansionState::new();
        state.expand_all(&tree);
        state.toggle(&tree, "a");
        state.collapse_to_root(&tree);
        state.toggle(&tree, "a");
        // a1 was expanded before, but the memory is gone.
        assert_eq!(
            ids(&tree, &state.visible_nodes(&tree)),
            ["root", "a", "a1", "a2", "b"]
        );
    }

    #[test]
    fn expand_to_depth_limits_visible_levels() {
        let tree = tree();
        let mut state = ExpansionState::new();
        state.expand_to_depth(&tree, 2);
        let visible = state.visible_nodes(&tree);
        assert!(visible.iter().all(|&i| tree[i].level <= 2));
        assert_eq!(visible.len(), 5);
        state.expand_to_depth(&tree, 0);
        assert_eq!(state.visible_nodes(&tree), [tree.root()]);
    }

    #[test]
    fn visibility_agrees_with_ancestor_rule() {
        let tree = tree();
        let mut state = ExpansionState::new();
        state.toggle(&tree, "root");
        state.toggle(&tree, "a1"); // a1 is hidden because a is collapsed
        let a1x = tree.find("a1x").unwrap();
        assert!(!state.is_visible(&tree, a1x));
        assert!(!state.visible_nodes(&tree).contains(&a1x));
    }
}
