// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mindmap Layout: tidy tree placement for variable-size boxes.
//!
//! Given a [`MeasuredTree`](mindmap_tree::MeasuredTree) and the list of nodes
//! currently visible, [`TreeLayout`] assigns every node a world-space center so
//! that:
//!
//! - nodes on deeper levels sit further along the primary axis,
//! - siblings keep their input order along the secondary axis,
//! - no two boxes overlap, and
//! - the same input always yields the same output.
//!
//! Placement starts from a classic tidy arrangement (leaves in consecutive
//! slots, parents centered over their children) and then resolves collisions
//! one level at a time, carrying each moved node's subtree along with it.
//! [`LayoutDiagnostics`] reports whether the damped resolution converged
//! within its iteration budget.
//!
//! ## Minimal example
//!
//! ```rust
//! use mindmap_layout::{LayoutConfig, TreeLayout};
//! use mindmap_text::AverageAdvance;
//! use mindmap_tree::{ExpansionState, NormalizeConfig, RawNode, normalize};
//!
//! let raw = RawNode::new("root", "Root")
//!     .with_children([RawNode::new("a", "A"), RawNode::new("b", "B")]);
//! let tree = normalize(&raw, &NormalizeConfig::default(), &AverageAdvance::default());
//! let state = ExpansionState::with_root_expanded(&tree);
//!
//! let layout = TreeLayout::new(LayoutConfig::default()).unwrap();
//! let result = layout.layout(&tree, &state.visible_nodes(&tree));
//!
//! let a = result.get(tree.find("a").unwrap()).unwrap();
//! let b = result.get(tree.find("b").unwrap()).unwrap();
//! assert!(a.center.y < b.center.y);
//! assert!(!a.rect().overlaps(b.rect()));
//! ```
//!
//! This crate is `no_std` + `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod tidy;

pub use config::{LayoutConfig, LayoutConfigError, Orientation};
pub use tidy::{
    FALLBACK_SIZE, LayoutDiagnostics, LayoutEdge, LayoutResult, PositionedNode, TreeLayout,
};
