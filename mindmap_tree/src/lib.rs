// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mindmap Tree: from loose JSON to a measured tree and its visible subset.
//!
//! Mind-map content arrives from upstream producers as a loosely shaped JSON
//! tree: labels may sit under `title` or `text`, ids may be missing or
//! duplicated, and `children` may not be an array. This crate turns that input
//! into something the layout engine can trust:
//!
//! - [`RawNode`] reads the input leniently; only JSON syntax errors fail.
//! - [`normalize`] walks the tree once, repairs ids, and measures every label
//!   into a fitted box using a [`TextMeasure`](mindmap_text::TextMeasure)
//!   backend, producing a [`MeasuredTree`].
//! - [`ExpansionState`] tracks which nodes are open and lists the visible
//!   nodes in pre-order.
//!
//! ## Minimal example
//!
//! ```rust
//! use mindmap_text::AverageAdvance;
//! use mindmap_tree::{ExpansionState, NormalizeConfig, RawNode, normalize};
//!
//! let raw = RawNode::from_json_str(
//!     r#"{"id":"root","title":"Root","children":[{"id":"a","title":"A"},{"id":"b","text":"B"}]}"#,
//! )
//! .unwrap();
//! let tree = normalize(&raw, &NormalizeConfig::default(), &AverageAdvance::default());
//!
//! let mut state = ExpansionState::new();
//! assert_eq!(state.visible_nodes(&tree).len(), 1);
//! state.toggle(&tree, "root");
//! assert_eq!(state.visible_nodes(&tree).len(), 3);
//! ```
//!
//! The measured tree is immutable. When the input or the fonts change, build a
//! new one; ids are deterministic, so expansion state keyed by id survives.
//!
//! This crate is `no_std` + `alloc`.

#![no_std]

extern crate alloc;

mod expansion;
mod raw;
mod tree;

pub use expansion::{ExpansionState, ToggleOutcome};
pub use raw::{RawNode, TreeError};
pub use tree::{
    MeasuredNode, MeasuredTree, NodeIndex, NormalizeConfig, PLACEHOLDER_TEXT, normalize,
};
