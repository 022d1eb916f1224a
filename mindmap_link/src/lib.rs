// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mindmap Link: connectors between laid-out nodes.
//!
//! Each visible parent/child pair gets a cubic Bezier that leaves the parent's
//! trailing edge and enters the child's leading edge. The control points are
//! pulled along the primary axis by a clamped fraction of the anchor distance
//! ([`LinkConfig::tension`]), so short links do not look straight and long
//! links do not overshoot.
//!
//! - [`build_curve`] shapes a single connector from two boxes.
//! - [`EdgeSet`] builds every connector of a
//!   [`LayoutResult`](mindmap_layout::LayoutResult) and answers "which edge is
//!   under the pointer?" against a fat, invisible hit stroke.
//!
//! Geometry that would contain non-finite coordinates is never produced;
//! such edges are dropped with a warning.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use mindmap_layout::Orientation;
//! use mindmap_link::{LinkConfig, build_curve};
//!
//! let parent = Rect::new(-90.0, -27.0, 90.0, 27.0);
//! let child = Rect::new(200.0, 73.0, 380.0, 127.0);
//! let curve = build_curve(parent, child, Orientation::Horizontal, &LinkConfig::default())
//!     .unwrap();
//! assert_eq!(curve.start.x, parent.x1);
//! assert_eq!(curve.end.x, child.x0);
//! ```
//!
//! This crate is `no_std` + `alloc`.

#![no_std]

extern crate alloc;

mod curve;
mod edges;

pub use curve::{CurveSpec, LinkConfig, LinkConfigError, build_curve};
pub use edges::{Edge, EdgeSet};
