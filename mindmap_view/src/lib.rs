// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mindmap View: pan, zoom, and view history for a mind-map canvas.
//!
//! The world is the layout space produced by the layout engine; the view is
//! the pixel grid of the host surface. A [`ViewTransform`] maps one to the
//! other with a pan and a uniform scale:
//!
//! ```text
//! view = world * scale + pan
//! ```
//!
//! [`ViewportController`] drives that transform from user input:
//!
//! - drag-to-pan through [`PanGesture`],
//! - wheel zoom, optionally anchored at the cursor,
//! - fixed-step zoom buttons about the view center,
//! - fit-to-content and center-on-point,
//! - reset, undo, and redo over a bounded [`TransformHistory`].
//!
//! The scale never leaves `[min_scale, max_scale]` from [`ViewConfig`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use mindmap_view::{ViewConfig, ViewportController};
//!
//! let mut view = ViewportController::new(ViewConfig::default()).unwrap();
//! view.set_view_size(Size::new(500.0, 500.0));
//!
//! view.fit_to(Rect::new(0.0, 0.0, 1000.0, 200.0));
//! assert!((view.scale() - 0.4545).abs() < 1e-3);
//!
//! view.zoom_in();
//! assert!(view.undo());
//! assert!((view.scale() - 0.4545).abs() < 1e-3);
//! ```
//!
//! This crate is `no_std` + `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod history;
pub mod pan;

pub use config::{ViewConfig, ViewConfigError, ViewTransform};
pub use controller::ViewportController;
pub use history::TransformHistory;
pub use pan::PanGesture;
