// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-drag panning.
//!
//! ## Usage
//!
//! 1) Call [`PanGesture::start`] on pointer-down with the pointer position and
//!    the pan in effect at that moment.
//! 2) On each move, [`PanGesture::pan_for`] returns the pan that keeps the
//!    grabbed world point under the pointer.
//! 3) Call [`PanGesture::end`] on pointer-up or pointer-leave.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use mindmap_view::PanGesture;
//!
//! let mut pan = PanGesture::default();
//! pan.start(Point::new(10.0, 20.0), Vec2::new(100.0, 0.0));
//! assert!(pan.is_active());
//!
//! let next = pan.pan_for(Point::new(15.0, 25.0)).unwrap();
//! assert_eq!(next, Vec2::new(105.0, 5.0));
//! assert!(pan.end());
//! assert!(!pan.is_active());
//! ```

use kurbo::{Point, Vec2};

/// Tracks one drag-to-pan gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanGesture {
    /// Pointer position at pointer-down.
    pub origin: Option<Point>,
    /// Pan in effect at pointer-down.
    pub start_pan: Vec2,
    /// Largest pointer distance from `origin` seen so far.
    pub max_travel: f64,
}

impl PanGesture {
    /// Begins a gesture.
    pub fn start(&mut self, pointer: Point, pan: Vec2) {
        self.origin = Some(pointer);
        self.start_pan = pan;
        self.max_travel = 0.0;
    }

    /// Pan for the current pointer position, or `None` when no gesture is
    /// active.
    pub fn pan_for(&mut self, pointer: Point) -> Option<Vec2> {
        let offset = self.total_offset(pointer)?;
        self.max_travel = self.max_travel.max(offset.hypot());
        Some(self.start_pan + offset)
    }

    /// Pointer offset from the gesture origin.
    #[must_use]
    pub fn total_offset(&self, pointer: Point) -> Option<Vec2> {
        self.origin.map(|origin| pointer - origin)
    }

    /// Ends the gesture. Returns `true` if one was active.
    pub fn end(&mut self) -> bool {
        self.origin.take().is_some()
    }

    /// Returns `true` while a gesture is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }
}
