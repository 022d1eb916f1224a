// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear undo/redo over committed transforms.

use alloc::collections::VecDeque;

use crate::ViewTransform;

/// Bounded linear history with a cursor.
///
/// The entry under the cursor is the transform currently in effect. Pushing
/// after an undo drops the redo branch. When the history is full, the oldest
/// entry is discarded.
#[derive(Clone, Debug)]
pub struct TransformHistory {
    entries: VecDeque<ViewTransform>,
    cursor: usize,
    capacity: usize,
}

impl TransformHistory {
    /// Creates a history holding only `base`.
    ///
    /// `capacity` is raised to at least 1.
    #[must_use]
    pub fn new(capacity: usize, base: ViewTransform) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.min(64));
        entries.push_back(base);
        Self {
            entries,
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Forgets everything and starts over from `base`.
    pub fn reset(&mut self, base: ViewTransform) {
        self.entries.clear();
        self.entries.push_back(base);
        self.cursor = 0;
    }

    /// The transform under the cursor.
    #[must_use]
    pub fn current(&self) -> ViewTransform {
        self.entries[self.cursor]
    }

    /// Records `transform` after the cursor.
    ///
    /// Returns `false` without changing anything if it equals the current
    /// entry.
    pub fn push(&mut self, transform: ViewTransform) -> bool {
        if self.current() == transform {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(transform);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Steps back, returning the transform to restore.
    pub fn undo(&mut self) -> Option<ViewTransform> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Steps forward, returning the transform to restore.
    pub fn redo(&mut self) -> Option<ViewTransform> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Returns `true` if [`TransformHistory::undo`] would do something.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Returns `true` if [`TransformHistory::redo`] would do something.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of stored entries, including the current one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a history holds at least its base entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position within the stored entries.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::*;

    fn at(x: f64) -> ViewTransform {
        ViewTransform::new(Vec2::new(x, 0.0), 1.0)
    }

    #[test]
    fn undo_then_push_drops_redo_branch() {
        let mut h = TransformHistory::new(10, at(0.0));
        h.push(at(1.0));
        h.push(at(2.0));
        assert_eq!(h.undo(), Some(at(1.0)));
        assert!(h.can_redo());
        h.push(at(5.0));
        assert!(!h.can_redo());
        assert_eq!(h.undo(), Some(at(1.0)));
        assert_eq!(h.undo(), Some(at(0.0)));
        assert_eq!(h.undo(), None);
    }

    #[test]
    fn duplicates_are_not_recorded() {
        let mut h = TransformHistory::new(10, at(0.0));
        assert!(!h.push(at(0.0)));
        assert!(h.push(at(1.0)));
        assert!(!h.push(at(1.0)));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn capacity_discards_oldest() {
        let mut h = TransformHistory::new(3, at(0.0));
        for x in 1..=5 {
            h.push(at(f64::from(x)));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.current(), at(5.0));
        assert_eq!(h.undo(), Some(at(4.0)));
        assert_eq!(h.undo(), Some(at(3.0)));
        assert!(!h.can_undo());
    }

    #[test]
    fn reset_starts_over() {
        let mut h = TransformHistory::new(4, at(0.0));
        h.push(at(1.0));
        h.reset(at(9.0));
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), at(9.0));
        assert!(!h.can_undo() && !h.can_redo());
    }
}
