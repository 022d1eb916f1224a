// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position transitions between two layouts.
//!
//! A transition is a pair of pose maps and a clock. Nothing here schedules
//! frames: the host calls [`Transition::sample`] with the current time, and
//! cancelling is simply dropping the transition.

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size};
use mindmap_tree::NodeIndex;

/// Maps linear progress in `[0, 1]` to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// No easing.
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow end.
    EaseOut,
    /// Quadratic, slow start and end.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Applies the curve. Input is clamped to `[0, 1]`; NaN counts as done.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

/// Where a node box is drawn and how opaque it is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePose {
    /// Box center in world coordinates.
    pub center: Point,
    /// Box size.
    pub size: Size,
    /// `0.0` is invisible, `1.0` fully drawn.
    pub opacity: f64,
}

impl NodePose {
    /// A fully opaque pose.
    #[must_use]
    pub fn settled(center: Point, size: Size) -> Self {
        Self {
            center,
            size,
            opacity: 1.0,
        }
    }

    /// The box in world coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }

    /// Linear blend towards `to`; `t` is not clamped.
    #[must_use]
    pub fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            center: self.center.lerp(to.center, t),
            size: Size::new(
                self.size.width + (to.size.width - self.size.width) * t,
                self.size.height + (to.size.height - self.size.height) * t,
            ),
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }
}

/// Poses keyed by node.
pub type Poses = HashMap<NodeIndex, NodePose>;

/// Blends two pose maps at (already eased) progress `t`.
///
/// Nodes present on only one side keep that side's pose.
#[must_use]
pub fn interpolate(from: &Poses, to: &Poses, t: f64) -> Poses {
    let mut out = Poses::with_capacity(from.len().max(to.len()));
    for (&index, &end) in to {
        let pose = from.get(&index).map_or(end, |&start| start.lerp(end, t));
        out.insert(index, pose);
    }
    for (&index, &start) in from {
        out.entry(index).or_insert(start);
    }
    out
}

/// An in-flight move from one set of poses to another.
///
/// The clock starts at the first [`sample`](Self::sample) so a transition
/// created between frames does not skip ahead.
#[derive(Clone, Debug)]
pub struct Transition {
    from: Poses,
    to: Poses,
    start_ms: Option<f64>,
    duration_ms: f64,
    easing: Easing,
}

impl Transition {
    /// Creates a transition. Both maps should hold the same keys.
    #[must_use]
    pub fn new(from: Poses, to: Poses, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms: None,
            duration_ms,
            easing,
        }
    }

    /// Linear progress at `now_ms`, starting the clock if needed.
    pub fn progress(&mut self, now_ms: f64) -> f64 {
        let start = *self.start_ms.get_or_insert(now_ms);
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        let t = (now_ms - start) / self.duration_ms;
        if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 }
    }

    /// Poses at `now_ms`.
    pub fn sample(&mut self, now_ms: f64) -> Poses {
        let t = self.progress(now_ms);
        interpolate(&self.from, &self.to, self.easing.apply(t))
    }

    /// Poses at the time of the last sample, without advancing the clock.
    #[must_use]
    pub fn current(&self, now_ms: f64) -> Poses {
        let t = match self.start_ms {
            None => 0.0,
            Some(_) if self.duration_ms <= 0.0 => 1.0,
            Some(start) => {
                let t = (now_ms - start) / self.duration_ms;
                if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 }
            }
        };
        interpolate(&self.from, &self.to, self.easing.apply(t))
    }

    /// Returns `true` once `now_ms` is past the end.
    #[must_use]
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.start_ms
            .is_some_and(|start| self.duration_ms <= 0.0 || now_ms - start >= self.duration_ms)
    }

    /// Target poses.
    #[must_use]
    pub fn target(&self) -> &Poses {
        &self.to
    }
}
