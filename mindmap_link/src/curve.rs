// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connector geometry between two node boxes.

use kurbo::{BezPath, CubicBez, Point, Rect, Vec2};
use mindmap_layout::Orientation;

/// Shape parameters for connectors.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// Smallest control-point offset, as a fraction of the anchor distance.
    pub tension_min: f64,
    /// Largest control-point offset, as a fraction of the anchor distance.
    pub tension_max: f64,
    /// Anchor distance at which tension reaches `1.0` before clamping.
    pub tension_distance: f64,
    /// Secondary-axis offsets below this count as "nearly straight".
    pub sibling_threshold: f64,
    /// Control-point nudge applied to nearly straight connectors.
    pub sibling_offset: f64,
    /// Width of the visible stroke.
    pub stroke_width: f64,
    /// Width of the invisible stroke used for pointer hits.
    pub hit_width: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            tension_min: 0.3,
            tension_max: 0.6,
            tension_distance: 200.0,
            sibling_threshold: 50.0,
            sibling_offset: 6.0,
            stroke_width: 2.0,
            hit_width: 16.0,
        }
    }
}

impl LinkConfig {
    /// Checks that the parameters describe a usable connector.
    pub fn validate(&self) -> Result<(), LinkConfigError> {
        for (field, value) in [
            ("tension_min", self.tension_min),
            ("tension_max", self.tension_max),
            ("sibling_threshold", self.sibling_threshold),
            ("sibling_offset", self.sibling_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LinkConfigError::Negative { field, value });
            }
        }
        for (field, value) in [
            ("tension_distance", self.tension_distance),
            ("stroke_width", self.stroke_width),
            ("hit_width", self.hit_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LinkConfigError::NotPositive { field, value });
            }
        }
        if self.tension_min > self.tension_max {
            return Err(LinkConfigError::TensionRange {
                min: self.tension_min,
                max: self.tension_max,
            });
        }
        Ok(())
    }

    /// Tension for a primary-axis anchor distance `d`.
    #[must_use]
    pub fn tension(&self, d: f64) -> f64 {
        (d.abs() / self.tension_distance).clamp(self.tension_min, self.tension_max)
    }
}

/// A [`LinkConfig`] that cannot shape connectors.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LinkConfigError {
    /// A value that must be non-negative is not.
    #[error("link `{field}` must be a non-negative finite number, got {value}")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A value that must be strictly positive is not.
    #[error("link `{field}` must be a positive finite number, got {value}")]
    NotPositive {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// `tension_min > tension_max`.
    #[error("link tension range is empty: min {min} > max {max}")]
    TensionRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

/// A cubic connector from a parent anchor to a child anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSpec {
    /// Anchor on the parent's trailing edge.
    pub start: Point,
    /// First control point.
    pub ctrl1: Point,
    /// Second control point.
    pub ctrl2: Point,
    /// Anchor on the child's leading edge.
    pub end: Point,
}

impl CurveSpec {
    /// The curve as a Kurbo segment.
    #[must_use]
    pub fn to_cubic(&self) -> CubicBez {
        CubicBez::new(self.start, self.ctrl1, self.ctrl2, self.end)
    }

    /// The curve as a single-segment path.
    #[must_use]
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.curve_to(self.ctrl1, self.ctrl2, self.end);
        path
    }

    fn is_finite(&self) -> bool {
        [self.start, self.ctrl1, self.ctrl2, self.end]
            .iter()
            .all(|p| p.is_finite())
    }
}

/// Builds the connector between a parent box and a child box.
///
/// The curve leaves the parent's trailing edge and enters the child's leading
/// edge, at the middle of each edge. Control points sit along the primary axis
/// at [`LinkConfig::tension`] times the anchor distance. Connectors that are
/// nearly straight get both control points nudged by `sibling_offset` toward
/// the child, so siblings stacked close together stay distinguishable.
///
/// Returns `None` if any resulting coordinate is not finite.
#[must_use]
pub fn build_curve(
    parent: Rect,
    child: Rect,
    orientation: Orientation,
    config: &LinkConfig,
) -> Option<CurveSpec> {
    let (start, end) = match orientation {
        Orientation::Horizontal => (
            Point::new(parent.x1, parent.center().y),
            Point::new(child.x0, child.center().y),
        ),
        Orientation::Vertical => (
            Point::new(parent.center().x, parent.y1),
            Point::new(child.center().x, child.y0),
        ),
    };
    let (primary, secondary, along, across) = match orientation {
        Orientation::Horizontal => {
            (end.x - start.x, end.y - start.y, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0))
        }
        Orientation::Vertical => {
            (end.y - start.y, end.x - start.x, Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0))
        }
    };
    let reach = along * (primary * config.tension(primary));
    let nudge = if secondary.abs() < config.sibling_threshold {
        let sign = if secondary >= 0.0 { 1.0 } else { -1.0 };
        across * (config.sibling_offset * sign)
    } else {
        Vec2::ZERO
    };
    let curve = CurveSpec {
        start,
        ctrl1: start + reach + nudge,
        ctrl2: end - reach + nudge,
        end,
    };
    curve.is_finite().then_some(curve)
}
