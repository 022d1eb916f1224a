// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout tuning.

/// Direction in which levels grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    /// Levels advance along +x; siblings stack along y.
    #[default]
    Horizontal,
    /// Levels advance along +y; siblings spread along x.
    Vertical,
}

/// Parameters for [`TreeLayout`](crate::TreeLayout).
///
/// The *primary* axis is the one levels advance along; the *secondary* axis is
/// the one siblings are spread over.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Which way the tree grows.
    pub orientation: Orientation,
    /// Distance between consecutive level centers on the primary axis.
    ///
    /// Widened per level when the boxes on two adjacent levels would not
    /// otherwise clear each other by `min_gap`.
    pub level_gap: f64,
    /// Distance between consecutive leaf slots on the secondary axis.
    pub sibling_gap: f64,
    /// Required clearance between any two boxes on the same level.
    pub min_gap: f64,
    /// Fraction of an overlap corrected per push, in `(0, 1]`.
    pub damping: f64,
    /// Iteration cap for collision resolution on a single level.
    pub max_iterations: u32,
    /// Overlaps at or below this many pixels count as resolved.
    pub tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            level_gap: 280.0,
            sibling_gap: 72.0,
            min_gap: 16.0,
            damping: 0.8,
            max_iterations: 100,
            tolerance: 0.5,
        }
    }
}

impl LayoutConfig {
    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        for (field, value) in [
            ("level_gap", self.level_gap),
            ("sibling_gap", self.sibling_gap),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [("min_gap", self.min_gap), ("tolerance", self.tolerance)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutConfigError::Negative { field, value });
            }
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(LayoutConfigError::Damping(self.damping));
        }
        if self.max_iterations == 0 {
            return Err(LayoutConfigError::ZeroIterations);
        }
        Ok(())
    }
}

/// A [`LayoutConfig`] that cannot produce a layout.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutConfigError {
    /// A gap that must be strictly positive is not.
    #[error("layout `{field}` must be a positive finite number, got {value}")]
    NotPositive {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A clearance that must be non-negative is not.
    #[error("layout `{field}` must be a non-negative finite number, got {value}")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Damping outside `(0, 1]`.
    #[error("layout damping must be in (0, 1], got {0}")]
    Damping(f64),
    /// `max_iterations` is zero.
    #[error("layout max_iterations must be at least 1")]
    ZeroIterations,
}
