// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Vec2};

/// Zoom limits and gesture tuning for a [`ViewportController`](crate::ViewportController).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewConfig {
    /// Smallest allowed scale.
    pub min_scale: f64,
    /// Largest allowed scale.
    pub max_scale: f64,
    /// Largest scale a fit may choose, so tiny trees are not blown up.
    pub max_fit_scale: f64,
    /// Margin kept around content when fitting, in view pixels.
    pub fit_padding: f64,
    /// Wheel sensitivity: one wheel unit scales by `1 - delta * intensity`.
    pub wheel_intensity: f64,
    /// Factor applied by the zoom-in and zoom-out buttons.
    pub zoom_step: f64,
    /// Number of transforms kept for undo.
    pub history_capacity: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 3.0,
            max_fit_scale: 1.5,
            fit_padding: 50.0,
            wheel_intensity: 0.001,
            zoom_step: 1.2,
            history_capacity: 100,
        }
    }
}

impl ViewConfig {
    /// Checks that the limits form a usable range.
    pub fn validate(&self) -> Result<(), ViewConfigError> {
        for (field, value) in [
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("max_fit_scale", self.max_fit_scale),
            ("wheel_intensity", self.wheel_intensity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ViewConfigError::NotPositive { field, value });
            }
        }
        if self.min_scale > self.max_scale {
            return Err(ViewConfigError::ScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if self.max_fit_scale < self.min_scale {
            return Err(ViewConfigError::FitBelowMin {
                max_fit: self.max_fit_scale,
                min: self.min_scale,
            });
        }
        if !self.fit_padding.is_finite() || self.fit_padding < 0.0 {
            return Err(ViewConfigError::Padding(self.fit_padding));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ViewConfigError::ZoomStep(self.zoom_step));
        }
        if self.history_capacity == 0 {
            return Err(ViewConfigError::ZeroHistory);
        }
        Ok(())
    }
}

/// A [`ViewConfig`] that cannot drive a viewport.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ViewConfigError {
    /// `min_scale > max_scale`.
    #[error("view scale range is empty: min {min} > max {max}")]
    ScaleRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// A value that must be strictly positive is not.
    #[error("view `{field}` must be a positive finite number, got {value}")]
    NotPositive {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The fit cap lies below the minimum scale.
    #[error("view max_fit_scale {max_fit} is below min_scale {min}")]
    FitBelowMin {
        /// Fit cap.
        max_fit: f64,
        /// Minimum scale.
        min: f64,
    },
    /// Negative or non-finite fit padding.
    #[error("view fit_padding must be a non-negative finite number, got {0}")]
    Padding(f64),
    /// A zoom step that would not zoom.
    #[error("view zoom_step must be a finite number above 1, got {0}")]
    ZoomStep(f64),
    /// `history_capacity` is zero.
    #[error("view history_capacity must be at least 1")]
    ZeroHistory,
}

/// Pan and uniform scale mapping world coordinates to view pixels.
///
/// `view = world * scale + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewTransform {
    /// Translation in view pixels.
    pub pan: Vec2,
    /// Uniform scale.
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    /// No pan, unit scale.
    pub const IDENTITY: Self = Self {
        pan: Vec2::ZERO,
        scale: 1.0,
    };

    /// Creates a transform.
    #[must_use]
    pub const fn new(pan: Vec2, scale: f64) -> Self {
        Self { pan, scale }
    }

    /// World to view as an affine map.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.scale)
    }

    /// Maps a world point into view pixels.
    #[must_use]
    pub fn world_to_view(&self, pt: Point) -> Point {
        (pt.to_vec2() * self.scale + self.pan).to_point()
    }

    /// Maps a view pixel back into world coordinates.
    #[must_use]
    pub fn view_to_world(&self, pt: Point) -> Point {
        ((pt.to_vec2() - self.pan) / self.scale).to_point()
    }

    /// Returns `true` if every component is finite and the scale is positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pan.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ViewConfig::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_scale_range_is_rejected() {
        let config = ViewConfig {
            min_scale: 4.0,
            max_scale: 3.0,
            ..ViewConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ViewConfigError::ScaleRange { .. })
        ));
    }

    #[test]
    fn transform_round_trips_points() {
        let t = ViewTransform::new(Vec2::new(40.0, -10.0), 2.5);
        let world = Point::new(3.0, 7.0);
        let view = t.world_to_view(world);
        assert_eq!(view, t.to_affine() * world);
        let back = t.view_to_world(view);
        assert!((back - world).hypot() < 1e-9);
    }
}
