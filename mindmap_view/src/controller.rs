// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};
use tracing::debug;

use crate::{PanGesture, TransformHistory, ViewConfig, ViewConfigError, ViewTransform};

/// Pan/zoom state of a mind-map view.
///
/// `ViewportController` owns the current [`ViewTransform`], the pointer-drag
/// gesture, and the undo history. It can be used to:
/// - Pan by dragging, keeping the grabbed point under the pointer.
/// - Zoom with the wheel (optionally about the cursor) or by fixed steps.
/// - Fit a world rectangle into the view or center on a point.
/// - Undo and redo committed changes.
///
/// The scale always stays within `[min_scale, max_scale]`.
///
/// Drag ends, zoom steps, fits, centering, and resets are *committed*: they
/// are pushed onto the history. Wheel zoom is not; the next committed change
/// records wherever the wheel left the view.
#[derive(Clone, Debug)]
pub struct ViewportController {
    config: ViewConfig,
    view_size: Size,
    transform: ViewTransform,
    gesture: PanGesture,
    history: TransformHistory,
}

impl ViewportController {
    /// Creates a controller at the identity transform with an empty view.
    pub fn new(config: ViewConfig) -> Result<Self, ViewConfigError> {
        config.validate()?;
        let scale = 1.0_f64.clamp(config.min_scale, config.max_scale);
        let transform = ViewTransform::new(Vec2::ZERO, scale);
        Ok(Self {
            config,
            view_size: Size::ZERO,
            transform,
            gesture: PanGesture::default(),
            history: TransformHistory::new(config.history_capacity, transform),
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Size of the view in pixels.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Sets the size of the view in pixels. The transform is unchanged.
    pub fn set_view_size(&mut self, size: Size) {
        if size.is_finite() && size.width >= 0.0 && size.height >= 0.0 {
            self.view_size = size;
        }
    }

    /// Center of the view in pixels.
    #[must_use]
    pub fn view_center(&self) -> Point {
        self.view_size.to_rect().center()
    }

    /// The transform in effect.
    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Current scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// Current pan in pixels.
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.transform.pan
    }

    /// Replaces the transform, clamping its scale. Invalid transforms are
    /// ignored. Not committed.
    pub fn set_transform(&mut self, transform: ViewTransform) {
        if !transform.is_valid() {
            debug!("ignoring non-finite view transform");
            return;
        }
        self.transform = ViewTransform::new(transform.pan, self.clamp_scale(transform.scale));
    }

    /// Maps a world point into view pixels.
    #[must_use]
    pub fn world_to_view(&self, pt: Point) -> Point {
        self.transform.world_to_view(pt)
    }

    /// Maps a view pixel into world coordinates.
    #[must_use]
    pub fn view_to_world(&self, pt: Point) -> Point {
        self.transform.view_to_world(pt)
    }

    /// Maps a world rectangle into view pixels.
    #[must_use]
    pub fn world_to_view_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.world_to_view(rect.origin()),
            self.world_to_view(Point::new(rect.x1, rect.y1)),
        )
    }

    /// The world rectangle currently covered by the view.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        Rect::from_points(
            self.view_to_world(Point::ORIGIN),
            self.view_to_world(Point::new(self.view_size.width, self.view_size.height)),
        )
    }

    /// Pans by a delta in view pixels. Not committed.
    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.transform.pan += delta;
        }
    }

    /// Multiplies the scale by `factor`, keeping `anchor` (in view pixels)
    /// fixed on screen. Not committed.
    ///
    /// Returns `false` if the clamped scale did not change.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) || !anchor.is_finite() {
            return false;
        }
        let old_scale = self.transform.scale;
        let new_scale = self.clamp_scale(old_scale * factor);
        if new_scale == old_scale {
            return false;
        }
        let old_world = self.view_to_world(anchor);
        self.transform.scale = new_scale;
        let delta = anchor - self.world_to_view(old_world);
        self.transform.pan += delta;
        true
    }

    /// Applies one wheel event. Not committed.
    ///
    /// Positive `delta_y` zooms out. With a cursor position the point under
    /// the cursor stays put; without one the pan is left alone.
    pub fn wheel(&mut self, delta_y: f64, cursor: Option<Point>) -> bool {
        if !delta_y.is_finite() {
            return false;
        }
        let factor = (1.0 - delta_y * self.config.wheel_intensity).max(f64::MIN_POSITIVE);
        match cursor {
            Some(anchor) => self.zoom_about(anchor, factor),
            None => {
                let scale = self.clamp_scale(self.transform.scale * factor);
                let changed = scale != self.transform.scale;
                self.transform.scale = scale;
                changed
            }
        }
    }

    /// Zooms in one step about the view center and commits.
    pub fn zoom_in(&mut self) -> bool {
        let changed = self.zoom_about(self.view_center(), self.config.zoom_step);
        self.commit();
        changed
    }

    /// Zooms out one step about the view center and commits.
    pub fn zoom_out(&mut self) -> bool {
        let changed = self.zoom_about(self.view_center(), 1.0 / self.config.zoom_step);
        self.commit();
        changed
    }

    /// Transform that fits `bounds` into the view with the configured padding,
    /// or `None` when either the bounds or the view are degenerate.
    ///
    /// The scale is the largest that fits both axes, clamped to
    /// `[min_scale, max_fit_scale]`; the bounds' center lands on the view's
    /// center.
    #[must_use]
    pub fn fit_transform(&self, bounds: Rect) -> Option<ViewTransform> {
        let view = self.view_size;
        if !bounds.is_finite() || view.width <= 0.0 || view.height <= 0.0 {
            return None;
        }
        let padding = 2.0 * self.config.fit_padding;
        let (w, h) = (bounds.width() + padding, bounds.height() + padding);
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let fit_max = self.config.max_fit_scale.min(self.config.max_scale);
        let scale = (view.width / w)
            .min(view.height / h)
            .clamp(self.config.min_scale, fit_max);
        let pan = self.view_center().to_vec2() - bounds.center().to_vec2() * scale;
        Some(ViewTransform::new(pan, scale))
    }

    /// Fits `bounds` into the view and commits. Degenerate input is a no-op.
    pub fn fit_to(&mut self, bounds: Rect) -> bool {
        let Some(fitted) = self.fit_transform(bounds) else {
            debug!(?bounds, view = ?self.view_size, "nothing to fit");
            return false;
        };
        self.transform = fitted;
        self.commit();
        true
    }

    /// Moves `world` to the view center at the current scale and commits.
    pub fn center_on(&mut self, world: Point) -> bool {
        if !world.is_finite() {
            return false;
        }
        let delta = self.view_center() - self.world_to_view(world);
        self.pan_by(delta);
        self.commit();
        true
    }

    /// Back to no pan and unit scale; commits.
    pub fn reset(&mut self) {
        self.transform = ViewTransform::new(Vec2::ZERO, self.clamp_scale(1.0));
        self.commit();
    }

    /// Begins a drag-to-pan gesture at `pointer` (view pixels).
    pub fn begin_pan(&mut self, pointer: Point) {
        self.gesture.start(pointer, self.transform.pan);
    }

    /// Updates the active pan gesture. Returns `false` if none is active.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        match self.gesture.pan_for(pointer) {
            Some(pan) if pan.is_finite() => {
                self.transform.pan = pan;
                true
            }
            _ => false,
        }
    }

    /// Ends the active pan gesture and commits. Returns the farthest distance
    /// the pointer travelled, or `None` if no gesture was active.
    pub fn end_pan(&mut self) -> Option<f64> {
        let travel = self.gesture.max_travel;
        if !self.gesture.end() {
            return None;
        }
        self.commit();
        Some(travel)
    }

    /// Returns `true` while a drag-to-pan gesture is active.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.gesture.is_active()
    }

    /// Records the current transform in the history.
    pub fn commit(&mut self) -> bool {
        let pushed = self.history.push(self.transform);
        if pushed {
            debug!(scale = self.transform.scale, pan = ?self.transform.pan, "view committed");
        }
        pushed
    }

    /// Makes the current transform the only history entry.
    pub fn reset_history(&mut self) {
        self.history.reset(self.transform);
    }

    /// Restores the previous committed transform.
    pub fn undo(&mut self) -> bool {
        if self.history.current() != self.transform {
            // Uncommitted wheel zoom: first return to the committed state.
            self.transform = self.history.current();
            debug!("uncommitted zoom reverted");
            return true;
        }
        match self.history.undo() {
            Some(t) => {
                self.transform = t;
                debug!(cursor = self.history.cursor(), "undo");
                true
            }
            None => false,
        }
    }

    /// Re-applies the next committed transform.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(t) => {
                self.transform = t;
                debug!(cursor = self.history.cursor(), "redo");
                true
            }
            None => false,
        }
    }

    /// Returns `true` if [`ViewportController::undo`] would do something.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.history.current() != self.transform
    }

    /// Returns `true` if [`ViewportController::redo`] would do something.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The undo history.
    #[must_use]
    pub fn history(&self) -> &TransformHistory {
        &self.history
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(width: f64, height: f64) -> ViewportController {
        let mut vp = ViewportController::new(ViewConfig::default()).unwrap();
        vp.set_view_size(Size::new(width, height));
        vp
    }

    #[test]
    fn zoom_about_anchor_keeps_anchor_fixed() {
        let mut vp = controller(800.0, 600.0);
        let anchor = Point::new(200.0, 150.0);
        let before = vp.view_to_world(anchor);
        assert!(vp.zoom_about(anchor, 2.0));
        let after = vp.view_to_world(anchor);
        assert!((after - before).hypot() < 1e-9);
        assert_eq!(vp.scale(), 2.0);
    }

    #[test]
    fn wheel_without_cursor_keeps_pan() {
        let mut vp = controller(800.0, 600.0);
        vp.pan_by(Vec2::new(10.0, 20.0));
        vp.wheel(-100.0, None);
        assert_eq!(vp.pan(), Vec2::new(10.0, 20.0));
        assert!((vp.scale() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn fit_centers_content() {
        let mut vp = controller(500.0, 500.0);
        let bounds = Rect::new(0.0, 0.0, 1000.0, 200.0);
        assert!(vp.fit_to(bounds));
        assert!((vp.scale() - 500.0 / 1100.0).abs() < 1e-12);
        let center = vp.world_to_view(bounds.center());
        assert!((center - Point::new(250.0, 250.0)).hypot() < 1e-9);
    }

    #[test]
    fn fit_caps_small_content() {
        let mut vp = controller(1000.0, 1000.0);
        vp.fit_to(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(vp.scale(), 1.5);
    }

    #[test]
    fn fit_needs_a_view() {
        let mut vp = controller(0.0, 0.0);
        assert!(!vp.fit_to(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!vp.can_undo());
    }

    #[test]
    fn center_on_keeps_scale() {
        let mut vp = controller(400.0, 300.0);
        vp.zoom_in();
        let scale = vp.scale();
        vp.center_on(Point::new(1000.0, -50.0));
        assert_eq!(vp.scale(), scale);
        let at = vp.world_to_view(Point::new(1000.0, -50.0));
        assert!((at - Point::new(200.0, 150.0)).hypot() < 1e-9);
    }

    #[test]
    fn drag_pans_and_commits_on_release() {
        let mut vp = controller(400.0, 300.0);
        vp.begin_pan(Point::new(10.0, 10.0));
        assert!(vp.is_panning());
        vp.drag_to(Point::new(40.0, 50.0));
        assert_eq!(vp.pan(), Vec2::new(30.0, 40.0));
        assert_eq!(vp.end_pan(), Some(50.0));
        assert!(vp.can_undo());
        assert!(vp.undo());
        assert_eq!(vp.pan(), Vec2::ZERO);
        assert!(vp.redo());
        assert_eq!(vp.pan(), Vec2::new(30.0, 40.0));
    }

    #[test]
    fn undo_discards_uncommitted_wheel_first() {
        let mut vp = controller(400.0, 300.0);
        vp.zoom_in();
        vp.wheel(300.0, Some(Point::new(5.0, 5.0)));
        assert!(vp.undo());
        assert!((vp.scale() - 1.2).abs() < 1e-12);
        assert!(vp.undo());
        assert_eq!(vp.scale(), 1.0);
        assert!(!vp.undo());
    }

    #[test]
    fn reset_returns_to_identity() {
        let mut vp = controller(400.0, 300.0);
        vp.pan_by(Vec2::new(3.0, 4.0));
        vp.zoom_in();
        vp.reset();
        assert_eq!(vp.transform(), ViewTransform::IDENTITY);
    }
}
