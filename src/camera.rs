//! Pan/zoom camera: the world-space node whose transform maps world
//! coordinates to screen pixels.
//!
//! `screen = world * scale + position`. Scale may be non-uniform; zoom
//! helpers keep both axes in step. Mutations raise a change flag the
//! controller drains once per frame to coalesce resyncs.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use glam::{DAffine2, DVec2};

use crate::consts::{ZOOM_MAX, ZOOM_MIN};

/// Camera state for pan/zoom over the scene.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Screen-space translation in pixels.
    pub position: DVec2,
    /// World-to-screen scale per axis (1.0 = no zoom).
    pub scale: DVec2,
    changed: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self { position: DVec2::ZERO, scale: DVec2::ONE, changed: false }
    }
}

impl Camera {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The world-to-screen affine.
    #[must_use]
    pub fn transform(&self) -> DAffine2 {
        DAffine2::from_translation(self.position) * DAffine2::from_scale(self.scale)
    }

    /// Convert a world point to screen pixels.
    #[must_use]
    pub fn world_to_screen(&self, world: DVec2) -> DVec2 {
        world * self.scale + self.position
    }

    /// Convert a screen point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: DVec2) -> DVec2 {
        (screen - self.position) / self.scale
    }

    /// Convert a screen-space delta to a world-space delta.
    #[must_use]
    pub fn screen_delta_to_world(&self, delta: DVec2) -> DVec2 {
        delta / self.scale
    }

    /// Shift the camera by a screen-space delta.
    pub fn pan(&mut self, delta: DVec2) {
        self.position += delta;
        self.changed = true;
    }

    /// Multiply zoom by `factor`, clamped, keeping `anchor_screen` fixed.
    pub fn zoom_by(&mut self, factor: f64, anchor_screen: DVec2) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let anchor_world = self.screen_to_world(anchor_screen);
        self.scale = (self.scale * factor).clamp(DVec2::splat(ZOOM_MIN), DVec2::splat(ZOOM_MAX));
        // Keep the anchor under the same screen pixel after rescale.
        self.position = anchor_screen - anchor_world * self.scale;
        self.changed = true;
    }

    /// Replace the per-axis scale. Non-finite or non-positive axes ignored.
    pub fn set_scale(&mut self, scale: DVec2) {
        if scale.x.is_finite() && scale.y.is_finite() && scale.x > 0.0 && scale.y > 0.0 {
            self.scale = scale.clamp(DVec2::splat(ZOOM_MIN), DVec2::splat(ZOOM_MAX));
            self.changed = true;
        }
    }

    /// Drain the change flag; true when the camera moved since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}
