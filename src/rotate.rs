//! Rotation handle subsystem: pivot-preserving rotation drags.
//!
//! The pivot is the entity's absolute center, computed from its absolute
//! transform and local bounds rather than a naive midpoint, so offset
//! origins and parent scale are honored. After every step the center is
//! re-measured and any drift is corrected by translating the entity in its
//! parent frame — a pure rotation must never make the shape orbit.

#[cfg(test)]
#[path = "rotate_test.rs"]
mod rotate_test;

use glam::DVec2;

use crate::camera::Camera;
use crate::consts::{ROTATE_SNAP_STEP_DEG, ROTATE_SNAP_TOLERANCE_DEG};
use crate::geom::direction_deg;
use crate::input::Modifiers;
use crate::scene::{NodeId, Scene};

/// Gesture context for one rotation drag.
#[derive(Debug, Clone)]
pub struct RotateSession {
    /// Node being rotated.
    pub node: NodeId,
    /// Absolute center recorded at drag-start; the pivot to preserve.
    center_world: DVec2,
    /// Pointer-to-center angle at drag-start, degrees.
    start_pointer_deg: f64,
    /// Node local rotation at drag-start, degrees.
    base_rotation_deg: f64,
    /// Draggable flag to restore on drag-end (rotation suspends dragging).
    prev_draggable: bool,
}

impl RotateSession {
    /// Begin a rotation drag. `None` when the node is gone or the pointer
    /// sits exactly on the center (no direction to measure).
    #[must_use]
    pub fn begin(scene: &mut Scene, camera: &Camera, node: NodeId, pointer_screen: DVec2) -> Option<Self> {
        let center_world = absolute_center(scene, node)?;
        let pointer_world = camera.screen_to_world(pointer_screen);
        // Degenerate direction: default to pointing right.
        let start_pointer_deg = direction_deg(center_world, pointer_world).unwrap_or(0.0);
        let n = scene.get_mut(node)?;
        let base_rotation_deg = n.rotation_deg;
        let prev_draggable = n.draggable;
        n.draggable = false;
        Some(Self { node, center_world, start_pointer_deg, base_rotation_deg, prev_draggable })
    }

    /// Apply one pointer step. Returns whether the node still exists.
    pub fn step(&self, scene: &mut Scene, camera: &Camera, pointer_screen: DVec2, modifiers: Modifiers) -> bool {
        if !scene.contains(self.node) {
            return false;
        }
        let pointer_world = camera.screen_to_world(pointer_screen);
        let Some(pointer_deg) = direction_deg(self.center_world, pointer_world) else {
            // Pointer collapsed onto the pivot; skip this step.
            return true;
        };

        // Shortest signed sweep; crossing the atan2 seam must not jump 360°.
        let sweep = (pointer_deg - self.start_pointer_deg + 180.0).rem_euclid(360.0) - 180.0;
        let mut rotation = self.base_rotation_deg + sweep;
        if modifiers.snap_rotation() {
            rotation = snap_angle(rotation);
        }

        if let Some(n) = scene.get_mut(self.node) {
            n.rotation_deg = rotation;
        }
        self.repin_center(scene);
        true
    }

    /// Translate the node in its parent frame so the absolute center matches
    /// the recorded pivot again.
    fn repin_center(&self, scene: &mut Scene) {
        let Some(center_now) = absolute_center(scene, self.node) else {
            return;
        };
        let drift = self.center_world - center_now;
        if drift.length_squared() == 0.0 {
            return;
        }
        let Some(parent_abs) = scene.parent_absolute_transform(self.node) else {
            return;
        };
        let local_drift = parent_abs.inverse().transform_vector2(drift);
        if let Some(n) = scene.get_mut(self.node) {
            n.position += local_drift;
        }
    }

    /// Finish the drag, restoring the suspended draggable flag.
    pub fn finish(self, scene: &mut Scene) {
        if let Some(n) = scene.get_mut(self.node) {
            n.draggable = self.prev_draggable;
        }
    }

    /// Abort: restore rotation and re-pin, then restore the drag policy.
    pub fn cancel(self, scene: &mut Scene) {
        if let Some(n) = scene.get_mut(self.node) {
            n.rotation_deg = self.base_rotation_deg;
        }
        self.repin_center(scene);
        self.finish(scene);
    }
}

/// Absolute center of a node: local-bounds center through the absolute
/// transform.
#[must_use]
pub fn absolute_center(scene: &Scene, node: NodeId) -> Option<DVec2> {
    let abs = scene.absolute_transform(node)?;
    let bounds = scene.local_bounds(node)?;
    Some(abs.transform_point2(bounds.center()))
}

/// Snap to the nearest multiple of [`ROTATE_SNAP_STEP_DEG`] when within
/// [`ROTATE_SNAP_TOLERANCE_DEG`]; otherwise leave the angle free.
#[must_use]
fn snap_angle(angle_deg: f64) -> f64 {
    let nearest = (angle_deg / ROTATE_SNAP_STEP_DEG).round() * ROTATE_SNAP_STEP_DEG;
    if (angle_deg - nearest).abs() <= ROTATE_SNAP_TOLERANCE_DEG {
        nearest
    } else {
        angle_deg
    }
}
