//! Auto-pan controller: nudges the camera while a drag hovers near the
//! viewport edge.
//!
//! Speed ramps from zero at the margin boundary to the maximum at the
//! viewport edge, independently per direction; corners combine both axes.
//! The controller tells the caller the applied screen delta so the dragged
//! entity can be translated by the same amount and stay pinned under the
//! pointer.

#[cfg(test)]
#[path = "autopan_test.rs"]
mod autopan_test;

use glam::DVec2;

use crate::camera::Camera;
use crate::consts::{AUTOPAN_MARGIN_PX, AUTOPAN_MAX_SPEED_PX};

/// Edge-of-viewport auto-pan loop state.
#[derive(Debug, Default)]
pub struct AutoPan {
    running: bool,
}

impl AutoPan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the loop (called on drag-start). Idempotent.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop the loop (called unconditionally on drag-end). Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the loop is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one frame: if the pointer is inside the edge margin, pan the
    /// camera and return the screen-space delta the scene content moved by
    /// (the caller applies the inverse to the dragged entity). Zero when
    /// idle or the pointer is clear of the margins.
    pub fn step(&mut self, camera: &mut Camera, pointer_screen: DVec2, viewport: DVec2) -> DVec2 {
        if !self.running {
            return DVec2::ZERO;
        }
        let nudge = edge_nudge(pointer_screen, viewport);
        if nudge == DVec2::ZERO {
            return DVec2::ZERO;
        }
        // Panning the camera opposite to the nudge scrolls the world toward it.
        camera.pan(-nudge);
        nudge
    }
}

/// Per-axis nudge in screen pixels for this pointer position, ramping
/// linearly across the margin band. Positive x means the view should move
/// right (pointer near the right edge).
#[must_use]
fn edge_nudge(pointer: DVec2, viewport: DVec2) -> DVec2 {
    DVec2::new(
        axis_nudge(pointer.x, viewport.x),
        axis_nudge(pointer.y, viewport.y),
    )
}

fn axis_nudge(pos: f64, extent: f64) -> f64 {
    if extent <= AUTOPAN_MARGIN_PX * 2.0 {
        return 0.0;
    }
    if pos < AUTOPAN_MARGIN_PX {
        let depth = ((AUTOPAN_MARGIN_PX - pos) / AUTOPAN_MARGIN_PX).clamp(0.0, 1.0);
        return -depth * AUTOPAN_MAX_SPEED_PX;
    }
    let far_edge = extent - AUTOPAN_MARGIN_PX;
    if pos > far_edge {
        let depth = ((pos - far_edge) / AUTOPAN_MARGIN_PX).clamp(0.0, 1.0);
        return depth * AUTOPAN_MAX_SPEED_PX;
    }
    0.0
}
