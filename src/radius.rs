//! Corner-radius handle subsystem.
//!
//! Each handle travels along the diagonal from its corner toward the rect
//! center. The travel segment has length `min(w, h) / 2`; projecting the
//! pointer onto it gives `t ∈ [0, side]`, which maps linearly to a radius of
//! `t / side × min(w, h) / 2`. When handles start bunched together (tiny
//! rects, large radii), smart routing picks the affected corner from the
//! first meaningful pointer direction instead of the nominally grabbed
//! handle.

#[cfg(test)]
#[path = "radius_test.rs"]
mod radius_test;

use glam::DVec2;

use crate::camera::Camera;
use crate::consts::{GEOM_EPSILON, RADIUS_INSET_RATIO, SMART_ROUTING_MOVE_PX, SMART_ROUTING_RADIUS_PX};
use crate::geom::{Corner, Rect};
use crate::handles::{HandleLayout, HandleRole, OverlayLabel};
use crate::input::Modifiers;
use crate::scene::{NodeId, Scene};

/// How the affected corner is decided.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Routing {
    /// The grabbed handle is authoritative.
    Direct(Corner),
    /// Overlapping handles: waiting for the first meaningful movement.
    Pending { start_screen: DVec2 },
    /// Smart routing resolved to this corner.
    Resolved(Corner),
}

/// Gesture context for one corner-radius drag.
#[derive(Debug, Clone)]
pub struct RadiusSession {
    /// The rect node being edited.
    pub node: NodeId,
    routing: Routing,
    /// Radii at drag-start, for cancel.
    start_radii: [f64; 4],
}

impl RadiusSession {
    /// Begin a radius drag on `grabbed`. `None` when the node is missing or
    /// lacks the corner-radius capability.
    #[must_use]
    pub fn begin(
        scene: &Scene,
        layout: &HandleLayout,
        node: NodeId,
        grabbed: Corner,
        pointer_screen: DVec2,
    ) -> Option<Self> {
        let radii = scene.get(node)?.corner_radii()?;
        let start_radii = std::array::from_fn(|i| {
            radii.get(Corner::ALL[i])
        });

        // Count how many radius handles sit on top of the grab point.
        let bunched = Corner::ALL
            .iter()
            .filter_map(|c| layout.handle(HandleRole::Radius(*c)))
            .filter(|h| h.screen_pos.distance(pointer_screen) <= SMART_ROUTING_RADIUS_PX)
            .count();

        let routing = if bunched >= 2 {
            Routing::Pending { start_screen: pointer_screen }
        } else {
            Routing::Direct(grabbed)
        };
        Some(Self { node, routing, start_radii })
    }

    /// Apply one pointer step. Returns whether the node still exists.
    pub fn step(&mut self, scene: &mut Scene, camera: &Camera, pointer_screen: DVec2, modifiers: Modifiers) -> bool {
        if !scene.contains(self.node) {
            return false;
        }

        if let Routing::Pending { start_screen } = self.routing {
            if pointer_screen.distance(start_screen) < SMART_ROUTING_MOVE_PX {
                // Not enough movement yet to tell corners apart.
                return true;
            }
            if let Some(corner) = route_by_direction(scene, camera, self.node, pointer_screen) {
                self.routing = Routing::Resolved(corner);
            } else {
                return true;
            }
        }

        let corner = match self.routing {
            Routing::Direct(c) | Routing::Resolved(c) => c,
            Routing::Pending { .. } => return true,
        };

        let Some(radius) = self.project_radius(scene, camera, corner, pointer_screen) else {
            return true;
        };

        let Some(node) = scene.get_mut(self.node) else {
            return false;
        };
        let (width, height) = (node.width, node.height);
        if let Some(radii) = node.corner_radii_mut() {
            if modifiers.isolate_corner() {
                radii.set(corner, radius);
            } else {
                radii.set_all(radius);
            }
            radii.clamp_to(width, height);
        }
        true
    }

    /// Pointer → entity-local unrotated frame → projection on the corner's
    /// travel segment → radius. `None` when geometry is degenerate.
    fn project_radius(&self, scene: &Scene, camera: &Camera, corner: Corner, pointer_screen: DVec2) -> Option<f64> {
        let abs = scene.absolute_transform(self.node)?;
        let bounds = scene.local_bounds(self.node)?;
        let (start, dir, side) = travel_segment(&bounds, corner)?;

        let to_local = (camera.transform() * abs).inverse();
        let pointer_local = to_local.transform_point2(pointer_screen);
        let t = (pointer_local - start).dot(dir).clamp(0.0, side);

        let max_radius = bounds.w.min(bounds.h) * 0.5;
        Some(t / side * max_radius)
    }

    /// Live label text for the active corner, anchored at its handle.
    #[must_use]
    pub fn label(&self, scene: &Scene, layout: &HandleLayout) -> Option<OverlayLabel> {
        let corner = match self.routing {
            Routing::Direct(c) | Routing::Resolved(c) => c,
            Routing::Pending { .. } => return None,
        };
        let radii = scene.get(self.node)?.corner_radii()?;
        let handle = layout.handle(HandleRole::Radius(corner))?;
        Some(OverlayLabel {
            text: format!("{:.0}", radii.get(corner)),
            anchor: handle.screen_pos + DVec2::new(12.0, -12.0),
            visible: true,
        })
    }

    /// Abort, restoring the radii captured at drag-start.
    pub fn cancel(self, scene: &mut Scene) {
        if let Some(node) = scene.get_mut(self.node)
            && let Some(radii) = node.corner_radii_mut()
        {
            for corner in Corner::ALL {
                radii.set(corner, self.start_radii[corner.index()]);
            }
        }
    }
}

/// The corner's travel segment in the entity-local frame: start point
/// (inset from the corner toward the center), unit direction, and length.
/// Length is the smaller per-axis distance from the inset point to the
/// center, so travel never crosses the opposite inset point. `None` when
/// the rect is degenerate.
pub(crate) fn travel_segment(bounds: &Rect, corner: Corner) -> Option<(DVec2, DVec2, f64)> {
    if bounds.w.min(bounds.h) * 0.5 <= GEOM_EPSILON {
        return None;
    }
    let center = bounds.center();
    let k = bounds.corner(corner);
    let dir = (center - k).normalize_or(corner.opposite().outward());
    let inset = bounds.w.min(bounds.h) * RADIUS_INSET_RATIO;
    let start = k + dir * inset;
    let side = (center.x - start.x).abs().min((center.y - start.y).abs());
    if side <= GEOM_EPSILON {
        return None;
    }
    Some((start, dir, side))
}

/// Pick the corner whose outward diagonal best matches the direction from
/// the rect's screen center to the pointer. Ties break toward the earlier
/// corner in TL, TR, BR, BL order.
fn route_by_direction(scene: &Scene, camera: &Camera, node: NodeId, pointer_screen: DVec2) -> Option<Corner> {
    let abs = scene.absolute_transform(node)?;
    let bounds = scene.local_bounds(node)?;
    let to_screen = camera.transform() * abs;
    let center_screen = to_screen.transform_point2(bounds.center());

    let v = pointer_screen - center_screen;
    if v.length_squared() < GEOM_EPSILON * GEOM_EPSILON {
        return None;
    }
    let dir = v.normalize();

    let mut best = Corner::TopLeft;
    let mut best_dot = f64::NEG_INFINITY;
    for corner in Corner::ALL {
        // Screen-space corner direction, so rotation is accounted for.
        let toward = (to_screen.transform_point2(bounds.corner(corner)) - center_screen)
            .normalize_or(corner.outward());
        let d = dir.dot(toward);
        if d > best_dot + GEOM_EPSILON {
            best_dot = d;
            best = corner;
        }
    }
    Some(best)
}
