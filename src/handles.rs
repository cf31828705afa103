//! Handle roles and the per-frame screen-space layout of the selection
//! overlay: the resize frame, corner/edge anchors, rotate handles, radius
//! handles, and the floating size label.
//!
//! Layout is computed entirely in screen space from the target's absolute
//! transform composed with the camera, so handle sizes stay constant under
//! zoom by construction. Edge anchors span the whole edge and are invisible
//! hit areas; everything else renders at a fixed pixel size.

#[cfg(test)]
#[path = "handles_test.rs"]
mod handles_test;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::consts::{
    EDGE_HIT_HALF_THICKNESS_PX, GEOM_EPSILON, HANDLE_HALF_SIZE_PX, HANDLE_HIT_RADIUS_PX,
    ROTATE_HANDLE_OFFSET_PX,
};
use crate::geom::{Corner, Edge};
use crate::scene::{NodeId, Scene};

/// What a handle does when dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleRole {
    /// Scale from a bounding-box corner.
    ResizeCorner(Corner),
    /// Scale from an edge midpoint (full-edge hit area).
    ResizeEdge(Edge),
    /// Rotate around the entity center.
    Rotate(Corner),
    /// Adjust a rectangle's corner radius.
    Radius(Corner),
}

/// One screen-anchored interactive handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    pub role: HandleRole,
    /// Center of the hit area in screen pixels.
    pub screen_pos: DVec2,
    /// Half-extents of the hit area before rotation.
    pub half_extents: DVec2,
    /// Screen-space rotation of the hit area in degrees.
    pub rotation_deg: f64,
    /// Whether the handle is drawn (edge anchors are hit-only).
    pub visible: bool,
    /// Advisory cursor name for the host.
    pub cursor: &'static str,
}

impl Handle {
    /// Whether the screen point falls inside this handle's hit area
    /// (plus the hit slop).
    ///
    /// Radius handles are precision controls sitting close to the corner
    /// anchors; they get no slop so corner grabs stay reachable on small
    /// rects.
    #[must_use]
    pub fn hit(&self, screen_pt: DVec2) -> bool {
        let local = DAffine2::from_angle(-self.rotation_deg.to_radians())
            .transform_vector2(screen_pt - self.screen_pos);
        let slop = match self.role {
            HandleRole::Radius(_) => 0.0,
            _ => (HANDLE_HIT_RADIUS_PX - HANDLE_HALF_SIZE_PX).max(0.0),
        };
        local.x.abs() <= self.half_extents.x + slop && local.y.abs() <= self.half_extents.y + slop
    }
}

/// Floating text label (entity size or live corner radius).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLabel {
    pub text: String,
    /// Screen anchor just below/beside the relevant geometry.
    pub anchor: DVec2,
    pub visible: bool,
}

/// The full handle set for one selection target, rebuilt on resync.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleLayout {
    /// The node this layout was computed for.
    pub target: NodeId,
    /// Screen-space quad of the target bounds, TL TR BR BL order.
    pub frame: [DVec2; 4],
    /// All handles, in hit-priority order.
    pub handles: Vec<Handle>,
}

impl HandleLayout {
    /// Compute the layout for `target`, or `None` when the node is gone or
    /// its geometry degenerate. `with_radius` adds the four radius handles
    /// (single-selected rect leaves only).
    #[must_use]
    pub fn compute(scene: &Scene, camera: &Camera, target: NodeId, with_radius: bool) -> Option<Self> {
        let abs = scene.absolute_transform(target)?;
        let bounds = scene.local_bounds(target)?;
        let to_screen = camera.transform() * abs;

        let frame = [
            to_screen.transform_point2(bounds.corner(Corner::TopLeft)),
            to_screen.transform_point2(bounds.corner(Corner::TopRight)),
            to_screen.transform_point2(bounds.corner(Corner::BottomRight)),
            to_screen.transform_point2(bounds.corner(Corner::BottomLeft)),
        ];
        let center = (frame[0] + frame[1] + frame[2] + frame[3]) * 0.25;

        let mut handles = Vec::with_capacity(16);

        if with_radius
            && let Some(radii) = scene.get(target).and_then(|n| n.corner_radii())
        {
            let max_radius = bounds.w.min(bounds.h) * 0.5;
            for corner in Corner::ALL {
                let Some((start, dir, side)) = crate::radius::travel_segment(&bounds, corner) else {
                    continue;
                };
                let travel = if max_radius > GEOM_EPSILON {
                    radii.get(corner) / max_radius * side
                } else {
                    0.0
                };
                let local = start + dir * travel;
                handles.push(Handle {
                    role: HandleRole::Radius(corner),
                    screen_pos: to_screen.transform_point2(local),
                    half_extents: DVec2::splat(HANDLE_HALF_SIZE_PX),
                    rotation_deg: 0.0,
                    visible: true,
                    cursor: "crosshair",
                });
            }
        }

        for corner in Corner::ALL {
            let pos = frame[corner.index()];
            let outward = (pos - center).normalize_or(corner.outward());
            handles.push(Handle {
                role: HandleRole::Rotate(corner),
                screen_pos: pos + outward * ROTATE_HANDLE_OFFSET_PX,
                half_extents: DVec2::splat(HANDLE_HALF_SIZE_PX),
                rotation_deg: 0.0,
                visible: true,
                cursor: "grab",
            });
        }

        for corner in Corner::ALL {
            handles.push(Handle {
                role: HandleRole::ResizeCorner(corner),
                screen_pos: frame[corner.index()],
                half_extents: DVec2::splat(HANDLE_HALF_SIZE_PX),
                rotation_deg: 0.0,
                visible: true,
                cursor: corner_cursor(corner),
            });
        }

        for edge in Edge::ALL {
            let (a, b) = edge_endpoints(&frame, edge);
            let span = b - a;
            let len = span.length();
            let rotation_deg = if len > GEOM_EPSILON { span.y.atan2(span.x).to_degrees() } else { 0.0 };
            handles.push(Handle {
                role: HandleRole::ResizeEdge(edge),
                screen_pos: (a + b) * 0.5,
                // Full edge length: grabbing anywhere along the edge works.
                half_extents: DVec2::new(len * 0.5, EDGE_HIT_HALF_THICKNESS_PX),
                rotation_deg,
                visible: false,
                cursor: edge_cursor(edge),
            });
        }

        Some(Self { target, frame, handles })
    }

    /// The highest-priority handle under the screen point, if any.
    #[must_use]
    pub fn hit_test(&self, screen_pt: DVec2) -> Option<HandleRole> {
        self.handles.iter().find(|h| h.hit(screen_pt)).map(|h| h.role)
    }

    /// The handle with the given role.
    #[must_use]
    pub fn handle(&self, role: HandleRole) -> Option<&Handle> {
        self.handles.iter().find(|h| h.role == role)
    }
}

fn edge_endpoints(frame: &[DVec2; 4], edge: Edge) -> (DVec2, DVec2) {
    match edge {
        Edge::Top => (frame[0], frame[1]),
        Edge::Right => (frame[1], frame[2]),
        Edge::Bottom => (frame[2], frame[3]),
        Edge::Left => (frame[3], frame[0]),
    }
}

fn corner_cursor(corner: Corner) -> &'static str {
    match corner {
        Corner::TopLeft | Corner::BottomRight => "nwse-resize",
        Corner::TopRight | Corner::BottomLeft => "nesw-resize",
    }
}

fn edge_cursor(edge: Edge) -> &'static str {
    match edge {
        Edge::Top | Edge::Bottom => "ns-resize",
        Edge::Left | Edge::Right => "ew-resize",
    }
}
