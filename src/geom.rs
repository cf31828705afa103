//! Geometry primitives shared across the overlay: axis-aligned rects,
//! box corners/edges, angle helpers, and affine compose/decompose.
//!
//! All transform math runs through [`glam`]'s f64 types (`DVec2`,
//! `DAffine2`). Rotations are degrees at every API surface and only become
//! radians at the trig boundary.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use crate::consts::GEOM_EPSILON;

/// An axis-aligned rectangle in some reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (non-negative).
    pub w: f64,
    /// Height (non-negative).
    pub h: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Geometric center of the rect.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// The given corner point.
    #[must_use]
    pub fn corner(&self, corner: Corner) -> DVec2 {
        let (cx, cy) = corner.unit();
        DVec2::new(self.x + cx * self.w, self.y + cy * self.h)
    }

    /// Midpoint of the given edge.
    #[must_use]
    pub fn edge_midpoint(&self, edge: Edge) -> DVec2 {
        match edge {
            Edge::Top => DVec2::new(self.x + self.w * 0.5, self.y),
            Edge::Right => DVec2::new(self.x + self.w, self.y + self.h * 0.5),
            Edge::Bottom => DVec2::new(self.x + self.w * 0.5, self.y + self.h),
            Edge::Left => DVec2::new(self.x, self.y + self.h * 0.5),
        }
    }

    /// Whether the rect contains the point (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// A bounding-box corner, in the fixed TL, TR, BR, BL order used everywhere
/// in this crate (handle roles, radius vectors, tie-breaking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// All corners in canonical order.
    pub const ALL: [Self; 4] = [Self::TopLeft, Self::TopRight, Self::BottomRight, Self::BottomLeft];

    /// Index in canonical order (TL=0, TR=1, BR=2, BL=3).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }

    /// The diagonally opposite corner.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomRight => Self::TopLeft,
            Self::BottomLeft => Self::TopRight,
        }
    }

    /// Unit-box coordinates of this corner: (0|1, 0|1).
    #[must_use]
    pub fn unit(self) -> (f64, f64) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::BottomRight => (1.0, 1.0),
            Self::BottomLeft => (0.0, 1.0),
        }
    }

    /// Outward diagonal direction from the box center toward this corner.
    #[must_use]
    pub fn outward(self) -> DVec2 {
        let (cx, cy) = self.unit();
        DVec2::new(cx * 2.0 - 1.0, cy * 2.0 - 1.0).normalize()
    }
}

/// A bounding-box edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// All edges in T, R, B, L order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The opposite edge.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Whether dragging this edge changes the horizontal extent.
    #[must_use]
    pub fn is_horizontal_resize(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
#[must_use]
pub fn normalize_deg(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

/// Angle in degrees of the vector `to - from`, or `None` when the two points
/// are too close to define a direction.
#[must_use]
pub fn direction_deg(from: DVec2, to: DVec2) -> Option<f64> {
    let v = to - from;
    if v.length_squared() < GEOM_EPSILON * GEOM_EPSILON {
        return None;
    }
    Some(v.y.atan2(v.x).to_degrees())
}

/// Build a local affine from position, rotation (degrees), and scale.
#[must_use]
pub fn compose(position: DVec2, rotation_deg: f64, scale: DVec2) -> DAffine2 {
    DAffine2::from_scale_angle_translation(scale, rotation_deg.to_radians(), position)
}

/// Split an affine into (position, rotation in degrees, scale).
///
/// Assumes the matrix was produced by scale-rotate-translate composition
/// (no skew). A degenerate column falls back to scale 1 on that axis so the
/// result never contains zeros that would break later inversion.
#[must_use]
pub fn decompose(transform: DAffine2) -> (DVec2, f64, DVec2) {
    let x_axis = transform.matrix2.x_axis;
    let y_axis = transform.matrix2.y_axis;

    let mut scale_x = x_axis.length();
    let mut scale_y = y_axis.length();

    // Negative determinant means one axis is mirrored; fold it into y.
    if transform.matrix2.determinant() < 0.0 {
        scale_y = -scale_y;
    }
    if scale_x.abs() < GEOM_EPSILON {
        scale_x = 1.0;
    }
    if scale_y.abs() < GEOM_EPSILON {
        scale_y = 1.0;
    }

    let rotation_deg = x_axis.y.atan2(x_axis.x).to_degrees();
    (transform.translation, rotation_deg, DVec2::new(scale_x, scale_y))
}
