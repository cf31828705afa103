//! Shared numeric constants for the overlay crate.

// ── Handles ─────────────────────────────────────────────────────

/// Screen-space hit slop in pixels for corner, rotate, and radius handles.
pub const HANDLE_HIT_RADIUS_PX: f64 = 8.0;

/// Visual half-size of a corner handle square, in screen pixels.
pub const HANDLE_HALF_SIZE_PX: f64 = 5.0;

/// Distance from a bounding-box corner to its rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Half-thickness of the invisible full-edge resize hit areas, in screen pixels.
pub const EDGE_HIT_HALF_THICKNESS_PX: f64 = 6.0;

// ── Gestures ────────────────────────────────────────────────────

/// Pointer travel in screen pixels that turns an armed press into a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Minimum entity extent per axis in local units; resize clamps here.
pub const MIN_NODE_SIZE: f64 = 1.0;

/// Rotation snap step in degrees while the snap modifier is held.
pub const ROTATE_SNAP_STEP_DEG: f64 = 15.0;

/// Snap only when within this many degrees of a snap step.
pub const ROTATE_SNAP_TOLERANCE_DEG: f64 = 5.0;

// ── Corner radius ───────────────────────────────────────────────

/// Travel-segment start inset from the corner, as a fraction of the
/// rectangle's smaller side.
pub const RADIUS_INSET_RATIO: f64 = 0.15;

/// Two radius handles closer than this (screen px) arm smart routing.
pub const SMART_ROUTING_RADIUS_PX: f64 = 10.0;

/// Pointer travel (screen px) that counts as the first meaningful movement
/// when smart routing picks the affected corner.
pub const SMART_ROUTING_MOVE_PX: f64 = 3.0;

// ── Auto-pan ────────────────────────────────────────────────────

/// Width of the viewport edge band that triggers auto-pan, in screen pixels.
pub const AUTOPAN_MARGIN_PX: f64 = 36.0;

/// Auto-pan speed at the very edge of the viewport, in screen pixels per frame.
pub const AUTOPAN_MAX_SPEED_PX: f64 = 12.0;

// ── Hover / labels ──────────────────────────────────────────────

/// Minimum interval between hover probe evaluations, in milliseconds.
pub const HOVER_THROTTLE_MS: f64 = 40.0;

/// Frames between size-label refreshes while a drag is active.
pub const LABEL_DEBOUNCE_FRAMES: u64 = 3;

// ── Camera ──────────────────────────────────────────────────────

/// Minimum camera zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Maximum camera zoom factor.
pub const ZOOM_MAX: f64 = 100.0;

// ── Numeric guards ──────────────────────────────────────────────

/// Below this length a direction vector is treated as degenerate.
pub const GEOM_EPSILON: f64 = 1e-9;
