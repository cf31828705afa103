//! Input model: modifier keys, mouse buttons, and the drag-session state
//! machine.
//!
//! A press arms the machine without starting a gesture; crossing a small
//! pixel threshold promotes it to a drag, which separates an intentional
//! drag from a click. Each `Dragging` payload carries the full context its
//! subsystem needs to step the gesture and to restore state on cancel.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::controller::{MoveSession, ResizeSession};
use crate::handles::HandleRole;
use crate::radius::RadiusSession;
use crate::rotate::RotateSession;
use crate::scene::NodeId;

/// Keyboard modifier keys held during a pointer event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Resize keeps the aspect ratio while this is held (corner anchors only).
    #[must_use]
    pub fn keep_ratio(self) -> bool {
        self.shift
    }

    /// Rotation snaps to fixed increments while this is held.
    #[must_use]
    pub fn snap_rotation(self) -> bool {
        self.shift
    }

    /// Radius drags affect a single corner while this is held.
    #[must_use]
    pub fn isolate_corner(self) -> bool {
        self.alt
    }

    /// Hover/selection ownership prefers the leaf over its group.
    #[must_use]
    pub fn prefer_leaf(self) -> bool {
        self.ctrl
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressTarget {
    /// A handle of the current selection's overlay.
    Handle(HandleRole),
    /// A node body (already resolved to its selection owner).
    Node(NodeId),
    /// Empty canvas.
    Empty,
}

/// An active drag gesture.
#[derive(Debug, Clone)]
pub enum DragKind {
    /// Translating a node (or the temporary group container).
    Move(MoveSession),
    /// Scaling via a corner or edge anchor.
    Resize(ResizeSession),
    /// Rotating around the entity center.
    Rotate(RotateSession),
    /// Adjusting rectangle corner radii.
    Radius(RadiusSession),
}

/// The drag-session state machine.
///
/// `Idle → Armed → Dragging → Idle`. A session is destroyed unconditionally
/// on pointer-up, cancel, or selection loss.
#[derive(Debug, Clone, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer is down but has not crossed the drag threshold.
    Armed {
        /// Screen position of the press.
        start_screen: DVec2,
        /// What was pressed, resolved at pointer-down.
        press: PressTarget,
    },
    /// A gesture is running.
    Dragging(DragKind),
}

impl DragState {
    /// Whether a drag session (not just an armed press) is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// Whether any pointer interaction is in flight.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
