//! Interactive transform & selection overlay engine for a 2D scene graph.
//!
//! The crate is headless: the host wires pointer events and a once-per-frame
//! tick into [`controller::OverlayController`] and reads back screen-space
//! overlay geometry (handle layout, highlight target, floating labels) plus
//! lifecycle events from the bus. Rendering, the shape catalog, snapping,
//! and culling live outside; the scene-graph and camera collaborators are
//! included so the engine and its tests are self-contained.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | Selection state, resize gestures, frame-coalesced resync |
//! | [`scene`] | Node tree: local/absolute affine transforms, z-order, reparenting |
//! | [`camera`] | Pan/zoom world node and screen↔world conversions |
//! | [`handles`] | Handle roles and per-frame screen-space layout |
//! | [`input`] | Pointer/modifier types and the drag-session state machine |
//! | [`rotate`] | Pivot-preserving rotation drags |
//! | [`radius`] | Corner-radius handles with smart routing |
//! | [`multi`] | Temporary multi-selection group with exact reversal |
//! | [`autopan`] | Edge-of-viewport camera nudging during drags |
//! | [`hover`] | Throttled hover probe and ownership resolution |
//! | [`events`] | Event bus with scoped subscription handles |
//! | [`geom`] | Rects, corners/edges, affine compose/decompose |
//! | [`consts`] | Shared numeric constants |

pub mod autopan;
pub mod camera;
pub mod consts;
pub mod controller;
pub mod events;
pub mod geom;
pub mod handles;
pub mod hover;
pub mod input;
pub mod multi;
pub mod radius;
pub mod rotate;
pub mod scene;
