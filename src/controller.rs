//! Transform overlay controller: owns the selection, the drag-session state
//! machine, and the per-frame resync of all handle geometry.
//!
//! All geometry recomputation funnels through a pending-flag + `on_frame`
//! pattern: any number of camera/scene change notifications within one frame
//! collapse into a single handle-layout rebuild. The size label is refreshed
//! on a frame-count debounce rather than on every micro-update.
//!
//! Interactive failures follow the local-handling policy: a stale node
//! tears the gesture/selection down silently, degenerate geometry skips the
//! frame, and nothing in here returns an error to the host.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use glam::{DAffine2, DVec2};
use tracing::{debug, trace};

use crate::autopan::AutoPan;
use crate::camera::Camera;
use crate::consts::{DRAG_THRESHOLD_PX, LABEL_DEBOUNCE_FRAMES, MIN_NODE_SIZE};
use crate::events::{EventBus, OverlayEvent, TransformPayload};
use crate::geom::{self, Corner, Edge, Rect};
use crate::handles::{HandleLayout, HandleRole, OverlayLabel};
use crate::hover::{HoverProbe, resolve_owner};
use crate::input::{Button, DragKind, DragState, Modifiers, PressTarget};
use crate::multi::TempGroup;
use crate::radius::RadiusSession;
use crate::rotate::RotateSession;
use crate::scene::{NodeId, NodeKind, Scene};

/// The active selection variant. Transitions always tear the previous
/// variant's handle set down before building the next (no overlap).
#[derive(Debug, Default)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    None,
    /// One entity selected.
    Single {
        node: NodeId,
        /// Draggable flag before selection marked the node draggable.
        prev_draggable: bool,
    },
    /// N entities manipulated through a temporary group container.
    Multi(TempGroup),
}

impl SelectionState {
    /// The node the overlay attaches to: the entity, or the group container.
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Self::None => None,
            Self::Single { node, .. } => Some(*node),
            Self::Multi(group) => Some(group.container()),
        }
    }
}

/// Gesture context for translating a node.
#[derive(Debug, Clone)]
pub struct MoveSession {
    /// Node being moved (an entity or the group container).
    pub node: NodeId,
    start_abs: DVec2,
    start_pointer_world: DVec2,
    /// Selection to apply on drag-end when the drag began on an unselected
    /// entity (selection updates at gesture end, not at pointer-down).
    select_on_end: Option<NodeId>,
}

impl MoveSession {
    fn begin(scene: &Scene, camera: &Camera, node: NodeId, pointer_screen: DVec2) -> Option<Self> {
        let start_abs = scene.absolute_position(node)?;
        Some(Self {
            node,
            start_abs,
            start_pointer_world: camera.screen_to_world(pointer_screen),
            select_on_end: None,
        })
    }

    /// Re-derive the node position from the current pointer. Returns whether
    /// the node still exists.
    fn step(&self, scene: &mut Scene, camera: &Camera, pointer_screen: DVec2) -> bool {
        if !scene.contains(self.node) {
            return false;
        }
        let delta = camera.screen_to_world(pointer_screen) - self.start_pointer_world;
        scene.set_absolute_position(self.node, self.start_abs + delta);
        true
    }

    fn cancel(&self, scene: &mut Scene) {
        if scene.contains(self.node) {
            scene.set_absolute_position(self.node, self.start_abs);
        }
    }
}

/// Which anchor a resize drag grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    Corner(Corner),
    Edge(Edge),
}

/// Local transform snapshot for cancel/restore.
#[derive(Debug, Clone, Copy)]
struct TransformSnapshot {
    position: DVec2,
    scale: DVec2,
    rotation_deg: f64,
    width: f64,
    height: f64,
}

/// Gesture context for one resize drag.
///
/// The opposite corner's (or edge's) absolute position is captured at
/// drag-start and re-enforced after every step by translating the entity, so
/// that point never visually moves — box-to-transform mapping alone drifts
/// it under rotation or non-uniform parent scale.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    /// Node being resized.
    pub node: NodeId,
    anchor: ResizeAnchor,
    start_abs: DAffine2,
    start_bounds: Rect,
    snapshot: TransformSnapshot,
    start_radii: Option<[f64; 4]>,
    /// World position of the fixed point, re-enforced every step.
    opposite_world: DVec2,
    /// Leaf entities bake the new box into width/height; groups scale.
    bake: bool,
}

impl ResizeSession {
    fn begin(scene: &Scene, node: NodeId, anchor: ResizeAnchor) -> Option<Self> {
        let n = scene.get(node)?;
        let start_abs = scene.absolute_transform(node)?;
        let start_bounds = scene.local_bounds(node)?;
        let fixed_local = fixed_point(&start_bounds, anchor);
        Some(Self {
            node,
            anchor,
            start_abs,
            start_bounds,
            snapshot: TransformSnapshot {
                position: n.position,
                scale: n.scale,
                rotation_deg: n.rotation_deg,
                width: n.width,
                height: n.height,
            },
            start_radii: n.corner_radii().map(|r| {
                std::array::from_fn(|i| r.get(Corner::ALL[i]))
            }),
            opposite_world: start_abs.transform_point2(fixed_local),
            bake: !n.kind.is_group(),
        })
    }

    /// Apply one pointer step. Returns whether the node still exists.
    fn step(&self, scene: &mut Scene, camera: &Camera, pointer_screen: DVec2, modifiers: Modifiers) -> bool {
        if !scene.contains(self.node) {
            return false;
        }

        let pointer_local = self
            .start_abs
            .inverse()
            .transform_point2(camera.screen_to_world(pointer_screen));

        let fixed = fixed_point(&self.start_bounds, self.anchor);
        let start_size = DVec2::new(
            self.start_bounds.w.max(MIN_NODE_SIZE),
            self.start_bounds.h.max(MIN_NODE_SIZE),
        );

        // Signed distance from the fixed point along each dragged axis;
        // crossing over the fixed point clamps at the minimum size.
        let mut size = match self.anchor {
            ResizeAnchor::Corner(corner) => {
                let dir = drag_direction(corner);
                (pointer_local - fixed) * dir
            }
            ResizeAnchor::Edge(edge) => {
                let along = match edge {
                    Edge::Right => pointer_local.x - fixed.x,
                    Edge::Left => fixed.x - pointer_local.x,
                    Edge::Bottom => pointer_local.y - fixed.y,
                    Edge::Top => fixed.y - pointer_local.y,
                };
                if edge.is_horizontal_resize() {
                    DVec2::new(along, start_size.y)
                } else {
                    DVec2::new(start_size.x, along)
                }
            }
        };
        size = size.max(DVec2::splat(MIN_NODE_SIZE));

        // Keep-ratio applies to corner anchors only, re-sampled every step.
        if modifiers.keep_ratio()
            && let ResizeAnchor::Corner(_) = self.anchor
        {
            let factor = (size.x / start_size.x).max(size.y / start_size.y);
            size = (start_size * factor).max(DVec2::splat(MIN_NODE_SIZE));
        }

        // Apply the new box, then re-pin the fixed point.
        let fixed_local_after = if self.bake {
            let Some(n) = scene.get_mut(self.node) else {
                return false;
            };
            n.width = size.x;
            n.height = size.y;
            let (w, h) = (n.width, n.height);
            // Bake keeps rounded corners circular under the new box.
            if let Some(radii) = n.corner_radii_mut() {
                radii.clamp_to(w, h);
            }
            fixed_point(&Rect::new(0.0, 0.0, size.x, size.y), self.anchor)
        } else {
            let factor = size / start_size;
            if let Some(n) = scene.get_mut(self.node) {
                n.scale = self.snapshot.scale * factor;
            }
            fixed
        };

        self.repin(scene, fixed_local_after);
        true
    }

    /// Translate the node in its parent frame so the fixed point's absolute
    /// position matches the drag-start capture exactly.
    fn repin(&self, scene: &mut Scene, fixed_local: DVec2) {
        let Some(abs_now) = scene.absolute_transform(self.node) else {
            return;
        };
        let drift = self.opposite_world - abs_now.transform_point2(fixed_local);
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

    fn cancel(&self, scene: &mut Scene) {
        let Some(n) = scene.get_mut(self.node) else {
            return;
        };
        n.position = self.snapshot.position;
        n.scale = self.snapshot.scale;
        n.rotation_deg = self.snapshot.rotation_deg;
        n.width = self.snapshot.width;
        n.height = self.snapshot.height;
        if let (Some(radii), Some(saved)) = (n.corner_radii_mut(), self.start_radii) {
            for corner in Corner::ALL {
                radii.set(corner, saved[corner.index()]);
            }
        }
    }
}

/// Local coordinates of the point a resize must keep pinned: the opposite
/// corner, or the opposite edge's midpoint.
fn fixed_point(bounds: &Rect, anchor: ResizeAnchor) -> DVec2 {
    match anchor {
        ResizeAnchor::Corner(corner) => bounds.corner(corner.opposite()),
        ResizeAnchor::Edge(edge) => bounds.edge_midpoint(edge.opposite()),
    }
}

/// Per-axis sign from the fixed point toward the dragged corner.
fn drag_direction(corner: Corner) -> DVec2 {
    let (ux, uy) = corner.unit();
    DVec2::new(ux.mul_add(2.0, -1.0), uy.mul_add(2.0, -1.0))
}

/// The transform & selection overlay controller.
pub struct OverlayController {
    scene: Scene,
    camera: Camera,
    bus: EventBus,
    selection: SelectionState,
    drag: DragState,
    hover: HoverProbe,
    autopan: AutoPan,
    layout: Option<HandleLayout>,
    size_label: Option<OverlayLabel>,
    resync_pending: bool,
    frame_count: u64,
    last_label_frame: u64,
    viewport: DVec2,
    last_pointer_screen: Option<DVec2>,
    last_modifiers: Modifiers,
    primary_down: bool,
    attached: bool,
}

impl OverlayController {
    /// A detached controller over a fresh scene. Call [`Self::attach`]
    /// before feeding pointer events.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera::new(),
            bus: EventBus::new(),
            selection: SelectionState::None,
            drag: DragState::Idle,
            hover: HoverProbe::new(),
            autopan: AutoPan::new(),
            layout: None,
            size_label: None,
            resync_pending: false,
            frame_count: 0,
            last_label_frame: 0,
            viewport: DVec2::ZERO,
            last_pointer_screen: None,
            last_modifiers: Modifiers::default(),
            primary_down: false,
            attached: false,
        }
    }

    /// Activate the controller for a viewport of the given pixel size.
    pub fn attach(&mut self, viewport: DVec2) {
        self.viewport = viewport;
        self.attached = true;
        debug!(?viewport, "overlay attached");
    }

    /// Deactivate: tears down selection, drag session, and hover state.
    pub fn detach(&mut self) {
        self.teardown_selection(true);
        self.drag = DragState::Idle;
        self.autopan.stop();
        self.hover.clear();
        self.primary_down = false;
        self.attached = false;
        debug!("overlay detached");
    }

    /// Update the viewport size (resize of the host window).
    pub fn set_viewport(&mut self, viewport: DVec2) {
        if viewport.x.is_finite() && viewport.y.is_finite() && viewport.x > 0.0 && viewport.y > 0.0 {
            self.viewport = viewport;
            self.request_resync();
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for the host; follow mutations with
    /// [`Self::notify_scene_changed`].
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access; the camera raises its own change flag.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The event bus, for subscribing/unsubscribing.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current handle layout, if a selection is active and synced.
    #[must_use]
    pub fn layout(&self) -> Option<&HandleLayout> {
        self.layout.as_ref()
    }

    /// The floating size/radius label, if visible.
    #[must_use]
    pub fn label(&self) -> Option<&OverlayLabel> {
        self.size_label.as_ref()
    }

    /// The hover highlight target, if any.
    #[must_use]
    pub fn hover_highlight(&self) -> Option<NodeId> {
        self.hover.highlight()
    }

    /// Whether a drag session is running.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // --- Selection ---

    /// Select a single entity, tearing down any previous selection.
    pub fn select(&mut self, id: NodeId) {
        if !self.scene.contains(id) {
            return;
        }
        if let SelectionState::Single { node, .. } = self.selection
            && node == id
        {
            return;
        }
        self.teardown_selection(false);

        let Some(node) = self.scene.get_mut(id) else {
            return;
        };
        let prev_draggable = node.draggable;
        if !node.locked {
            node.draggable = true;
        }
        self.selection = SelectionState::Single { node: id, prev_draggable };
        self.request_resync();
        self.rebuild_layout();
        debug!(node = %id, "selected");
        self.bus.publish(&OverlayEvent::Selected(id));
    }

    /// Select N entities as a temporary multi-selection group. One entity
    /// falls back to [`Self::select`]; an empty slice clears the selection.
    pub fn select_many(&mut self, ids: &[NodeId]) {
        // Duplicate ids would produce two reparent records for one node.
        let mut live: Vec<NodeId> = Vec::with_capacity(ids.len());
        for &id in ids {
            if self.scene.contains(id) && !live.contains(&id) {
                live.push(id);
            }
        }
        match live.len() {
            0 => {
                self.deselect();
                return;
            }
            1 => {
                self.select(live[0]);
                return;
            }
            _ => {}
        }

        self.teardown_selection(false);
        let Ok(group) = TempGroup::ensure(&mut self.scene, &live) else {
            return;
        };
        let members = group.members();
        self.selection = SelectionState::Multi(group);
        self.request_resync();
        self.rebuild_layout();
        self.bus.publish(&OverlayEvent::MultiCreated(members));
    }

    /// Clear the selection, restoring pre-selection flags.
    pub fn deselect(&mut self) {
        self.teardown_selection(true);
    }

    /// Commit the active temporary multi-selection into a permanent group,
    /// which becomes the new single selection. Returns the group id.
    pub fn commit_group(&mut self) -> Option<NodeId> {
        let SelectionState::Multi(_) = self.selection else {
            return None;
        };
        self.abort_drag();
        let SelectionState::Multi(group) = std::mem::take(&mut self.selection) else {
            return None;
        };
        let members = group.members();
        self.layout = None;
        self.size_label = None;

        let created = group.commit_to_permanent_group(&mut self.scene)?;
        self.bus.publish(&OverlayEvent::GroupCreated { group: created, members });
        self.bus.publish(&OverlayEvent::MultiDestroyed);
        self.select(created);
        Some(created)
    }

    /// Tear down whatever selection variant is active. Always destroys the
    /// handle set before the next variant is built.
    fn teardown_selection(&mut self, emit_cleared: bool) {
        self.abort_drag();
        let had_selection = !matches!(self.selection, SelectionState::None);

        match std::mem::take(&mut self.selection) {
            SelectionState::None => {}
            SelectionState::Single { node, prev_draggable } => {
                if let Some(n) = self.scene.get_mut(node) {
                    n.draggable = prev_draggable;
                }
                debug!(node = %node, "deselected");
                self.bus.publish(&OverlayEvent::Deselected(node));
            }
            SelectionState::Multi(group) => {
                group.destroy(&mut self.scene);
                self.bus.publish(&OverlayEvent::MultiDestroyed);
            }
        }

        self.layout = None;
        self.size_label = None;
        if emit_cleared && had_selection {
            self.bus.publish(&OverlayEvent::SelectionCleared);
        }
    }

    // --- Change notifications ---

    /// Mark handle geometry stale; the rebuild happens once in `on_frame`
    /// no matter how many notifications arrive before it.
    pub fn request_resync(&mut self) {
        self.resync_pending = true;
    }

    /// Host notification that scene content changed outside the overlay.
    pub fn notify_scene_changed(&mut self) {
        self.request_resync();
    }

    // --- Pointer events ---

    /// Pointer-down: resolves what was pressed and arms the state machine.
    pub fn pointer_down(&mut self, screen: DVec2, button: Button, modifiers: Modifiers) {
        if !self.attached || button != Button::Primary {
            return;
        }
        self.primary_down = true;
        self.last_pointer_screen = Some(screen);
        self.last_modifiers = modifiers;
        self.hover.clear();

        let press = if let Some(role) = self.layout.as_ref().and_then(|l| l.hit_test(screen)) {
            PressTarget::Handle(role)
        } else {
            let world = self.camera.screen_to_world(screen);
            match self.scene.node_at_point(world) {
                Some(leaf) => {
                    let owner = resolve_owner(&self.scene, leaf, self.selection.target(), modifiers);
                    PressTarget::Node(owner)
                }
                None => PressTarget::Empty,
            }
        };
        self.drag = DragState::Armed { start_screen: screen, press };
    }

    /// Pointer-move: runs the hover probe when idle, promotes an armed press
    /// past the drag threshold, and steps the active session.
    pub fn pointer_move(&mut self, screen: DVec2, modifiers: Modifiers, now_ms: f64) {
        if !self.attached {
            return;
        }
        self.last_pointer_screen = Some(screen);
        self.last_modifiers = modifiers;

        match &self.drag {
            DragState::Idle => {
                self.hover.probe(
                    &self.scene,
                    &self.camera,
                    screen,
                    self.selection.target(),
                    modifiers,
                    now_ms,
                    self.primary_down,
                );
            }
            DragState::Armed { start_screen, press } => {
                if screen.distance(*start_screen) >= DRAG_THRESHOLD_PX {
                    let (start, press) = (*start_screen, *press);
                    self.begin_drag(start, press);
                    // First real step follows immediately.
                    self.step_drag(screen, modifiers);
                }
            }
            DragState::Dragging(_) => {
                self.step_drag(screen, modifiers);
            }
        }
    }

    /// Pointer-up: a click below the threshold updates selection; a drag
    /// session ends, emits its transform event, and stops auto-pan.
    pub fn pointer_up(&mut self, screen: DVec2, button: Button, modifiers: Modifiers) {
        if !self.attached || button != Button::Primary {
            return;
        }
        self.primary_down = false;
        self.last_pointer_screen = Some(screen);
        self.last_modifiers = modifiers;

        match std::mem::take(&mut self.drag) {
            DragState::Idle => {}
            DragState::Armed { press, .. } => match press {
                PressTarget::Node(owner) => self.select(owner),
                PressTarget::Empty => self.deselect(),
                PressTarget::Handle(_) => {}
            },
            DragState::Dragging(kind) => self.end_drag(kind),
        }
    }

    /// Abort the active drag session, restoring drag-start state.
    pub fn cancel_drag(&mut self) {
        let DragState::Dragging(kind) = std::mem::take(&mut self.drag) else {
            return;
        };
        match kind {
            DragKind::Move(session) => session.cancel(&mut self.scene),
            DragKind::Resize(session) => session.cancel(&mut self.scene),
            DragKind::Rotate(session) => session.cancel(&mut self.scene),
            DragKind::Radius(session) => session.cancel(&mut self.scene),
        }
        self.autopan.stop();
        self.size_label = None;
        self.request_resync();
        trace!("drag cancelled");
    }

    /// Drop the active session without restoring anything (stale reference
    /// or selection teardown mid-gesture).
    fn abort_drag(&mut self) {
        if let DragState::Dragging(kind) = std::mem::take(&mut self.drag) {
            if let DragKind::Rotate(session) = kind {
                // Still restore the suspended drag policy if the node lives.
                session.finish(&mut self.scene);
            }
            self.autopan.stop();
            self.size_label = None;
            self.request_resync();
        } else {
            self.drag = DragState::Idle;
        }
    }

    fn begin_drag(&mut self, start_screen: DVec2, press: PressTarget) {
        let kind = match press {
            PressTarget::Handle(role) => self.begin_handle_drag(role, start_screen),
            PressTarget::Node(owner) => self.begin_move_drag(owner, start_screen),
            PressTarget::Empty => None,
        };
        match kind {
            Some(kind) => {
                self.autopan.start();
                trace!("drag started");
                self.drag = DragState::Dragging(kind);
            }
            None => self.drag = DragState::Idle,
        }
    }

    fn begin_handle_drag(&mut self, role: HandleRole, start_screen: DVec2) -> Option<DragKind> {
        let target = self.selection.target()?;
        match role {
            HandleRole::ResizeCorner(corner) => {
                ResizeSession::begin(&self.scene, target, ResizeAnchor::Corner(corner))
                    .map(DragKind::Resize)
            }
            HandleRole::ResizeEdge(edge) => {
                ResizeSession::begin(&self.scene, target, ResizeAnchor::Edge(edge))
                    .map(DragKind::Resize)
            }
            HandleRole::Rotate(_) => {
                RotateSession::begin(&mut self.scene, &self.camera, target, start_screen)
                    .map(DragKind::Rotate)
            }
            HandleRole::Radius(corner) => {
                let layout = self.layout.as_ref()?;
                RadiusSession::begin(&self.scene, layout, target, corner, start_screen)
                    .map(DragKind::Radius)
            }
        }
    }

    fn begin_move_drag(&mut self, owner: NodeId, start_screen: DVec2) -> Option<DragKind> {
        // Dragging the selected multi-group's member moves the container.
        let node = match &self.selection {
            SelectionState::Multi(group) if group.involves(owner) => group.container(),
            _ => owner,
        };
        let n = self.scene.get(node)?;
        if n.locked || !(n.draggable || self.selection.target() == Some(node)) {
            return None;
        }
        let mut session = MoveSession::begin(&self.scene, &self.camera, node, start_screen)?;
        if self.selection.target() != Some(node) {
            session.select_on_end = Some(owner);
        }
        Some(DragKind::Move(session))
    }

    fn step_drag(&mut self, screen: DVec2, modifiers: Modifiers) {
        let alive = match &mut self.drag {
            DragState::Dragging(DragKind::Move(session)) => {
                session.step(&mut self.scene, &self.camera, screen)
            }
            DragState::Dragging(DragKind::Resize(session)) => {
                session.step(&mut self.scene, &self.camera, screen, modifiers)
            }
            DragState::Dragging(DragKind::Rotate(session)) => {
                session.step(&mut self.scene, &self.camera, screen, modifiers)
            }
            DragState::Dragging(DragKind::Radius(session)) => {
                session.step(&mut self.scene, &self.camera, screen, modifiers)
            }
            _ => return,
        };

        if alive {
            self.request_resync();
        } else {
            // Stale reference: the entity vanished mid-drag.
            self.abort_drag();
            if self.selection.target().is_some_and(|t| !self.scene.contains(t)) {
                self.teardown_selection(true);
            }
        }
    }

    fn end_drag(&mut self, kind: DragKind) {
        self.autopan.stop();
        let transformed = match kind {
            DragKind::Move(session) => {
                let select_on_end = session.select_on_end;
                let node = session.node;
                if let Some(owner) = select_on_end {
                    self.select(owner);
                }
                Some(node)
            }
            DragKind::Resize(session) => Some(session.node),
            DragKind::Rotate(session) => {
                let node = session.node;
                session.finish(&mut self.scene);
                Some(node)
            }
            DragKind::Radius(_) => None,
        };

        if let Some(node) = transformed
            && let Some(payload) = self.transform_payload(node)
        {
            self.bus.publish(&OverlayEvent::Transformed { id: node, transform: payload });
        }

        self.size_label = None;
        self.request_resync();
        trace!("drag ended");
    }

    fn transform_payload(&self, node: NodeId) -> Option<TransformPayload> {
        let n = self.scene.get(node)?;
        Some(TransformPayload {
            x: n.position.x,
            y: n.position.y,
            width: n.width,
            height: n.height,
            rotation: geom::normalize_deg(n.rotation_deg),
            scale_x: n.scale.x,
            scale_y: n.scale.y,
        })
    }

    // --- Per-frame work ---

    /// Run one animation frame: auto-pan while dragging, then a single
    /// coalesced handle resync, then debounced label refresh.
    pub fn on_frame(&mut self) {
        if !self.attached {
            return;
        }
        self.frame_count += 1;

        if self.drag.is_dragging()
            && let Some(pointer) = self.last_pointer_screen
        {
            let nudge = self.autopan.step(&mut self.camera, pointer, self.viewport);
            if nudge != DVec2::ZERO {
                // Re-run the session at the same screen point: the camera
                // moved underneath it, which keeps the entity pinned.
                self.step_drag(pointer, self.last_modifiers);
            }
        }

        let camera_moved = self.camera.take_changed();
        if camera_moved || self.resync_pending {
            self.resync_pending = false;
            self.rebuild_layout();
        }

        if self.drag.is_dragging() && self.frame_count - self.last_label_frame >= LABEL_DEBOUNCE_FRAMES {
            self.last_label_frame = self.frame_count;
            self.refresh_size_label();
        }
    }

    /// Recompute the handle layout for the current selection; tears the
    /// selection down silently when its node went stale.
    fn rebuild_layout(&mut self) {
        let Some(target) = self.selection.target() else {
            self.layout = None;
            return;
        };
        if !self.scene.contains(target) {
            self.teardown_selection(true);
            return;
        }
        let with_radius = matches!(self.selection, SelectionState::Single { .. })
            && matches!(self.scene.get(target).map(|n| &n.kind), Some(NodeKind::Rect { .. }));
        self.layout = HandleLayout::compute(&self.scene, &self.camera, target, with_radius);
    }

    /// Rebuild the floating label from the active session.
    fn refresh_size_label(&mut self) {
        self.size_label = match &self.drag {
            DragState::Dragging(DragKind::Resize(session)) => {
                let node = self.scene.get(session.node);
                let anchor = self
                    .layout
                    .as_ref()
                    .map_or(DVec2::ZERO, |l| (l.frame[2] + l.frame[3]) * 0.5 + DVec2::new(0.0, 16.0));
                node.map(|n| OverlayLabel {
                    text: format!("{} × {}", n.width.round(), n.height.round()),
                    anchor,
                    visible: true,
                })
            }
            DragState::Dragging(DragKind::Radius(session)) => {
                let layout = self.layout.as_ref();
                layout.and_then(|l| session.label(&self.scene, l))
            }
            _ => None,
        };
    }
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new()
    }
}
