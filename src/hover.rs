//! Hover probe: read-only highlight of the entity the pointer is over,
//! independent of selection.
//!
//! Also home to the ownership-resolution rule shared with pointer-down:
//! a hit leaf usually resolves to its outermost group ancestor, unless the
//! leaf-prefer modifier is held or the active selection is that group or
//! already lives inside it (drill-down).

#[cfg(test)]
#[path = "hover_test.rs"]
mod hover_test;

use glam::DVec2;

use crate::camera::Camera;
use crate::consts::HOVER_THROTTLE_MS;
use crate::input::Modifiers;
use crate::scene::{NodeId, Scene};

/// Resolve which node owns an interaction that hit `leaf`.
///
/// Preference order: the outermost group ancestor below the root; the leaf
/// itself when the leaf-prefer modifier is held, or when `selection` is that
/// group or any node inside it — once the user is working in a group, clicks
/// drill through to the leaves.
#[must_use]
pub fn resolve_owner(scene: &Scene, leaf: NodeId, selection: Option<NodeId>, modifiers: Modifiers) -> NodeId {
    let Some(outermost) = outermost_group(scene, leaf) else {
        return leaf;
    };
    if modifiers.prefer_leaf() {
        return leaf;
    }
    if let Some(selected) = selection
        && (selected == outermost || scene.is_ancestor(outermost, selected))
    {
        return leaf;
    }
    outermost
}

/// The outermost group ancestor of `node` below the world root, if any.
#[must_use]
pub fn outermost_group(scene: &Scene, node: NodeId) -> Option<NodeId> {
    let mut outermost = None;
    for ancestor in scene.ancestors(node) {
        if ancestor != scene.root() && scene.get(ancestor).is_some_and(|n| n.kind.is_group()) {
            outermost = Some(ancestor);
        }
    }
    outermost
}

/// Throttled hover highlight state.
#[derive(Debug, Default)]
pub struct HoverProbe {
    last_eval_ms: Option<f64>,
    highlight: Option<NodeId>,
}

impl HoverProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The node to draw a highlight frame around, if any.
    #[must_use]
    pub fn highlight(&self) -> Option<NodeId> {
        self.highlight
    }

    /// Clear the highlight (drag started, pointer left, detach).
    pub fn clear(&mut self) {
        self.highlight = None;
    }

    /// Evaluate the probe for a pointer-move. `now_ms` is a host-supplied
    /// monotonic timestamp used only for throttling; `suppressed` is true
    /// while a drag is active or any button is held.
    pub fn probe(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        pointer_screen: DVec2,
        selection: Option<NodeId>,
        modifiers: Modifiers,
        now_ms: f64,
        suppressed: bool,
    ) {
        if suppressed {
            self.highlight = None;
            return;
        }
        if let Some(last) = self.last_eval_ms
            && now_ms - last < HOVER_THROTTLE_MS
        {
            return;
        }
        self.last_eval_ms = Some(now_ms);

        let world = camera.screen_to_world(pointer_screen);
        let Some(leaf) = scene.node_at_point(world) else {
            self.highlight = None;
            return;
        };
        let owner = resolve_owner(scene, leaf, selection, modifiers);

        // Never double-frame the active selection or its ancestors.
        if let Some(selected) = selection
            && (owner == selected || scene.is_ancestor(owner, selected))
        {
            self.highlight = None;
            return;
        }
        self.highlight = Some(owner);
    }
}
