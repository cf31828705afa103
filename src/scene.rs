//! Scene-graph collaborator: the node tree the overlay operates on.
//!
//! This module implements the contract the overlay consumes — local affine
//! transforms (position, scale, rotation), absolute-transform queries,
//! bounds, reparenting, and z-order mutation via relative moves. Nodes live
//! in a flat arena keyed by [`NodeId`]; a node's z-order is its index in the
//! parent's child list (lower draws first).
//!
//! Rendering and full hit-testing belong to the host; the overlay only needs
//! the topmost-leaf query in [`Scene::node_at_point`].

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::GEOM_EPSILON;
use crate::geom::{self, Rect};

/// Unique identifier for a scene node.
pub type NodeId = Uuid;

/// Errors from structural scene mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    /// The referenced node is not in the scene.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    /// The mutation would make a node its own ancestor.
    #[error("reparenting {0} would create a cycle")]
    CycleDetected(NodeId),
    /// The world root cannot be moved, reparented, or removed.
    #[error("the root node is immutable")]
    RootImmutable,
}

/// Per-corner radii of a rectangle, in the fixed TL, TR, BR, BL order.
///
/// This is the corner-radius capability surface: only node kinds that carry
/// a `CornerRadii` can be edited by the radius handles. Values are kept
/// non-negative; invalid input is rejected at the setter and the previous
/// value retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii([f64; 4]);

impl CornerRadii {
    /// Radius for one corner.
    #[must_use]
    pub fn get(&self, corner: geom::Corner) -> f64 {
        self.0[corner.index()]
    }

    /// Set one corner's radius. Non-finite or negative values are ignored.
    pub fn set(&mut self, corner: geom::Corner, radius: f64) {
        if radius.is_finite() && radius >= 0.0 {
            self.0[corner.index()] = radius;
        }
    }

    /// Set all four corners to the same radius. Invalid values are ignored.
    pub fn set_all(&mut self, radius: f64) {
        if radius.is_finite() && radius >= 0.0 {
            self.0 = [radius; 4];
        }
    }

    /// The single shared radius when all four corners agree, else `None`.
    #[must_use]
    pub fn uniform(&self) -> Option<f64> {
        let first = self.0[0];
        self.0[1..].iter().all(|r| (r - first).abs() < GEOM_EPSILON).then_some(first)
    }

    /// Clamp every corner to `min(width, height) / 2` of the owning rect.
    pub fn clamp_to(&mut self, width: f64, height: f64) {
        let max = (width.min(height) * 0.5).max(0.0);
        for r in &mut self.0 {
            *r = r.clamp(0.0, max);
        }
    }
}

/// What a node is. Kind decides capabilities: only `Rect` supports corner
/// radii, only `Group` owns children that the overlay treats as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Rectangle with optionally rounded corners.
    Rect {
        /// Per-corner rounding radii.
        corner_radii: CornerRadii,
    },
    /// Ellipse inscribed in the node's bounds.
    Ellipse,
    /// Text block; bounds are the layout box.
    Text,
    /// Container grouping other nodes.
    Group,
}

impl NodeKind {
    /// Whether this kind is a container.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }
}

/// A scene node: local transform, extent, kind, and tree links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Stable identity.
    pub id: NodeId,
    /// Shape/container kind.
    pub kind: NodeKind,
    /// Local translation within the parent frame.
    pub position: DVec2,
    /// Local per-axis scale.
    pub scale: DVec2,
    /// Local rotation in degrees, clockwise, around the local origin.
    pub rotation_deg: f64,
    /// Extent along local x, in local units.
    pub width: f64,
    /// Extent along local y, in local units.
    pub height: f64,
    /// Whether the host may move this node directly.
    pub draggable: bool,
    /// Locked nodes are never marked draggable, not even by selection.
    pub locked: bool,
    /// Parent node; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Children in z-order (index 0 draws first).
    pub children: Vec<NodeId>,
}

impl Node {
    /// A new detached node of the given kind with identity transform.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position: DVec2::ZERO,
            scale: DVec2::ONE,
            rotation_deg: 0.0,
            width: 0.0,
            height: 0.0,
            draggable: true,
            locked: false,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder-style position.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = DVec2::new(x, y);
        self
    }

    /// Builder-style extent.
    #[must_use]
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder-style rotation in degrees.
    #[must_use]
    pub fn rotated(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    /// The node's local affine (scale, then rotate, then translate).
    #[must_use]
    pub fn local_transform(&self) -> DAffine2 {
        geom::compose(self.position, self.rotation_deg, self.scale)
    }

    /// Corner-radius capability: present only on rect nodes.
    #[must_use]
    pub fn corner_radii(&self) -> Option<&CornerRadii> {
        match &self.kind {
            NodeKind::Rect { corner_radii } => Some(corner_radii),
            _ => None,
        }
    }

    /// Mutable corner-radius capability.
    pub fn corner_radii_mut(&mut self) -> Option<&mut CornerRadii> {
        match &mut self.kind {
            NodeKind::Rect { corner_radii } => Some(corner_radii),
            _ => None,
        }
    }
}

/// The node arena plus the world root.
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
}

impl Scene {
    /// A scene containing only the world root group.
    #[must_use]
    pub fn new() -> Self {
        let root = Node::new(NodeKind::Group);
        let root_id = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self { nodes, root: root_id }
    }

    /// The world root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether the node exists.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Borrow a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutably borrow a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Insert a detached node as the topmost child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NodeNotFound`] if `parent` is not in the scene.
    pub fn insert(&mut self, mut node: Node, parent: NodeId) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = node.id;
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Remove a node and its whole subtree, detaching it from its parent.
    /// Returns the removed root node, or `None` if it was not present.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        if id == self.root {
            return None;
        }
        let node = self.nodes.remove(&id)?;
        if let Some(parent) = node.parent
            && let Some(p) = self.nodes.get_mut(&parent)
        {
            p.children.retain(|c| *c != id);
        }
        for child in node.children.clone() {
            self.remove_subtree(child);
        }
        Some(node)
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    /// Ancestor chain from the node's parent up to the root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(current) = cursor {
            out.push(current);
            cursor = self.nodes.get(&current).and_then(|n| n.parent);
        }
        out
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    /// Absolute (world) affine of the node: parent chain composed with the
    /// node's local transform. `None` when the node is missing.
    #[must_use]
    pub fn absolute_transform(&self, id: NodeId) -> Option<DAffine2> {
        let node = self.nodes.get(&id)?;
        let parent_abs = match node.parent {
            Some(parent) => self.absolute_transform(parent)?,
            None => DAffine2::IDENTITY,
        };
        Some(parent_abs * node.local_transform())
    }

    /// Absolute affine of the node's parent (identity for root children).
    #[must_use]
    pub fn parent_absolute_transform(&self, id: NodeId) -> Option<DAffine2> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(parent) => self.absolute_transform(parent),
            None => Some(DAffine2::IDENTITY),
        }
    }

    /// Local bounds of the node: `(0, 0, width, height)` for leaves, the
    /// union of child bounds mapped into this node's frame for groups.
    #[must_use]
    pub fn local_bounds(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        if !node.kind.is_group() {
            return Some(Rect::new(0.0, 0.0, node.width, node.height));
        }

        let mut min = DVec2::MAX;
        let mut max = DVec2::MIN;
        let mut any = false;
        for child in &node.children {
            let Some(bounds) = self.local_bounds(*child) else {
                continue;
            };
            let Some(child_node) = self.nodes.get(child) else {
                continue;
            };
            let to_parent = child_node.local_transform();
            for corner in crate::geom::Corner::ALL {
                let p = to_parent.transform_point2(bounds.corner(corner));
                min = min.min(p);
                max = max.max(p);
                any = true;
            }
        }
        if any {
            Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
        } else {
            Some(Rect::new(0.0, 0.0, node.width, node.height))
        }
    }

    /// Absolute position of the node's local origin.
    #[must_use]
    pub fn absolute_position(&self, id: NodeId) -> Option<DVec2> {
        self.absolute_transform(id).map(|t| t.translation)
    }

    /// Move the node so its local origin lands on the given world position,
    /// leaving rotation and scale untouched. No-op when the node is missing.
    pub fn set_absolute_position(&mut self, id: NodeId, world: DVec2) {
        let Some(parent_abs) = self.parent_absolute_transform(id) else {
            return;
        };
        let local = parent_abs.inverse().transform_point2(world);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = local;
        }
    }

    /// Re-derive the node's full local transform so its absolute transform
    /// equals `absolute` under the current parent chain.
    pub fn set_local_from_absolute(&mut self, id: NodeId, absolute: DAffine2) {
        let Some(parent_abs) = self.parent_absolute_transform(id) else {
            return;
        };
        let local = parent_abs.inverse() * absolute;
        let (position, rotation_deg, scale) = geom::decompose(local);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
            node.rotation_deg = rotation_deg;
            node.scale = scale;
        }
    }

    /// Detach the node from its parent and append it as the topmost child of
    /// `new_parent`, keeping the local transform as-is (callers re-derive it
    /// when the absolute placement must survive).
    ///
    /// # Errors
    ///
    /// [`SceneError::RootImmutable`] when moving the root,
    /// [`SceneError::NodeNotFound`] when either node is missing, and
    /// [`SceneError::CycleDetected`] when `new_parent` is the node itself or
    /// one of its descendants.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RootImmutable);
        }
        if !self.nodes.contains_key(&id) {
            return Err(SceneError::NodeNotFound(id));
        }
        if !self.nodes.contains_key(&new_parent) {
            return Err(SceneError::NodeNotFound(new_parent));
        }
        if new_parent == id || self.is_ancestor(id, new_parent) {
            return Err(SceneError::CycleDetected(id));
        }

        let old_parent = self.nodes.get(&id).and_then(|n| n.parent);
        if let Some(old) = old_parent
            && let Some(p) = self.nodes.get_mut(&old)
        {
            p.children.retain(|c| *c != id);
        }
        if let Some(p) = self.nodes.get_mut(&new_parent) {
            p.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }
        Ok(())
    }

    /// The node's z-index: its position in the parent's child list.
    #[must_use]
    pub fn z_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.nodes.get(&id)?.parent?;
        self.nodes.get(&parent)?.children.iter().position(|c| *c == id)
    }

    /// Swap the node with the sibling above it. Returns whether it moved.
    pub fn move_up(&mut self, id: NodeId) -> bool {
        self.move_relative(id, 1)
    }

    /// Swap the node with the sibling below it. Returns whether it moved.
    pub fn move_down(&mut self, id: NodeId) -> bool {
        self.move_relative(id, -1)
    }

    fn move_relative(&mut self, id: NodeId, delta: isize) -> bool {
        let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) else {
            return false;
        };
        let Some(p) = self.nodes.get_mut(&parent) else {
            return false;
        };
        let Some(index) = p.children.iter().position(|c| *c == id) else {
            return false;
        };
        let target = index as isize + delta;
        if target < 0 || target as usize >= p.children.len() {
            return false;
        }
        p.children.swap(index, target as usize);
        true
    }

    /// The topmost leaf (non-group) node whose bounds contain `world`, or
    /// `None` when the point hits empty space.
    #[must_use]
    pub fn node_at_point(&self, world: DVec2) -> Option<NodeId> {
        self.leaf_at_point(self.root, world)
    }

    fn leaf_at_point(&self, id: NodeId, world: DVec2) -> Option<NodeId> {
        let node = self.nodes.get(&id)?;
        // Topmost child first.
        for child in node.children.iter().rev() {
            if let Some(hit) = self.leaf_at_point(*child, world) {
                return Some(hit);
            }
        }
        if node.kind.is_group() || id == self.root {
            return None;
        }
        let abs = self.absolute_transform(id)?;
        let local = abs.inverse().transform_point2(world);
        let bounds = self.local_bounds(id)?;
        bounds.contains(local).then_some(id)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
