//! Temporary multi-selection group: manipulate N entities as one rigid unit
//! without permanently restructuring the scene.
//!
//! Joining reparents each member into an ephemeral container while
//! re-deriving its local transform so nothing visually jumps; a reparent
//! record per member captures everything needed to put it back exactly.
//! Leaving restores parent, absolute transform, z-order (via relative moves,
//! since sibling indices shift while members are re-inserted), and the
//! draggable flag. Committing performs the same reparenting into a permanent
//! group instead.

#[cfg(test)]
#[path = "multi_test.rs"]
mod multi_test;

use glam::DAffine2;
use tracing::debug;

use crate::scene::{Node, NodeId, NodeKind, Scene, SceneError};

/// Everything needed to restore one member to its pre-join placement.
#[derive(Debug, Clone)]
pub struct ReparentRecord {
    /// The member node.
    pub node: NodeId,
    /// Parent before joining.
    pub original_parent: NodeId,
    /// Z-index within that parent before joining.
    pub original_z: usize,
    /// Absolute transform at join time.
    pub abs_at_join: DAffine2,
    /// Draggable flag at join time.
    pub draggable_at_join: bool,
}

/// The ephemeral container and its members' reparent records.
///
/// At most one temporary group is alive at a time (enforced by the
/// controller). Changing the member set means destroy + re-join.
#[derive(Debug)]
pub struct TempGroup {
    container: NodeId,
    records: Vec<ReparentRecord>,
}

impl TempGroup {
    /// Build a temporary group from ≥1 members: create the container in the
    /// world layer, record each member, and reparent it in without any
    /// visual jump. Members lose individual draggability while grouped.
    ///
    /// # Errors
    ///
    /// Propagates [`SceneError`] when a member is missing or reparenting is
    /// structurally invalid; the scene is left with whatever members were
    /// already moved (callers treat this as fatal for the group and rebuild).
    pub fn ensure(scene: &mut Scene, members: &[NodeId]) -> Result<Self, SceneError> {
        // Capture every record before the first reparent: pulling a member
        // out of a shared parent shifts the sibling indices of the ones still
        // in place. Duplicate ids join once.
        let mut records: Vec<ReparentRecord> = Vec::with_capacity(members.len());
        for &member in members {
            if records.iter().any(|r| r.node == member) {
                continue;
            }
            let (original_parent, draggable_at_join) = {
                let node = scene.get(member).ok_or(SceneError::NodeNotFound(member))?;
                (node.parent.ok_or(SceneError::RootImmutable)?, node.draggable)
            };
            let original_z = scene.z_index(member).ok_or(SceneError::NodeNotFound(member))?;
            let abs_at_join = scene
                .absolute_transform(member)
                .ok_or(SceneError::NodeNotFound(member))?;

            records.push(ReparentRecord {
                node: member,
                original_parent,
                original_z,
                abs_at_join,
                draggable_at_join,
            });
        }

        let container = scene.insert(Node::new(NodeKind::Group), scene.root())?;
        for record in &records {
            scene.reparent(record.node, container)?;
            scene.set_local_from_absolute(record.node, record.abs_at_join);
            if let Some(node) = scene.get_mut(record.node) {
                node.draggable = false;
            }
        }

        debug!(members = records.len(), "temporary group created");
        Ok(Self { container, records })
    }

    /// The container node the shared overlay attaches to.
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The member nodes in join order.
    #[must_use]
    pub fn members(&self) -> Vec<NodeId> {
        self.records.iter().map(|r| r.node).collect()
    }

    /// Whether the node is the container or one of the members.
    #[must_use]
    pub fn involves(&self, id: NodeId) -> bool {
        self.container == id || self.records.iter().any(|r| r.node == id)
    }

    /// Dissolve the group: every member goes back to its original parent
    /// with its absolute transform (as last manipulated inside the
    /// container), original z-order, and original draggable flag.
    pub fn destroy(self, scene: &mut Scene) {
        // Ascending original z keeps the relative-move restore well-defined.
        let mut records = self.records;
        records.sort_by_key(|r| r.original_z);

        for record in &records {
            restore_member(scene, record);
        }
        scene.remove(self.container);
        debug!(members = records.len(), "temporary group destroyed");
    }

    /// Reparent all members into a new permanent group node instead of
    /// restoring them. Members are inserted sorted by original z-index so
    /// relative stacking survives; the group itself lands in the original
    /// maximum z slot among its members. Returns the new group id.
    pub fn commit_to_permanent_group(self, scene: &mut Scene) -> Option<NodeId> {
        let mut records = self.records;
        records.sort_by_key(|r| r.original_z);

        // Host parent and target slot come from the topmost member.
        let top = records.last()?;
        let group_parent = top.original_parent;
        let target_z = top.original_z;

        let group_abs = scene.absolute_transform(self.container)?;
        let Ok(group) = scene.insert(Node::new(NodeKind::Group), group_parent) else {
            return None;
        };
        scene.set_local_from_absolute(group, group_abs);

        for record in &records {
            let abs_now = scene.absolute_transform(record.node);
            if scene.reparent(record.node, group).is_err() {
                continue;
            }
            if let Some(abs) = abs_now {
                scene.set_local_from_absolute(record.node, abs);
            }
            if let Some(node) = scene.get_mut(record.node) {
                node.draggable = record.draggable_at_join;
            }
        }

        // Slide the group down from the top of its parent to the target slot.
        if let Some(current) = scene.z_index(group) {
            let sibling_count = scene.get(group_parent).map_or(0, |p| p.children.len());
            let target = target_z.min(sibling_count.saturating_sub(1));
            for _ in target..current {
                if !scene.move_down(group) {
                    break;
                }
            }
        }

        scene.remove(self.container);
        debug!(members = records.len(), "temporary group committed to permanent group");
        Some(group)
    }
}

/// Put one member back: parent, absolute transform, z-order, draggability.
fn restore_member(scene: &mut Scene, record: &ReparentRecord) {
    if !scene.contains(record.node) || !scene.contains(record.original_parent) {
        return;
    }
    let abs_now = scene.absolute_transform(record.node);
    if scene.reparent(record.node, record.original_parent).is_err() {
        return;
    }
    if let Some(abs) = abs_now {
        scene.set_local_from_absolute(record.node, abs);
    }
    if let Some(node) = scene.get_mut(record.node) {
        node.draggable = record.draggable_at_join;
    }

    // Relative moves only: sibling indices shift as members come back.
    if let Some(current) = scene.z_index(record.node) {
        let sibling_count = scene.get(record.original_parent).map_or(0, |p| p.children.len());
        let target = record.original_z.min(sibling_count.saturating_sub(1));
        if target < current {
            for _ in target..current {
                if !scene.move_down(record.node) {
                    break;
                }
            }
        } else {
            for _ in current..target {
                if !scene.move_up(record.node) {
                    break;
                }
            }
        }
    }
}
