#![allow(clippy::float_cmp)]

use approx::assert_relative_eq;
use glam::DVec2;
use uuid::Uuid;

use super::*;
use crate::geom::Corner;
use crate::scene::CornerRadii;

fn rect(scene: &mut Scene, parent: NodeId, x: f64, y: f64) -> NodeId {
    scene
        .insert(Node::new(NodeKind::Rect { corner_radii: CornerRadii::default() }).at(x, y).sized(20.0, 20.0), parent)
        .unwrap()
}

fn assert_abs_eq(scene: &Scene, id: NodeId, expected: glam::DAffine2) {
    let abs = scene.absolute_transform(id).unwrap();
    let bounds = crate::geom::Rect::new(0.0, 0.0, 20.0, 20.0);
    for corner in Corner::ALL {
        let p = bounds.corner(corner);
        let a = abs.transform_point2(p);
        let b = expected.transform_point2(p);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-6);
    }
}

// =============================================================
// Joining
// =============================================================

#[test]
fn joining_reparents_without_a_visual_jump() {
    let mut scene = Scene::new();
    let root = scene.root();
    let carrier = scene.insert(Node::new(NodeKind::Group).at(300.0, 100.0), root).unwrap();
    scene.get_mut(carrier).unwrap().scale = DVec2::new(2.0, 1.0);
    scene.get_mut(carrier).unwrap().rotation_deg = 30.0;

    let a = rect(&mut scene, carrier, 10.0, 10.0);
    let b = rect(&mut scene, root, -50.0, 20.0);
    let abs_a = scene.absolute_transform(a).unwrap();
    let abs_b = scene.absolute_transform(b).unwrap();

    let group = TempGroup::ensure(&mut scene, &[a, b]).unwrap();

    assert_eq!(scene.get(a).unwrap().parent, Some(group.container()));
    assert_eq!(scene.get(b).unwrap().parent, Some(group.container()));
    assert_abs_eq(&scene, a, abs_a);
    assert_abs_eq(&scene, b, abs_b);
}

#[test]
fn members_lose_draggability_while_grouped() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = rect(&mut scene, root, 0.0, 0.0);
    let b = rect(&mut scene, root, 50.0, 0.0);
    scene.get_mut(b).unwrap().draggable = false;

    let group = TempGroup::ensure(&mut scene, &[a, b]).unwrap();
    assert!(!scene.get(a).unwrap().draggable);
    assert!(!scene.get(b).unwrap().draggable);

    group.destroy(&mut scene);
    assert!(scene.get(a).unwrap().draggable);
    assert!(!scene.get(b).unwrap().draggable);
}

#[test]
fn joining_a_missing_member_fails() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = rect(&mut scene, root, 0.0, 0.0);
    let err = TempGroup::ensure(&mut scene, &[a, Uuid::new_v4()]).unwrap_err();
    assert!(matches!(err, SceneError::NodeNotFound(_)));
}

#[test]
fn duplicate_ids_join_once_and_survive_the_round_trip() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = rect(&mut scene, root, 0.0, 0.0);
    let b = rect(&mut scene, root, 50.0, 0.0);

    let group = TempGroup::ensure(&mut scene, &[a, b, a]).unwrap();
    assert_eq!(group.members(), vec![a, b]);
    group.destroy(&mut scene);

    assert!(scene.contains(a));
    assert_eq!(scene.get(a).unwrap().parent, Some(root));
    assert_eq!(scene.get(root).unwrap().children.len(), 2);
}

#[test]
fn accessors_report_container_and_members() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = rect(&mut scene, root, 0.0, 0.0);
    let b = rect(&mut scene, root, 50.0, 0.0);
    let outsider = rect(&mut scene, root, 100.0, 0.0);

    let group = TempGroup::ensure(&mut scene, &[a, b]).unwrap();
    assert_eq!(group.members(), vec![a, b]);
    assert!(group.involves(a));
    assert!(group.involves(group.container()));
    assert!(!group.involves(outsider));
}

// =============================================================
// Leaving
// =============================================================

#[test]
fn leave_restores_parents_and_stacking_exactly() {
    let mut scene = Scene::new();
    let root = scene.root();
    // Six siblings; members sit at z 1, 3, 4.
    let siblings: Vec<NodeId> = (0..6).map(|i| rect(&mut scene, root, f64::from(i) * 30.0, 0.0)).collect();
    let members = [siblings[1], siblings[3], siblings[4]];

    // Join in an order unrelated to stacking.
    let group = TempGroup::ensure(&mut scene, &[members[2], members[0], members[1]]).unwrap();
    group.destroy(&mut scene);

    for (i, id) in siblings.iter().enumerate() {
        assert_eq!(scene.get(*id).unwrap().parent, Some(root));
        assert_eq!(scene.z_index(*id), Some(i));
    }
    assert_eq!(scene.get(root).unwrap().children.len(), 6);
}

#[test]
fn leave_after_a_group_move_keeps_the_moved_placement() {
    let mut scene = Scene::new();
    let root = scene.root();
    let carrier = scene.insert(Node::new(NodeKind::Group).at(40.0, 40.0), root).unwrap();
    scene.get_mut(carrier).unwrap().rotation_deg = 15.0;
    let a = rect(&mut scene, carrier, 0.0, 0.0);
    let b = rect(&mut scene, root, 200.0, 0.0);

    let group = TempGroup::ensure(&mut scene, &[a, b]).unwrap();
    let container = group.container();
    scene.get_mut(container).unwrap().position += DVec2::new(25.0, -10.0);

    let abs_a = scene.absolute_transform(a).unwrap();
    let abs_b = scene.absolute_transform(b).unwrap();
    group.destroy(&mut scene);

    assert_eq!(scene.get(a).unwrap().parent, Some(carrier));
    assert_eq!(scene.get(b).unwrap().parent, Some(root));
    assert_abs_eq(&scene, a, abs_a);
    assert_abs_eq(&scene, b, abs_b);
    assert!(!scene.contains(container));
}

#[test]
fn untouched_round_trip_is_exact() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = rect(&mut scene, root, 12.5, -7.25);
    scene.get_mut(a).unwrap().rotation_deg = 33.0;
    scene.get_mut(a).unwrap().scale = DVec2::new(1.5, 0.75);
    let b = rect(&mut scene, root, 90.0, 60.0);

    let before_a = scene.get(a).unwrap().clone();
    let group = TempGroup::ensure(&mut scene, &[a, b]).unwrap();
    group.destroy(&mut scene);

    let after_a = scene.get(a).unwrap();
    assert_relative_eq!(after_a.position.x, before_a.position.x, epsilon = 1e-9);
    assert_relative_eq!(after_a.position.y, before_a.position.y, epsilon = 1e-9);
    assert_relative_eq!(after_a.rotation_deg, before_a.rotation_deg, epsilon = 1e-9);
    assert_relative_eq!(after_a.scale.x, before_a.scale.x, epsilon = 1e-9);
    assert_relative_eq!(after_a.scale.y, before_a.scale.y, epsilon = 1e-9);
}

// =============================================================
// Committing
// =============================================================

#[test]
fn commit_preserves_relative_stacking_inside_the_group() {
    let mut scene = Scene::new();
    let root = scene.root();
    let siblings: Vec<NodeId> = (0..8).map(|i| rect(&mut scene, root, f64::from(i) * 30.0, 0.0)).collect();
    let members = [siblings[2], siblings[5], siblings[7]];

    let temp = TempGroup::ensure(&mut scene, &[members[1], members[2], members[0]]).unwrap();
    let group = temp.commit_to_permanent_group(&mut scene).unwrap();

    let children = &scene.get(group).unwrap().children;
    assert_eq!(children.as_slice(), &[members[0], members[1], members[2]]);
}

#[test]
fn commit_lands_the_group_in_the_topmost_member_slot() {
    let mut scene = Scene::new();
    let root = scene.root();
    let siblings: Vec<NodeId> = (0..5).map(|i| rect(&mut scene, root, f64::from(i) * 30.0, 0.0)).collect();
    let members = [siblings[1], siblings[2]];

    let temp = TempGroup::ensure(&mut scene, &members).unwrap();
    let group = temp.commit_to_permanent_group(&mut scene).unwrap();

    assert_eq!(scene.get(group).unwrap().parent, Some(root));
    // Two members left; the group takes the slot of the higher one, which
    // after their removal is index 2 in a four-child list.
    assert_eq!(scene.get(root).unwrap().children.len(), 4);
    assert_eq!(scene.z_index(group), Some(2));
    assert_eq!(scene.z_index(siblings[0]), Some(0));
    assert_eq!(scene.z_index(siblings[3]), Some(1));
    assert_eq!(scene.z_index(siblings[4]), Some(3));
}

#[test]
fn commit_keeps_world_placement_and_draggability() {
    let mut scene = Scene::new();
    let root = scene.root();
    let a = rect(&mut scene, root, 10.0, 10.0);
    let b = rect(&mut scene, root, 80.0, 40.0);
    scene.get_mut(b).unwrap().draggable = false;

    let temp = TempGroup::ensure(&mut scene, &[a, b]).unwrap();
    let container = temp.container();
    scene.get_mut(container).unwrap().position += DVec2::new(5.0, 5.0);

    let abs_a = scene.absolute_transform(a).unwrap();
    let abs_b = scene.absolute_transform(b).unwrap();
    let group = temp.commit_to_permanent_group(&mut scene).unwrap();

    assert_eq!(scene.get(a).unwrap().parent, Some(group));
    assert_abs_eq(&scene, a, abs_a);
    assert_abs_eq(&scene, b, abs_b);
    assert!(scene.get(a).unwrap().draggable);
    assert!(!scene.get(b).unwrap().draggable);
    assert!(!scene.contains(container));
}
