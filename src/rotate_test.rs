#![allow(clippy::float_cmp)]

use approx::assert_relative_eq;
use glam::DVec2;

use super::*;
use crate::scene::{CornerRadii, Node, NodeKind};

fn scene_with_rect(x: f64, y: f64, w: f64, h: f64) -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let root = scene.root();
    let id = scene
        .insert(Node::new(NodeKind::Rect { corner_radii: CornerRadii::default() }).at(x, y).sized(w, h), root)
        .unwrap();
    (scene, id)
}

/// Screen point at `deg` degrees around `center`, radius 100.
fn orbit(center: DVec2, deg: f64) -> DVec2 {
    center + DVec2::new(deg.to_radians().cos(), deg.to_radians().sin()) * 100.0
}

#[test]
fn drag_rotates_by_the_pointer_sweep() {
    let (mut scene, id) = scene_with_rect(0.0, 0.0, 100.0, 100.0);
    let camera = Camera::new();
    let center = DVec2::new(50.0, 50.0);

    let session = RotateSession::begin(&mut scene, &camera, id, orbit(center, 0.0)).unwrap();
    assert!(session.step(&mut scene, &camera, orbit(center, 30.0), Modifiers::default()));
    session.finish(&mut scene);

    assert_relative_eq!(scene.get(id).unwrap().rotation_deg, 30.0, epsilon = 1e-9);
}

#[test]
fn rotation_accumulates_across_gestures() {
    let (mut scene, id) = scene_with_rect(0.0, 0.0, 100.0, 100.0);
    let camera = Camera::new();
    let center = absolute_center(&scene, id).unwrap();

    let first = RotateSession::begin(&mut scene, &camera, id, orbit(center, 10.0)).unwrap();
    first.step(&mut scene, &camera, orbit(center, 40.0), Modifiers::default());
    first.finish(&mut scene);

    let second = RotateSession::begin(&mut scene, &camera, id, orbit(center, 90.0)).unwrap();
    second.step(&mut scene, &camera, orbit(center, 135.0), Modifiers::default());
    second.finish(&mut scene);

    assert_relative_eq!(scene.get(id).unwrap().rotation_deg, 75.0, epsilon = 1e-9);

    let after = absolute_center(&scene, id).unwrap();
    assert_relative_eq!(after.x, center.x, epsilon = 1e-9);
    assert_relative_eq!(after.y, center.y, epsilon = 1e-9);
}

#[test]
fn sweep_across_the_angle_seam_does_not_jump() {
    let (mut scene, id) = scene_with_rect(0.0, 0.0, 100.0, 100.0);
    let camera = Camera::new();
    let center = DVec2::new(50.0, 50.0);

    // From 170° to 190° the pointer crosses atan2's ±180° seam; the sweep
    // must read as +20°, not −340°.
    let session = RotateSession::begin(&mut scene, &camera, id, orbit(center, 170.0)).unwrap();
    session.step(&mut scene, &camera, orbit(center, 190.0), Modifiers::default());
    session.finish(&mut scene);

    assert_relative_eq!(scene.get(id).unwrap().rotation_deg, 20.0, epsilon = 1e-9);
}

#[test]
fn center_stays_pinned_inside_a_transformed_parent() {
    let mut scene = Scene::new();
    let root = scene.root();
    let g = scene.insert(Node::new(NodeKind::Group).at(200.0, -50.0), root).unwrap();
    scene.get_mut(g).unwrap().scale = DVec2::new(2.0, 0.5);
    scene.get_mut(g).unwrap().rotation_deg = 25.0;
    let id = scene
        .insert(Node::new(NodeKind::Rect { corner_radii: CornerRadii::default() }).at(10.0, 10.0).sized(60.0, 40.0), g)
        .unwrap();

    let camera = Camera::new();
    let center = absolute_center(&scene, id).unwrap();

    let session = RotateSession::begin(&mut scene, &camera, id, orbit(center, 5.0)).unwrap();
    session.step(&mut scene, &camera, orbit(center, 80.0), Modifiers::default());
    session.finish(&mut scene);

    let after = absolute_center(&scene, id).unwrap();
    assert_relative_eq!(after.x, center.x, epsilon = 1e-6);
    assert_relative_eq!(after.y, center.y, epsilon = 1e-6);
}

#[test]
fn snap_engages_only_near_a_step() {
    let (mut scene, id) = scene_with_rect(0.0, 0.0, 100.0, 100.0);
    let camera = Camera::new();
    let center = DVec2::new(50.0, 50.0);
    let shift = Modifiers { shift: true, ..Modifiers::default() };

    let session = RotateSession::begin(&mut scene, &camera, id, orbit(center, 0.0)).unwrap();
    session.step(&mut scene, &camera, orbit(center, 44.0), shift);
    assert_relative_eq!(scene.get(id).unwrap().rotation_deg, 45.0, epsilon = 1e-9);

    // 52° is more than the tolerance away from both 45° and 60°.
    session.step(&mut scene, &camera, orbit(center, 52.0), shift);
    assert_relative_eq!(scene.get(id).unwrap().rotation_deg, 52.0, epsilon = 1e-9);
    session.finish(&mut scene);
}

#[test]
fn dragging_is_suspended_while_rotating() {
    let (mut scene, id) = scene_with_rect(0.0, 0.0, 100.0, 100.0);
    let camera = Camera::new();
    scene.get_mut(id).unwrap().draggable = true;

    let session = RotateSession::begin(&mut scene, &camera, id, DVec2::new(150.0, 50.0)).unwrap();
    assert!(!scene.get(id).unwrap().draggable);
    session.finish(&mut scene);
    assert!(scene.get(id).unwrap().draggable);
}

#[test]
fn cancel_restores_the_starting_rotation() {
    let (mut scene, id) = scene_with_rect(0.0, 0.0, 100.0, 100.0);
    scene.get_mut(id).unwrap().rotation_deg = 15.0;
    let camera = Camera::new();
    let center = absolute_center(&scene, id).unwrap();

    let session = RotateSession::begin(&mut scene, &camera, id, orbit(center, 0.0)).unwrap();
    session.step(&mut scene, &camera, orbit(center, 120.0), Modifiers::default());
    session.cancel(&mut scene);

    assert_relative_eq!(scene.get(id).unwrap().rotation_deg, 15.0, epsilon = 1e-9);
    let after = absolute_center(&scene, id).unwrap();
    assert_relative_eq!(after.x, center.x, epsilon = 1e-9);
    assert_relative_eq!(after.y, center.y, epsilon = 1e-9);
}

#[test]
fn step_reports_a_vanished_node() {
    let (mut scene, id) = scene_with_rect(0.0, 0.0, 100.0, 100.0);
    let camera = Camera::new();

    let session = RotateSession::begin(&mut scene, &camera, id, DVec2::new(150.0, 50.0)).unwrap();
    scene.remove(id);
    assert!(!session.step(&mut scene, &camera, DVec2::new(50.0, 150.0), Modifiers::default()));
}

#[test]
fn absolute_center_uses_the_full_transform_chain() {
    let mut scene = Scene::new();
    let root = scene.root();
    let g = scene.insert(Node::new(NodeKind::Group).at(100.0, 100.0), root).unwrap();
    scene.get_mut(g).unwrap().scale = DVec2::new(2.0, 2.0);
    let id = scene
        .insert(Node::new(NodeKind::Rect { corner_radii: CornerRadii::default() }).sized(10.0, 10.0), g)
        .unwrap();

    let center = absolute_center(&scene, id).unwrap();
    assert_relative_eq!(center.x, 110.0, epsilon = 1e-9);
    assert_relative_eq!(center.y, 110.0, epsilon = 1e-9);
}
