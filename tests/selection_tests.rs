//! Selection Tests
//!
//! Tests for:
//! - Idempotent select and always-redraw clear
//! - Gizmo layout in the selected node's frame
//! - Selection loss when geometry is removed

use glam::{Quat, Vec3};
use solidview::geom::tools;
use solidview::scene::node::Node;
use solidview::scene::primitive::Primitive;
use solidview::scene::scene::Scene;
use solidview::selection::{SelectionChange, SelectionState};

const EPSILON: f32 = 1e-4;

fn segment(a: Vec3, b: Vec3) -> Primitive {
    Primitive::Polyline { points: vec![a, b] }
}

fn scene_with_solid() -> (Scene, solidview::scene::NodeHandle) {
    let mut scene = Scene::new();
    let mut solid = Node::new("solid");
    solid.transform.position = Vec3::new(10.0, 0.0, 0.0);
    solid.transform.rotation = Quat::from_rotation_z(0.3);
    let solid = scene.add_node(solid);
    scene.add_to_parent(
        Node::new("edge").with_primitive(segment(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0))),
        solid,
    );
    (scene, solid)
}

// ============================================================================
// Select
// ============================================================================

#[test]
fn select_then_reselect_is_one_transition() {
    let (scene, solid) = scene_with_solid();
    let mut selection = SelectionState::new();

    assert_eq!(selection.select(&scene, Some(solid)), SelectionChange::Selected(solid));
    assert_eq!(selection.select(&scene, Some(solid)), SelectionChange::Unchanged);
    assert!(!SelectionChange::Unchanged.needs_redraw());
    assert_eq!(selection.selected(), Some(solid));
}

#[test]
fn clearing_an_empty_selection_still_redraws() {
    let (scene, _) = scene_with_solid();
    let mut selection = SelectionState::new();

    let change = selection.select(&scene, None);
    assert_eq!(change, SelectionChange::Cleared);
    assert!(change.needs_redraw());
    assert!(selection.selected().is_none());
}

#[test]
fn clear_hides_gizmo() {
    let (scene, solid) = scene_with_solid();
    let mut selection = SelectionState::new();
    selection.select(&scene, Some(solid));
    assert!(selection.gizmo().visible);

    selection.select(&scene, None);
    assert!(!selection.gizmo().visible);
    assert!(selection.gizmo().anchor.is_none());
}

#[test]
fn switching_selection_moves_the_gizmo() {
    let (mut scene, first) = scene_with_solid();
    let second = scene.add_node(Node::new("second").with_primitive(segment(Vec3::ZERO, Vec3::ONE)));
    let mut selection = SelectionState::new();

    selection.select(&scene, Some(first));
    assert_eq!(selection.select(&scene, Some(second)), SelectionChange::Selected(second));
    assert_eq!(selection.gizmo().anchor, Some(second));
}

// ============================================================================
// Gizmo
// ============================================================================

#[test]
fn gizmo_corners_are_in_local_frame() {
    let (scene, solid) = scene_with_solid();
    let mut selection = SelectionState::new();
    selection.select(&scene, Some(solid));

    let gizmo = selection.gizmo();
    assert_eq!(gizmo.corners[0], Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(gizmo.corners[6], Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(gizmo.corners, tools::gizmo_corners(&gizmo.local_box));
}

#[test]
fn gizmo_follows_node_world_matrix() {
    let (mut scene, solid) = scene_with_solid();
    let mut selection = SelectionState::new();
    selection.select(&scene, Some(solid));

    scene.get_node_mut(solid).unwrap().transform.position = Vec3::new(-4.0, 1.0, 0.0);

    let world = selection.gizmo().world_matrix(&scene).unwrap();
    assert!((Vec3::from(world.translation) - Vec3::new(-4.0, 1.0, 0.0)).length() < EPSILON);

    // The gizmo box mapped to world matches the world bounding box.
    let corners_world: Vec<Vec3> = selection
        .gizmo()
        .corners
        .iter()
        .map(|&c| world.transform_point3(c))
        .collect();
    let world_box = tools::bounding_box(&scene, solid);
    let gizmo_box = solidview::geom::BoundingBox::from_points(&corners_world);
    assert!((gizmo_box.min - world_box.min).length() < EPSILON);
    assert!((gizmo_box.max - world_box.max).length() < EPSILON);
}

#[test]
fn empty_selection_target_hides_gizmo() {
    let mut scene = Scene::new();
    let group = scene.add_node(Node::new("empty"));
    let mut selection = SelectionState::new();

    assert_eq!(selection.select(&scene, Some(group)), SelectionChange::Selected(group));
    assert!(!selection.gizmo().visible);
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn removed_node_drops_selection() {
    let (mut scene, solid) = scene_with_solid();
    let mut selection = SelectionState::new();
    selection.select(&scene, Some(solid));

    assert!(!selection.forget_removed(&scene));
    scene.remove_node(solid);
    assert!(selection.forget_removed(&scene));
    assert!(selection.selected().is_none());
    assert!(!selection.gizmo().visible);
}

#[test]
fn selecting_a_removed_handle_clears() {
    let (mut scene, solid) = scene_with_solid();
    scene.remove_node(solid);

    let mut selection = SelectionState::new();
    assert_eq!(selection.select(&scene, Some(solid)), SelectionChange::Cleared);
}
