//! Picking Tests
//!
//! Tests for:
//! - Scene intersection order and hit records
//! - Resolution of face/edge hits to their solid
//! - Visibility filtering and unpickable hits
//! - Screen to ray mapping through the camera

use glam::{Vec2, Vec3};
use solidview::geom::Ray;
use solidview::picking::{self, PickingResolver, PointerEvent, PointerEventKind, SurfaceRect};
use solidview::scene::camera::Camera;
use solidview::scene::node::{Node, NodeRole, SolidId, SolidInfo};
use solidview::scene::primitive::Primitive;
use solidview::scene::scene::Scene;
use solidview::scene::NodeHandle;

const EPSILON: f32 = 1e-4;

/// Square in the XY plane at height `z`, half extent `h`.
fn square(z: f32, h: f32) -> Primitive {
    Primitive::Mesh {
        positions: vec![
            Vec3::new(-h, -h, z),
            Vec3::new(h, -h, z),
            Vec3::new(h, h, z),
            Vec3::new(-h, h, z),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

fn solid_role(name: &str) -> NodeRole {
    NodeRole::Solid(SolidInfo {
        id: SolidId::Text(name.to_string()),
        name: name.to_string(),
        color: [0.5, 0.5, 0.5],
    })
}

/// Adds a solid with one face, returns (solid, face).
fn add_solid(scene: &mut Scene, parent: NodeHandle, name: &str, face: Primitive) -> (NodeHandle, NodeHandle) {
    let solid = scene.add_to_parent(Node::new(name).with_role(solid_role(name)), parent);
    let face = scene.add_to_parent(
        Node::new("face").with_role(NodeRole::Face).with_primitive(face),
        solid,
    );
    (solid, face)
}

fn down_ray() -> Ray {
    Ray::new(Vec3::new(0.0, 0.0, 100.0), Vec3::NEG_Z)
}

// ============================================================================
// Intersection
// ============================================================================

#[test]
fn hits_are_sorted_nearest_first() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("SOLIDS"));
    let (_, far_face) = add_solid(&mut scene, root, "far", square(0.0, 1.0));
    let (_, near_face) = add_solid(&mut scene, root, "near", square(10.0, 1.0));

    let hits = picking::intersect_scene(&scene, None, &down_ray(), 1.0);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].node, near_face);
    assert_eq!(hits[1].node, far_face);
    assert!((hits[0].distance - 90.0).abs() < EPSILON);
    assert!((hits[0].point - Vec3::new(0.0, 0.0, 10.0)).length() < EPSILON);
}

#[test]
fn intersection_uses_live_transforms() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("SOLIDS"));
    let (solid, _) = add_solid(&mut scene, root, "moved", square(0.0, 1.0));
    scene.get_node_mut(solid).unwrap().transform.position = Vec3::new(50.0, 0.0, 0.0);

    assert!(picking::intersect_scene(&scene, None, &down_ray(), 1.0).is_empty());

    let shifted = Ray::new(Vec3::new(50.0, 0.0, 100.0), Vec3::NEG_Z);
    assert_eq!(picking::intersect_scene(&scene, None, &shifted, 1.0).len(), 1);
}

#[test]
fn edge_within_threshold_is_hit() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("SOLIDS"));
    let solid = scene.add_to_parent(Node::new("wire").with_role(solid_role("wire")), root);
    let edge = scene.add_to_parent(
        Node::new("edge").with_role(NodeRole::Edge).with_primitive(Primitive::Polyline {
            points: vec![Vec3::new(-5.0, 0.5, 0.0), Vec3::new(5.0, 0.5, 0.0)],
        }),
        solid,
    );

    let hits = picking::intersect_scene(&scene, None, &down_ray(), 1.0);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].node, edge);

    assert!(picking::intersect_scene(&scene, None, &down_ray(), 0.25).is_empty());
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn nearer_solid_wins_regardless_of_insertion_order() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("SOLIDS"));
    let (near, _) = add_solid(&mut scene, root, "near", square(5.0, 1.0));
    let (_far, _) = add_solid(&mut scene, root, "far", square(-5.0, 1.0));

    let resolver = PickingResolver::new(1.0);
    assert_eq!(resolver.pick_ray(&scene, None, &down_ray()), Some(near));

    // Same geometry, far solid added first.
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("SOLIDS"));
    let (_far, _) = add_solid(&mut scene, root, "far", square(-5.0, 1.0));
    let (near, _) = add_solid(&mut scene, root, "near", square(5.0, 1.0));
    assert_eq!(resolver.pick_ray(&scene, None, &down_ray()), Some(near));
}

#[test]
fn face_hit_resolves_to_solid() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("SOLIDS"));
    let (solid, face) = add_solid(&mut scene, root, "box", square(0.0, 1.0));

    assert_eq!(picking::find_selectable_ancestor(&scene, face), Some(solid));
    assert_eq!(picking::find_selectable_ancestor(&scene, solid), Some(solid));
    assert_eq!(picking::find_selectable_ancestor(&scene, root), None);
}

#[test]
fn hidden_solid_is_skipped() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("SOLIDS"));
    let (near, _) = add_solid(&mut scene, root, "near", square(5.0, 1.0));
    let (far, _) = add_solid(&mut scene, root, "far", square(-5.0, 1.0));
    scene.get_node_mut(near).unwrap().visible = false;

    let resolver = PickingResolver::new(1.0);
    assert_eq!(resolver.pick_ray(&scene, None, &down_ray()), Some(far));
}

#[test]
fn hit_without_solid_ancestor_is_unpickable() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("loose"));
    scene.add_to_parent(Node::new("face").with_primitive(square(0.0, 1.0)), root);

    let resolver = PickingResolver::new(1.0);
    assert_eq!(picking::intersect_scene(&scene, None, &down_ray(), 1.0).len(), 1);
    assert_eq!(resolver.pick_ray(&scene, None, &down_ray()), None);
}

#[test]
fn miss_picks_nothing() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("SOLIDS"));
    add_solid(&mut scene, root, "box", square(0.0, 1.0));

    let resolver = PickingResolver::new(1.0);
    let aside = Ray::new(Vec3::new(30.0, 0.0, 100.0), Vec3::NEG_Z);
    assert_eq!(resolver.pick_ray(&scene, None, &aside), None);
}

#[test]
fn search_root_limits_the_cast() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A"));
    let b = scene.add_node(Node::new("B"));
    add_solid(&mut scene, a, "in_a", square(0.0, 1.0));
    let (in_b, _) = add_solid(&mut scene, b, "in_b", square(-10.0, 1.0));

    let resolver = PickingResolver::new(1.0);
    assert_eq!(resolver.pick_ray(&scene, Some(b), &down_ray()), Some(in_b));
}

// ============================================================================
// Screen Mapping
// ============================================================================

#[test]
fn centre_click_picks_solid_in_front_of_camera() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("SOLIDS"));
    let (solid, _) = add_solid(&mut scene, root, "box", square(0.0, 5.0));

    let camera = Camera::new_perspective(35.0, 800.0 / 600.0, 1.0, 10_000.0);
    let rect = SurfaceRect::new(100.0, 50.0, 800.0, 600.0);
    let event = PointerEvent::new(PointerEventKind::Click, 500.0, 350.0, 0);

    let resolver = PickingResolver::new(1.0);
    assert_eq!(resolver.pick_event(&scene, &camera, None, &event, &rect), Some(solid));

    let corner = PointerEvent::new(PointerEventKind::Click, 100.0, 50.0, 0);
    assert_eq!(resolver.pick_event(&scene, &camera, None, &corner, &rect), None);
}

#[test]
fn off_centre_ray_tilts_towards_pointer() {
    let camera = Camera::new_perspective(35.0, 1.0, 1.0, 10_000.0);
    let ray = picking::ray_from_ndc(&camera, Vec2::new(0.5, -0.5));
    assert!(ray.direction.x > 0.0);
    assert!(ray.direction.y < 0.0);
    assert!(ray.direction.z < 0.0);
}
