//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach/detach hierarchy
//! - Node query: names, root_nodes, ancestors, subtree collection
//! - World matrices: cached refresh vs. live recomputation

use glam::Vec3;
use solidview::scene::node::{Node, NodeRole};
use solidview::scene::scene::Scene;

const EPSILON: f32 = 1e-5;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn scene_add_node_to_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("root"));
    assert!(scene.root_nodes.contains(&handle));
    assert_eq!(scene.get_name(handle), Some("root"));
}

#[test]
fn scene_create_node_is_detached() {
    let mut scene = Scene::new();
    let handle = scene.create_node(Node::new("loose"));
    assert!(scene.contains(handle));
    assert!(scene.root_nodes.is_empty());
    assert!(scene.get_node(handle).unwrap().parent().is_none());
}

#[test]
fn scene_add_to_parent_links_both_ways() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("parent"));
    let child = scene.add_to_parent(Node::new("child"), parent);

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), &[child]);
    assert!(!scene.root_nodes.contains(&child));
}

#[test]
fn scene_remove_node_removes_whole_subtree() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let group = scene.add_to_parent(Node::new("group"), root);
    let leaf = scene.add_to_parent(Node::new("leaf"), group);

    scene.remove_node(group);

    assert!(!scene.contains(group));
    assert!(!scene.contains(leaf));
    assert!(scene.get_node(root).unwrap().children().is_empty());
    assert_eq!(scene.len(), 1);
}

#[test]
fn scene_remove_root_node() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("root"));
    scene.remove_node(handle);
    assert!(!scene.root_nodes.contains(&handle));
    assert!(scene.is_empty());
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn scene_attach_moves_node_between_parents() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("a"));
    let b = scene.add_node(Node::new("b"));
    let child = scene.add_to_parent(Node::new("child"), a);

    scene.attach(child, b);

    assert!(scene.get_node(a).unwrap().children().is_empty());
    assert_eq!(scene.get_node(b).unwrap().children(), &[child]);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(b));
}

#[test]
fn scene_attach_root_leaves_root_list() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("a"));
    let b = scene.add_node(Node::new("b"));

    scene.attach(b, a);

    assert_eq!(scene.root_nodes, vec![a]);
}

#[test]
fn scene_attach_refuses_cycles() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let child = scene.add_to_parent(Node::new("child"), root);
    let grandchild = scene.add_to_parent(Node::new("grandchild"), child);

    scene.attach(root, grandchild);
    scene.attach(child, child);

    assert!(scene.get_node(root).unwrap().parent().is_none());
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(root));
    assert!(scene.root_nodes.contains(&root));
}

#[test]
fn scene_ancestors_nearest_first() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let mid = scene.add_to_parent(Node::new("mid"), root);
    let leaf = scene.add_to_parent(Node::new("leaf"), mid);

    let chain: Vec<_> = scene.ancestors(leaf).collect();
    assert_eq!(chain, vec![mid, root]);
    assert!(scene.is_ancestor_of(root, leaf));
    assert!(!scene.is_ancestor_of(leaf, root));
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn scene_find_by_name_searches_depth_first() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let a = scene.add_to_parent(Node::new("a"), root);
    let _b = scene.add_to_parent(Node::new("target"), root);
    let nested = scene.add_to_parent(Node::new("target"), a);

    // The nested node comes first in depth-first pre-order.
    assert_eq!(scene.find_by_name(Some(root), "target"), Some(nested));
    assert_eq!(scene.find_by_name(None, "root"), Some(root));
    assert_eq!(scene.find_by_name(None, "missing"), None);
}

#[test]
fn scene_find_child_by_name_is_shallow() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let a = scene.add_to_parent(Node::new("a"), root);
    scene.add_to_parent(Node::new("deep"), a);

    assert_eq!(scene.find_child_by_name(Some(root), "a"), Some(a));
    assert_eq!(scene.find_child_by_name(Some(root), "deep"), None);
    assert_eq!(scene.find_child_by_name(None, "root"), Some(root));
}

#[test]
fn scene_collect_subtree_preorder() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let a = scene.add_to_parent(Node::new("a"), root);
    let a1 = scene.add_to_parent(Node::new("a1"), a);
    let b = scene.add_to_parent(Node::new("b"), root);

    assert_eq!(scene.collect_subtree(root), vec![root, a, a1, b]);
}

#[test]
fn node_role_marks_solids() {
    let node = Node::new("group");
    assert_eq!(node.role, NodeRole::Group);
    assert!(!node.role.is_solid());
    assert!(node.visible);
}

// ============================================================================
// World Matrices
// ============================================================================

#[test]
fn scene_update_matrix_world_composes_parents() {
    let mut scene = Scene::new();
    let mut parent = Node::new("parent");
    parent.transform.position = Vec3::new(10.0, 0.0, 0.0);
    parent.transform.scale = Vec3::splat(2.0);
    let parent = scene.add_node(parent);

    let mut child = Node::new("child");
    child.transform.position = Vec3::new(1.0, 0.0, 0.0);
    let child = scene.add_to_parent(child, parent);

    scene.update_matrix_world();

    let world = scene.get_node(child).unwrap().world_matrix();
    assert!(approx_vec(Vec3::from(world.translation), Vec3::new(12.0, 0.0, 0.0)));
}

#[test]
fn scene_compute_world_matrix_sees_unflushed_moves() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("parent"));
    let child = scene.add_to_parent(Node::new("child"), parent);
    scene.update_matrix_world();

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(0.0, 5.0, 0.0);

    let cached = scene.get_node(child).unwrap().world_matrix().translation;
    let live = scene.compute_world_matrix(child).unwrap().translation;
    assert!(approx_vec(Vec3::from(cached), Vec3::ZERO));
    assert!(approx_vec(Vec3::from(live), Vec3::new(0.0, 5.0, 0.0)));
}

#[test]
fn scene_attach_refreshes_world_on_next_update() {
    let mut scene = Scene::new();
    let mut a = Node::new("a");
    a.transform.position = Vec3::new(3.0, 0.0, 0.0);
    let a = scene.add_node(a);
    let b = scene.add_node(Node::new("b"));
    scene.update_matrix_world();

    scene.attach(b, a);
    scene.update_matrix_world();

    let world = scene.get_node(b).unwrap().world_matrix().translation;
    assert!(approx_vec(Vec3::from(world), Vec3::new(3.0, 0.0, 0.0)));
}
