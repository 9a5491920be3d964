//! Transform System
//!
//! Refreshes world matrices top-down over the scene hierarchy. It borrows only
//! the node map and the root list, never the whole [`Scene`](super::Scene).
//!
//! Two flavours exist:
//! - [`update_hierarchy_iterative`] writes the dirty-checked cache on every
//!   node; it runs once per frame before drawing.
//! - [`world_matrix_of`] recomputes a single node's world matrix from the
//!   current TRS values of its ancestors, without touching any cache. The
//!   geometry queries use it so that they never observe a stale frame.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Refreshes the world matrix of every node reachable from `roots`.
///
/// Uses an explicit stack instead of recursion so deep hierarchies cannot
/// overflow the call stack.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if let Some(&pinned) = node.transform.world_override() {
            node.transform.set_world_matrix(pinned);
        } else if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;

        // Reverse order keeps children processed first-to-last.
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}

/// Refreshes the subtree rooted at `root_handle`, taking the parent's cached
/// world matrix as the starting frame.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root_handle: NodeHandle) {
    let Some(node) = nodes.get(root_handle) else {
        return;
    };
    let parent_world = node
        .parent
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    let mut stack = vec![(root_handle, parent_world)];
    while let Some((handle, parent_world)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };
        node.transform.update_local_matrix();
        let world = match node.transform.world_override() {
            Some(&pinned) => pinned,
            None => parent_world * *node.transform.local_matrix(),
        };
        node.transform.set_world_matrix(world);
        for &child in node.children.iter().rev() {
            stack.push((child, world));
        }
    }
}

/// Computes a node's world matrix from the live TRS values along its parent
/// chain, stopping at the first pinned world matrix. The walk is bounded by
/// the node count, so a corrupted parent link cannot loop forever.
#[must_use]
pub fn world_matrix_of(nodes: &SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Option<Affine3A> {
    let mut node = nodes.get(handle)?;
    if let Some(&pinned) = node.transform.world_override() {
        return Some(pinned);
    }
    let mut world = node.transform.compute_local_matrix();

    for _ in 0..nodes.len() {
        let Some(parent) = node.parent.and_then(|p| nodes.get(p)) else {
            return Some(world);
        };
        if let Some(&pinned) = parent.transform.world_override() {
            return Some(pinned * world);
        }
        world = parent.transform.compute_local_matrix() * world;
        node = parent;
    }

    log::warn!("Parent chain longer than the node count; the hierarchy contains a cycle");
    Some(world)
}
