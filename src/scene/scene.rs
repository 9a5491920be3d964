use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::transform_system;

/// Scene graph.
///
/// Pure data: a node arena plus the ordered list of root nodes. Geometry
/// queries (bounding boxes, ray casts) live in [`crate::geom`] and
/// [`crate::picking`] and only borrow the scene.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Inserts a detached node that is neither a root nor anyone's child yet.
    pub fn create_node(&mut self, node: Node) -> NodeHandle {
        self.nodes.insert(node)
    }

    /// Adds a node as a new root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let idx = self.nodes.insert(node);
        self.root_nodes.push(idx);
        idx
    }

    /// Adds a node as the last child of `parent_idx`. Falls back to a root
    /// node if the parent does not exist.
    pub fn add_to_parent(&mut self, child: Node, parent_idx: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent_idx) {
            log::warn!("Parent node not found; adding '{}' as a root", child.name);
            return self.add_node(child);
        }

        let idx = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent_idx) {
            p.children.push(idx);
        }
        if let Some(c) = self.nodes.get_mut(idx) {
            c.parent = Some(parent_idx);
        }
        idx
    }

    /// Moves `child_idx` under `parent_idx`, detaching it from its previous
    /// parent (or from the root list). Refuses to create a cycle.
    pub fn attach(&mut self, child_idx: NodeHandle, parent_idx: NodeHandle) {
        if child_idx == parent_idx {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(child_idx) || !self.nodes.contains_key(parent_idx) {
            log::error!("Node not found during attach!");
            return;
        }
        if self.is_ancestor_of(child_idx, parent_idx) {
            log::warn!("Cannot attach a node below one of its own descendants!");
            return;
        }

        self.detach(child_idx);

        if let Some(p) = self.nodes.get_mut(parent_idx) {
            p.children.push(child_idx);
        }
        if let Some(c) = self.nodes.get_mut(child_idx) {
            c.parent = Some(parent_idx);
            c.transform.mark_dirty();
        }
    }

    /// Unlinks a node from its parent or from the root list, leaving it (and
    /// its subtree) in the arena without any owner.
    fn detach(&mut self, idx: NodeHandle) {
        let parent = self.nodes.get(idx).and_then(|n| n.parent);
        if let Some(parent_idx) = parent {
            if let Some(p) = self.nodes.get_mut(parent_idx)
                && let Some(pos) = p.children.iter().position(|&x| x == idx)
            {
                p.children.remove(pos);
            }
        } else if let Some(pos) = self.root_nodes.iter().position(|&x| x == idx) {
            self.root_nodes.remove(pos);
        }
        if let Some(n) = self.nodes.get_mut(idx) {
            n.parent = None;
        }
    }

    /// Removes a node and its whole subtree. The subtree is unlinked first and
    /// then discarded in full.
    pub fn remove_node(&mut self, idx: NodeHandle) {
        if !self.nodes.contains_key(idx) {
            return;
        }
        self.detach(idx);

        let mut stack = vec![idx];
        while let Some(handle) = stack.pop() {
            if let Some(node) = self.nodes.remove(handle) {
                stack.extend(node.children);
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn get_node(&self, idx: NodeHandle) -> Option<&Node> {
        self.nodes.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(idx)
    }

    #[must_use]
    pub fn contains(&self, idx: NodeHandle) -> bool {
        self.nodes.contains_key(idx)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get_name(&self, idx: NodeHandle) -> Option<&str> {
        self.nodes.get(idx).map(|n| n.name.as_str())
    }

    /// Returns `true` when `ancestor` lies on the parent chain of `idx`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: NodeHandle, idx: NodeHandle) -> bool {
        self.ancestors(idx).any(|a| a == ancestor)
    }

    /// Walks the parent chain of `idx`, nearest first, excluding `idx` itself.
    /// The walk stops after as many steps as there are nodes.
    pub fn ancestors(&self, idx: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        let mut current = self.nodes.get(idx).and_then(|n| n.parent);
        let mut budget = self.nodes.len();
        std::iter::from_fn(move || {
            if budget == 0 {
                return None;
            }
            budget -= 1;
            let handle = current?;
            current = self.nodes.get(handle).and_then(|n| n.parent);
            Some(handle)
        })
    }

    /// Depth-first search for the first node named `name`, starting with
    /// `root` itself. Searches every root when `root` is `None`.
    #[must_use]
    pub fn find_by_name(&self, root: Option<NodeHandle>, name: &str) -> Option<NodeHandle> {
        let mut stack: Vec<NodeHandle> = match root {
            Some(r) => vec![r],
            None => self.root_nodes.iter().rev().copied().collect(),
        };

        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if node.name == name {
                return Some(handle);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Finds a direct child of `parent` (or a root node) named `name`.
    #[must_use]
    pub fn find_child_by_name(&self, parent: Option<NodeHandle>, name: &str) -> Option<NodeHandle> {
        let candidates: &[NodeHandle] = match parent {
            Some(p) => self.nodes.get(p).map_or(&[][..], |n| n.children.as_slice()),
            None => &self.root_nodes,
        };
        candidates
            .iter()
            .copied()
            .find(|&c| self.nodes.get(c).is_some_and(|n| n.name == name))
    }

    /// All nodes of the subtree rooted at `root`, in depth-first pre-order.
    #[must_use]
    pub fn collect_subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    // ========================================================================
    // World matrices
    // ========================================================================

    /// Refreshes the cached world matrix of every node. Called once per frame
    /// before drawing.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    /// Refreshes the cached world matrices of one subtree.
    pub fn update_subtree(&mut self, root_idx: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, root_idx);
    }

    /// World matrix recomputed from the current local transforms, independent
    /// of the per-frame cache.
    #[must_use]
    pub fn compute_world_matrix(&self, idx: NodeHandle) -> Option<Affine3A> {
        transform_system::world_matrix_of(&self.nodes, idx)
    }
}
