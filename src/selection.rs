//! Selection state.
//!
//! At most one logical solid is selected at a time. The selection gizmo is a
//! wireframe box around the selected subtree plus an axis helper, expressed in
//! the selected node's own frame and carried by its world matrix, so it moves
//! rigidly with the node.

use glam::{Affine3A, Vec3};

use crate::geom::{self, BoundingBox};
use crate::scene::{NodeHandle, Scene};

/// Outcome of [`SelectionState::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Same node as before; nothing happened.
    Unchanged,
    /// A node is now selected.
    Selected(NodeHandle),
    /// The selection is empty. Reported even when it already was.
    Cleared,
}

impl SelectionChange {
    /// Whether the frame has to be redrawn.
    #[inline]
    #[must_use]
    pub fn needs_redraw(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Layout of the selection box.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionGizmo {
    /// Box corners in the anchor's local frame, in gizmo order.
    pub corners: [Vec3; 8],
    /// Local box the corners were laid out from.
    pub local_box: BoundingBox,
    /// Node whose world matrix carries the gizmo.
    pub anchor: Option<NodeHandle>,
    pub visible: bool,
}

impl Default for SelectionGizmo {
    fn default() -> Self {
        Self {
            corners: [Vec3::ZERO; 8],
            local_box: BoundingBox::EMPTY,
            anchor: None,
            visible: false,
        }
    }
}

impl SelectionGizmo {
    /// Current world matrix of the anchor, recomputed from live transforms.
    #[must_use]
    pub fn world_matrix(&self, scene: &Scene) -> Option<Affine3A> {
        self.anchor.and_then(|a| scene.compute_world_matrix(a))
    }

    fn hide(&mut self) {
        self.anchor = None;
        self.visible = false;
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Option<NodeHandle>,
    gizmo: SelectionGizmo,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<NodeHandle> {
        self.selected
    }

    #[inline]
    #[must_use]
    pub fn gizmo(&self) -> &SelectionGizmo {
        &self.gizmo
    }

    /// Selects `node`, or clears the selection for `None`.
    ///
    /// Selecting the node that is already selected is a no-op. A handle that
    /// is no longer in the scene is treated as a clear.
    pub fn select(&mut self, scene: &Scene, node: Option<NodeHandle>) -> SelectionChange {
        let node = node.filter(|&n| {
            let alive = scene.contains(n);
            if !alive {
                log::warn!("Selecting a node that is not in the scene; clearing instead");
            }
            alive
        });

        match node {
            Some(n) if self.selected == Some(n) => SelectionChange::Unchanged,
            Some(n) => {
                self.selected = Some(n);
                self.layout_gizmo(scene, n);
                log::debug!("Selected '{}'", scene.get_name(n).unwrap_or_default());
                SelectionChange::Selected(n)
            }
            None => {
                if self.selected.take().is_some() {
                    log::debug!("Selection cleared");
                }
                self.gizmo.hide();
                SelectionChange::Cleared
            }
        }
    }

    fn layout_gizmo(&mut self, scene: &Scene, node: NodeHandle) {
        let local_box = geom::bounding_box_local(scene, node);
        self.gizmo.anchor = Some(node);
        self.gizmo.local_box = local_box;

        if local_box.is_empty() {
            // Nothing to enclose.
            self.gizmo.corners = [Vec3::ZERO; 8];
            self.gizmo.visible = false;
        } else {
            self.gizmo.corners = geom::gizmo_corners(&local_box);
            self.gizmo.visible = true;
        }
    }

    /// Re-lays out the gizmo after the selected subtree changed shape.
    pub fn refresh(&mut self, scene: &Scene) {
        if let Some(n) = self.selected {
            self.layout_gizmo(scene, n);
        }
    }

    /// Clears the selection if its node was removed from the scene. Returns
    /// whether anything changed.
    pub fn forget_removed(&mut self, scene: &Scene) -> bool {
        match self.selected {
            Some(n) if !scene.contains(n) => {
                self.selected = None;
                self.gizmo.hide();
                log::debug!("Selected node was removed; selection cleared");
                true
            }
            _ => false,
        }
    }
}
