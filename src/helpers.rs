//! Helper overlay scene.
//!
//! Grid, world axes and the selection gizmo live in a scene of their own so
//! they never take part in picking, framing or bounding boxes of the model.

use crate::geom::tools::{gizmo_box_lines, make_axes, make_grid};
use crate::scene::{Node, NodeHandle, NodeRole, Scene};
use crate::selection::SelectionGizmo;
use crate::settings::ViewerSettings;

pub struct HelperOverlay {
    pub scene: Scene,
    grid: NodeHandle,
    axes: NodeHandle,
    selection_box: NodeHandle,
    selection_axis: NodeHandle,
    selection_color: u32,
}

impl HelperOverlay {
    #[must_use]
    pub fn new(settings: &ViewerSettings) -> Self {
        let mut scene = Scene::new();

        let mut grid = Node::new("grid")
            .with_role(NodeRole::Helper)
            .with_primitive(make_grid(
                settings.grid_size,
                settings.grid_step,
                settings.grid_center_color,
                settings.grid_color,
            ));
        grid.visible = settings.show_grid;
        let grid = scene.add_node(grid);

        let axes = scene.add_node(
            Node::new("axes")
                .with_role(NodeRole::Helper)
                .with_primitive(make_axes(settings.axis_length)),
        );

        let mut selection_box = Node::new("selection_box")
            .with_role(NodeRole::Helper)
            .with_color(settings.selection_color);
        selection_box.visible = false;
        let selection_box = scene.add_node(selection_box);

        let mut selection_axis = Node::new("selection_axis")
            .with_role(NodeRole::Helper)
            .with_primitive(make_axes(settings.axis_length));
        selection_axis.visible = false;
        let selection_axis = scene.add_node(selection_axis);

        Self {
            scene,
            grid,
            axes,
            selection_box,
            selection_axis,
            selection_color: settings.selection_color,
        }
    }

    #[must_use]
    pub fn grid_visible(&self) -> bool {
        self.scene.get_node(self.grid).is_some_and(|n| n.visible)
    }

    /// Returns whether the visibility changed.
    pub fn set_grid_visible(&mut self, visible: bool) -> bool {
        match self.scene.get_node_mut(self.grid) {
            Some(grid) if grid.visible != visible => {
                grid.visible = visible;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn grid(&self) -> NodeHandle {
        self.grid
    }

    #[must_use]
    pub fn axes(&self) -> NodeHandle {
        self.axes
    }

    #[must_use]
    pub fn selection_box(&self) -> NodeHandle {
        self.selection_box
    }

    #[must_use]
    pub fn selection_axis(&self) -> NodeHandle {
        self.selection_axis
    }

    /// Rebuilds the selection box lines from the gizmo layout.
    pub fn update_selection_shape(&mut self, gizmo: &SelectionGizmo) {
        let color = self.selection_color;
        if let Some(node) = self.scene.get_node_mut(self.selection_box) {
            node.primitive = gizmo.visible.then(|| gizmo_box_lines(&gizmo.corners, color));
        }
    }

    /// Pins both gizmo parts to the anchor's current world matrix, or hides
    /// them when nothing is selected. The matrix is copied whole, so a
    /// sheared frame (non-uniform parent scale under a rotated child) keeps
    /// the box on the geometry.
    pub fn follow_selection(&mut self, gizmo: &SelectionGizmo, content: &Scene) {
        let world = if gizmo.visible { gizmo.world_matrix(content) } else { None };

        for handle in [self.selection_box, self.selection_axis] {
            let Some(node) = self.scene.get_node_mut(handle) else {
                continue;
            };
            node.visible = world.is_some();
            node.transform.set_world_override(world);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;
    use crate::scene::primitive::Primitive;
    use crate::selection::SelectionState;

    #[test]
    fn gizmo_parts_follow_selected_node() {
        let mut overlay = HelperOverlay::new(&ViewerSettings::default());
        let mut content = Scene::new();
        let mut solid = Node::new("solid");
        solid.transform.position = Vec3::new(3.0, 0.0, 0.0);
        let solid = content.add_node(solid.with_primitive(Primitive::Polyline {
            points: vec![Vec3::ZERO, Vec3::ONE],
        }));

        let mut selection = SelectionState::new();
        selection.select(&content, Some(solid));
        overlay.update_selection_shape(selection.gizmo());
        overlay.follow_selection(selection.gizmo(), &content);

        let gizmo_box = overlay.scene.get_node(overlay.selection_box()).unwrap();
        assert!(gizmo_box.visible);
        assert!(gizmo_box.primitive.is_some());
        let pinned = gizmo_box.transform.world_override().unwrap();
        assert_eq!(Vec3::from(pinned.translation), Vec3::new(3.0, 0.0, 0.0));

        selection.select(&content, None);
        overlay.follow_selection(selection.gizmo(), &content);
        assert!(!overlay.scene.get_node(overlay.selection_axis()).unwrap().visible);
    }

    #[test]
    fn gizmo_keeps_sheared_frame_of_rotated_child() {
        let mut overlay = HelperOverlay::new(&ViewerSettings::default());
        let mut content = Scene::new();

        let mut parent = Node::new("stretched");
        parent.transform.scale = Vec3::new(4.0, 1.0, 1.0);
        let parent = content.add_node(parent);

        let mut child = Node::new("edge");
        child.transform.rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
        let child = content.add_to_parent(
            child.with_primitive(Primitive::Polyline {
                points: vec![Vec3::ZERO, Vec3::X],
            }),
            parent,
        );

        let mut selection = SelectionState::new();
        selection.select(&content, Some(child));
        overlay.update_selection_shape(selection.gizmo());
        overlay.follow_selection(selection.gizmo(), &content);
        overlay.scene.update_matrix_world();

        let content_world = content.compute_world_matrix(child).unwrap();
        let gizmo_world = *overlay.scene.get_node(overlay.selection_box()).unwrap().world_matrix();
        for p in [Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)] {
            let expected = content_world.transform_point3(p);
            let actual = gizmo_world.transform_point3(p);
            assert!((expected - actual).length() < 1e-4, "{p}: {actual} != {expected}");
        }
    }

    #[test]
    fn grid_toggle_reports_changes_only() {
        let mut overlay = HelperOverlay::new(&ViewerSettings::default());
        assert!(overlay.grid_visible());
        assert!(!overlay.set_grid_visible(true));
        assert!(overlay.set_grid_visible(false));
        assert!(!overlay.grid_visible());
    }
}
