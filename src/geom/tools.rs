//! Stateless geometry helpers over a scene subtree.
//!
//! World matrices are recomputed from the live local transforms on every call.
//! Nothing is cached, so a node moved since the last frame is measured where
//! it is now.

use glam::{Affine3A, Vec3};

use crate::geom::BoundingBox;
use crate::scene::primitive::Primitive;
use crate::scene::{NodeHandle, Scene};

/// Deepest hierarchy the traversals will descend into.
pub const MAX_TRAVERSAL_DEPTH: usize = 1024;

/// Most grid steps [`make_grid`] lays out; finer spacing is widened.
pub const MAX_GRID_STEPS: usize = 10_000;

/// Line segment pairs of the selection box, indexing [`gizmo_corners`].
pub const GIZMO_BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (0, 2),
    (0, 5),
    (1, 3),
    (1, 4),
    (2, 3),
    (2, 7),
    (3, 6),
    (4, 5),
    (4, 6),
    (5, 7),
    (6, 7),
];

/// World-space bounding box of `node`.
///
/// A node holding a primitive is a leaf: its local box is transformed into
/// world space. Any other node yields the union of its children's boxes, which
/// is empty for a childless group or a missing handle.
#[must_use]
pub fn bounding_box(scene: &Scene, node: NodeHandle) -> BoundingBox {
    let Some(world) = scene.compute_world_matrix(node) else {
        return BoundingBox::EMPTY;
    };
    subtree_box(scene, node, world)
}

/// Bounding box of `node`'s subtree expressed in `node`'s own coordinate
/// frame. This is what a gizmo carried by the node's world matrix encloses.
#[must_use]
pub fn bounding_box_local(scene: &Scene, node: NodeHandle) -> BoundingBox {
    subtree_box(scene, node, Affine3A::IDENTITY)
}

/// Center of [`bounding_box`]; `None` when the box is empty.
#[must_use]
pub fn center_of_gravity(scene: &Scene, node: NodeHandle) -> Option<Vec3> {
    let bbox = bounding_box(scene, node);
    (!bbox.is_empty()).then(|| bbox.center())
}

fn subtree_box(scene: &Scene, root: NodeHandle, root_frame: Affine3A) -> BoundingBox {
    let mut bbox = BoundingBox::EMPTY;
    let mut stack: Vec<(NodeHandle, Affine3A, usize)> = vec![(root, root_frame, 0)];

    while let Some((handle, frame, depth)) = stack.pop() {
        let Some(node) = scene.get_node(handle) else {
            continue;
        };

        if let Some(primitive) = &node.primitive {
            bbox = bbox.union(&primitive.local_bounding_box().transform(&frame));
            continue;
        }

        if depth >= MAX_TRAVERSAL_DEPTH {
            log::warn!("Bounding box traversal truncated below depth {MAX_TRAVERSAL_DEPTH}");
            continue;
        }

        for &child in node.children() {
            if let Some(child_node) = scene.get_node(child) {
                let child_frame = frame * child_node.transform.compute_local_matrix();
                stack.push((child, child_frame, depth + 1));
            }
        }
    }

    bbox
}

/// The eight corners of `bbox` in gizmo vertex order.
///
/// Order: (max,max,max) (max,max,min) (max,min,max) (max,min,min)
/// (min,max,min) (min,max,max) (min,min,min) (min,min,max).
/// [`GIZMO_BOX_EDGES`] depends on it.
#[must_use]
pub fn gizmo_corners(bbox: &BoundingBox) -> [Vec3; 8] {
    let (min, max) = (bbox.min, bbox.max);
    [
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(min.x, min.y, max.z),
    ]
}

/// Wireframe box through `corners`, as line segments.
#[must_use]
pub fn gizmo_box_lines(corners: &[Vec3; 8], color: u32) -> Primitive {
    let positions: Vec<Vec3> = GIZMO_BOX_EDGES
        .iter()
        .flat_map(|&(a, b)| [corners[a], corners[b]])
        .collect();
    let colors = vec![color; positions.len()];
    Primitive::LineSegments { positions, colors }
}

/// Ground grid in the XY plane: for every step from `-size` to `size`, one
/// line parallel to X and one parallel to Y. The two lines through the origin
/// use `center_color`.
///
/// A step so small that the grid would need more than [`MAX_GRID_STEPS`]
/// lines per axis is widened to fit that many across the full extent.
#[must_use]
pub fn make_grid(size: f32, step: f32, center_color: u32, color: u32) -> Primitive {
    if !size.is_finite() || step.is_nan() || size <= 0.0 || step <= 0.0 {
        return Primitive::LineSegments {
            positions: Vec::new(),
            colors: Vec::new(),
        };
    }

    let mut step = step;
    let mut steps = (2.0 * size / step + 1e-4).floor();
    if steps > MAX_GRID_STEPS as f32 {
        log::warn!("Grid step {step} over size {size} needs {steps} lines; capping at {MAX_GRID_STEPS}");
        steps = MAX_GRID_STEPS as f32;
        step = 2.0 * size / steps;
    }
    let steps = steps as usize;
    let mut positions = Vec::with_capacity((steps + 1) * 4);
    let mut colors = Vec::with_capacity((steps + 1) * 4);

    for k in 0..=steps {
        let i = -size + k as f32 * step;

        positions.push(Vec3::new(-size, i, 0.0));
        positions.push(Vec3::new(size, i, 0.0));
        positions.push(Vec3::new(i, -size, 0.0));
        positions.push(Vec3::new(i, size, 0.0));

        let c = if i.abs() < step * 1e-3 { center_color } else { color };
        colors.extend([c, c, c, c]);
    }

    Primitive::LineSegments { positions, colors }
}

/// World axis helper: red X, green Y, blue Z, each `length` long.
#[must_use]
pub fn make_axes(length: f32) -> Primitive {
    Primitive::LineSegments {
        positions: vec![
            Vec3::ZERO,
            Vec3::X * length,
            Vec3::ZERO,
            Vec3::Y * length,
            Vec3::ZERO,
            Vec3::Z * length,
        ],
        colors: vec![0x00ff_0000, 0x00ff_0000, 0x0000_ff00, 0x0000_ff00, 0x0000_00ff, 0x0000_00ff],
    }
}
