//! Picking
//!
//! Turns a pointer position into the logical solid under it.
//!
//! # Pipeline
//!
//! 1. Pointer position to normalized device coordinates ([`frustum_coord`]),
//!    relative to the render surface, Y pointing up.
//! 2. Unproject through the camera into a world-space [`Ray`] starting at the
//!    camera position ([`ray_from_ndc`]).
//! 3. Intersect every primitive of the searched subtree, nearest hit first
//!    ([`intersect_scene`]). Hits record the face or edge node that was
//!    struck, not the solid.
//! 4. Resolve each hit to its [`NodeRole::Solid`] ancestor, drop hits without
//!    one or whose solid is hidden, keep the nearest.
//!
//! [`NodeRole::Solid`]: crate::scene::NodeRole::Solid

use std::cmp::Ordering;

use glam::{Affine3A, Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::geom::Ray;
use crate::scene::{Camera, NodeHandle, Scene};

// ============================================================================
// Pointer boundary
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Move,
    Down,
    Up,
    Click,
}

/// Pointer event in page coordinates, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub client_x: f32,
    pub client_y: f32,
    /// 0 = primary, 1 = middle, 2 = secondary.
    pub button: i16,
}

impl PointerEvent {
    #[must_use]
    pub fn new(kind: PointerEventKind, client_x: f32, client_y: f32, button: i16) -> Self {
        Self {
            kind,
            client_x,
            client_y,
            button,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.button == 0
    }
}

/// On-page bounds of the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Width over height, 1 for a collapsed surface.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Maps a page position into normalized device coordinates of `rect`.
///
/// The top-left corner maps to `(-1, 1)`, the bottom-right to `(1, -1)`. A
/// collapsed surface maps everything to the centre.
#[must_use]
pub fn frustum_coord(client_x: f32, client_y: f32, rect: &SurfaceRect) -> Vec2 {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (client_x - rect.left) / rect.width * 2.0 - 1.0,
        -((client_y - rect.top) / rect.height) * 2.0 + 1.0,
    )
}

/// World-space ray from the camera position through `ndc`.
#[must_use]
pub fn ray_from_ndc(camera: &Camera, ndc: Vec2) -> Ray {
    let through = camera.unproject(ndc.extend(0.5));
    let origin = camera.position();
    let direction = through - origin;
    if direction.length_squared() < f32::EPSILON || !direction.is_finite() {
        // Fall back to the view axis.
        return Ray::new(origin, camera.target() - origin);
    }
    Ray::new(origin, direction)
}

// ============================================================================
// Scene intersection
// ============================================================================

/// One ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Ray parameter of the hit, in world units.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Lowest-level node that was struck.
    pub node: NodeHandle,
}

/// Intersects `ray` with every primitive below `root` (every root node when
/// `None`), sorted nearest first.
///
/// Triangles are tested double-sided. Polylines and line segments count as
/// hit when the ray passes within `line_threshold` world units.
#[must_use]
pub fn intersect_scene(scene: &Scene, root: Option<NodeHandle>, ray: &Ray, line_threshold: f32) -> Vec<HitRecord> {
    let mut stack: Vec<(NodeHandle, Affine3A)> = match root {
        Some(r) => scene
            .compute_world_matrix(r)
            .map(|world| vec![(r, world)])
            .unwrap_or_default(),
        None => scene
            .root_nodes
            .iter()
            .filter_map(|&r| {
                let node = scene.get_node(r)?;
                Some((r, node.transform.compute_local_matrix()))
            })
            .collect(),
    };

    let mut hits = Vec::new();
    let mut visited = 0usize;

    while let Some((handle, world)) = stack.pop() {
        visited += 1;
        if visited > scene.len() {
            log::warn!("Ray cast visited more nodes than the scene holds; stopping");
            break;
        }

        let Some(node) = scene.get_node(handle) else {
            continue;
        };

        if let Some(primitive) = &node.primitive {
            let bounds = primitive
                .local_bounding_box()
                .transform(&world)
                .inflate(line_threshold.max(0.0));

            if ray.intersect_box(&bounds).is_some() {
                for [a, b, c] in primitive.triangles() {
                    let (a, b, c) = (
                        world.transform_point3(a),
                        world.transform_point3(b),
                        world.transform_point3(c),
                    );
                    if let Some(t) = ray.intersect_triangle(a, b, c) {
                        hits.push(HitRecord {
                            distance: t,
                            point: ray.point_at(t),
                            node: handle,
                        });
                    }
                }

                let threshold_sq = line_threshold * line_threshold;
                for (a, b) in primitive.segments() {
                    let approach = ray.approach_segment(world.transform_point3(a), world.transform_point3(b));
                    if approach.distance_sq <= threshold_sq {
                        hits.push(HitRecord {
                            distance: ray.origin.distance(approach.on_ray),
                            point: approach.on_segment,
                            node: handle,
                        });
                    }
                }
            }
        }

        for &child in node.children() {
            if let Some(child_node) = scene.get_node(child) {
                stack.push((child, world * child_node.transform.compute_local_matrix()));
            }
        }
    }

    hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    hits
}

// ============================================================================
// Ancestor resolution
// ============================================================================

/// Nearest node, starting at `node` itself and walking up, whose role is
/// [`Solid`](crate::scene::NodeRole::Solid).
#[must_use]
pub fn find_selectable_ancestor(scene: &Scene, node: NodeHandle) -> Option<NodeHandle> {
    if !scene.contains(node) {
        return None;
    }
    std::iter::once(node)
        .chain(scene.ancestors(node))
        .find(|&h| scene.get_node(h).is_some_and(|n| n.role.is_solid()))
}

/// Resolves pointer positions to logical solids.
#[derive(Debug, Clone)]
pub struct PickingResolver {
    /// Ray-to-edge distance that still counts as a hit.
    pub line_threshold: f32,
}

impl Default for PickingResolver {
    fn default() -> Self {
        Self { line_threshold: 1.0 }
    }
}

impl PickingResolver {
    #[must_use]
    pub fn new(line_threshold: f32) -> Self {
        Self { line_threshold }
    }

    /// Nearest visible solid hit by `ray`, if any.
    #[must_use]
    pub fn pick_ray(&self, scene: &Scene, root: Option<NodeHandle>, ray: &Ray) -> Option<NodeHandle> {
        let hits = intersect_scene(scene, root, ray, self.line_threshold);
        let mut resolved: FxHashMap<NodeHandle, Option<NodeHandle>> = FxHashMap::default();

        let picked = hits.iter().find_map(|hit| {
            let solid = *resolved
                .entry(hit.node)
                .or_insert_with(|| find_selectable_ancestor(scene, hit.node));
            solid.filter(|&s| scene.get_node(s).is_some_and(|n| n.visible))
        });

        log::debug!("Pick: {} hit(s), selected {picked:?}", hits.len());
        picked
    }

    /// Nearest visible solid under the pointer at `ndc`.
    #[must_use]
    pub fn pick(&self, scene: &Scene, camera: &Camera, root: Option<NodeHandle>, ndc: Vec2) -> Option<NodeHandle> {
        let ray = ray_from_ndc(camera, ndc);
        self.pick_ray(scene, root, &ray)
    }

    /// Same as [`pick`](Self::pick), from a page-space pointer event.
    #[must_use]
    pub fn pick_event(
        &self,
        scene: &Scene,
        camera: &Camera,
        root: Option<NodeHandle>,
        event: &PointerEvent,
        rect: &SurfaceRect,
    ) -> Option<NodeHandle> {
        let ndc = frustum_coord(event.client_x, event.client_y, rect);
        self.pick(scene, camera, root, ndc)
    }
}
