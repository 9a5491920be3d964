//! Pointer interaction modes.
//!
//! One [`InteractionMode`] value decides what a pointer event means:
//!
//! | Mode       | Down (primary)                        | Move            | Up     | Click (primary) |
//! |------------|---------------------------------------|-----------------|--------|-----------------|
//! | `Idle`     | on the selected solid: start dragging, else `Picking` | -  | -      | pick + select   |
//! | `Picking`  | -                                     | -               | `Idle` | pick + select   |
//! | `Dragging` | -                                     | move the solid  | `Idle` | -               |
//!
//! Camera controls only run while no drag is in progress.

use glam::{Affine3A, Vec3};

use crate::geom::Ray;
use crate::picking::{self, PickingResolver, PointerEvent, PointerEventKind, SurfaceRect};
use crate::scene::{Camera, NodeHandle, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Primary button is down away from the selection.
    Picking,
    /// The selected solid follows the pointer over a camera-facing plane.
    Dragging {
        node: NodeHandle,
        plane_point: Vec3,
        plane_normal: Vec3,
        /// Grab point minus the node's world position.
        offset: Vec3,
    },
}

/// What the viewer has to apply after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    None,
    /// Selection request from a click; `None` clears.
    Select(Option<NodeHandle>),
    DragStarted(NodeHandle),
    /// The dragged node moved.
    Moved(NodeHandle),
    DragEnded(NodeHandle),
}

/// Borrowed viewer state a pointer event works on.
pub struct PointerContext<'a> {
    pub scene: &'a mut Scene,
    pub camera: &'a Camera,
    pub picking: &'a PickingResolver,
    pub selected: Option<NodeHandle>,
    pub rect: &'a SurfaceRect,
}

impl PointerContext<'_> {
    fn ray(&self, event: &PointerEvent) -> Ray {
        let ndc = picking::frustum_coord(event.client_x, event.client_y, self.rect);
        picking::ray_from_ndc(self.camera, ndc)
    }
}

impl InteractionMode {
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Dispatches one pointer event.
    pub fn handle(&mut self, event: &PointerEvent, ctx: &mut PointerContext<'_>) -> InteractionOutcome {
        match (*self, event.kind) {
            (Self::Idle, PointerEventKind::Down) if event.is_primary() => {
                let ray = ctx.ray(event);
                let picked = ctx.picking.pick_ray(ctx.scene, None, &ray);
                match picked.filter(|&p| Some(p) == ctx.selected) {
                    Some(node) => match start_drag(ctx, node, &ray) {
                        Some(mode) => {
                            *self = mode;
                            InteractionOutcome::DragStarted(node)
                        }
                        None => {
                            *self = Self::Picking;
                            InteractionOutcome::None
                        }
                    },
                    None => {
                        *self = Self::Picking;
                        InteractionOutcome::None
                    }
                }
            }

            (Self::Idle | Self::Picking, PointerEventKind::Click) => {
                *self = Self::Idle;
                if !event.is_primary() {
                    return InteractionOutcome::None;
                }
                let ray = ctx.ray(event);
                InteractionOutcome::Select(ctx.picking.pick_ray(ctx.scene, None, &ray))
            }

            (Self::Picking, PointerEventKind::Up) => {
                *self = Self::Idle;
                InteractionOutcome::None
            }

            (
                Self::Dragging {
                    node,
                    plane_point,
                    plane_normal,
                    offset,
                },
                PointerEventKind::Move,
            ) => {
                let ray = ctx.ray(event);
                let Some(t) = ray.intersect_plane(plane_point, plane_normal) else {
                    return InteractionOutcome::None;
                };
                if move_node_to(ctx.scene, node, ray.point_at(t) - offset) {
                    InteractionOutcome::Moved(node)
                } else {
                    InteractionOutcome::None
                }
            }

            (Self::Dragging { node, .. }, PointerEventKind::Up) => {
                *self = Self::Idle;
                InteractionOutcome::DragEnded(node)
            }

            _ => InteractionOutcome::None,
        }
    }
}

fn start_drag(ctx: &PointerContext<'_>, node: NodeHandle, ray: &Ray) -> Option<InteractionMode> {
    let world = ctx.scene.compute_world_matrix(node)?;
    let plane_point = Vec3::from(world.translation);
    let plane_normal = (ctx.camera.position() - plane_point).try_normalize()?;

    let t = ray.intersect_plane(plane_point, plane_normal)?;
    let offset = ray.point_at(t) - plane_point;

    log::debug!("Drag start on '{}'", ctx.scene.get_name(node).unwrap_or_default());
    Some(InteractionMode::Dragging {
        node,
        plane_point,
        plane_normal,
        offset,
    })
}

/// Places `node` so its origin lands on `world_position`.
fn move_node_to(scene: &mut Scene, node: NodeHandle, world_position: Vec3) -> bool {
    let parent_world = match scene.get_node(node).and_then(|n| n.parent()) {
        Some(parent) => match scene.compute_world_matrix(parent) {
            Some(m) => m,
            None => return false,
        },
        None => Affine3A::IDENTITY,
    };

    if parent_world.matrix3.determinant().abs() < f32::EPSILON {
        return false;
    }
    let local = parent_world.inverse().transform_point3(world_position);

    match scene.get_node_mut(node) {
        Some(n) => {
            n.transform.position = local;
            true
        }
        None => false,
    }
}
