//! Scene graph module
//!
//! Manages the node hierarchy and its spatial components:
//! - Node: scene node (parent-child relationship, role and geometry)
//! - Transform: local TRS with a cached world matrix
//! - Scene: node arena plus root list
//! - Camera: perspective camera with an explicit look-at pose
//! - BackgroundSlot: versioned full-screen background layer
//! - TransformSystem: top-down world matrix refresh

pub mod background;
pub mod camera;
pub mod node;
pub mod primitive;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use background::{BackgroundLayer, BackgroundSlot, LoadTicket};
pub use camera::{Camera, CameraPose};
pub use node::{Node, NodeRole, SolidId, SolidInfo};
pub use primitive::Primitive;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of a node inside a [`Scene`] arena.
    pub struct NodeHandle;
}
