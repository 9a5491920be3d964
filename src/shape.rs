//! Scene Description Loading
//!
//! Decodes the JSON scene description and turns it into scene nodes.
//!
//! # Payload
//!
//! ```json
//! {
//!   "name": "part-1",
//!   "solids": [{
//!     "id": "S1",
//!     "name": "Box",
//!     "faces": [{ "name": "F1", "mesh": { "vertices": [0,0,0, 1,0,0, 0,1,0], "faces": [0,1,2] } }],
//!     "edges": [{ "name": "E1", "mesh": [0,0,0, 1,0,0] }]
//!   }]
//! }
//! ```
//!
//! Every solid lives under the [`SOLIDS_ROOT_NAME`] group. A named payload
//! replaces the collection of the same name; an unnamed one is appended.

use glam::Vec3;
use serde::Deserialize;

use crate::errors::{Result, ViewerError};
use crate::scene::node::{Node, NodeRole, SolidId, SolidInfo};
use crate::scene::primitive::Primitive;
use crate::scene::{NodeHandle, Scene};

/// Name of the group that owns all loaded solids.
pub const SOLIDS_ROOT_NAME: &str = "SOLIDS";

/// Colour of edge polylines.
pub const EDGE_COLOR: u32 = 0x00ff_ffff;

// ============================================================================
// Payload types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShapePayload {
    /// Collection name. Reloading the same name replaces the collection.
    pub name: Option<String>,
    pub solids: Vec<SolidDesc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SolidDesc {
    pub id: SolidId,
    pub name: String,
    pub faces: Vec<FaceDesc>,
    pub edges: Vec<EdgeDesc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FaceDesc {
    pub name: String,
    pub mesh: FaceMesh,
}

/// Tessellated face: flat `xyz` vertex triplets and triangle index triplets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FaceMesh {
    pub name: Option<String>,
    pub vertices: Vec<f32>,
    pub faces: Vec<u32>,
}

/// Edge polyline as flat `xyz` triplets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EdgeDesc {
    pub name: String,
    pub mesh: Vec<f32>,
}

impl ShapePayload {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every face and edge before anything touches the scene.
    pub fn validate(&self) -> Result<()> {
        for solid in &self.solids {
            for face in &solid.faces {
                face.validate()?;
            }
            for edge in &solid.edges {
                if edge.mesh.len() % 3 != 0 {
                    return Err(ViewerError::InvalidMesh {
                        name: edge.name.clone(),
                        reason: format!("{} coordinates is not a multiple of 3", edge.mesh.len()),
                    });
                }
            }
        }
        Ok(())
    }
}

impl FaceDesc {
    /// Face name, falling back to the mesh's own name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.mesh.name.as_deref().unwrap_or_default()
        } else {
            &self.name
        }
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ViewerError::InvalidMesh {
            name: self.display_name().to_string(),
            reason,
        };

        let mesh = &self.mesh;
        if mesh.vertices.len() % 3 != 0 {
            return Err(invalid(format!(
                "{} vertex coordinates is not a multiple of 3",
                mesh.vertices.len()
            )));
        }
        if mesh.faces.len() % 3 != 0 {
            return Err(invalid(format!(
                "{} indices is not a multiple of 3",
                mesh.faces.len()
            )));
        }
        let vertex_count = mesh.vertices.len() / 3;
        if let Some(&bad) = mesh.faces.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(invalid(format!(
                "index {bad} out of range for {vertex_count} vertices"
            )));
        }
        Ok(())
    }
}

fn triplets(flat: &[f32]) -> Vec<Vec3> {
    flat.chunks_exact(3).map(Vec3::from_slice).collect()
}

/// Packs linear RGB in `[0, 1]` into `0xRRGGBB`.
#[must_use]
pub fn rgb_to_hex(rgb: [f32; 3]) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u32;
    (channel(rgb[0]) << 16) | (channel(rgb[1]) << 8) | channel(rgb[2])
}

// ============================================================================
// Scene assembly
// ============================================================================

/// Returns the `SOLIDS` group, creating it as a root on first use.
pub fn solids_root(scene: &mut Scene) -> NodeHandle {
    match scene.find_child_by_name(None, SOLIDS_ROOT_NAME) {
        Some(handle) => handle,
        None => scene.add_node(Node::new(SOLIDS_ROOT_NAME)),
    }
}

/// The `SOLIDS` group if it exists.
#[must_use]
pub fn find_solids_root(scene: &Scene) -> Option<NodeHandle> {
    scene.find_child_by_name(None, SOLIDS_ROOT_NAME)
}

/// What a load did to the scene.
#[derive(Debug, Clone, Default)]
pub struct ShapeUpdate {
    /// Node the solids were attached to.
    pub collection: Option<NodeHandle>,
    /// Handles of the new solid groups, in payload order.
    pub solids: Vec<NodeHandle>,
    /// Subtree that was replaced, already removed from the scene.
    pub replaced: Option<NodeHandle>,
}

/// Builds the payload into `scene`.
///
/// Nothing is modified when validation fails.
pub fn update_shape_object(scene: &mut Scene, payload: &ShapePayload) -> Result<ShapeUpdate> {
    payload.validate()?;

    let root = solids_root(scene);
    let mut update = ShapeUpdate::default();

    let collection = match payload.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => {
            if let Some(old) = scene.find_child_by_name(Some(root), name) {
                log::debug!("Replacing collection '{name}'");
                scene.remove_node(old);
                update.replaced = Some(old);
            }
            scene.add_to_parent(Node::new(name), root)
        }
        None => root,
    };
    update.collection = Some(collection);

    for solid in &payload.solids {
        update.solids.push(build_solid(scene, collection, solid));
    }

    log::info!(
        "Loaded {} solid(s) into '{}'",
        update.solids.len(),
        scene.get_name(collection).unwrap_or_default()
    );
    Ok(update)
}

fn build_solid(scene: &mut Scene, parent: NodeHandle, desc: &SolidDesc) -> NodeHandle {
    let color = [rand::random::<f32>(), rand::random::<f32>(), rand::random::<f32>()];
    let face_color = rgb_to_hex(color);

    let group = Node::new(&desc.name).with_role(NodeRole::Solid(SolidInfo {
        id: desc.id.clone(),
        name: desc.name.clone(),
        color,
    }));
    let group = scene.add_to_parent(group, parent);

    for face in &desc.faces {
        let primitive = Primitive::Mesh {
            positions: triplets(&face.mesh.vertices),
            indices: face.mesh.faces.clone(),
        };
        let node = Node::new(face.display_name())
            .with_role(NodeRole::Face)
            .with_primitive(primitive)
            .with_color(face_color);
        scene.add_to_parent(node, group);
    }

    for edge in &desc.edges {
        let primitive = Primitive::Polyline {
            points: triplets(&edge.mesh),
        };
        let node = Node::new(&edge.name)
            .with_role(NodeRole::Edge)
            .with_primitive(primitive)
            .with_color(EDGE_COLOR);
        scene.add_to_parent(node, group);
    }

    group
}
