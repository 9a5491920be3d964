use std::fmt;

use glam::Affine3A;

use crate::scene::NodeHandle;
use crate::scene::primitive::Primitive;
use crate::scene::transform::Transform;

/// Stable identifier of a solid as given by the scene description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(untagged)]
pub enum SolidId {
    Text(String),
    Number(i64),
}

impl fmt::Display for SolidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl Default for SolidId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Metadata carried by a logical solid, the unit that picking selects.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidInfo {
    pub id: SolidId,
    pub name: String,
    /// Display colour as linear RGB in `[0, 1]`.
    pub color: [f32; 3],
}

/// What a node stands for in the viewer.
///
/// The role is fixed when the node is built. Ancestor resolution during
/// picking matches on [`NodeRole::Solid`] instead of probing loose metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeRole {
    /// Plain container (collection roots, the `SOLIDS` root).
    #[default]
    Group,
    /// Logical solid: the pickable unit.
    Solid(SolidInfo),
    /// One tessellated face of a solid.
    Face,
    /// One edge polyline of a solid.
    Edge,
    /// Overlay visual that is not part of the model (grid, axes, gizmo).
    Helper,
}

impl NodeRole {
    #[inline]
    #[must_use]
    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid(_))
    }

    #[inline]
    #[must_use]
    pub fn solid_info(&self) -> Option<&SolidInfo> {
        match self {
            Self::Solid(info) => Some(info),
            _ => None,
        }
    }
}

/// A scene node.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child relationships:
/// - `parent`: handle to the parent node (`None` for root nodes)
/// - `children`: ordered child handles
///
/// # Transform
///
/// The [`Transform`] owns the local TRS and the world matrix cache, which the
/// transform system refreshes top-down before every frame.
#[derive(Debug, Clone)]
pub struct Node {
    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Identity ===
    pub name: String,
    pub role: NodeRole,

    // === Spatial Data ===
    pub transform: Transform,

    // === Content ===
    /// Leaf geometry. A node holding a primitive is treated as a leaf by the
    /// geometry queries.
    pub primitive: Option<Primitive>,
    /// Display colour hint for the renderer (0xRRGGBB).
    pub color: Option<u32>,

    // === State ===
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            name: name.to_string(),
            role: NodeRole::Group,
            transform: Transform::new(),
            primitive: None,
            color: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitive = Some(primitive);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix as of the last hierarchy refresh.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
