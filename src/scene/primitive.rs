use glam::Vec3;

use crate::geom::BoundingBox;

/// Leaf geometry attached to a node, in the node's local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Indexed triangle list.
    Mesh { positions: Vec<Vec3>, indices: Vec<u32> },
    /// Connected line strip through `points`.
    Polyline { points: Vec<Vec3> },
    /// Disjoint segments `(positions[2i], positions[2i + 1])` with optional
    /// per-vertex colours (0xRRGGBB).
    LineSegments { positions: Vec<Vec3>, colors: Vec<u32> },
}

impl Primitive {
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        match self {
            Self::Mesh { positions, .. } | Self::LineSegments { positions, .. } => positions,
            Self::Polyline { points } => points,
        }
    }

    /// Box around every vertex; empty when there are none.
    #[must_use]
    pub fn local_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions())
    }

    /// Iterates triangles as vertex triplets. Out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let (positions, indices): (&[Vec3], &[u32]) = match self {
            Self::Mesh { positions, indices } => (positions, indices),
            _ => (&[], &[]),
        };
        indices.chunks_exact(3).filter_map(move |tri| {
            let a = positions.get(tri[0] as usize)?;
            let b = positions.get(tri[1] as usize)?;
            let c = positions.get(tri[2] as usize)?;
            Some([*a, *b, *c])
        })
    }

    /// Iterates line segments: consecutive pairs for a polyline, disjoint
    /// pairs for line segments, nothing for a mesh.
    pub fn segments(&self) -> Box<dyn Iterator<Item = (Vec3, Vec3)> + '_> {
        match self {
            Self::Polyline { points } => Box::new(points.windows(2).map(|w| (w[0], w[1]))),
            Self::LineSegments { positions, .. } => {
                Box::new(positions.chunks_exact(2).map(|w| (w[0], w[1])))
            }
            Self::Mesh { .. } => Box::new(std::iter::empty()),
        }
    }
}
