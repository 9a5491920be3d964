use glam::{Affine3A, Vec3};

/// Axis-aligned bounding box.
///
/// The empty box (`min = +inf`, `max = -inf`) stands for "no content yet" and
/// is the identity of [`union`](Self::union).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box around all `points`; empty for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |b, &p| b.expand_by_point(p))
    }

    /// `true` when any axis has `max < min`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Midpoint of the box. Meaningless for an empty box; check
    /// [`is_empty`](Self::is_empty) first.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis, zero for an empty box.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Radius of the sphere through the box corners.
    #[inline]
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        self.size().length() * 0.5
    }

    #[must_use]
    pub fn expand_by_point(&self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box around the eight transformed corners. An empty box stays empty.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        if self.is_empty() {
            return Self::EMPTY;
        }

        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        corners
            .into_iter()
            .fold(Self::EMPTY, |b, c| b.expand_by_point(matrix.transform_point3(c)))
    }

    /// Uniform growth by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f32) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn union_with_empty_is_identity() {
        let b = BoundingBox::new(Vec3::splat(-1.0), Vec3::ONE);
        assert_eq!(b.union(&BoundingBox::EMPTY), b);
        assert_eq!(BoundingBox::EMPTY.union(&b), b);
        assert!(BoundingBox::EMPTY.union(&BoundingBox::EMPTY).is_empty());
    }

    #[test]
    fn empty_box_has_zero_size() {
        assert_eq!(BoundingBox::EMPTY.size(), Vec3::ZERO);
        assert!(BoundingBox::from_points(&[]).is_empty());
    }

    #[test]
    fn single_point_is_not_empty() {
        let b = BoundingBox::from_points(&[Vec3::new(1.0, 2.0, 3.0)]);
        assert!(!b.is_empty());
        assert_eq!(b.size(), Vec3::ZERO);
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn transform_rotated_box_grows() {
        let b = BoundingBox::new(Vec3::splat(-1.0), Vec3::ONE);
        let m = Affine3A::from_rotation_translation(
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_4),
            Vec3::new(10.0, 0.0, 0.0),
        );
        let t = b.transform(&m);
        let s = std::f32::consts::SQRT_2;
        assert!((t.max.x - (10.0 + s)).abs() < 1e-5);
        assert!((t.min.y + s).abs() < 1e-5);
        assert!((t.max.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn transform_keeps_empty() {
        let m = Affine3A::from_scale(Vec3::ZERO);
        assert!(BoundingBox::EMPTY.transform(&m).is_empty());
    }
}
