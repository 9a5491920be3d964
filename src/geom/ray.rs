use glam::{Affine3A, Vec3};

use super::BoundingBox;

const EPSILON: f32 = 1e-6;

/// A ray defined by an origin and a unit direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Always normalized.
    pub direction: Vec3,
}

/// Closest approach between a ray and a line segment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentApproach {
    /// Squared distance between the two closest points.
    pub distance_sq: f32,
    /// Closest point on the ray.
    pub on_ray: Vec3,
    /// Closest point on the segment.
    pub on_segment: Vec3,
}

impl Ray {
    /// Creates a ray; `direction` is normalized here.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point `origin + t * direction`.
    #[inline]
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transforms origin as a point and direction as a vector.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        Self::new(
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }

    /// Möller–Trumbore, double sided. Returns the ray parameter of the hit,
    /// or `None` for a miss, a parallel ray, or a hit behind the origin.
    #[must_use]
    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = self.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = self.origin - v0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }

    /// Slab test. Returns the entry parameter, or `0.0` when the origin is
    /// inside the box.
    #[must_use]
    pub fn intersect_box(&self, bounds: &BoundingBox) -> Option<f32> {
        if bounds.is_empty() {
            return None;
        }

        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

            if dir.abs() < EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
            } else {
                let inv_dir = 1.0 / dir;
                let mut t1 = (lo - origin) * inv_dir;
                let mut t2 = (hi - origin) * inv_dir;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                tmin = tmin.max(t1);
                tmax = tmax.min(t2);
                if tmin > tmax {
                    return None;
                }
            }
        }

        if tmin >= 0.0 {
            Some(tmin)
        } else if tmax >= 0.0 {
            Some(0.0)
        } else {
            None
        }
    }

    /// Intersection with the plane through `point` with `normal`. `None` when
    /// the ray is parallel to the plane or the plane is behind the origin.
    #[must_use]
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
        let denom = normal.dot(self.direction);
        if denom.abs() < EPSILON {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Closest approach to the segment `a..b`, with the ray parameter clamped
    /// to `t >= 0`.
    #[must_use]
    pub fn approach_segment(&self, a: Vec3, b: Vec3) -> SegmentApproach {
        let seg = b - a;
        let seg_len_sq = seg.length_squared();
        let w = self.origin - a;

        // Degenerate segment: distance to a point.
        if seg_len_sq < EPSILON * EPSILON {
            let t = (-w.dot(self.direction)).max(0.0);
            let on_ray = self.point_at(t);
            return SegmentApproach {
                distance_sq: on_ray.distance_squared(a),
                on_ray,
                on_segment: a,
            };
        }

        let b_dot = self.direction.dot(seg);
        let d = self.direction.dot(w);
        let e = seg.dot(w);
        let denom = seg_len_sq - b_dot * b_dot;

        // Parameter along the segment, in [0, 1].
        let mut s = if denom.abs() > EPSILON {
            ((e - b_dot * d) / denom).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut t = b_dot * s - d;
        if t < 0.0 {
            t = 0.0;
            s = (e / seg_len_sq).clamp(0.0, 1.0);
        }

        let on_ray = self.point_at(t);
        let on_segment = a + seg * s;

        SegmentApproach {
            distance_sq: on_ray.distance_squared(on_segment),
            on_ray,
            on_segment,
        }
    }
}
