//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{Hittable, Intersection, Ray, Vec3, EPSILON};

/// A triangle with ordered vertices.
///
/// The winding fixes the face normal: `(p1 - p0) × (p2 - p0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self { p0, p1, p2 }
    }

    /// Unit face normal, or `None` for a degenerate (zero-area) triangle.
    pub fn normal(&self) -> Option<Vec3> {
        (self.p1 - self.p0).cross(self.p2 - self.p0).try_normalize()
    }

    /// Surface area.
    pub fn area(&self) -> f32 {
        0.5 * (self.p1 - self.p0).cross(self.p2 - self.p0).length()
    }

    /// Componentwise minimum and maximum of the vertices.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (
            self.p0.min(self.p1).min(self.p2),
            self.p0.max(self.p1).max(self.p2),
        )
    }
}

impl Hittable for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let e1 = self.p1 - self.p0;
        let e2 = self.p2 - self.p0;
        let s = ray.origin - self.p0;
        let s1 = ray.direction.cross(e2);
        let s2 = s.cross(e1);

        // Ray is parallel to the triangle plane
        let det = s1.dot(e1);
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let t = inv_det * s2.dot(e2);
        let u = inv_det * s1.dot(s);
        let v = inv_det * s2.dot(ray.direction);

        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) || u + v > 1.0 {
            return None;
        }
        if t <= 0.0 {
            return None;
        }

        let point = (1.0 - u - v) * self.p0 + u * self.p1 + v * self.p2;
        let normal = e1.cross(e2).try_normalize()?;
        Some(Intersection { t, point, normal })
    }
}

/// Nearest hit over a list of triangles.
pub fn intersect_mesh(triangles: &[Triangle], ray: &Ray) -> Option<Intersection> {
    triangles
        .iter()
        .fold(None, |nearest, tri| Intersection::nearest(nearest, tri.intersect(ray)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = tri.intersect(&ray).expect("ray should hit triangle");
        assert!((hit.t - 1.0).abs() < 1e-6);
        assert!((hit.point - Vec3::new(0.25, 0.25, 0.0)).length() < 1e-6);
        assert!((hit.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_triangle_normal_is_flat() {
        let tri = unit_triangle();

        // Hitting from behind reports the same fixed orientation
        let ray = Ray::new(Vec3::new(0.1, 0.1, -1.0), Vec3::Z);
        let hit = tri.intersect(&ray).unwrap();
        assert!((hit.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_triangle_miss_outside() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.75, 0.75, 1.0), Vec3::new(0.0, 0.0, -1.0));

        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_triangle_behind_origin() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z);

        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_triangle_parallel_ray() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::X);

        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_degenerate_triangle() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));

        assert!(tri.normal().is_none());
        assert_eq!(tri.area(), 0.0);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_mesh_picks_nearest() {
        let near = Triangle::new(
            Vec3::new(-1.0, -1.0, 2.0),
            Vec3::new(1.0, -1.0, 2.0),
            Vec3::new(0.0, 1.0, 2.0),
        );
        let far = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = intersect_mesh(&[far, near], &ray).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-6);
        assert!(intersect_mesh(&[], &ray).is_none());
    }

    #[test]
    fn test_area_and_bounds() {
        let tri = unit_triangle();
        assert!((tri.area() - 0.5).abs() < 1e-6);

        let (min, max) = tri.bounds();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
    }
}
