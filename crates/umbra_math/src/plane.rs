//! Infinite plane primitive.

use crate::{Hittable, Intersection, Ray, Vec3, EPSILON};

/// An infinite plane through `position` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Create a new plane. The normal is stored as given.
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

impl Hittable for Plane {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (self.position - ray.origin).dot(self.normal) / denom;
        if t <= 0.0 {
            return None;
        }

        Some(Intersection {
            t,
            point: ray.at(t),
            normal: self.normal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit() {
        let floor = Plane::new(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(1.0, 5.0, 2.0), Vec3::new(0.0, -1.0, 0.0));

        let hit = floor.intersect(&ray).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-6);
        assert_eq!(hit.point, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_plane_parallel() {
        let floor = Plane::new(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);

        assert!(floor.intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_behind() {
        let floor = Plane::new(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);

        assert!(floor.intersect(&ray).is_none());
    }
}
