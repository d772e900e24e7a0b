//! Sphere primitive.

use crate::{Hittable, Intersection, Ray, Vec3, EPSILON};

/// A sphere given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub origin: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(origin: Vec3, radius: f32) -> Self {
        Self { origin, radius }
    }
}

impl Hittable for Sphere {
    /// Solve `a t² + b t + c = 0` for the nearest positive root.
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        if self.radius <= 0.0 {
            return None;
        }

        let oc = ray.origin - self.origin;
        let a = ray.direction.length_squared();
        if a < EPSILON {
            return None;
        }
        let b = 2.0 * ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        let t = if discriminant < 0.0 {
            return None;
        } else if discriminant == 0.0 {
            // Tangent ray
            -b / (2.0 * a)
        } else {
            let sqrtd = discriminant.sqrt();
            let t1 = (-b - sqrtd) / (2.0 * a);
            let t2 = (-b + sqrtd) / (2.0 * a);
            if t1 > 0.0 && t1 < t2 {
                t1
            } else {
                t2
            }
        };

        if t <= 0.0 {
            return None;
        }

        let point = ray.at(t);
        let normal = (point - self.origin).try_normalize()?;
        Some(Intersection { t, point, normal })
    }
}
