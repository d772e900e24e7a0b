use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// Intersection routines expect `direction` to be unit length. This is not
/// enforced; use [`Ray::between`] when the ray feeds shading math.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a unit-direction ray from `origin` towards `target`.
    ///
    /// Returns `None` when the two points coincide.
    pub fn between(origin: Vec3, target: Vec3) -> Option<Self> {
        let direction = (target - origin).try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Move the origin along the direction by `epsilon`.
    ///
    /// Used for secondary rays so they do not re-hit the surface they leave.
    #[inline]
    pub fn offset(self, epsilon: f32) -> Self {
        Self {
            origin: self.origin + self.direction * epsilon,
            direction: self.direction,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_between() {
        let ray = Ray::between(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0)).unwrap();
        assert_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0));

        // Coincident points have no direction
        assert!(Ray::between(Vec3::ONE, Vec3::ONE).is_none());
    }

    #[test]
    fn test_ray_offset() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y).offset(0.5);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(ray.direction, Vec3::Y);
    }
}
