//! Intersection record and the `Hittable` trait.

use crate::{Ray, Vec3};

/// Tolerance below which a denominator is treated as zero.
pub const EPSILON: f32 = 1e-8;

/// Record of a ray-primitive intersection.
///
/// Only hits in front of the ray origin (`t > 0`) are ever produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal (geometric, not flipped towards the ray)
    pub normal: Vec3,
}

impl Intersection {
    /// Keep whichever of two optional hits is closer.
    ///
    /// On equal `t` the current hit wins, so earlier candidates are preferred.
    #[inline]
    pub fn nearest(current: Option<Self>, candidate: Option<Self>) -> Option<Self> {
        match (current, candidate) {
            (Some(a), Some(b)) if b.t < a.t => Some(b),
            (None, b) => b,
            (a, _) => a,
        }
    }
}

/// Trait for primitives that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Intersect a ray with this primitive.
    ///
    /// Returns `None` for misses, hits behind the origin, and geometric
    /// degeneracies (parallel rays, zero-size primitives).
    fn intersect(&self, ray: &Ray) -> Option<Intersection>;
}
