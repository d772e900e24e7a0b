// Re-export glam for convenience
pub use glam::*;

// Umbra math types
mod camera;
mod intersection;
mod plane;
mod ray;
mod sphere;
mod triangle;

pub use camera::{Camera, CameraError, PinholeProjection};
pub use intersection::{Hittable, Intersection, EPSILON};
pub use plane::Plane;
pub use ray::Ray;
pub use sphere::Sphere;
pub use triangle::{intersect_mesh, Triangle};
