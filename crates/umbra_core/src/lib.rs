//! Umbra Core - Scene description for the path tracer.
//!
//! This crate provides:
//!
//! - **Objects**: spheres, triangle meshes and planes with a flat RGBA color
//! - **Lights**: emissive axis-aligned rectangles that can be sampled
//! - **Scene**: a validated, immutable container with a nearest-hit query
//!
//! # Example
//!
//! ```ignore
//! use umbra_core::{Light, Object, Scene};
//! use umbra_math::{Camera, Sphere, Vec3, Vec4};
//!
//! let camera = Camera::new(Vec3::new(0.0, 50.0, 200.0), -Vec3::Z, 0.75);
//! let scene = Scene::builder(camera)
//!     .object(Object::sphere(Sphere::new(Vec3::ZERO, 20.0), Vec4::new(1.0, 0.0, 0.0, 1.0)))
//!     .light(Light::rectangle(
//!         Vec3::new(-25.0, 74.0, -25.0),
//!         Vec3::new(25.0, 74.0, 0.0),
//!         Vec4::ONE,
//!     )?)
//!     .build()?;
//! ```

pub mod object;
pub mod scene;

// Re-export commonly used types
pub use object::{Color, Light, Object, Shape};
pub use scene::{HitEntity, Scene, SceneBuilder, SceneError, SceneHit, SceneResult};
