use glam::{Mat4, Vec2, Vec3};
use thiserror::Error;

use crate::Ray;

/// Errors for camera parameters that cannot produce a projection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),

    #[error("camera basis is degenerate: forward and up must be non-zero and not parallel")]
    DegenerateBasis,
}

/// Pinhole camera.
///
/// `aspect_ratio` is height / width of the output raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl Camera {
    /// Create a new camera with a 60 degree field of view and +Y up.
    pub fn new(position: Vec3, forward: Vec3, aspect_ratio: f32) -> Self {
        Self {
            fov_degrees: 60.0,
            aspect_ratio,
            position,
            forward,
            up: Vec3::Y,
        }
    }

    /// Set the horizontal field of view in degrees.
    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    /// Set the up vector.
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Set the aspect ratio from a raster size (height / width).
    pub fn with_raster(mut self, width: u32, height: u32) -> Self {
        self.aspect_ratio = height as f32 / width as f32;
        self
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    /// Get the inverse view matrix (camera → world space)
    pub fn camera_to_world(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    /// Extent of the image plane at camera-space depth 1.
    pub fn plane_dimensions(&self) -> Vec2 {
        let x = (2.0 * (self.fov_degrees.to_radians() / 2.0).tan()).abs();
        Vec2::new(x, x * self.aspect_ratio)
    }

    /// Check the preconditions for generating rays.
    pub fn validate(&self) -> Result<(), CameraError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(CameraError::InvalidFov(self.fov_degrees));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(CameraError::InvalidAspectRatio(self.aspect_ratio));
        }
        if !self.position.is_finite() {
            return Err(CameraError::DegenerateBasis);
        }

        let (Some(forward), Some(up)) = (self.forward.try_normalize(), self.up.try_normalize())
        else {
            return Err(CameraError::DegenerateBasis);
        };
        if forward.cross(up).length_squared() < 1e-10 {
            return Err(CameraError::DegenerateBasis);
        }

        Ok(())
    }

    /// Validate the camera and cache what ray generation needs.
    pub fn projection(&self) -> Result<PinholeProjection, CameraError> {
        self.validate()?;
        Ok(PinholeProjection {
            origin: self.position,
            camera_to_world: self.camera_to_world(),
            plane: self.plane_dimensions(),
        })
    }
}

/// Cached camera-to-world transform for a validated [`Camera`].
#[derive(Debug, Clone, Copy)]
pub struct PinholeProjection {
    origin: Vec3,
    camera_to_world: Mat4,
    plane: Vec2,
}

impl PinholeProjection {
    /// Map a normalized image coordinate in `[0,1) × [0,1)` to a world-space ray.
    ///
    /// `(0.5, 0.5)` is the image center; `v` grows upwards.
    pub fn ray(&self, uv: Vec2) -> Ray {
        let camera_point = Vec3::new(
            (uv.x - 0.5) * self.plane.x,
            (uv.y - 0.5) * self.plane.y,
            -1.0,
        );
        let world_point = self.camera_to_world.transform_point3(camera_point);
        Ray::new(self.origin, (world_point - self.origin).normalize_or_zero())
    }
}
