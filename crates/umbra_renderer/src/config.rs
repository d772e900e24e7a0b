//! Render settings.
//!
//! Every field has a default, so a JSON file only needs the keys it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::DEFAULT_BUCKET_SIZE;

/// Errors that can occur while loading or checking a [`RenderConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// How indirect bounce directions are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceSampling {
    /// Uniform spherical coordinates over the whole sphere. Directions below
    /// the surface are kept and weighted by a negative cosine.
    #[default]
    UniformSphere,
    /// Same draw, flipped into the hemisphere of the surface normal.
    Hemisphere,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output raster width in pixels
    pub width: u32,
    /// Output raster height in pixels
    pub height: u32,
    /// Primary rays per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Light samples per shading point (next-event estimation)
    pub light_samples: u32,
    /// Maximum number of indirect bounces
    pub max_bounces: u32,
    /// Russian-roulette survival probability, in (0, 1]
    pub continuation_probability: f32,
    /// Offset along secondary rays to avoid self-intersection
    pub ray_epsilon: f32,
    /// Squared distances are divided by this before the inverse-square falloff
    pub distance_normalization: f32,
    /// Direction sampling for indirect bounces
    pub bounce_sampling: BounceSampling,
    /// Present the frame after this many rows
    pub present_interval: u32,
    /// Tile size for the parallel renderer
    pub bucket_size: u32,
    /// Fixed sampler seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            samples_per_pixel: 8,
            light_samples: 5,
            max_bounces: 5,
            continuation_probability: 0.9,
            ray_epsilon: 0.01,
            distance_normalization: 25.0,
            bounce_sampling: BounceSampling::UniformSphere,
            present_interval: 4,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Aspect ratio (height / width) of the configured raster.
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                message: message.into(),
            }
        }

        if self.width == 0 || self.height == 0 {
            return Err(invalid("width/height", "raster must have at least one pixel"));
        }
        if self.samples_per_pixel == 0 {
            return Err(invalid("samples_per_pixel", "must be at least 1"));
        }
        if !(self.continuation_probability > 0.0 && self.continuation_probability <= 1.0) {
            return Err(invalid(
                "continuation_probability",
                format!("must be in (0, 1], got {}", self.continuation_probability),
            ));
        }
        if !(self.ray_epsilon.is_finite() && self.ray_epsilon > 0.0) {
            return Err(invalid("ray_epsilon", "must be positive"));
        }
        if !(self.distance_normalization.is_finite() && self.distance_normalization > 0.0) {
            return Err(invalid("distance_normalization", "must be positive"));
        }
        if self.present_interval == 0 {
            return Err(invalid("present_interval", "must be at least 1"));
        }
        if self.bucket_size == 0 {
            return Err(invalid("bucket_size", "must be at least 1"));
        }
        Ok(())
    }
}
