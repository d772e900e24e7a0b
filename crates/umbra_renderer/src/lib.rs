//! Umbra Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer with next-event estimation and Russian roulette.
//! Radiance is handed unclamped to a [`FrameSink`]; tone mapping is the
//! sink's business.

mod bucket;
mod config;
mod integrator;
mod renderer;
mod sampler;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use config::{BounceSampling, ConfigError, ConfigResult, RenderConfig};
pub use integrator::{Bounce, PathTracer, Radiance};
pub use renderer::{
    pixel_uv, render, render_pixel, FrameSink, ImageBuffer, RenderError, RenderResult, RenderStats,
};
pub use sampler::Sampler;

/// Re-export the scene types the renderer consumes
pub use umbra_core::{Color, Light, Object, Scene};
