//! Progressive frame rendering.
//!
//! Pixels are estimated row by row and handed to a [`FrameSink`] as soon as
//! they are done. The sink is asked to present every few rows and may cancel
//! the render between rows.

use std::time::{Duration, Instant};

use thiserror::Error;
use umbra_math::{CameraError, PinholeProjection, Vec2, Vec3};

use crate::{Color, ConfigError, PathTracer, RenderConfig, Sampler, Scene};

/// Errors that prevent a render from starting.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Destination for rendered pixels.
///
/// Colors arrive unclamped; mapping them to a displayable range is up to the
/// sink.
pub trait FrameSink {
    /// Store the color of pixel `(x, y)`, with row 0 at the top.
    fn write_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Show everything written so far.
    fn present_frame(&mut self);

    /// Polled between rows (or bucket waves). Returning `true` ends the
    /// render early.
    fn should_stop(&self) -> bool {
        false
    }
}

/// Summary of a finished (or cancelled) render.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderStats {
    /// Full rows written by the sequential renderer
    pub rows_completed: u32,
    /// Buckets written by the tiled renderer
    pub buckets_completed: usize,
    pub pixels_written: u64,
    /// The sink asked to stop before the frame was complete
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// In-memory frame of raw radiance.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
    /// Number of `present_frame` calls received
    pub frames_presented: u32,
}

impl ImageBuffer {
    /// Create a new image buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
            frames_presented: 0,
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }
}

impl FrameSink for ImageBuffer {
    /// Writes outside the buffer are ignored.
    fn write_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.set(x, y, color);
        }
    }

    fn present_frame(&mut self) {
        self.frames_presented += 1;
    }
}

/// Map a pixel and sub-pixel jitter to image-plane coordinates.
///
/// `u` grows to the right and `v` grows upwards, so row 0 lands at the top
/// of the image plane. Jitter in `[0, 1)` keeps both coordinates in `[0, 1)`.
#[inline]
pub fn pixel_uv(x: u32, y: u32, jitter: Vec2, width: u32, height: u32) -> Vec2 {
    let row_from_bottom = height.saturating_sub(y + 1);
    Vec2::new(
        (x as f32 + jitter.x) / width as f32,
        (row_from_bottom as f32 + jitter.y) / height as f32,
    )
}

/// Estimate one pixel with jittered multi-sampling.
///
/// If every sample escapes, the background is returned exactly. Otherwise
/// escaped samples contribute the background in proportion to how many
/// there were.
pub fn render_pixel(
    tracer: &PathTracer<'_>,
    projection: &PinholeProjection,
    x: u32,
    y: u32,
    sampler: &mut Sampler,
) -> Color {
    let config = tracer.config();
    let background = tracer.scene().background();

    let mut sum = Vec3::ZERO;
    let mut hits = 0u32;
    for _ in 0..config.samples_per_pixel {
        let uv = pixel_uv(x, y, sampler.sample2(), config.width, config.height);
        let ray = projection.ray(uv);
        if let Some(radiance) = tracer.radiance(&ray, sampler) {
            sum += radiance;
            hits += 1;
        }
    }

    if hits == 0 {
        return background;
    }

    let n = config.samples_per_pixel as f32;
    let misses = (config.samples_per_pixel - hits) as f32;
    let rgb = sum / n + background.truncate() * (misses / n);
    let alpha = (hits as f32 + background.w * misses) / n;
    rgb.extend(alpha)
}

/// Render the whole frame sequentially, row by row.
///
/// The sink presents every `present_interval` rows and once more at the end,
/// including after a cancellation.
pub fn render(
    scene: &Scene,
    config: &RenderConfig,
    sampler: &mut Sampler,
    sink: &mut dyn FrameSink,
) -> RenderResult<RenderStats> {
    config.validate()?;
    let projection = scene.camera().projection()?;
    warn_on_aspect_mismatch(scene, config);

    let tracer = PathTracer::new(scene, config);
    let start = Instant::now();
    let mut stats = RenderStats::default();

    log::info!(
        "Rendering {}x{} @ {} spp ({} light samples, {} bounces max)",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.light_samples,
        config.max_bounces
    );

    for y in 0..config.height {
        if sink.should_stop() {
            stats.cancelled = true;
            log::info!("Render cancelled after {} rows", stats.rows_completed);
            break;
        }

        for x in 0..config.width {
            let color = render_pixel(&tracer, &projection, x, y, sampler);
            sink.write_pixel(x, y, color);
        }
        stats.rows_completed += 1;
        stats.pixels_written += config.width as u64;

        if stats.rows_completed % config.present_interval == 0 {
            sink.present_frame();
            log::debug!("Presented {}/{} rows", stats.rows_completed, config.height);
        }
    }

    sink.present_frame();
    stats.elapsed = start.elapsed();

    log::info!(
        "Rendered {} pixels in {:.2}s",
        stats.pixels_written,
        stats.elapsed.as_secs_f32()
    );

    Ok(stats)
}

/// Rays are still generated for the camera's aspect, so the image stretches.
pub(crate) fn warn_on_aspect_mismatch(scene: &Scene, config: &RenderConfig) {
    let camera_aspect = scene.camera().aspect_ratio;
    if (camera_aspect - config.aspect_ratio()).abs() > 1e-3 {
        log::warn!(
            "Camera aspect ratio {:.4} does not match raster {}x{} ({:.4})",
            camera_aspect,
            config.width,
            config.height,
            config.aspect_ratio()
        );
    }
}
