//! PNG output for rendered frames.
//!
//! The renderer emits unclamped radiance. This module maps it into the
//! displayable range, stores it as 8-bit RGBA and writes PNG files, either
//! once at the end or on every presented frame as a progressive preview.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use log::{debug, info, warn};
use umbra_renderer::{Color, FrameSink};

/// Bring a radiance value into `[0, 1]` for display.
///
/// When the brightest RGB channel exceeds one, all three are divided by it
/// so hue is preserved. Absolute values are taken afterwards, so negative
/// estimates show up as their magnitude. Alpha is clamped.
pub fn tone_map(color: Color) -> Color {
    let mut rgb = color.truncate();
    let brightest = rgb.max_element();
    if brightest > 1.0 {
        rgb /= brightest;
    }
    rgb.abs().extend(color.w.clamp(0.0, 1.0))
}

/// Tone map and quantize to 8-bit RGBA.
pub fn to_rgba8(color: Color) -> Rgba<u8> {
    let mapped = tone_map(color);
    let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([
        quantize(mapped.x),
        quantize(mapped.y),
        quantize(mapped.z),
        quantize(mapped.w),
    ])
}

/// Frame sink backed by an 8-bit image that is written as PNG.
pub struct PngSink {
    image: RgbaImage,
    path: PathBuf,
    preview: bool,
    deadline: Option<Instant>,
    frames_presented: u32,
}

impl PngSink {
    /// Create a sink for a `width` × `height` frame saved to `path`.
    pub fn new(width: u32, height: u32, path: impl Into<PathBuf>) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            path: path.into(),
            preview: false,
            deadline: None,
            frames_presented: 0,
        }
    }

    /// Save the partial image on every presented frame.
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Ask the renderer to stop once `limit` has elapsed from now.
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.deadline = limit.map(|limit| Instant::now() + limit);
        self
    }

    pub fn frames_presented(&self) -> u32 {
        self.frames_presented
    }

    /// Write the current image to the output path.
    pub fn save(&self) -> Result<()> {
        self.image
            .save(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!("Image saved as {}", self.path.display());
        Ok(())
    }
}

impl FrameSink for PngSink {
    fn write_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, to_rgba8(color));
        }
    }

    fn present_frame(&mut self) {
        self.frames_presented += 1;
        if !self.preview {
            return;
        }
        match self.image.save(&self.path) {
            Ok(()) => debug!("Preview {} written", self.frames_presented),
            Err(e) => warn!("Failed to write preview: {}", e),
        }
    }

    fn should_stop(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
