//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Each bucket draws from its own sampler
//! stream, so the finished frame does not depend on thread scheduling.

use std::time::Instant;

use rayon::prelude::*;
use umbra_math::PinholeProjection;

use crate::renderer::{render_pixel, warn_on_aspect_mismatch};
use crate::{Color, FrameSink, PathTracer, RenderConfig, RenderResult, RenderStats, Sampler, Scene};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Indices follow render order; they also select the sampler stream
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center, closest first.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable sort keeps row-major order among equidistant buckets
    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render a single bucket to a vector of colors.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    tracer: &PathTracer<'_>,
    projection: &PinholeProjection,
    sampler: &mut Sampler,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            pixels.push(render_pixel(tracer, projection, global_x, global_y, sampler));
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Write every pixel of the bucket to `sink`.
    pub fn write_to(&self, sink: &mut dyn FrameSink) {
        let width = self.bucket.width.max(1);
        for (i, color) in self.pixels.iter().enumerate() {
            let i = i as u32;
            sink.write_pixel(self.bucket.x + i % width, self.bucket.y + i / width, *color);
        }
    }
}

/// Render the frame in parallel, one wave of buckets per rayon thread.
///
/// Bucket `i` samples from stream `i` of the configured seed (a random seed
/// when unset). Between waves the finished buckets are written and
/// presented, and the sink may cancel.
pub fn render_parallel(
    scene: &Scene,
    config: &RenderConfig,
    sink: &mut dyn FrameSink,
) -> RenderResult<RenderStats> {
    config.validate()?;
    let projection = scene.camera().projection()?;
    warn_on_aspect_mismatch(scene, config);

    let seed = config.seed.unwrap_or_else(rand::random);
    let tracer = PathTracer::new(scene, config);
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    let wave_size = rayon::current_num_threads().max(1);

    log::info!(
        "Rendering {}x{} @ {} spp in {} buckets on {} threads (seed {})",
        config.width,
        config.height,
        config.samples_per_pixel,
        buckets.len(),
        wave_size,
        seed
    );

    let start = Instant::now();
    let mut stats = RenderStats::default();

    for wave in buckets.chunks(wave_size) {
        if sink.should_stop() {
            stats.cancelled = true;
            log::info!(
                "Render cancelled after {}/{} buckets",
                stats.buckets_completed,
                buckets.len()
            );
            break;
        }

        let results: Vec<BucketResult> = wave
            .par_iter()
            .map(|bucket| {
                let mut sampler = Sampler::for_stream(seed, bucket.index as u64);
                let pixels = render_bucket(bucket, &tracer, &projection, &mut sampler);
                BucketResult::new(*bucket, pixels)
            })
            .collect();

        for result in &results {
            result.write_to(sink);
            stats.pixels_written += result.pixels.len() as u64;
        }
        stats.buckets_completed += results.len();

        sink.present_frame();
        log::debug!(
            "Presented {}/{} buckets",
            stats.buckets_completed,
            buckets.len()
        );
    }

    if stats.cancelled {
        sink.present_frame();
    }
    stats.elapsed = start.elapsed();

    log::info!(
        "Rendered {} pixels in {:.2}s",
        stats.pixels_written,
        stats.elapsed.as_secs_f32()
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageBuffer;
    use umbra_core::{Light, Object};
    use umbra_math::{Camera, Sphere, Vec3};

    fn small_scene() -> Scene {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 200.0), -Vec3::Z, 0.75);
        Scene::builder(camera)
            .object(Object::sphere(
                Sphere::new(Vec3::ZERO, 20.0),
                Color::new(0.8, 0.4, 0.2, 1.0),
            ))
            .light(
                Light::rectangle(
                    Vec3::new(-10.0, 60.0, -10.0),
                    Vec3::new(10.0, 60.0, 10.0),
                    Color::ONE,
                )
                .unwrap(),
            )
            .build()
            .unwrap()
    }

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 20,
            height: 15,
            samples_per_pixel: 2,
            light_samples: 1,
            max_bounces: 1,
            bucket_size: 8,
            seed: Some(17),
            ..Default::default()
        }
    }

    /// Counts how often each pixel is written.
    struct CountingSink {
        width: u32,
        writes: Vec<u32>,
        presents: u32,
    }

    impl FrameSink for CountingSink {
        fn write_pixel(&mut self, x: u32, y: u32, _color: Color) {
            self.writes[(y * self.width + x) as usize] += 1;
        }

        fn present_frame(&mut self) {
            self.presents += 1;
        }
    }

    struct StopImmediately(ImageBuffer);

    impl FrameSink for StopImmediately {
        fn write_pixel(&mut self, x: u32, y: u32, color: Color) {
            self.0.write_pixel(x, y, color);
        }

        fn present_frame(&mut self) {
            self.0.present_frame();
        }

        fn should_stop(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);

        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.index, i);
        }
    }

    #[test]
    fn test_bucket_result_placement() {
        let bucket = Bucket::new(4, 2, 3, 2, 0);
        let pixels: Vec<Color> = (0..6).map(|i| Color::splat(i as f32)).collect();
        let mut image = ImageBuffer::new(8, 4);

        BucketResult::new(bucket, pixels).write_to(&mut image);

        assert_eq!(image.get(4, 2), Color::splat(0.0));
        assert_eq!(image.get(6, 2), Color::splat(2.0));
        assert_eq!(image.get(4, 3), Color::splat(3.0));
        assert_eq!(image.get(6, 3), Color::splat(5.0));
        assert_eq!(image.get(3, 2), Color::ZERO);
    }

    #[test]
    fn test_parallel_covers_every_pixel_once() {
        let scene = small_scene();
        let config = small_config();
        let mut sink = CountingSink {
            width: config.width,
            writes: vec![0; (config.width * config.height) as usize],
            presents: 0,
        };

        let stats = render_parallel(&scene, &config, &mut sink).unwrap();

        assert!(sink.writes.iter().all(|&n| n == 1));
        assert_eq!(stats.pixels_written, 300);
        assert_eq!(stats.buckets_completed, 6);
        assert!(!stats.cancelled);
        assert!(sink.presents >= 1);
    }

    #[test]
    fn test_parallel_is_deterministic_with_seed() {
        let scene = small_scene();
        let config = small_config();

        let mut a = ImageBuffer::new(config.width, config.height);
        let mut b = ImageBuffer::new(config.width, config.height);
        render_parallel(&scene, &config, &mut a).unwrap();
        render_parallel(&scene, &config, &mut b).unwrap();

        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_parallel_background_outside_sphere() {
        let scene = small_scene();
        let config = small_config();
        let mut image = ImageBuffer::new(config.width, config.height);

        render_parallel(&scene, &config, &mut image).unwrap();

        assert_eq!(image.get(0, 0), scene.background());
        assert_eq!(image.get(19, 14), scene.background());
    }

    #[test]
    fn test_parallel_cancelled_before_first_wave() {
        let scene = small_scene();
        let config = small_config();
        let mut sink = StopImmediately(ImageBuffer::new(config.width, config.height));

        let stats = render_parallel(&scene, &config, &mut sink).unwrap();

        assert!(stats.cancelled);
        assert_eq!(stats.pixels_written, 0);
        assert_eq!(stats.buckets_completed, 0);
        assert_eq!(sink.0.frames_presented, 1);
    }
}
