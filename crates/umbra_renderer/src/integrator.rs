//! Monte Carlo light transport.
//!
//! Each path starts at a camera ray's first hit and accumulates:
//! - emission when it lands on a light or emissive object (then stops)
//! - direct lighting from sampled points on area lights
//! - indirect light from random bounces, continued by Russian roulette
//!
//! Bounces run as a loop with a throughput weight and a depth counter.

use std::f32::consts::{PI, TAU};

use umbra_core::{HitEntity, Scene, SceneHit};
use umbra_math::{Intersection, Ray, Vec3, EPSILON};

use crate::{BounceSampling, Color, RenderConfig, Sampler};

/// RGB radiance, unclamped.
pub type Radiance = Vec3;

/// A sampled continuation direction.
#[derive(Debug, Clone, Copy)]
pub struct Bounce {
    /// Ray leaving the surface, already offset
    pub ray: Ray,
    /// Cosine between the surface normal and the new direction (may be negative)
    pub cos_theta: f32,
}

/// Radiance estimator over an immutable scene.
#[derive(Debug, Clone, Copy)]
pub struct PathTracer<'a> {
    scene: &'a Scene,
    config: &'a RenderConfig,
}

impl<'a> PathTracer<'a> {
    pub fn new(scene: &'a Scene, config: &'a RenderConfig) -> Self {
        Self { scene, config }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    /// Estimate radiance along a camera ray.
    ///
    /// Returns `None` when the ray escapes the scene, so the caller can
    /// substitute the background.
    pub fn radiance(&self, ray: &Ray, sampler: &mut Sampler) -> Option<Radiance> {
        let hit = self.scene.nearest_hit(ray)?;
        Some(self.trace_from(hit, sampler))
    }

    /// Follow a path starting at `hit`.
    pub fn trace_from(&self, first: SceneHit<'a>, sampler: &mut Sampler) -> Radiance {
        let mut radiance = Radiance::ZERO;
        let mut throughput = 1.0_f32;
        let mut hit = first;
        let mut depth = 0;

        loop {
            let object = match hit.entity {
                HitEntity::Light { light, .. } => {
                    radiance += throughput * rgb(light.color());
                    break;
                }
                HitEntity::Object { object, .. } if object.is_emissive => {
                    radiance += throughput * rgb(object.emission());
                    break;
                }
                HitEntity::Object { object, .. } => object,
            };

            radiance += throughput * self.direct_light(&hit.intersection, object.color, sampler);

            if depth >= self.config.max_bounces {
                break;
            }
            if sampler.sample() >= self.config.continuation_probability {
                break;
            }

            let bounce = self.sample_bounce(&hit.intersection, sampler);
            let Some(next) = self.scene.nearest_hit(&bounce.ray) else {
                // Escaped: this branch carries no light
                break;
            };

            throughput *= bounce.cos_theta / self.config.continuation_probability;
            hit = next;
            depth += 1;
        }

        radiance
    }

    /// Next-event estimate at a surface point with the given albedo.
    ///
    /// Averages `light_samples` draws, each picking a light uniformly and a
    /// point uniformly inside its bounds. Occluded draws contribute zero.
    pub fn direct_light(
        &self,
        hit: &Intersection,
        albedo: Color,
        sampler: &mut Sampler,
    ) -> Radiance {
        let lights = self.scene.lights();
        let samples = self.config.light_samples;
        if lights.is_empty() || samples == 0 {
            return Radiance::ZERO;
        }

        let mut total = Radiance::ZERO;
        for _ in 0..samples {
            let index = ((sampler.sample() * lights.len() as f32) as usize).min(lights.len() - 1);
            let target = lights[index].sample_point(sampler.sample3());
            total += self.light_contribution(hit, albedo, index, target);
        }

        total / samples as f32
    }

    /// Contribution of one sampled point on light `index`.
    fn light_contribution(
        &self,
        hit: &Intersection,
        albedo: Color,
        index: usize,
        target: Vec3,
    ) -> Radiance {
        let to_light = target - hit.point;
        let distance_squared = to_light.length_squared();
        if distance_squared < EPSILON {
            return Radiance::ZERO;
        }
        let direction = to_light / distance_squared.sqrt();

        let shadow_ray = Ray::new(hit.point, direction).offset(self.config.ray_epsilon);
        let Some(blocker) = self.scene.nearest_hit(&shadow_ray) else {
            return Radiance::ZERO;
        };
        if !blocker.entity.is_light(index) {
            return Radiance::ZERO;
        }

        let light = &self.scene.lights()[index];
        let cos_surface = hit.normal.dot(direction).abs();
        let cos_light = blocker.intersection.normal.dot(direction).abs();
        let falloff = distance_squared / self.config.distance_normalization;

        rgb(albedo) * rgb(light.color()) * cos_surface * cos_light * light.area() / TAU / falloff
    }

    /// Draw an indirect bounce direction at `hit`.
    ///
    /// `θ` and `φ` are uniform in `[0, π)` and `[0, 2π)`, in world space.
    pub fn sample_bounce(&self, hit: &Intersection, sampler: &mut Sampler) -> Bounce {
        let theta = PI * sampler.sample();
        let phi = TAU * sampler.sample();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let mut direction = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);

        if self.config.bounce_sampling == BounceSampling::Hemisphere
            && direction.dot(hit.normal) < 0.0
        {
            direction = -direction;
        }

        Bounce {
            ray: Ray::new(hit.point, direction).offset(self.config.ray_epsilon),
            cos_theta: hit.normal.dot(direction),
        }
    }
}

#[inline]
fn rgb(color: Color) -> Radiance {
    color.truncate()
}
