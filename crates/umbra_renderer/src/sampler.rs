//! Uniform random source for every stochastic decision in a render.
//!
//! The sequential renderer threads one `Sampler` through the whole frame.
//! The tiled renderer gives each bucket its own stream derived from a base
//! seed, so results do not depend on thread scheduling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use umbra_math::{Vec2, Vec3};

/// Seeded pseudo-random stream of uniform draws in `[0, 1)`.
///
/// Backed by ChaCha12, the same generator as `rand`'s `StdRng`, so a seed
/// can be split into independent streams.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: ChaCha12Rng,
}

impl Sampler {
    /// Create a sampler with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// Create a sampler seeded from the OS.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha12Rng::from_entropy(),
        }
    }

    /// Fixed seed if given, OS entropy otherwise.
    pub fn seeded(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }

    /// Independent stream `stream` of the generator seeded with `seed`.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { rng }
    }

    /// Draw a uniform value in `[0, 1)`.
    #[inline]
    pub fn sample(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Two independent draws.
    #[inline]
    pub fn sample2(&mut self) -> Vec2 {
        Vec2::new(self.sample(), self.sample())
    }

    /// Three independent draws.
    #[inline]
    pub fn sample3(&mut self) -> Vec3 {
        Vec3::new(self.sample(), self.sample(), self.sample())
    }
}
