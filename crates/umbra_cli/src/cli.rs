use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use umbra_renderer::RenderConfig;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "umbra")]
#[command(about = "Render the Umbra box scene with a CPU path tracer")]
pub struct Args {
    /// JSON render config; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Primary samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Light samples per shading point
    #[arg(long)]
    pub light_samples: Option<u32>,

    /// Maximum indirect bounces
    #[arg(long)]
    pub max_bounces: Option<u32>,

    /// Sampler seed for reproducible renders
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render buckets in parallel instead of row by row
    #[arg(long, short = 'p')]
    pub parallel: bool,

    /// Stop rendering after this many seconds and keep what is done
    #[arg(long)]
    pub time_limit: Option<f32>,

    /// Rewrite the output file every time a frame is presented
    #[arg(long)]
    pub preview: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "umbra.png")]
    pub output: PathBuf,

    /// Logging level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command line overrides on top of `config`.
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(light_samples) = self.light_samples {
            config.light_samples = light_samples;
        }
        if let Some(max_bounces) = self.max_bounces {
            config.max_bounces = max_bounces;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}
