use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use umbra_renderer::{render, render_parallel, RenderConfig, Sampler};

mod cli;
mod logger;
mod output;
mod scene;

use cli::Args;
use logger::init_logger;
use output::PngSink;
use scene::box_scene;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    info!("Starting Umbra");

    let mut config = match &args.config {
        Some(path) => RenderConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    args.apply(&mut config);
    config.validate().context("Invalid render settings")?;

    let time_limit = args
        .time_limit
        .map(Duration::try_from_secs_f32)
        .transpose()
        .context("Invalid --time-limit")?;

    let scene = box_scene(config.aspect_ratio()).context("Failed to build demo scene")?;

    let mut sink = PngSink::new(config.width, config.height, &args.output)
        .with_preview(args.preview)
        .with_time_limit(time_limit);

    let stats = if args.parallel {
        render_parallel(&scene, &config, &mut sink)
    } else {
        let mut sampler = Sampler::seeded(config.seed);
        render(&scene, &config, &mut sampler, &mut sink)
    }
    .context("Render failed")?;

    if stats.cancelled {
        warn!(
            "Time limit reached after {:.1}s; saving partial image",
            stats.elapsed.as_secs_f32()
        );
    }

    sink.save()?;
    info!(
        "Done: {} pixels, {} frames presented",
        stats.pixels_written,
        sink.frames_presented()
    );

    Ok(())
}
