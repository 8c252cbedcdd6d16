//! Kiln - offline path tracer.
//!
//! Builds a scene from the catalog, renders it on all cores and writes the
//! result as PPM or PNG.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;
mod scenes;
mod settings;

use cli::Args;
use kiln_renderer::{render, save_image, RenderConfig};
use settings::{RenderSettings, DEFAULT_WIDTH};

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG still overrides --log-level
    env_logger::Builder::new()
        .filter_level(LevelFilter::from(args.log_level))
        .parse_default_env()
        .init();

    if args.list {
        for entry in scenes::CATALOG {
            println!("{:>2}  {}", entry.id, entry.name);
        }
        return Ok(());
    }

    let settings = match &args.settings {
        Some(path) => RenderSettings::load(path)?.overlay(args.overrides()),
        None => args.overrides(),
    };

    if let Some(threads) = settings.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the render thread pool")?;
    }

    let entry = scenes::find(settings.scene_id())
        .ok_or_else(|| anyhow!("Unknown scene {} (use --list)", settings.scene_id()))?;
    info!("Building scene {}: {}", entry.id, entry.name);

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let setup = entry
        .build(&mut rng)
        .with_context(|| format!("Failed to build scene {}", entry.name))?;

    let aspect_ratio = settings.aspect_ratio.unwrap_or(setup.aspect_ratio);
    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return Err(anyhow!("Aspect ratio must be positive, got {aspect_ratio}"));
    }
    let width = settings.width.unwrap_or(DEFAULT_WIDTH).max(1);
    let height = ((width as f64 / aspect_ratio) as u32).max(1);

    let mut camera = setup.camera.with_resolution(width, height);
    camera.initialize();

    let defaults = RenderConfig::default();
    let config = RenderConfig {
        samples_per_pixel: settings.samples.unwrap_or(setup.samples_per_pixel).max(1),
        max_depth: settings.max_depth.unwrap_or(defaults.max_depth),
        background: setup.background,
        seed: settings.seed,
        bucket_size: settings.bucket_size.unwrap_or(defaults.bucket_size),
    };

    let image = render(&camera, &setup.scene, &config);

    let output = settings.output_path();
    save_image(&image, &output)
        .with_context(|| format!("Failed to write image to {}", output.display()))?;

    Ok(())
}
