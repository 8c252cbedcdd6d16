use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::settings::RenderSettings;

/// Log levels selectable on the command line.
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

/// Command line arguments. Every render option is optional here so that
/// values from a `--settings` file apply unless a flag overrides them.
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(about = "Offline Monte Carlo path tracer")]
pub struct Args {
    /// Scene id from the catalog (see --list)
    #[arg(long)]
    pub scene: Option<u32>,

    /// Image width in pixels
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Width over height; defaults to the scene's own aspect ratio
    #[arg(long)]
    pub aspect_ratio: Option<f64>,

    /// Samples per pixel
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for a reproducible render (scenes with smoke or fog excepted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads; defaults to one per core
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Bucket edge length in pixels
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Output file (.ppm or .png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with render settings
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Print the scene catalog and exit
    #[arg(long)]
    pub list: bool,
}

impl Args {
    /// The render options given as flags.
    pub fn overrides(&self) -> RenderSettings {
        RenderSettings {
            scene: self.scene,
            width: self.width,
            aspect_ratio: self.aspect_ratio,
            samples: self.samples,
            max_depth: self.max_depth,
            seed: self.seed,
            threads: self.threads,
            bucket_size: self.bucket_size,
            output: self.output.clone(),
        }
    }
}
