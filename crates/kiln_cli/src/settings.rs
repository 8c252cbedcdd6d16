//! Render settings that can come from a JSON file and from flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Image width used when neither a flag nor the settings file gives one.
pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_SCENE: u32 = 1;
pub const DEFAULT_OUTPUT: &str = "image.ppm";

/// Optional render options. Unset fields fall back to the scene's or the
/// renderer's defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub scene: Option<u32>,
    pub width: Option<u32>,
    pub aspect_ratio: Option<f64>,
    pub samples: Option<u32>,
    pub max_depth: Option<u32>,
    pub seed: Option<u64>,
    pub threads: Option<usize>,
    pub bucket_size: Option<u32>,
    pub output: Option<PathBuf>,
}

impl RenderSettings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;

        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Fields set in `over` replace ours.
    pub fn overlay(self, over: RenderSettings) -> Self {
        Self {
            scene: over.scene.or(self.scene),
            width: over.width.or(self.width),
            aspect_ratio: over.aspect_ratio.or(self.aspect_ratio),
            samples: over.samples.or(self.samples),
            max_depth: over.max_depth.or(self.max_depth),
            seed: over.seed.or(self.seed),
            threads: over.threads.or(self.threads),
            bucket_size: over.bucket_size.or(self.bucket_size),
            output: over.output.or(self.output),
        }
    }

    pub fn scene_id(&self) -> u32 {
        self.scene.unwrap_or(DEFAULT_SCENE)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}
