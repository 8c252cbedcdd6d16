//! Image-mapped textures.
//!
//! Images are decoded once with the `image` crate and kept as 8-bit RGB.
//! Lookups are nearest-texel. A texture whose image failed to load renders a
//! fixed cyan so the problem is visible in the output instead of aborting
//! the render.

use std::path::Path;

use kiln_math::{Color, Vec3};
use thiserror::Error;

use crate::texture::Texture;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    /// Unreadable or undecodable file; `image` reports both.
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image {0} has no pixels")]
    EmptyImage(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Color sampled when no image data is available.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

const BYTES_PER_PIXEL: usize = 3;

/// Decoded RGB8 pixels, row-major, top row first.
#[derive(Clone, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage(path.display().to_string()));
        }

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels: rgb.into_raw(),
        })
    }

    /// Wrap raw RGB8 bytes. Returns `None` if the buffer size does not match.
    pub fn from_rgb8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        (width > 0 && height > 0 && pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest texel at (u, v). Coordinates are clamped to [0, 1] and v is
    /// flipped so v = 1 is the top row.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.width as f64) as u32).min(self.width - 1);
        let j = ((v * self.height as f64) as u32).min(self.height - 1);

        let offset = (j as usize * self.width as usize + i as usize) * BYTES_PER_PIXEL;
        let texel = &self.pixels[offset..offset + BYTES_PER_PIXEL];

        const COLOR_SCALE: f64 = 1.0 / 255.0;
        Color::new(
            COLOR_SCALE * texel[0] as f64,
            COLOR_SCALE * texel[1] as f64,
            COLOR_SCALE * texel[2] as f64,
        )
    }
}

/// Texture backed by an image, or by the debug color if loading failed.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    data: Option<ImageData>,
}

impl ImageTexture {
    pub fn new(data: ImageData) -> Self {
        Self { data: Some(data) }
    }

    /// Load an image texture, degrading to [`MISSING_TEXTURE_COLOR`] on failure.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match ImageData::load(path) {
            Ok(data) => Self::new(data),
            Err(e) => {
                log::warn!("Could not load texture image '{}': {}", path.display(), e);
                Self { data: None }
            }
        }
    }

    /// True if image data was loaded.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Vec3) -> Color {
        match &self.data {
            Some(data) => data.sample(u, v),
            None => MISSING_TEXTURE_COLOR,
        }
    }
}
