//! Kiln Core - surface textures for the path tracer.
//!
//! This crate provides:
//!
//! - **Texture trait**: `value(u, v, p) -> Color`, consumed by materials
//! - **Procedural textures**: solid color, 3D checker, Perlin turbulence
//! - **Image textures**: texel lookup into a decoded image, degrading to a
//!   debug color when the file cannot be loaded

pub mod image_texture;
pub mod perlin;
pub mod texture;

pub use image_texture::{ImageData, ImageTexture, TextureError, TextureResult};
pub use perlin::Perlin;
pub use texture::{CheckerTexture, NoiseTexture, SolidColor, Texture};
