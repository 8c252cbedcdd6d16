//! Texture trait and procedural textures.

use std::sync::Arc;

use kiln_math::{Color, Vec3};
use rand::RngCore;

use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};

/// A color that varies over a surface.
///
/// `u`, `v` are the surface coordinates of the hit and `p` the hit point in
/// world space; a texture may use either.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color;
}

/// Constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Vec3) -> Color {
        self.color
    }
}

/// Frequency of the solid checker pattern, in cells per unit times pi.
const CHECKER_FREQUENCY: f64 = 10.0;

/// Solid (3D) checker alternating between two sub-textures by the sign of
/// `sin(10x) * sin(10y) * sin(10z)`.
#[derive(Clone)]
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    /// Checker between two solid colors.
    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color {
        let sines = (CHECKER_FREQUENCY * p.x).sin()
            * (CHECKER_FREQUENCY * p.y).sin()
            * (CHECKER_FREQUENCY * p.z).sin();

        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like pattern: a sine along z phase-shifted by Perlin turbulence.
#[derive(Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Vec3) -> Color {
        let turbulence = self.noise.turbulence(p, DEFAULT_TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + (self.scale * p.z + 10.0 * turbulence).sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color_ignores_coordinates() {
        let tex = SolidColor::rgb(1.0, 0.5, 0.0);
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.7, 0.2, Vec3::splat(42.0)), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_alternates_by_sign() {
        let even = Color::new(0.2, 0.3, 0.1);
        let odd = Color::new(0.9, 0.9, 0.9);
        let tex = CheckerTexture::from_colors(even, odd);

        // All three sines positive
        let p = Vec3::splat(0.1);
        assert_eq!(tex.value(0.0, 0.0, p), even);

        // Flip the sign of one factor
        let q = Vec3::new(-0.1, 0.1, 0.1);
        assert_eq!(tex.value(0.0, 0.0, q), odd);
    }

    #[test]
    fn test_checker_accepts_nested_textures() {
        let inner = Arc::new(CheckerTexture::from_colors(Color::ONE, Color::ZERO));
        let tex = CheckerTexture::new(inner, Arc::new(SolidColor::rgb(0.5, 0.5, 0.5)));
        assert_eq!(tex.value(0.0, 0.0, Vec3::splat(0.1)), Color::ONE);
    }

    #[test]
    fn test_noise_texture_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let tex = NoiseTexture::new(4.0, &mut rng);
        for i in 0..200 {
            let p = Vec3::new(i as f64 * 0.13, 1.7, i as f64 * -0.05);
            let c = tex.value(0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }
}
