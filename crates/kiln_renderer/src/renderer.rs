//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Light importance sampling mixed 50/50 with material sampling
//! - Anti-aliasing via multi-sampling
//! - Parallel bucket rendering with per-bucket generators

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::material::ScatterKind;
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::{Camera, Color, Hittable, Ray};
use kiln_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Smallest accepted hit distance; keeps scattered rays off their origin
/// surface.
const T_MIN: f64 = 0.001;

/// What a ray that escapes the scene sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// White at the horizon blending to light blue straight up.
    SkyGradient,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => sky_gradient(ray),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub background: Background,
    /// Fixed seed for a reproducible render, or `None` to seed from entropy
    pub seed: Option<u64>,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::default(),
            seed: None,
            bucket_size: crate::bucket::DEFAULT_BUCKET_SIZE,
        }
    }
}

/// A built scene: the geometry rays are traced against, and optionally the
/// objects that diffuse bounces importance sample as lights.
pub struct Scene {
    world: Box<dyn Hittable>,
    lights: Option<Box<dyn Hittable>>,
}

impl Scene {
    pub fn new(world: impl Hittable + 'static) -> Self {
        Self::from_boxed(Box::new(world))
    }

    pub fn from_boxed(world: Box<dyn Hittable>) -> Self {
        Self {
            world,
            lights: None,
        }
    }

    /// Importance sample `lights` at every diffuse bounce. They are usually
    /// duplicates of emitters already in the world.
    pub fn with_lights(mut self, lights: impl Hittable + 'static) -> Self {
        self.lights = Some(Box::new(lights));
        self
    }

    pub fn world(&self) -> &dyn Hittable {
        self.world.as_ref()
    }

    pub fn lights(&self) -> Option<&dyn Hittable> {
        self.lights.as_deref()
    }
}

/// Compute the radiance carried back along a ray.
///
/// Recursion stops at `depth == 0` and returns black, which loses the energy
/// of longer paths.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.world().hit(ray, Interval::new(T_MIN, f64::INFINITY)) else {
        return config.background.color(ray);
    };

    let emission = rec.material.emitted(&rec);

    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return emission;
    };

    let material_pdf = match srec.kind {
        ScatterKind::Specular(scattered) => {
            return emission
                + srec.attenuation * ray_color(&scattered, scene, depth - 1, config, rng);
        }
        ScatterKind::Sampled(pdf) => pdf,
    };

    let (direction, pdf_value) = match scene.lights() {
        Some(lights) => {
            let light_pdf = HittablePdf::new(lights, rec.p);
            let mixture = MixturePdf::new(&light_pdf, material_pdf.as_ref());
            let direction = mixture.generate(rng);
            (direction, mixture.value(direction))
        }
        None => {
            let direction = material_pdf.generate(rng);
            (direction, material_pdf.value(direction))
        }
    };

    // A zero or non-finite density would blow the estimate up
    if !(pdf_value > 0.0 && pdf_value.is_finite()) {
        return emission;
    }

    let scattered = Ray::new(rec.p, direction, ray.time());
    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);
    if scattering_pdf <= 0.0 {
        return emission;
    }

    let incoming = ray_color(&scattered, scene, depth - 1, config, rng);
    emission + srec.attenuation * scattering_pdf * incoming / pdf_value
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, scene, config.max_depth, config, rng);
    }

    pixel_color / samples as f64
}

/// Linear radiance per pixel, row-major, top row first.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let color = result.pixels[local_y as usize * bucket.width as usize + local_x as usize];
                self.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }
}

/// Generator for one bucket: `seed + index` when seeded, entropy otherwise.
fn bucket_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Render the entire scene in parallel over buckets.
///
/// The camera must already be initialized.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let (width, height) = (camera.image_width, camera.image_height);
    let buckets = generate_buckets(width, height, config.bucket_size);
    let total = buckets.len();

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}, {} buckets on {} threads",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        total,
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let completed = AtomicUsize::new(0);
    let report_every = (total / 10).max(1);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = bucket_rng(config.seed, bucket.index);
            let result = render_bucket(bucket, camera, scene, config, &mut rng);

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % report_every == 0 && done < total {
                log_progress(done, total, start.elapsed());
            }
            result
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

fn log_progress(done: usize, total: usize, elapsed: Duration) {
    let fraction = done as f64 / total as f64;
    let eta = elapsed.mul_f64((1.0 - fraction) / fraction);
    log::info!(
        "{:>3.0}% ({}/{} buckets), ETA {:.1?}",
        fraction * 100.0,
        done,
        total,
        eta
    );
}
