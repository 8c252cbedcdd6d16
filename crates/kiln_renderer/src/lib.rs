//! Kiln Renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer that mixes material sampling with importance
//! sampling toward lights:
//! - Hittable primitives and instancing decorators behind one trait
//! - BVH acceleration over the scene's primitives
//! - Materials that describe scattering through probability densities
//! - A bucketed, rayon-parallel renderer with per-bucket seeded generators

mod aarect;
mod bucket;
mod bvh;
mod camera;
mod constant_medium;
mod cuboid;
mod error;
mod hittable;
mod instance;
mod material;
mod moving_sphere;
mod output;
mod pdf;
mod renderer;
mod sphere;

pub use aarect::{AaRect, Plane};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use constant_medium::ConstantMedium;
pub use cuboid::Cuboid;
pub use error::{BuildError, OutputError};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{FlipFace, RotateY, Translate};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterKind, ScatterRecord,
};
pub use moving_sphere::MovingSphere;
pub use output::{color_to_rgb8, save_image, write_ppm};
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, SpherePdf};
pub use renderer::{ray_color, render, render_pixel, Background, ImageBuffer, RenderConfig, Scene};
pub use sphere::Sphere;

/// Re-export math and texture types so scene code needs a single import
pub use kiln_core::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use kiln_math::{Aabb, Color, Interval, Ray, Vec3};
