//! Homogeneous participating medium (smoke, fog) bounded by a convex shape.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::{Material, Ray};
use kiln_core::Texture;
use kiln_math::random::gen_f64;
use kiln_math::{Aabb, Color, Interval, Vec3};

/// Gap between the entry and exit hits on the boundary.
const EXIT_EPSILON: f64 = 0.0001;

/// A volume of constant density inside `boundary`.
///
/// The boundary must be convex: a ray is assumed to enter and leave it once.
/// Scatter distances are drawn from the thread-local generator because
/// intersection tests take no generator, so renders containing a medium are
/// not bit-reproducible from a seed.
pub struct ConstantMedium {
    boundary: Box<dyn Hittable>,
    neg_inv_density: f64,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: impl Hittable + 'static, density: f64, albedo: Arc<dyn Texture>) -> Self {
        Self {
            boundary: Box::new(boundary),
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::new(albedo)),
        }
    }

    pub fn from_color(boundary: impl Hittable + 'static, density: f64, albedo: Color) -> Self {
        Self {
            boundary: Box::new(boundary),
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::from_color(albedo)),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE)?.t;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry + EXIT_EPSILON, f64::INFINITY))?
            .t;

        let t_enter = entry.max(ray_t.min);
        let t_exit = exit.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        // Origin inside the volume
        let t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f64(&mut rand::thread_rng()).ln();

        if hit_distance > distance_inside {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;

        // Normal and face are arbitrary inside a volume
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: self.phase_function.as_ref(),
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}
