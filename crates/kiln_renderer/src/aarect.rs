//! Axis-aligned rectangles.
//!
//! One type covers the three orientations: the rectangle spans two in-plane
//! axes `a` and `b` and sits at constant `k` on the remaining axis.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::{Material, Ray};
use kiln_math::random::gen_range;
use kiln_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// The plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// Indices of the (a, b, k) axes.
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }
}

pub struct AaRect {
    plane: Plane,
    a0: f64,
    a1: f64,
    b0: f64,
    b1: f64,
    k: f64,
    material: Arc<dyn Material>,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f64, f64),
        (b0, b1): (f64, f64),
        k: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            plane,
            a0: a0.min(a1),
            a1: a0.max(a1),
            b0: b0.min(b1),
            b1: b0.max(b1),
            k,
            material,
        }
    }

    /// Rectangle spanning x in [x0, x1], y in [y0, y1] at z = k.
    pub fn xy(x0: f64, x1: f64, y0: f64, y1: f64, k: f64, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XY, (x0, x1), (y0, y1), k, material)
    }

    /// Rectangle spanning x in [x0, x1], z in [z0, z1] at y = k.
    pub fn xz(x0: f64, x1: f64, z0: f64, z1: f64, k: f64, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XZ, (x0, x1), (z0, z1), k, material)
    }

    /// Rectangle spanning y in [y0, y1], z in [z0, z1] at x = k.
    pub fn yz(y0: f64, y1: f64, z0: f64, z1: f64, k: f64, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::YZ, (y0, y1), (z0, z1), k, material)
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn area(&self) -> f64 {
        (self.a1 - self.a0) * (self.b1 - self.b0)
    }

    /// Point with the given in-plane coordinates.
    fn point(&self, a: f64, b: f64) -> Vec3 {
        let (ai, bi, ki) = self.plane.axes();
        let mut p = Vec3::ZERO;
        p[ai] = a;
        p[bi] = b;
        p[ki] = self.k;
        p
    }
}

impl Hittable for AaRect {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let (ai, bi, ki) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        // Parallel rays divide to +-inf or NaN, both rejected here
        let t = (self.k - origin[ki]) / direction[ki];
        if !ray_t.surrounds(t) {
            return None;
        }

        let a = origin[ai] + t * direction[ai];
        let b = origin[bi] + t * direction[bi];
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        let u = (a - self.a0) / (self.a1 - self.a0);
        let v = (b - self.b0) / (self.b1 - self.b0);

        let mut outward_normal = Vec3::ZERO;
        outward_normal[ki] = 1.0;

        Some(HitRecord::new(
            ray,
            t,
            outward_normal,
            (u, v),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        // Zero thickness on k; from_points pads it
        Some(Aabb::from_points(
            self.point(self.a0, self.b0),
            self.point(self.a1, self.b1),
        ))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f64 {
        let probe = Ray::new(origin, direction, 0.0);
        let Some(rec) = self.hit(&probe, Interval::new(0.001, f64::INFINITY)) else {
            return 0.0;
        };

        let length_squared = direction.length_squared();
        let distance_squared = rec.t * rec.t * length_squared;
        let cosine = (direction.dot(rec.normal) / length_squared.sqrt()).abs();
        if cosine <= 0.0 {
            return 0.0;
        }

        distance_squared / (cosine * self.area())
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let a = gen_range(rng, self.a0, self.a1);
        let b = gen_range(rng, self.b0, self.b1);
        self.point(a, b) - origin
    }
}
