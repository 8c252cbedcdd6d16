//! Sphere whose center moves linearly during the shutter interval.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use crate::sphere::{solve_sphere, sphere_uv};
use crate::{Material, Ray};
use kiln_math::{Aabb, Interval, Vec3};

pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f64,
    time1: f64,
    radius: f64,
    material: Arc<dyn Material>,
}

impl MovingSphere {
    /// Sphere at `center0` at `time0` and at `center1` at `time1`.
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f64,
        time1: f64,
        radius: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at `time`, linearly interpolated (and extrapolated outside
    /// [time0, time1]).
    pub fn center(&self, time: f64) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }

    fn box_at(&self, time: f64) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        let center = self.center(time);
        Aabb::from_points(center - rvec, center + rvec)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let center = self.center(ray.time());
        let t = solve_sphere(center, self.radius, ray, ray_t)?;
        let outward_normal = (ray.at(t) - center) / self.radius;

        Some(HitRecord::new(
            ray,
            t,
            outward_normal,
            sphere_uv(outward_normal),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        Some(Aabb::surrounding(&self.box_at(time0), &self.box_at(time1)))
    }
}
