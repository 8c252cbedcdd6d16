//! Instancing decorators.
//!
//! Each decorator owns exactly one inner hittable and changes how rays see
//! it. Rays are moved into the inner object's frame, intersected there, and
//! the hit point and normal moved back. `front_face` is kept from the inner
//! hit since rigid motions preserve which side was struck.

use crate::hittable::{HitRecord, Hittable};
use crate::Ray;
use kiln_math::{degrees_to_radians, Aabb, Interval, Mat4, Mat4Ext, Vec3};
use rand::RngCore;

/// Moves an object by a fixed offset.
pub struct Translate {
    inner: Box<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(inner: impl Hittable + 'static, offset: Vec3) -> Self {
        Self::from_boxed(Box::new(inner), offset)
    }

    pub fn from_boxed(inner: Box<dyn Hittable>, offset: Vec3) -> Self {
        Self { inner, offset }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.inner.hit(&moved, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.inner
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f64 {
        self.inner.pdf_value(origin - self.offset, direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.inner.random_direction(origin - self.offset, rng)
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }
}

/// Rotates an object about the Y axis.
pub struct RotateY {
    inner: Box<dyn Hittable>,
    to_world: Mat4,
    to_local: Mat4,
}

impl RotateY {
    /// Rotation by `degrees`, counter-clockwise looking down -Y.
    pub fn new(inner: impl Hittable + 'static, degrees: f64) -> Self {
        Self::from_boxed(Box::new(inner), degrees)
    }

    pub fn from_boxed(inner: Box<dyn Hittable>, degrees: f64) -> Self {
        let radians = degrees_to_radians(degrees);
        Self {
            inner,
            to_world: Mat4::from_rotation_y(radians),
            to_local: Mat4::from_rotation_y(-radians),
        }
    }
}

impl Hittable for RotateY {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let local = Ray::new(
            self.to_local.transform_point3(ray.origin()),
            self.to_local.transform_vector3(ray.direction()),
            ray.time(),
        );

        let mut rec = self.inner.hit(&local, ray_t)?;
        rec.p = self.to_world.transform_point3(rec.p);
        rec.normal = self.to_world.transform_vector3(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.inner
            .bounding_box(time0, time1)
            .map(|bbox| self.to_world.transform_aabb(&bbox))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f64 {
        self.inner.pdf_value(
            self.to_local.transform_point3(origin),
            self.to_local.transform_vector3(direction),
        )
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let local = self
            .inner
            .random_direction(self.to_local.transform_point3(origin), rng);
        self.to_world.transform_vector3(local)
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }
}

/// Reverses which side of an object counts as the front. Used to make a
/// one-sided light face the other way.
pub struct FlipFace {
    inner: Box<dyn Hittable>,
}

impl FlipFace {
    pub fn new(inner: impl Hittable + 'static) -> Self {
        Self::from_boxed(Box::new(inner))
    }

    pub fn from_boxed(inner: Box<dyn Hittable>) -> Self {
        Self { inner }
    }
}

impl Hittable for FlipFace {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut rec = self.inner.hit(ray, ray_t)?;
        rec.front_face = !rec.front_face;
        Some(rec)
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.inner.bounding_box(time0, time1)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f64 {
        self.inner.pdf_value(origin, direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.inner.random_direction(origin, rng)
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }
}
