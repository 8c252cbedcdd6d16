//! Axis-aligned box built from six rectangles.

use std::sync::Arc;

use crate::aarect::AaRect;
use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::{Material, Ray};
use kiln_math::{Aabb, Interval, Vec3};

pub struct Cuboid {
    bbox: Aabb,
    sides: HittableList,
}

impl Cuboid {
    /// Box between two opposite corners, given in any order. All six faces
    /// share `material`.
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        let p0 = a.min(b);
        let p1 = a.max(b);

        let mut sides = HittableList::new();

        sides.add(AaRect::xy(p0.x, p1.x, p0.y, p1.y, p1.z, material.clone()));
        sides.add(AaRect::xy(p0.x, p1.x, p0.y, p1.y, p0.z, material.clone()));

        sides.add(AaRect::xz(p0.x, p1.x, p0.z, p1.z, p1.y, material.clone()));
        sides.add(AaRect::xz(p0.x, p1.x, p0.z, p1.z, p0.y, material.clone()));

        sides.add(AaRect::yz(p0.y, p1.y, p0.z, p1.z, p1.x, material.clone()));
        sides.add(AaRect::yz(p0.y, p1.y, p0.z, p1.z, p0.x, material));

        Self {
            bbox: Aabb::from_points(p0, p1),
            sides,
        }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t)
    }

    fn bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use kiln_math::Color;

    fn unit_cube() -> Cuboid {
        Cuboid::new(
            Vec3::ONE,
            Vec3::ZERO,
            Arc::new(Lambertian::from_color(Color::splat(0.73))),
        )
    }

    #[test]
    fn test_box_hit_nearest_face() {
        let cube = unit_cube();
        let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);

        let rec = cube.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-12);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(rec.front_face);
    }

    #[test]
    fn test_box_hit_from_inside() {
        let cube = unit_cube();
        let ray = Ray::new(Vec3::splat(0.5), Vec3::X, 0.0);

        let rec = cube.hit(&ray, Interval::new(0.001, f64::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-12);
        assert!(!rec.front_face);
    }

    #[test]
    fn test_box_bounds_corners_in_any_order() {
        let bbox = unit_cube().bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::ZERO);
        assert_eq!(bbox.max(), Vec3::ONE);
    }
}
