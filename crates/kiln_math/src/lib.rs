//! Kiln math - vector, ray and bounding volume algebra for the path tracer.
//!
//! Geometry and color are double precision. glam's `DVec3`/`DMat4` are
//! re-exported as `Vec3`/`Mat4` so the rest of the workspace reads the same
//! as single precision code would.

pub use glam::{DMat4 as Mat4, DVec3 as Vec3};

mod aabb;
mod interval;
mod onb;
mod ray;
mod transform;
mod vector;

pub mod random;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::Mat4Ext;
pub use vector::Vec3Ext;

/// RGB color, stored as a linear radiance triple.
pub type Color = Vec3;

/// Convert degrees to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_degrees_to_radians() {
        assert!((degrees_to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(degrees_to_radians(0.0), 0.0);
    }
}
