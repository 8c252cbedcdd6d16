// Transform utilities for Mat4
//
// glam already provides transform_point3/transform_vector3 and inverse; this
// adds the bounding box transform the instancing decorators need.

use crate::{Aabb, Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    ///
    /// Transforms all 8 corners and takes their axis-aligned extent, which is
    /// conservative (larger than the tight box) under rotation.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let mut result_min = Vec3::INFINITY;
        let mut result_max = Vec3::NEG_INFINITY;

        for corner in aabb.corners() {
            let transformed = self.transform_point3(corner);
            result_min = result_min.min(transformed);
            result_max = result_max.max(transformed);
        }

        Aabb::from_points(result_min, result_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_aabb_translation() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let mat = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.x.min - 5.0).abs() < 1e-12);
        assert!((transformed.x.max - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_aabb_rotation_y_grows_box() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let mat = Mat4::from_rotation_y(std::f64::consts::FRAC_PI_4);
        let transformed = mat.transform_aabb(&aabb);

        let expected = 2.0_f64.sqrt();
        assert!((transformed.x.max - expected).abs() < 1e-9);
        assert!((transformed.z.min + expected).abs() < 1e-9);
        // Y is untouched by a rotation about Y
        assert!((transformed.y.max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_aabb_contains_rotated_corners() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 0.0), Vec3::new(165.0, 330.0, 165.0));
        let mat = Mat4::from_rotation_y(15f64.to_radians());
        let transformed = mat.transform_aabb(&aabb);

        for corner in aabb.corners() {
            assert!(transformed.contains_point(mat.transform_point3(corner)));
        }
    }
}
