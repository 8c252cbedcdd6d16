use crate::Vec3;

/// Shading helpers on top of glam's vector type.
pub trait Vec3Ext {
    /// True if every component is close to zero. Guards normalizing or
    /// scattering along a degenerate direction.
    fn near_zero(&self) -> bool;

    /// Mirror `self` about normal `n`.
    fn reflect(&self, n: Vec3) -> Vec3;

    /// Refract unit vector `self` through normal `n` with the ratio of
    /// indices of refraction `etai_over_etat`.
    fn refract(&self, n: Vec3, etai_over_etat: f64) -> Vec3;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        const S: f64 = 1e-8;
        self.x.abs() < S && self.y.abs() < S && self.z.abs() < S
    }

    #[inline]
    fn reflect(&self, n: Vec3) -> Vec3 {
        *self - 2.0 * self.dot(n) * n
    }

    #[inline]
    fn refract(&self, n: Vec3, etai_over_etat: f64) -> Vec3 {
        let cos_theta = (-*self).dot(n).min(1.0);
        let r_out_perp = etai_over_etat * (*self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }
}
