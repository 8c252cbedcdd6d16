//! Material trait for surface scattering.
//!
//! A material either scatters specularly (one deterministic direction) or
//! hands the integrator a probability density to sample from, together with
//! its own scattering density for the estimator's weight.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::pdf::{CosinePdf, Pdf, SpherePdf};
use crate::{hittable::HitRecord, Ray};
use kiln_core::{SolidColor, Texture};
use kiln_math::random::{gen_f64, random_in_unit_sphere};
use kiln_math::{Color, Vec3Ext};
use rand::RngCore;

/// How a scattered ray continues.
pub enum ScatterKind {
    /// Deterministic direction (mirror, glass); no density division.
    Specular(Ray),
    /// Direction drawn from a distribution; the integrator mixes this
    /// density with light sampling.
    Sampled(Box<dyn Pdf>),
}

/// Result of a scatter event.
pub struct ScatterRecord {
    pub attenuation: Color,
    pub kind: ScatterKind,
}

impl ScatterRecord {
    pub fn is_specular(&self) -> bool {
        matches!(self.kind, ScatterKind::Specular(_))
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray, or `None` if it is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterRecord>;

    /// Density with which this material itself scatters toward `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f64 {
        0.0
    }

    /// Light emitted at the hit. Most materials return black.
    fn emitted(&self, _rec: &HitRecord) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            kind: ScatterKind::Sampled(Box::new(CosinePdf::new(rec.normal))),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f64 {
        let cosine = rec.normal.dot(scattered.direction().normalize());
        (cosine / PI).max(0.0)
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let reflected = ray_in.direction().normalize().reflect(rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the reflection below the surface or cancel it; absorb it
        if direction.near_zero() || direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord {
            attenuation: self.albedo,
            kind: ScatterKind::Specular(Ray::new(rec.p, direction, ray_in.time())),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection past the critical angle
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng) {
            unit_direction.reflect(rec.normal)
        } else {
            unit_direction.refract(rec.normal, refraction_ratio)
        };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            kind: ScatterKind::Specular(Ray::new(rec.p, direction, ray_in.time())),
        })
    }
}

/// Diffuse light emitter. Emits from the front face only.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    pub fn from_color(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, rec: &HitRecord) -> Color {
        if rec.front_face {
            self.emit.value(rec.u, rec.v, rec.p)
        } else {
            Color::ZERO
        }
    }
}

/// Phase function of a participating medium: scatters uniformly over the
/// sphere of directions.
#[derive(Clone)]
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Isotropic {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            kind: ScatterKind::Sampled(Box::new(SpherePdf)),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f64 {
        1.0 / (4.0 * PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(material: &'a dyn Material, ray: &Ray, outward_normal: Vec3) -> HitRecord<'a> {
        HitRecord::new(ray, 1.0, outward_normal, (0.5, 0.5), material)
    }

    #[test]
    fn test_lambertian_samples_with_cosine_density() {
        let mut rng = StdRng::seed_from_u64(1);
        let material = Lambertian::from_color(Color::new(0.2, 0.4, 0.6));
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
        let rec = record(&material, &ray, Vec3::Y);

        let srec = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert!(!srec.is_specular());
        assert_eq!(srec.attenuation, Color::new(0.2, 0.4, 0.6));

        let ScatterKind::Sampled(pdf) = srec.kind else {
            panic!("lambertian must scatter through a pdf");
        };
        let up = Ray::new(rec.p, Vec3::Y, 0.0);
        assert!((pdf.value(Vec3::Y) - 1.0 / PI).abs() < 1e-12);
        assert!((material.scattering_pdf(&ray, &rec, &up) - 1.0 / PI).abs() < 1e-12);

        let down = Ray::new(rec.p, -Vec3::Y, 0.0);
        assert_eq!(material.scattering_pdf(&ray, &rec, &down), 0.0);
    }

    #[test]
    fn test_mirror_metal_reflects_exactly() {
        let mut rng = StdRng::seed_from_u64(2);
        let material = Metal::new(Color::ONE, 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);
        let rec = record(&material, &ray, Vec3::Y);

        let srec = material.scatter(&ray, &rec, &mut rng).unwrap();
        let ScatterKind::Specular(scattered) = srec.kind else {
            panic!("metal scatters specularly");
        };
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((scattered.direction() - expected).length() < 1e-12);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(3);
        let material = Dielectric::new(1.5);
        // Grazing ray from inside the glass
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.1, 0.0), 0.0);
        let rec = record(&material, &ray, Vec3::Y);
        assert!(!rec.front_face);

        for _ in 0..50 {
            let srec = material.scatter(&ray, &rec, &mut rng).unwrap();
            let ScatterKind::Specular(scattered) = srec.kind else {
                panic!("dielectric scatters specularly");
            };
            // Reflected back down into the glass
            assert!(scattered.direction().y < 0.0);
            assert_eq!(srec.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_diffuse_light_is_one_sided() {
        let mut rng = StdRng::seed_from_u64(4);
        let light = DiffuseLight::from_color(Color::splat(4.0));
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);

        let front = record(&light, &ray, Vec3::Y);
        assert_eq!(light.emitted(&front), Color::splat(4.0));
        assert!(light.scatter(&ray, &front, &mut rng).is_none());

        let back = record(&light, &ray, -Vec3::Y);
        assert_eq!(light.emitted(&back), Color::ZERO);
    }

    #[test]
    fn test_isotropic_uses_uniform_density() {
        let mut rng = StdRng::seed_from_u64(5);
        let material = Isotropic::from_color(Color::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let rec = record(&material, &ray, Vec3::X);

        let srec = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert!(!srec.is_specular());
        let scattered = Ray::new(rec.p, Vec3::new(0.3, -0.2, 0.9), 0.0);
        assert!((material.scattering_pdf(&ray, &rec, &scattered) - 1.0 / (4.0 * PI)).abs() < 1e-15);
    }

    #[test]
    fn test_default_emission_is_black() {
        let material = Metal::new(Color::ONE, 0.3);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let rec = record(&material, &ray, -Vec3::X);
        assert_eq!(material.emitted(&rec), Color::ZERO);
    }
}
