//! Random sampling helpers.
//!
//! Every helper takes the generator explicitly so a render can be driven by
//! one seeded generator per worker instead of hidden global state.

use crate::Vec3;
use rand::Rng;
use std::f64::consts::PI;

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f64<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Uniform sample in [min, max).
#[inline]
pub fn gen_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Vector with each component uniform in [min, max).
pub fn random_vec3<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        gen_range(rng, min, max),
        gen_range(rng, min, max),
        gen_range(rng, min, max),
    )
}

/// Uniform point strictly inside the unit sphere (rejection sampled).
pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = random_vec3(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = random_vec3(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if len_sq > 1e-160 && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Uniform point inside the unit disk in the z = 0 plane.
pub fn random_in_unit_disk<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction in the hemisphere around `normal`.
pub fn random_in_hemisphere<R: Rng + ?Sized>(rng: &mut R, normal: Vec3) -> Vec3 {
    let on_sphere = random_unit_vector(rng);
    if on_sphere.dot(normal) > 0.0 {
        on_sphere
    } else {
        -on_sphere
    }
}

/// Cosine-weighted direction about +Z in local coordinates.
pub fn random_cosine_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let r1 = gen_f64(rng);
    let r2 = gen_f64(rng);

    let phi = 2.0 * PI * r1;
    let x = phi.cos() * r2.sqrt();
    let y = phi.sin() * r2.sqrt();
    let z = (1.0 - r2).sqrt();

    Vec3::new(x, y, z)
}

/// Direction about +Z toward a sphere of `radius` whose center lies at
/// squared distance `distance_squared`, uniform over the subtended cone.
pub fn random_to_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f64, distance_squared: f64) -> Vec3 {
    let r1 = gen_f64(rng);
    let r2 = gen_f64(rng);

    let cos_theta_max = (1.0 - radius * radius / distance_squared).max(0.0).sqrt();
    let z = 1.0 + r2 * (cos_theta_max - 1.0);

    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_range_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let x = gen_range(&mut rng, -3.0, 2.0);
            assert!((-3.0..2.0).contains(&x));
        }
    }

    #[test]
    fn test_unit_vector_has_unit_length() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unit_disk_stays_in_plane() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert_eq!(p.z, 0.0);
            assert!(p.length_squared() < 1.0);
        }
    }

    #[test]
    fn test_hemisphere_faces_normal() {
        let mut rng = StdRng::seed_from_u64(4);
        let normal = Vec3::new(0.0, -1.0, 0.0);
        for _ in 0..1000 {
            assert!(random_in_hemisphere(&mut rng, normal).dot(normal) >= 0.0);
        }
    }

    #[test]
    fn test_cosine_direction_is_unit_and_upper() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let d = random_cosine_direction(&mut rng);
            assert!(d.z >= 0.0);
            assert!((d.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_to_sphere_stays_inside_cone() {
        let mut rng = StdRng::seed_from_u64(6);
        let (radius, distance) = (1.0_f64, 4.0_f64);
        let cos_theta_max = (1.0 - radius * radius / (distance * distance)).sqrt();
        for _ in 0..1000 {
            let d = random_to_sphere(&mut rng, radius, distance * distance);
            assert!(d.z >= cos_theta_max - 1e-12);
        }
    }
}
