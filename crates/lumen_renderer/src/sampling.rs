//! Random sampling helpers.

use lumen_math::{orthonormal_basis, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform float in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed unit vector.
pub(crate) fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Use rejection sampling for uniform distribution on sphere
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Cosine-weighted direction on the hemisphere around unit normal `n`.
pub(crate) fn random_cosine_direction(n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let phi = 2.0 * PI * r1;
    let r = r2.sqrt();

    let (tangent, bitangent) = orthonormal_basis(n);
    let local = Vec3::new(r * phi.cos(), r * phi.sin(), (1.0 - r2).max(0.0).sqrt());
    tangent * local.x + bitangent * local.y + n * local.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cosine_direction_stays_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = Vec3::new(0.3, -0.8, 0.2).normalize();
        let mut mean_cos = 0.0;
        for _ in 0..2000 {
            let d = random_cosine_direction(n, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-3);
            assert!(d.dot(n) >= -1e-5);
            mean_cos += d.dot(n);
        }
        // E[cos θ] = 2/3 for a cosine-weighted hemisphere
        mean_cos /= 2000.0;
        assert!((mean_cos - 2.0 / 3.0).abs() < 0.03, "mean cos {}", mean_cos);
    }
}
