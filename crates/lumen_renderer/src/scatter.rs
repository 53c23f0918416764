//! Light scattering for each material kind.

use lumen_core::{HitRecord, Material, MaterialKind};
use lumen_math::{Color, Ray, Vec3};
use rand::RngCore;

use crate::gen_f32;
use crate::sampling::{random_cosine_direction, random_unit_vector};

/// A scattered continuation ray and its weight.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// What a surface does with an incoming ray.
#[derive(Debug, Clone, Copy)]
pub enum Interaction {
    /// Path ends at a light source with this radiance.
    Emit(Color),
    /// Path continues.
    Scatter(ScatterResult),
    /// Path is absorbed.
    Absorb,
}

/// Materials that describe how light interacts with surfaces.
pub trait Scatter {
    /// Scatter an incoming ray at `rec`.
    ///
    /// Glossy materials average up to `samples_per_scatter` perturbed
    /// directions into the single continuation ray.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        samples_per_scatter: u32,
        rng: &mut dyn RngCore,
    ) -> Interaction;
}

impl Scatter for Material {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        samples_per_scatter: u32,
        rng: &mut dyn RngCore,
    ) -> Interaction {
        match self.kind() {
            MaterialKind::Lambertian => {
                let direction = random_cosine_direction(rec.normal, rng);
                scattered(self.diffuse(), rec, direction)
            }
            MaterialKind::Metal { fuzz } => {
                scatter_metal(self.diffuse(), fuzz, ray_in, rec, samples_per_scatter, rng)
            }
            MaterialKind::Dielectric { refraction_index } => {
                scatter_dielectric(self.diffuse(), refraction_index, ray_in, rec, rng)
            }
            MaterialKind::Emissive => Interaction::Emit(self.emitted()),
        }
    }
}

fn scattered(attenuation: Color, rec: &HitRecord, direction: Vec3) -> Interaction {
    Interaction::Scatter(ScatterResult {
        attenuation,
        scattered: Ray::new(rec.point, direction),
    })
}

fn scatter_metal(
    albedo: Color,
    fuzz: f32,
    ray_in: &Ray,
    rec: &HitRecord,
    samples_per_scatter: u32,
    rng: &mut dyn RngCore,
) -> Interaction {
    let reflected = reflect(ray_in.direction().normalize(), rec.normal);

    // A perfect mirror has nothing to average
    let samples = if fuzz > 0.0 { samples_per_scatter.max(1) } else { 1 };

    let mut sum = Vec3::ZERO;
    let mut accepted = 0;
    for _ in 0..samples {
        let candidate = reflected + fuzz * random_unit_vector(rng);
        // Directions below the surface are absorbed
        if candidate.dot(rec.normal) > 0.0 {
            sum += candidate.normalize();
            accepted += 1;
        }
    }

    if accepted == 0 {
        return Interaction::Absorb;
    }
    match (sum / accepted as f32).try_normalize() {
        Some(direction) if direction.dot(rec.normal) > 0.0 => scattered(albedo, rec, direction),
        _ => Interaction::Absorb,
    }
}

fn scatter_dielectric(
    albedo: Color,
    refraction_index: f32,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Interaction {
    let refraction_ratio = if rec.front_face {
        1.0 / refraction_index
    } else {
        refraction_index
    };

    let unit_direction = ray_in.direction().normalize();
    let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    // Check for total internal reflection
    let cannot_refract = refraction_ratio * sin_theta > 1.0;

    let direction = if cannot_refract || reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
        reflect(unit_direction, rec.normal)
    } else {
        refract(unit_direction, rec.normal, refraction_ratio)
    };

    scattered(albedo, rec, direction)
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Primitive, Scene};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Scene with a single unit sphere at the origin made of `material`.
    fn sphere_scene(material: Material) -> Scene {
        let mut scene = Scene::new();
        let mat = scene.add_material(material);
        scene.add_primitive(Vec3::ZERO, Primitive::sphere(1.0, mat)).unwrap();
        scene
    }

    fn head_on() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z)
    }

    #[test]
    fn test_lambertian_scatters_into_hemisphere() {
        let scene = sphere_scene(Material::lambertian(Color::new(0.8, 0.2, 0.1)));
        let ray = head_on();
        let rec = scene.intersect(&ray).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..50 {
            match rec.material.scatter(&ray, &rec, 1, &mut rng) {
                Interaction::Scatter(s) => {
                    assert_eq!(s.attenuation, Color::new(0.8, 0.2, 0.1));
                    assert!(s.scattered.direction().dot(rec.normal) >= 0.0);
                    assert_eq!(s.scattered.origin(), rec.point);
                }
                other => panic!("expected scatter, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_perfect_mirror_reflects() {
        let scene = sphere_scene(Material::metal(Color::ONE, 0.0));
        let ray = head_on();
        let rec = scene.intersect(&ray).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        match rec.material.scatter(&ray, &rec, 8, &mut rng) {
            Interaction::Scatter(s) => {
                assert!((s.scattered.direction() - Vec3::Z).length() < 1e-5);
            }
            other => panic!("expected scatter, got {:?}", other),
        }
    }

    #[test]
    fn test_fuzzy_metal_averaging_reduces_spread() {
        let scene = sphere_scene(Material::metal(Color::ONE, 0.8));
        let ray = head_on();
        let rec = scene.intersect(&ray).unwrap();

        let spread = |samples: u32| {
            let mut rng = StdRng::seed_from_u64(3);
            let mut total = 0.0;
            let mut count = 0;
            for _ in 0..400 {
                if let Interaction::Scatter(s) = rec.material.scatter(&ray, &rec, samples, &mut rng) {
                    total += 1.0 - s.scattered.direction().dot(Vec3::Z);
                    count += 1;
                }
            }
            total / count as f32
        };

        assert!(spread(16) < spread(1));
    }

    #[test]
    fn test_grazing_fuzzy_metal_can_absorb() {
        let scene = sphere_scene(Material::metal(Color::ONE, 1.0));
        // Ray that just grazes the top of the sphere
        let ray = Ray::new(Vec3::new(-5.0, 0.999, 0.0), Vec3::X);
        let rec = scene.intersect(&ray).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        let absorbed = (0..200)
            .filter(|_| matches!(rec.material.scatter(&ray, &rec, 1, &mut rng), Interaction::Absorb))
            .count();
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_head_on_mostly_refracts() {
        let scene = sphere_scene(Material::dielectric(Color::ONE, 1.5).unwrap());
        let ray = head_on();
        let rec = scene.intersect(&ray).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let mut refracted = 0;
        for _ in 0..200 {
            if let Interaction::Scatter(s) = rec.material.scatter(&ray, &rec, 1, &mut rng) {
                if s.scattered.direction().z < 0.0 {
                    refracted += 1;
                }
            }
        }
        // Normal-incidence reflectance of glass is ~4%
        assert!(refracted > 170, "refracted {}", refracted);
    }

    #[test]
    fn test_total_internal_reflection() {
        let scene = sphere_scene(Material::dielectric(Color::ONE, 1.5).unwrap());
        // From inside the sphere at a steep angle to the surface
        let ray = Ray::new(Vec3::new(0.0, 0.9, 0.0), Vec3::new(1.0, 0.05, 0.0));
        let rec = scene.intersect(&ray).unwrap();
        assert!(!rec.front_face);
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..20 {
            match rec.material.scatter(&ray, &rec, 1, &mut rng) {
                Interaction::Scatter(s) => {
                    // Reflected back inside: towards the sphere interior
                    assert!(s.scattered.direction().dot(rec.outward_normal()) < 0.0);
                }
                other => panic!("expected scatter, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_emissive_terminates() {
        let scene = sphere_scene(Material::emissive(Color::splat(3.0)));
        let ray = head_on();
        let rec = scene.intersect(&ray).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        match rec.material.scatter(&ray, &rec, 4, &mut rng) {
            Interaction::Emit(c) => assert_eq!(c, Color::splat(3.0)),
            other => panic!("expected emission, got {:?}", other),
        }
    }
}
