//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a bounded number of bounces
//! - Optional analytic direct lighting at every surface hit
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction for display output

use std::time::Duration;

use lumen_core::Scene;
use lumen_math::{Color, Ray, Vec4};
use rand::RngCore;

use crate::camera::Viewport;
use crate::lighting::direct_lighting;
use crate::properties::RenderProperties;
use crate::scatter::{Interaction, Scatter};

/// Summary of a finished render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub width: u32,
    pub height: u32,
    /// Number of pixel bunches dispatched
    pub bunches: usize,
    /// Whether bunches ran on the rayon pool
    pub parallel: bool,
    pub elapsed: Duration,
}

impl RenderStats {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Compute the color seen by a ray.
///
/// `depth` is the number of scattered bounces still allowed. The hit itself is
/// always shaded; at depth 0 the scattered contribution is dropped.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    properties: &RenderProperties,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = scene.intersect(ray) else {
        return background(ray, properties);
    };

    let interaction = rec.material.scatter(ray, &rec, properties.samples_per_scatter, rng);

    // Lights end the path
    if let Interaction::Emit(emitted) = interaction {
        return emitted;
    }

    let direct = if properties.enable_direct_lighting {
        direct_lighting(scene, &rec, ray)
    } else {
        Color::ZERO
    };

    match interaction {
        Interaction::Scatter(result) if depth > 0 => {
            let scattered_color = ray_color(&result.scattered, scene, depth - 1, properties, rng);
            direct + result.attenuation * scattered_color
        }
        _ => direct,
    }
}

/// Color for rays that leave the scene.
fn background(ray: &Ray, properties: &RenderProperties) -> Color {
    if properties.use_sky_gradient {
        sky_gradient(ray)
    } else {
        properties.background
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let Some(unit_direction) = ray.direction().try_normalize() else {
        return Color::ONE;
    };
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Average `samples_per_pixel` paths through pixel (x, y).
///
/// With a single sample the ray goes through the pixel center, so a
/// one-sample render is free of jitter.
pub fn render_pixel(
    viewport: &Viewport,
    scene: &Scene,
    x: u32,
    y: u32,
    properties: &RenderProperties,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = properties.samples_per_pixel.max(1);
    let jitter = samples > 1;

    let mut pixel_color = Color::ZERO;
    for _ in 0..samples {
        let ray = viewport.pixel_ray(x, y, jitter, rng);
        pixel_color += ray_color(&ray, scene, properties.max_ray_depth, properties, rng);
    }

    pixel_color / samples as f32
}

/// Turn an averaged radiance into a stored pixel: non-finite channels become
/// 0, the rest are clamped to [0, 1], and alpha is 1.
pub fn finalize_color(color: Color) -> Vec4 {
    let channel = |c: f32| if c.is_finite() { clamp_01(c) } else { 0.0 };
    Vec4::new(channel(color.x), channel(color.y), channel(color.z), 1.0)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

#[inline]
fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a stored pixel to 8-bit RGBA.
pub fn color_to_rgba(color: Vec4) -> [u8; 4] {
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    let a = (255.0 * clamp_01(color.w)) as u8;
    [r, g, b, a]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Camera;
    use lumen_core::{Light, Material, Primitive};
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flat_properties() -> RenderProperties {
        RenderProperties {
            use_sky_gradient: false,
            background: Color::new(0.1, 0.2, 0.3),
            ..RenderProperties::default()
        }
    }

    fn single_sphere(material: Material) -> Scene {
        let mut scene = Scene::new();
        let mat = scene.add_material(material);
        scene.add_primitive(Vec3::new(0.0, 0.0, -3.0), Primitive::sphere(1.0, mat)).unwrap();
        scene
    }

    #[test]
    fn test_sky_gradient() {
        // Ray pointing up should be more blue (less red than white)
        let up_color = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::Y));
        let down_color = sky_gradient(&Ray::new(Vec3::ZERO, -Vec3::Y));

        assert!(
            up_color.x < down_color.x,
            "up_color.x={} should be < down_color.x={}",
            up_color.x,
            down_color.x
        );
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::new();
        let props = flat_properties();
        let mut rng = StdRng::seed_from_u64(1);

        let color = ray_color(&Ray::new(Vec3::ZERO, -Vec3::Z), &scene, 8, &props, &mut rng);
        assert_eq!(color, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_emissive_hit_returns_emission() {
        let scene = single_sphere(Material::emissive(Color::new(2.0, 1.0, 0.5)));
        let props = flat_properties();
        let mut rng = StdRng::seed_from_u64(2);

        let color = ray_color(&Ray::new(Vec3::ZERO, -Vec3::Z), &scene, 0, &props, &mut rng);
        assert_eq!(color, Color::new(2.0, 1.0, 0.5));
    }

    #[test]
    fn test_zero_depth_drops_scattered_light() {
        let scene = single_sphere(Material::lambertian(Color::splat(0.9)));
        let mut props = flat_properties();
        props.background = Color::ONE;
        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        assert_eq!(ray_color(&ray, &scene, 0, &props, &mut rng), Color::ZERO);
        // One bounce off the front of the sphere escapes to the background
        let color = ray_color(&ray, &scene, 1, &props, &mut rng);
        assert!((color - Color::splat(0.9)).length() < 1e-5, "{:?}", color);
    }

    #[test]
    fn test_direct_lighting_at_zero_depth() {
        let mut scene = single_sphere(Material::lambertian(Color::ONE));
        scene.add_light(Vec3::ZERO, Light::new(Color::splat(0.1), Color::ZERO, Color::ZERO, 1.0));
        let mut props = flat_properties();
        props.enable_direct_lighting = true;
        let mut rng = StdRng::seed_from_u64(4);

        let color = ray_color(&Ray::new(Vec3::ZERO, -Vec3::Z), &scene, 0, &props, &mut rng);
        assert!((color - Color::splat(0.1)).length() < 1e-5, "{:?}", color);
    }

    #[test]
    fn test_finalize_color() {
        let c = finalize_color(Color::new(f32::NAN, 2.0, -1.0));
        assert_eq!(c, Vec4::new(0.0, 1.0, 0.0, 1.0));

        let c = finalize_color(Color::new(f32::INFINITY, 0.25, 0.5));
        assert_eq!(c, Vec4::new(0.0, 0.25, 0.5, 1.0));
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Vec4::new(1.0, 0.0, 0.25, 1.0)), [255, 0, 127, 255]);
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let scene = single_sphere(Material::lambertian(Color::splat(0.5)));
        let camera = Camera::new(Vec3::ZERO, -Vec3::Z, (11, 11));
        let mut props = flat_properties();
        props.background = Color::ONE;
        let mut rng = StdRng::seed_from_u64(42);

        let center = render_pixel(&camera.viewport(), &scene, 5, 5, &props, &mut rng);
        // Corner ray misses the sphere entirely
        let corner = render_pixel(&camera.viewport(), &scene, 0, 0, &props, &mut rng);

        assert!(center.length() > 0.0);
        assert!(center.x < 1.0);
        assert_eq!(corner, Color::ONE);
    }

    #[test]
    fn test_more_samples_lower_variance() {
        let mut scene = Scene::new();
        let mat = scene.add_material(Material::lambertian(Color::splat(0.7)));
        scene.add_primitive(Vec3::new(0.0, -1.0, 0.0), Primitive::plane(Vec3::Y, mat)).unwrap();

        let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, -1.0, -1.0), (8, 8));
        let viewport = camera.viewport();

        let variance = |spp: u32| {
            let props = RenderProperties {
                samples_per_pixel: spp,
                ..RenderProperties::default()
            };
            let values: Vec<f32> = (0..64)
                .map(|seed| {
                    let mut rng = StdRng::seed_from_u64(seed);
                    render_pixel(&viewport, &scene, 4, 4, &props, &mut rng).x
                })
                .collect();
            let mean = values.iter().sum::<f32>() / values.len() as f32;
            values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
        };

        assert!(variance(32) < variance(2));
    }
}
