//! Analytic direct lighting from point lights.
//!
//! Ambient + Lambert diffuse + Phong specular per light, evaluated at a hit
//! without shadow rays. It is added on top of the path-traced estimate to
//! brighten and de-noise scenes lit mainly by point lights.

use lumen_core::{HitRecord, Scene};
use lumen_math::{Color, Ray};

use crate::scatter::reflect;

/// Sum the contribution of every light in the scene at `rec`.
pub fn direct_lighting(scene: &Scene, rec: &HitRecord, ray: &Ray) -> Color {
    let kd = rec.material.diffuse();
    let ks = rec.material.specular();
    let n = rec.normal;
    let Some(view) = (-ray.direction()).try_normalize() else {
        return Color::ZERO;
    };

    let mut total = Color::ZERO;
    for (_, light) in scene.lights() {
        total += light.ambient * kd;

        let Some(l) = (light.position - rec.point).try_normalize() else {
            continue;
        };

        let cos_l = n.dot(l);
        if cos_l <= 0.0 {
            continue;
        }
        total += light.diffuse * kd * cos_l;

        let r = reflect(-l, n);
        let highlight = r.dot(view).max(0.0).powf(light.power.max(0.0));
        total += light.specular * ks * highlight;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Light, Material, Primitive};
    use lumen_math::Vec3;

    fn lit_plane(light_position: Vec3, light: Light) -> Scene {
        let mut scene = Scene::new();
        let mut mat = Material::lambertian(Color::new(1.0, 0.5, 0.25));
        mat.set_specular(Color::ONE);
        let mat = scene.add_material(mat);
        scene.add_primitive(Vec3::ZERO, Primitive::plane(Vec3::Y, mat)).unwrap();
        scene.add_light(light_position, light);
        scene
    }

    #[test]
    fn test_light_overhead_full_diffuse_and_specular() {
        let scene = lit_plane(Vec3::new(0.0, 5.0, 0.0), Light::new(Color::ZERO, Color::ONE, Color::ONE, 8.0));
        // Looking straight down: mirror direction of the light hits the eye
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);
        let rec = scene.intersect(&ray).unwrap();

        let c = direct_lighting(&scene, &rec, &ray);
        // diffuse kd * 1 + specular ks * 1
        assert!((c - (Color::new(1.0, 0.5, 0.25) + Color::ONE)).length() < 1e-4);
    }

    #[test]
    fn test_light_below_surface_gives_ambient_only() {
        let scene = lit_plane(
            Vec3::new(0.0, -5.0, 0.0),
            Light::new(Color::splat(0.1), Color::ONE, Color::ONE, 8.0),
        );
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);
        let rec = scene.intersect(&ray).unwrap();

        let c = direct_lighting(&scene, &rec, &ray);
        assert!((c - Color::new(0.1, 0.05, 0.025)).length() < 1e-5);
    }

    #[test]
    fn test_grazing_light_is_dimmer() {
        let overhead = lit_plane(Vec3::new(0.0, 5.0, 0.0), Light::new(Color::ZERO, Color::ONE, Color::ZERO, 1.0));
        let grazing = lit_plane(Vec3::new(10.0, 1.0, 0.0), Light::new(Color::ZERO, Color::ONE, Color::ZERO, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y);

        let a = direct_lighting(&overhead, &overhead.intersect(&ray).unwrap(), &ray);
        let b = direct_lighting(&grazing, &grazing.intersect(&ray).unwrap(), &ray);
        assert!(b.x < a.x);
        assert!(b.x > 0.0);
    }
}
