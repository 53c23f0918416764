//! Sphere intersection via the ray-sphere quadratic.

use lumen_math::{Interval, Ray, Vec3};

use super::SurfaceHit;

pub(crate) fn hit_sphere(center: Vec3, radius: f32, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
    if !(radius > 0.0 && radius.is_finite()) {
        return None;
    }

    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    if a == 0.0 {
        return None;
    }
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let point = ray.at(root);
    Some(SurfaceHit {
        t: root,
        point,
        outward_normal: (point - center) / radius,
    })
}
