//! Infinite plane intersection.

use lumen_math::{Interval, Ray, Vec3};

use super::SurfaceHit;

/// Below this |n·d| the ray is treated as parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

pub(crate) fn hit_plane(point: Vec3, normal: Vec3, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
    let normal = normal.try_normalize()?;

    let denom = normal.dot(ray.direction());
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (point - ray.origin()).dot(normal) / denom;
    if !ray_t.surrounds(t) {
        return None;
    }

    Some(SurfaceHit {
        t,
        point: ray.at(t),
        outward_normal: normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = hit_plane(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), &ray, Interval::new(0.001, f32::INFINITY))
            .expect("hit");

        assert!((hit.t - 3.0).abs() < 1e-5);
        assert_eq!(hit.outward_normal, Vec3::Y);
    }

    #[test]
    fn test_plane_parallel_and_behind() {
        let interval = Interval::new(0.001, f32::INFINITY);
        let parallel = Ray::new(Vec3::Y, Vec3::X);
        assert!(hit_plane(Vec3::ZERO, Vec3::Y, &parallel, interval).is_none());

        let away = Ray::new(Vec3::Y, Vec3::Y);
        assert!(hit_plane(Vec3::ZERO, Vec3::Y, &away, interval).is_none());
    }

    #[test]
    fn test_zero_normal_never_hits() {
        let ray = Ray::new(Vec3::Y, -Vec3::Y);
        assert!(hit_plane(Vec3::ZERO, Vec3::ZERO, &ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }
}
