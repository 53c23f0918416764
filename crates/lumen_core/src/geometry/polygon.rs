//! Triangle intersection using the Möller-Trumbore algorithm.

use lumen_math::{Interval, Ray, Vec3};

use super::SurfaceHit;

/// Determinant threshold for rays parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-8;
/// Squared cross-product length under which a triangle has no area.
const AREA_EPSILON: f32 = 1e-12;

pub(crate) fn hit_polygon(vertices: [Vec3; 3], ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
    let [v0, v1, v2] = vertices;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let face = edge1.cross(edge2);
    if !(face.length_squared() > AREA_EPSILON) {
        return None;
    }

    let h = ray.direction().cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray_t.surrounds(t) {
        return None;
    }

    Some(SurfaceHit {
        t,
        point: ray.at(t),
        outward_normal: face.normalize(),
    })
}
