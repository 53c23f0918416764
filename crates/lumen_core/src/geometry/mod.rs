//! Analytic ray intersection for every primitive shape.
//!
//! Each routine returns the nearest hit strictly inside `ray_t`, or `None`.
//! Degenerate shapes (non-positive sizes, zero-length normals, zero-area
//! triangles, non-finite parameters) never hit, so NaN/Inf cannot leak
//! into a hit record.

mod cube;
mod plane;
mod polygon;
mod sphere;

use lumen_math::{Interval, Ray, Vec3};

use crate::primitive::{Primitive, Shape};

pub(crate) use cube::hit_cube;
pub(crate) use plane::hit_plane;
pub(crate) use polygon::hit_polygon;
pub(crate) use sphere::hit_sphere;

/// Geometric result of a ray-shape intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Ray parameter of the hit
    pub t: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Unit normal pointing out of the surface
    pub outward_normal: Vec3,
}

impl SurfaceHit {
    /// Guard used by every shape before reporting a hit.
    fn finite(self) -> Option<Self> {
        if self.t.is_finite() && self.point.is_finite() && self.outward_normal.is_finite() {
            Some(self)
        } else {
            None
        }
    }
}

impl Primitive {
    /// Intersect the primitive with a ray.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
        let position = self.position();
        let hit = match self.shape() {
            Shape::Sphere { radius } => hit_sphere(position, *radius, ray, ray_t),
            Shape::Plane { normal } => hit_plane(position, *normal, ray, ray_t),
            Shape::Polygon { vertices } => hit_polygon(
                [
                    position + vertices[0],
                    position + vertices[1],
                    position + vertices[2],
                ],
                ray,
                ray_t,
            ),
            Shape::Cube { half_size } => hit_cube(position, *half_size, ray, ray_t),
        };
        hit.and_then(SurfaceHit::finite)
    }
}
