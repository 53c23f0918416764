//! Axis-aligned cube intersection with the slab method.

use lumen_math::{Interval, Ray, Vec3};

use super::SurfaceHit;

pub(crate) fn hit_cube(center: Vec3, half_size: f32, ray: &Ray, ray_t: Interval) -> Option<SurfaceHit> {
    if !(half_size > 0.0 && half_size.is_finite()) {
        return None;
    }

    let min = center - Vec3::splat(half_size);
    let max = center + Vec3::splat(half_size);
    let origin = ray.origin();
    let direction = ray.direction();

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = 0;
    let mut exit_axis = 0;

    for axis in 0..3 {
        if direction[axis] == 0.0 {
            // Parallel to this slab: must already be between its planes
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction[axis];
        let mut t0 = (min[axis] - origin[axis]) * inv;
        let mut t1 = (max[axis] - origin[axis]) * inv;
        if inv < 0.0 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_enter {
            t_enter = t0;
            enter_axis = axis;
        }
        if t1 < t_exit {
            t_exit = t1;
            exit_axis = axis;
        }
        if t_exit < t_enter {
            return None;
        }
    }

    let (t, axis) = if ray_t.surrounds(t_enter) {
        (t_enter, enter_axis)
    } else if ray_t.surrounds(t_exit) {
        (t_exit, exit_axis)
    } else {
        return None;
    };

    let point = ray.at(t);
    let mut outward_normal = Vec3::ZERO;
    outward_normal[axis] = if point[axis] >= center[axis] { 1.0 } else { -1.0 };

    Some(SurfaceHit {
        t,
        point,
        outward_normal,
    })
}
