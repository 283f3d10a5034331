//! Ray casts against single primitives
//!
//! All routines expect a ray built with [`Ray::new`] (unit or zero direction)
//! and return `None` for a degenerate ray. Results carry no triangle identity;
//! the tree layers attach it.

use crate::foundation::math::{Axis, Vec3, EPSILON};
use crate::geometry::{Aabb, OrientedBox, Plane, Ray, Raycast, Segment, Sphere, Triangle};

/// Ray against sphere: first non-negative root of the quadratic
pub fn ray_sphere(ray: &Ray, sphere: &Sphere) -> Option<Raycast> {
    if ray.is_degenerate() {
        return None;
    }

    // |origin + t*direction - center|^2 = radius^2 with a unit direction
    let oc = ray.origin - sphere.center;
    let b = oc.dot(&ray.direction);
    let c = oc.norm_squared() - sphere.radius * sphere.radius;
    let discriminant = b * b - c;
    if !(discriminant >= 0.0) {
        return None;
    }

    let root = discriminant.sqrt();
    let t = if -b - root >= 0.0 {
        -b - root
    } else if -b + root >= 0.0 {
        -b + root
    } else {
        return None;
    };

    let point = ray.point_at(t);
    let normal = (point - sphere.center)
        .try_normalize(f32::MIN_POSITIVE)
        .unwrap_or(-ray.direction);
    Some(Raycast::new(t, point, normal))
}

/// Slab intersection against a box given as min/max in the ray's frame
///
/// Returns entry distance and entry normal; an origin inside the box yields
/// distance zero with the normal facing back along the ray.
fn slab(origin: &Vec3, direction: &Vec3, min: &Vec3, max: &Vec3) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = Axis::X;

    for axis in Axis::ALL {
        let i = axis.index();
        let (o, d) = (origin[i], direction[i]);
        if d == 0.0 {
            // Parallel to this slab: must already be between its planes
            if !(o >= min[i] && o <= max[i]) {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (t0, t1) = {
            let a = (min[i] - o) * inv;
            let b = (max[i] - o) * inv;
            if a <= b { (a, b) } else { (b, a) }
        };

        if t0 > t_enter {
            t_enter = t0;
            enter_axis = axis;
        }
        t_exit = t_exit.min(t1);

        if !(t_enter <= t_exit) {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }

    if t_enter <= 0.0 {
        return Some((0.0, -direction));
    }

    let mut normal = Vec3::zeros();
    normal[enter_axis.index()] = -direction[enter_axis.index()].signum();
    Some((t_enter, normal))
}

/// Ray against axis-aligned box (slab method)
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<Raycast> {
    if ray.is_degenerate() || aabb.is_empty() {
        return None;
    }
    let (t, normal) = slab(&ray.origin, &ray.direction, &aabb.min, &aabb.max)?;
    Some(Raycast::new(t, ray.point_at(t), normal))
}

/// Ray against oriented box: slab method in the box's local axes
pub fn ray_obb(ray: &Ray, obb: &OrientedBox) -> Option<Raycast> {
    if ray.is_degenerate() {
        return None;
    }
    let origin = obb.to_local(&ray.origin);
    let direction = obb.rotation.inverse_transform_vector(&ray.direction);
    let (t, normal) = slab(&origin, &direction, &(-obb.half_extents), &obb.half_extents)?;
    Some(Raycast::new(t, ray.point_at(t), obb.direction_to_world(&normal)))
}

/// Ray against plane; only rays travelling against the normal can hit
pub fn ray_plane(ray: &Ray, plane: &Plane) -> Option<Raycast> {
    let denom = plane.normal.dot(&ray.direction);
    if !(denom < -EPSILON) {
        return None;
    }
    let t = -plane.signed_distance(&ray.origin) / denom;
    if !(t >= 0.0) {
        return None;
    }
    Some(Raycast::new(t, ray.point_at(t), plane.normal))
}

/// Distance along the ray to a triangle's front face
///
/// Möller–Trumbore with edges taken as `c - a` then `b - a`, so a positive
/// determinant means the ray travels against the face normal. A near-zero or
/// negative determinant (parallel or back face) is rejected, as is every
/// test against the NaN sentinel.
pub fn ray_triangle_distance(ray: &Ray, tri: &Triangle) -> Option<f32> {
    let edge1 = tri.c - tri.a;
    let edge2 = tri.b - tri.a;

    let h = ray.direction.cross(&edge2);
    let det = edge1.dot(&h);
    let scale = (edge1.norm_squared() * edge2.norm_squared()).sqrt();
    if !(det > EPSILON * scale) {
        return None;
    }

    let f = 1.0 / det;
    let s = ray.origin - tri.a;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if !(v >= 0.0 && u + v <= 1.0) {
        return None;
    }

    let t = f * edge2.dot(&q);
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Ray against triangle front face
pub fn ray_triangle(ray: &Ray, tri: &Triangle) -> Option<Raycast> {
    let t = ray_triangle_distance(ray, tri)?;
    Some(Raycast::new(t, ray.point_at(t), tri.normal()))
}

/// Wrap a ray cast so hits past the segment's end are dropped
pub fn segment_cast<F>(segment: &Segment, cast: F) -> Option<Raycast>
where
    F: FnOnce(&Ray) -> Option<Raycast>,
{
    let (ray, length) = segment.to_ray();
    cast(&ray).filter(|hit| hit.distance <= length)
}
