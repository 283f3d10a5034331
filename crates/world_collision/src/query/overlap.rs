//! Overlap tests that are not Separating Axis Theorem tests
//!
//! Sphere tests all go through the closest point on the other shape. Plane
//! tests use the side classifier. Segment tests reuse the casting code.

use super::closest;
use super::raycast;
use super::side::{self, PlaneSide};
use crate::foundation::math::{near_equal, near_zero, Vec3, EPSILON};
use crate::geometry::{Aabb, OrientedBox, Plane, Ray, Segment, Sphere, Triangle};

#[inline]
fn within(sphere: &Sphere, closest: &Vec3) -> bool {
    (closest - sphere.center).norm_squared() <= sphere.radius * sphere.radius
}

/// Sphere against sphere
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    let r = a.radius + b.radius;
    (a.center - b.center).norm_squared() <= r * r
}

/// Sphere against axis-aligned box
pub fn sphere_aabb(sphere: &Sphere, aabb: &Aabb) -> bool {
    within(sphere, &closest::point_aabb(&sphere.center, aabb))
}

/// Sphere against oriented box
pub fn sphere_obb(sphere: &Sphere, obb: &OrientedBox) -> bool {
    within(sphere, &closest::point_obb(&sphere.center, obb))
}

/// Sphere against triangle (never true for the sentinel)
pub fn sphere_triangle(sphere: &Sphere, tri: &Triangle) -> bool {
    within(sphere, &closest::point_triangle(&sphere.center, tri))
}

/// Sphere against plane
pub fn sphere_plane(sphere: &Sphere, plane: &Plane) -> bool {
    within(sphere, &closest::point_plane(&sphere.center, plane))
}

/// Sphere against segment
pub fn sphere_segment(sphere: &Sphere, segment: &Segment) -> bool {
    within(sphere, &closest::point_segment(&sphere.center, segment))
}

/// Plane against axis-aligned box
pub fn plane_aabb(plane: &Plane, aabb: &Aabb) -> bool {
    side::aabb(plane, aabb) == PlaneSide::Intersecting
}

/// Plane against oriented box
pub fn plane_obb(plane: &Plane, obb: &OrientedBox) -> bool {
    side::obb(plane, obb) == PlaneSide::Intersecting
}

/// Plane against triangle
pub fn plane_triangle(plane: &Plane, tri: &Triangle) -> bool {
    !tri.is_nan() && side::triangle(plane, tri) == PlaneSide::Intersecting
}

/// Plane against segment
pub fn plane_segment(plane: &Plane, segment: &Segment) -> bool {
    side::segment(plane, segment) == PlaneSide::Intersecting
}

/// Plane against plane: any non-parallel pair meets; parallel ones must coincide
pub fn plane_plane(a: &Plane, b: &Plane) -> bool {
    let alignment = a.normal.dot(&b.normal);
    if !near_equal(alignment.abs(), 1.0) {
        return true;
    }
    let offset = a.signed_distance(&b.origin());
    near_zero(offset, a.distance, b.distance)
}

/// Segment against axis-aligned box, including segments inside the box
pub fn segment_aabb(segment: &Segment, aabb: &Aabb) -> bool {
    if super::containment::aabb_contains_point(aabb, &segment.start) {
        return true;
    }
    raycast::segment_cast(segment, |ray| raycast::ray_aabb(ray, aabb)).is_some()
}

/// Segment against oriented box, including segments inside the box
pub fn segment_obb(segment: &Segment, obb: &OrientedBox) -> bool {
    if super::containment::obb_contains_point(obb, &segment.start) {
        return true;
    }
    raycast::segment_cast(segment, |ray| raycast::ray_obb(ray, obb)).is_some()
}

/// Segment crossing a triangle from either side
///
/// A zero-length segment is a point and touches the triangle only when it
/// lies on it, within rounding.
pub fn segment_triangle(segment: &Segment, tri: &Triangle) -> bool {
    let (ray, length) = segment.to_ray();
    if ray.is_degenerate() {
        let point = segment.start;
        let gap = (closest::point_triangle(&point, tri) - point).norm();
        return near_zero(gap, point.norm(), 0.0);
    }
    let hits = |r: &Ray, t: &Triangle| {
        raycast::ray_triangle_distance(r, t).is_some_and(|d| d <= length + EPSILON * length.max(1.0))
    };
    // Flipping the winding turns the back face into a front face
    let flipped = Triangle::new(tri.a, tri.c, tri.b);
    hits(&ray, tri) || hits(&ray, &flipped)
}
