//! Point containment with tolerant comparisons

use crate::foundation::math::{near_at_most as at_most, near_zero, Vec3};
use crate::geometry::{Aabb, OrientedBox, Plane, Sphere};

/// Point inside (or on the surface of) an axis-aligned box
pub fn aabb_contains_point(aabb: &Aabb, p: &Vec3) -> bool {
    (0..3).all(|i| at_most(aabb.min[i], p[i]) && at_most(p[i], aabb.max[i]))
}

/// Point inside an oriented box
pub fn obb_contains_point(obb: &OrientedBox, p: &Vec3) -> bool {
    let local = obb.to_local(p);
    (0..3).all(|i| at_most(local[i].abs(), obb.half_extents[i]))
}

/// Point inside a sphere
pub fn sphere_contains_point(sphere: &Sphere, p: &Vec3) -> bool {
    at_most((p - sphere.center).norm_squared(), sphere.radius * sphere.radius)
}

/// Point lying on a plane
pub fn plane_contains_point(plane: &Plane, p: &Vec3) -> bool {
    near_zero(plane.signed_distance(p), plane.normal.dot(p), plane.distance)
}

/// `inner` lies entirely inside `outer`
pub fn aabb_contains_aabb(outer: &Aabb, inner: &Aabb) -> bool {
    aabb_contains_point(outer, &inner.min) && aabb_contains_point(outer, &inner.max)
}
