//! Which side of a plane a shape lies on

use crate::foundation::math::{near_equal, Vec3};
use crate::geometry::{Aabb, OrientedBox, Plane, Segment, Sphere, Triangle};

/// Placement of a shape relative to a plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneSide {
    /// Entirely behind the plane (opposite the normal)
    Inside,
    /// Entirely in front of the plane (along the normal)
    Outside,
    /// Touching or crossing the plane
    Intersecting,
}

impl PlaneSide {
    /// Classify a signed center distance against a projected radius
    #[inline]
    pub fn from_distance(distance: f32, radius: f32) -> Self {
        if distance > radius {
            Self::Outside
        } else if distance < -radius {
            Self::Inside
        } else {
            Self::Intersecting
        }
    }
}

/// Classify a point set: conclusive only when every point agrees in sign
pub fn points(plane: &Plane, points: &[Vec3]) -> PlaneSide {
    let mut front = true;
    let mut back = true;
    for p in points {
        let s = plane.signed_distance(p);
        front &= s > 0.0;
        back &= s < 0.0;
    }
    match (front, back) {
        (true, false) => PlaneSide::Outside,
        (false, true) => PlaneSide::Inside,
        _ => PlaneSide::Intersecting,
    }
}

/// Classify an axis-aligned box by its extreme points along the normal
pub fn aabb(plane: &Plane, aabb: &Aabb) -> PlaneSide {
    let e = aabb.extents();
    let r = e.x * plane.normal.x.abs() + e.y * plane.normal.y.abs() + e.z * plane.normal.z.abs();
    PlaneSide::from_distance(plane.signed_distance(&aabb.center()), r)
}

/// Classify an oriented box by its extreme points along the normal
pub fn obb(plane: &Plane, obb: &OrientedBox) -> PlaneSide {
    let r = obb.projected_radius(&plane.normal);
    PlaneSide::from_distance(plane.signed_distance(&obb.center), r)
}

/// Classify a sphere
pub fn sphere(plane: &Plane, sphere: &Sphere) -> PlaneSide {
    PlaneSide::from_distance(plane.signed_distance(&sphere.center), sphere.radius)
}

/// Classify a triangle by its vertices
pub fn triangle(plane: &Plane, tri: &Triangle) -> PlaneSide {
    points(plane, &tri.vertices())
}

/// Classify a segment by its end points
pub fn segment(plane: &Plane, segment: &Segment) -> PlaneSide {
    points(plane, &[segment.start, segment.end])
}

/// Classify another plane; only parallel planes can be conclusive
pub fn plane(plane: &Plane, other: &Plane) -> PlaneSide {
    let alignment = plane.normal.dot(&other.normal);
    if !near_equal(alignment.abs(), 1.0) {
        return PlaneSide::Intersecting;
    }
    PlaneSide::from_distance(plane.signed_distance(&other.origin()), 0.0)
}
