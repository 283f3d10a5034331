//! Closed set of query shapes and the pairwise dispatch table

use super::side::{self, PlaneSide};
use super::{closest, containment, overlap, raycast, sat};
use crate::error::QueryError;
use crate::foundation::math::{Iso, Quat, Vec3};
use crate::geometry::{Aabb, OrientedBox, Plane, Ray, Raycast, Segment, Sphere, Triangle};

/// Any primitive that can be used as a query shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box
    Aabb(Aabb),
    /// Oriented box
    Obb(OrientedBox),
    /// Sphere
    Sphere(Sphere),
    /// Triangle
    Triangle(Triangle),
    /// Infinite plane
    Plane(Plane),
    /// Line segment
    Segment(Segment),
}

impl From<Aabb> for Shape {
    fn from(v: Aabb) -> Self {
        Self::Aabb(v)
    }
}

impl From<OrientedBox> for Shape {
    fn from(v: OrientedBox) -> Self {
        Self::Obb(v)
    }
}

impl From<Sphere> for Shape {
    fn from(v: Sphere) -> Self {
        Self::Sphere(v)
    }
}

impl From<Triangle> for Shape {
    fn from(v: Triangle) -> Self {
        Self::Triangle(v)
    }
}

impl From<Plane> for Shape {
    fn from(v: Plane) -> Self {
        Self::Plane(v)
    }
}

impl From<Segment> for Shape {
    fn from(v: Segment) -> Self {
        Self::Segment(v)
    }
}

impl Shape {
    /// Short name used in [`QueryError`] messages
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Aabb(_) => "aabb",
            Self::Obb(_) => "oriented box",
            Self::Sphere(_) => "sphere",
            Self::Triangle(_) => "triangle",
            Self::Plane(_) => "plane",
            Self::Segment(_) => "segment",
        }
    }

    /// Position in the dispatch table ordering
    const fn rank(&self) -> u8 {
        match self {
            Self::Aabb(_) => 0,
            Self::Obb(_) => 1,
            Self::Sphere(_) => 2,
            Self::Triangle(_) => 3,
            Self::Plane(_) => 4,
            Self::Segment(_) => 5,
        }
    }

    /// Axis-aligned box around the shape; `None` for unbounded planes
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Self::Aabb(b) => Some(*b),
            Self::Obb(b) => Some(b.bounds()),
            Self::Sphere(s) => Some(s.bounds()),
            Self::Triangle(t) => Some(t.bounds()),
            Self::Plane(_) => None,
            Self::Segment(s) => Some(Aabb::from_points(&[s.start, s.end])),
        }
    }

    /// Point that intersection results are measured from
    pub fn reference_point(&self) -> Vec3 {
        match self {
            Self::Aabb(b) => b.center(),
            Self::Obb(b) => b.center,
            Self::Sphere(s) => s.center,
            Self::Triangle(t) => t.centroid(),
            Self::Plane(p) => p.origin(),
            Self::Segment(s) => s.midpoint(),
        }
    }

    /// The shape moved by a rigid transform
    ///
    /// A box stays axis-aligned only when the rotation is the identity;
    /// otherwise it becomes an oriented box.
    pub fn transformed(&self, iso: &Iso) -> Self {
        match self {
            Self::Aabb(b) if iso.rotation == Quat::identity() => {
                let offset = iso.translation.vector;
                Self::Aabb(Aabb::new(b.min + offset, b.max + offset))
            }
            Self::Aabb(b) => Self::Obb(OrientedBox::from_aabb(b).transformed(iso)),
            Self::Obb(b) => Self::Obb(b.transformed(iso)),
            Self::Sphere(s) => Self::Sphere(s.transformed(iso)),
            Self::Triangle(t) => Self::Triangle(t.transformed(iso)),
            Self::Plane(p) => Self::Plane(p.transformed(iso)),
            Self::Segment(s) => Self::Segment(s.transformed(iso)),
        }
    }

    /// Which side of `plane` the shape lies on
    pub fn classify(&self, plane: &Plane) -> PlaneSide {
        match self {
            Self::Aabb(b) => side::aabb(plane, b),
            Self::Obb(b) => side::obb(plane, b),
            Self::Sphere(s) => side::sphere(plane, s),
            Self::Triangle(t) => side::triangle(plane, t),
            Self::Plane(p) => side::plane(plane, p),
            Self::Segment(s) => side::segment(plane, s),
        }
    }

    /// Overlap with a mesh triangle; defined for every shape
    pub fn intersects_triangle(&self, tri: &Triangle) -> bool {
        match self {
            Self::Aabb(b) => sat::triangle_aabb(tri, b),
            Self::Obb(b) => sat::triangle_obb(tri, b),
            Self::Sphere(s) => overlap::sphere_triangle(s, tri),
            Self::Triangle(t) => sat::triangle_triangle(t, tri),
            Self::Plane(p) => overlap::plane_triangle(p, tri),
            Self::Segment(s) => overlap::segment_triangle(s, tri),
        }
    }

    /// Overlap with an axis-aligned box; defined for every shape
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        match self {
            Self::Aabb(b) => sat::aabb_aabb(b, aabb),
            Self::Obb(b) => sat::aabb_obb(aabb, b),
            Self::Sphere(s) => overlap::sphere_aabb(s, aabb),
            Self::Triangle(t) => sat::triangle_aabb(t, aabb),
            Self::Plane(p) => overlap::plane_aabb(p, aabb),
            Self::Segment(s) => overlap::segment_aabb(s, aabb),
        }
    }

    /// Closest point of the shape to `p`
    pub fn closest_point(&self, p: &Vec3) -> Vec3 {
        match self {
            Self::Aabb(b) => closest::point_aabb(p, b),
            Self::Obb(b) => closest::point_obb(p, b),
            Self::Sphere(s) => closest::point_sphere(p, s),
            Self::Triangle(t) => closest::point_triangle(p, t),
            Self::Plane(pl) => closest::point_plane(p, pl),
            Self::Segment(s) => closest::point_segment(p, s),
        }
    }

    /// Whether the shape contains a point (lies on it, for a plane)
    pub fn contains_point(&self, p: &Vec3) -> Result<bool, QueryError> {
        match self {
            Self::Aabb(b) => Ok(containment::aabb_contains_point(b, p)),
            Self::Obb(b) => Ok(containment::obb_contains_point(b, p)),
            Self::Sphere(s) => Ok(containment::sphere_contains_point(s, p)),
            Self::Plane(pl) => Ok(containment::plane_contains_point(pl, p)),
            Self::Triangle(_) | Self::Segment(_) => {
                Err(QueryError::not_implemented("contains", self.kind(), "point"))
            }
        }
    }

    /// Cast a ray against the shape
    pub fn cast(&self, ray: &Ray) -> Result<Option<Raycast>, QueryError> {
        match self {
            Self::Aabb(b) => Ok(raycast::ray_aabb(ray, b)),
            Self::Obb(b) => Ok(raycast::ray_obb(ray, b)),
            Self::Sphere(s) => Ok(raycast::ray_sphere(ray, s)),
            Self::Triangle(t) => Ok(raycast::ray_triangle(ray, t)),
            Self::Plane(p) => Ok(raycast::ray_plane(ray, p)),
            Self::Segment(_) => Err(QueryError::not_implemented("cast", "ray", self.kind())),
        }
    }

    /// Cast a segment against the shape; hits past its end are dropped
    pub fn cast_segment(&self, segment: &Segment) -> Result<Option<Raycast>, QueryError> {
        let (ray, length) = segment.to_ray();
        Ok(self.cast(&ray)?.filter(|hit| hit.distance <= length))
    }
}

/// Overlap test between two arbitrary shapes
///
/// Symmetric: `intersects(a, b) == intersects(b, a)`. Segment against segment
/// has no routine and reports [`QueryError::NotImplemented`].
pub fn intersects(a: &Shape, b: &Shape) -> Result<bool, QueryError> {
    use Shape as S;

    let (a, b) = if a.rank() <= b.rank() { (a, b) } else { (b, a) };
    let hit = match (a, b) {
        (S::Aabb(x), S::Aabb(y)) => sat::aabb_aabb(x, y),
        (S::Aabb(x), S::Obb(y)) => sat::aabb_obb(x, y),
        (S::Aabb(x), S::Sphere(y)) => overlap::sphere_aabb(y, x),
        (S::Aabb(x), S::Triangle(y)) => sat::triangle_aabb(y, x),
        (S::Aabb(x), S::Plane(y)) => overlap::plane_aabb(y, x),
        (S::Aabb(x), S::Segment(y)) => overlap::segment_aabb(y, x),

        (S::Obb(x), S::Obb(y)) => sat::obb_obb(x, y),
        (S::Obb(x), S::Sphere(y)) => overlap::sphere_obb(y, x),
        (S::Obb(x), S::Triangle(y)) => sat::triangle_obb(y, x),
        (S::Obb(x), S::Plane(y)) => overlap::plane_obb(y, x),
        (S::Obb(x), S::Segment(y)) => overlap::segment_obb(y, x),

        (S::Sphere(x), S::Sphere(y)) => overlap::sphere_sphere(x, y),
        (S::Sphere(x), S::Triangle(y)) => overlap::sphere_triangle(x, y),
        (S::Sphere(x), S::Plane(y)) => overlap::sphere_plane(x, y),
        (S::Sphere(x), S::Segment(y)) => overlap::sphere_segment(x, y),

        (S::Triangle(x), S::Triangle(y)) => sat::triangle_triangle(x, y),
        (S::Triangle(x), S::Plane(y)) => overlap::plane_triangle(y, x),
        (S::Triangle(x), S::Segment(y)) => overlap::segment_triangle(y, x),

        (S::Plane(x), S::Plane(y)) => overlap::plane_plane(x, y),
        (S::Plane(x), S::Segment(y)) => overlap::plane_segment(x, y),

        // Segment against segment; every other pair is rank ordered above
        _ => return Err(QueryError::not_implemented("intersects", a.kind(), b.kind())),
    };
    Ok(hit)
}
