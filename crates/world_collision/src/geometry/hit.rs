//! Query results

use super::Triangle;
use crate::foundation::math::{Iso, Vec3};

/// Identity of a triangle inside the world: chunk index plus in-chunk index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId {
    /// Chunk index
    pub chunk: u32,
    /// Triangle index inside the chunk's triangle array
    pub triangle: u32,
}

impl TriangleId {
    /// Create a triangle identity
    pub const fn new(chunk: u32, triangle: u32) -> Self {
        Self { chunk, triangle }
    }
}

/// Nearest hit of a ray or segment cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raycast {
    /// Distance along the (unit) ray direction
    pub distance: f32,
    /// Hit point, equal to `origin + distance * direction`
    pub point: Vec3,
    /// Surface normal at the hit
    pub normal: Vec3,
    /// Hit triangle, when the target was a mesh triangle
    pub triangle: Option<TriangleId>,
}

impl Raycast {
    /// Create a result without triangle identity
    pub fn new(distance: f32, point: Vec3, normal: Vec3) -> Self {
        Self {
            distance,
            point,
            normal,
            triangle: None,
        }
    }

    /// Attach a triangle identity
    #[must_use]
    pub fn with_triangle(mut self, id: TriangleId) -> Self {
        self.triangle = Some(id);
        self
    }

    /// The closer of two optional hits; ties keep `a`
    pub fn nearest(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Move point and normal by a rigid transform; distance is preserved
    #[must_use]
    pub fn transformed(mut self, iso: &Iso) -> Self {
        self.point = iso.transform_point(&self.point.into()).coords;
        self.normal = iso.rotation * self.normal;
        self
    }
}

/// One triangle overlapped by a query shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Closest point on the triangle to the shape's reference point
    pub point: Vec3,
    /// The triangle that was hit
    pub triangle: Triangle,
    /// Identity of the triangle record, when known
    pub triangle_id: Option<TriangleId>,
}

impl Intersection {
    /// Move point and triangle by a rigid transform
    #[must_use]
    pub fn transformed(mut self, iso: &Iso) -> Self {
        self.point = iso.transform_point(&self.point.into()).coords;
        self.triangle = self.triangle.transformed(iso);
        self
    }
}
