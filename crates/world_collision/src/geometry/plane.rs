//! Infinite plane

use crate::foundation::math::{Axis, Iso, Vec3};

/// Plane defined by a unit normal and its offset: `normal · x = distance`
///
/// The side the normal points to is the "front" (outside) half-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector
    pub normal: Vec3,
    /// Offset along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from a normal (normalized here) and offset
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalize(),
            distance,
        }
    }

    /// Plane through `point` with the given normal
    pub fn from_point_normal(point: &Vec3, normal: &Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Axis-aligned plane `axis = value` facing the positive axis direction
    pub fn axis_aligned(axis: Axis, value: f32) -> Self {
        Self {
            normal: axis.unit(),
            distance: value,
        }
    }

    /// Signed distance from the plane to a point (positive in front)
    #[inline]
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Orthogonal projection of a point onto the plane
    pub fn project(&self, point: &Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// A point lying on the plane
    pub fn origin(&self) -> Vec3 {
        self.normal * self.distance
    }

    /// This plane after a rigid transform
    pub fn transformed(&self, iso: &Iso) -> Self {
        let normal = iso.rotation * self.normal;
        let origin = iso.transform_point(&self.origin().into()).coords;
        Self {
            normal,
            distance: normal.dot(&origin),
        }
    }
}
