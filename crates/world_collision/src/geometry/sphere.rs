//! Sphere primitive

use super::Aabb;
use crate::foundation::math::{Iso, Vec3};

/// A sphere for collision queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Axis-aligned box around the sphere
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_extents(self.center, Vec3::repeat(self.radius))
    }

    /// This sphere after a rigid transform
    pub fn transformed(&self, iso: &Iso) -> Self {
        Self {
            center: iso.transform_point(&self.center.into()).coords,
            radius: self.radius,
        }
    }
}
