//! Oriented bounding box

use super::Aabb;
use crate::foundation::math::{Iso, Quat, Vec3};

/// A box with arbitrary orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    /// Center in world space
    pub center: Vec3,
    /// Half extents along the box's local axes
    pub half_extents: Vec3,
    /// Orientation of the local axes
    pub rotation: Quat,
}

impl OrientedBox {
    /// Create a new oriented box
    pub fn new(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// Oriented box covering an axis-aligned box
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.center(), aabb.extents(), Quat::identity())
    }

    /// The three unit local axes in world space
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.rotation * Vec3::x(),
            self.rotation * Vec3::y(),
            self.rotation * Vec3::z(),
        ]
    }

    /// World point to box-local coordinates (box center at the origin)
    #[inline]
    pub fn to_local(&self, p: &Vec3) -> Vec3 {
        self.rotation.inverse_transform_vector(&(p - self.center))
    }

    /// Local direction to world space
    #[inline]
    pub fn direction_to_world(&self, v: &Vec3) -> Vec3 {
        self.rotation * v
    }

    /// Local point to world space
    #[inline]
    pub fn point_to_world(&self, p: &Vec3) -> Vec3 {
        self.center + self.rotation * p
    }

    /// The eight corners in world space
    pub fn corners(&self) -> [Vec3; 8] {
        let local = Aabb::from_center_extents(Vec3::zeros(), self.half_extents).corners();
        local.map(|c| self.point_to_world(&c))
    }

    /// Radius of the box's projection onto a (not necessarily unit) axis
    pub fn projected_radius(&self, axis: &Vec3) -> f32 {
        self.axes()
            .iter()
            .zip(self.half_extents.iter())
            .map(|(a, h)| h * a.dot(axis).abs())
            .sum()
    }

    /// Axis-aligned box around this box
    pub fn bounds(&self) -> Aabb {
        let r = Vec3::new(
            self.projected_radius(&Vec3::x()),
            self.projected_radius(&Vec3::y()),
            self.projected_radius(&Vec3::z()),
        );
        Aabb::from_center_extents(self.center, r)
    }

    /// This box after a rigid transform
    pub fn transformed(&self, iso: &Iso) -> Self {
        Self {
            center: iso.transform_point(&self.center.into()).coords,
            half_extents: self.half_extents,
            rotation: iso.rotation * self.rotation,
        }
    }
}
