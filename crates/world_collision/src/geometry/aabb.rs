//! Axis-aligned bounding box

use crate::foundation::math::{vmax, vmin, Axis, Iso, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box
///
/// Used both as a query shape and as the coarse box of chunks and worlds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// An inverted box that any point or box will grow
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Smallest box around a set of points, skipping NaN points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    /// True when no point has been added to an [`Aabb::empty`] box
    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z)
    }

    /// Expand to include a point; NaN points leave the box unchanged
    pub fn grow(&mut self, p: &Vec3) {
        if p.iter().any(|c| c.is_nan()) {
            return;
        }
        self.min = vmin(&self.min, p);
        self.max = vmax(&self.max, p);
    }

    /// Union of two boxes
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: vmin(&self.min, &other.min),
            max: vmax(&self.max, &other.max),
        }
    }

    /// Box grown by `margin` on every side
    pub fn inflated(&self, margin: f32) -> Self {
        let delta = Vec3::repeat(margin);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Lower bound along one axis
    #[inline]
    pub fn min_on(&self, axis: Axis) -> f32 {
        axis.component(&self.min)
    }

    /// Upper bound along one axis
    #[inline]
    pub fn max_on(&self, axis: Axis) -> f32 {
        axis.component(&self.max)
    }

    /// The eight corners, bit `i` of the index selecting max on axis `i`
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::zeros(); 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if i & 1 != 0 { self.max.x } else { self.min.x },
                if i & 2 != 0 { self.max.y } else { self.min.y },
                if i & 4 != 0 { self.max.z } else { self.min.z },
            );
        }
        corners
    }

    /// True when `other` lies inside this box grown by `tolerance`
    pub fn contains_aabb(&self, other: &Self, tolerance: f32) -> bool {
        let outer = self.inflated(tolerance);
        other.min.x >= outer.min.x
            && other.min.y >= outer.min.y
            && other.min.z >= outer.min.z
            && other.max.x <= outer.max.x
            && other.max.y <= outer.max.y
            && other.max.z <= outer.max.z
    }

    /// Axis-aligned box around this box after a rigid transform
    pub fn transformed(&self, iso: &Iso) -> Self {
        let mut out = Self::empty();
        for corner in self.corners() {
            out.grow(&iso.transform_point(&corner.into()).coords);
        }
        out
    }
}
