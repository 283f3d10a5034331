//! Rays and line segments

use crate::foundation::math::{Iso, Vec3};

/// A half-infinite ray for casting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vec3,
    /// Unit direction, or zero for a degenerate ray
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing the direction
    ///
    /// A zero-length (or non-finite) direction produces a degenerate ray that
    /// never hits anything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction
            .try_normalize(f32::MIN_POSITIVE)
            .filter(|d| d.iter().all(|c| c.is_finite()))
            .unwrap_or_else(Vec3::zeros);
        Self { origin, direction }
    }

    /// True when the direction is zero
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::zeros()
    }

    /// Get a point along the ray at distance t
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// This ray after a rigid transform
    pub fn transformed(&self, iso: &Iso) -> Self {
        Self {
            origin: iso.transform_point(&self.origin.into()).coords,
            direction: iso.rotation * self.direction,
        }
    }
}

/// A finite line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point
    pub start: Vec3,
    /// End point
    pub end: Vec3,
}

impl Segment {
    /// Create a segment between two points
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Length of the segment
    pub fn length(&self) -> f32 {
        (self.end - self.start).magnitude()
    }

    /// Midpoint of the segment
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Ray from `start` towards `end` together with the segment length
    pub fn to_ray(&self) -> (Ray, f32) {
        (Ray::new(self.start, self.end - self.start), self.length())
    }

    /// This segment after a rigid transform
    pub fn transformed(&self, iso: &Iso) -> Self {
        Self {
            start: iso.transform_point(&self.start.into()).coords,
            end: iso.transform_point(&self.end.into()).coords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(ray.direction, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(ray.point_at(2.0), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_zero_direction_is_degenerate() {
        assert!(Ray::new(Vec3::zeros(), Vec3::zeros()).is_degenerate());
        assert!(Ray::new(Vec3::zeros(), Vec3::new(f32::NAN, 0.0, 0.0)).is_degenerate());
    }

    #[test]
    fn test_segment_to_ray() {
        let seg = Segment::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 4.0));
        let (ray, len) = seg.to_ray();
        assert_eq!(len, 4.0);
        assert_eq!(ray.direction, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(seg.midpoint(), Vec3::new(1.0, 0.0, 2.0));
    }
}
