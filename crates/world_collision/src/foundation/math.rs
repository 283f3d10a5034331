//! Math utilities and types
//!
//! Provides the fundamental math types used by the collision engine along with
//! the tolerant float comparisons every narrow-phase routine relies on.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use nalgebra::{Isometry3, Matrix3, Point3 as NaPoint3, Translation3, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 3D point type
pub type Point3 = NaPoint3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Rigid transform (rotation followed by translation)
pub type Iso = Isometry3<f32>;

/// Machine epsilon used by [`near_zero`].
pub const EPSILON: f32 = f32::EPSILON;

/// Returns true when `x` is zero relative to the magnitudes of `a` and `b`.
///
/// This is `|x| <= epsilon * max(1, |a|, |b|)`, the comparison used everywhere
/// a raw float equality test would be flaky.
#[inline]
pub fn near_zero(x: f32, a: f32, b: f32) -> bool {
    x.abs() <= EPSILON * 1.0f32.max(a.abs()).max(b.abs())
}

/// Returns true when `a` and `b` are equal within [`near_zero`] tolerance.
#[inline]
pub fn near_equal(a: f32, b: f32) -> bool {
    near_zero(a - b, a, b)
}

/// `a <= b`, treating a near-zero overshoot as equal
#[inline]
pub fn near_at_most(a: f32, b: f32) -> bool {
    a <= b || near_zero(a - b, a, b)
}

/// One of the three coordinate axes
///
/// Splitting planes are restricted to these so traversal can read a single
/// vector component instead of computing a full dot product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// The X axis
    X,
    /// The Y axis
    Y,
    /// The Z axis
    Z,
}

impl Axis {
    /// All three axes in component order
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index (0, 1 or 2)
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Axis for a component index, if valid
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    /// Extract this axis' component from a vector
    #[inline]
    pub fn component(self, v: &Vec3) -> f32 {
        v[self.index()]
    }

    /// Unit vector along this axis
    #[inline]
    pub fn unit(self) -> Vec3 {
        let mut v = Vec3::zeros();
        v[self.index()] = 1.0;
        v
    }
}

/// Component-wise minimum of two vectors
#[inline]
pub fn vmin(a: &Vec3, b: &Vec3) -> Vec3 {
    Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

/// Component-wise maximum of two vectors
#[inline]
pub fn vmax(a: &Vec3, b: &Vec3) -> Vec3 {
    Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

/// Vector with every component set to NaN
#[inline]
pub fn nan_vec() -> Vec3 {
    Vec3::new(f32::NAN, f32::NAN, f32::NAN)
}

/// Rigid transform representing position and rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Convert to an nalgebra isometry
    pub fn to_isometry(&self) -> Iso {
        Iso::from_parts(Translation3::from(self.position), self.rotation)
    }

    /// Combine this transform with a child transform expressed in its space
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            position: self.position + self.rotation * other.position,
            rotation: self.rotation * other.rotation,
        }
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: inv_rotation * (-self.position),
            rotation: inv_rotation,
        }
    }
}

/// A transform placed in a parent chain
///
/// Each location is relative to its parent; the root of the chain is in world
/// space. Only the local/world convenience queries use this, the traversal
/// math itself is space-agnostic.
#[derive(Debug, Clone, Default)]
pub struct Location {
    /// Transform relative to the parent (or world space for a root)
    pub local: Transform,
    /// Optional parent location
    pub parent: Option<Arc<Location>>,
}

impl Location {
    /// Create a root location
    pub fn new(local: Transform) -> Self {
        Self { local, parent: None }
    }

    /// Create a location attached to a parent
    pub fn with_parent(local: Transform, parent: Arc<Self>) -> Self {
        Self {
            local,
            parent: Some(parent),
        }
    }

    /// Transform from this location's space to world space
    pub fn world_transform(&self) -> Transform {
        let mut result = self.local;
        let mut parent = self.parent.as_deref();
        while let Some(location) = parent {
            result = location.local.combine(&result);
            parent = location.parent.as_deref();
        }
        result
    }

    /// World transform as an isometry
    pub fn world_isometry(&self) -> Iso {
        self.world_transform().to_isometry()
    }
}
