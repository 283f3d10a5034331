//! Split nodes and sectors of a chunk tree

use crate::error::BuildError;
use crate::foundation::math::Axis;
use crate::geometry::Plane;
use crate::scene::{SectorData, SplitNodeData, NODE_SENTINEL};

/// One side of a split: deeper node or a run of the triangle map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sector {
    /// Index of another split node
    Node(u32),
    /// Contiguous run of map slots
    Leaf {
        /// First map slot
        start: u32,
        /// Number of slots
        count: u32,
    },
}

impl Sector {
    /// Decode the raw `{index, count}` form
    pub const fn from_data(data: SectorData) -> Self {
        if data.count == NODE_SENTINEL {
            Self::Node(data.index)
        } else {
            Self::Leaf {
                start: data.index,
                count: data.count,
            }
        }
    }

    /// Encode back to the raw form
    pub const fn to_data(self) -> SectorData {
        match self {
            Self::Node(index) => SectorData::node(index),
            Self::Leaf { start, count } => SectorData::leaf(start, count),
        }
    }
}

/// Decode a raw axis index
pub fn axis_from_data(axis: u8) -> Result<Axis, BuildError> {
    Axis::from_index(usize::from(axis)).ok_or(BuildError::InvalidAxis(axis))
}

/// Splitting plane at `value` whose normal faces down the axis
///
/// With this orientation the lower side is the front: a shape classified
/// `Outside` lies entirely below `value`, `Inside` entirely above it.
pub fn splitting_plane(axis: Axis, value: f32) -> Plane {
    Plane {
        normal: -axis.unit(),
        distance: -value,
    }
}

/// Internal node: an axis-aligned plane pair and two sectors
///
/// Everything in `left` lies at or below `left_value` along `axis`;
/// everything in `right` lies at or above `right_value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitNode {
    /// Split axis
    pub axis: Axis,
    /// Upper bound of the left sector
    pub left_value: f32,
    /// Lower bound of the right sector
    pub right_value: f32,
    /// Lower sector
    pub left: Sector,
    /// Upper sector
    pub right: Sector,
}

impl SplitNode {
    /// Decode a raw node
    pub fn from_data(data: &SplitNodeData) -> Result<Self, BuildError> {
        Ok(Self {
            axis: axis_from_data(data.axis)?,
            left_value: data.left_value,
            right_value: data.right_value,
            left: Sector::from_data(data.left),
            right: Sector::from_data(data.right),
        })
    }

    /// Encode back to the raw form
    pub fn to_data(&self) -> SplitNodeData {
        SplitNodeData {
            axis: self.axis.index() as u8,
            left_value: self.left_value,
            right_value: self.right_value,
            left: self.left.to_data(),
            right: self.right.to_data(),
        }
    }

    /// Plane bounding the left sector from above
    pub fn left_plane(&self) -> Plane {
        splitting_plane(self.axis, self.left_value)
    }

    /// Plane bounding the right sector from below
    pub fn right_plane(&self) -> Plane {
        splitting_plane(self.axis, self.right_value)
    }
}
