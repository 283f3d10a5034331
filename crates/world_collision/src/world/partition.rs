//! World partition tree: axis splits over whole chunks

use crate::error::BuildError;
use crate::foundation::math::Axis;
use crate::geometry::Plane;
use crate::scene::{PartitionChildData, PartitionNodeData, WorldData};
use crate::tree::node::{axis_from_data, splitting_plane};
use std::collections::HashSet;

/// Child of a partition node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionChild {
    /// Another partition node
    Node(u32),
    /// A mesh chunk
    Chunk(u32),
}

impl From<PartitionChildData> for PartitionChild {
    fn from(data: PartitionChildData) -> Self {
        match data {
            PartitionChildData::Node(index) => Self::Node(index),
            PartitionChildData::Chunk(index) => Self::Chunk(index),
        }
    }
}

impl From<PartitionChild> for PartitionChildData {
    fn from(child: PartitionChild) -> Self {
        match child {
            PartitionChild::Node(index) => Self::Node(index),
            PartitionChild::Chunk(index) => Self::Chunk(index),
        }
    }
}

/// Partition node; only an axis and two offsets are stored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionNode {
    /// Split axis
    pub axis: Axis,
    /// Upper bound of the left subtree
    pub left_value: f32,
    /// Lower bound of the right subtree
    pub right_value: f32,
    /// Lower child
    pub left: PartitionChild,
    /// Upper child
    pub right: PartitionChild,
}

impl PartitionNode {
    /// Decode a raw node
    pub fn from_data(data: &PartitionNodeData) -> Result<Self, BuildError> {
        Ok(Self {
            axis: axis_from_data(data.axis)?,
            left_value: data.left_value,
            right_value: data.right_value,
            left: data.left.into(),
            right: data.right.into(),
        })
    }

    /// Encode back to the raw form
    pub fn to_data(&self) -> PartitionNodeData {
        PartitionNodeData {
            axis: self.axis.index() as u8,
            left_value: self.left_value,
            right_value: self.right_value,
            left: self.left.into(),
            right: self.right.into(),
        }
    }

    /// Plane bounding the left subtree, built on demand
    pub fn left_plane(&self) -> Plane {
        splitting_plane(self.axis, self.left_value)
    }

    /// Plane bounding the right subtree, built on demand
    pub fn right_plane(&self) -> Plane {
        splitting_plane(self.axis, self.right_value)
    }
}

/// Validated partition tree with its single root
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTree {
    /// Root: a partition node or a lone chunk
    pub root: PartitionChild,
    /// Partition nodes
    pub nodes: Vec<PartitionNode>,
    /// Chunks reachable from the root, in traversal order
    pub leaves: Vec<u32>,
}

impl PartitionTree {
    /// Decode and validate the partition part of a world
    ///
    /// Exactly one of the two roots must be set. Every node must be reached
    /// once, and every chunk leaf must name an existing chunk.
    pub fn from_world(data: &WorldData) -> Result<Self, BuildError> {
        let root = match (data.root_partition, data.root_chunk) {
            (Some(_), Some(_)) => return Err(BuildError::RootConflict),
            (None, None) => return Err(BuildError::MissingRoot),
            (Some(node), None) => PartitionChild::Node(node),
            (None, Some(chunk)) => PartitionChild::Chunk(chunk),
        };

        let nodes = data
            .partitions
            .iter()
            .map(PartitionNode::from_data)
            .collect::<Result<Vec<_>, _>>()?;

        let mut tree = Self {
            root,
            nodes,
            leaves: Vec::new(),
        };
        tree.leaves = tree.collect_leaves(data.chunks.len())?;
        Ok(tree)
    }

    fn collect_leaves(&self, chunk_count: usize) -> Result<Vec<u32>, BuildError> {
        let mut leaves = Vec::new();
        let mut visited = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(child) = stack.pop() {
            match child {
                PartitionChild::Chunk(index) => {
                    if index as usize >= chunk_count {
                        return Err(BuildError::ChunkIndexOutOfRange {
                            index,
                            count: chunk_count,
                        });
                    }
                    leaves.push(index);
                }
                PartitionChild::Node(index) => {
                    let Some(node) = self.nodes.get(index as usize) else {
                        return Err(BuildError::PartitionIndexOutOfRange {
                            index,
                            count: self.nodes.len(),
                        });
                    };
                    if !visited.insert(index) {
                        return Err(BuildError::CyclicPartitionTree(index));
                    }
                    stack.push(node.right);
                    stack.push(node.left);
                }
            }
        }
        Ok(leaves)
    }

    /// Partition node `index`
    #[inline]
    pub fn node(&self, index: u32) -> Option<&PartitionNode> {
        self.nodes.get(index as usize)
    }
}
