//! Decoding, validation and the naive fallback tree

use super::node::{Sector, SplitNode};
use super::source::TriangleSupplier;
use crate::error::BuildError;
use crate::geometry::Aabb;
use crate::scene::{CollisionTreeData, MeshChunkData};
use std::collections::HashSet;

/// Validated split nodes, permutation map and root sector
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    /// Root sector (node 0, or one leaf over the whole map)
    pub root: Sector,
    /// Split nodes
    pub nodes: Vec<SplitNode>,
    /// Triangle permutation
    pub map: Vec<u32>,
}

impl TreeLayout {
    /// Single leaf listing every triangle in order
    pub fn naive(chunk: u32, triangle_count: usize) -> Result<Self, BuildError> {
        let count = index_count(chunk, triangle_count)?;
        Ok(Self {
            root: Sector::Leaf { start: 0, count },
            nodes: Vec::new(),
            map: (0..count).collect(),
        })
    }

    /// Decode and validate precomputed split data against a triangle count
    pub fn from_data(
        chunk: u32,
        data: &CollisionTreeData,
        triangle_count: usize,
    ) -> Result<Self, BuildError> {
        let nodes = data
            .nodes
            .iter()
            .map(SplitNode::from_data)
            .collect::<Result<Vec<_>, _>>()?;

        let root = if nodes.is_empty() {
            Sector::Leaf {
                start: 0,
                count: index_count(chunk, data.map.len())?,
            }
        } else {
            Sector::Node(0)
        };

        let layout = Self {
            root,
            nodes,
            map: data.map.clone(),
        };
        layout.validate(chunk, triangle_count)?;
        Ok(layout)
    }

    /// Encode back to the raw form
    pub fn to_data(&self) -> CollisionTreeData {
        CollisionTreeData {
            nodes: self.nodes.iter().map(SplitNode::to_data).collect(),
            map: self.map.clone(),
        }
    }

    /// Check map entries, leaf runs, node references and reachability
    ///
    /// Every node must be reached exactly once from the root; a node reached
    /// twice means a cycle or a shared subtree, both of which are rejected.
    pub fn validate(&self, chunk: u32, triangle_count: usize) -> Result<(), BuildError> {
        for (entry, &triangle) in self.map.iter().enumerate() {
            if triangle as usize >= triangle_count {
                return Err(BuildError::MapIndexOutOfRange {
                    chunk,
                    entry,
                    triangle,
                    count: triangle_count,
                });
            }
        }

        let mut visited = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(sector) = stack.pop() {
            match sector {
                Sector::Leaf { start, count } => {
                    let end = u64::from(start) + u64::from(count);
                    if end > self.map.len() as u64 {
                        return Err(BuildError::SectorOutOfRange {
                            chunk,
                            start,
                            end,
                            len: self.map.len(),
                        });
                    }
                }
                Sector::Node(index) => {
                    let Some(node) = self.nodes.get(index as usize) else {
                        return Err(BuildError::NodeIndexOutOfRange {
                            chunk,
                            index,
                            count: self.nodes.len(),
                        });
                    };
                    if !visited.insert(index) {
                        return Err(BuildError::CyclicSplitTree { chunk, index });
                    }
                    stack.push(node.right);
                    stack.push(node.left);
                }
            }
        }
        Ok(())
    }

    /// Number of leaf sectors reachable from the root
    pub fn leaf_count(&self) -> usize {
        let mut leaves = 0;
        let mut visited = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(sector) = stack.pop() {
            match sector {
                Sector::Leaf { .. } => leaves += 1,
                Sector::Node(index) => {
                    if !visited.insert(index) {
                        continue;
                    }
                    if let Some(node) = self.nodes.get(index as usize) {
                        stack.push(node.right);
                        stack.push(node.left);
                    }
                }
            }
        }
        leaves
    }
}

/// Triangle count as a 32-bit index, rejecting counts past the index range
fn index_count(chunk: u32, count: usize) -> Result<u32, BuildError> {
    u32::try_from(count).map_err(|_| BuildError::TooManyTriangles { chunk, count })
}

/// Check per-vertex attribute arrays against the vertex count
pub fn validate_attributes(chunk: u32, data: &MeshChunkData) -> Result<(), BuildError> {
    if let Some(weights) = &data.skin_weights {
        if weights.len() != data.vertices.len() {
            return Err(BuildError::AttributeLengthMismatch {
                chunk,
                attribute: "skin_weights",
                expected: data.vertices.len(),
                actual: weights.len(),
            });
        }
    }
    Ok(())
}

/// Box around every non-degenerate triangle of a source
pub fn compute_bounds(source: &impl TriangleSupplier) -> Aabb {
    let mut bounds = Aabb::empty();
    for i in 0..source.triangle_count() as u32 {
        let tri = source.triangle(i);
        if !tri.is_nan() {
            bounds = bounds.union(&tri.bounds());
        }
    }
    bounds
}

/// Coarse box for a chunk
///
/// A supplied box must hold every triangle within `tolerance`; it is then
/// grown to cover that slack exactly. With `validate` off, or no supplied
/// box, the computed box is used.
pub fn resolve_bounds(
    chunk: u32,
    supplied: Option<Aabb>,
    source: &impl TriangleSupplier,
    validate: bool,
    tolerance: f32,
) -> Result<Aabb, BuildError> {
    match supplied {
        Some(bounds) if validate => {
            for i in 0..source.triangle_count() as u32 {
                let tri = source.triangle(i);
                if !tri.is_nan() && !bounds.contains_aabb(&tri.bounds(), tolerance) {
                    return Err(BuildError::BoundsMismatch {
                        chunk,
                        triangle: i as usize,
                    });
                }
            }
            Ok(bounds.union(&compute_bounds(source)))
        }
        _ => Ok(compute_bounds(source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Axis, Vec3};
    use crate::scene::{SectorData, SplitNodeData};

    fn split(axis: u8, left: SectorData, right: SectorData) -> SplitNodeData {
        SplitNodeData {
            axis,
            left_value: 0.0,
            right_value: 0.0,
            left,
            right,
        }
    }

    #[test]
    fn test_naive_layout_is_deterministic() {
        let a = TreeLayout::naive(0, 5).unwrap();
        let b = TreeLayout::naive(0, 5).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_data(), b.to_data());
        assert_eq!(a.map, vec![0, 1, 2, 3, 4]);
        assert_eq!(a.root, Sector::Leaf { start: 0, count: 5 });
        assert!(a.validate(0, 5).is_ok());
    }

    #[test]
    fn test_valid_two_level_tree() {
        let data = CollisionTreeData {
            nodes: vec![
                split(0, SectorData::leaf(0, 1), SectorData::node(1)),
                split(2, SectorData::leaf(1, 1), SectorData::leaf(2, 2)),
            ],
            map: vec![3, 0, 1, 2],
        };
        let layout = TreeLayout::from_data(0, &data, 4).unwrap();
        assert_eq!(layout.root, Sector::Node(0));
        assert_eq!(layout.nodes[1].axis, Axis::Z);
        assert_eq!(layout.leaf_count(), 3);
        assert_eq!(layout.to_data(), data);
    }

    #[test]
    fn test_unreachable_nodes_hold_no_leaves() {
        // Node 1 is never referenced, so its two leaves are not counted
        let data = CollisionTreeData {
            nodes: vec![
                split(0, SectorData::leaf(0, 1), SectorData::leaf(1, 1)),
                split(1, SectorData::leaf(0, 1), SectorData::leaf(1, 1)),
            ],
            map: vec![0, 1],
        };
        let layout = TreeLayout::from_data(0, &data, 2).unwrap();
        assert_eq!(layout.leaf_count(), 2);
        assert_eq!(TreeLayout::naive(0, 2).unwrap().leaf_count(), 1);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_oversized_triangle_count_rejected() {
        let count = u32::MAX as usize + 1;
        assert_eq!(
            TreeLayout::naive(3, count),
            Err(BuildError::TooManyTriangles { chunk: 3, count })
        );
        assert_eq!(index_count(3, u32::MAX as usize), Ok(u32::MAX));
    }

    #[test]
    fn test_sector_past_map_rejected() {
        let data = CollisionTreeData {
            nodes: vec![split(0, SectorData::leaf(0, 1), SectorData::leaf(1, 5))],
            map: vec![0, 1],
        };
        let err = TreeLayout::from_data(2, &data, 2).unwrap_err();
        assert_eq!(
            err,
            BuildError::SectorOutOfRange {
                chunk: 2,
                start: 1,
                end: 6,
                len: 2
            }
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let data = CollisionTreeData {
            nodes: vec![
                split(0, SectorData::leaf(0, 1), SectorData::node(1)),
                split(1, SectorData::node(0), SectorData::leaf(0, 1)),
            ],
            map: vec![0],
        };
        let err = TreeLayout::from_data(0, &data, 1).unwrap_err();
        assert_eq!(err, BuildError::CyclicSplitTree { chunk: 0, index: 0 });
    }

    #[test]
    fn test_bad_references_rejected() {
        let dangling = CollisionTreeData {
            nodes: vec![split(0, SectorData::node(4), SectorData::leaf(0, 1))],
            map: vec![0],
        };
        assert!(matches!(
            TreeLayout::from_data(0, &dangling, 1),
            Err(BuildError::NodeIndexOutOfRange { index: 4, .. })
        ));

        let bad_map = CollisionTreeData {
            nodes: Vec::new(),
            map: vec![0, 7],
        };
        assert!(matches!(
            TreeLayout::from_data(0, &bad_map, 2),
            Err(BuildError::MapIndexOutOfRange { entry: 1, triangle: 7, .. })
        ));

        let bad_axis = CollisionTreeData {
            nodes: vec![split(9, SectorData::leaf(0, 1), SectorData::leaf(0, 1))],
            map: vec![0],
        };
        assert_eq!(
            TreeLayout::from_data(0, &bad_axis, 1),
            Err(BuildError::InvalidAxis(9))
        );
    }

    #[test]
    fn test_attribute_length_checked() {
        let mut chunk = MeshChunkData::default();
        chunk.vertices = vec![Vec3::zeros(); 3];
        chunk.skin_weights = Some(vec![[0.25; 4]; 2]);
        assert_eq!(
            validate_attributes(5, &chunk),
            Err(BuildError::AttributeLengthMismatch {
                chunk: 5,
                attribute: "skin_weights",
                expected: 3,
                actual: 2
            })
        );
        chunk.skin_weights = Some(vec![[0.25; 4]; 3]);
        assert!(validate_attributes(5, &chunk).is_ok());
    }
}
