//! Parsed scene data consumed by the collider builders
//!
//! These are the in-memory shapes an external model/scene loader hands over.
//! They are deliberately raw (axes as integers, sectors with a sentinel count)
//! and are validated when a [`ChunkTree`](crate::tree::ChunkTree) or
//! [`WorldCollider`](crate::world::WorldCollider) is built from them.

use crate::foundation::math::Vec3;
use crate::geometry::Aabb;
use serde::{Deserialize, Serialize};

/// Sector count marking "index refers to another split node"
pub const NODE_SENTINEL: u32 = u32::MAX;

/// One triangle record: three vertex indices and a material index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangleRecord {
    /// Vertex indices into the chunk's vertex array
    pub indices: [u32; 3],
    /// Material index (carried through, not interpreted)
    #[serde(default)]
    pub material: u32,
}

impl TriangleRecord {
    /// Record with material zero
    pub const fn new(indices: [u32; 3]) -> Self {
        Self {
            indices,
            material: 0,
        }
    }
}

/// Raw sector: a leaf run `{start, count}` or a node reference `{index, NODE_SENTINEL}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorData {
    /// Node index or first map slot
    pub index: u32,
    /// Run length, or [`NODE_SENTINEL`]
    pub count: u32,
}

impl SectorData {
    /// Reference to split node `index`
    pub const fn node(index: u32) -> Self {
        Self {
            index,
            count: NODE_SENTINEL,
        }
    }

    /// Leaf run of `count` map slots starting at `start`
    pub const fn leaf(start: u32, count: u32) -> Self {
        Self {
            index: start,
            count,
        }
    }
}

/// Raw split node: axis (0 = X, 1 = Y, 2 = Z) plus two splitting values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitNodeData {
    /// Split axis index
    pub axis: u8,
    /// Upper bound of everything in the left sector along `axis`
    pub left_value: f32,
    /// Lower bound of everything in the right sector along `axis`
    pub right_value: f32,
    /// Left (lower) sector
    pub left: SectorData,
    /// Right (upper) sector
    pub right: SectorData,
}

/// Precomputed collision tree of one chunk
///
/// Node 0 is the root; with no nodes the whole map is a single leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionTreeData {
    /// Split nodes
    pub nodes: Vec<SplitNodeData>,
    /// Permutation of triangle indices; leaf runs index into it
    pub map: Vec<u32>,
}

/// One mesh chunk as delivered by the scene loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshChunkData {
    /// Triangle records
    pub triangles: Vec<TriangleRecord>,
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Coarse bounding box, computed from the triangles when absent
    #[serde(default)]
    pub bounds: Option<Aabb>,
    /// Precomputed collision tree
    #[serde(default)]
    pub collision: Option<CollisionTreeData>,
    /// Optional per-vertex skin weights; must match the vertex count
    #[serde(default)]
    pub skin_weights: Option<Vec<[f32; 4]>>,
}

impl MeshChunkData {
    /// Chunk from vertices and index triples, without collision data
    pub fn from_mesh(vertices: Vec<Vec3>, indices: &[[u32; 3]]) -> Self {
        Self {
            triangles: indices.iter().copied().map(TriangleRecord::new).collect(),
            vertices,
            ..Self::default()
        }
    }

    /// Attach a precomputed collision tree
    #[must_use]
    pub fn with_collision(mut self, collision: CollisionTreeData) -> Self {
        self.collision = Some(collision);
        self
    }
}

/// Raw world partition child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionChildData {
    /// Another partition node
    Node(u32),
    /// A mesh chunk leaf
    Chunk(u32),
}

/// Raw world partition node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionNodeData {
    /// Split axis index
    pub axis: u8,
    /// Upper bound of the left subtree along `axis`
    pub left_value: f32,
    /// Lower bound of the right subtree along `axis`
    pub right_value: f32,
    /// Left (lower) child
    pub left: PartitionChildData,
    /// Right (upper) child
    pub right: PartitionChildData,
}

/// A whole world: partition tree plus chunks
///
/// Exactly one of `root_partition` and `root_chunk` must be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    /// Partition nodes
    #[serde(default)]
    pub partitions: Vec<PartitionNodeData>,
    /// Root partition node, for multi-chunk worlds
    #[serde(default)]
    pub root_partition: Option<u32>,
    /// Root chunk, for single-chunk worlds
    #[serde(default)]
    pub root_chunk: Option<u32>,
    /// All chunks
    pub chunks: Vec<MeshChunkData>,
}

impl WorldData {
    /// World made of a single root chunk
    pub fn single_chunk(chunk: MeshChunkData) -> Self {
        Self {
            root_chunk: Some(0),
            chunks: vec![chunk],
            ..Self::default()
        }
    }
}
