//! Error types for collision asset construction and type-erased queries
//!
//! Construction errors are fatal for the asset being loaded: there is no
//! partial-load fallback. Queries never fail for "no hit"; the only query-time
//! error is [`QueryError::NotImplemented`], which lets callers tell a missing
//! primitive-pair routine apart from a genuine miss.

use thiserror::Error;

/// Fatal errors raised while building chunk trees or world colliders
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A chunk source that requires precomputed collision data has none
    #[error("chunk {chunk} has no collision data")]
    MissingCollisionData {
        /// Offending chunk index
        chunk: u32,
    },

    /// A leaf sector points past the end of the triangle permutation
    #[error("chunk {chunk}: sector run {start}..{end} exceeds map length {len}")]
    SectorOutOfRange {
        /// Offending chunk index
        chunk: u32,
        /// First map slot of the run
        start: u32,
        /// One past the last map slot of the run
        end: u64,
        /// Length of the permutation map
        len: usize,
    },

    /// A sector refers to a split node that does not exist
    #[error("chunk {chunk}: split node index {index} out of range ({count} nodes)")]
    NodeIndexOutOfRange {
        /// Offending chunk index
        chunk: u32,
        /// Referenced node index
        index: u32,
        /// Number of split nodes
        count: usize,
    },

    /// A split node is reachable more than once
    #[error("chunk {chunk}: split node {index} is referenced more than once")]
    CyclicSplitTree {
        /// Offending chunk index
        chunk: u32,
        /// Node visited twice
        index: u32,
    },

    /// The permutation map names a triangle that does not exist
    #[error("chunk {chunk}: map entry {entry} names triangle {triangle} of {count}")]
    MapIndexOutOfRange {
        /// Offending chunk index
        chunk: u32,
        /// Map slot
        entry: usize,
        /// Triangle index stored in the slot
        triangle: u32,
        /// Number of triangles in the chunk
        count: usize,
    },

    /// A triangle names a vertex that does not exist
    #[error("chunk {chunk}: triangle {triangle} names vertex {vertex} of {count}")]
    VertexIndexOutOfRange {
        /// Offending chunk index
        chunk: u32,
        /// Triangle index
        triangle: usize,
        /// Referenced vertex index
        vertex: u32,
        /// Number of vertices in the chunk
        count: usize,
    },

    /// A per-vertex attribute array does not match the vertex count
    #[error("chunk {chunk}: {attribute} has {actual} entries, expected {expected}")]
    AttributeLengthMismatch {
        /// Offending chunk index
        chunk: u32,
        /// Attribute name
        attribute: &'static str,
        /// Vertex count
        expected: usize,
        /// Attribute entry count
        actual: usize,
    },

    /// The supplied coarse box does not contain every triangle of the chunk
    #[error("chunk {chunk}: coarse bounding box does not contain triangle {triangle}")]
    BoundsMismatch {
        /// Offending chunk index
        chunk: u32,
        /// First triangle found outside the box
        triangle: usize,
    },

    /// A chunk holds more triangles or map entries than a 32-bit index reaches
    #[error("chunk {chunk}: {count} triangles exceed the 32-bit index range")]
    TooManyTriangles {
        /// Offending chunk index
        chunk: u32,
        /// Triangle or map entry count
        count: usize,
    },

    /// A split or partition node uses an axis outside X/Y/Z
    #[error("invalid split axis {0}")]
    InvalidAxis(u8),

    /// A world asset declares both a root partition node and a root chunk
    #[error("world declares both a root partition node and a root chunk")]
    RootConflict,

    /// A world asset declares neither a root partition node nor a root chunk
    #[error("world declares no root")]
    MissingRoot,

    /// A world partition node refers to a node that does not exist
    #[error("partition node index {index} out of range ({count} nodes)")]
    PartitionIndexOutOfRange {
        /// Referenced partition index
        index: u32,
        /// Number of partition nodes
        count: usize,
    },

    /// A world partition node is reachable more than once
    #[error("partition node {0} is referenced more than once")]
    CyclicPartitionTree(u32),

    /// A world partition leaf names a chunk that does not exist
    #[error("chunk index {index} out of range ({count} chunks)")]
    ChunkIndexOutOfRange {
        /// Referenced chunk index
        index: u32,
        /// Number of chunks
        count: usize,
    },
}

/// Errors returned by the type-erased shape dispatch
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// No routine exists for this combination of primitives
    #[error("{query} is not implemented for {a} vs {b}")]
    NotImplemented {
        /// Query family (overlap, cast, containment, ...)
        query: &'static str,
        /// First operand kind
        a: &'static str,
        /// Second operand kind
        b: &'static str,
    },
}

impl QueryError {
    /// Convenience constructor for [`QueryError::NotImplemented`]
    pub const fn not_implemented(query: &'static str, a: &'static str, b: &'static str) -> Self {
        Self::NotImplemented { query, a, b }
    }
}
