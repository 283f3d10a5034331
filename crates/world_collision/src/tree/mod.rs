//! Per-chunk collision trees
//!
//! A chunk tree is a bounding-interval hierarchy: each split node carries two
//! axis-aligned planes, and the two sectors may overlap or leave a gap between
//! them. Leaves are runs of a permutation map over the chunk's triangles.
//! Trees are usually decoded from precomputed data; a naive single-leaf tree
//! is available for chunks that ship without one.

pub mod builder;
pub mod chunk_tree;
pub mod node;
pub mod source;

pub use builder::TreeLayout;
pub use chunk_tree::{ChunkIntersections, ChunkTree};
pub use node::{Sector, SplitNode};
pub use source::{LocalTriangles, SharedBuffers, TriangleSource, TriangleSupplier};
