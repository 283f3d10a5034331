//! World collider
//!
//! A binary partition tree over whole mesh chunks, each backed by its own
//! [`ChunkTree`](crate::tree::ChunkTree). Ray casts walk the partition front
//! to back exactly like a chunk tree walks its split nodes; shape queries
//! chain the chunk-level intersection sequences.

pub mod collider;
pub mod partition;

pub use collider::{WorldCollider, WorldIntersections};
pub use partition::{PartitionChild, PartitionNode, PartitionTree};
