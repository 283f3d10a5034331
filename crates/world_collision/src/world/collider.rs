//! Collider over a whole world of chunks

use super::partition::{PartitionChild, PartitionNode, PartitionTree};
use crate::config::ColliderSettings;
use crate::error::BuildError;
use crate::foundation::math::{near_at_most as at_most, Location};
use crate::geometry::{Aabb, Intersection, Ray, Raycast, Segment};
use crate::query::{raycast, PlaneSide, Shape};
use crate::scene::WorldData;
use crate::tree::{ChunkIntersections, ChunkTree};
use log::{debug, info, warn};

/// World partition tree over per-chunk collision trees
///
/// Chunks that carry no collision data are left out (or given a naive tree,
/// see [`ColliderSettings::synthesize_missing_trees`]); a left-out chunk
/// never produces hits.
#[derive(Debug, Clone)]
pub struct WorldCollider {
    partition: PartitionTree,
    chunks: Vec<Option<ChunkTree>>,
    bounds: Aabb,
}

impl WorldCollider {
    /// Build from parsed world data
    pub fn build(data: &WorldData, settings: &ColliderSettings) -> Result<Self, BuildError> {
        let partition = PartitionTree::from_world(data)?;

        let mut chunks: Vec<Option<ChunkTree>> = vec![None; data.chunks.len()];
        for &index in &partition.leaves {
            let chunk = &data.chunks[index as usize];
            let tree = if chunk.collision.is_some() {
                Some(ChunkTree::from_chunk(index, chunk, settings)?)
            } else if settings.synthesize_missing_trees {
                debug!("chunk {index}: no collision data, synthesizing naive tree");
                Some(ChunkTree::naive(index, chunk, settings)?)
            } else {
                warn!("chunk {index}: no collision data, excluded from the world collider");
                None
            };
            chunks[index as usize] = tree;
        }

        let bounds = chunks
            .iter()
            .flatten()
            .fold(Aabb::empty(), |acc, tree| acc.union(tree.bounds()));

        let collider = Self {
            partition,
            chunks,
            bounds,
        };
        info!(
            "world collider: {} partition nodes, {} of {} chunks collidable",
            collider.partition.nodes.len(),
            collider.collidable_chunk_count(),
            collider.chunk_count()
        );
        Ok(collider)
    }

    /// Union of every included chunk's box
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Root of the partition tree
    pub fn root(&self) -> PartitionChild {
        self.partition.root
    }

    /// Partition nodes
    pub fn partitions(&self) -> &[PartitionNode] {
        &self.partition.nodes
    }

    /// Tree for chunk `index`, if that chunk is collidable
    pub fn chunk(&self, index: u32) -> Option<&ChunkTree> {
        self.chunks.get(index as usize).and_then(Option::as_ref)
    }

    /// Every collidable chunk tree
    pub fn chunk_trees(&self) -> impl Iterator<Item = &ChunkTree> + '_ {
        self.chunks.iter().flatten()
    }

    /// Number of chunks in the world data
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks with a collision tree
    pub fn collidable_chunk_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_some()).count()
    }

    /// Nearest front-face hit along a ray
    pub fn cast(&self, ray: &Ray) -> Option<Raycast> {
        self.cast_with_max(ray, f32::INFINITY)
    }

    /// Nearest hit no farther than `max_length`
    pub fn cast_with_max(&self, ray: &Ray, max_length: f32) -> Option<Raycast> {
        if ray.is_degenerate() || !(max_length >= 0.0) {
            return None;
        }
        let entry = raycast::ray_aabb(ray, &self.bounds)?;
        if entry.distance > max_length {
            return None;
        }
        self.cast_child(self.partition.root, ray, 0.0, max_length, max_length)
            .filter(|hit| hit.distance <= max_length)
    }

    /// Nearest hit along a segment
    pub fn cast_segment(&self, segment: &Segment) -> Option<Raycast> {
        let (ray, length) = segment.to_ray();
        self.cast_with_max(&ray, length)
    }

    /// Cast a ray given in the space of `location`'s parent chain root
    pub fn cast_in(&self, ray: &Ray, location: &Location) -> Option<Raycast> {
        let iso = location.world_isometry();
        self.cast(&ray.transformed(&iso.inverse()))
            .map(|hit| hit.transformed(&iso))
    }

    fn cast_child(
        &self,
        child: PartitionChild,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
        limit: f32,
    ) -> Option<Raycast> {
        match child {
            PartitionChild::Chunk(index) => self.chunk(index)?.cast_with_max(ray, limit),
            PartitionChild::Node(index) => {
                let node = self.partition.node(index)?;
                self.cast_node(node, ray, t_min, t_max, limit)
            }
        }
    }

    fn cast_node(
        &self,
        node: &PartitionNode,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
        limit: f32,
    ) -> Option<Raycast> {
        let o = node.axis.component(&ray.origin);
        let d = node.axis.component(&ray.direction);

        if d == 0.0 {
            let left = if at_most(o, node.left_value) {
                self.cast_child(node.left, ray, t_min, t_max, limit)
            } else {
                None
            };
            let right_limit = left.map_or(limit, |hit| hit.distance.min(limit));
            let right = if at_most(node.right_value, o) {
                self.cast_child(node.right, ray, t_min, t_max, right_limit)
            } else {
                None
            };
            return Raycast::nearest(left, right);
        }

        let t_left = (node.left_value - o) / d;
        let t_right = (node.right_value - o) / d;
        let (near, far, near_exit, far_entry) = if d > 0.0 {
            (node.left, node.right, t_left, t_right)
        } else {
            (node.right, node.left, t_right, t_left)
        };

        let near_hit = if at_most(t_min, near_exit) {
            self.cast_child(near, ray, t_min, t_max.min(near_exit), limit)
        } else {
            None
        };

        let mut far_max = t_max;
        let mut far_limit = limit;
        if let Some(hit) = near_hit {
            let p = node.axis.component(&hit.point);
            let resolved = if d > 0.0 {
                p < node.right_value
            } else {
                p > node.left_value
            };
            if resolved {
                return near_hit;
            }
            far_max = far_max.min(hit.distance);
            far_limit = far_limit.min(hit.distance);
        }

        // No near hit is not a reason to skip the far side
        let far_min = t_min.max(far_entry);
        let far_hit = if at_most(far_min, far_max) {
            self.cast_child(far, ray, far_min, far_max, far_limit)
        } else {
            None
        };

        Raycast::nearest(near_hit, far_hit)
    }

    /// Lazy sequence of every triangle in the world overlapping `shape`
    pub fn intersections(&self, shape: &Shape) -> WorldIntersections<'_> {
        let mut stack = Vec::new();
        if !self.bounds.is_empty() && shape.intersects_aabb(&self.bounds) {
            stack.push(self.partition.root);
        }
        WorldIntersections {
            collider: self,
            shape: *shape,
            stack,
            current: None,
        }
    }

    /// True when any triangle overlaps `shape`
    pub fn intersects(&self, shape: &Shape) -> bool {
        self.intersections(shape).next().is_some()
    }

    /// Intersections of a shape given relative to `location`
    pub fn intersections_in<'a>(
        &'a self,
        shape: &Shape,
        location: &Location,
    ) -> impl Iterator<Item = Intersection> + 'a {
        let iso = location.world_isometry();
        self.intersections(&shape.transformed(&iso.inverse()))
            .map(move |hit| hit.transformed(&iso))
    }

    /// [`WorldCollider::intersects`] for a collider placed at `location`
    pub fn intersects_in(&self, shape: &Shape, location: &Location) -> bool {
        self.intersections_in(shape, location).next().is_some()
    }
}

/// Iterator returned by [`WorldCollider::intersections`]
#[derive(Debug, Clone)]
pub struct WorldIntersections<'a> {
    collider: &'a WorldCollider,
    shape: Shape,
    stack: Vec<PartitionChild>,
    current: Option<ChunkIntersections<'a>>,
}

impl Iterator for WorldIntersections<'_> {
    type Item = Intersection;

    fn next(&mut self) -> Option<Intersection> {
        loop {
            if let Some(chunk) = self.current.as_mut() {
                if let Some(hit) = chunk.next() {
                    return Some(hit);
                }
                self.current = None;
            }

            match self.stack.pop()? {
                PartitionChild::Chunk(index) => {
                    self.current = self
                        .collider
                        .chunk(index)
                        .map(|tree| tree.intersections(&self.shape));
                }
                PartitionChild::Node(index) => {
                    let Some(node) = self.collider.partition.node(index) else {
                        continue;
                    };
                    if self.shape.classify(&node.right_plane()) != PlaneSide::Outside {
                        self.stack.push(node.right);
                    }
                    if self.shape.classify(&node.left_plane()) != PlaneSide::Inside {
                        self.stack.push(node.left);
                    }
                }
            }
        }
    }
}
