//! Collision tree over one mesh chunk

use super::builder::{self, TreeLayout};
use super::node::{Sector, SplitNode};
use super::source::{LocalTriangles, SharedBuffers, TriangleSource, TriangleSupplier};
use crate::config::ColliderSettings;
use crate::error::BuildError;
use crate::foundation::math::{near_at_most as at_most, Location, Vec3};
use crate::geometry::{Aabb, Intersection, Ray, Raycast, Segment, Triangle, TriangleId};
use crate::query::{closest, raycast, PlaneSide, Shape};
use crate::scene::MeshChunkData;
use log::debug;
use std::ops::Range;
use std::sync::Arc;

/// Binary split tree over the triangles of one chunk
///
/// Immutable once built; queries take `&self` and keep no cache, so a tree
/// can be shared between threads.
#[derive(Debug, Clone)]
pub struct ChunkTree {
    chunk: u32,
    layout: TreeLayout,
    source: TriangleSource,
    bounds: Aabb,
}

impl ChunkTree {
    /// Build from a chunk's precomputed collision data
    ///
    /// Fails with [`BuildError::MissingCollisionData`] when the chunk has none.
    pub fn from_chunk(
        chunk: u32,
        data: &MeshChunkData,
        settings: &ColliderSettings,
    ) -> Result<Self, BuildError> {
        let collision = data
            .collision
            .as_ref()
            .ok_or(BuildError::MissingCollisionData { chunk })?;
        let source = Self::shared_source(chunk, data)?;
        let layout = TreeLayout::from_data(chunk, collision, source.triangle_count())?;
        Self::assemble(chunk, TriangleSource::Shared(source), layout, data.bounds, settings)
    }

    /// Build a naive single-leaf tree over a chunk, ignoring any collision data
    pub fn naive(
        chunk: u32,
        data: &MeshChunkData,
        settings: &ColliderSettings,
    ) -> Result<Self, BuildError> {
        let source = Self::shared_source(chunk, data)?;
        let layout = TreeLayout::naive(chunk, source.triangle_count())?;
        debug!("chunk {chunk}: naive tree over {} triangles", source.triangle_count());
        Self::assemble(chunk, TriangleSource::Shared(source), layout, data.bounds, settings)
    }

    /// Precomputed tree when the chunk carries one, naive tree otherwise
    pub fn from_chunk_or_naive(
        chunk: u32,
        data: &MeshChunkData,
        settings: &ColliderSettings,
    ) -> Result<Self, BuildError> {
        if data.collision.is_some() {
            Self::from_chunk(chunk, data, settings)
        } else {
            Self::naive(chunk, data, settings)
        }
    }

    /// Naive tree over an ad-hoc model with locally owned triangles
    pub fn from_mesh(
        chunk: u32,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        settings: &ColliderSettings,
    ) -> Result<Self, BuildError> {
        let local = LocalTriangles::new(chunk, vertices, indices, settings.deduplicate_local_vertices)?;
        let layout = TreeLayout::naive(chunk, local.triangle_count())?;
        Self::assemble(chunk, TriangleSource::Local(local), layout, None, settings)
    }

    fn shared_source(chunk: u32, data: &MeshChunkData) -> Result<SharedBuffers, BuildError> {
        builder::validate_attributes(chunk, data)?;
        SharedBuffers::new(
            chunk,
            Arc::from(data.vertices.as_slice()),
            Arc::from(data.triangles.as_slice()),
        )
    }

    fn assemble(
        chunk: u32,
        source: TriangleSource,
        layout: TreeLayout,
        bounds: Option<Aabb>,
        settings: &ColliderSettings,
    ) -> Result<Self, BuildError> {
        let bounds = builder::resolve_bounds(
            chunk,
            bounds,
            &source,
            settings.validate_bounds,
            settings.bounds_tolerance,
        )?;
        debug!(
            "chunk {chunk}: tree ready ({} nodes, {} leaves, {} triangles)",
            layout.nodes.len(),
            layout.leaf_count(),
            source.triangle_count()
        );
        Ok(Self {
            chunk,
            layout,
            source,
            bounds,
        })
    }

    /// Chunk index used in triangle identities
    pub fn chunk(&self) -> u32 {
        self.chunk
    }

    /// Coarse box holding every triangle
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Triangle source
    pub fn source(&self) -> &TriangleSource {
        &self.source
    }

    /// Root sector
    pub fn root(&self) -> Sector {
        self.layout.root
    }

    /// Split nodes
    pub fn nodes(&self) -> &[SplitNode] {
        &self.layout.nodes
    }

    /// Triangle permutation
    pub fn map(&self) -> &[u32] {
        &self.layout.map
    }

    /// Number of split nodes
    pub fn node_count(&self) -> usize {
        self.layout.nodes.len()
    }

    /// Number of leaf sectors
    pub fn leaf_count(&self) -> usize {
        self.layout.leaf_count()
    }

    /// Number of triangles in the chunk
    pub fn triangle_count(&self) -> usize {
        self.source.triangle_count()
    }

    /// Triangle `index` of the chunk (the NaN sentinel when degenerate)
    pub fn triangle(&self, index: u32) -> Triangle {
        self.source.triangle(index)
    }

    /// Split data in the raw scene form
    pub fn to_collision_data(&self) -> crate::scene::CollisionTreeData {
        self.layout.to_data()
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

        // Coarse reject; an origin inside the box enters at distance zero
        let entry = raycast::ray_aabb(ray, &self.bounds)?;
        if entry.distance > max_length {
            return None;
        }

        self.cast_sector(self.layout.root, ray, 0.0, max_length, max_length)
            .filter(|hit| hit.distance <= max_length)
    }

    /// Nearest hit along a segment
    pub fn cast_segment(&self, segment: &Segment) -> Option<Raycast> {
        let (ray, length) = segment.to_ray();
        self.cast_with_max(&ray, length)
    }

    /// Cast a world-space ray against this tree placed at `location`
    pub fn cast_in(&self, ray: &Ray, location: &Location) -> Option<Raycast> {
        let iso = location.world_isometry();
        self.cast(&ray.transformed(&iso.inverse()))
            .map(|hit| hit.transformed(&iso))
    }

    fn cast_sector(
        &self,
        sector: Sector,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
        limit: f32,
    ) -> Option<Raycast> {
        match sector {
            Sector::Leaf { start, count } => self.cast_leaf(start, count, ray, limit),
            Sector::Node(index) => {
                let node = self.layout.nodes.get(index as usize)?;
                self.cast_node(node, ray, t_min, t_max, limit)
            }
        }
    }

    /// Front-to-back visit of a split node
    ///
    /// `[t_min, t_max]` is the stretch of the ray that can still reach this
    /// node; `limit` is the farthest distance worth reporting.
    fn cast_node(
        &self,
        node: &SplitNode,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
        limit: f32,
    ) -> Option<Raycast> {
        let o = node.axis.component(&ray.origin);
        let d = node.axis.component(&ray.direction);

        if d == 0.0 {
            // Parallel: each side is either always or never in reach
            let left = if at_most(o, node.left_value) {
                self.cast_sector(node.left, ray, t_min, t_max, limit)
            } else {
                None
            };
            let right_limit = left.map_or(limit, |hit| hit.distance.min(limit));
            let right = if at_most(node.right_value, o) {
                self.cast_sector(node.right, ray, t_min, t_max, right_limit)
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
            self.cast_sector(near, ray, t_min, t_max.min(near_exit), limit)
        } else {
            None
        };

        let mut far_max = t_max;
        let mut far_limit = limit;
        if let Some(hit) = near_hit {
            // A hit strictly outside the far side's slab is in front of it
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

        let far_min = t_min.max(far_entry);
        let far_hit = if at_most(far_min, far_max) {
            self.cast_sector(far, ray, far_min, far_max, far_limit)
        } else {
            None
        };

        Raycast::nearest(near_hit, far_hit)
    }

    fn cast_leaf(&self, start: u32, count: u32, ray: &Ray, limit: f32) -> Option<Raycast> {
        let start = start as usize;
        let run = self.layout.map.get(start..start + count as usize)?;

        let mut best: Option<(f32, u32, Triangle)> = None;
        for &index in run {
            let tri = self.source.triangle(index);
            let Some(t) = raycast::ray_triangle_distance(ray, &tri) else {
                continue;
            };
            if t <= limit && best.map_or(true, |(closest, _, _)| t < closest) {
                best = Some((t, index, tri));
            }
        }

        best.map(|(t, index, tri)| {
            Raycast::new(t, ray.point_at(t), tri.normal())
                .with_triangle(TriangleId::new(self.chunk, index))
        })
    }

    /// Lazy sequence of every triangle overlapping `shape`
    ///
    /// Each call starts a fresh traversal with its own stack.
    pub fn intersections(&self, shape: &Shape) -> ChunkIntersections<'_> {
        let mut stack = Vec::new();
        if !self.bounds.is_empty() && shape.intersects_aabb(&self.bounds) {
            stack.push(self.layout.root);
        }
        ChunkIntersections {
            tree: self,
            shape: *shape,
            reference: shape.reference_point(),
            stack,
            run: 0..0,
        }
    }

    /// True when any triangle overlaps `shape`
    pub fn intersects(&self, shape: &Shape) -> bool {
        self.intersections(shape).next().is_some()
    }

    /// Intersections of a world-space shape with this tree placed at `location`
    ///
    /// Results are reported in world space.
    pub fn intersections_in<'a>(
        &'a self,
        shape: &Shape,
        location: &Location,
    ) -> impl Iterator<Item = Intersection> + 'a {
        let iso = location.world_isometry();
        self.intersections(&shape.transformed(&iso.inverse()))
            .map(move |hit| hit.transformed(&iso))
    }

    /// [`ChunkTree::intersects`] for a tree placed at `location`
    pub fn intersects_in(&self, shape: &Shape, location: &Location) -> bool {
        self.intersections_in(shape, location).next().is_some()
    }
}

/// Iterator returned by [`ChunkTree::intersections`]
#[derive(Debug, Clone)]
pub struct ChunkIntersections<'a> {
    tree: &'a ChunkTree,
    shape: Shape,
    reference: Vec3,
    stack: Vec<Sector>,
    run: Range<usize>,
}

impl Iterator for ChunkIntersections<'_> {
    type Item = Intersection;

    fn next(&mut self) -> Option<Intersection> {
        loop {
            for slot in self.run.by_ref() {
                let Some(&index) = self.tree.layout.map.get(slot) else {
                    continue;
                };
                let tri = self.tree.source.triangle(index);
                if self.shape.intersects_triangle(&tri) {
                    return Some(Intersection {
                        point: closest::point_triangle(&self.reference, &tri),
                        triangle: tri,
                        triangle_id: Some(TriangleId::new(self.tree.chunk, index)),
                    });
                }
            }

            match self.stack.pop()? {
                Sector::Leaf { start, count } => {
                    let start = start as usize;
                    self.run = start..start + count as usize;
                }
                Sector::Node(index) => {
                    let Some(node) = self.tree.layout.nodes.get(index as usize) else {
                        continue;
                    };
                    // Push right first so the lower side is walked first
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform};
    use crate::geometry::Sphere;
    use crate::scene::{CollisionTreeData, SectorData, SplitNodeData};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    /// Two unit right triangles facing -Z, one at x in [0, 1] and one at x in [3, 4]
    fn two_triangle_chunk() -> MeshChunkData {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(3.0, 1.0, 0.0),
        ];
        MeshChunkData::from_mesh(vertices, &[[0, 1, 2], [3, 4, 5]]).with_collision(
            CollisionTreeData {
                nodes: vec![SplitNodeData {
                    axis: 0,
                    left_value: 1.0,
                    right_value: 3.0,
                    left: SectorData::leaf(0, 1),
                    right: SectorData::leaf(1, 1),
                }],
                map: vec![0, 1],
            },
        )
    }

    fn tree() -> ChunkTree {
        ChunkTree::from_chunk(7, &two_triangle_chunk(), &ColliderSettings::default()).unwrap()
    }

    #[test]
    fn test_cast_reports_triangle_identity() {
        let tree = tree();
        let ray = Ray::new(Vec3::new(3.2, 0.2, -1.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = tree.cast(&ray).unwrap();
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-6);
        assert_relative_eq!(hit.point, Vec3::new(3.2, 0.2, 0.0), epsilon = 1e-6);
        assert_eq!(hit.triangle, Some(TriangleId::new(7, 1)));
    }

    #[test]
    fn test_far_side_reached_after_near_miss() {
        let tree = tree();
        // Crosses the triangles' plane only at x = 3.2, so the near side has no hit
        let ray = Ray::new(Vec3::new(-5.0, 0.2, -1.0), Vec3::new(8.2, 0.0, 1.0));
        let hit = tree.cast(&ray).unwrap();
        assert_eq!(hit.triangle, Some(TriangleId::new(7, 1)));
        assert_relative_eq!(hit.point.z, 0.0, epsilon = 1e-5);
        assert!(hit.point.x >= 3.0 && hit.point.x <= 4.0);
    }

    #[test]
    fn test_max_length_cuts_hits() {
        let tree = tree();
        let ray = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(tree.cast_with_max(&ray, 0.5).is_none());
        assert!(tree.cast_with_max(&ray, 1.5).is_some());

        let short = Segment::new(Vec3::new(0.2, 0.2, -1.0), Vec3::new(0.2, 0.2, -0.5));
        assert!(tree.cast_segment(&short).is_none());
    }

    #[test]
    fn test_missing_collision_data() {
        let mut chunk = two_triangle_chunk();
        chunk.collision = None;
        let err = ChunkTree::from_chunk(3, &chunk, &ColliderSettings::default()).unwrap_err();
        assert_eq!(err, BuildError::MissingCollisionData { chunk: 3 });

        let fallback = ChunkTree::from_chunk_or_naive(3, &chunk, &ColliderSettings::default()).unwrap();
        assert_eq!(fallback.node_count(), 0);
        assert_eq!(fallback.leaf_count(), 1);
        assert_eq!(fallback.map(), &[0, 1]);
    }

    #[test]
    fn test_bounds_validation() {
        let mut chunk = two_triangle_chunk();
        chunk.bounds = Some(Aabb::new(Vec3::zeros(), Vec3::new(2.0, 1.0, 0.0)));
        let err = ChunkTree::from_chunk(0, &chunk, &ColliderSettings::default()).unwrap_err();
        assert_eq!(err, BuildError::BoundsMismatch { chunk: 0, triangle: 1 });

        let relaxed = ColliderSettings::default().with_bounds_validation(false);
        let tree = ChunkTree::from_chunk(0, &chunk, &relaxed).unwrap();
        assert_eq!(tree.bounds().max.x, 4.0);
    }

    #[test]
    fn test_intersections_walk_both_sides() {
        let tree = tree();
        let wide = Shape::Aabb(Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(5.0, 1.0, 1.0)));
        let ids: Vec<_> = tree.intersections(&wide).filter_map(|i| i.triangle_id).collect();
        assert_eq!(ids, vec![TriangleId::new(7, 0), TriangleId::new(7, 1)]);

        let left_only = Shape::Sphere(Sphere::new(Vec3::new(0.2, 0.2, 0.5), 0.6));
        let hits: Vec<_> = tree.intersections(&left_only).collect();
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].point, Vec3::new(0.2, 0.2, 0.0), epsilon = 1e-6);

        let gap = Shape::Sphere(Sphere::new(Vec3::new(2.0, 0.5, 0.0), 0.5));
        assert!(!tree.intersects(&gap));
        assert_eq!(tree.intersections(&gap).count(), 0);
    }

    #[test]
    fn test_intersections_restart_per_call() {
        let tree = tree();
        let shape = Shape::Aabb(Aabb::new(Vec3::repeat(-10.0), Vec3::repeat(10.0)));
        let mut first = tree.intersections(&shape);
        assert!(first.next().is_some());
        assert_eq!(tree.intersections(&shape).count(), 2);
        assert_eq!(first.count(), 1);
    }

    #[test]
    fn test_local_mesh_tree() {
        let vertices = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ];
        // Second triangle is collinear
        let tree = ChunkTree::from_mesh(2, &vertices, &[[0, 1, 2], [0, 1, 3]], &ColliderSettings::default())
            .unwrap();
        assert!(matches!(tree.source(), TriangleSource::Local(_)));
        let everything = Shape::Aabb(Aabb::new(Vec3::repeat(-5.0), Vec3::repeat(5.0)));
        let ids: Vec<_> = tree.intersections(&everything).filter_map(|i| i.triangle_id).collect();
        assert_eq!(ids, vec![TriangleId::new(2, 0)]);
    }

    #[test]
    fn test_long_thin_triangle_is_hit() {
        // 100 units long, 0.01 wide at the far end
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(100.0, 0.01, 0.0),
        ];
        let chunk = MeshChunkData::from_mesh(vertices, &[[0, 1, 2]]);
        let tree = ChunkTree::naive(4, &chunk, &ColliderSettings::default()).unwrap();
        assert!(!tree.triangle(0).is_nan());

        // At x = 90 the triangle spans y in [0, 0.009]
        let ray = Ray::new(Vec3::new(90.0, 0.004, -1.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = tree.cast(&ray).unwrap();
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
        assert_eq!(hit.triangle, Some(TriangleId::new(4, 0)));

        let ball = Shape::Sphere(Sphere::new(Vec3::new(90.0, 0.004, 0.05), 0.1));
        let ids: Vec<_> = tree.intersections(&ball).filter_map(|i| i.triangle_id).collect();
        assert_eq!(ids, vec![TriangleId::new(4, 0)]);
    }

    #[test]
    fn test_queries_through_location() {
        let tree = tree();
        // Tree turned a quarter around Y and lifted: its -Z facing triangles now face -X
        let location = Location::new(Transform::from_position_rotation(
            Vec3::new(0.0, 10.0, 0.0),
            Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2),
        ));

        let iso = location.world_isometry();
        let target = iso.transform_point(&Vec3::new(0.2, 0.2, 0.0).into()).coords;
        let origin = iso.transform_point(&Vec3::new(0.2, 0.2, -1.0).into()).coords;
        let ray = Ray::new(origin, target - origin);

        let hit = tree.cast_in(&ray, &location).unwrap();
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.point, target, epsilon = 1e-5);
        assert_eq!(hit.triangle, Some(TriangleId::new(7, 0)));

        let ball = Shape::Sphere(Sphere::new(target, 0.1));
        assert!(tree.intersects_in(&ball, &location));
        let hits: Vec<_> = tree.intersections_in(&ball, &location).collect();
        assert_relative_eq!(hits[0].point, target, epsilon = 1e-5);
        assert!(!tree.intersects(&ball));
    }

    #[test]
    fn test_tree_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChunkTree>();
        assert_send_sync::<ChunkIntersections<'static>>();
    }
}
