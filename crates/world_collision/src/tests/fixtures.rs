//! Test corpora: random chunks, a median-split tree builder and small worlds

use crate::foundation::math::{Axis, Quat, Unit, Vec3};
use crate::geometry::{Aabb, OrientedBox, Plane, Segment, Sphere, Triangle};
use crate::query::Shape;
use crate::scene::{
    CollisionTreeData, MeshChunkData, PartitionChildData, PartitionNodeData, SectorData,
    SplitNodeData, WorldData,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest leaf the median split builder emits
const LEAF_SIZE: usize = 4;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_vec(rng: &mut StdRng, lo: Vec3, hi: Vec3) -> Vec3 {
    Vec3::new(
        rng.gen_range(lo.x..=hi.x),
        rng.gen_range(lo.y..=hi.y),
        rng.gen_range(lo.z..=hi.z),
    )
}

pub fn random_unit(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = random_vec(rng, Vec3::repeat(-1.0), Vec3::repeat(1.0));
        let n = v.norm();
        if n > 0.1 && n <= 1.0 {
            return v / n;
        }
    }
}

/// Precomputed split data built by recursive median splits on triangle centroids
///
/// Each node's values are the exact extremes of its two halves, so the
/// sectors may overlap or leave a gap between them.
pub fn median_split(chunk: &MeshChunkData) -> CollisionTreeData {
    let bounds: Vec<Aabb> = chunk
        .triangles
        .iter()
        .map(|t| Aabb::from_points(t.indices.iter().map(|&i| &chunk.vertices[i as usize])))
        .collect();

    let mut builder = MedianSplit {
        bounds: &bounds,
        nodes: Vec::new(),
        map: Vec::new(),
    };
    let mut all: Vec<u32> = (0..chunk.triangles.len() as u32).collect();
    builder.build(&mut all);
    CollisionTreeData {
        nodes: builder.nodes,
        map: builder.map,
    }
}

struct MedianSplit<'a> {
    bounds: &'a [Aabb],
    nodes: Vec<SplitNodeData>,
    map: Vec<u32>,
}

impl MedianSplit<'_> {
    fn build(&mut self, triangles: &mut [u32]) -> SectorData {
        if triangles.len() <= LEAF_SIZE {
            let start = self.map.len() as u32;
            self.map.extend_from_slice(triangles);
            return SectorData::leaf(start, triangles.len() as u32);
        }

        let spread = Aabb::from_points(
            triangles
                .iter()
                .map(|&t| self.bounds[t as usize].center())
                .collect::<Vec<_>>()
                .iter(),
        )
        .size();
        let axis = if spread.x >= spread.y && spread.x >= spread.z {
            Axis::X
        } else if spread.y >= spread.z {
            Axis::Y
        } else {
            Axis::Z
        };

        let key = |t: &u32| axis.component(&self.bounds[*t as usize].center());
        triangles.sort_by(|a, b| key(a).total_cmp(&key(b)));
        let (left, right) = triangles.split_at_mut(triangles.len() / 2);

        let left_value = left
            .iter()
            .map(|&t| self.bounds[t as usize].max_on(axis))
            .fold(f32::NEG_INFINITY, f32::max);
        let right_value = right
            .iter()
            .map(|&t| self.bounds[t as usize].min_on(axis))
            .fold(f32::INFINITY, f32::min);

        let index = self.nodes.len();
        self.nodes.push(SplitNodeData {
            axis: axis.index() as u8,
            left_value,
            right_value,
            left: SectorData::leaf(0, 0),
            right: SectorData::leaf(0, 0),
        });
        let left = self.build(left);
        let right = self.build(right);
        self.nodes[index].left = left;
        self.nodes[index].right = right;
        SectorData::node(index as u32)
    }
}

/// Random triangle soup around `center`, every seventh triangle degenerate
///
/// Returns the chunk (with median split data attached) and the indices of the
/// degenerate triangles.
pub fn random_chunk(
    rng: &mut StdRng,
    count: usize,
    center: Vec3,
    extent: Vec3,
) -> (MeshChunkData, Vec<u32>) {
    let mut vertices = Vec::with_capacity(count * 3);
    let mut indices = Vec::with_capacity(count);
    let mut degenerate = Vec::new();

    for i in 0..count {
        let base = vertices.len() as u32;
        let middle = random_vec(rng, center - extent, center + extent);
        let a = middle + random_vec(rng, Vec3::repeat(-1.0), Vec3::repeat(1.0));
        let b = middle + random_vec(rng, Vec3::repeat(-1.0), Vec3::repeat(1.0));
        vertices.push(a);
        if i % 7 == 3 {
            degenerate.push(i as u32);
            if i % 2 == 0 {
                // Coincident vertices
                vertices.push(b);
                vertices.push(a);
            } else {
                // Collinear along X; y and z are shared exactly
                vertices.push(Vec3::new(a.x + 0.5, a.y, a.z));
                vertices.push(Vec3::new(a.x + 1.0, a.y, a.z));
            }
        } else {
            vertices.push(b);
            vertices.push(middle + random_vec(rng, Vec3::repeat(-1.0), Vec3::repeat(1.0)));
        }
        indices.push([base, base + 1, base + 2]);
    }

    let mut chunk = MeshChunkData::from_mesh(vertices, &indices);
    let tree = median_split(&chunk);
    chunk.collision = Some(tree);
    (chunk, degenerate)
}

/// Two chunks split on X: one left of `-gap`, one right of `gap`
pub fn split_world(rng: &mut StdRng, per_chunk: usize, gap: f32) -> WorldData {
    let extent = Vec3::new(3.0, 6.0, 6.0);
    let (left, _) = random_chunk(rng, per_chunk, Vec3::new(-gap - 4.0, 0.0, 0.0), extent);
    let (right, _) = random_chunk(rng, per_chunk, Vec3::new(gap + 4.0, 0.0, 0.0), extent);

    let left_value = left.vertices.iter().map(|v| v.x).fold(f32::NEG_INFINITY, f32::max);
    let right_value = right.vertices.iter().map(|v| v.x).fold(f32::INFINITY, f32::min);

    WorldData {
        partitions: vec![PartitionNodeData {
            axis: 0,
            left_value,
            right_value,
            left: PartitionChildData::Chunk(0),
            right: PartitionChildData::Chunk(1),
        }],
        root_partition: Some(0),
        root_chunk: None,
        chunks: vec![left, right],
    }
}

/// A random query shape of moderate size somewhere inside `region`
pub fn random_shape(rng: &mut StdRng, region: &Aabb) -> Shape {
    let center = random_vec(rng, region.min, region.max);
    match rng.gen_range(0..6) {
        0 => {
            let extents = random_vec(rng, Vec3::repeat(0.2), Vec3::repeat(2.5));
            Shape::Aabb(Aabb::from_center_extents(center, extents))
        }
        1 => {
            let extents = random_vec(rng, Vec3::repeat(0.2), Vec3::repeat(2.5));
            let rotation = Quat::from_axis_angle(
                &Unit::new_normalize(random_unit(rng)),
                rng.gen_range(0.0..std::f32::consts::TAU),
            );
            Shape::Obb(OrientedBox::new(center, extents, rotation))
        }
        2 => Shape::Sphere(Sphere::new(center, rng.gen_range(0.2..3.0))),
        3 => {
            let spread = Vec3::repeat(2.0);
            Shape::Triangle(Triangle::new(
                center,
                center + random_vec(rng, -spread, spread),
                center + random_vec(rng, -spread, spread),
            ))
        }
        4 => Shape::Segment(Segment::new(
            center,
            center + random_unit(rng) * rng.gen_range(0.5..6.0),
        )),
        _ => Shape::Plane(Plane::from_point_normal(&center, &random_unit(rng))),
    }
}
