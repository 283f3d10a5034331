//! Hand-built scenes with known answers

use super::fixtures::{median_split, rng, split_world};
use crate::config::ColliderSettings;
use crate::error::BuildError;
use crate::foundation::math::Vec3;
use crate::geometry::{Ray, Segment, Sphere, TriangleId};
use crate::query::Shape;
use crate::scene::{MeshChunkData, PartitionChildData, PartitionNodeData, WorldData};
use crate::tree::ChunkTree;
use crate::world::WorldCollider;
use approx::assert_relative_eq;

fn right_triangle() -> MeshChunkData {
    MeshChunkData::from_mesh(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        &[[0, 1, 2]],
    )
}

/// Wall in the plane x = `x` facing -X, spanning three units from (`y`, `z`)
fn wall(vertices: &mut Vec<Vec3>, indices: &mut Vec<[u32; 3]>, x: f32, y: f32, z: f32) {
    let base = vertices.len() as u32;
    vertices.push(Vec3::new(x, y, z));
    vertices.push(Vec3::new(x, y + 3.0, z));
    vertices.push(Vec3::new(x, y, z + 3.0));
    indices.push([base, base + 1, base + 2]);
}

fn chunk(vertices: Vec<Vec3>, indices: &[[u32; 3]]) -> MeshChunkData {
    let mut chunk = MeshChunkData::from_mesh(vertices, indices);
    chunk.collision = Some(median_split(&chunk));
    chunk
}

/// Chunk L spans x in [-4, -2], chunk R sits at x = 3, split at -1 / +1
fn x_split_world() -> WorldData {
    let (mut v, mut i) = (Vec::new(), Vec::new());
    // Floor strip below the rays plus a wall high up at x = -3
    v.extend([
        Vec3::new(-4.0, -3.0, -1.0),
        Vec3::new(-2.0, -3.0, -1.0),
        Vec3::new(-4.0, -3.0, 1.0),
    ]);
    i.push([0, 1, 2]);
    wall(&mut v, &mut i, -3.0, 4.0, -1.0);
    let left = chunk(v, &i);

    let (mut v, mut i) = (Vec::new(), Vec::new());
    wall(&mut v, &mut i, 3.0, -1.0, -1.0);
    wall(&mut v, &mut i, 3.0, 4.0, -1.0);
    let right = chunk(v, &i);

    WorldData {
        partitions: vec![PartitionNodeData {
            axis: 0,
            left_value: -1.0,
            right_value: 1.0,
            left: PartitionChildData::Chunk(0),
            right: PartitionChildData::Chunk(1),
        }],
        root_partition: Some(0),
        root_chunk: None,
        chunks: vec![left, right],
    }
}

#[test]
fn test_right_triangle_hit() {
    let tree = ChunkTree::naive(0, &right_triangle(), &ColliderSettings::default()).unwrap();
    let ray = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::new(0.0, 0.0, 1.0));
    let hit = tree.cast(&ray).unwrap();
    assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-6);
    assert_relative_eq!(hit.point, Vec3::new(0.2, 0.2, 0.0), epsilon = 1e-6);
    assert_relative_eq!(hit.normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    assert_eq!(hit.triangle, Some(TriangleId::new(0, 0)));
}

#[test]
fn test_back_face_never_hits() {
    let tree = ChunkTree::naive(0, &right_triangle(), &ColliderSettings::default()).unwrap();
    let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::new(0.0, 0.0, -1.0));
    assert!(tree.cast(&ray).is_none());

    let segment = Segment::new(Vec3::new(0.2, 0.2, 1.0), Vec3::new(0.2, 0.2, -1.0));
    assert!(tree.cast_segment(&segment).is_none());

    // Overlap queries are two-sided
    assert!(tree.intersects(&Shape::Segment(segment)));
}

#[test]
fn test_far_chunk_hit_after_empty_near_chunk() {
    let world = WorldCollider::build(&x_split_world(), &ColliderSettings::default()).unwrap();
    let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
    let hit = world.cast(&ray).unwrap();
    assert_relative_eq!(hit.distance, 8.0, epsilon = 1e-5);
    assert_relative_eq!(hit.point, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
    assert_eq!(hit.triangle, Some(TriangleId::new(1, 0)));

    // Too short to reach chunk R
    assert!(world.cast_with_max(&ray, 7.5).is_none());
}

#[test]
fn test_near_chunk_hit_wins() {
    let world = WorldCollider::build(&x_split_world(), &ColliderSettings::default()).unwrap();
    let ray = Ray::new(Vec3::new(-5.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
    let hit = world.cast(&ray).unwrap();
    assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-5);
    assert_eq!(hit.triangle, Some(TriangleId::new(0, 1)));

    // Starting between the chunks, only R is ahead
    let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
    let hit = world.cast(&ray).unwrap();
    assert_eq!(hit.triangle, Some(TriangleId::new(1, 1)));
}

#[test]
fn test_world_shape_queries() {
    let world = WorldCollider::build(&x_split_world(), &ColliderSettings::default()).unwrap();

    let both_walls = Shape::Segment(Segment::new(Vec3::new(-5.0, 5.0, 0.0), Vec3::new(5.0, 5.0, 0.0)));
    let ids: Vec<_> = world.intersections(&both_walls).filter_map(|i| i.triangle_id).collect();
    assert_eq!(ids, vec![TriangleId::new(0, 1), TriangleId::new(1, 1)]);

    let middle = Shape::Sphere(Sphere::new(Vec3::zeros(), 0.9));
    assert!(!world.intersects(&middle));
    assert_eq!(world.intersections(&middle).count(), 0);

    let touching = Shape::Sphere(Sphere::new(Vec3::new(2.5, 0.0, 0.0), 0.6));
    let hits: Vec<_> = world.intersections(&touching).collect();
    assert_eq!(hits.len(), 1);
    assert_relative_eq!(hits[0].point, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_single_chunk_world() {
    let world = WorldCollider::build(
        &WorldData::single_chunk(right_triangle()),
        &ColliderSettings::default().with_synthesized_trees(true),
    )
    .unwrap();
    assert_eq!(world.collidable_chunk_count(), 1);
    let ray = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::new(0.0, 0.0, 1.0));
    assert_relative_eq!(world.cast(&ray).unwrap().distance, 1.0, epsilon = 1e-6);
}

#[test]
fn test_missing_tree_is_an_error_for_strict_chunks() {
    assert_eq!(
        ChunkTree::from_chunk(4, &right_triangle(), &ColliderSettings::default()).unwrap_err(),
        BuildError::MissingCollisionData { chunk: 4 }
    );
}

#[test]
fn test_naive_builder_is_deterministic() {
    let vertices = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
    ];
    let indices = [[0, 1, 2], [1, 3, 2]];
    let settings = ColliderSettings::default();

    let first = ChunkTree::from_mesh(0, &vertices, &indices, &settings).unwrap();
    let second = ChunkTree::from_mesh(0, &vertices, &indices, &settings).unwrap();
    assert_eq!(first.to_collision_data(), second.to_collision_data());
    assert_eq!(first.map(), second.map());
    assert_eq!(first.bounds(), second.bounds());

    let mut rng = rng(11);
    let data = split_world(&mut rng, 30, 1.0);
    let a = ChunkTree::naive(0, &data.chunks[0], &settings).unwrap();
    let b = ChunkTree::naive(0, &data.chunks[0], &settings).unwrap();
    assert_eq!(a.to_collision_data(), b.to_collision_data());
    assert_eq!(a.map(), (0..30).collect::<Vec<u32>>().as_slice());
}

#[test]
fn test_collider_shared_across_threads() {
    let mut rng = rng(5);
    let world = WorldCollider::build(&split_world(&mut rng, 40, 1.0), &ColliderSettings::default()).unwrap();
    let rays: Vec<Ray> = (0..16)
        .map(|i| {
            let angle = i as f32 * 0.4;
            Ray::new(Vec3::new(-20.0, angle.sin() * 3.0, angle.cos() * 3.0), Vec3::new(1.0, 0.0, 0.0))
        })
        .collect();
    let expected: Vec<_> = rays.iter().map(|r| world.cast(r)).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| rays.iter().map(|r| world.cast(r)).collect::<Vec<_>>()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
