//! # World Collision
//!
//! Collision and ray queries against static world geometry made of many
//! independently authored mesh chunks.
//!
//! ## Layers
//!
//! - **Primitives** ([`geometry`]): boxes, spheres, planes, triangles, rays
//! - **Narrow phase** ([`query`]): primitive-versus-primitive tests
//! - **Chunk trees** ([`tree`]): split hierarchy over one chunk's triangles
//! - **World collider** ([`world`]): partition tree over chunks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use world_collision::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let world: WorldData = ron::from_str(&std::fs::read_to_string("world.ron")?)?;
//!     let collider = WorldCollider::build(&world, &ColliderSettings::default())?;
//!
//!     let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
//!     if let Some(hit) = collider.cast(&ray) {
//!         println!("hit {:?} at {}", hit.triangle, hit.distance);
//!     }
//!
//!     let ball = Shape::Sphere(Sphere::new(Vec3::zeros(), 0.5));
//!     for overlap in collider.intersections(&ball) {
//!         println!("touching {:?}", overlap.triangle_id);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod geometry;
pub mod query;
pub mod scene;
pub mod tree;
pub mod world;

#[cfg(test)]
mod tests;

/// Common imports for collider users
pub mod prelude {
    pub use crate::{
        config::{ColliderSettings, Config},
        error::{BuildError, QueryError},
        foundation::math::{Axis, Location, Quat, Transform, Vec3},
        geometry::{
            Aabb, Intersection, OrientedBox, Plane, Ray, Raycast, Segment, Sphere, Triangle,
            TriangleId,
        },
        query::{intersects, PlaneSide, Shape},
        scene::{MeshChunkData, WorldData},
        tree::ChunkTree,
        world::WorldCollider,
    };
}
