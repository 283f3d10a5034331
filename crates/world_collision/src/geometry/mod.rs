//! Geometric primitives and query result types
//!
//! Plain value types. The algorithms that combine them live in
//! [`crate::query`].

pub mod aabb;
pub mod hit;
pub mod obb;
pub mod plane;
pub mod ray;
pub mod sphere;
pub mod triangle;

pub use aabb::Aabb;
pub use hit::{Intersection, Raycast, TriangleId};
pub use obb::OrientedBox;
pub use plane::Plane;
pub use ray::{Ray, Segment};
pub use sphere::Sphere;
pub use triangle::Triangle;
