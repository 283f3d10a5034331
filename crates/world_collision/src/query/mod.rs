//! Narrow-phase query library
//!
//! Stateless primitive-versus-primitive routines: containment, closest
//! points, overlap (Separating Axis Theorem for boxes and triangles, closest
//! point for spheres), ray casts and plane-side classification. Everything
//! here is a pure function and safe to call from any thread.
//!
//! "No result" is always `None` or `false`. A primitive pair that has no
//! routine at all is reported through [`QueryError::NotImplemented`] by the
//! [`Shape`] dispatch, so callers can tell a missing feature from a miss.
//!
//! [`QueryError::NotImplemented`]: crate::error::QueryError::NotImplemented

pub mod closest;
pub mod containment;
pub mod overlap;
pub mod raycast;
pub mod sat;
pub mod shape;
pub mod side;

pub use shape::{intersects, Shape};
pub use side::PlaneSide;
