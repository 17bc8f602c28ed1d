//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Value types (sphere, plane, segment, triangle, AABB, OBB, capsule)
//! - [`intersect`] - Narrow-phase boolean intersection tests
//! - [`shape`] - Local-space collider shapes and their world-space projection

pub mod primitives;
pub mod intersect;
pub mod shape;

// Re-export commonly used types
pub use primitives::{Capsule, Plane, Segment, Sphere, Triangle, AABB, OBB};
pub use shape::{ColliderShape, ShapeKind, WorldShape};
