//! Debug visualization for colliders
//!
//! Shapes are only queued here; turning them into pixels is the host
//! renderer's job.

pub mod draw;
pub mod collision_debug;

pub use draw::{DebugShape, DebugDrawSystem, DebugShapeId};
pub use collision_debug::{CollisionDebugColors, CollisionDebugVisualizer};
