//! Physics module for collision detection and response
//!
//! - [`collision`] - shape primitives and the narrow-phase intersection library
//! - [`collider`] - the per-entity collider record
//! - [`collision_system`] - the collider registry and per-frame pair sweep
//! - [`pair_tests`] - ready-made tests for the registry's dispatch table
//! - [`movement`] - swept, per-axis character movement against world boxes

pub mod collision;
pub mod collider;
pub mod collision_types;
pub mod collision_system;
pub mod pair_tests;
pub mod movement;

use thiserror::Error;

use crate::config::ConfigError;
use crate::foundation::collections::ColliderHandle;

pub use collider::{Collider, ColliderFlags, ColliderId, CollisionHandler, EntityId, Owner, OwnerKind};
pub use collision::{
    Capsule, ColliderShape, Plane, Segment, ShapeKind, Sphere, Triangle, WorldShape, AABB, OBB,
};
pub use collision_system::{CollisionManager, CollisionPair, PairTestFn};
pub use collision_types::CollisionTypeId;
pub use movement::{CharacterMover, MovementResult, SweptResolver};

/// Errors raised by the collision registry and collider API
#[derive(Error, Debug)]
pub enum CollisionError {
    /// The handle's collider was removed (or its slot reused)
    #[error("Collider handle {0:?} is stale or was never registered")]
    StaleHandle(ColliderHandle),

    /// An owner downcast named the wrong entity category
    #[error("Owner mismatch: expected {expected:?}, found {actual:?}")]
    OwnerMismatch {
        /// Requested owner category
        expected: OwnerKind,
        /// Actual owner category, `None` when unowned
        actual: Option<OwnerKind>,
    },

    /// Configuration could not be loaded
    #[error("Collision config error: {0}")]
    Config(#[from] ConfigError),
}
