//! # Collision Engine
//!
//! Collision detection and swept movement resolution for game entities.
//!
//! ## Features
//!
//! - **Intersection library**: closed-form tests between spheres, planes,
//!   segments, triangles, AABBs, OBBs (SAT) and capsules
//! - **Colliders**: per-entity collision volumes with a typed owner and a
//!   contact handler
//! - **Collision registry**: handle-based collider storage with a per
//!   type-pair dispatch table and an all-pairs sweep
//! - **Swept movement**: per-axis character movement against static boxes
//!   with floor and ceiling detection
//! - **Debug drawing**: collider shapes queued for any renderer
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_engine::prelude::*;
//!
//! let mut manager = CollisionManager::new();
//! manager.register_pair_test_symmetric(CollisionTypeId::BULLET, CollisionTypeId::ENEMY, pair_tests::obb_vs_obb);
//!
//! let enemy = manager.add_collider(Collider::new(CollisionTypeId::ENEMY));
//! manager.add_collider(Collider::new(CollisionTypeId::BULLET).at(Vec3::new(0.8, 0.0, 0.0)));
//!
//! assert_eq!(manager.check_all_collisions(), 1);
//! assert!(manager.is_colliding(enemy));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod physics;
pub mod debug;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, CollisionConfig, ConfigError},
        debug::{CollisionDebugVisualizer, DebugShape},
        foundation::{
            collections::ColliderHandle,
            math::{Quat, Vec3},
        },
        physics::{
            pair_tests,
            CharacterMover, Collider, ColliderFlags, ColliderShape, CollisionError,
            CollisionHandler, CollisionManager, CollisionPair, CollisionTypeId, EntityId,
            MovementResult, Owner, OwnerKind, SweptResolver, AABB,
        },
    };
}
