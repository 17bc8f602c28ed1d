//! Handle-based collections
//!
//! Colliders live in a generational arena. A handle whose slot has been
//! reused carries a stale generation and simply fails to resolve.

pub use slotmap::{SlotMap, Key};

slotmap::new_key_type! {
    /// Generational handle to a collider stored in a [`crate::physics::CollisionManager`]
    pub struct ColliderHandle;
}

/// Arena of colliders keyed by [`ColliderHandle`]
pub type ColliderArena<T> = SlotMap<ColliderHandle, T>;
