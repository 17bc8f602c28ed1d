//! Entity-attached collider
//!
//! A [`Collider`] combines a gameplay type id, a process-unique serial id, a
//! typed owner reference, a transform and one [`ColliderShape`]. Entities
//! react to contacts through an optional [`CollisionHandler`].

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

use crate::foundation::math::{Quat, Vec3};
use super::collision::{Capsule, ColliderShape, Segment, ShapeKind, Sphere, WorldShape, AABB, OBB};
use super::collision_types::CollisionTypeId;
use super::CollisionError;

static NEXT_COLLIDER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique serial id, assigned once at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(u64);

impl ColliderId {
    fn next() -> Self {
        Self(NEXT_COLLIDER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw serial value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collider#{}", self.0)
    }
}

/// Game-side identifier of the entity that owns a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Category of an owning entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerKind {
    /// Static world object
    World,
    /// Player character
    Player,
    /// Enemy character
    Enemy,
    /// Boss character
    Boss,
    /// Player projectile
    Bullet,
    /// Enemy projectile
    EnemyBullet,
    /// Pickup
    Item,
    /// Weapon hit volume
    Weapon,
}

/// Typed reference to the entity owning a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Owner {
    /// No owner attached
    #[default]
    Unowned,
    /// Owned by a static world object
    World(EntityId),
    /// Owned by the player
    Player(EntityId),
    /// Owned by an enemy
    Enemy(EntityId),
    /// Owned by a boss
    Boss(EntityId),
    /// Owned by a player projectile
    Bullet(EntityId),
    /// Owned by an enemy projectile
    EnemyBullet(EntityId),
    /// Owned by a pickup
    Item(EntityId),
    /// Owned by a weapon
    Weapon(EntityId),
}

impl Owner {
    /// Build an owner of the given kind
    pub fn new(kind: OwnerKind, entity: EntityId) -> Self {
        match kind {
            OwnerKind::World => Self::World(entity),
            OwnerKind::Player => Self::Player(entity),
            OwnerKind::Enemy => Self::Enemy(entity),
            OwnerKind::Boss => Self::Boss(entity),
            OwnerKind::Bullet => Self::Bullet(entity),
            OwnerKind::EnemyBullet => Self::EnemyBullet(entity),
            OwnerKind::Item => Self::Item(entity),
            OwnerKind::Weapon => Self::Weapon(entity),
        }
    }

    /// Owner category, `None` when unowned
    pub fn kind(&self) -> Option<OwnerKind> {
        self.split().map(|(kind, _)| kind)
    }

    /// Owning entity regardless of its category
    pub fn entity(&self) -> Option<EntityId> {
        self.split().map(|(_, entity)| entity)
    }

    /// The owning entity if it is of `kind`
    pub fn as_kind(&self, kind: OwnerKind) -> Option<EntityId> {
        match self.split() {
            Some((actual, entity)) if actual == kind => Some(entity),
            _ => None,
        }
    }

    /// Checked downcast: the owning entity, or an error naming the actual owner
    pub fn expect_kind(&self, kind: OwnerKind) -> Result<EntityId, CollisionError> {
        self.as_kind(kind).ok_or(CollisionError::OwnerMismatch {
            expected: kind,
            actual: self.kind(),
        })
    }

    fn split(&self) -> Option<(OwnerKind, EntityId)> {
        let pair = match *self {
            Self::Unowned => return None,
            Self::World(e) => (OwnerKind::World, e),
            Self::Player(e) => (OwnerKind::Player, e),
            Self::Enemy(e) => (OwnerKind::Enemy, e),
            Self::Boss(e) => (OwnerKind::Boss, e),
            Self::Bullet(e) => (OwnerKind::Bullet, e),
            Self::EnemyBullet(e) => (OwnerKind::EnemyBullet, e),
            Self::Item(e) => (OwnerKind::Item, e),
            Self::Weapon(e) => (OwnerKind::Weapon, e),
        };
        Some(pair)
    }
}

bitflags! {
    /// Per-collider switches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColliderFlags: u8 {
        /// Take part in the collision sweep
        const ENABLED = 1 << 0;
        /// Draw this collider when debug visualization is on
        const DEBUG_DRAW = 1 << 1;
    }
}

impl Default for ColliderFlags {
    fn default() -> Self {
        Self::ENABLED | Self::DEBUG_DRAW
    }
}

/// Contact callback implemented by entities that react to collisions
///
/// `this` is the collider the handler is attached to; `other` is the
/// collider it overlapped this frame.
pub trait CollisionHandler {
    /// Called once per frame for every confirmed overlap. Default: no-op.
    fn on_collision(&mut self, this: &Collider, other: &Collider) {
        let _ = (this, other);
    }
}

impl<F> CollisionHandler for F
where
    F: FnMut(&Collider, &Collider),
{
    fn on_collision(&mut self, this: &Collider, other: &Collider) {
        self(this, other);
    }
}

/// Collision volume attached to a gameplay entity
pub struct Collider {
    type_id: CollisionTypeId,
    id: ColliderId,
    owner: Owner,
    center: Vec3,
    half_size: Vec3,
    rotation: Quat,
    shape: ColliderShape,
    flags: ColliderFlags,
    colliding: bool,
    handler: Option<Box<dyn CollisionHandler>>,
}

impl Collider {
    /// Create an OBB collider with half size 0.5 at the origin
    pub fn new(type_id: CollisionTypeId) -> Self {
        Self {
            type_id,
            id: ColliderId::next(),
            owner: Owner::Unowned,
            center: Vec3::zeros(),
            half_size: Vec3::repeat(0.5),
            rotation: Quat::identity(),
            shape: ColliderShape::Obb,
            flags: ColliderFlags::default(),
            colliding: false,
            handler: None,
        }
    }

    /// Create a collider with an explicit shape
    pub fn with_shape(type_id: CollisionTypeId, shape: ColliderShape) -> Self {
        Self { shape, ..Self::new(type_id) }
    }

    /// Builder: set the owner
    pub fn owned_by(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    /// Builder: set the center
    pub fn at(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Builder: set the OBB half size
    pub fn with_half_size(mut self, half_size: Vec3) -> Self {
        self.half_size = half_size.abs();
        self
    }

    /// Builder: set the orientation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: attach a contact handler
    pub fn with_handler(mut self, handler: impl CollisionHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Gameplay category used for dispatch
    pub fn type_id(&self) -> CollisionTypeId {
        self.type_id
    }

    /// Change the gameplay category
    pub fn set_type_id(&mut self, type_id: CollisionTypeId) {
        self.type_id = type_id;
    }

    /// Serial id assigned at construction
    pub fn id(&self) -> ColliderId {
        self.id
    }

    /// Owning entity
    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Replace the owning entity
    pub fn set_owner(&mut self, owner: Owner) {
        self.owner = owner;
    }

    /// World-space center
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Move the collider
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// OBB half extents
    pub fn half_size(&self) -> Vec3 {
        self.half_size
    }

    /// Set OBB half extents (negative components are mirrored)
    pub fn set_half_size(&mut self, half_size: Vec3) {
        self.half_size = half_size.abs();
    }

    /// Orientation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Set orientation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Active shape (local space)
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Replace the active shape
    pub fn set_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
    }

    /// Tag of the active shape
    pub fn shape_kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Switch back to the OBB shape
    pub fn use_obb(&mut self) {
        self.shape = ColliderShape::Obb;
    }

    /// World-space OBB derived from center, half size and orientation
    ///
    /// Available whatever the active shape is.
    pub fn obb(&self) -> OBB {
        OBB::from_rotation(self.center, self.half_size * 2.0, &self.rotation)
    }

    /// Make a local-space sphere the active shape
    pub fn set_sphere(&mut self, sphere: Sphere) {
        self.shape = ColliderShape::Sphere(sphere);
    }

    /// Local-space sphere, if that is the active shape
    pub fn sphere(&self) -> Option<Sphere> {
        match self.shape {
            ColliderShape::Sphere(sphere) => Some(sphere),
            _ => None,
        }
    }

    /// Make a local-space segment the active shape
    pub fn set_segment(&mut self, segment: Segment) {
        self.shape = ColliderShape::Segment(segment);
    }

    /// Local-space segment, if that is the active shape
    pub fn segment(&self) -> Option<Segment> {
        match self.shape {
            ColliderShape::Segment(segment) => Some(segment),
            _ => None,
        }
    }

    /// Make a local-space capsule the active shape
    pub fn set_capsule(&mut self, capsule: Capsule) {
        self.shape = ColliderShape::Capsule(capsule);
    }

    /// Local-space capsule, if that is the active shape
    pub fn capsule(&self) -> Option<Capsule> {
        match self.shape {
            ColliderShape::Capsule(capsule) => Some(capsule),
            _ => None,
        }
    }

    /// Active shape projected into world space
    pub fn world_shape(&self) -> WorldShape {
        self.shape.to_world_space(self.center, self.half_size, &self.rotation)
    }

    /// World-space bounds of the active shape
    pub fn aabb(&self) -> AABB {
        self.world_shape().bounding_aabb()
    }

    /// Per-collider flags
    pub fn flags(&self) -> ColliderFlags {
        self.flags
    }

    /// Include or exclude this collider from the sweep
    pub fn set_enabled(&mut self, enabled: bool) {
        self.flags.set(ColliderFlags::ENABLED, enabled);
    }

    /// Whether the sweep considers this collider
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(ColliderFlags::ENABLED)
    }

    /// Toggle debug drawing for this collider
    pub fn set_debug_draw(&mut self, draw: bool) {
        self.flags.set(ColliderFlags::DEBUG_DRAW, draw);
    }

    /// Overlapped anything during the last sweep
    pub fn is_colliding(&self) -> bool {
        self.colliding
    }

    pub(crate) fn set_colliding(&mut self, colliding: bool) {
        self.colliding = colliding;
    }

    /// Attach or replace the contact handler
    pub fn set_handler(&mut self, handler: impl CollisionHandler + 'static) {
        self.handler = Some(Box::new(handler));
    }

    /// Detach the contact handler
    pub fn clear_handler(&mut self) {
        self.handler = None;
    }

    /// Invoke the contact handler with `other`; no-op without a handler
    pub fn on_collision(&mut self, other: &Collider) {
        self.notify(other, false);
    }

    /// Invoke the handler, optionally containing a panic
    ///
    /// Returns `false` if the handler panicked. The handler stays attached
    /// either way.
    pub(crate) fn notify(&mut self, other: &Collider, isolate_panics: bool) -> bool {
        let Some(mut handler) = self.handler.take() else {
            return true;
        };

        let completed = if isolate_panics {
            let this = &*self;
            panic::catch_unwind(AssertUnwindSafe(|| handler.on_collision(this, other))).is_ok()
        } else {
            handler.on_collision(self, other);
            true
        };

        self.handler = Some(handler);
        completed
    }
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("type_id", &self.type_id)
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("center", &self.center)
            .field("half_size", &self.half_size)
            .field("shape", &self.shape)
            .field("flags", &self.flags)
            .field("has_handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_serial_ids_are_unique_and_increasing() {
        let a = Collider::new(CollisionTypeId::PLAYER);
        let b = Collider::new(CollisionTypeId::PLAYER);
        assert_ne!(a.id(), b.id());
        assert!(b.id() > a.id());
    }

    #[test]
    fn test_obb_axes_are_rotation_columns() {
        let collider = Collider::new(CollisionTypeId::ENEMY)
            .with_rotation(Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI))
            .with_half_size(Vec3::new(1.0, 2.0, 3.0));

        let obb = collider.obb();
        assert_relative_eq!(obb.orientation[0], Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(obb.orientation[1], Vec3::y(), epsilon = 1e-5);
        assert_relative_eq!(obb.orientation[2], Vec3::x(), epsilon = 1e-5);
        assert_relative_eq!(obb.size, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_setting_an_overlay_switches_shape() {
        let mut collider = Collider::new(CollisionTypeId::BULLET);
        assert_eq!(collider.shape_kind(), ShapeKind::Obb);
        assert!(collider.sphere().is_none());

        collider.set_sphere(Sphere::new(Vec3::zeros(), 0.25));
        assert_eq!(collider.shape_kind(), ShapeKind::Sphere);
        assert_eq!(collider.sphere().map(|s| s.radius), Some(0.25));
        assert!(collider.capsule().is_none());

        collider.set_capsule(Capsule::new(Vec3::zeros(), Vec3::y(), 0.5));
        assert!(collider.sphere().is_none());
        assert!(collider.capsule().is_some());

        collider.use_obb();
        assert_eq!(collider.shape_kind(), ShapeKind::Obb);
    }

    #[test]
    fn test_owner_checked_downcast() {
        let owner = Owner::Enemy(EntityId(7));
        assert_eq!(owner.as_kind(OwnerKind::Enemy), Some(EntityId(7)));
        assert_eq!(owner.as_kind(OwnerKind::Player), None);
        assert!(matches!(
            owner.expect_kind(OwnerKind::Player),
            Err(CollisionError::OwnerMismatch { expected: OwnerKind::Player, actual: Some(OwnerKind::Enemy) })
        ));
        assert_eq!(Owner::Unowned.entity(), None);
        assert_eq!(Owner::new(OwnerKind::Item, EntityId(3)), Owner::Item(EntityId(3)));
    }

    #[test]
    fn test_default_handler_is_noop() {
        struct Inert;
        impl CollisionHandler for Inert {}

        let mut a = Collider::new(CollisionTypeId::PLAYER).with_handler(Inert);
        let b = Collider::new(CollisionTypeId::ENEMY);
        a.on_collision(&b);
    }

    #[test]
    fn test_handler_sees_both_colliders() {
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);

        let mut player = Collider::new(CollisionTypeId::PLAYER)
            .with_handler(move |this: &Collider, other: &Collider| {
                sink.set(Some((this.type_id(), other.type_id())));
            });
        let item = Collider::new(CollisionTypeId::ITEM);

        player.on_collision(&item);
        assert_eq!(seen.get(), Some((CollisionTypeId::PLAYER, CollisionTypeId::ITEM)));
    }

    #[test]
    fn test_isolated_panic_keeps_handler() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);

        let mut collider = Collider::new(CollisionTypeId::ENEMY)
            .with_handler(move |_: &Collider, _: &Collider| {
                counter.set(counter.get() + 1);
                panic!("handler failure");
            });
        let other = Collider::new(CollisionTypeId::BULLET);

        assert!(!collider.notify(&other, true));
        assert!(!collider.notify(&other, true));
        assert_eq!(calls.get(), 2);
    }
}
