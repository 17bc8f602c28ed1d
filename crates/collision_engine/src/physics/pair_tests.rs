//! Ready-made pair tests for [`super::CollisionManager::register_pair_test`]
//!
//! Each test reads the shapes it needs from the two colliders. A collider
//! whose active shape does not match what the test expects never collides.

use super::collider::Collider;
use super::collision::{intersect, Capsule, Segment, Sphere, WorldShape};

/// Each collider's derived OBB, tested with SAT
pub fn obb_vs_obb(a: &Collider, b: &Collider) -> bool {
    intersect::obb_obb(&a.obb(), &b.obb())
}

/// Whatever shapes the two colliders use; unsupported shape pairs never collide
pub fn active_shapes(a: &Collider, b: &Collider) -> bool {
    a.world_shape().intersects(&b.world_shape()).unwrap_or(false)
}

/// World bounds of the active shapes
pub fn bounds_overlap(a: &Collider, b: &Collider) -> bool {
    intersect::aabb_aabb(&a.aabb(), &b.aabb())
}

/// Sphere of `a` against sphere of `b`
pub fn sphere_vs_sphere(a: &Collider, b: &Collider) -> bool {
    match (world_sphere(a), world_sphere(b)) {
        (Some(sa), Some(sb)) => intersect::sphere_sphere(&sa, &sb),
        _ => false,
    }
}

/// Sphere of `a` against the OBB of `b`
pub fn sphere_vs_obb(a: &Collider, b: &Collider) -> bool {
    world_sphere(a).is_some_and(|sphere| intersect::sphere_obb(&sphere, &b.obb()))
}

/// Segment of `a` against the OBB of `b` (hitscan, melee sweeps)
pub fn segment_vs_obb(a: &Collider, b: &Collider) -> bool {
    world_segment(a).is_some_and(|segment| intersect::segment_obb(&segment, &b.obb()))
}

/// Capsule of `a` against capsule of `b`
pub fn capsule_vs_capsule(a: &Collider, b: &Collider) -> bool {
    match (world_capsule(a), world_capsule(b)) {
        (Some(ca), Some(cb)) => intersect::capsule_capsule(&ca, &cb),
        _ => false,
    }
}

fn world_sphere(collider: &Collider) -> Option<Sphere> {
    match collider.world_shape() {
        WorldShape::Sphere(sphere) => Some(sphere),
        _ => None,
    }
}

fn world_segment(collider: &Collider) -> Option<Segment> {
    match collider.world_shape() {
        WorldShape::Segment(segment) => Some(segment),
        _ => None,
    }
}

fn world_capsule(collider: &Collider) -> Option<Capsule> {
    match collider.world_shape() {
        WorldShape::Capsule(capsule) => Some(capsule),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::collision::ColliderShape;
    use crate::physics::collision_types::CollisionTypeId;

    #[test]
    fn test_sphere_tests_require_sphere_shape() {
        let bullet = Collider::with_shape(CollisionTypeId::BULLET, ColliderShape::sphere(0.2))
            .at(Vec3::new(0.6, 0.0, 0.0));
        let enemy = Collider::new(CollisionTypeId::ENEMY);

        assert!(sphere_vs_obb(&bullet, &enemy));
        assert!(!sphere_vs_obb(&enemy, &bullet));
        assert!(!sphere_vs_sphere(&bullet, &enemy));
    }

    #[test]
    fn test_segment_vs_obb_follows_collider_transform() {
        let beam = Collider::with_shape(
            CollisionTypeId::WEAPON,
            ColliderShape::Segment(Segment::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 10.0))),
        )
        .at(Vec3::new(0.0, 0.0, -5.0));
        let target = Collider::new(CollisionTypeId::ENEMY);
        let off_axis = Collider::new(CollisionTypeId::ENEMY).at(Vec3::new(3.0, 0.0, 0.0));

        assert!(segment_vs_obb(&beam, &target));
        assert!(!segment_vs_obb(&beam, &off_axis));
    }

    #[test]
    fn test_capsules_and_active_shapes() {
        let a = Collider::with_shape(CollisionTypeId::PLAYER, ColliderShape::upright_capsule(2.0, 0.5));
        let b = Collider::with_shape(CollisionTypeId::BOSS, ColliderShape::upright_capsule(2.0, 0.5))
            .at(Vec3::new(0.9, 0.0, 0.0));
        let far = Collider::with_shape(CollisionTypeId::BOSS, ColliderShape::upright_capsule(2.0, 0.5))
            .at(Vec3::new(1.2, 0.0, 0.0));

        assert!(capsule_vs_capsule(&a, &b));
        assert!(!capsule_vs_capsule(&a, &far));
        assert!(active_shapes(&a, &b));

        // Box vs capsule has no narrow-phase test
        assert!(!active_shapes(&a, &Collider::new(CollisionTypeId::WORLD)));
        assert!(bounds_overlap(&a, &Collider::new(CollisionTypeId::WORLD)));
    }
}
