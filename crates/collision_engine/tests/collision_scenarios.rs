//! End-to-end collision scenarios through the public API

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use approx::assert_relative_eq;
use collision_engine::physics::collision::intersect;
use collision_engine::physics::{Capsule, Segment, Sphere, OBB};
use collision_engine::prelude::*;

fn counter() -> (Rc<Cell<usize>>, impl FnMut(&Collider, &Collider) + 'static) {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    (count, move |_: &Collider, _: &Collider| handle.set(handle.get() + 1))
}

#[test]
fn sphere_intersection_is_symmetric() {
    let spheres = [
        Sphere::new(Vec3::zeros(), 1.0),
        Sphere::new(Vec3::new(1.5, 0.0, 0.0), 0.6),
        Sphere::new(Vec3::new(0.0, 3.0, 0.0), 0.5),
        Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.0),
        Sphere::new(Vec3::new(-1.0, -1.0, -1.0), 2.0),
    ];

    for a in &spheres {
        for b in &spheres {
            assert_eq!(intersect::sphere_sphere(a, b), intersect::sphere_sphere(b, a));
        }
    }
}

#[test]
fn aabb_intersects_itself() {
    let boxes = [
        AABB::new(Vec3::zeros(), Vec3::repeat(1.0)),
        AABB::new(Vec3::new(-5.0, 2.0, 1.0), Vec3::new(-4.0, 8.0, 1.5)),
        AABB::from_center_half_extents(Vec3::new(3.0, 3.0, 3.0), Vec3::new(0.1, 2.0, 0.5)),
    ];

    for aabb in &boxes {
        assert!(intersect::aabb_aabb(aabb, aabb));
    }
}

#[test]
fn obb_gap_and_overlap() {
    let size = Vec3::repeat(2.0);
    let a = OBB::axis_aligned(Vec3::zeros(), size);

    assert!(!intersect::obb_obb(&a, &OBB::axis_aligned(Vec3::new(3.0, 0.0, 0.0), size)));
    assert!(intersect::obb_obb(&a, &OBB::axis_aligned(Vec3::new(1.9, 0.0, 0.0), size)));
}

#[test]
fn parallel_capsules_around_touching_distance() {
    let a = Capsule::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 5.0), 0.5);
    let at = |y: f32| Capsule::new(Vec3::new(0.0, y, 0.0), Vec3::new(0.0, y, 5.0), 0.5);

    assert!(intersect::capsule_capsule(&a, &at(1.0)));
    assert!(!intersect::capsule_capsule(&a, &at(1.01)));
    assert!(intersect::capsule_capsule(&a, &at(0.99)));
}

#[test]
fn segment_through_unit_box() {
    let aabb = AABB::new(Vec3::zeros(), Vec3::repeat(1.0));
    let through = Segment::from_points(Vec3::new(-5.0, 0.5, 0.5), Vec3::new(5.0, 0.5, 0.5));
    let above = Segment::from_points(Vec3::new(-5.0, 5.0, 0.5), Vec3::new(5.0, 5.0, 0.5));

    assert!(intersect::aabb_segment(&aabb, &through));
    assert!(!intersect::aabb_segment(&aabb, &above));
}

#[test]
fn character_stops_short_of_wall() {
    let resolver = SweptResolver::from_config(&CollisionConfig::default());
    let wall = [AABB::new(Vec3::new(0.9, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0))];
    let half = Vec3::repeat(0.5);

    let mut position = Vec3::zeros();
    for _ in 0..3 {
        let result = resolver.resolve(half, position, Vec3::new(1.0, 0.0, 0.0), Vec3::zeros(), &wall);
        assert!(!result.grounded);
        position = result.position;
    }

    assert_relative_eq!(position.x, 0.4 - resolver.skin_width, epsilon = 1e-6);
    assert_relative_eq!(position.y, 0.0);
    assert_relative_eq!(position.z, 0.0);
}

#[test]
fn last_registration_wins() {
    fn never(_: &Collider, _: &Collider) -> bool {
        false
    }
    fn always(_: &Collider, _: &Collider) -> bool {
        true
    }

    let mut manager = CollisionManager::new();
    assert!(manager.register_pair_test(CollisionTypeId::PLAYER, CollisionTypeId::ITEM, never).is_none());
    assert!(manager.register_pair_test(CollisionTypeId::PLAYER, CollisionTypeId::ITEM, always).is_some());

    let (pickups, handler) = counter();
    manager.add_collider(Collider::new(CollisionTypeId::PLAYER));
    manager.add_collider(Collider::new(CollisionTypeId::ITEM).at(Vec3::new(50.0, 0.0, 0.0)).with_handler(handler));

    assert_eq!(manager.check_all_collisions(), 1);
    assert_eq!(pickups.get(), 1);
}

#[test]
fn no_registered_pairs_means_no_callbacks() {
    let mut manager = CollisionManager::new();
    let (calls, handler) = counter();

    manager.add_collider(Collider::new(CollisionTypeId::PLAYER).with_handler(handler));
    manager.add_collider(Collider::new(CollisionTypeId::ENEMY));
    manager.add_collider(Collider::new(CollisionTypeId::ENEMY));

    assert_eq!(manager.check_all_collisions(), 0);
    assert_eq!(calls.get(), 0);
}

#[test]
fn removing_twice_is_a_no_op() {
    let mut manager = CollisionManager::new();
    let handle = manager.add_collider(Collider::new(CollisionTypeId::BULLET));

    assert!(manager.remove_collider(handle).is_some());
    assert!(manager.remove_collider(handle).is_none());
    assert!(manager.is_empty());
    assert!(matches!(manager.collider_mut(handle), Err(CollisionError::StaleHandle(_))));
    manager.check_all_collisions();
}

#[test]
fn bullet_hits_enemy_and_both_react() {
    let mut manager = CollisionManager::new();
    manager.register_pair_test_symmetric(CollisionTypeId::BULLET, CollisionTypeId::ENEMY, pair_tests::sphere_vs_obb);

    let log = Rc::new(RefCell::new(Vec::new()));
    let enemy_log = Rc::clone(&log);
    let bullet_log = Rc::clone(&log);

    let enemy = manager.add_collider(
        Collider::new(CollisionTypeId::ENEMY)
            .owned_by(Owner::Enemy(EntityId(7)))
            .with_handler(move |_: &Collider, other: &Collider| {
                enemy_log.borrow_mut().push(format!("enemy hit by {:?}", other.owner().kind()));
            }),
    );
    let bullet = manager.add_collider(
        Collider::with_shape(CollisionTypeId::BULLET, ColliderShape::sphere(0.2))
            .owned_by(Owner::Bullet(EntityId(1)))
            .at(Vec3::new(0.6, 0.0, 0.0))
            .with_handler(move |_: &Collider, other: &Collider| {
                let target = other.owner().expect_kind(OwnerKind::Enemy).map(|id| id.0);
                bullet_log.borrow_mut().push(format!("bullet hit enemy {target:?}"));
            }),
    );

    assert_eq!(manager.check_all_collisions(), 1);
    assert!(manager.is_colliding(enemy));
    assert_eq!(manager.collisions_for(bullet), vec![enemy]);

    let mut events = log.borrow().clone();
    events.sort();
    assert_eq!(events, vec!["bullet hit enemy Ok(7)".to_string(), "enemy hit by Some(Bullet)".to_string()]);

    // Bullet leaves; the pair is reported as exited on the next sweep
    manager.update_collider(bullet, |collider| collider.set_center(Vec3::new(5.0, 0.0, 0.0))).unwrap();
    assert_eq!(manager.check_all_collisions(), 0);
    assert_eq!(manager.collisions_exited(), vec![CollisionPair::new(bullet, enemy)]);
}

#[test]
fn panicking_handler_does_not_abort_sweep() {
    collision_engine::foundation::logging::try_init();

    let mut manager = CollisionManager::new();
    manager.register_pair_test_symmetric(CollisionTypeId::PLAYER, CollisionTypeId::ENEMY, pair_tests::obb_vs_obb);

    let (calls, handler) = counter();
    manager.add_collider(
        Collider::new(CollisionTypeId::PLAYER)
            .with_handler(|_: &Collider, _: &Collider| panic!("handler failure")),
    );
    manager.add_collider(Collider::new(CollisionTypeId::ENEMY).with_handler(handler));

    assert_eq!(manager.check_all_collisions(), 1);
    assert_eq!(calls.get(), 1);
}

#[test]
fn character_lands_on_floor_and_walks_into_wall() {
    let world = [
        AABB::new(Vec3::new(-20.0, -1.0, -20.0), Vec3::new(20.0, 0.0, 20.0)),
        AABB::new(Vec3::new(3.0, 0.0, -20.0), Vec3::new(4.0, 4.0, 20.0)),
    ];
    let mut mover = CharacterMover::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.4, 0.9, 0.4));

    for _ in 0..240 {
        mover.step(Vec3::new(2.0, 0.0, 0.5), 1.0 / 60.0, &world);
    }

    assert!(mover.is_grounded());
    assert_relative_eq!(mover.position.y, 0.9 + 0.002, epsilon = 1e-4);
    assert_relative_eq!(mover.position.x, 3.0 - 0.4 - 0.002, epsilon = 1e-4);
    assert!(mover.position.z > 1.0);
}
