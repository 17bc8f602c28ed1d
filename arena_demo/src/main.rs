//! Headless arena demo
//!
//! A scripted player walks, jumps and shoots through a small walled arena
//! while enemies chase it and pickups wait on the floor. Every frame runs
//! the swept movement resolver for the player, syncs collider positions,
//! sweeps the collision registry and then applies the gameplay events the
//! collision handlers queued.
//!
//! Usage: `arena_demo [frames] [collision_config.toml|.ron]`

use std::cell::RefCell;
use std::rc::Rc;

use collision_engine::foundation::logging;
use collision_engine::prelude::*;
use nalgebra::UnitQuaternion;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FRAME_TIME: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u64 = 1200;

const ARENA_HALF_SIZE: f32 = 12.0;
const PLAYER_HALF_EXTENTS: [f32; 3] = [0.4, 0.9, 0.4];
const PLAYER_SPEED: f32 = 4.0;
const JUMP_SPEED: f32 = 5.5;
const ENEMY_SPEED: f32 = 1.5;
const ENEMY_HEALTH: u32 = 3;
const BULLET_SPEED: f32 = 18.0;
const BULLET_RADIUS: f32 = 0.15;
const BULLET_LIFETIME: f32 = 1.5;
const FIRE_INTERVAL: u64 = 15;
const SPAWN_INTERVAL: u64 = 120;
const MAX_ENEMIES: usize = 6;

/// Gameplay consequence of a contact, queued by collision handlers
#[derive(Debug, Clone, Copy, PartialEq)]
enum ArenaEvent {
    BulletHitEnemy { bullet: EntityId, enemy: EntityId },
    PlayerTouchedEnemy { enemy: EntityId },
    PlayerPickedUp { item: EntityId },
}

type EventQueue = Rc<RefCell<Vec<ArenaEvent>>>;

struct Enemy {
    id: EntityId,
    handle: ColliderHandle,
    position: Vec3,
    heading: f32,
    health: u32,
}

struct Bullet {
    id: EntityId,
    handle: ColliderHandle,
    position: Vec3,
    velocity: Vec3,
    lifetime: f32,
}

struct Item {
    id: EntityId,
    handle: ColliderHandle,
}

#[derive(Debug, Default)]
struct Stats {
    shots: u32,
    kills: u32,
    hits_taken: u32,
    pickups: u32,
    jumps: u32,
}

struct Arena {
    manager: CollisionManager,
    visualizer: CollisionDebugVisualizer,
    world: Vec<AABB>,
    player: CharacterMover,
    player_handle: ColliderHandle,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    items: Vec<Item>,
    events: EventQueue,
    rng: StdRng,
    next_entity: u32,
    frame: u64,
    stats: Stats,
}

impl Arena {
    fn new(config: CollisionConfig) -> Self {
        let mut manager = CollisionManager::with_config(config.clone());
        register_pair_tests(&mut manager);

        let world = build_world();
        let mut visualizer = CollisionDebugVisualizer::new();
        for (index, aabb) in world.iter().enumerate() {
            visualizer.draw_world_box(&format!("block_{index}"), aabb);
        }

        let events: EventQueue = Rc::new(RefCell::new(Vec::new()));
        let half_extents = Vec3::from(PLAYER_HALF_EXTENTS);
        let player = CharacterMover::new(Vec3::new(0.0, 3.0, 0.0), half_extents)
            .with_resolver(SweptResolver::from_config(&config));

        let player_events = Rc::clone(&events);
        let player_collider = Collider::with_shape(
            CollisionTypeId::PLAYER,
            ColliderShape::upright_capsule(2.0 * (half_extents.y - half_extents.x), half_extents.x),
        )
        .owned_by(Owner::Player(EntityId(0)))
        .at(player.position)
        .with_half_size(half_extents)
        .with_handler(move |_: &Collider, other: &Collider| {
            let event = match other.owner() {
                Owner::Enemy(enemy) => ArenaEvent::PlayerTouchedEnemy { enemy },
                Owner::Item(item) => ArenaEvent::PlayerPickedUp { item },
                _ => return,
            };
            player_events.borrow_mut().push(event);
        });
        let player_handle = manager.add_collider(player_collider);

        Self {
            manager,
            visualizer,
            world,
            player,
            player_handle,
            enemies: Vec::new(),
            bullets: Vec::new(),
            items: Vec::new(),
            events,
            rng: StdRng::seed_from_u64(0x5eed),
            next_entity: 1,
            frame: 0,
            stats: Stats::default(),
        }
    }

    fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    fn random_floor_point(&mut self, height: f32) -> Vec3 {
        let range = ARENA_HALF_SIZE - 2.0;
        Vec3::new(
            self.rng.gen_range(-range..range),
            height,
            self.rng.gen_range(-range..range),
        )
    }

    fn spawn_enemy(&mut self) {
        let id = self.next_id();
        let mut position = self.random_floor_point(0.5);
        if (position - self.player.position).norm() < 4.0 {
            position.x = -position.x;
        }

        let enemy_events = Rc::clone(&self.events);
        let collider = Collider::new(CollisionTypeId::ENEMY)
            .owned_by(Owner::Enemy(id))
            .at(position)
            .with_handler(move |this: &Collider, other: &Collider| {
                if other.type_id() != CollisionTypeId::BULLET {
                    return;
                }
                match (other.owner().expect_kind(OwnerKind::Bullet), this.owner().expect_kind(OwnerKind::Enemy)) {
                    (Ok(bullet), Ok(enemy)) => {
                        enemy_events.borrow_mut().push(ArenaEvent::BulletHitEnemy { bullet, enemy });
                    }
                    (Err(err), _) | (_, Err(err)) => log::warn!("Ignoring bullet contact: {err}"),
                }
            });

        let handle = self.manager.add_collider(collider);
        self.enemies.push(Enemy { id, handle, position, heading: 0.0, health: ENEMY_HEALTH });
        log::info!("Enemy {} spawned at ({:.1}, {:.1})", id.0, position.x, position.z);
    }

    fn spawn_item(&mut self) {
        let id = self.next_id();
        let position = self.random_floor_point(0.4);
        let collider = Collider::with_shape(CollisionTypeId::ITEM, ColliderShape::sphere(0.4))
            .owned_by(Owner::Item(id))
            .at(position);

        let handle = self.manager.add_collider(collider);
        self.items.push(Item { id, handle });
        log::debug!("Item {} placed at ({:.1}, {:.1})", id.0, position.x, position.z);
    }

    fn fire_at_nearest_enemy(&mut self) {
        let origin = self.player.position + Vec3::new(0.0, 0.3, 0.0);
        let Some(target) = self
            .enemies
            .iter()
            .map(|enemy| enemy.position)
            .min_by(|a, b| (a - origin).norm_squared().total_cmp(&(b - origin).norm_squared()))
        else {
            return;
        };
        let Some(direction) = (target - origin).try_normalize(1e-4) else {
            return;
        };

        let id = self.next_id();
        let collider = Collider::with_shape(CollisionTypeId::BULLET, ColliderShape::sphere(BULLET_RADIUS))
            .owned_by(Owner::Bullet(id))
            .at(origin);
        let handle = self.manager.add_collider(collider);
        self.bullets.push(Bullet {
            id,
            handle,
            position: origin,
            velocity: direction * BULLET_SPEED,
            lifetime: BULLET_LIFETIME,
        });
        self.stats.shots += 1;
    }

    /// Walk a slow circle around the arena center
    fn player_input(&self) -> Vec3 {
        let t = self.frame as f32 * FRAME_TIME;
        Vec3::new(t.cos(), 0.0, t.sin()) * PLAYER_SPEED * 0.5 + Vec3::new(0.5, 0.0, 0.0)
    }

    fn update(&mut self) -> Result<(), CollisionError> {
        self.frame += 1;

        if self.frame % SPAWN_INTERVAL == 1 && self.enemies.len() < MAX_ENEMIES {
            self.spawn_enemy();
            self.spawn_item();
        }

        // Player
        if self.frame % 90 == 0 && self.player.jump(JUMP_SPEED) {
            self.stats.jumps += 1;
        }
        let input = self.player_input();
        let movement = self.player.step(input, FRAME_TIME, &self.world);
        if movement.hit_ceiling {
            log::debug!("Player bumped a ceiling at frame {}", self.frame);
        }
        let player_position = self.player.position;
        self.manager.update_collider(self.player_handle, |collider| collider.set_center(player_position))?;

        if self.frame % FIRE_INTERVAL == 0 {
            self.fire_at_nearest_enemy();
        }

        // Enemies chase the player on the floor plane
        for enemy in &mut self.enemies {
            let mut to_player = player_position - enemy.position;
            to_player.y = 0.0;
            if let Some(direction) = to_player.try_normalize(1e-4) {
                enemy.position += direction * ENEMY_SPEED * FRAME_TIME;
                enemy.heading = direction.x.atan2(direction.z);
            }
            let position = enemy.position;
            let rotation = UnitQuaternion::from_axis_angle(&Vec3::y_axis(), enemy.heading);
            self.manager.update_collider(enemy.handle, |collider| {
                collider.set_center(position);
                collider.set_rotation(rotation);
            })?;
        }

        // Bullets fly straight and expire
        let mut expired = Vec::new();
        for bullet in &mut self.bullets {
            bullet.position += bullet.velocity * FRAME_TIME;
            bullet.lifetime -= FRAME_TIME;
            if bullet.lifetime <= 0.0 {
                expired.push(bullet.id);
                continue;
            }
            let position = bullet.position;
            self.manager.update_collider(bullet.handle, |collider| collider.set_center(position))?;
        }
        for id in expired {
            self.despawn_bullet(id);
        }

        let overlapping = self.manager.check_all_collisions();
        for pair in self.manager.collisions_entered() {
            log::trace!("Contact began: {pair:?}");
        }
        log::trace!("Frame {}: {} overlapping pairs", self.frame, overlapping);

        self.apply_events();

        self.visualizer.update(FRAME_TIME);
        self.manager.draw_debug(&mut self.visualizer);
        Ok(())
    }

    fn apply_events(&mut self) {
        let events: Vec<ArenaEvent> = self.events.borrow_mut().drain(..).collect();
        for event in events {
            match event {
                ArenaEvent::BulletHitEnemy { bullet, enemy } => {
                    // A bullet touching two enemies in one frame only counts once
                    if !self.despawn_bullet(bullet) {
                        continue;
                    }
                    self.damage_enemy(enemy);
                }
                ArenaEvent::PlayerTouchedEnemy { enemy } => {
                    let began = self
                        .enemies
                        .iter()
                        .find(|e| e.id == enemy)
                        .is_some_and(|e| self.manager.collisions_entered().contains(&CollisionPair::new(e.handle, self.player_handle)));
                    if began {
                        self.stats.hits_taken += 1;
                        log::info!("Player touched enemy {} at frame {}", enemy.0, self.frame);
                    }
                }
                ArenaEvent::PlayerPickedUp { item } => {
                    if let Some(index) = self.items.iter().position(|i| i.id == item) {
                        let picked = self.items.swap_remove(index);
                        self.manager.remove_collider(picked.handle);
                        self.stats.pickups += 1;
                        log::info!("Player picked up item {}", item.0);
                    }
                }
            }
        }
    }

    fn despawn_bullet(&mut self, id: EntityId) -> bool {
        let Some(index) = self.bullets.iter().position(|b| b.id == id) else {
            return false;
        };
        let bullet = self.bullets.swap_remove(index);
        self.manager.remove_collider(bullet.handle).is_some()
    }

    fn damage_enemy(&mut self, id: EntityId) {
        let Some(index) = self.enemies.iter().position(|e| e.id == id) else {
            return;
        };
        let enemy = &mut self.enemies[index];
        enemy.health = enemy.health.saturating_sub(1);
        if enemy.health > 0 {
            log::debug!("Enemy {} hit, {} health left", id.0, enemy.health);
            return;
        }

        let enemy = self.enemies.swap_remove(index);
        self.manager.remove_collider(enemy.handle);
        self.stats.kills += 1;
        log::info!("Enemy {} destroyed at frame {}", id.0, self.frame);
    }
}

/// Directional dispatch table for the arena's collider types
fn register_pair_tests(manager: &mut CollisionManager) {
    manager.register_pair_test_symmetric(CollisionTypeId::BULLET, CollisionTypeId::ENEMY, pair_tests::sphere_vs_obb);
    manager.register_pair_test_symmetric(CollisionTypeId::PLAYER, CollisionTypeId::ENEMY, pair_tests::bounds_overlap);
    manager.register_pair_test_symmetric(CollisionTypeId::PLAYER, CollisionTypeId::ITEM, pair_tests::active_shapes);
}

/// Floor, four walls and a low platform
fn build_world() -> Vec<AABB> {
    let size = ARENA_HALF_SIZE;
    vec![
        AABB::new(Vec3::new(-size, -1.0, -size), Vec3::new(size, 0.0, size)),
        AABB::new(Vec3::new(-size - 1.0, 0.0, -size), Vec3::new(-size, 4.0, size)),
        AABB::new(Vec3::new(size, 0.0, -size), Vec3::new(size + 1.0, 4.0, size)),
        AABB::new(Vec3::new(-size, 0.0, -size - 1.0), Vec3::new(size, 4.0, -size)),
        AABB::new(Vec3::new(-size, 0.0, size), Vec3::new(size, 4.0, size + 1.0)),
        AABB::new(Vec3::new(2.0, 0.0, -1.0), Vec3::new(4.0, 0.6, 1.0)),
    ]
}

fn load_config(path: Option<&str>) -> Result<CollisionConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(CollisionConfig::default());
    };
    Ok(CollisionConfig::load(path)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let frames = match args.get(1) {
        Some(value) => value.parse::<u64>()?,
        None => DEFAULT_FRAMES,
    };
    let config = load_config(args.get(2).map(String::as_str))?;
    let show_debug = config.debug_visible;

    log::info!("Starting arena demo for {frames} frames");
    let mut arena = Arena::new(config);

    for _ in 0..frames {
        arena.update()?;
    }

    let stats = &arena.stats;
    log::info!(
        "Finished after {} frames: {} shots, {} kills, {} hits taken, {} pickups, {} jumps",
        arena.frame,
        stats.shots,
        stats.kills,
        stats.hits_taken,
        stats.pickups,
        stats.jumps,
    );
    log::info!(
        "{} colliders live, player at ({:.2}, {:.2}, {:.2}), grounded: {}",
        arena.manager.len(),
        arena.player.position.x,
        arena.player.position.y,
        arena.player.position.z,
        arena.player.is_grounded(),
    );
    if show_debug {
        log::info!("{} debug shapes queued on the last frame", arena.visualizer.get_shapes().len());
    }
    Ok(())
}
