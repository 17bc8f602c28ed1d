//! Swept character movement against static world boxes
//!
//! A desired per-frame displacement is applied one axis at a time in the
//! order X, Z, Y. After each axis the character box is pushed back out of
//! any world box it entered, and the corrected position becomes the starting
//! point for the next axis. Resolving axes independently lets a character
//! slide along walls and into corners without jitter.

use log::trace;

use crate::config::CollisionConfig;
use crate::foundation::math::Vec3;
use super::collision::AABB;

/// Axis indices in resolution order: X, Z, then Y
const AXIS_ORDER: [usize; 3] = [0, 2, 1];

const Y: usize = 1;

/// Shortest ground reach, used when the skin width is zero
const GROUND_REACH_MIN: f32 = 1e-4;

/// Outcome of one resolved move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementResult {
    /// Corrected center
    pub position: Vec3,
    /// Velocity after vertical contact adjustments
    pub velocity: Vec3,
    /// Pushed up out of a floor this move
    pub grounded: bool,
    /// Pushed down out of a ceiling this move
    pub hit_ceiling: bool,
    /// Which axes (x, y, z) were corrected
    pub blocked: [bool; 3],
}

/// Per-axis swept resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptResolver {
    /// Gap left between the character and a face it is pushed out of
    pub skin_width: f32,
}

impl Default for SweptResolver {
    fn default() -> Self {
        Self::from_config(&CollisionConfig::default())
    }
}

impl SweptResolver {
    /// Resolver with an explicit skin width
    pub fn new(skin_width: f32) -> Self {
        Self { skin_width: skin_width.max(0.0) }
    }

    /// Resolver using the configured skin width
    pub fn from_config(config: &CollisionConfig) -> Self {
        Self::new(config.skin_width)
    }

    /// Move a box of `half_extents` centered at `center` by `delta` through `world`
    ///
    /// A floor contact zeroes vertical velocity; a ceiling contact only
    /// removes upward velocity.
    pub fn resolve(
        &self,
        half_extents: Vec3,
        center: Vec3,
        delta: Vec3,
        velocity: Vec3,
        world: &[AABB],
    ) -> MovementResult {
        let half_extents = half_extents.abs();
        let mut result = MovementResult {
            position: center,
            velocity,
            grounded: false,
            hit_ceiling: false,
            blocked: [false; 3],
        };

        for axis in AXIS_ORDER {
            let tentative = result.position[axis] + delta[axis];
            let Some(corrected) = self.resolve_axis(axis, half_extents, result.position, delta[axis], world) else {
                result.position[axis] = tentative;
                continue;
            };

            trace!("Movement blocked on axis {axis}: {tentative} -> {corrected}");
            result.position[axis] = corrected;
            result.blocked[axis] = true;

            if axis == Y {
                if corrected > tentative {
                    result.grounded = true;
                    result.velocity.y = 0.0;
                } else {
                    result.hit_ceiling = true;
                    result.velocity.y = result.velocity.y.min(0.0);
                }
            }
        }

        result
    }

    /// Corrected coordinate along `axis`, `None` when the move is unobstructed
    fn resolve_axis(
        &self,
        axis: usize,
        half_extents: Vec3,
        position: Vec3,
        delta: f32,
        world: &[AABB],
    ) -> Option<f32> {
        let old = position[axis];
        let tentative = old + delta;
        let half = half_extents[axis];

        let mut moved = position;
        moved[axis] = tentative;
        let character = AABB::from_center_half_extents(moved, half_extents);

        let candidates: Vec<f32> = world
            .iter()
            .filter(|obstacle| penetrates(&character, obstacle))
            .map(|obstacle| {
                let below = obstacle.min[axis] - half - self.skin_width;
                let above = obstacle.max[axis] + half + self.skin_width;

                if old + half <= obstacle.min[axis] {
                    below
                } else if old - half >= obstacle.max[axis] {
                    above
                } else if (below - old).abs() <= (above - old).abs() {
                    // Already overlapping before the move: leave through the nearer face
                    below
                } else {
                    above
                }
            })
            .collect();

        if candidates.is_empty() {
            return None;
        }

        // A candidate is valid only if the box placed there clears every obstacle
        let clears_world = |coordinate: f32| {
            let mut placed = position;
            placed[axis] = coordinate;
            let body = AABB::from_center_half_extents(placed, half_extents);
            !world.iter().any(|obstacle| penetrates(&body, obstacle))
        };

        // Nearest valid correction to the tentative coordinate wins. A wedged
        // box with no valid correction takes the one nearest its start.
        let nearest_to = |target: f32| {
            move |a: &f32, b: &f32| (a - target).abs().total_cmp(&(b - target).abs())
        };
        candidates
            .iter()
            .copied()
            .filter(|&coordinate| clears_world(coordinate))
            .min_by(nearest_to(tentative))
            .or_else(|| candidates.iter().copied().min_by(nearest_to(old)))
    }

    /// Whether a box resting at `center` has a world box within ground reach below it
    ///
    /// Ground reach is twice the skin width, so a character left hovering
    /// on its skin gap still counts as supported.
    pub fn is_supported(&self, half_extents: Vec3, center: Vec3, world: &[AABB]) -> bool {
        let reach = (2.0 * self.skin_width).max(GROUND_REACH_MIN);
        let body = AABB::from_center_half_extents(center - Vec3::new(0.0, reach, 0.0), half_extents.abs());
        world.iter().any(|obstacle| penetrates(&body, obstacle))
    }
}

/// Strict overlap on all three axes; boxes sharing a face do not penetrate
fn penetrates(a: &AABB, b: &AABB) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x &&
    a.min.y < b.max.y && a.max.y > b.min.y &&
    a.min.z < b.max.z && a.max.z > b.min.z
}

/// Box-shaped character with persistent velocity and contact state
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterMover {
    /// Center of the character box
    pub position: Vec3,
    /// Current velocity
    pub velocity: Vec3,
    /// Half extents of the character box
    pub half_extents: Vec3,
    /// Downward acceleration (positive number)
    pub gravity: f32,
    grounded: bool,
    hit_ceiling: bool,
    resolver: SweptResolver,
}

impl CharacterMover {
    /// Create a character at `position`
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            half_extents: half_extents.abs(),
            gravity: 9.81,
            grounded: false,
            hit_ceiling: false,
            resolver: SweptResolver::default(),
        }
    }

    /// Builder: use a specific resolver
    pub fn with_resolver(mut self, resolver: SweptResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Builder: set gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Standing on something after the last step
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Bumped a ceiling during the last step
    pub fn hit_ceiling(&self) -> bool {
        self.hit_ceiling
    }

    /// Character bounds at the current position
    pub fn aabb(&self) -> AABB {
        AABB::from_center_half_extents(self.position, self.half_extents)
    }

    /// Start a jump if grounded; returns whether the jump happened
    pub fn jump(&mut self, speed: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity.y = speed;
        self.grounded = false;
        true
    }

    /// Advance by `delta_time` with the given horizontal velocity (y ignored)
    pub fn step(&mut self, horizontal_velocity: Vec3, delta_time: f32, world: &[AABB]) -> MovementResult {
        self.velocity.x = horizontal_velocity.x;
        self.velocity.z = horizontal_velocity.z;
        self.velocity.y -= self.gravity * delta_time;

        let result = self.resolver.resolve(
            self.half_extents,
            self.position,
            self.velocity * delta_time,
            self.velocity,
            world,
        );

        self.position = result.position;
        self.velocity = result.velocity;
        self.hit_ceiling = result.hit_ceiling;
        self.grounded = result.grounded
            || (self.velocity.y <= 0.0 && self.resolver.is_supported(self.half_extents, self.position, world));
        if self.grounded {
            self.velocity.y = 0.0;
        }
        result
    }
}
