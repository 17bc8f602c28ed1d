//! Collider visualization on top of [`DebugDrawSystem`]

use crate::debug::draw::{DebugDrawSystem, DebugShape};
use crate::foundation::math::{Quat, Vec4};
use crate::physics::collision::{AABB, WorldShape};
use crate::physics::{Collider, ColliderFlags};

/// Color scheme for collider visualization
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionDebugColors {
    /// Collider not touching anything
    pub shape_default: Vec4,
    /// Collider that overlapped something during the last sweep
    pub shape_colliding: Vec4,
    /// Collider excluded from the sweep
    pub shape_disabled: Vec4,
    /// Static world geometry
    pub world: Vec4,
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            shape_default: Vec4::new(0.0, 1.0, 0.0, 0.3),   // Green, semi-transparent
            shape_colliding: Vec4::new(1.0, 0.0, 0.0, 0.5), // Red, semi-transparent
            shape_disabled: Vec4::new(0.5, 0.5, 0.5, 0.2),  // Grey
            world: Vec4::new(0.5, 0.8, 1.0, 0.15),          // Light blue, transparent
        }
    }
}

/// Turns colliders into one-frame debug shapes
#[derive(Debug, Clone, Default)]
pub struct CollisionDebugVisualizer {
    debug_draw: DebugDrawSystem,
    colors: CollisionDebugColors,
}

impl CollisionDebugVisualizer {
    /// Create a visualizer with the default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Current color scheme
    pub fn colors(&self) -> &CollisionDebugColors {
        &self.colors
    }

    /// Queue the collider's active shape for this frame
    ///
    /// Colliders without the `DEBUG_DRAW` flag are skipped.
    pub fn draw_collider(&mut self, collider: &Collider) {
        if !collider.flags().contains(ColliderFlags::DEBUG_DRAW) {
            return;
        }

        let color = if !collider.is_enabled() {
            self.colors.shape_disabled
        } else if collider.is_colliding() {
            self.colors.shape_colliding
        } else {
            self.colors.shape_default
        };

        match collider.world_shape() {
            WorldShape::Obb(obb) => {
                self.debug_draw.draw_box(obb.center, obb.half_size(), collider.rotation(), color, 0.0);
            }
            WorldShape::Sphere(sphere) => {
                self.debug_draw.draw_sphere(sphere.center, sphere.radius, color, 0.0);
            }
            WorldShape::Segment(segment) => {
                self.debug_draw.draw_line(segment.origin, segment.end(), color, 0.0);
            }
            WorldShape::Capsule(capsule) => {
                self.debug_draw.draw_capsule(capsule.point_a, capsule.point_b, capsule.radius, color, 0.0);
            }
        }
    }

    /// Keep a static world box on screen until [`clear_world_box`](Self::clear_world_box)
    pub fn draw_world_box(&mut self, name: &str, aabb: &AABB) {
        self.debug_draw.draw_persistent(
            format!("world_{name}"),
            DebugShape::Box {
                center: aabb.center(),
                extents: aabb.half_extents(),
                rotation: Quat::identity(),
                color: self.colors.world,
                duration: f32::INFINITY,
            },
        );
    }

    /// Remove a world box drawn with [`draw_world_box`](Self::draw_world_box)
    pub fn clear_world_box(&mut self, name: &str) {
        self.debug_draw.clear_persistent(&format!("world_{name}"));
    }

    /// Clear all visualization
    pub fn clear(&mut self) {
        self.debug_draw.clear();
    }

    /// Expire last frame's shapes
    pub fn update(&mut self, delta_time: f32) {
        self.debug_draw.update(delta_time);
    }

    /// All debug shapes for rendering
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        self.debug_draw.get_shapes()
    }

    /// Enable/disable the entire debug system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.debug_draw.enabled = enabled;
    }

    /// Check if debug system is enabled
    pub fn is_enabled(&self) -> bool {
        self.debug_draw.enabled
    }

    /// Underlying shape queue
    pub fn debug_draw(&self) -> &DebugDrawSystem {
        &self.debug_draw
    }
}
