//! Debug drawing primitives and the shape queue

use crate::foundation::math::{Vec3, Vec4, Quat};
use std::collections::HashMap;

/// Key for persistent debug shapes
pub type DebugShapeId = String;

/// Wireframe primitive queued for the renderer
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// Start point
        start: Vec3,
        /// End point
        end: Vec3,
        /// RGBA color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
    },

    /// Sphere at center with radius
    Sphere {
        /// Center
        center: Vec3,
        /// Radius
        radius: f32,
        /// RGBA color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
    },

    /// Oriented box at center with half extents
    Box {
        /// Center
        center: Vec3,
        /// Half extents along the box's local axes
        extents: Vec3,
        /// Orientation
        rotation: Quat,
        /// RGBA color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
    },

    /// Capsule from start to end with radius
    Capsule {
        /// First segment endpoint
        start: Vec3,
        /// Second segment endpoint
        end: Vec3,
        /// Radius
        radius: f32,
        /// RGBA color
        color: Vec4,
        /// Seconds left to live
        duration: f32,
    },

    /// Point marker
    Point {
        /// Position
        position: Vec3,
        /// RGBA color
        color: Vec4,
        /// Marker size
        size: f32,
        /// Seconds left to live
        duration: f32,
    },
}

impl DebugShape {
    fn duration_mut(&mut self) -> &mut f32 {
        match self {
            DebugShape::Line { duration, .. }
            | DebugShape::Sphere { duration, .. }
            | DebugShape::Box { duration, .. }
            | DebugShape::Capsule { duration, .. }
            | DebugShape::Point { duration, .. } => duration,
        }
    }

    /// Remaining lifetime in seconds
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::Line { duration, .. }
            | DebugShape::Sphere { duration, .. }
            | DebugShape::Box { duration, .. }
            | DebugShape::Capsule { duration, .. }
            | DebugShape::Point { duration, .. } => *duration,
        }
    }

    /// Color of the shape
    pub fn color(&self) -> Vec4 {
        match self {
            DebugShape::Line { color, .. }
            | DebugShape::Sphere { color, .. }
            | DebugShape::Box { color, .. }
            | DebugShape::Capsule { color, .. }
            | DebugShape::Point { color, .. } => *color,
        }
    }

    /// Set duration (returns modified shape)
    pub fn with_duration(mut self, new_duration: f32) -> Self {
        *self.duration_mut() = new_duration;
        self
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let duration = self.duration_mut();
        *duration -= delta_time;
        *duration <= 0.0
    }
}

/// Queue of temporary and persistent debug shapes
///
/// Temporary shapes expire once their duration runs out; a duration of
/// zero keeps a shape for exactly one frame. Persistent shapes stay until
/// removed by id.
#[derive(Debug, Clone)]
pub struct DebugDrawSystem {
    temporary_shapes: Vec<DebugShape>,
    persistent_shapes: HashMap<DebugShapeId, DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create an empty, enabled queue
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            enabled: true,
        }
    }

    /// Queue any temporary shape
    pub fn draw(&mut self, shape: DebugShape) {
        if self.enabled {
            self.temporary_shapes.push(shape);
        }
    }

    /// Draw a line segment (temporary)
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4, duration: f32) {
        self.draw(DebugShape::Line { start, end, color, duration });
    }

    /// Draw a sphere (temporary)
    pub fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Vec4, duration: f32) {
        self.draw(DebugShape::Sphere { center, radius, color, duration });
    }

    /// Draw an oriented box (temporary)
    pub fn draw_box(&mut self, center: Vec3, extents: Vec3, rotation: Quat, color: Vec4, duration: f32) {
        self.draw(DebugShape::Box { center, extents, rotation, color, duration });
    }

    /// Draw a capsule (temporary)
    pub fn draw_capsule(&mut self, start: Vec3, end: Vec3, radius: f32, color: Vec4, duration: f32) {
        self.draw(DebugShape::Capsule { start, end, radius, color, duration });
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec3, color: Vec4, size: f32, duration: f32) {
        self.draw(DebugShape::Point { position, color, size, duration });
    }

    /// Draw a shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if self.enabled {
            self.persistent_shapes.insert(id.into(), shape);
        }
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent_shapes.remove(id);
    }

    /// Expire temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }
        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// All live shapes, temporary first
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }

        self.temporary_shapes.iter()
            .chain(self.persistent_shapes.values())
            .collect()
    }

    /// Number of queued shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Drop every shape
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Vec4 {
        Vec4::new(1.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn test_temporary_shape_expiration() {
        let mut system = DebugDrawSystem::new();
        system.draw_sphere(Vec3::zeros(), 1.0, red(), 1.0);
        assert_eq!(system.shape_count(), 1);

        system.update(0.5);
        assert_eq!(system.shape_count(), 1);

        system.update(0.6);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_zero_duration_lasts_one_frame() {
        let mut system = DebugDrawSystem::new();
        system.draw_line(Vec3::zeros(), Vec3::x(), red(), 0.0);
        assert_eq!(system.get_shapes().len(), 1);

        system.update(1.0 / 60.0);
        assert!(system.get_shapes().is_empty());
    }

    #[test]
    fn test_persistent_shapes_survive_updates() {
        let mut system = DebugDrawSystem::new();
        system.draw_persistent(
            "floor",
            DebugShape::Box {
                center: Vec3::zeros(),
                extents: Vec3::repeat(1.0),
                rotation: Quat::identity(),
                color: red(),
                duration: f32::INFINITY,
            },
        );

        for _ in 0..100 {
            system.update(1.0);
        }
        assert_eq!(system.shape_count(), 1);

        system.clear_persistent("floor");
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_disabled_system_ignores_draws() {
        let mut system = DebugDrawSystem::new();
        system.enabled = false;
        system.draw_point(Vec3::zeros(), red(), 4.0, 1.0);
        assert_eq!(system.shape_count(), 0);
        assert!(system.get_shapes().is_empty());
    }
}
