//! Collider shape abstractions
//!
//! A collider carries exactly one [`ColliderShape`], stored in the collider's
//! local frame. It is projected into world space on demand with the
//! collider's center and orientation.

use crate::foundation::math::{Quat, Vec3};
use super::intersect;
use super::primitives::{Capsule, Segment, Sphere, AABB, OBB};

/// Which shape a collider uses (stored in LOCAL SPACE)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ColliderShape {
    /// Oriented box built from the collider's half size and orientation
    #[default]
    Obb,
    /// Sphere; `center` is an offset from the collider center
    Sphere(Sphere),
    /// Segment; `origin` is an offset from the collider center
    Segment(Segment),
    /// Capsule; end points are offsets from the collider center
    Capsule(Capsule),
}

/// Discriminant of a [`ColliderShape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Oriented bounding box
    Obb,
    /// Sphere
    Sphere,
    /// Segment
    Segment,
    /// Capsule
    Capsule,
}

impl ColliderShape {
    /// Sphere centered on the collider
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere(Sphere::new(Vec3::zeros(), radius))
    }

    /// Capsule along the collider's local Y axis, `height` between the end points
    pub fn upright_capsule(height: f32, radius: f32) -> Self {
        let half = Vec3::new(0.0, height * 0.5, 0.0);
        Self::Capsule(Capsule::new(-half, half, radius))
    }

    /// The variant tag
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Obb => ShapeKind::Obb,
            Self::Sphere(_) => ShapeKind::Sphere,
            Self::Segment(_) => ShapeKind::Segment,
            Self::Capsule(_) => ShapeKind::Capsule,
        }
    }

    /// Transform this shape to world space
    pub fn to_world_space(&self, center: Vec3, half_size: Vec3, rotation: &Quat) -> WorldShape {
        let to_world = |local: Vec3| center + rotation * local;
        match self {
            Self::Obb => WorldShape::Obb(OBB::from_rotation(center, half_size * 2.0, rotation)),
            Self::Sphere(sphere) => {
                WorldShape::Sphere(Sphere::new(to_world(sphere.center), sphere.radius))
            }
            Self::Segment(segment) => WorldShape::Segment(Segment::new(
                to_world(segment.origin),
                rotation * segment.diff,
            )),
            Self::Capsule(capsule) => WorldShape::Capsule(Capsule::new(
                to_world(capsule.point_a),
                to_world(capsule.point_b),
                capsule.radius,
            )),
        }
    }
}

/// Collider shape resolved into world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    /// World-space oriented box
    Obb(OBB),
    /// World-space sphere
    Sphere(Sphere),
    /// World-space segment
    Segment(Segment),
    /// World-space capsule
    Capsule(Capsule),
}

impl WorldShape {
    /// Test if this shape intersects with another shape
    ///
    /// Returns `None` for shape pairs without a narrow-phase test
    /// (box vs capsule, segment vs segment).
    pub fn intersects(&self, other: &WorldShape) -> Option<bool> {
        use WorldShape::{Capsule, Obb, Segment, Sphere};

        let hit = match (self, other) {
            (Obb(a), Obb(b)) => intersect::obb_obb(a, b),
            (Obb(obb), Sphere(sphere)) | (Sphere(sphere), Obb(obb)) => intersect::obb_sphere(obb, sphere),
            (Obb(obb), Segment(segment)) | (Segment(segment), Obb(obb)) => {
                intersect::obb_segment(obb, segment)
            }
            (Sphere(a), Sphere(b)) => intersect::sphere_sphere(a, b),
            (Sphere(sphere), Segment(segment)) | (Segment(segment), Sphere(sphere)) => {
                intersect::sphere_segment(sphere, segment)
            }
            (Sphere(sphere), Capsule(capsule)) | (Capsule(capsule), Sphere(sphere)) => {
                intersect::sphere_capsule(sphere, capsule)
            }
            (Segment(segment), Capsule(capsule)) | (Capsule(capsule), Segment(segment)) => {
                intersect::segment_capsule(segment, capsule)
            }
            (Capsule(a), Capsule(b)) => intersect::capsule_capsule(a, b),
            (Obb(_), Capsule(_)) | (Capsule(_), Obb(_)) | (Segment(_), Segment(_)) => return None,
        };

        Some(hit)
    }

    /// World-space AABB enclosing the shape
    pub fn bounding_aabb(&self) -> AABB {
        match self {
            Self::Obb(obb) => obb.bounding_aabb(),
            Self::Sphere(sphere) => {
                AABB::from_center_half_extents(sphere.center, Vec3::repeat(sphere.radius))
            }
            Self::Segment(segment) => AABB::new(segment.origin, segment.end()),
            Self::Capsule(capsule) => capsule.bounding_aabb(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_shape_is_obb() {
        assert_eq!(ColliderShape::default().kind(), ShapeKind::Obb);
    }

    #[test]
    fn test_local_offsets_follow_rotation() {
        let shape = ColliderShape::Segment(Segment::new(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0)));
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), HALF_PI);

        let WorldShape::Segment(world) = shape.to_world_space(Vec3::new(1.0, 1.0, 1.0), Vec3::zeros(), &rotation) else {
            panic!("segment should stay a segment");
        };
        assert_relative_eq!(world.origin, Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(world.end(), Vec3::new(1.0, 3.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_obb_uses_full_size() {
        let world = ColliderShape::Obb.to_world_space(Vec3::zeros(), Vec3::new(1.0, 2.0, 3.0), &Quat::identity());
        let WorldShape::Obb(obb) = world else {
            panic!("expected an OBB");
        };
        assert_relative_eq!(obb.size, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_unsupported_pairs_report_none() {
        let obb = ColliderShape::Obb.to_world_space(Vec3::zeros(), Vec3::repeat(1.0), &Quat::identity());
        let capsule = ColliderShape::upright_capsule(2.0, 0.5)
            .to_world_space(Vec3::zeros(), Vec3::zeros(), &Quat::identity());

        assert_eq!(obb.intersects(&capsule), None);
        assert_eq!(capsule.intersects(&capsule), Some(true));
    }

    #[test]
    fn test_sphere_obb_dispatch_is_order_independent() {
        let obb = ColliderShape::Obb.to_world_space(Vec3::zeros(), Vec3::repeat(1.0), &Quat::identity());
        let sphere = ColliderShape::sphere(0.5)
            .to_world_space(Vec3::new(1.4, 0.0, 0.0), Vec3::zeros(), &Quat::identity());

        assert_eq!(obb.intersects(&sphere), Some(true));
        assert_eq!(sphere.intersects(&obb), Some(true));
    }
}
