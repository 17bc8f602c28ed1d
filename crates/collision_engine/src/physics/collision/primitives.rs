//! Primitive collision shapes
//!
//! Plain value types with a few geometric helpers. All intersection logic
//! lives in [`super::intersect`].

use crate::foundation::math::{rotation_basis, Quat, Vec3};

/// A sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center position of the sphere
    pub center: Vec3,
    /// Radius of the sphere (non-negative)
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius: radius.max(0.0) }
    }
}

/// An infinite plane: all points `p` with `dot(normal, p) == distance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal of the plane
    pub normal: Vec3,
    /// Signed offset along the normal from the origin
    pub distance: f32,
}

impl Plane {
    /// Creates a plane, normalizing `normal`
    ///
    /// A zero normal is kept as-is; intersection tests treat such a plane as
    /// degenerate.
    pub fn new(normal: Vec3, distance: f32) -> Self {
        let normal = normal.try_normalize(f32::EPSILON).unwrap_or(normal);
        Self { normal, distance }
    }

    /// Creates the plane through `point` with the given normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let plane = Self::new(normal, 0.0);
        Self { distance: plane.normal.dot(&point), ..plane }
    }

    /// Signed distance from `point` to the plane
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) - self.distance
    }
}

/// A line segment spanning `origin` to `origin + diff`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point
    pub origin: Vec3,
    /// Displacement from the start point to the end point
    pub diff: Vec3,
}

impl Segment {
    /// Creates a segment from a start point and a displacement
    pub fn new(origin: Vec3, diff: Vec3) -> Self {
        Self { origin, diff }
    }

    /// Creates a segment between two points
    pub fn from_points(start: Vec3, end: Vec3) -> Self {
        Self { origin: start, diff: end - start }
    }

    /// End point of the segment
    pub fn end(&self) -> Vec3 {
        self.origin + self.diff
    }

    /// Point at parameter `t` (0 = origin, 1 = end)
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.diff * t
    }

    /// Length of the segment
    pub fn length(&self) -> f32 {
        self.diff.norm()
    }

    /// True when the segment has (near) zero length
    pub fn is_degenerate(&self) -> bool {
        self.diff.norm_squared() <= f32::EPSILON * f32::EPSILON
    }
}

/// A triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unnormalized face normal (right-hand rule); zero for degenerate triangles
    pub fn raw_normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit face normal, `None` for degenerate triangles
    pub fn normal(&self) -> Option<Vec3> {
        self.raw_normal().try_normalize(f32::EPSILON)
    }

    /// Calculates the centroid of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from two corners, ordering them component-wise
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { min: a.inf(&b), max: a.sup(&b) }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half extents of the AABB
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Smallest AABB containing both boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB { min: self.min.inf(&other.min), max: self.max.sup(&other.max) }
    }

    /// True when `min <= max` on every axis
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Point inside or on the boundary
    pub fn contains_point(&self, point: Vec3) -> bool {
        super::intersect::aabb_point(self, &point)
    }
}

/// Oriented bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OBB {
    /// Center of the box
    pub center: Vec3,
    /// Full extents along each local axis (non-negative)
    pub size: Vec3,
    /// Orthonormal local axes
    pub orientation: [Vec3; 3],
}

impl OBB {
    /// Creates an OBB from its center, full extents and rotation
    pub fn from_rotation(center: Vec3, size: Vec3, rotation: &Quat) -> Self {
        Self {
            center,
            size: size.abs(),
            orientation: rotation_basis(rotation),
        }
    }

    /// Creates an axis-aligned OBB
    pub fn axis_aligned(center: Vec3, size: Vec3) -> Self {
        Self::from_rotation(center, size, &Quat::identity())
    }

    /// Half extents along each local axis
    pub fn half_size(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Express a world-space point in the box's centered local frame
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        let offset = point - self.center;
        Vec3::new(
            offset.dot(&self.orientation[0]),
            offset.dot(&self.orientation[1]),
            offset.dot(&self.orientation[2]),
        )
    }

    /// Express a world-space direction in the box's local frame
    pub fn direction_to_local(&self, direction: Vec3) -> Vec3 {
        Vec3::new(
            direction.dot(&self.orientation[0]),
            direction.dot(&self.orientation[1]),
            direction.dot(&self.orientation[2]),
        )
    }

    /// The box in its own local frame, centered at the origin
    pub fn local_aabb(&self) -> AABB {
        AABB::from_center_half_extents(Vec3::zeros(), self.half_size())
    }

    /// The eight world-space corners
    pub fn corners(&self) -> [Vec3; 8] {
        let half = self.half_size();
        let [ax, ay, az] = self.orientation;
        let mut corners = [Vec3::zeros(); 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
            *corner = self.center
                + ax * (sx * half.x)
                + ay * (sy * half.y)
                + az * (sz * half.z);
        }
        corners
    }

    /// World-space AABB enclosing the box
    pub fn bounding_aabb(&self) -> AABB {
        let half = self.half_size();
        let [ax, ay, az] = self.orientation;
        let reach = ax.abs() * half.x + ay.abs() * half.y + az.abs() * half.z;
        AABB::from_center_half_extents(self.center, reach)
    }
}

/// A capsule: a sphere swept along the segment `point_a`..`point_b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// First end point of the inner segment
    pub point_a: Vec3,
    /// Second end point of the inner segment
    pub point_b: Vec3,
    /// Radius (non-negative)
    pub radius: f32,
}

impl Capsule {
    /// Creates a new capsule
    pub fn new(point_a: Vec3, point_b: Vec3, radius: f32) -> Self {
        Self { point_a, point_b, radius: radius.max(0.0) }
    }

    /// The inner segment of the capsule
    pub fn segment(&self) -> Segment {
        Segment::from_points(self.point_a, self.point_b)
    }

    /// World-space AABB enclosing the capsule
    pub fn bounding_aabb(&self) -> AABB {
        let radius = Vec3::repeat(self.radius);
        AABB {
            min: self.point_a.inf(&self.point_b) - radius,
            max: self.point_a.sup(&self.point_b) + radius,
        }
    }
}
