//! Narrow-phase intersection tests
//!
//! Pure boolean overlap tests, one per supported shape pair. Swapped-argument
//! forms delegate to the canonical one. Degenerate input (zero-length
//! segments, parallel configurations, zero normals) always reports no
//! intersection instead of producing NaN.

use super::primitives::{Capsule, Plane, Segment, Sphere, Triangle, AABB, OBB};
use crate::foundation::math::{utils::clamp, utils::clamp_vec, Vec3};

/// Threshold for parallel and degenerate configurations
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Minimum length of an OBB SAT cross-product axis
pub const SAT_AXIS_EPSILON: f32 = 1e-5;

/// Slack added to capsule distance comparisons
pub const CAPSULE_EPSILON: f32 = 1e-6;

/// Sphere vs sphere: center distance at most the sum of radii
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    let distance_squared = (a.center - b.center).norm_squared();
    let radius_sum = a.radius + b.radius;
    distance_squared <= radius_sum * radius_sum
}

/// Sphere vs plane: the center lies within `radius` of the plane
pub fn sphere_plane(sphere: &Sphere, plane: &Plane) -> bool {
    if plane.normal.norm_squared() < PARALLEL_EPSILON {
        return false;
    }
    plane.signed_distance(sphere.center).abs() <= sphere.radius
}

/// Segment vs plane
///
/// A segment parallel to the plane (including a zero-length one) never
/// intersects, even when it lies inside the plane.
pub fn segment_plane(segment: &Segment, plane: &Plane) -> bool {
    let denom = plane.normal.dot(&segment.diff);
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }

    let t = (plane.distance - segment.origin.dot(&plane.normal)) / denom;
    (0.0..=1.0).contains(&t)
}

/// Segment vs triangle
///
/// Intersects the segment's line with the triangle plane, rejects hits
/// outside the segment, then keeps the hit point only if it lies on the inner
/// side of all three edges.
pub fn segment_triangle(segment: &Segment, triangle: &Triangle) -> bool {
    let length = segment.length();
    if length < PARALLEL_EPSILON {
        return false;
    }
    let Some(normal) = triangle.normal() else {
        return false;
    };

    let direction = segment.diff / length;
    let denom = normal.dot(&direction);
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }

    let t = normal.dot(&(triangle.v0 - segment.origin)) / denom;
    if t < 0.0 || t > length {
        return false;
    }

    let hit = segment.origin + direction * t;
    let edges = [
        (triangle.v0, triangle.v1),
        (triangle.v1, triangle.v2),
        (triangle.v2, triangle.v0),
    ];

    edges.iter().all(|(start, end)| {
        (end - start).cross(&(hit - start)).dot(&normal) >= 0.0
    })
}

/// AABB vs point (boundary inclusive)
pub fn aabb_point(aabb: &AABB, point: &Vec3) -> bool {
    point.x >= aabb.min.x && point.x <= aabb.max.x &&
    point.y >= aabb.min.y && point.y <= aabb.max.y &&
    point.z >= aabb.min.z && point.z <= aabb.max.z
}

/// AABB vs AABB: interval overlap on all three axes
pub fn aabb_aabb(a: &AABB, b: &AABB) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x &&
    a.min.y <= b.max.y && a.max.y >= b.min.y &&
    a.min.z <= b.max.z && a.max.z >= b.min.z
}

/// AABB vs sphere: closest point of the box to the center lies within the radius
pub fn aabb_sphere(aabb: &AABB, sphere: &Sphere) -> bool {
    let closest = clamp_vec(sphere.center, aabb.min, aabb.max);
    (closest - sphere.center).norm_squared() <= sphere.radius * sphere.radius
}

/// Sphere vs AABB
pub fn sphere_aabb(sphere: &Sphere, aabb: &AABB) -> bool {
    aabb_sphere(aabb, sphere)
}

/// AABB vs segment using the slab method
pub fn aabb_segment(aabb: &AABB, segment: &Segment) -> bool {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let origin = segment.origin[axis];
        let diff = segment.diff[axis];
        let (min, max) = (aabb.min[axis], aabb.max[axis]);

        if diff.abs() < PARALLEL_EPSILON {
            // Parallel to this slab: must already be inside it
            if origin < min || origin > max {
                return false;
            }
            continue;
        }

        let mut t1 = (min - origin) / diff;
        let mut t2 = (max - origin) / diff;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_near = t_near.max(t1);
        t_far = t_far.min(t2);
        if t_near > t_far {
            return false;
        }
    }

    // A segment with no non-parallel axis is a point already inside the box
    t_near <= 1.0 && t_far >= 0.0
}

/// Segment vs AABB
pub fn segment_aabb(segment: &Segment, aabb: &AABB) -> bool {
    aabb_segment(aabb, segment)
}

/// OBB vs sphere, tested in the box's local frame
pub fn obb_sphere(obb: &OBB, sphere: &Sphere) -> bool {
    let local = Sphere { center: obb.to_local(sphere.center), radius: sphere.radius };
    aabb_sphere(&obb.local_aabb(), &local)
}

/// Sphere vs OBB
pub fn sphere_obb(sphere: &Sphere, obb: &OBB) -> bool {
    obb_sphere(obb, sphere)
}

/// OBB vs segment, tested in the box's local frame
pub fn obb_segment(obb: &OBB, segment: &Segment) -> bool {
    let local = Segment {
        origin: obb.to_local(segment.origin),
        diff: obb.direction_to_local(segment.diff),
    };
    aabb_segment(&obb.local_aabb(), &local)
}

/// Segment vs OBB
pub fn segment_obb(segment: &Segment, obb: &OBB) -> bool {
    obb_segment(obb, segment)
}

/// OBB vs OBB using the Separating Axis Theorem
///
/// Candidate axes are the 3 face normals of each box and the 9 cross products
/// of their axes. Cross products shorter than [`SAT_AXIS_EPSILON`] come from
/// near-parallel edges and are skipped, so near-parallel boxes are decided by
/// the face normals alone. Touching boxes overlap.
pub fn obb_obb(a: &OBB, b: &OBB) -> bool {
    let half_a = a.half_size();
    let half_b = b.half_size();
    let offset = b.center - a.center;

    let separated_on = |axis: &Vec3| -> bool {
        let radius_a = (0..3)
            .map(|i| (a.orientation[i] * half_a[i]).dot(axis).abs())
            .sum::<f32>();
        let radius_b = (0..3)
            .map(|i| (b.orientation[i] * half_b[i]).dot(axis).abs())
            .sum::<f32>();
        offset.dot(axis).abs() > radius_a + radius_b
    };

    let face_axes = a.orientation.iter().chain(b.orientation.iter());
    for axis in face_axes {
        if separated_on(axis) {
            return false;
        }
    }

    for axis_a in &a.orientation {
        for axis_b in &b.orientation {
            let axis = axis_a.cross(axis_b);
            let length = axis.norm();
            if length < SAT_AXIS_EPSILON {
                continue;
            }
            if separated_on(&(axis / length)) {
                return false;
            }
        }
    }

    true
}

/// Closest point to `point` on the segment
pub fn closest_point_on_segment(segment: &Segment, point: &Vec3) -> Vec3 {
    let length_squared = segment.diff.norm_squared();
    if length_squared < PARALLEL_EPSILON {
        return segment.origin;
    }
    let t = clamp((point - segment.origin).dot(&segment.diff) / length_squared, 0.0, 1.0);
    segment.point_at(t)
}

/// Minimum squared distance between two segments
///
/// Clamped parametric closest points (Ericson, Real-Time Collision Detection
/// 5.1.9). Degenerate segments fall back to point/segment distance and
/// near-parallel segments fix `s = 0` before clamping `t`.
pub fn segment_segment_distance_squared(p: &Segment, q: &Segment) -> f32 {
    let d1 = p.diff;
    let d2 = q.diff;
    let r = p.origin - q.origin;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t) = if a < PARALLEL_EPSILON && e < PARALLEL_EPSILON {
        (0.0, 0.0)
    } else if a < PARALLEL_EPSILON {
        (0.0, clamp(f / e, 0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e < PARALLEL_EPSILON {
            (clamp(-c / a, 0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            let mut s = if denom > PARALLEL_EPSILON {
                clamp((b * f - c * e) / denom, 0.0, 1.0)
            } else {
                0.0
            };

            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = clamp(-c / a, 0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = clamp((b - c) / a, 0.0, 1.0);
            }
            (s, t)
        }
    };

    (p.point_at(s) - q.point_at(t)).norm_squared()
}

/// Capsule vs capsule: inner segments closer than the sum of radii
pub fn capsule_capsule(a: &Capsule, b: &Capsule) -> bool {
    let distance_squared = segment_segment_distance_squared(&a.segment(), &b.segment());
    let radius_sum = a.radius + b.radius;
    distance_squared <= radius_sum * radius_sum + CAPSULE_EPSILON
}

/// Sphere vs capsule
pub fn sphere_capsule(sphere: &Sphere, capsule: &Capsule) -> bool {
    let closest = closest_point_on_segment(&capsule.segment(), &sphere.center);
    let radius_sum = sphere.radius + capsule.radius;
    (closest - sphere.center).norm_squared() <= radius_sum * radius_sum + CAPSULE_EPSILON
}

/// Capsule vs sphere
pub fn capsule_sphere(capsule: &Capsule, sphere: &Sphere) -> bool {
    sphere_capsule(sphere, capsule)
}

/// Sphere vs segment
pub fn sphere_segment(sphere: &Sphere, segment: &Segment) -> bool {
    let closest = closest_point_on_segment(segment, &sphere.center);
    (closest - sphere.center).norm_squared() <= sphere.radius * sphere.radius
}

/// Segment vs sphere
pub fn segment_sphere(segment: &Segment, sphere: &Sphere) -> bool {
    sphere_segment(sphere, segment)
}

/// Segment vs capsule
pub fn segment_capsule(segment: &Segment, capsule: &Capsule) -> bool {
    let distance_squared = segment_segment_distance_squared(segment, &capsule.segment());
    distance_squared <= capsule.radius * capsule.radius + CAPSULE_EPSILON
}

/// Capsule vs segment
pub fn capsule_segment(capsule: &Capsule, segment: &Segment) -> bool {
    segment_capsule(segment, capsule)
}
