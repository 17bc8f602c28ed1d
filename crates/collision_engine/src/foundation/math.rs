//! Math utilities and types
//!
//! Provides the nalgebra aliases shared by the collision code.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (debug colors)
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Orthonormal basis of a rotation: the columns of its rotation matrix.
///
/// Rotating the unit X, Y and Z vectors through `rotation` yields the three
/// local axes of an oriented box.
pub fn rotation_basis(rotation: &Quat) -> [Vec3; 3] {
    let matrix: Mat3 = rotation.to_rotation_matrix().into_inner();
    [
        matrix.column(0).into_owned(),
        matrix.column(1).into_owned(),
        matrix.column(2).into_owned(),
    ]
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Component-wise clamp of a point into the box `[min, max]`
    pub fn clamp_vec(point: Vec3, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            clamp(point.x, min.x, max.x),
            clamp(point.y, min.y, max.y),
            clamp(point.z, min.z, max.z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity_basis_is_unit_axes() {
        let [x, y, z] = rotation_basis(&Quat::identity());
        assert_relative_eq!(x, Vec3::x(), epsilon = EPSILON);
        assert_relative_eq!(y, Vec3::y(), epsilon = EPSILON);
        assert_relative_eq!(z, Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn test_rotated_basis_is_orthonormal() {
        let rotation = Quat::from_euler_angles(0.3, 1.1, -0.7);
        let [x, y, z] = rotation_basis(&rotation);

        assert_relative_eq!(x.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(y.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(z.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(x.dot(&y), 0.0, epsilon = 1e-5);
        assert_relative_eq!(y.dot(&z), 0.0, epsilon = 1e-5);
        assert_relative_eq!(x.cross(&y), z, epsilon = 1e-5);
    }

    #[test]
    fn test_yaw_rotates_x_toward_negative_z() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), constants::HALF_PI);
        let [x, _, _] = rotation_basis(&rotation);
        assert_relative_eq!(x, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }
}
