use glam::{Mat3, Quat, Vec3};

/// A rigid frame: where a body's center of mass sits and how it is turned.
///
/// Shapes are defined in this local frame, so every collision query goes
/// through [`Transform::to_local_point`] first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation of the frame origin in world space
    pub position: Vec3,
    /// Rotation of the frame (unit quaternion)
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform (no translation or rotation)
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Creates a new transform from position and rotation
    #[inline]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Returns the rotation as a 3x3 matrix
    #[inline]
    pub fn rotation_matrix(self) -> Mat3 {
        Mat3::from_quat(self.rotation)
    }

    /// Maps a point from the local frame into world space
    #[inline]
    pub fn to_world_point(self, point: Vec3) -> Vec3 {
        self.rotation * point + self.position
    }

    /// Maps a direction from the local frame into world space (no translation)
    #[inline]
    pub fn to_world_vector(self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Maps a world point into the local frame
    #[inline]
    pub fn to_local_point(self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.position)
    }

    /// Maps a world direction into the local frame
    #[inline]
    pub fn to_local_vector(self, vector: Vec3) -> Vec3 {
        self.rotation.inverse() * vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        a.distance_squared(b) < EPSILON * EPSILON
    }

    #[test]
    fn test_identity() {
        let t = Transform::IDENTITY;
        let p = Vec3::new(1.0, 2.0, 3.0);

        assert!(vec3_approx_eq(t.to_world_point(p), p));
        assert!(vec3_approx_eq(t.to_local_point(p), p));
    }

    #[test]
    fn test_combined() {
        let t = Transform::new(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_z(PI / 2.0));

        // Rotate X onto Y, then shift by +X
        let result = t.to_world_point(Vec3::X);
        assert!(vec3_approx_eq(result, Vec3::new(1.0, 1.0, 0.0)));

        // Directions ignore the translation
        assert!(vec3_approx_eq(t.to_world_vector(Vec3::X), Vec3::Y));
    }

    #[test]
    fn test_local_world_are_inverse() {
        let t = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(Vec3::ONE.normalize(), PI / 4.0),
        );

        let p = Vec3::new(4.0, 5.0, 6.0);
        let back = t.to_local_point(t.to_world_point(p));
        assert!(vec3_approx_eq(back, p));

        let v = Vec3::new(-1.0, 0.5, 2.0);
        assert!(vec3_approx_eq(t.to_local_vector(t.to_world_vector(v)), v));
    }

    #[test]
    fn test_rotation_matrix_matches_quaternion() {
        let t = Transform::new(Vec3::ZERO, Quat::from_rotation_x(0.7));
        let v = Vec3::new(0.3, -1.0, 2.0);
        assert!(vec3_approx_eq(t.rotation_matrix() * v, t.to_world_vector(v)));
    }
}
