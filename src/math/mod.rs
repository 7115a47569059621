//! Math types used throughout the simulation.
//!
//! Vectors, quaternions and matrices come from `glam`; this module adds the
//! rigid [`Transform`] and a handful of scalar helpers.

mod transform;

pub use glam::{Mat3, Quat, Vec3, Vec4};
pub use transform::Transform;

/// Small epsilon used when deciding whether a direction is degenerate.
pub const EPSILON: f32 = 1e-6;

/// Sign function returning `0.0` for zero input (unlike [`f32::signum`]).
#[inline]
pub fn sgn(x: f32) -> f32 {
    if x < 0.0 {
        -1.0
    } else if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Returns true if all components of the quaternion are finite.
#[inline]
pub fn quat_is_finite(q: Quat) -> bool {
    Vec4::from(q).is_finite()
}
