use thiserror::Error;

use crate::math::Vec3;
use crate::world::BodyHandle;

/// Rejected construction parameters.
///
/// Returned by every constructor that takes user-supplied dimensions,
/// material coefficients or simulation settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Sphere radius was zero, negative or not finite.
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    /// One or more box half-extents were zero, negative or not finite.
    #[error("box half-extents must be positive and finite, got {0}")]
    InvalidHalfExtents(Vec3),
    /// Mass was zero, negative or not finite.
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),
    /// Restitution outside `[0, 1]`.
    #[error("restitution must lie in [0, 1], got {0}")]
    InvalidRestitution(f32),
    /// Friction coefficient negative or not finite.
    #[error("friction coefficient must be non-negative and finite, got {0}")]
    InvalidFriction(f32),
    /// Timestep was zero, negative or not finite.
    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),
    /// Gravity vector contained NaN or infinity.
    #[error("gravity must be finite, got {0}")]
    NonFiniteGravity(Vec3),
    /// Initial position, orientation or velocity contained NaN or infinity.
    #[error("initial pose and velocities must be finite")]
    NonFinitePose,
    /// A contact tuning parameter was out of range.
    #[error("invalid contact tuning: {0}")]
    InvalidContactTuning(&'static str),
}

/// Which part of a body's state failed the post-step check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateQuantity {
    /// Center of mass position.
    Position,
    /// Orientation quaternion.
    Orientation,
    /// Linear velocity.
    LinearVelocity,
    /// Angular velocity.
    AngularVelocity,
}

impl std::fmt::Display for StateQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StateQuantity::Position => "position",
            StateQuantity::Orientation => "orientation",
            StateQuantity::LinearVelocity => "linear velocity",
            StateQuantity::AngularVelocity => "angular velocity",
        };
        f.write_str(name)
    }
}

/// Failures detected while stepping a [`World`](crate::World).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A body's state became NaN or infinite.
    #[error("body {body} has non-finite {quantity} after step {step}")]
    NonFiniteState {
        /// Offending body.
        body: BodyHandle,
        /// Which quantity went bad.
        quantity: StateQuantity,
        /// Step counter at detection time.
        step: u64,
    },
    /// A body's orientation drifted away from unit length.
    #[error("body {body} orientation has norm {norm} after step {step}")]
    DenormalizedOrientation {
        /// Offending body.
        body: BodyHandle,
        /// Measured quaternion norm.
        norm: f32,
        /// Step counter at detection time.
        step: u64,
    },
    /// The step was requested with invalid parameters.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
