//! # rigidsim
//!
//! A small 3D rigid body simulator: spheres and boxes under gravity, bouncing
//! off each other and off the ground plane `y = 0`.
//!
//! ## Features
//!
//! - **Rigid Body Dynamics**: semi-implicit Euler integration of linear and angular motion,
//!   world-space inertia rebuilt from the body frame every step
//! - **Collision Shapes**: Sphere and Box primitives with point and ray queries
//! - **Collision Response**: one-shot impulses with restitution and Coulomb friction for
//!   sphere–sphere, sphere–box and body–ground contacts
//! - **Rendering Contract**: a [`Renderer`](render::Renderer) trait the simulation draws through,
//!   plus a headless command recorder
//! - **Checked Stepping**: every step verifies that no state went NaN and orientations stay
//!   unit length
//!
//! ## Quick Start
//!
//! ```rust
//! use rigidsim::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a world with the default gravity of 0.2 downwards
//! let mut world = World::default();
//!
//! // Drop a ball onto the ground
//! let ball = world.add_body(
//!     &RigidBodyDesc::sphere(0.25)
//!         .with_mass(1.0)
//!         .with_restitution(0.2)
//!         .with_friction(0.4)
//!         .with_position(Vec3::new(0.0, 1.0, 0.0)),
//! )?;
//!
//! // Simulation loop
//! for _ in 0..600 {
//!     world.step(1.0 / 60.0)?;
//! }
//!
//! let pos = world.body(ball).map(|b| b.position).unwrap_or_default();
//! assert!((pos.y - 0.25).abs() < 1e-3);
//! # Ok(())
//! # }
//! ```

pub mod collision;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod render;
mod world;

pub use error::{ConfigurationError, SimulationError, StateQuantity};
pub use world::{BodyHandle, RayCastHit, SceneDesc, World, WorldConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collision::{ContactConfig, GroundOutcome, PairOutcome};
    pub use crate::dynamics::{RigidBody, RigidBodyDesc, ShapeDesc};
    pub use crate::error::{ConfigurationError, SimulationError};
    pub use crate::geometry::{BoxShape, PointQuery, Shape, ShapeKind, Sphere};
    pub use crate::math::{Mat3, Quat, Transform, Vec3};
    pub use crate::render::{CommandRecorder, DrawOptions, Renderer};
    pub use crate::world::{BodyHandle, RayCastHit, SceneDesc, World, WorldConfig};
}
