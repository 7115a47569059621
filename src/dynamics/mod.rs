mod integrator;
mod rigid_body;

pub use integrator::{
    integrate_orientation, integrate_positions, integrate_semi_implicit_euler,
    integrate_velocities,
};
pub use rigid_body::{InitialImpulse, RigidBody, RigidBodyDesc, ShapeDesc};
