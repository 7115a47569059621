use crate::math::{Quat, Vec3};

use super::rigid_body::RigidBody;

/// Applies accumulated force, gravity and accumulated torque to the velocities.
///
/// Gravity is added as an acceleration, so it never has to be re-applied as a
/// force. Uses the world inverse inertia currently stored on the body.
pub fn integrate_velocities(body: &mut RigidBody, gravity: Vec3, dt: f32) {
    body.linear_velocity += (body.force * body.inv_mass() + gravity) * dt;
    body.angular_velocity += body.inv_inertia_world() * body.torque * dt;
}

/// Moves the body along its (already updated) velocities
pub fn integrate_positions(body: &mut RigidBody, dt: f32) {
    body.position += body.linear_velocity * dt;
    body.orientation = integrate_orientation(body.orientation, body.angular_velocity, dt);
}

/// First-order quaternion update `q + ½·(ω,0)·q·dt`, renormalized.
#[inline]
pub fn integrate_orientation(orientation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    let w = angular_velocity;
    let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * orientation;
    (orientation + spin * (0.5 * dt)).normalize()
}

/// Performs a full integration step (semi-implicit Euler).
///
/// The world inverse inertia is rebuilt from the fixed body-frame tensor
/// before the velocity update and again once the orientation has moved, and
/// the force/torque accumulators are emptied afterwards.
pub fn integrate_semi_implicit_euler(body: &mut RigidBody, gravity: Vec3, dt: f32) {
    body.update_world_inertia();

    // Velocities first, then positions from the new velocities
    integrate_velocities(body, gravity, dt);
    integrate_positions(body, dt);

    body.update_world_inertia();
    body.clear_accumulators();
}
