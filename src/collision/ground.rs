use crate::dynamics::RigidBody;
use crate::geometry::Shape;
use crate::math::Vec3;

use super::contact::{ContactConfig, GroundOutcome, SLIDING_EPSILON};

/// Resolves contact between `body` and the ground plane `y = 0`.
///
/// A sphere touches the ground at its lowest point. A box tests every one of
/// its collision samples and adds the average of the per-sample impulses and
/// torques, so many touching samples do not multiply the response.
pub fn resolve_ground(
    body: &mut RigidBody,
    dt: f32,
    gravity: Vec3,
    config: &ContactConfig,
) -> GroundOutcome {
    let (impulse, torque, points) = match body.shape() {
        Shape::Sphere(sphere) => {
            let radius = sphere.radius;
            if body.position.y > radius {
                return GroundOutcome::NoContact;
            }
            let offset = Vec3::new(0.0, -radius, 0.0);
            let depth = radius - body.position.y;
            let impulse = contact_impulse(body, offset, depth, dt, gravity, config);
            (impulse, offset.cross(impulse), 1)
        }
        Shape::Box(_) => {
            let frame = body.transform();
            let mut impulse = Vec3::ZERO;
            let mut torque = Vec3::ZERO;
            let mut points = 0usize;

            for &sample in body.shape().collision_samples() {
                let offset = frame.to_world_vector(sample);
                let height = body.position.y + offset.y;
                if height > 0.0 {
                    continue;
                }
                let j = contact_impulse(body, offset, -height, dt, gravity, config);
                impulse += j;
                torque += offset.cross(j);
                points += 1;
            }

            if points == 0 {
                return GroundOutcome::NoContact;
            }
            let scale = 1.0 / points as f32;
            (impulse * scale, torque * scale, points)
        }
    };

    body.force += impulse;
    body.torque += torque;

    GroundOutcome::Contact {
        points,
        impulse,
        torque,
    }
}

/// Impulse at `offset` from the center of mass for a point sunk `depth` below
/// the ground.
///
/// Approaching points get a normal impulse that reverses the normal velocity
/// scaled by restitution (or pushes out at the correction speed, whichever
/// is larger) plus Coulomb friction. Resting points only get friction sized
/// from the body's weight. Friction never exceeds what stops the sliding.
fn contact_impulse(
    body: &RigidBody,
    offset: Vec3,
    depth: f32,
    dt: f32,
    gravity: Vec3,
    config: &ContactConfig,
) -> Vec3 {
    let velocity = body.velocity_at(offset);
    let normal_velocity = velocity.y;
    let tangential = velocity - Vec3::Y * normal_velocity;
    let sliding = tangential.length();

    let (tangent, limit) = if sliding > SLIDING_EPSILON {
        let tangent = tangential / sliding;
        let angular = tangent.dot((body.inv_inertia_world() * offset.cross(tangent)).cross(offset));
        (tangent, sliding / (body.inv_mass() + angular) / dt)
    } else {
        (Vec3::ZERO, 0.0)
    };

    let (normal_impulse, friction_impulse) = if normal_velocity < 0.0 {
        let target = (-body.restitution * normal_velocity)
            .max(config.correction_velocity(depth, dt));
        let normal_impulse = body.mass() * (target - normal_velocity) / dt;
        (normal_impulse, (body.friction * normal_impulse).min(limit))
    } else {
        let weight = body.mass() * (-gravity.y).max(0.0);
        (0.0, (body.friction * weight).min(limit))
    };

    Vec3::Y * normal_impulse - tangent * friction_impulse
}
