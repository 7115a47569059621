use crate::dynamics::RigidBody;
use crate::geometry::ShapeKind;
use crate::math::Vec3;

use super::contact::{CombinedMaterial, Contact, PairOutcome, SLIDING_EPSILON};

/// Resolves a possible contact between `a` and `b` with one-shot impulses.
///
/// Impulses are sized for a single step of length `dt` and go into the force
/// and torque accumulators, so neither velocity changes until the bodies are
/// integrated. Box–box pairs are left untouched and reported as
/// [`PairOutcome::Unsupported`].
pub fn resolve_pair(a: &mut RigidBody, b: &mut RigidBody, dt: f32) -> PairOutcome {
    match (a.kind(), b.kind()) {
        (ShapeKind::Sphere, ShapeKind::Sphere) => sphere_sphere(a, b, dt),
        (ShapeKind::Sphere, ShapeKind::Box) => match sphere_box(a, b, dt) {
            PairOutcome::Resolved(contact) => PairOutcome::Resolved(contact.reversed()),
            other => other,
        },
        (ShapeKind::Box, ShapeKind::Sphere) => sphere_box(b, a, dt),
        (ShapeKind::Box, ShapeKind::Box) => PairOutcome::Unsupported,
    }
}

fn sphere_radius(body: &RigidBody) -> f32 {
    body.shape().as_sphere().map_or(0.0, |s| s.radius)
}

/// Change in contact-point velocity along `direction` per unit impulse,
/// from the body's rotation alone.
fn angular_response(body: &RigidBody, offset: Vec3, direction: Vec3) -> f32 {
    direction.dot((body.inv_inertia_world() * offset.cross(direction)).cross(offset))
}

/// Sphere against sphere, normal from `a` to `b`.
///
/// The normal effective mass uses the linear terms only. The friction cap
/// also counts the spin the friction impulse puts on both spheres.
fn sphere_sphere(a: &mut RigidBody, b: &mut RigidBody, dt: f32) -> PairOutcome {
    let radius_a = sphere_radius(a);
    let radius_b = sphere_radius(b);

    let delta = b.position - a.position;
    let distance = delta.length();
    if distance > radius_a + radius_b {
        return PairOutcome::Separated;
    }

    // Coincident centers have no direction; push along +Y
    let normal = delta.try_normalize().unwrap_or(Vec3::Y);
    let point = a.position + normal * radius_a;
    let offset_a = point - a.position;
    let offset_b = point - b.position;

    let relative_velocity = b.velocity_at(offset_b) - a.velocity_at(offset_a);
    let relative = relative_velocity.dot(normal);
    if relative >= 0.0 {
        return PairOutcome::Receding;
    }

    let material = CombinedMaterial::between(a, b);
    let inv_mass_sum = a.inv_mass() + b.inv_mass();
    let normal_impulse = -(1.0 + material.restitution) * relative / dt / inv_mass_sum;

    // Friction opposes sliding, but never by more than it takes to stop it
    let tangential = relative_velocity - normal * relative;
    let sliding = tangential.length();
    let (tangent, friction_impulse) = if sliding > SLIDING_EPSILON {
        let tangent = tangential / sliding;
        let angular =
            angular_response(a, offset_a, tangent) + angular_response(b, offset_b, tangent);
        let limit = sliding / dt / (inv_mass_sum + angular);
        (tangent, (material.friction * normal_impulse).min(limit))
    } else {
        (Vec3::ZERO, 0.0)
    };

    let impulse = normal * normal_impulse - tangent * friction_impulse;
    b.apply_impulse(impulse, offset_b);
    a.apply_impulse(-impulse, offset_a);

    PairOutcome::Resolved(Contact {
        point,
        normal,
        depth: radius_a + radius_b - distance,
        normal_impulse,
        friction_impulse,
    })
}

/// Sphere against box, normal from the box to the sphere.
///
/// The effective mass includes the box's rotational response at the contact
/// point. No friction impulse is applied on this path.
fn sphere_box(sphere: &mut RigidBody, cuboid: &mut RigidBody, dt: f32) -> PairOutcome {
    let radius = sphere_radius(sphere);
    let frame = cuboid.transform();
    let query = cuboid
        .shape()
        .collision_test(frame.to_local_point(sphere.position));
    if query.distance >= radius {
        return PairOutcome::Separated;
    }

    let normal = frame.to_world_vector(query.normal);
    let point = sphere.position - normal * query.distance;
    let offset_sphere = point - sphere.position;
    let offset_box = point - cuboid.position;

    let relative =
        (sphere.velocity_at(offset_sphere) - cuboid.velocity_at(offset_box)).dot(normal);
    if relative >= 0.0 {
        return PairOutcome::Receding;
    }

    let material = CombinedMaterial::between(sphere, cuboid);
    let angular = angular_response(cuboid, offset_box, normal);
    let effective = sphere.inv_mass() + cuboid.inv_mass() + angular;
    let normal_impulse = -(1.0 + material.restitution) * relative / dt / effective;

    sphere.apply_impulse(normal * normal_impulse, offset_sphere);
    cuboid.apply_impulse(-normal * normal_impulse, offset_box);

    PairOutcome::Resolved(Contact {
        point,
        normal,
        depth: radius - query.distance,
        normal_impulse,
        friction_impulse: 0.0,
    })
}
