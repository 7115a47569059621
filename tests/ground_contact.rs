//! End-to-end settling behavior against the ground plane.

use rigidsim::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn world_with(desc: RigidBodyDesc) -> (World, BodyHandle) {
    let mut world = World::default();
    let handle = world.add_body(&desc).unwrap();
    (world, handle)
}

#[test]
fn dropped_sphere_comes_to_rest_on_ground() {
    let (mut world, ball) = world_with(
        RigidBodyDesc::sphere(0.25)
            .with_mass(1.0)
            .with_restitution(0.2)
            .with_friction(0.4)
            .with_position(Vec3::new(0.0, 1.0, 0.0)),
    );
    assert_eq!(world.gravity().y, -0.2);

    let mut lowest = f32::INFINITY;
    for _ in 0..600 {
        world.step(DT).unwrap();
        lowest = lowest.min(world.body(ball).unwrap().position.y);
    }

    let body = world.body(ball).unwrap();
    assert!(
        (body.position.y - 0.25).abs() < 1e-3,
        "resting height {}",
        body.position.y
    );
    assert!(body.linear_velocity.y.abs() < 0.01);
    assert!(lowest > 0.0, "sank to {lowest}");
}

#[test]
fn sphere_released_just_above_ground_settles() {
    let (mut world, ball) = world_with(
        RigidBodyDesc::sphere(0.25)
            .with_restitution(0.0)
            .with_friction(0.4)
            .with_position(Vec3::new(0.0, 0.26, 0.0)),
    );

    for _ in 0..300 {
        world.step(DT).unwrap();
        assert!(world.body(ball).unwrap().position.y > 0.0);
    }

    let body = world.body(ball).unwrap();
    assert!(body.linear_velocity.length() < 0.01);
    assert!((body.position.y - 0.25).abs() < 5e-3);
}

#[test]
fn rolling_sphere_stops_sliding() {
    let (mut world, ball) = world_with(
        RigidBodyDesc::sphere(0.25)
            .with_friction(0.3)
            .with_position(Vec3::new(0.0, 0.25, 0.0))
            .with_linear_velocity(Vec3::X),
    );

    for _ in 0..600 {
        world.step(DT).unwrap();
    }

    // Friction converts the slide into rolling: v = 5/7 of the start speed
    let body = world.body(ball).unwrap();
    let contact_velocity = body.velocity_at(Vec3::new(0.0, -0.25, 0.0));
    assert!(contact_velocity.x.abs() < 1e-3);
    assert!((body.linear_velocity.x - 5.0 / 7.0).abs() < 0.02);
    assert!(body.angular_velocity.z < 0.0);
}

#[test]
fn dropped_box_settles_flat() {
    let (mut world, cuboid) = world_with(
        RigidBodyDesc::cuboid(Vec3::new(0.2, 0.4, 0.2))
            .with_restitution(0.02)
            .with_friction(0.3)
            .with_position(Vec3::new(0.0, 0.8, 0.0)),
    );

    for _ in 0..900 {
        world.step(DT).unwrap();
    }

    let body = world.body(cuboid).unwrap();
    assert!((body.position.y - 0.4).abs() < 5e-3);
    assert!(body.linear_velocity.length() < 0.01);
    assert!(body.orientation.angle_between(Quat::IDENTITY) < 1e-3);
}

#[test]
fn box_resting_on_ground_touches_with_bottom_face_only() {
    let desc = RigidBodyDesc::cuboid(Vec3::splat(0.1))
        .with_position(Vec3::new(0.0, 0.1, 0.0))
        .with_linear_velocity(Vec3::new(0.0, -0.05, 0.0));
    let mut body = RigidBody::new(&desc).unwrap();

    let corners_on_ground = body
        .world_samples()
        .take(8)
        .filter(|p| p.y.abs() < 1e-6)
        .count();
    assert_eq!(corners_on_ground, 4);

    let outcome = body.collision_ground(DT, Vec3::new(0.0, -0.2, 0.0), &ContactConfig::default());
    match outcome {
        GroundOutcome::Contact {
            points, impulse, ..
        } => {
            assert_eq!(points, 8);
            assert!(impulse.y > 0.0);
        }
        GroundOutcome::NoContact => panic!("box on the ground reported no contact"),
    }

    // Lifted clear of the plane nothing touches
    let mut lifted = RigidBody::new(&desc.with_position(Vec3::new(0.0, 0.101, 0.0))).unwrap();
    assert_eq!(
        lifted.collision_ground(DT, Vec3::new(0.0, -0.2, 0.0), &ContactConfig::default()),
        GroundOutcome::NoContact
    );
}
