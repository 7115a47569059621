//! Basic simulation example
//!
//! A spinning sphere is launched along +X into two tall boxes standing on the
//! ground. Body state is logged every 30 frames; set `RUST_LOG=rigidsim=trace`
//! to also see every contact.

use rigidsim::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let scene = SceneDesc::demo();
    let mut world = scene.build()?;
    info!(
        bodies = world.num_bodies(),
        gravity = %world.gravity(),
        "built demo scene"
    );

    // Simulation parameters
    let dt = world.config().timestep;
    let total_time = 10.0;
    let steps = (total_time / dt) as usize;

    let mut recorder = CommandRecorder::new();
    let options = DrawOptions {
        surface: true,
        arrows: true,
    };

    for i in 0..steps {
        world.step(dt)?;

        // Log state every 30 frames (0.5 seconds)
        if i % 30 == 0 {
            for (handle, body) in world.bodies() {
                info!(
                    t = world.time(),
                    body = %handle,
                    kind = ?body.kind(),
                    position = %body.position,
                    velocity = %body.linear_velocity,
                    spin = %body.angular_velocity,
                    "body state"
                );
            }

            recorder.clear();
            world.draw(&mut recorder, options);
            info!(commands = recorder.commands().len(), "recorded frame");
        }
    }

    info!(
        time = world.time(),
        kinetic_energy = world.kinetic_energy(),
        "simulation finished"
    );
    Ok(())
}
