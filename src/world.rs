use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace, warn};

use crate::collision::{ContactConfig, GroundOutcome, PairOutcome};
use crate::dynamics::{RigidBody, RigidBodyDesc};
use crate::error::{ConfigurationError, SimulationError};
use crate::math::Vec3;
use crate::render::{DrawOptions, Renderer};

/// Largest tolerated deviation of an orientation quaternion from unit length
const ORIENTATION_TOLERANCE: f32 = 1e-3;

/// Configuration for the simulation world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Gravity acceleration applied to every body
    pub gravity: Vec3,
    /// Step length used by [`World::step_fixed`]
    pub timestep: f32,
    /// Ground contact tuning
    pub contact: ContactConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -0.2, 0.0),
            timestep: 1.0 / 60.0,
            contact: ContactConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Checks gravity, timestep and contact tuning
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.gravity.is_finite() {
            return Err(ConfigurationError::NonFiniteGravity(self.gravity));
        }
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ConfigurationError::InvalidTimestep(self.timestep));
        }
        self.contact.validate()
    }
}

/// A handle to a body in the world (its insertion index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(u32);

impl BodyHandle {
    /// Creates a new body handle
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the index of this handle
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns every body and runs the per-step pipeline.
///
/// A step resolves all body pairs (i < j in insertion order), then every
/// body against the ground, and only then integrates every body. Contacts
/// only touch the force/torque accumulators, so all bodies are integrated
/// from the same pre-step velocities.
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    bodies: Vec<RigidBody>,
    time: f32,
    step_count: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::with_valid_config(WorldConfig::default())
    }
}

impl World {
    /// Creates an empty world after validating `config`
    pub fn new(config: WorldConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: WorldConfig) -> Self {
        debug!(
            gravity = %config.gravity,
            timestep = config.timestep,
            "created world"
        );
        Self {
            config,
            bodies: Vec::new(),
            time: 0.0,
            step_count: 0,
        }
    }

    /// Builds a body from `desc` and adds it, returning its handle
    pub fn add_body(&mut self, desc: &RigidBodyDesc) -> Result<BodyHandle, ConfigurationError> {
        let body = RigidBody::new(desc)?;
        Ok(self.insert_body(body))
    }

    /// Adds an already constructed body
    pub fn insert_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = BodyHandle::from_index(self.bodies.len());
        debug!(
            body = %handle,
            kind = ?body.kind(),
            mass = body.mass(),
            "added body"
        );
        self.bodies.push(body);
        handle
    }

    /// Gets a reference to a body
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.index())
    }

    /// Gets a mutable reference to a body
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.index())
    }

    /// Iterates over bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (BodyHandle::from_index(i), body))
    }

    /// Returns the number of bodies in the world
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the world configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Gets the gravity
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Sets the gravity
    pub fn set_gravity(&mut self, gravity: Vec3) -> Result<(), ConfigurationError> {
        if !gravity.is_finite() {
            return Err(ConfigurationError::NonFiniteGravity(gravity));
        }
        self.config.gravity = gravity;
        Ok(())
    }

    /// Simulated time so far
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of completed steps
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Sum of the kinetic energies of all bodies
    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(RigidBody::kinetic_energy).sum()
    }

    /// Steps the simulation by the configured timestep
    pub fn step_fixed(&mut self) -> Result<(), SimulationError> {
        self.step(self.config.timestep)
    }

    /// Steps the simulation by `dt`.
    ///
    /// Fails if `dt` is not a positive finite number, or if any body's state
    /// is NaN/infinite or its orientation is no longer unit length after the
    /// step. A failed check leaves the world in its post-step state.
    pub fn step(&mut self, dt: f32) -> Result<(), SimulationError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ConfigurationError::InvalidTimestep(dt).into());
        }

        trace!(
            step = self.step_count,
            dt,
            bodies = self.bodies.len(),
            "stepping world"
        );

        let gravity = self.config.gravity;
        self.resolve_pairs(dt);

        for (i, body) in self.bodies.iter_mut().enumerate() {
            if let GroundOutcome::Contact { points, impulse, .. } =
                body.collision_ground(dt, gravity, &self.config.contact)
            {
                trace!(
                    body = %BodyHandle::from_index(i),
                    points,
                    impulse = %impulse,
                    "ground contact"
                );
            }
        }

        for body in &mut self.bodies {
            body.update(dt, gravity);
        }

        self.time += dt;
        self.step_count += 1;

        self.check_invariants()
    }

    /// Every unordered pair once, in insertion order
    fn resolve_pairs(&mut self, dt: f32) {
        for i in 0..self.bodies.len() {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let a = &mut head[i];

            for (offset, b) in tail.iter_mut().enumerate() {
                let handle_a = BodyHandle::from_index(i);
                let handle_b = BodyHandle::from_index(i + 1 + offset);

                match a.collision_body(b, dt) {
                    PairOutcome::Resolved(contact) => trace!(
                        a = %handle_a,
                        b = %handle_b,
                        normal_impulse = contact.normal_impulse,
                        friction_impulse = contact.friction_impulse,
                        "resolved contact"
                    ),
                    PairOutcome::Unsupported => trace!(
                        a = %handle_a,
                        b = %handle_b,
                        "no collision response for box-box pair"
                    ),
                    PairOutcome::Separated | PairOutcome::Receding => {}
                }
            }
        }
    }

    /// Checks every body for non-finite state and denormalized orientation
    pub fn check_invariants(&self) -> Result<(), SimulationError> {
        for (handle, body) in self.bodies() {
            if let Some(quantity) = body.non_finite_quantity() {
                error!(body = %handle, %quantity, step = self.step_count, "non-finite body state");
                return Err(SimulationError::NonFiniteState {
                    body: handle,
                    quantity,
                    step: self.step_count,
                });
            }

            let norm = body.orientation.length();
            if (norm - 1.0).abs() > ORIENTATION_TOLERANCE {
                warn!(body = %handle, norm, step = self.step_count, "orientation drifted from unit length");
                return Err(SimulationError::DenormalizedOrientation {
                    body: handle,
                    norm,
                    step: self.step_count,
                });
            }
        }
        Ok(())
    }

    /// Issues draw calls for every body
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R, options: DrawOptions) {
        for body in &self.bodies {
            body.draw(renderer, options);
        }
    }

    /// Casts a ray against every body and returns the closest hit
    pub fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayCastHit> {
        let direction = direction.try_normalize()?;

        self.bodies()
            .filter_map(|(handle, body)| {
                let frame = body.transform();
                let hit = body.shape().ray_cast(
                    frame.to_local_point(origin),
                    frame.to_local_vector(direction),
                    max_distance,
                )?;
                Some(RayCastHit {
                    body: handle,
                    point: frame.to_world_point(hit.point),
                    normal: frame.to_world_vector(hit.normal),
                    distance: hit.distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Result of a ray cast query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCastHit {
    /// Body that was hit
    pub body: BodyHandle,
    /// World space hit point
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// A world described as data: configuration plus bodies in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDesc {
    /// World configuration
    pub config: WorldConfig,
    /// Bodies, added in order
    pub bodies: Vec<RigidBodyDesc>,
}

impl SceneDesc {
    /// A spinning sphere launched at two tall boxes
    pub fn demo() -> Self {
        let sphere = RigidBodyDesc::sphere(0.25)
            .with_mass(1.0)
            .with_restitution(0.2)
            .with_friction(0.3)
            .with_position(Vec3::new(-2.0, 0.55, 0.0))
            .with_color(Vec3::new(0.0, 1.0, 1.0))
            .with_impulse(Vec3::new(100.0, 0.0, 0.0), Vec3::new(0.0, 0.5, 0.0));

        let boxes = (0..2).map(|j| {
            RigidBodyDesc::cuboid(Vec3::new(0.2, 0.4, 0.2))
                .with_mass(1.0)
                .with_restitution(0.02)
                .with_friction(0.3)
                .with_position(Vec3::new(0.5, 0.25, -0.25 + j as f32 * 0.5))
                .with_color(Vec3::new(0.0, 1.0, 0.0))
        });

        Self {
            config: WorldConfig::default(),
            bodies: std::iter::once(sphere).chain(boxes).collect(),
        }
    }

    /// Validates everything and builds the world
    pub fn build(&self) -> Result<World, ConfigurationError> {
        let mut world = World::new(self.config)?;
        for desc in &self.bodies {
            world.add_body(desc)?;
        }
        Ok(world)
    }
}
