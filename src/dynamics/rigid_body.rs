use serde::{Deserialize, Serialize};

use crate::collision::{resolve_ground, resolve_pair, ContactConfig, GroundOutcome, PairOutcome};
use crate::error::{ConfigurationError, StateQuantity};
use crate::geometry::{Shape, ShapeKind};
use crate::math::{quat_is_finite, Mat3, Quat, Transform, Vec3};
use crate::render::{with_transform, Color, DrawOptions, Renderer};

use super::integrator::integrate_semi_implicit_euler;

/// Shaft thickness of the debug arrows
const ARROW_THICKNESS: f32 = 0.01;
const ANGULAR_VELOCITY_COLOR: Color = Vec3::new(1.0, 0.0, 0.0);
const ANGULAR_MOMENTUM_COLOR: Color = Vec3::new(0.0, 1.0, 0.0);

/// A rigid body in the simulation.
///
/// The shape, mass and body-frame inertia are fixed at construction. Pose,
/// velocities and material coefficients are public and may be edited between
/// steps; `force` and `torque` are per-step accumulators that
/// [`RigidBody::update`] empties.
#[derive(Debug, Clone)]
pub struct RigidBody {
    shape: Shape,
    mass: f32,
    inv_mass: f32,
    inertia_body: Mat3,
    inv_inertia_body: Mat3,
    inv_inertia_world: Mat3,

    /// Restitution in `[0, 1]`
    pub restitution: f32,
    /// Friction coefficient (≥ 0)
    pub friction: f32,

    /// Center of mass in world space
    pub position: Vec3,
    /// Rotation from the body frame to world space (unit quaternion)
    pub orientation: Quat,
    /// Linear velocity
    pub linear_velocity: Vec3,
    /// Angular velocity (radians per second, world frame)
    pub angular_velocity: Vec3,

    /// Accumulated force (reset each step)
    pub force: Vec3,
    /// Accumulated torque (reset each step)
    pub torque: Vec3,

    /// Draw color; no effect on the dynamics
    pub color: Color,
}

impl RigidBody {
    /// Creates a body from a description, validating every parameter.
    ///
    /// A description carrying an initial impulse has it applied once, so it
    /// takes effect on the first step.
    pub fn new(desc: &RigidBodyDesc) -> Result<Self, ConfigurationError> {
        desc.validate()?;
        let shape = desc.shape.build()?;

        let inertia_body = shape.moment_of_inertia() * desc.mass;
        let inv_inertia_body = inertia_body.inverse();
        let rotation = Mat3::from_quat(desc.orientation.normalize());

        let mut body = Self {
            shape,
            mass: desc.mass,
            inv_mass: 1.0 / desc.mass,
            inertia_body,
            inv_inertia_body,
            inv_inertia_world: rotation * inv_inertia_body * rotation.transpose(),
            restitution: desc.restitution,
            friction: desc.friction,
            position: desc.position,
            orientation: desc.orientation.normalize(),
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            color: desc.color,
        };

        if let Some(impulse) = desc.impulse {
            body.apply_impulse(impulse.impulse, impulse.offset);
        }

        Ok(body)
    }

    /// The collision shape
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the shape kind
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Returns the mass
    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Returns the inverse mass
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Inertia tensor in the body frame
    #[inline]
    pub fn inertia_body(&self) -> Mat3 {
        self.inertia_body
    }

    /// Inverse inertia tensor in the body frame
    #[inline]
    pub fn inv_inertia_body(&self) -> Mat3 {
        self.inv_inertia_body
    }

    /// Inverse inertia tensor in world space, as of the last refresh
    #[inline]
    pub fn inv_inertia_world(&self) -> Mat3 {
        self.inv_inertia_world
    }

    /// Returns the transform of this body
    #[inline]
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.orientation)
    }

    /// Rebuilds the world inverse inertia as `R · I⁻¹_body · Rᵗ`.
    ///
    /// Always starts from the body-frame tensor; the previous world value is
    /// never reused.
    pub fn update_world_inertia(&mut self) {
        let rot = Mat3::from_quat(self.orientation);
        self.inv_inertia_world = rot * self.inv_inertia_body * rot.transpose();
    }

    /// Advances the body by `dt` under `gravity` and clears the accumulators
    pub fn update(&mut self, dt: f32, gravity: Vec3) {
        integrate_semi_implicit_euler(self, gravity, dt);
    }

    /// Adds an impulse acting at `offset` from the center of mass.
    ///
    /// Only the accumulators change; the velocities respond on the next
    /// [`RigidBody::update`], so impulses added within one step sum up.
    pub fn apply_impulse(&mut self, impulse: Vec3, offset: Vec3) {
        self.force += impulse;
        self.torque += offset.cross(impulse);
    }

    /// Clears accumulated force and torque
    pub fn clear_accumulators(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Velocity of the material point at `offset` from the center of mass
    #[inline]
    pub fn velocity_at(&self, offset: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(offset)
    }

    /// Angular momentum `R · I_body · Rᵗ · ω`
    pub fn angular_momentum(&self) -> Vec3 {
        let rot = Mat3::from_quat(self.orientation);
        rot * self.inertia_body * rot.transpose() * self.angular_velocity
    }

    /// Translational plus rotational kinetic energy
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.linear_velocity.length_squared()
            + 0.5 * self.angular_velocity.dot(self.angular_momentum())
    }

    /// Collision samples transformed into world space
    pub fn world_samples(&self) -> impl Iterator<Item = Vec3> + '_ {
        let transform = self.transform();
        self.shape
            .collision_samples()
            .iter()
            .map(move |&s| transform.to_world_point(s))
    }

    /// Returns the first state quantity that is NaN or infinite, if any
    pub fn non_finite_quantity(&self) -> Option<StateQuantity> {
        if !self.position.is_finite() {
            Some(StateQuantity::Position)
        } else if !quat_is_finite(self.orientation) {
            Some(StateQuantity::Orientation)
        } else if !self.linear_velocity.is_finite() {
            Some(StateQuantity::LinearVelocity)
        } else if !self.angular_velocity.is_finite() {
            Some(StateQuantity::AngularVelocity)
        } else {
            None
        }
    }

    /// Resolves a contact between this body and `other`
    pub fn collision_body(&mut self, other: &mut RigidBody, dt: f32) -> PairOutcome {
        resolve_pair(self, other, dt)
    }

    /// Resolves contact between this body and the ground plane `y = 0`
    pub fn collision_ground(
        &mut self,
        dt: f32,
        gravity: Vec3,
        contact: &ContactConfig,
    ) -> GroundOutcome {
        resolve_ground(self, dt, gravity, contact)
    }

    /// Draws the shape inside the body's transform, then the optional
    /// angular velocity (red) and angular momentum (green) arrows in world
    /// space.
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R, options: DrawOptions) {
        with_transform(renderer, self.position, self.orientation, |r| {
            r.set_color(self.color);
            self.shape.draw(r, options.surface);
        });

        if !options.arrows {
            return;
        }
        if let Some(direction) = self.angular_velocity.try_normalize() {
            renderer.set_color(ANGULAR_VELOCITY_COLOR);
            renderer.draw_arrow(self.position, direction, ARROW_THICKNESS);
        }
        if let Some(direction) = self.angular_momentum().try_normalize() {
            renderer.set_color(ANGULAR_MOMENTUM_COLOR);
            renderer.draw_arrow(self.position, direction, ARROW_THICKNESS);
        }
    }
}

/// Shape parameters in a rigid body description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDesc {
    /// A sphere of the given radius
    Sphere { radius: f32 },
    /// A box with the given half-extents
    Box { half_extents: Vec3 },
}

impl ShapeDesc {
    /// Builds the validated shape
    pub fn build(&self) -> Result<Shape, ConfigurationError> {
        match *self {
            ShapeDesc::Sphere { radius } => Shape::sphere(radius),
            ShapeDesc::Box { half_extents } => Shape::cuboid(half_extents),
        }
    }
}

/// An impulse applied once when the body is created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialImpulse {
    /// Impulse in world space
    pub impulse: Vec3,
    /// Application point relative to the center of mass
    pub offset: Vec3,
}

/// Description for creating a rigid body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBodyDesc {
    /// Shape and its dimensions
    pub shape: ShapeDesc,
    /// Mass (must be positive)
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Impulse applied once after creation
    pub impulse: Option<InitialImpulse>,
    pub color: Color,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            shape: ShapeDesc::Sphere { radius: 0.5 },
            mass: 1.0,
            restitution: 0.2,
            friction: 0.3,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            impulse: None,
            color: Vec3::splat(0.8),
        }
    }
}

impl RigidBodyDesc {
    /// A sphere of the given radius with default mass and material
    pub fn sphere(radius: f32) -> Self {
        Self {
            shape: ShapeDesc::Sphere { radius },
            ..Self::default()
        }
    }

    /// A box with the given half-extents with default mass and material
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            shape: ShapeDesc::Box { half_extents },
            ..Self::default()
        }
    }

    /// Sets the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Sets the restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Sets the friction coefficient
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Sets the position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the orientation
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the initial linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Sets the initial angular velocity
    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    /// Queues an impulse at `offset` from the center of mass
    pub fn with_impulse(mut self, impulse: Vec3, offset: Vec3) -> Self {
        self.impulse = Some(InitialImpulse { impulse, offset });
        self
    }

    /// Sets the draw color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Checks mass, material and pose; shape dimensions are checked when the
    /// shape is built.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigurationError::InvalidMass(self.mass));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigurationError::InvalidRestitution(self.restitution));
        }
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(ConfigurationError::InvalidFriction(self.friction));
        }

        let impulse_finite = self
            .impulse
            .map_or(true, |i| i.impulse.is_finite() && i.offset.is_finite());
        let pose_finite = self.position.is_finite()
            && quat_is_finite(self.orientation)
            && self.orientation.length_squared() > 0.0
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite();
        if !(pose_finite && impulse_finite) {
            return Err(ConfigurationError::NonFinitePose);
        }

        Ok(())
    }
}
