use serde::{Deserialize, Serialize};

use crate::dynamics::RigidBody;
use crate::error::ConfigurationError;
use crate::math::Vec3;

/// Tangential speeds below this are treated as no sliding
pub(crate) const SLIDING_EPSILON: f32 = 1e-5;

/// Material coefficients combined for one contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedMaterial {
    /// The smaller of the two restitutions
    pub restitution: f32,
    /// The larger of the two friction coefficients
    pub friction: f32,
}

impl CombinedMaterial {
    /// Combines the materials of two bodies
    pub fn between(a: &RigidBody, b: &RigidBody) -> Self {
        Self {
            restitution: a.restitution.min(b.restitution),
            friction: a.friction.max(b.friction),
        }
    }
}

/// A resolved contact between two bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub point: Vec3,
    /// Contact normal (pointing from A to B)
    pub normal: Vec3,
    /// Penetration depth (positive when overlapping)
    pub depth: f32,
    /// Normal impulse applied to B along `normal`; A receives the opposite
    pub normal_impulse: f32,
    /// Magnitude of the friction impulse opposing tangential sliding
    pub friction_impulse: f32,
}

impl Contact {
    /// Same contact seen from the other body
    pub(crate) fn reversed(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// What happened when a pair of bodies was checked
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairOutcome {
    /// The shapes do not touch
    Separated,
    /// The shapes overlap but are already moving apart
    Receding,
    /// Impulses were applied to both bodies
    Resolved(Contact),
    /// No collision handling exists for this shape combination (box–box)
    Unsupported,
}

impl PairOutcome {
    /// Returns the contact, if impulses were applied
    pub fn contact(&self) -> Option<&Contact> {
        match self {
            PairOutcome::Resolved(contact) => Some(contact),
            _ => None,
        }
    }

    /// Whether an impulse was applied
    pub fn is_resolved(&self) -> bool {
        matches!(self, PairOutcome::Resolved(_))
    }
}

/// What happened when a body was checked against the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundOutcome {
    /// No part of the body reaches `y = 0`
    NoContact,
    /// At least one point touches the ground
    Contact {
        /// Number of contributing points (1 for a sphere)
        points: usize,
        /// Impulse added to the body
        impulse: Vec3,
        /// Torque added to the body
        torque: Vec3,
    },
}

impl GroundOutcome {
    /// Whether any point touched the ground
    pub fn is_contact(&self) -> bool {
        matches!(self, GroundOutcome::Contact { .. })
    }
}

/// Ground contact tuning.
///
/// An approaching ground contact aims for a separating speed of at least
/// `baumgarte · (depth − slop) / dt`, capped at `max_correction_velocity`, so
/// bodies that sank during the previous step are pushed back out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Fraction of the penetration removed per step, in `[0, 1]`
    pub baumgarte: f32,
    /// Penetration allowed without correction
    pub slop: f32,
    /// Upper bound on the correction speed
    pub max_correction_velocity: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            baumgarte: 0.2,
            slop: 1e-4,
            max_correction_velocity: 0.5,
        }
    }
}

impl ContactConfig {
    /// Contact tuning with position correction disabled
    pub fn without_correction() -> Self {
        Self {
            baumgarte: 0.0,
            ..Self::default()
        }
    }

    /// Rejects out-of-range or non-finite tuning values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.baumgarte) {
            return Err(ConfigurationError::InvalidContactTuning(
                "baumgarte factor must lie in [0, 1]",
            ));
        }
        if !(self.slop.is_finite() && self.slop >= 0.0) {
            return Err(ConfigurationError::InvalidContactTuning(
                "slop must be non-negative and finite",
            ));
        }
        if !(self.max_correction_velocity.is_finite() && self.max_correction_velocity >= 0.0) {
            return Err(ConfigurationError::InvalidContactTuning(
                "max correction velocity must be non-negative and finite",
            ));
        }
        Ok(())
    }

    /// Separating speed requested for a contact sunk by `depth`
    #[inline]
    pub fn correction_velocity(&self, depth: f32, dt: f32) -> f32 {
        (self.baumgarte * (depth - self.slop).max(0.0) / dt).min(self.max_correction_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::RigidBodyDesc;

    #[test]
    fn test_material_combination() {
        let a = RigidBody::new(
            &RigidBodyDesc::sphere(1.0)
                .with_restitution(0.2)
                .with_friction(0.4),
        )
        .unwrap();
        let b = RigidBody::new(
            &RigidBodyDesc::sphere(1.0)
                .with_restitution(0.8)
                .with_friction(0.1),
        )
        .unwrap();

        let m = CombinedMaterial::between(&a, &b);
        assert_eq!(m.restitution, 0.2);
        assert_eq!(m.friction, 0.4);
        assert_eq!(CombinedMaterial::between(&b, &a), m);
    }

    #[test]
    fn test_correction_velocity() {
        let config = ContactConfig::default();
        let dt = 0.1;

        assert_eq!(config.correction_velocity(0.0, dt), 0.0);
        assert_eq!(config.correction_velocity(config.slop, dt), 0.0);
        assert!((config.correction_velocity(0.1 + config.slop, dt) - 0.2).abs() < 1e-5);
        // Deep penetration is capped
        assert_eq!(config.correction_velocity(10.0, dt), config.max_correction_velocity);

        assert_eq!(ContactConfig::without_correction().correction_velocity(1.0, dt), 0.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(ContactConfig::default().validate().is_ok());

        let bad = ContactConfig {
            baumgarte: 1.5,
            ..ContactConfig::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigurationError::InvalidContactTuning(_))
        ));

        let bad = ContactConfig {
            slop: f32::NAN,
            ..ContactConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_reversed_contact() {
        let contact = Contact {
            point: Vec3::ZERO,
            normal: Vec3::Y,
            depth: 0.1,
            normal_impulse: 2.0,
            friction_impulse: 0.5,
        };
        let reversed = contact.reversed();
        assert_eq!(reversed.normal, -Vec3::Y);
        assert_eq!(reversed.normal_impulse, 2.0);
    }
}
