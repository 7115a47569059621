//! Contact detection and impulse response.
//!
//! Each check is one-shot: it finds at most one contact, sizes an impulse for
//! the current step and adds it to the bodies' accumulators. There is no
//! broad phase, no persistent manifold and no iterative solver.

mod contact;
mod ground;
mod pair;

pub use contact::{CombinedMaterial, Contact, ContactConfig, GroundOutcome, PairOutcome};
pub use ground::resolve_ground;
pub use pair::resolve_pair;
