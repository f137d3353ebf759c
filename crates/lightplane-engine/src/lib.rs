//! Game model and fixed-timestep loop for the LightPlane shooter.
//!
//! [`core`] holds plain geometry, entity types and the collision broad phase.
//! [`engine`] builds the playable game on top of them: configuration, the
//! [`World`] loop, sessions, recordings, and the numeric [`Observation`] used
//! by learning agents.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
