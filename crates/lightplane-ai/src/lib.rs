//! Computer pilots for LightPlane fighters.
//!
//! Every pilot implements [`Pilot`]: once per frame it looks at the
//! [`World`](lightplane_engine::World) and returns a
//! [`PlayerInput`](lightplane_engine::PlayerInput) for its fighter.
//!
//! - [`PatrolPilot`] - calm patrol/chase/evade with a fixed fire cadence
//! - [`RulePilot`] - survival-first distance rules
//! - [`StrategyPilot`] - behaviour tuned by an evolvable [`Strategy`]
//! - [`ReplayPilot`] - plays back a recording
//!
//! Use [`pilot_for`] to build the pilot named by a config's
//! [`AiKind`](lightplane_engine::AiKind).

pub use self::{patrol::*, pilot::*, replay::*, rule::*, strategy::*, tactical::*};

mod patrol;
mod pilot;
mod replay;
mod rule;
mod strategy;
mod tactical;
