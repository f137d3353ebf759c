//! Game logic and state management.
//!
//! - [`GameConfig`] - Data describing a game mode (players, enemies, power-ups, difficulty)
//! - [`World`] - The single configurable game loop
//! - [`GameSession`] - A world plus pause handling and frame timing
//! - [`SessionRecording`] - Seed, config and run-length encoded inputs for replays
//! - [`Observation`] - Fixed-length numeric view of a world for learning agents
//! - [`GameSeed`] - Seed for deterministic enemy and power-up generation
//!
//! # Game Flow
//!
//! 1. Pick a [`GameMode`] preset (or load a custom [`GameConfig`])
//! 2. Create a [`GameSession`] with a seed
//! 3. Each frame, gather one [`PlayerInput`] per fighter into [`FrameInputs`]
//! 4. Call [`GameSession::increment_frame`] and react to the returned [`FrameEvents`]
//! 5. Repeat until every fighter is down or the frame limit is reached
//!
//! # Example
//!
//! ```
//! use lightplane_engine::{Action, FrameInputs, GameMode, GameSeed, GameSession, PlayerInput};
//!
//! let mut session = GameSession::new(GameMode::Traditional.preset(), GameSeed::from_u64(3)).unwrap();
//! let mut inputs = FrameInputs::idle(1);
//! inputs.set(0, PlayerInput::from(Action::Fire));
//!
//! let events = session.increment_frame(&inputs).unwrap();
//! assert_eq!(events.shots, vec![0]);
//! ```

pub use self::{
    config::*, difficulty::*, effects::*, input::*, observation::*, recording::*, seed::*,
    session::*, stats::*, world::*,
};

mod config;
mod difficulty;
mod effects;
mod input;
mod observation;
mod recording;
mod seed;
mod session;
mod stats;
mod world;
