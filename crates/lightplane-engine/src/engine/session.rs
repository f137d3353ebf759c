use std::time::Duration;

use tracing::info;

use crate::{
    ConfigError, FrameEvents, FrameInputs, GameConfig, GameSeed, PlayerSlot, PlayerStats, World,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A game in progress, with pause handling and frame timing.
///
/// The session ends when every fighter is down or, if the config sets
/// `max_frames`, when that many frames have been played.
///
/// # Example
///
/// ```
/// use lightplane_engine::{FrameInputs, GameMode, GameSeed, GameSession};
///
/// let mut config = GameMode::Traditional.preset();
/// config.max_frames = Some(90);
/// let mut session = GameSession::new(config, GameSeed::from_u64(1)).unwrap();
///
/// let inputs = FrameInputs::idle(1);
/// while session.session_state().is_playing() {
///     session.increment_frame(&inputs);
/// }
/// assert_eq!(session.total_frames(), 90);
/// assert_eq!(session.duration().as_millis(), 1500);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    world: World,
    seed: GameSeed,
    session_state: SessionState,
    total_frames: u64,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: GameSeed) -> Result<Self, ConfigError> {
        info!(mode = %config.mode_name, players = config.players.len(), %seed, "session started");
        Ok(Self {
            world: World::new(config, seed)?,
            seed,
            session_state: SessionState::Playing,
            total_frames: 0,
        })
    }

    /// Starts a new session with the same config and a new seed.
    #[must_use]
    pub fn restart(&self, seed: GameSeed) -> Self {
        info!(mode = %self.config().mode_name, %seed, "session restarted");
        Self {
            world: self.world.restarted(seed),
            seed,
            session_state: SessionState::Playing,
            total_frames: 0,
        }
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access for out-of-band actions such as easter-egg triggers.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.world.config()
    }

    #[must_use]
    pub fn seed(&self) -> GameSeed {
        self.seed
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.world.config().fps
    }

    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        const NANOS_PER_SEC: u64 = 1_000_000_000;
        let fps = u64::from(self.fps());
        let secs = self.total_frames / fps;
        let nanos = (self.total_frames % fps) * NANOS_PER_SEC / fps;
        // nanos < NANOS_PER_SEC, so it fits in u32
        Duration::new(secs, u32::try_from(nanos).unwrap_or(0))
    }

    pub fn player_stats(&self) -> impl Iterator<Item = &PlayerStats> + '_ {
        self.world.fighters().iter().map(|f| f.stats())
    }

    #[must_use]
    pub fn total_score(&self) -> u64 {
        self.player_stats().map(PlayerStats::score).sum()
    }

    /// Slot with the highest score once the session is over.
    ///
    /// Ties go to the lower slot.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerSlot> {
        if !self.session_state.is_game_over() {
            return None;
        }
        self.world
            .fighters()
            .iter()
            .rev()
            .max_by_key(|f| f.stats().score())
            .map(|f| f.slot())
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Advances one frame while playing; does nothing while paused or over.
    pub fn increment_frame(&mut self, inputs: &FrameInputs) -> Option<FrameEvents> {
        if !self.session_state.is_playing() {
            return None;
        }
        let events = self.world.step(inputs);
        self.total_frames += 1;

        let out_of_time = self
            .config()
            .max_frames
            .is_some_and(|max| self.total_frames >= max);
        if events.game_over || out_of_time {
            self.session_state = SessionState::GameOver;
            info!(
                frames = self.total_frames,
                score = self.total_score(),
                out_of_time,
                "session over"
            );
        }
        Some(events)
    }
}
