//! Fitness evaluation: how good is a strategy?
//!
//! A strategy is judged by letting a [`StrategyPilot`] fly it through a few
//! headless games. Every game uses a fixed seed, so all individuals of a
//! generation face exactly the same enemy waves and their fitness values
//! are comparable. Each game's [`PerformanceMetrics`] give a fitness in
//! `0.0..=1.0`; the evaluator reports their mean.
//!
//! The games use the single-player rules with an AI pilot in place of the
//! human, and end after `frame_limit` frames when the fighter survives that
//! long.

use lightplane_ai::{PerformanceMetrics, Pilot as _, Strategy, StrategyPilot};
use lightplane_engine::{
    AiKind, ConfigError, FrameInputs, GameConfig, GameMode, GameSeed, GameSession, PilotKind,
    PlayerConfig,
};
use tracing::debug;

/// Scores a strategy. Higher is better.
///
/// Implementations must be shareable between threads: a population is
/// evaluated in parallel.
pub trait FitnessEvaluator: Sync {
    fn evaluate(&self, strategy: &Strategy) -> f32;
}

/// Plays headless sessions with a strategy pilot and averages their fitness.
#[derive(Debug, Clone)]
pub struct Evaluator {
    template: GameSession,
    games: usize,
    first_seed: u64,
}

impl Evaluator {
    /// Evaluates on `games` single-player games of at most `frame_limit` frames.
    pub fn new(games: usize, frame_limit: u64) -> Result<Self, ConfigError> {
        Self::with_config(GameMode::Traditional.preset(), games, frame_limit)
    }

    /// Evaluates on games built from `config`.
    ///
    /// Every player entry is replaced by a single strategy-piloted fighter.
    pub fn with_config(
        mut config: GameConfig,
        games: usize,
        frame_limit: u64,
    ) -> Result<Self, ConfigError> {
        config.mode_name = "training".to_owned();
        config.players = vec![PlayerConfig {
            name: "Strategy AI".to_owned(),
            pilot: PilotKind::Ai {
                controller: AiKind::Strategy,
            },
        }];
        config.max_frames = Some(frame_limit);
        Ok(Self {
            template: GameSession::new(config, GameSeed::from_u64(0))?,
            games,
            first_seed: 0,
        })
    }

    /// Uses seeds `first_seed..first_seed + games` instead of `0..games`.
    #[must_use]
    pub fn with_first_seed(mut self, first_seed: u64) -> Self {
        self.first_seed = first_seed;
        self
    }

    #[must_use]
    pub fn games(&self) -> usize {
        self.games
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.template.config()
    }

    /// Plays one game with `strategy` and returns what happened.
    #[must_use]
    pub fn play(&self, strategy: &Strategy, seed: GameSeed) -> PerformanceMetrics {
        let mut session = self.template.restart(seed);
        let mut pilot = StrategyPilot::new(*strategy, seed.rng());
        while session.session_state().is_playing() {
            let input = pilot.decide(session.world(), 0);
            session.increment_frame(&std::iter::once(input).collect::<FrameInputs>());
        }
        let metrics = session
            .player_stats()
            .next()
            .map(|stats| PerformanceMetrics::from_stats(stats, session.fps()))
            .unwrap_or_default();
        debug!(%seed, frames = session.total_frames(), ?metrics, "evaluation game finished");
        metrics
    }

    fn seeds(&self) -> impl Iterator<Item = GameSeed> + '_ {
        (self.first_seed..)
            .take(self.games)
            .map(GameSeed::from_u64)
    }
}

impl FitnessEvaluator for Evaluator {
    #[expect(clippy::cast_precision_loss)]
    fn evaluate(&self, strategy: &Strategy) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        let total = self
            .seeds()
            .map(|seed| self.play(strategy, seed).fitness())
            .sum::<f32>();
        total / self.games as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_is_deterministic() {
        let evaluator = Evaluator::new(2, 300).unwrap();
        let a = evaluator.evaluate(&Strategy::BALANCED);
        let b = evaluator.evaluate(&Strategy::BALANCED);
        assert!((a - b).abs() < f32::EPSILON);
        assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn test_play_respects_frame_limit() {
        let evaluator = Evaluator::new(1, 120).unwrap();
        let metrics = evaluator.play(&Strategy::BALANCED, GameSeed::from_u64(3));
        // 120 frames at 60 fps
        assert!(metrics.survival_time <= 2.0 + f32::EPSILON);
    }

    #[test]
    fn test_config_has_single_strategy_pilot() {
        let evaluator = Evaluator::new(1, 10).unwrap();
        let config = evaluator.config();
        assert_eq!(config.players.len(), 1);
        assert_eq!(
            config.players[0].pilot,
            PilotKind::Ai {
                controller: AiKind::Strategy
            }
        );
        assert_eq!(config.max_frames, Some(10));
    }

    #[test]
    fn test_zero_games_scores_zero() {
        let evaluator = Evaluator::new(0, 10).unwrap();
        assert!(evaluator.evaluate(&Strategy::BALANCED).abs() < f32::EPSILON);
    }
}
