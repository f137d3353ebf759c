//! Gym-like environment around one fighter.
//!
//! [`TrainingEnv`] exposes slot 0 of a [`GameSession`] through the discrete
//! [`Action`] space and the fixed-length [`Observation`] vector, and turns
//! each frame's events into a shaped reward. Any reinforcement learner can
//! drive it with the usual `reset`/`step` loop:
//!
//! ```
//! use lightplane_engine::{Action, GameMode, GameSeed};
//! use lightplane_training::env::{RewardConfig, TrainingEnv};
//!
//! let mut env = TrainingEnv::new(GameMode::Traditional.preset(), RewardConfig::default()).unwrap();
//! let mut observation = env.reset(GameSeed::from_u64(0));
//! loop {
//!     let result = env.step(Action::Fire);
//!     observation = result.observation;
//!     if result.terminated || result.truncated {
//!         break;
//!     }
//! }
//! assert_eq!(observation.as_slice().len(), lightplane_training::env::OBSERVATION_LEN);
//! ```
//!
//! Other fighters in the config, if any, receive idle inputs.

use lightplane_engine::{
    Action, ConfigError, FrameEvents, FrameInputs, GameConfig, GameSeed, GameSession, HitCause,
    Observation, PlayerInput,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ACTION_COUNT: usize = Action::COUNT;
pub const OBSERVATION_LEN: usize = Observation::LEN;

const AGENT: usize = 0;
const SAFE_HALF_WIDTH: f32 = 200.0;
const SAFE_HALF_HEIGHT: f32 = 150.0;

/// Reward shaping knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Every frame the agent is still flying.
    pub survival: f32,
    pub kill: f32,
    /// Life lost to an enemy collision.
    pub contact_hit: f32,
    /// Life lost to an enemy bullet.
    pub bullet_hit: f32,
    /// Per frame spent near the arena centre.
    pub safe_zone: f32,
    /// Per frame with an enemy within `near_enemy_distance`.
    pub near_enemy: f32,
    pub near_enemy_distance: f32,
    /// Per bullet actually fired.
    pub shot: f32,
    /// Steps after which an episode is truncated.
    pub max_steps: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            survival: 0.1,
            kill: 50.0,
            contact_hit: -2.0,
            bullet_hit: -1.0,
            safe_zone: 0.02,
            near_enemy: 0.05,
            near_enemy_distance: 200.0,
            shot: 0.1,
            max_steps: 5000,
        }
    }
}

/// Counters reported alongside every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StepInfo {
    pub step: u64,
    pub score: u64,
    pub lives: u32,
    pub kills: u32,
    pub power_ups: u32,
    pub accuracy: f32,
    pub episode_reward: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    /// The agent went down (or the game ended).
    pub terminated: bool,
    /// The step limit was reached first.
    pub truncated: bool,
    pub info: StepInfo,
}

#[derive(Debug, Clone)]
pub struct TrainingEnv {
    session: GameSession,
    rewards: RewardConfig,
    steps: u64,
    episode_reward: f32,
}

impl TrainingEnv {
    pub fn new(config: GameConfig, rewards: RewardConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            session: GameSession::new(config, GameSeed::from_u64(0))?,
            rewards,
            steps: 0,
            episode_reward: 0.0,
        })
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Starts a new episode.
    pub fn reset(&mut self, seed: GameSeed) -> Observation {
        self.session = self.session.restart(seed);
        self.steps = 0;
        self.episode_reward = 0.0;
        self.observe()
    }

    /// Plays one frame with `action` for the agent.
    ///
    /// Stepping a finished episode returns a terminal result with zero reward.
    pub fn step(&mut self, action: Action) -> StepResult {
        let mut inputs = FrameInputs::idle(self.session.config().players.len());
        inputs.set(AGENT, PlayerInput::from(action));

        let reward = match self.session.increment_frame(&inputs) {
            Some(events) => {
                self.steps += 1;
                self.reward_for(&events)
            }
            None => 0.0,
        };
        self.episode_reward += reward;

        let agent_alive = self
            .session
            .world()
            .fighter(AGENT)
            .is_some_and(|f| f.is_alive());
        let terminated = !agent_alive || self.session.session_state().is_game_over();
        let truncated = !terminated && self.steps >= self.rewards.max_steps;
        if terminated || truncated {
            debug!(
                steps = self.steps,
                reward = self.episode_reward,
                terminated,
                "episode finished"
            );
        }

        StepResult {
            observation: self.observe(),
            reward,
            terminated,
            truncated,
            info: self.info(),
        }
    }

    fn observe(&self) -> Observation {
        Observation::for_player(self.session.world(), AGENT, self.rewards.max_steps)
    }

    #[expect(clippy::cast_precision_loss)]
    fn reward_for(&self, events: &FrameEvents) -> f32 {
        let r = &self.rewards;
        let world = self.session.world();
        let mut reward = r.kill * events.kills_by(AGENT).count() as f32;
        reward += events
            .lives_lost(AGENT)
            .map(|hit| match hit.cause {
                HitCause::EnemyContact => r.contact_hit,
                HitCause::EnemyBullet => r.bullet_hit,
            })
            .sum::<f32>();
        if events.shots.contains(&AGENT) {
            reward += r.shot;
        }

        let Some(fighter) = world.fighter(AGENT).filter(|f| f.is_alive()) else {
            return reward;
        };
        reward += r.survival;
        let me = fighter.center();
        let offset = me - world.bounds().center();
        if offset.x.abs() < SAFE_HALF_WIDTH && offset.y.abs() < SAFE_HALF_HEIGHT {
            reward += r.safe_zone;
        }
        if world
            .nearest_enemy(me)
            .is_some_and(|(_, d)| d < r.near_enemy_distance)
        {
            reward += r.near_enemy;
        }
        reward
    }

    fn info(&self) -> StepInfo {
        let fighter = self.session.world().fighter(AGENT);
        let stats = fighter.map(|f| f.stats().clone()).unwrap_or_default();
        StepInfo {
            step: self.steps,
            score: stats.score(),
            lives: fighter.map_or(0, |f| f.lives()),
            kills: stats.kills(),
            power_ups: stats.power_ups(),
            accuracy: stats.accuracy(),
            episode_reward: self.episode_reward,
        }
    }
}

#[cfg(test)]
mod tests {
    use lightplane_engine::{GameMode, Vec2};

    use super::*;

    fn quiet_config() -> GameConfig {
        let mut config = GameMode::Traditional.preset();
        config.enemies.spawn_interval_frames = u32::MAX;
        config.enemies.spawn_chance = 0.0;
        config.enemies.fire_chance = 0.0;
        config.power_ups.spawn_chance = 0.0;
        config
    }

    #[test]
    fn test_reset_observation_is_zero_padded() {
        let mut env = TrainingEnv::new(quiet_config(), RewardConfig::default()).unwrap();
        let observation = env.reset(GameSeed::from_u64(1));
        assert_eq!(observation.as_slice().len(), OBSERVATION_LEN);
        assert!(observation.as_slice().iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_survival_and_shot_rewards() {
        let mut env = TrainingEnv::new(quiet_config(), RewardConfig::default()).unwrap();
        env.reset(GameSeed::from_u64(2));
        let moved = env.step(Action::Up);
        // fighter starts at the left edge, outside the centre zone
        assert!((moved.reward - 0.1).abs() < 1e-6);
        let fired = env.step(Action::Fire);
        assert!((fired.reward - 0.2).abs() < 1e-6);
        assert_eq!(fired.info.step, 2);
        assert!(!fired.terminated && !fired.truncated);
    }

    #[test]
    fn test_truncates_at_max_steps() {
        let rewards = RewardConfig {
            max_steps: 10,
            ..RewardConfig::default()
        };
        let mut env = TrainingEnv::new(quiet_config(), rewards).unwrap();
        env.reset(GameSeed::from_u64(3));
        let results: Vec<_> = (0..10).map(|_| env.step(Action::Down)).collect();
        assert!(results[..9].iter().all(|r| !r.truncated));
        assert!(results[9].truncated);
        assert!(!results[9].terminated);
    }

    #[test]
    fn test_contact_hit_penalised_and_terminates_on_last_life() {
        let mut config = quiet_config();
        config.fighter.starting_lives = 1;
        let mut env = TrainingEnv::new(config, RewardConfig::default()).unwrap();
        env.reset(GameSeed::from_u64(4));

        let me = env.session().world().fighters()[0].center();
        env.session.world_mut().spawn_enemy(me, Vec2::ZERO);
        let result = env.step(Action::Down);
        assert!(result.terminated);
        assert!(result.reward < 0.0);
        assert_eq!(result.info.lives, 0);

        let after = env.step(Action::Down);
        assert!(after.terminated);
        assert!(after.reward.abs() < f32::EPSILON);
    }
}
