use crate::{DifficultyConfig, EnemyConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DifficultyChange {
    Harder,
    Easier,
}

/// Adaptive difficulty.
///
/// Counts kills, pickups and damage over a fixed window of frames and turns
/// them into an efficiency score in `0.0..=1.0`:
///
/// ```text
/// efficiency = clamp(0.6 * kills/s + 0.3 * pickups/s - 0.1 * damage/s, 0, 1)
/// ```
///
/// A window above the raise threshold makes the game harder (higher level,
/// spawn chance and enemy fire chance). A window below the lower threshold
/// makes it easier. Every value stays within its configured cap.
#[derive(Debug, Clone)]
pub struct DifficultyTuner {
    config: DifficultyConfig,
    level: f64,
    spawn_chance: f64,
    fire_chance: f64,
    window_frames: u32,
    kills: u32,
    pickups: u32,
    damage: u32,
    efficiency: f64,
}

impl DifficultyTuner {
    #[must_use]
    pub fn new(config: &DifficultyConfig, enemies: &EnemyConfig) -> Self {
        Self {
            config: config.clone(),
            level: bounded(config.level, 1.0),
            spawn_chance: bounded(enemies.spawn_chance, config.max_spawn_chance),
            fire_chance: bounded(enemies.fire_chance, config.max_fire_chance),
            window_frames: 0,
            kills: 0,
            pickups: 0,
            damage: 0,
            efficiency: 0.0,
        }
    }

    #[must_use]
    pub fn level(&self) -> f64 {
        self.level
    }

    #[must_use]
    pub fn spawn_chance(&self) -> f64 {
        self.spawn_chance
    }

    #[must_use]
    pub fn fire_chance(&self) -> f64 {
        self.fire_chance
    }

    /// Efficiency of the last completed window.
    #[must_use]
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Multiplier applied to enemy speed (1.0 at the default level of 0.5).
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn speed_factor(&self) -> f32 {
        (0.5 + self.level) as f32
    }

    /// Extra hit points for newly spawned enemies at high difficulty.
    #[must_use]
    pub fn bonus_hp(&self) -> u32 {
        u32::from(self.level >= 0.9)
    }

    pub fn record_kill(&mut self) {
        self.kills += 1;
    }

    pub fn record_pickup(&mut self) {
        self.pickups += 1;
    }

    pub fn record_damage(&mut self) {
        self.damage += 1;
    }

    /// Advances one frame and re-tunes at the end of each window.
    ///
    /// Does nothing when adaptation is disabled.
    pub fn tick(&mut self, fps: u32) -> Option<DifficultyChange> {
        if !self.config.adaptive {
            return None;
        }
        self.window_frames += 1;
        if self.window_frames < self.config.interval_frames.max(1) {
            return None;
        }

        let seconds = f64::from(self.window_frames) / f64::from(fps.max(1));
        let per_second = |n: u32| f64::from(n) / seconds;
        self.efficiency = (per_second(self.kills) * 0.6 + per_second(self.pickups) * 0.3
            - per_second(self.damage) * 0.1)
            .clamp(0.0, 1.0);
        self.window_frames = 0;
        self.kills = 0;
        self.pickups = 0;
        self.damage = 0;

        let cfg = &self.config;
        let change = if self.efficiency > cfg.raise_threshold {
            DifficultyChange::Harder
        } else if self.efficiency < cfg.lower_threshold {
            DifficultyChange::Easier
        } else {
            return None;
        };
        let sign = if change.is_harder() { 1.0 } else { -1.0 };
        self.level = bounded(self.level + sign * cfg.level_step, 1.0);
        self.spawn_chance = bounded(
            self.spawn_chance + sign * cfg.spawn_step,
            cfg.max_spawn_chance,
        );
        self.fire_chance = bounded(
            self.fire_chance + sign * cfg.fire_step,
            cfg.max_fire_chance,
        );
        Some(change)
    }
}

/// Keeps a chance inside `0.0..=cap`, and never above 1.0.
fn bounded(value: f64, cap: f64) -> f64 {
    value.min(cap).min(1.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuner() -> DifficultyTuner {
        let config = DifficultyConfig {
            adaptive: true,
            ..DifficultyConfig::default()
        };
        DifficultyTuner::new(&config, &EnemyConfig::default())
    }

    fn run_window(tuner: &mut DifficultyTuner, kills: u32) -> Option<DifficultyChange> {
        for _ in 0..kills {
            tuner.record_kill();
        }
        let mut change = None;
        for _ in 0..100 {
            change = tuner.tick(60).or(change);
        }
        change
    }

    #[test]
    fn test_disabled_tuner_never_changes() {
        let mut tuner = DifficultyTuner::new(&DifficultyConfig::default(), &EnemyConfig::default());
        for _ in 0..1000 {
            tuner.record_kill();
            assert!(tuner.tick(60).is_none());
        }
        assert!((tuner.level() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_good_play_raises_difficulty() {
        let mut tuner = tuner();
        // 3 kills in 100 frames at 60 fps = 1.8 kills/s
        assert_eq!(run_window(&mut tuner, 3), Some(DifficultyChange::Harder));
        assert!((tuner.level() - 0.55).abs() < 1e-9);
        assert!(tuner.efficiency() > 0.7);
    }

    #[test]
    fn test_idle_play_lowers_difficulty() {
        let mut tuner = tuner();
        assert_eq!(run_window(&mut tuner, 0), Some(DifficultyChange::Easier));
        assert!((tuner.level() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_caps_are_respected() {
        let mut tuner = tuner();
        for _ in 0..200 {
            run_window(&mut tuner, 10);
        }
        assert!(tuner.level() <= 1.0);
        assert!(tuner.spawn_chance() <= 0.1 + 1e-12);
        assert!(tuner.fire_chance() <= 0.05 + 1e-12);
        assert_eq!(tuner.bonus_hp(), 1);

        for _ in 0..200 {
            run_window(&mut tuner, 0);
        }
        assert!(tuner.level() >= 0.0);
        assert!(tuner.spawn_chance() >= 0.0);
        assert!(tuner.fire_chance() >= 0.0);
    }

    #[test]
    fn test_negative_steps_stay_within_unit_range() {
        let config = DifficultyConfig {
            adaptive: true,
            spawn_step: -0.5,
            fire_step: -0.5,
            level_step: -0.5,
            ..DifficultyConfig::default()
        };
        let mut tuner = DifficultyTuner::new(&config, &EnemyConfig::default());
        for kills in [0, 10, 0, 10, 0] {
            run_window(&mut tuner, kills);
            assert!((0.0..=1.0).contains(&tuner.level()));
            assert!((0.0..=config.max_spawn_chance).contains(&tuner.spawn_chance()));
            assert!((0.0..=config.max_fire_chance).contains(&tuner.fire_chance()));
        }
    }

    #[test]
    fn test_starting_chance_above_cap_is_lowered() {
        let config = DifficultyConfig {
            adaptive: true,
            ..DifficultyConfig::default()
        };
        let enemies = EnemyConfig {
            spawn_chance: 0.9,
            ..EnemyConfig::default()
        };
        let mut tuner = DifficultyTuner::new(&config, &enemies);
        assert!(tuner.spawn_chance() <= config.max_spawn_chance);
        run_window(&mut tuner, 0);
        assert!(tuner.spawn_chance() <= config.max_spawn_chance);
    }
}
