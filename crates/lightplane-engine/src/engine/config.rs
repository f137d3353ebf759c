//! Game configuration.
//!
//! Every game mode runs through the same [`World`](crate::World) loop. A mode
//! is nothing more than a [`GameConfig`]: how many fighters there are and who
//! pilots them, how enemies spawn and shoot, which pickups drop and which
//! cosmetic effects are on. [`GameMode::preset`] builds the stock configs and
//! any config can be saved to and loaded from JSON.
//!
//! # Example
//!
//! ```
//! use lightplane_engine::{GameMode, PilotKind};
//!
//! let config = GameMode::Dual.preset();
//! assert_eq!(config.players.len(), 2);
//! assert!(config.players.iter().all(|p| matches!(p.pilot, PilotKind::Human { .. })));
//! config.validate().unwrap();
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{MAX_PLAYERS, PowerUpKind, Rect, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode_name: String,
    pub fps: u32,
    pub arena: ArenaConfig,
    pub players: Vec<PlayerConfig>,
    pub fighter: FighterConfig,
    pub enemies: EnemyConfig,
    pub power_ups: PowerUpConfig,
    pub effects: EffectsConfig,
    pub difficulty: DifficultyConfig,
    /// Ends the session after this many frames (game over by time).
    #[serde(default)]
    pub max_frames: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl ArenaConfig {
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub pilot: PilotKind,
}

/// Who flies a fighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PilotKind {
    Human { controls: ControlScheme },
    Ai { controller: AiKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlScheme {
    /// Arrow keys, Space or Enter fires.
    Arrows,
    /// W/A/S/D, F fires.
    Wasd,
    /// Follows the mouse pointer, click fires.
    Mouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiKind {
    /// Patrols a home zone, chases close enemies, evades very close ones.
    Patrol,
    /// Survival-first rules: evade, shoot, approach.
    Rule,
    /// Tunable behavior parameters, evolved by training.
    Strategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterConfig {
    pub size: Vec2,
    /// Movement per frame at full input.
    pub speed: f32,
    pub starting_lives: u32,
    pub max_lives: u32,
    pub fire_cooldown_frames: u32,
    pub bullet_speed: f32,
    pub bullet_size: Vec2,
    pub score_per_kill: u64,
    /// Fire whenever the cooldown allows, regardless of input.
    pub auto_fire: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    pub size: Vec2,
    pub min_speed: f32,
    pub max_speed: f32,
    pub hp: u32,
    /// A spawn is forced every this many frames.
    pub spawn_interval_frames: u32,
    /// Extra spawn probability per frame.
    pub spawn_chance: f64,
    pub max_alive: usize,
    /// Probability per enemy per frame of firing.
    pub fire_chance: f64,
    pub bullet_speed: f32,
    pub bullet_size: Vec2,
    /// Whether enemy bullets cost fighters lives. When off, enemy bullets
    /// are drawn but pass through fighters.
    #[serde(default)]
    pub bullets_hurt: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpConfig {
    pub size: Vec2,
    /// Probability of a drop when an enemy is destroyed.
    pub drop_chance: f64,
    /// Probability per frame of a pickup entering from the right edge.
    pub spawn_chance: f64,
    pub drift_speed: f32,
    pub boost_frames: u32,
    pub kinds: Vec<PowerUpKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectsConfig {
    pub particles: bool,
    pub easter_egg: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub adaptive: bool,
    /// Initial difficulty level in `0.0..=1.0`.
    pub level: f64,
    pub interval_frames: u32,
    pub raise_threshold: f64,
    pub lower_threshold: f64,
    pub level_step: f64,
    pub spawn_step: f64,
    pub fire_step: f64,
    pub max_spawn_chance: f64,
    pub max_fire_chance: f64,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("arena must have a positive size (got {width}x{height})")]
    InvalidArena { width: f32, height: f32 },
    #[display("at least one player is required")]
    NoPlayers,
    #[display("at most {MAX_PLAYERS} players are supported (got {count})")]
    TooManyPlayers { count: usize },
    #[display("fps must be positive")]
    ZeroFps,
    #[display("{name} must be within 0..=1 (got {value})")]
    InvalidProbability { name: &'static str, value: f64 },
    #[display("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[display("starting lives must be within 1..={max_lives} (got {starting_lives})")]
    InvalidLives { starting_lives: u32, max_lives: u32 },
    #[display("enemy speed range is empty ({min}..={max})")]
    InvalidSpeedRange { min: f32, max: f32 },
    #[display("fps must be at most {max} (got {fps})")]
    FpsTooHigh { fps: u32, max: u32 },
    #[display("{name} must be a finite non-negative number (got {value})")]
    InvalidStep { name: &'static str, value: f64 },
    #[display("difficulty thresholds are out of order (lower {lower}, raise {raise})")]
    InvalidThresholds { lower: f64, raise: f64 },
    #[display("{name} ({value}) exceeds its difficulty cap ({cap})")]
    AboveCap {
        name: &'static str,
        value: f64,
        cap: f64,
    },
}

/// Highest accepted frame rate.
pub const MAX_FPS: u32 = 1000;

impl GameConfig {
    /// Checks every value that would make the world misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ArenaConfig { width, height } = self.arena;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidArena { width, height });
        }
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        if self.players.len() > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers {
                count: self.players.len(),
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if self.fps > MAX_FPS {
            return Err(ConfigError::FpsTooHigh {
                fps: self.fps,
                max: MAX_FPS,
            });
        }

        let probabilities = [
            ("enemies.spawn_chance", self.enemies.spawn_chance),
            ("enemies.fire_chance", self.enemies.fire_chance),
            ("power_ups.drop_chance", self.power_ups.drop_chance),
            ("power_ups.spawn_chance", self.power_ups.spawn_chance),
            ("difficulty.level", self.difficulty.level),
            ("difficulty.max_spawn_chance", self.difficulty.max_spawn_chance),
            ("difficulty.max_fire_chance", self.difficulty.max_fire_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        let positives = [
            ("fighter.speed", self.fighter.speed),
            ("fighter.bullet_speed", self.fighter.bullet_speed),
            ("fighter.size.x", self.fighter.size.x),
            ("fighter.size.y", self.fighter.size.y),
            ("enemies.min_speed", self.enemies.min_speed),
            ("enemies.bullet_speed", self.enemies.bullet_speed),
            ("enemies.size.x", self.enemies.size.x),
            ("enemies.size.y", self.enemies.size.y),
            ("fighter.bullet_size.x", self.fighter.bullet_size.x),
            ("fighter.bullet_size.y", self.fighter.bullet_size.y),
            ("enemies.bullet_size.x", self.enemies.bullet_size.x),
            ("enemies.bullet_size.y", self.enemies.bullet_size.y),
            ("power_ups.size.x", self.power_ups.size.x),
            ("power_ups.size.y", self.power_ups.size.y),
            ("power_ups.drift_speed", self.power_ups.drift_speed),
        ];
        for (name, value) in positives {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.enemies.max_speed < self.enemies.min_speed {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.enemies.min_speed,
                max: self.enemies.max_speed,
            });
        }

        let FighterConfig {
            starting_lives,
            max_lives,
            ..
        } = self.fighter;
        if starting_lives == 0 || starting_lives > max_lives {
            return Err(ConfigError::InvalidLives {
                starting_lives,
                max_lives,
            });
        }
        self.difficulty.validate(&self.enemies)
    }

    /// Number of frames corresponding to `millis` milliseconds at this config's fps.
    ///
    /// Never less than one frame; saturates at `u32::MAX`.
    #[must_use]
    pub fn frames_for_millis(&self, millis: u32) -> u32 {
        let frames = u64::from(millis) * u64::from(self.fps) / 1000;
        u32::try_from(frames).unwrap_or(u32::MAX).max(1)
    }
}

impl DifficultyConfig {
    fn validate(&self, enemies: &EnemyConfig) -> Result<(), ConfigError> {
        let steps = [
            ("difficulty.level_step", self.level_step),
            ("difficulty.spawn_step", self.spawn_step),
            ("difficulty.fire_step", self.fire_step),
        ];
        for (name, value) in steps {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidStep { name, value });
            }
        }

        let (lower, raise) = (self.lower_threshold, self.raise_threshold);
        if !(lower.is_finite() && raise.is_finite() && lower <= raise) {
            return Err(ConfigError::InvalidThresholds { lower, raise });
        }

        let capped = [
            ("enemies.spawn_chance", enemies.spawn_chance, self.max_spawn_chance),
            ("enemies.fire_chance", enemies.fire_chance, self.max_fire_chance),
        ];
        for (name, value, cap) in capped {
            if value > cap {
                return Err(ConfigError::AboveCap { name, value, cap });
            }
        }
        Ok(())
    }
}

impl Default for FighterConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(60.0, 40.0),
            speed: 8.0,
            starting_lives: 3,
            max_lives: 5,
            fire_cooldown_frames: 10,
            bullet_speed: 14.0,
            bullet_size: Vec2::new(16.0, 6.0),
            score_per_kill: 1,
            auto_fire: false,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(50.0, 36.0),
            min_speed: 2.0,
            max_speed: 4.0,
            hp: 1,
            spawn_interval_frames: 60,
            spawn_chance: 0.005,
            max_alive: 8,
            fire_chance: 0.005,
            bullet_speed: 7.0,
            bullet_size: Vec2::new(12.0, 6.0),
            bullets_hurt: false,
        }
    }
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(28.0, 28.0),
            drop_chance: 0.1,
            spawn_chance: 0.0005,
            drift_speed: 2.0,
            boost_frames: 600,
            kinds: PowerUpKind::ALL.to_vec(),
        }
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            adaptive: false,
            level: 0.5,
            interval_frames: 100,
            raise_threshold: 0.7,
            lower_threshold: 0.3,
            level_step: 0.05,
            spawn_step: 0.001,
            fire_step: 0.0005,
            max_spawn_chance: 0.1,
            max_fire_chance: 0.05,
        }
    }
}

/// Stock game modes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// One human pilot.
    #[default]
    Traditional,
    /// Two human pilots sharing the keyboard.
    Dual,
    /// A human pilot with an AI wingman.
    PlayerVsAi,
    /// Two AI pilots, no human input.
    AiDuel,
    /// Extra lives, aggressive enemies, particle bursts and secret triggers.
    EasterEgg,
    /// A user-supplied config file. The preset is a starting point to edit.
    Custom,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown game mode {_0:?} (expected one of: {})", GameMode::NAMES.join(", "))]
pub struct GameModeParseError(#[error(not(source))] String);

impl GameMode {
    pub const ALL: [Self; 6] = [
        Self::Traditional,
        Self::Dual,
        Self::PlayerVsAi,
        Self::AiDuel,
        Self::EasterEgg,
        Self::Custom,
    ];

    const NAMES: [&'static str; 6] = [
        "traditional",
        "dual",
        "player-vs-ai",
        "ai-duel",
        "easter-egg",
        "custom",
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Traditional => "Traditional",
            Self::Dual => "Dual",
            Self::PlayerVsAi => "Player vs AI",
            Self::AiDuel => "AI Duel",
            Self::EasterEgg => "Easter Egg",
            Self::Custom => "Custom",
        }
    }

    /// Builds the stock configuration for this mode.
    #[must_use]
    pub fn preset(self) -> GameConfig {
        let mut config = GameConfig {
            mode_name: self.name().to_owned(),
            fps: 60,
            arena: ArenaConfig {
                width: 1280.0,
                height: 720.0,
            },
            players: vec![human("Player 1", ControlScheme::Arrows)],
            fighter: FighterConfig::default(),
            enemies: EnemyConfig::default(),
            power_ups: PowerUpConfig::default(),
            effects: EffectsConfig {
                particles: false,
                easter_egg: false,
            },
            difficulty: DifficultyConfig::default(),
            max_frames: None,
        };

        match self {
            Self::Traditional => {}
            Self::Custom => config.enemies.bullets_hurt = true,
            Self::Dual => {
                config
                    .players
                    .push(human("Player 2", ControlScheme::Wasd));
                config.enemies.max_alive = 12;
            }
            Self::PlayerVsAi => {
                config.players.push(ai("AI Wingman", AiKind::Rule));
                config.enemies.max_alive = 12;
                config.difficulty.adaptive = true;
            }
            Self::AiDuel => {
                config.players = vec![ai("Patrol AI", AiKind::Patrol), ai("Rule AI", AiKind::Rule)];
                config.fighter.auto_fire = true;
                config.enemies.max_alive = 12;
            }
            Self::EasterEgg => {
                config.fighter.starting_lives = 5;
                config.fighter.max_lives = 7;
                config.enemies.min_speed = 3.0;
                config.enemies.max_speed = 5.5;
                config.enemies.fire_chance = 0.01;
                config.enemies.bullets_hurt = true;
                config.power_ups.drop_chance = 0.2;
                config.effects = EffectsConfig {
                    particles: true,
                    easter_egg: true,
                };
            }
        }
        config
    }
}

fn human(name: &str, controls: ControlScheme) -> PlayerConfig {
    PlayerConfig {
        name: name.to_owned(),
        pilot: PilotKind::Human { controls },
    }
}

fn ai(name: &str, controller: AiKind) -> PlayerConfig {
    PlayerConfig {
        name: name.to_owned(),
        pilot: PilotKind::Ai { controller },
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameMode {
    type Err = GameModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == normalized)
            .ok_or_else(|| GameModeParseError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_are_valid() {
        for mode in GameMode::ALL {
            let config = mode.preset();
            config.validate().unwrap();
            assert_eq!(config.mode_name, mode.name());
        }
    }

    #[test]
    fn test_mode_names_parse() {
        for mode in GameMode::ALL {
            assert_eq!(mode.name().parse::<GameMode>().unwrap(), mode);
        }
        assert_eq!("Player_VS_AI".parse::<GameMode>().unwrap(), GameMode::PlayerVsAi);
        assert!("arcade".parse::<GameMode>().is_err());
    }

    #[test]
    fn test_easter_egg_has_five_lives() {
        let config = GameMode::EasterEgg.preset();
        assert_eq!(config.fighter.starting_lives, 5);
        assert!(config.effects.particles);
        assert!(config.effects.easter_egg);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GameMode::Traditional.preset();
        config.players.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoPlayers)));

        let mut config = GameMode::Traditional.preset();
        config.enemies.spawn_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability {
                name: "enemies.spawn_chance",
                ..
            })
        ));

        let mut config = GameMode::Traditional.preset();
        config.fighter.starting_lives = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLives { .. })));

        let mut config = GameMode::Traditional.preset();
        config.arena.width = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidArena { .. })));

        let mut config = GameMode::Traditional.preset();
        config.players = (0..5).map(|i| human(&format!("P{i}"), ControlScheme::Arrows)).collect();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyPlayers { count: 5 })
        ));
    }

    type Mutate = fn(&mut GameConfig);
    type Expect = fn(&ConfigError) -> bool;

    #[test]
    fn test_validate_rejects_each_bad_field() {
        let cases: &[(&str, Mutate, Expect)] = &[
            (
                "zero fps",
                |c| c.fps = 0,
                |e| matches!(e, ConfigError::ZeroFps),
            ),
            (
                "fps above limit",
                |c| c.fps = MAX_FPS + 1,
                |e| matches!(e, ConfigError::FpsTooHigh { .. }),
            ),
            (
                "negative fighter speed",
                |c| c.fighter.speed = -1.0,
                |e| matches!(e, ConfigError::NonPositive { name: "fighter.speed", .. }),
            ),
            (
                "nan enemy speed",
                |c| c.enemies.min_speed = f32::NAN,
                |e| matches!(e, ConfigError::NonPositive { name: "enemies.min_speed", .. }),
            ),
            (
                "zero fighter bullet width",
                |c| c.fighter.bullet_size.x = 0.0,
                |e| matches!(e, ConfigError::NonPositive { name: "fighter.bullet_size.x", .. }),
            ),
            (
                "negative enemy bullet height",
                |c| c.enemies.bullet_size.y = -3.0,
                |e| matches!(e, ConfigError::NonPositive { name: "enemies.bullet_size.y", .. }),
            ),
            (
                "zero power-up size",
                |c| c.power_ups.size.x = 0.0,
                |e| matches!(e, ConfigError::NonPositive { name: "power_ups.size.x", .. }),
            ),
            (
                "inverted speed range",
                |c| c.enemies.max_speed = c.enemies.min_speed - 0.5,
                |e| matches!(e, ConfigError::InvalidSpeedRange { .. }),
            ),
            (
                "negative spawn step",
                |c| c.difficulty.spawn_step = -0.5,
                |e| matches!(e, ConfigError::InvalidStep { name: "difficulty.spawn_step", .. }),
            ),
            (
                "infinite fire step",
                |c| c.difficulty.fire_step = f64::INFINITY,
                |e| matches!(e, ConfigError::InvalidStep { name: "difficulty.fire_step", .. }),
            ),
            (
                "nan level step",
                |c| c.difficulty.level_step = f64::NAN,
                |e| matches!(e, ConfigError::InvalidStep { name: "difficulty.level_step", .. }),
            ),
            (
                "thresholds out of order",
                |c| {
                    c.difficulty.lower_threshold = 0.9;
                    c.difficulty.raise_threshold = 0.1;
                },
                |e| matches!(e, ConfigError::InvalidThresholds { .. }),
            ),
            (
                "nan threshold",
                |c| c.difficulty.raise_threshold = f64::NAN,
                |e| matches!(e, ConfigError::InvalidThresholds { .. }),
            ),
            (
                "spawn chance above cap",
                |c| {
                    c.enemies.spawn_chance = 0.5;
                    c.difficulty.max_spawn_chance = 0.1;
                },
                |e| matches!(e, ConfigError::AboveCap { name: "enemies.spawn_chance", .. }),
            ),
            (
                "fire chance above cap",
                |c| {
                    c.enemies.fire_chance = 0.2;
                    c.difficulty.max_fire_chance = 0.05;
                },
                |e| matches!(e, ConfigError::AboveCap { name: "enemies.fire_chance", .. }),
            ),
        ];

        for (label, mutate, expect) in cases {
            let mut config = GameMode::Traditional.preset();
            mutate(&mut config);
            match config.validate() {
                Err(err) => assert!(expect(&err), "{label}: unexpected error {err}"),
                Ok(()) => panic!("{label}: accepted"),
            }
        }
    }

    #[test]
    fn test_validate_accepts_boundaries() {
        let mut config = GameMode::Traditional.preset();
        config.fps = MAX_FPS;
        config.enemies.max_speed = config.enemies.min_speed;
        config.difficulty.spawn_step = 0.0;
        config.difficulty.lower_threshold = 0.5;
        config.difficulty.raise_threshold = 0.5;
        config.enemies.spawn_chance = config.difficulty.max_spawn_chance;
        config.validate().unwrap();
    }

    #[test]
    fn test_enemy_bullets_hurt_only_where_enabled() {
        assert!(!GameMode::Traditional.preset().enemies.bullets_hurt);
        assert!(!GameMode::Dual.preset().enemies.bullets_hurt);
        assert!(GameMode::EasterEgg.preset().enemies.bullets_hurt);
        assert!(GameMode::Custom.preset().enemies.bullets_hurt);

        // Older config files without the field keep bullets harmless.
        let mut json = serde_json::to_value(GameMode::Traditional.preset()).unwrap();
        json["enemies"]
            .as_object_mut()
            .unwrap()
            .remove("bullets_hurt");
        let back: GameConfig = serde_json::from_value(json).unwrap();
        assert!(!back.enemies.bullets_hurt);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = GameMode::PlayerVsAi.preset();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"kind\":\"ai\""));
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_frames_for_millis() {
        let config = GameMode::Traditional.preset();
        assert_eq!(config.frames_for_millis(400), 24);
        assert_eq!(config.frames_for_millis(1), 1);

        let mut fast = GameMode::Traditional.preset();
        fast.fps = 40_000_000;
        assert_eq!(fast.frames_for_millis(400), 16_000_000);
        assert_eq!(fast.frames_for_millis(u32::MAX), u32::MAX);
    }
}
