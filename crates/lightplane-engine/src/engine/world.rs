//! The single configurable game loop.
//!
//! A [`World`] owns every entity set of one game and advances them one fixed
//! frame at a time with [`World::step`]. All game modes (single player, two
//! players, AI wingmen, the easter-egg variant) run through this loop; only
//! the [`GameConfig`] differs.
//!
//! # Frame Order
//!
//! 1. Fighter movement and firing from the frame's inputs
//! 2. Enemy, enemy-fire and power-up spawns
//! 3. Movement of enemies, bullets and power-ups; off-arena entities are flagged dead
//! 4. Collisions between typed sets (bullets/enemies, enemies/fighters,
//!    enemy bullets/fighters, power-ups/fighters)
//! 5. Cosmetic effects and adaptive difficulty
//! 6. Dead entities are pruned
//!
//! A fighter loses at most one life per frame, however many things hit it.
//!
//! # Example
//!
//! ```
//! use lightplane_engine::{FrameInputs, GameMode, GameSeed, World};
//!
//! let mut world = World::new(GameMode::Traditional.preset(), GameSeed::from_u64(7)).unwrap();
//! let inputs = FrameInputs::idle(1);
//! for _ in 0..120 {
//!     let events = world.step(&inputs);
//!     if events.game_over {
//!         break;
//!     }
//! }
//! assert!(world.frame() > 0);
//! ```

use rand::Rng as _;
use rand_pcg::Pcg32;
use tracing::{debug, info};

use crate::{
    Bullet, BulletOwner, ConfigError, DifficultyChange, DifficultyTuner, EasterEggTrigger,
    Effects, Enemy, EnemyId, Fighter, FrameInputs, GameConfig, GameSeed, HitOutcome, PlayerSlot,
    PowerUp, PowerUpKind, Rect, Vec2, collision,
};

/// Entities further than this outside the arena are removed.
const CULL_MARGIN: f32 = 120.0;
const FIGHTER_MARGIN_X: f32 = 50.0;
const FIGHTER_MARGIN_Y: f32 = 50.0;
const SPEED_BOOST: f32 = 1.5;
const SCROLL_SPEED: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCause {
    EnemyContact,
    EnemyBullet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub slot: PlayerSlot,
    pub enemy: EnemyId,
    pub at: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub slot: PlayerSlot,
    pub cause: HitCause,
    pub outcome: HitOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub slot: PlayerSlot,
    pub kind: PowerUpKind,
}

/// Everything notable that happened during one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameEvents {
    pub frame: u64,
    pub shots: Vec<PlayerSlot>,
    pub kills: Vec<Kill>,
    pub hits: Vec<Hit>,
    pub downed: Vec<PlayerSlot>,
    pub pickups: Vec<Pickup>,
    pub spawned: u32,
    pub escaped: u32,
    pub difficulty: Option<DifficultyChange>,
    pub game_over: bool,
}

impl FrameEvents {
    /// Hits on `slot` that cost a life.
    pub fn lives_lost(&self, slot: PlayerSlot) -> impl Iterator<Item = &Hit> + '_ {
        self.hits.iter().filter(move |hit| {
            hit.slot == slot && matches!(hit.outcome, HitOutcome::LifeLost | HitOutcome::Downed)
        })
    }

    pub fn kills_by(&self, slot: PlayerSlot) -> impl Iterator<Item = &Kill> + '_ {
        self.kills.iter().filter(move |kill| kill.slot == slot)
    }
}

/// Complete state of one game.
#[derive(Debug, Clone)]
pub struct World {
    config: GameConfig,
    bounds: Rect,
    rng: Pcg32,
    effects_rng: Pcg32,
    frame: u64,
    next_enemy_id: EnemyId,
    spawn_timer: u32,
    scroll: f32,
    pub(crate) fighters: Vec<Fighter>,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) bullets: Vec<Bullet>,
    pub(crate) power_ups: Vec<PowerUp>,
    effects: Effects,
    difficulty: DifficultyTuner,
}

impl World {
    /// Creates a world with fighters at their start positions and no enemies.
    pub fn new(config: GameConfig, seed: GameSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    /// A fresh world with this world's (already validated) config.
    #[must_use]
    pub fn restarted(&self, seed: GameSeed) -> Self {
        Self::build(self.config.clone(), seed)
    }

    fn build(config: GameConfig, seed: GameSeed) -> Self {
        let bounds = config.arena.bounds();
        let fighters = start_rects(&config)
            .into_iter()
            .enumerate()
            .map(|(slot, rect)| Fighter::new(slot, rect, config.fighter.starting_lives))
            .collect();
        let difficulty = DifficultyTuner::new(&config.difficulty, &config.enemies);
        Self {
            config,
            bounds,
            rng: seed.rng(),
            effects_rng: seed.effects_rng(),
            frame: 0,
            next_enemy_id: 0,
            spawn_timer: 0,
            scroll: 0.0,
            fighters,
            enemies: vec![],
            bullets: vec![],
            power_ups: vec![],
            effects: Effects::default(),
            difficulty,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Horizontal background offset in `0.0..arena width`, for parallax scrolling.
    #[must_use]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    #[must_use]
    pub fn fighter(&self, slot: PlayerSlot) -> Option<&Fighter> {
        self.fighters.get(slot)
    }

    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    #[must_use]
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn enemy_bullets(&self) -> impl Iterator<Item = &Bullet> + '_ {
        self.bullets.iter().filter(|b| b.owner.is_enemy())
    }

    #[must_use]
    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    #[must_use]
    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    #[must_use]
    pub fn difficulty(&self) -> &DifficultyTuner {
        &self.difficulty
    }

    /// Returns `true` once every fighter is down.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.fighters.iter().all(|f| !f.alive)
    }

    /// Nearest alive enemy to `from`, with its distance.
    #[must_use]
    pub fn nearest_enemy(&self, from: Vec2) -> Option<(&Enemy, f32)> {
        nearest(self.enemies.iter(), from, Enemy::center)
    }

    #[must_use]
    pub fn nearest_enemy_bullet(&self, from: Vec2) -> Option<(&Bullet, f32)> {
        nearest(self.enemy_bullets(), from, Bullet::center)
    }

    #[must_use]
    pub fn nearest_power_up(&self, from: Vec2) -> Option<(&PowerUp, f32)> {
        nearest(self.power_ups.iter(), from, PowerUp::center)
    }

    /// Fires the easter egg for `slot`.
    ///
    /// Returns `None` when easter eggs are disabled or the fighter is down.
    pub fn trigger_easter_egg(&mut self, slot: PlayerSlot) -> Option<EasterEggTrigger> {
        if !self.config.effects.easter_egg {
            return None;
        }
        let fighter = self.fighters.get(slot).filter(|f| f.alive)?;
        let at = fighter.center();
        let trigger = self.effects.trigger_easter_egg(&mut self.effects_rng, at);
        info!(slot, level = trigger.level, rainbow = trigger.rainbow, "easter egg triggered");
        Some(trigger)
    }

    /// Places an enemy centred at `center`, for scripted waves.
    ///
    /// The enemy uses the configured size and hit points.
    pub fn spawn_enemy(&mut self, center: Vec2, velocity: Vec2) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        self.enemies.push(Enemy {
            id,
            rect: Rect::from_center(center, self.config.enemies.size),
            velocity,
            hp: self.config.enemies.hp,
            alive: true,
        });
        id
    }

    /// Advances the world by one frame.
    pub fn step(&mut self, inputs: &FrameInputs) -> FrameEvents {
        let mut events = FrameEvents {
            frame: self.frame,
            ..FrameEvents::default()
        };
        if self.is_over() {
            events.game_over = true;
            return events;
        }

        self.apply_inputs(inputs, &mut events);
        self.spawn(&mut events);
        self.advance(&mut events);
        self.collide_bullets_with_enemies(&mut events);
        self.collide_enemies_with_fighters(&mut events);
        if self.config.enemies.bullets_hurt {
            self.collide_enemy_bullets_with_fighters(&mut events);
        }
        self.collect_power_ups(&mut events);

        self.effects.update();
        events.difficulty = self.difficulty.tick(self.config.fps);
        if let Some(change) = events.difficulty {
            debug!(
                ?change,
                level = self.difficulty.level(),
                efficiency = self.difficulty.efficiency(),
                "difficulty adjusted"
            );
        }

        self.prune();
        self.frame += 1;
        self.scroll = (self.scroll + SCROLL_SPEED) % self.bounds.w;

        events.game_over = self.is_over();
        if events.game_over {
            info!(frame = self.frame, "all fighters down");
        }
        events
    }

    fn apply_inputs(&mut self, inputs: &FrameInputs, events: &mut FrameEvents) {
        let cfg = &self.config.fighter;
        for fighter in self.fighters.iter_mut().filter(|f| f.alive) {
            let input = inputs.get(fighter.slot);
            fighter.hit_this_frame = false;
            fighter.stats.record_frame_survived();

            let speed = if fighter.speed_boost_frames > 0 {
                cfg.speed * SPEED_BOOST
            } else {
                cfg.speed
            };
            fighter.rect.translate(input.direction * speed);
            fighter.rect.clamp_inside(&self.bounds);

            fighter.fire_cooldown = fighter.fire_cooldown.saturating_sub(1);
            if (input.fire || cfg.auto_fire) && fighter.fire_cooldown == 0 {
                let muzzle = Vec2::new(fighter.rect.right(), fighter.center().y);
                self.bullets.push(Bullet {
                    rect: Rect::from_center(muzzle, cfg.bullet_size),
                    velocity: Vec2::new(cfg.bullet_speed, 0.0),
                    owner: BulletOwner::Player(fighter.slot),
                    alive: true,
                });
                fighter.fire_cooldown = if fighter.rapid_fire_frames > 0 {
                    (cfg.fire_cooldown_frames / 2).max(1)
                } else {
                    cfg.fire_cooldown_frames
                };
                fighter.stats.record_shot();
                events.shots.push(fighter.slot);
            }

            fighter.speed_boost_frames = fighter.speed_boost_frames.saturating_sub(1);
            fighter.rapid_fire_frames = fighter.rapid_fire_frames.saturating_sub(1);
        }
    }

    fn spawn(&mut self, events: &mut FrameEvents) {
        let enemies = self.config.enemies.clone();
        self.spawn_timer += 1;
        let forced = self.spawn_timer >= enemies.spawn_interval_frames.max(1);
        if forced {
            self.spawn_timer = 0;
        }
        let spawn = forced || self.rng.random_bool(self.difficulty.spawn_chance());
        if spawn && self.enemies.len() < enemies.max_alive {
            let top = self.random_top(enemies.size.y);
            let speed = self.rng.random_range(enemies.min_speed..=enemies.max_speed)
                * self.difficulty.speed_factor();
            let enemy = Enemy {
                id: self.next_enemy_id,
                rect: Rect::new(self.bounds.right(), top, enemies.size.x, enemies.size.y),
                velocity: Vec2::new(-speed, 0.0),
                hp: enemies.hp + self.difficulty.bonus_hp(),
                alive: true,
            };
            debug!(id = enemy.id, y = top, speed, "enemy spawned");
            self.next_enemy_id += 1;
            self.enemies.push(enemy);
            events.spawned += 1;
        }

        let fire_chance = self.difficulty.fire_chance();
        for enemy in &self.enemies {
            if self.rng.random_bool(fire_chance) {
                let muzzle = Vec2::new(enemy.rect.left(), enemy.center().y);
                self.bullets.push(Bullet {
                    rect: Rect::from_center(muzzle, enemies.bullet_size),
                    velocity: Vec2::new(-enemies.bullet_speed, 0.0),
                    owner: BulletOwner::Enemy,
                    alive: true,
                });
            }
        }

        let has_kinds = !self.config.power_ups.kinds.is_empty();
        if has_kinds && self.rng.random_bool(self.config.power_ups.spawn_chance) {
            let height = self.config.power_ups.size.y;
            let top = self.random_top(height);
            self.drop_power_up(Vec2::new(self.bounds.right(), top + height / 2.0));
        }
    }

    fn random_top(&mut self, height: f32) -> f32 {
        let max_top = (self.bounds.bottom() - height).max(self.bounds.top());
        self.rng.random_range(self.bounds.top()..=max_top)
    }

    fn drop_power_up(&mut self, center: Vec2) {
        let cfg = &self.config.power_ups;
        let kind = cfg.kinds[self.rng.random_range(0..cfg.kinds.len())];
        self.power_ups.push(PowerUp {
            kind,
            rect: Rect::from_center(center, cfg.size),
            velocity: Vec2::new(-cfg.drift_speed, 0.0),
            alive: true,
        });
    }

    fn advance(&mut self, events: &mut FrameEvents) {
        let cull = self.bounds.expanded(CULL_MARGIN);
        for enemy in &mut self.enemies {
            enemy.rect.translate(enemy.velocity);
            if enemy.rect.is_outside(&cull) {
                enemy.alive = false;
                if enemy.rect.right() < cull.left() {
                    events.escaped += 1;
                }
            }
        }
        for bullet in &mut self.bullets {
            bullet.rect.translate(bullet.velocity);
            if bullet.rect.is_outside(&cull) {
                bullet.alive = false;
            }
        }
        for power_up in &mut self.power_ups {
            power_up.rect.translate(power_up.velocity);
            if power_up.rect.is_outside(&cull) {
                power_up.alive = false;
            }
        }
    }

    fn collide_bullets_with_enemies(&mut self, events: &mut FrameEvents) {
        let (bullet_indices, bullet_rects): (Vec<_>, Vec<_>) = self
            .bullets
            .iter()
            .enumerate()
            .filter(|(_, b)| b.alive && b.owner.is_player())
            .map(|(i, b)| (i, b.rect))
            .unzip();
        let enemy_rects: Vec<_> = self.enemies.iter().map(|e| e.rect).collect();

        for (bi, ei) in collision::overlapping_pairs(&bullet_rects, &enemy_rects) {
            let bullet = &mut self.bullets[bullet_indices[bi]];
            let enemy = &mut self.enemies[ei];
            if !bullet.alive || !enemy.alive {
                continue;
            }
            let BulletOwner::Player(slot) = bullet.owner else {
                continue;
            };
            bullet.alive = false;
            enemy.hp = enemy.hp.saturating_sub(1);
            if let Some(fighter) = self.fighters.get_mut(slot) {
                fighter.stats.record_hit_landed();
            }
            if enemy.hp == 0 {
                self.destroy_enemy(ei, slot, events);
            }
        }
    }

    /// Destroys the enemy at `index`, credits `slot`, and rolls for a drop.
    fn destroy_enemy(&mut self, index: usize, slot: PlayerSlot, events: &mut FrameEvents) {
        let enemy = &mut self.enemies[index];
        enemy.alive = false;
        let (id, at) = (enemy.id, enemy.center());

        if let Some(fighter) = self.fighters.get_mut(slot) {
            fighter
                .stats
                .record_kill(self.config.fighter.score_per_kill);
        }
        self.difficulty.record_kill();
        events.kills.push(Kill { slot, enemy: id, at });
        debug!(slot, enemy = id, "enemy destroyed");

        if self.config.effects.particles {
            self.effects.kill_burst(&mut self.effects_rng, at);
        }
        let power_ups = &self.config.power_ups;
        if !power_ups.kinds.is_empty() && self.rng.random_bool(power_ups.drop_chance) {
            self.drop_power_up(at);
        }
    }

    fn collide_enemies_with_fighters(&mut self, events: &mut FrameEvents) {
        let enemy_rects: Vec<_> = self.enemies.iter().map(|e| e.rect).collect();
        let fighter_rects: Vec<_> = self.fighters.iter().map(|f| f.rect).collect();
        for (ei, fi) in collision::overlapping_pairs(&enemy_rects, &fighter_rects) {
            if !self.enemies[ei].alive || !self.fighters[fi].alive {
                continue;
            }
            self.enemies[ei].alive = false;
            self.hit_fighter(fi, HitCause::EnemyContact, events);
        }
    }

    fn collide_enemy_bullets_with_fighters(&mut self, events: &mut FrameEvents) {
        let (bullet_indices, bullet_rects): (Vec<_>, Vec<_>) = self
            .bullets
            .iter()
            .enumerate()
            .filter(|(_, b)| b.alive && b.owner.is_enemy())
            .map(|(i, b)| (i, b.rect))
            .unzip();
        let fighter_rects: Vec<_> = self.fighters.iter().map(|f| f.rect).collect();
        for (bi, fi) in collision::overlapping_pairs(&bullet_rects, &fighter_rects) {
            let bullet = &mut self.bullets[bullet_indices[bi]];
            if !bullet.alive || !self.fighters[fi].alive {
                continue;
            }
            bullet.alive = false;
            self.hit_fighter(fi, HitCause::EnemyBullet, events);
        }
    }

    fn hit_fighter(&mut self, slot: PlayerSlot, cause: HitCause, events: &mut FrameEvents) {
        let fighter = &mut self.fighters[slot];
        let outcome = fighter.take_hit();
        if outcome.is_ignored() {
            return;
        }
        events.hits.push(Hit {
            slot,
            cause,
            outcome,
        });
        if matches!(outcome, HitOutcome::LifeLost | HitOutcome::Downed) {
            self.difficulty.record_damage();
        }
        if outcome.is_downed() {
            events.downed.push(slot);
            info!(slot, score = fighter.stats.score(), "fighter down");
        } else {
            debug!(slot, ?cause, ?outcome, lives = fighter.lives, "fighter hit");
        }
    }

    fn collect_power_ups(&mut self, events: &mut FrameEvents) {
        let power_up_rects: Vec<_> = self.power_ups.iter().map(|p| p.rect).collect();
        let fighter_rects: Vec<_> = self.fighters.iter().map(|f| f.rect).collect();
        for (pi, fi) in collision::overlapping_pairs(&power_up_rects, &fighter_rects) {
            if !self.power_ups[pi].alive || !self.fighters[fi].alive {
                continue;
            }
            self.power_ups[pi].alive = false;
            let kind = self.power_ups[pi].kind;
            self.apply_power_up(fi, kind, events);
            self.difficulty.record_pickup();
            events.pickups.push(Pickup { slot: fi, kind });
        }
    }

    fn apply_power_up(&mut self, slot: PlayerSlot, kind: PowerUpKind, events: &mut FrameEvents) {
        let cfg = &self.config;
        let fighter = &mut self.fighters[slot];
        fighter.stats.record_power_up();
        match kind {
            PowerUpKind::Health => {
                fighter.lives = (fighter.lives + 1).min(cfg.fighter.max_lives);
            }
            PowerUpKind::Speed => fighter.speed_boost_frames = cfg.power_ups.boost_frames,
            PowerUpKind::RapidFire => fighter.rapid_fire_frames = cfg.power_ups.boost_frames,
            PowerUpKind::Shield => fighter.shield = true,
            PowerUpKind::Bomb => {
                let targets: Vec<_> = (0..self.enemies.len())
                    .filter(|&i| self.enemies[i].alive)
                    .collect();
                for index in targets {
                    self.destroy_enemy(index, slot, events);
                }
            }
        }
        debug!(slot, ?kind, "power-up collected");
    }

    fn prune(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.bullets.retain(|b| b.alive);
        self.power_ups.retain(|p| p.alive);
    }
}

/// Start positions: one fighter centered vertically, several spread from top to bottom.
#[expect(clippy::cast_precision_loss)]
fn start_rects(config: &GameConfig) -> Vec<Rect> {
    let size = config.fighter.size;
    let height = config.arena.height;
    let count = config.players.len();
    let tops: Vec<f32> = if count == 1 {
        vec![(height - size.y) / 2.0]
    } else {
        let first = FIGHTER_MARGIN_Y;
        let last = (height - 2.0 * FIGHTER_MARGIN_Y).max(first);
        let step = (last - first) / (count - 1) as f32;
        (0..count).map(|i| first + step * i as f32).collect()
    };
    let bounds = config.arena.bounds();
    tops.into_iter()
        .map(|top| {
            let mut rect = Rect::new(FIGHTER_MARGIN_X, top, size.x, size.y);
            rect.clamp_inside(&bounds);
            rect
        })
        .collect()
}

fn nearest<'a, T, I, F>(items: I, from: Vec2, center: F) -> Option<(&'a T, f32)>
where
    I: Iterator<Item = &'a T>,
    F: Fn(&T) -> Vec2,
    T: 'a,
{
    items
        .map(|item| (item, center(item).distance(from)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
