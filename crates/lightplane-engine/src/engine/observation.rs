//! Fixed-length numeric view of a world, for learning agents.
//!
//! # Layout
//!
//! | index   | value                                                       |
//! |---------|-------------------------------------------------------------|
//! | 0..2    | own position, each axis mapped to `-1..=1`                  |
//! | 2..12   | 2 nearest enemies × (dx, dy, distance, vx, present)         |
//! | 12..18  | 2 nearest enemy bullets × (dx, dy, distance)                |
//! | 18      | score / 100, capped at 1                                    |
//! | 19      | frame / max frames                                          |
//! | 20      | lives / max lives                                           |
//! | 21      | 1 when the fighter may fire, else 0                         |
//!
//! Offsets are divided by the arena size, distances by the arena diagonal.
//! Missing entries (fewer enemies, a downed fighter) are zero.

use crate::{PlayerSlot, Vec2, World};

const ENEMY_SLOTS: usize = 2;
const ENEMY_FEATURES: usize = 5;
const BULLET_SLOTS: usize = 2;
const BULLET_FEATURES: usize = 3;
const SCORE_SCALE: f32 = 100.0;

const ENEMY_OFFSET: usize = 2;
const BULLET_OFFSET: usize = ENEMY_OFFSET + ENEMY_SLOTS * ENEMY_FEATURES;
const SCORE_INDEX: usize = BULLET_OFFSET + BULLET_SLOTS * BULLET_FEATURES;
const PROGRESS_INDEX: usize = SCORE_INDEX + 1;
const LIVES_INDEX: usize = PROGRESS_INDEX + 1;
const READY_INDEX: usize = LIVES_INDEX + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation([f32; Observation::LEN]);

impl Observation {
    pub const LEN: usize = 22;

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn for_player(world: &World, slot: PlayerSlot, max_frames: u64) -> Self {
        let mut values = [0.0; Self::LEN];
        let Some(fighter) = world.fighter(slot).filter(|f| f.is_alive()) else {
            return Self(values);
        };

        let bounds = world.bounds();
        let size = bounds.size();
        let diagonal = size.length();
        let me = fighter.center();
        values[0] = (me.x - bounds.left()) / size.x * 2.0 - 1.0;
        values[1] = (me.y - bounds.top()) / size.y * 2.0 - 1.0;

        let offset = |to: Vec2| {
            let delta = to - me;
            (delta.x / size.x, delta.y / size.y, delta.length() / diagonal)
        };

        let max_speed = world.config().enemies.max_speed * 2.0;
        let mut enemies: Vec<_> = world
            .enemies()
            .iter()
            .map(|e| (e, e.center().distance(me)))
            .collect();
        enemies.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (i, (enemy, _)) in enemies.iter().take(ENEMY_SLOTS).enumerate() {
            let base = ENEMY_OFFSET + i * ENEMY_FEATURES;
            let (dx, dy, dist) = offset(enemy.center());
            values[base] = dx;
            values[base + 1] = dy;
            values[base + 2] = dist;
            values[base + 3] = enemy.velocity().x / max_speed;
            values[base + 4] = 1.0;
        }

        let mut bullets: Vec<_> = world
            .enemy_bullets()
            .map(|b| (b, b.center().distance(me)))
            .collect();
        bullets.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (i, (bullet, _)) in bullets.iter().take(BULLET_SLOTS).enumerate() {
            let base = BULLET_OFFSET + i * BULLET_FEATURES;
            let (dx, dy, dist) = offset(bullet.center());
            values[base] = dx;
            values[base + 1] = dy;
            values[base + 2] = dist;
        }

        values[SCORE_INDEX] = fighter.stats().score() as f32 / SCORE_SCALE;
        if max_frames > 0 {
            values[PROGRESS_INDEX] = world.frame() as f32 / max_frames as f32;
        }
        values[LIVES_INDEX] = fighter.lives() as f32 / world.config().fighter.max_lives as f32;
        values[READY_INDEX] = if fighter.fire_cooldown() == 0 { 1.0 } else { 0.0 };

        for v in &mut values {
            *v = v.clamp(-1.0, 1.0);
        }
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Enemy, FrameInputs, GameMode, GameSeed, Rect};

    use super::*;

    #[test]
    fn test_observation_has_fixed_length_and_range() {
        let mut world = World::new(GameMode::EasterEgg.preset(), GameSeed::from_u64(11)).unwrap();
        let inputs = FrameInputs::idle(1);
        for _ in 0..600 {
            world.step(&inputs);
            let obs = Observation::for_player(&world, 0, 600);
            assert_eq!(obs.as_slice().len(), Observation::LEN);
            assert!(obs.as_slice().iter().all(|v| (-1.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_nearest_enemy_comes_first() {
        let mut config = GameMode::Traditional.preset();
        config.enemies.spawn_interval_frames = u32::MAX;
        config.enemies.spawn_chance = 0.0;
        let mut world = World::new(config, GameSeed::from_u64(0)).unwrap();
        let me = world.fighters()[0].center();
        for (id, dx) in [(0, 600.0), (1, 300.0), (2, 900.0)] {
            world.enemies.push(Enemy {
                id,
                rect: Rect::from_center(Vec2::new(me.x + dx, me.y), Vec2::new(10.0, 10.0)),
                velocity: Vec2::new(-2.0, 0.0),
                hp: 1,
                alive: true,
            });
        }

        let obs = Observation::for_player(&world, 0, 1000);
        let values = obs.as_slice();
        assert!((values[2] - 300.0 / 1280.0).abs() < 1e-5);
        assert!((values[7] - 600.0 / 1280.0).abs() < 1e-5);
        assert_eq!(values[6], 1.0);
        assert_eq!(values[11], 1.0);
        // no bullets
        assert!(values[12..18].iter().all(|&v| v == 0.0));
        assert_eq!(values[READY_INDEX], 1.0);
        assert!((values[LIVES_INDEX] - 3.0 / 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_downed_fighter_observes_zeros() {
        let mut world = World::new(GameMode::Traditional.preset(), GameSeed::from_u64(0)).unwrap();
        world.fighters[0].alive = false;
        let obs = Observation::for_player(&world, 0, 100);
        assert!(obs.as_slice().iter().all(|&v| v == 0.0));
        let obs = Observation::for_player(&world, 3, 100);
        assert!(obs.as_slice().iter().all(|&v| v == 0.0));
    }
}
