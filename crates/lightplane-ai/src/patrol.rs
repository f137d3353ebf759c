use std::f32::consts::TAU;

use lightplane_engine::{PlayerInput, PlayerSlot, Vec2, World};
use rand::Rng as _;
use rand_pcg::Pcg32;

use crate::{
    Pilot,
    pilot::{away_from, clamp_to_lane},
};

const DECISION_INTERVAL: u32 = 20;
const MOVE_DURATION: u32 = 40;
const EVADE_RADIUS: f32 = 80.0;
const CHASE_RADIUS: f32 = 150.0;
const EVADE_DISTANCE: f32 = 100.0;
const CHASE_OFFSET: f32 = 30.0;
const PATROL_RADIUS: f32 = 80.0;
const PATROL_CHANCE: f64 = 0.3;
const STOP_DISTANCE: f32 = 5.0;
const FIRE_INTERVAL_MS: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PatrolMode {
    Patrol,
    Evade,
    Chase,
}

/// A smooth, low-jitter pilot.
///
/// It only reconsiders its target every few frames and then holds the move
/// for a while, so it looks calm on screen. Fires on a fixed cadence
/// whenever enemies are present.
#[derive(Debug, Clone)]
pub struct PatrolPilot {
    rng: Pcg32,
    mode: PatrolMode,
    target: Option<Vec2>,
    decision_timer: u32,
    move_timer: u32,
    fire_timer: u32,
}

impl PatrolPilot {
    #[must_use]
    pub fn new(rng: Pcg32) -> Self {
        Self {
            rng,
            mode: PatrolMode::Patrol,
            target: None,
            decision_timer: 0,
            move_timer: 0,
            fire_timer: 0,
        }
    }

    #[must_use]
    pub fn mode(&self) -> PatrolMode {
        self.mode
    }

    #[must_use]
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    fn make_decision(&mut self, world: &World, slot: PlayerSlot, me: Vec2) {
        let bounds = world.bounds();
        let target = match world.nearest_enemy(me) {
            Some((enemy, dist)) if dist < EVADE_RADIUS => {
                self.mode = PatrolMode::Evade;
                me + away_from(me, enemy.center()) * EVADE_DISTANCE
            }
            Some((enemy, dist)) if dist < CHASE_RADIUS => {
                self.mode = PatrolMode::Chase;
                let toward = (enemy.center() - me).normalized();
                enemy.center() - toward * CHASE_OFFSET
            }
            _ => {
                self.mode = PatrolMode::Patrol;
                if self.target.is_some() && !self.rng.random_bool(PATROL_CHANCE) {
                    return;
                }
                let y_ratio = if slot % 2 == 0 { 0.5 } else { 0.75 };
                let center = Vec2::new(
                    bounds.left() + bounds.w * 0.25,
                    bounds.top() + bounds.h * y_ratio,
                );
                let angle = self.rng.random_range(0.0..TAU);
                let radius = self.rng.random_range(0.0..=PATROL_RADIUS);
                center + Vec2::new(angle.cos(), angle.sin()) * radius
            }
        };
        self.target = Some(clamp_to_lane(target, bounds));
        self.move_timer = 0;
    }
}

impl Pilot for PatrolPilot {
    fn name(&self) -> &str {
        "patrol"
    }

    fn decide(&mut self, world: &World, slot: PlayerSlot) -> PlayerInput {
        let Some(fighter) = world.fighter(slot).filter(|f| f.is_alive()) else {
            return PlayerInput::IDLE;
        };
        let me = fighter.center();

        if self.decision_timer == 0 {
            self.make_decision(world, slot, me);
        }
        self.decision_timer = (self.decision_timer + 1) % DECISION_INTERVAL;

        let mut input = PlayerInput::IDLE;
        if let Some(target) = self.target {
            if self.move_timer < MOVE_DURATION {
                self.move_timer += 1;
                input = PlayerInput::toward(me, target, STOP_DISTANCE, 1.0);
            }
        }

        self.fire_timer = self.fire_timer.saturating_sub(1);
        if !world.enemies().is_empty() && self.fire_timer == 0 {
            self.fire_timer = world.config().frames_for_millis(FIRE_INTERVAL_MS);
            input = input.with_fire(true);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use lightplane_engine::{FrameInputs, GameMode, GameSeed};
    use rand::SeedableRng as _;

    use super::*;

    fn quiet_world(seed: u64) -> World {
        let mut config = GameMode::Traditional.preset();
        config.enemies.spawn_interval_frames = u32::MAX;
        config.enemies.spawn_chance = 0.0;
        config.enemies.fire_chance = 0.0;
        config.power_ups.spawn_chance = 0.0;
        World::new(config, GameSeed::from_u64(seed)).unwrap()
    }

    #[test]
    fn test_patrols_inside_lane_without_enemies() {
        let mut world = quiet_world(1);
        let mut pilot = PatrolPilot::new(Pcg32::seed_from_u64(1));
        for _ in 0..300 {
            let input = pilot.decide(&world, 0);
            assert!(!input.fire);
            world.step(&std::iter::once(input).collect::<FrameInputs>());
        }
        assert!(pilot.mode().is_patrol());
        let target = pilot.target().unwrap();
        assert!((50.0..=512.0).contains(&target.x));
        assert!((50.0..=670.0).contains(&target.y));
    }

    #[test]
    fn test_fires_on_cadence_when_enemies_exist() {
        let mut world = quiet_world(2);
        let me = world.fighters()[0].center();
        world.spawn_enemy(Vec2::new(me.x + 600.0, me.y), Vec2::ZERO);
        let mut pilot = PatrolPilot::new(Pcg32::seed_from_u64(2));
        let fired = (0..48).filter(|_| pilot.decide(&world, 0).fire).count();
        // 400 ms at 60 fps
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_evades_close_enemy() {
        let mut world = quiet_world(3);
        let me = world.fighters()[0].center();
        world.spawn_enemy(Vec2::new(me.x + 40.0, me.y), Vec2::ZERO);
        let mut pilot = PatrolPilot::new(Pcg32::seed_from_u64(3));
        let input = pilot.decide(&world, 0);
        assert!(pilot.mode().is_evade());
        assert!(input.direction.x <= 0.0);
    }
}
