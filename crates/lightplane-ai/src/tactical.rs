use lightplane_engine::{Fighter, PlayerInput, PlayerSlot, Vec2, World};
use rand::Rng as _;
use rand_pcg::Pcg32;
use tracing::debug;

use crate::{
    Pilot, Strategy,
    pilot::{away_from, clamp_to_lane, safe_zone},
};

const STOP_DISTANCE: f32 = 5.0;
const PATROL_JITTER: f32 = 40.0;

/// High-level choice a [`StrategyPilot`] commits to between decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum TacticalAction {
    #[display("defend")]
    Defend,
    #[display("attack")]
    Attack,
    #[display("collect")]
    CollectPowerUp,
    #[display("patrol")]
    Patrol,
}

/// A pilot whose behaviour is parameterised by a [`Strategy`].
///
/// The genes map onto distances and thresholds:
///
/// | gene                | effect                                        |
/// |---------------------|-----------------------------------------------|
/// | aggression          | chase radius and attack stand-off distance    |
/// | defense             | evade radius and the low-lives threshold      |
/// | speed               | movement throttle                             |
/// | accuracy            | vertical alignment required to fire           |
/// | risk tolerance      | whether power-ups are taken near enemies      |
/// | teamwork            | patrol spread between wingmen                 |
/// | adaptability        | how often the tactical action is reconsidered |
/// | resource management | how far power-ups are pursued                 |
#[derive(Debug, Clone)]
pub struct StrategyPilot {
    strategy: Strategy,
    rng: Pcg32,
    current: TacticalAction,
    decision_timer: u32,
    patrol_offset: Vec2,
}

impl StrategyPilot {
    #[must_use]
    pub fn new(strategy: Strategy, rng: Pcg32) -> Self {
        let mut strategy = strategy;
        strategy.clamp();
        Self {
            strategy,
            rng,
            current: TacticalAction::Patrol,
            decision_timer: 0,
            patrol_offset: Vec2::ZERO,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    #[must_use]
    pub fn current_action(&self) -> TacticalAction {
        self.current
    }

    fn evade_radius(&self) -> f32 {
        60.0 + 100.0 * self.strategy.defense
    }

    fn chase_radius(&self) -> f32 {
        150.0 + 450.0 * self.strategy.aggression
    }

    fn pickup_radius(&self) -> f32 {
        100.0 + 400.0 * self.strategy.resource_management
    }

    /// Lives at or below which the pilot plays defensively whenever threatened.
    fn low_lives(&self) -> u32 {
        if self.strategy.defense > 0.7 { 2 } else { 1 }
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn decision_interval(&self) -> u32 {
        // adaptability 0.1 -> 28 frames, 1.0 -> 10 frames
        let frames = 30.0 - 20.0 * self.strategy.adaptability;
        frames.round().clamp(1.0, 30.0) as u32
    }

    fn throttle(&self) -> f32 {
        (self.strategy.speed / 2.0).clamp(0.25, 1.0)
    }

    fn align_tolerance(&self, fighter: &Fighter) -> f32 {
        fighter.rect().h * (1.5 - self.strategy.accuracy)
    }

    /// Closest enemy or enemy bullet, with its distance.
    fn nearest_threat(world: &World, me: Vec2) -> Option<(Vec2, f32)> {
        let enemy = world.nearest_enemy(me).map(|(e, d)| (e.center(), d));
        let bullet = world.nearest_enemy_bullet(me).map(|(b, d)| (b.center(), d));
        match (enemy, bullet) {
            (Some(e), Some(b)) => Some(if b.1 < e.1 { b } else { e }),
            (e, b) => e.or(b),
        }
    }

    fn choose(&mut self, world: &World, fighter: &Fighter) -> TacticalAction {
        let me = fighter.center();
        let threat = Self::nearest_threat(world, me).map(|(_, d)| d);
        let evade = self.evade_radius();

        if threat.is_some_and(|d| d < evade) {
            return TacticalAction::Defend;
        }
        if fighter.lives() <= self.low_lives() && threat.is_some_and(|d| d < evade * 2.0) {
            return TacticalAction::Defend;
        }

        let enemy_dist = world.nearest_enemy(me).map(|(_, d)| d);
        if let Some((_, dist)) = world.nearest_power_up(me) {
            // risk tolerance lets the pilot ignore enemies that are this close
            let caution = evade * (2.0 - self.strategy.risk_tolerance);
            let safe_enough = enemy_dist.is_none_or(|d| d > caution);
            if dist < self.pickup_radius() && safe_enough {
                return TacticalAction::CollectPowerUp;
            }
        }
        if enemy_dist.is_some_and(|d| d < self.chase_radius()) {
            return TacticalAction::Attack;
        }

        if !self.current.is_patrol() {
            self.patrol_offset = Vec2::new(
                self.rng.random_range(-PATROL_JITTER..=PATROL_JITTER),
                self.rng.random_range(-PATROL_JITTER..=PATROL_JITTER),
            );
        }
        TacticalAction::Patrol
    }

    fn patrol_point(&self, world: &World, slot: PlayerSlot) -> Vec2 {
        let bounds = world.bounds();
        // wingmen split above and below the centre line
        let side = if slot % 2 == 0 { -1.0 } else { 1.0 };
        let y = bounds.top() + bounds.h * (0.5 + side * 0.25 * self.strategy.teamwork);
        Vec2::new(bounds.left() + bounds.w * 0.25, y) + self.patrol_offset
    }

    fn execute(&self, world: &World, slot: PlayerSlot, fighter: &Fighter) -> PlayerInput {
        let me = fighter.center();
        let bounds = world.bounds();
        let throttle = self.throttle();
        let tolerance = self.align_tolerance(fighter);
        let aligned_enemy = world
            .enemies()
            .iter()
            .any(|e| e.center().x > me.x && (e.center().y - me.y).abs() < tolerance);

        let movement = match self.current {
            TacticalAction::Defend => {
                let Some((threat, _)) = Self::nearest_threat(world, me) else {
                    return PlayerInput::toward(me, safe_zone(bounds), STOP_DISTANCE, throttle);
                };
                let mut direction = away_from(me, threat);
                if fighter.lives() <= self.low_lives() {
                    direction = (direction + (safe_zone(bounds) - me).normalized()).normalized();
                }
                PlayerInput::new(direction * throttle, false)
            }
            TacticalAction::Attack => match world.nearest_enemy(me) {
                Some((enemy, _)) => {
                    let standoff = 100.0 + 250.0 * (1.0 - self.strategy.aggression);
                    let target = Vec2::new(enemy.center().x - standoff, enemy.center().y);
                    let target = clamp_to_lane(target, bounds);
                    PlayerInput::toward(me, target, STOP_DISTANCE, throttle)
                }
                None => PlayerInput::IDLE,
            },
            TacticalAction::CollectPowerUp => match world.nearest_power_up(me) {
                Some((power_up, _)) => {
                    PlayerInput::toward(me, power_up.center(), STOP_DISTANCE, throttle)
                }
                None => PlayerInput::IDLE,
            },
            TacticalAction::Patrol => {
                let target = clamp_to_lane(self.patrol_point(world, slot), bounds);
                PlayerInput::toward(me, target, STOP_DISTANCE, throttle)
            }
        };
        movement.with_fire(aligned_enemy)
    }
}

impl Pilot for StrategyPilot {
    fn name(&self) -> &str {
        "strategy"
    }

    fn decide(&mut self, world: &World, slot: PlayerSlot) -> PlayerInput {
        let Some(fighter) = world.fighter(slot).filter(|f| f.is_alive()) else {
            return PlayerInput::IDLE;
        };
        if self.decision_timer == 0 {
            let next = self.choose(world, fighter);
            if next != self.current {
                debug!(slot, from = %self.current, to = %next, "tactical action changed");
            }
            self.current = next;
        }
        self.decision_timer = (self.decision_timer + 1) % self.decision_interval();
        self.execute(world, slot, fighter)
    }
}
