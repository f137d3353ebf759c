use lightplane_engine::{PlayerInput, PlayerSlot, World};
use tracing::trace;

use crate::{
    Pilot,
    pilot::{away_from, safe_zone},
};

const EVADE_RADIUS: f32 = 80.0;
const ENGAGE_RADIUS: f32 = 150.0;
const APPROACH_THROTTLE: f32 = 0.5;
const STOP_DISTANCE: f32 = 5.0;

/// What the rule pilot did on its last decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RuleAction {
    /// Low on lives: get away and head for the safe zone.
    Retreat,
    Evade,
    /// Hold position and shoot.
    Engage,
    Approach,
    /// No enemies: wait in the safe zone.
    Idle,
}

/// A survival-first pilot driven by fixed distance rules.
///
/// - one life left: evade toward the safe zone near the bottom centre
/// - enemy closer than 80: evade
/// - enemy closer than 150: hold and shoot
/// - otherwise approach at half speed, firing once vertically aligned
#[derive(Debug, Clone)]
pub struct RulePilot {
    last_action: RuleAction,
}

impl Default for RulePilot {
    fn default() -> Self {
        Self::new()
    }
}

impl RulePilot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_action: RuleAction::Idle,
        }
    }

    #[must_use]
    pub fn last_action(&self) -> RuleAction {
        self.last_action
    }
}

impl Pilot for RulePilot {
    fn name(&self) -> &str {
        "rule"
    }

    fn decide(&mut self, world: &World, slot: PlayerSlot) -> PlayerInput {
        let Some(fighter) = world.fighter(slot).filter(|f| f.is_alive()) else {
            return PlayerInput::IDLE;
        };
        let me = fighter.center();
        let safe = safe_zone(world.bounds());

        let Some((enemy, dist)) = world.nearest_enemy(me) else {
            self.last_action = RuleAction::Idle;
            return PlayerInput::toward(me, safe, STOP_DISTANCE, 1.0);
        };
        let away = away_from(me, enemy.center());

        let (action, input) = if fighter.lives() <= 1 {
            let to_safe = (safe - me).normalized();
            let direction = (away + to_safe).normalized();
            (RuleAction::Retreat, PlayerInput::new(direction, false))
        } else if dist < EVADE_RADIUS {
            (RuleAction::Evade, PlayerInput::new(away, false))
        } else if dist < ENGAGE_RADIUS {
            (RuleAction::Engage, PlayerInput::IDLE.with_fire(true))
        } else {
            let aligned = (enemy.center().y - me.y).abs() < fighter.rect().h / 2.0;
            let input = PlayerInput::toward(me, enemy.center(), STOP_DISTANCE, APPROACH_THROTTLE);
            (RuleAction::Approach, input.with_fire(aligned))
        };
        if action != self.last_action {
            trace!(slot, ?action, "rule pilot switched action");
        }
        self.last_action = action;
        input
    }
}

#[cfg(test)]
mod tests {
    use lightplane_engine::{GameMode, GameSeed, Vec2};

    use super::*;

    fn world_with_enemy_at(dx: f32, dy: f32, lives: Option<u32>) -> World {
        let mut config = GameMode::Traditional.preset();
        if let Some(lives) = lives {
            config.fighter.starting_lives = lives;
        }
        let mut world = World::new(config, GameSeed::from_u64(0)).unwrap();
        let me = world.fighters()[0].center();
        world.spawn_enemy(Vec2::new(me.x + dx, me.y + dy), Vec2::ZERO);
        world
    }

    #[test]
    fn test_rules_by_distance() {
        let mut pilot = RulePilot::new();

        let input = pilot.decide(&world_with_enemy_at(50.0, 0.0, None), 0);
        assert!(pilot.last_action().is_evade());
        assert!(input.direction.x < 0.0);
        assert!(!input.fire);

        let input = pilot.decide(&world_with_enemy_at(120.0, 0.0, None), 0);
        assert!(pilot.last_action().is_engage());
        assert_eq!(input.direction, Vec2::ZERO);
        assert!(input.fire);

        let input = pilot.decide(&world_with_enemy_at(600.0, 0.0, None), 0);
        assert!(pilot.last_action().is_approach());
        assert!((input.direction.x - 0.5).abs() < 1e-6);
        assert!(input.fire);

        let input = pilot.decide(&world_with_enemy_at(600.0, 200.0, None), 0);
        assert!(pilot.last_action().is_approach());
        assert!(!input.fire);
    }

    #[test]
    fn test_last_life_retreats() {
        let mut pilot = RulePilot::new();
        let input = pilot.decide(&world_with_enemy_at(600.0, 0.0, Some(1)), 0);
        assert!(pilot.last_action().is_retreat());
        // safe zone is below the centred fighter
        assert!(input.direction.y > 0.0);
    }

    #[test]
    fn test_no_enemies_heads_to_safe_zone() {
        let world = World::new(GameMode::Traditional.preset(), GameSeed::from_u64(0)).unwrap();
        let mut pilot = RulePilot::new();
        let input = pilot.decide(&world, 0);
        assert!(pilot.last_action().is_idle());
        assert!(input.direction.x > 0.0);
        assert!(input.direction.y > 0.0);
    }
}
