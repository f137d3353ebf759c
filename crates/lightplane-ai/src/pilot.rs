use lightplane_engine::{AiKind, GameSeed, PlayerInput, PlayerSlot, Rect, Vec2, World};

use crate::{PatrolPilot, RulePilot, Strategy, StrategyPilot};

/// Something that flies a fighter: produces one input per frame.
pub trait Pilot {
    fn name(&self) -> &str;

    /// Decides the input for the fighter in `slot` for the coming frame.
    ///
    /// Called once per played frame, before [`World::step`].
    fn decide(&mut self, world: &World, slot: PlayerSlot) -> PlayerInput;
}

/// Builds the pilot for an AI-controlled config entry.
///
/// `strategy` is only used by [`AiKind::Strategy`].
#[must_use]
pub fn pilot_for(kind: AiKind, seed: GameSeed, strategy: Strategy) -> Box<dyn Pilot> {
    match kind {
        AiKind::Patrol => Box::new(PatrolPilot::new(seed.rng())),
        AiKind::Rule => Box::new(RulePilot::new()),
        AiKind::Strategy => Box::new(StrategyPilot::new(strategy, seed.rng())),
    }
}

/// Keeps AI fighters in the left part of the arena, away from the edges.
pub(crate) fn clamp_to_lane(target: Vec2, bounds: &Rect) -> Vec2 {
    const EDGE_MARGIN: f32 = 50.0;
    const MAX_X_RATIO: f32 = 0.4;
    let max_x = (bounds.left() + bounds.w * MAX_X_RATIO).max(bounds.left() + EDGE_MARGIN);
    let max_y = (bounds.bottom() - EDGE_MARGIN).max(bounds.top() + EDGE_MARGIN);
    Vec2::new(
        target.x.clamp(bounds.left() + EDGE_MARGIN, max_x),
        target.y.clamp(bounds.top() + EDGE_MARGIN, max_y),
    )
}

/// Point near the bottom centre where few enemies pass.
pub(crate) fn safe_zone(bounds: &Rect) -> Vec2 {
    Vec2::new(bounds.left() + bounds.w / 2.0, bounds.bottom() - 80.0)
}

/// Unit vector pointing from `threat` to `me`.
///
/// Falls back to straight up when both points coincide.
pub(crate) fn away_from(me: Vec2, threat: Vec2) -> Vec2 {
    let away = (me - threat).normalized();
    if away == Vec2::ZERO {
        Vec2::new(0.0, -1.0)
    } else {
        away
    }
}

#[cfg(test)]
mod tests {
    use lightplane_engine::{FrameInputs, GameMode};

    use super::*;

    #[test]
    fn test_every_kind_flies_a_duel() {
        let mut config = GameMode::AiDuel.preset();
        config.max_frames = Some(600);
        let seed = GameSeed::from_u64(8);
        let mut world = World::new(config, seed).unwrap();
        let mut pilots: Vec<_> = [AiKind::Patrol, AiKind::Rule]
            .into_iter()
            .map(|kind| pilot_for(kind, seed, Strategy::BALANCED))
            .collect();
        for _ in 0..600 {
            let inputs: FrameInputs = pilots
                .iter_mut()
                .enumerate()
                .map(|(slot, pilot)| pilot.decide(&world, slot))
                .collect();
            if world.step(&inputs).game_over {
                break;
            }
        }
        let shots: u32 = world.fighters().iter().map(|f| f.stats().shots_fired()).sum();
        assert!(shots > 0);
    }

    #[test]
    fn test_factory_names() {
        let seed = GameSeed::from_u64(0);
        assert_eq!(pilot_for(AiKind::Patrol, seed, Strategy::BALANCED).name(), "patrol");
        assert_eq!(pilot_for(AiKind::Rule, seed, Strategy::BALANCED).name(), "rule");
        assert_eq!(pilot_for(AiKind::Strategy, seed, Strategy::BALANCED).name(), "strategy");
    }

    #[test]
    fn test_clamp_to_lane() {
        let bounds = Rect::new(0.0, 0.0, 1280.0, 720.0);
        assert_eq!(clamp_to_lane(Vec2::new(900.0, 5.0), &bounds), Vec2::new(512.0, 50.0));
        assert_eq!(clamp_to_lane(Vec2::new(0.0, 800.0), &bounds), Vec2::new(50.0, 670.0));
    }
}
