use std::array;

use lightplane_engine::PlayerStats;
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

pub const GENE_COUNT: usize = 8;

/// Tunable personality of a [`StrategyPilot`](crate::StrategyPilot).
///
/// Every gene lives in a fixed range (see [`Strategy::RANGES`]); constructors
/// and mutators clamp into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// How far away enemies are chased.
    pub aggression: f32,
    /// How early threats are evaded and when to retreat to the safe zone.
    pub defense: f32,
    /// Movement throttle multiplier.
    pub speed: f32,
    /// Vertical alignment needed before firing (higher is stricter).
    pub accuracy: f32,
    /// Willingness to grab power-ups near enemies.
    pub risk_tolerance: f32,
    /// Spreads wingmen apart while patrolling.
    pub teamwork: f32,
    /// How often the tactical decision is reconsidered.
    pub adaptability: f32,
    /// How far power-ups are pursued.
    pub resource_management: f32,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Rough playing style derived from a strategy's genes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum CombatStyle {
    #[display("berserker")]
    Berserker,
    #[display("turtle")]
    Turtle,
    #[display("balanced")]
    Balanced,
}

impl Strategy {
    pub const BALANCED: Self = Self {
        aggression: 0.5,
        defense: 0.5,
        speed: 1.0,
        accuracy: 0.65,
        risk_tolerance: 0.5,
        teamwork: 0.5,
        adaptability: 0.5,
        resource_management: 0.5,
    };

    /// Inclusive `(min, max)` range of each gene, in [`Strategy::as_genes`] order.
    pub const RANGES: [(f32, f32); GENE_COUNT] = [
        (0.0, 1.0), // aggression
        (0.0, 1.0), // defense
        (0.5, 2.0), // speed
        (0.3, 1.0), // accuracy
        (0.0, 1.0), // risk tolerance
        (0.0, 1.0), // teamwork
        (0.1, 1.0), // adaptability
        (0.0, 1.0), // resource management
    ];

    pub const NAMES: [&str; GENE_COUNT] = [
        "aggression",
        "defense",
        "speed",
        "accuracy",
        "risk_tolerance",
        "teamwork",
        "adaptability",
        "resource_management",
    ];

    /// Builds a strategy from genes in [`Strategy::NAMES`] order, clamping each into range.
    #[must_use]
    pub fn from_genes(genes: [f32; GENE_COUNT]) -> Self {
        let [
            aggression,
            defense,
            speed,
            accuracy,
            risk_tolerance,
            teamwork,
            adaptability,
            resource_management,
        ] = array::from_fn(|i| {
            let (min, max) = Self::RANGES[i];
            genes[i].clamp(min, max)
        });
        Self {
            aggression,
            defense,
            speed,
            accuracy,
            risk_tolerance,
            teamwork,
            adaptability,
            resource_management,
        }
    }

    #[must_use]
    pub const fn as_genes(&self) -> [f32; GENE_COUNT] {
        [
            self.aggression,
            self.defense,
            self.speed,
            self.accuracy,
            self.risk_tolerance,
            self.teamwork,
            self.adaptability,
            self.resource_management,
        ]
    }

    fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(usize) -> f32,
    {
        Self::from_genes(array::from_fn(f))
    }

    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::from_fn(|i| {
            let (min, max) = Self::RANGES[i];
            rng.random_range(min..=max)
        })
    }

    /// Puts every gene back into its range.
    pub fn clamp(&mut self) {
        *self = Self::from_genes(self.as_genes());
    }

    #[must_use]
    pub fn combat_style(&self) -> CombatStyle {
        if self.aggression > 0.7 {
            CombatStyle::Berserker
        } else if self.defense > 0.7 {
            CombatStyle::Turtle
        } else {
            CombatStyle::Balanced
        }
    }

    /// BLX-α crossover: each child gene is drawn from the parents' interval
    /// widened by `alpha` on both sides.
    pub fn blx_alpha<R>(p1: &Self, p2: &Self, alpha: f32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let p1 = p1.as_genes();
        let p2 = p2.as_genes();
        Self::from_fn(|i| {
            let min = f32::min(p1[i], p2[i]);
            let max = f32::max(p1[i], p2[i]);
            let d = max - min;
            rng.random_range((min - alpha * d)..=(max + alpha * d))
        })
    }

    /// Shifts each gene, with probability `rate`, by a uniform amount in `-spread..=spread`.
    pub fn mutate<R>(&mut self, rate: f64, spread: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let mut genes = self.as_genes();
        for g in &mut genes {
            if rng.random_bool(rate) {
                *g += rng.random_range(-spread..=spread);
            }
        }
        *self = Self::from_genes(genes);
    }

    /// Gaussian variant of [`Strategy::mutate`].
    ///
    /// `sigma` is relative to each gene's range width.
    pub fn mutate_normal<R>(&mut self, sigma: f32, rate: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let Ok(normal) = Normal::new(0.0, sigma.max(0.0)) else {
            return;
        };
        let mut genes = self.as_genes();
        for (g, (min, max)) in genes.iter_mut().zip(Self::RANGES) {
            if rng.random_bool(rate) {
                *g += rng.sample(normal) * (max - min);
            }
        }
        *self = Self::from_genes(genes);
    }

    /// Nudges genes toward whatever the last game lacked.
    pub fn adjust(&mut self, metrics: &PerformanceMetrics) {
        if metrics.survival_time < 30.0 {
            self.defense += 0.1;
            self.aggression -= 0.05;
        }
        if metrics.kills < 10 {
            self.aggression += 0.1;
            self.accuracy += 0.05;
        }
        if metrics.damage_taken > 50 {
            self.defense += 0.15;
            self.speed += 0.1;
        }
        if metrics.accuracy < 0.5 {
            self.accuracy += 0.1;
            self.aggression -= 0.05;
        }
        self.clamp();
    }
}

/// Outcome of one game, as judged by the fitness function.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Seconds survived.
    pub survival_time: f32,
    pub kills: u32,
    /// Hits that cost a life.
    pub damage_taken: u32,
    pub power_ups_collected: u32,
    /// Hits landed per shot fired, in `0.0..=1.0`.
    pub accuracy: f32,
}

impl PerformanceMetrics {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_stats(stats: &PlayerStats, fps: u32) -> Self {
        Self {
            survival_time: stats.frames_survived() as f32 / fps.max(1) as f32,
            kills: stats.kills(),
            damage_taken: stats.deaths(),
            power_ups_collected: stats.power_ups(),
            accuracy: stats.accuracy(),
        }
    }

    /// Weighted score in `0.0..=1.0`.
    ///
    /// ```text
    /// 0.3·n(survival) + 0.25·n(kills) − 0.2·n(damage) + 0.15·n(power-ups) + 0.1·accuracy
    /// ```
    ///
    /// where `n(v) = min(1, v / 100)`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fitness(&self) -> f32 {
        fn n(v: f32) -> f32 {
            (v / 100.0).min(1.0)
        }
        let fitness = 0.3 * n(self.survival_time) + 0.25 * n(self.kills as f32)
            - 0.2 * n(self.damage_taken as f32)
            + 0.15 * n(self.power_ups_collected as f32)
            + 0.1 * self.accuracy;
        fitness.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use super::Strategy;

    fn in_range(strategy: &Strategy) -> bool {
        strategy
            .as_genes()
            .iter()
            .zip(Strategy::RANGES)
            .all(|(g, (min, max))| (min..=max).contains(g))
    }

    #[test]
    fn test_from_genes_clamps() {
        let s = Strategy::from_genes([2.0, -1.0, 0.0, 0.0, 0.5, 0.5, 0.0, 9.0]);
        assert!((s.aggression - 1.0).abs() < f32::EPSILON);
        assert!(s.defense.abs() < f32::EPSILON);
        assert!((s.speed - 0.5).abs() < f32::EPSILON);
        assert!((s.accuracy - 0.3).abs() < f32::EPSILON);
        assert!((s.adaptability - 0.1).abs() < f32::EPSILON);
        assert!((s.resource_management - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_combat_style() {
        let mut s = Strategy::BALANCED;
        assert_eq!(s.combat_style(), CombatStyle::Balanced);
        s.defense = 0.8;
        assert_eq!(s.combat_style(), CombatStyle::Turtle);
        s.aggression = 0.9;
        assert_eq!(s.combat_style(), CombatStyle::Berserker);
    }

    #[test]
    fn test_adjust_after_poor_game() {
        let mut s = Strategy::BALANCED;
        s.adjust(&PerformanceMetrics {
            survival_time: 10.0,
            kills: 2,
            damage_taken: 60,
            power_ups_collected: 0,
            accuracy: 0.2,
        });
        assert!((s.defense - 0.75).abs() < 1e-6);
        assert!((s.aggression - 0.5).abs() < 1e-6);
        assert!((s.speed - 1.1).abs() < 1e-6);
        assert!((s.accuracy - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_adjust_after_good_game_changes_nothing() {
        let mut s = Strategy::BALANCED;
        s.adjust(&PerformanceMetrics {
            survival_time: 120.0,
            kills: 40,
            damage_taken: 1,
            power_ups_collected: 3,
            accuracy: 0.8,
        });
        assert_eq!(s, Strategy::BALANCED);
    }

    #[test]
    fn test_fitness_weights() {
        let perfect = PerformanceMetrics {
            survival_time: 500.0,
            kills: 500,
            damage_taken: 0,
            power_ups_collected: 500,
            accuracy: 1.0,
        };
        assert!((perfect.fitness() - 1.0).abs() < 1e-6);

        let half = PerformanceMetrics {
            survival_time: 50.0,
            ..PerformanceMetrics::default()
        };
        assert!((half.fitness() - 0.15).abs() < 1e-6);

        let hurt = PerformanceMetrics {
            damage_taken: 100,
            ..PerformanceMetrics::default()
        };
        assert!(hurt.fitness().abs() < f32::EPSILON);
    }

    #[test]
    fn test_metrics_from_stats() {
        let mut stats = PlayerStats::new();
        for _ in 0..120 {
            stats.record_frame_survived();
        }
        stats.record_shot();
        stats.record_hit_landed();
        stats.record_kill(1);
        let m = PerformanceMetrics::from_stats(&stats, 60);
        assert!((m.survival_time - 2.0).abs() < 1e-6);
        assert_eq!(m.kills, 1);
        assert!((m.accuracy - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn test_operators_stay_in_range(seed in any::<u64>(), survival in 0.0f32..200.0, kills in 0u32..50, damage in 0u32..100, accuracy in 0.0f32..=1.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let a = Strategy::random(&mut rng);
            let b = Strategy::random(&mut rng);
            prop_assert!(in_range(&a));

            let mut child = Strategy::blx_alpha(&a, &b, 0.5, &mut rng);
            prop_assert!(in_range(&child));
            child.mutate(0.5, 0.1, &mut rng);
            prop_assert!(in_range(&child));
            child.mutate_normal(0.2, 0.5, &mut rng);
            prop_assert!(in_range(&child));

            let metrics = PerformanceMetrics { survival_time: survival, kills, damage_taken: damage, power_ups_collected: 0, accuracy };
            child.adjust(&metrics);
            prop_assert!(in_range(&child));
            prop_assert!((0.0..=1.0).contains(&metrics.fitness()));
        }
    }
}
