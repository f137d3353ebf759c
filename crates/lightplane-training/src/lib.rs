//! Training tools for LightPlane pilots.
//!
//! Two independent ways to improve a pilot live here:
//!
//! - A genetic algorithm that evolves the eight genes of a
//!   [`Strategy`](lightplane_ai::Strategy) ([`genetic`], scored by
//!   [`evaluator`])
//! - A gym-like environment ([`env`]) that exposes one fighter through
//!   discrete actions, an observation vector and a shaped reward, so an
//!   external learner can drive it
//!
//! # How Strategy Training Works
//!
//! 1. **Population** - Create random strategies within their gene ranges
//! 2. **Evaluation** - Each strategy flies several headless games with fixed seeds
//! 3. **Fitness** - Per-game [`PerformanceMetrics`](lightplane_ai::PerformanceMetrics)
//!    are turned into a fitness in `0.0..=1.0` and averaged
//! 4. **Reproduction** - Elites survive, the rest come from tournament
//!    selection, BLX-α crossover and Gaussian mutation
//! 5. **Repeat** - Continue for a fixed number of generations
//!
//! ```text
//! Genetic Algorithm
//!     ↓ evolves
//! Strategy genes (individuals)
//!     ↓ fly
//! StrategyPilot in headless sessions
//!     ↓ measured as
//! PerformanceMetrics → fitness
//!     ↓ guides
//! Selection & Reproduction
//! ```
//!
//! # Example
//!
//! ```
//! use lightplane_training::{
//!     evaluator::Evaluator,
//!     genetic::{Population, PopulationEvolver},
//! };
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let evaluator = Evaluator::new(1, 60).unwrap();
//! let evolver = PopulationEvolver::default();
//!
//! let mut population = Population::random(4, &mut rng);
//! for _ in 0..2 {
//!     population.evaluate_fitness(&evaluator);
//!     population = evolver.evolve(&population, &mut rng);
//! }
//! population.evaluate_fitness(&evaluator);
//! let best = &population.individuals()[0];
//! assert!((0.0..=1.0).contains(&best.fitness()));
//! ```
//!
//! # Current Limitations
//!
//! - **Single pilot only**: Fitness is measured with the strategy flying
//!   alone; wingman cooperation (the teamwork gene) is never rewarded directly
//! - **Hand-made fitness**: The weights of the fitness formula were chosen by
//!   hand and are not validated
//! - **No learner**: [`env::TrainingEnv`] is a seam for reinforcement learning,
//!   no agent is shipped

pub mod env;
pub mod evaluator;
pub mod genetic;
pub mod stats;
