//! Genetic algorithm evolving [`Strategy`] genes.
//!
//! Each generation:
//!
//! 1. **Evaluate Fitness** - Every individual is scored by a
//!    [`FitnessEvaluator`], in parallel
//! 2. **Elite Selection** - The best individuals are copied unchanged
//! 3. **Tournament Selection** - Parents are the fittest of a few random picks
//! 4. **Crossover (BLX-α)** - Child genes are drawn from the parents' interval,
//!    widened by α on both sides
//! 5. **Mutation** - Gaussian noise, scaled by each gene's range width
//! 6. **Clamping** - Genes go back into their ranges
//!
//! # Parallelization
//!
//! Individuals are evaluated on scoped threads, one per individual. The
//! evaluator is shared immutably; each thread writes only its own
//! individual's fitness.
//!
//! # Design Decisions
//!
//! ## Range-Relative Mutation
//!
//! Genes have different ranges (speed spans `0.5..=2.0`, most genes `0..=1`),
//! so `mutation_sigma` is a fraction of the range width rather than an
//! absolute amount. One sigma therefore disturbs every gene equally.
//!
//! ## Caller-Controlled Schedule
//!
//! [`PopulationEvolver`] is plain data. Annealing the mutation strength over
//! the run is done by the caller building a different evolver per phase.
//!
//! # Current Limitations
//!
//! - **No diversity preservation** beyond elitism and small tournaments
//! - **No restarts** when the population converges early
//! - **Noisy fitness**: few games per individual make the ranking noisy near
//!   the top

use std::thread;

use lightplane_ai::{GENE_COUNT, Strategy};
use rand::{Rng, seq::IndexedRandom as _};
use tracing::debug;

use crate::{evaluator::FitnessEvaluator, stats::DescriptiveStats};

/// One candidate strategy and its last measured fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    strategy: Strategy,
    fitness: f32,
}

impl Individual {
    /// An individual not yet evaluated.
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            fitness: f32::MIN,
        }
    }

    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }
}

#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` individuals with genes drawn uniformly from their ranges.
    #[must_use]
    pub fn random<R>(count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::new(Strategy::random(rng)))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// The fittest individual, once the population has been evaluated.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Scores every individual in parallel, then sorts best first.
    pub fn evaluate_fitness<E>(&mut self, evaluator: &E)
    where
        E: FitnessEvaluator + ?Sized,
    {
        thread::scope(|s| {
            for ind in &mut self.individuals {
                s.spawn(move || {
                    ind.fitness = evaluator.evaluate(&ind.strategy);
                });
            }
        });

        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        debug!(
            best = self.individuals.first().map(|ind| ind.fitness),
            "population evaluated"
        );
    }

    /// Statistics of each gene across the population, in [`Strategy::NAMES`] order.
    #[must_use]
    pub fn compute_gene_stats(&self) -> Option<[DescriptiveStats; GENE_COUNT]> {
        let stats = (0..GENE_COUNT)
            .map(|i| {
                let genes = self.individuals.iter().map(|ind| ind.strategy.as_genes()[i]);
                DescriptiveStats::new(genes)
            })
            .collect::<Option<Vec<_>>>()?;
        stats.try_into().ok()
    }

    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Parameters turning one generation into the next.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Number of top individuals copied unchanged.
    pub elite_count: usize,
    /// Individuals per tournament (larger means stronger selection pressure).
    pub tournament_size: usize,
    /// Standard deviation of mutation noise, relative to each gene's range width.
    pub mutation_sigma: f32,
    pub blx_alpha: f32,
    /// Probability of mutating each gene.
    pub mutation_rate: f64,
}

impl Default for PopulationEvolver {
    fn default() -> Self {
        Self {
            elite_count: 2,
            tournament_size: 2,
            mutation_sigma: 0.1,
            blx_alpha: 0.3,
            mutation_rate: 0.2,
        }
    }
}

impl PopulationEvolver {
    /// Builds the next generation, the same size as `population`.
    ///
    /// `population` must be sorted by fitness, best first, as left by
    /// [`Population::evaluate_fitness`].
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let parents = &population.individuals;
        assert!(parents.is_sorted_by(|a, b| a.fitness >= b.fitness));

        let elite_count = self.elite_count.min(parents.len());
        let mut next = parents[..elite_count].to_vec();
        while next.len() < parents.len() {
            let (Some(p1), Some(p2)) = (
                tournament_select(parents, self.tournament_size, rng),
                tournament_select(parents, self.tournament_size, rng),
            ) else {
                break;
            };
            let mut child = Strategy::blx_alpha(&p1.strategy, &p2.strategy, self.blx_alpha, rng);
            child.mutate_normal(self.mutation_sigma, self.mutation_rate, rng);
            next.push(Individual::new(child));
        }
        Population { individuals: next }
    }
}

/// Returns the fittest of `tournament_size` distinct random individuals.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Option<&'a Individual>
where
    R: Rng + ?Sized,
{
    population
        .choose_multiple(rng, tournament_size.max(1))
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    /// Rewards aggression and nothing else.
    struct AggressionFitness;

    impl FitnessEvaluator for AggressionFitness {
        fn evaluate(&self, strategy: &Strategy) -> f32 {
            strategy.aggression
        }
    }

    #[test]
    fn test_evaluate_sorts_best_first() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut population = Population::random(10, &mut rng);
        population.evaluate_fitness(&AggressionFitness);
        let fitness: Vec<_> = population.individuals().iter().map(Individual::fitness).collect();
        assert!(fitness.is_sorted_by(|a, b| a >= b));
        assert_eq!(population.best().unwrap().fitness(), fitness[0]);
    }

    #[test]
    fn test_evolve_keeps_size_and_elites() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut population = Population::random(8, &mut rng);
        population.evaluate_fitness(&AggressionFitness);
        let best = *population.best().unwrap().strategy();

        let next = PopulationEvolver::default().evolve(&population, &mut rng);
        assert_eq!(next.individuals().len(), 8);
        assert_eq!(*next.individuals()[0].strategy(), best);
    }

    #[test]
    fn test_selection_pressure_raises_fitness() {
        let mut rng = Pcg32::seed_from_u64(3);
        let evolver = PopulationEvolver {
            tournament_size: 3,
            ..PopulationEvolver::default()
        };
        let mut population = Population::random(20, &mut rng);
        population.evaluate_fitness(&AggressionFitness);
        let initial_mean = population.compute_fitness_stats().unwrap().mean;
        for _ in 0..15 {
            population = evolver.evolve(&population, &mut rng);
            population.evaluate_fitness(&AggressionFitness);
        }
        let final_mean = population.compute_fitness_stats().unwrap().mean;
        assert!(final_mean > initial_mean);
        assert!(final_mean > 0.75);
    }

    #[test]
    fn test_offspring_genes_stay_in_range() {
        let mut rng = Pcg32::seed_from_u64(4);
        let evolver = PopulationEvolver {
            mutation_sigma: 0.5,
            blx_alpha: 1.0,
            mutation_rate: 1.0,
            ..PopulationEvolver::default()
        };
        let mut population = Population::random(12, &mut rng);
        population.evaluate_fitness(&AggressionFitness);
        let next = evolver.evolve(&population, &mut rng);
        for ind in next.individuals() {
            for (gene, (min, max)) in ind.strategy().as_genes().iter().zip(Strategy::RANGES) {
                assert!((min..=max).contains(gene));
            }
        }
    }

    #[test]
    fn test_gene_stats_cover_every_gene() {
        let mut rng = Pcg32::seed_from_u64(5);
        let population = Population::random(6, &mut rng);
        let stats = population.compute_gene_stats().unwrap();
        for (s, (min, max)) in stats.iter().zip(Strategy::RANGES) {
            assert_eq!(s.count, 6);
            assert!(s.min >= min && s.max <= max);
        }
        assert!(Population::from_individuals(vec![]).compute_gene_stats().is_none());
    }
}
