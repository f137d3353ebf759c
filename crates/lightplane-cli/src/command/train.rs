use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use lightplane_ai::Strategy;
use lightplane_training::{
    evaluator::Evaluator,
    genetic::{Population, PopulationEvolver},
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use tracing::info;

use crate::{model::StrategyModel, util::Output};

const ELITE_COUNT: usize = 2;
const TOURNAMENT_SIZE: usize = 3;
const MUTATION_RATE: f64 = 0.2;
const BLX_ALPHA: f32 = 0.3;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum EvolutionPhase {
    #[default]
    Exploration,
    Transition,
    Convergence,
}

impl EvolutionPhase {
    fn from_generation(generation: usize) -> Self {
        match generation {
            0..30 => Self::Exploration,
            30..80 => Self::Transition,
            _ => Self::Convergence,
        }
    }
}

const fn mutation_sigma_by_phase(phase: EvolutionPhase) -> f32 {
    match phase {
        EvolutionPhase::Exploration => 0.15,
        EvolutionPhase::Transition => 0.08,
        EvolutionPhase::Convergence => 0.03,
    }
}

const fn evolver_by_phase(phase: EvolutionPhase) -> PopulationEvolver {
    PopulationEvolver {
        elite_count: ELITE_COUNT,
        tournament_size: TOURNAMENT_SIZE,
        mutation_sigma: mutation_sigma_by_phase(phase),
        blx_alpha: BLX_ALPHA,
        mutation_rate: MUTATION_RATE,
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of generations to evolve
    #[arg(long, default_value_t = 50)]
    generations: usize,
    /// Individuals per generation
    #[arg(long, default_value_t = 20)]
    population: usize,
    /// Games played by every individual per generation
    #[arg(long, default_value_t = 3)]
    games: usize,
    /// Frame limit of one evaluation game
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Model name stored in the output file
    #[arg(long, default_value = "evolved")]
    name: String,
    /// Seed of the evolution RNG (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        generations,
        population: population_count,
        games,
        frames,
        name,
        seed,
        output,
    } = arg;
    anyhow::ensure!(*generations > 0, "At least one generation is required");
    anyhow::ensure!(*population_count > 0, "Population must not be empty");

    let evaluator = Evaluator::new(*games, *frames).context("Failed to set up evaluation games")?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg32::seed_from_u64(seed);
    info!(
        generations,
        population = population_count,
        games,
        frames,
        seed,
        "training started"
    );

    let mut population = Population::random(*population_count, &mut rng);
    for generation in 0..*generations {
        let phase = EvolutionPhase::from_generation(generation);
        eprintln!("Generation #{generation} ({phase:?}):");
        let evolver = evolver_by_phase(phase);
        population.evaluate_fitness(&evaluator);

        eprintln!("  Individuals:");
        for (i, ind) in population.individuals().iter().enumerate() {
            eprintln!(
                "  {i:2}: {:.3?} => {:.3}",
                ind.strategy().as_genes(),
                ind.fitness()
            );
        }

        if let Some(gene_stats) = population.compute_gene_stats() {
            #[expect(clippy::cast_precision_loss)]
            let norm_std_dev_mean = gene_stats
                .iter()
                .map(|s| s.normalized_std_dev)
                .sum::<f32>()
                / gene_stats.len() as f32;

            eprintln!("  Gene Stats: {:?}", Strategy::NAMES);
            eprintln!(
                "    Min:        {:.3?}",
                gene_stats.iter().map(|s| s.min).collect::<Vec<_>>(),
            );
            eprintln!(
                "    Max:        {:.3?}",
                gene_stats.iter().map(|s| s.max).collect::<Vec<_>>(),
            );
            eprintln!(
                "    Mean:       {:.3?}",
                gene_stats.iter().map(|s| s.mean).collect::<Vec<_>>(),
            );
            eprintln!(
                "    NormStddev: {:.3?}",
                gene_stats
                    .iter()
                    .map(|s| s.normalized_std_dev)
                    .collect::<Vec<_>>(),
            );
            eprintln!("    => Mean:    {norm_std_dev_mean:.3}");
        }

        if let Some(fitness_stats) = population.compute_fitness_stats() {
            eprintln!("  Fitness Stats:");
            eprintln!("    Min:  {:.3}", fitness_stats.min);
            eprintln!("    Max:  {:.3}", fitness_stats.max);
            eprintln!("    Mean: {:.3}", fitness_stats.mean);
            info!(
                generation,
                best = fitness_stats.max,
                mean = fitness_stats.mean,
                "generation evaluated"
            );
        }

        if generation + 1 < *generations {
            population = evolver.evolve(&population, &mut rng);
        }
    }

    eprintln!("Best Individuals:");
    for (i, ind) in population.individuals().iter().take(5).enumerate() {
        eprintln!(
            "  {i:2}: {:?} => {}",
            ind.strategy().as_genes(),
            ind.fitness()
        );
    }

    let best = population
        .best()
        .context("Training finished without any individual")?;
    eprintln!(
        "Strategy training completed ({} pilot).",
        best.strategy().combat_style()
    );

    let model = StrategyModel {
        name: name.clone(),
        trained_at: Utc::now(),
        final_fitness: best.fitness(),
        strategy: *best.strategy(),
    };
    Output::save_json(&model, output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_by_generation() {
        assert_eq!(EvolutionPhase::from_generation(0), EvolutionPhase::Exploration);
        assert_eq!(EvolutionPhase::from_generation(30), EvolutionPhase::Transition);
        assert_eq!(EvolutionPhase::from_generation(80), EvolutionPhase::Convergence);
    }

    #[test]
    fn test_mutation_narrows_as_evolution_converges() {
        let sigmas = [
            EvolutionPhase::Exploration,
            EvolutionPhase::Transition,
            EvolutionPhase::Convergence,
        ]
        .map(|phase| evolver_by_phase(phase).mutation_sigma);
        assert!(sigmas[0] > sigmas[1]);
        assert!(sigmas[1] > sigmas[2]);
    }

    #[test]
    fn test_short_training_writes_model() {
        let dir = std::env::temp_dir().join(format!("lightplane-train-{}", std::process::id()));
        let path = dir.join("model.json");
        let arg = TrainArg {
            generations: 2,
            population: 4,
            games: 1,
            frames: 60,
            name: "tiny".to_owned(),
            seed: Some(1),
            output: Some(path.clone()),
        };
        run(&arg).unwrap();

        let model = crate::util::read_model_file(&path).unwrap();
        assert_eq!(model.name, "tiny");
        assert!((0.0..=1.0).contains(&model.final_fitness));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
