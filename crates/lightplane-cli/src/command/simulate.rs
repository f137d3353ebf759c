use std::path::PathBuf;

use anyhow::Context as _;
use lightplane_ai::{PerformanceMetrics, Pilot, Strategy, pilot_for};
use lightplane_engine::{
    AiKind, FrameInputs, GameConfig, GameMode, GameSeed, GameSession, PilotKind, PlayerStats,
};
use lightplane_training::stats::DescriptiveStats;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    model,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Game mode to simulate
    #[arg(long, default_value = "ai-duel")]
    mode: GameMode,
    /// Game config file (JSON) used instead of the mode preset
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: u64,
    /// Frame limit of one game
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// First world seed; game `i` uses `seed + i`
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Strategy model file (JSON) flown by strategy AI pilots
    #[arg(long)]
    model: Option<PathBuf>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PlayerSummary {
    name: String,
    pilot: String,
    fitness: f32,
    stats: PlayerStats,
}

#[derive(Debug, Serialize)]
struct GameSummary {
    seed: String,
    frames: u64,
    winner: Option<String>,
    players: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize)]
struct SimulationSummary {
    mode: String,
    frame_limit: u64,
    total_score: Option<DescriptiveStats>,
    frames: Option<DescriptiveStats>,
    games: Vec<GameSummary>,
}

/// Every human seat is taken over by the strategy pilot.
fn headless_config(mut config: GameConfig, frame_limit: u64) -> GameConfig {
    for player in &mut config.players {
        if player.pilot.is_human() {
            player.pilot = PilotKind::Ai {
                controller: AiKind::Strategy,
            };
        }
    }
    config.max_frames = Some(frame_limit);
    config
}

fn play_game(
    config: &GameConfig,
    seed: GameSeed,
    strategy: Strategy,
) -> anyhow::Result<GameSummary> {
    let mut session = GameSession::new(config.clone(), seed)?;
    let mut pilots: Vec<Box<dyn Pilot>> = config
        .players
        .iter()
        .map(|player| match player.pilot {
            PilotKind::Ai { controller } => pilot_for(controller, seed, strategy),
            PilotKind::Human { .. } => pilot_for(AiKind::Strategy, seed, strategy),
        })
        .collect();

    while session.session_state().is_playing() {
        let inputs: FrameInputs = pilots
            .iter_mut()
            .enumerate()
            .map(|(slot, pilot)| pilot.decide(session.world(), slot))
            .collect();
        session.increment_frame(&inputs);
    }

    let players = config
        .players
        .iter()
        .zip(&pilots)
        .zip(session.player_stats())
        .map(|((player, pilot), stats)| PlayerSummary {
            name: player.name.clone(),
            pilot: pilot.name().to_owned(),
            fitness: PerformanceMetrics::from_stats(stats, session.fps()).fitness(),
            stats: stats.clone(),
        })
        .collect();
    let winner = session
        .winner()
        .filter(|_| config.players.len() > 1)
        .map(|slot| config.players[slot].name.clone());
    debug!(%seed, frames = session.total_frames(), score = session.total_score(), "game finished");

    Ok(GameSummary {
        seed: seed.to_string(),
        frames: session.total_frames(),
        winner,
        players,
    })
}

#[expect(clippy::cast_precision_loss)]
fn summarize(mode: String, frame_limit: u64, games: Vec<GameSummary>) -> SimulationSummary {
    let total_score = DescriptiveStats::new(games.iter().map(|game| {
        game.players
            .iter()
            .map(|p| p.stats.score())
            .sum::<u64>() as f32
    }));
    let frames = DescriptiveStats::new(games.iter().map(|game| game.frames as f32));
    SimulationSummary {
        mode,
        frame_limit,
        total_score,
        frames,
        games,
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        mode,
        config,
        games,
        frames,
        seed,
        model,
        output,
    } = arg;

    let config = match config {
        Some(path) => util::read_game_config_file(path)?,
        None => mode.preset(),
    };
    let config = headless_config(config, *frames);
    let strategy = model::load_strategy(model.as_deref())?;
    info!(mode = %config.mode_name, games, frames, first_seed = seed, "simulation started");

    let results = (*seed..)
        .take(usize::try_from(*games).context("Too many games")?)
        .map(|game_seed| {
            let game_seed = GameSeed::from_u64(game_seed);
            play_game(&config, game_seed, strategy)
                .with_context(|| format!("Failed to simulate game with seed {game_seed}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let summary = summarize(config.mode_name.clone(), *frames, results);
    if let Some(score) = &summary.total_score {
        eprintln!(
            "{} games: score min {:.0} / mean {:.1} / max {:.0}",
            score.count, score.min, score.mean, score.max
        );
    }
    Output::save_json(&summary, output.clone())
}
