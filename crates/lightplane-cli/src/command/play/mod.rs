use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context as _;
use lightplane_ai::Strategy;
use lightplane_engine::{GameConfig, GameMode, GameSeed, SessionRecording};
use lightplane_runtime::{Runtime, Scene, SceneStack};
use rand::Rng as _;
use tracing::info;

use self::screens::{GameScene, LauncherScene};
use crate::{model, record, util};

mod controls;
mod screens;

/// Recordings of finished games, written to disk once the terminal is released.
pub(crate) type RecordingSink = Rc<RefCell<Vec<SessionRecording>>>;

/// What every game started by one command shares.
#[derive(Debug)]
pub(crate) struct GameSetup {
    pub config: GameConfig,
    /// Flown by every strategy AI pilot.
    pub strategy: Strategy,
    /// `None` unless recordings were requested.
    pub recordings: Option<RecordingSink>,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionOptions {
    /// Save a recording of every game when the program exits
    #[clap(long)]
    save_recording: bool,
    /// Directory to save recording files
    #[clap(long, default_value = "./data/recordings/")]
    record_dir: PathBuf,
    /// Strategy model file (JSON) flown by strategy AI pilots
    #[clap(long)]
    model: Option<PathBuf>,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct LaunchArg {
    #[clap(flatten)]
    options: SessionOptions,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Game mode to play
    #[clap(long, default_value = "traditional")]
    mode: GameMode,
    /// Game config file (JSON) used instead of the mode preset
    #[clap(long)]
    config: Option<PathBuf>,
    /// World seed as 32 hex characters (random if omitted)
    #[clap(long)]
    seed: Option<GameSeed>,
    #[clap(flatten)]
    options: SessionOptions,
}

/// Strategy and recording sink loaded from [`SessionOptions`].
#[derive(Debug)]
struct PlayContext {
    strategy: Strategy,
    recordings: Option<RecordingSink>,
}

impl PlayContext {
    fn load(options: &SessionOptions) -> anyhow::Result<Self> {
        Ok(Self {
            strategy: model::load_strategy(options.model.as_deref())?,
            recordings: options.save_recording.then(RecordingSink::default),
        })
    }

    fn save_recordings(self, options: &SessionOptions) -> anyhow::Result<()> {
        let Some(recordings) = self.recordings else {
            return Ok(());
        };
        let recordings = recordings.take();
        for recording in &recordings {
            let path = record::save_recording(recording, &options.record_dir)?;
            eprintln!(
                "Recording saved: {} ({} frames)",
                path.display(),
                recording.frame_count()
            );
        }
        Ok(())
    }
}

pub(crate) fn run_launch(arg: &LaunchArg) -> anyhow::Result<()> {
    let LaunchArg { options } = arg;
    let context = PlayContext::load(options)?;
    let launcher = LauncherScene::new(context.strategy, context.recordings.clone());
    run_scenes(Box::new(launcher))?;
    context.save_recordings(options)
}

pub(crate) fn run_play(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        mode,
        config,
        seed,
        options,
    } = arg;

    let config = match config {
        Some(path) => util::read_game_config_file(path)?,
        None => mode.preset(),
    };
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    info!(mode = %config.mode_name, %seed, "starting game");

    let context = PlayContext::load(options)?;
    let setup = Rc::new(GameSetup {
        config,
        strategy: context.strategy,
        recordings: context.recordings.clone(),
    });
    let game = GameScene::new(setup, seed).context("Failed to start game")?;
    run_scenes(Box::new(game))?;
    context.save_recordings(options)
}

fn run_scenes(initial: Box<dyn Scene>) -> anyhow::Result<()> {
    let mut app = SceneStack::new(initial);
    Runtime::new()
        .run(&mut app)
        .context("Failed to run the terminal UI")
}
