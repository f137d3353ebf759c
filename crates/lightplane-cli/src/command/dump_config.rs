use std::path::PathBuf;

use lightplane_engine::GameMode;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DumpConfigArg {
    /// Preset to write
    #[clap(long, default_value = "traditional")]
    mode: GameMode,
    /// Output file path (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DumpConfigArg) -> anyhow::Result<()> {
    let DumpConfigArg { mode, output } = arg;
    let config = mode.preset();
    tracing::info!(mode = %mode, players = config.players.len(), "writing preset config");
    Output::save_json(&config, output.clone())?;
    if let Some(path) = output {
        eprintln!("{} config written to {}", mode.title(), path.display());
    }
    Ok(())
}
