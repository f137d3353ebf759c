use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::{self, LogTarget};

use self::{
    dump_config::DumpConfigArg,
    play::{LaunchArg, PlayArg},
    replay::ReplayArg,
    simulate::SimulateArg,
    train::TrainArg,
};

mod dump_config;
mod play;
mod replay;
mod simulate;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log file used while the terminal UI is open
    #[clap(long, global = true, default_value = "lightplane.log")]
    log_file: PathBuf,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Open the launcher menu (the default)
    Launch(#[clap(flatten)] LaunchArg),
    /// Play one game mode directly
    Play(#[clap(flatten)] PlayArg),
    /// Watch a recorded session
    Replay(#[clap(flatten)] ReplayArg),
    /// Evolve a strategy pilot with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Run headless AI games and print statistics as JSON
    Simulate(#[clap(flatten)] SimulateArg),
    /// Write a preset game configuration as JSON
    DumpConfig(#[clap(flatten)] DumpConfigArg),
}

impl Mode {
    /// Whether the command takes over the terminal.
    fn is_interactive(&self) -> bool {
        matches!(self, Mode::Launch(_) | Mode::Play(_) | Mode::Replay(_))
    }
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { log_file, mode } = CommandArgs::parse();
    let mode = mode.unwrap_or(Mode::Launch(LaunchArg::default()));

    if mode.is_interactive() {
        logging::init(LogTarget::File(&log_file))?;
    } else {
        logging::init(LogTarget::Stderr)?;
    }

    match mode {
        Mode::Launch(arg) => play::run_launch(&arg)?,
        Mode::Play(arg) => play::run_play(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::DumpConfig(arg) => dump_config::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_opens_launcher() {
        let args = CommandArgs::try_parse_from(["lightplane"]).unwrap();
        assert!(args.mode.is_none());
        assert_eq!(args.log_file, PathBuf::from("lightplane.log"));
    }

    #[test]
    fn test_headless_commands_log_to_stderr() {
        let args = CommandArgs::try_parse_from(["lightplane", "train", "--generations", "3"]).unwrap();
        assert!(!args.mode.unwrap().is_interactive());

        let args =
            CommandArgs::try_parse_from(["lightplane", "play", "--mode", "dual", "--log-file", "x.log"])
                .unwrap();
        assert_eq!(args.log_file, PathBuf::from("x.log"));
        assert!(args.mode.unwrap().is_interactive());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(CommandArgs::try_parse_from(["lightplane", "play", "--mode", "arcade"]).is_err());
    }

    #[test]
    fn test_command_definition_is_valid() {
        use clap::CommandFactory as _;
        CommandArgs::command().debug_assert();
    }
}
