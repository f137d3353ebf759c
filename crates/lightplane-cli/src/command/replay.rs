use std::path::PathBuf;

use anyhow::Context as _;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use lightplane_engine::{FrameInputs, GameSession, PlayerStats, SessionRecording};
use lightplane_runtime::{RenderMode, Runtime, Scene, SceneChange, SceneStack, Timestep};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};
use tracing::{info, warn};

use crate::{
    ui::widgets::{SessionDisplay, render_popup, style},
    util,
};

const SPEEDS: [f64; 6] = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the recording file (JSON format)
    recording_file: PathBuf,
    /// Playback speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        recording_file,
        speed,
    } = arg;
    anyhow::ensure!(
        speed.is_finite() && *speed > 0.0,
        "Playback speed must be positive"
    );

    eprintln!("Loading recording from {}", recording_file.display());
    let recording = util::read_recording_file(recording_file)?;
    eprintln!(
        "Loaded {} frames of {} ({} runs)",
        recording.frame_count(),
        recording.config.mode_name,
        recording.frames.len()
    );

    let scene = ReplayScene::new(&recording, *speed)
        .with_context(|| format!("Failed to replay {}", recording_file.display()))?;
    let mut app = SceneStack::new(Box::new(scene));
    Runtime::new()
        .run(&mut app)
        .context("Failed to run the terminal UI")?;
    Ok(())
}

/// Feeds recorded inputs back into a fresh session, one frame per tick.
#[derive(Debug)]
struct ReplayScene {
    session: GameSession,
    inputs: Vec<FrameInputs>,
    cursor: usize,
    speed: f64,
    expected_stats: Vec<PlayerStats>,
}

impl ReplayScene {
    fn new(recording: &SessionRecording, speed: f64) -> anyhow::Result<Self> {
        let session = recording.new_session()?;
        Ok(Self {
            session,
            inputs: recording.inputs().cloned().collect(),
            cursor: 0,
            speed,
            expected_stats: recording.final_stats.clone(),
        })
    }

    fn is_finished(&self) -> bool {
        self.cursor >= self.inputs.len() || self.session.session_state().is_game_over()
    }

    /// Whether the replay ended with the stats that were recorded.
    fn matches_recording(&self) -> bool {
        self.session
            .player_stats()
            .eq(self.expected_stats.iter())
    }

    fn step(&mut self) {
        let Some(inputs) = self.inputs.get(self.cursor) else {
            return;
        };
        if self.session.increment_frame(inputs).is_some() {
            self.cursor += 1;
        }
        if self.is_finished() {
            if self.matches_recording() {
                info!(frames = self.cursor, "replay finished, stats match the recording");
            } else {
                warn!(frames = self.cursor, "replay finished, stats differ from the recording");
            }
        }
    }

    fn apply_speed(&self, runtime: &mut Runtime) {
        let rate = f64::from(self.session.fps()) * self.speed;
        runtime.set_timestep(Some(Timestep::new(rate)));
        runtime.set_render_mode(RenderMode::throttled_from_rate(rate.min(60.0)));
    }

    fn change_speed(&mut self, runtime: &mut Runtime, faster: bool) {
        let current = SPEEDS
            .iter()
            .position(|s| *s >= self.speed)
            .unwrap_or(SPEEDS.len() - 1);
        let next = if faster {
            (current + 1).min(SPEEDS.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.speed = SPEEDS[next];
        self.apply_speed(runtime);
    }
}

impl Scene for ReplayScene {
    fn on_enter(&mut self, runtime: &mut Runtime) {
        self.apply_speed(runtime);
        runtime.set_mouse_capture(false);
    }

    fn on_suspend(&mut self, _runtime: &mut Runtime) {}

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> SceneChange {
        let Event::Key(key) = event else {
            return SceneChange::Stay;
        };
        if key.kind != KeyEventKind::Press {
            return SceneChange::Stay;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return SceneChange::Pop,
            KeyCode::Char(' ' | 'p') => {
                if !self.is_finished() {
                    self.session.toggle_pause();
                }
            }
            KeyCode::Char('+' | '=') => self.change_speed(runtime, true),
            KeyCode::Char('-') => self.change_speed(runtime, false),
            _ => {}
        }
        SceneChange::Stay
    }

    fn update(&mut self, _runtime: &mut Runtime) -> SceneChange {
        if self.session.session_state().is_playing() {
            self.step();
        }
        SceneChange::Stay
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let title = format!(
            "REPLAY {}  {}/{}  x{}",
            self.session.config().mode_name.to_uppercase(),
            self.cursor,
            self.inputs.len(),
            self.speed
        );
        let display = SessionDisplay::new(&self.session).title(title);
        frame.render_widget(&display, main_area);

        if self.is_finished() && !self.session.session_state().is_game_over() {
            let viewport = display.viewport(main_area);
            render_popup(viewport.area(), frame.buffer_mut(), "END OF RECORDING", style::PAUSED);
        }

        let help = if self.is_finished() {
            if self.matches_recording() {
                "Replay matches the recording | Esc (Back)"
            } else {
                "Replay differs from the recording | Esc (Back)"
            }
        } else {
            "Space (Pause) | +/- (Speed) | Esc (Back)"
        };
        frame.render_widget(Text::from(help).style(style::HELP).centered(), help_area);
    }
}

#[cfg(test)]
mod tests {
    use lightplane_ai::{Pilot as _, RulePilot};
    use lightplane_engine::{GameMode, GameSeed, Recorder};

    use super::*;

    fn recorded_game() -> SessionRecording {
        let mut config = GameMode::Traditional.preset();
        config.max_frames = Some(240);
        let mut session = GameSession::new(config, GameSeed::from_u64(11)).unwrap();
        let mut pilot = RulePilot::new();
        let mut recorder = Recorder::new();
        while session.session_state().is_playing() {
            let inputs: FrameInputs = std::iter::once(pilot.decide(session.world(), 0)).collect();
            session.increment_frame(&inputs);
            recorder.push(&inputs);
        }
        recorder.finish(&session)
    }

    #[test]
    fn test_replay_reproduces_recorded_stats() {
        let recording = recorded_game();
        let mut runtime = Runtime::new();
        let mut scene = ReplayScene::new(&recording, 1.0).unwrap();
        while !scene.is_finished() {
            assert!(scene.update(&mut runtime).is_stay());
        }
        assert_eq!(scene.session.total_frames(), recording.frame_count());
        assert!(scene.matches_recording());
    }

    #[test]
    fn test_pause_holds_the_cursor() {
        let recording = recorded_game();
        let mut runtime = Runtime::new();
        let mut scene = ReplayScene::new(&recording, 1.0).unwrap();
        scene.update(&mut runtime);
        let space = Event::Key(crossterm::event::KeyEvent::new(
            KeyCode::Char(' '),
            crossterm::event::KeyModifiers::NONE,
        ));
        scene.handle_event(&mut runtime, &space);
        scene.update(&mut runtime);
        scene.update(&mut runtime);
        assert_eq!(scene.cursor, 1);
    }

    #[test]
    fn test_speed_steps_through_presets() {
        let recording = recorded_game();
        let mut runtime = Runtime::new();
        let mut scene = ReplayScene::new(&recording, 1.0).unwrap();
        scene.change_speed(&mut runtime, true);
        assert!((scene.speed - 2.0).abs() < f64::EPSILON);
        scene.change_speed(&mut runtime, false);
        scene.change_speed(&mut runtime, false);
        assert!((scene.speed - 0.5).abs() < f64::EPSILON);
        assert!(runtime.tick_interval().is_some());
    }
}
