use std::{cell::Cell, fmt, rc::Rc};

use crossterm::event::{Event, KeyCode, KeyEventKind};
use lightplane_ai::{Pilot, pilot_for};
use lightplane_engine::{
    ConfigError, ControlScheme, Fighter, FrameInputs, GameSeed, GameSession, PilotKind, Recorder,
    SessionState, Vec2,
};
use lightplane_runtime::{RenderMode, Runtime, Scene, SceneChange, Timestep};
use rand::Rng as _;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};
use tracing::{debug, info};

use crate::{
    command::play::{
        GameSetup,
        controls::{HOLD_MILLIS, HeldKeys, MouseState},
        screens::GameOverScene,
    },
    ui::widgets::{SessionDisplay, Viewport, style},
};

/// Who produces the input of one fighter.
enum Controller {
    Human(ControlScheme),
    Ai(Box<dyn Pilot>),
}

impl Controller {
    fn uses_mouse(&self) -> bool {
        matches!(self, Controller::Human(ControlScheme::Mouse))
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Controller::Human(scheme) => f.debug_tuple("Human").field(scheme).finish(),
            Controller::Ai(pilot) => f.debug_tuple("Ai").field(&pilot.name()).finish(),
        }
    }
}

/// A running game: reads the controls, advances the session once per tick
/// and draws the arena.
#[derive(Debug)]
pub(crate) struct GameScene {
    setup: Rc<GameSetup>,
    session: GameSession,
    controllers: Vec<Controller>,
    keys: HeldKeys,
    mouse: MouseState,
    recorder: Option<Recorder>,
    /// Where the arena was last drawn, for mapping the mouse pointer.
    viewport: Cell<Option<Viewport>>,
}

impl GameScene {
    pub(crate) fn new(setup: Rc<GameSetup>, seed: GameSeed) -> Result<Self, ConfigError> {
        let session = GameSession::new(setup.config.clone(), seed)?;
        Ok(Self::with_session(setup, session))
    }

    /// A new game with the rules of `previous` and a fresh random seed.
    pub(crate) fn restart(setup: Rc<GameSetup>, previous: &GameSession) -> Self {
        let session = previous.restart(rand::rng().random());
        Self::with_session(setup, session)
    }

    fn with_session(setup: Rc<GameSetup>, session: GameSession) -> Self {
        let seed = session.seed();
        let controllers = session
            .config()
            .players
            .iter()
            .map(|player| match player.pilot {
                PilotKind::Human { controls } => Controller::Human(controls),
                PilotKind::Ai { controller } => {
                    Controller::Ai(pilot_for(controller, seed, setup.strategy))
                }
            })
            .collect();
        let hold_frames = session.config().frames_for_millis(HOLD_MILLIS);
        Self {
            recorder: setup.recordings.is_some().then(Recorder::new),
            setup,
            session,
            controllers,
            keys: HeldKeys::new(hold_frames),
            mouse: MouseState::default(),
            viewport: Cell::new(None),
        }
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &GameSession {
        &self.session
    }

    fn frame_inputs(&mut self) -> FrameInputs {
        let world = self.session.world();
        let pointer = self
            .viewport
            .get()
            .zip(self.mouse.position())
            .and_then(|(viewport, (column, row))| viewport.to_arena(column, row));
        let keys = &self.keys;
        let mouse = &self.mouse;
        self.controllers
            .iter_mut()
            .enumerate()
            .map(|(slot, controller)| match controller {
                Controller::Human(scheme) => keys.input_for(*scheme).unwrap_or_else(|| {
                    let from = world.fighter(slot).map_or(Vec2::ZERO, Fighter::center);
                    mouse.input_toward(from, pointer)
                }),
                Controller::Ai(pilot) => pilot.decide(world, slot),
            })
            .collect()
    }

    /// The easter egg belongs to the first human pilot, or to slot 0 in AI-only games.
    fn trigger_easter_egg(&mut self) {
        let slot = self
            .controllers
            .iter()
            .position(|c| matches!(c, Controller::Human(_)))
            .unwrap_or(0);
        if self.session.world_mut().trigger_easter_egg(slot).is_none() {
            debug!(slot, "easter egg not available");
        }
    }

    fn help_text(&self) -> &'static str {
        match self.session.session_state() {
            SessionState::Playing => {
                "Controls: ←↑↓→ + Space (P1) | WASD + F (P2) | P (Pause) | E (Secret) | Esc (Back)"
            }
            SessionState::Paused => "Controls: P (Resume) | Esc (Back)",
            SessionState::GameOver => "Controls: Esc (Back)",
        }
    }
}

impl Scene for GameScene {
    fn on_enter(&mut self, runtime: &mut Runtime) {
        let fps = f64::from(self.session.fps());
        runtime.set_timestep(Some(Timestep::new(fps)));
        runtime.set_render_mode(RenderMode::throttled_from_rate(fps));
        runtime.set_mouse_capture(self.controllers.iter().any(Controller::uses_mouse));
        self.keys.clear();
    }

    fn on_suspend(&mut self, _runtime: &mut Runtime) {
        self.keys.clear();
    }

    fn on_close(&mut self, runtime: &mut Runtime) {
        runtime.set_mouse_capture(false);
        let Some(sink) = &self.setup.recordings else {
            return;
        };
        if let Some(recorder) = self.recorder.take() {
            if recorder.runs() > 0 {
                sink.borrow_mut().push(recorder.finish(&self.session));
            }
        }
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> SceneChange {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return SceneChange::Pop,
                KeyCode::Char('p') => {
                    self.session.toggle_pause();
                    self.keys.clear();
                }
                KeyCode::Char('e') => self.trigger_easter_egg(),
                _ => self.keys.handle_key(key, runtime.keyboard_enhanced()),
            },
            Event::Key(key) => self.keys.handle_key(key, runtime.keyboard_enhanced()),
            Event::Mouse(mouse) => self.mouse.handle_mouse(mouse),
            Event::FocusLost => self.keys.clear(),
            _ => {}
        }
        SceneChange::Stay
    }

    fn update(&mut self, _runtime: &mut Runtime) -> SceneChange {
        if self.session.session_state().is_playing() {
            let inputs = self.frame_inputs();
            if self.session.increment_frame(&inputs).is_some() {
                if let Some(recorder) = &mut self.recorder {
                    recorder.push(&inputs);
                }
            }
        }
        self.keys.tick();

        if self.session.session_state().is_game_over() {
            info!(
                mode = %self.session.config().mode_name,
                frames = self.session.total_frames(),
                score = self.session.total_score(),
                "game over"
            );
            let results = GameOverScene::new(Rc::clone(&self.setup), self.session.clone());
            return SceneChange::Switch(Box::new(results));
        }
        SceneChange::Stay
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let mut title = self.session.config().mode_name.to_uppercase();
        if self.recorder.is_some() {
            title.push_str(" ● REC");
        }
        let display = SessionDisplay::new(&self.session).title(title);
        self.viewport.set(Some(display.viewport(main_area)));

        let help = Text::from(self.help_text()).style(style::HELP).centered();
        frame.render_widget(&display, main_area);
        frame.render_widget(help, help_area);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crossterm::event::{KeyEvent, KeyModifiers};
    use lightplane_ai::Strategy;
    use lightplane_engine::GameMode;

    use super::*;
    use crate::command::play::RecordingSink;

    fn setup(mode: GameMode, max_frames: u64, recordings: Option<RecordingSink>) -> Rc<GameSetup> {
        let mut config = mode.preset();
        config.max_frames = Some(max_frames);
        Rc::new(GameSetup {
            config,
            strategy: Strategy::BALANCED,
            recordings,
        })
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_ai_game_runs_to_results_and_is_recorded() {
        let sink = RecordingSink::default();
        let mut runtime = Runtime::new();
        let mut scene =
            GameScene::new(setup(GameMode::AiDuel, 20, Some(Rc::clone(&sink))), GameSeed::from_u64(1))
                .unwrap();
        scene.on_enter(&mut runtime);

        let mut change = SceneChange::Stay;
        for _ in 0..20 {
            change = scene.update(&mut runtime);
        }
        assert!(change.is_switch());
        assert_eq!(scene.session().total_frames(), 20);

        scene.on_close(&mut runtime);
        let recordings = sink.borrow();
        assert_eq!(recordings.len(), 1);
        assert_eq!(recordings[0].frame_count(), 20);
    }

    #[test]
    fn test_pause_freezes_game() {
        let mut runtime = Runtime::new();
        let mut scene =
            GameScene::new(setup(GameMode::Traditional, 100, None), GameSeed::from_u64(2)).unwrap();
        scene.update(&mut runtime);
        assert!(scene.handle_event(&mut runtime, &press(KeyCode::Char('p'))).is_stay());
        for _ in 0..5 {
            scene.update(&mut runtime);
        }
        assert_eq!(scene.session().total_frames(), 1);
        assert!(scene.session().session_state().is_paused());
    }

    #[test]
    fn test_escape_leaves_and_abandoned_game_is_recorded() {
        let sink: RecordingSink = Rc::new(RefCell::new(vec![]));
        let mut runtime = Runtime::new();
        let mut scene = GameScene::new(
            setup(GameMode::Traditional, 100, Some(Rc::clone(&sink))),
            GameSeed::from_u64(3),
        )
        .unwrap();
        for _ in 0..3 {
            scene.update(&mut runtime);
        }
        assert!(scene.handle_event(&mut runtime, &press(KeyCode::Esc)).is_pop());
        scene.on_close(&mut runtime);
        assert_eq!(sink.borrow()[0].frame_count(), 3);
    }

    #[test]
    fn test_arrow_keys_move_first_fighter() {
        let mut runtime = Runtime::new();
        let mut scene =
            GameScene::new(setup(GameMode::Traditional, 100, None), GameSeed::from_u64(4)).unwrap();
        let start = scene.session().world().fighters()[0].center();
        scene.handle_event(&mut runtime, &press(KeyCode::Down));
        scene.update(&mut runtime);
        let moved = scene.session().world().fighters()[0].center();
        assert!(moved.y > start.y);
        assert!((moved.x - start.x).abs() < f32::EPSILON);
    }
}
