use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use lightplane_engine::GameSession;
use lightplane_runtime::{RenderMode, Runtime, Scene, SceneChange};
use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Padding, Paragraph},
};

use crate::{
    command::play::{GameSetup, screens::GameScene},
    ui::widgets::{color, style},
};

/// Final statistics of a finished game.
#[derive(Debug)]
pub(crate) struct GameOverScene {
    setup: Rc<GameSetup>,
    session: GameSession,
}

impl GameOverScene {
    pub(crate) fn new(setup: Rc<GameSetup>, session: GameSession) -> Self {
        Self { setup, session }
    }

    fn lines(&self) -> Vec<Line<'_>> {
        let config = self.session.config();
        let secs = self.session.duration().as_secs();
        let mut lines = vec![
            Line::from(format!(
                "{}  |  {:02}:{:02}  |  {} frames",
                config.mode_name,
                secs / 60,
                secs % 60,
                self.session.total_frames()
            ))
            .centered(),
            Line::default(),
        ];

        if config.players.len() > 1 {
            let winner = match self.session.winner() {
                Some(slot) => format!("Winner: P{} {}", slot + 1, config.players[slot].name),
                None => "Draw".to_owned(),
            };
            lines.push(Line::styled(winner, Style::new().fg(color::YELLOW)).centered());
            lines.push(Line::default());
        }

        lines.push(Line::styled(
            format!(
                "{:<16} {:>7} {:>5} {:>6} {:>5} {:>6}",
                "Pilot", "Score", "Kills", "Deaths", "Acc", "Items"
            ),
            Style::new().add_modifier(Modifier::BOLD),
        ));
        for (slot, (player, stats)) in config
            .players
            .iter()
            .zip(self.session.player_stats())
            .enumerate()
        {
            lines.push(Line::styled(
                format!(
                    "{:<16} {:>7} {:>5} {:>6} {:>4.0}% {:>6}",
                    format!("P{} {}", slot + 1, player.name),
                    stats.score(),
                    stats.kills(),
                    stats.deaths(),
                    stats.accuracy() * 100.0,
                    stats.power_ups(),
                ),
                Style::new().fg(color::player(slot)),
            ));
        }
        lines
    }
}

impl Scene for GameOverScene {
    fn on_enter(&mut self, runtime: &mut Runtime) {
        runtime.set_timestep(None);
        runtime.set_render_mode(RenderMode::OnDirty);
        runtime.set_mouse_capture(false);
    }

    fn on_suspend(&mut self, _runtime: &mut Runtime) {}

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> SceneChange {
        let Event::Key(key) = event else {
            return SceneChange::Stay;
        };
        if key.kind != KeyEventKind::Press {
            return SceneChange::Stay;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => {
                let game = GameScene::restart(Rc::clone(&self.setup), &self.session);
                SceneChange::Switch(Box::new(game))
            }
            KeyCode::Esc | KeyCode::Char('q') => SceneChange::Pop,
            _ => SceneChange::Stay,
        }
    }

    fn update(&mut self, _runtime: &mut Runtime) -> SceneChange {
        SceneChange::Stay
    }

    fn draw(&self, frame: &mut Frame) {
        let lines = self.lines();
        #[expect(clippy::cast_possible_truncation)]
        let height = lines.len() as u16 + 4;
        let area = frame
            .area()
            .centered(Constraint::Max(60), Constraint::Length(height));

        let results = Paragraph::new(lines).style(style::DEFAULT).block(
            Block::bordered()
                .title(Line::from("GAME OVER").centered())
                .title_bottom(Line::from(" Enter (Play again) | Esc (Back) ").centered())
                .border_style(color::RED)
                .padding(Padding::uniform(1)),
        );
        frame.render_widget(results, area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use lightplane_ai::Strategy;
    use lightplane_engine::{GameMode, GameSeed};

    use super::*;

    fn finished_scene() -> GameOverScene {
        let mut config = GameMode::AiDuel.preset();
        config.max_frames = Some(10);
        let mut session = GameSession::new(config.clone(), GameSeed::from_u64(5)).unwrap();
        while session.session_state().is_playing() {
            session.increment_frame(&lightplane_engine::FrameInputs::idle(2));
        }
        let setup = Rc::new(GameSetup {
            config,
            strategy: Strategy::BALANCED,
            recordings: None,
        });
        GameOverScene::new(setup, session)
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_enter_restarts_and_escape_goes_back() {
        let mut runtime = Runtime::new();
        let mut scene = finished_scene();
        assert!(scene.handle_event(&mut runtime, &press(KeyCode::Enter)).is_switch());
        assert!(scene.handle_event(&mut runtime, &press(KeyCode::Esc)).is_pop());
        assert!(scene.handle_event(&mut runtime, &press(KeyCode::Char('x'))).is_stay());
    }

    #[test]
    fn test_results_list_every_pilot() {
        let scene = finished_scene();
        let text: Vec<String> = scene.lines().iter().map(ToString::to_string).collect();
        assert!(text.iter().any(|line| line.starts_with("P1 Patrol AI")));
        assert!(text.iter().any(|line| line.starts_with("P2 Rule AI")));
    }
}
