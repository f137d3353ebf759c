use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use lightplane_ai::Strategy;
use lightplane_engine::GameMode;
use lightplane_runtime::{RenderMode, Runtime, Scene, SceneChange};
use rand::Rng as _;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Padding, Paragraph},
};
use tracing::{info, warn};

use crate::{
    command::play::{GameSetup, RecordingSink, screens::GameScene},
    ui::widgets::{color, style},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Mode(GameMode),
    Quit,
}

const ENTRIES: [Entry; 6] = [
    Entry::Mode(GameMode::Traditional),
    Entry::Mode(GameMode::Dual),
    Entry::Mode(GameMode::PlayerVsAi),
    Entry::Mode(GameMode::AiDuel),
    Entry::Mode(GameMode::EasterEgg),
    Entry::Quit,
];

impl Entry {
    fn title(self) -> &'static str {
        match self {
            Entry::Mode(mode) => mode.title(),
            Entry::Quit => "Quit",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Entry::Mode(GameMode::Traditional) => "Fly alone against endless waves",
            Entry::Mode(GameMode::Dual) => "Two players on one keyboard (arrows + WASD)",
            Entry::Mode(GameMode::PlayerVsAi) => "You and an AI wingman, adaptive difficulty",
            Entry::Mode(GameMode::AiDuel) => "Watch two AI pilots compete for score",
            Entry::Mode(GameMode::EasterEgg) => "Faster enemies, particles and a secret (press e)",
            Entry::Mode(GameMode::Custom) => "Game config loaded from a file",
            Entry::Quit => "Leave the game",
        }
    }
}

/// Mode selection menu shown by the `launch` command.
#[derive(Debug)]
pub(crate) struct LauncherScene {
    strategy: Strategy,
    recordings: Option<RecordingSink>,
    selected: usize,
    error: Option<String>,
}

impl LauncherScene {
    pub(crate) fn new(strategy: Strategy, recordings: Option<RecordingSink>) -> Self {
        Self {
            strategy,
            recordings,
            selected: 0,
            error: None,
        }
    }

    fn select_next(&mut self) {
        self.selected = (self.selected + 1) % ENTRIES.len();
    }

    fn select_prev(&mut self) {
        self.selected = (self.selected + ENTRIES.len() - 1) % ENTRIES.len();
    }

    fn activate(&mut self) -> SceneChange {
        let mode = match ENTRIES[self.selected] {
            Entry::Mode(mode) => mode,
            Entry::Quit => return SceneChange::Quit,
        };
        let setup = Rc::new(GameSetup {
            config: mode.preset(),
            strategy: self.strategy,
            recordings: self.recordings.clone(),
        });
        let seed = rand::rng().random();
        match GameScene::new(setup, seed) {
            Ok(game) => {
                info!(%mode, %seed, "starting game");
                self.error = None;
                SceneChange::Push(Box::new(game))
            }
            Err(e) => {
                warn!(%mode, error = %e, "failed to start game");
                self.error = Some(format!("Cannot start {}: {e}", mode.title()));
                SceneChange::Stay
            }
        }
    }
}

impl Scene for LauncherScene {
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
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < ENTRIES.len() {
                    self.selected = index;
                    return self.activate();
                }
            }
            KeyCode::Enter => return self.activate(),
            KeyCode::Esc | KeyCode::Char('q') => return SceneChange::Quit,
            _ => {}
        }
        SceneChange::Stay
    }

    fn update(&mut self, _runtime: &mut Runtime) -> SceneChange {
        SceneChange::Stay
    }

    fn draw(&self, frame: &mut Frame) {
        let mut lines = vec![
            Line::styled("L I G H T P L A N E", Style::new().fg(color::CYAN)).centered(),
            Line::default(),
        ];
        for (i, entry) in ENTRIES.iter().enumerate() {
            let label = format!(" {}. {:<14}", i + 1, entry.title());
            let line = if i == self.selected {
                Line::from(vec![
                    Span::styled(label, style::SELECTED),
                    Span::raw("  "),
                    Span::raw(entry.description()),
                ])
            } else {
                Line::from(Span::styled(label, style::DEFAULT))
            };
            lines.push(line);
        }
        if let Some(error) = &self.error {
            lines.push(Line::default());
            lines.push(Line::styled(error.as_str(), Style::new().fg(color::RED)));
        }

        #[expect(clippy::cast_possible_truncation)]
        let height = lines.len() as u16 + 4;
        let [menu_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let menu_area = menu_area.centered(Constraint::Max(72), Constraint::Length(height));

        let menu = Paragraph::new(lines).style(style::DEFAULT).block(
            Block::bordered()
                .border_style(color::CYAN)
                .padding(Padding::uniform(1)),
        );
        frame.render_widget(menu, menu_area);

        let help = Text::from("↑↓ (Select) | Enter (Start) | 1-6 (Quick select) | Esc (Quit)")
            .style(style::HELP)
            .centered();
        frame.render_widget(help, help_area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_enter_starts_selected_mode() {
        let mut runtime = Runtime::new();
        let mut launcher = LauncherScene::new(Strategy::BALANCED, None);
        assert!(launcher.handle_event(&mut runtime, &press(KeyCode::Enter)).is_push());
        assert!(launcher.error.is_none());
    }

    #[test]
    fn test_selection_wraps_around() {
        let mut runtime = Runtime::new();
        let mut launcher = LauncherScene::new(Strategy::BALANCED, None);
        launcher.handle_event(&mut runtime, &press(KeyCode::Up));
        assert_eq!(ENTRIES[launcher.selected], Entry::Quit);
        assert!(launcher.handle_event(&mut runtime, &press(KeyCode::Enter)).is_quit());
        launcher.handle_event(&mut runtime, &press(KeyCode::Down));
        assert_eq!(launcher.selected, 0);
    }

    #[test]
    fn test_digit_quick_selects() {
        let mut runtime = Runtime::new();
        let mut launcher = LauncherScene::new(Strategy::BALANCED, None);
        assert!(launcher.handle_event(&mut runtime, &press(KeyCode::Char('4'))).is_push());
        assert_eq!(ENTRIES[launcher.selected], Entry::Mode(GameMode::AiDuel));
        assert!(launcher.handle_event(&mut runtime, &press(KeyCode::Char('9'))).is_stay());
    }
}
