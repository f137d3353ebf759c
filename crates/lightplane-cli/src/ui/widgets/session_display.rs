use lightplane_engine::{GameSession, SessionState};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{ArenaDisplay, HudDisplay, Viewport, color, style};

/// Terminal cells are about twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Arena, HUD and pause / game-over popup of one session.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    title: String,
}

impl<'a> SessionDisplay<'a> {
    #[must_use]
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            title: session.config().mode_name.to_uppercase(),
        }
    }

    #[must_use]
    pub fn title<S>(self, title: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            title: title.into(),
            ..self
        }
    }

    /// Where the arena is drawn inside `area`, for mapping mouse positions.
    #[must_use]
    pub fn viewport(&self, area: Rect) -> Viewport {
        let [arena_area, _] = self.layout(area);
        Viewport::new(Block::bordered().inner(arena_area), *self.session.world().bounds())
    }

    fn layout(&self, area: Rect) -> [Rect; 2] {
        let [arena_column, hud_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(HudDisplay::WIDTH),
        ])
        .spacing(1)
        .areas(area);
        let bounds = self.session.world().bounds();
        let aspect = bounds.w / bounds.h * CELL_ASPECT;
        [fit_aspect(arena_column, aspect), hud_area]
    }

    fn border_color(&self) -> Color {
        let effects = self.session.world().effects();
        match self.session.session_state() {
            SessionState::Playing if effects.is_rainbow() => {
                color::PALETTE[effects.rainbow_index()]
            }
            SessionState::Playing if effects.egg_timer() > 0 => color::MAGENTA,
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }
}

/// Largest rectangle centred in `area` whose inner width / height is `aspect`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit_aspect(area: Rect, aspect: f32) -> Rect {
    let width = f32::from(area.width.saturating_sub(2));
    let height = f32::from(area.height.saturating_sub(2));
    let (width, height) = if width > height * aspect {
        (height * aspect, height)
    } else {
        (width, width / aspect)
    };
    area.centered(
        Constraint::Length(width as u16 + 2),
        Constraint::Length(height as u16 + 2),
    )
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let border_style = self.border_color();
        let [arena_area, hud_area] = self.layout(area);

        ArenaDisplay::new(self.session.world())
            .block(
                Block::bordered()
                    .title(Line::from(self.title.as_str()).centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            )
            .render(arena_area, buf);
        HudDisplay::new(self.session)
            .block(
                Block::bordered()
                    .title(Line::from("STATS").centered())
                    .padding(Padding::horizontal(1))
                    .border_style(border_style)
                    .style(style::DEFAULT),
            )
            .render(hud_area, buf);

        let popup = match self.session.session_state() {
            SessionState::Playing => None,
            SessionState::Paused => Some(("PAUSED", style::PAUSED)),
            SessionState::GameOver => Some(("GAME OVER!!", style::GAME_OVER)),
        };
        if let Some((text, style)) = popup {
            render_popup(arena_area, buf, text, style);
        }
    }
}

/// A three-line banner centred over `area`.
pub fn render_popup(area: Rect, buf: &mut Buffer, text: &str, style: Style) {
    let block = Block::new().style(style);
    let text = Text::styled(text, style).centered();
    let area = area.centered(Constraint::Length(area.width.min(24)), Constraint::Length(3));
    let inner = block.inner(area);
    Clear.render(area, buf);
    block.render(area, buf);
    text.render(inner.centered_vertically(Constraint::Length(1)), buf);
}

#[cfg(test)]
mod tests {
    use lightplane_engine::{GameMode, GameSeed};

    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_fit_aspect_keeps_arena_shape() {
        let fitted = fit_aspect(Rect::new(0, 0, 200, 40), 16.0 / 9.0 * 2.0);
        assert_eq!(fitted.height, 40);
        // 38 rows inside the border give 135 columns
        assert_eq!(fitted.width, 137);
        assert!(fitted.x > 0);

        let fitted = fit_aspect(Rect::new(0, 0, 60, 40), 16.0 / 9.0 * 2.0);
        assert_eq!(fitted.width, 60);
        assert!(fitted.height < 40);
    }

    #[test]
    fn test_popup_follows_session_state() {
        let mut session = GameSession::new(GameMode::Dual.preset(), GameSeed::from_u64(0)).unwrap();
        let area = Rect::new(0, 0, 120, 40);

        let mut buf = Buffer::empty(area);
        SessionDisplay::new(&session).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("STATS"));
        assert!(text.contains("P2 Player 2"));
        assert!(!text.contains("PAUSED"));

        session.toggle_pause();
        let mut buf = Buffer::empty(area);
        SessionDisplay::new(&session).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("PAUSED"));
    }

    #[test]
    fn test_viewport_matches_rendered_arena() {
        let session = GameSession::new(GameMode::Traditional.preset(), GameSeed::from_u64(0)).unwrap();
        let area = Rect::new(0, 0, 120, 40);
        let display = SessionDisplay::new(&session);
        let mut buf = Buffer::empty(area);
        (&display).render(area, &mut buf);
        let fighter = display
            .viewport(area)
            .to_cell(session.world().fighters()[0].center())
            .unwrap();
        assert_eq!(buf[fighter].symbol(), ">");
    }
}
