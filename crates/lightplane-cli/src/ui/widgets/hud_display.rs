use lightplane_engine::{Fighter, GameSession};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::ui::widgets::{color, style};

/// Session and per-player status shown next to the arena.
#[derive(Debug)]
pub struct HudDisplay<'a> {
    session: &'a GameSession,
    block: Option<Block<'a>>,
}

impl<'a> HudDisplay<'a> {
    pub const WIDTH: u16 = 26;

    #[must_use]
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    #[must_use]
    pub fn block(self, block: Block<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn session_lines(&self) -> Vec<Line<'static>> {
        let world = self.session.world();
        let secs = self.session.duration().as_secs();
        let difficulty = world.difficulty();
        let mut lines = vec![
            Line::from(format!("Mode    {}", self.session.config().mode_name)),
            Line::from(format!("Time    {:02}:{:02}", secs / 60, secs % 60)),
            Line::from(format!("Frame   {}", self.session.total_frames())),
            Line::from(format!("Tick    {:.1} ms", 1000.0 / f64::from(self.session.fps()))),
            Line::from(format!("Level   {:.2}", difficulty.level())),
            Line::from(format!("Enemies {}", world.enemies().len())),
        ];
        let effects = world.effects();
        if effects.egg_level() > 0 {
            let egg_style = if effects.is_rainbow() {
                Style::new().fg(color::PALETTE[effects.rainbow_index()])
            } else {
                Style::new().fg(color::MAGENTA)
            };
            lines.push(Line::styled(format!("Egg     Lv{}", effects.egg_level()), egg_style));
        }
        lines
    }

    fn fighter_lines(&self, fighter: &Fighter) -> Vec<Line<'static>> {
        let slot = fighter.slot();
        let name = self
            .session
            .config()
            .players
            .get(slot)
            .map_or("?", |p| p.name.as_str());
        let stats = fighter.stats();
        let header = Style::new()
            .fg(color::player(slot))
            .add_modifier(Modifier::BOLD);

        let lives = if fighter.is_alive() {
            Span::styled(
                "♥".repeat(fighter.lives() as usize),
                Style::new().fg(color::RED),
            )
        } else {
            Span::styled("DOWN", Style::new().fg(color::GRAY))
        };

        let fps = self.session.fps().max(1);
        let mut boosts = vec![];
        if fighter.has_shield() {
            boosts.push(Span::styled("SHIELD ", Style::new().fg(color::BLUE)));
        }
        if fighter.speed_boost_frames() > 0 {
            let secs = fighter.speed_boost_frames().div_ceil(fps);
            boosts.push(Span::styled(format!("SPD {secs}s "), Style::new().fg(color::GREEN)));
        }
        if fighter.rapid_fire_frames() > 0 {
            let secs = fighter.rapid_fire_frames().div_ceil(fps);
            boosts.push(Span::styled(format!("RPD {secs}s"), Style::new().fg(color::ORANGE)));
        }

        let mut lines = vec![
            Line::styled(format!("P{} {name}", slot + 1), header),
            Line::from(format!("  Score {}", stats.score())),
            Line::from(vec![Span::raw("  Lives "), lives]),
            Line::from(format!(
                "  Kills {}  Acc {:.0}%",
                stats.kills(),
                stats.accuracy() * 100.0
            )),
        ];
        if !boosts.is_empty() {
            boosts.insert(0, Span::raw("  "));
            lines.push(Line::from(boosts));
        }
        lines
    }
}

impl Widget for HudDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &HudDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut lines = self.session_lines();
        for fighter in self.session.world().fighters() {
            lines.push(Line::default());
            lines.extend(self.fighter_lines(fighter));
        }
        let mut paragraph = Paragraph::new(lines).style(style::DEFAULT);
        if let Some(block) = &self.block {
            paragraph = paragraph.block(block.clone());
        }
        paragraph.render(area, buf);
    }
}
