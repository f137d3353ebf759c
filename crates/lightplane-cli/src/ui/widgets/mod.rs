pub use self::{arena_display::*, hud_display::*, session_display::*};

mod arena_display;
mod hud_display;
mod session_display;

pub mod color {
    use lightplane_engine::{MAX_PLAYERS, PALETTE_LEN};
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const INDIGO: Color = Color::Rgb(75, 0, 130);
    pub const VIOLET: Color = Color::Rgb(148, 0, 211);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(64, 64, 64);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Rainbow used by particles and the easter egg, red through violet.
    pub const PALETTE: [Color; PALETTE_LEN] = [RED, ORANGE, YELLOW, GREEN, BLUE, INDIGO, VIOLET];

    pub const PLAYERS: [Color; MAX_PLAYERS] = [CYAN, ORANGE, GREEN, MAGENTA];

    #[must_use]
    pub fn player(slot: usize) -> Color {
        PLAYERS[slot % PLAYERS.len()]
    }
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const STAR: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const ENEMY: Style = fg_bg(color::RED, color::BLACK);
    pub const BULLET: Style = fg_bg(color::YELLOW, color::BLACK);
    pub const ENEMY_BULLET: Style = fg_bg(color::MAGENTA, color::BLACK);
    pub const POWER_UP: Style = fg_bg(color::BLACK, color::GREEN);
    pub const HELP: Style = fg_bg(color::GRAY, color::BLACK);
    pub const PAUSED: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);
    pub const SELECTED: Style = fg_bg(color::BLACK, color::CYAN);
}
