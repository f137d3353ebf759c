use lightplane_engine::{BulletOwner, Rect as ArenaRect, Vec2, World};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    widgets::{Block, Widget},
};

use crate::ui::widgets::{color, style};

const STAR_COUNT: u16 = 48;
/// Stars scroll at half the speed of the arena.
const STAR_PARALLAX: f32 = 0.5;

/// Maps arena coordinates onto a rectangle of terminal cells and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    area: Rect,
    bounds: ArenaRect,
}

impl Viewport {
    #[must_use]
    pub fn new(area: Rect, bounds: ArenaRect) -> Self {
        Self { area, bounds }
    }

    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Cell containing `point`, or `None` when it lies outside the arena.
    #[must_use]
    pub fn to_cell(&self, point: Vec2) -> Option<Position> {
        let column = span_start(point.x - self.bounds.left(), self.bounds.w, self.area.width)?;
        let row = span_start(point.y - self.bounds.top(), self.bounds.h, self.area.height)?;
        Some(Position::new(self.area.x + column, self.area.y + row))
    }

    /// Arena point at the centre of a terminal cell.
    #[must_use]
    pub fn to_arena(&self, column: u16, row: u16) -> Option<Vec2> {
        if !self.area.contains(Position::new(column, row)) {
            return None;
        }
        let fx = (f32::from(column - self.area.x) + 0.5) / f32::from(self.area.width);
        let fy = (f32::from(row - self.area.y) + 0.5) / f32::from(self.area.height);
        Some(Vec2::new(
            self.bounds.left() + fx * self.bounds.w,
            self.bounds.top() + fy * self.bounds.h,
        ))
    }

    /// Every cell `rect` touches, clipped to the viewport.
    fn cells(&self, rect: &ArenaRect) -> impl Iterator<Item = Position> + use<> {
        let columns = span(
            rect.left() - self.bounds.left(),
            rect.right() - self.bounds.left(),
            self.bounds.w,
            self.area.width,
        );
        let rows = span(
            rect.top() - self.bounds.top(),
            rect.bottom() - self.bounds.top(),
            self.bounds.h,
            self.area.height,
        );
        let (x0, y0) = (self.area.x, self.area.y);
        columns
            .zip(rows)
            .into_iter()
            .flat_map(move |((c0, c1), (r0, r1))| {
                (r0..=r1).flat_map(move |r| (c0..=c1).map(move |c| Position::new(x0 + c, y0 + r)))
            })
    }
}

/// Cell index of `offset` along an axis of `extent` arena units and `cells` cells.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn span_start(offset: f32, extent: f32, cells: u16) -> Option<u16> {
    let ratio = offset / extent;
    if cells == 0 || !(0.0..1.0).contains(&ratio) {
        return None;
    }
    Some(((ratio * f32::from(cells)) as u16).min(cells - 1))
}

/// First and last cell covered by `start..end`, or `None` if none is.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn span(start: f32, end: f32, extent: f32, cells: u16) -> Option<(u16, u16)> {
    if cells == 0 || end <= 0.0 || start >= extent {
        return None;
    }
    let scale = f32::from(cells) / extent;
    let max = f32::from(cells - 1);
    let first = (start * scale).floor().clamp(0.0, max);
    let last = ((end * scale).ceil() - 1.0).clamp(first, max);
    Some((first as u16, last as u16))
}

fn paint(buf: &mut Buffer, position: Position, symbol: char, style: Style) {
    if let Some(cell) = buf.cell_mut(position) {
        cell.set_char(symbol).set_style(style);
    }
}

/// The playfield: stars, power-ups, enemies, bullets, fighters and particles.
#[derive(Debug)]
pub struct ArenaDisplay<'a> {
    world: &'a World,
    block: Option<Block<'a>>,
}

impl<'a> ArenaDisplay<'a> {
    #[must_use]
    pub fn new(world: &'a World) -> Self {
        Self { world, block: None }
    }

    #[must_use]
    pub fn block(self, block: Block<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn render_stars(&self, viewport: &Viewport, buf: &mut Buffer) {
        let bounds = self.world.bounds();
        let scroll = self.world.scroll_offset() * STAR_PARALLAX;
        for i in 0..STAR_COUNT {
            let i = f32::from(i);
            let x = ((i * 173.0 + 37.0) % bounds.w - scroll).rem_euclid(bounds.w);
            let y = (i * 89.0 + 11.0) % bounds.h;
            let star = Vec2::new(bounds.left() + x, bounds.top() + y);
            if let Some(position) = viewport.to_cell(star) {
                paint(buf, position, '.', style::STAR);
            }
        }
    }

    fn render_entities(&self, viewport: &Viewport, buf: &mut Buffer) {
        let effects = self.world.effects();

        for power_up in self.world.power_ups() {
            for position in viewport.cells(power_up.rect()) {
                paint(buf, position, power_up.kind().symbol(), style::POWER_UP);
            }
        }
        for enemy in self.world.enemies() {
            let symbol = if enemy.hp() > 1 { '#' } else { '<' };
            for position in viewport.cells(enemy.rect()) {
                paint(buf, position, symbol, style::ENEMY);
            }
        }
        for bullet in self.world.bullets() {
            let (symbol, style) = match bullet.owner() {
                BulletOwner::Player(_) => ('-', style::BULLET),
                BulletOwner::Enemy => ('o', style::ENEMY_BULLET),
            };
            if let Some(position) = viewport.to_cell(bullet.center()) {
                paint(buf, position, symbol, style);
            }
        }
        for fighter in self.world.fighters().iter().filter(|f| f.is_alive()) {
            let fg = if effects.is_rainbow() {
                color::PALETTE[(effects.rainbow_index() + fighter.slot()) % color::PALETTE.len()]
            } else {
                color::player(fighter.slot())
            };
            let bg = if fighter.has_shield() {
                color::BLUE
            } else {
                color::BLACK
            };
            for position in viewport.cells(fighter.rect()) {
                paint(buf, position, '>', Style::new().fg(fg).bg(bg));
            }
        }
        for particle in effects.particles() {
            let index = particle.color_index() + effects.rainbow_index();
            let style = Style::new()
                .fg(color::PALETTE[index % color::PALETTE.len()])
                .bg(color::BLACK);
            if let Some(position) = viewport.to_cell(particle.position()) {
                paint(buf, position, '*', style);
            }
        }
    }
}

impl Widget for ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        buf.set_style(inner, style::DEFAULT);
        let viewport = Viewport::new(inner, *self.world.bounds());
        self.render_stars(&viewport, buf);
        self.render_entities(&viewport, buf);
    }
}
