use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::{
    Timestep,
    event::LoopEvent,
    timestep::TickClock,
};

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Redraw at a fixed interval, changed or not.
    Interval(Duration),
    /// Redraw after every tick batch or terminal event.
    #[default]
    OnDirty,
    /// Like [`RenderMode::OnDirty`], but at most once per interval.
    Throttled(Duration),
}

impl RenderMode {
    #[must_use]
    pub fn interval_from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }

    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Decides what happens next: due ticks first, then a render, then terminal input.
#[derive(Debug)]
pub(super) struct EventLoop {
    clock: Option<TickClock>,
    render_mode: RenderMode,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        let now = Instant::now();
        Self {
            clock: None,
            render_mode: RenderMode::default(),
            last_render: now.checked_sub(Duration::from_secs(3600)).unwrap_or(now),
            dirty: true,
        }
    }

    /// Replaces the update schedule. The new clock starts counting now.
    pub(super) fn set_timestep(&mut self, timestep: Option<Timestep>) {
        self.clock = timestep.map(|ts| TickClock::new(ts, Instant::now()));
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    pub(super) fn tick_interval(&self) -> Option<Duration> {
        self.clock.as_ref().map(TickClock::interval)
    }

    /// Blocks until ticks are due, a render is due or a terminal event arrives.
    pub(super) fn next(&mut self) -> io::Result<LoopEvent> {
        loop {
            let now = Instant::now();
            if let Some(clock) = &mut self.clock {
                let due = clock.take_due(now);
                if due > 0 {
                    self.dirty = true;
                    return Ok(LoopEvent::Ticks(due));
                }
            }

            let render = match self.render_mode {
                RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
                RenderMode::OnDirty => self.dirty,
                RenderMode::Throttled(interval) => {
                    self.dirty && now.duration_since(self.last_render) >= interval
                }
            };
            if render {
                self.last_render = now;
                self.dirty = false;
                return Ok(LoopEvent::Render);
            }

            if let Some(timeout) = self.timeout(now) {
                if !event::poll(timeout)? {
                    continue;
                }
            }
            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick = self.clock.as_ref().map(TickClock::next_tick);
        let next_render = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let wake_at = [next_tick, next_render].into_iter().flatten().min()?;
        Some(wake_at.saturating_duration_since(now))
    }
}
