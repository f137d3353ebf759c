use std::{io, time::Duration};

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, terminal,
};
use ratatui::DefaultTerminal;
use tracing::{debug, warn};

use crate::{
    App, Timestep,
    event::LoopEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Runs an [`App`] in the terminal.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
    mouse_capture: bool,
    mouse_captured: bool,
    keyboard_enhanced: bool,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixed update schedule; `None` stops updates.
    pub fn set_timestep(&mut self, timestep: Option<Timestep>) {
        self.events.set_timestep(timestep);
    }

    #[must_use]
    pub fn tick_interval(&self) -> Option<Duration> {
        self.events.tick_interval()
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Requests mouse events. Applied before the next event is read.
    pub fn set_mouse_capture(&mut self, enabled: bool) {
        self.mouse_capture = enabled;
    }

    /// Whether the terminal reports key releases and repeats.
    ///
    /// Without this, held keys only show up as repeated presses.
    #[must_use]
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Runs `app` until it asks to exit.
    ///
    /// 1. `app.init()`
    /// 2. Loop until `app.should_exit()`:
    ///    - due ticks: `app.update()` once per tick
    ///    - render: `app.draw()`
    ///    - terminal event: `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            self.enable_keyboard_enhancement();
            app.init(&mut self);
            let result = self.drive(app, terminal);
            self.restore_terminal();
            result
        })
    }

    fn drive<A>(&mut self, app: &mut A, terminal: &mut DefaultTerminal) -> io::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            self.sync_mouse_capture()?;
            match self.events.next()? {
                LoopEvent::Ticks(count) => {
                    for _ in 0..count {
                        app.update(self);
                        if app.should_exit() {
                            break;
                        }
                    }
                }
                LoopEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                LoopEvent::Terminal(event) => app.handle_event(self, event),
            }
        }
        Ok(())
    }

    fn enable_keyboard_enhancement(&mut self) {
        match terminal::supports_keyboard_enhancement() {
            Ok(true) => {
                let flags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
                match execute!(io::stdout(), PushKeyboardEnhancementFlags(flags)) {
                    Ok(()) => self.keyboard_enhanced = true,
                    Err(err) => warn!(%err, "failed to enable keyboard enhancement"),
                }
            }
            Ok(false) => debug!("terminal does not report key releases"),
            Err(err) => warn!(%err, "failed to query keyboard enhancement support"),
        }
    }

    fn sync_mouse_capture(&mut self) -> io::Result<()> {
        if self.mouse_capture != self.mouse_captured {
            if self.mouse_capture {
                execute!(io::stdout(), EnableMouseCapture)?;
            } else {
                execute!(io::stdout(), DisableMouseCapture)?;
            }
            self.mouse_captured = self.mouse_capture;
        }
        Ok(())
    }

    fn restore_terminal(&mut self) {
        if self.keyboard_enhanced {
            if let Err(err) = execute!(io::stdout(), PopKeyboardEnhancementFlags) {
                warn!(%err, "failed to restore keyboard mode");
            }
            self.keyboard_enhanced = false;
        }
        self.mouse_capture = false;
        if let Err(err) = self.sync_mouse_capture() {
            warn!(%err, "failed to release the mouse");
        }
    }
}
