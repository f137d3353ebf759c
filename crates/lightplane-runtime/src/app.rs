use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// An application run by [`Runtime::run`].
pub trait App {
    /// Called once before the first event. Configure the timestep and render mode here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles one terminal event (key, mouse, resize, ...).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the application by exactly one fixed timestep.
    ///
    /// After a stall the runtime calls this several times in a row to catch up.
    fn update(&mut self, runtime: &mut Runtime);
}
