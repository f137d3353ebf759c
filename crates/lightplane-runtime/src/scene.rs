use std::fmt;

use crossterm::event::Event;
use ratatui::Frame;
use tracing::debug;

use crate::{App, Runtime};

/// One screen of the application: a menu, a running game, a results page.
///
/// # Lifecycle
///
/// ```text
/// on_enter()  ← pushed, switched in, or uncovered by a Pop
///   ↓
/// (foreground: handle_event / update / draw)
///   ↓
/// on_suspend() ← another scene is pushed on top; on_enter() follows when it pops
///   or
/// on_close()   ← popped, switched out, or quitting
/// ```
///
/// Scenes set their [`Runtime`] options (timestep, render mode, mouse
/// capture) in [`Scene::on_enter`], since the previous scene may have
/// changed them.
///
/// ```rust
/// use crossterm::event::Event;
/// use lightplane_runtime::{RenderMode, Runtime, Scene, SceneChange, Timestep};
/// use ratatui::Frame;
///
/// #[derive(Debug)]
/// struct Title;
///
/// impl Scene for Title {
///     fn on_enter(&mut self, runtime: &mut Runtime) {
///         runtime.set_timestep(None);
///         runtime.set_render_mode(RenderMode::OnDirty);
///     }
///     fn on_suspend(&mut self, _runtime: &mut Runtime) {}
///     fn on_close(&mut self, _runtime: &mut Runtime) {}
///
///     fn handle_event(&mut self, _runtime: &mut Runtime, _event: &Event) -> SceneChange {
///         SceneChange::Quit
///     }
///     fn update(&mut self, _runtime: &mut Runtime) -> SceneChange {
///         SceneChange::Stay
///     }
///     fn draw(&self, _frame: &mut Frame) {}
/// }
/// ```
pub trait Scene: fmt::Debug {
    fn on_enter(&mut self, runtime: &mut Runtime);

    /// The scene stays on the stack under a newly pushed one.
    fn on_suspend(&mut self, runtime: &mut Runtime);

    /// The scene is leaving the stack for good.
    fn on_close(&mut self, runtime: &mut Runtime);

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> SceneChange;

    /// Called once per fixed timestep.
    fn update(&mut self, runtime: &mut Runtime) -> SceneChange;

    fn draw(&self, frame: &mut Frame);
}

/// What the stack should do after an event or update.
#[derive(Debug, derive_more::IsVariant)]
pub enum SceneChange {
    Stay,
    /// Suspend the current scene and enter a new one on top.
    Push(Box<dyn Scene>),
    /// Close the current scene and re-enter the one below.
    Pop,
    /// Close the current scene and enter a new one in its place.
    Switch(Box<dyn Scene>),
    /// Close every scene, top first, and exit.
    Quit,
}

/// An [`App`] made of stacked scenes; only the top one is active.
#[derive(Debug)]
pub struct SceneStack {
    scenes: Vec<Box<dyn Scene>>,
    quit: bool,
}

impl SceneStack {
    #[must_use]
    pub fn new(initial: Box<dyn Scene>) -> Self {
        Self {
            scenes: vec![initial],
            quit: false,
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.scenes.len()
    }

    fn apply(&mut self, runtime: &mut Runtime, change: SceneChange) {
        match change {
            SceneChange::Stay => {}
            SceneChange::Push(mut scene) => {
                if let Some(top) = self.scenes.last_mut() {
                    top.on_suspend(runtime);
                }
                scene.on_enter(runtime);
                self.scenes.push(scene);
                debug!(depth = self.scenes.len(), "scene pushed");
            }
            SceneChange::Pop => {
                if let Some(mut top) = self.scenes.pop() {
                    top.on_close(runtime);
                }
                if let Some(below) = self.scenes.last_mut() {
                    below.on_enter(runtime);
                }
                debug!(depth = self.scenes.len(), "scene popped");
            }
            SceneChange::Switch(mut scene) => {
                if let Some(mut top) = self.scenes.pop() {
                    top.on_close(runtime);
                }
                scene.on_enter(runtime);
                self.scenes.push(scene);
                debug!(depth = self.scenes.len(), "scene switched");
            }
            SceneChange::Quit => {
                while let Some(mut scene) = self.scenes.pop() {
                    scene.on_close(runtime);
                }
                self.quit = true;
            }
        }
    }
}

impl App for SceneStack {
    fn init(&mut self, runtime: &mut Runtime) {
        if let Some(top) = self.scenes.last_mut() {
            top.on_enter(runtime);
        }
    }

    fn should_exit(&self) -> bool {
        self.quit || self.scenes.is_empty()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(top) = self.scenes.last_mut() {
            let change = top.handle_event(runtime, &event);
            self.apply(runtime, change);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(top) = self.scenes.last() {
            top.draw(frame);
        }
    }

    fn update(&mut self, runtime: &mut Runtime) {
        if let Some(top) = self.scenes.last_mut() {
            let change = top.update(runtime);
            self.apply(runtime, change);
        }
    }
}
