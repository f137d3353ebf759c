//! Terminal runtime for LightPlane.
//!
//! [`Runtime`] drives an [`App`] from a crossterm event loop: game logic
//! advances on a fixed [`Timestep`] (with bounded catch-up after a stall),
//! rendering follows a [`RenderMode`], and terminal events are passed
//! through as they arrive. [`SceneStack`] is an [`App`] made of [`Scene`]s
//! that push, pop and switch each other.

pub use self::{
    app::App,
    event_loop::RenderMode,
    runtime::Runtime,
    scene::{Scene, SceneChange, SceneStack},
    timestep::Timestep,
};

mod app;
mod event;
mod event_loop;
mod runtime;
mod scene;
mod timestep;
