use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum LoopEvent {
    /// This many fixed timesteps are due.
    #[from(ignore)]
    Ticks(u32),
    Render,
    Terminal(CrosstermEvent),
}
