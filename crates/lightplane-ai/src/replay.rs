use lightplane_engine::{PlayerInput, PlayerSlot, SessionRecording, World};

/// Plays back the recorded inputs of one fighter, then idles.
#[derive(Debug, Clone)]
pub struct ReplayPilot {
    inputs: Vec<PlayerInput>,
    cursor: usize,
}

impl ReplayPilot {
    #[must_use]
    pub fn new(inputs: Vec<PlayerInput>) -> Self {
        Self { inputs, cursor: 0 }
    }

    #[must_use]
    pub fn from_recording(recording: &SessionRecording, slot: PlayerSlot) -> Self {
        Self::new(recording.inputs().map(|frame| frame.get(slot)).collect())
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.inputs.len() - self.cursor
    }
}

impl crate::Pilot for ReplayPilot {
    fn name(&self) -> &str {
        "replay"
    }

    fn decide(&mut self, _world: &World, _slot: PlayerSlot) -> PlayerInput {
        let input = self
            .inputs
            .get(self.cursor)
            .copied()
            .unwrap_or(PlayerInput::IDLE);
        self.cursor = (self.cursor + 1).min(self.inputs.len());
        input
    }
}
