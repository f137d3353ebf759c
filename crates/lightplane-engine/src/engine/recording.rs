use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, FrameEvents, FrameInputs, GameConfig, GameSeed, GameSession, PlayerStats};

/// One run of identical consecutive frame inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedInputs {
    pub inputs: FrameInputs,
    pub repeat: u32,
}

/// Everything needed to replay a session: seed, config and per-frame inputs.
///
/// The world is deterministic, so replaying the inputs against a world built
/// from the same seed and config reproduces the recorded game exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecording {
    pub recorded_at: DateTime<Utc>,
    pub seed: GameSeed,
    pub config: GameConfig,
    pub frames: Vec<RecordedInputs>,
    pub final_stats: Vec<PlayerStats>,
}

impl SessionRecording {
    /// Total number of recorded frames.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames.iter().map(|run| u64::from(run.repeat)).sum()
    }

    /// Expands the run-length encoded frames.
    pub fn inputs(&self) -> impl Iterator<Item = &FrameInputs> + '_ {
        self.frames
            .iter()
            .flat_map(|run| std::iter::repeat_n(&run.inputs, run.repeat as usize))
    }

    /// Starts a fresh session from the recorded seed and config.
    pub fn new_session(&self) -> Result<GameSession, ConfigError> {
        GameSession::new(self.config.clone(), self.seed)
    }
}

/// Accumulates frame inputs, collapsing repeats.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    frames: Vec<RecordedInputs>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, inputs: &FrameInputs) {
        if let Some(last) = self.frames.last_mut() {
            if last.inputs == *inputs && last.repeat < u32::MAX {
                last.repeat += 1;
                return;
            }
        }
        self.frames.push(RecordedInputs {
            inputs: inputs.clone(),
            repeat: 1,
        });
    }

    #[must_use]
    pub fn runs(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn finish(self, session: &GameSession) -> SessionRecording {
        SessionRecording {
            recorded_at: Utc::now(),
            seed: session.seed(),
            config: session.config().clone(),
            frames: self.frames,
            final_stats: session.player_stats().cloned().collect(),
        }
    }
}

/// A [`GameSession`] that records the inputs of every frame it plays.
///
/// `DerefMut` is not implemented: frames must advance through
/// [`RecordingSession::increment_frame`] or they would not be recorded.
#[derive(Debug)]
pub struct RecordingSession {
    session: GameSession,
    recorder: Recorder,
}

impl Deref for RecordingSession {
    type Target = GameSession;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl RecordingSession {
    #[must_use]
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            recorder: Recorder::new(),
        }
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn trigger_easter_egg(&mut self, slot: crate::PlayerSlot) {
        self.session.world_mut().trigger_easter_egg(slot);
    }

    /// Advances one frame and records `inputs` if the frame was played.
    pub fn increment_frame(&mut self, inputs: &FrameInputs) -> Option<FrameEvents> {
        let events = self.session.increment_frame(inputs)?;
        self.recorder.push(inputs);
        Some(events)
    }

    #[must_use]
    pub fn into_recording(self) -> SessionRecording {
        self.recorder.finish(&self.session)
    }
}

#[cfg(test)]
mod tests {
    use crate::{GameMode, PlayerInput, Vec2};

    use super::*;

    fn moving(dx: f32) -> FrameInputs {
        std::iter::once(PlayerInput::new(Vec2::new(dx, 0.0), true)).collect()
    }

    #[test]
    fn test_recorder_collapses_repeats() {
        let mut recorder = Recorder::new();
        for _ in 0..5 {
            recorder.push(&moving(1.0));
        }
        recorder.push(&moving(-1.0));
        recorder.push(&moving(1.0));
        assert_eq!(recorder.runs(), 3);

        let session =
            GameSession::new(GameMode::Traditional.preset(), GameSeed::from_u64(0)).unwrap();
        let recording = recorder.finish(&session);
        assert_eq!(recording.frame_count(), 7);
        let expanded: Vec<_> = recording.inputs().cloned().collect();
        assert_eq!(expanded.len(), 7);
        assert_eq!(expanded[4], moving(1.0));
        assert_eq!(expanded[5], moving(-1.0));
    }

    #[test]
    fn test_replay_reproduces_stats() {
        let mut config = GameMode::EasterEgg.preset();
        config.max_frames = Some(900);
        let session = GameSession::new(config, GameSeed::from_u64(42)).unwrap();
        let mut recording = RecordingSession::new(session);

        let mut frame = 0u32;
        while recording.session_state().is_playing() {
            let dy = if (frame / 45) % 2 == 0 { 1.0 } else { -1.0 };
            let inputs: FrameInputs =
                std::iter::once(PlayerInput::new(Vec2::new(0.0, dy), true)).collect();
            recording.increment_frame(&inputs);
            frame += 1;
        }
        let recording = recording.into_recording();

        let json = serde_json::to_string(&recording).unwrap();
        let loaded: SessionRecording = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.seed, recording.seed);
        assert_eq!(loaded.frames.len(), recording.frames.len());

        let mut replay = recording.new_session().unwrap();
        for inputs in recording.inputs() {
            replay.increment_frame(inputs);
        }
        let replayed: Vec<_> = replay.player_stats().cloned().collect();
        assert_eq!(replayed, recording.final_stats);
        assert_eq!(replay.total_frames(), recording.frame_count());
    }

    #[test]
    fn test_paused_frames_are_not_recorded() {
        let session =
            GameSession::new(GameMode::Traditional.preset(), GameSeed::from_u64(3)).unwrap();
        let mut recording = RecordingSession::new(session);
        recording.increment_frame(&FrameInputs::idle(1));
        recording.toggle_pause();
        recording.increment_frame(&FrameInputs::idle(1));
        assert_eq!(recording.into_recording().frame_count(), 1);
    }
}
