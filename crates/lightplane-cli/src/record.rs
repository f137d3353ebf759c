use std::{
    fs::{self, File},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use lightplane_engine::SessionRecording;

/// File name for a recording: mode plus the time it was recorded.
fn recording_file_name(recording: &SessionRecording) -> String {
    let mode: String = recording
        .config
        .mode_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!(
        "{mode}_{}.json",
        recording.recorded_at.format("%Y%m%d_%H%M%S")
    )
}

/// Writes `recording` into `record_dir` and returns the path of the new file.
///
/// A numeric suffix is appended when a file of the same name already exists,
/// so two games finished within the same second are both kept.
pub fn save_recording(recording: &SessionRecording, record_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(record_dir)
        .with_context(|| format!("Failed to create directory {}", record_dir.display()))?;

    let file_name = recording_file_name(recording);
    let mut path = record_dir.join(&file_name);
    let mut suffix = 1;
    while path.exists() {
        let stem = file_name.trim_end_matches(".json");
        path = record_dir.join(format!("{stem}_{suffix}.json"));
        suffix += 1;
    }

    let file = File::create(&path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, recording)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {}", path.display()))?;

    tracing::info!(path = %path.display(), frames = recording.frame_count(), "recording saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use lightplane_engine::{FrameInputs, GameMode, GameSeed, GameSession, RecordingSession};

    use super::*;

    fn short_recording() -> SessionRecording {
        let mut config = GameMode::PlayerVsAi.preset();
        config.max_frames = Some(30);
        let session = GameSession::new(config, GameSeed::from_u64(3)).unwrap();
        let mut session = RecordingSession::new(session);
        while session.session_state().is_playing() {
            session.increment_frame(&FrameInputs::idle(2));
        }
        let mut recording = session.into_recording();
        recording.recorded_at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        recording
    }

    #[test]
    fn test_file_name_uses_mode_and_time() {
        assert_eq!(
            recording_file_name(&short_recording()),
            "player_vs_ai_20240506_070809.json"
        );
    }

    #[test]
    fn test_save_keeps_both_files_of_the_same_second() {
        let dir = std::env::temp_dir().join(format!("lightplane-record-{}", std::process::id()));
        let recording = short_recording();

        let first = save_recording(&recording, &dir).unwrap();
        let second = save_recording(&recording, &dir).unwrap();
        assert_ne!(first, second);

        let loaded: SessionRecording = crate::util::read_recording_file(&second).unwrap();
        assert_eq!(loaded.frame_count(), 30);
        assert_eq!(loaded.final_stats, recording.final_stats);

        fs::remove_dir_all(&dir).unwrap();
    }
}
