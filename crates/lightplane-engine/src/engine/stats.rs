use serde::{Deserialize, Serialize};

/// Per-fighter statistics for one session.
///
/// # Example
///
/// ```
/// use lightplane_engine::PlayerStats;
///
/// let mut stats = PlayerStats::new();
/// stats.record_shot();
/// stats.record_shot();
/// stats.record_hit_landed();
/// stats.record_kill(1);
///
/// assert_eq!(stats.score(), 1);
/// assert_eq!(stats.kills(), 1);
/// assert!((stats.accuracy() - 0.5).abs() < f32::EPSILON);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    score: u64,
    kills: u32,
    deaths: u32,
    shots_fired: u32,
    hits_landed: u32,
    power_ups: u32,
    frames_survived: u64,
}

impl PlayerStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            kills: 0,
            deaths: 0,
            shots_fired: 0,
            hits_landed: 0,
            power_ups: 0,
            frames_survived: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }

    /// Number of hits that cost a life.
    #[must_use]
    pub const fn deaths(&self) -> u32 {
        self.deaths
    }

    #[must_use]
    pub const fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    #[must_use]
    pub const fn hits_landed(&self) -> u32 {
        self.hits_landed
    }

    #[must_use]
    pub const fn power_ups(&self) -> u32 {
        self.power_ups
    }

    #[must_use]
    pub const fn frames_survived(&self) -> u64 {
        self.frames_survived
    }

    /// Fraction of fired bullets that hit an enemy (0 when nothing was fired).
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.hits_landed as f32 / self.shots_fired as f32
        }
    }

    pub fn record_shot(&mut self) {
        self.shots_fired = self.shots_fired.saturating_add(1);
    }

    pub fn record_hit_landed(&mut self) {
        self.hits_landed = self.hits_landed.saturating_add(1);
    }

    pub fn record_kill(&mut self, points: u64) {
        self.kills = self.kills.saturating_add(1);
        self.score = self.score.saturating_add(points);
    }

    pub fn record_death(&mut self) {
        self.deaths = self.deaths.saturating_add(1);
    }

    pub fn record_power_up(&mut self) {
        self.power_ups = self.power_ups.saturating_add(1);
    }

    pub fn record_frame_survived(&mut self) {
        self.frames_survived = self.frames_survived.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_without_shots_is_zero() {
        let stats = PlayerStats::new();
        assert!(stats.accuracy().abs() < f32::EPSILON);
    }

    #[test]
    fn test_hits_landed_without_kills() {
        let mut stats = PlayerStats::new();
        for _ in 0..4 {
            stats.record_shot();
        }
        stats.record_hit_landed();
        assert_eq!(stats.kills(), 0);
        assert_eq!(stats.score(), 0);
        assert!((stats.accuracy() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_record_kill_accumulates_points() {
        let mut stats = PlayerStats::new();
        stats.record_kill(5);
        stats.record_kill(5);
        assert_eq!(stats.score(), 10);
        assert_eq!(stats.kills(), 2);
    }
}
