use serde::{Deserialize, Serialize};

use crate::{PlayerStats, Rect, Vec2};

/// Index of a fighter within a world (0-based).
pub type PlayerSlot = usize;

/// Unique identifier for an enemy within one world.
pub type EnemyId = u64;

/// A plane controlled by a human or an AI pilot.
#[derive(Debug, Clone)]
pub struct Fighter {
    pub(crate) slot: PlayerSlot,
    pub(crate) rect: Rect,
    pub(crate) lives: u32,
    pub(crate) alive: bool,
    pub(crate) fire_cooldown: u32,
    pub(crate) shield: bool,
    pub(crate) speed_boost_frames: u32,
    pub(crate) rapid_fire_frames: u32,
    pub(crate) hit_this_frame: bool,
    pub(crate) stats: PlayerStats,
}

impl Fighter {
    pub(crate) fn new(slot: PlayerSlot, rect: Rect, lives: u32) -> Self {
        Self {
            slot,
            rect,
            lives,
            alive: lives > 0,
            fire_cooldown: 0,
            shield: false,
            speed_boost_frames: 0,
            rapid_fire_frames: 0,
            hit_this_frame: false,
            stats: PlayerStats::new(),
        }
    }

    #[must_use]
    pub fn slot(&self) -> PlayerSlot {
        self.slot
    }

    #[must_use]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn has_shield(&self) -> bool {
        self.shield
    }

    #[must_use]
    pub fn fire_cooldown(&self) -> u32 {
        self.fire_cooldown
    }

    #[must_use]
    pub fn speed_boost_frames(&self) -> u32 {
        self.speed_boost_frames
    }

    #[must_use]
    pub fn rapid_fire_frames(&self) -> u32 {
        self.rapid_fire_frames
    }

    #[must_use]
    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Applies one hit unless this fighter was already hit during the current frame.
    ///
    /// A shield absorbs the hit and is consumed.
    pub(crate) fn take_hit(&mut self) -> HitOutcome {
        if !self.alive || self.hit_this_frame {
            return HitOutcome::Ignored;
        }
        self.hit_this_frame = true;
        if self.shield {
            self.shield = false;
            return HitOutcome::Absorbed;
        }
        self.lives = self.lives.saturating_sub(1);
        self.stats.record_death();
        if self.lives == 0 {
            self.alive = false;
            HitOutcome::Downed
        } else {
            HitOutcome::LifeLost
        }
    }
}

/// What happened to a fighter that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum HitOutcome {
    /// Already hit this frame, or already down.
    Ignored,
    /// The shield took the hit.
    Absorbed,
    LifeLost,
    /// The last life was lost.
    Downed,
}

/// An enemy plane entering from the right edge.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) rect: Rect,
    pub(crate) velocity: Vec2,
    pub(crate) hp: u32,
    pub(crate) alive: bool,
}

impl Enemy {
    #[must_use]
    pub fn id(&self) -> EnemyId {
        self.id
    }

    #[must_use]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[must_use]
    pub fn hp(&self) -> u32 {
        self.hp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BulletOwner {
    Player(PlayerSlot),
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub(crate) rect: Rect,
    pub(crate) velocity: Vec2,
    pub(crate) owner: BulletOwner,
    pub(crate) alive: bool,
}

impl Bullet {
    #[must_use]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[must_use]
    pub fn owner(&self) -> BulletOwner {
        self.owner
    }
}

/// Kinds of pickups a fighter can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// One extra life, up to the configured maximum.
    Health,
    /// Faster movement for a while.
    Speed,
    /// Halved fire cooldown for a while.
    RapidFire,
    /// Absorbs the next hit.
    Shield,
    /// Destroys every enemy on screen.
    Bomb,
}

impl PowerUpKind {
    pub const ALL: [Self; 5] = [
        Self::Health,
        Self::Speed,
        Self::RapidFire,
        Self::Shield,
        Self::Bomb,
    ];

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Health => '+',
            Self::Speed => 'S',
            Self::RapidFire => 'R',
            Self::Shield => 'O',
            Self::Bomb => 'B',
        }
    }
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub(crate) kind: PowerUpKind,
    pub(crate) rect: Rect,
    pub(crate) velocity: Vec2,
    pub(crate) alive: bool,
}

impl PowerUp {
    #[must_use]
    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    #[must_use]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

/// Cosmetic particle. Never collides with anything.
#[derive(Debug, Clone)]
pub struct Particle {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) life: u32,
    pub(crate) color_index: usize,
}

impl Particle {
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn life(&self) -> u32 {
        self.life
    }

    #[must_use]
    pub fn color_index(&self) -> usize {
        self.color_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter(lives: u32) -> Fighter {
        Fighter::new(0, Rect::new(0.0, 0.0, 10.0, 10.0), lives)
    }

    #[test]
    fn test_take_hit_once_per_frame() {
        let mut f = fighter(3);
        assert_eq!(f.take_hit(), HitOutcome::LifeLost);
        assert_eq!(f.take_hit(), HitOutcome::Ignored);
        assert_eq!(f.lives(), 2);
        assert_eq!(f.stats().deaths(), 1);

        f.hit_this_frame = false;
        assert_eq!(f.take_hit(), HitOutcome::LifeLost);
        assert_eq!(f.lives(), 1);
    }

    #[test]
    fn test_last_life_removes_fighter() {
        let mut f = fighter(1);
        assert_eq!(f.take_hit(), HitOutcome::Downed);
        assert_eq!(f.lives(), 0);
        assert!(!f.is_alive());

        f.hit_this_frame = false;
        assert_eq!(f.take_hit(), HitOutcome::Ignored);
        assert_eq!(f.lives(), 0);
    }

    #[test]
    fn test_shield_absorbs_hit() {
        let mut f = fighter(2);
        f.shield = true;
        assert_eq!(f.take_hit(), HitOutcome::Absorbed);
        assert!(!f.has_shield());
        assert_eq!(f.lives(), 2);
        assert_eq!(f.stats().deaths(), 0);
    }
}
