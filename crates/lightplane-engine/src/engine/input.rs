use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{PlayerSlot, Vec2};

/// Maximum number of fighters in one world.
pub const MAX_PLAYERS: usize = 4;

/// Discrete action space used by training environments and simple pilots.
///
/// Indices 0..=7 are the eight movement directions clockwise from up, index 8
/// is fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    Fire,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("action index {index} out of range (0..{})", Action::COUNT)]
pub struct ActionIndexError {
    index: usize,
}

impl Action {
    pub const COUNT: usize = 9;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::DownRight,
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
        Self::Fire,
    ];

    pub fn from_index(index: usize) -> Result<Self, ActionIndexError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ActionIndexError { index })
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit-axis movement for this action (zero for [`Action::Fire`]).
    #[must_use]
    pub const fn direction(self) -> Vec2 {
        let (x, y) = match self {
            Self::Up => (0.0, -1.0),
            Self::UpRight => (1.0, -1.0),
            Self::Right => (1.0, 0.0),
            Self::DownRight => (1.0, 1.0),
            Self::Down => (0.0, 1.0),
            Self::DownLeft => (-1.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::UpLeft => (-1.0, -1.0),
            Self::Fire => (0.0, 0.0),
        };
        Vec2::new(x, y)
    }
}

/// What one fighter wants to do during one frame.
///
/// Each axis of `direction` is in `-1.0..=1.0` and is multiplied by the
/// fighter speed, so an AI can move at partial speed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub direction: Vec2,
    pub fire: bool,
}

impl PlayerInput {
    pub const IDLE: Self = Self {
        direction: Vec2::ZERO,
        fire: false,
    };

    #[must_use]
    pub fn new(direction: Vec2, fire: bool) -> Self {
        Self {
            direction: Vec2::new(direction.x.clamp(-1.0, 1.0), direction.y.clamp(-1.0, 1.0)),
            fire,
        }
    }

    /// Moves from `from` toward `to`, staying idle inside `dead_zone`.
    ///
    /// `throttle` scales the resulting direction (1.0 is full speed).
    #[must_use]
    pub fn toward(from: Vec2, to: Vec2, dead_zone: f32, throttle: f32) -> Self {
        let delta = to - from;
        if delta.length() <= dead_zone {
            return Self::IDLE;
        }
        Self::new(delta.normalized() * throttle, false)
    }

    #[must_use]
    pub fn with_fire(self, fire: bool) -> Self {
        Self { fire, ..self }
    }
}

impl From<Action> for PlayerInput {
    fn from(action: Action) -> Self {
        Self {
            direction: action.direction(),
            fire: action == Action::Fire,
        }
    }
}

/// Inputs for every fighter during one frame, indexed by [`PlayerSlot`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInputs(ArrayVec<PlayerInput, MAX_PLAYERS>);

impl FrameInputs {
    /// Creates idle inputs for `players` fighters.
    #[must_use]
    pub fn idle(players: usize) -> Self {
        Self((0..players.min(MAX_PLAYERS)).map(|_| PlayerInput::IDLE).collect())
    }

    /// Returns the input for `slot`, or idle if the slot has none.
    #[must_use]
    pub fn get(&self, slot: PlayerSlot) -> PlayerInput {
        self.0.get(slot).copied().unwrap_or(PlayerInput::IDLE)
    }

    /// Sets the input for `slot`, growing the list with idle inputs as needed.
    ///
    /// Slots at or beyond [`MAX_PLAYERS`] are ignored.
    pub fn set(&mut self, slot: PlayerSlot, input: PlayerInput) {
        if slot >= MAX_PLAYERS {
            return;
        }
        while self.0.len() <= slot {
            self.0.push(PlayerInput::IDLE);
        }
        self.0[slot] = input;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PlayerInput> for FrameInputs {
    fn from_iter<T: IntoIterator<Item = PlayerInput>>(iter: T) -> Self {
        Self(iter.into_iter().take(MAX_PLAYERS).collect())
    }
}
