use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use lightplane_engine::{ControlScheme, PlayerInput, Vec2};

/// How long a key counts as held after its last press or repeat, when the
/// terminal cannot report releases.
pub const HOLD_MILLIS: u32 = 150;

/// Mouse-controlled fighters stop this close to the pointer.
const MOUSE_DEAD_ZONE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hold {
    UntilRelease,
    Frames(u32),
}

/// Keys currently held down.
///
/// Terminals with keyboard enhancement report releases, so a key stays held
/// until its release arrives. Other terminals only repeat presses while a key
/// is down; there every press or repeat holds the key for a short window.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: HashMap<KeyCode, Hold>,
    hold_frames: u32,
}

impl HeldKeys {
    #[must_use]
    pub fn new(hold_frames: u32) -> Self {
        Self {
            keys: HashMap::new(),
            hold_frames: hold_frames.max(1),
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent, reports_release: bool) {
        let code = normalize(event.code);
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                let hold = if reports_release {
                    Hold::UntilRelease
                } else {
                    Hold::Frames(self.hold_frames)
                };
                self.keys.insert(code, hold);
            }
            KeyEventKind::Release => {
                self.keys.remove(&code);
            }
        }
    }

    /// Ages the hold windows by one frame.
    pub fn tick(&mut self) {
        self.keys.retain(|_, hold| match hold {
            Hold::UntilRelease => true,
            Hold::Frames(frames) => {
                *frames = frames.saturating_sub(1);
                *frames > 0
            }
        });
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    #[must_use]
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.keys.contains_key(&normalize(code))
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|&code| self.is_held(code))
    }

    /// Input of a keyboard-controlled fighter.
    ///
    /// Returns `None` for [`ControlScheme::Mouse`].
    #[must_use]
    pub fn input_for(&self, scheme: ControlScheme) -> Option<PlayerInput> {
        let bindings = KeyBindings::for_scheme(scheme)?;
        let axis = |negative: KeyCode, positive: KeyCode| {
            match (self.is_held(negative), self.is_held(positive)) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            }
        };
        let direction = Vec2::new(
            axis(bindings.left, bindings.right),
            axis(bindings.up, bindings.down),
        );
        Some(PlayerInput::new(direction, self.any_held(bindings.fire)))
    }
}

/// Letters are matched case-insensitively, so Shift or Caps Lock does not
/// drop them.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        code => code,
    }
}

#[derive(Debug, Clone, Copy)]
struct KeyBindings {
    up: KeyCode,
    down: KeyCode,
    left: KeyCode,
    right: KeyCode,
    fire: &'static [KeyCode],
}

impl KeyBindings {
    const ARROWS: Self = Self {
        up: KeyCode::Up,
        down: KeyCode::Down,
        left: KeyCode::Left,
        right: KeyCode::Right,
        fire: &[KeyCode::Char(' '), KeyCode::Enter],
    };

    const WASD: Self = Self {
        up: KeyCode::Char('w'),
        down: KeyCode::Char('s'),
        left: KeyCode::Char('a'),
        right: KeyCode::Char('d'),
        fire: &[KeyCode::Char('f')],
    };

    fn for_scheme(scheme: ControlScheme) -> Option<Self> {
        match scheme {
            ControlScheme::Arrows => Some(Self::ARROWS),
            ControlScheme::Wasd => Some(Self::WASD),
            ControlScheme::Mouse => None,
        }
    }
}

/// Last known pointer cell and left-button state.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    position: Option<(u16, u16)>,
    pressed: bool,
}

impl MouseState {
    pub fn handle_mouse(&mut self, event: &MouseEvent) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pressed = true,
            MouseEventKind::Up(MouseButton::Left) => self.pressed = false,
            _ => {}
        }
        self.position = Some((event.column, event.row));
    }

    #[must_use]
    pub fn position(&self) -> Option<(u16, u16)> {
        self.position
    }

    /// Input of a mouse-controlled fighter at `from` chasing the pointer at `target`.
    #[must_use]
    pub fn input_toward(&self, from: Vec2, target: Option<Vec2>) -> PlayerInput {
        target
            .map_or(PlayerInput::IDLE, |target| {
                PlayerInput::toward(from, target, MOUSE_DEAD_ZONE, 1.0)
            })
            .with_fire(self.pressed)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, KeyModifiers};

    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_press_holds_for_window_without_release_events() {
        let mut keys = HeldKeys::new(3);
        keys.handle_key(&key(KeyCode::Up, KeyEventKind::Press), false);
        for _ in 0..2 {
            assert!(keys.is_held(KeyCode::Up));
            keys.tick();
        }
        assert!(keys.is_held(KeyCode::Up));
        keys.tick();
        assert!(!keys.is_held(KeyCode::Up));
    }

    #[test]
    fn test_repeat_extends_hold_window() {
        let mut keys = HeldKeys::new(2);
        keys.handle_key(&key(KeyCode::Left, KeyEventKind::Press), false);
        keys.tick();
        keys.handle_key(&key(KeyCode::Left, KeyEventKind::Press), false);
        keys.tick();
        assert!(keys.is_held(KeyCode::Left));
    }

    #[test]
    fn test_release_events_are_honoured() {
        let mut keys = HeldKeys::new(2);
        keys.handle_key(&key(KeyCode::Char('W'), KeyEventKind::Press), true);
        for _ in 0..10 {
            keys.tick();
        }
        assert!(keys.is_held(KeyCode::Char('w')));
        keys.handle_key(&key(KeyCode::Char('w'), KeyEventKind::Release), true);
        assert!(!keys.is_held(KeyCode::Char('w')));
    }

    #[test]
    fn test_schemes_read_their_own_keys() {
        let mut keys = HeldKeys::new(10);
        for code in [KeyCode::Right, KeyCode::Up, KeyCode::Char(' '), KeyCode::Char('a')] {
            keys.handle_key(&key(code, KeyEventKind::Press), false);
        }

        let arrows = keys.input_for(ControlScheme::Arrows).unwrap();
        assert_eq!(arrows.direction, Vec2::new(1.0, -1.0));
        assert!(arrows.fire);

        let wasd = keys.input_for(ControlScheme::Wasd).unwrap();
        assert_eq!(wasd.direction, Vec2::new(-1.0, 0.0));
        assert!(!wasd.fire);

        assert!(keys.input_for(ControlScheme::Mouse).is_none());
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut keys = HeldKeys::new(10);
        keys.handle_key(&key(KeyCode::Left, KeyEventKind::Press), false);
        keys.handle_key(&key(KeyCode::Right, KeyEventKind::Press), false);
        let input = keys.input_for(ControlScheme::Arrows).unwrap();
        assert_eq!(input.direction, Vec2::ZERO);
    }

    #[test]
    fn test_mouse_chases_pointer_and_fires_on_click() {
        let mut mouse = MouseState::default();
        let event = |kind| MouseEvent {
            kind,
            column: 5,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        mouse.handle_mouse(&event(MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(mouse.position(), Some((5, 7)));

        let input = mouse.input_toward(Vec2::ZERO, Some(Vec2::new(100.0, 0.0)));
        assert_eq!(input.direction, Vec2::new(1.0, 0.0));
        assert!(input.fire);

        mouse.handle_mouse(&event(MouseEventKind::Up(MouseButton::Left)));
        let input = mouse.input_toward(Vec2::ZERO, Some(Vec2::new(3.0, 0.0)));
        assert_eq!(input, PlayerInput::IDLE);
    }
}
