//! Held-key tracking and key names.
//!
//! [`KeyboardState`] turns the raw winit key stream into [`KeyPress`]es,
//! marking every press of a key that is already held as a repeat. Some
//! platforms deliver auto-repeat without setting winit's `repeat` flag, so
//! the flag alone is not trusted.
//!
//! Physical key codes are used so the default bindings sit in the same place
//! on every keyboard layout.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether winit flagged this as a repeat event.
    pub repeat: bool,
}

impl From<&KeyEvent> for RawKeyEvent {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        }
    }
}

/// A key going down, either for the first time or as auto-repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: KeyCode,
    pub repeat: bool,
}

/// Tracks which physical keys are currently held.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Creates a new `KeyboardState` with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a [`RawKeyEvent`] (platform-independent, test-friendly).
    ///
    /// Returns the press for `Pressed` events and `None` for releases and
    /// keys winit could not identify.
    pub fn process_raw(&mut self, event: RawKeyEvent) -> Option<KeyPress> {
        let PhysicalKey::Code(key) = event.key else {
            return None;
        };
        match event.state {
            ElementState::Pressed => {
                let fresh = self.pressed.insert(key);
                Some(KeyPress {
                    key,
                    repeat: event.repeat || !fresh,
                })
            }
            ElementState::Released => {
                self.pressed.remove(&key);
                None
            }
        }
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}

/// Parse a key name as written in the config file.
///
/// Accepts winit's code names (`"KeyC"`, `"ArrowUp"`, `"Escape"`) as well as
/// the short forms `"c"`, `"7"`, `"up"`, `"esc"`, case-insensitively.
pub fn parse_key_name(name: &str) -> Option<KeyCode> {
    let lower = name.trim().to_ascii_lowercase();
    let short = lower.strip_prefix("key").filter(|s| s.len() == 1);
    let short = short.or(lower.strip_prefix("digit").filter(|s| s.len() == 1));
    let bare = short.unwrap_or(lower.as_str());

    if bare.len() == 1 {
        return letter_or_digit(bare.as_bytes()[0]);
    }

    Some(match bare {
        "arrowup" | "up" => KeyCode::ArrowUp,
        "arrowdown" | "down" => KeyCode::ArrowDown,
        "arrowleft" | "left" => KeyCode::ArrowLeft,
        "arrowright" | "right" => KeyCode::ArrowRight,
        "escape" | "esc" => KeyCode::Escape,
        "space" => KeyCode::Space,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "shiftleft" => KeyCode::ShiftLeft,
        "shiftright" => KeyCode::ShiftRight,
        "controlleft" => KeyCode::ControlLeft,
        "controlright" => KeyCode::ControlRight,
        "altleft" => KeyCode::AltLeft,
        "altright" => KeyCode::AltRight,
        "minus" => KeyCode::Minus,
        "equal" => KeyCode::Equal,
        "comma" => KeyCode::Comma,
        "period" => KeyCode::Period,
        "slash" => KeyCode::Slash,
        _ => return None,
    })
}

fn letter_or_digit(c: u8) -> Option<KeyCode> {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA,
        KeyCode::KeyB,
        KeyCode::KeyC,
        KeyCode::KeyD,
        KeyCode::KeyE,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyI,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::KeyM,
        KeyCode::KeyN,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::KeyQ,
        KeyCode::KeyR,
        KeyCode::KeyS,
        KeyCode::KeyT,
        KeyCode::KeyU,
        KeyCode::KeyV,
        KeyCode::KeyW,
        KeyCode::KeyX,
        KeyCode::KeyY,
        KeyCode::KeyZ,
    ];
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    match c {
        b'a'..=b'z' => Some(LETTERS[(c - b'a') as usize]),
        b'0'..=b'9' => Some(DIGITS[(c - b'0') as usize]),
        _ => None,
    }
}
