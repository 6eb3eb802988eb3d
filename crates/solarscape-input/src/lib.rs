//! Keyboard input: held-key tracking and configurable key-to-command bindings.

pub mod keyboard;
pub mod keymap;

pub use keyboard::{KeyPress, KeyboardState, RawKeyEvent, parse_key_name};
pub use keymap::{KeyMap, KeyMapError, action_name, parse_action};
