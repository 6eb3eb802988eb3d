//! Key-to-command bindings with config overrides.

use std::collections::HashMap;

use solarscape_config::InputConfig;
use solarscape_scene::CameraCommand;
use tracing::{debug, warn};
use winit::keyboard::KeyCode;

use crate::keyboard::{KeyPress, parse_key_name};

/// Errors from applying keybinding overrides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyMapError {
    /// The action name is not one of [`action_name`]'s outputs.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    /// The key name could not be parsed.
    #[error("unknown key `{key}` for action `{action}`")]
    UnknownKey { action: String, key: String },
}

/// Config-file name of a command.
pub fn action_name(command: CameraCommand) -> &'static str {
    match command {
        CameraCommand::Forward => "forward",
        CameraCommand::Back => "back",
        CameraCommand::StrafeLeft => "strafe_left",
        CameraCommand::StrafeRight => "strafe_right",
        CameraCommand::Up => "up",
        CameraCommand::Down => "down",
        CameraCommand::YawLeft => "yaw_left",
        CameraCommand::YawRight => "yaw_right",
        CameraCommand::TiltLeft => "tilt_left",
        CameraCommand::TiltRight => "tilt_right",
        CameraCommand::ToggleRenderMode => "toggle_render_mode",
        CameraCommand::Quit => "quit",
    }
}

/// Inverse of [`action_name`].
pub fn parse_action(name: &str) -> Option<CameraCommand> {
    CameraCommand::ALL
        .into_iter()
        .find(|command| action_name(*command) == name.trim())
}

/// Maps physical keys to camera commands.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMap {
    bindings: HashMap<KeyCode, CameraCommand>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let bindings = [
            (KeyCode::ArrowUp, CameraCommand::Forward),
            (KeyCode::ArrowDown, CameraCommand::Back),
            (KeyCode::ArrowLeft, CameraCommand::StrafeLeft),
            (KeyCode::ArrowRight, CameraCommand::StrafeRight),
            (KeyCode::KeyC, CameraCommand::Up),
            (KeyCode::KeyX, CameraCommand::Down),
            (KeyCode::KeyR, CameraCommand::YawLeft),
            (KeyCode::KeyT, CameraCommand::YawRight),
            (KeyCode::KeyS, CameraCommand::TiltLeft),
            (KeyCode::KeyD, CameraCommand::TiltRight),
            (KeyCode::KeyP, CameraCommand::ToggleRenderMode),
            (KeyCode::Escape, CameraCommand::Quit),
        ];
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }
}

impl KeyMap {
    /// Default bindings with the config overrides applied.
    ///
    /// Bad overrides are logged and skipped; the remaining ones still apply.
    pub fn from_config(config: &InputConfig) -> Self {
        let mut map = Self::default();
        // Sorted so the outcome does not depend on HashMap order.
        let mut overrides: Vec<_> = config.keybindings.iter().collect();
        overrides.sort();
        for (action, key) in overrides {
            if let Err(e) = map.rebind(action, key) {
                warn!("Ignoring keybinding override: {e}");
            }
        }
        map
    }

    /// Bind `key` to `action`, replacing the action's previous key and
    /// whatever `key` did before.
    pub fn rebind(&mut self, action: &str, key: &str) -> Result<(), KeyMapError> {
        let command =
            parse_action(action).ok_or_else(|| KeyMapError::UnknownAction(action.to_string()))?;
        let code = parse_key_name(key).ok_or_else(|| KeyMapError::UnknownKey {
            action: action.to_string(),
            key: key.to_string(),
        })?;

        self.bindings.retain(|_, bound| *bound != command);
        if let Some(previous) = self.bindings.insert(code, command) {
            debug!("{key} no longer triggers {}", action_name(previous));
        }
        Ok(())
    }

    /// The command bound to `key`, if any.
    pub fn command_for_key(&self, key: KeyCode) -> Option<CameraCommand> {
        self.bindings.get(&key).copied()
    }

    /// The first key bound to `command`.
    pub fn key_for(&self, command: CameraCommand) -> Option<KeyCode> {
        self.bindings
            .iter()
            .find(|(_, bound)| **bound == command)
            .map(|(key, _)| *key)
    }

    /// Resolve a key press. Repeats only trigger commands that repeat.
    pub fn resolve(&self, press: KeyPress) -> Option<CameraCommand> {
        let command = self.command_for_key(press.key)?;
        if press.repeat && !command.repeats() {
            return None;
        }
        Some(command)
    }
}
