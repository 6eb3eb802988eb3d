//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Each subdivision level quadruples the sphere's triangle count.
pub const MAX_SPHERE_SUBDIVISIONS: u32 = 6;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Scene and simulation constants.
    pub scene: SceneConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Scene constants: movement step, bounds, animation rate and star field shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Camera step per key event, in world units.
    pub trans_amt: f32,
    /// Half-width of the cube the camera may move inside.
    pub max_depth: f32,
    /// Degrees added to every body's spin per tick.
    pub spin_speed: f32,
    /// Half-width of the cube shell the stars are placed on.
    pub star_depth: u32,
    /// Number of background stars.
    pub star_count: u32,
    /// Upper bound on the number of stars the scene accepts.
    pub max_stars: u32,
    /// Upper bound on the number of bodies the scene accepts.
    pub max_bodies: u32,
    /// Animation ticks per second.
    pub tick_hz: f64,
    /// Star field seed. `None` seeds from the wall clock at startup.
    pub seed: Option<u64>,
    /// Initial camera translation.
    pub camera_start: [f32; 3],
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Star point size in pixels.
    pub point_size: f32,
    /// Colour the stars are drawn with.
    pub star_color: [f32; 3],
    /// Background clear colour.
    pub clear_color: [f32; 3],
    /// Icosphere subdivision level for the sphere primitive.
    pub sphere_subdivisions: u32,
    /// Radial segment count for the teapot primitive.
    pub teapot_segments: u32,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (action name -> key name).
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log a scene summary every this many ticks (0 disables it).
    pub status_interval_ticks: u64,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            vsync: true,
            title: "Roundworld, or 'World Not on a Turtle'".to_string(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            trans_amt: 0.2,
            max_depth: 25.0,
            spin_speed: 10.0,
            star_depth: 25,
            star_count: 1000,
            max_stars: 10_000,
            max_bodies: 10,
            tick_hz: 10.0,
            seed: None,
            camera_start: [0.0, 0.0, -15.0],
        }
    }
}

impl SceneConfig {
    /// Far clip distance: the camera bound plus the star shell plus a margin
    /// so stars in the corners stay visible.
    pub fn far_plane(&self) -> f32 {
        self.max_depth + self.star_depth as f32 + 5.0
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_size: 2.0,
            star_color: [1.0, 1.0, 1.0],
            clear_color: [0.0, 0.0, 0.0],
            sphere_subdivisions: 3,
            teapot_segments: 24,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            status_interval_ticks: 100,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Reject values the scene or renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if !(self.scene.trans_amt > 0.0) {
            return invalid("scene.trans_amt", "must be positive");
        }
        if !(self.scene.max_depth > 0.0) {
            return invalid("scene.max_depth", "must be positive");
        }
        if !(self.scene.spin_speed >= 0.0 && self.scene.spin_speed < 360.0) {
            return invalid("scene.spin_speed", "must be in [0, 360)");
        }
        if self.scene.star_depth == 0 {
            return invalid("scene.star_depth", "must be at least 1");
        }
        if !(self.scene.tick_hz > 0.0) {
            return invalid("scene.tick_hz", "must be positive");
        }
        if !(self.render.point_size > 0.0) {
            return invalid("render.point_size", "must be positive");
        }
        let max_depth = self.scene.max_depth;
        if !self
            .scene
            .camera_start
            .iter()
            .all(|&c| c > -max_depth && c < max_depth)
        {
            return invalid("scene.camera_start", "must lie strictly inside the depth bounds");
        }
        if self.render.sphere_subdivisions > MAX_SPHERE_SUBDIVISIONS {
            return invalid("render.sphere_subdivisions", "must be at most 6");
        }
        if self.render.teapot_segments < 3 {
            return invalid("render.teapot_segments", "must be at least 3");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 500"));
        assert!(ron_str.contains("star_count: 1000"));
    }

    #[test]
    fn test_scene_defaults_match_roundworld_constants() {
        let scene = SceneConfig::default();
        assert!((scene.trans_amt - 0.2).abs() < f32::EPSILON);
        assert_eq!(scene.max_depth, 25.0);
        assert_eq!(scene.spin_speed, 10.0);
        assert_eq!(scene.star_depth, 25);
        assert_eq!(scene.camera_start, [0.0, 0.0, -15.0]);
        assert!(scene.seed.is_none());
    }

    #[test]
    fn test_far_plane_adds_margin() {
        let scene = SceneConfig::default();
        assert_eq!(scene.far_plane(), 55.0);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), scene: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.render, RenderConfig::default());
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn test_partial_scene_section() {
        let ron_str = "(scene: (star_count: 12, seed: Some(7)))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.scene.star_count, 12);
        assert_eq!(config.scene.seed, Some(7));
        assert_eq!(config.scene.max_depth, 25.0);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 800;
        config.scene.seed = Some(42);
        config
            .input
            .keybindings
            .insert("quit".to_string(), "q".to_string());

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.scene.tick_hz = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "scene.tick_hz",
                ..
            })
        ));

        let mut config = Config::default();
        config.scene.spin_speed = 400.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scene.star_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scene.trans_amt = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_camera_start_outside_bounds() {
        for start in [[0.0, 0.0, 30.0], [25.0, 0.0, 0.0], [0.0, -25.0, 0.0]] {
            let mut config = Config::default();
            config.scene.camera_start = start;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid {
                    field: "scene.camera_start",
                    ..
                })
            ));
        }

        let mut config = Config::default();
        config.scene.camera_start = [24.9, -24.9, 0.0];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_caps_sphere_subdivisions() {
        let mut config = Config::default();
        config.render.sphere_subdivisions = MAX_SPHERE_SUBDIVISIONS;
        assert!(config.validate().is_ok());

        config.render.sphere_subdivisions = 12;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "render.sphere_subdivisions",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
