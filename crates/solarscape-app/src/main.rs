//! The binary entry point for Solarscape.

use std::process::ExitCode;

use clap::Parser;
use solarscape_app::platform::PlatformDirs;
use solarscape_app::window;
use solarscape_config::{CliArgs, Config};
use solarscape_log::init_logging;
use solarscape_scene::{SceneState, seed_from_clock};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_with_override(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            init_logging(None, false, None);
            error!("Failed to resolve platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = dirs.create_dirs() {
        init_logging(None, false, None);
        error!("Failed to create platform directories: {e}");
        return ExitCode::FAILURE;
    }

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            init_logging(None, false, None);
            error!("Failed to load {}: {e}", dirs.config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);
    init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config.debug),
    );

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let seed = config.scene.seed.unwrap_or_else(seed_from_clock);
    info!(seed, config_dir = %dirs.config_dir.display(), "Starting Solarscape");

    let scene = match SceneState::new(&config.scene, seed) {
        Ok(scene) => scene,
        Err(e) => {
            error!("Failed to build the scene: {e}");
            return ExitCode::FAILURE;
        }
    };

    match window::run(config, scene) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
