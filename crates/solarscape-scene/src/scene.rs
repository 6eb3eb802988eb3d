//! The scene store: bodies, stars and the camera in one owned value.

use glam::Vec3;
use solarscape_config::SceneConfig;
use tracing::{debug, info};

use crate::body::{BodyHierarchy, solar_system};
use crate::camera::{CameraCommand, CameraController, CameraState, CommandOutcome};
use crate::error::SceneError;
use crate::orbit::OrbitalIntegrator;
use crate::starfield::{BackgroundStar, StarfieldGenerator};

/// Everything the simulation mutates, owned by the event loop and passed by
/// reference into each handler.
#[derive(Debug, Clone)]
pub struct SceneState {
    bodies: BodyHierarchy,
    stars: Vec<BackgroundStar>,
    camera: CameraState,
    controller: CameraController,
    integrator: OrbitalIntegrator,
    tick_count: u64,
    shutdown_requested: bool,
}

impl SceneState {
    /// Build the fixed system and a star field seeded with `seed`.
    pub fn new(config: &SceneConfig, seed: u64) -> Result<Self, SceneError> {
        let star_count = config.star_count as usize;
        let max_stars = config.max_stars as usize;
        if star_count > max_stars {
            return Err(SceneError::TooManyStars {
                requested: star_count,
                limit: max_stars,
            });
        }

        let limit = config.max_depth;
        if !config
            .camera_start
            .iter()
            .all(|&c| c > -limit && c < limit)
        {
            return Err(SceneError::CameraOutOfBounds {
                start: config.camera_start,
                limit,
            });
        }

        let bodies = solar_system(config.max_bodies as usize)?;
        let integrator = OrbitalIntegrator::new(config.spin_speed);
        for body in bodies.iter() {
            let step = integrator.orbit_step(body).max(integrator.spin_speed);
            if !(step < 360.0) {
                return Err(SceneError::StepTooLarge {
                    name: body.name.clone(),
                    step,
                });
            }
        }

        let stars = StarfieldGenerator::new(seed, config.star_depth)?.generate(star_count);
        info!(
            "Scene ready: {} bodies, {} stars (seed {seed})",
            bodies.len(),
            stars.len()
        );

        Ok(Self {
            bodies,
            stars,
            camera: CameraState::new(Vec3::from_array(config.camera_start)),
            controller: CameraController::new(config.trans_amt, config.max_depth),
            integrator,
            tick_count: 0,
            shutdown_requested: false,
        })
    }

    /// Advance the animation by one tick.
    pub fn tick(&mut self) {
        self.integrator.advance(&mut self.bodies);
        self.tick_count += 1;
    }

    /// Apply a camera command. `Quit` raises the shutdown flag.
    pub fn handle_command(&mut self, command: CameraCommand) -> CommandOutcome {
        let outcome = self.controller.apply(&mut self.camera, command);
        match outcome {
            CommandOutcome::QuitRequested => {
                info!("Shutdown requested");
                self.shutdown_requested = true;
            }
            CommandOutcome::Clamped => debug!("{command:?} blocked at the scene bounds"),
            CommandOutcome::Applied => {}
        }
        outcome
    }

    /// Whether the user asked to exit.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn bodies(&self) -> &BodyHierarchy {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut BodyHierarchy {
        &mut self.bodies
    }

    pub fn stars(&self) -> &[BackgroundStar] {
        &self.stars
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SceneConfig {
        SceneConfig {
            star_count: 120,
            ..SceneConfig::default()
        }
    }

    #[test]
    fn test_new_scene() {
        let scene = SceneState::new(&config(), 1).unwrap();
        assert_eq!(scene.bodies().len(), 4);
        assert_eq!(scene.stars().len(), 120);
        assert_eq!(scene.camera().translation, Vec3::new(0.0, 0.0, -15.0));
        assert_eq!(scene.tick_count(), 0);
        assert!(!scene.shutdown_requested());
    }

    #[test]
    fn test_too_many_stars() {
        let config = SceneConfig {
            star_count: 11,
            max_stars: 10,
            ..SceneConfig::default()
        };
        assert_eq!(
            SceneState::new(&config, 1).unwrap_err(),
            SceneError::TooManyStars {
                requested: 11,
                limit: 10,
            }
        );
    }

    #[test]
    fn test_too_few_body_slots() {
        let config = SceneConfig {
            max_bodies: 2,
            ..config()
        };
        assert!(matches!(
            SceneState::new(&config, 1),
            Err(SceneError::TooManyBodies { limit: 2, .. })
        ));
    }

    #[test]
    fn test_step_too_large() {
        // 18 * 2 for the moon plus 18 / 2 is 45: fine. 200 breaks it.
        let ok = SceneConfig {
            spin_speed: 18.0,
            ..config()
        };
        assert!(SceneState::new(&ok, 1).is_ok());

        let fast = SceneConfig {
            spin_speed: 200.0,
            ..config()
        };
        assert!(matches!(
            SceneState::new(&fast, 1),
            Err(SceneError::StepTooLarge { name, .. }) if name == "ember"
        ));
    }

    #[test]
    fn test_camera_start_outside_bounds_is_rejected() {
        for start in [[0.0, 0.0, 30.0], [0.0, 0.0, 25.0], [-25.0, 0.0, 0.0]] {
            let config = SceneConfig {
                camera_start: start,
                ..config()
            };
            assert_eq!(
                SceneState::new(&config, 1).unwrap_err(),
                SceneError::CameraOutOfBounds { start, limit: 25.0 }
            );
        }
    }

    #[test]
    fn test_camera_near_bound_can_still_move_back() {
        let config = SceneConfig {
            camera_start: [0.0, 0.0, 24.9],
            ..config()
        };
        let mut scene = SceneState::new(&config, 1).unwrap();
        assert_eq!(
            scene.handle_command(CameraCommand::Forward),
            CommandOutcome::Clamped
        );
        assert_eq!(
            scene.handle_command(CameraCommand::Back),
            CommandOutcome::Applied
        );
        assert!(scene.camera().translation.z < 25.0);
    }

    #[test]
    fn test_same_seed_same_scene_stars() {
        let a = SceneState::new(&config(), 77).unwrap();
        let b = SceneState::new(&config(), 77).unwrap();
        assert_eq!(a.stars(), b.stars());
    }

    #[test]
    fn test_roots_never_move() {
        let mut scene = SceneState::new(&config(), 1).unwrap();
        let start = scene.bodies().iter().next().unwrap().position;
        for _ in 0..500 {
            scene.tick();
            scene.bodies_mut().update_positions();
            assert_eq!(scene.bodies().iter().next().unwrap().position, start);
        }
    }

    #[test]
    fn test_hosted_bodies_stay_on_orbit() {
        let mut scene = SceneState::new(&config(), 1).unwrap();
        for _ in 0..500 {
            scene.tick();
            scene.bodies_mut().update_positions();
            let bodies = scene.bodies();
            for body in bodies.iter() {
                let Some(host) = body.host else { continue };
                let host_pos = bodies.get(host).unwrap().position;
                let distance = body.position.distance(host_pos);
                assert!(
                    (distance - body.orbit_radius).abs() < 1e-4,
                    "{} is {distance} from its host",
                    body.name
                );
            }
        }
    }

    #[test]
    fn test_root_spin_returns_to_zero() {
        let mut scene = SceneState::new(&config(), 1).unwrap();
        for _ in 0..36 {
            scene.tick();
        }
        assert_eq!(scene.tick_count(), 36);
        let sun = scene.bodies().iter().next().unwrap();
        assert!(sun.spin_angle.abs() < 1e-3);
    }

    #[test]
    fn test_quit_sets_shutdown_flag() {
        let mut scene = SceneState::new(&config(), 1).unwrap();
        scene.handle_command(CameraCommand::Forward);
        assert!(!scene.shutdown_requested());
        assert_eq!(
            scene.handle_command(CameraCommand::Quit),
            CommandOutcome::QuitRequested
        );
        assert!(scene.shutdown_requested());
    }

    #[test]
    fn test_clamped_move_is_reported() {
        let config = SceneConfig {
            camera_start: [0.0, 24.9, 0.0],
            ..config()
        };
        let mut scene = SceneState::new(&config, 1).unwrap();
        assert_eq!(
            scene.handle_command(CameraCommand::Up),
            CommandOutcome::Clamped
        );
        assert_eq!(scene.camera().translation.y, 24.9);
    }
}
