//! Keyboard-driven fly camera.

use glam::Vec3;

/// Which primitive the bodies are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Sphere,
    Teapot,
}

impl RenderMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Sphere => RenderMode::Teapot,
            RenderMode::Teapot => RenderMode::Sphere,
        }
    }
}

/// Discrete camera actions produced by the key map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraCommand {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Up,
    Down,
    YawLeft,
    YawRight,
    TiltLeft,
    TiltRight,
    ToggleRenderMode,
    Quit,
}

impl CameraCommand {
    /// Every command, in a stable order.
    pub const ALL: [CameraCommand; 12] = [
        CameraCommand::Forward,
        CameraCommand::Back,
        CameraCommand::StrafeLeft,
        CameraCommand::StrafeRight,
        CameraCommand::Up,
        CameraCommand::Down,
        CameraCommand::YawLeft,
        CameraCommand::YawRight,
        CameraCommand::TiltLeft,
        CameraCommand::TiltRight,
        CameraCommand::ToggleRenderMode,
        CameraCommand::Quit,
    ];

    /// Whether holding the key should keep issuing this command.
    pub fn repeats(self) -> bool {
        !matches!(self, CameraCommand::ToggleRenderMode | CameraCommand::Quit)
    }
}

/// What a command did to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// State changed.
    Applied,
    /// The move would have left the bounds and was dropped.
    Clamped,
    /// The user asked to exit.
    QuitRequested,
}

/// Camera position and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Eye position.
    pub translation: Vec3,
    /// x coordinate of the look-at target.
    pub yaw_target: f32,
    /// x component of the up vector.
    pub tilt: f32,
    pub render_mode: RenderMode,
}

impl CameraState {
    /// Camera at `translation`, looking down +z, upright.
    pub fn new(translation: Vec3) -> Self {
        Self {
            translation,
            yaw_target: 0.0,
            tilt: 0.0,
            render_mode: RenderMode::Sphere,
        }
    }

    /// The look-at target.
    pub fn target(&self) -> Vec3 {
        Vec3::new(self.yaw_target, 0.0, self.translation.z + 1.0)
    }

    /// The up vector.
    pub fn up(&self) -> Vec3 {
        Vec3::new(self.tilt, 1.0, 0.0)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -15.0))
    }
}

/// Applies [`CameraCommand`]s to a [`CameraState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    /// Step per command.
    pub trans_amt: f32,
    /// Translation stays strictly inside `(-max_depth, max_depth)` on every axis.
    pub max_depth: f32,
}

impl CameraController {
    pub fn new(trans_amt: f32, max_depth: f32) -> Self {
        Self {
            trans_amt,
            max_depth,
        }
    }

    /// Move `value` by `delta` if the result stays in bounds.
    fn step(&self, value: &mut f32, delta: f32) -> CommandOutcome {
        let next = *value + delta;
        if next > -self.max_depth && next < self.max_depth {
            *value = next;
            CommandOutcome::Applied
        } else {
            CommandOutcome::Clamped
        }
    }

    /// Apply one command.
    pub fn apply(&self, camera: &mut CameraState, command: CameraCommand) -> CommandOutcome {
        let amt = self.trans_amt;
        match command {
            CameraCommand::Forward => self.step(&mut camera.translation.z, amt),
            CameraCommand::Back => self.step(&mut camera.translation.z, -amt),
            CameraCommand::StrafeLeft | CameraCommand::StrafeRight => {
                let delta = if command == CameraCommand::StrafeLeft {
                    amt
                } else {
                    -amt
                };
                let outcome = self.step(&mut camera.translation.x, delta);
                camera.yaw_target = camera.translation.x;
                outcome
            }
            CameraCommand::Up => self.step(&mut camera.translation.y, amt),
            CameraCommand::Down => self.step(&mut camera.translation.y, -amt),
            CameraCommand::YawLeft => {
                camera.yaw_target -= amt;
                CommandOutcome::Applied
            }
            CameraCommand::YawRight => {
                camera.yaw_target += amt;
                CommandOutcome::Applied
            }
            CameraCommand::TiltLeft => {
                camera.tilt -= amt;
                CommandOutcome::Applied
            }
            CameraCommand::TiltRight => {
                camera.tilt += amt;
                CommandOutcome::Applied
            }
            CameraCommand::ToggleRenderMode => {
                camera.render_mode = camera.render_mode.toggled();
                CommandOutcome::Applied
            }
            CameraCommand::Quit => CommandOutcome::QuitRequested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(0.2, 25.0)
    }

    fn in_bounds(camera: &CameraState, max: f32) -> bool {
        camera
            .translation
            .to_array()
            .iter()
            .all(|c| *c > -max && *c < max)
    }

    #[test]
    fn test_default_camera() {
        let camera = CameraState::default();
        assert_eq!(camera.translation, Vec3::new(0.0, 0.0, -15.0));
        assert_eq!(camera.target(), Vec3::new(0.0, 0.0, -14.0));
        assert_eq!(camera.up(), Vec3::Y);
        assert_eq!(camera.render_mode, RenderMode::Sphere);
    }

    #[test]
    fn test_forward_and_back() {
        let mut camera = CameraState::default();
        let c = controller();
        assert_eq!(c.apply(&mut camera, CameraCommand::Forward), CommandOutcome::Applied);
        assert!((camera.translation.z + 14.8).abs() < 1e-5);
        c.apply(&mut camera, CameraCommand::Back);
        c.apply(&mut camera, CameraCommand::Back);
        assert!((camera.translation.z + 15.2).abs() < 1e-5);
    }

    #[test]
    fn test_up_and_down() {
        let mut camera = CameraState::default();
        let c = controller();
        c.apply(&mut camera, CameraCommand::Up);
        assert!((camera.translation.y - 0.2).abs() < 1e-6);
        c.apply(&mut camera, CameraCommand::Down);
        c.apply(&mut camera, CameraCommand::Down);
        assert!((camera.translation.y + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_strafe_left_near_bound_is_rejected() {
        let mut camera = CameraState::new(Vec3::new(25.0 - 0.1, 0.0, 0.0));
        let outcome = controller().apply(&mut camera, CameraCommand::StrafeLeft);
        assert_eq!(outcome, CommandOutcome::Clamped);
        assert_eq!(camera.translation.x, 25.0 - 0.1);
    }

    #[test]
    fn test_strafe_right_near_bound_is_rejected() {
        let mut camera = CameraState::new(Vec3::new(-(25.0 - 0.1), 0.0, 0.0));
        let outcome = controller().apply(&mut camera, CameraCommand::StrafeRight);
        assert_eq!(outcome, CommandOutcome::Clamped);
        assert_eq!(camera.translation.x, -(25.0 - 0.1));
    }

    #[test]
    fn test_strafe_snaps_yaw_target() {
        let mut camera = CameraState::default();
        let c = controller();
        c.apply(&mut camera, CameraCommand::YawRight);
        c.apply(&mut camera, CameraCommand::YawRight);
        assert!((camera.yaw_target - 0.4).abs() < 1e-6);

        c.apply(&mut camera, CameraCommand::StrafeRight);
        assert_eq!(camera.yaw_target, camera.translation.x);
        assert!((camera.translation.x + 0.2).abs() < 1e-6);

        c.apply(&mut camera, CameraCommand::StrafeLeft);
        assert_eq!(camera.yaw_target, camera.translation.x);
    }

    #[test]
    fn test_clamped_strafe_still_snaps_yaw_target() {
        let mut camera = CameraState::new(Vec3::new(24.9, 0.0, 0.0));
        camera.yaw_target = -3.0;
        controller().apply(&mut camera, CameraCommand::StrafeLeft);
        assert_eq!(camera.yaw_target, 24.9);
    }

    #[test]
    fn test_yaw_and_tilt_are_unclamped() {
        let mut camera = CameraState::default();
        let c = controller();
        for _ in 0..500 {
            c.apply(&mut camera, CameraCommand::YawLeft);
            c.apply(&mut camera, CameraCommand::TiltRight);
        }
        assert!(camera.yaw_target < -25.0);
        assert!(camera.tilt > 25.0);
        assert_eq!(camera.up().x, camera.tilt);
    }

    #[test]
    fn test_translation_stays_in_bounds() {
        let mut camera = CameraState::default();
        let c = controller();
        let moves = [
            CameraCommand::Forward,
            CameraCommand::StrafeLeft,
            CameraCommand::Up,
        ];
        for command in moves {
            for _ in 0..1000 {
                c.apply(&mut camera, command);
                assert!(in_bounds(&camera, 25.0), "{:?}", camera.translation);
            }
        }
        let back = [
            CameraCommand::Back,
            CameraCommand::StrafeRight,
            CameraCommand::Down,
        ];
        for command in back {
            for _ in 0..1000 {
                c.apply(&mut camera, command);
                assert!(in_bounds(&camera, 25.0), "{:?}", camera.translation);
            }
        }
    }

    #[test]
    fn test_double_toggle_restores_mode() {
        let mut camera = CameraState::default();
        let c = controller();
        c.apply(&mut camera, CameraCommand::ToggleRenderMode);
        assert_eq!(camera.render_mode, RenderMode::Teapot);
        c.apply(&mut camera, CameraCommand::ToggleRenderMode);
        assert_eq!(camera.render_mode, RenderMode::Sphere);
    }

    #[test]
    fn test_quit_leaves_camera_alone() {
        let mut camera = CameraState::default();
        let before = camera;
        let outcome = controller().apply(&mut camera, CameraCommand::Quit);
        assert_eq!(outcome, CommandOutcome::QuitRequested);
        assert_eq!(camera, before);
    }

    #[test]
    fn test_only_toggle_and_quit_ignore_repeat() {
        let once: Vec<CameraCommand> = CameraCommand::ALL
            .into_iter()
            .filter(|c| !c.repeats())
            .collect();
        assert_eq!(
            once,
            vec![CameraCommand::ToggleRenderMode, CameraCommand::Quit]
        );
    }
}
