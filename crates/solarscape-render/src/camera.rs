//! Look-at camera with a reverse-Z perspective projection.

use glam::{Mat4, Vec3};

/// Eye, target and up vector plus the perspective frustum.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// 45 degree camera with the given clip planes, looking down +z.
    pub fn new(near: f32, far: f32) -> Self {
        Self {
            near,
            far,
            ..Self::default()
        }
    }

    /// Point the camera. The up vector need not be normalised.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.eye = eye;
        self.target = target;
        self.up = up;
    }

    /// World-to-eye transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up.normalize_or(Vec3::Y))
    }

    /// Perspective projection with reverse-Z: near maps to 1, far to 0.
    pub fn projection_matrix(&self) -> Mat4 {
        // Swapping near and far flips the depth range.
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio after a resize. Zero sizes are ignored.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -15.0),
            target: Vec3::new(0.0, 0.0, -14.0),
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
            aspect_ratio: 1.0,
            near: 1.0,
            far: 55.0,
        }
    }
}
