//! Frame composition against an abstract graphics host.
//!
//! [`render_frame`] turns a [`SceneState`] into an ordered sequence of host
//! calls. The host owns projection, lighting and the actual primitives; the
//! scene never touches the GPU.

use glam::{Mat4, Quat, Vec3};

use crate::camera::RenderMode;
use crate::scene::SceneState;
use crate::starfield::BackgroundStar;

/// Drawing surface the scene renders into.
pub trait GraphicsHost {
    /// Clear colour and depth.
    fn clear(&mut self);

    /// Set the diffuse colour of the single scene light.
    fn set_light_diffuse(&mut self, color: [f32; 3]);

    /// Draw every star as a square point of `point_size` pixels.
    fn draw_stars(&mut self, stars: &[BackgroundStar], point_size: f32);

    /// Draw the unit primitive for `mode` with the given model transform,
    /// lit by the current diffuse colour.
    fn draw_body(&mut self, mode: RenderMode, model: Mat4);

    /// Set the view for this frame.
    fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3);
}

/// Per-frame constants that do not belong to the simulated scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub star_color: [f32; 3],
    pub point_size: f32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            star_color: [1.0, 1.0, 1.0],
            point_size: 2.0,
        }
    }
}

/// Model transform for a body: translate, then spin about y, then scale.
pub fn body_transform(position: Vec3, spin_degrees: f32, scale: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::splat(scale),
        Quat::from_rotation_y(spin_degrees.to_radians()),
        position,
    )
}

/// Issue one frame of draw calls.
pub fn render_frame<H: GraphicsHost>(scene: &mut SceneState, host: &mut H, style: &FrameStyle) {
    host.clear();

    host.set_light_diffuse(style.star_color);
    host.draw_stars(scene.stars(), style.point_size);

    scene.bodies_mut().update_positions();
    let mode = scene.camera().render_mode;
    for body in scene.bodies().iter() {
        host.set_light_diffuse(body.color);
        host.draw_body(mode, body_transform(body.position, body.spin_angle, body.scale));
    }

    let camera = scene.camera();
    host.look_at(camera.translation, camera.target(), camera.up());
}
