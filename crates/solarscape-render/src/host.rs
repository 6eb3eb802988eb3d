//! wgpu implementation of the scene's [`GraphicsHost`].
//!
//! Draw calls arrive in scene order (stars, then bodies, then the camera),
//! so they are recorded into a [`FrameRecorder`] first and replayed into a
//! single render pass by [`GpuHost::present`]. The camera set during a frame
//! therefore applies to that same frame.

use glam::{Mat4, Vec3};
use solarscape_config::Config;
use solarscape_scene::{BackgroundStar, GraphicsHost, RenderMode};

use crate::buffer::{BufferAllocator, InstanceBuffer, MeshBuffer};
use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::mesh::{MeshData, icosphere, teapot};
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::pipeline::{BodyInstance, BodyPipeline, FrameUniform, frame_bind_group_layout};
use crate::star_pipeline::{StarInstance, StarPipeline};

/// Light position in eye space, so it moves with the camera.
pub const LIGHT_POSITION: Vec3 = Vec3::new(1.0, 2.0, 3.0);

/// Host construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSettings {
    pub near: f32,
    pub far: f32,
    pub clear_color: [f32; 3],
    pub sphere_subdivisions: u32,
    pub teapot_segments: u32,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            near: 1.0,
            far: 55.0,
            clear_color: [0.0, 0.0, 0.0],
            sphere_subdivisions: 3,
            teapot_segments: 24,
        }
    }
}

impl HostSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            near: 1.0,
            far: config.scene.far_plane(),
            clear_color: config.render.clear_color,
            sphere_subdivisions: config.render.sphere_subdivisions,
            teapot_segments: config.render.teapot_segments,
        }
    }
}

/// One frame of draw calls, in the form the GPU pipelines consume.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    diffuse: [f32; 3],
    point_size: f32,
    stars: Vec<StarInstance>,
    spheres: Vec<BodyInstance>,
    teapots: Vec<BodyInstance>,
    view: Option<(Vec3, Vec3, Vec3)>,
}

impl FrameRecorder {
    pub fn stars(&self) -> &[StarInstance] {
        &self.stars
    }

    pub fn spheres(&self) -> &[BodyInstance] {
        &self.spheres
    }

    pub fn teapots(&self) -> &[BodyInstance] {
        &self.teapots
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Eye, target and up from the last `look_at`, if any.
    pub fn view(&self) -> Option<(Vec3, Vec3, Vec3)> {
        self.view
    }

    /// Forget the recorded draws. The light colour and view carry over, as
    /// they would on a fixed-function context.
    pub fn reset(&mut self) {
        self.stars.clear();
        self.spheres.clear();
        self.teapots.clear();
    }
}

impl GraphicsHost for FrameRecorder {
    fn clear(&mut self) {
        self.reset();
    }

    fn set_light_diffuse(&mut self, color: [f32; 3]) {
        self.diffuse = color;
    }

    fn draw_stars(&mut self, stars: &[BackgroundStar], point_size: f32) {
        self.point_size = point_size;
        let color = self.diffuse;
        self.stars
            .extend(stars.iter().map(|s| StarInstance::new(s.position, color)));
    }

    fn draw_body(&mut self, mode: RenderMode, model: Mat4) {
        let instance = BodyInstance::new(model, self.diffuse);
        match mode {
            RenderMode::Sphere => self.spheres.push(instance),
            RenderMode::Teapot => self.teapots.push(instance),
        }
    }

    fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.view = Some((eye, target, up));
    }
}

/// Owns the GPU resources needed to draw the scene into a window surface.
pub struct GpuHost {
    context: RenderContext,
    depth: DepthBuffer,
    camera: Camera,
    clear_color: [f32; 3],
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    body_pipeline: BodyPipeline,
    star_pipeline: StarPipeline,
    sphere_mesh: MeshBuffer,
    teapot_mesh: MeshBuffer,
    star_instances: InstanceBuffer,
    sphere_instances: InstanceBuffer,
    teapot_instances: InstanceBuffer,
    recorder: FrameRecorder,
}

impl GpuHost {
    pub fn new(context: RenderContext, settings: &HostSettings) -> Self {
        let device = &context.device;
        let (width, height) = context.size();
        let allocator = BufferAllocator::new(device);

        let mut camera = Camera::new(settings.near, settings.far);
        camera.set_aspect_ratio(width, height);

        let frame_layout = frame_bind_group_layout(device);
        let frame = FrameUniform::new(
            camera.view_matrix(),
            camera.projection_matrix(),
            LIGHT_POSITION,
            (width, height),
            1.0,
        );
        let frame_buffer = allocator.create_uniform_buffer("frame-uniform", &frame);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let sphere = icosphere(settings.sphere_subdivisions);
        let teapot = teapot(settings.teapot_segments);
        log::info!(
            "Meshes ready: sphere {} triangles, teapot {} triangles",
            sphere.triangle_count(),
            teapot.triangle_count()
        );

        Self {
            depth: DepthBuffer::new(device, width, height),
            camera,
            clear_color: settings.clear_color,
            body_pipeline: BodyPipeline::new(device, &frame_layout, context.surface_format),
            star_pipeline: StarPipeline::new(device, &frame_layout, context.surface_format),
            sphere_mesh: upload_mesh(&allocator, "sphere", &sphere),
            teapot_mesh: upload_mesh(&allocator, "teapot", &teapot),
            star_instances: allocator.create_instance_buffer::<StarInstance>("star-instances", 1024),
            sphere_instances: allocator.create_instance_buffer::<BodyInstance>("sphere-instances", 16),
            teapot_instances: allocator.create_instance_buffer::<BodyInstance>("teapot-instances", 16),
            frame_buffer,
            frame_bind_group,
            recorder: FrameRecorder::default(),
            context,
        }
    }

    /// Resize the surface and depth buffer and update the aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        let (width, height) = self.context.size();
        self.depth.resize(&self.context.device, width, height);
        self.camera.set_aspect_ratio(width, height);
        log::debug!("Resized to {width}x{height}");
    }

    /// Draw the recorded frame and present it.
    pub fn present(&mut self) -> Result<(), SurfaceError> {
        if let Some((eye, target, up)) = self.recorder.view() {
            self.camera.look_at(eye, target, up);
        }

        let device = &self.context.device;
        let queue = &self.context.queue;
        let frame = FrameUniform::new(
            self.camera.view_matrix(),
            self.camera.projection_matrix(),
            LIGHT_POSITION,
            self.context.size(),
            self.recorder.point_size(),
        );
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));
        self.star_instances.write(device, queue, self.recorder.stars());
        self.sphere_instances.write(device, queue, self.recorder.spheres());
        self.teapot_instances.write(device, queue, self.recorder.teapots());

        let surface_texture = self.context.get_current_texture()?;
        let mut encoder = FrameEncoder::new(device, queue.clone(), surface_texture);
        let builder = RenderPassBuilder::new()
            .clear_rgb(self.clear_color)
            .depth(DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");

        if let Some(mut pass) = encoder.begin_render_pass(&builder, Some(&self.depth.view)) {
            self.star_pipeline
                .draw(&mut pass, &self.frame_bind_group, &self.star_instances);
            self.body_pipeline.draw(
                &mut pass,
                &self.frame_bind_group,
                &self.sphere_mesh,
                &self.sphere_instances,
            );
            self.body_pipeline.draw(
                &mut pass,
                &self.frame_bind_group,
                &self.teapot_mesh,
                &self.teapot_instances,
            );
        }
        encoder.submit();

        self.recorder.reset();
        Ok(())
    }
}

impl GraphicsHost for GpuHost {
    fn clear(&mut self) {
        self.recorder.clear();
    }

    fn set_light_diffuse(&mut self, color: [f32; 3]) {
        self.recorder.set_light_diffuse(color);
    }

    fn draw_stars(&mut self, stars: &[BackgroundStar], point_size: f32) {
        self.recorder.draw_stars(stars, point_size);
    }

    fn draw_body(&mut self, mode: RenderMode, model: Mat4) {
        self.recorder.draw_body(mode, model);
    }

    fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.recorder.look_at(eye, target, up);
    }
}

fn upload_mesh(allocator: &BufferAllocator, label: &str, mesh: &MeshData) -> MeshBuffer {
    allocator.create_mesh(
        label,
        bytemuck::cast_slice(&mesh.vertices),
        &mesh.indices,
    )
}
