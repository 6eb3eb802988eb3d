//! wgpu rendering for the solar system: device and surface setup, meshes,
//! the body and star pipelines, and the [`GpuHost`] that draws a scene frame.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod host;
pub mod mesh;
pub mod pass;
pub mod pipeline;
pub mod star_pipeline;

pub use buffer::{BufferAllocator, InstanceBuffer, MeshBuffer, VertexPositionNormal};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use host::{FrameRecorder, GpuHost, HostSettings, LIGHT_POSITION};
pub use mesh::{MeshData, icosphere, teapot};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use pipeline::{BodyInstance, BodyPipeline, FrameUniform, frame_bind_group_layout};
pub use star_pipeline::{StarInstance, StarPipeline};
