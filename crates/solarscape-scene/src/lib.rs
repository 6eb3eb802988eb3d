//! Scene core: the orbiting body hierarchy, the background star shell, the
//! fly-through camera and the per-frame draw sequence.
//!
//! Nothing in this crate touches the GPU. Rendering goes through the
//! [`GraphicsHost`] trait so the whole frame can be inspected in tests.

pub mod body;
pub mod camera;
pub mod error;
pub mod orbit;
pub mod renderer;
pub mod scene;
pub mod starfield;

pub use body::{BodyHierarchy, BodyId, CelestialBody, solar_system};
pub use camera::{CameraCommand, CameraController, CameraState, CommandOutcome, RenderMode};
pub use error::SceneError;
pub use orbit::{OrbitalIntegrator, wrap_degrees};
pub use renderer::{FrameStyle, GraphicsHost, body_transform, render_frame};
pub use scene::SceneState;
pub use starfield::{BackgroundStar, CubeFace, StarfieldGenerator, seed_from_clock};
