//! Scene construction errors.

/// Fatal configuration errors detected while building the scene.
///
/// None of these can happen once a [`SceneState`](crate::SceneState) exists:
/// every check runs at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// Adding another body would exceed the configured maximum.
    #[error("body capacity exceeded: cannot add `{name}`, limit is {limit}")]
    TooManyBodies { name: String, limit: usize },

    /// The requested star count exceeds the configured maximum.
    #[error("star capacity exceeded: requested {requested}, limit is {limit}")]
    TooManyStars { requested: usize, limit: usize },

    /// A body names a host that has not been added yet.
    #[error("body `{name}` refers to unknown host #{host}")]
    UnknownHost { name: String, host: usize },

    /// A hosted body needs a positive, finite orbit radius.
    #[error("body `{name}` has invalid orbit radius {radius}")]
    InvalidOrbitRadius { name: String, radius: f32 },

    /// Bodies must have a positive, finite scale.
    #[error("body `{name}` has invalid scale {scale}")]
    InvalidScale { name: String, scale: f32 },

    /// The per-tick angle step would sweep a full turn or more, which the
    /// single-subtraction wrap cannot bring back into `[0, 360)`.
    #[error("body `{name}` would advance {step} degrees per tick")]
    StepTooLarge { name: String, step: f32 },

    /// The camera would start on or outside the movement bounds, where
    /// every step along that axis is rejected.
    #[error("camera start {start:?} is not strictly inside (-{limit}, {limit})")]
    CameraOutOfBounds { start: [f32; 3], limit: f32 },

    /// The star shell needs a non-zero half-width.
    #[error("star depth must be at least 1")]
    InvalidStarDepth,
}
