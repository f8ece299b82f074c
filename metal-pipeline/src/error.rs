use crate::{shader::ShaderStage, FrameState};

/// Every fallible step of bootstrap, setup and frame encoding reports one of these. Callers pick
/// the policy (abort, skip the frame, retry).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("No Metal device available")]
    NoDevice,
    #[error("GPU context was already bootstrapped for this process")]
    AlreadyBootstrapped,
    #[error("Invalid mesh description: {0}")]
    InvalidMesh(String),
    #[error("Mesh has no submeshes to draw")]
    NoSubmesh,
    #[error("Mesh has no vertex buffer to bind")]
    NoVertexBuffer,
    #[error("Failed to allocate buffer for {label} ({bytes} bytes)")]
    BufferAllocation { label: String, bytes: usize },
    #[error("Failed to reflect shader source: {0}")]
    ShaderReflection(String),
    #[error("Failed to compile shader library: {0}")]
    ShaderCompile(String),
    #[error("Shader function '{name}' does not exist")]
    MissingFunction { name: String },
    #[error("Shader function '{name}' is a {found} function, expected a {expected} function")]
    WrongStage {
        name: String,
        expected: ShaderStage,
        found: ShaderStage,
    },
    #[error("Vertex layout is incompatible with '{function}': {reason}")]
    VertexLayoutMismatch { function: String, reason: String },
    #[error("Failed to create render pipeline: {0}")]
    PipelineCreation(String),
    #[error("View has no render pass descriptor available")]
    NoRenderPassDescriptor,
    #[error("View has no drawable available")]
    NoDrawable,
    #[error("Frame step requires a {expected:?} frame, but the frame is {found:?}")]
    FrameOutOfOrder {
        expected: FrameState,
        found: FrameState,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Window system error: {0}")]
    WindowSystem(String),
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
