//! Error types for GPU setup and per-layer failures.

use thiserror::Error;

use crate::environment::Layer;

/// Fatal errors while bringing up or driving the GPU
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    Adapter,
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface unsupported by adapter")]
    SurfaceConfig,
    #[error("failed to acquire frame: {0}")]
    SurfaceAcquire(#[from] wgpu::SurfaceError),
}

/// A layer whose pipeline failed to build; only that layer is disabled
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} layer disabled: {}", .layer.name(), .message)]
pub struct LayerError {
    pub layer: Layer,
    pub message: String,
}
