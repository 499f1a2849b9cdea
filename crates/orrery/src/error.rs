//! Error types.
//!
//! Startup is the only fallible phase of the renderer: if any GPU resource
//! cannot be created, [`FrameRenderer::create`](crate::render::FrameRenderer::create)
//! returns a [`RenderError`] and the host aborts. Per-frame work never fails.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while bringing up the device or creating GPU resources.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    #[error("surface is not supported by the adapter: {0}")]
    SurfaceUnsupported(&'static str),

    #[error("failed to create GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("failed to create {label}: {message}")]
    ResourceCreation { label: &'static str, message: String },

    #[error("failed to load texture '{}': {source}", path.display())]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}

/// Errors raised while loading a [`SampleConfig`](crate::config::SampleConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
