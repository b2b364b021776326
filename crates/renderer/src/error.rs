//! Renderer error types.

use thiserror::Error;

/// Failure to bring up a graphics context. None of these are retried.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter")]
    NoAdapter,
    #[error("surface reports no supported pixel format")]
    NoSurfaceFormat,
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("graphics context is unavailable")]
    NoContext,
}

/// Failure while presenting a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
