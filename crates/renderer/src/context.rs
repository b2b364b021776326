//! Seams between the scene and whatever actually puts pixels on screen.

use crate::{error::RenderError, frame::Frame, frame::MeshId, mesh::MeshData};
use glam::Mat4;

/// Accepts CPU mesh data and hands back a handle draws can refer to.
pub trait MeshStore {
    fn upload_mesh(&mut self, data: &MeshData) -> MeshId;
}

/// A live graphics context: owns the surface, replays frames, and is released on drop.
pub trait GraphicsContext: MeshStore {
    /// Reconfigure for a new surface size.
    fn resize(&mut self, width: u32, height: u32);

    /// Replay `frame` with `projection` and present the result.
    fn present(&mut self, frame: &Frame, projection: Mat4) -> Result<(), RenderError>;
}
