//! Rendering for the flight scene: camera and projection state, the light, the per-frame
//! draw list, collaborator contracts, and the wgpu backend that consumes a frame.

pub mod camera;
pub mod context;
pub mod drawable;
pub mod error;
pub mod frame;
pub mod light;
pub mod mesh;
pub mod pipeline;
pub mod planar;
pub mod renderer;
pub mod vertex;

pub use camera::*;
pub use context::*;
pub use drawable::*;
pub use error::*;
pub use frame::*;
pub use light::*;
pub use mesh::*;
pub use pipeline::*;
pub use planar::*;
pub use renderer::*;
pub use vertex::*;
