//! The flight scene: stick integration and the multi-pass render orchestrator.

pub mod integrator;
pub mod scene;

pub use integrator::*;
pub use scene::*;
