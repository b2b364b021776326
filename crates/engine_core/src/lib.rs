//! Core types shared by the flight scene crates.
//!
//! This crate provides the spatial building blocks used across the workspace:
//! - The world pose that simulates helicopter motion
//! - Explicit placements and the scoped transform stack
//! - Frame pacing

pub mod pose;
pub mod time;
pub mod transform;

pub use pose::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Vec3, Vec4};
