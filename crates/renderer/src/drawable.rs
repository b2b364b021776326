//! Contracts for the objects the scene draws.

use crate::{context::MeshStore, frame::Frame, frame::PassMode};
use engine_core::{Placement, TransformStack};
use glam::Vec3;

/// Something the scene can draw at the current transform.
///
/// Implementations may push and pop the stack freely but must leave it as they found it.
pub trait Drawable {
    /// Upload meshes. Called once while the scene is initialised.
    fn init(&mut self, _meshes: &mut dyn MeshStore) {}

    fn draw(&self, frame: &mut Frame, transforms: &mut TransformStack);

    /// Draw as seen in a mirror. When reached through a host's component reflection the
    /// mirror transform is already applied; a host reflecting itself applies its own.
    /// `light_position` is passed explicitly and must not be cached between calls.
    fn draw_reflection(
        &self,
        frame: &mut Frame,
        transforms: &mut TransformStack,
        _light_position: Vec3,
    ) {
        frame.with_mode(PassMode::Reflected, |frame| self.draw(frame, transforms));
    }
}

/// The object that owns the mirror surface and the plane shadows fall on. Other objects
/// are reflected and shadowed through it, each with an explicit placement relative to
/// the host's local origin.
pub trait SkyscraperHost: Drawable {
    fn draw_component_reflection(
        &self,
        frame: &mut Frame,
        transforms: &mut TransformStack,
        target: &dyn Drawable,
        placement: Placement,
        light_position: Vec3,
    );

    fn draw_component_shadows(
        &self,
        frame: &mut Frame,
        transforms: &mut TransformStack,
        light_position: Vec3,
        target: &dyn Drawable,
        placement: Placement,
    );
}
