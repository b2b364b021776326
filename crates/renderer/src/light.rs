//! The scene's single point light.

use crate::{context::MeshStore, frame::Frame, frame::Material, frame::MeshId, mesh::MeshData};
use engine_core::TransformStack;
use glam::{Mat4, Vec3};

/// A point light with a position and on/off state.
///
/// Enabling the light records its position through the transform that is current at that
/// moment, so the same world position lands differently depending on which pass enables it.
#[derive(Debug, Clone)]
pub struct Light {
    position: Vec3,
    enabled: bool,
    marker: Option<MeshId>,
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 40.0, 30.0))
    }
}

impl Light {
    const MARKER_SIZE: f32 = 0.6;
    const MARKER_COLOR: [f32; 4] = [1.0, 0.95, 0.6, 1.0];

    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            enabled: false,
            marker: None,
        }
    }

    /// Upload the source marker mesh.
    pub fn init(&mut self, meshes: &mut dyn MeshStore) {
        self.marker = Some(meshes.upload_mesh(&MeshData::cube()));
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.position.y = y;
    }

    pub fn set_z(&mut self, z: f32) {
        self.position.z = z;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The position as seen in a mirror across the z = 0 plane.
    pub fn reflected_position(&self) -> Vec3 {
        Vec3::new(self.position.x, self.position.y, -self.position.z)
    }

    /// Switch the light on or off at its own position.
    pub fn set_enable(&mut self, enabled: bool, frame: &mut Frame, transforms: &TransformStack) {
        if enabled {
            self.enable_at(self.position, frame, transforms);
        } else {
            self.enabled = false;
            frame.disable_light();
        }
    }

    /// Switch the light on as if it stood at `position`, without moving it.
    pub fn enable_at(&mut self, position: Vec3, frame: &mut Frame, transforms: &TransformStack) {
        self.enabled = true;
        frame.enable_light(transforms.transform_point(position));
    }

    /// Draw a small unlit marker where the light is.
    pub fn draw_source_marker(&self, frame: &mut Frame, transforms: &TransformStack) {
        let Some(marker) = self.marker else {
            log::warn!("Light marker requested before the light was initialised");
            return;
        };
        let model_view = transforms.current()
            * Mat4::from_translation(self.position)
            * Mat4::from_scale(Vec3::splat(Self::MARKER_SIZE));
        frame.draw(marker, Material::Unlit, model_view, Self::MARKER_COLOR);
    }
}
