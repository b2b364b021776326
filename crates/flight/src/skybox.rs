//! Constant-distance backdrop.

use engine_core::TransformStack;
use glam::{Mat4, Vec3};
use renderer::{Drawable, Frame, Material, MeshData, MeshId, MeshStore};

/// Edge length of the sky cube. Its corners stay inside the far plane.
const SKY_SIZE: f32 = 1600.0;
const SKY_COLOR: [f32; 4] = [0.45, 0.65, 0.9, 1.0];

/// A large cube seen from the inside. The scene keeps it centred on the camera.
#[derive(Debug, Default)]
pub struct SkyBox {
    mesh: Option<MeshId>,
}

impl SkyBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color() -> [f32; 4] {
        SKY_COLOR
    }
}

impl Drawable for SkyBox {
    fn init(&mut self, meshes: &mut dyn MeshStore) {
        self.mesh = Some(meshes.upload_mesh(&MeshData::cube()));
    }

    fn draw(&self, frame: &mut Frame, transforms: &mut TransformStack) {
        let Some(mesh) = self.mesh else {
            return;
        };
        let model_view = transforms.current() * Mat4::from_scale(Vec3::splat(SKY_SIZE));
        frame.draw(mesh, Material::Sky, model_view, SKY_COLOR);
    }
}
