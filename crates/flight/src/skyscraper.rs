//! The skyscraper: a glass curtain wall that mirrors the scene, a tower beside it, and
//! the ground plane shadows fall on.
//!
//! Local layout: the mirror stands in the z = 0 plane facing +z, the ground is the
//! y = 0 plane in front of it, and everything reflected lives at negative z.

use engine_core::{Placement, TransformStack};
use glam::{Mat4, Vec3, Vec4};
use renderer::{
    mirror_z, planar_shadow_matrix, Drawable, Frame, Material, MeshData, MeshId, MeshStore,
    PassMode, SkyscraperHost,
};

const MIRROR_WIDTH: f32 = 160.0;
const MIRROR_HEIGHT: f32 = 80.0;
const GROUND_SIZE: f32 = 400.0;

/// Tower footprint centre, in front of and to the left of the mirror.
const TOWER_CENTER: Vec3 = Vec3::new(-22.0, 0.0, 18.0);
const TOWER_SIZE: Vec3 = Vec3::new(10.0, 50.0, 10.0);

const TOWER_COLOR: [f32; 4] = [0.55, 0.57, 0.62, 1.0];
const GROUND_COLOR: [f32; 4] = [0.32, 0.45, 0.3, 1.0];
const GLASS_COLOR: [f32; 4] = [0.7, 0.85, 1.0, 0.3];

/// The ground plane, `y = 0`, as `(a, b, c, d)`.
pub const GROUND_PLANE: Vec4 = Vec4::new(0.0, 1.0, 0.0, 0.0);

#[derive(Debug, Clone, Copy)]
struct Meshes {
    cube: MeshId,
    wall: MeshId,
    ground: MeshId,
}

#[derive(Debug, Default)]
pub struct Skyscraper {
    meshes: Option<Meshes>,
}

impl Skyscraper {
    pub fn new() -> Self {
        Self::default()
    }

    fn tower_matrix() -> Mat4 {
        Mat4::from_translation(TOWER_CENTER + Vec3::new(0.0, TOWER_SIZE.y / 2.0, 0.0))
            * Mat4::from_scale(TOWER_SIZE)
    }

    // Ground only covers the mirror's front side; its reflection fills the rest.
    fn ground_matrix() -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, GROUND_SIZE / 2.0))
    }

    /// Tower and ground, without the glass.
    fn draw_solids(&self, meshes: Meshes, frame: &mut Frame, transforms: &TransformStack) {
        let current = transforms.current();
        frame.draw(
            meshes.ground,
            Material::Lit,
            current * Self::ground_matrix(),
            GROUND_COLOR,
        );
        frame.draw(
            meshes.cube,
            Material::Lit,
            current * Self::tower_matrix(),
            TOWER_COLOR,
        );
    }
}

impl Drawable for Skyscraper {
    fn init(&mut self, store: &mut dyn MeshStore) {
        self.meshes = Some(Meshes {
            cube: store.upload_mesh(&MeshData::cube()),
            wall: store.upload_mesh(&MeshData::wall(MIRROR_WIDTH, MIRROR_HEIGHT)),
            ground: store.upload_mesh(&MeshData::plane(GROUND_SIZE)),
        });
    }

    fn draw(&self, frame: &mut Frame, transforms: &mut TransformStack) {
        let Some(meshes) = self.meshes else {
            return;
        };
        self.draw_solids(meshes, frame, transforms);
        // Glass last so it blends over the reflections drawn behind it.
        frame.draw(meshes.wall, Material::Glass, transforms.current(), GLASS_COLOR);
    }

    fn draw_reflection(&self, frame: &mut Frame, transforms: &mut TransformStack, _light: Vec3) {
        let Some(meshes) = self.meshes else {
            return;
        };
        let mut scope = transforms.push();
        scope.multiply(mirror_z());
        frame.with_mode(PassMode::Reflected, |frame| {
            self.draw_solids(meshes, frame, &scope)
        });
    }
}

impl SkyscraperHost for Skyscraper {
    fn draw_component_reflection(
        &self,
        frame: &mut Frame,
        transforms: &mut TransformStack,
        target: &dyn Drawable,
        placement: Placement,
        light_position: Vec3,
    ) {
        let mut scope = transforms.push();
        scope.multiply(mirror_z());
        placement.apply(&mut scope);
        target.draw_reflection(frame, &mut scope, light_position);
    }

    fn draw_component_shadows(
        &self,
        frame: &mut Frame,
        transforms: &mut TransformStack,
        light_position: Vec3,
        target: &dyn Drawable,
        placement: Placement,
    ) {
        let mut scope = transforms.push();
        scope.multiply(planar_shadow_matrix(GROUND_PLANE, light_position));
        placement.apply(&mut scope);
        frame.with_mode(PassMode::Shadow, |frame| target.draw(frame, &mut scope));
    }
}
