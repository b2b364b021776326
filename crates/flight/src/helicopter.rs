//! The helicopter: body, tail boom and a two-blade main rotor.

use engine_core::TransformStack;
use glam::{Mat4, Vec3};
use input::StickState;
use renderer::{Drawable, Frame, Material, MeshData, MeshId, MeshStore};
use scene::HelicopterModel;

const BODY_COLOR: [f32; 4] = [0.75, 0.2, 0.15, 1.0];
const TRIM_COLOR: [f32; 4] = [0.2, 0.2, 0.22, 1.0];

/// Rotor speed in degrees per frame.
const ROTOR_IDLE_SPEED: f32 = 12.0;
const ROTOR_POWERED_SPEED: f32 = 30.0;

/// Parts as (translation, scale, color), in the helicopter's local frame. Nose points -z.
const HULL: [(Vec3, Vec3, [f32; 4]); 3] = [
    (Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.2, 0.9, 2.4), BODY_COLOR),
    (Vec3::new(0.0, 0.15, 2.4), Vec3::new(0.25, 0.25, 2.6), BODY_COLOR),
    (Vec3::new(0.0, 0.55, 0.0), Vec3::new(0.15, 0.2, 0.15), TRIM_COLOR),
];
const BLADE_SCALE: Vec3 = Vec3::new(6.0, 0.04, 0.25);
const ROTOR_HEIGHT: f32 = 0.68;

#[derive(Debug, Default)]
pub struct Helicopter {
    mesh: Option<MeshId>,
    sticks: StickState,
    rotor_degrees: f32,
}

impl Helicopter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotor_degrees(&self) -> f32 {
        self.rotor_degrees
    }

    fn rotor_speed(&self) -> f32 {
        if self.sticks.throttle.is_empty() {
            ROTOR_IDLE_SPEED
        } else {
            ROTOR_POWERED_SPEED
        }
    }
}

impl Drawable for Helicopter {
    fn init(&mut self, meshes: &mut dyn MeshStore) {
        self.mesh = Some(meshes.upload_mesh(&MeshData::cube()));
    }

    fn draw(&self, frame: &mut Frame, transforms: &mut TransformStack) {
        let Some(mesh) = self.mesh else {
            return;
        };
        let current = transforms.current();
        for (offset, scale, color) in HULL {
            let local = Mat4::from_translation(offset) * Mat4::from_scale(scale);
            frame.draw(mesh, Material::Lit, current * local, color);
        }

        let mut rotor = transforms.push();
        rotor.translate(Vec3::new(0.0, ROTOR_HEIGHT, 0.0));
        rotor.rotate_y_degrees(self.rotor_degrees);
        for blade in [0.0, 90.0] {
            let local = Mat4::from_rotation_y(f32::to_radians(blade)) * Mat4::from_scale(BLADE_SCALE);
            frame.draw(mesh, Material::Lit, rotor.current() * local, TRIM_COLOR);
        }
    }
}

impl HelicopterModel for Helicopter {
    fn set_sticks(&mut self, sticks: StickState) {
        self.sticks = sticks;
    }

    fn advance_frame(&mut self) {
        self.rotor_degrees = (self.rotor_degrees + self.rotor_speed()) % 360.0;
    }

    fn as_drawable(&self) -> &dyn Drawable {
        self
    }
}
