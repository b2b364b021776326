//! World pose: the helicopter's motion, expressed as an offset applied to the world.

use crate::transform::{Placement, TransformStack};
use glam::Vec3;

/// Translation and heading applied to every non-helicopter object.
///
/// The helicopter mesh stays at its local origin and the camera is rigidly attached to it,
/// so moving the world by the opposite amount is what makes the helicopter appear to fly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPose {
    pub translation: Vec3,
    /// Heading about the vertical axis, in degrees.
    pub yaw_degrees: f32,
}

impl Default for WorldPose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            yaw_degrees: 0.0,
        }
    }
}

impl WorldPose {
    /// Where the world starts relative to the helicopter when the scene comes up.
    pub const INITIAL_TRANSLATION: Vec3 = Vec3::new(-7.0, -3.0, -10.0);

    pub fn new(translation: Vec3, yaw_degrees: f32) -> Self {
        Self {
            translation,
            yaw_degrees,
        }
    }

    /// Pose the scene starts in.
    pub fn initial() -> Self {
        Self::new(Self::INITIAL_TRANSLATION, 0.0)
    }

    pub fn yaw_radians(&self) -> f32 {
        self.yaw_degrees.to_radians()
    }

    pub fn inverse_translation(&self) -> Vec3 {
        -self.translation
    }

    /// Apply the world yaw about the vertical axis.
    pub fn apply_yaw(&self, stack: &mut TransformStack) {
        stack.rotate_y_degrees(self.yaw_degrees);
    }

    /// Undo [`WorldPose::apply_yaw`].
    pub fn apply_inverse_yaw(&self, stack: &mut TransformStack) {
        stack.rotate_degrees(self.yaw_degrees, -Vec3::Y);
    }

    /// Yaw then translate: moves from camera space into the world's (skyscraper's) local origin.
    pub fn apply_world(&self, stack: &mut TransformStack) {
        self.apply_yaw(stack);
        stack.translate(self.translation);
    }

    /// Placement that brings the helicopter back to the camera origin from world space.
    pub fn helicopter_placement(&self) -> Placement {
        Placement::new(
            self.inverse_translation(),
            Vec3::new(0.0, -self.yaw_degrees, 0.0),
        )
    }

    /// Placement that keeps the skybox centred on the camera. The skybox ignores yaw.
    pub fn skybox_placement(&self) -> Placement {
        Placement::new(self.inverse_translation(), Vec3::ZERO)
    }
}
