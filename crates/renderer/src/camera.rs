//! Look-at camera pose and the zoomable perspective projection.

use bytemuck::{Pod, Zeroable};
use engine_core::TransformStack;
use glam::{Mat4, Vec3};

/// Fixed zoom-out applied before the look-at transform.
pub const BASE_CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -5.0);

/// Eye, target and up vector of the view. Set by whatever controls the camera; the values
/// are not validated, so a degenerate pose produces a degenerate view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.5, 6.0),
            center: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl CameraPose {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self { eye, center, up }
    }

    pub fn set_eye_x(&mut self, value: f32) {
        self.eye.x = value;
    }

    pub fn set_eye_y(&mut self, value: f32) {
        self.eye.y = value;
    }

    pub fn set_eye_z(&mut self, value: f32) {
        self.eye.z = value;
    }

    pub fn set_center_x(&mut self, value: f32) {
        self.center.x = value;
    }

    pub fn set_center_y(&mut self, value: f32) {
        self.center.y = value;
    }

    pub fn set_center_z(&mut self, value: f32) {
        self.center.z = value;
    }

    pub fn set_up_x(&mut self, value: f32) {
        self.up.x = value;
    }

    pub fn set_up_y(&mut self, value: f32) {
        self.up.y = value;
    }

    pub fn set_up_z(&mut self, value: f32) {
        self.up.z = value;
    }

    /// Apply the base zoom-out followed by the look-at view.
    pub fn apply(&self, stack: &mut TransformStack) {
        stack.translate(BASE_CAMERA_OFFSET);
        stack.look_at(self.eye, self.center, self.up);
    }
}

/// Perspective projection with a field of view that zooms in one-degree steps.
///
/// The matrix is cached; every mutation recomputes it immediately.
#[derive(Debug, Clone)]
pub struct Projection {
    fovy_degrees: f32,
    width: u32,
    height: u32,
    matrix: Mat4,
}

impl Projection {
    pub const MIN_FOVY: f32 = 45.0;
    pub const MAX_FOVY: f32 = 90.0;
    pub const INITIAL_FOVY: f32 = 75.0;
    pub const NEAR: f32 = 1.0;
    pub const FAR: f32 = 3000.0;
    const FOVY_STEP: f32 = 1.0;

    pub fn new(width: u32, height: u32) -> Self {
        let mut projection = Self {
            fovy_degrees: Self::INITIAL_FOVY,
            width,
            height,
            matrix: Mat4::IDENTITY,
        };
        projection.recompute();
        projection
    }

    pub fn fovy_degrees(&self) -> f32 {
        self.fovy_degrees
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Update the viewport size (call on window resize).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.recompute();
    }

    /// Widen the field of view by one degree, up to [`Projection::MAX_FOVY`].
    pub fn further(&mut self) {
        if self.fovy_degrees < Self::MAX_FOVY {
            self.fovy_degrees += Self::FOVY_STEP;
        }
        self.recompute();
    }

    /// Narrow the field of view by one degree, down to [`Projection::MIN_FOVY`].
    pub fn closer(&mut self) {
        if self.fovy_degrees > Self::MIN_FOVY {
            self.fovy_degrees -= Self::FOVY_STEP;
        }
        self.recompute();
    }

    /// Rebuild the projection matrix from the current state. A zero-sized viewport (a
    /// minimised window) keeps the previous matrix.
    pub fn recompute(&mut self) {
        if self.width == 0 || self.height == 0 {
            log::debug!("Viewport {}x{} is empty, keeping projection", self.width, self.height);
            return;
        }
        self.matrix = Mat4::perspective_rh(
            self.fovy_degrees.to_radians(),
            self.aspect(),
            Self::NEAR,
            Self::FAR,
        );
    }
}

/// Projection uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ProjectionUniform {
    pub projection: [[f32; 4]; 4],
}

impl ProjectionUniform {
    pub fn new(projection: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
        }
    }
}

impl Default for ProjectionUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn further_clamps_at_ninety() {
        let mut projection = Projection::new(800, 600);
        for _ in 0..40 {
            projection.further();
        }
        assert_eq!(projection.fovy_degrees(), 90.0);
        projection.further();
        assert_eq!(projection.fovy_degrees(), 90.0);
    }

    #[test]
    fn closer_clamps_at_forty_five() {
        let mut projection = Projection::new(800, 600);
        for _ in 0..50 {
            projection.closer();
        }
        assert_eq!(projection.fovy_degrees(), 45.0);
    }

    #[test]
    fn zoom_recomputes_matrix() {
        let mut projection = Projection::new(800, 600);
        let before = projection.matrix();
        projection.closer();
        assert_ne!(projection.matrix(), before);
        let expected = Mat4::perspective_rh(74f32.to_radians(), 800.0 / 600.0, 1.0, 3000.0);
        assert!(projection.matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn aspect_uses_float_division() {
        let projection = Projection::new(1280, 720);
        assert!((projection.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn empty_viewport_keeps_previous_matrix() {
        let mut projection = Projection::new(1280, 720);
        let before = projection.matrix();
        projection.set_viewport(0, 720);
        assert_eq!(projection.matrix(), before);
        projection.set_viewport(640, 0);
        assert_eq!(projection.matrix(), before);
        projection.closer();
        assert!(projection.matrix().is_finite());
        assert_eq!(projection.matrix(), before);

        projection.set_viewport(800, 600);
        let expected = Mat4::perspective_rh(74f32.to_radians(), 800.0 / 600.0, 1.0, 3000.0);
        assert!(projection.matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn camera_setters_touch_one_component() {
        let mut pose = CameraPose::default();
        pose.set_eye_x(3.0);
        pose.set_center_z(-2.0);
        pose.set_up_y(2.0);
        assert_eq!(pose.eye, Vec3::new(3.0, 1.5, 6.0));
        assert_eq!(pose.center, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(pose.up, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn camera_apply_offsets_then_looks() {
        let pose = CameraPose::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let mut stack = TransformStack::new();
        pose.apply(&mut stack);
        // The look-at target lands straight ahead, pushed back by the base offset.
        let p = stack.transform_point(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 0.0, -15.0)).length() < 1e-4);
    }
}
