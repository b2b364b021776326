//! Explicit placements and the scoped model-view transform stack.

use glam::{Mat4, Vec3};
use std::ops::{Deref, DerefMut};

/// Translation plus Euler rotation handed to a collaborator by value, so it never has to
/// read them back out of matrix state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub translation: Vec3,
    /// Rotation in degrees about X, Y and Z, applied in that order after the translation.
    pub rotation_degrees: Vec3,
}

impl Placement {
    pub fn new(translation: Vec3, rotation_degrees: Vec3) -> Self {
        Self {
            translation,
            rotation_degrees,
        }
    }

    /// Build the local matrix for this placement.
    pub fn to_matrix(&self) -> Mat4 {
        let r = self.rotation_degrees;
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_x(r.x.to_radians())
            * Mat4::from_rotation_y(r.y.to_radians())
            * Mat4::from_rotation_z(r.z.to_radians())
    }

    /// Apply this placement on top of the stack's current transform.
    pub fn apply(&self, stack: &mut TransformStack) {
        stack.multiply(self.to_matrix());
    }
}

/// Model-view transform with a save/restore stack.
///
/// Every operation post-multiplies the current matrix, so the last transform applied is
/// the first one a vertex sees. Saved states are only reachable through [`TransformStack::push`],
/// which hands out a [`TransformScope`] that restores the saved matrix when dropped.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
    /// Deepest nesting reached since the last `load_identity`.
    max_depth: usize,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
            max_depth: 0,
        }
    }

    /// The active model-view matrix.
    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Number of saved states currently outstanding.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Deepest nesting reached since the last reset.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Replace the current matrix with identity.
    ///
    /// Outstanding saved states are left alone; they belong to live scopes.
    pub fn load_identity(&mut self) {
        self.current = Mat4::IDENTITY;
        self.max_depth = self.saved.len();
    }

    pub fn multiply(&mut self, matrix: Mat4) {
        self.current *= matrix;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.multiply(Mat4::from_translation(offset));
    }

    /// Rotate about the vertical axis.
    pub fn rotate_y_degrees(&mut self, degrees: f32) {
        self.multiply(Mat4::from_rotation_y(degrees.to_radians()));
    }

    /// Rotate about an arbitrary axis. A zero axis leaves the transform untouched.
    pub fn rotate_degrees(&mut self, degrees: f32, axis: Vec3) {
        let axis = axis.normalize_or_zero();
        if axis != Vec3::ZERO {
            self.multiply(Mat4::from_axis_angle(axis, degrees.to_radians()));
        }
    }

    /// Apply a right-handed view transform. Degenerate inputs are not checked.
    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        self.multiply(Mat4::look_at_rh(eye, center, up));
    }

    /// Map a local point through the current transform.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.current.transform_point3(point)
    }

    /// Save the current matrix. The returned scope restores it when dropped.
    pub fn push(&mut self) -> TransformScope<'_> {
        self.saved.push(self.current);
        self.max_depth = self.max_depth.max(self.saved.len());
        TransformScope { stack: self }
    }

    fn pop(&mut self) {
        if let Some(matrix) = self.saved.pop() {
            self.current = matrix;
        }
    }
}

/// A saved transform state. Dereferences to the stack; dropping it restores the matrix
/// that was current when it was pushed.
#[must_use = "the saved transform is restored as soon as the scope is dropped"]
pub struct TransformScope<'a> {
    stack: &'a mut TransformStack,
}

impl Deref for TransformScope<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}
