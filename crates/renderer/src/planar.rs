//! Planar mirror and planar shadow matrices.

use glam::{Mat4, Vec3, Vec4};

/// Reflection across the local z = 0 plane.
pub fn mirror_z() -> Mat4 {
    Mat4::from_scale(Vec3::new(1.0, 1.0, -1.0))
}

/// Projects geometry onto `plane` (`ax + by + cz + d = 0`, stored as `(a, b, c, d)`) along
/// rays from a point light at `light`.
///
/// The result is `(plane · light) I - light ⊗ plane`. Points between the light and the
/// plane land on the plane; the light must not lie on the plane itself.
pub fn planar_shadow_matrix(plane: Vec4, light: Vec3) -> Mat4 {
    let l = light.extend(1.0);
    let dot = plane.dot(l);
    Mat4::from_diagonal(Vec4::splat(dot))
        - Mat4::from_cols(l * plane.x, l * plane.y, l * plane.z, l * plane.w)
}
