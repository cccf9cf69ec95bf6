//! Math types and helpers built on nalgebra
//!
//! Re-exports the handful of linear algebra types the renderer needs under
//! short aliases, plus the view/projection constructors used by the scene
//! uniform block. [`perspective_vk`] flips the Y axis of the nalgebra
//! projection so NDC +Y points down as Vulkan framebuffers expect; depth
//! keeps nalgebra's GL-style -1..1 range.

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// 3-component float vector
pub type Vec3 = Vector3<f32>;

/// 4-component float vector
pub type Vec4 = Vector4<f32>;

/// 4x4 float matrix
pub type Mat4 = Matrix4<f32>;

/// Build a right-handed view matrix looking from `eye` toward `target`.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
}

/// Build a perspective projection with Vulkan's framebuffer orientation.
///
/// `fov_y_degrees` is the vertical field of view. The Y axis is negated so
/// that NDC +Y points down; the depth range stays at nalgebra's -1..1.
pub fn perspective_vk(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let mut proj = Mat4::new_perspective(aspect, fov_y_degrees.to_radians(), near, far);
    proj[(1, 1)] *= -1.0;
    proj
}

/// Translation matrix
pub fn translation(offset: Vec3) -> Mat4 {
    Mat4::new_translation(&offset)
}

/// Rotation about an axis, in radians
pub fn rotation(axis: Vec3, angle: f32) -> Mat4 {
    Mat4::from_axis_angle(&nalgebra::Unit::new_normalize(axis), angle)
}

/// Uniform scaling matrix
pub fn scaling(factor: f32) -> Mat4 {
    Mat4::new_scaling(factor)
}

/// Copy a matrix into the column-major array layout uniform blocks expect.
pub fn to_columns(m: &Mat4) -> [[f32; 4]; 4] {
    let mut out = [[0.0; 4]; 4];
    for (c, col) in m.column_iter().enumerate() {
        for r in 0..4 {
            out[c][r] = col[r];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perspective_flips_y_for_vulkan() {
        let gl = Mat4::new_perspective(4.0 / 3.0, 85.0_f32.to_radians(), 0.1, 100.0);
        let vk = perspective_vk(85.0, 4.0 / 3.0, 0.1, 100.0);
        assert_relative_eq!(vk[(1, 1)], -gl[(1, 1)]);
        assert_relative_eq!(vk[(0, 0)], gl[(0, 0)]);
    }

    #[test]
    fn perspective_depth_range_is_gl_style() {
        let proj = perspective_vk(85.0, 1.0, 0.1, 100.0);
        let near = proj * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-4);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn to_columns_is_column_major() {
        let m = translation(Vec3::new(1.0, 2.0, 3.0));
        let cols = to_columns(&m);
        // Translation lives in the last column.
        assert_relative_eq!(cols[3][0], 1.0);
        assert_relative_eq!(cols[3][1], 2.0);
        assert_relative_eq!(cols[3][2], 3.0);
        assert_relative_eq!(cols[0][0], 1.0);
    }
}
