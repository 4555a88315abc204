//! Math types and the renderer's matrix conventions
//!
//! Provides the vector/matrix aliases used throughout the engine plus the
//! projection conventions the pipeline is built around.
//!
//! ## Coordinate conventions
//!
//! The renderer is **left-handed**: camera space looks down +z, face
//! normals come from `cross(b - a, c - a)`, and the perspective matrix
//! maps +z forward. Row 3 of the perspective matrix is `[0, 0, 1, 0]` so
//! that the pre-divide `w` component of a projected vertex equals the
//! camera-space z of the original point; the rasterizer leans on that to
//! interpolate `1/w` perspective-correctly.

pub use nalgebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D homogeneous vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math utility functions
pub mod utils {
    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Lift a 3D point into homogeneous coordinates with `w = 1`
pub fn vec4_from_vec3(v: Vec3) -> Vec4 {
    Vec4::new(v.x, v.y, v.z, 1.0)
}

/// Drop the `w` component of a homogeneous point
pub fn vec3_from_vec4(v: Vec4) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Rotate a vector around the X axis by `angle` radians
pub fn rotate_x(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

/// Rotate a vector around the Y axis by `angle` radians
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c - v.z * s, v.y, v.x * s + v.z * c)
}

/// Rotate a vector around the Z axis by `angle` radians
pub fn rotate_z(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

/// Multiply by a projection matrix, then perform the perspective divide.
///
/// The divide is skipped when the resulting `w` is zero, leaving the
/// multiplied components untouched. `w` itself is always preserved so the
/// caller keeps the camera-space depth.
pub fn project_vec4(m: &Mat4, v: Vec4) -> Vec4 {
    let mut result = m * v;
    if result.w != 0.0 {
        result.x /= result.w;
        result.y /= result.w;
        result.z /= result.w;
    }
    result
}

/// Extension trait adding the renderer's matrix constructors to [`Mat4`]
pub trait Mat4Ext {
    /// Per-axis scale matrix
    fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4;

    /// Translation matrix
    fn translation(tx: f32, ty: f32, tz: f32) -> Mat4;

    /// Rotation around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Rotation around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Rotation around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Left-handed perspective projection.
    ///
    /// `aspect_y` is height over width; it scales x so the horizontal
    /// field of view follows the window shape. z maps to [0, 1] between
    /// `znear` and `zfar`, and row 3 copies camera-space z into `w`.
    fn perspective(fov_y: f32, aspect_y: f32, znear: f32, zfar: f32) -> Mat4;

    /// Left-handed look-at view matrix.
    ///
    /// Rows are the camera's right, up and forward unit vectors; the
    /// fourth column carries `-dot(axis, eye)` so the eye maps to the
    /// origin of camera space.
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
        let mut result = Mat4::identity();
        result[(0, 0)] = sx;
        result[(1, 1)] = sy;
        result[(2, 2)] = sz;
        result
    }

    fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        let mut result = Mat4::identity();
        result[(0, 3)] = tx;
        result[(1, 3)] = ty;
        result[(2, 3)] = tz;
        result
    }

    fn rotation_x(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut result = Mat4::identity();
        result[(1, 1)] = c;
        result[(1, 2)] = -s;
        result[(2, 1)] = s;
        result[(2, 2)] = c;
        result
    }

    fn rotation_y(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut result = Mat4::identity();
        result[(0, 0)] = c;
        result[(0, 2)] = s;
        result[(2, 0)] = -s;
        result[(2, 2)] = c;
        result
    }

    fn rotation_z(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut result = Mat4::identity();
        result[(0, 0)] = c;
        result[(0, 1)] = -s;
        result[(1, 0)] = s;
        result[(1, 1)] = c;
        result
    }

    fn perspective(fov_y: f32, aspect_y: f32, znear: f32, zfar: f32) -> Mat4 {
        let cot_half_fov = 1.0 / (fov_y / 2.0).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = aspect_y * cot_half_fov;
        result[(1, 1)] = cot_half_fov;
        result[(2, 2)] = zfar / (zfar - znear);
        result[(2, 3)] = (-zfar * znear) / (zfar - znear);
        result[(3, 2)] = 1.0;
        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let z = (target - eye).normalize();
        let x = up.cross(&z).normalize();
        let y = z.cross(&x);

        Mat4::new(
            x.x, x.y, x.z, -x.dot(&eye),
            y.x, y.y, y.z, -y.dot(&eye),
            z.x, z.y, z.z, -z.dot(&eye),
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vec3_vec4_round_trip() {
        let v = Vec3::new(1.5, -2.0, 7.25);
        let lifted = vec4_from_vec3(v);
        assert_eq!(lifted.w, 1.0);
        assert_eq!(vec3_from_vec4(lifted), v);
    }

    #[test]
    fn axis_rotations_invert() {
        let v = Vec3::new(0.3, -1.2, 2.5);
        let theta = 0.77;
        assert_relative_eq!(rotate_x(rotate_x(v, theta), -theta), v, epsilon = 1e-5);
        assert_relative_eq!(rotate_y(rotate_y(v, theta), -theta), v, epsilon = 1e-5);
        assert_relative_eq!(rotate_z(rotate_z(v, theta), -theta), v, epsilon = 1e-5);
    }

    #[test]
    fn rotation_matrices_match_vector_rotations() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let theta = -1.1;
        let by_x = Mat4::rotation_x(theta) * vec4_from_vec3(v);
        assert_relative_eq!(vec3_from_vec4(by_x), rotate_x(v, theta), epsilon = 1e-5);
        let by_z = Mat4::rotation_z(theta) * vec4_from_vec3(v);
        assert_relative_eq!(vec3_from_vec4(by_z), rotate_z(v, theta), epsilon = 1e-5);
    }

    #[test]
    fn identity_is_multiplicative_unit() {
        let m = Mat4::translation(3.0, -1.0, 2.0) * Mat4::rotation_z(0.4);
        assert_eq!(m * Mat4::identity(), m);
        assert_eq!(Mat4::identity() * m, m);
    }

    #[test]
    fn look_at_maps_eye_to_origin() {
        let eye = Vec3::new(2.0, -3.0, 4.0);
        let dir = Vec3::new(0.2, 0.5, 1.0);
        let view = Mat4::look_at(eye, eye + dir, Vec3::new(0.0, 1.0, 0.0));
        let mapped = view * vec4_from_vec3(eye);
        assert_relative_eq!(mapped, Vec4::new(0.0, 0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn perspective_carries_camera_z_in_w() {
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_3, 720.0 / 1024.0, 0.3, 20.0);
        let v = Vec4::new(1.0, 2.0, 5.0, 1.0);
        let projected = proj * v;
        assert_relative_eq!(projected.w, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_range() {
        let (znear, zfar) = (0.3, 20.0);
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_3, 720.0 / 1024.0, znear, zfar);
        let near = project_vec4(&proj, Vec4::new(0.0, 0.0, znear, 1.0));
        let far = project_vec4(&proj, Vec4::new(0.0, 0.0, zfar, 1.0));
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn project_leaves_w_zero_input_undivided() {
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_3, 720.0 / 1024.0, 0.3, 20.0);
        let raw = proj * Vec4::new(1.0, -1.0, 0.0, 0.0);
        let projected = project_vec4(&proj, Vec4::new(1.0, -1.0, 0.0, 0.0));
        assert_eq!(projected, raw);
    }
}
