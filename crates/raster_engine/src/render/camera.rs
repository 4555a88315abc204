//! FPS-style camera
//!
//! The camera holds a position plus yaw and pitch angles; its look
//! direction is derived, never set directly. Pitch saturates at straight
//! up/down so the view matrix can always use a world-space up vector.

use crate::foundation::math::{rotate_x, rotate_y, Mat4, Mat4Ext, Vec3};

/// World-space up used when building the view matrix
fn up_direction() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// The scene camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    direction: Vec3,
    yaw: f32,
    pitch: f32,
}

impl Camera {
    /// Create a camera at `position` looking down +z
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            direction: Vec3::new(0.0, 0.0, 1.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Current look direction (unit length)
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Current yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current pitch in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Turn left/right
    pub fn rotate_yaw(&mut self, delta: f32) {
        self.yaw += delta;
        log::trace!("Camera yaw: {:.3}", self.yaw);
    }

    /// Tilt up/down. Pitch saturates at +/- pi/2.
    pub fn rotate_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta)
            .clamp(-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);
        log::trace!("Camera pitch: {:.3}", self.pitch);
    }

    /// Move along the current look direction
    pub fn advance(&mut self, amount: f32) {
        self.position += self.direction * amount;
    }

    /// Recompute the look direction from yaw and pitch, then return the
    /// world-space point the camera is looking at.
    pub fn update_and_get_look_target(&mut self) -> Vec3 {
        let target = Vec3::new(0.0, 0.0, 1.0);
        let target = rotate_x(target, self.pitch);
        let target = rotate_y(target, self.yaw);
        self.direction = target;
        self.position + self.direction
    }

    /// Build the view matrix for the current orientation
    pub fn view_matrix(&mut self) -> Mat4 {
        let target = self.update_and_get_look_target();
        Mat4::look_at(self.position, target, up_direction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pitch_saturates_at_half_pi() {
        let mut camera = Camera::new(Vec3::zeros());
        camera.rotate_pitch(10.0);
        assert_eq!(camera.pitch(), std::f32::consts::FRAC_PI_2);
        camera.rotate_pitch(-20.0);
        assert_eq!(camera.pitch(), -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn neutral_camera_looks_down_positive_z() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        let target = camera.update_and_get_look_target();
        assert_relative_eq!(target, Vec3::new(1.0, 2.0, 4.0), epsilon = 1e-6);
        assert_relative_eq!(camera.direction(), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn look_direction_stays_unit_length() {
        let mut camera = Camera::new(Vec3::zeros());
        camera.rotate_yaw(1.2);
        camera.rotate_pitch(-0.7);
        camera.update_and_get_look_target();
        assert_relative_eq!(camera.direction().norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn view_matrix_centers_the_eye() {
        let mut camera = Camera::new(Vec3::new(0.0, 1.0, -4.0));
        camera.rotate_yaw(0.4);
        let view = camera.view_matrix();
        let eye = view * crate::foundation::math::vec4_from_vec3(camera.position);
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.z, 0.0, epsilon = 1e-5);
    }
}
