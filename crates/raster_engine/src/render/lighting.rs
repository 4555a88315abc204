//! Directional lighting

use crate::foundation::math::Vec3;
use crate::render::color::{Color, ALPHA_MASK, BLUE_MASK, GREEN_MASK, RED_MASK};

/// A single directional light
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    direction: Vec3,
}

impl DirectionalLight {
    /// Create a directional light. The direction is normalized.
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
        }
    }

    /// Unit-length light direction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}

impl Default for DirectionalLight {
    /// Light shining along +z, matching the camera's neutral forward
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 1.0))
    }
}

/// Scale the R, G and B channels of `color` by `factor`, clamped to
/// [0, 1]. Alpha passes through bit-for-bit.
pub fn apply_intensity(color: Color, factor: f32) -> Color {
    let factor = factor.clamp(0.0, 1.0);

    let a = color.0 & ALPHA_MASK;
    let r = ((color.0 & RED_MASK) as f32 * factor) as u32;
    let g = ((color.0 & GREEN_MASK) as f32 * factor) as u32;
    let b = ((color.0 & BLUE_MASK) as f32 * factor) as u32;

    Color(a | (r & RED_MASK) | (g & GREEN_MASK) | (b & BLUE_MASK))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_factor_goes_black_but_keeps_alpha() {
        let shaded = apply_intensity(Color(0x80FF_C040), -3.0);
        assert_eq!(shaded, Color(0x8000_0000));
    }

    #[test]
    fn factor_above_one_leaves_color_unchanged() {
        let color = Color(0xFF12_3456);
        assert_eq!(apply_intensity(color, 2.5), color);
    }

    #[test]
    fn half_intensity_halves_each_channel() {
        let shaded = apply_intensity(Color::rgba(200, 100, 50, 255), 0.5);
        assert_eq!(shaded, Color::rgba(100, 50, 25, 255));
    }

    #[test]
    fn light_direction_is_normalized() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(light.direction(), Vec3::new(0.0, 0.0, 1.0));
    }
}
