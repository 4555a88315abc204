//! Decoded textures and UV coordinates

use crate::assets::image_loader::ImageData;
use crate::render::color::Color;

/// A 2D texture coordinate. `u` runs along the texture width, `v` along
/// the height.
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Tex2 {
    /// Horizontal coordinate
    pub u: f32,
    /// Vertical coordinate
    pub v: f32,
}

impl Tex2 {
    /// Build a coordinate pair
    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

/// A decoded texture: packed `0xAARRGGBB` texels in row-major order
#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<u32>,
}

impl Texture {
    /// Take ownership of a texel buffer.
    ///
    /// Panics if the buffer length disagrees with the dimensions.
    pub fn new(width: usize, height: usize, texels: Vec<u32>) -> Self {
        assert_eq!(texels.len(), width * height, "texel buffer size mismatch");
        Self { width, height, texels }
    }

    /// Convert decoded RGBA8 image bytes into packed texels
    pub fn from_image(image: &ImageData) -> Self {
        let texels = image
            .data
            .chunks_exact(4)
            .map(|px| Color::rgba(px[0], px[1], px[2], px[3]).0)
            .collect();
        Self::new(image.width as usize, image.height as usize, texels)
    }

    /// A two-color checkerboard, `cell` texels per square
    pub fn checkerboard(size: usize, cell: usize, a: Color, b: Color) -> Self {
        let cell = cell.max(1);
        let mut texels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let even = (x / cell + y / cell) % 2 == 0;
                texels.push(if even { a.0 } else { b.0 });
            }
        }
        Self::new(size, size, texels)
    }

    /// Texture width in texels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Texture height in texels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample with wrap addressing: coordinates outside [0, 1) repeat.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let tex_x = ((u * self.width as f32).floor() as i64).unsigned_abs() as usize % self.width;
        let tex_y = ((v * self.height as f32).floor() as i64).unsigned_abs() as usize % self.height;
        Color(self.texels[tex_y * self.width + tex_x])
    }
}
