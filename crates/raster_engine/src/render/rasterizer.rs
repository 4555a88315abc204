//! Triangle rasterization
//!
//! Screen-space triangles are filled with the flat-top/flat-bottom split:
//! vertices sorted by y, the triangle treated as two halves sharing the
//! horizontal edge through the middle vertex, each half walked scanline by
//! scanline between two inverse slopes. Every pixel interpolates `1/w`
//! barycentrically for the depth test; the textured path additionally
//! interpolates `u/w` and `v/w` and divides by `1/w` for
//! perspective-correct sampling.

use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::color::Color;
use crate::render::framebuffer::Framebuffer;
use crate::render::texture::{Tex2, Texture};

/// A screen-space triangle, the unit handed over by the pipeline.
///
/// Point layout: x and y are pixel coordinates, z is the projected depth
/// in [0, 1], and w still holds the camera-space z from before the
/// perspective divide.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// The three projected vertices
    pub points: [Vec4; 3],
    /// Per-vertex texture coordinates
    pub tex_coords: [Tex2; 3],
    /// Flat color (already shaded)
    pub color: Color,
}

/// Draw the three edges of a triangle
pub fn draw_wire_triangle(
    framebuffer: &mut Framebuffer,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: Color,
) {
    framebuffer.draw_line(x0, y0, x1, y1, color);
    framebuffer.draw_line(x1, y1, x2, y2, color);
    framebuffer.draw_line(x2, y2, x0, y0, color);
}

/// Barycentric weights of `p` with respect to triangle `abc`, from the
/// signed parallelogram areas of the 2D cross products.
fn barycentric_weights(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Vec3 {
    let ac = c - a;
    let ab = b - a;
    let ap = p - a;
    let pc = c - p;
    let pb = b - p;

    let area = ac.x * ab.y - ac.y * ab.x;

    let alpha = (pc.x * pb.y - pc.y * pb.x) / area;
    let beta = (ac.x * ap.y - ac.y * ap.x) / area;
    let gamma = 1.0 - alpha - beta;

    Vec3::new(alpha, beta, gamma)
}

/// Interpolated `1 - 1/w` at the given weights; smaller is nearer.
fn interpolated_depth(a: Vec4, b: Vec4, c: Vec4, weights: Vec3) -> f32 {
    let reciprocal_w = weights.x / a.w + weights.y / b.w + weights.z / c.w;
    1.0 - reciprocal_w
}

/// Perspective-correct UV at the given weights: `u/w` and `v/w` are
/// interpolated linearly in screen space, then divided by interpolated
/// `1/w`.
fn interpolated_uv(
    a: Vec4,
    b: Vec4,
    c: Vec4,
    a_uv: Tex2,
    b_uv: Tex2,
    c_uv: Tex2,
    weights: Vec3,
) -> (f32, f32) {
    let u = a_uv.u / a.w * weights.x + b_uv.u / b.w * weights.y + c_uv.u / c.w * weights.z;
    let v = a_uv.v / a.w * weights.x + b_uv.v / b.w * weights.y + c_uv.v / c.w * weights.z;
    let reciprocal_w = weights.x / a.w + weights.y / b.w + weights.z / c.w;

    (u / reciprocal_w, v / reciprocal_w)
}

/// Grayscale visualization of a stored depth value
fn depth_display_color(depth: f32) -> Color {
    Color::gray((depth.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Depth-test one flat-colored pixel and write color + depth on success
fn draw_triangle_pixel(
    framebuffer: &mut Framebuffer,
    x: i32,
    y: i32,
    color: Color,
    a: Vec4,
    b: Vec4,
    c: Vec4,
) {
    let p = Vec2::new(x as f32, y as f32);
    let weights = barycentric_weights(a.xy(), b.xy(), c.xy(), p);

    let depth = interpolated_depth(a, b, c, weights);
    if depth < framebuffer.depth_at(x, y) {
        framebuffer.draw_pixel(x, y, color);
        framebuffer.set_depth(x, y, depth);
        framebuffer.set_depth_display(x, y, depth_display_color(depth));
    }
}

/// Depth-test one textured pixel, sampling with perspective correction
fn draw_texel(
    framebuffer: &mut Framebuffer,
    x: i32,
    y: i32,
    texture: &Texture,
    a: Vec4,
    b: Vec4,
    c: Vec4,
    a_uv: Tex2,
    b_uv: Tex2,
    c_uv: Tex2,
) {
    let p = Vec2::new(x as f32, y as f32);
    let weights = barycentric_weights(a.xy(), b.xy(), c.xy(), p);

    let depth = interpolated_depth(a, b, c, weights);
    if depth < framebuffer.depth_at(x, y) {
        let (u, v) = interpolated_uv(a, b, c, a_uv, b_uv, c_uv, weights);
        framebuffer.draw_pixel(x, y, texture.sample(u, v));
        framebuffer.set_depth(x, y, depth);
        framebuffer.set_depth_display(x, y, depth_display_color(depth));
    }
}

/// Fill a triangle with its flat color, depth-testing every pixel
pub fn draw_filled_triangle(framebuffer: &mut Framebuffer, triangle: &Triangle) {
    let [p0, p1, p2] = triangle.points;
    let (mut x0, mut y0, mut z0, mut w0) = (p0.x as i32, p0.y as i32, p0.z, p0.w);
    let (mut x1, mut y1, mut z1, mut w1) = (p1.x as i32, p1.y as i32, p1.z, p1.w);
    let (mut x2, mut y2, mut z2, mut w2) = (p2.x as i32, p2.y as i32, p2.z, p2.w);

    // Sort by y ascending, keeping z and w in lockstep.
    if y0 > y1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
        std::mem::swap(&mut z0, &mut z1);
        std::mem::swap(&mut w0, &mut w1);
    }
    if y1 > y2 {
        std::mem::swap(&mut x1, &mut x2);
        std::mem::swap(&mut y1, &mut y2);
        std::mem::swap(&mut z1, &mut z2);
        std::mem::swap(&mut w1, &mut w2);
    }
    if y0 > y1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
        std::mem::swap(&mut z0, &mut z1);
        std::mem::swap(&mut w0, &mut w1);
    }

    let a = Vec4::new(x0 as f32, y0 as f32, z0, w0);
    let b = Vec4::new(x1 as f32, y1 as f32, z1, w1);
    let c = Vec4::new(x2 as f32, y2 as f32, z2, w2);

    // Upper half: flat-bottom edge at y1.
    let inv_slope_1 = if y1 - y0 != 0 { (x1 - x0) as f32 / (y1 - y0).abs() as f32 } else { 0.0 };
    let inv_slope_2 = if y2 - y0 != 0 { (x2 - x0) as f32 / (y2 - y0).abs() as f32 } else { 0.0 };

    if y1 - y0 != 0 {
        for y in y0..=y1 {
            let x_start = (x1 as f32 + (y - y1) as f32 * inv_slope_1) as i32;
            let x_end = (x0 as f32 + (y - y0) as f32 * inv_slope_2) as i32;
            let (x_start, x_end) = if x_end < x_start { (x_end, x_start) } else { (x_start, x_end) };

            for x in x_start..x_end {
                draw_triangle_pixel(framebuffer, x, y, triangle.color, a, b, c);
            }
        }
    }

    // Lower half: flat-top edge at y1.
    let inv_slope_1 = if y2 - y1 != 0 { (x2 - x1) as f32 / (y2 - y1).abs() as f32 } else { 0.0 };
    let inv_slope_2 = if y2 - y0 != 0 { (x2 - x0) as f32 / (y2 - y0).abs() as f32 } else { 0.0 };

    if y2 - y1 != 0 {
        for y in y1..=y2 {
            let x_start = (x1 as f32 + (y - y1) as f32 * inv_slope_1) as i32;
            let x_end = (x2 as f32 + (y - y2) as f32 * inv_slope_2) as i32;
            let (x_start, x_end) = if x_end < x_start { (x_end, x_start) } else { (x_start, x_end) };

            for x in x_start..x_end {
                draw_triangle_pixel(framebuffer, x, y, triangle.color, a, b, c);
            }
        }
    }
}

/// Fill a triangle from its texture with perspective-correct sampling
pub fn draw_textured_triangle(
    framebuffer: &mut Framebuffer,
    triangle: &Triangle,
    texture: &Texture,
) {
    let [p0, p1, p2] = triangle.points;
    let [t0, t1, t2] = triangle.tex_coords;

    let (mut x0, mut y0, mut z0, mut w0) = (p0.x as i32, p0.y as i32, p0.z, p0.w);
    let (mut x1, mut y1, mut z1, mut w1) = (p1.x as i32, p1.y as i32, p1.z, p1.w);
    let (mut x2, mut y2, mut z2, mut w2) = (p2.x as i32, p2.y as i32, p2.z, p2.w);

    // UV origin is the texture's top-left; flip v once up front.
    let (mut u0, mut v0) = (t0.u, 1.0 - t0.v);
    let (mut u1, mut v1) = (t1.u, 1.0 - t1.v);
    let (mut u2, mut v2) = (t2.u, 1.0 - t2.v);

    // Sort by y ascending, keeping z, w and UVs in lockstep.
    if y0 > y1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
        std::mem::swap(&mut z0, &mut z1);
        std::mem::swap(&mut w0, &mut w1);
        std::mem::swap(&mut u0, &mut u1);
        std::mem::swap(&mut v0, &mut v1);
    }
    if y1 > y2 {
        std::mem::swap(&mut x1, &mut x2);
        std::mem::swap(&mut y1, &mut y2);
        std::mem::swap(&mut z1, &mut z2);
        std::mem::swap(&mut w1, &mut w2);
        std::mem::swap(&mut u1, &mut u2);
        std::mem::swap(&mut v1, &mut v2);
    }
    if y0 > y1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
        std::mem::swap(&mut z0, &mut z1);
        std::mem::swap(&mut w0, &mut w1);
        std::mem::swap(&mut u0, &mut u1);
        std::mem::swap(&mut v0, &mut v1);
    }

    let a = Vec4::new(x0 as f32, y0 as f32, z0, w0);
    let b = Vec4::new(x1 as f32, y1 as f32, z1, w1);
    let c = Vec4::new(x2 as f32, y2 as f32, z2, w2);
    let a_uv = Tex2::new(u0, v0);
    let b_uv = Tex2::new(u1, v1);
    let c_uv = Tex2::new(u2, v2);

    // Upper half: flat-bottom edge at y1.
    let inv_slope_1 = if y1 - y0 != 0 { (x1 - x0) as f32 / (y1 - y0).abs() as f32 } else { 0.0 };
    let inv_slope_2 = if y2 - y0 != 0 { (x2 - x0) as f32 / (y2 - y0).abs() as f32 } else { 0.0 };

    if y1 - y0 != 0 {
        for y in y0..=y1 {
            let x_start = (x1 as f32 + (y - y1) as f32 * inv_slope_1) as i32;
            let x_end = (x0 as f32 + (y - y0) as f32 * inv_slope_2) as i32;
            let (x_start, x_end) = if x_end < x_start { (x_end, x_start) } else { (x_start, x_end) };

            for x in x_start..x_end {
                draw_texel(framebuffer, x, y, texture, a, b, c, a_uv, b_uv, c_uv);
            }
        }
    }

    // Lower half: flat-top edge at y1.
    let inv_slope_1 = if y2 - y1 != 0 { (x2 - x1) as f32 / (y2 - y1).abs() as f32 } else { 0.0 };
    let inv_slope_2 = if y2 - y0 != 0 { (x2 - x0) as f32 / (y2 - y0).abs() as f32 } else { 0.0 };

    if y2 - y1 != 0 {
        for y in y1..=y2 {
            let x_start = (x1 as f32 + (y - y1) as f32 * inv_slope_1) as i32;
            let x_end = (x2 as f32 + (y - y2) as f32 * inv_slope_2) as i32;
            let (x_start, x_end) = if x_end < x_start { (x_end, x_start) } else { (x_start, x_end) };

            for x in x_start..x_end {
                draw_texel(framebuffer, x, y, texture, a, b, c, a_uv, b_uv, c_uv);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn screen_triangle(points: [(f32, f32, f32, f32); 3], color: Color) -> Triangle {
        Triangle {
            points: points.map(|(x, y, z, w)| Vec4::new(x, y, z, w)),
            tex_coords: [Tex2::default(); 3],
            color,
        }
    }

    #[test]
    fn fills_interior_pixels_and_depth() {
        let mut fb = Framebuffer::new(64, 64);
        // w = 2 everywhere: stored depth is 1 - 1/2 = 0.5.
        let tri = screen_triangle(
            [(10.0, 10.0, 0.5, 2.0), (50.0, 10.0, 0.5, 2.0), (30.0, 50.0, 0.5, 2.0)],
            Color::GREEN,
        );
        draw_filled_triangle(&mut fb, &tri);

        assert_eq!(fb.pixel_at(30, 20), Some(Color::GREEN));
        assert_relative_eq!(fb.depth_at(30, 20), 0.5, epsilon = 1e-5);
        // Well outside the triangle: untouched.
        assert_eq!(fb.pixel_at(5, 5), Some(Color::BLACK));
        assert_eq!(fb.depth_at(5, 5), 1.0);
    }

    #[test]
    fn depth_test_keeps_the_nearer_color() {
        let mut fb = Framebuffer::new(64, 64);
        let verts = [(10.0, 10.0), (50.0, 10.0), (30.0, 50.0)];

        let near = screen_triangle(verts.map(|(x, y)| (x, y, 0.2, 2.0)), Color::RED);
        let far = screen_triangle(verts.map(|(x, y)| (x, y, 0.5, 10.0)), Color::BLUE);

        // Far first, near second: near wins.
        let mut fb2 = Framebuffer::new(64, 64);
        draw_filled_triangle(&mut fb2, &far);
        draw_filled_triangle(&mut fb2, &near);
        assert_eq!(fb2.pixel_at(30, 20), Some(Color::RED));

        // Near first, far second: near still wins.
        draw_filled_triangle(&mut fb, &near);
        draw_filled_triangle(&mut fb, &far);
        assert_eq!(fb.pixel_at(30, 20), Some(Color::RED));
        // Stored depth is the minimum of the two writes.
        assert_relative_eq!(fb.depth_at(30, 20), 1.0 - 1.0 / 2.0, epsilon = 1e-5);
    }

    #[test]
    fn equal_depth_first_writer_wins() {
        let mut fb = Framebuffer::new(64, 64);
        let verts = [(10.0, 10.0), (50.0, 10.0), (30.0, 50.0)];
        let first = screen_triangle(verts.map(|(x, y)| (x, y, 0.5, 2.0)), Color::RED);
        let second = screen_triangle(verts.map(|(x, y)| (x, y, 0.5, 2.0)), Color::BLUE);

        draw_filled_triangle(&mut fb, &first);
        draw_filled_triangle(&mut fb, &second);
        assert_eq!(fb.pixel_at(30, 20), Some(Color::RED));
    }

    #[test]
    fn degenerate_triangle_renders_no_pixels() {
        let mut fb = Framebuffer::new(32, 32);
        // All three vertices on one scanline: both halves have zero height.
        let tri = screen_triangle(
            [(5.0, 10.0, 0.5, 2.0), (15.0, 10.0, 0.5, 2.0), (25.0, 10.0, 0.5, 2.0)],
            Color::WHITE,
        );
        draw_filled_triangle(&mut fb, &tri);
        assert!(fb.color_pixels().iter().all(|&p| p == Color::BLACK.0));
    }

    #[test]
    fn wireframe_touches_all_corners() {
        let mut fb = Framebuffer::new(32, 32);
        draw_wire_triangle(&mut fb, 2, 2, 20, 5, 10, 25, Color::WHITE);
        assert_eq!(fb.pixel_at(2, 2), Some(Color::WHITE));
        assert_eq!(fb.pixel_at(20, 5), Some(Color::WHITE));
        assert_eq!(fb.pixel_at(10, 25), Some(Color::WHITE));
    }

    #[test]
    fn barycentric_weights_sum_to_one() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let c = Vec2::new(0.0, 10.0);
        let w = barycentric_weights(a, b, c, Vec2::new(2.0, 3.0));
        assert_relative_eq!(w.x + w.y + w.z, 1.0, epsilon = 1e-6);
        // At a vertex the weights collapse onto it.
        let at_b = barycentric_weights(a, b, c, b);
        assert_relative_eq!(at_b.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn equal_w_perspective_interpolation_matches_affine() {
        let a = Vec4::new(0.0, 0.0, 0.5, 3.0);
        let b = Vec4::new(10.0, 0.0, 0.5, 3.0);
        let c = Vec4::new(0.0, 10.0, 0.5, 3.0);
        let (a_uv, b_uv, c_uv) = (Tex2::new(0.0, 0.0), Tex2::new(1.0, 0.0), Tex2::new(0.0, 1.0));
        let weights = Vec3::new(0.2, 0.3, 0.5);

        let (u, v) = interpolated_uv(a, b, c, a_uv, b_uv, c_uv, weights);
        let affine_u = a_uv.u * weights.x + b_uv.u * weights.y + c_uv.u * weights.z;
        let affine_v = a_uv.v * weights.x + b_uv.v * weights.y + c_uv.v * weights.z;
        assert_relative_eq!(u, affine_u, epsilon = 1e-6);
        assert_relative_eq!(v, affine_v, epsilon = 1e-6);
    }

    #[test]
    fn unequal_w_pulls_interpolation_toward_the_near_vertex() {
        // Perspective-correct interpolation weights the near vertex (small
        // w) more than plain affine would.
        let a = Vec4::new(0.0, 0.0, 0.2, 1.0);
        let b = Vec4::new(10.0, 0.0, 0.9, 10.0);
        let c = Vec4::new(0.0, 10.0, 0.9, 10.0);
        let (a_uv, b_uv, c_uv) = (Tex2::new(0.0, 0.0), Tex2::new(1.0, 0.0), Tex2::new(0.0, 1.0));
        let weights = Vec3::new(0.5, 0.5, 0.0);

        let (u, _) = interpolated_uv(a, b, c, a_uv, b_uv, c_uv, weights);
        let affine_u = 0.5;
        assert!(u < affine_u);
    }

    #[test]
    fn textured_fill_samples_with_wrap() {
        let texture = Texture::checkerboard(8, 4, Color::RED, Color::BLUE);
        let mut plain = Framebuffer::new(64, 64);
        let mut wrapped = Framebuffer::new(64, 64);

        let points = [
            Vec4::new(10.0, 10.0, 0.5, 2.0),
            Vec4::new(50.0, 10.0, 0.5, 2.0),
            Vec4::new(10.0, 50.0, 0.5, 2.0),
        ];
        let base = Triangle {
            points,
            tex_coords: [Tex2::new(0.0, 0.0), Tex2::new(1.0, 0.0), Tex2::new(0.0, 1.0)],
            color: Color::WHITE,
        };
        // Shifted a full period: +1 in u, -1 in v (v flips to 2 - v, so
        // both sampled coordinates stay non-negative for the abs-wrap).
        let wrap = Triangle {
            tex_coords: [Tex2::new(1.0, -1.0), Tex2::new(2.0, -1.0), Tex2::new(1.0, 0.0)],
            ..base
        };

        draw_textured_triangle(&mut plain, &base, &texture);
        draw_textured_triangle(&mut wrapped, &wrap, &texture);

        // Probe interior pixels well away from texel-color boundaries,
        // where a ulp of interpolation noise cannot flip the sample.
        for (x, y) in [(12, 11), (35, 12), (12, 35), (25, 25)] {
            assert_eq!(plain.pixel_at(x, y), wrapped.pixel_at(x, y), "pixel ({x}, {y})");
            assert_ne!(plain.pixel_at(x, y), Some(Color::BLACK));
        }
    }
}
