//! The per-frame pipeline driver
//!
//! [`Renderer`] owns everything a frame touches: the framebuffer, the
//! camera, the light, the projection matrix and frustum, the mode flags,
//! and the bounded triangle emit buffer. Rendering a scene walks each
//! mesh's faces through transform, cull, clip, project and hand-off to the
//! rasterizer. Meshes are never mutated.

use bitflags::bitflags;

use crate::config::ApplicationConfig;
use crate::foundation::math::{
    project_vec4, vec3_from_vec4, vec4_from_vec3, Mat4, Mat4Ext, Vec3, Vec4,
};
use crate::render::camera::Camera;
use crate::render::clipping::{Frustum, Polygon};
use crate::render::color::Color;
use crate::render::framebuffer::Framebuffer;
use crate::render::lighting::{apply_intensity, DirectionalLight};
use crate::render::mesh::Mesh;
use crate::render::rasterizer::{
    draw_filled_triangle, draw_textured_triangle, draw_wire_triangle, Triangle,
};

/// Hard cap on triangles emitted per frame; the excess is dropped.
pub const MAX_TRIS_PER_FRAME: usize = 10_000;

/// Side length of the vertex markers drawn by the `WireVertex` mode
const VERTEX_MARKER_SIZE: i32 = 6;

/// Which faces are discarded before clipping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMethod {
    /// Draw everything
    None,
    /// Discard faces whose normal points away from the camera
    Backface,
}

/// What gets drawn for each surviving triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMethod {
    /// Edges only
    Wire,
    /// Edges plus vertex markers
    WireVertex,
    /// Flat-colored fill
    FillTriangle,
    /// Flat-colored fill plus edges
    FillTriangleWire,
    /// Textured fill
    Textured,
    /// Textured fill plus edges
    WireTextured,
}

/// Per-face lighting model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMethod {
    /// Base color as-is
    None,
    /// One intensity per face from the light angle
    Flat,
}

/// Which buffer the host should present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderBufferMethod {
    /// The rendered image
    ColorBuffer,
    /// The grayscale depth visualization
    ZBuffer,
}

bitflags! {
    /// Draw passes a render method decomposes into
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct DrawPasses: u8 {
        const WIREFRAME = 1 << 0;
        const VERTICES  = 1 << 1;
        const FILLED    = 1 << 2;
        const TEXTURED  = 1 << 3;
    }
}

impl RenderMethod {
    fn passes(self) -> DrawPasses {
        match self {
            RenderMethod::Wire => DrawPasses::WIREFRAME,
            RenderMethod::WireVertex => DrawPasses::WIREFRAME | DrawPasses::VERTICES,
            RenderMethod::FillTriangle => DrawPasses::FILLED,
            RenderMethod::FillTriangleWire => DrawPasses::FILLED | DrawPasses::WIREFRAME,
            RenderMethod::Textured => DrawPasses::TEXTURED,
            RenderMethod::WireTextured => DrawPasses::TEXTURED | DrawPasses::WIREFRAME,
        }
    }
}

/// Normalized normal of a camera-space face, left-handed `(ab, ac)` order
fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = (b - a).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);
    let ac = (c - a).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros);
    ab.cross(&ac).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros)
}

/// The owning renderer: pipeline state plus the render target
pub struct Renderer {
    framebuffer: Framebuffer,
    camera: Camera,
    light: DirectionalLight,
    projection: Mat4,
    frustum: Frustum,
    view: Mat4,

    cull_method: CullMethod,
    render_method: RenderMethod,
    shading_method: ShadingMethod,
    render_buffer_method: RenderBufferMethod,
    grid_enabled: bool,

    /// Per-mesh emit buffer, reused across frames
    triangles: Vec<Triangle>,
    emitted: usize,
    dropped: usize,
}

impl Renderer {
    /// Build a renderer for the configured window and projection
    pub fn new(config: &ApplicationConfig) -> Self {
        let width = config.window.width;
        let height = config.window.height;
        let fov_y = config.fov_y();
        let znear = config.projection.z_near;
        let zfar = config.projection.z_far;

        // The projection uses the y aspect; the frustum's horizontal
        // field of view comes from widening fov_y by the x aspect.
        let aspect_y = height as f32 / width as f32;
        let aspect_x = width as f32 / height as f32;
        let fov_x = 2.0 * ((fov_y / 2.0).tan() * aspect_x).atan();

        log::info!(
            "Renderer initialized: {width}x{height}, fov_y {:.1} deg, z [{znear}, {zfar}]",
            fov_y.to_degrees()
        );

        Self {
            framebuffer: Framebuffer::new(width, height),
            camera: Camera::new(Vec3::zeros()),
            light: DirectionalLight::default(),
            projection: Mat4::perspective(fov_y, aspect_y, znear, zfar),
            frustum: Frustum::new(fov_x, fov_y, znear, zfar),
            view: Mat4::identity(),
            cull_method: CullMethod::Backface,
            render_method: RenderMethod::Textured,
            shading_method: ShadingMethod::Flat,
            render_buffer_method: RenderBufferMethod::ColorBuffer,
            grid_enabled: false,
            triangles: Vec::with_capacity(256),
            emitted: 0,
            dropped: 0,
        }
    }

    /// The camera, for reading
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The camera, for the host's movement controls
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Replace the directional light
    pub fn set_light(&mut self, light: DirectionalLight) {
        self.light = light;
    }

    /// Current cull method
    pub fn cull_method(&self) -> CullMethod {
        self.cull_method
    }

    /// Select the cull method
    pub fn set_cull_method(&mut self, method: CullMethod) {
        self.cull_method = method;
    }

    /// Current render method
    pub fn render_method(&self) -> RenderMethod {
        self.render_method
    }

    /// Select the render method
    pub fn set_render_method(&mut self, method: RenderMethod) {
        self.render_method = method;
    }

    /// Current shading method
    pub fn shading_method(&self) -> ShadingMethod {
        self.shading_method
    }

    /// Select the shading method
    pub fn set_shading_method(&mut self, method: ShadingMethod) {
        self.shading_method = method;
    }

    /// Which buffer [`Renderer::presentable_pixels`] returns
    pub fn render_buffer_method(&self) -> RenderBufferMethod {
        self.render_buffer_method
    }

    /// Select the presented buffer
    pub fn set_render_buffer_method(&mut self, method: RenderBufferMethod) {
        self.render_buffer_method = method;
    }

    /// Toggle the background pixel grid
    pub fn set_grid_enabled(&mut self, enabled: bool) {
        self.grid_enabled = enabled;
    }

    /// The render target
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Triangles emitted and dropped by the last
    /// [`Renderer::render_scene`] call
    pub fn frame_stats(&self) -> (usize, usize) {
        (self.emitted, self.dropped)
    }

    /// Render one frame of the scene into the framebuffer
    pub fn render_scene(&mut self, meshes: &[Mesh]) {
        self.framebuffer.clear_color(Color::BLACK);
        self.framebuffer.clear_depth();
        if self.grid_enabled {
            self.framebuffer.draw_grid();
        }

        self.view = self.camera.view_matrix();
        self.emitted = 0;
        self.dropped = 0;

        for mesh in meshes {
            self.draw_mesh(mesh);
        }

        if self.dropped > 0 {
            log::debug!(
                "triangle budget exceeded: kept {}, dropped {}",
                self.emitted,
                self.dropped
            );
        }
    }

    /// Pixels of the buffer selected by the render-buffer method,
    /// row-major `0xAARRGGBB`
    pub fn presentable_pixels(&self) -> &[u32] {
        match self.render_buffer_method {
            RenderBufferMethod::ColorBuffer => self.framebuffer.color_pixels(),
            RenderBufferMethod::ZBuffer => self.framebuffer.depth_display_pixels(),
        }
    }

    fn world_matrix(mesh: &Mesh) -> Mat4 {
        let mut world = Mat4::scaling(mesh.scale.x, mesh.scale.y, mesh.scale.z);
        world = Mat4::rotation_x(mesh.rotation.x) * world;
        world = Mat4::rotation_y(mesh.rotation.y) * world;
        world = Mat4::rotation_z(mesh.rotation.z) * world;
        world = Mat4::translation(mesh.translation.x, mesh.translation.y, mesh.translation.z)
            * world;
        world
    }

    fn draw_mesh(&mut self, mesh: &Mesh) {
        let transform = self.view * Self::world_matrix(mesh);
        let half_width = self.framebuffer.width() as f32 / 2.0;
        let half_height = self.framebuffer.height() as f32 / 2.0;

        self.triangles.clear();

        for face in mesh.faces() {
            let vertices = [
                mesh.vertices()[face.a],
                mesh.vertices()[face.b],
                mesh.vertices()[face.c],
            ];
            let transformed: [Vec4; 3] =
                vertices.map(|v| transform * vec4_from_vec3(v));

            let a = vec3_from_vec4(transformed[0]);
            let b = vec3_from_vec4(transformed[1]);
            let c = vec3_from_vec4(transformed[2]);

            let normal = face_normal(a, b, c);

            // The camera sits at the origin of camera space.
            let camera_ray = -a;
            let alignment = normal.dot(&camera_ray);

            if self.cull_method == CullMethod::Backface && alignment < 0.0 {
                continue;
            }

            let mut polygon =
                Polygon::from_triangle(a, b, c, face.a_uv, face.b_uv, face.c_uv);
            self.frustum.clip(&mut polygon);

            let color = match self.shading_method {
                ShadingMethod::Flat => {
                    let intensity = -normal.dot(&self.light.direction());
                    apply_intensity(face.color, intensity)
                }
                ShadingMethod::None => face.color,
            };

            for i in 0..polygon.triangle_count() {
                if self.emitted >= MAX_TRIS_PER_FRAME {
                    self.dropped += 1;
                    continue;
                }

                let (points, tex_coords) = polygon.triangle(i);
                let points = points.map(|p| {
                    let mut projected = project_vec4(&self.projection, vec4_from_vec3(p));

                    // Screen space: y down, origin at the top-left corner.
                    projected.y = -projected.y;
                    projected.x *= half_width;
                    projected.y *= half_height;
                    projected.x += half_width;
                    projected.y += half_height;
                    projected
                });

                self.triangles.push(Triangle {
                    points,
                    tex_coords,
                    color,
                });
                self.emitted += 1;
            }
        }

        let passes = self.render_method.passes();
        for triangle in &self.triangles {
            if passes.contains(DrawPasses::FILLED) {
                draw_filled_triangle(&mut self.framebuffer, triangle);
            }

            if passes.contains(DrawPasses::VERTICES) {
                for point in &triangle.points {
                    self.framebuffer.draw_rect(
                        point.x as i32 - VERTEX_MARKER_SIZE / 2,
                        point.y as i32 - VERTEX_MARKER_SIZE / 2,
                        VERTEX_MARKER_SIZE,
                        VERTEX_MARKER_SIZE,
                        Color::RED,
                    );
                }
            }

            if passes.contains(DrawPasses::TEXTURED) {
                draw_textured_triangle(&mut self.framebuffer, triangle, mesh.texture());
            }

            if passes.contains(DrawPasses::WIREFRAME) {
                let [p0, p1, p2] = triangle.points;
                draw_wire_triangle(
                    &mut self.framebuffer,
                    p0.x as i32,
                    p0.y as i32,
                    p1.x as i32,
                    p1.y as i32,
                    p2.x as i32,
                    p2.y as i32,
                    Color::WHITE,
                );
            }
        }
    }
}
