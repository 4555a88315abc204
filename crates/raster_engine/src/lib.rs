//! # Raster Engine
//!
//! A software 3D rasterizer. Every stage a GPU would normally run is
//! executed on the CPU: world/view transformation, backface culling,
//! homogeneous clipping against the view frustum, perspective projection,
//! and scanline triangle rasterization with a z-buffer and
//! perspective-correct texture sampling.
//!
//! ## Pipeline
//!
//! For each mesh, each triangular face is:
//!
//! 1. transformed to camera space (`view * world`),
//! 2. backface-culled against the camera ray,
//! 3. clipped against the six frustum planes (Sutherland-Hodgman),
//! 4. re-triangulated and projected to screen space,
//! 5. handed to the rasterizer, which fills pixels with depth testing
//!    and perspective-correct texturing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use raster_engine::prelude::*;
//!
//! let config = ApplicationConfig::default();
//! let mut renderer = Renderer::new(&config);
//! let mesh = Mesh::cube(Texture::checkerboard(64, 8, Color::WHITE, Color::GRAY));
//!
//! renderer.render_scene(std::slice::from_ref(&mesh));
//! let pixels = renderer.presentable_pixels(); // blit these to a window
//! # let _ = pixels;
//! ```
//!
//! The engine owns no window: a host application blits
//! [`Renderer::presentable_pixels`] to whatever surface it likes and feeds
//! camera/mode changes back in through the setters on [`render::Renderer`].

pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{image_loader::ImageData, obj_loader::ObjLoader},
        config::ApplicationConfig,
        foundation::{
            math::{Mat4, Mat4Ext, Vec2, Vec3, Vec4},
            memory::Arena,
            time::{FpsCounter, FramePacer},
        },
        render::{
            Camera, Color, CullMethod, DirectionalLight, Framebuffer, Mesh, RenderBufferMethod,
            RenderMethod, Renderer, ShadingMethod, Texture,
        },
    };
}
