//! The rendering core: framebuffer, camera, light, clipping, rasterizer
//! and the pipeline driver tying them together

pub mod camera;
pub mod clipping;
pub mod color;
pub mod framebuffer;
pub mod lighting;
pub mod mesh;
pub mod pipeline;
pub mod rasterizer;
pub mod texture;

pub use camera::Camera;
pub use color::Color;
pub use framebuffer::Framebuffer;
pub use lighting::DirectionalLight;
pub use mesh::{Face, Mesh};
pub use pipeline::{
    CullMethod, RenderBufferMethod, RenderMethod, Renderer, ShadingMethod, MAX_TRIS_PER_FRAME,
};
pub use texture::{Tex2, Texture};
