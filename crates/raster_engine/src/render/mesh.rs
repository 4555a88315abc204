//! Triangle meshes
//!
//! A [`Mesh`] owns its model-space vertices, its faces and its texture.
//! The geometry arrays are sealed behind accessors: nothing mutates them
//! after construction, which is what lets the pipeline treat a mesh as
//! read-only for the whole frame. The transform fields are public; animating
//! them between frames is the caller's business.

use crate::assets::AssetError;
use crate::foundation::math::Vec3;
use crate::render::color::Color;
use crate::render::texture::{Tex2, Texture};

/// One triangular face: three indices into the owning mesh's vertex
/// array, a UV per corner, and a flat base color.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// First vertex index
    pub a: usize,
    /// Second vertex index
    pub b: usize,
    /// Third vertex index
    pub c: usize,
    /// UV at vertex `a`
    pub a_uv: Tex2,
    /// UV at vertex `b`
    pub b_uv: Tex2,
    /// UV at vertex `c`
    pub c_uv: Tex2,
    /// Flat base color
    pub color: Color,
}

/// A textured triangle mesh with its model transform
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    texture: Texture,

    /// Euler-angle rotation, radians per axis
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Translation
    pub translation: Vec3,
}

impl Mesh {
    /// Build a mesh from parsed geometry, validating that every face
    /// index lands inside the vertex array.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>, texture: Texture) -> Result<Self, AssetError> {
        for (face_index, face) in faces.iter().enumerate() {
            for index in [face.a, face.b, face.c] {
                if index >= vertices.len() {
                    return Err(AssetError::InvalidIndex {
                        face: face_index,
                        index,
                        vertex_count: vertices.len(),
                    });
                }
            }
        }

        log::debug!(
            "Mesh created: {} vertices, {} faces, {}x{} texture",
            vertices.len(),
            faces.len(),
            texture.width(),
            texture.height()
        );

        Ok(Self {
            vertices,
            faces,
            texture,
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            translation: Vec3::zeros(),
        })
    }

    /// Model-space vertices
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// The mesh's texture
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// The built-in unit cube: 8 vertices, 12 faces, UV-mapped per side.
    pub fn cube(texture: Texture) -> Self {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];

        // (a, b, c) triples are 1-based here so the table reads like the
        // OBJ convention; shifted on construction below.
        #[rustfmt::skip]
        let face_table: [(usize, usize, usize); 12] = [
            (1, 2, 3), (1, 3, 4), // front
            (4, 3, 5), (4, 5, 6), // right
            (6, 5, 7), (6, 7, 8), // back
            (8, 7, 2), (8, 2, 1), // left
            (2, 7, 5), (2, 5, 3), // top
            (6, 8, 1), (6, 1, 4), // bottom
        ];

        let faces = face_table
            .iter()
            .enumerate()
            .map(|(i, &(a, b, c))| {
                // The second triangle of each quad spans the other diagonal.
                let (b_uv, c_uv) = if i % 2 == 0 {
                    (Tex2::new(0.0, 0.0), Tex2::new(1.0, 0.0))
                } else {
                    (Tex2::new(1.0, 0.0), Tex2::new(1.0, 1.0))
                };
                Face {
                    a: a - 1,
                    b: b - 1,
                    c: c - 1,
                    a_uv: Tex2::new(0.0, 1.0),
                    b_uv,
                    c_uv,
                    color: Color::WHITE,
                }
            })
            .collect();

        Self::new(vertices, faces, texture)
            .expect("cube face table indexes its own vertex list")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_texture() -> Texture {
        Texture::checkerboard(2, 1, Color::WHITE, Color::BLACK)
    }

    #[test]
    fn cube_has_twelve_faces() {
        let cube = Mesh::cube(tiny_texture());
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.faces().len(), 12);
        assert_eq!(cube.scale, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn out_of_range_face_index_is_rejected() {
        let vertices = vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)];
        let faces = vec![Face {
            a: 0,
            b: 1,
            c: 2,
            a_uv: Tex2::default(),
            b_uv: Tex2::default(),
            c_uv: Tex2::default(),
            color: Color::WHITE,
        }];
        let err = Mesh::new(vertices, faces, tiny_texture()).unwrap_err();
        match err {
            AssetError::InvalidIndex { face, index, vertex_count } => {
                assert_eq!((face, index, vertex_count), (0, 2, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
