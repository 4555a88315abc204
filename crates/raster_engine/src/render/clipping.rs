//! Frustum clipping
//!
//! Faces are clipped in camera space against the six planes of the view
//! frustum with Sutherland-Hodgman: the polygon is clipped once per plane,
//! each pass replacing the vertex loop with the surviving/intersection
//! vertices. UVs are interpolated alongside positions. A clipped triangle
//! can grow one vertex per plane, so the polygon is a fixed-size value:
//! 3 input vertices + 6 planes stays comfortably under the cap.

use crate::foundation::math::{utils, Vec3};
use crate::render::texture::Tex2;

/// Hard upper bound on clipped polygon size
pub const MAX_POLY_VERTS: usize = 10;

/// Most triangles one clipped polygon can fan out into
pub const MAX_POLY_TRIS: usize = MAX_POLY_VERTS - 2;

/// A frustum plane: a point on the plane and its inward-facing normal
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Any point on the plane
    pub point: Vec3,
    /// Unit normal pointing into the visible half-space
    pub normal: Vec3,
}

/// The six planes of the view frustum
///
/// Built from the horizontal and vertical fields of view plus the near
/// and far distances; fixed until the projection parameters change.
#[derive(Debug, Clone)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Derive the six planes. The side planes pass through the origin
    /// (the camera), tilted by half the field of view; near and far sit
    /// on the z axis.
    pub fn new(fov_x: f32, fov_y: f32, znear: f32, zfar: f32) -> Self {
        let (sin_half_fov_x, cos_half_fov_x) = (fov_x / 2.0).sin_cos();
        let (sin_half_fov_y, cos_half_fov_y) = (fov_y / 2.0).sin_cos();

        let planes = [
            // left
            Plane {
                point: Vec3::zeros(),
                normal: Vec3::new(cos_half_fov_x, 0.0, sin_half_fov_x),
            },
            // right
            Plane {
                point: Vec3::zeros(),
                normal: Vec3::new(-cos_half_fov_x, 0.0, sin_half_fov_x),
            },
            // top
            Plane {
                point: Vec3::zeros(),
                normal: Vec3::new(0.0, -cos_half_fov_y, sin_half_fov_y),
            },
            // bottom
            Plane {
                point: Vec3::zeros(),
                normal: Vec3::new(0.0, cos_half_fov_y, sin_half_fov_y),
            },
            // near
            Plane {
                point: Vec3::new(0.0, 0.0, znear),
                normal: Vec3::new(0.0, 0.0, 1.0),
            },
            // far
            Plane {
                point: Vec3::new(0.0, 0.0, zfar),
                normal: Vec3::new(0.0, 0.0, -1.0),
            },
        ];

        Self { planes }
    }

    /// Clip a polygon against all six planes in place
    pub fn clip(&self, polygon: &mut Polygon) {
        for plane in &self.planes {
            polygon.clip_against_plane(plane);
        }
    }
}

/// Clipping workspace: a vertex loop of at most [`MAX_POLY_VERTS`]
/// positions with their UVs
#[derive(Debug, Clone, Copy)]
pub struct Polygon {
    vertices: [Vec3; MAX_POLY_VERTS],
    tex_coords: [Tex2; MAX_POLY_VERTS],
    len: usize,
}

impl Polygon {
    /// Start from a pre-clip triangle
    pub fn from_triangle(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        t0: Tex2,
        t1: Tex2,
        t2: Tex2,
    ) -> Self {
        let mut vertices = [Vec3::zeros(); MAX_POLY_VERTS];
        let mut tex_coords = [Tex2::default(); MAX_POLY_VERTS];
        vertices[..3].copy_from_slice(&[v0, v1, v2]);
        tex_coords[..3].copy_from_slice(&[t0, t1, t2]);
        Self {
            vertices,
            tex_coords,
            len: 3,
        }
    }

    /// Number of vertices currently in the loop
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when clipping has discarded the whole polygon
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Vertex `i` with its UV
    pub fn vertex(&self, i: usize) -> (Vec3, Tex2) {
        (self.vertices[i], self.tex_coords[i])
    }

    /// One Sutherland-Hodgman pass.
    ///
    /// Walks the loop pairing each vertex with its predecessor. A sign
    /// change in the plane distance emits the intersection point (with the
    /// UV interpolated by the same parameter); a vertex on the inside is
    /// kept. One pass can emit at most `len + 1` vertices; the repack
    /// clamps at capacity.
    fn clip_against_plane(&mut self, plane: &Plane) {
        if self.len == 0 {
            return;
        }

        let mut inside_vertices = [Vec3::zeros(); MAX_POLY_VERTS + 1];
        let mut inside_tex_coords = [Tex2::default(); MAX_POLY_VERTS + 1];
        let mut num_inside = 0usize;

        let mut previous = self.len - 1;
        let mut previous_dp = (self.vertices[previous] - plane.point).dot(&plane.normal);

        for current in 0..self.len {
            let current_dp = (self.vertices[current] - plane.point).dot(&plane.normal);

            if current_dp * previous_dp < 0.0 {
                // Crossed the plane: emit the intersection I = P + t(C - P).
                let t = previous_dp / (previous_dp - current_dp);
                let prev_v = self.vertices[previous];
                let curr_v = self.vertices[current];
                let prev_t = self.tex_coords[previous];
                let curr_t = self.tex_coords[current];

                inside_vertices[num_inside] = Vec3::new(
                    utils::lerp(prev_v.x, curr_v.x, t),
                    utils::lerp(prev_v.y, curr_v.y, t),
                    utils::lerp(prev_v.z, curr_v.z, t),
                );
                inside_tex_coords[num_inside] = Tex2::new(
                    utils::lerp(prev_t.u, curr_t.u, t),
                    utils::lerp(prev_t.v, curr_t.v, t),
                );
                num_inside += 1;
            }

            if current_dp > 0.0 {
                inside_vertices[num_inside] = self.vertices[current];
                inside_tex_coords[num_inside] = self.tex_coords[current];
                num_inside += 1;
            }

            previous = current;
            previous_dp = current_dp;
        }

        let repacked = num_inside.min(MAX_POLY_VERTS);
        self.vertices[..repacked].copy_from_slice(&inside_vertices[..repacked]);
        self.tex_coords[..repacked].copy_from_slice(&inside_tex_coords[..repacked]);
        self.len = repacked;
    }

    /// How many triangles the fan will emit
    pub fn triangle_count(&self) -> usize {
        self.len.saturating_sub(2)
    }

    /// Triangle `i` of the fan anchored at vertex 0: `(0, i+1, i+2)`
    pub fn triangle(&self, i: usize) -> ([Vec3; 3], [Tex2; 3]) {
        let indices = [0, i + 1, i + 2];
        (
            indices.map(|j| self.vertices[j]),
            indices.map(|j| self.tex_coords[j]),
        )
    }
}
