//! OBJ file loader
//!
//! Parses the `v` / `vt` / `f` subset of Wavefront OBJ. Indices are
//! 1-based in the file and converted to 0-based on ingest. Faces with more
//! than three corners are fan-triangulated. The texture-coordinate table is
//! only needed while faces are being assembled, so it lives in a scratch
//! arena scope and is rolled back before the loader returns.

use std::fs;
use std::path::Path;

use crate::assets::AssetError;
use crate::foundation::math::Vec3;
use crate::foundation::memory::Arena;
use crate::render::color::Color;
use crate::render::mesh::Face;
use crate::render::texture::Tex2;

/// Parsed OBJ geometry, ready to be combined with a texture into a mesh
#[derive(Debug)]
pub struct ObjData {
    /// Model-space vertex positions
    pub vertices: Vec<Vec3>,
    /// Triangulated faces with per-corner UVs
    pub faces: Vec<Face>,
}

/// Loader for Wavefront OBJ geometry
pub struct ObjLoader;

/// One corner of a face line: vertex index plus optional UV index, both
/// already 0-based.
struct FaceCorner {
    vertex: usize,
    uv: Option<usize>,
}

impl ObjLoader {
    /// Load an OBJ file. `scratch` backs the temporary UV table.
    pub fn load_obj<P: AsRef<Path>>(path: P, scratch: &mut Arena) -> Result<ObjData, AssetError> {
        let path_ref = path.as_ref();
        log::debug!("Loading OBJ from: {:?}", path_ref);

        let text = fs::read_to_string(path_ref)?;
        let data = Self::parse(&text, scratch)?;

        log::info!(
            "Loaded OBJ {:?}: {} vertices, {} faces",
            path_ref,
            data.vertices.len(),
            data.faces.len()
        );
        Ok(data)
    }

    /// Parse OBJ text. Exposed separately so tests can feed strings.
    pub fn parse(text: &str, scratch: &mut Arena) -> Result<ObjData, AssetError> {
        let uv_count = text
            .lines()
            .filter(|line| line.split_whitespace().next() == Some("vt"))
            .count();

        let scope = scratch.begin_scope();
        let uv_table: &mut [Tex2] = scratch
            .alloc_slice(uv_count.max(1))
            .map_err(|e| AssetError::Parse(format!("UV table allocation failed: {e}")))?;

        let mut vertices: Vec<Vec3> = Vec::new();
        let mut faces: Vec<Face> = Vec::new();
        let mut uvs_seen = 0usize;

        for (line_number, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let keyword = parts.next().unwrap_or_default();
            let rest: Vec<&str> = parts.collect();

            match keyword {
                "v" => {
                    let [x, y, z] = parse_floats::<3>(&rest, line_number)?;
                    vertices.push(Vec3::new(x, y, z));
                }
                "vt" => {
                    let [u, v] = parse_floats::<2>(&rest, line_number)?;
                    uv_table[uvs_seen] = Tex2::new(u, v);
                    uvs_seen += 1;
                }
                "f" => {
                    if rest.len() < 3 {
                        return Err(AssetError::Parse(format!(
                            "line {}: face with fewer than 3 corners",
                            line_number + 1
                        )));
                    }

                    let corners = rest
                        .iter()
                        .map(|part| parse_corner(part, line_number))
                        .collect::<Result<Vec<_>, _>>()?;

                    for corner in &corners {
                        if let Some(uv) = corner.uv {
                            if uv >= uvs_seen {
                                return Err(AssetError::Parse(format!(
                                    "line {}: UV index {} out of range",
                                    line_number + 1,
                                    uv + 1
                                )));
                            }
                        }
                    }

                    let uv_of = |corner: &FaceCorner| {
                        corner.uv.map_or_else(Tex2::default, |i| uv_table[i])
                    };

                    // Fan triangulation anchored at the first corner.
                    for i in 1..corners.len() - 1 {
                        faces.push(Face {
                            a: corners[0].vertex,
                            b: corners[i].vertex,
                            c: corners[i + 1].vertex,
                            a_uv: uv_of(&corners[0]),
                            b_uv: uv_of(&corners[i]),
                            c_uv: uv_of(&corners[i + 1]),
                            color: Color::WHITE,
                        });
                    }
                }
                // vn, usemtl, o, g, s, mtllib: not used by this pipeline.
                _ => {}
            }
        }

        scratch.end_scope(scope);

        if vertices.is_empty() {
            return Err(AssetError::Parse("no vertices found".to_string()));
        }

        // Face indices are checked again by Mesh::new; failing here keeps
        // the error tied to the file that caused it.
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

        Ok(ObjData { vertices, faces })
    }
}

fn parse_floats<const N: usize>(parts: &[&str], line_number: usize) -> Result<[f32; N], AssetError> {
    if parts.len() < N {
        return Err(AssetError::Parse(format!(
            "line {}: expected {} numeric fields, found {}",
            line_number + 1,
            N,
            parts.len()
        )));
    }

    let mut values = [0.0f32; N];
    for (slot, part) in values.iter_mut().zip(parts) {
        *slot = part.parse().map_err(|_| {
            AssetError::Parse(format!("line {}: invalid number {part:?}", line_number + 1))
        })?;
    }
    Ok(values)
}

fn parse_corner(part: &str, line_number: usize) -> Result<FaceCorner, AssetError> {
    let mut fields = part.split('/');

    let vertex: usize = fields
        .next()
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .filter(|&v: &usize| v > 0)
        .ok_or_else(|| {
            AssetError::Parse(format!("line {}: invalid face corner {part:?}", line_number + 1))
        })?;

    let uv = match fields.next() {
        Some("") | None => None,
        Some(s) => {
            let parsed: usize = s.parse().map_err(|_| {
                AssetError::Parse(format!("line {}: invalid UV index {s:?}", line_number + 1))
            })?;
            if parsed == 0 {
                return Err(AssetError::Parse(format!(
                    "line {}: OBJ indices are 1-based",
                    line_number + 1
                )));
            }
            Some(parsed - 1)
        }
    };

    // Normal index is parsed past but unused.
    Ok(FaceCorner { vertex: vertex - 1, uv })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "\
# simple triangle
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn parses_triangle_with_uvs() {
        let mut arena = Arena::with_capacity(4096);
        let data = ObjLoader::parse(TRIANGLE_OBJ, &mut arena).unwrap();
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.faces.len(), 1);

        let face = &data.faces[0];
        assert_eq!((face.a, face.b, face.c), (0, 1, 2));
        assert_eq!(face.b_uv, Tex2::new(1.0, 0.0));
        // The UV table scope was rolled back.
        assert_eq!(arena.remaining(), arena.capacity());
    }

    #[test]
    fn quads_are_fan_triangulated() {
        let obj = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mut arena = Arena::with_capacity(1024);
        let data = ObjLoader::parse(obj, &mut arena).unwrap();
        assert_eq!(data.faces.len(), 2);
        assert_eq!(
            (data.faces[1].a, data.faces[1].b, data.faces[1].c),
            (0, 2, 3)
        );
    }

    #[test]
    fn face_without_uv_defaults_to_origin() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1//2 2//2 3//2
";
        let mut arena = Arena::with_capacity(1024);
        let data = ObjLoader::parse(obj, &mut arena).unwrap();
        assert_eq!(data.faces[0].a_uv, Tex2::default());
    }

    #[test]
    fn vertex_index_out_of_range_is_rejected() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 9
";
        let mut arena = Arena::with_capacity(1024);
        let err = ObjLoader::parse(obj, &mut arena).unwrap_err();
        assert!(matches!(err, AssetError::InvalidIndex { index: 8, .. }));
    }

    #[test]
    fn garbage_reports_parse_error_with_line() {
        let obj = "v 0 0 not-a-number\n";
        let mut arena = Arena::with_capacity(1024);
        let err = ObjLoader::parse(obj, &mut arena).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
