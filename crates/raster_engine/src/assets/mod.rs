//! Asset ingestion: OBJ geometry and PNG textures

pub mod image_loader;
pub mod obj_loader;

use thiserror::Error;

/// Errors produced while loading or validating assets
#[derive(Debug, Error)]
pub enum AssetError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file content did not parse.
    #[error("parse error: {0}")]
    Parse(String),

    /// An image failed to decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// A face referenced a vertex outside the mesh's vertex array.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidIndex {
        /// Index of the offending face
        face: usize,
        /// The out-of-range vertex index
        index: usize,
        /// Size of the vertex array
        vertex_count: usize,
    },
}
