//! CPU mesher: turns a bordered chunk grid into opaque, liquid and plant
//! geometry streams.
#![forbid(unsafe_code)]

mod build;
mod chunk;
mod emit;
mod face;
mod mesh_build;

pub use build::build_chunk_mesh;
pub use chunk::ChunkMeshCPU;
pub use face::{face_corners, normal};
pub use mesh_build::MeshBuild;

/// Height of a full liquid source's surface inside its cell.
pub const LIQUID_SURFACE: f32 = 0.875;
/// Tiles per row and column of the texture atlas.
pub const ATLAS_TILES: f32 = 16.0;
