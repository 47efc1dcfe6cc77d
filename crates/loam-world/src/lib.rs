//! World addressing, worldgen parameters, and per-column terrain sampling.
#![forbid(unsafe_code)]

mod chunk_coord;
pub mod coords;
mod gen_ctx;
pub mod generation;
mod world;
pub mod worldgen;

pub use chunk_coord::ChunkCoord;
pub use coords::{
    CHUNK_HEIGHT, CHUNK_WIDTH, GRID_LEN, GRID_X, GRID_Z, LocalPos, WorldPos, clamp_border,
    from_index, local_to_world, to_index, world_to_local,
};
pub use gen_ctx::GenCtx;
pub use generation::{ColumnSample, ColumnSampler};
pub use world::WorldGen;
pub use worldgen::{BiomeDef, TreeKind, WorldGenConfig, load_worldgen_from_path};
