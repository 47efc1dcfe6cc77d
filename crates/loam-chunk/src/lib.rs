//! Bordered chunk grid, sparse block parameters, chunk generation, and the
//! persisted snapshot format.
#![forbid(unsafe_code)]

mod border;
mod generate;
mod grid;
mod params;
mod snapshot;
mod trees;

pub use border::{copy_border_from, mirror_cell};
pub use generate::{GeneratedChunk, generate_chunk, generate_chunk_with_ctx};
pub use grid::ChunkGrid;
pub use params::{BlockParams, ParamKey};
pub use snapshot::{ChunkSnapshot, SnapshotError, SnapshotParam};
pub use trees::{TreePlacement, place_trees};
