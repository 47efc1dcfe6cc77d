#![forbid(unsafe_code)]
//! Headless voxel world engine: chunk streaming, block edits with events,
//! delayed updates and liquid passes over a worker pool.

pub mod chunk;
pub mod chunk_map;
pub mod collab;
pub mod config;
pub mod events;
pub mod scheduler;
pub mod world;

pub use chunk::{Chunk, ChunkState, PendingEdit};
pub use chunk_map::ChunkMap;
pub use collab::{ChunkPresenter, DropSink, MemorySnapshotStore, SnapshotStore};
pub use config::{LoamConfig, WorldSettings, load_config_from_path};
pub use events::{BlockData, BlockEvents, Command, Commands, ListenerError, Neighbors, neighbor};
pub use scheduler::{PendingUpdate, UpdateQueue};
pub use world::{SetBlockError, SetBlockSettings, SetOutcome, World, WorldStats};

pub use loam_blocks::{BlockType, Face, LIQUID_FULL, ParamKind};
pub use loam_world::{ChunkCoord, LocalPos, WorldPos};
