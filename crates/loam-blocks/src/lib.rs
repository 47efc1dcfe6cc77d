//! Block types, static catalog, and face-state rules.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod types;

pub use catalog::{
    BlockInfo, DropPolicy, FaceTextures, SoundProfile, TileRef, can_support_plant,
    can_support_tree, describe, drop_for, state_at,
};
pub use types::{BlockShape, BlockState, BlockType, Face, LIQUID_FULL, ParamKind};
