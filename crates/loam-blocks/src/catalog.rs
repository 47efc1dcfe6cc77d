//! Static per-type lookup tables.
//!
//! `describe` is total: every `BlockType` has an entry, and `Air` carries a
//! harmless default (transparent, no textures, no drop).

use super::types::{BlockShape, BlockState, BlockType, Face};

/// Tile coordinates inside the 16x16 texture atlas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileRef {
    pub col: u8,
    pub row: u8,
}

impl TileRef {
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FaceTextures {
    pub top: TileRef,
    pub bottom: TileRef,
    pub side: TileRef,
}

impl FaceTextures {
    const fn all(t: TileRef) -> Self {
        Self {
            top: t,
            bottom: t,
            side: t,
        }
    }

    const fn columnar(top_bottom: TileRef, side: TileRef) -> Self {
        Self {
            top: top_bottom,
            bottom: top_bottom,
            side,
        }
    }

    #[inline]
    pub fn for_face(&self, face: Face) -> TileRef {
        match face {
            Face::PosY => self.top,
            Face::NegY => self.bottom,
            _ => self.side,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SoundProfile {
    Silent,
    Stone,
    Dirt,
    Grass,
    Sand,
    Snow,
    Wood,
    Foliage,
    Liquid,
    Glass,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropPolicy {
    Nothing,
    Itself,
    Other(BlockType),
}

#[derive(Copy, Clone, Debug)]
pub struct BlockInfo {
    pub name: &'static str,
    pub shape: BlockShape,
    pub state: BlockState,
    pub textures: FaceTextures,
    /// Seconds of bare-hand mining; negative means unbreakable.
    pub durability: f32,
    pub sound: SoundProfile,
    pub drop: DropPolicy,
    /// Number of consecutive atlas tiles a cross plant may pick from.
    pub variants: u8,
}

const fn info(
    name: &'static str,
    shape: BlockShape,
    state: BlockState,
    textures: FaceTextures,
    durability: f32,
    sound: SoundProfile,
    drop: DropPolicy,
) -> BlockInfo {
    BlockInfo {
        name,
        shape,
        state,
        textures,
        durability,
        sound,
        drop,
        variants: 1,
    }
}

const fn plant(name: &'static str, tile: TileRef, variants: u8) -> BlockInfo {
    BlockInfo {
        name,
        shape: BlockShape::CrossPlant,
        state: BlockState::LiquidDestroyable,
        textures: FaceTextures::all(tile),
        durability: 0.0,
        sound: SoundProfile::Foliage,
        drop: DropPolicy::Nothing,
        variants,
    }
}

use BlockShape::{Cube, HalfBlock, Liquid};
use BlockState::{Solid, Transparent};
use DropPolicy::{Itself, Nothing, Other};

const NO_TILE: TileRef = TileRef::new(0, 15);

// Indexed by `BlockType::code()`; order must match the enum.
static CATALOG: [BlockInfo; BlockType::COUNT] = [
    info("air", Cube, Transparent, FaceTextures::all(NO_TILE), 0.0, SoundProfile::Silent, Nothing),
    info("dirt", Cube, Solid, FaceTextures::all(TileRef::new(2, 0)), 0.5, SoundProfile::Dirt, Itself),
    info(
        "grass",
        Cube,
        Solid,
        FaceTextures {
            top: TileRef::new(0, 0),
            bottom: TileRef::new(2, 0),
            side: TileRef::new(3, 0),
        },
        0.6,
        SoundProfile::Grass,
        Other(BlockType::Dirt),
    ),
    info("stone", Cube, Solid, FaceTextures::all(TileRef::new(1, 0)), 1.5, SoundProfile::Stone, Itself),
    info("water", Liquid, BlockState::Liquid, FaceTextures::all(TileRef::new(13, 12)), -1.0, SoundProfile::Liquid, Nothing),
    info("sand", Cube, Solid, FaceTextures::all(TileRef::new(2, 1)), 0.5, SoundProfile::Sand, Itself),
    info(
        "snow",
        Cube,
        Solid,
        FaceTextures {
            top: TileRef::new(2, 4),
            bottom: TileRef::new(2, 0),
            side: TileRef::new(4, 4),
        },
        0.2,
        SoundProfile::Snow,
        Itself,
    ),
    info("ice", Cube, Solid, FaceTextures::all(TileRef::new(3, 4)), 0.5, SoundProfile::Glass, Nothing),
    info("bedrock", Cube, Solid, FaceTextures::all(TileRef::new(1, 1)), -1.0, SoundProfile::Stone, Nothing),
    info("gravel", Cube, Solid, FaceTextures::all(TileRef::new(3, 1)), 0.6, SoundProfile::Sand, Itself),
    info(
        "sandstone",
        Cube,
        Solid,
        FaceTextures {
            top: TileRef::new(0, 11),
            bottom: TileRef::new(0, 13),
            side: TileRef::new(0, 12),
        },
        0.8,
        SoundProfile::Stone,
        Itself,
    ),
    info("oak_log", Cube, Solid, FaceTextures::columnar(TileRef::new(5, 1), TileRef::new(4, 1)), 2.0, SoundProfile::Wood, Itself),
    info("oak_leaves", Cube, Transparent, FaceTextures::all(TileRef::new(4, 3)), 0.2, SoundProfile::Foliage, Nothing),
    info("birch_log", Cube, Solid, FaceTextures::columnar(TileRef::new(5, 1), TileRef::new(5, 7)), 2.0, SoundProfile::Wood, Itself),
    info("birch_leaves", Cube, Transparent, FaceTextures::all(TileRef::new(5, 3)), 0.2, SoundProfile::Foliage, Nothing),
    info("spruce_log", Cube, Solid, FaceTextures::columnar(TileRef::new(5, 1), TileRef::new(4, 7)), 2.0, SoundProfile::Wood, Itself),
    info("spruce_leaves", Cube, Transparent, FaceTextures::all(TileRef::new(4, 8)), 0.2, SoundProfile::Foliage, Nothing),
    info("oak_planks", Cube, Solid, FaceTextures::all(TileRef::new(4, 0)), 2.0, SoundProfile::Wood, Itself),
    info(
        "stone_slab",
        HalfBlock,
        Solid,
        FaceTextures::columnar(TileRef::new(6, 0), TileRef::new(5, 0)),
        1.5,
        SoundProfile::Stone,
        Itself,
    ),
    info("wood_slab", HalfBlock, Solid, FaceTextures::all(TileRef::new(4, 0)), 2.0, SoundProfile::Wood, Itself),
    plant("tall_grass", TileRef::new(7, 2), 3),
    plant("flower", TileRef::new(12, 0), 2),
    plant("dead_bush", TileRef::new(7, 3), 1),
];

#[inline]
pub fn describe(block: BlockType) -> &'static BlockInfo {
    &CATALOG[block.code() as usize]
}

/// Occlusion class of `block` as seen across `face`.
///
/// Half blocks only fill their lower half, so they are solid on the bottom
/// face and transparent everywhere else.
#[inline]
pub fn state_at(block: BlockType, face: Face) -> BlockState {
    let info = describe(block);
    match info.shape {
        BlockShape::HalfBlock if face != Face::NegY => BlockState::Transparent,
        _ => info.state,
    }
}

#[inline]
pub fn can_support_plant(block: BlockType) -> bool {
    matches!(block, BlockType::Grass | BlockType::Dirt | BlockType::Sand)
}

#[inline]
pub fn can_support_tree(block: BlockType) -> bool {
    matches!(block, BlockType::Grass | BlockType::Dirt | BlockType::Snow)
}

/// What breaking `block` yields, if anything.
#[inline]
pub fn drop_for(block: BlockType) -> Option<BlockType> {
    match describe(block).drop {
        DropPolicy::Nothing => None,
        DropPolicy::Itself => Some(block),
        DropPolicy::Other(other) => Some(other),
    }
}
