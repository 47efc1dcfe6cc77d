use serde::{Deserialize, Serialize};

/// Block-type id. The discriminant is the single-byte code used by persisted snapshots.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Dirt = 1,
    Grass = 2,
    Stone = 3,
    Water = 4,
    Sand = 5,
    Snow = 6,
    Ice = 7,
    Bedrock = 8,
    Gravel = 9,
    Sandstone = 10,
    OakLog = 11,
    OakLeaves = 12,
    BirchLog = 13,
    BirchLeaves = 14,
    SpruceLog = 15,
    SpruceLeaves = 16,
    OakPlanks = 17,
    StoneSlab = 18,
    WoodSlab = 19,
    TallGrass = 20,
    Flower = 21,
    DeadBush = 22,
}

impl BlockType {
    pub const COUNT: usize = 23;

    pub const ALL: [BlockType; BlockType::COUNT] = [
        BlockType::Air,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Stone,
        BlockType::Water,
        BlockType::Sand,
        BlockType::Snow,
        BlockType::Ice,
        BlockType::Bedrock,
        BlockType::Gravel,
        BlockType::Sandstone,
        BlockType::OakLog,
        BlockType::OakLeaves,
        BlockType::BirchLog,
        BlockType::BirchLeaves,
        BlockType::SpruceLog,
        BlockType::SpruceLeaves,
        BlockType::OakPlanks,
        BlockType::StoneSlab,
        BlockType::WoodSlab,
        BlockType::TallGrass,
        BlockType::Flower,
        BlockType::DeadBush,
    ];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a persisted byte. Unknown codes decode to `Air`.
    #[inline]
    pub fn from_code(code: u8) -> BlockType {
        Self::ALL.get(code as usize).copied().unwrap_or(BlockType::Air)
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }

    #[inline]
    pub fn is_liquid(self) -> bool {
        self == BlockType::Water
    }
}

/// Geometry family; selects the emission routine and the output stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockShape {
    Cube,
    Liquid,
    CrossPlant,
    HalfBlock,
}

/// Occlusion class used for face culling and liquid replacement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockState {
    Solid,
    Transparent,
    Liquid,
    /// Non-solid and overwritten by flowing liquid (plants).
    LiquidDestroyable,
}

/// Sparse per-voxel parameter kinds. A voxel may hold several at once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ParamKind {
    /// 8 = full source, decreasing by one per horizontal hop.
    LiquidSource = 0,
    /// Quarter turns about +Y: stored 0..=3 for 0/90/180/270 degrees, not
    /// the degree value itself. Readers take it modulo 4.
    Rotation = 1,
    /// Texture variant index for cross plants.
    PlantVariant = 2,
}

impl ParamKind {
    pub const ALL: [ParamKind; 3] = [
        ParamKind::LiquidSource,
        ParamKind::Rotation,
        ParamKind::PlantVariant,
    ];

    /// Value reported when a voxel has no stored parameter of this kind.
    #[inline]
    pub const fn default_value(self) -> u8 {
        match self {
            ParamKind::LiquidSource => LIQUID_FULL,
            ParamKind::Rotation | ParamKind::PlantVariant => 0,
        }
    }
}

/// Source distance of an origin liquid voxel.
pub const LIQUID_FULL: u8 = 8;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    /// The four lateral faces in the order used by liquid spreading.
    pub const LATERAL: [Face; 4] = [Face::PosX, Face::NegX, Face::PosZ, Face::NegZ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Falls back to `PosY` for out-of-range indices.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        Self::ALL.get(i).copied().unwrap_or(Face::PosY)
    }

    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosZ => Face::NegZ,
            Face::NegZ => Face::PosZ,
        }
    }

    /// Rotates a lateral face by `quarter_turns` about +Y; vertical faces are unchanged.
    #[inline]
    pub fn rotate_y(self, quarter_turns: u8) -> Face {
        const RING: [Face; 4] = [Face::PosX, Face::PosZ, Face::NegX, Face::NegZ];
        let Some(at) = RING.iter().position(|f| *f == self) else {
            return self;
        };
        RING[(at + quarter_turns as usize) % 4]
    }
}
