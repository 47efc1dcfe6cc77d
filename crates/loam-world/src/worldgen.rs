use std::error::Error;
use std::fs;
use std::path::Path;

use loam_blocks::BlockType;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub caves: Caves,
    #[serde(default = "default_bedrock_depth")]
    pub bedrock_depth: i32,
    #[serde(default)]
    pub trees: Trees,
    #[serde(default = "default_biome_frequency")]
    pub biome_frequency: f32,
    /// Ordered; ties in biome selection go to the earlier entry.
    #[serde(default = "default_biomes")]
    pub biomes: Vec<BiomeDef>,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            sea_level: default_sea_level(),
            height: Height::default(),
            caves: Caves::default(),
            bedrock_depth: default_bedrock_depth(),
            trees: Trees::default(),
            biome_frequency: default_biome_frequency(),
            biomes: default_biomes(),
        }
    }
}

fn default_sea_level() -> i32 {
    48
}
fn default_bedrock_depth() -> i32 {
    3
}
fn default_biome_frequency() -> f32 {
    0.004
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_base")]
    pub base: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_low_freq")]
    pub low_frequency: f32,
    #[serde(default = "default_high_freq")]
    pub high_frequency: f32,
    /// Weight of the low-frequency octave; the high octave gets the rest.
    #[serde(default = "default_low_weight")]
    pub low_weight: f32,
}
fn default_base() -> f32 {
    52.0
}
fn default_amplitude() -> f32 {
    12.0
}
fn default_low_freq() -> f32 {
    0.008
}
fn default_high_freq() -> f32 {
    0.035
}
fn default_low_weight() -> f32 {
    0.7
}
impl Default for Height {
    fn default() -> Self {
        Self {
            base: default_base(),
            amplitude: default_amplitude(),
            low_frequency: default_low_freq(),
            high_frequency: default_high_freq(),
            low_weight: default_low_weight(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Caves {
    #[serde(default = "default_caves_enable")]
    pub enable: bool,
    #[serde(default = "default_cave_freq")]
    pub frequency: f32,
    #[serde(default = "default_y_scale")]
    pub y_scale: f32,
    #[serde(default = "default_mask_freq")]
    pub mask_frequency: f32,
    /// Cave noise must exceed `threshold + mask * mask_weight` to carve.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_mask_weight")]
    pub mask_weight: f32,
}
fn default_caves_enable() -> bool {
    true
}
fn default_cave_freq() -> f32 {
    0.06
}
fn default_y_scale() -> f32 {
    1.6
}
fn default_mask_freq() -> f32 {
    0.012
}
fn default_threshold() -> f32 {
    0.45
}
fn default_mask_weight() -> f32 {
    0.35
}
impl Default for Caves {
    fn default() -> Self {
        Self {
            enable: default_caves_enable(),
            frequency: default_cave_freq(),
            y_scale: default_y_scale(),
            mask_frequency: default_mask_freq(),
            threshold: default_threshold(),
            mask_weight: default_mask_weight(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Trees {
    #[serde(default = "default_gate_freq")]
    pub gate_frequency: f32,
    /// Chunks whose gate noise falls below this skip the tree pass.
    #[serde(default = "default_gate_threshold")]
    pub gate_threshold: f32,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_min_distance")]
    pub min_distance: i32,
    #[serde(default = "default_trunk_min")]
    pub trunk_min: i32,
    #[serde(default = "default_trunk_max")]
    pub trunk_max: i32,
    #[serde(default = "default_leaf_radius")]
    pub leaf_radius: i32,
}
fn default_gate_freq() -> f32 {
    0.15
}
fn default_gate_threshold() -> f32 {
    -0.35
}
fn default_attempts() -> u32 {
    8
}
fn default_min_distance() -> i32 {
    4
}
fn default_trunk_min() -> i32 {
    4
}
fn default_trunk_max() -> i32 {
    6
}
fn default_leaf_radius() -> i32 {
    2
}
impl Default for Trees {
    fn default() -> Self {
        Self {
            gate_frequency: default_gate_freq(),
            gate_threshold: default_gate_threshold(),
            attempts: default_attempts(),
            min_distance: default_min_distance(),
            trunk_min: default_trunk_min(),
            trunk_max: default_trunk_max(),
            leaf_radius: default_leaf_radius(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    Oak,
    Birch,
    Spruce,
}

impl TreeKind {
    pub fn log(self) -> BlockType {
        match self {
            TreeKind::Oak => BlockType::OakLog,
            TreeKind::Birch => BlockType::BirchLog,
            TreeKind::Spruce => BlockType::SpruceLog,
        }
    }

    pub fn leaves(self) -> BlockType {
        match self {
            TreeKind::Oak => BlockType::OakLeaves,
            TreeKind::Birch => BlockType::BirchLeaves,
            TreeKind::Spruce => BlockType::SpruceLeaves,
        }
    }
}

/// One terrain archetype. `height`, `temperature` and `moisture` are the
/// signature matched against sampled noise in `[0, 1]`.
#[derive(Clone, Debug, Deserialize)]
pub struct BiomeDef {
    pub name: String,
    pub height: f32,
    pub temperature: f32,
    pub moisture: f32,
    #[serde(default)]
    pub height_offset: f32,
    pub surface: BlockType,
    pub top: BlockType,
    #[serde(default = "default_top_depth")]
    pub top_depth: i32,
    #[serde(default = "default_below")]
    pub below: BlockType,
    #[serde(default = "default_below_depth")]
    pub below_depth: i32,
    /// Replaces the topmost water cell (e.g. ice in cold biomes).
    #[serde(default)]
    pub sea_surface: Option<BlockType>,
    #[serde(default)]
    pub plant: Option<BlockType>,
    #[serde(default)]
    pub plant_chance: f32,
    #[serde(default)]
    pub tree: Option<TreeKind>,
    #[serde(default)]
    pub tree_chance: f32,
    /// Vertex tint applied to grass and foliage.
    #[serde(default = "default_tint")]
    pub tint: [u8; 3],
}
fn default_top_depth() -> i32 {
    3
}
fn default_below() -> BlockType {
    BlockType::Stone
}
fn default_below_depth() -> i32 {
    0
}
fn default_tint() -> [u8; 3] {
    [255, 255, 255]
}

impl BiomeDef {
    #[inline]
    pub fn allows_trees(&self) -> bool {
        self.tree.is_some() && self.tree_chance > 0.0
    }
}

fn biome(
    name: &str,
    signature: (f32, f32, f32),
    height_offset: f32,
    layers: (BlockType, BlockType, BlockType, i32),
) -> BiomeDef {
    BiomeDef {
        name: name.to_string(),
        height: signature.0,
        temperature: signature.1,
        moisture: signature.2,
        height_offset,
        surface: layers.0,
        top: layers.1,
        top_depth: default_top_depth(),
        below: layers.2,
        below_depth: layers.3,
        sea_surface: None,
        plant: None,
        plant_chance: 0.0,
        tree: None,
        tree_chance: 0.0,
        tint: default_tint(),
    }
}

pub fn default_biomes() -> Vec<BiomeDef> {
    use BlockType as B;
    vec![
        BiomeDef {
            plant: Some(B::TallGrass),
            plant_chance: 0.12,
            tree: Some(TreeKind::Oak),
            tree_chance: 0.2,
            tint: [124, 189, 107],
            ..biome("plains", (0.45, 0.55, 0.45), 0.0, (B::Grass, B::Dirt, B::Stone, 0))
        },
        BiomeDef {
            plant: Some(B::Flower),
            plant_chance: 0.05,
            tree: Some(TreeKind::Birch),
            tree_chance: 0.6,
            tint: [89, 174, 48],
            ..biome("forest", (0.5, 0.5, 0.75), 2.0, (B::Grass, B::Dirt, B::Stone, 0))
        },
        BiomeDef {
            plant: Some(B::DeadBush),
            plant_chance: 0.02,
            tint: [191, 183, 85],
            ..biome("desert", (0.4, 0.85, 0.15), -1.0, (B::Sand, B::Sand, B::Sandstone, 4))
        },
        BiomeDef {
            sea_surface: Some(B::Ice),
            tree: Some(TreeKind::Spruce),
            tree_chance: 0.25,
            tint: [128, 180, 151],
            ..biome("tundra", (0.5, 0.15, 0.5), 1.0, (B::Snow, B::Dirt, B::Stone, 0))
        },
        BiomeDef {
            tree: Some(TreeKind::Spruce),
            tree_chance: 0.05,
            tint: [110, 160, 120],
            ..biome("mountains", (0.85, 0.35, 0.4), 22.0, (B::Stone, B::Gravel, B::Stone, 0))
        },
    ]
}

pub fn load_worldgen_from_path(path: &Path) -> Result<WorldGenConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    if cfg.biomes.is_empty() {
        return Err("worldgen config must define at least one biome".into());
    }
    Ok(cfg)
}
