use loam_blocks::BlockType;

use crate::worldgen::BiomeDef;

/// Layer rule for a solid cell at `y` in a column whose land ends at `height`:
/// surface, then `top_depth` of crust, then `below_depth` of the biome's deeper
/// block, then stone. Submerged surfaces use the crust block.
pub fn layer_block(biome: &BiomeDef, y: i32, height: i32, sea_level: i32) -> BlockType {
    let depth = height - y;
    if depth == 0 {
        if height < sea_level { biome.top } else { biome.surface }
    } else if depth <= biome.top_depth {
        biome.top
    } else if depth <= biome.top_depth + biome.below_depth {
        biome.below
    } else {
        BlockType::Stone
    }
}
