use std::time::Instant;

use loam_blocks::{BlockType, LIQUID_FULL, ParamKind};
use loam_world::{
    CHUNK_HEIGHT, ChunkCoord, ColumnSampler, GRID_X, GRID_Z, GenCtx, LocalPos, WorldGen,
    local_to_world,
};

use crate::trees::{TreePlacement, place_trees};
use crate::{BlockParams, ChunkGrid};

pub struct GeneratedChunk {
    pub grid: ChunkGrid,
    pub params: BlockParams,
    pub trees: Vec<TreePlacement>,
}

/// Builds a chunk's full bordered grid from seed and tables alone. Border
/// columns are generated too, so a fresh chunk culls correctly before any
/// neighbor is loaded.
pub fn generate_chunk(wg: &WorldGen, coord: ChunkCoord) -> GeneratedChunk {
    generate_chunk_with_ctx(wg, &wg.make_gen_ctx(), coord)
}

/// Same as [`generate_chunk`] with caller-provided noise sources, so workers
/// can reuse them across jobs.
pub fn generate_chunk_with_ctx(wg: &WorldGen, ctx: &GenCtx, coord: ChunkCoord) -> GeneratedChunk {
    let t0 = Instant::now();
    let sampler = ColumnSampler::new(ctx);
    let mut grid = ChunkGrid::new(coord);
    let mut params = BlockParams::new();
    let mut columns = Vec::with_capacity((GRID_X * GRID_Z) as usize);

    for z in 0..GRID_Z {
        for x in 0..GRID_X {
            let w = local_to_world(coord, LocalPos::new(x, 0, z));
            let col = sampler.sample(w.x, w.z);
            grid.set_biome(x, z, col.biome);
            for y in 0..CHUNK_HEIGHT {
                let block = sampler.block_at(&col, w.x, y, w.z);
                if block.is_air() {
                    continue;
                }
                let pos = LocalPos::new(x, y, z);
                grid.set(pos, block);
                if block.is_liquid() {
                    params.set(pos, ParamKind::LiquidSource, LIQUID_FULL);
                }
            }
            let surface = grid.get(LocalPos::new(x, col.base_height, z));
            if let Some(plant) = sampler.plant_for(&col, surface, w.x, w.z) {
                let at = LocalPos::new(x, col.base_height + 1, z);
                if grid.get(at) == BlockType::Air {
                    grid.set(at, plant);
                    let variant = sampler.plant_variant(plant, w.x, w.z);
                    if variant != 0 {
                        params.set(at, ParamKind::PlantVariant, variant);
                    }
                }
            }
            columns.push(col);
        }
    }

    let trees = place_trees(
        &mut grid,
        &mut params,
        &sampler,
        &columns,
        coord,
        wg.chunk_seed(coord),
    );
    log::trace!(
        target: "runtime",
        "generated chunk ({}, {}) trees={} params={} in {}ms",
        coord.cx,
        coord.cz,
        trees.len(),
        params.len(),
        t0.elapsed().as_millis()
    );
    GeneratedChunk {
        grid,
        params,
        trees,
    }
}
