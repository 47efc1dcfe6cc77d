use loam_blocks::BlockType;

use crate::ChunkCoord;
use crate::coords::{CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::gen_ctx::GenCtx;
use crate::worldgen::{BiomeDef, WorldGenConfig};

use super::caves::is_cave;
use super::surface::layer_block;

/// Per-column terrain decision: which biome owns it and where land ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColumnSample {
    /// Index into the configured biome list.
    pub biome: u8,
    /// Topmost land cell (`baseLandHeight`).
    pub base_height: i32,
    /// Cells with `y < bedrock_top` are bedrock.
    pub bedrock_top: i32,
}

pub fn hash2(ix: i32, iz: i32, seed: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iz as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Uniform `[0, 1)` from a column position; stable for a given seed and salt.
pub fn rand01(world_seed: u32, ix: i32, iz: i32, salt: u32) -> f32 {
    let h = hash2(ix, iz, (world_seed ^ salt).wrapping_add(0x9E37_79B9));
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}

const SALT_BEDROCK: u32 = 0xBED_0C4;
const SALT_PLANT: u32 = 0x91A_A7;
const SALT_VARIANT: u32 = 0x0A41_A7;

pub struct ColumnSampler<'ctx> {
    ctx: &'ctx GenCtx,
}

impl<'ctx> ColumnSampler<'ctx> {
    pub fn new(ctx: &'ctx GenCtx) -> Self {
        Self { ctx }
    }

    #[inline]
    fn seed(&self) -> u32 {
        self.ctx.seed as u32
    }

    pub fn config(&self) -> &'ctx WorldGenConfig {
        &self.ctx.config
    }

    pub fn biomes(&self) -> &'ctx [BiomeDef] {
        &self.ctx.config.biomes
    }

    pub fn biome(&self, index: u8) -> &'ctx BiomeDef {
        let biomes = self.biomes();
        &biomes[(index as usize).min(biomes.len().saturating_sub(1))]
    }

    /// Nearest biome to a sampled `(height, temperature, moisture)` triple by
    /// summed absolute difference; the first listed biome wins ties.
    pub fn select_biome(biomes: &[BiomeDef], h: f32, t: f32, m: f32) -> u8 {
        let mut best = 0usize;
        let mut best_d = f32::INFINITY;
        for (i, b) in biomes.iter().enumerate() {
            let d = (b.height - h).abs() + (b.temperature - t).abs() + (b.moisture - m).abs();
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        best as u8
    }

    pub fn sample(&self, wx: i32, wz: i32) -> ColumnSample {
        let (fx, fz) = (wx as f32, wz as f32);
        let cfg = &self.ctx.config;
        let h = GenCtx::unit(self.ctx.biome_height.get_noise_2d(fx, fz));
        let t = GenCtx::unit(self.ctx.temperature.get_noise_2d(fx, fz));
        let m = GenCtx::unit(self.ctx.moisture.get_noise_2d(fx, fz));
        let biome = Self::select_biome(&cfg.biomes, h, t, m);
        let def = self.biome(biome);

        let lw = cfg.height.low_weight.clamp(0.0, 1.0);
        let blended = self.ctx.height_low.get_noise_2d(fx, fz) * lw
            + self.ctx.height_high.get_noise_2d(fx, fz) * (1.0 - lw);
        let raw = cfg.height.base + blended * cfg.height.amplitude + def.height_offset;
        let base_height = (raw.round() as i32).clamp(1, CHUNK_HEIGHT - 2);

        let extra = cfg.bedrock_depth.max(1);
        let bedrock_top = 1 + (hash2(wx, wz, self.seed() ^ SALT_BEDROCK) % extra as u32) as i32;

        ColumnSample {
            biome,
            base_height,
            bedrock_top,
        }
    }

    /// Base terrain for one cell: bedrock, caves, biome layers, then water up
    /// to sea level. Plants and trees are decorated afterwards.
    pub fn block_at(&self, col: &ColumnSample, wx: i32, y: i32, wz: i32) -> BlockType {
        let cfg = &self.ctx.config;
        if y < col.bedrock_top {
            return BlockType::Bedrock;
        }
        if y > col.base_height {
            if y <= cfg.sea_level {
                let biome = self.biome(col.biome);
                return match biome.sea_surface {
                    Some(b) if y == cfg.sea_level => b,
                    _ => BlockType::Water,
                };
            }
            return BlockType::Air;
        }
        // Keep the sea floor sealed so oceans do not drain into caves.
        let under_water = col.base_height < cfg.sea_level;
        if cfg.caves.enable && !under_water && is_cave(self.ctx, wx, y, wz) {
            return BlockType::Air;
        }
        layer_block(self.biome(col.biome), y, col.base_height, cfg.sea_level)
    }

    /// Plant block for the cell above a column's surface, if the roll succeeds.
    pub fn plant_for(&self, col: &ColumnSample, surface: BlockType, wx: i32, wz: i32) -> Option<BlockType> {
        let biome = self.biome(col.biome);
        let plant = biome.plant?;
        if col.base_height < self.ctx.config.sea_level
            || col.base_height + 1 >= CHUNK_HEIGHT
            || !loam_blocks::can_support_plant(surface)
        {
            return None;
        }
        (rand01(self.seed(), wx, wz, SALT_PLANT) < biome.plant_chance).then_some(plant)
    }

    pub fn plant_variant(&self, plant: BlockType, wx: i32, wz: i32) -> u8 {
        let n = loam_blocks::describe(plant).variants.max(1) as u32;
        (hash2(wx, wz, self.seed() ^ SALT_VARIANT) % n) as u8
    }

    /// Low-frequency gate deciding whether a chunk attempts trees at all.
    pub fn tree_gate(&self, coord: ChunkCoord) -> bool {
        let cx = (coord.cx * CHUNK_WIDTH + CHUNK_WIDTH / 2) as f32;
        let cz = (coord.cz * CHUNK_WIDTH + CHUNK_WIDTH / 2) as f32;
        self.ctx.tree_gate.get_noise_2d(cx, cz) >= self.ctx.config.trees.gate_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worldgen::default_biomes;

    #[test]
    fn nearest_signature_wins() {
        let biomes = default_biomes();
        // Exact desert signature.
        let b = ColumnSampler::select_biome(&biomes, 0.4, 0.85, 0.15);
        assert_eq!(biomes[b as usize].name, "desert");
    }

    #[test]
    fn ties_go_to_first_listed() {
        let mut biomes = default_biomes();
        let mut dup = biomes[2].clone();
        dup.name = "dup".into();
        biomes.insert(0, dup);
        let b = ColumnSampler::select_biome(&biomes, 0.4, 0.85, 0.15);
        assert_eq!(b, 0);
    }

    #[test]
    fn rand01_is_stable_and_in_range() {
        let a = rand01(7, -3, 12, 1);
        assert_eq!(a, rand01(7, -3, 12, 1));
        assert!((0.0..1.0).contains(&a));
    }
}
