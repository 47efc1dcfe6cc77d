use std::sync::Arc;

use crate::ChunkCoord;
use crate::gen_ctx::GenCtx;
use crate::worldgen::WorldGenConfig;

/// Seed plus generation tables. Cloning shares the config.
#[derive(Clone, Debug)]
pub struct WorldGen {
    pub seed: i32,
    pub config: Arc<WorldGenConfig>,
}

impl WorldGen {
    pub fn new(seed: i32, config: WorldGenConfig) -> Self {
        Self {
            seed,
            config: Arc::new(config),
        }
    }

    pub fn make_gen_ctx(&self) -> GenCtx {
        GenCtx::new(self.seed, Arc::clone(&self.config))
    }

    /// Seed for the per-chunk random stream; depends only on seed and coordinate.
    pub fn chunk_seed(&self, coord: ChunkCoord) -> u64 {
        let mut h = (self.seed as u32 as u64) ^ 0x9E37_79B9_7F4A_7C15;
        h ^= (coord.cx as u32 as u64).wrapping_mul(0x85EB_CA6B);
        h = h.rotate_left(27).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        h ^= (coord.cz as u32 as u64).wrapping_mul(0x27D4_EB2F);
        h = h.rotate_left(31).wrapping_mul(0x1656_67B1_9E37_79F9);
        h ^ (h >> 29)
    }
}

impl Default for WorldGen {
    fn default() -> Self {
        Self::new(1337, WorldGenConfig::default())
    }
}
