use std::sync::Arc;

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::worldgen::WorldGenConfig;

/// Noise sources for one generation pass. Cheap to build; each worker job
/// makes its own so nothing is shared across threads.
pub struct GenCtx {
    pub height_low: FastNoiseLite,
    pub height_high: FastNoiseLite,
    pub biome_height: FastNoiseLite,
    pub temperature: FastNoiseLite,
    pub moisture: FastNoiseLite,
    pub cave: FastNoiseLite,
    pub cave_mask: FastNoiseLite,
    pub tree_gate: FastNoiseLite,
    pub config: Arc<WorldGenConfig>,
    pub seed: i32,
}

fn noise(seed: i32, freq: f32) -> FastNoiseLite {
    let mut n = FastNoiseLite::with_seed(seed);
    n.set_noise_type(Some(NoiseType::OpenSimplex2));
    n.set_frequency(Some(freq));
    n
}

impl GenCtx {
    pub fn new(seed: i32, config: Arc<WorldGenConfig>) -> Self {
        let h = &config.height;
        let bf = config.biome_frequency;
        Self {
            height_low: noise(seed, h.low_frequency),
            height_high: noise(seed ^ 99_173, h.high_frequency),
            biome_height: noise(seed ^ 0x5A17_0C03, bf),
            temperature: noise(seed ^ 0x1203_5F31, bf),
            moisture: noise(((seed as u32) ^ 0x92E3_A1B2u32) as i32, bf),
            cave: noise(seed ^ 41_337, config.caves.frequency),
            cave_mask: noise(seed ^ 0x0CA7_E5, config.caves.mask_frequency),
            tree_gate: noise(seed ^ 0x7EE5, config.trees.gate_frequency),
            config,
            seed,
        }
    }

    /// Maps a noise sample from `[-1, 1]` into `[0, 1]`.
    #[inline]
    pub fn unit(v: f32) -> f32 {
        (v * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}
