use std::error::Error;
use std::fs;
use std::path::Path;
use std::thread;

use loam_world::WorldGenConfig;
use serde::Deserialize;

/// Top-level TOML document: `[world]` runtime knobs plus `[worldgen]` tables.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoamConfig {
    #[serde(default)]
    pub world: WorldSettings,
    #[serde(default)]
    pub worldgen: WorldGenConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldSettings {
    #[serde(default = "default_seed")]
    pub seed: i32,
    /// Chunks within this radius of the viewer are loaded.
    #[serde(default = "default_render_distance")]
    pub render_distance: i32,
    /// Extra radius a loaded chunk may drift out to before it unloads.
    #[serde(default = "default_evict_margin")]
    pub evict_margin: i32,
    /// Caps both job submissions and applied completions per tick.
    #[serde(default = "default_max_builds")]
    pub max_builds_per_tick: usize,
    #[serde(default = "default_tps")]
    pub ticks_per_second: u32,
    /// Ticks between liquid passes.
    #[serde(default = "default_liquid_cadence")]
    pub liquid_cadence: u64,
    #[serde(default = "default_liquid_budget")]
    pub liquid_budget: u32,
    /// Chunks farther than this get geometry but no collider until the
    /// viewer comes closer.
    #[serde(default = "default_collider_distance")]
    pub collider_distance: i32,
    /// 0 runs every job inline on the control thread.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    #[serde(default = "default_max_pending_updates")]
    pub max_pending_updates: usize,
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,
}

fn default_seed() -> i32 {
    1337
}
fn default_render_distance() -> i32 {
    6
}
fn default_evict_margin() -> i32 {
    1
}
fn default_max_builds() -> usize {
    4
}
fn default_tps() -> u32 {
    20
}
fn default_liquid_cadence() -> u64 {
    5
}
fn default_liquid_budget() -> u32 {
    loam_liquid::DEFAULT_STEP_BUDGET
}
fn default_collider_distance() -> i32 {
    2
}
fn default_worker_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
fn default_max_pending_updates() -> usize {
    1 << 16
}
fn default_pool_capacity() -> usize {
    32
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            render_distance: default_render_distance(),
            evict_margin: default_evict_margin(),
            max_builds_per_tick: default_max_builds(),
            ticks_per_second: default_tps(),
            liquid_cadence: default_liquid_cadence(),
            liquid_budget: default_liquid_budget(),
            collider_distance: default_collider_distance(),
            worker_threads: default_worker_threads(),
            max_pending_updates: default_max_pending_updates(),
            pool_capacity: default_pool_capacity(),
        }
    }
}

impl WorldSettings {
    #[inline]
    pub fn evict_radius(&self) -> i32 {
        self.render_distance.saturating_add(self.evict_margin.max(0))
    }
}

impl LoamConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: LoamConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.worldgen.biomes.is_empty() {
            return Err("worldgen config must define at least one biome".into());
        }
        if self.world.ticks_per_second == 0 {
            return Err("ticks_per_second must be positive".into());
        }
        if self.world.liquid_cadence == 0 {
            return Err("liquid_cadence must be positive".into());
        }
        if self.world.render_distance < 0 {
            return Err("render_distance must not be negative".into());
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<LoamConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    LoamConfig::from_toml_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = LoamConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.world.seed, 1337);
        assert_eq!(cfg.world.evict_radius(), 7);
        assert_eq!(cfg.worldgen.biomes.len(), 5);
    }

    #[test]
    fn world_section_overrides() {
        let cfg = LoamConfig::from_toml_str(
            r#"
            [world]
            seed = 9
            render_distance = 2
            worker_threads = 0
            liquid_cadence = 3

            [worldgen]
            sea_level = 40
            "#,
        )
        .unwrap();
        assert_eq!(cfg.world.seed, 9);
        assert_eq!(cfg.world.render_distance, 2);
        assert_eq!(cfg.world.worker_threads, 0);
        assert_eq!(cfg.world.liquid_cadence, 3);
        assert_eq!(cfg.worldgen.sea_level, 40);
    }

    #[test]
    fn rejects_zero_cadence() {
        let err = LoamConfig::from_toml_str("[world]\nliquid_cadence = 0\n");
        assert!(err.is_err());
    }
}
