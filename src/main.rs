#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use loam::{LoamConfig, World, WorldPos, load_config_from_path};

#[derive(Parser, Debug)]
#[command(name = "loam", about = "Run the loam world headless")]
struct Args {
    /// TOML file with [world] and [worldgen] tables
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    #[arg(long)]
    seed: Option<i32>,

    /// Render distance in chunks
    #[arg(long)]
    radius: Option<i32>,

    /// Walk the viewer along +x this many blocks per tick
    #[arg(long, default_value_t = 0)]
    walk: i32,

    /// Tick as fast as possible instead of at the configured rate
    #[arg(long)]
    unthrottled: bool,
}

fn main() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => match load_config_from_path(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LoamConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    if let Some(radius) = args.radius {
        config.world.render_distance = radius.max(0);
    }

    let step = Duration::from_secs_f64(1.0 / f64::from(config.world.ticks_per_second.max(1)));
    let mut world = World::new(&config);
    let start = Instant::now();
    let mut next = start;
    let mut viewer_x = 0;
    for t in 0..args.ticks {
        viewer_x += args.walk;
        world.set_viewer(WorldPos::new(viewer_x, 64, 0));
        world.tick();
        if t % u64::from(config.world.ticks_per_second.max(1)) == 0 {
            let s = world.stats();
            log::info!(
                "tick {} chunks={} ready={} generating={} mesh_pending={} jobs={} updates={}",
                s.tick,
                s.chunks,
                s.ready,
                s.generating,
                s.mesh_pending,
                s.jobs_outstanding,
                s.pending_updates
            );
        }
        if !args.unthrottled {
            next += step;
            let now = Instant::now();
            if next > now {
                std::thread::sleep(next - now);
            } else {
                next = now;
            }
        }
    }

    let stats = world.shutdown();
    println!(
        "ran {} ticks in {:.2}s: applied {} jobs, {} stale, {} discarded, {} listener failures, {} snapshots saved",
        stats.tick,
        start.elapsed().as_secs_f64(),
        stats.jobs_applied,
        stats.stale_results,
        stats.discarded_results,
        stats.listener_failures,
        stats.snapshots_saved
    );
}
