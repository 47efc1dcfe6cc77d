use std::sync::Arc;
use std::time::{Duration, Instant};

use loam_blocks::{BlockType, LIQUID_FULL, ParamKind};
use loam_chunk::{BlockParams, ChunkGrid, generate_chunk};
use loam_runtime::{BuildJob, JobKind, JobOut, Runtime};
use loam_world::{ChunkCoord, LocalPos, WorldGen};

fn wait_for(rt: &Runtime, n: usize) -> Vec<JobOut> {
    let deadline = Instant::now() + Duration::from_secs(30);
    let mut out = Vec::new();
    while out.len() < n {
        out.extend(rt.drain_worker_results());
        assert!(Instant::now() < deadline, "timed out waiting for jobs");
        std::thread::sleep(Duration::from_millis(2));
    }
    out
}

fn floor_with_source() -> (ChunkGrid, BlockParams) {
    let mut grid = ChunkGrid::new(ChunkCoord::new(0, 0));
    let mut params = BlockParams::new();
    for z in 0..18 {
        for x in 0..18 {
            grid.set(LocalPos::new(x, 0, z), BlockType::Stone);
        }
    }
    let at = LocalPos::new(8, 1, 8);
    grid.set(at, BlockType::Water);
    params.set(at, ParamKind::LiquidSource, LIQUID_FULL);
    (grid, params)
}

#[test]
fn inline_generate_matches_direct_generation() {
    let wg = Arc::new(WorldGen::default());
    let rt = Runtime::new(Arc::clone(&wg), 0);
    assert!(rt.is_inline());
    let coord = ChunkCoord::new(2, -1);
    rt.submit_build_job(BuildJob::generate(coord, 7));

    let mut out = rt.drain_worker_results();
    assert_eq!(out.len(), 1);
    let job = out.remove(0);
    assert_eq!(job.job_id, 7);
    assert_eq!(job.kind, JobKind::Generate);
    let direct = generate_chunk(&wg, coord);
    assert_eq!(job.grid.as_ref(), Some(&direct.grid));
    assert_eq!(job.params.as_ref(), Some(&direct.params));
    assert!(job.mesh.is_some_and(|m| !m.is_empty()));
    assert!(rt.drain_worker_results().is_empty());
}

#[test]
fn mesh_job_returns_no_replacement_data() {
    let rt = Runtime::new(Arc::new(WorldGen::default()), 0);
    let (grid, params) = floor_with_source();
    rt.submit_build_job(BuildJob::mesh(grid.coord, 1, grid, params));
    let out = rt.drain_worker_results();
    assert_eq!(out.len(), 1);
    assert!(out[0].grid.is_none());
    assert!(out[0].mesh.is_some());
    assert_eq!(out[0].t_gen_ms, 0);
}

#[test]
fn liquid_job_flows_then_settles() {
    let rt = Runtime::new(Arc::new(WorldGen::default()), 0);
    let (grid, params) = floor_with_source();
    rt.submit_build_job(BuildJob::liquid(grid.coord, 1, grid, params, 128));
    let mut out = rt.drain_worker_results();
    let first = out.remove(0);
    assert!(first.liquid_writes > 0);
    assert!(first.mesh.is_some());
    let (grid, params) = (first.grid.unwrap(), first.params.unwrap());
    assert_eq!(params.get(LocalPos::new(9, 1, 8), ParamKind::LiquidSource), Some(7));

    rt.submit_build_job(BuildJob::liquid(grid.coord, 2, grid, params, 128));
    let settled = rt.drain_worker_results().remove(0);
    assert_eq!(settled.liquid_writes, 0);
    assert!(settled.grid.is_none());
    assert!(settled.mesh.is_none());
}

#[test]
fn pooled_workers_finish_every_job() {
    let wg = Arc::new(WorldGen::default());
    let rt = Runtime::new(Arc::clone(&wg), 4);
    assert_eq!((rt.w_edit, rt.w_liquid, rt.w_bg), (1, 1, 2));

    let coords: Vec<_> = (-2..2).flat_map(|x| (-1..1).map(move |z| ChunkCoord::new(x, z))).collect();
    for (i, c) in coords.iter().enumerate() {
        rt.submit_build_job(BuildJob::generate(*c, i as u64));
    }
    let (grid, params) = floor_with_source();
    rt.submit_build_job(BuildJob::liquid(grid.coord, 100, grid.clone(), params.clone(), 128));
    rt.submit_build_job(BuildJob::mesh(grid.coord, 101, grid, params));

    let out = wait_for(&rt, coords.len() + 2);
    let mut ids: Vec<_> = out.iter().map(|o| o.job_id).collect();
    ids.sort();
    let mut want: Vec<u64> = (0..coords.len() as u64).collect();
    want.extend([100, 101]);
    assert_eq!(ids, want);

    for o in out.iter().filter(|o| o.kind == JobKind::Generate) {
        let direct = generate_chunk(&wg, o.coord);
        assert_eq!(o.grid.as_ref(), Some(&direct.grid));
    }
    assert_eq!(rt.outstanding(), 0);
}

#[test]
fn single_worker_runs_every_lane() {
    let rt = Runtime::new(Arc::new(WorldGen::default()), 1);
    assert_eq!((rt.w_edit, rt.w_liquid, rt.w_bg), (1, 0, 0));
    let (grid, params) = floor_with_source();
    rt.submit_build_job(BuildJob::generate(ChunkCoord::new(0, 0), 1));
    rt.submit_build_job(BuildJob::liquid(grid.coord, 2, grid, params, 128));
    let out = wait_for(&rt, 2);
    assert_eq!(out.len(), 2);
}
