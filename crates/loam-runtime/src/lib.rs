//! Runtime job queues and worker orchestration.
//!
//! Jobs carry their own copies of chunk data; workers never touch live world
//! state. Results are drained by the control thread, which alone applies them.
#![forbid(unsafe_code)]

mod gen_ctx_pool;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, TryRecvError, select, unbounded};
use loam_chunk::{BlockParams, ChunkGrid, generate_chunk_with_ctx};
use loam_liquid::{BorderFlags, DEFAULT_STEP_BUDGET, simulate};
use loam_mesh_cpu::{ChunkMeshCPU, build_chunk_mesh};
use loam_world::{ChunkCoord, WorldGen};
use rayon::{ThreadPool, ThreadPoolBuilder};

pub use crate::gen_ctx_pool::GenCtxPool;

/// Which stage a job starts from. Every kind ends in a mesh build unless a
/// liquid pass found nothing to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// generate, then an optional liquid pass, then mesh
    Generate,
    /// liquid pass, then mesh if anything flowed
    Liquid,
    Mesh,
}

#[derive(Clone, Debug)]
pub struct BuildJob {
    pub coord: ChunkCoord,
    pub job_id: u64,
    pub kind: JobKind,
    /// Copy of the live grid and parameters; unused by generation.
    pub data: Option<(ChunkGrid, BlockParams)>,
    /// Hop budget for the liquid stage. On a generate job, `Some` also
    /// enables that stage.
    pub liquid_budget: Option<u32>,
}

impl BuildJob {
    pub fn generate(coord: ChunkCoord, job_id: u64) -> Self {
        Self {
            coord,
            job_id,
            kind: JobKind::Generate,
            data: None,
            liquid_budget: None,
        }
    }

    pub fn liquid(
        coord: ChunkCoord,
        job_id: u64,
        grid: ChunkGrid,
        params: BlockParams,
        budget: u32,
    ) -> Self {
        Self {
            coord,
            job_id,
            kind: JobKind::Liquid,
            data: Some((grid, params)),
            liquid_budget: Some(budget),
        }
    }

    pub fn mesh(coord: ChunkCoord, job_id: u64, grid: ChunkGrid, params: BlockParams) -> Self {
        Self {
            coord,
            job_id,
            kind: JobKind::Mesh,
            data: Some((grid, params)),
            liquid_budget: None,
        }
    }

    pub fn with_liquid_pass(mut self, budget: u32) -> Self {
        self.liquid_budget = Some(budget);
        self
    }
}

pub struct JobOut {
    pub coord: ChunkCoord,
    pub job_id: u64,
    pub kind: JobKind,
    /// Replacement live data, present when the job generated the chunk or a
    /// liquid pass changed it.
    pub grid: Option<ChunkGrid>,
    pub params: Option<BlockParams>,
    pub mesh: Option<ChunkMeshCPU>,
    /// Neighbors whose mirrored border the liquid stage wrote into.
    pub borders: BorderFlags,
    pub trees: usize,
    pub liquid_writes: usize,
    pub t_total_ms: u32,
    pub t_gen_ms: u32,
    pub t_liquid_ms: u32,
    pub t_mesh_ms: u32,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Lane {
    Edit,
    Liquid,
    Bg,
}

impl JobKind {
    fn lane(self) -> Lane {
        match self {
            JobKind::Mesh => Lane::Edit,
            JobKind::Liquid => Lane::Liquid,
            JobKind::Generate => Lane::Bg,
        }
    }
}

#[inline]
fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Shared, read-only inputs every worker needs.
#[derive(Clone)]
struct WorkerEnv {
    worldgen: Arc<WorldGen>,
    ctx_pool: Arc<GenCtxPool>,
    tints: Arc<[[u8; 3]]>,
}

fn process_build_job(job: BuildJob, env: &WorkerEnv) -> JobOut {
    let BuildJob {
        coord,
        job_id,
        kind,
        data,
        liquid_budget,
    } = job;

    let t_job_start = Instant::now();
    let mut t_gen_ms = 0;
    let mut t_liquid_ms = 0;
    let mut t_mesh_ms = 0;
    let mut trees = 0;

    let (mut grid, mut params, generated) = match (kind, data) {
        (JobKind::Liquid | JobKind::Mesh, Some((grid, params))) => (grid, params, false),
        _ => {
            let t0 = Instant::now();
            let out = env.ctx_pool.with_ctx(&env.worldgen, |ctx| {
                generate_chunk_with_ctx(&env.worldgen, ctx, coord)
            });
            t_gen_ms = elapsed_ms(t0);
            trees = out.trees.len();
            (out.grid, out.params, true)
        }
    };

    let mut borders = BorderFlags::default();
    let mut liquid_writes = 0;
    let mut liquid_changed = false;
    if kind == JobKind::Liquid || liquid_budget.is_some() {
        let t0 = Instant::now();
        let pass = simulate(&grid, &params, liquid_budget.unwrap_or(DEFAULT_STEP_BUDGET));
        t_liquid_ms = elapsed_ms(t0);
        if pass.changed() {
            liquid_changed = true;
            liquid_writes = pass.writes;
            borders = pass.borders;
            grid = pass.grid;
            params = pass.params;
        }
    }

    let replaced = generated || liquid_changed;
    let mesh = if kind == JobKind::Liquid && !liquid_changed {
        None
    } else {
        let t0 = Instant::now();
        let mesh = build_chunk_mesh(&grid, &params, &env.tints);
        t_mesh_ms = elapsed_ms(t0);
        Some(mesh)
    };

    let t_total_ms = elapsed_ms(t_job_start);
    log::trace!(
        target: "runtime",
        "job {} {:?} ({}, {}) gen={}ms liquid={}ms mesh={}ms",
        job_id,
        kind,
        coord.cx,
        coord.cz,
        t_gen_ms,
        t_liquid_ms,
        t_mesh_ms
    );
    JobOut {
        coord,
        job_id,
        kind,
        grid: replaced.then_some(grid),
        params: replaced.then_some(params),
        mesh,
        borders,
        trees,
        liquid_writes,
        t_total_ms,
        t_gen_ms,
        t_liquid_ms,
        t_mesh_ms,
    }
}

#[derive(Clone, Default)]
struct LaneCounters {
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
}

impl LaneCounters {
    fn run(&self, job: BuildJob, env: &WorkerEnv, tx: &Sender<JobOut>) {
        self.queued.fetch_sub(1, Ordering::Relaxed);
        self.inflight.fetch_add(1, Ordering::Relaxed);
        let out = process_build_job(job, env);
        self.inflight.fetch_sub(1, Ordering::Relaxed);
        let _ = tx.send(out);
    }

    fn load(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}

fn build_pool(threads: usize, lane: &'static str) -> ThreadPool {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("loam-{lane}-{i}"))
        .build()
        .expect("worker pool")
}

pub struct Runtime {
    job_tx_edit: Sender<BuildJob>,
    job_tx_liquid: Sender<BuildJob>,
    job_tx_bg: Sender<BuildJob>,
    res_tx: Sender<JobOut>,
    res_rx: Receiver<JobOut>,
    _edit_pool: Option<ThreadPool>,
    liquid_pool: Option<ThreadPool>,
    bg_pool: Option<ThreadPool>,
    edit: LaneCounters,
    liquid: LaneCounters,
    bg: LaneCounters,
    pub w_edit: usize,
    pub w_liquid: usize,
    pub w_bg: usize,
    env: WorkerEnv,
}

impl Runtime {
    /// Spawns `workers` threads split across lanes. With zero workers every
    /// job runs inline at submission and its result waits in the queue.
    pub fn new(worldgen: Arc<WorldGen>, workers: usize) -> Self {
        let (job_tx_edit, job_rx_edit) = unbounded::<BuildJob>();
        let (job_tx_liquid, job_rx_liquid) = unbounded::<BuildJob>();
        let (job_tx_bg, job_rx_bg) = unbounded::<BuildJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();

        let w_edit = workers.min(1);
        let remaining = workers.saturating_sub(w_edit);
        let w_liquid = if remaining >= 2 { 1 } else { 0 };
        let w_bg = remaining.saturating_sub(w_liquid);

        let tints: Arc<[[u8; 3]]> = worldgen.config.biomes.iter().map(|b| b.tint).collect();
        let env = WorkerEnv {
            ctx_pool: GenCtxPool::with_capacity_from_workers(workers),
            worldgen,
            tints,
        };
        let edit = LaneCounters::default();
        let liquid = LaneCounters::default();
        let bg = LaneCounters::default();

        let edit_pool = (w_edit > 0).then(|| {
            let pool = build_pool(w_edit, "edit");
            for _ in 0..w_edit {
                let rx = job_rx_edit.clone();
                let tx = res_tx.clone();
                let env = env.clone();
                let edit = edit.clone();
                pool.spawn(move || {
                    while let Ok(job) = rx.recv() {
                        edit.run(job, &env, &tx);
                    }
                });
            }
            pool
        });

        let liquid_pool = (w_liquid > 0).then(|| {
            let pool = build_pool(w_liquid, "liquid");
            for _ in 0..w_liquid {
                let rx = job_rx_liquid.clone();
                let tx = res_tx.clone();
                let env = env.clone();
                let liquid = liquid.clone();
                pool.spawn(move || {
                    while let Ok(job) = rx.recv() {
                        liquid.run(job, &env, &tx);
                    }
                });
            }
            pool
        });

        // Background workers prefer generation and steal liquid jobs when idle.
        let bg_pool = (w_bg > 0).then(|| {
            let pool = build_pool(w_bg, "bg");
            for _ in 0..w_bg {
                let bg_rx = job_rx_bg.clone();
                let liquid_rx = job_rx_liquid.clone();
                let tx = res_tx.clone();
                let env = env.clone();
                let bg = bg.clone();
                let liquid = liquid.clone();
                pool.spawn(move || {
                    loop {
                        match bg_rx.try_recv() {
                            Ok(job) => {
                                bg.run(job, &env, &tx);
                                continue;
                            }
                            Err(TryRecvError::Disconnected) => break,
                            Err(TryRecvError::Empty) => {}
                        }
                        if let Ok(job) = liquid_rx.try_recv() {
                            liquid.run(job, &env, &tx);
                            continue;
                        }
                        select! {
                            recv(bg_rx) -> res => match res {
                                Ok(job) => bg.run(job, &env, &tx),
                                Err(_) => break,
                            },
                            recv(liquid_rx) -> res => match res {
                                Ok(job) => liquid.run(job, &env, &tx),
                                Err(_) => {
                                    while let Ok(job) = bg_rx.recv() {
                                        bg.run(job, &env, &tx);
                                    }
                                    break;
                                }
                            },
                        }
                    }
                });
            }
            pool
        });

        log::info!(
            target: "runtime",
            "runtime workers edit={} liquid={} bg={}{}",
            w_edit,
            w_liquid,
            w_bg,
            if workers == 0 { " (inline)" } else { "" }
        );

        Self {
            job_tx_edit,
            job_tx_liquid,
            job_tx_bg,
            res_tx,
            res_rx,
            _edit_pool: edit_pool,
            liquid_pool,
            bg_pool,
            edit,
            liquid,
            bg,
            w_edit,
            w_liquid,
            w_bg,
            env,
        }
    }

    #[inline]
    pub fn is_inline(&self) -> bool {
        self.w_edit == 0
    }

    /// Routes `job` to its lane; lanes without workers fall back to the
    /// edit lane.
    pub fn submit_build_job(&self, job: BuildJob) {
        log::trace!(
            target: "runtime",
            "submit job {} {:?} ({}, {})",
            job.job_id,
            job.kind,
            job.coord.cx,
            job.coord.cz
        );
        if self.is_inline() {
            let _ = self.res_tx.send(process_build_job(job, &self.env));
            return;
        }
        match job.kind.lane() {
            Lane::Edit => self.submit_edit(job),
            Lane::Liquid => self.submit_liquid(job),
            Lane::Bg => self.submit_bg(job),
        }
    }

    fn submit_edit(&self, job: BuildJob) {
        self.edit.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx_edit.send(job).is_err() {
            self.edit.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    fn submit_liquid(&self, job: BuildJob) {
        if self.liquid_pool.is_some() || self.bg_pool.is_some() {
            self.liquid.queued.fetch_add(1, Ordering::Relaxed);
            if self.job_tx_liquid.send(job).is_err() {
                self.liquid.queued.fetch_sub(1, Ordering::Relaxed);
            }
        } else {
            self.submit_edit(job);
        }
    }

    fn submit_bg(&self, job: BuildJob) {
        if self.bg_pool.is_some() {
            self.bg.queued.fetch_add(1, Ordering::Relaxed);
            if self.job_tx_bg.send(job).is_err() {
                self.bg.queued.fetch_sub(1, Ordering::Relaxed);
            }
        } else {
            self.submit_edit(job);
        }
    }

    /// Non-blocking; returns every result finished since the last call.
    pub fn drain_worker_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Like [`Runtime::drain_worker_results`] but takes at most `max`,
    /// leaving the rest queued for the next call.
    pub fn drain_worker_results_capped(&self, max: usize) -> Vec<JobOut> {
        self.res_rx.try_iter().take(max).collect()
    }

    /// (queued, in flight) per lane: edit, liquid, bg.
    pub fn queue_debug_counts(&self) -> (usize, usize, usize, usize, usize, usize) {
        let (qe, ie) = self.edit.load();
        let (ql, il) = self.liquid.load();
        let (qb, ib) = self.bg.load();
        (qe, ie, ql, il, qb, ib)
    }

    /// Jobs submitted but not yet finished, plus finished results not drained.
    pub fn outstanding(&self) -> usize {
        let (qe, ie, ql, il, qb, ib) = self.queue_debug_counts();
        qe + ie + ql + il + qb + ib + self.res_rx.len()
    }
}
