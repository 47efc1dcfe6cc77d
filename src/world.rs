//! The world context: chunk arena, streaming, the tick loop, block edits and
//! the job pipeline's control side.
//!
//! Everything here runs on the control thread. Worker jobs only ever see
//! copies of chunk data, and their results are applied in `poll_results`.

use std::collections::VecDeque;
use std::sync::Arc;

use loam_blocks::{BlockType, Face, ParamKind, drop_for};
use loam_chunk::{ChunkSnapshot, copy_border_from, mirror_cell};
use loam_geom::Vec3;
use loam_liquid::dirty_neighbors;
use loam_runtime::{BuildJob, JobKind, JobOut, Runtime};
use loam_world::{
    CHUNK_HEIGHT, ChunkCoord, LocalPos, WorldGen, WorldPos, local_to_world, world_to_local,
};
use thiserror::Error;

use crate::chunk::{Chunk, ChunkState, PendingEdit};
use crate::chunk_map::ChunkMap;
use crate::collab::{ChunkPresenter, DropSink, MemorySnapshotStore, SnapshotStore};
use crate::config::{LoamConfig, WorldSettings};
use crate::events::{BlockData, BlockEvents, Command, Commands, Neighbors};
use crate::scheduler::UpdateQueue;

/// Commands applied per top-level edit or update before the cascade is cut.
const MAX_COMMAND_CASCADE: usize = 4096;

/// Which side effects a block replacement triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetBlockSettings {
    /// Destroy listeners of the old block, before the write.
    pub dispatch_destroy: bool,
    /// Place listeners of the new block, after the write.
    pub dispatch_place: bool,
    pub drop_item: bool,
    pub mark_modified: bool,
    /// Delayed update on the cell and its six face neighbors.
    pub schedule_updates: bool,
}

impl Default for SetBlockSettings {
    fn default() -> Self {
        Self {
            dispatch_destroy: true,
            dispatch_place: true,
            drop_item: true,
            mark_modified: true,
            schedule_updates: true,
        }
    }
}

impl SetBlockSettings {
    /// A plain write: no events, drops or updates.
    pub const fn silent() -> Self {
        Self {
            dispatch_destroy: false,
            dispatch_place: false,
            drop_item: false,
            mark_modified: true,
            schedule_updates: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetBlockError {
    #[error("y={} is outside the world", .0.y)]
    OutOfRange(WorldPos),
    #[error("chunk ({}, {}) is not loaded", .0.cx, .0.cz)]
    NotLoaded(ChunkCoord),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    Applied,
    /// Held until the chunk's in-flight job lands.
    Queued,
    /// The cell already held this block and parameters.
    Unchanged,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub tick: u64,
    pub chunks: usize,
    pub unbuilt: usize,
    pub generating: usize,
    pub mesh_pending: usize,
    pub ready: usize,
    pub disposing: usize,
    pub pooled: usize,
    pub pending_updates: usize,
    pub jobs_outstanding: usize,
    pub jobs_applied: u64,
    pub stale_results: u64,
    /// Results that arrived after their chunk was already released.
    pub discarded_results: u64,
    pub listener_failures: u64,
    pub snapshots_saved: u64,
    pub snapshots_loaded: u64,
}

#[derive(Default)]
struct Counters {
    jobs_applied: u64,
    stale_results: u64,
    discarded_results: u64,
    listener_failures: u64,
    snapshots_saved: u64,
    snapshots_loaded: u64,
}

pub struct World {
    settings: WorldSettings,
    worldgen: Arc<WorldGen>,
    runtime: Runtime,
    chunks: ChunkMap,
    updates: UpdateQueue,
    events: BlockEvents,
    presenter: Box<dyn ChunkPresenter>,
    drops: Box<dyn DropSink>,
    store: Box<dyn SnapshotStore>,
    tick: u64,
    viewer: ChunkCoord,
    next_job_id: u64,
    counters: Counters,
}

#[inline]
fn in_height(y: i32) -> bool {
    (0..CHUNK_HEIGHT).contains(&y)
}

impl World {
    /// A world with no-op presenter and drop sink and an in-memory store.
    pub fn new(config: &LoamConfig) -> Self {
        Self::with_collaborators(
            config,
            Box::new(()),
            Box::new(()),
            Box::new(MemorySnapshotStore::new()),
        )
    }

    pub fn with_collaborators(
        config: &LoamConfig,
        presenter: Box<dyn ChunkPresenter>,
        drops: Box<dyn DropSink>,
        store: Box<dyn SnapshotStore>,
    ) -> Self {
        let settings = config.world.clone();
        let worldgen = Arc::new(WorldGen::new(settings.seed, config.worldgen.clone()));
        let runtime = Runtime::new(Arc::clone(&worldgen), settings.worker_threads);
        log::info!(
            "world start seed={} render_distance={} evict_radius={} tps={} liquid_cadence={}",
            settings.seed,
            settings.render_distance,
            settings.evict_radius(),
            settings.ticks_per_second,
            settings.liquid_cadence
        );
        Self {
            chunks: ChunkMap::new(settings.pool_capacity),
            updates: UpdateQueue::new(settings.max_pending_updates),
            events: BlockEvents::new(),
            settings,
            worldgen,
            runtime,
            presenter,
            drops,
            store,
            tick: 0,
            viewer: ChunkCoord::default(),
            next_job_id: 1,
            counters: Counters::default(),
        }
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn worldgen(&self) -> &WorldGen {
        &self.worldgen
    }

    pub fn events_mut(&mut self) -> &mut BlockEvents {
        &mut self.events
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunks(&self) -> &ChunkMap {
        &self.chunks
    }

    pub fn viewer(&self) -> ChunkCoord {
        self.viewer
    }

    /// Moves the streaming center to the chunk containing `pos`.
    pub fn set_viewer(&mut self, pos: WorldPos) {
        let (coord, _) = world_to_local(pos);
        if coord != self.viewer {
            log::debug!(target: "stream", "viewer moved to ({}, {})", coord.cx, coord.cz);
        }
        self.viewer = coord;
    }

    pub fn get_block(&self, pos: WorldPos) -> Option<BlockType> {
        if !in_height(pos.y) {
            return None;
        }
        let (coord, local) = world_to_local(pos);
        self.chunks.get(&coord)?.try_get_block(local)
    }

    pub fn param(&self, pos: WorldPos, kind: ParamKind) -> Option<u8> {
        if !in_height(pos.y) {
            return None;
        }
        let (coord, local) = world_to_local(pos);
        self.chunks.get(&coord)?.param(local, kind)
    }

    pub fn block_data(&self, pos: WorldPos) -> Option<BlockData> {
        let block = self.get_block(pos)?;
        Some(
            ParamKind::ALL
                .into_iter()
                .fold(BlockData::new(pos, block), |d, kind| {
                    d.with_param(kind, self.param(pos, kind))
                }),
        )
    }

    pub fn neighbors(&self, pos: WorldPos) -> Neighbors {
        Face::ALL.map(|face| {
            let (dx, dy, dz) = face.delta();
            self.block_data(pos.offset(dx, dy, dz))
        })
    }

    pub fn try_set_block(
        &mut self,
        pos: WorldPos,
        block: BlockType,
        settings: SetBlockSettings,
    ) -> Result<SetOutcome, SetBlockError> {
        self.try_set_block_with(pos, block, &[], settings)
    }

    /// Replaces the block at `pos` and stores `params` for it. Every
    /// parameter previously held by the cell is dropped first.
    pub fn try_set_block_with(
        &mut self,
        pos: WorldPos,
        block: BlockType,
        params: &[(ParamKind, u8)],
        settings: SetBlockSettings,
    ) -> Result<SetOutcome, SetBlockError> {
        self.try_set_block_with_args(pos, block, params, &[], settings)
    }

    /// [`World::try_set_block_with`] that also hands `args` to the destroy
    /// listeners of the old block and the place listeners of the new one.
    pub fn try_set_block_with_args(
        &mut self,
        pos: WorldPos,
        block: BlockType,
        params: &[(ParamKind, u8)],
        args: &[i32],
        settings: SetBlockSettings,
    ) -> Result<SetOutcome, SetBlockError> {
        let mut cmds = Commands::new();
        let out = self.set_block_inner(pos, block, params, args, settings, &mut cmds)?;
        self.apply_commands(cmds);
        Ok(out)
    }

    /// [`World::try_set_block`] for callers that only care whether it took.
    pub fn set_block(&mut self, pos: WorldPos, block: BlockType, settings: SetBlockSettings) -> bool {
        match self.try_set_block(pos, block, settings) {
            Ok(_) => true,
            Err(e) => {
                log::debug!(target: "events", "set_block {:?} rejected: {}", pos, e);
                false
            }
        }
    }

    /// Returns false if `pos` already has a pending update.
    pub fn schedule_update(&mut self, pos: WorldPos, delay: u32, args: &[i32]) -> bool {
        self.updates.schedule(pos, delay, args)
    }

    fn set_block_inner(
        &mut self,
        pos: WorldPos,
        block: BlockType,
        params: &[(ParamKind, u8)],
        args: &[i32],
        settings: SetBlockSettings,
        cmds: &mut Commands,
    ) -> Result<SetOutcome, SetBlockError> {
        if !in_height(pos.y) {
            return Err(SetBlockError::OutOfRange(pos));
        }
        let (coord, local) = world_to_local(pos);
        let chunk = self
            .chunks
            .get_mut(&coord)
            .filter(|c| c.state() != ChunkState::DisposedPending)
            .ok_or(SetBlockError::NotLoaded(coord))?;
        if !chunk.accepts_edits() {
            chunk.pending_edits.push(PendingEdit {
                local,
                block,
                params: params.to_vec(),
                args: args.to_vec(),
                settings,
            });
            log::trace!(target: "events", "queued edit at {:?} while {:?}", pos, chunk.state());
            return Ok(SetOutcome::Queued);
        }
        let old = chunk.get_block(local);
        let same_params = ParamKind::ALL.into_iter().all(|kind| {
            let wanted = params.iter().rev().find(|(k, _)| *k == kind).map(|(_, v)| *v);
            chunk.param(local, kind) == wanted
        });
        if old == block && same_params {
            return Ok(SetOutcome::Unchanged);
        }

        if settings.dispatch_destroy && !old.is_air() {
            if let Some(before) = self.block_data(pos) {
                let failures = self.events.dispatch_destroy(cmds, &before, args);
                self.counters.listener_failures += failures as u64;
            }
        }

        let chunk = self
            .chunks
            .get_mut(&coord)
            .ok_or(SetBlockError::NotLoaded(coord))?;
        chunk.grid.set(local, block);
        chunk.params.remove_all(local);
        for &(kind, value) in params {
            chunk.params.set(local, kind, value);
        }
        chunk.needs_rebuild = true;
        if settings.mark_modified {
            chunk.modified = true;
        }
        let liquid = old.is_liquid() || block.is_liquid() || touches_liquid(chunk, local);
        if liquid {
            chunk.needs_liquid = true;
        }
        self.mirror_to_neighbors(coord, local, liquid);
        log::trace!(target: "events", "set {:?} {:?} -> {:?}", pos, old, block);

        if settings.drop_item && !old.is_air() && old != block {
            if let Some(item) = drop_for(old) {
                self.drops.drop_item(item, pos, 1, Vec3::UP * 2.0);
            }
        }
        if settings.dispatch_place && !block.is_air() {
            if let Some(after) = self.block_data(pos) {
                let failures = self.events.dispatch_place(cmds, &after, args);
                self.counters.listener_failures += failures as u64;
            }
        }
        if settings.schedule_updates {
            self.updates.schedule(pos, 1, &[]);
            for face in Face::ALL {
                let (dx, dy, dz) = face.delta();
                let n = pos.offset(dx, dy, dz);
                if in_height(n.y) {
                    self.updates.schedule(n, 1, &[]);
                }
            }
        }
        Ok(SetOutcome::Applied)
    }

    /// Copies an edge cell into every neighbor grid that mirrors it. Neighbors
    /// without data yet pick the cell up when their own border syncs.
    fn mirror_to_neighbors(&mut self, coord: ChunkCoord, local: LocalPos, liquid: bool) {
        for ((dx, dz), npos) in local.mirror_targets() {
            let Some([src, dst]) = self.chunks.get_pair_mut(coord, coord.offset(dx, dz)) else {
                continue;
            };
            if !dst.has_data() {
                continue;
            }
            mirror_cell(&mut dst.grid, &mut dst.params, npos, &src.grid, &src.params, local);
            dst.needs_rebuild = true;
            if liquid {
                dst.needs_liquid = true;
            }
        }
    }

    fn apply_commands(&mut self, mut cmds: Commands) {
        let mut work: VecDeque<Command> = cmds.take().into();
        let mut applied = 0;
        while let Some(cmd) = work.pop_front() {
            if applied >= MAX_COMMAND_CASCADE {
                log::warn!(
                    target: "events",
                    "command cascade cut off after {} commands, {} dropped",
                    applied,
                    work.len() + 1
                );
                break;
            }
            applied += 1;
            match cmd {
                Command::SetBlock {
                    pos,
                    block,
                    params,
                    args,
                    settings,
                } => {
                    let mut more = Commands::new();
                    if let Err(e) =
                        self.set_block_inner(pos, block, &params, &args, settings, &mut more)
                    {
                        log::debug!(target: "events", "listener edit at {:?} rejected: {}", pos, e);
                    }
                    work.extend(more.take());
                }
                Command::Schedule { pos, delay, args } => {
                    self.updates.schedule(pos, delay, &args);
                }
            }
        }
    }

    /// One fixed-rate step: streaming, due updates, liquid cadence, job
    /// submission, then applying finished jobs.
    pub fn tick(&mut self) {
        self.stream();
        self.fire_updates();
        let liquid_due = self.tick % self.settings.liquid_cadence.max(1) == 0;
        self.submit_jobs(liquid_due);
        self.poll_results();
        self.tick += 1;
    }

    fn stream(&mut self) {
        let center = self.viewer;
        let evict = i64::from(self.settings.evict_radius());
        let leaving: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(c, ch)| {
                center.distance_sq(**c) > evict * evict && ch.state() != ChunkState::DisposedPending
            })
            .map(|(c, _)| *c)
            .collect();
        for coord in leaving {
            self.dispose(coord);
        }

        let r = self.settings.render_distance;
        let load_sq = i64::from(r) * i64::from(r);
        for dz in -r..=r {
            for dx in -r..=r {
                let c = center.offset(dx, dz);
                if center.distance_sq(c) <= load_sq && !self.chunks.contains(&c) {
                    self.chunks.insert_new(c);
                    log::trace!(target: "stream", "want chunk ({}, {})", c.cx, c.cz);
                }
            }
        }

        let cd = i64::from(self.settings.collider_distance);
        let wants_collider: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(c, ch)| {
                !ch.collider_baked && ch.mesh().is_some() && center.distance_sq(**c) <= cd * cd
            })
            .map(|(c, _)| *c)
            .collect();
        for coord in wants_collider {
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                if let Some(mesh) = chunk.mesh.as_ref() {
                    self.presenter.bake_collider(coord, mesh);
                    chunk.collider_baked = true;
                }
            }
        }
    }

    /// Saves a modified chunk, hides it, and returns it to the pool once no
    /// job still references it.
    fn dispose(&mut self, coord: ChunkCoord) {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };
        if chunk.has_data() {
            for e in std::mem::take(&mut chunk.pending_edits) {
                chunk.grid.set(e.local, e.block);
                chunk.params.remove_all(e.local);
                for (kind, value) in e.params {
                    chunk.params.set(e.local, kind, value);
                }
                chunk.modified = true;
            }
        } else if !chunk.pending_edits.is_empty() {
            log::debug!(
                target: "stream",
                "dropping {} edits for ungenerated chunk ({}, {})",
                chunk.pending_edits.len(),
                coord.cx,
                coord.cz
            );
        }
        if chunk.modified && chunk.has_data() {
            let snap = ChunkSnapshot::capture(&chunk.grid, &chunk.params);
            match self.store.save(&snap) {
                Ok(()) => self.counters.snapshots_saved += 1,
                Err(e) => log::warn!(
                    target: "stream",
                    "failed to save chunk ({}, {}): {}",
                    coord.cx,
                    coord.cz,
                    e
                ),
            }
        }
        let busy = chunk.inflight().is_some();
        if busy {
            chunk.mark_disposed();
        }
        if chunk.mesh().is_some() {
            self.presenter.remove(coord);
        }
        self.updates.drop_chunk(coord);
        if !busy {
            self.chunks.release(coord);
        }
        log::debug!(target: "stream", "unload ({}, {}) busy={}", coord.cx, coord.cz, busy);
    }

    fn fire_updates(&mut self) {
        for update in self.updates.advance() {
            let Some(this) = self.block_data(update.pos) else {
                continue;
            };
            if self.events.update_listeners(this.block) == 0 {
                continue;
            }
            let neighbors = self.neighbors(update.pos);
            let mut cmds = Commands::new();
            let failures = self
                .events
                .dispatch_update(&mut cmds, &this, &neighbors, &update.args);
            self.counters.listener_failures += failures as u64;
            self.apply_commands(cmds);
        }
    }

    fn submit_jobs(&mut self, liquid_due: bool) {
        let cap = self.settings.max_builds_per_tick.max(1);
        let center = self.viewer;
        let mut rebuild = Vec::new();
        let mut liquid = Vec::new();
        let mut unbuilt = Vec::new();
        for (coord, chunk) in self.chunks.iter() {
            if chunk.inflight().is_some() {
                continue;
            }
            match chunk.state() {
                ChunkState::Unbuilt => unbuilt.push(*coord),
                ChunkState::Ready if liquid_due && chunk.needs_liquid() => liquid.push(*coord),
                ChunkState::Ready if chunk.needs_rebuild() => rebuild.push(*coord),
                _ => {}
            }
        }
        for list in [&mut rebuild, &mut liquid, &mut unbuilt] {
            list.sort_by_key(|c| (center.distance_sq(*c), c.cx, c.cz));
        }

        let mut submitted = 0;
        for coord in rebuild {
            if submitted >= cap {
                return;
            }
            if let Some(chunk) = self.chunks.get(&coord) {
                let job = BuildJob::mesh(coord, 0, chunk.grid.clone(), chunk.params.clone());
                self.submit(job);
                submitted += 1;
            }
        }
        for coord in liquid {
            if submitted >= cap {
                return;
            }
            if let Some(chunk) = self.chunks.get(&coord) {
                let job = BuildJob::liquid(
                    coord,
                    0,
                    chunk.grid.clone(),
                    chunk.params.clone(),
                    self.settings.liquid_budget,
                );
                self.submit(job);
                submitted += 1;
            }
        }
        for coord in unbuilt {
            if submitted >= cap {
                return;
            }
            self.start_load(coord);
            submitted += 1;
        }
    }

    fn submit(&mut self, mut job: BuildJob) {
        let Some(chunk) = self.chunks.get_mut(&job.coord) else {
            return;
        };
        job.job_id = self.next_job_id;
        self.next_job_id += 1;
        chunk.begin_job(job.job_id, job.kind);
        self.runtime.submit_build_job(job);
    }

    /// Restores `coord` from the store if it was saved, otherwise generates it.
    fn start_load(&mut self, coord: ChunkCoord) {
        let restored = match self.store.load(coord) {
            Ok(Some(snap)) => match snap.restore(BlockType::Stone) {
                Ok(data) => Some(data),
                Err(e) => {
                    log::warn!(target: "stream", "snapshot ({}, {}) rejected: {}", coord.cx, coord.cz, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!(target: "stream", "snapshot ({}, {}) unreadable: {}", coord.cx, coord.cz, e);
                None
            }
        };
        let Some((grid, params)) = restored else {
            let job = BuildJob::generate(coord, 0).with_liquid_pass(self.settings.liquid_budget);
            self.submit(job);
            return;
        };
        self.counters.snapshots_loaded += 1;
        log::debug!(target: "stream", "restored ({}, {}) from snapshot", coord.cx, coord.cz);
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.set_data(grid, params);
            chunk.needs_liquid = true;
        }
        self.sync_borders(coord);
        if let Some(chunk) = self.chunks.get(&coord) {
            let job = BuildJob::mesh(coord, 0, chunk.grid.clone(), chunk.params.clone());
            self.submit(job);
        }
    }

    /// Exchanges border columns with every loaded neighbor. Returns whether
    /// `coord`'s own border changed; neighbors whose border changed are
    /// flagged for rebuild.
    fn sync_borders(&mut self, coord: ChunkCoord) -> bool {
        let mut changed = false;
        for (dx, dz) in ChunkCoord::NEIGHBOR_OFFSETS {
            let Some([me, nb]) = self.chunks.get_pair_mut(coord, coord.offset(dx, dz)) else {
                continue;
            };
            if !nb.has_data() {
                continue;
            }
            changed |= copy_border_from(&mut me.grid, &mut me.params, &nb.grid, &nb.params, (dx, dz));
            if copy_border_from(&mut nb.grid, &mut nb.params, &me.grid, &me.params, (-dx, -dz)) {
                nb.needs_rebuild = true;
            }
        }
        changed
    }

    fn poll_results(&mut self) {
        let cap = self.settings.max_builds_per_tick.max(1);
        for out in self.runtime.drain_worker_results_capped(cap) {
            self.apply_result(out);
        }
    }

    fn apply_result(&mut self, out: JobOut) {
        let coord = out.coord;
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            self.counters.discarded_results += 1;
            log::trace!(target: "runtime", "job {} for released ({}, {})", out.job_id, coord.cx, coord.cz);
            return;
        };
        let Some(kind) = chunk.finish_job(out.job_id) else {
            self.counters.stale_results += 1;
            log::trace!(target: "runtime", "stale job {} for ({}, {})", out.job_id, coord.cx, coord.cz);
            return;
        };
        if chunk.state() == ChunkState::DisposedPending {
            self.chunks.release(coord);
            self.counters.discarded_results += 1;
            return;
        }

        let replaced = match (out.grid, out.params) {
            (Some(grid), Some(params)) => {
                chunk.set_data(grid, params);
                true
            }
            _ => false,
        };
        if out.liquid_writes > 0 {
            chunk.needs_liquid = true;
            // Flow counts as an edit for persistence.
            if kind == JobKind::Liquid {
                chunk.modified = true;
            }
        }
        let has_mesh = out.mesh.is_some();
        match out.mesh {
            Some(mesh) => chunk.apply_mesh(mesh),
            None => chunk.mark_ready(),
        }

        if replaced {
            if self.sync_borders(coord) {
                if let Some(chunk) = self.chunks.get_mut(&coord) {
                    chunk.needs_rebuild = true;
                }
            }
            for n in dirty_neighbors(coord, out.borders) {
                if let Some(nc) = self.chunks.get_mut(&n) {
                    nc.needs_liquid = true;
                    nc.needs_rebuild = true;
                }
            }
        }

        let bake = {
            let cd = i64::from(self.settings.collider_distance);
            self.viewer.distance_sq(coord) <= cd * cd
        };
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };
        if has_mesh {
            if let Some(mesh) = chunk.mesh.as_ref() {
                self.presenter.present(coord, mesh, bake);
                chunk.collider_baked = bake;
            }
        }
        let edits = std::mem::take(&mut chunk.pending_edits);

        self.counters.jobs_applied += 1;
        log::debug!(
            target: "runtime",
            "applied job {} {:?} ({}, {}) trees={} liquid_writes={} gen={}ms liquid={}ms mesh={}ms total={}ms",
            out.job_id,
            kind,
            coord.cx,
            coord.cz,
            out.trees,
            out.liquid_writes,
            out.t_gen_ms,
            out.t_liquid_ms,
            out.t_mesh_ms,
            out.t_total_ms
        );

        for e in edits {
            let pos = local_to_world(coord, e.local);
            let mut cmds = Commands::new();
            if let Err(err) =
                self.set_block_inner(pos, e.block, &e.params, &e.args, e.settings, &mut cmds)
            {
                log::debug!(target: "events", "queued edit at {:?} dropped: {}", pos, err);
            }
            self.apply_commands(cmds);
        }
    }

    /// No chunk is waiting on work and no job result is outstanding.
    pub fn is_settled(&self) -> bool {
        self.runtime.outstanding() == 0
            && self.chunks.iter().all(|(_, c)| {
                c.is_ready() && !c.needs_rebuild() && !c.needs_liquid() && c.inflight().is_none()
            })
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            tick: self.tick,
            chunks: self.chunks.len(),
            unbuilt: self.chunks.count_in(ChunkState::Unbuilt),
            generating: self.chunks.count_in(ChunkState::Generating),
            mesh_pending: self.chunks.count_in(ChunkState::MeshPending),
            ready: self.chunks.count_in(ChunkState::Ready),
            disposing: self.chunks.count_in(ChunkState::DisposedPending),
            pooled: self.chunks.pooled(),
            pending_updates: self.updates.len(),
            jobs_outstanding: self.runtime.outstanding(),
            jobs_applied: self.counters.jobs_applied,
            stale_results: self.counters.stale_results,
            discarded_results: self.counters.discarded_results,
            listener_failures: self.counters.listener_failures,
            snapshots_saved: self.counters.snapshots_saved,
            snapshots_loaded: self.counters.snapshots_loaded,
        }
    }

    /// Saves every modified chunk and unloads everything.
    pub fn shutdown(mut self) -> WorldStats {
        let coords: Vec<ChunkCoord> = self.chunks.coords().collect();
        for coord in coords {
            self.dispose(coord);
        }
        let stats = self.stats();
        log::info!(
            "world shutdown at tick {} saved={} applied={}",
            stats.tick,
            stats.snapshots_saved,
            stats.jobs_applied
        );
        stats
    }
}

fn touches_liquid(chunk: &Chunk, local: LocalPos) -> bool {
    Face::ALL.into_iter().any(|face| {
        let (dx, dy, dz) = face.delta();
        chunk
            .try_get_block(local.offset(dx, dy, dz))
            .is_some_and(BlockType::is_liquid)
    })
}
