use loam_blocks::{BlockType, ParamKind};
use loam_chunk::{BlockParams, ChunkGrid};
use loam_mesh_cpu::ChunkMeshCPU;
use loam_runtime::JobKind;
use loam_world::{ChunkCoord, LocalPos};

use crate::world::SetBlockSettings;

/// Lifecycle of one loaded chunk.
///
/// `Ready` goes back to `MeshPending` whenever a rebuild or a liquid pass is
/// submitted. `DisposedPending` is terminal: the chunk left the loaded radius
/// and only waits for an in-flight job to drain before returning to the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    Unbuilt,
    Generating,
    MeshPending,
    Ready,
    DisposedPending,
}

/// An edit that arrived while a job owning the chunk's data was in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingEdit {
    pub local: LocalPos,
    pub block: BlockType,
    pub params: Vec<(ParamKind, u8)>,
    pub args: Vec<i32>,
    pub settings: SetBlockSettings,
}

pub struct Chunk {
    coord: ChunkCoord,
    state: ChunkState,
    pub(crate) grid: ChunkGrid,
    pub(crate) params: BlockParams,
    has_data: bool,
    pub(crate) mesh: Option<ChunkMeshCPU>,
    inflight: Option<(u64, JobKind)>,
    pub(crate) pending_edits: Vec<PendingEdit>,
    pub(crate) needs_rebuild: bool,
    pub(crate) needs_liquid: bool,
    pub(crate) modified: bool,
    pub(crate) collider_baked: bool,
    builds: u32,
}

impl Chunk {
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            state: ChunkState::Unbuilt,
            grid: ChunkGrid::new(coord),
            params: BlockParams::new(),
            has_data: false,
            mesh: None,
            inflight: None,
            pending_edits: Vec::new(),
            needs_rebuild: false,
            needs_liquid: false,
            modified: false,
            collider_baked: false,
            builds: 0,
        }
    }

    /// Clears a pooled shell for reuse at `coord`, keeping its allocations.
    pub fn reset(&mut self, coord: ChunkCoord) {
        self.coord = coord;
        self.state = ChunkState::Unbuilt;
        self.grid.reset(coord);
        self.params.clear();
        self.has_data = false;
        self.mesh = None;
        self.inflight = None;
        self.pending_edits.clear();
        self.needs_rebuild = false;
        self.needs_liquid = false;
        self.modified = false;
        self.collider_baked = false;
        self.builds = 0;
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == ChunkState::Ready
    }

    /// Whether the grid holds generated or restored blocks.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    /// Unchecked: the caller guarantees `local` is inside the grid and the
    /// chunk has data.
    #[inline]
    pub fn get_block(&self, local: LocalPos) -> BlockType {
        self.grid.get(local)
    }

    pub fn try_get_block(&self, local: LocalPos) -> Option<BlockType> {
        if !self.has_data {
            return None;
        }
        self.grid.get_checked(local)
    }

    pub fn param(&self, local: LocalPos, kind: ParamKind) -> Option<u8> {
        self.params.get(local, kind)
    }

    pub fn grid(&self) -> Option<&ChunkGrid> {
        self.has_data.then_some(&self.grid)
    }

    pub fn params(&self) -> &BlockParams {
        &self.params
    }

    pub fn mesh(&self) -> Option<&ChunkMeshCPU> {
        self.mesh.as_ref()
    }

    #[inline]
    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    #[inline]
    pub fn needs_liquid(&self) -> bool {
        self.needs_liquid
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn inflight(&self) -> Option<(u64, JobKind)> {
        self.inflight
    }

    #[inline]
    pub fn pending_edit_count(&self) -> usize {
        self.pending_edits.len()
    }

    /// Completed mesh builds applied to this chunk.
    #[inline]
    pub fn builds(&self) -> u32 {
        self.builds
    }

    /// Edits go straight to the live grid unless a job that replaces it is
    /// in flight; mesh jobs work on a copy and only need a follow-up rebuild.
    #[inline]
    pub fn accepts_edits(&self) -> bool {
        self.has_data
            && !matches!(
                self.inflight,
                Some((_, JobKind::Generate | JobKind::Liquid))
            )
            && self.state != ChunkState::DisposedPending
    }

    pub(crate) fn set_data(&mut self, grid: ChunkGrid, params: BlockParams) {
        self.grid = grid;
        self.params = params;
        self.has_data = true;
    }

    pub(crate) fn begin_job(&mut self, job_id: u64, kind: JobKind) {
        self.inflight = Some((job_id, kind));
        match kind {
            JobKind::Generate => self.transition(ChunkState::Generating),
            JobKind::Liquid => {
                self.needs_liquid = false;
                self.transition(ChunkState::MeshPending);
            }
            JobKind::Mesh => {
                self.needs_rebuild = false;
                self.transition(ChunkState::MeshPending);
            }
        }
    }

    /// Clears the in-flight marker if `job_id` is the current job.
    pub(crate) fn finish_job(&mut self, job_id: u64) -> Option<JobKind> {
        match self.inflight {
            Some((id, kind)) if id == job_id => {
                self.inflight = None;
                Some(kind)
            }
            _ => None,
        }
    }

    pub(crate) fn apply_mesh(&mut self, mesh: ChunkMeshCPU) {
        self.mesh = Some(mesh);
        self.builds += 1;
        self.transition(ChunkState::Ready);
    }

    pub(crate) fn mark_ready(&mut self) {
        self.transition(ChunkState::Ready);
    }

    pub(crate) fn mark_disposed(&mut self) {
        self.transition(ChunkState::DisposedPending);
    }

    fn transition(&mut self, next: ChunkState) {
        if self.state == next {
            return;
        }
        log::debug!(
            target: "stream",
            "chunk ({}, {}) {:?} -> {:?}",
            self.coord.cx,
            self.coord.cz,
            self.state,
            next
        );
        self.state = next;
    }
}
