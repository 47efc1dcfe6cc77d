//! Narrow interfaces to the systems outside the engine core.

use hashbrown::HashMap;
use loam_blocks::BlockType;
use loam_chunk::{ChunkSnapshot, SnapshotError};
use loam_geom::Vec3;
use loam_mesh_cpu::ChunkMeshCPU;
use loam_world::{ChunkCoord, WorldPos};

/// Receives finished geometry. Collider baking may be deferred for far
/// chunks and requested later through `bake_collider`.
pub trait ChunkPresenter {
    fn present(&mut self, coord: ChunkCoord, mesh: &ChunkMeshCPU, bake_collider: bool);
    fn bake_collider(&mut self, coord: ChunkCoord, mesh: &ChunkMeshCPU);
    fn remove(&mut self, coord: ChunkCoord);
}

pub trait DropSink {
    fn drop_item(&mut self, item: BlockType, pos: WorldPos, amount: u32, velocity: Vec3);
}

pub trait SnapshotStore {
    fn load(&mut self, coord: ChunkCoord) -> Result<Option<ChunkSnapshot>, SnapshotError>;
    fn save(&mut self, snapshot: &ChunkSnapshot) -> Result<(), SnapshotError>;
}

impl ChunkPresenter for () {
    fn present(&mut self, _: ChunkCoord, _: &ChunkMeshCPU, _: bool) {}
    fn bake_collider(&mut self, _: ChunkCoord, _: &ChunkMeshCPU) {}
    fn remove(&mut self, _: ChunkCoord) {}
}

impl DropSink for () {
    fn drop_item(&mut self, _: BlockType, _: WorldPos, _: u32, _: Vec3) {}
}

/// Keeps encoded snapshots in memory, keyed by chunk coordinate.
#[derive(Default)]
pub struct MemorySnapshotStore {
    saved: HashMap<ChunkCoord, Vec<u8>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.saved.contains_key(&coord)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&mut self, coord: ChunkCoord) -> Result<Option<ChunkSnapshot>, SnapshotError> {
        self.saved
            .get(&coord)
            .map(|bytes| ChunkSnapshot::decode(bytes))
            .transpose()
    }

    fn save(&mut self, snapshot: &ChunkSnapshot) -> Result<(), SnapshotError> {
        self.saved.insert(snapshot.coord(), snapshot.encode()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use loam_chunk::{BlockParams, ChunkGrid};
    use loam_world::LocalPos;

    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemorySnapshotStore::new();
        let coord = ChunkCoord::new(-3, 2);
        assert!(store.load(coord).unwrap().is_none());

        let mut grid = ChunkGrid::new(coord);
        grid.set(LocalPos::new(4, 9, 4), BlockType::OakPlanks);
        let snap = ChunkSnapshot::capture(&grid, &BlockParams::new());
        store.save(&snap).unwrap();
        assert!(store.contains(coord));
        assert_eq!(store.load(coord).unwrap(), Some(snap));
    }
}
