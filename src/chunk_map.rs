use hashbrown::HashMap;
use loam_world::ChunkCoord;

use crate::chunk::{Chunk, ChunkState};

/// Dense arena of loaded chunks keyed by coordinate. Neighbors are found by
/// coordinate offset, never by stored reference. Released chunks go to a
/// bounded pool and are reset on reuse.
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
    pool: Vec<Chunk>,
    pool_capacity: usize,
}

impl ChunkMap {
    pub fn new(pool_capacity: usize) -> Self {
        Self {
            chunks: HashMap::new(),
            pool: Vec::new(),
            pool_capacity,
        }
    }

    #[inline]
    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    #[inline]
    pub fn get_mut(&mut self, coord: &ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(coord)
    }

    /// Two distinct chunks at once; `None` if either is missing.
    pub fn get_pair_mut(&mut self, a: ChunkCoord, b: ChunkCoord) -> Option<[&mut Chunk; 2]> {
        self.chunks.get_many_mut([&a, &b])
    }

    #[inline]
    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    /// Inserts an `Unbuilt` chunk, recycling a pooled shell when available.
    pub fn insert_new(&mut self, coord: ChunkCoord) -> &mut Chunk {
        let chunk = match self.pool.pop() {
            Some(mut c) => {
                c.reset(coord);
                c
            }
            None => Chunk::new(coord),
        };
        self.chunks.entry(coord).insert(chunk).into_mut()
    }

    /// Removes `coord` and returns its shell to the pool.
    pub fn release(&mut self, coord: ChunkCoord) -> bool {
        let Some(chunk) = self.chunks.remove(&coord) else {
            return false;
        };
        if self.pool.len() < self.pool_capacity {
            self.pool.push(chunk);
        }
        true
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    pub fn count_in(&self, state: ChunkState) -> usize {
        self.chunks.values().filter(|c| c.state() == state).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[inline]
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }
}
