use std::collections::VecDeque;

use hashbrown::HashSet;
use loam_world::{ChunkCoord, WorldPos, world_to_local};

/// A delayed block update. A world position names exactly one
/// (chunk, local position) pair, so it doubles as the dedup key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingUpdate {
    pub pos: WorldPos,
    pub remaining: u32,
    pub args: Vec<i32>,
}

impl PendingUpdate {
    #[inline]
    pub fn chunk(&self) -> ChunkCoord {
        world_to_local(self.pos).0
    }
}

/// FIFO of delayed updates with at most one entry per position.
#[derive(Debug)]
pub struct UpdateQueue {
    entries: VecDeque<PendingUpdate>,
    pending: HashSet<WorldPos>,
    capacity: usize,
}

impl UpdateQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            pending: HashSet::new(),
            capacity,
        }
    }

    /// Queues an update `delay` ticks out (a zero delay fires on the next
    /// advance). Returns false when `pos` already has a pending entry or the
    /// queue is full.
    pub fn schedule(&mut self, pos: WorldPos, delay: u32, args: &[i32]) -> bool {
        if self.pending.contains(&pos) {
            return false;
        }
        if self.entries.len() >= self.capacity {
            log::debug!(target: "events", "update queue full, dropping {:?}", pos);
            return false;
        }
        self.pending.insert(pos);
        self.entries.push_back(PendingUpdate {
            pos,
            remaining: delay.max(1),
            args: args.to_vec(),
        });
        true
    }

    /// Decrements every counter and removes the entries that reached zero,
    /// in queue order. Fired positions may be scheduled again immediately.
    pub fn advance(&mut self) -> Vec<PendingUpdate> {
        let mut due = Vec::new();
        let mut keep = VecDeque::with_capacity(self.entries.len());
        for mut e in self.entries.drain(..) {
            e.remaining -= 1;
            if e.remaining == 0 {
                self.pending.remove(&e.pos);
                due.push(e);
            } else {
                keep.push_back(e);
            }
        }
        self.entries = keep;
        due
    }

    #[inline]
    pub fn contains(&self, pos: WorldPos) -> bool {
        self.pending.contains(&pos)
    }

    /// Drops every entry inside `coord`.
    pub fn drop_chunk(&mut self, coord: ChunkCoord) -> usize {
        let before = self.entries.len();
        let pending = &mut self.pending;
        self.entries.retain(|e| {
            let keep = e.chunk() != coord;
            if !keep {
                pending.remove(&e.pos);
            }
            keep
        });
        before - self.entries.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
