//! Chunk-local addressing.
//!
//! A chunk grid is `GRID_X * CHUNK_HEIGHT * GRID_Z` cells: the interior spans
//! local `x, z` in `1..=CHUNK_WIDTH`, and the one-cell ring at `0` and
//! `CHUNK_WIDTH + 1` mirrors the neighboring chunks' edge columns. The flat
//! layout is z-major, then y, then x.

use serde::{Deserialize, Serialize};

use crate::ChunkCoord;

pub const CHUNK_WIDTH: i32 = 16;
pub const CHUNK_HEIGHT: i32 = 128;
pub const GRID_X: i32 = CHUNK_WIDTH + 2;
pub const GRID_Z: i32 = CHUNK_WIDTH + 2;
pub const GRID_LEN: usize = (GRID_X * CHUNK_HEIGHT * GRID_Z) as usize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LocalPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Inside the bordered grid, border ring included.
    #[inline]
    pub const fn in_grid(self) -> bool {
        self.x >= 0
            && self.x < GRID_X
            && self.z >= 0
            && self.z < GRID_Z
            && self.y >= 0
            && self.y < CHUNK_HEIGHT
    }

    /// Owned by this chunk (not a mirrored border cell).
    #[inline]
    pub const fn is_interior(self) -> bool {
        self.x >= 1
            && self.x <= CHUNK_WIDTH
            && self.z >= 1
            && self.z <= CHUNK_WIDTH
            && self.y >= 0
            && self.y < CHUNK_HEIGHT
    }

    #[inline]
    pub const fn index(self) -> usize {
        to_index(self.x, self.y, self.z)
    }

    /// Resolves a possibly out-of-interior horizontal position to the chunk
    /// offset that owns it and the position inside that chunk's interior.
    #[inline]
    pub const fn owner(self) -> ((i32, i32), LocalPos) {
        let dx = edge_offset(self.x);
        let dz = edge_offset(self.z);
        (
            (dx, dz),
            LocalPos::new(
                clamp_border(self.x, 1, CHUNK_WIDTH),
                self.y,
                clamp_border(self.z, 1, CHUNK_WIDTH),
            ),
        )
    }

    /// Cells in neighboring grids that mirror this interior cell, as
    /// `((dx, dz), position in that neighbor)`. Empty unless the cell sits on
    /// an interior edge; a corner cell mirrors into three neighbors.
    pub fn mirror_targets(self) -> impl Iterator<Item = ((i32, i32), LocalPos)> {
        let (xs, zs) = if self.is_interior() {
            (mirror_axis(self.x), mirror_axis(self.z))
        } else {
            (0, 0)
        };
        let mut dirs = [None; 3];
        if xs != 0 {
            dirs[0] = Some((xs, 0));
        }
        if zs != 0 {
            dirs[1] = Some((0, zs));
        }
        if xs != 0 && zs != 0 {
            dirs[2] = Some((xs, zs));
        }
        let LocalPos { x, y, z } = self;
        dirs.into_iter().flatten().map(move |(dx, dz)| {
            (
                (dx, dz),
                LocalPos::new(x - dx * CHUNK_WIDTH, y, z - dz * CHUNK_WIDTH),
            )
        })
    }
}

#[inline]
const fn edge_offset(v: i32) -> i32 {
    if v > CHUNK_WIDTH {
        1
    } else if v < 1 {
        -1
    } else {
        0
    }
}

#[inline]
const fn mirror_axis(v: i32) -> i32 {
    if v == CHUNK_WIDTH {
        1
    } else if v == 1 {
        -1
    } else {
        0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

#[inline]
pub const fn to_index(x: i32, y: i32, z: i32) -> usize {
    (x + GRID_X * (y + CHUNK_HEIGHT * z)) as usize
}

#[inline]
pub const fn from_index(i: usize) -> LocalPos {
    let i = i as i32;
    LocalPos::new(i % GRID_X, (i / GRID_X) % CHUNK_HEIGHT, i / (GRID_X * CHUNK_HEIGHT))
}

/// Wrap-subtract clamp: a value past either end moves by exactly one span
/// (`max - min + 1`). Unlike a modulo, a value two spans out stays out of range.
#[inline]
pub const fn clamp_border(v: i32, min: i32, max: i32) -> i32 {
    let span = max - min + 1;
    if v > max {
        v - span
    } else if v < min {
        v + span
    } else {
        v
    }
}

#[inline]
pub const fn local_to_world(coord: ChunkCoord, local: LocalPos) -> WorldPos {
    WorldPos::new(
        coord.cx * CHUNK_WIDTH + local.x - 1,
        local.y,
        coord.cz * CHUNK_WIDTH + local.z - 1,
    )
}

/// Owning chunk and interior position of a world voxel.
#[inline]
pub const fn world_to_local(pos: WorldPos) -> (ChunkCoord, LocalPos) {
    let cx = pos.x.div_euclid(CHUNK_WIDTH);
    let cz = pos.z.div_euclid(CHUNK_WIDTH);
    (
        ChunkCoord::new(cx, cz),
        LocalPos::new(pos.x - cx * CHUNK_WIDTH + 1, pos.y, pos.z - cz * CHUNK_WIDTH + 1),
    )
}
