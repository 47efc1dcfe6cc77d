//! Persisted form of a chunk.
//!
//! Blocks are stored as single-byte codes for the interior only. Unlike the
//! bare block array, the snapshot also carries the sparse parameters and the
//! per-column biome, so a reloaded chunk keeps its water gradients.

use loam_blocks::{BlockType, ParamKind};
use loam_world::{CHUNK_HEIGHT, CHUNK_WIDTH, ChunkCoord, LocalPos};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BlockParams, ChunkGrid};

const INTERIOR_LEN: usize = (CHUNK_WIDTH * CHUNK_HEIGHT * CHUNK_WIDTH) as usize;
const COLUMNS: usize = (CHUNK_WIDTH * CHUNK_WIDTH) as usize;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot codec failure: {0}")]
    Codec(#[from] bincode::Error),
    #[error("snapshot block array has {got} cells, expected {expected}")]
    SizeMismatch { expected: usize, got: usize },
    #[error("snapshot parameter out of range at ({x}, {y}, {z})")]
    ParamOutOfRange { x: u8, y: u8, z: u8 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotParam {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub kind: ParamKind,
    pub value: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSnapshot {
    pub coord: (i32, i32),
    /// Interior block codes, x fastest then y then z.
    pub blocks: Vec<u8>,
    pub biomes: Vec<u8>,
    pub params: Vec<SnapshotParam>,
}

#[inline]
fn interior_index(x: i32, y: i32, z: i32) -> usize {
    ((x - 1) + CHUNK_WIDTH * (y + CHUNK_HEIGHT * (z - 1))) as usize
}

impl ChunkSnapshot {
    pub fn capture(grid: &ChunkGrid, params: &BlockParams) -> Self {
        let mut blocks = vec![0u8; INTERIOR_LEN];
        let mut biomes = Vec::with_capacity(COLUMNS);
        for z in 1..=CHUNK_WIDTH {
            for x in 1..=CHUNK_WIDTH {
                biomes.push(grid.biome_at(x, z));
            }
            for y in 0..CHUNK_HEIGHT {
                for x in 1..=CHUNK_WIDTH {
                    blocks[interior_index(x, y, z)] = grid.get_xyz(x, y, z).code();
                }
            }
        }
        let mut out: Vec<SnapshotParam> = params
            .iter()
            .filter(|(k, _)| k.pos.is_interior())
            .map(|(k, value)| SnapshotParam {
                x: k.pos.x as u8,
                y: k.pos.y as u8,
                z: k.pos.z as u8,
                kind: k.kind,
                value,
            })
            .collect();
        // Map iteration order is unspecified; sort so equal chunks encode equally.
        out.sort_by_key(|p| (p.z, p.y, p.x, p.kind));
        Self {
            coord: (grid.coord.cx, grid.coord.cz),
            blocks,
            biomes,
            params: out,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        ChunkCoord::from(self.coord)
    }

    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snap: ChunkSnapshot = bincode::deserialize(bytes)?;
        if snap.blocks.len() != INTERIOR_LEN {
            return Err(SnapshotError::SizeMismatch {
                expected: INTERIOR_LEN,
                got: snap.blocks.len(),
            });
        }
        Ok(snap)
    }

    /// Rebuilds the grid. Border cells are unknown until neighbors sync and
    /// are filled with `border` meanwhile.
    pub fn restore(&self, border: BlockType) -> Result<(ChunkGrid, BlockParams), SnapshotError> {
        if self.blocks.len() != INTERIOR_LEN {
            return Err(SnapshotError::SizeMismatch {
                expected: INTERIOR_LEN,
                got: self.blocks.len(),
            });
        }
        let mut grid = ChunkGrid::new(self.coord());
        grid.fill_border(border);
        for z in 1..=CHUNK_WIDTH {
            for y in 0..CHUNK_HEIGHT {
                for x in 1..=CHUNK_WIDTH {
                    let code = self.blocks[interior_index(x, y, z)];
                    grid.set(LocalPos::new(x, y, z), BlockType::from_code(code));
                }
            }
        }
        if self.biomes.len() == COLUMNS {
            let mut it = self.biomes.iter();
            for z in 1..=CHUNK_WIDTH {
                for x in 1..=CHUNK_WIDTH {
                    if let Some(b) = it.next() {
                        grid.set_biome(x, z, *b);
                    }
                }
            }
        }
        let mut params = BlockParams::new();
        for p in &self.params {
            let pos = LocalPos::new(p.x as i32, p.y as i32, p.z as i32);
            if !pos.is_interior() {
                return Err(SnapshotError::ParamOutOfRange {
                    x: p.x,
                    y: p.y,
                    z: p.z,
                });
            }
            params.set(pos, p.kind, p.value);
        }
        Ok((grid, params))
    }
}
