//! Liquid flow as a cellular automaton over a chunk's bordered grid.
//!
//! A pass runs on scratch copies and hands them back whole; the live grid is
//! only replaced by the caller once the pass is done. Mirrored border cells
//! act as sources but are never written: flow into a neighbor happens when
//! that neighbor runs its own pass against its refreshed border.
#![forbid(unsafe_code)]

use loam_blocks::{BlockState, BlockType, LIQUID_FULL, ParamKind, describe};
use loam_chunk::{BlockParams, ChunkGrid};
use loam_world::{CHUNK_HEIGHT, ChunkCoord, GRID_X, GRID_Z, LocalPos};

mod borders;

pub use borders::BorderFlags;

/// Distances below this do not spread further.
pub const MIN_SPREAD: u8 = 2;
/// Default per-source hop budget.
pub const DEFAULT_STEP_BUDGET: u32 = 128;

pub struct LiquidPass {
    pub grid: ChunkGrid,
    pub params: BlockParams,
    pub borders: BorderFlags,
    /// Cells written during the pass.
    pub writes: usize,
    /// Sources whose spread stopped on the hop budget.
    pub budget_hits: usize,
}

impl LiquidPass {
    #[inline]
    pub fn changed(&self) -> bool {
        self.writes > 0
    }
}

#[derive(Copy, Clone, Debug)]
struct Flow {
    pos: LocalPos,
    dist: u8,
    steps: u32,
}

#[inline]
fn fillable(b: BlockType) -> bool {
    b.is_air() || describe(b).state == BlockState::LiquidDestroyable
}

struct Scratch {
    grid: ChunkGrid,
    params: BlockParams,
    borders: BorderFlags,
    writes: usize,
}

impl Scratch {
    #[inline]
    fn dist(&self, pos: LocalPos) -> u8 {
        self.params.get_or_default(pos, ParamKind::LiquidSource)
    }

    fn write(&mut self, pos: LocalPos, dist: u8) {
        self.grid.set(pos, BlockType::Water);
        self.params.remove_all(pos);
        self.params.set(pos, ParamKind::LiquidSource, dist);
        self.borders.mark(pos);
        self.writes += 1;
    }
}

/// Runs one pass. Columns are visited top-down so water falling within a pass
/// lands before lower cells are considered.
pub fn simulate(grid: &ChunkGrid, params: &BlockParams, budget: u32) -> LiquidPass {
    let mut s = Scratch {
        grid: grid.clone(),
        params: params.clone(),
        borders: BorderFlags::default(),
        writes: 0,
    };
    let mut stack: Vec<Flow> = Vec::new();
    let mut budget_hits = 0;

    for y in (0..CHUNK_HEIGHT).rev() {
        for z in 0..GRID_Z {
            for x in 0..GRID_X {
                let pos = LocalPos::new(x, y, z);
                if !s.grid.get(pos).is_liquid() {
                    continue;
                }
                stack.push(Flow {
                    pos,
                    dist: s.dist(pos),
                    steps: 0,
                });
                if spread(&mut s, &mut stack, budget) {
                    budget_hits += 1;
                }
            }
        }
    }

    if s.writes > 0 {
        log::trace!(
            target: "liquid",
            "pass on ({}, {}) wrote {} cells, borders={:?}",
            grid.coord.cx,
            grid.coord.cz,
            s.writes,
            s.borders
        );
    }
    LiquidPass {
        grid: s.grid,
        params: s.params,
        borders: s.borders,
        writes: s.writes,
        budget_hits,
    }
}

/// Drains `stack`; returns whether any branch stopped on the budget.
fn spread(s: &mut Scratch, stack: &mut Vec<Flow>, budget: u32) -> bool {
    let mut hit_budget = false;
    while let Some(Flow { pos, dist, steps }) = stack.pop() {
        if steps >= budget {
            hit_budget = true;
            continue;
        }
        if dist < MIN_SPREAD || pos.y == 0 {
            continue;
        }

        let below = pos.offset(0, -1, 0);
        let under = s.grid.get(below);
        let falls = fillable(under) || (under.is_liquid() && s.dist(below) < LIQUID_FULL);
        if falls {
            // Downward flow refills to a full source.
            if below.is_interior() {
                s.write(below, LIQUID_FULL);
                stack.push(Flow {
                    pos: below,
                    dist: LIQUID_FULL,
                    steps: steps + 1,
                });
            }
            continue;
        }
        if under.is_liquid() {
            continue;
        }

        let next = dist - 1;
        if next < MIN_SPREAD {
            continue;
        }
        for face in loam_blocks::Face::LATERAL {
            let (dx, _, dz) = face.delta();
            let to = pos.offset(dx, 0, dz);
            if !to.is_interior() {
                continue;
            }
            let there = s.grid.get(to);
            let open = fillable(there) || (there.is_liquid() && s.dist(to) < next);
            if !open {
                continue;
            }
            s.write(to, next);
            stack.push(Flow {
                pos: to,
                dist: next,
                steps: steps + 1,
            });
        }
    }
    hit_budget
}

/// Chunks that must take a liquid pass and rebuild after `coord`'s pass
/// wrote into edge cells.
pub fn dirty_neighbors(coord: ChunkCoord, flags: BorderFlags) -> impl Iterator<Item = ChunkCoord> {
    flags.offsets().map(move |(dx, dz)| coord.offset(dx, dz))
}
