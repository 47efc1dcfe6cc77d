//! Border mirroring between adjacent grids.

use loam_blocks::ParamKind;
use loam_world::{CHUNK_HEIGHT, CHUNK_WIDTH, GRID_X, LocalPos};

use crate::{BlockParams, ChunkGrid};

#[inline]
fn border_span(d: i32) -> std::ops::RangeInclusive<i32> {
    match d {
        1 => GRID_X - 1..=GRID_X - 1,
        -1 => 0..=0,
        _ => 1..=CHUNK_WIDTH,
    }
}

/// Copies one cell (block and parameters) from `src` into `dst`.
pub fn mirror_cell(
    dst: &mut ChunkGrid,
    dst_params: &mut BlockParams,
    dst_pos: LocalPos,
    src: &ChunkGrid,
    src_params: &BlockParams,
    src_pos: LocalPos,
) {
    dst.set(dst_pos, src.get(src_pos));
    dst_params.copy_cell(dst_pos, src_params, src_pos);
}

/// Refreshes the part of `dst`'s border that mirrors the neighbor `src` at
/// chunk offset `(dx, dz)`. Returns whether any block or parameter changed.
pub fn copy_border_from(
    dst: &mut ChunkGrid,
    dst_params: &mut BlockParams,
    src: &ChunkGrid,
    src_params: &BlockParams,
    (dx, dz): (i32, i32),
) -> bool {
    if dx == 0 && dz == 0 {
        return false;
    }
    let mut changed = false;
    for z in border_span(dz) {
        for x in border_span(dx) {
            let (sx, sz) = (x - dx * CHUNK_WIDTH, z - dz * CHUNK_WIDTH);
            dst.set_biome(x, z, src.biome_at(sx, sz));
            for y in 0..CHUNK_HEIGHT {
                let d = LocalPos::new(x, y, z);
                let s = LocalPos::new(sx, y, sz);
                if dst.get(d) != src.get(s)
                    || ParamKind::ALL
                        .iter()
                        .any(|k| dst_params.get(d, *k) != src_params.get(s, *k))
                {
                    changed = true;
                }
                mirror_cell(dst, dst_params, d, src, src_params, s);
            }
        }
    }
    changed
}
