use loam_blocks::{BlockState, BlockType, Face, LIQUID_FULL, ParamKind, TileRef, describe, state_at};
use loam_chunk::{BlockParams, ChunkGrid};
use loam_geom::Vec3;
use loam_world::LocalPos;

use crate::LIQUID_SURFACE;
use crate::face::{face_corners, local_uv, normal, rotate_uv};
use crate::mesh_build::MeshBuild;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const WATER_RGBA: [u8; 4] = [255, 255, 255, 190];

#[inline]
fn neighbor(grid: &ChunkGrid, pos: LocalPos, face: Face) -> Option<(LocalPos, BlockType)> {
    let (dx, dy, dz) = face.delta();
    let at = pos.offset(dx, dy, dz);
    grid.get_checked(at).map(|b| (at, b))
}

/// A face of a solid-shaped block shows unless the block across it is solid
/// on the touching side. Above the world is open; below the floor is closed.
#[inline]
pub(crate) fn solid_face_visible(grid: &ChunkGrid, pos: LocalPos, face: Face) -> bool {
    match neighbor(grid, pos, face) {
        Some((_, nb)) => state_at(nb, face.opposite()) != BlockState::Solid,
        None => face == Face::PosY,
    }
}

/// Liquid faces show against transparent or destroyable cells, and against
/// liquid holding a lower source distance so slopes render.
#[inline]
pub(crate) fn liquid_face_visible(
    grid: &ChunkGrid,
    params: &BlockParams,
    pos: LocalPos,
    face: Face,
    dist: u8,
) -> bool {
    let Some((at, nb)) = neighbor(grid, pos, face) else {
        return face == Face::PosY;
    };
    if nb.is_liquid() {
        return !matches!(face, Face::PosY | Face::NegY)
            && params.get_or_default(at, ParamKind::LiquidSource) < dist;
    }
    matches!(
        state_at(nb, face.opposite()),
        BlockState::Transparent | BlockState::LiquidDestroyable
    )
}

fn tint(block: BlockType, face: Face, biome: [u8; 3]) -> [u8; 4] {
    let tinted = match block {
        BlockType::Grass => face == Face::PosY,
        BlockType::OakLeaves
        | BlockType::BirchLeaves
        | BlockType::SpruceLeaves
        | BlockType::TallGrass => true,
        _ => false,
    };
    if tinted {
        [biome[0], biome[1], biome[2], 255]
    } else {
        WHITE
    }
}

#[allow(clippy::too_many_arguments)]
fn quad_with_height(
    mb: &mut MeshBuild,
    origin: Vec3,
    face: Face,
    tile: TileRef,
    height: impl Fn(Vec3) -> f32,
    uv_turns: u8,
    flip: bool,
    rgba: [u8; 4],
) {
    let mut corners = face_corners(face);
    let mut uvs = [(0.0, 0.0); 4];
    for (c, uv) in corners.iter_mut().zip(uvs.iter_mut()) {
        if c.y > 0.0 {
            c.y = height(*c);
        }
        *uv = rotate_uv(local_uv(face, *c), uv_turns);
        *c += origin;
    }
    mb.add_quad_uv(corners, normal(face), uvs, tile, flip, rgba);
}

pub(crate) fn emit_cube(
    mb: &mut MeshBuild,
    grid: &ChunkGrid,
    pos: LocalPos,
    origin: Vec3,
    block: BlockType,
    biome: [u8; 3],
) {
    let info = describe(block);
    for face in Face::ALL {
        if !solid_face_visible(grid, pos, face) {
            continue;
        }
        let tile = info.textures.for_face(face);
        quad_with_height(mb, origin, face, tile, |_| 1.0, 0, false, tint(block, face, biome));
    }
}

/// Half blocks fill the lower half of the cell. The top is always emitted;
/// other faces follow the normal test. `rotation` is a quarter-turn count
/// (taken modulo 4): it turns the top and bottom textures and picks which
/// side tile each lateral face shows. Geometry does not change.
pub(crate) fn emit_half(
    mb: &mut MeshBuild,
    grid: &ChunkGrid,
    pos: LocalPos,
    origin: Vec3,
    block: BlockType,
    rotation: u8,
    biome: [u8; 3],
) {
    let info = describe(block);
    let turns = rotation % 4;
    for face in Face::ALL {
        if face != Face::PosY && !solid_face_visible(grid, pos, face) {
            continue;
        }
        let tile = info.textures.for_face(face.rotate_y(4 - turns));
        let uv_turns = if matches!(face, Face::PosY | Face::NegY) { turns } else { 0 };
        quad_with_height(mb, origin, face, tile, |_| 0.5, uv_turns, false, tint(block, face, biome));
    }
}

/// Surface height of the liquid at `pos` inside its cell, or `None` if the
/// cell holds no liquid. Liquid under liquid fills its cell.
pub(crate) fn liquid_height(grid: &ChunkGrid, params: &BlockParams, pos: LocalPos) -> Option<f32> {
    if !grid.get_checked(pos)?.is_liquid() {
        return None;
    }
    if grid
        .get_checked(pos.offset(0, 1, 0))
        .is_some_and(|b| b.is_liquid())
    {
        return Some(1.0);
    }
    let d = params
        .get_or_default(pos, ParamKind::LiquidSource)
        .min(LIQUID_FULL);
    Some(d as f32 / LIQUID_FULL as f32 * LIQUID_SURFACE)
}

/// Height of the top corner at `(cx, cz)` (each 0 or 1): the mean over the
/// liquid cells sharing that vertical edge.
fn corner_height(grid: &ChunkGrid, params: &BlockParams, pos: LocalPos, cx: i32, cz: i32) -> f32 {
    let mut sum = 0.0;
    let mut n = 0;
    for dz in [cz - 1, cz] {
        for dx in [cx - 1, cx] {
            if let Some(h) = liquid_height(grid, params, pos.offset(dx, 0, dz)) {
                if h >= 1.0 {
                    return 1.0;
                }
                sum += h;
                n += 1;
            }
        }
    }
    if n == 0 { 0.0 } else { sum / n as f32 }
}

pub(crate) fn emit_liquid(
    mb: &mut MeshBuild,
    grid: &ChunkGrid,
    params: &BlockParams,
    pos: LocalPos,
    origin: Vec3,
) {
    let block = grid.get(pos);
    let info = describe(block);
    let dist = params.get_or_default(pos, ParamKind::LiquidSource);
    let own = liquid_height(grid, params, pos).unwrap_or(LIQUID_SURFACE);
    let heights = [
        [corner_height(grid, params, pos, 0, 0), corner_height(grid, params, pos, 0, 1)],
        [corner_height(grid, params, pos, 1, 0), corner_height(grid, params, pos, 1, 1)],
    ];
    let at = |c: Vec3| heights[c.x as usize][c.z as usize];

    for face in Face::ALL {
        if !liquid_face_visible(grid, params, pos, face, dist) {
            continue;
        }
        let tile = info.textures.for_face(face);
        let flip = match face {
            Face::PosY => {
                let c = face_corners(face);
                at(c[1]) + at(c[3]) > at(c[0]) + at(c[2])
            }
            Face::NegY => false,
            _ => {
                let (dx, _, dz) = face.delta();
                let across = liquid_height(grid, params, pos.offset(dx, 0, dz)).unwrap_or(0.0);
                across > own
            }
        };
        quad_with_height(mb, origin, face, tile, at, 0, flip, WATER_RGBA);
    }
}

/// Two crossed double-sided quads. Never culled.
pub(crate) fn emit_cross(mb: &mut MeshBuild, origin: Vec3, block: BlockType, variant: u8, biome: [u8; 3]) {
    let info = describe(block);
    let base = info.textures.top;
    let step = variant.min(info.variants.saturating_sub(1));
    let tile = TileRef::new(base.col.saturating_add(step), base.row);
    let rgba = tint(block, Face::PosY, biome);
    let v = Vec3::new;
    let diagonals = [
        ([v(0., 0., 0.), v(1., 0., 1.), v(1., 1., 1.), v(0., 1., 0.)], v(1., 0., -1.)),
        ([v(1., 0., 0.), v(0., 0., 1.), v(0., 1., 1.), v(1., 1., 0.)], v(1., 0., 1.)),
    ];
    let uvs = [(0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)];
    for (corners, n) in diagonals {
        let n = n * std::f32::consts::FRAC_1_SQRT_2;
        let placed = corners.map(|c| c + origin);
        mb.add_quad_uv(placed, n, uvs, tile, false, rgba);
        mb.add_quad_uv(placed, -n, uvs, tile, false, rgba);
    }
}

#[cfg(test)]
mod tests {
    use loam_world::ChunkCoord;

    use super::*;

    fn floor() -> ChunkGrid {
        let mut g = ChunkGrid::new(ChunkCoord::new(0, 0));
        for z in 0..18 {
            for x in 0..18 {
                g.set(LocalPos::new(x, 3, z), BlockType::Stone);
            }
        }
        g
    }

    #[test]
    fn top_split_follows_the_higher_diagonal() {
        let mut g = floor();
        let mut p = BlockParams::new();
        let a = LocalPos::new(8, 4, 8);
        g.set(a, BlockType::Water);
        p.set(a, ParamKind::LiquidSource, 4);
        // Raises only corner (1, 0) of `a`.
        g.set(LocalPos::new(9, 4, 7), BlockType::Water);

        let mut mb = MeshBuild::default();
        emit_liquid(&mut mb, &g, &p, a, Vec3::ZERO);
        assert_eq!(&mb.idx[0..6], &[0, 1, 3, 1, 2, 3]);

        g.set(LocalPos::new(9, 4, 7), BlockType::Air);
        let mut mb = MeshBuild::default();
        emit_liquid(&mut mb, &g, &p, a, Vec3::ZERO);
        assert_eq!(&mb.idx[0..6], &[0, 1, 2, 0, 2, 3]);
    }

    /// Index pattern (relative to the quad's first vertex) of the quad facing `n`.
    fn split_of(mb: &MeshBuild, n: [f32; 3]) -> Vec<u32> {
        let quad = mb
            .norm
            .chunks(12)
            .position(|q| q[0..3] == n[..])
            .unwrap();
        let base = quad as u32 * 4;
        mb.idx[quad * 6..quad * 6 + 6].iter().map(|i| i - base).collect()
    }

    #[test]
    fn side_split_flips_toward_a_taller_neighbor() {
        let mut g = floor();
        let mut p = BlockParams::new();
        let a = LocalPos::new(8, 4, 8);
        let lower = LocalPos::new(7, 4, 8);
        let taller = LocalPos::new(9, 4, 8);
        g.set(a, BlockType::Water);
        g.set(lower, BlockType::Water);
        p.set(lower, ParamKind::LiquidSource, 5);
        // Water stacked on `taller` fills its cell to the top.
        g.set(taller, BlockType::Water);
        p.set(taller, ParamKind::LiquidSource, 5);
        g.set(taller.offset(0, 1, 0), BlockType::Water);

        let mut mb = MeshBuild::default();
        emit_liquid(&mut mb, &g, &p, a, Vec3::ZERO);
        assert_eq!(split_of(&mb, [-1.0, 0.0, 0.0]), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(split_of(&mb, [1.0, 0.0, 0.0]), vec![0, 1, 3, 1, 2, 3]);
    }

    #[test]
    fn lone_source_sits_below_the_cell_top() {
        let mut g = floor();
        let a = LocalPos::new(8, 4, 8);
        g.set(a, BlockType::Water);
        let mut mb = MeshBuild::default();
        emit_liquid(&mut mb, &g, &BlockParams::new(), a, Vec3::ZERO);
        // Top plus four sides; the stone floor hides the bottom.
        assert_eq!(mb.triangle_count(), 10);
        let max_y = mb.pos.chunks(3).map(|p| p[1]).fold(f32::MIN, f32::max);
        assert!((max_y - LIQUID_SURFACE).abs() < 1e-6);
    }

    #[test]
    fn flowing_neighbor_exposes_only_the_higher_side() {
        let mut g = floor();
        let mut p = BlockParams::new();
        let hi = LocalPos::new(8, 4, 8);
        let lo = LocalPos::new(9, 4, 8);
        g.set(hi, BlockType::Water);
        g.set(lo, BlockType::Water);
        p.set(lo, ParamKind::LiquidSource, 5);
        assert!(liquid_face_visible(&g, &p, hi, Face::PosX, 8));
        assert!(!liquid_face_visible(&g, &p, lo, Face::NegX, 5));
    }
}
