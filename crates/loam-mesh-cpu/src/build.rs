use std::time::Instant;

use loam_blocks::{BlockShape, ParamKind, describe};
use loam_chunk::{BlockParams, ChunkGrid};
use loam_geom::{Aabb, Vec3};
use loam_world::{CHUNK_HEIGHT, CHUNK_WIDTH, LocalPos};

use crate::chunk::ChunkMeshCPU;
use crate::emit::{emit_cross, emit_cube, emit_half, emit_liquid};
use crate::mesh_build::MeshBuild;

const DEFAULT_TINT: [u8; 3] = [255, 255, 255];

/// Builds all three streams for one chunk. Pure in its inputs: the same grid
/// and parameters always give identical buffers. `tints` is indexed by the
/// grid's biome ids.
pub fn build_chunk_mesh(grid: &ChunkGrid, params: &BlockParams, tints: &[[u8; 3]]) -> ChunkMeshCPU {
    let t0 = Instant::now();
    let mut out = ChunkMeshCPU {
        coord: grid.coord,
        ..Default::default()
    };
    for z in 1..=CHUNK_WIDTH {
        for y in 0..CHUNK_HEIGHT {
            for x in 1..=CHUNK_WIDTH {
                let block = grid.get_xyz(x, y, z);
                if block.is_air() {
                    continue;
                }
                let pos = LocalPos::new(x, y, z);
                let origin = Vec3::new((x - 1) as f32, y as f32, (z - 1) as f32);
                let biome = tints
                    .get(grid.biome_at(x, z) as usize)
                    .copied()
                    .unwrap_or(DEFAULT_TINT);
                match describe(block).shape {
                    BlockShape::Cube => emit_cube(&mut out.opaque, grid, pos, origin, block, biome),
                    BlockShape::HalfBlock => {
                        let rot = params.get_or_default(pos, ParamKind::Rotation);
                        emit_half(&mut out.opaque, grid, pos, origin, block, rot, biome);
                    }
                    BlockShape::Liquid => emit_liquid(&mut out.liquid, grid, params, pos, origin),
                    BlockShape::CrossPlant => {
                        let variant = params.get_or_default(pos, ParamKind::PlantVariant);
                        emit_cross(&mut out.plant, origin, block, variant, biome);
                    }
                }
            }
        }
    }

    let offset = Vec3::new(
        (grid.coord.cx * CHUNK_WIDTH) as f32,
        0.0,
        (grid.coord.cz * CHUNK_WIDTH) as f32,
    );
    out.bbox = [&out.opaque, &out.liquid, &out.plant]
        .into_iter()
        .fold(Aabb::EMPTY, |acc, mb| acc.union(bounds(mb, offset)));

    log::trace!(
        target: "runtime",
        "mesh ({}, {}) opaque={} liquid={} plant={} tris in {:?}",
        grid.coord.cx,
        grid.coord.cz,
        out.opaque.triangle_count(),
        out.liquid.triangle_count(),
        out.plant.triangle_count(),
        t0.elapsed()
    );
    out
}

fn bounds(mb: &MeshBuild, offset: Vec3) -> Aabb {
    let mut bb = Aabb::EMPTY;
    for p in mb.pos.chunks_exact(3) {
        bb.include(Vec3::new(p[0], p[1], p[2]) + offset);
    }
    bb
}
