use loam_geom::Aabb;
use loam_world::ChunkCoord;

use crate::mesh_build::MeshBuild;

/// Finished CPU-side geometry for one chunk. Positions are chunk-local with
/// the interior starting at the origin; `bbox` is in world space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMeshCPU {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub opaque: MeshBuild,
    pub liquid: MeshBuild,
    pub plant: MeshBuild,
}

impl ChunkMeshCPU {
    pub fn triangle_count(&self) -> usize {
        self.opaque.triangle_count() + self.liquid.triangle_count() + self.plant.triangle_count()
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }
}
