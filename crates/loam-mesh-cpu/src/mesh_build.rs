use loam_blocks::TileRef;
use loam_geom::Vec3;

use crate::ATLAS_TILES;

/// One geometry stream: positions, normals and UVs per vertex, RGBA tint per
/// vertex, and a triangle index list.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse across builds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
        self.col.clear();
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends a quad as two triangles. `uvs` are tile-local in `[0, 1]` and
    /// are mapped into `tile` of the atlas. Corners are reordered if needed so
    /// the triangles face along `n`. With `flip` the quad is split along the
    /// `1-3` diagonal instead of `0-2`.
    pub fn add_quad_uv(
        &mut self,
        corners: [Vec3; 4],
        n: Vec3,
        mut uvs: [(f32, f32); 4],
        tile: TileRef,
        flip: bool,
        rgba: [u8; 4],
    ) {
        let base = self.vertex_count() as u32;
        let mut vs = corners;
        let facing = (vs[1] - vs[0]).cross(vs[2] - vs[0]);
        if facing.dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        let (u0, v0) = (tile.col as f32, tile.row as f32);
        for i in 0..4 {
            self.pos.extend_from_slice(&[vs[i].x, vs[i].y, vs[i].z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[
                (u0 + uvs[i].0) / ATLAS_TILES,
                (v0 + uvs[i].1) / ATLAS_TILES,
            ]);
            self.col.extend_from_slice(&rgba);
        }
        if flip {
            self.idx
                .extend_from_slice(&[base, base + 1, base + 3, base + 1, base + 2, base + 3]);
        } else {
            self.idx
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> [Vec3; 4] {
        [
            Vec3::new(0., 1., 0.),
            Vec3::new(0., 1., 1.),
            Vec3::new(1., 1., 1.),
            Vec3::new(1., 1., 0.),
        ]
    }

    #[test]
    fn flip_changes_split_diagonal_only() {
        let uv = [(0., 0.); 4];
        let mut a = MeshBuild::default();
        a.add_quad_uv(unit_quad(), Vec3::UP, uv, TileRef::new(0, 0), false, [255; 4]);
        let mut b = MeshBuild::default();
        b.add_quad_uv(unit_quad(), Vec3::UP, uv, TileRef::new(0, 0), true, [255; 4]);
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.idx, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(b.idx, vec![0, 1, 3, 1, 2, 3]);
    }

    #[test]
    fn winding_is_corrected_toward_normal() {
        let mut m = MeshBuild::default();
        m.add_quad_uv(unit_quad(), -Vec3::UP, [(0., 0.); 4], TileRef::new(0, 0), false, [255; 4]);
        let p = |i: usize| Vec3::new(m.pos[i * 3], m.pos[i * 3 + 1], m.pos[i * 3 + 2]);
        let (a, b, c) = (p(m.idx[0] as usize), p(m.idx[1] as usize), p(m.idx[2] as usize));
        assert!((b - a).cross(c - a).dot(-Vec3::UP) > 0.0);
    }

    #[test]
    fn uvs_map_into_the_tile() {
        let mut m = MeshBuild::default();
        let uv = [(0., 0.), (0., 1.), (1., 1.), (1., 0.)];
        m.add_quad_uv(unit_quad(), Vec3::UP, uv, TileRef::new(2, 3), false, [255; 4]);
        assert_eq!(&m.uv[0..2], &[2.0 / 16.0, 3.0 / 16.0]);
        assert_eq!(&m.uv[4..6], &[3.0 / 16.0, 4.0 / 16.0]);
        assert_eq!(m.clone().triangle_count(), 2);
        m.clear_keep_capacity();
        assert!(m.is_empty() && m.pos.capacity() > 0);
    }
}
