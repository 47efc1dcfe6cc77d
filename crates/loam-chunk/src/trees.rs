use loam_blocks::{BlockType, ParamKind, can_support_tree};
use loam_world::{CHUNK_HEIGHT, CHUNK_WIDTH, ChunkCoord, ColumnSample, ColumnSampler, GRID_X, LocalPos, TreeKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{BlockParams, ChunkGrid};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreePlacement {
    /// Trunk column (interior local coordinates).
    pub x: i32,
    pub z: i32,
    /// Surface cell the trunk stands on.
    pub base: i32,
    pub trunk_height: i32,
    pub kind: TreeKind,
}

#[inline]
fn replaceable(b: BlockType) -> bool {
    b.is_air() || matches!(b, BlockType::TallGrass | BlockType::Flower | BlockType::DeadBush)
}

/// Tree pass for one chunk. Candidates are drawn from a random stream seeded
/// by `seed`, and kept far enough from the edge that canopies never reach an
/// edge column, so neighbors' mirrored borders stay valid.
///
/// `columns` holds one sample per grid column, indexed `x + GRID_X * z`.
pub fn place_trees(
    grid: &mut ChunkGrid,
    params: &mut BlockParams,
    sampler: &ColumnSampler<'_>,
    columns: &[ColumnSample],
    coord: ChunkCoord,
    seed: u64,
) -> Vec<TreePlacement> {
    let mut placed = Vec::new();
    if !sampler.tree_gate(coord) {
        return placed;
    }
    let trees = &sampler.config().trees;
    let margin = trees.leaf_radius.max(1) + 1;
    let (lo, hi) = (1 + margin, CHUNK_WIDTH - margin);
    if lo > hi {
        return placed;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let min_d2 = trees.min_distance * trees.min_distance;
    let (tmin, tmax) = (trees.trunk_min.max(1), trees.trunk_max.max(trees.trunk_min.max(1)));

    for _ in 0..trees.attempts {
        let x = rng.gen_range(lo..=hi);
        let z = rng.gen_range(lo..=hi);
        let chance: f32 = rng.r#gen();
        let trunk_height = rng.gen_range(tmin..=tmax);

        let col = &columns[(x + GRID_X * z) as usize];
        let biome = sampler.biome(col.biome);
        let Some(kind) = biome.tree.filter(|_| biome.allows_trees()) else {
            continue;
        };
        if chance >= biome.tree_chance {
            continue;
        }
        if placed
            .iter()
            .any(|t: &TreePlacement| (t.x - x).pow(2) + (t.z - z).pow(2) < min_d2)
        {
            continue;
        }
        let base = col.base_height;
        if !can_support_tree(grid.get(LocalPos::new(x, base, z))) {
            continue;
        }
        let top = base + trunk_height;
        if top + 2 >= CHUNK_HEIGHT {
            continue;
        }
        if !(base + 1..=top + 1).all(|y| replaceable(grid.get(LocalPos::new(x, y, z)))) {
            continue;
        }

        let tree = TreePlacement {
            x,
            z,
            base,
            trunk_height,
            kind,
        };
        write_tree(grid, params, &tree, trees.leaf_radius.max(1), &mut rng);
        placed.push(tree);
    }
    placed
}

fn write_tree(
    grid: &mut ChunkGrid,
    params: &mut BlockParams,
    tree: &TreePlacement,
    radius: i32,
    rng: &mut ChaCha8Rng,
) {
    let top = tree.base + tree.trunk_height;
    let leaves = tree.kind.leaves();
    // Shells from two below the trunk top up to a cap above it.
    let shells = [(top - 2, radius), (top - 1, radius), (top, (radius - 1).max(1)), (top + 1, 1)];
    for (y, r) in shells {
        if y <= tree.base {
            continue;
        }
        for dz in -r..=r {
            for dx in -r..=r {
                let corner = dx.abs() == r && dz.abs() == r;
                if corner && ((r == 1 && y == top + 1) || rng.gen_bool(0.5)) {
                    continue;
                }
                let at = LocalPos::new(tree.x + dx, y, tree.z + dz);
                if replaceable(grid.get(at)) {
                    grid.set(at, leaves);
                    params.remove_all(at);
                }
            }
        }
    }
    for y in tree.base + 1..=top {
        let at = LocalPos::new(tree.x, y, tree.z);
        grid.set(at, tree.kind.log());
        params.remove(at, ParamKind::PlantVariant);
    }
    if tree.kind != TreeKind::Spruce {
        return;
    }
    // Spruce gets a pointed tip.
    let tip = LocalPos::new(tree.x, top + 2, tree.z);
    if replaceable(grid.get(tip)) {
        grid.set(tip, leaves);
    }
}
