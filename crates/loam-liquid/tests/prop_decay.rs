use loam_blocks::{BlockType, Face, LIQUID_FULL, ParamKind};
use loam_chunk::{BlockParams, ChunkGrid};
use loam_liquid::{DEFAULT_STEP_BUDGET, MIN_SPREAD, simulate};
use loam_world::{CHUNK_HEIGHT, ChunkCoord, GRID_X, GRID_Z, LocalPos};
use proptest::prelude::*;

fn world() -> impl Strategy<Value = (Vec<(i32, i32, i32)>, Vec<(i32, i32, i32)>)> {
    let cell = (1i32..=16, 2i32..12, 1i32..=16);
    (
        prop::collection::vec(cell.clone(), 0..30),
        prop::collection::vec(cell, 1..4),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn spread_distances_decay_from_their_parent((solids, sources) in world()) {
        let mut grid = ChunkGrid::new(ChunkCoord::new(0, 0));
        for z in 0..GRID_Z {
            for x in 0..GRID_X {
                grid.set(LocalPos::new(x, 1, z), BlockType::Stone);
            }
        }
        for (x, y, z) in solids {
            grid.set(LocalPos::new(x, y, z), BlockType::Stone);
        }
        let mut params = BlockParams::new();
        for (x, y, z) in sources {
            let p = LocalPos::new(x, y, z);
            grid.set(p, BlockType::Water);
            params.set(p, ParamKind::LiquidSource, LIQUID_FULL);
        }

        let pass = simulate(&grid, &params, DEFAULT_STEP_BUDGET);
        for z in 1..=16 {
            for y in 0..CHUNK_HEIGHT {
                for x in 1..=16 {
                    let p = LocalPos::new(x, y, z);
                    if !pass.grid.get(p).is_liquid() {
                        continue;
                    }
                    let d = pass.params.get_or_default(p, ParamKind::LiquidSource);
                    prop_assert!(d <= LIQUID_FULL);
                    if d == LIQUID_FULL {
                        continue;
                    }
                    prop_assert!(d >= MIN_SPREAD);
                    let parent = Face::LATERAL.iter().any(|f| {
                        let (dx, _, dz) = f.delta();
                        let q = p.offset(dx, 0, dz);
                        pass.grid.get(q).is_liquid()
                            && pass.params.get_or_default(q, ParamKind::LiquidSource) > d
                    });
                    prop_assert!(parent, "no higher neighbor for {:?} at {}", p, d);
                }
            }
        }
    }
}
