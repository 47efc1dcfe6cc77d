use loam_blocks::{BlockType, LIQUID_FULL, ParamKind};
use loam_chunk::{BlockParams, ChunkGrid};
use loam_liquid::{DEFAULT_STEP_BUDGET, simulate};
use loam_world::{CHUNK_WIDTH, ChunkCoord, GRID_X, GRID_Z, LocalPos};

fn floor_at(y: i32) -> ChunkGrid {
    let mut g = ChunkGrid::new(ChunkCoord::new(0, 0));
    for z in 0..GRID_Z {
        for x in 0..GRID_X {
            g.set(LocalPos::new(x, y, z), BlockType::Stone);
        }
    }
    g
}

fn run_until_stable(mut grid: ChunkGrid, mut params: BlockParams) -> (ChunkGrid, BlockParams) {
    for _ in 0..8 {
        let pass = simulate(&grid, &params, DEFAULT_STEP_BUDGET);
        let done = !pass.changed();
        grid = pass.grid;
        params = pass.params;
        if done {
            break;
        }
    }
    (grid, params)
}

#[test]
fn falling_source_fills_column_then_spreads_in_a_ring() {
    let mut grid = floor_at(14);
    let mut params = BlockParams::new();
    let src = LocalPos::new(8, 20, 8);
    grid.set(src, BlockType::Water);
    params.set(src, ParamKind::LiquidSource, LIQUID_FULL);

    let (grid, params) = run_until_stable(grid, params);

    for y in 15..20 {
        let p = LocalPos::new(8, y, 8);
        assert_eq!(grid.get(p), BlockType::Water);
        assert_eq!(params.get(p, ParamKind::LiquidSource), Some(LIQUID_FULL));
    }
    // The source itself sits on water and does not spread sideways.
    assert_eq!(grid.get(LocalPos::new(9, 20, 8)), BlockType::Air);

    for z in 1..=CHUNK_WIDTH {
        for x in 1..=CHUNK_WIDTH {
            let k = (x - 8).abs() + (z - 8).abs();
            let p = LocalPos::new(x, 15, z);
            if k == 0 {
                continue;
            }
            if k <= 6 {
                assert_eq!(grid.get(p), BlockType::Water, "at {x},{z}");
                assert_eq!(params.get(p, ParamKind::LiquidSource), Some(8 - k as u8));
            } else {
                assert_eq!(grid.get(p), BlockType::Air, "at {x},{z}");
            }
        }
    }
}

#[test]
fn pass_does_not_touch_the_input() {
    let mut grid = floor_at(3);
    grid.set(LocalPos::new(5, 4, 5), BlockType::Water);
    let before = grid.clone();
    let pass = simulate(&grid, &BlockParams::new(), DEFAULT_STEP_BUDGET);
    assert!(pass.changed());
    assert_eq!(grid, before);
}

#[test]
fn converged_water_is_stable() {
    let mut grid = floor_at(3);
    grid.set(LocalPos::new(5, 4, 5), BlockType::Water);
    let (grid, params) = run_until_stable(grid, BlockParams::new());
    let again = simulate(&grid, &params, DEFAULT_STEP_BUDGET);
    assert_eq!(again.writes, 0);
    assert!(!again.borders.any());
}

#[test]
fn step_budget_bounds_a_fall() {
    let mut grid = floor_at(1);
    let mut params = BlockParams::new();
    grid.set(LocalPos::new(8, 100, 8), BlockType::Water);
    params.set(LocalPos::new(8, 100, 8), ParamKind::LiquidSource, LIQUID_FULL);
    let pass = simulate(&grid, &params, 3);
    assert!(pass.budget_hits > 0);
    // Three hops from the source before the budget stops that branch.
    for y in 97..100 {
        assert_eq!(pass.grid.get(LocalPos::new(8, y, 8)), BlockType::Water);
    }
    // The lowest write is itself visited as a source later in the same pass.
    assert!(pass.grid.get(LocalPos::new(8, 96, 8)) == BlockType::Water);
}

#[test]
fn plants_are_washed_out_and_stone_blocks_flow() {
    let mut grid = floor_at(3);
    let src = LocalPos::new(8, 4, 8);
    grid.set(src, BlockType::Water);
    grid.set(LocalPos::new(9, 4, 8), BlockType::TallGrass);
    grid.set(LocalPos::new(7, 4, 8), BlockType::Stone);
    let mut params = BlockParams::new();
    params.set(LocalPos::new(9, 4, 8), ParamKind::PlantVariant, 2);
    let pass = simulate(&grid, &params, DEFAULT_STEP_BUDGET);
    assert_eq!(pass.grid.get(LocalPos::new(9, 4, 8)), BlockType::Water);
    assert_eq!(pass.params.get(LocalPos::new(9, 4, 8), ParamKind::PlantVariant), None);
    assert_eq!(pass.grid.get(LocalPos::new(7, 4, 8)), BlockType::Stone);
}

#[test]
fn lower_distance_water_is_raised() {
    let mut grid = floor_at(3);
    let mut params = BlockParams::new();
    grid.set(LocalPos::new(8, 4, 8), BlockType::Water);
    grid.set(LocalPos::new(9, 4, 8), BlockType::Water);
    params.set(LocalPos::new(9, 4, 8), ParamKind::LiquidSource, 3);
    let pass = simulate(&grid, &params, DEFAULT_STEP_BUDGET);
    assert_eq!(pass.params.get(LocalPos::new(9, 4, 8), ParamKind::LiquidSource), Some(7));
}

#[test]
fn edge_writes_flag_neighbors_and_border_is_never_written() {
    let mut grid = floor_at(3);
    grid.set(LocalPos::new(CHUNK_WIDTH - 1, 4, 8), BlockType::Water);
    let pass = simulate(&grid, &BlockParams::new(), DEFAULT_STEP_BUDGET);
    assert_eq!(pass.grid.get(LocalPos::new(CHUNK_WIDTH, 4, 8)), BlockType::Water);
    assert_eq!(pass.grid.get(LocalPos::new(CHUNK_WIDTH + 1, 4, 8)), BlockType::Air);
    assert!(pass.borders.contains((1, 0)));
    assert!(!pass.borders.contains((-1, 0)));
    let dirty: Vec<_> = loam_liquid::dirty_neighbors(ChunkCoord::new(2, 2), pass.borders).collect();
    assert!(dirty.contains(&ChunkCoord::new(3, 2)));
}

#[test]
fn border_water_feeds_the_interior() {
    let mut grid = floor_at(3);
    grid.set(LocalPos::new(0, 4, 8), BlockType::Water);
    let pass = simulate(&grid, &BlockParams::new(), DEFAULT_STEP_BUDGET);
    let p = LocalPos::new(1, 4, 8);
    assert_eq!(pass.grid.get(p), BlockType::Water);
    assert_eq!(pass.params.get(p, ParamKind::LiquidSource), Some(7));
}
