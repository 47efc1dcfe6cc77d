use loam_blocks::{BlockType, LIQUID_FULL, ParamKind};
use loam_chunk::{generate_chunk, place_trees};
use loam_world::{
    CHUNK_HEIGHT, CHUNK_WIDTH, ChunkCoord, ColumnSampler, GRID_X, GRID_Z, LocalPos, WorldGen,
    WorldGenConfig, local_to_world,
};

fn config(src: &str) -> WorldGenConfig {
    toml::from_str(src).unwrap()
}

fn grove() -> WorldGen {
    WorldGen::new(
        9,
        config(
            r#"
            [height]
            base = 70.0
            [caves]
            enable = false
            [trees]
            gate_threshold = -2.0
            [[biomes]]
            name = "grove"
            height = 0.5
            temperature = 0.5
            moisture = 0.5
            surface = "grass"
            top = "dirt"
            tree = "oak"
            tree_chance = 1.0
            "#,
        ),
    )
}

fn barren() -> WorldGen {
    WorldGen::new(
        9,
        config(
            r#"
            [height]
            base = 70.0
            [trees]
            gate_threshold = -2.0
            [[biomes]]
            name = "dunes"
            height = 0.5
            temperature = 0.9
            moisture = 0.1
            surface = "grass"
            top = "sand"
            "#,
        ),
    )
}

#[test]
fn same_inputs_produce_identical_grids() {
    let wg = WorldGen::new(1234, WorldGenConfig::default());
    for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-3, 7)] {
        let a = generate_chunk(&wg, coord);
        let b = generate_chunk(&wg, coord);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.params, b.params);
        assert_eq!(a.trees, b.trees);
    }
}

#[test]
fn different_seeds_differ() {
    let a = generate_chunk(&WorldGen::new(1, WorldGenConfig::default()), ChunkCoord::new(0, 0));
    let b = generate_chunk(&WorldGen::new(2, WorldGenConfig::default()), ChunkCoord::new(0, 0));
    assert_ne!(a.grid.blocks, b.grid.blocks);
}

#[test]
fn generated_borders_match_neighbor_interiors() {
    let wg = grove();
    let c = ChunkCoord::new(0, 0);
    let here = generate_chunk(&wg, c);
    let east = generate_chunk(&wg, c.offset(1, 0));
    let south = generate_chunk(&wg, c.offset(0, 1));
    for y in 0..CHUNK_HEIGHT {
        for z in 1..=CHUNK_WIDTH {
            assert_eq!(
                here.grid.get(LocalPos::new(GRID_X - 1, y, z)),
                east.grid.get(LocalPos::new(1, y, z))
            );
        }
        for x in 1..=CHUNK_WIDTH {
            assert_eq!(
                here.grid.get(LocalPos::new(x, y, GRID_Z - 1)),
                south.grid.get(LocalPos::new(x, y, 1))
            );
        }
    }
}

#[test]
fn floor_is_bedrock_everywhere() {
    let g = generate_chunk(&WorldGen::default(), ChunkCoord::new(2, 2));
    for z in 0..GRID_Z {
        for x in 0..GRID_X {
            assert_eq!(g.grid.get(LocalPos::new(x, 0, z)), BlockType::Bedrock);
        }
    }
}

#[test]
fn generated_water_is_a_full_source() {
    let wg = WorldGen::new(
        5,
        config(
            r#"
            sea_level = 60
            [height]
            base = 30.0
            amplitude = 2.0
            [[biomes]]
            name = "sea"
            height = 0.5
            temperature = 0.5
            moisture = 0.5
            surface = "sand"
            top = "sand"
            "#,
        ),
    );
    let g = generate_chunk(&wg, ChunkCoord::new(0, 0));
    let mut water = 0;
    for (i, b) in g.grid.blocks.iter().enumerate() {
        if b.is_liquid() {
            water += 1;
            let pos = loam_world::from_index(i);
            assert_eq!(g.params.get(pos, ParamKind::LiquidSource), Some(LIQUID_FULL));
        }
    }
    assert!(water > 0);
    assert_eq!(g.grid.get(LocalPos::new(5, 60, 5)), BlockType::Water);
    assert_eq!(g.grid.get(LocalPos::new(5, 61, 5)), BlockType::Air);
}

#[test]
fn tree_biome_places_trunks_on_grass() {
    let wg = grove();
    for cx in 0..3 {
        let g = generate_chunk(&wg, ChunkCoord::new(cx, 1));
        assert!(!g.trees.is_empty());
        for t in &g.trees {
            assert_eq!(g.grid.get(LocalPos::new(t.x, t.base, t.z)), BlockType::Grass);
            for y in t.base + 1..=t.base + t.trunk_height {
                assert_eq!(g.grid.get(LocalPos::new(t.x, y, t.z)), BlockType::OakLog);
            }
            let cfg = &wg.config.trees;
            assert!((cfg.trunk_min..=cfg.trunk_max).contains(&t.trunk_height));
        }
        for (i, a) in g.trees.iter().enumerate() {
            for b in &g.trees[i + 1..] {
                let d2 = (a.x - b.x).pow(2) + (a.z - b.z).pow(2);
                assert!(d2 >= cfg_min_d2(&wg));
            }
        }
        // Canopies stay off the edge columns.
        for y in 0..CHUNK_HEIGHT {
            for k in 0..GRID_X {
                for pos in [
                    LocalPos::new(1, y, k),
                    LocalPos::new(CHUNK_WIDTH, y, k),
                    LocalPos::new(k, y, 1),
                    LocalPos::new(k, y, CHUNK_WIDTH),
                ] {
                    assert_ne!(g.grid.get(pos), BlockType::OakLeaves);
                }
            }
        }
    }
}

fn cfg_min_d2(wg: &WorldGen) -> i32 {
    wg.config.trees.min_distance.pow(2)
}

#[test]
fn biome_without_trees_places_no_trunks() {
    let wg = barren();
    for cx in -2..2 {
        let coord = ChunkCoord::new(cx, 0);
        let g = generate_chunk(&wg, coord);
        assert!(g.trees.is_empty());
        for log in [BlockType::OakLog, BlockType::BirchLog, BlockType::SpruceLog] {
            assert_eq!(g.grid.count_interior(log), 0);
        }
    }
}

#[test]
fn tree_pass_alone_respects_disallowing_biome() {
    let wg = barren();
    let ctx = wg.make_gen_ctx();
    let sampler = ColumnSampler::new(&ctx);
    let coord = ChunkCoord::new(4, 4);
    let mut g = generate_chunk(&wg, coord);
    // Make every surface tree-friendly; the biome still says no.
    let columns: Vec<_> = (0..GRID_Z)
        .flat_map(|z| (0..GRID_X).map(move |x| (x, z)))
        .map(|(x, z)| {
            let w = local_to_world(coord, LocalPos::new(x, 0, z));
            sampler.sample(w.x, w.z)
        })
        .collect();
    for (i, col) in columns.iter().enumerate() {
        let (x, z) = (i as i32 % GRID_X, i as i32 / GRID_X);
        g.grid.set(LocalPos::new(x, col.base_height, z), BlockType::Grass);
    }
    let placed = place_trees(&mut g.grid, &mut g.params, &sampler, &columns, coord, 77);
    assert!(placed.is_empty());
    assert_eq!(g.grid.count_interior(BlockType::OakLog), 0);
}
