use loam_world::{
    CHUNK_HEIGHT, CHUNK_WIDTH, ChunkCoord, GRID_LEN, GRID_X, GRID_Z, LocalPos, WorldPos,
    clamp_border, from_index, local_to_world, to_index, world_to_local,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn index_round_trips(x in 0..GRID_X, y in 0..CHUNK_HEIGHT, z in 0..GRID_Z) {
        let i = to_index(x, y, z);
        prop_assert!(i < GRID_LEN);
        prop_assert_eq!(from_index(i), LocalPos::new(x, y, z));
    }

    #[test]
    fn local_world_round_trips(
        cx in -500i32..500,
        cz in -500i32..500,
        x in 1..=CHUNK_WIDTH,
        y in 0..CHUNK_HEIGHT,
        z in 1..=CHUNK_WIDTH,
    ) {
        let coord = ChunkCoord::new(cx, cz);
        let local = LocalPos::new(x, y, z);
        let world = local_to_world(coord, local);
        prop_assert_eq!(world_to_local(world), (coord, local));
    }

    #[test]
    fn world_positions_always_land_in_interior(x in -100_000i32..100_000, z in -100_000i32..100_000) {
        let (coord, local) = world_to_local(WorldPos::new(x, 3, z));
        prop_assert!(local.is_interior());
        prop_assert_eq!(local_to_world(coord, local), WorldPos::new(x, 3, z));
    }

    #[test]
    fn clamp_border_moves_one_span(v in -64i32..64) {
        let c = clamp_border(v, 1, CHUNK_WIDTH);
        if (1..=CHUNK_WIDTH).contains(&v) {
            prop_assert_eq!(c, v);
        } else {
            prop_assert_eq!((c - v).abs(), CHUNK_WIDTH);
        }
    }
}

#[test]
fn border_cell_and_neighbor_interior_share_a_world_position() {
    let coord = ChunkCoord::new(2, -1);
    let east = coord.offset(1, 0);
    let border = local_to_world(coord, LocalPos::new(17, 10, 5));
    let interior = local_to_world(east, LocalPos::new(1, 10, 5));
    assert_eq!(border, interior);
}
