use loam_blocks::{
    BlockShape, BlockState, BlockType, DropPolicy, Face, can_support_plant, can_support_tree,
    describe, drop_for, state_at,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct Named {
    block: BlockType,
}

#[test]
fn catalog_names_match_serde_names() {
    for b in BlockType::ALL {
        let info = describe(b);
        let parsed: Named = toml::from_str(&format!("block = \"{}\"", info.name)).unwrap();
        assert_eq!(parsed.block, b, "catalog row out of order for {:?}", b);
    }
}

#[test]
fn air_has_a_defined_default() {
    let air = describe(BlockType::Air);
    assert_eq!(air.state, BlockState::Transparent);
    assert_eq!(air.drop, DropPolicy::Nothing);
    assert_eq!(drop_for(BlockType::Air), None);
}

#[test]
fn half_block_is_solid_only_on_bottom() {
    assert_eq!(describe(BlockType::StoneSlab).shape, BlockShape::HalfBlock);
    assert_eq!(state_at(BlockType::StoneSlab, Face::NegY), BlockState::Solid);
    for f in [Face::PosY, Face::PosX, Face::NegX, Face::PosZ, Face::NegZ] {
        assert_eq!(state_at(BlockType::StoneSlab, f), BlockState::Transparent);
    }
    for f in Face::ALL {
        assert_eq!(state_at(BlockType::Stone, f), BlockState::Solid);
    }
}

#[test]
fn plants_are_liquid_destroyable_cross_shapes() {
    for b in [BlockType::TallGrass, BlockType::Flower, BlockType::DeadBush] {
        let info = describe(b);
        assert_eq!(info.shape, BlockShape::CrossPlant);
        assert_eq!(info.state, BlockState::LiquidDestroyable);
        assert!(info.variants >= 1);
    }
}

#[test]
fn support_predicates() {
    assert!(can_support_plant(BlockType::Grass));
    assert!(!can_support_plant(BlockType::Stone));
    assert!(!can_support_plant(BlockType::Water));
    assert!(can_support_tree(BlockType::Grass));
    assert!(can_support_tree(BlockType::Snow));
    assert!(!can_support_tree(BlockType::Sand));
}

#[test]
fn drop_policies() {
    assert_eq!(drop_for(BlockType::Grass), Some(BlockType::Dirt));
    assert_eq!(drop_for(BlockType::Stone), Some(BlockType::Stone));
    assert_eq!(drop_for(BlockType::OakLeaves), None);
}
