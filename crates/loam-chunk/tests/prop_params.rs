use loam_blocks::ParamKind;
use loam_chunk::BlockParams;
use loam_world::LocalPos;
use proptest::prelude::*;

fn kind() -> impl Strategy<Value = ParamKind> {
    prop_oneof![
        Just(ParamKind::LiquidSource),
        Just(ParamKind::Rotation),
        Just(ParamKind::PlantVariant),
    ]
}

proptest! {
    #[test]
    fn remove_all_leaves_no_kind_behind(
        entries in prop::collection::vec((0i32..4, 0i32..4, 0i32..4, kind(), 0u8..=8), 0..40),
        x in 0i32..4, y in 0i32..4, z in 0i32..4,
    ) {
        let mut p = BlockParams::new();
        for (ex, ey, ez, k, v) in &entries {
            p.set(LocalPos::new(*ex, *ey, *ez), *k, *v);
        }
        let target = LocalPos::new(x, y, z);
        let others = p.iter().filter(|(k, _)| k.pos != target).count();
        p.remove_all(target);
        for k in ParamKind::ALL {
            prop_assert_eq!(p.get(target, k), None);
        }
        prop_assert_eq!(p.len(), others);
    }

    #[test]
    fn last_write_wins(v1 in 0u8..=8, v2 in 0u8..=8, k in kind()) {
        let mut p = BlockParams::new();
        let at = LocalPos::new(1, 2, 3);
        p.set(at, k, v1);
        p.set(at, k, v2);
        prop_assert_eq!(p.get(at, k), Some(v2));
        prop_assert_eq!(p.len(), 1);
    }
}
