use loam_geom::{Aabb, Vec3};
use proptest::prelude::*;

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn vec3_arithmetic() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    assert_eq!(a + b, Vec3::new(-3.0, 7.0, -3.0));
    assert_eq!((a + b) - a, b);
    assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
    assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
}

#[test]
fn cross_of_basis_vectors() {
    let i = Vec3::new(1.0, 0.0, 0.0);
    let j = Vec3::new(0.0, 1.0, 0.0);
    let k = Vec3::new(0.0, 0.0, 1.0);
    assert_eq!(i.cross(j), k);
    assert_eq!(j.cross(k), i);
    assert_eq!(k.cross(i), j);
}

#[test]
fn cell_center_is_offset_by_half() {
    assert_eq!(Vec3::cell_center(2, -1, 0), Vec3::new(2.5, -0.5, 0.5));
}

#[test]
fn empty_aabb_grows_from_points() {
    let mut bb = Aabb::EMPTY;
    assert!(bb.is_empty());
    bb.include(Vec3::new(1.0, 2.0, 3.0));
    bb.include(Vec3::new(-1.0, 5.0, 0.0));
    assert!(!bb.is_empty());
    assert_eq!(bb.min, Vec3::new(-1.0, 2.0, 0.0));
    assert_eq!(bb.max, Vec3::new(1.0, 5.0, 3.0));
    assert!(bb.contains(Vec3::new(0.0, 3.0, 1.0)));
    assert!(!bb.contains(Vec3::new(0.0, 6.0, 1.0)));
}

#[test]
fn union_ignores_empty_side() {
    let a = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(a.union(Aabb::EMPTY), a);
    assert_eq!(Aabb::EMPTY.union(a), a);
}

proptest! {
    // Cross result is orthogonal to both inputs
    #[test]
    fn cross_is_orthogonal(ax in -10.0f32..10.0, ay in -10.0f32..10.0, az in -10.0f32..10.0,
                           bx in -10.0f32..10.0, by in -10.0f32..10.0, bz in -10.0f32..10.0) {
        let a = Vec3::new(ax, ay, az);
        let b = Vec3::new(bx, by, bz);
        let c = a.cross(b);
        prop_assert!(approx_eq(a.dot(c), 0.0, 1e-2));
        prop_assert!(approx_eq(b.dot(c), 0.0, 1e-2));
    }
}
