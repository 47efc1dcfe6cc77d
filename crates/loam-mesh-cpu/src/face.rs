use loam_blocks::Face;
use loam_geom::Vec3;

/// Returns the unit-normal vector for this face.
#[inline]
pub fn normal(face: Face) -> Vec3 {
    let (x, y, z) = face.delta();
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Corners of the unit-cube face, as a cycle. Diagonal `0-2` is the default
/// triangle split and `1-3` the flipped one.
#[inline]
pub fn face_corners(face: Face) -> [Vec3; 4] {
    let v = Vec3::new;
    match face {
        Face::PosY => [v(0., 1., 0.), v(0., 1., 1.), v(1., 1., 1.), v(1., 1., 0.)],
        Face::NegY => [v(0., 0., 0.), v(1., 0., 0.), v(1., 0., 1.), v(0., 0., 1.)],
        Face::PosX => [v(1., 0., 0.), v(1., 1., 0.), v(1., 1., 1.), v(1., 0., 1.)],
        Face::NegX => [v(0., 0., 0.), v(0., 0., 1.), v(0., 1., 1.), v(0., 1., 0.)],
        Face::PosZ => [v(0., 0., 1.), v(1., 0., 1.), v(1., 1., 1.), v(0., 1., 1.)],
        Face::NegZ => [v(0., 0., 0.), v(0., 1., 0.), v(1., 1., 0.), v(1., 0., 0.)],
    }
}

/// Tile-local UV for a point on a unit face; `v` grows downward from the top edge.
#[inline]
pub fn local_uv(face: Face, p: Vec3) -> (f32, f32) {
    match face {
        Face::PosY | Face::NegY => (p.x, p.z),
        Face::PosX | Face::NegX => (p.z, 1.0 - p.y),
        Face::PosZ | Face::NegZ => (p.x, 1.0 - p.y),
    }
}

/// Turns a tile-local UV by `quarter_turns` about the tile center.
#[inline]
pub fn rotate_uv((u, v): (f32, f32), quarter_turns: u8) -> (f32, f32) {
    match quarter_turns % 4 {
        0 => (u, v),
        1 => (1.0 - v, u),
        2 => (1.0 - u, 1.0 - v),
        _ => (v, 1.0 - u),
    }
}
