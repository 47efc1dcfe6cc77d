use crate::gen_ctx::GenCtx;

/// Caves carve where 3D noise exceeds a threshold raised by a 2D mask, so
/// some regions stay mostly solid.
pub(super) fn is_cave(ctx: &GenCtx, wx: i32, y: i32, wz: i32) -> bool {
    let caves = &ctx.config.caves;
    let (fx, fz) = (wx as f32, wz as f32);
    let mask = GenCtx::unit(ctx.cave_mask.get_noise_2d(fx, fz));
    let n = ctx.cave.get_noise_3d(fx, y as f32 * caves.y_scale, fz);
    n > caves.threshold + mask * caves.mask_weight
}
