mod caves;
mod column_sampler;
mod surface;

pub use self::column_sampler::{ColumnSample, ColumnSampler, hash2, rand01};
pub use self::surface::layer_block;
