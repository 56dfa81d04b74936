//! Voxel and material types.
#![forbid(unsafe_code)]

mod material;
mod voxel;

pub use material::{MATERIAL_COUNT, Material};
pub use voxel::Voxel;
