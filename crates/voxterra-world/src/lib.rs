//! Terrain parameters and the noise composition that turns them into voxels.
#![forbid(unsafe_code)]

pub mod params;
mod terrain;

pub use params::{TerrainParameters, load_params_from_path};
pub use terrain::{DIRT_THICKNESS, ORE_THRESHOLD, SOLID_THRESHOLD, TerrainField, classify};
