//! Paged voxel volume and the service that turns regions into meshes.
#![forbid(unsafe_code)]

mod error;
mod service;
mod volume;

pub use error::ServiceError;
pub use service::{ServiceConfig, TerrainService};
pub use volume::{DEFAULT_CACHE_CHUNKS, DEFAULT_CHUNK_SIZE, VolumeStats, VoxelVolume};
