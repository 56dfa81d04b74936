use thiserror::Error;
use voxterra_geom::IVec3;
use voxterra_mesh_cpu::PartitionError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Requested region has `min > max` on some axis.
    #[error("empty region {min:?}..={max:?}")]
    EmptyRegion { min: IVec3, max: IVec3 },

    /// Region sits so close to the edge of `i32` space that its one-voxel
    /// margin cannot be addressed.
    #[error("region {min:?}..={max:?} touches the edge of the coordinate range")]
    RegionOutOfRange { min: IVec3, max: IVec3 },

    #[error("invalid service config: {0}")]
    Config(String),

    #[error("worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Partition(#[from] PartitionError),
}
