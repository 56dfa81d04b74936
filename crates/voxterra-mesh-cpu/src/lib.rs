//! CPU surface extraction and per-material mesh partitioning.
#![forbid(unsafe_code)]

mod cubic;
mod face;
mod partition;
mod raw;

use voxterra_chunk::VoxelSource;
use voxterra_geom::Region;

pub use cubic::CubicExtractor;
pub use face::Face;
pub use partition::{
    DEFAULT_WORLD_SCALE, MaterialMeshSection, MeshPartitioner, PartitionError,
};
pub use raw::{RawMesh, RawVertex};

/// Turns the voxels of a region into an unpartitioned triangle soup.
///
/// Every vertex carries the material of the voxel that produced it. Reads
/// outside `region` are allowed so faces on the region boundary can see
/// their neighbours.
pub trait SurfaceExtractor: Send + Sync {
    fn extract(&self, source: &dyn VoxelSource, region: &Region) -> RawMesh;
}
