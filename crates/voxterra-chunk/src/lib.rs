//! Chunk storage and the pager contract that fills it.
#![forbid(unsafe_code)]

mod chunk_coord;
mod pager;

use voxterra_blocks::Voxel;
use voxterra_geom::Region;

pub use chunk_coord::ChunkCoord;
pub use pager::{ChunkPager, TerrainPager};

/// Fixed-size block of voxels addressed by chunk-local coordinates.
///
/// Storage is x-fastest, then y, then z, matching [`Region::iter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    voxels: Vec<Voxel>,
    modified: bool,
}

impl Chunk {
    /// All-air chunk of the given extent.
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            sx,
            sy,
            sz,
            voxels: vec![Voxel::AIR; sx * sy * sz],
            modified: false,
        }
    }

    /// All-air chunk sized to hold `region`.
    pub fn for_region(region: &Region) -> Self {
        let (sx, sy, sz) = region.dims();
        Self::new(sx, sy, sz)
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.sx, self.sy, self.sz)
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.sy + y) * self.sx + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Voxel {
        self.voxels[self.idx(x, y, z)]
    }

    /// Writes a voxel and flags the chunk as diverging from generation.
    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, v: Voxel) {
        let i = self.idx(x, y, z);
        self.voxels[i] = v;
        self.modified = true;
    }

    /// Raw storage for pagers; writes here do not flag the chunk.
    #[inline]
    pub fn voxels_mut(&mut self) -> &mut [Voxel] {
        &mut self.voxels
    }

    #[inline]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    #[inline]
    pub fn has_solid(&self) -> bool {
        self.voxels.iter().any(|v| v.is_solid())
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_solid()
    }
}

/// Read access to voxels by global coordinate.
pub trait VoxelSource: Sync {
    fn voxel(&self, x: i32, y: i32, z: i32) -> Voxel;
}

/// A single chunk placed at a region acts as a source; outside reads are air.
pub struct PlacedChunk<'a> {
    pub region: Region,
    pub chunk: &'a Chunk,
}

impl VoxelSource for PlacedChunk<'_> {
    fn voxel(&self, x: i32, y: i32, z: i32) -> Voxel {
        match self.region.local((x, y, z).into()) {
            Some((lx, ly, lz)) => self.chunk.get_local(lx, ly, lz),
            None => Voxel::AIR,
        }
    }
}
