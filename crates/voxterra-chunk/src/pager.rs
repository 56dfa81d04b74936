use std::sync::Arc;
use std::time::Instant;

use voxterra_geom::Region;
use voxterra_world::TerrainField;

use crate::Chunk;

/// Fills chunks on a cache miss and hears about them on eviction.
///
/// Implementations are shared between worker threads; distinct chunks may
/// page in concurrently.
pub trait ChunkPager: Send + Sync {
    /// Writes every voxel of `region` into `chunk` at `global - region.min`.
    ///
    /// Panics if `region` is empty or its extent differs from the chunk's.
    fn page_in(&self, region: &Region, chunk: &mut Chunk);

    /// Called once when a resident chunk leaves the cache.
    fn page_out(&self, region: &Region, chunk: &Chunk);
}

/// Regenerates chunks from a [`TerrainField`]; nothing is persisted.
#[derive(Clone, Debug)]
pub struct TerrainPager {
    field: Arc<TerrainField>,
}

impl TerrainPager {
    pub fn new(field: Arc<TerrainField>) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &Arc<TerrainField> {
        &self.field
    }
}

#[track_caller]
fn check_region(region: &Region, chunk: &Chunk) {
    assert!(
        region.is_valid(),
        "page_in region {:?}..{:?} is empty",
        region.min,
        region.max
    );
    assert_eq!(
        region.dims(),
        chunk.dims(),
        "page_in region extent does not match chunk"
    );
}

impl ChunkPager for TerrainPager {
    fn page_in(&self, region: &Region, chunk: &mut Chunk) {
        check_region(region, chunk);
        let t0 = Instant::now();
        let field = &*self.field;
        let mut solid = 0usize;
        // Storage order equals region iteration order.
        for (slot, p) in chunk.voxels_mut().iter_mut().zip(region.iter()) {
            let v = field.voxel_at(p.x, p.y, p.z);
            solid += usize::from(v.is_solid());
            *slot = v;
        }
        chunk.clear_modified();
        log::debug!(
            target: "perf",
            "ms={} page_in min=({}, {}, {}) dims={:?} solid={}",
            t0.elapsed().as_millis(),
            region.min.x,
            region.min.y,
            region.min.z,
            region.dims(),
            solid
        );
    }

    fn page_out(&self, region: &Region, chunk: &Chunk) {
        if chunk.is_modified() {
            log::warn!(
                "discarding modified chunk at ({}, {}, {}); edits are not persisted",
                region.min.x,
                region.min.y,
                region.min.z
            );
        } else {
            log::debug!(
                "page_out min=({}, {}, {})",
                region.min.x,
                region.min.y,
                region.min.z
            );
        }
    }
}
