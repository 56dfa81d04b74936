use std::sync::Arc;
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use voxterra_blocks::MATERIAL_COUNT;
use voxterra_chunk::{PlacedChunk, TerrainPager};
use voxterra_geom::Region;
use voxterra_mesh_cpu::{
    CubicExtractor, DEFAULT_WORLD_SCALE, MaterialMeshSection, MeshPartitioner, SurfaceExtractor,
};
use voxterra_world::{TerrainField, TerrainParameters};

use crate::error::ServiceError;
use crate::volume::{DEFAULT_CACHE_CHUNKS, DEFAULT_CHUNK_SIZE, VoxelVolume};

/// Runtime knobs that are not part of the terrain itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServiceConfig {
    pub chunk_size: i32,
    pub cache_chunks: usize,
    pub world_scale: f32,
    /// Page-in workers; 0 lets rayon pick.
    pub worker_threads: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            cache_chunks: DEFAULT_CACHE_CHUNKS,
            world_scale: DEFAULT_WORLD_SCALE,
            worker_threads: 0,
        }
    }
}

impl ServiceConfig {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.chunk_size <= 0 {
            return Err(ServiceError::Config(format!(
                "chunk_size must be positive, got {}",
                self.chunk_size
            )));
        }
        if self.cache_chunks == 0 {
            return Err(ServiceError::Config("cache_chunks must be positive".into()));
        }
        if !self.world_scale.is_finite() {
            return Err(ServiceError::Config(format!(
                "world_scale must be finite, got {}",
                self.world_scale
            )));
        }
        Ok(())
    }
}

/// Owns the terrain parameters and the paged volume built from them.
pub struct TerrainService {
    config: ServiceConfig,
    field: Arc<TerrainField>,
    volume: VoxelVolume,
    extractor: Box<dyn SurfaceExtractor>,
    partitioner: MeshPartitioner,
    pool: ThreadPool,
}

impl TerrainService {
    pub fn new(params: TerrainParameters, config: ServiceConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("voxterra-page-{i}"))
            .build()?;
        let field = Arc::new(TerrainField::new(params));
        let volume = Self::make_volume(&field, &config);
        Ok(Self {
            config,
            field,
            volume,
            extractor: Box::new(CubicExtractor::new()),
            partitioner: MeshPartitioner::new(config.world_scale),
            pool,
        })
    }

    /// Replaces the surface extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn SurfaceExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    fn make_volume(field: &Arc<TerrainField>, config: &ServiceConfig) -> VoxelVolume {
        let pager = Arc::new(TerrainPager::new(Arc::clone(field)));
        VoxelVolume::new(pager, config.chunk_size, config.cache_chunks)
    }

    #[inline]
    pub fn params(&self) -> &TerrainParameters {
        self.field.params()
    }

    #[inline]
    pub fn field(&self) -> &Arc<TerrainField> {
        &self.field
    }

    #[inline]
    pub fn volume(&self) -> &VoxelVolume {
        &self.volume
    }

    #[inline]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Swaps in a field built from `params`. Every resident chunk is paged
    /// out of the old volume first.
    pub fn rebuild(&mut self, params: TerrainParameters) {
        log::info!(
            "rebuilding terrain: seed={} octaves={} frequency={} scale={} offset={} height={}",
            params.seed,
            params.octaves,
            params.frequency,
            params.scale,
            params.vertical_offset,
            params.terrain_height
        );
        self.volume.clear();
        self.field = Arc::new(TerrainField::new(params));
        self.volume = Self::make_volume(&self.field, &self.config);
    }

    /// Pages `region` in, extracts its surface, and partitions it into
    /// `MATERIAL_COUNT` sections, section `m - 1` for material `m`.
    pub fn generate_region_mesh(
        &self,
        region: &Region,
    ) -> Result<Vec<MaterialMeshSection>, ServiceError> {
        if !region.is_valid() {
            return Err(ServiceError::EmptyRegion {
                min: region.min,
                max: region.max,
            });
        }
        let t0 = Instant::now();
        // one voxel of margin so boundary faces see their neighbours
        let halo = region
            .checked_grown(1)
            .ok_or(ServiceError::RegionOutOfRange {
                min: region.min,
                max: region.max,
            })?;
        let chunks = self.pool.install(|| self.volume.prefetch_region(&halo));
        let t_page = t0.elapsed();
        let snapshot = self.volume.snapshot(&halo);
        let source = PlacedChunk {
            region: halo,
            chunk: &snapshot,
        };
        let raw = self.extractor.extract(&source, region);
        let t_extract = t0.elapsed();
        let sections = self.partitioner.partition(&raw, MATERIAL_COUNT)?;
        log::info!(
            "region {:?}..={:?}: chunks={} tris={} page_ms={} extract_ms={} total_ms={}",
            region.min,
            region.max,
            chunks,
            raw.triangle_count(),
            t_page.as_millis(),
            (t_extract - t_page).as_millis(),
            t0.elapsed().as_millis()
        );
        Ok(sections)
    }
}
