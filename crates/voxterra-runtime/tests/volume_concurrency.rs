use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use proptest::prelude::*;
use voxterra_blocks::Voxel;
use voxterra_chunk::{Chunk, ChunkCoord, ChunkPager, TerrainPager};
use voxterra_geom::{IVec3, Region};
use voxterra_runtime::VoxelVolume;
use voxterra_world::{TerrainField, TerrainParameters};

/// Terrain pager that counts page-ins per region and sleeps to widen races.
struct SlowCounting {
    inner: TerrainPager,
    calls: AtomicUsize,
}

impl SlowCounting {
    fn new() -> Self {
        Self {
            inner: TerrainPager::new(Arc::new(TerrainField::new(TerrainParameters::default()))),
            calls: AtomicUsize::new(0),
        }
    }
}

impl ChunkPager for SlowCounting {
    fn page_in(&self, region: &Region, chunk: &mut Chunk) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        self.inner.page_in(region, chunk);
    }

    fn page_out(&self, region: &Region, chunk: &Chunk) {
        self.inner.page_out(region, chunk);
    }
}

#[test]
fn concurrent_misses_collapse_into_one_page_in() {
    let pager = Arc::new(SlowCounting::new());
    let volume = VoxelVolume::new(pager.clone(), 16, 8);
    let seen: Vec<Voxel> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let volume = &volume;
                s.spawn(move || volume.get(i, 15 - i, 30))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(pager.calls.load(Ordering::SeqCst), 1);
    let field = pager.inner.field();
    for (i, v) in seen.iter().enumerate() {
        let i = i as i32;
        assert_eq!(*v, field.voxel_at(i, 15 - i, 30));
    }
    let stats = volume.stats();
    assert_eq!(stats.page_ins, 1);
    assert_eq!(stats.misses + stats.hits, 8);
    assert_eq!(stats.misses, 1);
}

#[test]
fn prefetch_pages_each_chunk_once() {
    let pager = Arc::new(SlowCounting::new());
    let volume = VoxelVolume::new(pager.clone(), 8, 64);
    let region = Region::new(IVec3::new(-4, -4, 0), IVec3::new(19, 11, 7));
    let touched = volume.prefetch_region(&region);
    // x: chunks -1..=2, y: -1..=1, z: 0
    assert_eq!(touched, 12);
    assert_eq!(pager.calls.load(Ordering::SeqCst), 12);
    for c in ChunkCoord::covering(&region, 8) {
        assert!(volume.is_resident(c));
    }
    volume.prefetch_region(&region);
    assert_eq!(pager.calls.load(Ordering::SeqCst), 12);
    assert_eq!(volume.stats().hits, 12);
}

#[test]
fn set_then_get_round_trips_while_resident() {
    let pager = Arc::new(SlowCounting::new());
    let volume = VoxelVolume::new(pager, 8, 4);
    let ore = Voxel { density: 255, material: 4 };
    volume.set(-3, 5, 100, ore);
    assert_eq!(volume.get(-3, 5, 100), ore);
}

#[test]
fn snapshot_matches_field() {
    let pager = Arc::new(SlowCounting::new());
    let field = Arc::clone(pager.inner.field());
    let volume = VoxelVolume::new(pager, 8, 64);
    let region = Region::new(IVec3::new(-3, 2, 25), IVec3::new(9, 12, 38));
    let snap = volume.snapshot(&region);
    for p in &region {
        let (lx, ly, lz) = region.local(p).unwrap();
        assert_eq!(snap.get_local(lx, ly, lz), field.voxel_at(p.x, p.y, p.z));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // reads through a tiny cache agree with the field no matter how much eviction happens
    #[test]
    fn thrashing_cache_reads_match_field(
        coords in proptest::collection::vec((-40i32..40, -40i32..40, 20i32..44), 1..40),
    ) {
        let field = Arc::new(TerrainField::new(TerrainParameters::default()));
        let volume = VoxelVolume::new(Arc::new(TerrainPager::new(Arc::clone(&field))), 4, 2);
        for (x, y, z) in coords {
            prop_assert_eq!(volume.get(x, y, z), field.voxel_at(x, y, z));
            prop_assert!(volume.stats().entries <= 2);
        }
    }
}
