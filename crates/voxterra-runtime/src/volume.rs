use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};

use hashbrown::HashMap;
use rayon::prelude::*;
use voxterra_blocks::Voxel;
use voxterra_chunk::{Chunk, ChunkCoord, ChunkPager, VoxelSource};
use voxterra_geom::{IVec3, Region};

pub const DEFAULT_CHUNK_SIZE: i32 = 32;
pub const DEFAULT_CACHE_CHUNKS: usize = 256;

type Local = (usize, usize, usize);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VolumeStats {
    pub hits: u64,
    pub misses: u64,
    pub page_ins: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Cache slot. The chunk is created at most once, by whichever thread gets
/// to `data.get_or_init` first; concurrent readers of the same slot block
/// on that single page-in.
struct ChunkEntry {
    region: Region,
    data: OnceLock<RwLock<Chunk>>,
}

impl ChunkEntry {
    fn settled(&self) -> Option<&RwLock<Chunk>> {
        self.data.get()
    }
}

#[derive(Default)]
struct CacheState {
    resident: HashMap<ChunkCoord, Arc<ChunkEntry>>,
    order: VecDeque<ChunkCoord>,
}

impl CacheState {
    fn touch(&mut self, coord: &ChunkCoord) {
        if let Some(pos) = self.order.iter().position(|c| c == coord) {
            if let Some(entry) = self.order.remove(pos) {
                self.order.push_back(entry);
            }
        }
    }

    /// Pops least recently used settled entries until within `capacity`.
    /// In-flight entries and `keep` are never chosen.
    fn take_victims(&mut self, capacity: usize, keep: ChunkCoord) -> Vec<Arc<ChunkEntry>> {
        let mut victims = Vec::new();
        while self.resident.len() > capacity {
            let pos = self.order.iter().position(|c| {
                *c != keep
                    && self
                        .resident
                        .get(c)
                        .is_some_and(|e| e.settled().is_some())
            });
            let Some(pos) = pos else { break };
            let Some(coord) = self.order.remove(pos) else {
                break;
            };
            if let Some(entry) = self.resident.remove(&coord) {
                victims.push(entry);
            }
        }
        victims
    }
}

/// Sparse voxel store paged in fixed-size cubic chunks.
///
/// Misses page the owning chunk in through the [`ChunkPager`]; the least
/// recently used chunks beyond `capacity` are handed back to the pager via
/// `page_out` and dropped.
pub struct VoxelVolume {
    pager: Arc<dyn ChunkPager>,
    chunk_size: i32,
    capacity: usize,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
    page_ins: AtomicU64,
    evictions: AtomicU64,
}

impl VoxelVolume {
    /// Panics if `chunk_size` or `capacity` is zero.
    pub fn new(pager: Arc<dyn ChunkPager>, chunk_size: i32, capacity: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            pager,
            chunk_size,
            capacity,
            state: Mutex::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            page_ins: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        self.lock_state()
            .resident
            .get(&coord)
            .is_some_and(|e| e.settled().is_some())
    }

    pub fn resident_chunks(&self) -> Vec<ChunkCoord> {
        self.lock_state().order.iter().copied().collect()
    }

    /// Resident entry for `coord`, paging it in first if needed. `None` for
    /// chunks entirely outside the `i32` range.
    fn entry(&self, coord: ChunkCoord) -> Option<Arc<ChunkEntry>> {
        let region = coord.region(self.chunk_size)?;
        let (entry, victims) = {
            let mut state = self.lock_state();
            if let Some(e) = state.resident.get(&coord).cloned() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                state.touch(&coord);
                (e, Vec::new())
            } else {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let e = Arc::new(ChunkEntry {
                    region,
                    data: OnceLock::new(),
                });
                state.resident.insert(coord, Arc::clone(&e));
                state.order.push_back(coord);
                let victims = state.take_victims(self.capacity, coord);
                (e, victims)
            }
        };
        self.page_out_all(victims);
        entry.data.get_or_init(|| {
            let mut chunk = Chunk::for_region(&entry.region);
            self.pager.page_in(&entry.region, &mut chunk);
            self.page_ins.fetch_add(1, Ordering::Relaxed);
            RwLock::new(chunk)
        });
        Some(entry)
    }

    /// True while `entry` is still the cached slot for `coord`.
    fn still_resident(&self, coord: &ChunkCoord, entry: &Arc<ChunkEntry>) -> bool {
        self.lock_state()
            .resident
            .get(coord)
            .is_some_and(|e| Arc::ptr_eq(e, entry))
    }

    fn page_out_all(&self, victims: Vec<Arc<ChunkEntry>>) {
        for victim in victims {
            if let Some(lock) = victim.settled() {
                let chunk = lock.read().unwrap_or_else(PoisonError::into_inner);
                log::debug!(
                    "evict chunk min=({}, {}, {})",
                    victim.region.min.x,
                    victim.region.min.y,
                    victim.region.min.z
                );
                self.pager.page_out(&victim.region, &chunk);
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Owning entry and chunk-local offset of a global voxel.
    fn locate(&self, x: i32, y: i32, z: i32) -> Option<(ChunkCoord, Arc<ChunkEntry>, Local)> {
        let coord = ChunkCoord::containing(x, y, z, self.chunk_size);
        let entry = self.entry(coord)?;
        let local = entry.region.local(IVec3::new(x, y, z))?;
        Some((coord, entry, local))
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> Voxel {
        let Some((_, entry, (lx, ly, lz))) = self.locate(x, y, z) else {
            return Voxel::AIR;
        };
        match entry.settled() {
            Some(lock) => lock
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get_local(lx, ly, lz),
            None => Voxel::AIR,
        }
    }

    /// Writes one voxel and marks its chunk modified. The edit lives only
    /// as long as the chunk stays resident.
    pub fn set(&self, x: i32, y: i32, z: i32, voxel: Voxel) {
        let Some((coord, entry, local)) = self.locate(x, y, z) else {
            return;
        };
        if !self.write_entry(&coord, &entry, local, voxel) {
            log::warn!(
                "edit at ({x}, {y}, {z}) landed in an evicted chunk and was discarded"
            );
        }
    }

    /// Writes into `entry` and reports whether it is still cached afterwards.
    /// An entry evicted between lookup and write has already been paged out,
    /// so the write is lost.
    fn write_entry(
        &self,
        coord: &ChunkCoord,
        entry: &Arc<ChunkEntry>,
        (lx, ly, lz): Local,
        voxel: Voxel,
    ) -> bool {
        let Some(lock) = entry.settled() else {
            return false;
        };
        lock.write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_local(lx, ly, lz, voxel);
        self.still_resident(coord, entry)
    }

    /// Pages in every chunk overlapping `region` on the current rayon pool.
    /// Returns the number of chunks touched.
    pub fn prefetch_region(&self, region: &Region) -> usize {
        let coords = ChunkCoord::covering(region, self.chunk_size);
        if coords.len() > self.capacity {
            log::warn!(
                "prefetch of {} chunks exceeds cache capacity {}; early chunks will be evicted",
                coords.len(),
                self.capacity
            );
        }
        coords.par_iter().for_each(|c| {
            self.entry(*c);
        });
        coords.len()
    }

    /// Copies `region` out of the volume, one lock per chunk.
    pub fn snapshot(&self, region: &Region) -> Chunk {
        let mut out = Chunk::for_region(region);
        if !region.is_valid() {
            return out;
        }
        for coord in ChunkCoord::covering(region, self.chunk_size) {
            let Some(entry) = self.entry(coord) else {
                continue;
            };
            let Some(lock) = entry.settled() else { continue };
            let Some(overlap) = entry.region.intersection(region) else {
                continue;
            };
            let chunk = lock.read().unwrap_or_else(PoisonError::into_inner);
            for p in &overlap {
                let (Some((sx, sy, sz)), Some((dx, dy, dz))) =
                    (entry.region.local(p), region.local(p))
                else {
                    continue;
                };
                let i = out.idx(dx, dy, dz);
                out.voxels_mut()[i] = chunk.get_local(sx, sy, sz);
            }
        }
        out
    }

    /// Evicts every resident chunk through the pager.
    pub fn clear(&self) {
        let victims: Vec<Arc<ChunkEntry>> = {
            let mut state = self.lock_state();
            state.order.clear();
            state.resident.drain().map(|(_, e)| e).collect()
        };
        self.page_out_all(victims);
    }

    pub fn stats(&self) -> VolumeStats {
        VolumeStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            page_ins: self.page_ins.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.lock_state().resident.len(),
        }
    }
}

impl VoxelSource for VoxelVolume {
    #[inline]
    fn voxel(&self, x: i32, y: i32, z: i32) -> Voxel {
        self.get(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use voxterra_blocks::Material;

    /// Fills every chunk with stone and counts calls.
    #[derive(Default)]
    struct Counting {
        ins: AtomicUsize,
        outs: AtomicUsize,
    }

    impl ChunkPager for Counting {
        fn page_in(&self, _region: &Region, chunk: &mut Chunk) {
            self.ins.fetch_add(1, Ordering::SeqCst);
            chunk.voxels_mut().fill(Voxel::solid(Material::Stone));
        }

        fn page_out(&self, _region: &Region, _chunk: &Chunk) {
            self.outs.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn volume(capacity: usize) -> (Arc<Counting>, VoxelVolume) {
        let pager = Arc::new(Counting::default());
        let vol = VoxelVolume::new(pager.clone(), 4, capacity);
        (pager, vol)
    }

    #[test]
    fn miss_then_hit() {
        let (pager, vol) = volume(4);
        assert_eq!(vol.get(1, 2, 3), Voxel::solid(Material::Stone));
        assert_eq!(vol.get(3, 0, 0), Voxel::solid(Material::Stone));
        let s = vol.stats();
        assert_eq!((s.misses, s.hits, s.page_ins, s.entries), (1, 1, 1, 1));
        assert_eq!(pager.ins.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lru_evicts_oldest_untouched() {
        let (pager, vol) = volume(2);
        vol.get(0, 0, 0); // chunk (0,0,0)
        vol.get(4, 0, 0); // chunk (1,0,0)
        vol.get(0, 0, 0); // refresh (0,0,0)
        vol.get(8, 0, 0); // chunk (2,0,0) evicts (1,0,0)
        assert!(vol.is_resident(ChunkCoord::new(0, 0, 0)));
        assert!(!vol.is_resident(ChunkCoord::new(1, 0, 0)));
        assert!(vol.is_resident(ChunkCoord::new(2, 0, 0)));
        assert_eq!(
            vol.resident_chunks(),
            vec![ChunkCoord::new(0, 0, 0), ChunkCoord::new(2, 0, 0)]
        );
        assert_eq!(pager.outs.load(Ordering::SeqCst), 1);
        assert_eq!(vol.stats().evictions, 1);
        assert_eq!(vol.stats().entries, 2);
    }

    #[test]
    fn edits_are_lost_after_eviction() {
        let (_pager, vol) = volume(1);
        vol.set(-1, -1, -1, Voxel::AIR);
        assert_eq!(vol.get(-1, -1, -1), Voxel::AIR);
        vol.get(100, 0, 0);
        assert_eq!(vol.get(-1, -1, -1), Voxel::solid(Material::Stone));
    }

    #[test]
    fn write_into_an_evicted_entry_is_reported() {
        let (pager, vol) = volume(4);
        let coord = ChunkCoord::new(0, 0, 0);
        let entry = vol.entry(coord).unwrap();
        assert!(vol.write_entry(&coord, &entry, (1, 1, 1), Voxel::AIR));

        // another thread evicts the slot before the write lands
        vol.clear();
        assert_eq!(pager.outs.load(Ordering::SeqCst), 1);
        assert!(!vol.write_entry(&coord, &entry, (2, 2, 2), Voxel::AIR));

        // a fresh page-in does not see either edit's chunk
        let again = vol.entry(coord).unwrap();
        assert!(!Arc::ptr_eq(&entry, &again));
        assert_eq!(vol.get(2, 2, 2), Voxel::solid(Material::Stone));
    }

    #[test]
    fn extreme_coordinates_stay_in_range() {
        let pager = Arc::new(Counting::default());
        let vol = VoxelVolume::new(pager, 3, 4);
        assert_eq!(vol.get(i32::MAX, i32::MIN, 0), Voxel::solid(Material::Stone));
        vol.set(i32::MAX, i32::MIN, 0, Voxel::AIR);
        assert_eq!(vol.get(i32::MAX, i32::MIN, 0), Voxel::AIR);
        assert_eq!(vol.get(i32::MAX - 1, i32::MIN + 1, 0), Voxel::solid(Material::Stone));
        let edge = Region::new(
            IVec3::new(i32::MAX - 3, i32::MIN, 0),
            IVec3::new(i32::MAX, i32::MIN + 3, 0),
        );
        let snap = vol.snapshot(&edge);
        assert_eq!(snap.get_local(3, 0, 0), Voxel::AIR);
        assert_eq!(snap.get_local(0, 3, 0), Voxel::solid(Material::Stone));
    }

    #[test]
    fn clear_pages_everything_out() {
        let (pager, vol) = volume(8);
        for i in 0..5 {
            vol.get(i * 4, 0, 0);
        }
        vol.clear();
        assert_eq!(pager.outs.load(Ordering::SeqCst), 5);
        assert_eq!(vol.stats().entries, 0);
    }
}
