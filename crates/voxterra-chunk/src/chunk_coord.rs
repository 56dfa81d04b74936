use voxterra_geom::{IVec3, Region};

/// Chunk grid position. Chunk `c` covers voxels `[c * size, (c + 1) * size)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Chunk owning the global voxel `(x, y, z)`; floors toward negative infinity.
    #[inline]
    pub fn containing(x: i32, y: i32, z: i32, size: i32) -> Self {
        Self {
            cx: x.div_euclid(size),
            cy: y.div_euclid(size),
            cz: z.div_euclid(size),
        }
    }

    /// Voxels covered by this chunk, clipped to the `i32` range.
    ///
    /// Chunks at the edge of the range come out smaller than `size` when
    /// `size` does not divide 2^32. `None` when no voxel of the chunk is
    /// representable.
    pub fn region(self, size: i32) -> Option<Region> {
        let span = |c: i32| {
            let lo = i64::from(c) * i64::from(size);
            let hi = lo + i64::from(size) - 1;
            let lo = i32::try_from(lo.max(i64::from(i32::MIN))).ok()?;
            let hi = i32::try_from(hi.min(i64::from(i32::MAX))).ok()?;
            (lo <= hi).then_some((lo, hi))
        };
        let (x0, x1) = span(self.cx)?;
        let (y0, y1) = span(self.cy)?;
        let (z0, z1) = span(self.cz)?;
        Some(Region::new(IVec3::new(x0, y0, z0), IVec3::new(x1, y1, z1)))
    }

    /// Every chunk overlapping `region`, x fastest.
    pub fn covering(region: &Region, size: i32) -> Vec<ChunkCoord> {
        if !region.is_valid() {
            return Vec::new();
        }
        let lo = ChunkCoord::containing(region.min.x, region.min.y, region.min.z, size);
        let hi = ChunkCoord::containing(region.max.x, region.max.y, region.max.z, size);
        Region::new(
            IVec3::new(lo.cx, lo.cy, lo.cz),
            IVec3::new(hi.cx, hi.cy, hi.cz),
        )
        .iter()
        .map(|c| ChunkCoord::new(c.x, c.y, c.z))
        .collect()
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}
