use core::ops::{Add, Sub};

/// Integer position in global voxel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IVec3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl IVec3 {
    pub const ZERO: IVec3 = IVec3 { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: i32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub fn min(self, rhs: IVec3) -> IVec3 {
        IVec3::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline]
    pub fn max(self, rhs: IVec3) -> IVec3 {
        IVec3::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }
}

impl Add for IVec3 {
    type Output = IVec3;
    #[inline]
    fn add(self, rhs: IVec3) -> IVec3 {
        IVec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for IVec3 {
    type Output = IVec3;
    #[inline]
    fn sub(self, rhs: IVec3) -> IVec3 {
        IVec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl From<(i32, i32, i32)> for IVec3 {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<IVec3> for (i32, i32, i32) {
    fn from(value: IVec3) -> Self {
        (value.x, value.y, value.z)
    }
}

/// Axis-aligned box of voxel coordinates. Both corners are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub min: IVec3,
    pub max: IVec3,
}

impl Region {
    #[inline]
    pub const fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Region of `size` voxels per axis starting at `min`.
    #[inline]
    pub fn from_min_size(min: IVec3, sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            min,
            max: IVec3::new(
                min.x + sx as i32 - 1,
                min.y + sy as i32 - 1,
                min.z + sz as i32 - 1,
            ),
        }
    }

    /// True when `min <= max` on every axis, i.e. the box holds at least one voxel.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    #[inline]
    pub fn width(&self) -> usize {
        (i64::from(self.max.x) - i64::from(self.min.x) + 1).max(0) as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        (i64::from(self.max.y) - i64::from(self.min.y) + 1).max(0) as usize
    }

    #[inline]
    pub fn depth(&self) -> usize {
        (i64::from(self.max.z) - i64::from(self.min.z) + 1).max(0) as usize
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.width(), self.height(), self.depth())
    }

    #[inline]
    pub fn volume(&self) -> usize {
        self.width() * self.height() * self.depth()
    }

    #[inline]
    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    #[inline]
    pub fn contains_region(&self, other: &Region) -> bool {
        other.is_valid() && self.contains(other.min) && self.contains(other.max)
    }

    /// Region-local offset of a global coordinate, `None` outside the box.
    #[inline]
    pub fn local(&self, p: IVec3) -> Option<(usize, usize, usize)> {
        if !self.contains(p) {
            return None;
        }
        let off = |v: i32, lo: i32| (i64::from(v) - i64::from(lo)) as usize;
        Some((
            off(p.x, self.min.x),
            off(p.y, self.min.y),
            off(p.z, self.min.z),
        ))
    }

    pub fn intersection(&self, other: &Region) -> Option<Region> {
        let r = Region::new(self.min.max(other.min), self.max.min(other.max));
        r.is_valid().then_some(r)
    }

    /// Region expanded by `margin` voxels on every side, `None` when a
    /// corner would leave the `i32` range.
    pub fn checked_grown(&self, margin: i32) -> Option<Region> {
        let lo = |v: i32| v.checked_sub(margin);
        let hi = |v: i32| v.checked_add(margin);
        Some(Region::new(
            IVec3::new(lo(self.min.x)?, lo(self.min.y)?, lo(self.min.z)?),
            IVec3::new(hi(self.max.x)?, hi(self.max.y)?, hi(self.max.z)?),
        ))
    }

    /// Every coordinate of the box, x fastest, then y, then z.
    pub fn iter(&self) -> RegionIter {
        RegionIter {
            region: *self,
            next: self.is_valid().then_some(self.min),
        }
    }
}

impl IntoIterator for &Region {
    type Item = IVec3;
    type IntoIter = RegionIter;

    fn into_iter(self) -> RegionIter {
        self.iter()
    }
}

pub struct RegionIter {
    region: Region,
    next: Option<IVec3>,
}

impl Iterator for RegionIter {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        let cur = self.next?;
        let r = &self.region;
        let mut n = cur;
        if n.x < r.max.x {
            n.x += 1;
            self.next = Some(n);
        } else if n.y < r.max.y {
            n.x = r.min.x;
            n.y += 1;
            self.next = Some(n);
        } else if n.z < r.max.z {
            n.x = r.min.x;
            n.y = r.min.y;
            n.z += 1;
            self.next = Some(n);
        } else {
            self.next = None;
        }
        Some(cur)
    }
}
