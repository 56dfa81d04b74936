//! Geometry types shared by the terrain crates: float vectors for mesh data and
//! inclusive integer regions for voxel addressing.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

mod region;

pub use region::{IVec3, Region};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    /// Terrain is z-up: the vertical gradient runs along z.
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Right-handed cross product.
    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; a zero vector stays zero.
    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    #[inline]
    pub fn min(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline]
    pub fn max(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }
}

impl From<IVec3> for Vec3 {
    #[inline]
    fn from(v: IVec3) -> Self {
        Vec3::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tight bounds of a point set, `None` when the set is empty.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Aabb::new(*first, *first);
        for p in rest {
            bounds.include(*p);
        }
        Some(bounds)
    }

    #[inline]
    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn from_points_contains_every_point(pts in proptest::collection::vec(any::<(i16, i16, i16)>(), 1..32)) {
            let pts: Vec<Vec3> = pts
                .into_iter()
                .map(|(x, y, z)| Vec3::new(f32::from(x), f32::from(y), f32::from(z)))
                .collect();
            let bb = Aabb::from_points(&pts).unwrap();
            for p in &pts {
                prop_assert!(p.x >= bb.min.x && p.x <= bb.max.x);
                prop_assert!(p.y >= bb.min.y && p.y <= bb.max.y);
                prop_assert!(p.z >= bb.min.z && p.z <= bb.max.z);
            }
        }
    }

    proptest! {
        // negation flips the sign bit only, including for NaN and infinities
        #[test]
        fn neg_flips_sign_bits(v in any::<Vec3>()) {
            let n = -v;
            prop_assert_eq!(n.x.to_bits(), v.x.to_bits() ^ 0x8000_0000);
            prop_assert_eq!(n.y.to_bits(), v.y.to_bits() ^ 0x8000_0000);
            prop_assert_eq!(n.z.to_bits(), v.z.to_bits() ^ 0x8000_0000);
        }

        #[test]
        fn extents_of_arbitrary_box(b in any::<Aabb>()) {
            let e = b.extents();
            prop_assert_eq!(e.x.to_bits(), (b.max.x - b.min.x).to_bits());
            prop_assert_eq!(e.z.to_bits(), (b.max.z - b.min.z).to_bits());
        }
    }

    #[test]
    fn from_points_empty_is_none() {
        assert_eq!(Aabb::from_points(&[]), None);
    }
}
