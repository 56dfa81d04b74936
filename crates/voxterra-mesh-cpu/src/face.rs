use voxterra_geom::Vec3;

/// Cube face, named by its outward axis. Terrain is z-up.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosZ = 0,
    NegZ = 1,
    PosX = 2,
    NegX = 3,
    PosY = 4,
    NegY = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosZ,
        Face::NegZ,
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Grid step out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (x, y, z) = self.delta();
        Vec3::new(x as f32, y as f32, z as f32)
    }

    /// Unit-cell corner offsets, counter-clockwise seen from outside.
    #[inline]
    pub fn corners(self) -> [(i32, i32, i32); 4] {
        FACE_CORNERS[self.index()]
    }
}

const FACE_CORNERS: [[(i32, i32, i32); 4]; 6] = [
    // +Z
    [(0, 0, 1), (1, 0, 1), (1, 1, 1), (0, 1, 1)],
    // -Z
    [(0, 0, 0), (0, 1, 0), (1, 1, 0), (1, 0, 0)],
    // +X
    [(1, 0, 0), (1, 1, 0), (1, 1, 1), (1, 0, 1)],
    // -X
    [(0, 0, 0), (0, 0, 1), (0, 1, 1), (0, 1, 0)],
    // +Y
    [(0, 1, 0), (0, 1, 1), (1, 1, 1), (1, 1, 0)],
    // -Y
    [(0, 0, 0), (1, 0, 0), (1, 0, 1), (0, 0, 1)],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_wind_counter_clockwise_from_outside() {
        for f in Face::ALL {
            let c: Vec<Vec3> = f
                .corners()
                .iter()
                .map(|&(x, y, z)| Vec3::new(x as f32, y as f32, z as f32))
                .collect();
            let n = (c[1] - c[0]).cross(c[2] - c[0]);
            assert_eq!(n, f.normal(), "{f:?}");
            let n2 = (c[2] - c[0]).cross(c[3] - c[0]);
            assert_eq!(n2, f.normal(), "{f:?}");
        }
    }
}
