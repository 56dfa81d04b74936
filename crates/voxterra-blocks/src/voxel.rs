use crate::material::Material;

/// One cell of the volume.
///
/// `density` is 0 exactly when `material` is air. Terrain generation only
/// produces the two extremes, 0 and 255.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub density: u8,
    pub material: u8,
}

impl Voxel {
    pub const AIR: Voxel = Voxel {
        density: 0,
        material: 0,
    };

    /// Fully dense voxel of `material`. Air maps to [`Voxel::AIR`].
    #[inline]
    pub const fn solid(material: Material) -> Voxel {
        match material {
            Material::Air => Voxel::AIR,
            m => Voxel {
                density: u8::MAX,
                material: m.id(),
            },
        }
    }

    #[inline]
    pub const fn is_solid(self) -> bool {
        self.density != 0
    }

    #[inline]
    pub const fn material(self) -> Option<Material> {
        Material::from_id(self.material)
    }

    /// Density and material agree on emptiness.
    #[inline]
    pub const fn is_consistent(self) -> bool {
        (self.density == 0) == (self.material == Material::Air.id())
    }
}
