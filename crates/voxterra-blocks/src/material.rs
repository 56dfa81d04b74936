use std::fmt;

/// Number of non-air materials; mesh sections are indexed `1..=MATERIAL_COUNT`.
pub const MATERIAL_COUNT: u8 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Material {
    #[default]
    Air = 0,
    Stone = 1,
    Dirt = 2,
    Grass = 3,
    Ore = 4,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Air,
        Material::Stone,
        Material::Dirt,
        Material::Grass,
        Material::Ore,
    ];

    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_id(id: u8) -> Option<Material> {
        match id {
            0 => Some(Material::Air),
            1 => Some(Material::Stone),
            2 => Some(Material::Dirt),
            3 => Some(Material::Grass),
            4 => Some(Material::Ore),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Material::Air => "air",
            Material::Stone => "stone",
            Material::Dirt => "dirt",
            Material::Grass => "grass",
            Material::Ore => "ore",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Material> for u8 {
    #[inline]
    fn from(m: Material) -> u8 {
        m.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for m in Material::ALL {
            assert_eq!(Material::from_id(m.id()), Some(m));
        }
        assert_eq!(Material::from_id(MATERIAL_COUNT + 1), None);
        assert_eq!(Material::ALL.len(), MATERIAL_COUNT as usize + 1);
    }
}
