use voxterra_blocks::{Material, Voxel};
use voxterra_noise::{BasisType, Interpolation, NodeId, NoiseGraph};

use crate::params::TerrainParameters;

/// Solidity samples strictly above this are solid.
pub const SOLID_THRESHOLD: f64 = 0.5;
/// Layers of dirt directly below the grass line.
pub const DIRT_THICKNESS: i32 = 3;
/// Ridged ore samples strictly above this become ore.
pub const ORE_THRESHOLD: f64 = 1.95;

const ORE_OCTAVES: u32 = 2;
const ORE_FREQUENCY_FACTOR: f64 = 5.0;

/// Terrain as a fixed noise composition over z-up space.
///
/// A vertical gradient, binarized at half height, is shifted along z by a
/// 2D fBm heightmap to give solidity. The grass line follows the same
/// heightmap, and a ridged field seeds sparse ore pockets in the stone.
#[derive(Debug)]
pub struct TerrainField {
    params: TerrainParameters,
    graph: NoiseGraph,
    solidity: NodeId,
    grass_line: NodeId,
    ore: NodeId,
}

impl TerrainField {
    pub fn new(params: TerrainParameters) -> Self {
        let mut g = NoiseGraph::new();
        let h = f64::from(params.terrain_height);
        let zero = g.constant(0.0);
        let one = g.constant(1.0);
        let height = g.constant(h);
        let half_height = g.constant(h / 2.0);

        // clamp(H - z, 0, H) / H: 1 at the floor, 0 at H and above
        let z = g.z();
        let above = g.subtract(height, z);
        let clamped = g.clamp(above, zero, height);
        let gradient = g.divide(clamped, height);

        let half = g.constant(0.5);
        let ground = g.select(zero, one, gradient, half, zero);

        let fbm = g.fractal_brownian_motion(
            BasisType::Simplex,
            Interpolation::Linear,
            params.octaves,
            f64::from(params.frequency),
            params.seed,
        );
        let scaled = g.scale_offset(
            fbm,
            f64::from(params.scale),
            f64::from(params.vertical_offset),
        );
        let height_field = g.scale_z(scaled, 0.0);
        let solidity = g.translate_z(ground, height_field);

        let grass_line = g.subtract(half_height, height_field);

        let ore = g.ridged_multifractal(
            BasisType::Simplex,
            Interpolation::Linear,
            ORE_OCTAVES,
            ORE_FREQUENCY_FACTOR * f64::from(params.frequency),
            params.seed,
        );

        Self {
            params,
            graph: g,
            solidity,
            grass_line,
            ore,
        }
    }

    #[inline]
    pub fn params(&self) -> &TerrainParameters {
        &self.params
    }

    #[inline]
    pub fn solidity(&self, x: i32, y: i32, z: i32) -> f64 {
        self.graph
            .evaluate(self.solidity, f64::from(x), f64::from(y), f64::from(z))
    }

    #[inline]
    pub fn grass_line(&self, x: i32, y: i32, z: i32) -> f64 {
        self.graph
            .evaluate(self.grass_line, f64::from(x), f64::from(y), f64::from(z))
    }

    #[inline]
    pub fn ore(&self, x: i32, y: i32, z: i32) -> f64 {
        self.graph
            .evaluate(self.ore, f64::from(x), f64::from(y), f64::from(z))
    }

    pub fn voxel_at(&self, x: i32, y: i32, z: i32) -> Voxel {
        classify(
            z,
            self.solidity(x, y, z),
            self.grass_line(x, y, z),
            || self.ore(x, y, z),
        )
    }
}

/// Material decision for one voxel from its raw field samples.
///
/// Precedence for solid voxels is grass, dirt, ore, stone. `ore` is only
/// sampled when the voxel falls through to the ore test.
pub fn classify(z: i32, solidity: f64, grass_line: f64, ore: impl FnOnce() -> f64) -> Voxel {
    if solidity <= SOLID_THRESHOLD {
        return Voxel::AIR;
    }
    let grass_z = grass_line.floor() as i32;
    let dirt_z = grass_z.saturating_sub(1);
    let material = if z >= grass_z {
        Material::Grass
    } else if z <= dirt_z && z > dirt_z.saturating_sub(DIRT_THICKNESS) {
        Material::Dirt
    } else if ore() > ORE_THRESHOLD {
        Material::Ore
    } else {
        Material::Stone
    };
    Voxel::solid(material)
}
