use std::fmt;

use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Noise primitive sampled by each fractal layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BasisType {
    #[default]
    Simplex,
    Gradient,
    Value,
    Cellular,
}

/// Interpolation between lattice values. Only the value basis is affected:
/// `None`/`Linear` give plain value noise, `Hermite`/`Quintic` give cubic value noise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    None,
    #[default]
    Linear,
    Hermite,
    Quintic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FractalKind {
    Fbm,
    Ridged,
}

struct Layer {
    noise: FastNoiseLite,
    amplitude: f64,
    frequency: f64,
}

/// Sum of independently seeded noise layers.
///
/// Layer 0 samples at the base frequency with amplitude 1. Layer `k >= 1`
/// samples at `2^(k-1)` times the base frequency with amplitude `2^-(k-1)`.
/// Basis samples are clamped to `[-1, 1]`. fBm layers contribute `amp * n`;
/// ridged layers contribute `amp * (1 - |n|)`, so two ridged octaves span
/// `[0, 2]` and only approach 2 where both ridges meet.
pub(crate) struct Fractal {
    kind: FractalKind,
    basis: BasisType,
    layers: Vec<Layer>,
}

impl Fractal {
    pub(crate) fn new(
        kind: FractalKind,
        basis: BasisType,
        interp: Interpolation,
        octaves: u32,
        frequency: f64,
        seed: u32,
    ) -> Self {
        let noise_type = noise_type_for(basis, interp);
        let mut seeds = LayerSeeds::new(seed);
        let layers = (0..octaves)
            .map(|k| {
                let (amplitude, scale) = if k == 0 {
                    (1.0, 1.0)
                } else {
                    let e = (k - 1) as i32;
                    (0.5f64.powi(e), 2.0f64.powi(e))
                };
                let layer_freq = frequency * scale;
                let mut noise = FastNoiseLite::with_seed(seeds.next_seed());
                noise.set_noise_type(Some(noise_type));
                noise.set_frequency(Some(layer_freq as f32));
                Layer {
                    noise,
                    amplitude,
                    frequency: layer_freq,
                }
            })
            .collect();
        Self {
            kind,
            basis,
            layers,
        }
    }

    #[inline]
    pub(crate) fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (fx, fy, fz) = (x as f32, y as f32, z as f32);
        let mut sum = 0.0f64;
        for layer in &self.layers {
            let n = f64::from(layer.noise.get_noise_3d(fx, fy, fz)).clamp(-1.0, 1.0);
            sum += match self.kind {
                FractalKind::Fbm => layer.amplitude * n,
                FractalKind::Ridged => layer.amplitude * (1.0 - n.abs()),
            };
        }
        sum
    }

    pub(crate) fn octaves(&self) -> usize {
        self.layers.len()
    }
}

impl fmt::Debug for Fractal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let freqs: Vec<f64> = self.layers.iter().map(|l| l.frequency).collect();
        f.debug_struct("Fractal")
            .field("kind", &self.kind)
            .field("basis", &self.basis)
            .field("frequencies", &freqs)
            .finish()
    }
}

fn noise_type_for(basis: BasisType, interp: Interpolation) -> NoiseType {
    match (basis, interp) {
        (BasisType::Simplex, _) => NoiseType::OpenSimplex2,
        (BasisType::Gradient, _) => NoiseType::Perlin,
        (BasisType::Value, Interpolation::None | Interpolation::Linear) => NoiseType::Value,
        (BasisType::Value, Interpolation::Hermite | Interpolation::Quintic) => {
            NoiseType::ValueCubic
        }
        (BasisType::Cellular, _) => NoiseType::Cellular,
    }
}

/// Deterministic per-layer seed stream (splitmix32 style).
struct LayerSeeds {
    state: u32,
}

impl LayerSeeds {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_seed(&mut self) -> i32 {
        self.state = self.state.wrapping_add(0x9e37_79b9);
        let mut h = self.state;
        h ^= h >> 16;
        h = h.wrapping_mul(0x7feb_352d);
        h ^= h >> 15;
        h = h.wrapping_mul(0x846c_a68b);
        h ^= h >> 16;
        h as i32
    }
}
