use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Inputs of the terrain field. Every field is optional in TOML.
///
/// ```toml
/// seed = 123
/// octaves = 3
/// frequency = 0.01
/// scale = 32.0
/// vertical_offset = 0.0
/// terrain_height = 64.0
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TerrainParameters {
    #[serde(default = "default_seed")]
    pub seed: u32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub vertical_offset: f32,
    #[serde(default = "default_terrain_height")]
    pub terrain_height: f32,
}

fn default_seed() -> u32 {
    123
}
fn default_octaves() -> u32 {
    3
}
fn default_frequency() -> f32 {
    0.01
}
fn default_scale() -> f32 {
    32.0
}
fn default_terrain_height() -> f32 {
    64.0
}

impl Default for TerrainParameters {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            octaves: default_octaves(),
            frequency: default_frequency(),
            scale: default_scale(),
            vertical_offset: 0.0,
            terrain_height: default_terrain_height(),
        }
    }
}

impl TerrainParameters {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let params: TerrainParameters = toml::from_str(toml_str)?;
        params.validate()?;
        Ok(params)
    }

    /// Rejects values that would make the field meaningless: non-finite
    /// floats or a non-positive terrain height.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let floats = [
            ("frequency", self.frequency),
            ("scale", self.scale),
            ("vertical_offset", self.vertical_offset),
            ("terrain_height", self.terrain_height),
        ];
        for (name, v) in floats {
            if !v.is_finite() {
                return Err(format!("{name} must be finite, got {v}").into());
            }
        }
        if self.terrain_height <= 0.0 {
            return Err(format!(
                "terrain_height must be positive, got {}",
                self.terrain_height
            )
            .into());
        }
        Ok(())
    }
}

pub fn load_params_from_path(path: &Path) -> Result<TerrainParameters, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    TerrainParameters::from_toml_str(&s)
}
