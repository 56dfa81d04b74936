use std::path::PathBuf;

use clap::Parser;
use voxterra_geom::IVec3;
use voxterra_runtime::{DEFAULT_CACHE_CHUNKS, DEFAULT_CHUNK_SIZE};

#[derive(Parser, Debug)]
#[command(name = "voxterra", about = "Generate and mesh procedural voxel terrain")]
pub struct Args {
    /// Terrain parameters (TOML). Built-in defaults when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Inclusive lower corner, `X,Y,Z`.
    #[arg(long, value_parser = parse_ivec3, default_value = "0,0,0")]
    pub min: IVec3,

    /// Inclusive upper corner, `X,Y,Z`.
    #[arg(long, value_parser = parse_ivec3, default_value = "127,127,63")]
    pub max: IVec3,

    /// Resident chunk budget.
    #[arg(long, default_value_t = DEFAULT_CACHE_CHUNKS)]
    pub cache_chunks: usize,

    /// Edge length of a chunk in voxels.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: i32,

    /// Page-in worker threads (0 = one per core).
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Regenerate whenever the config file changes.
    #[arg(long, requires = "config")]
    pub watch: bool,

    /// Also write the log to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub fn parse_ivec3(s: &str) -> Result<IVec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected X,Y,Z, got '{s}'"));
    };
    let p = |v: &str| {
        v.parse::<i32>()
            .map_err(|e| format!("bad coordinate '{v}': {e}"))
    };
    Ok(IVec3::new(p(x)?, p(y)?, p(z)?))
}
