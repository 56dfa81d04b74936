#![forbid(unsafe_code)]

mod cli;

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};
use voxterra_blocks::Material;
use voxterra_geom::Region;
use voxterra_mesh_cpu::MaterialMeshSection;
use voxterra_runtime::{ServiceConfig, TerrainService};
use voxterra_world::{TerrainParameters, load_params_from_path};

use crate::cli::Args;

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            CombinedLogger::init(vec![
                TermLogger::new(
                    LevelFilter::Info,
                    Config::default(),
                    TerminalMode::Mixed,
                    ColorChoice::Auto,
                ),
                WriteLogger::new(LevelFilter::Debug, Config::default(), File::create(path)?),
            ])?;
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
        }
    }
    Ok(())
}

fn load_params(args: &Args) -> Result<TerrainParameters, Box<dyn Error>> {
    match &args.config {
        Some(path) => load_params_from_path(path),
        None => Ok(TerrainParameters::default()),
    }
}

fn report(sections: &[MaterialMeshSection]) {
    for s in sections {
        let name = Material::from_id(s.material).map_or("?", Material::name);
        log::info!(
            "material {} ({}): verts={} tris={}",
            s.material,
            name,
            s.vertices.len(),
            s.triangle_count()
        );
    }
}

fn generate(svc: &TerrainService, region: &Region) -> Result<(), Box<dyn Error>> {
    let sections = svc.generate_region_mesh(region)?;
    report(&sections);
    let st = svc.volume().stats();
    log::info!(
        "cache: hits={} misses={} page_ins={} evictions={} resident={}",
        st.hits,
        st.misses,
        st.page_ins,
        st.evictions,
        st.entries
    );
    Ok(())
}

/// Blocks forever, regenerating after each change to `path`.
fn watch(svc: &mut TerrainService, region: &Region, path: &Path) -> Result<(), Box<dyn Error>> {
    use notify::{EventKind, RecursiveMode, Watcher};
    let (tx, rx) = mpsc::channel::<()>();
    let mut watcher =
        notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Any => {
                        let _ = tx.send(());
                    }
                    _ => {}
                }
            }
        })?;
    watcher.watch(path, RecursiveMode::NonRecursive)?;
    log::info!("watching {}", path.display());
    while rx.recv().is_ok() {
        // editors often write in bursts; settle before reloading
        std::thread::sleep(Duration::from_millis(100));
        while rx.try_recv().is_ok() {}
        match load_params_from_path(path) {
            Ok(params) => {
                svc.rebuild(params);
                if let Err(e) = generate(svc, region) {
                    log::error!("regeneration failed: {e}");
                }
            }
            Err(e) => log::warn!("ignoring {}: {e}", path.display()),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let params = load_params(&args)?;
    let config = ServiceConfig {
        chunk_size: args.chunk_size,
        cache_chunks: args.cache_chunks,
        worker_threads: args.threads,
        ..ServiceConfig::default()
    };
    let region = Region::new(args.min, args.max);
    let mut svc = TerrainService::new(params, config)?;
    generate(&svc, &region)?;

    if args.watch {
        if let Some(path) = args.config.as_deref() {
            watch(&mut svc, &region, path)?;
        }
    }
    Ok(())
}
