//! Command-line overrides shared by the Tessera tools.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tessera command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tessera", about = "Tessera tile grid tools")]
pub struct CliArgs {
    /// Mesh topology file.
    #[arg(long)]
    pub mesh: Option<PathBuf>,

    /// Map state file.
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Separate name table file.
    #[arg(long)]
    pub names: Option<PathBuf>,

    /// Province overlay file.
    #[arg(long)]
    pub provinces: Option<PathBuf>,

    /// Zone quadtree depth.
    #[arg(long)]
    pub quadtree_depth: Option<u8>,

    /// Items between progress reports.
    #[arg(long)]
    pub progress_interval: Option<usize>,

    /// Cache the corner to tile table at load.
    #[arg(long)]
    pub cache_corner_tiles: Option<bool>,

    /// Sphere radius for zone boxes.
    #[arg(long)]
    pub radius: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.mesh {
            self.data.mesh_path = path.clone();
        }
        if let Some(ref path) = args.map {
            self.data.map_path = path.clone();
        }
        if let Some(ref path) = args.names {
            self.data.names_path = Some(path.clone());
        }
        if let Some(ref path) = args.provinces {
            self.data.provinces_path = Some(path.clone());
        }
        if let Some(depth) = args.quadtree_depth {
            self.index.quadtree_depth = depth;
        }
        if let Some(interval) = args.progress_interval {
            self.index.progress_interval = interval;
        }
        if let Some(cache) = args.cache_corner_tiles {
            self.index.cache_corner_tiles = cache;
        }
        if let Some(radius) = args.radius {
            self.index.sphere_radius_override = Some(radius);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
