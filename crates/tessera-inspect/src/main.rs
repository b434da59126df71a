//! Command-line inspector for a planet's mesh and map files.
//!
//! Loads the planet named by `config.ron` (or the `--mesh`/`--map` flags),
//! builds the full context and prints one report.
//!
//! ```text
//! tessera-inspect --mesh earth.mesh --map earth.map locate -- -73.98 40.75
//! tessera-inspect zones 9 13
//! tessera-inspect visible 2.35 48.85 --altitude 800
//! ```

mod report;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use glam::{Mat4, Vec3};
use tessera_config::{CliArgs, Config, default_config_dir};
use tessera_mesh::SweepProgress;
use tessera_planet::{ContextError, ContextOptions, PlanetContext, PlanetPaths};
use tessera_zone::{Frustum, GeoCoord, GisZone, geo_to_point};

#[derive(Parser, Debug)]
#[command(name = "tessera-inspect", about = "Inspect an icosphere tile grid")]
struct InspectArgs {
    #[command(flatten)]
    common: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// File headers and map capabilities.
    Header,
    /// Tile under a longitude/latitude in degrees.
    Locate {
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
    },
    /// One tile by index.
    Tile { index: usize },
    /// One zone by latitude and longitude band.
    Zones { lat_band: u8, lng_band: u8 },
    /// Zones seen by a camera above a coordinate, looking at the centre.
    Visible {
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        /// Height above the surface, in radius units.
        #[arg(long, default_value_t = 1000.0)]
        altitude: f32,
        /// Vertical field of view in degrees.
        #[arg(long, default_value_t = 60.0)]
        fov: f32,
    },
    /// River and mountain summaries.
    Features,
}

fn main() -> ExitCode {
    let args = InspectArgs::parse();

    let config_dir = match args.common.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}; pass --config");
            return ExitCode::FAILURE;
        }
    };
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.common);

    let log_dir = config_dir.join("logs");
    if let Err(e) = tessera_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config)) {
        eprintln!("Failed to initialise logging: {e}");
    }

    match run(&config, &args.command) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "inspection failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, command: &Command) -> Result<String, ContextError> {
    let paths = PlanetPaths {
        mesh: config.data.mesh_path.clone(),
        map: config.data.map_path.clone(),
        names: config.data.names_path.clone(),
        provinces: config.data.provinces_path.clone(),
    };
    let options = ContextOptions {
        quadtree_depth: config.index.quadtree_depth,
        progress_interval: config.index.progress_interval,
        cache_corner_tiles: config.index.cache_corner_tiles,
        sphere_radius_override: config.index.sphere_radius_override,
    };
    let mut progress = |p: SweepProgress| {
        tracing::info!(
            stage = ?p.stage,
            processed = p.processed,
            total = p.total,
            "loading {:.0}%",
            p.fraction() * 100.0
        );
    };
    let context = PlanetContext::open_files(&paths, &options, &mut progress)?;
    let names = context.map().names();

    let text = match *command {
        Command::Header => {
            let map = context.map();
            report::header(&context.mesh().header(), &map.header(), map.capabilities(), names)
        }
        Command::Locate { lon, lat } => {
            let index = context.lon_lat_to_tile_index(lon, lat)?;
            let view = context.tile_at(index)?;
            format!(
                "{} -> tile {index}\n{}",
                GeoCoord::new(lat, lon),
                report::tile(&view, names, context.province(index).ok())
            )
        }
        Command::Tile { index } => {
            let view = context.tile_at(index)?;
            report::tile(&view, names, context.province(index).ok())
        }
        Command::Zones { lat_band, lng_band } => match GisZone::new(lat_band, lng_band) {
            Some(zone) => {
                let key = zone.key();
                report::zone(key, &context.tiles_in_zone(key))
            }
            None => format!("no zone at bands ({lat_band}, {lng_band})"),
        },
        Command::Visible {
            lon,
            lat,
            altitude,
            fov,
        } => {
            let (frustum, eye) = camera_above(GeoCoord::new(lat, lon), context.radius(), altitude, fov);
            let candidates = context.visible_zone_keys(&frustum);
            let flooded = context.flood_visible_zones(candidates.iter().copied(), &frustum, eye);
            report::visibility(&candidates, &flooded)
        }
        Command::Features => {
            let rivers = context.map().all_rivers()?;
            let mountains = context.map().all_mountains()?;
            report::features(&rivers, &mountains)
        }
    };
    Ok(text)
}

/// Camera `altitude` above `coord`, looking at the planet centre.
fn camera_above(coord: GeoCoord, radius: f32, altitude: f32, fov: f32) -> (Frustum, Vec3) {
    let distance = radius + altitude;
    let eye = geo_to_point(coord, f64::from(distance)).as_vec3();
    let up = if coord.latitude.abs() > 89.0 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, up);
    let proj = Mat4::perspective_rh(fov.to_radians(), 1.0, altitude * 0.1, distance * 2.0);
    (Frustum::from_view_projection(&(proj * view)), eye)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locate_with_negative_coordinates() {
        let args =
            InspectArgs::parse_from(["tessera-inspect", "--mesh", "a.mesh", "locate", "-73.5", "-40.25"]);
        assert_eq!(args.common.mesh.as_deref(), Some(std::path::Path::new("a.mesh")));
        match args.command {
            Command::Locate { lon, lat } => assert_eq!((lon, lat), (-73.5, -40.25)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_visible_defaults() {
        let args = InspectArgs::parse_from(["tessera-inspect", "visible", "10", "20"]);
        match args.command {
            Command::Visible { altitude, fov, .. } => assert_eq!((altitude, fov), (1000.0, 60.0)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_camera_sees_point_below() {
        let coord = GeoCoord::new(30.0, 45.0);
        let (frustum, eye) = camera_above(coord, 1000.0, 500.0, 60.0);
        let below = geo_to_point(coord, 1000.0).as_vec3();
        assert!(frustum.contains_point(below));
        assert!((eye.length() - 1500.0).abs() < 1e-2);
        assert!(!frustum.contains_point(eye * 2.0));
    }

    #[test]
    fn test_camera_over_pole() {
        let coord = GeoCoord::new(90.0, 0.0);
        let (frustum, _) = camera_above(coord, 1000.0, 500.0, 60.0);
        assert!(frustum.contains_point(Vec3::new(0.0, 1000.0, 0.0)));
    }
}
