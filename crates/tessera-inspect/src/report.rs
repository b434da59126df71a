//! Plain-text reports printed by the inspector.

use glam::Vec3;
use tessera_map::{MapCapabilities, MapHeader, Mountain, NameTable, River, TileProvince};
use tessera_mesh::MeshHeader;
use tessera_planet::TileView;
use tessera_zone::{ZoneKey, mesh_to_render, point_to_geo};

/// File headers and the feature set the map version enables.
pub fn header(
    mesh: &MeshHeader,
    map: &MapHeader,
    caps: &MapCapabilities,
    names: Option<&NameTable>,
) -> String {
    let mut lines = vec![
        format!("mesh version {} radius {}", mesh.version, mesh.radius),
        format!(
            "  corners {} borders {} tiles {}",
            mesh.corner_count, mesh.border_count, mesh.tile_count
        ),
        format!("map version {}", map.version),
        format!(
            "  tiles {} corners {} rivers {} mountains {}",
            map.tile_count, map.corner_count, map.river_count, map.mountain_count
        ),
        format!(
            "  tile stride {} river segment {} bytes",
            caps.tile_stride, caps.river_segment_size
        ),
        format!(
            "  river width {} volumetric light {} embedded names {}",
            yes_no(caps.river_width),
            yes_no(caps.volumetric_light),
            yes_no(caps.embedded_names)
        ),
    ];
    lines.push(match names {
        Some(table) => format!(
            "  names: {} trees, {} models ({:?})",
            table.trees.len(),
            table.models.len(),
            table.schema
        ),
        None => "  names: none".to_owned(),
    });
    lines.join("\n")
}

/// One tile: position, zone, state and the names its ids resolve to.
pub fn tile(view: &TileView, names: Option<&NameTable>, province: Option<TileProvince>) -> String {
    let shape = if view.topology.is_pentagon() {
        "pentagon"
    } else {
        "hexagon"
    };
    let mut lines = vec![format!("tile {} ({shape}) zone {}", view.index, view.zone)];
    if let Some(coord) = render_geo(view.topology.position) {
        lines.push(format!("  at {coord}"));
    }
    let state = &view.state;
    lines.push(format!(
        "  elevation {} water {} temperature {} moisture {}",
        state.elevation, state.water_elevation, state.temperature, state.moisture
    ));
    lines.push(format!(
        "  terrain {} biome {} vegetation {} decoration {}",
        state.terrain,
        state.biome,
        describe_tree(names, state.vegetation),
        describe_model(names, state.decoration)
    ));
    if let Some(light) = state.volumetric_light {
        lines.push(format!("  volumetric light {light}"));
    }
    lines.push(format!("  neighbors {:?}", view.topology.neighbors));
    if let Some(p) = province {
        lines.push(format!("  province {} distance {}", p.province, p.distance));
    }
    lines.join("\n")
}

/// A zone, its bounds and the tiles assigned to it.
pub fn zone(key: ZoneKey, tiles: &[usize]) -> String {
    let bounds = key.bounds();
    let adjacent: Vec<String> = key.adjacent().iter().map(ZoneKey::to_string).collect();
    let mut lines = vec![
        format!("zone {key}"),
        format!(
            "  lon {}..{} lat {}..{}",
            bounds.lon_min, bounds.lon_max, bounds.lat_min, bounds.lat_max
        ),
        format!("  adjacent {}", adjacent.join(" ")),
        format!("  {} tiles", tiles.len()),
    ];
    if !tiles.is_empty() {
        let preview: Vec<String> = tiles.iter().take(16).map(usize::to_string).collect();
        let more = if tiles.len() > 16 { " ..." } else { "" };
        lines.push(format!("  {}{more}", preview.join(" ")));
    }
    lines.join("\n")
}

/// Zones the quadtree reported and the set grown from them by flood fill.
pub fn visibility(candidates: &[ZoneKey], flooded: &[ZoneKey]) -> String {
    let list = |keys: &[ZoneKey]| keys.iter().map(ZoneKey::to_string).collect::<Vec<_>>().join(" ");
    [
        format!("quadtree: {} zones", candidates.len()),
        format!("  {}", list(candidates)),
        format!("flood fill: {} zones", flooded.len()),
        format!("  {}", list(flooded)),
    ]
    .join("\n")
}

/// Counts and lengths of the river and mountain records.
pub fn features(rivers: &[River], mountains: &[Mountain]) -> String {
    let longest_river = rivers.iter().map(|r| r.segments.len()).max().unwrap_or(0);
    let longest_range = mountains.iter().map(|m| m.tiles.len()).max().unwrap_or(0);
    let segments: usize = rivers.iter().map(|r| r.segments.len()).sum();
    [
        format!("{} rivers, {segments} segments, longest {longest_river}", rivers.len()),
        format!("{} mountain ranges, longest {longest_range}", mountains.len()),
    ]
    .join("\n")
}

fn render_geo(position: Vec3) -> Option<tessera_zone::GeoCoord> {
    point_to_geo(mesh_to_render(position).as_dvec3())
}

fn describe_tree(names: Option<&NameTable>, id: u8) -> String {
    match names.and_then(|t| t.tree_name(id)) {
        Some(name) => format!("{id} ({name})"),
        None => id.to_string(),
    }
}

fn describe_model(names: Option<&NameTable>, id: i16) -> String {
    if id < 0 {
        return "none".to_owned();
    }
    match names.and_then(|t| t.model_name(id)) {
        Some(name) => format!("{id} ({name})"),
        None => id.to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
