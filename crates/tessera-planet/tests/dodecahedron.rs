//! A planet at the coarsest subdivision: twenty corners, one per icosahedron
//! face, and twelve pentagonal tiles, one per icosahedron vertex.

use glam::{DVec3, Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tessera_geodesic::icosahedron::faces;
use tessera_map::{MapBuilder, MapCorner, MapTile, ProvinceStore, TilePatch};
use tessera_mesh::{Corner, MeshBuilder, NoProgress, SweepProgress, SweepStage, Tile};
use tessera_planet::{ContextError, ContextOptions, PlanetContext, PlanetPaths};
use tessera_zone::{Frustum, GeoCoord, ZoneKey, geo_to_point, point_to_geo};

const RADIUS: f32 = 1000.0;

struct Fixture {
    vertices: Vec<DVec3>,
    mesh: Vec<u8>,
    map: Vec<u8>,
}

fn stored(v: DVec3) -> Vec3 {
    let p = (v * f64::from(RADIUS)).as_vec3();
    Vec3::new(p.x, p.y, -p.z)
}

fn vertex_slot(vertices: &mut Vec<DVec3>, v: DVec3) -> usize {
    match vertices.iter().position(|u| (*u - v).length() < 1e-9) {
        Some(i) => i,
        None => {
            vertices.push(v);
            vertices.len() - 1
        }
    }
}

fn fixture(map_version: i32) -> Fixture {
    let faces = faces();
    let mut vertices = Vec::new();
    let face_tiles: Vec<[usize; 3]> = faces
        .iter()
        .map(|f| {
            [
                vertex_slot(&mut vertices, f.a),
                vertex_slot(&mut vertices, f.b),
                vertex_slot(&mut vertices, f.c),
            ]
        })
        .collect();
    assert_eq!(vertices.len(), 12);

    let mut mesh = MeshBuilder::new(1, RADIUS);
    for (face, tiles) in faces.iter().zip(&face_tiles) {
        mesh.push_corner(Corner {
            position: stored(face.sample(1.0 / 3.0, 1.0 / 3.0).normalize()),
            corners: [0; 3],
            borders: [0; 3],
            tiles: tiles.map(|t| t as i32),
        });
    }
    for (tile, v) in vertices.iter().enumerate() {
        let corners: Vec<i32> = face_tiles
            .iter()
            .enumerate()
            .filter(|(_, tiles)| tiles.contains(&tile))
            .map(|(face, _)| face as i32)
            .collect();
        assert_eq!(corners.len(), 5);
        mesh.push_tile(Tile {
            position: stored(*v),
            corners,
            borders: vec![0; 5],
            neighbors: vec![0; 5],
        })
        .unwrap();
    }

    let mut map = MapBuilder::new(map_version);
    for tile in 0..12 {
        map.push_tile(MapTile {
            elevation: tile as f32,
            water_elevation: 0.0,
            temperature: 15.0,
            moisture: 0.5,
            terrain: 1,
            vegetation: 0,
            biome: 2,
            vegetation_data: 0,
            decoration: -1,
            volumetric_light: Some(0.0),
        });
    }
    for _ in 0..20 {
        map.push_corner(MapCorner { cliff: 0 });
    }

    Fixture {
        vertices,
        mesh: mesh.build(),
        map: map.build().unwrap(),
    }
}

fn open(fx: &Fixture, options: &ContextOptions) -> PlanetContext {
    PlanetContext::open(fx.mesh.clone(), fx.map.clone(), options, &mut NoProgress).unwrap()
}

#[test]
fn test_vertex_coordinates_resolve_to_their_tile() {
    let fx = fixture(9);
    for cache_corner_tiles in [true, false] {
        let options = ContextOptions {
            cache_corner_tiles,
            ..ContextOptions::default()
        };
        let context = open(&fx, &options);
        for (tile, v) in fx.vertices.iter().enumerate() {
            let coord = point_to_geo(*v).unwrap();
            assert_eq!(
                context.lon_lat_to_tile_index(coord.longitude, coord.latitude).unwrap(),
                tile
            );
        }
    }
}

#[test]
fn test_lookup_picks_nearest_tile() {
    let fx = fixture(9);
    let context = open(&fx, &ContextOptions::default());
    let mut rng = Xoshiro256StarStar::seed_from_u64(12);
    for _ in 0..5_000 {
        let lat = rng.gen_range(-90.0..90.0);
        let lon = rng.gen_range(-180.0..180.0);
        let dir = geo_to_point(GeoCoord::new(lat, lon), 1.0);
        let mut dots: Vec<(f64, usize)> =
            fx.vertices.iter().enumerate().map(|(i, v)| (v.dot(dir), i)).collect();
        dots.sort_by(|a, b| b.0.total_cmp(&a.0));
        if dots[0].0 - dots[1].0 < 1e-4 {
            continue;
        }
        assert_eq!(context.lon_lat_to_tile_index(lon, lat).unwrap(), dots[0].1, "({lon}, {lat})");
    }
}

#[test]
fn test_tile_and_corner_views() {
    let fx = fixture(8);
    let context = open(&fx, &ContextOptions::default());
    for tile in 0..context.tile_count() {
        let view = context.tile_at(tile).unwrap();
        assert_eq!(view.state.elevation, tile as f32);
        assert_eq!(view.topology.edge_count(), 5);
        assert_eq!(view.zone, context.zone_of(tile).unwrap());
        assert!(context.tiles_in_zone(view.zone.key()).contains(&tile));
    }
    assert!(matches!(
        context.tile_at(12),
        Err(ContextError::TileOutOfRange { tile: 12, count: 12 })
    ));
    let corner = context.corner_at(19).unwrap();
    assert_eq!(corner.state.cliff, 0);
    assert!(matches!(context.corner_at(20), Err(ContextError::CornerOutOfRange { .. })));
}

#[test]
fn test_write_then_close() {
    let fx = fixture(8);
    let mut context = open(&fx, &ContextOptions::default());
    context
        .write_tile_field(3, &TilePatch::default().volumetric_light(0.5).decoration(7))
        .unwrap();
    let state = context.tile_at(3).unwrap().state;
    assert_eq!(state.volumetric_light, Some(0.5));
    assert_eq!(state.decoration, 7);
    assert!(context.write_tile_field(3, &TilePatch::default().terrain(300)).is_err());

    let buffers = context.close();
    assert!(buffers.map_modified);
    assert_eq!(buffers.map.len(), fx.map.len());
    assert_eq!(buffers.mesh, fx.mesh);
    assert!(buffers.provinces.is_none());
}

#[test]
fn test_count_mismatch_rejected() {
    let fx = fixture(8);
    let mut map = MapBuilder::new(8);
    for _ in 0..20 {
        map.push_corner(MapCorner { cliff: 0 });
    }
    let result = PlanetContext::open(fx.mesh, map.build().unwrap(), &ContextOptions::default(), &mut NoProgress);
    assert!(matches!(
        result,
        Err(ContextError::TileCountMismatch { mesh: 12, map: 0 })
    ));
}

#[test]
fn test_load_sweeps_report_in_order() {
    let fx = fixture(9);
    let mut stages = Vec::new();
    let mut sink = |p: SweepProgress| {
        if stages.last() != Some(&p.stage) {
            stages.push(p.stage);
        }
    };
    PlanetContext::open(fx.mesh, fx.map, &ContextOptions::default(), &mut sink).unwrap();
    assert_eq!(
        stages,
        vec![SweepStage::TileShapes, SweepStage::CornerTiles, SweepStage::ZoneAssignment]
    );
}

#[test]
fn test_visible_zones_face_the_camera() {
    let fx = fixture(9);
    let context = open(&fx, &ContextOptions::default());
    let eye = Vec3::new(0.0, 0.0, -3000.0);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(1.2, 1.0, 1.0, 2500.0);
    let frustum = Frustum::from_view_projection(&(proj * view));

    let keys = context.visible_zone_keys(&frustum);
    assert!(!keys.is_empty());
    let facing = context.zone_of(context.lon_lat_to_tile_index(90.0, 0.0).unwrap()).unwrap();
    let flooded = context.flood_visible_zones([facing.key()], &frustum, eye);
    assert!(flooded.iter().all(|key| {
        context
            .tiles_in_zone(*key)
            .iter()
            .any(|&t| context.is_tile_visible(t, &frustum, eye))
    }));
    assert!(flooded.contains(&facing.key()));
    assert!(!flooded.contains(&ZoneKey::NorthPole));
}

#[test]
fn test_open_files_with_overlays() {
    let fx = fixture(8);
    let dir = tempfile::tempdir().unwrap();
    let paths = PlanetPaths {
        mesh: dir.path().join("planet.mesh"),
        map: dir.path().join("planet.map"),
        names: None,
        provinces: Some(dir.path().join("planet.prov")),
    };
    std::fs::write(&paths.mesh, &fx.mesh).unwrap();
    std::fs::write(&paths.map, &fx.map).unwrap();
    std::fs::write(paths.provinces.as_ref().unwrap(), ProvinceStore::with_tiles(12).into_bytes()).unwrap();

    let mut context = PlanetContext::open_files(&paths, &ContextOptions::default(), &mut NoProgress).unwrap();
    context.set_province(4, 17, Some(2.5)).unwrap();
    let province = context.province(4).unwrap();
    assert_eq!(province.province, 17);
    assert_eq!(province.distance, 2.5);
    let buffers = context.close();
    assert!(buffers.provinces_modified);
    assert!(!buffers.map_modified);

    let missing = PlanetPaths {
        mesh: dir.path().join("absent.mesh"),
        ..paths
    };
    assert!(matches!(
        PlanetContext::open_files(&missing, &ContextOptions::default(), &mut NoProgress),
        Err(ContextError::Io { .. })
    ));
}
