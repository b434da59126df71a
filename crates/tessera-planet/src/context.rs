//! The per-map context: every store and derived index for one loaded planet.

use std::path::{Path, PathBuf};

use glam::Vec3;
use tessera_geodesic::{CornerTileCache, GeodesicIndex};
use tessera_map::{MapCorner, MapStore, MapTile, NameTable, ProvinceStore, TilePatch, TileProvince};
use tessera_mesh::{
    Corner, DEFAULT_PROGRESS_INTERVAL, MeshStore, ProgressSink, Tile,
};
use tessera_zone::{
    DEFAULT_QUADTREE_DEPTH, Frustum, GisZone, QuadTree, ZoneData, ZoneKey, ZonePartition,
    flood_visible, mesh_to_render,
};

use crate::error::ContextError;

/// Knobs applied while opening a context.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextOptions {
    /// Subdivision depth of the zone quadtree.
    pub quadtree_depth: u8,
    /// Items processed between progress checkpoints.
    pub progress_interval: usize,
    /// Copy the corner to tile table out of the mesh once at open.
    pub cache_corner_tiles: bool,
    /// Radius used for zone boxes instead of the mesh header radius.
    pub sphere_radius_override: Option<f32>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            quadtree_depth: DEFAULT_QUADTREE_DEPTH,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            cache_corner_tiles: true,
            sphere_radius_override: None,
        }
    }
}

/// Files making up one planet on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanetPaths {
    pub mesh: PathBuf,
    pub map: PathBuf,
    /// Separate name table, for maps older than version 9.
    pub names: Option<PathBuf>,
    pub provinces: Option<PathBuf>,
}

/// A tile's topology and state together.
#[derive(Clone, Debug, PartialEq)]
pub struct TileView {
    pub index: usize,
    pub topology: Tile,
    pub state: MapTile,
    pub zone: GisZone,
}

/// A corner's topology and state together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerView {
    pub index: usize,
    pub topology: Corner,
    pub state: MapCorner,
}

/// Buffers handed back by [`PlanetContext::close`].
#[derive(Debug)]
pub struct PlanetBuffers {
    pub mesh: Vec<u8>,
    pub map: Vec<u8>,
    pub map_modified: bool,
    pub provinces: Option<Vec<u8>>,
    pub provinces_modified: bool,
}

/// Owns the stores of one loaded planet and the indices derived from them.
///
/// Built by [`PlanetContext::open`], torn down by [`PlanetContext::close`].
/// Edits go through [`PlanetContext::write_tile_field`]; there is no locking,
/// so a context has one writer at a time.
#[derive(Debug)]
pub struct PlanetContext {
    mesh: MeshStore,
    map: MapStore,
    provinces: Option<ProvinceStore>,
    geodesic: GeodesicIndex,
    corner_tiles: Option<CornerTileCache>,
    partition: ZonePartition,
    quadtree: QuadTree,
    radius: f32,
}

impl PlanetContext {
    /// Validate both buffers, then run the load sweeps: tile shapes, the
    /// corner tile cache when enabled, and zone assignment.
    pub fn open(
        mesh: Vec<u8>,
        map: Vec<u8>,
        options: &ContextOptions,
        progress: &mut dyn ProgressSink,
    ) -> Result<Self, ContextError> {
        let mesh = MeshStore::open(mesh)?;
        let map = MapStore::open(map)?;
        let mesh_header = mesh.header();
        let map_header = map.header();
        if mesh_header.tile_count != map_header.tile_count {
            return Err(ContextError::TileCountMismatch {
                mesh: mesh_header.tile_count,
                map: map_header.tile_count,
            });
        }
        if mesh_header.corner_count != map_header.corner_count {
            return Err(ContextError::CornerCountMismatch {
                mesh: mesh_header.corner_count,
                map: map_header.corner_count,
            });
        }

        let interval = options.progress_interval;
        mesh.verify_tile_shapes(interval, progress)?;
        let geodesic = GeodesicIndex::new(mesh_header.corner_count)?;
        let corner_tiles = if options.cache_corner_tiles {
            Some(CornerTileCache::build(&mesh, interval, progress)?)
        } else {
            None
        };
        let partition = ZonePartition::build(&mesh, interval, progress)?;

        let radius = options.sphere_radius_override.unwrap_or(mesh_header.radius);
        let quadtree = QuadTree::with_all_zones(radius, options.quadtree_depth);

        tracing::info!(
            tiles = mesh_header.tile_count,
            corners = mesh_header.corner_count,
            map_version = map_header.version,
            radius,
            "planet context opened"
        );
        Ok(Self {
            mesh,
            map,
            provinces: None,
            geodesic,
            corner_tiles,
            partition,
            quadtree,
            radius,
        })
    }

    /// Read every file named in `paths` and open a context over them.
    pub fn open_files(
        paths: &PlanetPaths,
        options: &ContextOptions,
        progress: &mut dyn ProgressSink,
    ) -> Result<Self, ContextError> {
        let mut context = Self::open(read(&paths.mesh)?, read(&paths.map)?, options, progress)?;
        if let Some(names) = &paths.names {
            context.attach_names(&read(names)?)?;
        }
        if let Some(provinces) = &paths.provinces {
            context.attach_provinces(read(provinces)?)?;
        }
        Ok(context)
    }

    /// Tear down the context and return the buffers for saving.
    pub fn close(self) -> PlanetBuffers {
        let map_modified = self.map.is_modified();
        let provinces_modified = self.provinces.as_ref().is_some_and(ProvinceStore::is_modified);
        tracing::debug!(map_modified, provinces_modified, "planet context closed");
        PlanetBuffers {
            mesh: self.mesh.into_bytes(),
            map: self.map.into_bytes(),
            map_modified,
            provinces: self.provinces.map(ProvinceStore::into_bytes),
            provinces_modified,
        }
    }

    /// Decode a separate name table for a pre-version-9 map.
    pub fn attach_names(&mut self, bytes: &[u8]) -> Result<&NameTable, ContextError> {
        Ok(self.map.attach_names(bytes)?)
    }

    /// Load a province overlay. It must hold one record per tile.
    pub fn attach_provinces(&mut self, bytes: Vec<u8>) -> Result<(), ContextError> {
        let provinces = ProvinceStore::open(bytes)?;
        let tiles = self.tile_count();
        if provinces.len() != tiles {
            return Err(ContextError::ProvinceCountMismatch {
                tiles,
                provinces: provinces.len(),
            });
        }
        self.provinces = Some(provinces);
        Ok(())
    }

    pub fn mesh(&self) -> &MeshStore {
        &self.mesh
    }

    pub fn map(&self) -> &MapStore {
        &self.map
    }

    pub fn geodesic(&self) -> &GeodesicIndex {
        &self.geodesic
    }

    pub fn partition(&self) -> &ZonePartition {
        &self.partition
    }

    pub fn quadtree(&self) -> &QuadTree {
        &self.quadtree
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn tile_count(&self) -> usize {
        self.mesh.header().tile_count
    }

    pub fn corner_count(&self) -> usize {
        self.mesh.header().corner_count
    }

    pub fn tile_at(&self, index: usize) -> Result<TileView, ContextError> {
        let topology = self.mesh.tile(index).ok_or(ContextError::TileOutOfRange {
            tile: index,
            count: self.tile_count(),
        })?;
        Ok(TileView {
            index,
            topology,
            state: self.map.tile(index)?,
            zone: self.partition.zone_of(index)?,
        })
    }

    pub fn corner_at(&self, index: usize) -> Result<CornerView, ContextError> {
        let topology = self.mesh.corner(index).ok_or(ContextError::CornerOutOfRange {
            corner: index,
            count: self.corner_count(),
        })?;
        Ok(CornerView {
            index,
            topology,
            state: self.map.corner(index)?,
        })
    }

    pub fn zone_of(&self, tile: usize) -> Result<GisZone, ContextError> {
        Ok(self.partition.zone_of(tile)?)
    }

    /// Tiles under a zone key; polar keys span the whole cap.
    pub fn tiles_in_zone(&self, key: ZoneKey) -> Vec<usize> {
        self.partition.tiles_in_zone(key).collect()
    }

    /// Zone cells whose quadtree leaves intersect the frustum.
    pub fn visible_zones(&self, frustum: &Frustum) -> Vec<&ZoneData> {
        self.quadtree.query(frustum)
    }

    /// Distinct zone keys among [`PlanetContext::visible_zones`], in query
    /// order.
    pub fn visible_zone_keys(&self, frustum: &Frustum) -> Vec<ZoneKey> {
        let mut keys: Vec<ZoneKey> = Vec::new();
        for zone in self.visible_zones(frustum) {
            let key = zone.key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Whether a tile centre is inside the frustum and on the hemisphere
    /// facing `eye`.
    pub fn is_tile_visible(&self, tile: usize, frustum: &Frustum, eye: Vec3) -> bool {
        self.mesh.tile_position(tile).is_some_and(|p| {
            let p = mesh_to_render(p);
            frustum.contains_point(p) && (p - eye).dot(p) < 0.0
        })
    }

    /// Zones with at least one visible tile, grown from `seeds` over zone
    /// adjacency.
    pub fn flood_visible_zones<I>(&self, seeds: I, frustum: &Frustum, eye: Vec3) -> Vec<ZoneKey>
    where
        I: IntoIterator<Item = ZoneKey>,
    {
        flood_visible(seeds, |key| {
            self.partition
                .tiles_in_zone(key)
                .any(|tile| self.is_tile_visible(tile, frustum, eye))
        })
    }

    /// Tile containing a longitude/latitude in degrees.
    pub fn lon_lat_to_tile_index(&self, longitude: f64, latitude: f64) -> Result<usize, ContextError> {
        let tile = match &self.corner_tiles {
            Some(cache) => self.geodesic.lon_lat_to_tile(longitude, latitude, cache)?,
            None => self.geodesic.lon_lat_to_tile(longitude, latitude, &self.mesh)?,
        };
        if tile >= self.tile_count() {
            return Err(ContextError::TileOutOfRange {
                tile,
                count: self.tile_count(),
            });
        }
        Ok(tile)
    }

    /// Overwrite the supplied fields of a tile's map state in place.
    pub fn write_tile_field(&mut self, index: usize, patch: &TilePatch) -> Result<(), ContextError> {
        self.map.set_tile(index, patch)?;
        tracing::trace!(tile = index, "tile fields written");
        Ok(())
    }

    pub fn province(&self, tile: usize) -> Result<TileProvince, ContextError> {
        let provinces = self.provinces.as_ref().ok_or(ContextError::NoProvinces)?;
        Ok(provinces.get(tile)?)
    }

    pub fn set_province(
        &mut self,
        tile: usize,
        province: i32,
        distance: Option<f32>,
    ) -> Result<(), ContextError> {
        let provinces = self.provinces.as_mut().ok_or(ContextError::NoProvinces)?;
        Ok(provinces.set(tile, province, distance)?)
    }
}

fn read(path: &Path) -> Result<Vec<u8>, ContextError> {
    std::fs::read(path).map_err(|source| ContextError::Io {
        path: path.to_path_buf(),
        source,
    })
}
