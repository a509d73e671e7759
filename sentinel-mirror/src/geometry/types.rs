//! Region, tile and grid value types.

use std::collections::HashSet;
use std::fmt;

use geo::{Area, BooleanOps, BoundingRect, Geometry, MultiPolygon};
use wkt::ToWkt;

use super::error::{GeometryError, GeometryResult};

/// Coordinate reference system, identified by EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs(u32);

impl Crs {
    /// Geographic WGS 84 (EPSG:4326), the frame used by the catalog.
    pub const WGS84: Crs = Crs(4326);

    /// Create a reference system from an EPSG code.
    pub const fn from_epsg(code: u32) -> Self {
        Self(code)
    }

    /// The EPSG code.
    pub const fn epsg(&self) -> u32 {
        self.0
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::WGS84
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// A region of interest.
///
/// Multi-part input is reduced to its planar union on construction, so
/// overlapping parts never count twice towards coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    crs: Crs,
    shape: MultiPolygon<f64>,
}

impl Region {
    /// Create a region from a polygon or multi-polygon.
    pub fn new(crs: Crs, shape: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            crs,
            shape: planar_union(shape.into()),
        }
    }

    /// Reference system of the region.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// The unioned region geometry.
    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Planar area in squared CRS units.
    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    /// Whether the region has no polygons at all.
    pub fn is_empty(&self) -> bool {
        self.shape.0.is_empty()
    }

    /// WKT of the region geometry itself.
    pub fn to_wkt(&self) -> String {
        if self.shape.0.len() == 1 {
            self.shape.0[0].wkt_string()
        } else {
            self.shape.wkt_string()
        }
    }

    /// WKT of the region's axis-aligned bounding rectangle.
    ///
    /// This is the footprint sent to the catalog: the catalog only has to
    /// narrow the search, the tile selection does the precise filtering.
    pub fn footprint_wkt(&self) -> GeometryResult<String> {
        let rect = self
            .shape
            .bounding_rect()
            .ok_or(GeometryError::EmptyRegion)?;
        Ok(rect.to_polygon().wkt_string())
    }
}

/// One cell of a satellite tiling grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    name: String,
    geometry: MultiPolygon<f64>,
}

impl Tile {
    /// Create a tile from its identifier and footprint.
    pub fn new(name: impl Into<String>, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            name: name.into(),
            geometry: geometry.into(),
        }
    }

    /// Tile identifier (for Sentinel-2 MGRS tiles, e.g. `32UNE`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tile footprint.
    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }
}

/// An ordered tiling grid sharing a single reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    crs: Crs,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid. Tile names must be unique.
    pub fn new(crs: Crs, tiles: Vec<Tile>) -> GeometryResult<Self> {
        let mut seen = HashSet::with_capacity(tiles.len());
        for tile in &tiles {
            if !seen.insert(tile.name()) {
                return Err(GeometryError::DuplicateTile {
                    name: tile.name().to_string(),
                });
            }
        }
        Ok(Self { crs, tiles })
    }

    /// Reference system of every tile.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// Tiles in grid order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Look up a tile by name.
    pub fn tile(&self, name: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Convert a parsed geometry into a multi-polygon, rejecting other kinds.
pub(crate) fn into_multi_polygon(
    geometry: Geometry<f64>,
    source_name: &str,
) -> GeometryResult<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => Ok(MultiPolygon::from(p)),
        Geometry::MultiPolygon(mp) => Ok(mp),
        Geometry::Rect(r) => Ok(MultiPolygon::from(r.to_polygon())),
        other => Err(GeometryError::UnsupportedGeometry {
            source_name: source_name.to_string(),
            kind: geometry_kind(&other).to_string(),
        }),
    }
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) => "LINE",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
    }
}

fn planar_union(shape: MultiPolygon<f64>) -> MultiPolygon<f64> {
    if shape.0.len() <= 1 {
        return shape;
    }
    shape
        .0
        .into_iter()
        .fold(MultiPolygon::new(Vec::new()), |acc, polygon| {
            acc.union(&MultiPolygon::from(polygon))
        })
}
