//! Readers for region and grid files.
//!
//! - Region: a WKT `POLYGON` or `MULTIPOLYGON`, optionally prefixed with an
//!   EWKT `SRID=<code>;` tag. Without the tag the region is EPSG:4326.
//! - Grid: JSON of the form
//!   `{ "crs": 4326, "tiles": [ { "name": "32UNE", "wkt": "POLYGON(...)" } ] }`.

use std::fs;
use std::path::Path;

use geo::Geometry;
use serde::Deserialize;
use wkt::TryFromWkt;

use super::error::{GeometryError, GeometryResult};
use super::types::{into_multi_polygon, Crs, Grid, Region, Tile};

#[derive(Debug, Deserialize)]
struct GridFile {
    #[serde(default)]
    crs: Option<u32>,
    tiles: Vec<GridRecord>,
}

#[derive(Debug, Deserialize)]
struct GridRecord {
    name: String,
    wkt: String,
}

/// Read a region of interest from a WKT file.
pub fn read_region(path: &Path) -> GeometryResult<Region> {
    let text = read_text(path)?;
    parse_region(&text, &path.display().to_string())
}

/// Read a tiling grid from a JSON file.
pub fn read_grid(path: &Path) -> GeometryResult<Grid> {
    let text = read_text(path)?;
    parse_grid(&text, &path.display().to_string())
}

/// Parse a region from (E)WKT text.
pub fn parse_region(text: &str, source_name: &str) -> GeometryResult<Region> {
    let (crs, body) = split_srid(text.trim(), source_name)?;
    let geometry = parse_wkt(body, source_name)?;
    let shape = into_multi_polygon(geometry, source_name)?;
    Ok(Region::new(crs, shape))
}

/// Parse a grid from its JSON representation.
pub fn parse_grid(text: &str, source_name: &str) -> GeometryResult<Grid> {
    let file: GridFile =
        serde_json::from_str(text).map_err(|e| GeometryError::ParseFailed {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;

    let crs = file.crs.map(Crs::from_epsg).unwrap_or_default();
    let tiles = file
        .tiles
        .into_iter()
        .map(|record| {
            let context = format!("{} (tile {})", source_name, record.name);
            let geometry = parse_wkt(&record.wkt, &context)?;
            let shape = into_multi_polygon(geometry, &context)?;
            Ok(Tile::new(record.name, shape))
        })
        .collect::<GeometryResult<Vec<_>>>()?;

    Grid::new(crs, tiles)
}

fn read_text(path: &Path) -> GeometryResult<String> {
    fs::read_to_string(path).map_err(|e| GeometryError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_wkt(text: &str, source_name: &str) -> GeometryResult<Geometry<f64>> {
    Geometry::<f64>::try_from_wkt_str(text.trim()).map_err(|e| GeometryError::ParseFailed {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })
}

/// Split an optional `SRID=<code>;` prefix off EWKT text.
fn split_srid<'a>(text: &'a str, source_name: &str) -> GeometryResult<(Crs, &'a str)> {
    let Some(rest) = strip_prefix_ignore_case(text, "SRID=") else {
        return Ok((Crs::default(), text));
    };
    let (code, body) = rest
        .split_once(';')
        .ok_or_else(|| GeometryError::ParseFailed {
            source_name: source_name.to_string(),
            reason: "SRID prefix is not terminated by ';'".to_string(),
        })?;
    let code = code
        .trim()
        .parse::<u32>()
        .map_err(|_| GeometryError::ParseFailed {
            source_name: source_name.to_string(),
            reason: format!("invalid SRID '{}'", code.trim()),
        })?;
    Ok((Crs::from_epsg(code), body))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
