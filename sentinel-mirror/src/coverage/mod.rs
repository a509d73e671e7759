//! Coverage selector: which grid tiles are needed to cover a region.
//!
//! # Algorithm
//!
//! A deterministic greedy cover, ranked once up front:
//!
//! 1. Candidates are the tiles whose footprint overlaps the region with a
//!    positive area. Everything else is discarded for good.
//! 2. Candidates are ranked by ascending `area(region - tile)`, i.e. by how
//!    much of the region would remain uncovered if that tile were picked
//!    first. Ties keep grid order.
//! 3. The ranking is walked exactly once. A tile that still overlaps the
//!    shrinking residual is selected and subtracted from the residual; a
//!    tile that no longer overlaps it is redundant and skipped.
//!
//! The ranking is never recomputed between picks, so this is an
//! approximation of a minimum set cover rather than an optimal one. Grid
//! gaps are not an error here: the residual area is reported through
//! [`CoverageReport`] and the catalog stage later surfaces the missing tile
//! as an unmatched product.

use std::fmt;

use geo::{Area, BooleanOps, Intersects, MultiPolygon};
use tracing::{debug, warn};

use crate::geometry::{GeometryError, GeometryResult, Grid, Region};

/// Overlaps smaller than this fraction of the region area are treated as
/// boundary contact, not coverage.
const AREA_TOLERANCE: f64 = 1e-9;

/// Ordered, duplicate-free list of selected tile identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileSelection {
    tiles: Vec<String>,
}

impl TileSelection {
    /// Build a selection from identifiers, dropping repeats.
    pub fn new<I, S>(tiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::default();
        for tile in tiles {
            selection.push(tile.into());
        }
        selection
    }

    fn push(&mut self, tile: String) -> bool {
        if self.contains(&tile) {
            return false;
        }
        self.tiles.push(tile);
        true
    }

    /// Whether `tile` is part of the selection.
    pub fn contains(&self, tile: &str) -> bool {
        self.tiles.iter().any(|t| t == tile)
    }

    /// Identifiers in selection order.
    pub fn tiles(&self) -> &[String] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tiles.iter().map(String::as_str)
    }
}

impl fmt::Display for TileSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tiles.join(", "))
    }
}

/// Selection plus diagnostics about how well it covers the region.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    /// Selected tiles in greedy order.
    pub selection: TileSelection,
    /// Number of grid tiles that overlapped the region.
    pub candidates: usize,
    /// Area of the region.
    pub region_area: f64,
    /// Area of the region left uncovered by the selection.
    pub uncovered_area: f64,
}

impl CoverageReport {
    /// Whether the selected tiles cover the whole region.
    pub fn is_complete(&self) -> bool {
        self.uncovered_area <= self.region_area * AREA_TOLERANCE
    }

    /// Covered fraction of the region, 0.0 to 1.0.
    pub fn coverage_ratio(&self) -> f64 {
        if self.region_area <= 0.0 {
            return 0.0;
        }
        (1.0 - self.uncovered_area / self.region_area).clamp(0.0, 1.0)
    }
}

/// Select the tiles needed to cover `region`.
///
/// # Errors
///
/// Returns [`GeometryError::CrsMismatch`] when the region and the grid are
/// not in the same reference system.
pub fn select(region: &Region, grid: &Grid) -> GeometryResult<TileSelection> {
    select_with_report(region, grid).map(|report| report.selection)
}

/// Like [`select`], but also reports candidate count and residual area.
pub fn select_with_report(region: &Region, grid: &Grid) -> GeometryResult<CoverageReport> {
    if region.crs() != grid.crs() {
        return Err(GeometryError::CrsMismatch {
            region: region.crs(),
            grid: grid.crs(),
        });
    }

    let shape = region.shape();
    let region_area = shape.unsigned_area();
    let tolerance = region_area * AREA_TOLERANCE;

    let mut ranked: Vec<_> = grid
        .tiles()
        .iter()
        .filter(|tile| overlaps(shape, tile.geometry(), tolerance))
        .map(|tile| (shape.difference(tile.geometry()).unsigned_area(), tile))
        .collect();
    // Stable: equal ranks keep grid order
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    let candidates = ranked.len();
    let mut residual = shape.clone();
    let mut selection = TileSelection::default();

    for (rank, tile) in ranked {
        if !overlaps(&residual, tile.geometry(), tolerance) {
            debug!(tile = tile.name(), rank, "tile already covered, skipping");
            continue;
        }
        residual = residual.difference(tile.geometry());
        if selection.push(tile.name().to_string()) {
            debug!(tile = tile.name(), rank, "tile selected");
        }
    }

    let report = CoverageReport {
        selection,
        candidates,
        region_area,
        uncovered_area: residual.unsigned_area(),
    };

    if !report.is_complete() && region_area > 0.0 {
        warn!(
            uncovered = report.uncovered_area,
            coverage_pct = report.coverage_ratio() * 100.0,
            "grid does not fully cover the region"
        );
    }

    Ok(report)
}

/// Positive-area overlap test.
fn overlaps(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>, tolerance: f64) -> bool {
    a.intersects(b) && a.intersection(b).unsigned_area() > tolerance
}

#[cfg(test)]
mod tests;
