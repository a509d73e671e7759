//! Tests for the coverage selector

use super::*;
use crate::geometry::{Crs, Tile};
use geo::{coord, Intersects, Polygon, Rect};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
    Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 }).to_polygon()
}

fn grid(tiles: &[(&str, Polygon<f64>)]) -> Grid {
    Grid::new(
        Crs::WGS84,
        tiles
            .iter()
            .map(|(name, poly)| Tile::new(*name, poly.clone()))
            .collect(),
    )
    .unwrap()
}

fn region(poly: Polygon<f64>) -> Region {
    Region::new(Crs::WGS84, poly)
}

#[test]
fn test_region_inside_single_tile() {
    let grid = grid(&[
        ("T1", rect(0.0, 0.0, 10.0, 10.0)),
        ("T2", rect(10.0, 0.0, 20.0, 10.0)),
    ]);
    let selection = select(&region(rect(2.0, 2.0, 3.0, 3.0)), &grid).unwrap();

    assert_eq!(selection.tiles(), &["T1".to_string()]);
}

#[test]
fn test_crs_mismatch_is_rejected() {
    let grid = Grid::new(
        Crs::from_epsg(32632),
        vec![Tile::new("T1", rect(0.0, 0.0, 10.0, 10.0))],
    )
    .unwrap();

    let err = select(&region(rect(2.0, 2.0, 3.0, 3.0)), &grid).unwrap_err();
    assert!(matches!(err, GeometryError::CrsMismatch { .. }));
}

#[test]
fn test_region_spanning_two_tiles_keeps_grid_order_on_ties() {
    let grid = grid(&[
        ("T1", rect(0.0, 0.0, 10.0, 10.0)),
        ("T2", rect(10.0, 0.0, 20.0, 10.0)),
    ]);
    // Both tiles leave 2 square units uncovered, so grid order decides
    let selection = select(&region(rect(8.0, 2.0, 12.0, 3.0)), &grid).unwrap();

    assert_eq!(selection.tiles(), &["T1".to_string(), "T2".to_string()]);
}

#[test]
fn test_largest_contribution_ranks_first() {
    let grid = grid(&[
        ("SMALL", rect(0.0, 0.0, 3.0, 1.0)),
        ("LARGE", rect(3.0, 0.0, 10.0, 1.0)),
    ]);
    let selection = select(&region(rect(0.0, 0.0, 10.0, 1.0)), &grid).unwrap();

    assert_eq!(selection.tiles(), &["LARGE".to_string(), "SMALL".to_string()]);
}

#[test]
fn test_redundant_tiles_are_skipped() {
    let grid = grid(&[
        ("A", rect(0.0, 0.0, 6.0, 1.0)),
        ("B", rect(4.0, 0.0, 10.0, 1.0)),
        ("C", rect(0.0, 0.0, 10.0, 1.0)),
    ]);
    let report = select_with_report(&region(rect(1.0, 0.0, 9.0, 1.0)), &grid).unwrap();

    assert_eq!(report.selection.tiles(), &["C".to_string()]);
    assert_eq!(report.candidates, 3);
    assert!(report.is_complete());
}

#[test]
fn test_ranking_is_not_recomputed_between_picks() {
    // Ranks from the full region: A and B leave 4 units each, C leaves 5.
    // After A is taken, C would cover the rest just as well as B, but the
    // order is fixed up front, so B wins and C becomes redundant.
    let grid = grid(&[
        ("C", rect(5.0, 0.0, 10.0, 1.0)),
        ("A", rect(0.0, 0.0, 6.0, 1.0)),
        ("B", rect(4.0, 0.0, 10.0, 1.0)),
    ]);
    let selection = select(&region(rect(0.0, 0.0, 10.0, 1.0)), &grid).unwrap();

    assert_eq!(selection.tiles(), &["A".to_string(), "B".to_string()]);
}

#[test]
fn test_boundary_contact_is_not_coverage() {
    let grid = grid(&[
        ("INSIDE", rect(0.0, 0.0, 10.0, 10.0)),
        ("TOUCHING", rect(10.0, 0.0, 20.0, 10.0)),
    ]);
    let report = select_with_report(&region(rect(5.0, 5.0, 10.0, 6.0)), &grid).unwrap();

    assert_eq!(report.selection.tiles(), &["INSIDE".to_string()]);
    assert_eq!(report.candidates, 1);
}

#[test]
fn test_grid_gap_is_reported_not_failed() {
    let grid = grid(&[("L", rect(0.0, 0.0, 1.0, 1.0)), ("R", rect(2.0, 0.0, 3.0, 1.0))]);
    let report = select_with_report(&region(rect(0.0, 0.0, 3.0, 1.0)), &grid).unwrap();

    assert_eq!(report.selection.len(), 2);
    assert!(!report.is_complete());
    assert!((report.uncovered_area - 1.0).abs() < 1e-9);
    assert!((report.coverage_ratio() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_disjoint_region_selects_nothing() {
    let grid = grid(&[("T1", rect(0.0, 0.0, 1.0, 1.0))]);
    let selection = select(&region(rect(5.0, 5.0, 6.0, 6.0)), &grid).unwrap();
    assert!(selection.is_empty());
}

#[test]
fn test_empty_grid_selects_nothing() {
    let grid = Grid::new(Crs::WGS84, Vec::new()).unwrap();
    let report = select_with_report(&region(rect(0.0, 0.0, 1.0, 1.0)), &grid).unwrap();
    assert!(report.selection.is_empty());
    assert_eq!(report.coverage_ratio(), 0.0);
}

#[test]
fn test_tile_selection_dedupes() {
    let selection = TileSelection::new(["A", "B", "A"]);
    assert_eq!(selection.len(), 2);
    assert!(selection.contains("A"));
    assert!(!selection.contains("C"));
    assert_eq!(selection.to_string(), "A, B");
}

// Property-based tests using proptest
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// 4x4 grid of unit cells, optionally inflated so neighbours overlap
    /// the way real Sentinel-2 tiles do.
    fn unit_grid(overlap: f64) -> Grid {
        let mut tiles = Vec::new();
        for row in 0..4 {
            for col in 0..4 {
                let (x, y) = (col as f64, row as f64);
                tiles.push(Tile::new(
                    format!("R{row}C{col}"),
                    rect(
                        (x - overlap).max(0.0),
                        (y - overlap).max(0.0),
                        (x + 1.0 + overlap).min(4.0),
                        (y + 1.0 + overlap).min(4.0),
                    ),
                ));
            }
        }
        Grid::new(Crs::WGS84, tiles).unwrap()
    }

    proptest! {
        #[test]
        fn test_selection_covers_contained_regions(
            x0 in 0.0..3.0_f64,
            y0 in 0.0..3.0_f64,
            w in 0.05..1.0_f64,
            h in 0.05..1.0_f64,
            overlap in prop_oneof![Just(0.0), Just(0.1), Just(0.25)],
        ) {
            let grid = unit_grid(overlap);
            let region = region(rect(x0, y0, x0 + w, y0 + h));

            let report = select_with_report(&region, &grid)?;

            prop_assert!(
                report.is_complete(),
                "uncovered {} of {}", report.uncovered_area, report.region_area
            );

            let union = report
                .selection
                .iter()
                .filter_map(|name| grid.tile(name))
                .fold(MultiPolygon::new(Vec::new()), |acc, tile| acc.union(tile.geometry()));
            let leftover = region.shape().difference(&union).unsigned_area();
            prop_assert!(leftover <= report.region_area * 1e-9);
        }

        #[test]
        fn test_selected_tiles_intersect_region(
            x0 in 0.0..3.0_f64,
            y0 in 0.0..3.0_f64,
            w in 0.05..1.0_f64,
            h in 0.05..1.0_f64,
        ) {
            let grid = unit_grid(0.1);
            let region = region(rect(x0, y0, x0 + w, y0 + h));

            let selection = select(&region, &grid)?;

            for name in selection.iter() {
                let tile = grid.tile(name).unwrap();
                prop_assert!(tile.geometry().intersects(region.shape()));
            }
        }

        #[test]
        fn test_selection_is_deterministic(
            x0 in 0.0..3.0_f64,
            y0 in 0.0..3.0_f64,
            w in 0.05..1.0_f64,
            h in 0.05..1.0_f64,
        ) {
            let grid = unit_grid(0.25);
            let region = region(rect(x0, y0, x0 + w, y0 + h));

            let first = select(&region, &grid)?;
            let second = select(&region, &grid)?;

            prop_assert_eq!(first, second);
        }
    }
}
