//! Tiles command - select the grid tiles covering a region.

use std::path::Path;

use console::style;
use sentinel_mirror::coverage::select_with_report;
use sentinel_mirror::geometry::{read_grid, read_region};

use crate::error::CliError;

/// Run the tiles command.
pub fn run(region_path: &Path, grid_path: &Path) -> Result<(), CliError> {
    let region = read_region(region_path)?;
    let grid = read_grid(grid_path)?;

    let report = select_with_report(&region, &grid)?;

    println!(
        "{} of {} grid tiles overlap the region, {} selected:",
        report.candidates,
        grid.len(),
        report.selection.len()
    );
    for (i, tile) in report.selection.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, tile);
    }
    println!();

    let coverage = format!("{:.2}%", report.coverage_ratio() * 100.0);
    if report.is_complete() {
        println!("Coverage: {}", style(coverage).green());
    } else {
        println!(
            "Coverage: {} (the grid does not cover the whole region)",
            style(coverage).yellow()
        );
    }
    Ok(())
}
