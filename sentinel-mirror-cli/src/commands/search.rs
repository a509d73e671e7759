//! Search command - list the catalog products for the selected tiles.

use console::style;
use sentinel_mirror::catalog::{CatalogResolver, ReqwestCatalogTransport};
use sentinel_mirror::coverage::select_with_report;

use super::common::{spinner, MirrorArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the search command.
pub fn run(runner: &CliRunner, args: &MirrorArgs) -> Result<(), CliError> {
    let config = runner.app_config(None);
    let (region, grid) = args.load_inputs()?;

    let report = select_with_report(&region, &grid)?;
    let query = args.search.request(&config).query_for(&region)?;

    let resolver = CatalogResolver::new(
        ReqwestCatalogTransport,
        config.proxy_source(),
        config.resolver.clone(),
    );

    let pb = spinner(&format!(
        "Searching catalog for {} tile(s)...",
        report.selection.len()
    ));
    let result = resolver.resolve(&query, &report.selection);
    pb.finish_and_clear();
    let products = result.map_err(sentinel_mirror::app::AppError::from)?;

    println!(
        "{} product(s) for tiles {}:",
        products.len(),
        style(&report.selection).cyan()
    );
    for product in &products {
        println!("  {}", product.name());
        println!("      {}", style(product.key()).dim());
    }
    Ok(())
}
