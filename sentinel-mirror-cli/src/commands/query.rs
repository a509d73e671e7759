//! Query command - print the catalog filter for a search.

use sentinel_mirror::query::build;

use super::common::{load_region, SearchArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the query command.
///
/// Nothing is sent; the output can be pasted into any OData client.
pub fn run(runner: &CliRunner, args: &SearchArgs, as_url: bool) -> Result<(), CliError> {
    let config = runner.app_config(None);
    let region = load_region(&args.region)?;
    let query = args.request(&config).query_for(&region)?;
    let filter = build(&query);

    if as_url {
        let url = filter
            .to_url(&config.resolver.endpoint)
            .map_err(|e| CliError::Config(e.to_string()))?;
        println!("{}", url);
    } else {
        println!("{}", filter);
    }
    Ok(())
}
