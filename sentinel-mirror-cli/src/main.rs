//! Sentinel Mirror CLI - Command-line interface
//!
//! This binary provides a command-line interface to the sentinel-mirror
//! library: tile selection, catalog queries and mirror synchronisation.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::{MirrorArgs, SearchArgs};
use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "sentinel-mirror")]
#[command(author, version, about = "Mirror Sentinel imagery products covering a region", long_about = None)]
struct Cli {
    /// Path to config.ini (default: ~/.sentinel-mirror/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also print log output to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update the configuration file
    Init {
        /// Mirror root directory to store in the config
        #[arg(long)]
        directory: Option<PathBuf>,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Select the grid tiles covering a region
    Tiles {
        /// Region of interest (WKT POLYGON or MULTIPOLYGON)
        #[arg(long)]
        region: PathBuf,

        /// Tiling grid (JSON)
        #[arg(long)]
        grid: PathBuf,
    },

    /// Print the catalog filter for a search without sending it
    Query {
        #[command(flatten)]
        search: SearchArgs,

        /// Print the full request URL instead of the bare expression
        #[arg(long)]
        url: bool,
    },

    /// Search the catalog and list the products matching the selected tiles
    Search {
        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Download every matching product that is not already mirrored
    Sync {
        #[command(flatten)]
        mirror: MirrorArgs,

        /// Mirror root directory (overrides download.directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compare with the local mirror without downloading anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { directory } => commands::init::run(config_path, directory),
        Commands::Config { command } => commands::config::run(config_path, command),
        Commands::Tiles { region, grid } => {
            let runner = CliRunner::new(config_path, cli.verbose)?;
            runner.log_startup("tiles");
            commands::tiles::run(&region, &grid)
        }
        Commands::Query { search, url } => {
            let runner = CliRunner::new(config_path, cli.verbose)?;
            runner.log_startup("query");
            commands::query::run(&runner, &search, url)
        }
        Commands::Search { mirror } => {
            let runner = CliRunner::new(config_path, cli.verbose)?;
            runner.log_startup("search");
            commands::search::run(&runner, &mirror)
        }
        Commands::Sync {
            mirror,
            output,
            dry_run,
        } => {
            let runner = CliRunner::new(config_path, cli.verbose)?;
            runner.log_startup("sync");
            commands::sync::run(&runner, &mirror, output.as_deref(), dry_run)
        }
    }
}
