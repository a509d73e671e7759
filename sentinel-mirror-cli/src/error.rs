//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use sentinel_mirror::app::AppError;
use sentinel_mirror::catalog::CatalogError;
use sentinel_mirror::config::{ConfigFileError, ENV_ACCESS_KEY, ENV_SECRET_KEY};
use sentinel_mirror::geometry::GeometryError;
use sentinel_mirror::mirror::MirrorError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// Selection, search or sync failed
    Session(AppError),
    /// Terminal interaction failed
    Prompt(String),
    /// Failed to install the Ctrl-C handler
    Interrupt(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Session(AppError::Catalog(CatalogError::NetworkExhausted { .. })) => {
                eprintln!();
                eprintln!("The catalog could not be reached. Check that:");
                eprintln!("  1. The proxies in [proxy] servers are reachable");
                eprintln!("  2. allow_direct = true if no proxy is required");
                eprintln!("  3. [catalog] endpoint points at the OData Products URL");
            }
            CliError::Session(AppError::Catalog(
                CatalogError::CatalogEmpty { .. } | CatalogError::NoMatchingTile { .. },
            )) => {
                eprintln!();
                eprintln!("Try widening the date range or raising --cloud-cover.");
            }
            CliError::Session(AppError::Store(_))
            | CliError::Session(AppError::Mirror(
                MirrorError::Listing { .. } | MirrorError::Transfer { .. },
            )) => {
                eprintln!();
                eprintln!("Object store access failed. Make sure:");
                eprintln!("  1. access_key and secret_key are set in [storage]");
                eprintln!(
                    "     (or export {} and {})",
                    ENV_ACCESS_KEY, ENV_SECRET_KEY
                );
                eprintln!("  2. The keys are Copernicus Data Space S3 keys");
            }
            CliError::Session(AppError::Config(_)) => {
                eprintln!();
                eprintln!("Run 'sentinel-mirror init' to choose a mirror directory.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Session(e) => write!(f, "{}", e),
            CliError::Prompt(msg) => write!(f, "Prompt failed: {}", msg),
            CliError::Interrupt(msg) => write!(f, "Failed to install interrupt handler: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Session(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::Session(e)
    }
}

impl From<GeometryError> for CliError {
    fn from(e: GeometryError) -> Self {
        CliError::Session(AppError::Geometry(e))
    }
}
