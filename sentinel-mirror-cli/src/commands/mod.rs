//! CLI command implementations.
//!
//! Each subcommand has its own module with its handler.
//!
//! # Command Modules
//!
//! - [`common`] - Shared arguments and terminal helpers
//! - [`config`] - Configuration inspection (list, path)
//! - [`init`] - Configuration initialization
//! - [`query`] - Print the catalog filter for a search
//! - [`search`] - Catalog search matched to the selected tiles
//! - [`sync`] - Mirror synchronisation with progress bars
//! - [`tiles`] - Tile selection for a region

pub mod common;
pub mod config;
pub mod init;
pub mod query;
pub mod search;
pub mod sync;
pub mod tiles;
