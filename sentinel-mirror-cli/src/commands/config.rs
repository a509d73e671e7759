//! Configuration inspection CLI commands.
//!
//! Provides `config list` and `config path`.

use std::path::Path;

use clap::Subcommand;
use sentinel_mirror::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::load_config;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(config_path: Option<&Path>, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::List => run_list(config_path),
        ConfigCommands::Path => run_path(config_path),
    }
}

/// List all configuration settings, with credentials masked.
fn run_list(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;

    println!("Configuration Settings");
    println!("======================");

    let mut current_section = "";
    for (section, key, value) in entries(&config) {
        // Print section header when section changes
        if section != current_section {
            println!();
            println!("[{}]", section);
            current_section = section;
        }

        if value.is_empty() {
            println!("  {} = (not set)", key);
        } else {
            println!("  {} = {}", key, value);
        }
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path(config_path: Option<&Path>) -> Result<(), CliError> {
    match config_path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", config_file_path().display()),
    }
    Ok(())
}

fn entries(config: &ConfigFile) -> Vec<(&'static str, &'static str, String)> {
    let masked = |value: &Option<String>| value.as_ref().map(|_| "********".to_string());
    let path = |value: Option<&Path>| value.map(|p| p.display().to_string());

    vec![
        ("catalog", "endpoint", config.catalog.endpoint.clone()),
        ("catalog", "timeout", config.catalog.timeout.to_string()),
        ("catalog", "platform", config.catalog.platform.clone()),
        ("catalog", "product_type", config.catalog.product_type.clone()),
        ("catalog", "cloud_cover", config.catalog.cloud_cover.to_string()),
        ("storage", "endpoint", config.storage.endpoint.clone()),
        ("storage", "bucket", config.storage.bucket.clone()),
        ("storage", "region", config.storage.region.clone()),
        (
            "storage",
            "access_key",
            masked(&config.storage.access_key).unwrap_or_default(),
        ),
        (
            "storage",
            "secret_key",
            masked(&config.storage.secret_key).unwrap_or_default(),
        ),
        ("proxy", "servers", config.proxy.servers.join(", ")),
        ("proxy", "allow_direct", config.proxy.allow_direct.to_string()),
        (
            "download",
            "directory",
            path(config.download.directory.as_deref()).unwrap_or_default(),
        ),
        (
            "download",
            "parallel_objects",
            config.download.parallel_objects.to_string(),
        ),
        (
            "download",
            "stale_artifacts",
            config.download.stale_artifacts.join(", "),
        ),
        (
            "logging",
            "file",
            config.logging.file.display().to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_mask_credentials() {
        let mut config = ConfigFile::default();
        config.storage.access_key = Some("AKIA-real".to_string());

        let entries = entries(&config);
        let access = entries
            .iter()
            .find(|(section, key, _)| *section == "storage" && *key == "access_key")
            .unwrap();
        assert_eq!(access.2, "********");

        let secret = entries.iter().find(|(_, key, _)| *key == "secret_key").unwrap();
        assert!(secret.2.is_empty());
        assert!(!entries.iter().any(|(_, _, value)| value.contains("AKIA")));
    }

    #[test]
    fn test_entries_cover_every_section() {
        let entries = entries(&ConfigFile::default());
        for section in ["catalog", "storage", "proxy", "download", "logging"] {
            assert!(entries.iter().any(|(s, _, _)| *s == section), "{section}");
        }
    }
}
