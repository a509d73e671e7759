//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading and logging initialization so the command
//! handlers only deal with their own work.

use std::path::{Path, PathBuf};

use tracing::info;

use sentinel_mirror::app::AppConfig;
use sentinel_mirror::config::{ConfigFile, DEFAULT_LOG_FILE};
use sentinel_mirror::logging::{init_logging_full, split_log_path, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load the config (default path unless `config_path` is given) and
    /// initialize logging.
    ///
    /// Console logging is only enabled with `verbose`, so progress bars are
    /// not interleaved with log lines. The log file is always written.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = load_config(config_path)?;

        let log_path = &config.logging.file;
        let (log_dir, log_file) = split_log_path(log_path)
            .map(|(dir, file)| (dir.to_path_buf(), file.to_string()))
            .unwrap_or_else(|| (PathBuf::from("."), DEFAULT_LOG_FILE.to_string()));

        let logging_guard = init_logging_full(&log_dir, &log_file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Application config, with the mirror root overridden when given.
    pub fn app_config(&self, output: Option<&Path>) -> AppConfig {
        let app = AppConfig::from_config_file(&self.config);
        match output {
            Some(root) => app.with_mirror_root(root),
            None => app,
        }
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Sentinel Mirror v{}", sentinel_mirror::VERSION);
        info!("Sentinel Mirror CLI: {} command", command);
    }
}

/// Load the config file with environment credential overrides applied.
pub fn load_config(config_path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match config_path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config.with_env_overrides())
}
