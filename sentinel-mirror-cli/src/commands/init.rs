//! Init command - initialize configuration file.

use std::path::{Path, PathBuf};

use console::{style, Term};
use dialoguer::Input;
use sentinel_mirror::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
///
/// Existing settings are kept; only a missing mirror directory is filled in,
/// from `directory` or by asking when attached to a terminal.
pub fn run(config_path: Option<&Path>, directory: Option<PathBuf>) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    let mut config = ConfigFile::load_from(&path).unwrap_or_default();
    if let Some(directory) = directory {
        config.download.directory = Some(directory);
    } else if config.download.directory.is_none() && Term::stdout().is_term() {
        config.download.directory = prompt_directory()?;
    }
    config.save_to(&path)?;

    println!("Configuration file: {}", style(path.display()).cyan());
    match &config.download.directory {
        Some(dir) => println!("Mirror directory:   {}", dir.display()),
        None => println!("Mirror directory:   (not set, pass --output to sync)"),
    }
    println!();
    println!("Edit this file to set object store credentials and proxies.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

/// Ask for the mirror root. An empty answer leaves it unset.
fn prompt_directory() -> Result<Option<PathBuf>, CliError> {
    let answer: String = Input::new()
        .with_prompt("Mirror directory (leave empty to skip)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| CliError::Prompt(e.to_string()))?;

    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}
