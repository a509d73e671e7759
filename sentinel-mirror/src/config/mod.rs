//! User configuration stored in `~/.sentinel-mirror/config.ini`.
//!
//! The file is optional: every key has a default and a missing file reads
//! as all defaults. Object store credentials may also come from the
//! `SENTINEL_MIRROR_ACCESS_KEY` and `SENTINEL_MIRROR_SECRET_KEY`
//! environment variables, which take precedence over the file.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CatalogSettings, ConfigFile, DownloadSettings, LoggingSettings, ProxySettings,
    StorageSettings,
};
