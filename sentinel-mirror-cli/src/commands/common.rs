//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use sentinel_mirror::app::{AppConfig, SearchRequest};
use sentinel_mirror::geometry::{read_grid, read_region, Grid, Region};
use sentinel_mirror::query::parse_date;

use crate::error::CliError;

/// Search parameters shared by `query`, `search` and `sync`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Region of interest (WKT POLYGON or MULTIPOLYGON, EPSG:4326)
    #[arg(long)]
    pub region: PathBuf,

    /// First acquisition date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: NaiveDate,

    /// Last acquisition date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub end: NaiveDate,

    /// Cloud cover ceiling in percent (default: catalog.cloud_cover)
    #[arg(long)]
    pub cloud_cover: Option<f64>,

    /// Collection name (default: catalog.platform)
    #[arg(long)]
    pub platform: Option<String>,

    /// Product type (default: catalog.product_type)
    #[arg(long)]
    pub product_type: Option<String>,
}

impl SearchArgs {
    /// Merge the arguments over the configured defaults.
    ///
    /// CLI takes precedence, then config.
    pub fn request(&self, config: &AppConfig) -> SearchRequest {
        let mut request = SearchRequest::from_config(config, self.start, self.end);
        if let Some(cloud_cover) = self.cloud_cover {
            request.cloud_cover_ceiling = cloud_cover;
        }
        if let Some(platform) = &self.platform {
            request.platform = platform.clone();
        }
        if let Some(product_type) = &self.product_type {
            request.product_type = product_type.clone();
        }
        request
    }
}

/// Arguments for commands that select tiles and search the catalog.
#[derive(Debug, Clone, Args)]
pub struct MirrorArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Tiling grid (JSON)
    #[arg(long)]
    pub grid: PathBuf,
}

impl MirrorArgs {
    /// Read the region and grid files.
    pub fn load_inputs(&self) -> Result<(Region, Grid), CliError> {
        Ok((read_region(&self.search.region)?, read_grid(&self.grid)?))
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

/// Read a region file.
pub fn load_region(path: &Path) -> Result<Region, CliError> {
    Ok(read_region(path)?)
}

/// Spinner shown while waiting on the network.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Human readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
