//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;
use reqwest::Url;

use super::defaults::MAX_PARALLEL_OBJECTS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [catalog] section
    if let Some(section) = ini.section(Some("catalog")) {
        if let Some(v) = section.get("endpoint") {
            config.catalog.endpoint = parse_url("catalog", "endpoint", v)?;
        }
        if let Some(v) = section.get("timeout") {
            config.catalog.timeout = match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(invalid(
                        "catalog",
                        "timeout",
                        v,
                        "must be a positive integer (seconds)",
                    ))
                }
            };
        }
        if let Some(v) = section.get("platform") {
            config.catalog.platform = non_empty("catalog", "platform", v)?;
        }
        if let Some(v) = section.get("product_type") {
            config.catalog.product_type = non_empty("catalog", "product_type", v)?;
        }
        if let Some(v) = section.get("cloud_cover") {
            config.catalog.cloud_cover = match v.trim().parse::<f64>() {
                Ok(pct) if (0.0..=100.0).contains(&pct) => pct,
                _ => {
                    return Err(invalid(
                        "catalog",
                        "cloud_cover",
                        v,
                        "must be a number between 0 and 100",
                    ))
                }
            };
        }
    }

    // [storage] section
    if let Some(section) = ini.section(Some("storage")) {
        if let Some(v) = section.get("endpoint") {
            config.storage.endpoint = parse_url("storage", "endpoint", v)?;
        }
        if let Some(v) = section.get("bucket") {
            config.storage.bucket = non_empty("storage", "bucket", v)?;
        }
        if let Some(v) = section.get("region") {
            config.storage.region = non_empty("storage", "region", v)?;
        }
        if let Some(v) = section.get("access_key") {
            config.storage.access_key = optional(v);
        }
        if let Some(v) = section.get("secret_key") {
            config.storage.secret_key = optional(v);
        }
    }

    // [proxy] section
    if let Some(section) = ini.section(Some("proxy")) {
        if let Some(v) = section.get("servers") {
            config.proxy.servers = parse_list(v);
            for server in &config.proxy.servers {
                parse_url("proxy", "servers", server)?;
            }
        }
        if let Some(v) = section.get("allow_direct") {
            config.proxy.allow_direct = parse_bool(v)
                .ok_or_else(|| invalid("proxy", "allow_direct", v, "must be true or false"))?;
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.download.directory = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("parallel_objects") {
            config.download.parallel_objects = match v.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_PARALLEL_OBJECTS).contains(&n) => n,
                _ => {
                    return Err(invalid(
                        "download",
                        "parallel_objects",
                        v,
                        &format!("must be an integer between 1 and {}", MAX_PARALLEL_OBJECTS),
                    ))
                }
            };
        }
        if let Some(v) = section.get("stale_artifacts") {
            let artifacts = parse_list(v);
            if let Some(bad) = artifacts
                .iter()
                .find(|a| a.contains('/') || a.contains('\\') || *a == "..")
            {
                return Err(invalid(
                    "download",
                    "stale_artifacts",
                    bad,
                    "entries must be plain directory names",
                ));
            }
            config.download.stale_artifacts = artifacts;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty(section: &str, key: &str, value: &str) -> Result<String, ConfigFileError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(invalid(section, key, value, "must not be empty"));
    }
    Ok(v.to_string())
}

fn optional(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

fn parse_url(section: &str, key: &str, value: &str) -> Result<String, ConfigFileError> {
    let v = value.trim();
    match Url::parse(v) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(v.to_string()),
        _ => Err(invalid(section, key, value, "must be an http(s) URL")),
    }
}

/// Split a comma separated list, dropping blank entries.
pub(super) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
