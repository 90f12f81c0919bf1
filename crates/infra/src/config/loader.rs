//! Configuration loader
//!
//! Loads client settings from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `OPENWOWI_HOST`: Host name, used as `https://{host}`
//! - `OPENWOWI_BASE_URL`: Full base URL, used when `OPENWOWI_HOST` is unset
//! - `OPENWOWI_USER`: Wowiport user name
//! - `OPENWOWI_PASSWORD`: Wowiport password
//! - `OPENWOWI_API_KEY`: OPENWOWI API key
//! - `OPENWOWI_VERSION`: API version (optional, default `v1.2`)
//! - `OPENWOWI_TIMEOUT_SECS`: HTTP timeout in seconds (optional)
//! - `OPENWOWI_RESPONSE_CACHE`: Whether GET responses are cached (optional)
//! - `OPENWOWI_RESPONSE_CACHE_TTL_SECS`: Response cache expiry (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./openwowi.json` or `./openwowi.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use openwowi_domain::{Result, WowiError};

use super::settings::ClientConfig;
use crate::errors::conversions::to_wowi;

const CONFIG_FILE_NAMES: [&str; 4] = ["openwowi.json", "openwowi.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `WowiError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `WowiError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<ClientConfig> {
    let base_url = match std::env::var("OPENWOWI_HOST") {
        Ok(host) if !host.trim().is_empty() => format!("https://{}", host.trim()),
        _ => env_var("OPENWOWI_BASE_URL")?,
    };

    let mut config = ClientConfig::new(
        base_url,
        env_var("OPENWOWI_USER")?,
        env_var("OPENWOWI_PASSWORD")?,
        env_var("OPENWOWI_API_KEY")?,
    );

    if let Ok(version) = std::env::var("OPENWOWI_VERSION") {
        config.version = version;
    }
    if let Some(secs) = env_parse::<u64>("OPENWOWI_TIMEOUT_SECS")? {
        config.timeout = Duration::from_secs(secs);
    }
    config.response_cache.enabled = env_bool("OPENWOWI_RESPONSE_CACHE", config.response_cache.enabled);
    if let Some(secs) = env_parse::<u64>("OPENWOWI_RESPONSE_CACHE_TTL_SECS")? {
        config.response_cache.ttl = Duration::from_secs(secs);
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `WowiError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WowiError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WowiError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WowiError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(to_wowi),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WowiError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WowiError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `WowiError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| WowiError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `WowiError::Config` if the variable is set but does not parse.
fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    std::env::var(key)
        .ok()
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| WowiError::Config(format!("Invalid value for {key}: '{raw}'")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
