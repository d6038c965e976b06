//! Configuration loader
//!
//! Loads the client configuration from files and environment variables.
//!
//! ## Loading Strategy
//! 1. Probe the standard locations for a config file (JSON or TOML)
//! 2. Start from that file, or from the built-in defaults if none exists
//! 3. Apply `VPNREST_*` environment variables on top
//!
//! ## Environment Variables
//! - `VPNREST_API_HOSTNAME`: API hostname used for TLS and `Host`
//! - `VPNREST_API_ENDPOINT`: default endpoint, e.g. `45.83.223.196:443`
//! - `VPNREST_API_SCHEME`: `https` (default) or `http`
//! - `VPNREST_REQUEST_TIMEOUT`: request timeout in seconds
//! - `VPNREST_CACHE_DIR`: directory holding the shared cache files
//! - `VPNREST_CACHE_READ_ONLY`: whether this process may write caches
//! - `VPNREST_OBFUSCATION_PROXY`: local bridge address, e.g. `127.0.0.1:1080`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./vpnrest.json` or `./vpnrest.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. Relative to executable location

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use vpnrest_domain::{Endpoint, RestConfig};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid {format} format: {message}")]
    Format { format: &'static str, message: String },

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidVar { key: &'static str, message: String },
}

/// Load configuration: file (if any) overlaid with environment variables
///
/// # Errors
/// Returns `ConfigError` if a probed file cannot be parsed or an
/// environment variable holds an invalid value.
pub fn load() -> Result<RestConfig, ConfigError> {
    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            RestConfig::default()
        }
    };

    apply_env(base)
}

/// Load configuration from built-in defaults and environment variables only
///
/// # Errors
/// Returns `ConfigError::InvalidVar` if a variable cannot be parsed.
pub fn load_from_env() -> Result<RestConfig, ConfigError> {
    apply_env(RestConfig::default())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension (`.json` or `.toml`). Missing sections take their defaults.
///
/// # Errors
/// Returns `ConfigError` if no file is found, it cannot be read, or it does
/// not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<RestConfig, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| ConfigError::NotFound(PathBuf::from(".")))?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)?;
    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<RestConfig, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigError::Format { format: "TOML", message: e.to_string() }),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigError::Format { format: "JSON", message: e.to_string() }),
        _ => Err(ConfigError::UnsupportedFormat(extension.to_string())),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["vpnrest.json", "vpnrest.toml", "config.json", "config.toml"];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn apply_env(mut config: RestConfig) -> Result<RestConfig, ConfigError> {
    if let Some(hostname) = env_string("VPNREST_API_HOSTNAME") {
        config.api.hostname = hostname;
    }
    if let Some(endpoint) = env_parse::<Endpoint>("VPNREST_API_ENDPOINT")? {
        config.api.default_endpoint = endpoint;
    }
    if let Some(scheme) = env_string("VPNREST_API_SCHEME") {
        config.api.scheme = scheme;
    }
    if let Some(timeout) = env_parse::<u64>("VPNREST_REQUEST_TIMEOUT")? {
        config.api.request_timeout_secs = timeout;
    }
    if let Some(directory) = env_string("VPNREST_CACHE_DIR") {
        config.cache.directory = PathBuf::from(directory);
    }
    config.cache.read_only = env_bool("VPNREST_CACHE_READ_ONLY", config.cache.read_only);
    if let Some(proxy) = env_parse::<SocketAddr>("VPNREST_OBFUSCATION_PROXY")? {
        config.obfuscation.proxy_address = Some(proxy);
    }

    Ok(config)
}

/// Non-empty environment variable
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidVar { key, message: e.to_string() })
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
