//! Configuration loading and root folder resolution
//!
//! Root folder resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `QSYNC_ROOT_FOLDER` environment variable
//! 3. TOML config file (`~/.config/qsync/qsync.toml`)
//! 4. OS-dependent compiled default (fallback)
//!
//! Remote endpoint and sync interval resolve ENV -> TOML -> built-in default.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::{Error, Result};

/// Built-in remote endpoint (read-only collection of title/body records)
pub const DEFAULT_SERVER_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Built-in periodic sync interval
pub const DEFAULT_SYNC_INTERVAL_SECONDS: u64 = 30;

const ROOT_FOLDER_ENV: &str = "QSYNC_ROOT_FOLDER";
const SERVER_URL_ENV: &str = "QSYNC_SERVER_URL";
const SYNC_INTERVAL_ENV: &str = "QSYNC_SYNC_INTERVAL_SECONDS";

/// Logging configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing level directive (e.g. "info", "debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// TOML configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database
    pub root_folder: Option<String>,
    /// Remote endpoint URL
    pub server_url: Option<String>,
    /// Periodic sync interval in seconds
    pub sync_interval_seconds: Option<u64>,
    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// Load the TOML config file, falling back to defaults when the file is
/// missing or malformed (malformed config is logged, never fatal)
pub fn load_toml_config() -> TomlConfig {
    let Some(path) = config_file_path() else {
        return TomlConfig::default();
    };
    if !path.exists() {
        return TomlConfig::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<TomlConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Malformed config file {} ({}), using defaults", path.display(), e);
                TomlConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config file {} ({}), using defaults", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Write the TOML config file (best-effort; used by tests and tooling)
pub fn write_toml_config(config: &TomlConfig, path: &std::path::Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Default configuration file path for the platform
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("qsync").join("qsync.toml"))
}

/// Root folder resolution following the 4-tier priority order
pub struct RootFolderResolver {
    cli_arg: Option<String>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<String>) -> Self {
        Self { cli_arg }
    }

    pub fn resolve(&self, toml_config: &TomlConfig) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return PathBuf::from(path);
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &toml_config.root_folder {
            return PathBuf::from(path);
        }

        // Priority 4: OS-dependent compiled default
        default_root_folder()
    }
}

/// Root folder initialization helper
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("qsync.db")
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("qsync"))
        .unwrap_or_else(|| PathBuf::from("./qsync_data"))
}

/// Resolve the remote endpoint URL (ENV -> TOML -> built-in default)
pub fn resolve_server_url(toml_config: &TomlConfig) -> String {
    if let Ok(url) = std::env::var(SERVER_URL_ENV) {
        if !url.trim().is_empty() {
            return url;
        }
    }
    toml_config
        .server_url
        .clone()
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

/// Resolve the periodic sync interval (ENV -> TOML -> built-in default).
/// Clamped to at least 5 seconds to avoid hammering the endpoint.
pub fn resolve_sync_interval_seconds(toml_config: &TomlConfig) -> u64 {
    let configured = std::env::var(SYNC_INTERVAL_ENV)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .or(toml_config.sync_interval_seconds)
        .unwrap_or(DEFAULT_SYNC_INTERVAL_SECONDS);

    configured.max(5)
}
