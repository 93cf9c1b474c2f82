//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "CAMPUS_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "campus.db";

/// Optional settings read from `config.toml`
///
/// Every key is optional; a missing file is equivalent to an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl TomlConfig {
    /// Parse a config file, failing if it is missing or malformed
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    /// Load the platform config file if present, defaults otherwise
    ///
    /// A malformed file is reported and ignored so the service still starts.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => match Self::load(&path) {
                Ok(config) => Ok(config),
                Err(e) => {
                    warn!("Ignoring config file: {}", e);
                    Ok(Self::default())
                }
            },
            _ => Ok(Self::default()),
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    get_default_root_folder()
}

/// Database location for a resolved root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Platform config file: `~/.config/campus/config.toml` on Linux,
/// `/etc/campus/config.toml` as a system-wide fallback
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("campus").join("config.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        return Some(PathBuf::from("/etc/campus/config.toml"));
    }

    user_config
}

/// Get OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("campus"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/campus"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("campus"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/campus"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("campus"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\campus"))
    } else {
        PathBuf::from("./campus_data")
    }
}
