pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{Config, ConversionConfig};

const CONFIG_FILE_NAME: &str = ".rawk8stfc.toml";

/// Get the global config file path (~/.rawk8stfc.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (<dir>/.rawk8stfc.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise the current directory is checked
/// first, then the home directory, falling back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let local = local_config_path(Path::new("."));
    if local.is_file() {
        return read_config(&local);
    }

    if let Some(global) = global_config_path() {
        if global.is_file() {
            return read_config(&global);
        }
    }

    log::debug!("no config file found, using defaults");
    Ok(Config::default())
}

/// Read and parse a single config file.
pub fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}
