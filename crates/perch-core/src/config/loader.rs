use std::path::{Path, PathBuf};

use super::{Config, ConfigError};

/// Returns the config directory: `~/.config/perch/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("perch"))
}

/// Returns the config file path: `~/.config/perch/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse `config.toml`.
pub fn try_load() -> Result<Config, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoHomeDir)?;
    try_load_from(&path)
}

/// Loads and validates a config file at an explicit path.
pub fn try_load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
///
/// Logging is usually not running yet when this is called, so instead of
/// logging, the error worth reporting (anything but a missing file) is
/// returned next to the defaults.
pub fn load() -> (Config, Option<ConfigError>) {
    match try_load() {
        Ok(config) => (config, None),
        Err(e) if e.is_not_found() => (Config::default(), None),
        Err(e) => (Config::default(), Some(e)),
    }
}
