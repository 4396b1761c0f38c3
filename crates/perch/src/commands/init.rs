use std::path::Path;

use perch_core::config;
use perch_core::{PerchError, PerchResult};

/// Creates the default configuration file at `~/.config/perch/`.
///
/// The generated `config.toml` has comments explaining every option.
/// An existing file is not overwritten.
pub fn execute() -> PerchResult<()> {
    let dir = config::config_dir().ok_or(config::ConfigError::NoHomeDir)?;

    std::fs::create_dir_all(&dir).map_err(|e| PerchError::os("create config directory", e))?;

    write_if_missing(
        &dir.join("config.toml"),
        &config::template::generate_config(),
    )?;

    println!("\nSet [widget] title to the window you want to perch, then run `perch attach`.");
    Ok(())
}

/// Writes content to a file only if it doesn't already exist.
fn write_if_missing(path: &Path, content: &str) -> PerchResult<()> {
    if path.exists() {
        println!("Already exists: {}", path.display());
        return Ok(());
    }

    std::fs::write(path, content).map_err(|e| PerchError::os("write config file", e))?;
    println!("Created {}", path.display());
    Ok(())
}
