mod loader;
pub mod template;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::log::LogConfig;
use crate::session::SessionOptions;

pub use loader::{config_dir, config_path, load, try_load, try_load_from};

/// Title of the widget window when none is configured.
pub const DEFAULT_WIDGET_TITLE: &str = "Zeeho Widget";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Whether the error only means "no config file yet".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Top-level configuration for Perch.
///
/// Loaded from `~/.config/perch/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which window to turn into a widget.
    pub widget: WidgetConfig,
    /// How the widget is attached to the desktop.
    pub desktop: DesktopConfig,
    /// Foreground monitor tuning.
    pub monitor: MonitorConfig,
    /// File logging.
    pub logging: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Exact title of the widget window.
    pub title: String,
    /// How long to wait for the window to appear, in milliseconds.
    pub ready_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    /// Make the attached widget slightly transparent.
    pub translucent: bool,
    /// Overall opacity when translucent (1–255).
    pub opacity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Window titles that count as "the desktop has focus", on top of the
    /// built-in shell windows.
    pub extra_system_titles: Vec<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_WIDGET_TITLE.into(),
            ready_timeout_ms: 10_000,
        }
    }
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            translucent: true,
            opacity: u32::from(crate::hierarchy::DEFAULT_OPACITY),
        }
    }
}

impl DesktopConfig {
    /// The opacity to apply, or `None` for a fully opaque widget.
    pub fn opacity(&self) -> Option<u8> {
        self.translucent
            .then(|| u8::try_from(self.opacity.clamp(1, 255)).unwrap_or(u8::MAX))
    }
}

impl Config {
    /// Clamps values to safe ranges.
    ///
    /// A blank title falls back to the default, and a zero timeout would
    /// make setup give up before the host had any chance to signal.
    pub fn validate(&mut self) {
        if self.widget.title.trim().is_empty() {
            self.widget.title = DEFAULT_WIDGET_TITLE.into();
        }
        self.widget.ready_timeout_ms = self.widget.ready_timeout_ms.clamp(100, 600_000);
        self.desktop.opacity = self.desktop.opacity.clamp(1, 255);
        self.monitor
            .extra_system_titles
            .retain(|t| !t.trim().is_empty());
        self.logging.validate();
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.widget.ready_timeout_ms)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            title: self.widget.title.clone(),
            ready_timeout: self.ready_timeout(),
            extra_system_titles: self.monitor.extra_system_titles.clone(),
        }
    }
}
