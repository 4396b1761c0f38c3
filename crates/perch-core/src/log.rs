//! Tracing subscriber setup with an optional size-rotated log file.
//!
//! Events always go to stderr. With file logging enabled they are also
//! written to `~/.config/perch/logs/perch.log`. When that file exceeds the
//! configured size it is rotated to `perch.log.1` (one backup kept).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_NAME: &str = "perch.log";
const BACKUP_EXTENSION: &str = "log.1";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

/// Largest accepted `max_file_mb`.
pub const MAX_FILE_MB_LIMIT: u64 = 1024;

impl LogConfig {
    /// Clamps `max_file_mb` to `1..=MAX_FILE_MB_LIMIT`.
    pub fn validate(&mut self) {
        self.max_file_mb = self.max_file_mb.clamp(1, MAX_FILE_MB_LIMIT);
    }

    /// Rotation threshold in bytes.
    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_mb.saturating_mul(1024 * 1024)
    }
}

/// Maps a config level name to a filter. Unknown names mean `info`.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// `RUST_LOG` overrides the configured level. A log file that cannot be
/// opened is reported on stderr and skipped.
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::builder()
        .with_default_directive(parse_level(&config.level).into())
        .from_env_lossy();

    let stderr = fmt::layer().with_writer(io::stderr).with_target(false);

    let file = if config.enabled {
        match open_default_log(config.max_file_bytes()) {
            Ok(writer) => Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(move || writer.clone()),
            ),
            Err(e) => {
                eprintln!("Warning: file logging disabled: {e}");
                None
            }
        }
    } else {
        None
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init();
}

/// Returns the log directory: `~/.config/perch/logs/`.
pub fn log_dir() -> Option<PathBuf> {
    crate::config::config_dir().map(|d| d.join("logs"))
}

fn open_default_log(max_bytes: u64) -> io::Result<RotatingFile> {
    let dir = log_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    fs::create_dir_all(&dir)?;
    RotatingFile::open(dir.join(LOG_FILE_NAME), max_bytes)
}

/// An append-only file that moves itself to a `.1` backup once it grows
/// past `max_bytes`. Clones share the same file.
#[derive(Clone)]
pub struct RotatingFile {
    inner: Arc<Mutex<RotatingInner>>,
}

struct RotatingInner {
    file: File,
    path: PathBuf,
    max_bytes: u64,
    written: u64,
}

impl RotatingFile {
    /// Opens (or creates) `path` for appending. A `max_bytes` of zero
    /// disables rotation.
    pub fn open(path: PathBuf, max_bytes: u64) -> io::Result<Self> {
        let file = append(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            inner: Arc::new(Mutex::new(RotatingInner {
                file,
                path,
                max_bytes,
                written,
            })),
        })
    }

    pub fn backup_path(path: &Path) -> PathBuf {
        path.with_extension(BACKUP_EXTENSION)
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        inner.file.write_all(buf)?;
        inner.written += buf.len() as u64;
        if inner.max_bytes > 0 && inner.written >= inner.max_bytes {
            inner.rotate()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        inner.file.flush()
    }
}

impl RotatingInner {
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        fs::rename(&self.path, RotatingFile::backup_path(&self.path))?;
        self.file = append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

fn append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("perch-log-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir.join(LOG_FILE_NAME)
    }

    #[test]
    fn parses_known_levels_case_insensitively() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_level("warn"), LevelFilter::WARN);
        assert_eq!(parse_level("Error"), LevelFilter::ERROR);
        assert_eq!(parse_level("verbose"), LevelFilter::INFO);
    }

    #[test]
    fn huge_file_limit_saturates_instead_of_overflowing() {
        // Arrange
        let config = LogConfig {
            max_file_mb: u64::MAX / 2,
            ..Default::default()
        };

        // Act / Assert
        assert_eq!(config.max_file_bytes(), u64::MAX);
        assert_eq!(LogConfig::default().max_file_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn validate_clamps_file_limit() {
        // Arrange
        let mut huge = LogConfig {
            max_file_mb: 9_223_372_036_854_775_807,
            ..Default::default()
        };
        let mut zero = LogConfig {
            max_file_mb: 0,
            ..Default::default()
        };

        // Act
        huge.validate();
        zero.validate();

        // Assert
        assert_eq!(huge.max_file_mb, MAX_FILE_MB_LIMIT);
        assert_eq!(zero.max_file_mb, 1);
    }

    #[test]
    fn rotates_to_single_backup_when_full() {
        // Arrange
        let path = temp_log("rotate");
        let mut file = RotatingFile::open(path.clone(), 16).unwrap();

        // Act
        file.write_all(b"0123456789abcdef").unwrap();
        file.write_all(b"next").unwrap();
        file.flush().unwrap();

        // Assert
        let backup = RotatingFile::backup_path(&path);
        assert_eq!(backup.file_name().unwrap(), "perch.log.1");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "0123456789abcdef");
        assert_eq!(fs::read_to_string(&path).unwrap(), "next");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn zero_limit_never_rotates() {
        // Arrange
        let path = temp_log("unbounded");
        let mut file = RotatingFile::open(path.clone(), 0).unwrap();

        // Act
        file.write_all(&[b'x'; 64]).unwrap();

        // Assert
        assert!(!RotatingFile::backup_path(&path).exists());
        assert_eq!(fs::read(&path).unwrap().len(), 64);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn clones_share_the_byte_count() {
        // Arrange
        let path = temp_log("shared");
        let mut first = RotatingFile::open(path.clone(), 8).unwrap();
        let mut second = first.clone();

        // Act
        first.write_all(b"1234").unwrap();
        second.write_all(b"5678").unwrap();

        // Assert
        assert!(RotatingFile::backup_path(&path).exists());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
